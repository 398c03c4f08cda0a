use std::cmp::Ordering;

use crate::math::int_point::slopes_equal3;
use crate::math::IntPoint;

use super::output::{reverse_ring, ring_area, ring_contains, OutPt, OutPtId};
use super::sweep::SweepSession;

/// Two output points on coincident collinear edges, to be stitched once the
/// sweep is done. `off_pt` is a further point on the shared line.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Join {
    pub out_pt1: OutPtId,
    pub out_pt2: OutPtId,
    pub off_pt: IntPoint,
}

/// A horizontal output segment that may be overlapped by a horizontal
/// inserted later in the same scanbeam.
#[derive(Debug, Clone, Copy)]
pub(crate) struct GhostJoin {
    pub out_pt: OutPtId,
    pub off_pt: IntPoint,
}

/// Overlap `(left, right)` of two x ranges, if it has positive length.
fn overlap(a1: i64, a2: i64, b1: i64, b2: i64) -> Option<(i64, i64)> {
    let left = a1.min(a2).max(b1.min(b2));
    let right = a1.max(a2).min(b1.max(b2));
    (left < right).then_some((left, right))
}

impl SweepSession {
    pub(super) fn add_join(&mut self, out_pt1: OutPtId, out_pt2: OutPtId, off_pt: IntPoint) {
        self.joins.push(Join {
            out_pt1,
            out_pt2,
            off_pt,
        });
    }

    pub(super) fn add_ghost_join(&mut self, out_pt: OutPtId, off_pt: IntPoint) {
        self.ghost_joins.push(GhostJoin { out_pt, off_pt });
    }

    /// Inserts a copy of `op` after (or before) it in its ring.
    fn dup_out_pt(&mut self, op: OutPtId, insert_after: bool) -> OutPtId {
        let OutPt { pt, idx, next, prev } = self.out_pts[op].clone();
        if insert_after {
            let dup = self.out_pts.insert(OutPt {
                pt,
                idx,
                next,
                prev: op,
            });
            self.out_pts[next].prev = dup;
            self.out_pts[op].next = dup;
            dup
        } else {
            let dup = self.out_pts.insert(OutPt {
                pt,
                idx,
                next: op,
                prev,
            });
            self.out_pts[prev].next = dup;
            self.out_pts[op].prev = dup;
            dup
        }
    }

    /// Walks `op` along its horizontal run towards `pt` and splits the ring
    /// there, returning the two ends `(op, op_b)` to be relinked.
    fn split_horizontal_run(
        &mut self,
        mut op: OutPtId,
        op_b: OutPtId,
        pt: IntPoint,
        discard_left: bool,
    ) -> (OutPtId, OutPtId) {
        let left_to_right = self.out_pts[op].pt.x <= self.out_pts[op_b].pt.x;
        let insert_after = if left_to_right {
            loop {
                let next = self.out_pts[self.out_pts[op].next].pt;
                let cur = self.out_pts[op].pt;
                if next.x <= pt.x && next.x >= cur.x && next.y == pt.y {
                    op = self.out_pts[op].next;
                } else {
                    break;
                }
            }
            if discard_left && self.out_pts[op].pt.x != pt.x {
                op = self.out_pts[op].next;
            }
            !discard_left
        } else {
            loop {
                let next = self.out_pts[self.out_pts[op].next].pt;
                let cur = self.out_pts[op].pt;
                if next.x >= pt.x && next.x <= cur.x && next.y == pt.y {
                    op = self.out_pts[op].next;
                } else {
                    break;
                }
            }
            if !discard_left && self.out_pts[op].pt.x != pt.x {
                op = self.out_pts[op].next;
            }
            discard_left
        };
        let mut dup = self.dup_out_pt(op, insert_after);
        if self.out_pts[dup].pt != pt {
            op = dup;
            self.out_pts[op].pt = pt;
            dup = self.dup_out_pt(op, insert_after);
        }
        (op, dup)
    }

    /// Stitches two opposed horizontal runs at `pt`.
    fn join_horz(
        &mut self,
        op1: OutPtId,
        op1b: OutPtId,
        op2: OutPtId,
        op2b: OutPtId,
        pt: IntPoint,
        discard_left: bool,
    ) -> bool {
        let dir1_ltr = self.out_pts[op1].pt.x <= self.out_pts[op1b].pt.x;
        let dir2_ltr = self.out_pts[op2].pt.x <= self.out_pts[op2b].pt.x;
        if dir1_ltr == dir2_ltr {
            return false;
        }
        let (op1, op1b) = self.split_horizontal_run(op1, op1b, pt, discard_left);
        let (op2, op2b) = self.split_horizontal_run(op2, op2b, pt, discard_left);

        if dir1_ltr == discard_left {
            self.out_pts[op1].prev = op2;
            self.out_pts[op2].next = op1;
            self.out_pts[op1b].next = op2b;
            self.out_pts[op2b].prev = op1b;
        } else {
            self.out_pts[op1].next = op2;
            self.out_pts[op2].prev = op1;
            self.out_pts[op1b].prev = op2b;
            self.out_pts[op2b].next = op1b;
        }
        true
    }

    /// Cross-links two rings at `op1`/`op2`, splitting or merging them.
    fn splice_at(&mut self, join: &mut Join, op1: OutPtId, op2: OutPtId, reverse1: bool) {
        if reverse1 {
            let op1b = self.dup_out_pt(op1, false);
            let op2b = self.dup_out_pt(op2, true);
            self.out_pts[op1].prev = op2;
            self.out_pts[op2].next = op1;
            self.out_pts[op1b].next = op2b;
            self.out_pts[op2b].prev = op1b;
            join.out_pt1 = op1;
            join.out_pt2 = op1b;
        } else {
            let op1b = self.dup_out_pt(op1, true);
            let op2b = self.dup_out_pt(op2, false);
            self.out_pts[op1].next = op2;
            self.out_pts[op2].prev = op1;
            self.out_pts[op1b].prev = op2b;
            self.out_pts[op2b].next = op1b;
            join.out_pt1 = op1;
            join.out_pt2 = op1b;
        }
    }

    /// First point after (or before) `op` at a different location.
    fn distinct_neighbour(&self, op: OutPtId, forward: bool) -> OutPtId {
        let step = |p: OutPtId| {
            if forward {
                self.out_pts[p].next
            } else {
                self.out_pts[p].prev
            }
        };
        let mut b = step(op);
        while self.out_pts[b].pt == self.out_pts[op].pt && b != op {
            b = step(b);
        }
        b
    }

    /// Resolves one join record. Three kinds exist:
    /// horizontal joins (points anywhere along collinear horizontals),
    /// non-horizontal joins (both points at the bottom of the shared segment)
    /// and touching-vertex joins (all three points coincide).
    fn join_points(&mut self, join: &mut Join, rec1: usize, rec2: usize) -> bool {
        let (mut op1, mut op2) = (join.out_pt1, join.out_pt2);
        let off = join.off_pt;
        let is_horizontal = self.out_pts[op1].pt.y == off.y;

        if is_horizontal && off == self.out_pts[op1].pt && off == self.out_pts[op2].pt {
            if rec1 != rec2 {
                return false;
            }
            let mut op1b = self.out_pts[op1].next;
            while op1b != op1 && self.out_pts[op1b].pt == off {
                op1b = self.out_pts[op1b].next;
            }
            let reverse1 = self.out_pts[op1b].pt.y > off.y;
            let mut op2b = self.out_pts[op2].next;
            while op2b != op2 && self.out_pts[op2b].pt == off {
                op2b = self.out_pts[op2b].next;
            }
            let reverse2 = self.out_pts[op2b].pt.y > off.y;
            if reverse1 == reverse2 {
                return false;
            }
            self.splice_at(join, op1, op2, reverse1);
            return true;
        }

        if is_horizontal {
            // The points may be anywhere along the horizontals; find the
            // extremes of both runs first.
            let mut op1b = op1;
            while self.out_pts[self.out_pts[op1].prev].pt.y == self.out_pts[op1].pt.y
                && self.out_pts[op1].prev != op1b
                && self.out_pts[op1].prev != op2
            {
                op1 = self.out_pts[op1].prev;
            }
            while self.out_pts[self.out_pts[op1b].next].pt.y == self.out_pts[op1b].pt.y
                && self.out_pts[op1b].next != op1
                && self.out_pts[op1b].next != op2
            {
                op1b = self.out_pts[op1b].next;
            }
            if self.out_pts[op1b].next == op1 || self.out_pts[op1b].next == op2 {
                return false;
            }

            let mut op2b = op2;
            while self.out_pts[self.out_pts[op2].prev].pt.y == self.out_pts[op2].pt.y
                && self.out_pts[op2].prev != op2b
                && self.out_pts[op2].prev != op1b
            {
                op2 = self.out_pts[op2].prev;
            }
            while self.out_pts[self.out_pts[op2b].next].pt.y == self.out_pts[op2b].pt.y
                && self.out_pts[op2b].next != op2
                && self.out_pts[op2b].next != op1
            {
                op2b = self.out_pts[op2b].next;
            }
            if self.out_pts[op2b].next == op2 || self.out_pts[op2b].next == op1 {
                return false;
            }

            let (p1, p1b) = (self.out_pts[op1].pt, self.out_pts[op1b].pt);
            let (p2, p2b) = (self.out_pts[op2].pt, self.out_pts[op2b].pt);
            let Some((left, right)) = overlap(p1.x, p1b.x, p2.x, p2b.x) else {
                return false;
            };

            // Keep op1/op2 off the discarded side; they may serve other joins.
            let within = |x: i64| x >= left && x <= right;
            let (pt, discard_left) = if within(p1.x) {
                (p1, p1.x > p1b.x)
            } else if within(p2.x) {
                (p2, p2.x > p2b.x)
            } else if within(p1b.x) {
                (p1b, p1b.x > p1.x)
            } else {
                (p2b, p2b.x > p2.x)
            };
            join.out_pt1 = op1;
            join.out_pt2 = op2;
            return self.join_horz(op1, op1b, op2, op2b, pt, discard_left);
        }

        // Both points sit at the bottom of the shared segment with `off`
        // above them.
        let full_range = self.full_range;
        let mut op1b = self.distinct_neighbour(op1, true);
        let reverse1 = self.out_pts[op1b].pt.y > self.out_pts[op1].pt.y
            || !slopes_equal3(self.out_pts[op1].pt, self.out_pts[op1b].pt, off, full_range);
        if reverse1 {
            op1b = self.distinct_neighbour(op1, false);
            if self.out_pts[op1b].pt.y > self.out_pts[op1].pt.y
                || !slopes_equal3(self.out_pts[op1].pt, self.out_pts[op1b].pt, off, full_range)
            {
                return false;
            }
        }
        let mut op2b = self.distinct_neighbour(op2, true);
        let reverse2 = self.out_pts[op2b].pt.y > self.out_pts[op2].pt.y
            || !slopes_equal3(self.out_pts[op2].pt, self.out_pts[op2b].pt, off, full_range);
        if reverse2 {
            op2b = self.distinct_neighbour(op2, false);
            if self.out_pts[op2b].pt.y > self.out_pts[op2].pt.y
                || !slopes_equal3(self.out_pts[op2].pt, self.out_pts[op2b].pt, off, full_range)
            {
                return false;
            }
        }

        if op1b == op1 || op2b == op2 || op1b == op2b || (rec1 == rec2 && reverse1 == reverse2) {
            return false;
        }
        self.splice_at(join, op1, op2, reverse1);
        true
    }

    /// Points every vertex of the ring at its owning record.
    pub(super) fn update_out_pt_idxs(&mut self, rec: usize) {
        let Some(start) = self.out_recs[rec].pts else {
            return;
        };
        let mut op = start;
        loop {
            self.out_pts[op].idx = rec;
            op = self.out_pts[op].prev;
            if op == start {
                break;
            }
        }
    }

    /// Nearest enclosing ring that still owns points.
    fn parse_first_left(&self, mut first_left: Option<usize>) -> Option<usize> {
        while let Some(fl) = first_left {
            if self.out_recs[fl].pts.is_some() {
                break;
            }
            first_left = self.out_recs[fl].first_left;
        }
        first_left
    }

    pub(super) fn rec_contains(&self, outer: usize, inner: usize) -> bool {
        match (self.out_recs[outer].pts, self.out_recs[inner].pts) {
            (Some(o), Some(i)) => ring_contains(&self.out_pts, o, i),
            _ => false,
        }
    }

    /// Re-parents rings inside `new_rec` after it was split off `old_rec`.
    fn fixup_first_lefts1(&mut self, old_rec: usize, new_rec: usize) {
        for i in 0..self.out_recs.len() {
            let first_left = self.parse_first_left(self.out_recs[i].first_left);
            if self.out_recs[i].pts.is_some()
                && first_left == Some(old_rec)
                && self.rec_contains(new_rec, i)
            {
                self.out_recs[i].first_left = Some(new_rec);
            }
        }
    }

    /// A ring split into an inner and an outer part; rings that shared the
    /// outer part's container may now sit inside either.
    fn fixup_first_lefts2(&mut self, inner: usize, outer: usize) {
        let orfl = self.out_recs[outer].first_left;
        for i in 0..self.out_recs.len() {
            if self.out_recs[i].pts.is_none() || i == outer || i == inner {
                continue;
            }
            let first_left = self.parse_first_left(self.out_recs[i].first_left);
            if first_left != orfl && first_left != Some(inner) && first_left != Some(outer) {
                continue;
            }
            if self.rec_contains(inner, i) {
                self.out_recs[i].first_left = Some(inner);
            } else if self.rec_contains(outer, i) {
                self.out_recs[i].first_left = Some(outer);
            } else if matches!(self.out_recs[i].first_left, Some(fl) if fl == inner || fl == outer) {
                self.out_recs[i].first_left = orfl;
            }
        }
    }

    /// Re-parents every ring of `old_rec` to `new_rec` unconditionally.
    fn fixup_first_lefts3(&mut self, old_rec: usize, new_rec: usize) {
        for i in 0..self.out_recs.len() {
            let first_left = self.parse_first_left(self.out_recs[i].first_left);
            if self.out_recs[i].pts.is_some() && first_left == Some(old_rec) {
                self.out_recs[i].first_left = Some(new_rec);
            }
        }
    }

    fn ring_needs_reversal(&self, rec: usize) -> bool {
        let Some(pts) = self.out_recs[rec].pts else {
            return false;
        };
        (self.out_recs[rec].is_hole ^ self.options.reverse_solution) == (ring_area(&self.out_pts, pts) > 0.0)
    }

    pub(super) fn orient_ring(&mut self, rec: usize) {
        if self.ring_needs_reversal(rec) {
            if let Some(pts) = self.out_recs[rec].pts {
                reverse_ring(&mut self.out_pts, pts);
            }
        }
    }

    /// Takes the hole state from the ring's winding. Rings with no area keep
    /// their current state.
    pub(super) fn settle_hole_state(&mut self, rec: usize) {
        let Some(pts) = self.out_recs[rec].pts else {
            return;
        };
        let reverse = self.options.reverse_solution;
        match ring_area(&self.out_pts, pts).partial_cmp(&0.0) {
            Some(Ordering::Less) => self.out_recs[rec].is_hole = !reverse,
            Some(Ordering::Greater) => self.out_recs[rec].is_hole = reverse,
            _ => {}
        }
    }

    /// Resolves every recorded join, splitting or merging rings.
    pub(super) fn join_common_edges(&mut self) {
        for i in 0..self.joins.len() {
            let mut join = self.joins[i];
            let rec1 = self.out_rec(self.out_pts[join.out_pt1].idx);
            let rec2 = self.out_rec(self.out_pts[join.out_pt2].idx);

            if self.out_recs[rec1].pts.is_none() || self.out_recs[rec2].pts.is_none() {
                continue;
            }
            if self.out_recs[rec1].is_open || self.out_recs[rec2].is_open {
                continue;
            }

            // Hole state must be taken before the rings are touched.
            let hole_state_rec = if rec1 == rec2 {
                rec1
            } else if self.rec1_right_of_rec2(rec1, rec2) {
                rec2
            } else if self.rec1_right_of_rec2(rec2, rec1) {
                rec1
            } else {
                self.lowermost_rec(rec1, rec2)
            };

            if !self.join_points(&mut join, rec1, rec2) {
                continue;
            }

            if rec1 == rec2 {
                // One ring became two.
                self.out_recs[rec1].pts = Some(join.out_pt1);
                self.out_recs[rec1].bottom_pt = None;
                let rec2 = self.create_out_rec();
                self.out_recs[rec2].pts = Some(join.out_pt2);
                self.update_out_pt_idxs(rec2);

                // Both halves keep the winding of the oriented ring.
                self.out_recs[rec2].is_hole = self.out_recs[rec1].is_hole;
                self.settle_hole_state(rec1);
                self.settle_hole_state(rec2);
                let hole1 = self.out_recs[rec1].is_hole;
                let hole2 = self.out_recs[rec2].is_hole;

                if hole2 && !hole1 && self.rec_contains(rec1, rec2) {
                    self.out_recs[rec2].first_left = Some(rec1);
                    if self.using_tree {
                        self.fixup_first_lefts2(rec2, rec1);
                    }
                } else if hole1 && !hole2 && self.rec_contains(rec2, rec1) {
                    self.out_recs[rec2].first_left = self.out_recs[rec1].first_left;
                    self.out_recs[rec1].first_left = Some(rec2);
                    if self.using_tree {
                        self.fixup_first_lefts2(rec1, rec2);
                    }
                } else {
                    self.out_recs[rec2].first_left = self.out_recs[rec1].first_left;
                    if self.using_tree {
                        self.fixup_first_lefts1(rec1, rec2);
                    }
                }
            } else {
                // Two rings became one.
                self.out_recs[rec2].pts = None;
                self.out_recs[rec2].bottom_pt = None;
                self.out_recs[rec2].idx = self.out_recs[rec1].idx;

                self.out_recs[rec1].is_hole = self.out_recs[hole_state_rec].is_hole;
                if hole_state_rec == rec2 {
                    self.out_recs[rec1].first_left = self.out_recs[rec2].first_left;
                }
                self.out_recs[rec2].first_left = Some(rec1);
                if self.using_tree {
                    self.fixup_first_lefts3(rec2, rec1);
                }
            }
        }
    }
}
