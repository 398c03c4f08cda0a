use crate::geometry::{ContourId, ContourTree, Path, Point};
use crate::math::int_point::{pt2_is_between, slopes_equal3};
use crate::math::IntPoint;

use super::output::{ring_area, ring_len, OutPtId};
use super::sweep::SweepSession;

impl SweepSession {
    /// Post-sweep clean-up: orientation, joins, vertex stripping and, in
    /// strictly-simple mode, splitting of self-touching rings.
    pub(super) fn finish_rings(&mut self) {
        for i in 0..self.out_recs.len() {
            if self.out_recs[i].pts.is_some() && !self.out_recs[i].is_open {
                self.orient_ring(i);
            }
        }

        if !self.joins.is_empty() {
            self.join_common_edges();
        }

        // Joins must be resolved before stripping.
        let strict = self.options.strictly_simple;
        let preserve = self.options.preserve_collinear || strict;
        for i in 0..self.out_recs.len() {
            if self.out_recs[i].pts.is_none() {
                continue;
            }
            if self.out_recs[i].is_open {
                self.fixup_out_polyline(i);
            } else {
                self.fixup_out_polygon(i, preserve);
            }
        }

        if strict {
            self.do_simple_polygons();
            if !self.options.preserve_collinear {
                for i in 0..self.out_recs.len() {
                    if self.out_recs[i].pts.is_some() && !self.out_recs[i].is_open {
                        self.fixup_out_polygon(i, false);
                    }
                }
            }
        }
    }

    fn unlink_out_pt(&mut self, op: OutPtId) -> OutPtId {
        let (prev, next) = (self.out_pts[op].prev, self.out_pts[op].next);
        self.out_pts[prev].next = next;
        self.out_pts[next].prev = prev;
        self.out_pts.remove(op);
        prev
    }

    fn dispose_ring(&mut self, rec: usize) {
        let Some(start) = self.out_recs[rec].pts.take() else {
            return;
        };
        let mut op = self.out_pts[start].next;
        while op != start {
            let next = self.out_pts[op].next;
            self.out_pts.remove(op);
            op = next;
        }
        self.out_pts.remove(start);
    }

    /// Removes duplicate points and (unless `preserve_collinear`) the middle
    /// vertex of collinear runs. Spikes are always removed.
    fn fixup_out_polygon(&mut self, rec: usize, preserve_collinear: bool) {
        self.out_recs[rec].bottom_pt = None;
        let Some(mut pp) = self.out_recs[rec].pts else {
            return;
        };
        let mut last_ok: Option<OutPtId> = None;
        loop {
            let (prev, next) = (self.out_pts[pp].prev, self.out_pts[pp].next);
            if prev == pp || prev == next {
                self.out_recs[rec].pts = Some(pp);
                self.dispose_ring(rec);
                return;
            }
            let (p, c, n) = (self.out_pts[prev].pt, self.out_pts[pp].pt, self.out_pts[next].pt);
            if c == n
                || c == p
                || (slopes_equal3(p, c, n, self.full_range)
                    && (!preserve_collinear || !pt2_is_between(p, c, n)))
            {
                last_ok = None;
                pp = self.unlink_out_pt(pp);
            } else if Some(pp) == last_ok {
                break;
            } else {
                if last_ok.is_none() {
                    last_ok = Some(pp);
                }
                pp = next;
            }
        }
        self.out_recs[rec].pts = Some(pp);
    }

    /// Removes consecutive duplicates from an open path.
    fn fixup_out_polyline(&mut self, rec: usize) {
        let Some(start) = self.out_recs[rec].pts else {
            return;
        };
        let mut pp = start;
        let mut last = self.out_pts[start].prev;
        while pp != last {
            pp = self.out_pts[pp].next;
            let prev = self.out_pts[pp].prev;
            if self.out_pts[pp].pt == self.out_pts[prev].pt {
                if pp == last {
                    last = prev;
                }
                pp = self.unlink_out_pt(pp);
            }
        }
        if self.out_pts[pp].prev == pp {
            self.out_recs[rec].pts = Some(pp);
            self.dispose_ring(rec);
        }
    }

    /// Splits every ring that touches itself at a non-adjacent vertex into
    /// two rings. New rings are appended to the work list.
    fn do_simple_polygons(&mut self) {
        let mut i = 0;
        while i < self.out_recs.len() {
            let rec = i;
            i += 1;
            let Some(start) = self.out_recs[rec].pts else {
                continue;
            };
            if self.out_recs[rec].is_open {
                continue;
            }
            let mut op = start;
            loop {
                let mut op2 = self.out_pts[op].next;
                while Some(op2) != self.out_recs[rec].pts {
                    if self.out_pts[op].pt == self.out_pts[op2].pt
                        && self.out_pts[op2].next != op
                        && self.out_pts[op2].prev != op
                    {
                        let op3 = self.out_pts[op].prev;
                        let op4 = self.out_pts[op2].prev;
                        self.out_pts[op].prev = op4;
                        self.out_pts[op4].next = op;
                        self.out_pts[op2].prev = op3;
                        self.out_pts[op3].next = op2;

                        self.out_recs[rec].pts = Some(op);
                        let rec2 = self.create_out_rec();
                        self.out_recs[rec2].pts = Some(op2);
                        self.update_out_pt_idxs(rec2);
                        self.classify_split(rec, rec2);
                        op2 = op;
                    }
                    op2 = self.out_pts[op2].next;
                }
                op = self.out_pts[op].next;
                if Some(op) == self.out_recs[rec].pts {
                    break;
                }
            }
        }

        if self.using_tree {
            self.relink_nesting();
        }
    }

    /// Sets the hole state of both halves of a split ring.
    ///
    /// Rings are oriented before splitting, so each half keeps the winding
    /// of the region it bounds and its sign is its hole state. A half may
    /// still touch itself and is split again later in the pass.
    fn classify_split(&mut self, rec: usize, rec2: usize) {
        self.out_recs[rec2].is_hole = self.out_recs[rec].is_hole;
        self.out_recs[rec2].first_left = self.out_recs[rec].first_left;
        self.settle_hole_state(rec);
        self.settle_hole_state(rec2);
    }

    /// Points every closed ring at the smallest ring of opposite hole state
    /// that contains it.
    fn relink_nesting(&mut self) {
        let live: Vec<(usize, f64)> = (0..self.out_recs.len())
            .filter(|&r| !self.out_recs[r].is_open)
            .filter_map(|r| {
                let pts = self.out_recs[r].pts?;
                Some((r, ring_area(&self.out_pts, pts).abs()))
            })
            .collect();
        for &(rec, _) in &live {
            let is_hole = self.out_recs[rec].is_hole;
            let parent = live
                .iter()
                .filter(|&&(other, _)| other != rec && self.out_recs[other].is_hole != is_hole)
                .filter(|&&(other, _)| self.rec_contains(other, rec))
                .min_by(|a, b| a.1.total_cmp(&b.1))
                .map(|&(other, _)| other);
            self.out_recs[rec].first_left = parent;
        }
    }

    fn to_point(&self, p: IntPoint) -> Point {
        Point::tagged(self.scale.from_grid(p.x), self.scale.from_grid(p.y), p.tag)
    }

    /// Emitted vertices of a ring: from its right-most point walking `prev`.
    fn ring_path(&self, rec: usize) -> Option<Path> {
        let start = self.out_recs[rec].pts?;
        let count = ring_len(&self.out_pts, start);
        let min = if self.out_recs[rec].is_open { 2 } else { 3 };
        if count < min {
            return None;
        }
        let mut points = Vec::with_capacity(count);
        let mut op = self.out_pts[start].prev;
        for _ in 0..count {
            points.push(self.to_point(self.out_pts[op].pt));
            op = self.out_pts[op].prev;
        }
        Some(if self.out_recs[rec].is_open {
            Path::open(points)
        } else {
            Path::closed(points)
        })
    }

    /// Flat result: every surviving ring in creation order.
    pub(crate) fn build_result(&self) -> Vec<Path> {
        (0..self.out_recs.len())
            .filter_map(|rec| self.ring_path(rec))
            .collect()
    }

    /// Relinks `first_left` to the nearest live ring of opposite hole state.
    fn fix_hole_linkage(&mut self, rec: usize) {
        let Some(fl) = self.out_recs[rec].first_left else {
            return;
        };
        let is_hole = self.out_recs[rec].is_hole;
        if is_hole != self.out_recs[fl].is_hole && self.out_recs[fl].pts.is_some() {
            return;
        }
        let mut orfl = Some(fl);
        while let Some(r) = orfl {
            if self.out_recs[r].is_hole != is_hole && self.out_recs[r].pts.is_some() {
                break;
            }
            orfl = self.out_recs[r].first_left;
        }
        self.out_recs[rec].first_left = orfl;
    }

    /// Hierarchical result. Nodes are created for all rings first, then
    /// linked in ring order so children may precede their parents.
    pub(crate) fn build_result_tree(&mut self) -> ContourTree {
        let mut tree = ContourTree::new();
        for rec in 0..self.out_recs.len() {
            let Some(path) = self.ring_path(rec) else {
                continue;
            };
            self.fix_hole_linkage(rec);
            let id: ContourId = tree.insert_detached(path);
            self.out_recs[rec].node = Some(id);
        }
        for rec in 0..self.out_recs.len() {
            let Some(id) = self.out_recs[rec].node else {
                continue;
            };
            let parent = if self.out_recs[rec].is_open {
                None
            } else {
                self.out_recs[rec]
                    .first_left
                    .and_then(|fl| self.out_recs[fl].node)
            };
            tree.attach(id, parent);
        }
        tree
    }
}
