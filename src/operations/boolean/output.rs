use slotmap::SlotMap;

use crate::geometry::ContourId;
use crate::math::int_point::slopes_equal4;
use crate::math::polygon_2d::polygon_contains;
use crate::math::IntPoint;

use super::edge::{segment_dx, EdgeId, OutSlot, Side};
use super::sweep::SweepSession;

slotmap::new_key_type! {
    /// Unique identifier for a vertex of an output ring.
    pub struct OutPtId;
}

/// A vertex of an output ring (circular doubly linked list).
#[derive(Debug, Clone)]
pub(crate) struct OutPt {
    pub pt: IntPoint,
    /// Ring index this point was created for; resolve with
    /// [`SweepSession::out_rec`].
    pub idx: usize,
    pub next: OutPtId,
    pub prev: OutPtId,
}

/// An output ring under construction.
///
/// `pts` is the left-most point, `pts.prev` the right-most. A ring merged
/// into another keeps `pts == None` and aliases the survivor through `idx`.
#[derive(Debug, Clone)]
pub(crate) struct OutRec {
    pub idx: usize,
    pub is_hole: bool,
    pub is_open: bool,
    /// Nearest ring enclosing this one.
    pub first_left: Option<usize>,
    pub pts: Option<OutPtId>,
    pub bottom_pt: Option<OutPtId>,
    pub node: Option<ContourId>,
}

pub(crate) type OutPts = SlotMap<OutPtId, OutPt>;

/// Signed area of the ring through `op`; matches the area of the emitted path.
#[allow(clippy::cast_precision_loss)]
pub(crate) fn ring_area(pts: &OutPts, op: OutPtId) -> f64 {
    let mut a = 0.0;
    let mut p = op;
    loop {
        let prev = pts[pts[p].prev].pt;
        let cur = pts[p].pt;
        a += (prev.x as f64 + cur.x as f64) * (prev.y as f64 - cur.y as f64);
        p = pts[p].next;
        if p == op {
            break;
        }
    }
    a * 0.5
}

/// Reverses the direction of the ring through `op`.
pub(crate) fn reverse_ring(pts: &mut OutPts, op: OutPtId) {
    let mut p = op;
    loop {
        let next = pts[p].next;
        let node = &mut pts[p];
        node.next = node.prev;
        node.prev = next;
        p = next;
        if p == op {
            break;
        }
    }
}

pub(crate) fn ring_len(pts: &OutPts, op: OutPtId) -> usize {
    let mut n = 0;
    let mut p = op;
    loop {
        n += 1;
        p = pts[p].next;
        if p == op {
            break;
        }
    }
    n
}

/// Ring vertices following `next` links.
pub(crate) fn ring_points(pts: &OutPts, op: OutPtId) -> Vec<IntPoint> {
    let mut out = Vec::new();
    let mut p = op;
    loop {
        out.push(pts[p].pt);
        p = pts[p].next;
        if p == op {
            break;
        }
    }
    out
}

/// `true` when ring `inner` lies inside ring `outer`.
pub(crate) fn ring_contains(pts: &OutPts, outer: OutPtId, inner: OutPtId) -> bool {
    polygon_contains(&ring_points(pts, outer), &ring_points(pts, inner))
}

/// Lowest (largest y, then smallest x) vertex of a ring; among coincident
/// candidates the one with the steepest neighbours wins.
pub(crate) fn bottom_pt(pts: &OutPts, start: OutPtId) -> OutPtId {
    let mut pp = start;
    let mut dups: Option<OutPtId> = None;
    let mut p = pts[pp].next;
    while p != pp {
        let (cand, best) = (pts[p].pt, pts[pp].pt);
        if cand.y > best.y {
            pp = p;
            dups = None;
        } else if cand.y == best.y && cand.x <= best.x {
            if cand.x < best.x {
                dups = None;
                pp = p;
            } else if pts[p].next != pp && pts[p].prev != pp {
                dups = Some(p);
            }
        }
        p = pts[p].next;
    }
    if let Some(mut d) = dups {
        while d != p {
            if !first_is_bottom_pt(pts, p, d) {
                pp = d;
            }
            d = pts[d].next;
            while pts[d].pt != pts[pp].pt {
                d = pts[d].next;
            }
        }
    }
    pp
}

fn neighbour_dx(pts: &OutPts, bp: OutPtId, forward: bool) -> f64 {
    let step = |p: OutPtId| if forward { pts[p].next } else { pts[p].prev };
    let mut p = step(bp);
    while pts[p].pt == pts[bp].pt && p != bp {
        p = step(p);
    }
    segment_dx(pts[bp].pt, pts[p].pt).abs()
}

/// Tie-break between two coincident bottom points.
#[allow(clippy::float_cmp)]
pub(crate) fn first_is_bottom_pt(pts: &OutPts, btm1: OutPtId, btm2: OutPtId) -> bool {
    let dx1p = neighbour_dx(pts, btm1, false);
    let dx1n = neighbour_dx(pts, btm1, true);
    let dx2p = neighbour_dx(pts, btm2, false);
    let dx2n = neighbour_dx(pts, btm2, true);
    if dx1p.max(dx1n) == dx2p.max(dx2n) && dx1p.min(dx1n) == dx2p.min(dx2n) {
        ring_area(pts, btm1) > 0.0
    } else {
        (dx1p >= dx2p && dx1p >= dx2n) || (dx1n >= dx2p && dx1n >= dx2n)
    }
}

fn link(pts: &mut OutPts, a: OutPtId, b: OutPtId) {
    pts[a].next = b;
    pts[b].prev = a;
}

impl SweepSession {
    pub(super) fn create_out_rec(&mut self) -> usize {
        let idx = self.out_recs.len();
        self.out_recs.push(OutRec {
            idx,
            is_hole: false,
            is_open: false,
            first_left: None,
            pts: None,
            bottom_pt: None,
            node: None,
        });
        idx
    }

    fn new_ring(&mut self, pt: IntPoint, idx: usize) -> OutPtId {
        let op = self.out_pts.insert_with_key(|k| OutPt {
            pt,
            idx,
            next: k,
            prev: k,
        });
        self.out_recs[idx].pts = Some(op);
        op
    }

    /// Resolves merged rings to the ring that absorbed them.
    pub(super) fn out_rec(&self, mut idx: usize) -> usize {
        while self.out_recs[idx].idx != idx {
            idx = self.out_recs[idx].idx;
        }
        idx
    }

    /// Appends `pt` to the ring of `e` at the end given by its side, opening a
    /// new ring when the edge has none.
    pub(super) fn add_out_pt(&mut self, e: EdgeId, pt: IntPoint) -> OutPtId {
        let Some(idx) = self.edges[e].out.index() else {
            let idx = self.create_out_rec();
            let is_open = self.edges[e].wind_delta == 0;
            self.out_recs[idx].is_open = is_open;
            let op = self.new_ring(pt, idx);
            if !is_open {
                self.set_hole_state(e, idx);
            }
            self.edges[e].out = OutSlot::Assigned(idx);
            return op;
        };
        let Some(first) = self.out_recs[idx].pts else {
            return self.new_ring(pt, idx);
        };

        let to_front = self.edges[e].side == Side::Left;
        let last = self.out_pts[first].prev;
        if to_front && pt == self.out_pts[first].pt {
            return first;
        }
        if !to_front && pt == self.out_pts[last].pt {
            return last;
        }
        let op = self.out_pts.insert(OutPt {
            pt,
            idx,
            next: first,
            prev: last,
        });
        self.out_pts[last].next = op;
        self.out_pts[first].prev = op;
        if to_front {
            self.out_recs[idx].pts = Some(op);
        }
        op
    }

    /// Most recently added point on the side `e` writes to.
    pub(super) fn last_out_pt(&self, e: EdgeId) -> Option<OutPtId> {
        let idx = self.edges[e].out.index()?;
        let first = self.out_recs[idx].pts?;
        Some(if self.edges[e].side == Side::Left {
            first
        } else {
            self.out_pts[first].prev
        })
    }

    /// A new ring is a hole when an odd number of output boundaries lie to
    /// its left.
    fn set_hole_state(&mut self, e: EdgeId, rec: usize) {
        let mut e2 = self.edges[e].prev_in_ael;
        let mut e_tmp: Option<EdgeId> = None;
        while let Some(id) = e2 {
            let edge = &self.edges[id];
            if edge.out.is_assigned() && edge.wind_delta != 0 {
                match e_tmp {
                    None => e_tmp = Some(id),
                    Some(t) if self.edges[t].out == edge.out => e_tmp = None,
                    Some(_) => {}
                }
            }
            e2 = edge.prev_in_ael;
        }
        match e_tmp.and_then(|t| self.edges[t].out.index()) {
            None => {
                self.out_recs[rec].first_left = None;
                self.out_recs[rec].is_hole = false;
            }
            Some(fl) => {
                self.out_recs[rec].first_left = Some(fl);
                self.out_recs[rec].is_hole = !self.out_recs[fl].is_hole;
            }
        }
    }

    /// Opens a ring at a local minimum shared by `e1` and `e2`.
    pub(super) fn add_local_min_poly(&mut self, e1: EdgeId, e2: EdgeId, pt: IntPoint) -> OutPtId {
        let (result, e, prev_e) =
            if self.edges[e2].is_horizontal() || self.edges[e1].dx > self.edges[e2].dx {
                let result = self.add_out_pt(e1, pt);
                self.edges[e2].out = self.edges[e1].out;
                self.edges[e1].side = Side::Left;
                self.edges[e2].side = Side::Right;
                let prev_e = if self.edges[e1].prev_in_ael == Some(e2) {
                    self.edges[e2].prev_in_ael
                } else {
                    self.edges[e1].prev_in_ael
                };
                (result, e1, prev_e)
            } else {
                let result = self.add_out_pt(e2, pt);
                self.edges[e1].out = self.edges[e2].out;
                self.edges[e1].side = Side::Right;
                self.edges[e2].side = Side::Left;
                let prev_e = if self.edges[e2].prev_in_ael == Some(e1) {
                    self.edges[e1].prev_in_ael
                } else {
                    self.edges[e2].prev_in_ael
                };
                (result, e2, prev_e)
            };

        if let Some(prev_e) = prev_e {
            let (pe, ee) = (&self.edges[prev_e], &self.edges[e]);
            if pe.out.is_assigned() && pe.top.y < pt.y && ee.top.y < pt.y {
                let x_prev = pe.top_x(pt.y);
                let x_e = ee.top_x(pt.y);
                if x_prev == x_e
                    && ee.wind_delta != 0
                    && pe.wind_delta != 0
                    && slopes_equal4(
                        IntPoint::new(x_prev, pt.y),
                        pe.top,
                        IntPoint::new(x_e, pt.y),
                        ee.top,
                        self.full_range,
                    )
                {
                    let off = ee.top;
                    let op = self.add_out_pt(prev_e, pt);
                    self.add_join(result, op, off);
                }
            }
        }
        result
    }

    /// Closes or merges rings at a local maximum of `e1` and `e2`.
    pub(super) fn add_local_max_poly(&mut self, e1: EdgeId, e2: EdgeId, pt: IntPoint) {
        self.add_out_pt(e1, pt);
        if self.edges[e2].wind_delta == 0 {
            self.add_out_pt(e2, pt);
        }
        let (o1, o2) = (self.edges[e1].out, self.edges[e2].out);
        if o1 == o2 {
            self.edges[e1].out = OutSlot::Unassigned;
            self.edges[e2].out = OutSlot::Unassigned;
        } else if let (Some(a), Some(b)) = (o1.index(), o2.index()) {
            if a < b {
                self.append_polygon(e1, e2);
            } else {
                self.append_polygon(e2, e1);
            }
        }
    }

    /// `true` when `r2` is reached by following `r1`'s enclosing rings.
    pub(super) fn rec1_right_of_rec2(&self, mut r1: usize, r2: usize) -> bool {
        while let Some(fl) = self.out_recs[r1].first_left {
            if fl == r2 {
                return true;
            }
            r1 = fl;
        }
        false
    }

    fn cached_bottom(&mut self, rec: usize) -> Option<OutPtId> {
        if self.out_recs[rec].bottom_pt.is_none() {
            let pts = self.out_recs[rec].pts?;
            self.out_recs[rec].bottom_pt = Some(bottom_pt(&self.out_pts, pts));
        }
        self.out_recs[rec].bottom_pt
    }

    /// Of two rings, the one whose hole state is authoritative (lowest
    /// bottom point).
    pub(super) fn lowermost_rec(&mut self, r1: usize, r2: usize) -> usize {
        let (Some(b1), Some(b2)) = (self.cached_bottom(r1), self.cached_bottom(r2)) else {
            return r1;
        };
        let (p1, p2) = (self.out_pts[b1].pt, self.out_pts[b2].pt);
        if p1.y > p2.y {
            r1
        } else if p1.y < p2.y {
            r2
        } else if p1.x < p2.x {
            r1
        } else if p1.x > p2.x {
            r2
        } else if self.out_pts[b1].next == b1 {
            r2
        } else if self.out_pts[b2].next == b2 || first_is_bottom_pt(&self.out_pts, b1, b2) {
            r1
        } else {
            r2
        }
    }

    /// Splices the ring of `e2` onto the ring of `e1`.
    fn append_polygon(&mut self, e1: EdgeId, e2: EdgeId) {
        let (Some(r1), Some(r2)) = (self.edges[e1].out.index(), self.edges[e2].out.index()) else {
            return;
        };
        let hole_state_rec = if self.rec1_right_of_rec2(r1, r2) {
            r2
        } else if self.rec1_right_of_rec2(r2, r1) {
            r1
        } else {
            self.lowermost_rec(r1, r2)
        };
        let (Some(p1_lft), Some(p2_lft)) = (self.out_recs[r1].pts, self.out_recs[r2].pts) else {
            return;
        };
        let p1_rt = self.out_pts[p1_lft].prev;
        let p2_rt = self.out_pts[p2_lft].prev;

        let side1 = self.edges[e1].side;
        match (side1, self.edges[e2].side) {
            (Side::Left, Side::Left) => {
                // z y x a b c
                reverse_ring(&mut self.out_pts, p2_lft);
                link(&mut self.out_pts, p2_lft, p1_lft);
                link(&mut self.out_pts, p1_rt, p2_rt);
                self.out_recs[r1].pts = Some(p2_rt);
            }
            (Side::Left, Side::Right) => {
                // x y z a b c
                link(&mut self.out_pts, p2_rt, p1_lft);
                link(&mut self.out_pts, p1_rt, p2_lft);
                self.out_recs[r1].pts = Some(p2_lft);
            }
            (Side::Right, Side::Right) => {
                // a b c z y x
                reverse_ring(&mut self.out_pts, p2_lft);
                link(&mut self.out_pts, p1_rt, p2_rt);
                link(&mut self.out_pts, p2_lft, p1_lft);
            }
            (Side::Right, Side::Left) => {
                // a b c x y z
                link(&mut self.out_pts, p1_rt, p2_lft);
                link(&mut self.out_pts, p2_rt, p1_lft);
            }
        }

        self.out_recs[r1].bottom_pt = None;
        if hole_state_rec == r2 {
            if self.out_recs[r2].first_left != Some(r1) {
                self.out_recs[r1].first_left = self.out_recs[r2].first_left;
            }
            self.out_recs[r1].is_hole = self.out_recs[r2].is_hole;
        }
        let rec2 = &mut self.out_recs[r2];
        rec2.pts = None;
        rec2.bottom_pt = None;
        rec2.first_left = Some(r1);

        self.edges[e1].out = OutSlot::Unassigned;
        self.edges[e2].out = OutSlot::Unassigned;

        let mut e = self.active_edges;
        while let Some(id) = e {
            if self.edges[id].out == OutSlot::Assigned(r2) {
                self.edges[id].out = OutSlot::Assigned(r1);
                self.edges[id].side = side1;
                break;
            }
            e = self.edges[id].next_in_ael;
        }
        self.out_recs[r2].idx = self.out_recs[r1].idx;
    }
}
