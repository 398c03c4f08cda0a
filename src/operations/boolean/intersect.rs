use tracing::warn;

use crate::error::SweepError;
use crate::geometry::Point;
use crate::math::IntPoint;

use super::edge::{intersect_point, EdgeId, OutSlot};
use super::engine::Crossing;
use super::select::{BoolOp, FillRule, PathRole};
use super::sweep::{EdgeList, SweepSession};

/// A pending crossing of two edges within the current scanbeam.
#[derive(Debug, Clone, Copy)]
pub(crate) struct IntersectNode {
    pub e1: EdgeId,
    pub e2: EdgeId,
    pub pt: IntPoint,
}

impl SweepSession {
    /// Finds and applies every crossing between the current scanline and `top_y`.
    pub(super) fn process_intersections(&mut self, top_y: i64) -> Result<(), SweepError> {
        if self.active_edges.is_none() {
            return Ok(());
        }
        self.build_intersect_list(top_y);
        let ordered = match self.intersections.len() {
            0 | 1 => true,
            _ => self.fixup_intersection_order(),
        };
        self.sorted_edges = None;
        if !ordered {
            self.intersections.clear();
            warn!(top_y, "intersections could not be ordered");
            return Err(SweepError::InconsistentIntersectionOrder { y: top_y });
        }
        self.process_intersect_list();
        Ok(())
    }

    /// Bubble-sorts a copy of the active list by x at `top_y`; every swap is
    /// a crossing.
    fn build_intersect_list(&mut self, top_y: i64) {
        self.sorted_edges = self.active_edges;
        let mut e = self.active_edges;
        while let Some(id) = e {
            let edge = &mut self.edges[id];
            edge.prev_in_sel = edge.prev_in_ael;
            edge.next_in_sel = edge.next_in_ael;
            edge.curr.x = edge.top_x(top_y);
            e = edge.next_in_ael;
        }

        loop {
            let mut modified = false;
            let Some(mut e) = self.sorted_edges else {
                break;
            };
            while let Some(next) = self.edges[e].next_in_sel {
                if self.edges[e].curr.x > self.edges[next].curr.x {
                    let mut pt = intersect_point(&self.edges[e], &self.edges[next]);
                    if pt.y < top_y {
                        pt = IntPoint::new(self.edges[e].top_x(top_y), top_y);
                    }
                    self.intersections.push(IntersectNode { e1: e, e2: next, pt });
                    self.swap_positions_in_list(EdgeList::Sorted, e, next);
                    modified = true;
                } else {
                    e = next;
                }
            }
            // The last edge is in place; shrink the pass.
            match self.edges[e].prev_in_sel {
                Some(prev) => self.edges[prev].next_in_sel = None,
                None => break,
            }
            if !modified {
                break;
            }
        }
        self.sorted_edges = None;
    }

    /// Orders crossings bottom-most first so each one is between edges that
    /// are adjacent at the time it is applied.
    fn fixup_intersection_order(&mut self) -> bool {
        self.copy_ael_to_sel();
        self.intersections.sort_by(|a, b| b.pt.y.cmp(&a.pt.y));
        let count = self.intersections.len();
        for i in 0..count {
            if !self.adjacent_in_sel(self.intersections[i]) {
                let Some(j) = (i + 1..count).find(|&j| self.adjacent_in_sel(self.intersections[j]))
                else {
                    return false;
                };
                self.intersections.swap(i, j);
            }
            let node = self.intersections[i];
            self.swap_positions_in_list(EdgeList::Sorted, node.e1, node.e2);
        }
        true
    }

    fn adjacent_in_sel(&self, node: IntersectNode) -> bool {
        let e1 = &self.edges[node.e1];
        e1.next_in_sel == Some(node.e2) || e1.prev_in_sel == Some(node.e2)
    }

    fn process_intersect_list(&mut self) {
        let nodes = std::mem::take(&mut self.intersections);
        for node in nodes {
            self.intersect_edges(node.e1, node.e2, node.pt);
            self.swap_positions_in_list(EdgeList::Active, node.e1, node.e2);
        }
    }

    /// Gives an untagged crossing point a tag: the tag of a coinciding edge
    /// end, else the caller's tag-fill callback.
    pub(super) fn assign_tag(&self, e1: EdgeId, e2: EdgeId, pt: &mut IntPoint) {
        if pt.tag != 0 {
            return;
        }
        let (a, b) = (&self.edges[e1], &self.edges[e2]);
        if let Some(end) = [a.bot, a.top, b.bot, b.top].into_iter().find(|end| end == pt) {
            pt.tag = end.tag;
            return;
        }
        if let Some(fill) = &self.options.tag_fill {
            let to_point =
                |p: IntPoint| Point::tagged(self.scale.from_grid(p.x), self.scale.from_grid(p.y), p.tag);
            pt.tag = fill(&Crossing {
                e1_bot: to_point(a.bot),
                e1_top: to_point(a.top),
                e2_bot: to_point(b.bot),
                e2_top: to_point(b.top),
                at: to_point(*pt),
            });
        }
    }

    fn swap_sides_and_rings(&mut self, e1: EdgeId, e2: EdgeId) {
        let (s1, s2) = (self.edges[e1].side, self.edges[e2].side);
        self.edges[e1].side = s2;
        self.edges[e2].side = s1;
        let (o1, o2) = (self.edges[e1].out, self.edges[e2].out);
        self.edges[e1].out = o2;
        self.edges[e2].out = o1;
    }

    /// Applies the crossing of `e1` and `e2` at `pt`: updates windings and
    /// opens, extends or closes output rings.
    ///
    /// `e1` must be the edge on the right above the crossing.
    pub(super) fn intersect_edges(&mut self, e1: EdgeId, e2: EdgeId, mut pt: IntPoint) {
        let e1_contributing = self.edges[e1].out.is_assigned();
        let e2_contributing = self.edges[e2].out.is_assigned();
        self.assign_tag(e1, e2, &mut pt);

        let (d1, d2) = (self.edges[e1].wind_delta, self.edges[e2].wind_delta);
        let (role1, role2) = (self.edges[e1].role, self.edges[e2].role);

        if d1 == 0 || d2 == 0 {
            self.intersect_open_edge(e1, e2, pt, e1_contributing, e2_contributing);
            return;
        }

        let (fill1, fill1_other) = self.fills.for_role(role1);
        let (fill2, fill2_other) = self.fills.for_role(role2);

        if role1 == role2 {
            if fill1 == FillRule::EvenOdd {
                let w = self.edges[e1].wind_cnt;
                self.edges[e1].wind_cnt = self.edges[e2].wind_cnt;
                self.edges[e2].wind_cnt = w;
            } else {
                let edge1 = &mut self.edges[e1];
                edge1.wind_cnt = if edge1.wind_cnt + d2 == 0 {
                    -edge1.wind_cnt
                } else {
                    edge1.wind_cnt + d2
                };
                let edge2 = &mut self.edges[e2];
                edge2.wind_cnt = if edge2.wind_cnt - d1 == 0 {
                    -edge2.wind_cnt
                } else {
                    edge2.wind_cnt - d1
                };
            }
        } else {
            let edge1 = &mut self.edges[e1];
            edge1.wind_cnt2 = if fill2 == FillRule::EvenOdd {
                i32::from(edge1.wind_cnt2 == 0)
            } else {
                edge1.wind_cnt2 + d2
            };
            let edge2 = &mut self.edges[e2];
            edge2.wind_cnt2 = if fill1 == FillRule::EvenOdd {
                i32::from(edge2.wind_cnt2 == 0)
            } else {
                edge2.wind_cnt2 - d1
            };
        }

        let e1_wc = fill1.normalized(self.edges[e1].wind_cnt);
        let e2_wc = fill2.normalized(self.edges[e2].wind_cnt);
        let unit = |w: i32| w == 0 || w == 1;

        if e1_contributing && e2_contributing {
            if !unit(e1_wc) || !unit(e2_wc) || (role1 != role2 && self.op != BoolOp::Xor) {
                self.add_local_max_poly(e1, e2, pt);
            } else {
                self.add_out_pt(e1, pt);
                self.add_out_pt(e2, pt);
                self.swap_sides_and_rings(e1, e2);
            }
        } else if e1_contributing {
            if unit(e2_wc) {
                self.add_out_pt(e1, pt);
                self.swap_sides_and_rings(e1, e2);
            }
        } else if e2_contributing {
            if unit(e1_wc) {
                self.add_out_pt(e2, pt);
                self.swap_sides_and_rings(e1, e2);
            }
        } else if unit(e1_wc) && unit(e2_wc) {
            // Neither edge bounds output yet.
            let e1_wc2 = fill1_other.normalized(self.edges[e1].wind_cnt2);
            let e2_wc2 = fill2_other.normalized(self.edges[e2].wind_cnt2);
            if role1 != role2 {
                self.add_local_min_poly(e1, e2, pt);
            } else if e1_wc == 1 && e2_wc == 1 {
                let opens = match self.op {
                    BoolOp::Intersection => e1_wc2 > 0 && e2_wc2 > 0,
                    BoolOp::Union => e1_wc2 <= 0 && e2_wc2 <= 0,
                    BoolOp::Difference => match role1 {
                        PathRole::Clip => e1_wc2 > 0 && e2_wc2 > 0,
                        PathRole::Subject => e1_wc2 <= 0 && e2_wc2 <= 0,
                    },
                    BoolOp::Xor => true,
                };
                if opens {
                    self.add_local_min_poly(e1, e2, pt);
                }
            } else {
                let (s1, s2) = (self.edges[e1].side, self.edges[e2].side);
                self.edges[e1].side = s2;
                self.edges[e2].side = s1;
            }
        }
    }

    /// Crossings involving an open path toggle the open path's output on
    /// and off.
    fn intersect_open_edge(
        &mut self,
        e1: EdgeId,
        e2: EdgeId,
        pt: IntPoint,
        e1_contributing: bool,
        e2_contributing: bool,
    ) {
        let (a, b) = (self.edges[e1].clone(), self.edges[e2].clone());
        if a.wind_delta == 0 && b.wind_delta == 0 {
            return;
        }
        let union = self.op == BoolOp::Union;

        if a.role == b.role && a.wind_delta != b.wind_delta && union {
            // A subject line against a subject polygon.
            if a.wind_delta == 0 {
                if e2_contributing {
                    self.add_out_pt(e1, pt);
                    if e1_contributing {
                        self.edges[e1].out = OutSlot::Unassigned;
                    }
                }
            } else if e1_contributing {
                self.add_out_pt(e2, pt);
                if e2_contributing {
                    self.edges[e2].out = OutSlot::Unassigned;
                }
            }
        } else if a.role != b.role {
            if a.wind_delta == 0 && b.wind_cnt.abs() == 1 && (!union || b.wind_cnt2 == 0) {
                self.add_out_pt(e1, pt);
                if e1_contributing {
                    self.edges[e1].out = OutSlot::Unassigned;
                }
            } else if b.wind_delta == 0 && a.wind_cnt.abs() == 1 && (!union || a.wind_cnt2 == 0) {
                self.add_out_pt(e2, pt);
                if e2_contributing {
                    self.edges[e2].out = OutSlot::Unassigned;
                }
            }
        }
    }
}
