use std::collections::BinaryHeap;

use slotmap::SlotMap;
use tracing::trace;

use crate::error::SweepError;
use crate::math::int_point::{horz_segments_overlap, slopes_equal4};
use crate::math::Scale;

use super::edge::{e2_inserts_before_e1, Edge, EdgeId, OutSlot, Side};
use super::engine::ClipOptions;
use super::ingest::{EdgeSet, LocalMinimum};
use super::intersect::IntersectNode;
use super::join::{GhostJoin, Join};
use super::output::{OutPtId, OutPts, OutRec};
use super::select::{is_contributing, BoolOp, FillRules};

/// Which intrusive edge list an operation targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum EdgeList {
    /// Active edges, ordered by x at the current scanline.
    Active,
    /// Horizontals pending processing, or a scratch copy of the active list.
    Sorted,
}

/// Mutable state of a single clipping execution.
///
/// Owns a private copy of the engine's edges and minima, so an engine can be
/// executed repeatedly and sessions never share mutable state.
pub(crate) struct SweepSession {
    pub(super) edges: SlotMap<EdgeId, Edge>,
    minima: Vec<LocalMinimum>,
    current_lm: usize,
    scanbeam: BinaryHeap<i64>,
    pub(super) active_edges: Option<EdgeId>,
    pub(super) sorted_edges: Option<EdgeId>,
    pub(super) intersections: Vec<IntersectNode>,
    pub(super) out_pts: OutPts,
    pub(super) out_recs: Vec<OutRec>,
    pub(super) joins: Vec<Join>,
    pub(super) ghost_joins: Vec<GhostJoin>,
    /// X positions of maxima at the current scanline (strictly-simple mode).
    pub(super) maxima: Vec<i64>,
    pub(super) op: BoolOp,
    pub(super) fills: FillRules,
    pub(super) options: ClipOptions,
    pub(super) scale: Scale,
    pub(super) full_range: bool,
    pub(super) using_tree: bool,
}

impl SweepSession {
    pub(crate) fn new(
        set: &EdgeSet,
        op: BoolOp,
        fills: FillRules,
        options: &ClipOptions,
        using_tree: bool,
    ) -> Self {
        let scale = options.scale();
        let mut session = Self {
            edges: set.edges.clone(),
            minima: set.minima.clone(),
            current_lm: 0,
            scanbeam: BinaryHeap::new(),
            active_edges: None,
            sorted_edges: None,
            intersections: Vec::new(),
            out_pts: OutPts::with_key(),
            out_recs: Vec::new(),
            joins: Vec::new(),
            ghost_joins: Vec::new(),
            maxima: Vec::new(),
            op,
            fills,
            options: options.clone(),
            scale,
            full_range: scale.extended_range(),
            using_tree,
        };
        session.reset();
        session
    }

    fn reset(&mut self) {
        for i in 0..self.minima.len() {
            let lm = self.minima[i];
            self.scanbeam.push(lm.y);
            for (bound, side) in [(lm.left_bound, Side::Left), (lm.right_bound, Side::Right)] {
                if let Some(e) = bound {
                    let edge = &mut self.edges[e];
                    edge.curr = edge.bot;
                    edge.side = side;
                    edge.out = OutSlot::Unassigned;
                }
            }
        }
    }

    /// Runs the sweep and the ring post-processing.
    ///
    /// # Errors
    ///
    /// Returns `SweepError::InconsistentIntersectionOrder` when the crossings
    /// within a scanbeam cannot be ordered between adjacent edges, and
    /// `SweepError::UnpairedMaximum` when the active list is corrupt.
    pub(crate) fn run(&mut self) -> Result<(), SweepError> {
        let Some(bot_y) = self.pop_scanbeam() else {
            return Ok(());
        };
        self.insert_local_minima_into_ael(bot_y);
        while let Some(top_y) = self.pop_scanbeam() {
            trace!(top_y, "scanbeam");
            self.process_horizontals();
            self.ghost_joins.clear();
            self.process_intersections(top_y)?;
            self.process_edges_at_top_of_scanbeam(top_y)?;
            self.insert_local_minima_into_ael(top_y);
        }
        self.finish_rings();
        Ok(())
    }

    pub(super) fn insert_scanbeam(&mut self, y: i64) {
        self.scanbeam.push(y);
    }

    fn pop_scanbeam(&mut self) -> Option<i64> {
        let y = self.scanbeam.pop()?;
        while self.scanbeam.peek() == Some(&y) {
            self.scanbeam.pop();
        }
        Some(y)
    }

    fn pop_local_minimum(&mut self, y: i64) -> Option<LocalMinimum> {
        let lm = *self.minima.get(self.current_lm)?;
        if lm.y != y {
            return None;
        }
        self.current_lm += 1;
        Some(lm)
    }

    pub(super) fn contributing(&self, e: EdgeId) -> bool {
        let edge = &self.edges[e];
        is_contributing(
            self.op,
            edge.role,
            self.fills,
            edge.wind_delta,
            edge.wind_cnt,
            edge.wind_cnt2,
        )
    }

    // --- intrusive list plumbing ---

    pub(super) fn list_next(&self, list: EdgeList, e: EdgeId) -> Option<EdgeId> {
        match list {
            EdgeList::Active => self.edges[e].next_in_ael,
            EdgeList::Sorted => self.edges[e].next_in_sel,
        }
    }

    pub(super) fn list_prev(&self, list: EdgeList, e: EdgeId) -> Option<EdgeId> {
        match list {
            EdgeList::Active => self.edges[e].prev_in_ael,
            EdgeList::Sorted => self.edges[e].prev_in_sel,
        }
    }

    fn set_list_next(&mut self, list: EdgeList, e: EdgeId, to: Option<EdgeId>) {
        match list {
            EdgeList::Active => self.edges[e].next_in_ael = to,
            EdgeList::Sorted => self.edges[e].next_in_sel = to,
        }
    }

    fn set_list_prev(&mut self, list: EdgeList, e: EdgeId, to: Option<EdgeId>) {
        match list {
            EdgeList::Active => self.edges[e].prev_in_ael = to,
            EdgeList::Sorted => self.edges[e].prev_in_sel = to,
        }
    }

    fn set_list_head(&mut self, list: EdgeList, head: Option<EdgeId>) {
        match list {
            EdgeList::Active => self.active_edges = head,
            EdgeList::Sorted => self.sorted_edges = head,
        }
    }

    fn list_head(&self, list: EdgeList) -> Option<EdgeId> {
        match list {
            EdgeList::Active => self.active_edges,
            EdgeList::Sorted => self.sorted_edges,
        }
    }

    pub(super) fn delete_from_list(&mut self, list: EdgeList, e: EdgeId) {
        let prev = self.list_prev(list, e);
        let next = self.list_next(list, e);
        if prev.is_none() && next.is_none() && self.list_head(list) != Some(e) {
            return;
        }
        match prev {
            Some(p) => self.set_list_next(list, p, next),
            None => self.set_list_head(list, next),
        }
        if let Some(n) = next {
            self.set_list_prev(list, n, prev);
        }
        self.set_list_next(list, e, None);
        self.set_list_prev(list, e, None);
    }

    /// Exchanges the list positions of two edges, adjacent or not.
    pub(super) fn swap_positions_in_list(&mut self, list: EdgeList, e1: EdgeId, e2: EdgeId) {
        // Either edge may already have left the list.
        if self.list_next(list, e1) == self.list_prev(list, e1)
            || self.list_next(list, e2) == self.list_prev(list, e2)
        {
            return;
        }

        if self.list_next(list, e1) == Some(e2) {
            let next = self.list_next(list, e2);
            if let Some(n) = next {
                self.set_list_prev(list, n, Some(e1));
            }
            let prev = self.list_prev(list, e1);
            if let Some(p) = prev {
                self.set_list_next(list, p, Some(e2));
            }
            self.set_list_prev(list, e2, prev);
            self.set_list_next(list, e2, Some(e1));
            self.set_list_prev(list, e1, Some(e2));
            self.set_list_next(list, e1, next);
        } else if self.list_next(list, e2) == Some(e1) {
            let next = self.list_next(list, e1);
            if let Some(n) = next {
                self.set_list_prev(list, n, Some(e2));
            }
            let prev = self.list_prev(list, e2);
            if let Some(p) = prev {
                self.set_list_next(list, p, Some(e1));
            }
            self.set_list_prev(list, e1, prev);
            self.set_list_next(list, e1, Some(e2));
            self.set_list_prev(list, e2, Some(e1));
            self.set_list_next(list, e2, next);
        } else {
            let next = self.list_next(list, e1);
            let prev = self.list_prev(list, e1);
            let e2_next = self.list_next(list, e2);
            let e2_prev = self.list_prev(list, e2);
            self.set_list_next(list, e1, e2_next);
            if let Some(n) = e2_next {
                self.set_list_prev(list, n, Some(e1));
            }
            self.set_list_prev(list, e1, e2_prev);
            if let Some(p) = e2_prev {
                self.set_list_next(list, p, Some(e1));
            }
            self.set_list_next(list, e2, next);
            if let Some(n) = next {
                self.set_list_prev(list, n, Some(e2));
            }
            self.set_list_prev(list, e2, prev);
            if let Some(p) = prev {
                self.set_list_next(list, p, Some(e2));
            }
        }

        if self.list_prev(list, e1).is_none() {
            self.set_list_head(list, Some(e1));
        } else if self.list_prev(list, e2).is_none() {
            self.set_list_head(list, Some(e2));
        }
    }

    /// Inserts `edge` into the active list in x order, scanning from
    /// `start` when given.
    fn insert_edge_into_ael(&mut self, edge: EdgeId, start: Option<EdgeId>) {
        let Some(head) = self.active_edges else {
            self.edges[edge].prev_in_ael = None;
            self.edges[edge].next_in_ael = None;
            self.active_edges = Some(edge);
            return;
        };
        if start.is_none() && e2_inserts_before_e1(&self.edges[head], &self.edges[edge]) {
            self.edges[edge].prev_in_ael = None;
            self.edges[edge].next_in_ael = Some(head);
            self.edges[head].prev_in_ael = Some(edge);
            self.active_edges = Some(edge);
            return;
        }
        let mut s = start.unwrap_or(head);
        while let Some(next) = self.edges[s].next_in_ael {
            if e2_inserts_before_e1(&self.edges[next], &self.edges[edge]) {
                break;
            }
            s = next;
        }
        let after = self.edges[s].next_in_ael;
        self.edges[edge].next_in_ael = after;
        if let Some(a) = after {
            self.edges[a].prev_in_ael = Some(edge);
        }
        self.edges[edge].prev_in_ael = Some(s);
        self.edges[s].next_in_ael = Some(edge);
    }

    pub(super) fn add_edge_to_sel(&mut self, e: EdgeId) {
        self.edges[e].prev_in_sel = None;
        self.edges[e].next_in_sel = self.sorted_edges;
        if let Some(head) = self.sorted_edges {
            self.edges[head].prev_in_sel = Some(e);
        }
        self.sorted_edges = Some(e);
    }

    pub(super) fn pop_edge_from_sel(&mut self) -> Option<EdgeId> {
        let e = self.sorted_edges?;
        self.delete_from_list(EdgeList::Sorted, e);
        Some(e)
    }

    pub(super) fn copy_ael_to_sel(&mut self) {
        self.sorted_edges = self.active_edges;
        let mut e = self.active_edges;
        while let Some(id) = e {
            let edge = &mut self.edges[id];
            edge.prev_in_sel = edge.prev_in_ael;
            edge.next_in_sel = edge.next_in_ael;
            e = edge.next_in_ael;
        }
    }

    /// Replaces `e` in the active list by the next edge of its bound and
    /// returns that edge.
    pub(super) fn update_edge_into_ael(&mut self, e: EdgeId) -> EdgeId {
        let Some(next) = self.edges[e].next_in_lml else {
            return e;
        };
        let old = self.edges[e].clone();
        self.edges[next].out = old.out;
        match old.prev_in_ael {
            Some(p) => self.edges[p].next_in_ael = Some(next),
            None => self.active_edges = Some(next),
        }
        if let Some(n) = old.next_in_ael {
            self.edges[n].prev_in_ael = Some(next);
        }
        let edge = &mut self.edges[next];
        edge.side = old.side;
        edge.wind_delta = old.wind_delta;
        edge.wind_cnt = old.wind_cnt;
        edge.wind_cnt2 = old.wind_cnt2;
        edge.curr = edge.bot;
        edge.prev_in_ael = old.prev_in_ael;
        edge.next_in_ael = old.next_in_ael;
        if !edge.is_horizontal() {
            let top_y = edge.top.y;
            self.insert_scanbeam(top_y);
        }
        next
    }

    // --- scanbeam steps ---

    fn insert_local_minima_into_ael(&mut self, bot_y: i64) {
        while let Some(lm) = self.pop_local_minimum(bot_y) {
            let mut op1 = None;
            match (lm.left_bound, lm.right_bound) {
                (None, Some(rb)) => {
                    self.insert_edge_into_ael(rb, None);
                    self.set_winding_count(rb);
                    if self.contributing(rb) {
                        op1 = Some(self.add_out_pt(rb, self.edges[rb].bot));
                    }
                }
                (Some(lb), None) => {
                    self.insert_edge_into_ael(lb, None);
                    self.set_winding_count(lb);
                    if self.contributing(lb) {
                        op1 = Some(self.add_out_pt(lb, self.edges[lb].bot));
                    }
                    self.insert_scanbeam(self.edges[lb].top.y);
                }
                (Some(lb), Some(rb)) => {
                    self.insert_edge_into_ael(lb, None);
                    self.insert_edge_into_ael(rb, Some(lb));
                    self.set_winding_count(lb);
                    self.edges[rb].wind_cnt = self.edges[lb].wind_cnt;
                    self.edges[rb].wind_cnt2 = self.edges[lb].wind_cnt2;
                    if self.contributing(lb) {
                        op1 = Some(self.add_local_min_poly(lb, rb, self.edges[lb].bot));
                    }
                    self.insert_scanbeam(self.edges[lb].top.y);
                }
                (None, None) => continue,
            }

            if let Some(rb) = lm.right_bound {
                if self.edges[rb].is_horizontal() {
                    self.add_edge_to_sel(rb);
                    if let Some(next) = self.edges[rb].next_in_lml {
                        self.insert_scanbeam(self.edges[next].top.y);
                    }
                } else {
                    self.insert_scanbeam(self.edges[rb].top.y);
                }
            }

            let (Some(lb), Some(rb)) = (lm.left_bound, lm.right_bound) else {
                continue;
            };

            // Output rings sharing an edge are joined later.
            if let Some(op1) = op1 {
                if self.edges[rb].is_horizontal() && self.edges[rb].wind_delta != 0 {
                    let (rb_bot, rb_top) = (self.edges[rb].bot.x, self.edges[rb].top.x);
                    let overlapping: Vec<GhostJoin> = self
                        .ghost_joins
                        .iter()
                        .filter(|gj| {
                            horz_segments_overlap(
                                self.out_pts[gj.out_pt].pt.x,
                                gj.off_pt.x,
                                rb_bot,
                                rb_top,
                            )
                        })
                        .copied()
                        .collect();
                    for gj in overlapping {
                        self.add_join(gj.out_pt, op1, gj.off_pt);
                    }
                }
            }

            if let (Some(op1), Some(prev)) = (op1, self.edges[lb].prev_in_ael) {
                let (lbe, pe) = (&self.edges[lb], &self.edges[prev]);
                if lbe.out.is_assigned()
                    && pe.curr.x == lbe.bot.x
                    && pe.out.is_assigned()
                    && slopes_equal4(pe.bot, pe.top, lbe.curr, lbe.top, self.full_range)
                    && lbe.wind_delta != 0
                    && pe.wind_delta != 0
                {
                    let (bot, top) = (lbe.bot, lbe.top);
                    let op2 = self.add_out_pt(prev, bot);
                    self.add_join(op1, op2, top);
                }
            }

            if self.edges[lb].next_in_ael != Some(rb) {
                if let (Some(op1), Some(prev)) = (op1, self.edges[rb].prev_in_ael) {
                    let (rbe, pe) = (&self.edges[rb], &self.edges[prev]);
                    if rbe.out.is_assigned()
                        && pe.out.is_assigned()
                        && slopes_equal4(pe.curr, pe.top, rbe.curr, rbe.top, self.full_range)
                        && rbe.wind_delta != 0
                        && pe.wind_delta != 0
                    {
                        let (bot, top) = (rbe.bot, rbe.top);
                        let op2 = self.add_out_pt(prev, bot);
                        self.add_join(op1, op2, top);
                    }
                }

                // Edges between the new bounds cross the right bound here;
                // intersect_edges expects its first edge on the right above
                // the crossing.
                let pt = self.edges[lb].curr;
                let mut e = self.edges[lb].next_in_ael;
                while let Some(id) = e {
                    if id == rb {
                        break;
                    }
                    self.intersect_edges(rb, id, pt);
                    e = self.edges[id].next_in_ael;
                }
            }
        }
    }

    fn is_maxima(&self, e: EdgeId, y: i64) -> bool {
        let edge = &self.edges[e];
        edge.top.y == y && edge.next_in_lml.is_none()
    }

    fn is_intermediate(&self, e: EdgeId, y: i64) -> bool {
        let edge = &self.edges[e];
        edge.top.y == y && edge.next_in_lml.is_some()
    }

    /// The other edge ending at the same maximum as `e`.
    pub(super) fn maxima_pair(&self, e: EdgeId) -> Option<EdgeId> {
        let edge = &self.edges[e];
        let (next, prev) = (&self.edges[edge.next], &self.edges[edge.prev]);
        if next.top == edge.top && next.next_in_lml.is_none() {
            Some(edge.next)
        } else if prev.top == edge.top && prev.next_in_lml.is_none() {
            Some(edge.prev)
        } else {
            None
        }
    }

    /// As [`Self::maxima_pair`], but only a pair that is active (or horizontal).
    fn maxima_pair_ex(&self, e: EdgeId) -> Option<EdgeId> {
        let pair = self.maxima_pair(e)?;
        let p = &self.edges[pair];
        if p.out == OutSlot::Skip || (p.next_in_ael == p.prev_in_ael && !p.is_horizontal()) {
            None
        } else {
            Some(pair)
        }
    }

    fn process_edges_at_top_of_scanbeam(&mut self, top_y: i64) -> Result<(), SweepError> {
        let mut e = self.active_edges;
        while let Some(id) = e {
            // Maxima are treated as bent horizontals, except those paired with
            // a real horizontal.
            let mut is_maxima_edge = self.is_maxima(id, top_y);
            if is_maxima_edge {
                if let Some(pair) = self.maxima_pair_ex(id) {
                    is_maxima_edge = !self.edges[pair].is_horizontal();
                }
            }

            if is_maxima_edge {
                if self.options.strictly_simple {
                    self.maxima.push(self.edges[id].top.x);
                }
                let prev = self.edges[id].prev_in_ael;
                self.do_maxima(id)?;
                e = match prev {
                    None => self.active_edges,
                    Some(p) => self.edges[p].next_in_ael,
                };
                continue;
            }

            let mut id = id;
            let promote = self.is_intermediate(id, top_y)
                && self.edges[id]
                    .next_in_lml
                    .is_some_and(|n| self.edges[n].is_horizontal());
            if promote {
                id = self.update_edge_into_ael(id);
                if self.edges[id].out.is_assigned() {
                    self.add_out_pt(id, self.edges[id].bot);
                }
                self.add_edge_to_sel(id);
            } else {
                let edge = &mut self.edges[id];
                edge.curr.x = edge.top_x(top_y);
                edge.curr.y = top_y;
                edge.curr.tag = if top_y == edge.top.y {
                    edge.top.tag
                } else if top_y == edge.bot.y {
                    edge.bot.tag
                } else {
                    0
                };
            }

            // Edges touching at a vertex both get that vertex.
            if self.options.strictly_simple {
                if let Some(prev) = self.edges[id].prev_in_ael {
                    let (ee, pe) = (&self.edges[id], &self.edges[prev]);
                    if ee.out.is_assigned()
                        && ee.wind_delta != 0
                        && pe.out.is_assigned()
                        && pe.curr.x == ee.curr.x
                        && pe.wind_delta != 0
                    {
                        let mut pt = ee.curr;
                        self.assign_tag(prev, id, &mut pt);
                        let op = self.add_out_pt(prev, pt);
                        let op2 = self.add_out_pt(id, pt);
                        self.add_join(op, op2, pt);
                    }
                }
            }
            e = self.edges[id].next_in_ael;
        }

        self.maxima.sort_unstable();
        self.process_horizontals();
        self.maxima.clear();

        // Promote intermediate vertices.
        let mut e = self.active_edges;
        while let Some(mut id) = e {
            if self.is_intermediate(id, top_y) {
                let op = if self.edges[id].out.is_assigned() {
                    Some(self.add_out_pt(id, self.edges[id].top))
                } else {
                    None
                };
                id = self.update_edge_into_ael(id);
                if let Some(op) = op {
                    self.join_collinear_neighbour(id, op);
                }
            }
            e = self.edges[id].next_in_ael;
        }
        Ok(())
    }

    /// Records a join when a neighbour of the freshly promoted `e` continues
    /// collinearly from the same vertex.
    pub(super) fn join_collinear_neighbour(&mut self, e: EdgeId, op: OutPtId) {
        let ee = &self.edges[e];
        if ee.wind_delta == 0 {
            return;
        }
        let candidates = [ee.prev_in_ael, ee.next_in_ael];
        for other in candidates.into_iter().flatten() {
            let (ee, oe) = (&self.edges[e], &self.edges[other]);
            if oe.curr.x == ee.bot.x
                && oe.curr.y == ee.bot.y
                && oe.out.is_assigned()
                && oe.curr.y > oe.top.y
                && slopes_equal4(ee.curr, ee.top, oe.curr, oe.top, self.full_range)
                && oe.wind_delta != 0
            {
                let (bot, top) = (ee.bot, ee.top);
                let op2 = self.add_out_pt(other, bot);
                self.add_join(op, op2, top);
                return;
            }
        }
    }

    fn do_maxima(&mut self, e: EdgeId) -> Result<(), SweepError> {
        let Some(pair) = self.maxima_pair_ex(e) else {
            if self.edges[e].out.is_assigned() {
                self.add_out_pt(e, self.edges[e].top);
            }
            self.delete_from_list(EdgeList::Active, e);
            return Ok(());
        };

        let mut next = self.edges[e].next_in_ael;
        while let Some(n) = next {
            if n == pair {
                break;
            }
            let top = self.edges[e].top;
            self.intersect_edges(e, n, top);
            self.swap_positions_in_list(EdgeList::Active, e, n);
            next = self.edges[e].next_in_ael;
        }

        let (out_e, out_pair) = (self.edges[e].out, self.edges[pair].out);
        if out_e == OutSlot::Unassigned && out_pair == OutSlot::Unassigned {
            self.delete_from_list(EdgeList::Active, e);
            self.delete_from_list(EdgeList::Active, pair);
        } else if out_e.is_assigned() && out_pair.is_assigned() {
            self.add_local_max_poly(e, pair, self.edges[e].top);
            self.delete_from_list(EdgeList::Active, e);
            self.delete_from_list(EdgeList::Active, pair);
        } else if self.edges[e].wind_delta == 0 {
            let top = self.edges[e].top;
            if out_e.is_assigned() {
                self.add_out_pt(e, top);
                self.edges[e].out = OutSlot::Unassigned;
            }
            self.delete_from_list(EdgeList::Active, e);
            if self.edges[pair].out.is_assigned() {
                self.add_out_pt(pair, top);
                self.edges[pair].out = OutSlot::Unassigned;
            }
            self.delete_from_list(EdgeList::Active, pair);
        } else {
            return Err(SweepError::UnpairedMaximum {
                y: self.edges[e].top.y,
            });
        }
        Ok(())
    }
}
