use slotmap::SlotMap;

use crate::math::int_point::{pt2_is_between, slopes_equal3};
use crate::math::IntPoint;

use super::edge::{Edge, EdgeId, OutSlot, Side};
use super::select::PathRole;

/// A vertex where two bounds start heading upward.
///
/// Either bound may be missing for open paths.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct LocalMinimum {
    pub y: i64,
    pub left_bound: Option<EdgeId>,
    pub right_bound: Option<EdgeId>,
}

/// Integer bounding rectangle of everything added to an engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct IntBounds {
    pub left: i64,
    pub top: i64,
    pub right: i64,
    pub bottom: i64,
}

/// Edge arena and local-minima list built from the added paths.
///
/// Each execution works on its own clone, so the set can be executed again.
#[derive(Debug, Clone, Default)]
pub(crate) struct EdgeSet {
    pub edges: SlotMap<EdgeId, Edge>,
    /// Sorted by descending y; equal y keeps insertion order.
    pub minima: Vec<LocalMinimum>,
    pub has_open_paths: bool,
}

impl EdgeSet {
    pub(crate) fn clear(&mut self) {
        self.edges.clear();
        self.minima.clear();
        self.has_open_paths = false;
    }

    fn next(&self, e: EdgeId) -> EdgeId {
        self.edges[e].next
    }

    fn prev(&self, e: EdgeId) -> EdgeId {
        self.edges[e].prev
    }

    fn insert_minimum(&mut self, lm: LocalMinimum) {
        let pos = self.minima.partition_point(|m| m.y >= lm.y);
        self.minima.insert(pos, lm);
    }

    /// Unlinks `e` from its ring and returns the edge that followed it.
    fn remove_edge(&mut self, e: EdgeId) -> EdgeId {
        let (prev, next) = (self.prev(e), self.next(e));
        self.edges[prev].next = next;
        self.edges[next].prev = prev;
        self.edges.remove(e);
        next
    }

    fn discard_ring(&mut self, start: EdgeId) {
        let mut ring = vec![start];
        let mut e = self.next(start);
        while e != start && self.edges.contains_key(e) {
            ring.push(e);
            e = self.next(e);
        }
        for id in ring {
            self.edges.remove(id);
        }
    }

    fn init_bounds_and_slope(&mut self, e: EdgeId) {
        let next_curr = self.edges[self.next(e)].curr;
        let edge = &mut self.edges[e];
        if edge.curr.y >= next_curr.y {
            edge.bot = edge.curr;
            edge.top = next_curr;
        } else {
            edge.top = edge.curr;
            edge.bot = next_curr;
        }
        edge.set_dx();
    }

    /// Adds one path; returns `false` when it degenerates and is skipped.
    ///
    /// `pts` must already be range-checked grid points.
    pub(crate) fn add_path(
        &mut self,
        pts: &[IntPoint],
        role: PathRole,
        closed: bool,
        preserve_collinear: bool,
        full_range: bool,
    ) -> bool {
        if pts.is_empty() {
            return false;
        }
        let mut high = pts.len() - 1;
        if closed {
            while high > 0 && pts[high] == pts[0] {
                high -= 1;
            }
        }
        while high > 0 && pts[high] == pts[high - 1] {
            high -= 1;
        }
        if (closed && high < 2) || (!closed && high < 1) {
            return false;
        }

        let ids: Vec<EdgeId> = pts[..=high]
            .iter()
            .map(|&p| self.edges.insert(Edge::new(p, role)))
            .collect();
        for (i, &id) in ids.iter().enumerate() {
            let edge = &mut self.edges[id];
            edge.next = ids[(i + 1) % ids.len()];
            edge.prev = ids[(i + ids.len() - 1) % ids.len()];
        }

        // Remove duplicate vertices and, for closed paths, collinear ones.
        let mut e_start = ids[0];
        let mut e = e_start;
        let mut loop_stop = e_start;
        loop {
            let (prev, next) = (self.prev(e), self.next(e));
            if self.edges[e].curr == self.edges[next].curr && (closed || next != e_start) {
                if e == next {
                    break;
                }
                if e == e_start {
                    e_start = next;
                }
                e = self.remove_edge(e);
                loop_stop = e;
                continue;
            }
            if prev == next {
                break;
            }
            let (p, c, n) = (
                self.edges[prev].curr,
                self.edges[e].curr,
                self.edges[next].curr,
            );
            if closed
                && slopes_equal3(p, c, n, full_range)
                && (!preserve_collinear || !pt2_is_between(p, c, n))
            {
                if e == e_start {
                    e_start = next;
                }
                e = self.remove_edge(e);
                e = self.prev(e);
                loop_stop = e;
                continue;
            }
            e = self.next(e);
            if e == loop_stop || (!closed && self.next(e) == e_start) {
                break;
            }
        }

        if (!closed && e == self.next(e)) || (closed && self.prev(e) == self.next(e)) {
            self.discard_ring(e);
            return false;
        }

        if !closed {
            self.has_open_paths = true;
            let last = self.prev(e_start);
            self.edges[last].out = OutSlot::Skip;
        }

        let mut is_flat = true;
        let start_y = self.edges[e_start].curr.y;
        e = e_start;
        loop {
            self.init_bounds_and_slope(e);
            e = self.next(e);
            if is_flat && self.edges[e].curr.y != start_y {
                is_flat = false;
            }
            if e == e_start {
                break;
            }
        }

        if is_flat {
            if closed {
                self.discard_ring(e);
                return false;
            }
            self.add_flat_open_path(e);
            return true;
        }

        let mut e_min: Option<EdgeId> = None;
        let last = self.prev(e);
        if self.edges[last].bot == self.edges[last].top {
            e = self.next(e);
        }
        loop {
            e = self.find_next_loc_min(e);
            if Some(e) == e_min {
                break;
            }
            if e_min.is_none() {
                e_min = Some(e);
            }

            let prev = self.prev(e);
            let y = self.edges[e].bot.y;
            let (left, right, left_is_forward) = if self.edges[e].dx < self.edges[prev].dx {
                (prev, e, false)
            } else {
                (e, prev, true)
            };

            let wind_delta = if !closed {
                0
            } else if self.next(left) == right {
                -1
            } else {
                1
            };
            self.edges[left].wind_delta = wind_delta;
            self.edges[right].wind_delta = -wind_delta;

            e = self.process_bound(left, left_is_forward);
            if self.edges[e].out == OutSlot::Skip {
                e = self.process_bound(e, left_is_forward);
            }
            let mut e2 = self.process_bound(right, !left_is_forward);
            if self.edges[e2].out == OutSlot::Skip {
                e2 = self.process_bound(e2, !left_is_forward);
            }

            let mut lm = LocalMinimum {
                y,
                left_bound: Some(left),
                right_bound: Some(right),
            };
            if self.edges[left].out == OutSlot::Skip {
                lm.left_bound = None;
            } else if self.edges[right].out == OutSlot::Skip {
                lm.right_bound = None;
            }
            self.insert_minimum(lm);
            if !left_is_forward {
                e = e2;
            }
        }
        true
    }

    /// A perfectly horizontal open path becomes one right bound.
    fn add_flat_open_path(&mut self, mut e: EdgeId) {
        let last = self.prev(e);
        self.edges[last].out = OutSlot::Skip;
        let lm = LocalMinimum {
            y: self.edges[e].bot.y,
            left_bound: None,
            right_bound: Some(e),
        };
        self.edges[e].side = Side::Right;
        self.edges[e].wind_delta = 0;
        loop {
            let prev_top_x = self.edges[self.prev(e)].top.x;
            if self.edges[e].bot.x != prev_top_x {
                self.edges[e].reverse_horizontal();
            }
            let next = self.next(e);
            if self.edges[next].out == OutSlot::Skip {
                break;
            }
            self.edges[e].next_in_lml = Some(next);
            e = next;
        }
        self.insert_minimum(lm);
    }

    fn find_next_loc_min(&self, mut e: EdgeId) -> EdgeId {
        loop {
            while self.edges[e].bot != self.edges[self.prev(e)].bot
                || self.edges[e].curr == self.edges[e].top
            {
                e = self.next(e);
            }
            if !self.edges[e].is_horizontal() && !self.edges[self.prev(e)].is_horizontal() {
                break;
            }
            while self.edges[self.prev(e)].is_horizontal() {
                e = self.prev(e);
            }
            let e2 = e;
            while self.edges[e].is_horizontal() {
                e = self.next(e);
            }
            if self.edges[e].top.y == self.edges[self.prev(e)].bot.y {
                // An intermediate horizontal.
                continue;
            }
            if self.edges[self.prev(e2)].bot.x < self.edges[e].bot.x {
                e = e2;
            }
            break;
        }
        e
    }

    /// Links the bound starting at `e` through `next_in_lml` and returns the
    /// first edge beyond it.
    fn process_bound(&mut self, mut e: EdgeId, next_is_forward: bool) -> EdgeId {
        let mut result = e;
        let step = |set: &Self, id: EdgeId, forward: bool| {
            if forward {
                set.next(id)
            } else {
                set.prev(id)
            }
        };

        if self.edges[e].out == OutSlot::Skip {
            // Edges may remain in this bound beyond the skip edge; they get
            // their own local minimum.
            while self.edges[e].top.y == self.edges[step(self, e, next_is_forward)].bot.y {
                e = step(self, e, next_is_forward);
            }
            // Top horizontals belong to the opposite bound.
            while e != result && self.edges[e].is_horizontal() {
                e = step(self, e, !next_is_forward);
            }
            if e == result {
                result = step(self, e, next_is_forward);
            } else {
                e = step(self, result, next_is_forward);
                let y = self.edges[e].bot.y;
                self.edges[e].wind_delta = 0;
                result = self.process_bound(e, next_is_forward);
                self.insert_minimum(LocalMinimum {
                    y,
                    left_bound: None,
                    right_bound: Some(e),
                });
            }
            return result;
        }

        if self.edges[e].is_horizontal() {
            // Not necessarily a true minimum when following a skip edge, and
            // consecutive horizontals may double back.
            let e_start = step(self, e, !next_is_forward);
            let (start_bot, start_top) = (self.edges[e_start].bot.x, self.edges[e_start].top.x);
            let bot_x = self.edges[e].bot.x;
            if self.edges[e_start].is_horizontal() {
                if start_bot != bot_x && start_top != bot_x {
                    self.edges[e].reverse_horizontal();
                }
            } else if start_bot != bot_x {
                self.edges[e].reverse_horizontal();
            }
        }

        let e_start = e;
        if next_is_forward {
            while self.edges[result].top.y == self.edges[self.next(result)].bot.y
                && self.edges[self.next(result)].out != OutSlot::Skip
            {
                result = self.next(result);
            }
            if self.edges[result].is_horizontal()
                && self.edges[self.next(result)].out != OutSlot::Skip
            {
                // A top horizontal joins this bound only when the preceding
                // edge attaches to its left end.
                let mut horz = result;
                while self.edges[self.prev(horz)].is_horizontal() {
                    horz = self.prev(horz);
                }
                if self.edges[self.prev(horz)].top.x > self.edges[self.next(result)].top.x {
                    result = self.prev(horz);
                }
            }
            while e != result {
                let next = self.next(e);
                self.edges[e].next_in_lml = Some(next);
                self.align_horizontal(e, e_start, true);
                e = next;
            }
            self.align_horizontal(e, e_start, true);
            self.next(result)
        } else {
            while self.edges[result].top.y == self.edges[self.prev(result)].bot.y
                && self.edges[self.prev(result)].out != OutSlot::Skip
            {
                result = self.prev(result);
            }
            if self.edges[result].is_horizontal()
                && self.edges[self.prev(result)].out != OutSlot::Skip
            {
                let mut horz = result;
                while self.edges[self.next(horz)].is_horizontal() {
                    horz = self.next(horz);
                }
                if self.edges[self.next(horz)].top.x >= self.edges[self.prev(result)].top.x {
                    result = self.next(horz);
                }
            }
            while e != result {
                let prev = self.prev(e);
                self.edges[e].next_in_lml = Some(prev);
                self.align_horizontal(e, e_start, false);
                e = prev;
            }
            self.align_horizontal(e, e_start, false);
            self.prev(result)
        }
    }

    /// Reverses a horizontal inside a bound so its bottom meets the previous
    /// edge's top.
    fn align_horizontal(&mut self, e: EdgeId, bound_start: EdgeId, forward: bool) {
        if e == bound_start || !self.edges[e].is_horizontal() {
            return;
        }
        let before = if forward { self.prev(e) } else { self.next(e) };
        if self.edges[e].bot.x != self.edges[before].top.x {
            self.edges[e].reverse_horizontal();
        }
    }

    /// Integer bounds of all edges, or `None` when nothing was added.
    pub(crate) fn bounds(&self) -> Option<IntBounds> {
        let mut iter = self.edges.values();
        let first = iter.next()?;
        let mut b = IntBounds {
            left: first.bot.x.min(first.top.x),
            top: first.top.y,
            right: first.bot.x.max(first.top.x),
            bottom: first.bot.y,
        };
        for e in iter {
            b.left = b.left.min(e.bot.x).min(e.top.x);
            b.right = b.right.max(e.bot.x).max(e.top.x);
            b.top = b.top.min(e.top.y);
            b.bottom = b.bottom.max(e.bot.y);
        }
        Some(b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pts(coords: &[(i64, i64)]) -> Vec<IntPoint> {
        coords.iter().map(|&(x, y)| IntPoint::new(x, y)).collect()
    }

    #[test]
    fn square_has_one_local_minimum() {
        let mut set = EdgeSet::default();
        let square = pts(&[(0, 0), (10, 0), (10, 10), (0, 10)]);
        assert!(set.add_path(&square, PathRole::Subject, true, false, false));
        assert_eq!(set.edges.len(), 4);
        assert_eq!(set.minima.len(), 1);
        assert_eq!(set.minima[0].y, 10);
        assert!(set.minima[0].left_bound.is_some());
        assert!(set.minima[0].right_bound.is_some());
    }

    #[test]
    fn duplicates_and_collinear_points_are_stripped() {
        let mut set = EdgeSet::default();
        let path = pts(&[(0, 0), (5, 0), (5, 0), (10, 0), (10, 10), (0, 10), (0, 0)]);
        assert!(set.add_path(&path, PathRole::Subject, true, false, false));
        assert_eq!(set.edges.len(), 4);
    }

    #[test]
    fn preserve_collinear_keeps_middle_vertex() {
        let mut set = EdgeSet::default();
        let path = pts(&[(0, 0), (5, 0), (10, 0), (10, 10), (0, 10)]);
        assert!(set.add_path(&path, PathRole::Subject, true, true, false));
        assert_eq!(set.edges.len(), 5);
    }

    #[test]
    fn degenerate_paths_are_skipped() {
        let mut set = EdgeSet::default();
        assert!(!set.add_path(&pts(&[(0, 0), (1, 1)]), PathRole::Subject, true, false, false));
        assert!(!set.add_path(&pts(&[(0, 0), (5, 5), (10, 10)]), PathRole::Subject, true, false, false));
        assert!(!set.add_path(&pts(&[(3, 3), (3, 3)]), PathRole::Subject, false, false, false));
        assert!(!set.add_path(&pts(&[(0, 0), (5, 0), (9, 0)]), PathRole::Subject, true, false, false));
        assert!(set.edges.is_empty());
        assert!(set.minima.is_empty());
    }

    #[test]
    fn flat_open_path_yields_single_right_bound() {
        let mut set = EdgeSet::default();
        assert!(set.add_path(&pts(&[(0, 5), (10, 5)]), PathRole::Subject, false, false, false));
        assert!(set.has_open_paths);
        assert_eq!(set.minima.len(), 1);
        assert!(set.minima[0].left_bound.is_none());
        assert!(set.minima[0].right_bound.is_some());
    }

    #[test]
    fn minima_are_sorted_by_descending_y() {
        let mut set = EdgeSet::default();
        set.add_path(&pts(&[(0, 0), (4, 0), (4, 4), (0, 4)]), PathRole::Subject, true, false, false);
        set.add_path(&pts(&[(0, 10), (4, 10), (4, 14), (0, 14)]), PathRole::Clip, true, false, false);
        set.add_path(&pts(&[(0, 5), (4, 5), (4, 7), (0, 7)]), PathRole::Clip, true, false, false);
        let ys: Vec<i64> = set.minima.iter().map(|m| m.y).collect();
        assert_eq!(ys, vec![14, 7, 4]);
    }

    #[test]
    fn bounds_cover_all_edges() {
        let mut set = EdgeSet::default();
        assert!(set.bounds().is_none());
        set.add_path(&pts(&[(-3, 0), (4, 1), (0, 9)]), PathRole::Subject, true, false, false);
        let b = set.bounds().unwrap_or_default();
        assert_eq!(b, IntBounds { left: -3, top: 0, right: 4, bottom: 9 });
    }
}
