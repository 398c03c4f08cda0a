use crate::math::int_point::round_to_grid;
use crate::math::IntPoint;

use super::select::PathRole;

slotmap::new_key_type! {
    /// Unique identifier for an edge in the sweep arena.
    pub struct EdgeId;
}

/// Inverse slope marker for horizontal edges.
pub(crate) const HORIZONTAL: f64 = -1.0e40;

/// Which end of its output ring an edge appends to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Side {
    Left,
    Right,
}

/// Association between an edge and an output ring.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum OutSlot {
    Unassigned,
    /// Closing edge of an open path; never enters the active set.
    Skip,
    Assigned(usize),
}

impl OutSlot {
    pub(crate) fn index(self) -> Option<usize> {
        match self {
            Self::Assigned(idx) => Some(idx),
            Self::Unassigned | Self::Skip => None,
        }
    }

    pub(crate) fn is_assigned(self) -> bool {
        matches!(self, Self::Assigned(_))
    }
}

/// One directed segment of an input path.
///
/// `bot` always has the larger y (the sweep runs from large to small y);
/// `curr` tracks the edge's position at the current scanline.
#[derive(Debug, Clone)]
pub(crate) struct Edge {
    pub bot: IntPoint,
    pub curr: IntPoint,
    pub top: IntPoint,
    pub dx: f64,
    pub role: PathRole,
    pub side: Side,
    /// +1/-1 for closed paths depending on direction, 0 for open paths.
    pub wind_delta: i32,
    pub wind_cnt: i32,
    pub wind_cnt2: i32,
    pub out: OutSlot,
    pub next: EdgeId,
    pub prev: EdgeId,
    pub next_in_lml: Option<EdgeId>,
    pub next_in_ael: Option<EdgeId>,
    pub prev_in_ael: Option<EdgeId>,
    pub next_in_sel: Option<EdgeId>,
    pub prev_in_sel: Option<EdgeId>,
}

impl Edge {
    /// Creates an unlinked edge starting at `curr`.
    pub(crate) fn new(curr: IntPoint, role: PathRole) -> Self {
        Self {
            bot: curr,
            curr,
            top: curr,
            dx: 0.0,
            role,
            side: Side::Left,
            wind_delta: 0,
            wind_cnt: 0,
            wind_cnt2: 0,
            out: OutSlot::Unassigned,
            next: EdgeId::default(),
            prev: EdgeId::default(),
            next_in_lml: None,
            next_in_ael: None,
            prev_in_ael: None,
            next_in_sel: None,
            prev_in_sel: None,
        }
    }

    #[allow(clippy::float_cmp)]
    pub(crate) fn is_horizontal(&self) -> bool {
        self.dx == HORIZONTAL
    }

    #[allow(clippy::cast_precision_loss)]
    pub(crate) fn set_dx(&mut self) {
        let dy = self.top.y - self.bot.y;
        self.dx = if dy == 0 {
            HORIZONTAL
        } else {
            (self.top.x - self.bot.x) as f64 / dy as f64
        };
    }

    /// X of the edge at scanline `y`.
    #[allow(clippy::cast_precision_loss)]
    pub(crate) fn top_x(&self, y: i64) -> i64 {
        if y == self.top.y {
            self.top.x
        } else {
            self.bot.x + round_to_grid(self.dx * (y - self.bot.y) as f64)
        }
    }

    /// Swaps the ends of a horizontal edge so it follows its bound.
    pub(crate) fn reverse_horizontal(&mut self) {
        std::mem::swap(&mut self.top.x, &mut self.bot.x);
        std::mem::swap(&mut self.top.tag, &mut self.bot.tag);
    }
}

/// Inverse slope of the segment `pt1 → pt2`.
#[allow(clippy::cast_precision_loss)]
pub(crate) fn segment_dx(pt1: IntPoint, pt2: IntPoint) -> f64 {
    if pt1.y == pt2.y {
        HORIZONTAL
    } else {
        (pt2.x - pt1.x) as f64 / (pt2.y - pt1.y) as f64
    }
}

/// `true` when `e2` belongs before `e1` in the active set.
pub(crate) fn e2_inserts_before_e1(e1: &Edge, e2: &Edge) -> bool {
    if e2.curr.x == e1.curr.x {
        if e2.top.y > e1.top.y {
            e2.top.x < e1.top_x(e2.top.y)
        } else {
            e1.top.x > e2.top_x(e1.top.y)
        }
    } else {
        e2.curr.x < e1.curr.x
    }
}

/// Crossing point of two edges, rounded to the grid and kept inside the
/// current scanbeam (never above either top nor below `e1.curr.y`).
#[allow(clippy::float_cmp, clippy::cast_precision_loss)]
pub(crate) fn intersect_point(e1: &Edge, e2: &Edge) -> IntPoint {
    let mut ip = IntPoint::default();
    if e1.dx == e2.dx {
        ip.y = e1.curr.y;
        ip.x = e1.top_x(ip.y);
        return ip;
    } else if e1.dx == 0.0 {
        ip.x = e1.bot.x;
        if e2.is_horizontal() {
            ip.y = e2.bot.y;
        } else {
            let b2 = e2.bot.y as f64 - (e2.bot.x as f64 / e2.dx);
            ip.y = round_to_grid(ip.x as f64 / e2.dx + b2);
        }
    } else if e2.dx == 0.0 {
        ip.x = e2.bot.x;
        if e1.is_horizontal() {
            ip.y = e1.bot.y;
        } else {
            let b1 = e1.bot.y as f64 - (e1.bot.x as f64 / e1.dx);
            ip.y = round_to_grid(ip.x as f64 / e1.dx + b1);
        }
    } else {
        let b1 = e1.bot.x as f64 - e1.bot.y as f64 * e1.dx;
        let b2 = e2.bot.x as f64 - e2.bot.y as f64 * e2.dx;
        let q = (b2 - b1) / (e1.dx - e2.dx);
        ip.y = round_to_grid(q);
        ip.x = if e1.dx.abs() < e2.dx.abs() {
            round_to_grid(e1.dx * q + b1)
        } else {
            round_to_grid(e2.dx * q + b2)
        };
    }

    if ip.y < e1.top.y || ip.y < e2.top.y {
        ip.y = e1.top.y.max(e2.top.y);
        ip.x = if e1.dx.abs() < e2.dx.abs() {
            e1.top_x(ip.y)
        } else {
            e2.top_x(ip.y)
        };
    }
    if ip.y > e1.curr.y {
        ip.y = e1.curr.y;
        // The more vertical edge gives the better x.
        ip.x = if e1.dx.abs() > e2.dx.abs() {
            e2.top_x(ip.y)
        } else {
            e1.top_x(ip.y)
        };
    }
    ip
}

#[cfg(test)]
mod tests {
    use super::*;

    fn edge(bot: (i64, i64), top: (i64, i64)) -> Edge {
        let mut e = Edge::new(IntPoint::new(bot.0, bot.1), PathRole::Subject);
        e.top = IntPoint::new(top.0, top.1);
        e.set_dx();
        e
    }

    #[test]
    fn dx_and_top_x() {
        let e = edge((0, 10), (10, 0));
        assert!((e.dx + 1.0).abs() < 1e-12);
        assert_eq!(e.top_x(5), 5);
        assert_eq!(e.top_x(0), 10);
        assert!(edge((0, 0), (5, 0)).is_horizontal());
    }

    #[test]
    fn crossing_diagonals_meet_in_the_middle() {
        let e1 = edge((0, 10), (10, 0));
        let e2 = edge((10, 10), (0, 0));
        let ip = intersect_point(&e1, &e2);
        assert_eq!(ip, IntPoint::new(5, 5));
    }

    #[test]
    fn vertical_and_diagonal() {
        let e1 = edge((4, 10), (4, 0));
        let e2 = edge((0, 10), (10, 0));
        assert_eq!(intersect_point(&e1, &e2), IntPoint::new(4, 6));
    }

    #[test]
    fn intersection_is_clamped_to_scanbeam() {
        // The edges cross at y = 33, below the current scanline at y = 20.
        let mut e1 = edge((0, 100), (1, 0));
        let e2 = edge((2, 100), (0, 0));
        e1.curr = IntPoint::new(0, 20);
        let ip = intersect_point(&e1, &e2);
        assert_eq!(ip.y, 20);
    }

    #[test]
    fn insertion_order_uses_slope_on_ties() {
        let left = edge((5, 10), (0, 0));
        let right = edge((5, 10), (10, 0));
        assert!(e2_inserts_before_e1(&right, &left));
        assert!(!e2_inserts_before_e1(&left, &right));
    }

    #[test]
    fn reversing_horizontal_swaps_x_and_tags() {
        let mut e = Edge::new(IntPoint::tagged(0, 0, 1), PathRole::Clip);
        e.top = IntPoint::tagged(5, 0, 2);
        e.reverse_horizontal();
        assert_eq!(e.bot.x, 5);
        assert_eq!(e.top.x, 0);
        assert_eq!(e.bot.tag, 2);
    }
}
