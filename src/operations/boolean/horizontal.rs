use crate::math::int_point::horz_segments_overlap;
use crate::math::IntPoint;

use super::edge::EdgeId;
use super::output::OutPtId;
use super::sweep::{EdgeList, SweepSession};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Direction {
    LeftToRight,
    RightToLeft,
}

/// Travel direction and x extent of a horizontal edge.
fn horz_direction(bot_x: i64, top_x: i64) -> (Direction, i64, i64) {
    if bot_x < top_x {
        (Direction::LeftToRight, bot_x, top_x)
    } else {
        (Direction::RightToLeft, top_x, bot_x)
    }
}

/// Position in the sorted maxima list, walked in the horizontal's direction.
struct MaximaCursor {
    dir: Direction,
    /// Next index when walking right; one past the next index when walking left.
    pos: usize,
    end: bool,
}

impl SweepSession {
    /// Drains the sorted-edge list, processing each horizontal.
    pub(super) fn process_horizontals(&mut self) {
        while let Some(horz) = self.pop_edge_from_sel() {
            self.process_horizontal(horz);
        }
    }

    fn next_in_dir(&self, e: EdgeId, dir: Direction) -> Option<EdgeId> {
        match dir {
            Direction::LeftToRight => self.edges[e].next_in_ael,
            Direction::RightToLeft => self.edges[e].prev_in_ael,
        }
    }

    /// First recorded maximum strictly inside the span of the horizontal run.
    fn maxima_cursor(&self, dir: Direction, bot_x: i64, last_top_x: i64) -> MaximaCursor {
        match dir {
            Direction::LeftToRight => {
                let pos = self.maxima.partition_point(|&x| x <= bot_x);
                let end = pos == self.maxima.len() || self.maxima[pos] >= last_top_x;
                MaximaCursor { dir, pos, end }
            }
            Direction::RightToLeft => {
                let pos = self.maxima.partition_point(|&x| x <= bot_x);
                let end = pos == 0 || self.maxima[pos - 1] <= last_top_x;
                MaximaCursor { dir, pos, end }
            }
        }
    }

    /// Adds a vertex on the horizontal at every maximum passed before `x`.
    fn add_maxima_before(&mut self, cursor: &mut MaximaCursor, horz: EdgeId, x: i64, emit: bool) {
        if cursor.end {
            return;
        }
        let y = self.edges[horz].bot.y;
        match cursor.dir {
            Direction::LeftToRight => {
                while cursor.pos < self.maxima.len() && self.maxima[cursor.pos] < x {
                    if emit {
                        let mx = self.maxima[cursor.pos];
                        self.add_out_pt(horz, IntPoint::new(mx, y));
                    }
                    cursor.pos += 1;
                }
            }
            Direction::RightToLeft => {
                while cursor.pos > 0 && self.maxima[cursor.pos - 1] > x {
                    if emit {
                        let mx = self.maxima[cursor.pos - 1];
                        self.add_out_pt(horz, IntPoint::new(mx, y));
                    }
                    cursor.pos -= 1;
                }
            }
        }
    }

    /// Joins `op` with the last point of every pending horizontal that
    /// overlaps `horz`.
    fn join_overlapping_horizontals(&mut self, horz: EdgeId, op: OutPtId) {
        let (bot_x, top_x) = (self.edges[horz].bot.x, self.edges[horz].top.x);
        let mut next = self.sorted_edges;
        while let Some(other) = next {
            let o = &self.edges[other];
            if o.out.is_assigned() && horz_segments_overlap(bot_x, top_x, o.bot.x, o.top.x) {
                let off = o.top;
                if let Some(op2) = self.last_out_pt(other) {
                    self.add_join(op2, op, off);
                }
            }
            next = self.edges[other].next_in_sel;
        }
    }

    /// Sweeps a horizontal (and any horizontals continuing its bound) across
    /// the edges it spans, intersecting each one.
    fn process_horizontal(&mut self, mut horz: EdgeId) {
        let is_open = self.edges[horz].wind_delta == 0;
        let (mut dir, mut horz_left, mut horz_right) =
            horz_direction(self.edges[horz].bot.x, self.edges[horz].top.x);

        let mut last_horz = horz;
        while let Some(next) = self.edges[last_horz].next_in_lml {
            if !self.edges[next].is_horizontal() {
                break;
            }
            last_horz = next;
        }
        let max_pair = if self.edges[last_horz].next_in_lml.is_none() {
            self.maxima_pair(last_horz)
        } else {
            None
        };

        let mut cursor = self.maxima_cursor(dir, self.edges[horz].bot.x, self.edges[last_horz].top.x);
        let mut op1: Option<OutPtId> = None;

        loop {
            let is_last_horz = horz == last_horz;
            let mut e = self.next_in_dir(horz, dir);
            while let Some(id) = e {
                // Vertices where maxima touch the horizontal.
                let emit = self.edges[horz].out.is_assigned() && !is_open;
                let curr_x = self.edges[id].curr.x;
                self.add_maxima_before(&mut cursor, horz, curr_x, emit);

                if (dir == Direction::LeftToRight && curr_x > horz_right)
                    || (dir == Direction::RightToLeft && curr_x < horz_left)
                {
                    break;
                }

                // End of an intermediate horizontal: smaller dx lies to the
                // right above it.
                if curr_x == self.edges[horz].top.x {
                    if let Some(next) = self.edges[horz].next_in_lml {
                        if self.edges[id].dx < self.edges[next].dx {
                            break;
                        }
                    }
                }

                if self.edges[horz].out.is_assigned() && !is_open {
                    let mut at = self.edges[id].curr;
                    match dir {
                        Direction::LeftToRight => self.assign_tag(horz, id, &mut at),
                        Direction::RightToLeft => self.assign_tag(id, horz, &mut at),
                    }
                    self.edges[id].curr.tag = at.tag;
                    let op = self.add_out_pt(horz, at);
                    op1 = Some(op);
                    self.join_overlapping_horizontals(horz, op);
                    let bot = self.edges[horz].bot;
                    self.add_ghost_join(op, bot);
                }

                if Some(id) == max_pair && is_last_horz {
                    if self.edges[horz].out.is_assigned() {
                        let top = self.edges[horz].top;
                        self.add_local_max_poly(horz, id, top);
                    }
                    self.delete_from_list(EdgeList::Active, horz);
                    self.delete_from_list(EdgeList::Active, id);
                    return;
                }

                let pt = IntPoint::new(curr_x, self.edges[horz].curr.y);
                match dir {
                    Direction::LeftToRight => self.intersect_edges(horz, id, pt),
                    Direction::RightToLeft => self.intersect_edges(id, horz, pt),
                }
                let next = self.next_in_dir(id, dir);
                self.swap_positions_in_list(EdgeList::Active, horz, id);
                e = next;
            }

            match self.edges[horz].next_in_lml {
                Some(next) if self.edges[next].is_horizontal() => {}
                _ => break,
            }
            horz = self.update_edge_into_ael(horz);
            if self.edges[horz].out.is_assigned() {
                self.add_out_pt(horz, self.edges[horz].bot);
            }
            (dir, horz_left, horz_right) =
                horz_direction(self.edges[horz].bot.x, self.edges[horz].top.x);
        }

        if self.edges[horz].out.is_assigned() && op1.is_none() {
            if let Some(op) = self.last_out_pt(horz) {
                self.join_overlapping_horizontals(horz, op);
                let top = self.edges[horz].top;
                self.add_ghost_join(op, top);
            }
        }

        if self.edges[horz].next_in_lml.is_some() {
            if self.edges[horz].out.is_assigned() {
                let op = self.add_out_pt(horz, self.edges[horz].top);
                horz = self.update_edge_into_ael(horz);
                self.join_collinear_neighbour(horz, op);
            } else {
                self.update_edge_into_ael(horz);
            }
        } else {
            if self.edges[horz].out.is_assigned() {
                self.add_out_pt(horz, self.edges[horz].top);
            }
            self.delete_from_list(EdgeList::Active, horz);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn direction_follows_bot_to_top() {
        assert_eq!(horz_direction(0, 5), (Direction::LeftToRight, 0, 5));
        assert_eq!(horz_direction(5, 0), (Direction::RightToLeft, 0, 5));
    }
}
