use super::edge::EdgeId;
use super::select::{BoolOp, FillRule};
use super::sweep::SweepSession;

impl SweepSession {
    /// Derives both winding counts of a freshly inserted edge from its
    /// left neighbours in the active list.
    pub(super) fn set_winding_count(&mut self, edge: EdgeId) {
        let (role, wind_delta) = (self.edges[edge].role, self.edges[edge].wind_delta);
        let (own_fill, other_fill) = self.fills.for_role(role);

        // Nearest closed edge of the same role to the left.
        let mut e = self.edges[edge].prev_in_ael;
        while let Some(id) = e {
            let prev = &self.edges[id];
            if prev.role == role && prev.wind_delta != 0 {
                break;
            }
            e = prev.prev_in_ael;
        }

        let (wind_cnt, mut wind_cnt2, mut cursor) = match e {
            None => {
                let wc = if wind_delta != 0 {
                    wind_delta
                } else if own_fill == FillRule::Negative {
                    -1
                } else {
                    1
                };
                (wc, 0, self.active_edges)
            }
            Some(id) if wind_delta == 0 && self.op != BoolOp::Union => {
                (1, self.edges[id].wind_cnt2, self.edges[id].next_in_ael)
            }
            Some(id) if own_fill == FillRule::EvenOdd => {
                let wc = if wind_delta == 0 {
                    // Inside a subject polygon when an odd number of its
                    // closed edges lie to the left.
                    let mut inside = true;
                    let mut e2 = self.edges[id].prev_in_ael;
                    while let Some(id2) = e2 {
                        let other = &self.edges[id2];
                        if other.role == self.edges[id].role && other.wind_delta != 0 {
                            inside = !inside;
                        }
                        e2 = other.prev_in_ael;
                    }
                    i32::from(!inside)
                } else {
                    wind_delta
                };
                (wc, self.edges[id].wind_cnt2, self.edges[id].next_in_ael)
            }
            Some(id) => {
                let prev = &self.edges[id];
                let wc = if prev.wind_cnt * prev.wind_delta < 0 {
                    // Leaving the previous polygon.
                    if prev.wind_cnt.abs() > 1 {
                        if prev.wind_delta * wind_delta < 0 {
                            prev.wind_cnt
                        } else {
                            prev.wind_cnt + wind_delta
                        }
                    } else if wind_delta == 0 {
                        1
                    } else {
                        wind_delta
                    }
                } else if wind_delta == 0 {
                    if prev.wind_cnt < 0 {
                        prev.wind_cnt - 1
                    } else {
                        prev.wind_cnt + 1
                    }
                } else if prev.wind_delta * wind_delta < 0 {
                    prev.wind_cnt
                } else {
                    prev.wind_cnt + wind_delta
                };
                (wc, prev.wind_cnt2, prev.next_in_ael)
            }
        };

        // Edges of the other role between `cursor` and `edge`.
        while let Some(id) = cursor {
            if id == edge {
                break;
            }
            let other = &self.edges[id];
            if other_fill == FillRule::EvenOdd {
                if other.wind_delta != 0 {
                    wind_cnt2 = i32::from(wind_cnt2 == 0);
                }
            } else {
                wind_cnt2 += other.wind_delta;
            }
            cursor = other.next_in_ael;
        }

        let target = &mut self.edges[edge];
        target.wind_cnt = wind_cnt;
        target.wind_cnt2 = wind_cnt2;
    }
}
