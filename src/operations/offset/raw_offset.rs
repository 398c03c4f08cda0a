use std::f64::consts::{PI, TAU};

use crate::math::{Point2, Vector2};

use super::style::{EndStyle, JoinStyle};

/// Automatic arc tolerance as a fraction of `|distance|`.
const AUTO_ARC_RATIO: f64 = 0.002;

/// Largest arc tolerance accepted, as a fraction of `|distance|`.
const MAX_ARC_RATIO: f64 = 0.25;

/// Unit right-hand normal of `a -> b`; zero for coincident points.
fn unit_normal(a: Point2, b: Point2) -> Vector2 {
    let d = b - a;
    let len = d.norm();
    if len <= 0.0 {
        return Vector2::zeros();
    }
    Vector2::new(d.y, -d.x) / len
}

/// Parameters shared by every path of one offset run.
#[derive(Debug, Clone, Copy)]
pub(super) struct RawOffset {
    delta: f64,
    /// Turns displacing the corner by less than this count as straight.
    straight_eps: f64,
    /// Squared-cosine bound below which a miter falls back to square.
    miter_lim: f64,
    circle_steps: f64,
    steps_per_rad: f64,
    step_sin: f64,
    step_cos: f64,
}

impl RawOffset {
    /// `grid_unit` is the size of one integer grid step in caller units.
    pub(super) fn new(delta: f64, miter_limit: f64, arc_tolerance: f64, grid_unit: f64) -> Self {
        let abs = delta.abs();
        let miter_lim = if miter_limit > 2.0 {
            2.0 / (miter_limit * miter_limit)
        } else {
            0.5
        };
        let tolerance = if arc_tolerance <= 0.0 {
            abs * AUTO_ARC_RATIO
        } else {
            arc_tolerance.min(abs * MAX_ARC_RATIO)
        };
        let mut circle_steps = PI / (1.0 - tolerance / abs).acos();
        // One vertex per grid step of circumference is the useful maximum.
        circle_steps = circle_steps.min(abs / grid_unit * PI).max(4.0);
        let step = TAU / circle_steps;
        let step_sin = if delta < 0.0 { -step.sin() } else { step.sin() };
        Self {
            delta,
            straight_eps: grid_unit,
            miter_lim,
            circle_steps,
            steps_per_rad: circle_steps / TAU,
            step_sin,
            step_cos: step.cos(),
        }
    }

    /// Builds the unresolved offset contours of one path.
    ///
    /// The input must be free of consecutive duplicates and oriented: closed
    /// polygons counter-clockwise for outers, closed lines counter-clockwise.
    /// The result may self-overlap near concave corners.
    pub(super) fn build(&self, src: &[Point2], join: JoinStyle, end: EndStyle) -> Vec<Vec<Point2>> {
        let len = src.len();
        if len == 0 || (self.delta <= 0.0 && (len < 3 || end != EndStyle::ClosedPolygon)) {
            return Vec::new();
        }
        if len == 1 {
            return vec![self.dot(src[0], join)];
        }

        let mut normals: Vec<Vector2> = src.windows(2).map(|w| unit_normal(w[0], w[1])).collect();
        if end.is_closed() {
            normals.push(unit_normal(src[len - 1], src[0]));
        } else {
            normals.push(normals[len - 2]);
        }
        let mut tracer = Tracer {
            params: self,
            src,
            normals,
            dest: Vec::with_capacity(len * 2),
            sin_a: 0.0,
            join,
        };

        match end {
            EndStyle::ClosedPolygon => {
                let mut k = len - 1;
                for j in 0..len {
                    k = tracer.offset_point(j, k);
                }
                vec![tracer.take()]
            }
            EndStyle::ClosedLine => {
                let mut k = len - 1;
                for j in 0..len {
                    k = tracer.offset_point(j, k);
                }
                let outer = tracer.take();

                // Walk back along the other side.
                let last = tracer.normals[len - 1];
                for j in (1..len).rev() {
                    tracer.normals[j] = -tracer.normals[j - 1];
                }
                tracer.normals[0] = -last;
                let mut k = 0;
                for j in (0..len).rev() {
                    k = tracer.offset_point(j, k);
                }
                vec![outer, tracer.take()]
            }
            EndStyle::OpenButt | EndStyle::OpenSquare | EndStyle::OpenRound => {
                let mut k = 0;
                for j in 1..len - 1 {
                    k = tracer.offset_point(j, k);
                }
                tracer.cap(len - 1, len - 2, end);

                for j in (1..len).rev() {
                    tracer.normals[j] = -tracer.normals[j - 1];
                }
                tracer.normals[0] = -tracer.normals[1];
                let mut k = len - 1;
                for j in (1..len - 1).rev() {
                    k = tracer.offset_point(j, k);
                }
                tracer.cap(0, 1, end);
                vec![tracer.take()]
            }
        }
    }

    /// Offset of an isolated point: a circle for round joins, a square
    /// otherwise.
    fn dot(&self, pt: Point2, join: JoinStyle) -> Vec<Point2> {
        let d = self.delta;
        if join == JoinStyle::Round {
            let mut v = Vector2::new(1.0, 0.0);
            let mut out = Vec::new();
            let mut i = 1.0;
            while i <= self.circle_steps {
                out.push(pt + v * d);
                v = self.rotate(v);
                i += 1.0;
            }
            out
        } else {
            [(-1.0, -1.0), (1.0, -1.0), (1.0, 1.0), (-1.0, 1.0)]
                .iter()
                .map(|&(x, y)| pt + Vector2::new(x, y) * d)
                .collect()
        }
    }

    fn rotate(&self, v: Vector2) -> Vector2 {
        Vector2::new(
            v.x * self.step_cos - self.step_sin * v.y,
            v.x * self.step_sin + v.y * self.step_cos,
        )
    }
}

/// Per-path state while walking the vertices.
struct Tracer<'a> {
    params: &'a RawOffset,
    src: &'a [Point2],
    normals: Vec<Vector2>,
    dest: Vec<Point2>,
    /// Sine of the turn at the current vertex.
    sin_a: f64,
    join: JoinStyle,
}

impl Tracer<'_> {
    fn take(&mut self) -> Vec<Point2> {
        std::mem::take(&mut self.dest)
    }

    /// Emits the offset vertices at `src[j]`, coming from edge `k`.
    /// Returns `j`, the incoming edge of the next vertex.
    fn offset_point(&mut self, j: usize, k: usize) -> usize {
        let (nk, nj) = (self.normals[k], self.normals[j]);
        let delta = self.params.delta;
        let pt = self.src[j];
        self.sin_a = nk.perp(&nj);
        if (self.sin_a * delta).abs() < self.params.straight_eps {
            if nk.dot(&nj) > 0.0 {
                self.dest.push(pt + nk * delta);
                return j;
            }
            // Otherwise a full reversal, joined like any sharp turn.
        } else {
            self.sin_a = self.sin_a.clamp(-1.0, 1.0);
        }

        if self.sin_a * delta < 0.0 {
            // Concave side: the loop this creates is removed by the union.
            self.dest.push(pt + nk * delta);
            self.dest.push(pt);
            self.dest.push(pt + nj * delta);
        } else {
            match self.join {
                JoinStyle::Miter => {
                    let r = 1.0 + nj.dot(&nk);
                    if r >= self.params.miter_lim {
                        self.miter(j, k, r);
                    } else {
                        self.square(j, k);
                    }
                }
                JoinStyle::Square => self.square(j, k),
                JoinStyle::Round => self.round(j, k),
            }
        }
        j
    }

    /// End cap at `src[j]`, with `k` the adjacent edge.
    fn cap(&mut self, j: usize, k: usize, end: EndStyle) {
        let delta = self.params.delta;
        let pt = self.src[j];
        if end == EndStyle::OpenButt {
            let n = if j == 0 { -self.normals[j] } else { self.normals[j] };
            self.dest.push(pt + n * delta);
            self.dest.push(pt - n * delta);
            return;
        }
        self.sin_a = 0.0;
        if j != 0 {
            self.normals[j] = -self.normals[j];
        }
        if end == EndStyle::OpenSquare {
            self.square(j, k);
        } else {
            self.round(j, k);
        }
    }

    /// Two vertices along the half-angle tangent. At right angles and
    /// sharper turns they coincide in the exact square corner; wider turns
    /// are cut off at `|delta|` beyond the edge ends.
    fn square(&mut self, j: usize, k: usize) {
        let (nk, nj) = (self.normals[k], self.normals[j]);
        let delta = self.params.delta;
        let pt = self.src[j];
        let a = self.sin_a.atan2(nk.dot(&nj));
        let dx = (a / 2.0).tan().clamp(-1.0, 1.0);
        self.dest
            .push(pt + Vector2::new(nk.x - nk.y * dx, nk.y + nk.x * dx) * delta);
        self.dest
            .push(pt + Vector2::new(nj.x + nj.y * dx, nj.y - nj.x * dx) * delta);
    }

    fn miter(&mut self, j: usize, k: usize, r: f64) {
        let q = self.params.delta / r;
        let v = (self.normals[k] + self.normals[j]) * q;
        self.dest.push(self.src[j] + v);
    }

    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    fn round(&mut self, j: usize, k: usize) {
        let (nk, nj) = (self.normals[k], self.normals[j]);
        let delta = self.params.delta;
        let pt = self.src[j];
        let a = self.sin_a.atan2(nk.dot(&nj));
        let steps = ((self.params.steps_per_rad * a.abs()).round() as usize).max(1);
        let mut v = nk;
        for _ in 0..steps {
            self.dest.push(pt + v * delta);
            v = self.params.rotate(v);
        }
        self.dest.push(pt + nj * delta);
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;
    use crate::math::polygon_2d::signed_area_2d;

    fn unit_square() -> Vec<Point2> {
        vec![
            Point2::new(0.0, 0.0),
            Point2::new(1.0, 0.0),
            Point2::new(1.0, 1.0),
            Point2::new(0.0, 1.0),
        ]
    }

    #[test]
    fn normals_point_right_of_travel() {
        let n = unit_normal(Point2::new(0.0, 0.0), Point2::new(2.0, 0.0));
        assert_relative_eq!(n, Vector2::new(0.0, -1.0));
        assert_eq!(unit_normal(Point2::new(1.0, 1.0), Point2::new(1.0, 1.0)), Vector2::zeros());
    }

    #[test]
    fn square_join_meets_in_the_corner() {
        let raw = RawOffset::new(0.1, 2.0, 0.0, 1e-4);
        let rings = raw.build(&unit_square(), JoinStyle::Square, EndStyle::ClosedPolygon);
        assert_eq!(rings.len(), 1);
        assert_relative_eq!(signed_area_2d(&rings[0]), 1.44, epsilon = 1e-12);
    }

    #[test]
    fn miter_join_on_right_angle() {
        let raw = RawOffset::new(0.5, 2.0, 0.0, 1e-4);
        let rings = raw.build(&unit_square(), JoinStyle::Miter, EndStyle::ClosedPolygon);
        assert_eq!(rings[0].len(), 4);
        assert_relative_eq!(rings[0][0], Point2::new(-0.5, -0.5), epsilon = 1e-12);
    }

    #[test]
    fn round_join_approximates_quarter_circles() {
        let raw = RawOffset::new(0.1, 2.0, 0.0, 1e-4);
        let rings = raw.build(&unit_square(), JoinStyle::Round, EndStyle::ClosedPolygon);
        let expected = 1.0 + 4.0 * 0.1 + PI * 0.01;
        assert_relative_eq!(signed_area_2d(&rings[0]), expected, epsilon = 1e-3);
    }

    #[test]
    fn negative_distance_skips_open_paths() {
        let raw = RawOffset::new(-0.1, 2.0, 0.0, 1e-4);
        let line = [Point2::new(0.0, 0.0), Point2::new(1.0, 0.0)];
        assert!(raw.build(&line, JoinStyle::Round, EndStyle::OpenRound).is_empty());
    }

    #[test]
    fn butt_line_becomes_rectangle() {
        let raw = RawOffset::new(0.5, 2.0, 0.0, 1e-4);
        let line = [Point2::new(0.0, 0.0), Point2::new(4.0, 0.0)];
        let rings = raw.build(&line, JoinStyle::Square, EndStyle::OpenButt);
        assert_eq!(rings[0].len(), 4);
        assert_relative_eq!(signed_area_2d(&rings[0]).abs(), 4.0, epsilon = 1e-12);
    }

    #[test]
    fn square_cap_extends_past_the_ends() {
        let raw = RawOffset::new(0.5, 2.0, 0.0, 1e-4);
        let line = [Point2::new(0.0, 0.0), Point2::new(4.0, 0.0)];
        let rings = raw.build(&line, JoinStyle::Square, EndStyle::OpenSquare);
        assert_relative_eq!(signed_area_2d(&rings[0]).abs(), 5.0, epsilon = 1e-9);
    }

    #[test]
    fn single_point_becomes_square_or_circle() {
        let raw = RawOffset::new(1.0, 2.0, 0.0, 1e-4);
        let pt = [Point2::new(3.0, 3.0)];
        let square = raw.build(&pt, JoinStyle::Square, EndStyle::OpenButt);
        assert_relative_eq!(signed_area_2d(&square[0]), 4.0, epsilon = 1e-12);
        let circle = raw.build(&pt, JoinStyle::Round, EndStyle::OpenRound);
        assert_relative_eq!(signed_area_2d(&circle[0]), PI, epsilon = 0.02);
    }
}
