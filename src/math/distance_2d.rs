use super::IntPoint;

/// Squared distance between two grid points.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn distance_sq(a: IntPoint, b: IntPoint) -> f64 {
    let dx = a.x as f64 - b.x as f64;
    let dy = a.y as f64 - b.y as f64;
    dx * dx + dy * dy
}

/// Squared distance from `pt` to the infinite line through `ln1` and `ln2`.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn distance_from_line_sq(pt: IntPoint, ln1: IntPoint, ln2: IntPoint) -> f64 {
    // Line in general form: Ax + By + C = 0.
    let a = (ln1.y - ln2.y) as f64;
    let b = (ln2.x - ln1.x) as f64;
    let c = a * ln1.x as f64 + b * ln1.y as f64;
    let c = a * pt.x as f64 + b * pt.y as f64 - c;
    let denom = a * a + b * b;
    if denom == 0.0 {
        return distance_sq(pt, ln1);
    }
    (c * c) / denom
}

/// `true` when `a` and `b` are within `sqrt(dist_sq)` of each other.
#[must_use]
pub fn points_are_close(a: IntPoint, b: IntPoint, dist_sq: f64) -> bool {
    distance_sq(a, b) <= dist_sq
}

/// `true` when the three points are within `sqrt(dist_sq)` of a common line.
///
/// The point geometrically between the other two is the one measured, which
/// also catches spikes that double back.
#[must_use]
pub fn slopes_near_collinear(p1: IntPoint, p2: IntPoint, p3: IntPoint, dist_sq: f64) -> bool {
    if (p1.x - p2.x).abs() > (p1.y - p2.y).abs() {
        if (p1.x > p2.x) == (p1.x < p3.x) {
            distance_from_line_sq(p1, p2, p3) < dist_sq
        } else if (p2.x > p1.x) == (p2.x < p3.x) {
            distance_from_line_sq(p2, p1, p3) < dist_sq
        } else {
            distance_from_line_sq(p3, p1, p2) < dist_sq
        }
    } else if (p1.y > p2.y) == (p1.y < p3.y) {
        distance_from_line_sq(p1, p2, p3) < dist_sq
    } else if (p2.y > p1.y) == (p2.y < p3.y) {
        distance_from_line_sq(p2, p1, p3) < dist_sq
    } else {
        distance_from_line_sq(p3, p1, p2) < dist_sq
    }
}
