use crate::geometry::Path;
use crate::math::polygon_2d::signed_area_2d;
use crate::math::Point2;

/// Signed area of a closed path: positive when counter-clockwise.
///
/// Open paths enclose nothing and return zero.
#[must_use]
pub fn signed_area(path: &Path) -> f64 {
    if !path.closed {
        return 0.0;
    }
    let pts: Vec<Point2> = path.points.iter().map(|p| p.to_point2()).collect();
    signed_area_2d(&pts)
}

/// `true` for counter-clockwise (non-negative area) paths, the orientation
/// of outer contours in clipping results.
#[must_use]
pub fn orientation(path: &Path) -> bool {
    signed_area(path) >= 0.0
}

/// Sum of the signed areas of several paths; holes subtract.
#[must_use]
pub fn total_area<'a>(paths: impl IntoIterator<Item = &'a Path>) -> f64 {
    paths.into_iter().map(signed_area).sum()
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    #[test]
    fn counter_clockwise_is_positive() {
        let sq = Path::polygon(&[(0.0, 0.0), (2.0, 0.0), (2.0, 2.0), (0.0, 2.0)]);
        assert_relative_eq!(signed_area(&sq), 4.0);
        assert!(orientation(&sq));
        assert!(!orientation(&sq.reversed()));
    }

    #[test]
    fn holes_subtract_from_total() {
        let outer = Path::polygon(&[(0.0, 0.0), (4.0, 0.0), (4.0, 4.0), (0.0, 4.0)]);
        let hole = Path::polygon(&[(1.0, 1.0), (1.0, 2.0), (2.0, 2.0), (2.0, 1.0)]);
        assert_relative_eq!(total_area([&outer, &hole]), 15.0);
    }

    #[test]
    fn open_path_has_no_area() {
        let line = Path::polyline(&[(0.0, 0.0), (1.0, 0.0), (1.0, 1.0)]);
        assert_relative_eq!(signed_area(&line), 0.0);
    }
}
