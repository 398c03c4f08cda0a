use super::{IntPoint, Point2};

/// Where a point lies relative to a closed polygon.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointLocation {
    Outside,
    Inside,
    OnBoundary,
}

/// Computes the signed area of a polygon (shoelace formula).
///
/// Positive for counter-clockwise, negative for clockwise.
#[must_use]
pub fn signed_area_2d(points: &[Point2]) -> f64 {
    let n = points.len();
    if n < 3 {
        return 0.0;
    }
    let mut sum = 0.0;
    for i in 0..n {
        let j = (i + 1) % n;
        sum += points[i].x * points[j].y - points[j].x * points[i].y;
    }
    sum * 0.5
}

/// Signed area of a polygon on the integer grid, in squared grid units.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn signed_area_int(points: &[IntPoint]) -> f64 {
    let n = points.len();
    if n < 3 {
        return 0.0;
    }
    let mut sum = 0.0;
    let mut j = n - 1;
    for i in 0..n {
        sum += (points[j].x as f64 + points[i].x as f64) * (points[j].y as f64 - points[i].y as f64);
        j = i;
    }
    -sum * 0.5
}

/// Locates `pt` against a closed polygon on the integer grid.
///
/// Crossing-number test that reports points on an edge or vertex as
/// [`PointLocation::OnBoundary`] (Hormann & Agathos).
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn point_in_polygon_int(pt: IntPoint, path: &[IntPoint]) -> PointLocation {
    let cnt = path.len();
    if cnt < 3 {
        return PointLocation::Outside;
    }
    let mut inside = false;
    let mut ip = path[0];
    for i in 1..=cnt {
        let ip_next = if i == cnt { path[0] } else { path[i] };
        if ip_next.y == pt.y
            && (ip_next.x == pt.x || (ip.y == pt.y && ((ip_next.x > pt.x) == (ip.x < pt.x))))
        {
            return PointLocation::OnBoundary;
        }
        if (ip.y < pt.y) != (ip_next.y < pt.y) {
            if ip.x >= pt.x {
                if ip_next.x > pt.x {
                    inside = !inside;
                } else {
                    let d = (ip.x - pt.x) as f64 * (ip_next.y - pt.y) as f64
                        - (ip_next.x - pt.x) as f64 * (ip.y - pt.y) as f64;
                    if d == 0.0 {
                        return PointLocation::OnBoundary;
                    }
                    if (d > 0.0) == (ip_next.y > ip.y) {
                        inside = !inside;
                    }
                }
            } else if ip_next.x > pt.x {
                let d = (ip.x - pt.x) as f64 * (ip_next.y - pt.y) as f64
                    - (ip_next.x - pt.x) as f64 * (ip.y - pt.y) as f64;
                if d == 0.0 {
                    return PointLocation::OnBoundary;
                }
                if (d > 0.0) == (ip_next.y > ip.y) {
                    inside = !inside;
                }
            }
        }
        ip = ip_next;
    }
    if inside {
        PointLocation::Inside
    } else {
        PointLocation::Outside
    }
}

/// Locates `pt` against a closed polygon in floating-point coordinates.
///
/// Same crossing-number rule as [`point_in_polygon_int`]; boundary detection
/// uses exact comparisons.
#[must_use]
#[allow(clippy::float_cmp)]
pub fn point_in_polygon_2d(pt: Point2, path: &[Point2]) -> PointLocation {
    let cnt = path.len();
    if cnt < 3 {
        return PointLocation::Outside;
    }
    let mut inside = false;
    let mut ip = path[0];
    for i in 1..=cnt {
        let ip_next = if i == cnt { path[0] } else { path[i] };
        if ip_next.y == pt.y
            && (ip_next.x == pt.x || (ip.y == pt.y && ((ip_next.x > pt.x) == (ip.x < pt.x))))
        {
            return PointLocation::OnBoundary;
        }
        if (ip.y < pt.y) != (ip_next.y < pt.y) {
            let crosses = if ip.x >= pt.x && ip_next.x > pt.x {
                Some(true)
            } else if ip.x >= pt.x || ip_next.x > pt.x {
                let d = (ip.x - pt.x) * (ip_next.y - pt.y) - (ip_next.x - pt.x) * (ip.y - pt.y);
                if d == 0.0 {
                    return PointLocation::OnBoundary;
                }
                Some((d > 0.0) == (ip_next.y > ip.y))
            } else {
                None
            };
            if crosses == Some(true) {
                inside = !inside;
            }
        }
        ip = ip_next;
    }
    if inside {
        PointLocation::Inside
    } else {
        PointLocation::Outside
    }
}

/// `true` when `inner` lies inside `outer`.
///
/// The first vertex of `inner` off the boundary of `outer` decides. When
/// every vertex touches the boundary, the edge midpoints of `inner` decide
/// instead; a polygon whose edges all run along the other's boundary counts
/// as inside.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn polygon_contains(outer: &[IntPoint], inner: &[IntPoint]) -> bool {
    for &pt in inner {
        match point_in_polygon_int(pt, outer) {
            PointLocation::Inside => return true,
            PointLocation::Outside => return false,
            PointLocation::OnBoundary => {}
        }
    }

    let Some(&last) = inner.last() else {
        return true;
    };
    let outer_2d: Vec<Point2> = outer
        .iter()
        .map(|p| Point2::new(p.x as f64, p.y as f64))
        .collect();
    let mut prev = last;
    for &pt in inner {
        let mid = Point2::new(
            (prev.x as f64 + pt.x as f64) * 0.5,
            (prev.y as f64 + pt.y as f64) * 0.5,
        );
        match point_in_polygon_2d(mid, &outer_2d) {
            PointLocation::Inside => return true,
            PointLocation::Outside => return false,
            PointLocation::OnBoundary => {}
        }
        prev = pt;
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::TOLERANCE;

    fn int_square(size: i64) -> Vec<IntPoint> {
        vec![
            IntPoint::new(0, 0),
            IntPoint::new(size, 0),
            IntPoint::new(size, size),
            IntPoint::new(0, size),
        ]
    }

    #[test]
    fn signed_area_ccw_square() {
        let pts = vec![
            Point2::new(0.0, 0.0),
            Point2::new(1.0, 0.0),
            Point2::new(1.0, 1.0),
            Point2::new(0.0, 1.0),
        ];
        assert!((signed_area_2d(&pts) - 1.0).abs() < TOLERANCE);
    }

    #[test]
    fn signed_area_cw_square() {
        let pts = vec![
            Point2::new(0.0, 0.0),
            Point2::new(0.0, 1.0),
            Point2::new(1.0, 1.0),
            Point2::new(1.0, 0.0),
        ];
        assert!((signed_area_2d(&pts) + 1.0).abs() < TOLERANCE);
    }

    #[test]
    fn signed_area_degenerate() {
        assert!(signed_area_2d(&[Point2::new(0.0, 0.0)]).abs() < TOLERANCE);
        assert!(signed_area_2d(&[]).abs() < TOLERANCE);
        assert!(signed_area_int(&[IntPoint::new(0, 0), IntPoint::new(3, 3)]).abs() < TOLERANCE);
    }

    #[test]
    fn int_area_matches_float_area() {
        let sq = int_square(10);
        assert!((signed_area_int(&sq) - 100.0).abs() < TOLERANCE);
        let rev: Vec<_> = sq.into_iter().rev().collect();
        assert!((signed_area_int(&rev) + 100.0).abs() < TOLERANCE);
    }

    #[test]
    fn point_location_classifies_all_cases() {
        let sq = int_square(10);
        assert_eq!(point_in_polygon_int(IntPoint::new(5, 5), &sq), PointLocation::Inside);
        assert_eq!(point_in_polygon_int(IntPoint::new(15, 5), &sq), PointLocation::Outside);
        assert_eq!(point_in_polygon_int(IntPoint::new(10, 5), &sq), PointLocation::OnBoundary);
        assert_eq!(point_in_polygon_int(IntPoint::new(0, 0), &sq), PointLocation::OnBoundary);
        assert_eq!(point_in_polygon_int(IntPoint::new(5, 0), &sq), PointLocation::OnBoundary);
    }

    #[test]
    fn containment_skips_shared_boundary_points() {
        let outer = int_square(10);
        let inner = vec![
            IntPoint::new(0, 0),
            IntPoint::new(5, 0),
            IntPoint::new(5, 5),
            IntPoint::new(0, 5),
        ];
        assert!(polygon_contains(&outer, &inner));
        assert!(!polygon_contains(&inner, &outer));
    }

    #[test]
    fn containment_of_boundary_vertices_uses_edge_midpoints() {
        // Every vertex of the triangle lies on the outer ring, which wraps
        // around it through a spike along y = 10.
        let outer = vec![
            IntPoint::new(20, 10),
            IntPoint::new(22, 15),
            IntPoint::new(15, 20),
            IntPoint::new(18, 14),
            IntPoint::new(20, 10),
            IntPoint::new(10, 10),
        ];
        let inner = vec![
            IntPoint::new(18, 14),
            IntPoint::new(10, 10),
            IntPoint::new(15, 20),
        ];
        assert!(!polygon_contains(&outer, &inner));

        let sq = int_square(10);
        assert!(polygon_contains(&sq, &sq));
    }

    #[test]
    fn float_point_location_matches_grid_version() {
        let sq = [
            Point2::new(0.0, 0.0),
            Point2::new(1.0, 0.0),
            Point2::new(1.0, 1.0),
            Point2::new(0.0, 1.0),
        ];
        assert_eq!(point_in_polygon_2d(Point2::new(0.5, 0.5), &sq), PointLocation::Inside);
        assert_eq!(point_in_polygon_2d(Point2::new(1.5, 0.5), &sq), PointLocation::Outside);
        assert_eq!(point_in_polygon_2d(Point2::new(1.0, 0.25), &sq), PointLocation::OnBoundary);
    }
}
