use crate::geometry::{Path, Point};
use crate::math::polygon_2d::{point_in_polygon_2d, PointLocation};
use crate::math::Point2;

/// Locates `pt` against the closed contour of `path`.
///
/// The path is treated as closed regardless of its flag.
#[must_use]
pub fn point_in_polygon(pt: Point, path: &Path) -> PointLocation {
    let pts: Vec<Point2> = path.points.iter().map(|p| p.to_point2()).collect();
    point_in_polygon_2d(pt.to_point2(), &pts)
}
