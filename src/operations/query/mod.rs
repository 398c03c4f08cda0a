mod area;
mod bounding_box;
mod containment;

pub use crate::math::polygon_2d::PointLocation;
pub use area::{orientation, signed_area, total_area};
pub use bounding_box::path_bounds;
pub use containment::point_in_polygon;
