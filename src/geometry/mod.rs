pub mod contour_tree;
pub mod path;

pub use contour_tree::{ContourId, ContourNode, ContourTree};
pub use path::{Bounds, Path, Point};
