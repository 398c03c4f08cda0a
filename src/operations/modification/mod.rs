mod clean;
mod reverse;

pub use clean::CleanPolygon;
pub use reverse::ReversePaths;
