pub mod distance_2d;
pub mod fixed_point;
pub mod int_point;
pub mod polygon_2d;

pub use fixed_point::Scale;
pub use int_point::IntPoint;

/// 2D point type used on the floating-point surface.
pub type Point2 = nalgebra::Point2<f64>;

/// 2D vector type.
pub type Vector2 = nalgebra::Vector2<f64>;

/// Global geometric tolerance for floating-point comparisons.
pub const TOLERANCE: f64 = 1e-10;

/// Largest fixed-point magnitude for which 64-bit cross products are exact.
pub const LO_RANGE: i64 = 0x3FFF_FFFF;

/// Largest fixed-point magnitude accepted with extended-range arithmetic.
pub const HI_RANGE: i64 = 0x3FFF_FFFF_FFFF_FFFF;
