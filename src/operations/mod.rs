pub mod boolean;
pub mod minkowski;
pub mod modification;
pub mod offset;
pub mod query;

pub use boolean::{
    BoolOp, Clip, ClipEngine, ClipOptions, Crossing, FillRule, FillRules, PathRole,
    SimplifySelfIntersecting, TagFill, MAX_PRECISION,
};
pub use minkowski::{MinkowskiDiff, MinkowskiSum};
pub use modification::{CleanPolygon, ReversePaths};
pub use offset::{EndStyle, JoinStyle, Offset};
