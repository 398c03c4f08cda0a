pub mod error;
pub mod geometry;
pub mod math;
pub mod operations;

pub use error::{ClipError, InputError, Result, SweepError};
pub use geometry::{Bounds, ContourId, ContourNode, ContourTree, Path, Point};
pub use operations::{
    BoolOp, Clip, ClipEngine, ClipOptions, EndStyle, FillRule, FillRules, JoinStyle, Offset,
    PathRole, SimplifySelfIntersecting,
};
