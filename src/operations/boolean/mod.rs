mod clip;
mod edge;
mod engine;
mod horizontal;
mod ingest;
mod intersect;
mod join;
mod output;
mod post;
mod select;
mod simplify;
mod sweep;
mod winding;

pub use clip::Clip;
pub use engine::{ClipEngine, ClipOptions, Crossing, TagFill, MAX_PRECISION};
pub use select::{BoolOp, FillRule, FillRules, PathRole};
pub use simplify::SimplifySelfIntersecting;
