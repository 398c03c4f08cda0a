mod path_offset;
mod raw_offset;
mod style;

pub use path_offset::Offset;
pub use style::{EndStyle, JoinStyle};
