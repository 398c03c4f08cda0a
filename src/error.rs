use thiserror::Error;

/// Top-level error type for the clipping and offsetting engine.
#[derive(Debug, Error)]
pub enum ClipError {
    #[error(transparent)]
    Input(#[from] InputError),

    #[error(transparent)]
    Sweep(#[from] SweepError),
}

/// Errors caused by the paths or parameters handed to an operation.
#[derive(Debug, Error, PartialEq)]
pub enum InputError {
    #[error("open paths can only be added as subjects")]
    OpenClipPath,

    #[error("coordinate {value} is outside the supported range of ±{limit}")]
    CoordinateOutOfRange { value: f64, limit: f64 },

    #[error("coordinate is not a finite number")]
    NonFiniteCoordinate,

    #[error("invalid parameter: {0}")]
    InvalidParameter(String),
}

/// Fatal conditions raised while sweeping.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SweepError {
    #[error("intersections below y = {y} could not be ordered between adjacent edges")]
    InconsistentIntersectionOrder { y: i64 },

    #[error("maximum at y = {y} has no active partner edge")]
    UnpairedMaximum { y: i64 },

    #[error("engine is already executing")]
    ReentrantExecution,
}

/// Convenience type alias for results using [`ClipError`].
pub type Result<T> = std::result::Result<T, ClipError>;
