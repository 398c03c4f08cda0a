/// Corner construction used where two offset edges meet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JoinStyle {
    /// Corners are extended to a square, clipped at the offset distance.
    #[default]
    Square,
    /// Corners are replaced by a circular arc.
    Round,
    /// Corners are extended to a sharp point, bounded by the miter limit.
    Miter,
}

/// How the ends of a path are treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EndStyle {
    /// The path is a polygon; only its filled side grows or shrinks.
    #[default]
    ClosedPolygon,
    /// The path is closed but offset on both sides, like a ring-shaped line.
    ClosedLine,
    /// Open path ending flush at its end vertices.
    OpenButt,
    /// Open path extended by the offset distance past each end.
    OpenSquare,
    /// Open path capped by half circles.
    OpenRound,
}

impl EndStyle {
    /// `true` for the two closed styles.
    #[must_use]
    pub fn is_closed(self) -> bool {
        matches!(self, Self::ClosedPolygon | Self::ClosedLine)
    }
}
