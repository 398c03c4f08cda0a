use crate::error::Result;
use crate::geometry::Path;

use super::engine::{ClipEngine, ClipOptions};
use super::select::{BoolOp, FillRule, FillRules, PathRole};

/// Resolves self-intersections by taking the union of the paths with
/// themselves under a fill rule; the result is strictly simple.
#[derive(Debug, Clone)]
pub struct SimplifySelfIntersecting {
    paths: Vec<Path>,
    fill: FillRule,
}

impl SimplifySelfIntersecting {
    /// Simplifies a single closed path.
    #[must_use]
    pub fn new(path: Path, fill: FillRule) -> Self {
        Self {
            paths: vec![path],
            fill,
        }
    }

    /// Simplifies several closed paths together.
    #[must_use]
    pub fn from_paths(paths: impl IntoIterator<Item = Path>, fill: FillRule) -> Self {
        Self {
            paths: paths.into_iter().collect(),
            fill,
        }
    }

    /// Executes the simplification.
    ///
    /// # Errors
    ///
    /// Returns an error if a coordinate is rejected or the sweep fails.
    pub fn execute(&self) -> Result<Vec<Path>> {
        let mut engine = ClipEngine::new(ClipOptions::default().with_strictly_simple(true));
        for path in &self.paths {
            let mut closed = path.clone();
            closed.closed = true;
            engine.add_path(&closed, PathRole::Subject)?;
        }
        engine.execute(BoolOp::Union, FillRules::new(self.fill, self.fill))
    }
}
