use crate::error::Result;
use crate::geometry::{ContourTree, Path};

use super::engine::{ClipEngine, ClipOptions};
use super::select::{BoolOp, FillRule, FillRules, PathRole};

/// A Boolean operation between subject and clip paths.
///
/// Subjects may be open or closed; clips must be closed.
#[derive(Debug, Clone)]
pub struct Clip {
    op: BoolOp,
    subjects: Vec<Path>,
    clips: Vec<Path>,
    fills: FillRules,
    options: ClipOptions,
}

impl Clip {
    /// Creates a new `Clip` operation with even-odd fill and default options.
    #[must_use]
    pub fn new(op: BoolOp) -> Self {
        Self {
            op,
            subjects: Vec::new(),
            clips: Vec::new(),
            fills: FillRules::default(),
            options: ClipOptions::default(),
        }
    }

    #[must_use]
    pub fn with_subject(mut self, path: Path) -> Self {
        self.subjects.push(path);
        self
    }

    #[must_use]
    pub fn with_subjects(mut self, paths: impl IntoIterator<Item = Path>) -> Self {
        self.subjects.extend(paths);
        self
    }

    #[must_use]
    pub fn with_clip(mut self, path: Path) -> Self {
        self.clips.push(path);
        self
    }

    #[must_use]
    pub fn with_clips(mut self, paths: impl IntoIterator<Item = Path>) -> Self {
        self.clips.extend(paths);
        self
    }

    #[must_use]
    pub fn with_fill_rules(mut self, subject: FillRule, clip: FillRule) -> Self {
        self.fills = FillRules::new(subject, clip);
        self
    }

    #[must_use]
    pub fn with_options(mut self, options: ClipOptions) -> Self {
        self.options = options;
        self
    }

    fn engine(&self) -> Result<ClipEngine> {
        let mut engine = ClipEngine::new(self.options.clone());
        engine.add_paths(&self.subjects, PathRole::Subject)?;
        engine.add_paths(&self.clips, PathRole::Clip)?;
        Ok(engine)
    }

    /// Executes the operation and returns a flat list of paths.
    ///
    /// # Errors
    ///
    /// Returns an error if a path is rejected or the sweep fails.
    pub fn execute(&self) -> Result<Vec<Path>> {
        self.engine()?.execute(self.op, self.fills)
    }

    /// Executes the operation and returns the nesting of the result.
    ///
    /// # Errors
    ///
    /// Returns an error if a path is rejected or the sweep fails.
    pub fn execute_tree(&self) -> Result<ContourTree> {
        self.engine()?.execute_tree(self.op, self.fills)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;
    use crate::operations::query::signed_area;

    fn square(x0: f64, y0: f64, size: f64) -> Path {
        Path::polygon(&[(x0, y0), (x0 + size, y0), (x0 + size, y0 + size), (x0, y0 + size)])
    }

    #[test]
    fn difference_cuts_a_hole() {
        let tree = Clip::new(BoolOp::Difference)
            .with_subject(square(0.0, 0.0, 10.0))
            .with_clip(square(3.0, 3.0, 4.0))
            .execute_tree()
            .unwrap();
        assert_eq!(tree.roots().len(), 1);
        let outer = tree.roots()[0];
        let node = tree.node(outer).unwrap();
        assert_eq!(node.children.len(), 1);
        assert!(tree.is_hole(node.children[0]));
        assert!(signed_area(&node.contour) > 0.0);
        let hole = tree.node(node.children[0]).unwrap();
        assert_relative_eq!(signed_area(&hole.contour), -16.0, epsilon = 1e-9);
    }

    #[test]
    fn open_subject_is_clipped_to_polygon() {
        let out = Clip::new(BoolOp::Intersection)
            .with_subject(Path::polyline(&[(-5.0, 5.0), (15.0, 5.0)]))
            .with_clip(square(0.0, 0.0, 10.0))
            .execute()
            .unwrap();
        assert_eq!(out.len(), 1);
        assert!(!out[0].closed);
        assert_eq!(out[0].len(), 2);
        let mut xs: Vec<f64> = out[0].points.iter().map(|p| p.x).collect();
        xs.sort_by(f64::total_cmp);
        assert_relative_eq!(xs[0], 0.0);
        assert_relative_eq!(xs[1], 10.0);
    }

    #[test]
    fn non_zero_union_of_nested_same_direction_squares() {
        let out = Clip::new(BoolOp::Union)
            .with_subjects([square(0.0, 0.0, 10.0), square(2.0, 2.0, 2.0)])
            .with_fill_rules(FillRule::NonZero, FillRule::NonZero)
            .execute()
            .unwrap();
        assert_eq!(out.len(), 1);
        assert_relative_eq!(signed_area(&out[0]), 100.0, epsilon = 1e-9);
    }
}
