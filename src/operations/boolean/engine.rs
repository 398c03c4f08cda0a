use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tracing::debug;

use crate::error::{InputError, Result, SweepError};
use crate::geometry::{Bounds, ContourTree, Path, Point};
use crate::math::{IntPoint, Scale};

use super::ingest::EdgeSet;
use super::select::{BoolOp, FillRules, PathRole};
use super::sweep::SweepSession;

/// Largest supported number of decimal digits kept on the integer grid.
pub const MAX_PRECISION: u8 = 15;

/// The two segments meeting at a computed intersection, in caller units.
#[derive(Debug, Clone, Copy)]
pub struct Crossing {
    pub e1_bot: Point,
    pub e1_top: Point,
    pub e2_bot: Point,
    pub e2_top: Point,
    /// The intersection point itself.
    pub at: Point,
}

/// Callback computing the tag of an intersection point that does not
/// coincide with an input vertex.
pub type TagFill = Arc<dyn Fn(&Crossing) -> i64 + Send + Sync>;

/// Configuration shared by every execution of a [`ClipEngine`].
#[derive(Clone)]
pub struct ClipOptions {
    /// Decimal digits kept when mapping coordinates onto the integer grid.
    pub precision: u8,
    /// Accept coordinates up to `0x3FFF_FFFF_FFFF_FFFF` grid units, using
    /// 128-bit slope tests.
    pub extended_range: bool,
    /// Keep the middle vertex of collinear runs.
    pub preserve_collinear: bool,
    /// Emit outers negative and holes positive.
    pub reverse_solution: bool,
    /// Split rings that touch themselves at a vertex.
    pub strictly_simple: bool,
    pub tag_fill: Option<TagFill>,
}

impl Default for ClipOptions {
    fn default() -> Self {
        Self {
            precision: 4,
            extended_range: false,
            preserve_collinear: false,
            reverse_solution: false,
            strictly_simple: true,
            tag_fill: None,
        }
    }
}

impl fmt::Debug for ClipOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClipOptions")
            .field("precision", &self.precision)
            .field("extended_range", &self.extended_range)
            .field("preserve_collinear", &self.preserve_collinear)
            .field("reverse_solution", &self.reverse_solution)
            .field("strictly_simple", &self.strictly_simple)
            .field("tag_fill", &self.tag_fill.is_some())
            .finish()
    }
}

impl ClipOptions {
    #[must_use]
    pub fn with_precision(mut self, precision: u8) -> Self {
        self.precision = precision;
        self
    }

    #[must_use]
    pub fn with_extended_range(mut self, extended: bool) -> Self {
        self.extended_range = extended;
        self
    }

    #[must_use]
    pub fn with_preserve_collinear(mut self, preserve: bool) -> Self {
        self.preserve_collinear = preserve;
        self
    }

    #[must_use]
    pub fn with_reverse_solution(mut self, reverse: bool) -> Self {
        self.reverse_solution = reverse;
        self
    }

    #[must_use]
    pub fn with_strictly_simple(mut self, strict: bool) -> Self {
        self.strictly_simple = strict;
        self
    }

    /// Installs a callback tagging computed intersection points.
    #[must_use]
    pub fn with_tag_fill(mut self, fill: impl Fn(&Crossing) -> i64 + Send + Sync + 'static) -> Self {
        self.tag_fill = Some(Arc::new(fill));
        self
    }

    /// Grid mapping implied by these options.
    #[must_use]
    pub fn scale(&self) -> Scale {
        Scale::new(self.precision.min(MAX_PRECISION), self.extended_range)
    }

    fn validate(&self) -> std::result::Result<(), InputError> {
        if self.precision > MAX_PRECISION {
            return Err(InputError::InvalidParameter(format!(
                "precision {} exceeds {MAX_PRECISION}",
                self.precision
            )));
        }
        Ok(())
    }
}

/// Releases the engine's executing flag when an execution ends.
struct ExecutionGuard<'a>(&'a AtomicBool);

impl Drop for ExecutionGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Scanline clipping engine.
///
/// Paths are converted to edges when added; every execution sweeps a private
/// copy of them, so an engine can be executed any number of times with
/// different operators and fill rules.
#[derive(Debug, Default)]
pub struct ClipEngine {
    options: ClipOptions,
    edges: EdgeSet,
    executing: AtomicBool,
}

impl ClipEngine {
    /// Creates an engine with the given options.
    #[must_use]
    pub fn new(options: ClipOptions) -> Self {
        Self {
            options,
            edges: EdgeSet::default(),
            executing: AtomicBool::new(false),
        }
    }

    /// Options this engine was created with.
    #[must_use]
    pub fn options(&self) -> &ClipOptions {
        &self.options
    }

    /// Adds one path in the given role.
    ///
    /// Returns `Ok(false)` when the path degenerates (too few distinct
    /// vertices, or zero area for a closed path) and was skipped.
    ///
    /// # Errors
    ///
    /// Returns `InputError::OpenClipPath` for an open path added as a clip,
    /// `InputError::NonFiniteCoordinate` / `InputError::CoordinateOutOfRange`
    /// for unusable coordinates and `InputError::InvalidParameter` for an
    /// unsupported precision.
    pub fn add_path(&mut self, path: &Path, role: PathRole) -> Result<bool> {
        self.options.validate()?;
        if !path.closed && role == PathRole::Clip {
            return Err(InputError::OpenClipPath.into());
        }
        let scale = self.options.scale();
        let pts = path
            .points
            .iter()
            .map(|p| scale.to_int_point(p.x, p.y, p.tag))
            .collect::<std::result::Result<Vec<IntPoint>, InputError>>()?;
        Ok(self.edges.add_path(
            &pts,
            role,
            path.closed,
            self.options.preserve_collinear,
            scale.extended_range(),
        ))
    }

    /// Adds several paths in the same role; returns `true` when at least one
    /// was kept.
    ///
    /// # Errors
    ///
    /// See [`ClipEngine::add_path`]. Paths before the failing one stay added.
    pub fn add_paths<'a>(
        &mut self,
        paths: impl IntoIterator<Item = &'a Path>,
        role: PathRole,
    ) -> Result<bool> {
        let mut any = false;
        for path in paths {
            any |= self.add_path(path, role)?;
        }
        Ok(any)
    }

    /// Removes every added path.
    pub fn clear(&mut self) {
        self.edges.clear();
    }

    /// Bounding box of everything added, in caller units.
    #[must_use]
    pub fn bounds(&self) -> Option<Bounds> {
        let scale = self.options.scale();
        self.edges.bounds().map(|b| Bounds {
            min_x: scale.from_grid(b.left),
            min_y: scale.from_grid(b.top),
            max_x: scale.from_grid(b.right),
            max_y: scale.from_grid(b.bottom),
        })
    }

    fn begin(&self) -> std::result::Result<ExecutionGuard<'_>, SweepError> {
        self.executing
            .compare_exchange(false, true, Ordering::Acquire, Ordering::Relaxed)
            .map_err(|_| SweepError::ReentrantExecution)?;
        Ok(ExecutionGuard(&self.executing))
    }

    fn sweep(&self, op: BoolOp, fills: FillRules, using_tree: bool) -> Result<SweepSession> {
        self.options.validate()?;
        let _guard = self.begin()?;
        let mut session = SweepSession::new(&self.edges, op, fills, &self.options, using_tree);
        session.run()?;
        Ok(session)
    }

    /// Runs `op` and returns the result as a flat list of paths.
    ///
    /// Closed outers are counter-clockwise (positive area) and holes
    /// clockwise, unless `reverse_solution` is set.
    ///
    /// # Errors
    ///
    /// Returns a `SweepError` when the sweep cannot complete, including
    /// `SweepError::ReentrantExecution` when called from inside a tag-fill
    /// callback of the same engine.
    pub fn execute(&self, op: BoolOp, fills: FillRules) -> Result<Vec<Path>> {
        let session = self.sweep(op, fills, false)?;
        let paths = session.build_result();
        debug!(?op, paths = paths.len(), "clip executed");
        Ok(paths)
    }

    /// Runs `op` and returns the result as a contour tree.
    ///
    /// # Errors
    ///
    /// See [`ClipEngine::execute`].
    pub fn execute_tree(&self, op: BoolOp, fills: FillRules) -> Result<ContourTree> {
        let mut session = self.sweep(op, fills, true)?;
        let tree = session.build_result_tree();
        debug!(?op, contours = tree.len(), "clip executed");
        Ok(tree)
    }
}
