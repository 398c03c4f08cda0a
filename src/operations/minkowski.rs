use crate::error::Result;
use crate::geometry::{Path, Point};
use crate::operations::boolean::{BoolOp, ClipEngine, ClipOptions, FillRule, FillRules, PathRole};
use crate::operations::query::signed_area;

/// Quads swept by each pattern edge along each path segment, oriented
/// counter-clockwise.
fn sweep_quads(pattern: &[Point], path: &[Point], closed: bool, sum: bool) -> Vec<Path> {
    let (n_pat, n_path) = (pattern.len(), path.len());
    if n_pat == 0 || n_path == 0 {
        return Vec::new();
    }
    let placed: Vec<Vec<Point>> = path
        .iter()
        .map(|p| {
            pattern
                .iter()
                .map(|q| {
                    if sum {
                        Point::new(p.x + q.x, p.y + q.y)
                    } else {
                        Point::new(p.x - q.x, p.y - q.y)
                    }
                })
                .collect()
        })
        .collect();

    let segments = if closed { n_path } else { n_path - 1 };
    let mut quads = Vec::with_capacity(segments * n_pat);
    for i in 0..segments {
        let (a, b) = (&placed[i], &placed[(i + 1) % n_path]);
        for j in 0..n_pat {
            let k = (j + 1) % n_pat;
            let mut quad = Path::closed(vec![a[j], b[j], b[k], a[k]]);
            if signed_area(&quad) < 0.0 {
                quad.reverse();
            }
            quads.push(quad);
        }
    }
    quads
}

/// Minkowski sum of a pattern polygon with one or more paths.
///
/// Open paths give the area swept by the pattern along the line; closed
/// paths also include the area they enclose.
#[derive(Debug, Clone)]
pub struct MinkowskiSum {
    pattern: Path,
    paths: Vec<Path>,
    options: ClipOptions,
}

impl MinkowskiSum {
    /// Creates the sum of `pattern` swept along `path`.
    #[must_use]
    pub fn new(pattern: Path, path: Path) -> Self {
        Self {
            pattern,
            paths: vec![path],
            options: ClipOptions::default(),
        }
    }

    /// Adds another path to sweep the pattern along.
    #[must_use]
    pub fn with_path(mut self, path: Path) -> Self {
        self.paths.push(path);
        self
    }

    #[must_use]
    pub fn with_options(mut self, options: ClipOptions) -> Self {
        self.options = options;
        self
    }

    /// Executes the sum.
    ///
    /// # Errors
    ///
    /// Returns any error of the union merging the swept quads.
    pub fn execute(&self) -> Result<Vec<Path>> {
        let mut engine = ClipEngine::new(self.options.clone());
        for path in &self.paths {
            let quads = sweep_quads(&self.pattern.points, &path.points, path.closed, true);
            engine.add_paths(&quads, PathRole::Subject)?;
            if path.closed {
                if let Some(origin) = self.pattern.points.first() {
                    let moved = Path::closed(
                        path.points
                            .iter()
                            .map(|p| Point::new(p.x + origin.x, p.y + origin.y))
                            .collect(),
                    );
                    engine.add_path(&moved, PathRole::Clip)?;
                }
            }
        }
        let fills = FillRules::new(FillRule::NonZero, FillRule::NonZero);
        engine.execute(BoolOp::Union, fills)
    }
}

/// Minkowski difference `b - a` of two closed polygons: every position of
/// `a` relative to `b` at which they touch or overlap.
#[derive(Debug, Clone)]
pub struct MinkowskiDiff {
    a: Path,
    b: Path,
    options: ClipOptions,
}

impl MinkowskiDiff {
    #[must_use]
    pub fn new(a: Path, b: Path) -> Self {
        Self {
            a,
            b,
            options: ClipOptions::default(),
        }
    }

    #[must_use]
    pub fn with_options(mut self, options: ClipOptions) -> Self {
        self.options = options;
        self
    }

    /// Executes the difference.
    ///
    /// # Errors
    ///
    /// Returns any error of the union merging the swept quads.
    pub fn execute(&self) -> Result<Vec<Path>> {
        let quads = sweep_quads(&self.a.points, &self.b.points, true, false);
        let mut engine = ClipEngine::new(self.options.clone());
        engine.add_paths(&quads, PathRole::Subject)?;
        engine.execute(BoolOp::Union, FillRules::new(FillRule::NonZero, FillRule::NonZero))
    }
}
