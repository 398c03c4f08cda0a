use tracing::debug;

use crate::error::{InputError, Result};
use crate::geometry::{ContourTree, Path, Point};
use crate::math::polygon_2d::signed_area_2d;
use crate::math::Point2;
use crate::operations::boolean::{BoolOp, ClipEngine, ClipOptions, FillRule, FillRules, PathRole};
use crate::operations::query::{path_bounds, signed_area};

use super::raw_offset::RawOffset;
use super::style::{EndStyle, JoinStyle};

/// Margin, in grid units, around the erosion frame.
const FRAME_MARGIN: f64 = 10.0;

#[derive(Debug, Clone)]
struct OffsetInput {
    points: Vec<Point2>,
    join: JoinStyle,
    end: EndStyle,
}

/// Parallel offset of closed and open paths.
///
/// Positive distances grow polygons (and thicken lines); negative distances
/// shrink polygons and ignore open paths. Overlaps created by the offset
/// are resolved by a union, so the result is a set of simple contours.
#[derive(Debug, Clone)]
pub struct Offset {
    distance: f64,
    miter_limit: f64,
    arc_tolerance: f64,
    options: ClipOptions,
    inputs: Vec<OffsetInput>,
}

impl Offset {
    /// Creates an offset by `distance` with a miter limit of 2 and an
    /// automatic arc tolerance.
    #[must_use]
    pub fn new(distance: f64) -> Self {
        Self {
            distance,
            miter_limit: 2.0,
            arc_tolerance: 0.0,
            options: ClipOptions::default(),
            inputs: Vec::new(),
        }
    }

    /// Largest miter length as a multiple of the distance; values below 2
    /// are treated as 2.
    #[must_use]
    pub fn with_miter_limit(mut self, limit: f64) -> Self {
        self.miter_limit = limit;
        self
    }

    /// Largest deviation of round joins from the true arc. Zero or negative
    /// selects `|distance| / 500`; values above `|distance| / 4` are capped.
    #[must_use]
    pub fn with_arc_tolerance(mut self, tolerance: f64) -> Self {
        self.arc_tolerance = tolerance;
        self
    }

    /// Options of the union resolving the raw offset. `reverse_solution` is
    /// ignored.
    #[must_use]
    pub fn with_options(mut self, options: ClipOptions) -> Self {
        self.options = options;
        self
    }

    /// Builder form of [`Offset::add_path`].
    #[must_use]
    pub fn with_path(mut self, path: &Path, join: JoinStyle, end: EndStyle) -> Self {
        self.add_path(path, join, end);
        self
    }

    /// Adds a path with its join and end styles.
    ///
    /// Consecutive duplicate vertices are dropped; closed polygons with
    /// fewer than 3 distinct vertices are ignored.
    pub fn add_path(&mut self, path: &Path, join: JoinStyle, end: EndStyle) {
        let mut points: Vec<Point2> = Vec::with_capacity(path.len());
        for p in &path.points {
            let q = p.to_point2();
            if points.last() != Some(&q) {
                points.push(q);
            }
        }
        if end == EndStyle::ClosedPolygon {
            while points.len() > 1 && points.first() == points.last() {
                points.pop();
            }
            if points.len() < 3 {
                return;
            }
        }
        if points.is_empty() {
            return;
        }
        self.inputs.push(OffsetInput { points, join, end });
    }

    /// Adds several paths sharing join and end styles.
    pub fn add_paths<'a>(
        &mut self,
        paths: impl IntoIterator<Item = &'a Path>,
        join: JoinStyle,
        end: EndStyle,
    ) {
        for path in paths {
            self.add_path(path, join, end);
        }
    }

    /// Number of paths kept for offsetting.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inputs.len()
    }

    /// `true` when no path has been kept.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inputs.is_empty()
    }

    fn validate(&self) -> std::result::Result<(), InputError> {
        for (name, value) in [
            ("distance", self.distance),
            ("miter limit", self.miter_limit),
            ("arc tolerance", self.arc_tolerance),
        ] {
            if !value.is_finite() {
                return Err(InputError::InvalidParameter(format!("{name} must be finite")));
            }
        }
        Ok(())
    }

    /// Orients inputs so outers run counter-clockwise.
    ///
    /// The closed polygon holding the lowest vertex is always an outer; if
    /// it runs clockwise every closed polygon is reversed. Closed lines are
    /// made counter-clockwise individually.
    fn oriented_inputs(&self) -> Vec<OffsetInput> {
        let mut inputs = self.inputs.clone();
        let lowest = inputs
            .iter()
            .filter(|i| i.end == EndStyle::ClosedPolygon)
            .flat_map(|i| i.points.iter().map(move |p| (i, *p)))
            .min_by(|(_, a), (_, b)| a.y.total_cmp(&b.y).then(a.x.total_cmp(&b.x)))
            .map(|(i, _)| signed_area_2d(&i.points) < 0.0)
            .unwrap_or(false);
        for input in &mut inputs {
            let flip = match input.end {
                EndStyle::ClosedPolygon => lowest,
                EndStyle::ClosedLine => signed_area_2d(&input.points) < 0.0,
                _ => false,
            };
            if flip {
                input.points.reverse();
            }
        }
        inputs
    }

    /// Builds the engine holding the raw offset, plus the erosion frame
    /// for negative distances.
    fn engine(&self) -> Result<ClipEngine> {
        self.validate()?;
        let shrinking = self.distance < 0.0;
        let options = self.options.clone().with_reverse_solution(shrinking);
        let grid_unit = 1.0 / options.scale().factor();
        let mut engine = ClipEngine::new(options);

        let inputs = self.oriented_inputs();
        if self.distance == 0.0 {
            for input in inputs.iter().filter(|i| i.end == EndStyle::ClosedPolygon) {
                engine.add_path(&to_path(&input.points), PathRole::Subject)?;
            }
            return Ok(engine);
        }

        let raw = RawOffset::new(self.distance, self.miter_limit, self.arc_tolerance, grid_unit);
        let mut contours = Vec::new();
        for input in &inputs {
            for ring in raw.build(&input.points, input.join, input.end) {
                contours.push(to_path(&ring));
            }
        }
        engine.add_paths(&contours, PathRole::Subject)?;

        if shrinking {
            if let Some(b) = path_bounds(&contours) {
                let m = FRAME_MARGIN * grid_unit;
                let frame = Path::polygon(&[
                    (b.min_x - m, b.max_y + m),
                    (b.max_x + m, b.max_y + m),
                    (b.max_x + m, b.min_y - m),
                    (b.min_x - m, b.min_y - m),
                ]);
                engine.add_path(&frame, PathRole::Subject)?;
            }
        }
        Ok(engine)
    }

    fn fill_rules(&self) -> FillRules {
        let rule = if self.distance < 0.0 {
            FillRule::Negative
        } else {
            FillRule::Positive
        };
        FillRules::new(rule, rule)
    }

    /// Runs the offset and returns the resulting contours.
    ///
    /// # Errors
    ///
    /// Returns `InputError::InvalidParameter` for non-finite parameters,
    /// range errors for offset vertices outside the grid, and any
    /// `SweepError` of the resolving union.
    pub fn execute(&self) -> Result<Vec<Path>> {
        let engine = self.engine()?;
        let mut paths = engine.execute(BoolOp::Union, self.fill_rules())?;
        if self.distance < 0.0 {
            let frame = paths
                .iter()
                .enumerate()
                .max_by(|(_, a), (_, b)| signed_area(a).abs().total_cmp(&signed_area(b).abs()))
                .map(|(i, _)| i);
            if let Some(i) = frame {
                paths.remove(i);
            }
        }
        debug!(distance = self.distance, paths = paths.len(), "offset executed");
        Ok(paths)
    }

    /// Runs the offset and returns the contours as a nesting tree.
    ///
    /// # Errors
    ///
    /// See [`Offset::execute`].
    pub fn execute_tree(&self) -> Result<ContourTree> {
        let engine = self.engine()?;
        let mut tree = engine.execute_tree(BoolOp::Union, self.fill_rules())?;
        if self.distance < 0.0 {
            let frame = tree
                .roots()
                .iter()
                .copied()
                .filter_map(|id| tree.node(id).map(|n| (id, signed_area(&n.contour).abs())))
                .max_by(|(_, a), (_, b)| a.total_cmp(b))
                .map(|(id, _)| id);
            if let Some(id) = frame {
                tree.remove_root(id);
            }
        }
        debug!(distance = self.distance, contours = tree.len(), "offset executed");
        Ok(tree)
    }
}

fn to_path(points: &[Point2]) -> Path {
    Path::closed(points.iter().map(|&p| Point::from(p)).collect())
}
