use crate::math::Point2;

/// A path vertex in caller coordinates.
///
/// `tag` is an opaque value carried from input vertices to the output. It never
/// takes part in geometric decisions.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
    pub tag: i64,
}

impl Point {
    /// Creates an untagged point.
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y, tag: 0 }
    }

    /// Creates a point carrying a caller tag.
    #[must_use]
    pub fn tagged(x: f64, y: f64, tag: i64) -> Self {
        Self { x, y, tag }
    }

    /// Returns the coordinates as an nalgebra point.
    #[must_use]
    pub fn to_point2(self) -> Point2 {
        Point2::new(self.x, self.y)
    }
}

impl From<Point2> for Point {
    fn from(p: Point2) -> Self {
        Self::new(p.x, p.y)
    }
}

impl From<(f64, f64)> for Point {
    fn from((x, y): (f64, f64)) -> Self {
        Self::new(x, y)
    }
}

/// An ordered sequence of vertices.
///
/// A closed path implicitly connects its last vertex back to the first; an
/// open path (polyline) does not.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Path {
    pub points: Vec<Point>,
    pub closed: bool,
}

impl Path {
    /// Creates a closed path (polygon contour).
    #[must_use]
    pub fn closed(points: Vec<Point>) -> Self {
        Self {
            points,
            closed: true,
        }
    }

    /// Creates an open path (polyline).
    #[must_use]
    pub fn open(points: Vec<Point>) -> Self {
        Self {
            points,
            closed: false,
        }
    }

    /// Builds a closed path from `(x, y)` pairs.
    #[must_use]
    pub fn polygon(coords: &[(f64, f64)]) -> Self {
        Self::closed(coords.iter().map(|&c| Point::from(c)).collect())
    }

    /// Builds an open path from `(x, y)` pairs.
    #[must_use]
    pub fn polyline(coords: &[(f64, f64)]) -> Self {
        Self::open(coords.iter().map(|&c| Point::from(c)).collect())
    }

    /// Number of vertices.
    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// `true` when the path has no vertices.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Number of segments (closed paths include the closing segment).
    #[must_use]
    pub fn segment_count(&self) -> usize {
        let n = self.points.len();
        if n < 2 {
            0
        } else if self.closed {
            n
        } else {
            n - 1
        }
    }

    /// Returns the path with its vertex order reversed.
    #[must_use]
    pub fn reversed(&self) -> Self {
        Self {
            points: self.points.iter().rev().copied().collect(),
            closed: self.closed,
        }
    }

    /// Reverses the vertex order in place.
    pub fn reverse(&mut self) {
        self.points.reverse();
    }
}

/// Axis-aligned bounding rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Bounds {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}
