use crate::error::{InputError, Result};
use crate::geometry::{Path, Point};
use crate::math::distance_2d::{points_are_close, slopes_near_collinear};
use crate::math::{IntPoint, Scale};

/// Removes vertices that add no visible detail to a closed polygon.
///
/// A vertex goes when it lies within `distance` of its predecessor, when its
/// neighbours lie within `distance` of each other (a spike), or when it lies
/// within `distance` of the line through its neighbours. Polygons left with
/// fewer than 3 vertices come back empty.
#[derive(Debug, Clone)]
pub struct CleanPolygon {
    path: Path,
    distance: f64,
    precision: u8,
}

impl CleanPolygon {
    /// Creates a clean-up of `path` with the given proximity distance.
    #[must_use]
    pub fn new(path: Path, distance: f64) -> Self {
        Self {
            path,
            distance,
            precision: 4,
        }
    }

    /// Decimal digits kept on the integer grid while comparing vertices.
    #[must_use]
    pub fn with_precision(mut self, precision: u8) -> Self {
        self.precision = precision;
        self
    }

    /// Executes the clean-up.
    ///
    /// # Errors
    ///
    /// Returns `InputError::InvalidParameter` for a negative or non-finite
    /// distance and the usual coordinate errors for unusable vertices.
    pub fn execute(&self) -> Result<Path> {
        if !self.distance.is_finite() || self.distance < 0.0 {
            return Err(InputError::InvalidParameter(format!(
                "clean distance {} must be finite and non-negative",
                self.distance
            ))
            .into());
        }
        let scale = Scale::new(self.precision, false);
        let pts = self
            .path
            .points
            .iter()
            .map(|p| scale.to_int_point(p.x, p.y, p.tag))
            .collect::<std::result::Result<Vec<IntPoint>, InputError>>()?;
        let d = scale.scale_length(self.distance);
        let kept = clean_ring(&pts, d * d);
        let points = kept
            .into_iter()
            .map(|p| Point::tagged(scale.from_grid(p.x), scale.from_grid(p.y), p.tag))
            .collect();
        Ok(Path {
            points,
            closed: self.path.closed,
        })
    }
}

/// Vertex ring linked by index.
struct Links {
    next: Vec<usize>,
    prev: Vec<usize>,
    /// Set once a vertex passed every test; cleared when a neighbour goes.
    settled: Vec<bool>,
}

impl Links {
    fn new(n: usize) -> Self {
        Self {
            next: (0..n).map(|i| (i + 1) % n).collect(),
            prev: (0..n).map(|i| (i + n - 1) % n).collect(),
            settled: vec![false; n],
        }
    }

    /// Unlinks `op` and returns its predecessor.
    fn exclude(&mut self, op: usize) -> usize {
        let (p, nx) = (self.prev[op], self.next[op]);
        self.next[p] = nx;
        self.prev[nx] = p;
        self.settled[p] = false;
        p
    }
}

fn clean_ring(pts: &[IntPoint], dist_sq: f64) -> Vec<IntPoint> {
    let n = pts.len();
    if n == 0 {
        return Vec::new();
    }
    let mut links = Links::new(n);
    let mut size = n;
    let mut op = 0;
    while !links.settled[op] && links.next[op] != links.prev[op] {
        let (p, nx) = (links.prev[op], links.next[op]);
        if points_are_close(pts[op], pts[p], dist_sq) {
            op = links.exclude(op);
            size -= 1;
        } else if points_are_close(pts[p], pts[nx], dist_sq) {
            links.exclude(nx);
            op = links.exclude(op);
            size -= 2;
        } else if slopes_near_collinear(pts[p], pts[op], pts[nx], dist_sq) {
            op = links.exclude(op);
            size -= 1;
        } else {
            links.settled[op] = true;
            op = nx;
        }
    }
    if size < 3 {
        return Vec::new();
    }
    let mut out = Vec::with_capacity(size);
    for _ in 0..size {
        out.push(pts[op]);
        op = links.next[op];
    }
    out
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn near_duplicates_and_collinear_points_go() {
        let path = Path::polygon(&[
            (0.0, 0.0),
            (0.0001, 0.0),
            (5.0, 0.00005),
            (10.0, 0.0),
            (10.0, 10.0),
            (0.0, 10.0),
        ]);
        let out = CleanPolygon::new(path, 0.001).execute().unwrap();
        assert_eq!(out.len(), 4);
        assert!(out.points.contains(&Point::new(10.0, 10.0)));
    }

    #[test]
    fn spike_is_removed() {
        let path = Path::polygon(&[(0.0, 0.0), (10.0, 0.0), (20.0, 0.0), (10.0, 0.0), (10.0, 10.0)]);
        let out = CleanPolygon::new(path, 0.01).execute().unwrap();
        assert_eq!(out.len(), 3);
    }

    #[test]
    fn collapsed_polygon_is_empty() {
        let path = Path::polygon(&[(0.0, 0.0), (1.0, 0.0), (2.0, 0.001)]);
        let out = CleanPolygon::new(path, 0.1).execute().unwrap();
        assert!(out.is_empty());
        assert!(out.closed);
    }

    #[test]
    fn tags_survive() {
        let path = Path::closed(vec![
            Point::tagged(0.0, 0.0, 1),
            Point::tagged(4.0, 0.0, 2),
            Point::tagged(4.0, 4.0, 3),
        ]);
        let out = CleanPolygon::new(path, 0.01).execute().unwrap();
        let tags: Vec<i64> = out.points.iter().map(|p| p.tag).collect();
        assert_eq!(tags.len(), 3);
        assert!(tags.contains(&1) && tags.contains(&2) && tags.contains(&3));
    }

    #[test]
    fn negative_distance_is_rejected() {
        let path = Path::polygon(&[(0.0, 0.0), (1.0, 0.0), (1.0, 1.0)]);
        assert!(CleanPolygon::new(path, -1.0).execute().is_err());
    }
}
