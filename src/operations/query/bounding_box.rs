use crate::geometry::{Bounds, Path};

/// Axis-aligned bounds of all vertices of `paths`, or `None` when there are
/// no vertices.
#[must_use]
pub fn path_bounds<'a>(paths: impl IntoIterator<Item = &'a Path>) -> Option<Bounds> {
    let mut points = paths.into_iter().flat_map(|p| p.points.iter());
    let first = points.next()?;
    let init = Bounds {
        min_x: first.x,
        min_y: first.y,
        max_x: first.x,
        max_y: first.y,
    };
    Some(points.fold(init, |b, p| Bounds {
        min_x: b.min_x.min(p.x),
        min_y: b.min_y.min(p.y),
        max_x: b.max_x.max(p.x),
        max_y: b.max_y.max(p.y),
    }))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    #[test]
    fn bounds_span_every_path() {
        let a = Path::polygon(&[(0.0, 0.0), (1.0, 0.0), (1.0, 1.0)]);
        let b = Path::polyline(&[(-2.0, 5.0), (3.0, -1.0)]);
        let bounds = path_bounds([&a, &b]).unwrap();
        assert_relative_eq!(bounds.min_x, -2.0);
        assert_relative_eq!(bounds.min_y, -1.0);
        assert_relative_eq!(bounds.max_x, 3.0);
        assert_relative_eq!(bounds.max_y, 5.0);
    }

    #[test]
    fn no_vertices_no_bounds() {
        assert!(path_bounds(std::iter::empty()).is_none());
        assert!(path_bounds([&Path::default()]).is_none());
    }
}
