/// A point on the fixed-point grid the sweep runs on.
///
/// `tag` is carried through for the caller and never takes part in equality:
/// two points are equal when their coordinates are.
#[derive(Debug, Clone, Copy, Default)]
pub struct IntPoint {
    pub x: i64,
    pub y: i64,
    pub tag: i64,
}

impl IntPoint {
    /// Creates an untagged grid point.
    #[must_use]
    pub const fn new(x: i64, y: i64) -> Self {
        Self { x, y, tag: 0 }
    }

    /// Creates a grid point carrying a caller tag.
    #[must_use]
    pub const fn tagged(x: i64, y: i64, tag: i64) -> Self {
        Self { x, y, tag }
    }
}

impl PartialEq for IntPoint {
    fn eq(&self, other: &Self) -> bool {
        self.x == other.x && self.y == other.y
    }
}

impl Eq for IntPoint {}

/// Rounds half away from zero onto the integer grid.
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn round_to_grid(value: f64) -> i64 {
    if value < 0.0 {
        (value - 0.5) as i64
    } else {
        (value + 0.5) as i64
    }
}

/// `true` when segment `p1→p2` is parallel to `p2→p3`.
#[must_use]
pub fn slopes_equal3(p1: IntPoint, p2: IntPoint, p3: IntPoint, full_range: bool) -> bool {
    slopes_equal4(p1, p2, p2, p3, full_range)
}

/// `true` when segment `p1→p2` is parallel to `p3→p4`.
///
/// With `full_range` the cross products are formed in 128 bits, which keeps the
/// test exact for any coordinate inside [`super::HI_RANGE`].
#[must_use]
pub fn slopes_equal4(
    p1: IntPoint,
    p2: IntPoint,
    p3: IntPoint,
    p4: IntPoint,
    full_range: bool,
) -> bool {
    if full_range {
        i128::from(p1.y - p2.y) * i128::from(p3.x - p4.x)
            == i128::from(p1.x - p2.x) * i128::from(p3.y - p4.y)
    } else {
        (p1.y - p2.y) * (p3.x - p4.x) == (p1.x - p2.x) * (p3.y - p4.y)
    }
}

/// `true` when `p2` lies strictly between `p1` and `p3` on their common line.
///
/// Used to tell a genuine collinear vertex from a spike that doubles back.
#[must_use]
pub fn pt2_is_between(p1: IntPoint, p2: IntPoint, p3: IntPoint) -> bool {
    if p1 == p3 || p1 == p2 || p3 == p2 {
        false
    } else if p1.x != p3.x {
        (p2.x > p1.x) == (p2.x < p3.x)
    } else {
        (p2.y > p1.y) == (p2.y < p3.y)
    }
}

/// `true` when the open x-intervals `[a1, a2]` and `[b1, b2]` overlap.
#[must_use]
pub fn horz_segments_overlap(mut a1: i64, mut a2: i64, mut b1: i64, mut b2: i64) -> bool {
    if a1 > a2 {
        std::mem::swap(&mut a1, &mut a2);
    }
    if b1 > b2 {
        std::mem::swap(&mut b1, &mut b2);
    }
    a1 < b2 && b1 < a2
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn equality_ignores_tag() {
        assert_eq!(IntPoint::tagged(1, 2, 7), IntPoint::tagged(1, 2, 9));
        assert_ne!(IntPoint::new(1, 2), IntPoint::new(2, 1));
    }

    #[test]
    fn rounding_is_half_away_from_zero() {
        assert_eq!(round_to_grid(2.5), 3);
        assert_eq!(round_to_grid(-2.5), -3);
        assert_eq!(round_to_grid(2.49), 2);
        assert_eq!(round_to_grid(-0.2), 0);
    }

    #[test]
    fn slopes_equal_both_ranges() {
        let a = IntPoint::new(0, 0);
        let b = IntPoint::new(2, 2);
        let c = IntPoint::new(5, 5);
        assert!(slopes_equal3(a, b, c, false));
        assert!(slopes_equal3(a, b, c, true));
        assert!(!slopes_equal3(a, b, IntPoint::new(5, 6), false));

        let big = 0x3FFF_FFFF_FFFF;
        let far = IntPoint::new(big, big);
        assert!(slopes_equal3(a, b, far, true));
    }

    #[test]
    fn between_rejects_spikes() {
        let p1 = IntPoint::new(0, 0);
        let p3 = IntPoint::new(10, 0);
        assert!(pt2_is_between(p1, IntPoint::new(5, 0), p3));
        assert!(!pt2_is_between(p1, IntPoint::new(15, 0), p3));
        assert!(!pt2_is_between(p1, p1, p3));
        assert!(pt2_is_between(IntPoint::new(0, 0), IntPoint::new(0, 3), IntPoint::new(0, 9)));
    }

    #[test]
    fn horizontal_overlap_is_strict() {
        assert!(horz_segments_overlap(0, 10, 5, 15));
        assert!(horz_segments_overlap(10, 0, 15, 5));
        assert!(!horz_segments_overlap(0, 10, 10, 20));
    }
}
