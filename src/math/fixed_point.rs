use super::int_point::{round_to_grid, IntPoint};
use super::{HI_RANGE, LO_RANGE};
use crate::error::InputError;

/// Conversion between caller coordinates and the sweep's integer grid.
///
/// A coordinate `c` maps to `round(c * 10^precision)`. The accepted magnitude
/// depends on whether extended-range arithmetic is enabled.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Scale {
    factor: f64,
    extended_range: bool,
}

impl Scale {
    /// Creates a scale keeping `precision` decimal digits.
    #[must_use]
    pub fn new(precision: u8, extended_range: bool) -> Self {
        Self {
            factor: 10f64.powi(i32::from(precision)),
            extended_range,
        }
    }

    /// Multiplier applied to caller coordinates.
    #[must_use]
    pub fn factor(&self) -> f64 {
        self.factor
    }

    /// Whether 128-bit slope comparisons are in use.
    #[must_use]
    pub fn extended_range(&self) -> bool {
        self.extended_range
    }

    /// Largest grid magnitude accepted by this scale.
    #[must_use]
    pub fn grid_limit(&self) -> i64 {
        if self.extended_range {
            HI_RANGE
        } else {
            LO_RANGE
        }
    }

    /// Converts a caller coordinate to the grid.
    ///
    /// # Errors
    ///
    /// Returns `InputError::NonFiniteCoordinate` for NaN/infinite input and
    /// `InputError::CoordinateOutOfRange` when the scaled value exceeds the
    /// grid limit.
    #[allow(clippy::cast_precision_loss)]
    pub fn to_grid(&self, value: f64) -> Result<i64, InputError> {
        if !value.is_finite() {
            return Err(InputError::NonFiniteCoordinate);
        }
        let limit = self.grid_limit();
        let scaled = value * self.factor;
        if scaled.abs() > limit as f64 {
            return Err(InputError::CoordinateOutOfRange {
                value,
                limit: limit as f64 / self.factor,
            });
        }
        Ok(round_to_grid(scaled))
    }

    /// Converts a caller point to a tagged grid point.
    ///
    /// # Errors
    ///
    /// See [`Scale::to_grid`].
    pub fn to_int_point(&self, x: f64, y: f64, tag: i64) -> Result<IntPoint, InputError> {
        Ok(IntPoint::tagged(self.to_grid(x)?, self.to_grid(y)?, tag))
    }

    /// Converts a caller length (e.g. an offset distance) to grid units without
    /// a range check.
    #[must_use]
    pub fn scale_length(&self, length: f64) -> f64 {
        length * self.factor
    }

    /// Converts a grid coordinate back to caller units.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn from_grid(&self, value: i64) -> f64 {
        value as f64 / self.factor
    }
}

impl Default for Scale {
    fn default() -> Self {
        Self::new(4, false)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn round_trip_keeps_precision_digits() {
        let scale = Scale::new(4, false);
        let g = scale.to_grid(0.12346).unwrap();
        assert_eq!(g, 1235);
        assert!((scale.from_grid(g) - 0.1235).abs() < 1e-12);
    }

    #[test]
    fn standard_range_rejects_large_coordinates() {
        let scale = Scale::new(4, false);
        assert!(scale.to_grid(100_000.0).is_ok());
        let err = scale.to_grid(200_000.0).unwrap_err();
        assert!(matches!(err, InputError::CoordinateOutOfRange { .. }));
    }

    #[test]
    fn extended_range_accepts_large_coordinates() {
        let scale = Scale::new(4, true);
        assert!(scale.to_grid(200_000.0).is_ok());
        assert!(scale.to_grid(1e16).is_err());
    }

    #[test]
    fn non_finite_is_rejected() {
        let scale = Scale::default();
        assert_eq!(scale.to_grid(f64::NAN), Err(InputError::NonFiniteCoordinate));
        assert_eq!(
            scale.to_grid(f64::INFINITY),
            Err(InputError::NonFiniteCoordinate)
        );
    }
}
