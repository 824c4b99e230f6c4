use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Result of evaluating one arc: number of source activations and how many of them violate the arc
#[derive(
    Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq, Hash, JsonSchema,
)]
pub struct ViolationResult {
    /// Number of source activations
    pub total: usize,
    /// Number of violating source activations
    pub violating: usize,
}

/// The violation fraction of an arc without any source activation
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("violation fraction is undefined for zero activations")]
pub struct DivisionUndefined;

/// Display form of a [`ViolationResult`]
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, JsonSchema)]
pub struct ViolationPercentage {
    /// Percentage of violating activations (0 to 100)
    pub percent: f64,
    /// Set if there was no activation at all (`percent` is then 0)
    pub no_data: bool,
}

impl ViolationResult {
    /// Create a new result
    pub fn new(total: usize, violating: usize) -> Self {
        Self { total, violating }
    }

    /// Fraction of violating activations (0 to 1)
    pub fn violation_fraction(&self) -> Result<f64, DivisionUndefined> {
        if self.total == 0 {
            return Err(DivisionUndefined);
        }
        Ok(self.violating as f64 / self.total as f64)
    }

    /// Percentage for display; 0% with `no_data` instead of NaN for zero activations
    pub fn violation_percentage(&self) -> ViolationPercentage {
        match self.violation_fraction() {
            Ok(fraction) => ViolationPercentage {
                percent: 100.0 * fraction,
                no_data: false,
            },
            Err(DivisionUndefined) => ViolationPercentage {
                percent: 0.0,
                no_data: true,
            },
        }
    }

    /// Whether the fraction of violating activations is at most `noise`
    ///
    /// Results without activations count as satisfied.
    pub fn is_within_noise(&self, noise: f64) -> bool {
        self.violating <= allowed_violations(self.total, noise)
    }
}

/// Relative tolerance for noise thresholds
///
/// `1.0 - 0.8` is `0.19999999999999996`, which must still allow one violation out of five.
const NOISE_TOLERANCE: f64 = 1e-9;

/// Maximal number of violating activations (out of `activations`) within a noise threshold
pub fn allowed_violations(activations: usize, noise: f64) -> usize {
    if noise.is_nan() || noise <= 0.0 {
        return 0;
    }
    let allowed = (activations as f64 * noise * (1.0 + NOISE_TOLERANCE)).floor() as usize;
    allowed.min(activations)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_total_is_zero_percent() {
        let res = ViolationResult::new(0, 0);
        assert_eq!(res.violation_fraction(), Err(DivisionUndefined));
        let pct = res.violation_percentage();
        assert_eq!(pct.percent, 0.0);
        assert!(pct.no_data);
        assert!(!pct.percent.is_nan());
    }

    #[test]
    fn test_percentage() {
        let pct = ViolationResult::new(4, 1).violation_percentage();
        assert_eq!(pct.percent, 25.0);
        assert!(!pct.no_data);
        assert!(ViolationResult::new(4, 1).is_within_noise(0.25));
        assert!(!ViolationResult::new(4, 2).is_within_noise(0.25));
    }

    #[test]
    fn test_allowed_violations() {
        assert_eq!(allowed_violations(5, 1.0 - 0.8), 1);
        assert_eq!(allowed_violations(10, 1.0 - 0.7), 3);
        assert_eq!(allowed_violations(5, 1.0 - 0.81), 0);
        assert_eq!(allowed_violations(5, 0.0), 0);
        assert_eq!(allowed_violations(5, f64::NAN), 0);
        assert_eq!(allowed_violations(3, 2.0), 3);
        assert!(ViolationResult::new(5, 1).is_within_noise(1.0 - 0.8));
        assert!(!ViolationResult::new(5, 2).is_within_noise(1.0 - 0.8));
    }
}
