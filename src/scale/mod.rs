//! Rating scales - the discrete set of permitted rating values.
//!
//! A scale is configured once per reviewable type, either as an explicit
//! list of values or as a numeric range expanded by a step (or step count).
//!
//! ## Example
//!
//! ```
//! use reviewable_rust::{ReviewScale, ScaleSpec};
//!
//! // 1.0, 1.5, 2.0, ... 5.0 with averages rounded to 2 decimals
//! let scale = ReviewScale::build(
//!     ScaleSpec::range(1.0, 5.0).with_step(0.5),
//!     Some(2),
//! ).unwrap();
//!
//! assert!(scale.contains(3.5));
//! assert!(!scale.contains(3.25));
//! ```

mod error;

pub use error::ConfigError;

/// How a rating scale is declared before expansion.
#[derive(Debug, Clone, PartialEq)]
pub struct ScaleSpec {
    kind: SpecKind,
    step: Option<f64>,
    steps: Option<u32>,
}

#[derive(Debug, Clone, PartialEq)]
enum SpecKind {
    Values(Vec<f64>),
    Range { first: f64, last: f64 },
}

impl ScaleSpec {
    /// An explicit set of permitted values.
    pub fn values(values: impl IntoIterator<Item = f64>) -> Self {
        ScaleSpec {
            kind: SpecKind::Values(values.into_iter().collect()),
            step: None,
            steps: None,
        }
    }

    /// A numeric range, expanded to discrete values at build time.
    pub fn range(first: f64, last: f64) -> Self {
        ScaleSpec {
            kind: SpecKind::Range { first, last },
            step: None,
            steps: None,
        }
    }

    /// Expand the range by this step size (e.g. 0.5 for half-star ratings).
    pub fn with_step(mut self, step: f64) -> Self {
        self.step = Some(step);
        self
    }

    /// Expand the range into this many evenly spaced values.
    pub fn with_steps(mut self, steps: u32) -> Self {
        self.steps = Some(steps);
        self
    }
}

/// The expanded, validated rating scale for a reviewable type.
///
/// Holds the ordered permitted values and the decimal precision used when
/// rounding computed averages. Membership is exact: values are generated as
/// `first + i * step` so that a submitted `3.5` compares bit-equal with the
/// expanded value, with no tolerance window.
#[derive(Debug, Clone, PartialEq)]
pub struct ReviewScale {
    values: Vec<f64>,
    precision: u32,
}

impl Default for ReviewScale {
    /// Whole-star ratings 1 through 5.
    fn default() -> Self {
        ReviewScale {
            values: vec![1.0, 2.0, 3.0, 4.0, 5.0],
            precision: 0,
        }
    }
}

impl ReviewScale {
    /// Build a scale from a spec and an optional precision override.
    ///
    /// Precision defaults to the number of decimal digits in the scale's
    /// lowest value. Fails with [`ConfigError`] on empty or non-finite
    /// values, a non-positive step, or a negative precision.
    pub fn build(spec: ScaleSpec, precision: Option<i64>) -> Result<Self, ConfigError> {
        let values = match spec.kind {
            SpecKind::Values(values) => {
                if values.iter().any(|v| !v.is_finite()) {
                    return Err(ConfigError::NonNumericScale { option: "values" });
                }
                let mut values = values;
                values.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
                values.dedup();
                values
            }
            SpecKind::Range { first, last } => {
                if !first.is_finite() || !last.is_finite() {
                    return Err(ConfigError::NonNumericScale { option: "range" });
                }
                if last < first {
                    return Err(ConfigError::InvalidRange { first, last });
                }
                expand_range(first, last, spec.step, spec.steps)?
            }
        };

        if values.is_empty() {
            return Err(ConfigError::EmptyScale);
        }

        let precision = match precision {
            Some(p) if p < 0 => return Err(ConfigError::InvalidPrecision { given: p }),
            Some(p) => p as u32,
            None => decimal_digits(values[0]),
        };

        Ok(ReviewScale { values, precision })
    }

    /// The ordered permitted rating values.
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Decimal places used when rounding computed averages.
    pub fn precision(&self) -> u32 {
        self.precision
    }

    /// Exact membership test used for rating validation.
    pub fn contains(&self, value: f64) -> bool {
        self.values.iter().any(|v| *v == value)
    }

    /// Round a computed average to this scale's precision.
    ///
    /// Half-away-from-zero, shared by the cached and live aggregate paths so
    /// both round identically for the same inputs.
    pub fn round_average(&self, value: f64) -> f64 {
        let factor = 10f64.powi(self.precision as i32);
        (value * factor).round() / factor
    }
}

fn expand_range(
    first: f64,
    last: f64,
    step: Option<f64>,
    steps: Option<u32>,
) -> Result<Vec<f64>, ConfigError> {
    let integral = first.fract() == 0.0 && last.fract() == 0.0;

    if integral && step.is_none() && steps.is_none() {
        let mut values = Vec::new();
        let mut v = first;
        while v <= last {
            values.push(v);
            v += 1.0;
        }
        return Ok(values);
    }

    let step = match step {
        Some(s) => s,
        None => {
            // Derive from the step count, defaulting to one value per whole
            // unit in the range.
            let steps = steps.unwrap_or((last - first) as u32 + 1);
            if steps < 2 {
                return Err(ConfigError::InvalidStep { step: 0.0 });
            }
            (last - first) / (steps - 1) as f64
        }
    };
    if !step.is_finite() || step <= 0.0 {
        return Err(ConfigError::InvalidStep { step });
    }

    // first + i * step keeps half-steps exact in binary floating point,
    // unlike repeated addition.
    let count = ((last - first) / step + 1e-9).floor() as usize + 1;
    Ok((0..count).map(|i| first + i as f64 * step).collect())
}

/// Decimal digits in the shortest rendering of `value` (e.g. 1.25 -> 2).
fn decimal_digits(value: f64) -> u32 {
    let rendered = format!("{}", value);
    match rendered.split_once('.') {
        Some((_, fraction)) => fraction.len() as u32,
        None => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_values() {
        let scale = ReviewScale::build(ScaleSpec::values([3.0, 1.0, 2.0]), None).unwrap();
        assert_eq!(scale.values(), &[1.0, 2.0, 3.0]);
        assert_eq!(scale.precision(), 0);
    }

    #[test]
    fn integral_range_expands_to_whole_numbers() {
        let scale = ReviewScale::build(ScaleSpec::range(1.0, 5.0), None).unwrap();
        assert_eq!(scale.values(), &[1.0, 2.0, 3.0, 4.0, 5.0]);
    }

    #[test]
    fn range_with_half_step() {
        let scale = ReviewScale::build(ScaleSpec::range(1.0, 5.0).with_step(0.5), Some(2)).unwrap();
        assert_eq!(
            scale.values(),
            &[1.0, 1.5, 2.0, 2.5, 3.0, 3.5, 4.0, 4.5, 5.0]
        );
        assert_eq!(scale.precision(), 2);
    }

    #[test]
    fn range_with_step_count() {
        let scale = ReviewScale::build(ScaleSpec::range(0.0, 1.0).with_steps(5), None).unwrap();
        assert_eq!(scale.values(), &[0.0, 0.25, 0.5, 0.75, 1.0]);
    }

    #[test]
    fn fractional_bound_defaults_precision() {
        let scale = ReviewScale::build(ScaleSpec::values([1.25, 2.5]), None).unwrap();
        assert_eq!(scale.precision(), 2);
    }

    #[test]
    fn contains_is_exact() {
        let scale = ReviewScale::build(ScaleSpec::range(1.0, 5.0).with_step(0.5), None).unwrap();
        assert!(scale.contains(2.5));
        assert!(scale.contains(5.0));
        assert!(!scale.contains(2.51));
        assert!(!scale.contains(5.5));
    }

    #[test]
    fn rejects_non_finite_values() {
        let err = ReviewScale::build(ScaleSpec::values([1.0, f64::NAN]), None).unwrap_err();
        assert!(matches!(err, ConfigError::NonNumericScale { option: "values" }));
    }

    #[test]
    fn rejects_empty_scale() {
        let err = ReviewScale::build(ScaleSpec::values([]), None).unwrap_err();
        assert_eq!(err, ConfigError::EmptyScale);
    }

    #[test]
    fn rejects_negative_precision() {
        let err = ReviewScale::build(ScaleSpec::range(1.0, 5.0), Some(-1)).unwrap_err();
        assert_eq!(err, ConfigError::InvalidPrecision { given: -1 });
    }

    #[test]
    fn rejects_inverted_range() {
        let err = ReviewScale::build(ScaleSpec::range(5.0, 1.0), None).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidRange { .. }));
    }

    #[test]
    fn rejects_non_positive_step() {
        let err =
            ReviewScale::build(ScaleSpec::range(1.0, 5.0).with_step(-0.5), None).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidStep { .. }));
    }

    #[test]
    fn rounds_half_away_from_zero() {
        let scale = ReviewScale::build(ScaleSpec::range(1.0, 5.0), Some(2)).unwrap();
        assert_eq!(scale.round_average(4.333333), 4.33);
        assert_eq!(scale.round_average(1.875), 1.88);
        assert_eq!(scale.round_average(1.75), 1.75);
    }

    #[test]
    fn default_scale_is_one_through_five() {
        let scale = ReviewScale::default();
        assert_eq!(scale.values(), &[1.0, 2.0, 3.0, 4.0, 5.0]);
        assert_eq!(scale.precision(), 0);
    }
}
