//! Control limits and single-sequence (Shewhart) limit estimation.
//!
//! # References
//!
//! - Montgomery, D.C. (2019). *Introduction to Statistical Quality Control*, 8th ed.
//! - ASTM E2587 — Standard Practice for Use of Control Charts

use serde::{Deserialize, Serialize};

use crate::summary::mean_and_population_std;

/// Control limits for a chart.
///
/// Represents the center line, upper control limit (UCL), and lower control
/// limit (LCL) together with the dispersion estimate they were derived from.
///
/// # Invariants
///
/// - `lcl <= center <= ucl` (equal when `sigma == 0`)
/// - All values are finite
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ControlLimits {
    /// Center line (process mean or mean of subgroup statistics).
    pub center: f64,
    /// Upper control limit.
    pub ucl: f64,
    /// Lower control limit.
    pub lcl: f64,
    /// Dispersion estimate behind the limits.
    pub sigma: f64,
}

impl ControlLimits {
    /// All-zero limits, used wherever there is no data to estimate from.
    pub const fn zeroed() -> Self {
        Self {
            center: 0.0,
            ucl: 0.0,
            lcl: 0.0,
            sigma: 0.0,
        }
    }

    /// Whether `value` lies strictly outside the limits.
    pub fn is_beyond(&self, value: f64) -> bool {
        value > self.ucl || value < self.lcl
    }
}

impl Default for ControlLimits {
    fn default() -> Self {
        Self::zeroed()
    }
}

/// Computes `center ± k·sigma` limits from a single sequence.
///
/// The center is the arithmetic mean and sigma the population standard
/// deviation (ddof = 0). A single observation yields `sigma = 0` and
/// collapsed limits.
///
/// # Returns
///
/// `None` if `values` is empty, contains a non-finite value, or `k` is
/// negative or non-finite. Callers with possibly empty input substitute
/// [`ControlLimits::zeroed`].
///
/// # Examples
///
/// ```
/// use factory_spc::spc::simple_limits;
///
/// let limits = simple_limits(&[10.0, 11.0, 12.0, 13.0, 14.0], 3.0).unwrap();
/// assert!((limits.center - 12.0).abs() < 1e-12);
/// assert!(limits.ucl > 12.0);
/// assert!(limits.lcl < 12.0);
/// ```
pub fn simple_limits(values: &[f64], k: f64) -> Option<ControlLimits> {
    if !k.is_finite() || k < 0.0 {
        return None;
    }
    let (center, std) = mean_and_population_std(values)?;
    let sigma = if values.len() > 1 { std } else { 0.0 };
    let limits = ControlLimits {
        center,
        ucl: center + k * sigma,
        lcl: center - k * sigma,
        sigma,
    };
    (limits.ucl.is_finite() && limits.lcl.is_finite()).then_some(limits)
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn limits_are_ordered(
            data in proptest::collection::vec(-1e6_f64..1e6, 1..=100),
            k in 0.0_f64..6.0,
        ) {
            let limits = simple_limits(&data, k).expect("finite input");
            prop_assert!(limits.lcl <= limits.center);
            prop_assert!(limits.center <= limits.ucl);
            prop_assert!(limits.sigma >= 0.0);
        }

        #[test]
        fn limits_are_finite(
            data in proptest::collection::vec(-1e6_f64..1e6, 1..=100),
        ) {
            let limits = simple_limits(&data, 3.0).expect("finite input");
            prop_assert!(limits.center.is_finite());
            prop_assert!(limits.ucl.is_finite());
            prop_assert!(limits.lcl.is_finite());
            prop_assert!(limits.sigma.is_finite());
        }
    }
}
