//! X-bar/R limits for a single ordered sequence.
//!
//! The sequence is cut into contiguous, non-overlapping subgroups of fixed
//! size. Each subgroup contributes its mean to the X-bar chart and its range
//! to the R chart.
//!
//! # Control Chart Factors
//!
//! Constants (A2, D3, D4) are sourced from ASTM E2587 — Standard Practice for
//! Use of Control Charts in Statistical Process Control.
//!
//! # References
//!
//! - Montgomery, D.C. (2019). *Introduction to Statistical Quality Control*, 8th ed.
//! - ASTM E2587 — Standard Practice for Use of Control Charts
//! - Shewhart, W.A. (1931). *Economic Control of Quality of Manufactured Product*.

use serde::{Deserialize, Serialize};
use u_numflow::stats;

use super::chart::{simple_limits, ControlLimits};
use crate::config::DEFAULT_SIGMA_MULTIPLIER;
use crate::summary::{finite_mean, population_std_or_zero};

// ---------------------------------------------------------------------------
// Control chart factor table (ASTM E2587), indexed by subgroup size n=2..10
// ---------------------------------------------------------------------------

/// Factors for one subgroup size.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SubgroupFactors {
    /// X-bar limit factor: `CL ± A2 · R-bar`.
    pub a2: f64,
    /// R chart lower factor: `LCL_R = D3 · R-bar`.
    pub d3: f64,
    /// R chart upper factor: `UCL_R = D4 · R-bar`.
    pub d4: f64,
}

/// Smallest subgroup size with tabulated factors.
pub const MIN_SUBGROUP_SIZE: usize = 2;
/// Largest subgroup size with tabulated factors.
pub const MAX_SUBGROUP_SIZE: usize = 10;

/// Index 0 corresponds to n=2.
const FACTORS: [SubgroupFactors; 9] = [
    SubgroupFactors { a2: 1.880, d3: 0.0, d4: 3.267 },
    SubgroupFactors { a2: 1.023, d3: 0.0, d4: 2.574 },
    SubgroupFactors { a2: 0.729, d3: 0.0, d4: 2.282 },
    SubgroupFactors { a2: 0.577, d3: 0.0, d4: 2.114 },
    SubgroupFactors { a2: 0.483, d3: 0.0, d4: 2.004 },
    SubgroupFactors { a2: 0.419, d3: 0.076, d4: 1.924 },
    SubgroupFactors { a2: 0.373, d3: 0.136, d4: 1.864 },
    SubgroupFactors { a2: 0.337, d3: 0.184, d4: 1.816 },
    SubgroupFactors { a2: 0.308, d3: 0.223, d4: 1.777 },
];

/// Row used for sizes outside `2..=10`.
const FALLBACK_SIZE: usize = 5;

/// Looks up the factors for `subgroup_size`, falling back to the n=5 row for
/// sizes without a tabulated entry.
///
/// # Examples
///
/// ```
/// use factory_spc::spc::subgroup_factors;
///
/// assert_eq!(subgroup_factors(2).a2, 1.880);
/// assert_eq!(subgroup_factors(25), subgroup_factors(5));
/// ```
pub fn subgroup_factors(subgroup_size: usize) -> SubgroupFactors {
    let size = if (MIN_SUBGROUP_SIZE..=MAX_SUBGROUP_SIZE).contains(&subgroup_size) {
        subgroup_size
    } else {
        FALLBACK_SIZE
    };
    FACTORS[size - MIN_SUBGROUP_SIZE]
}

/// X-bar and R limits computed from one sequence.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SubgroupLimits {
    /// Subgroup size actually used, after any shrinking.
    pub subgroup_size: usize,
    /// Limits for subgroup means.
    pub xbar: ControlLimits,
    /// Limits for subgroup ranges.
    pub range: ControlLimits,
}

/// Computes X-bar and R control limits from an ordered sequence.
///
/// # Algorithm
///
/// 1. If there are fewer than `2 · subgroup_size` samples, shrink the size to
///    `max(2, min(n / 2, 10))` (or 2 when `n < 4`).
/// 2. Cut the sequence into full subgroups, discarding any trailing remainder.
/// 3. X-bar: CL = mean of subgroup means, UCL/LCL = CL ± A2 · R-bar.
/// 4. R: CL = R-bar, UCL = D4 · R-bar, LCL = D3 · R-bar.
/// 5. Sigma is the population standard deviation of the subgroup means
///    (resp. ranges), or 0 with a single subgroup.
///
/// When not even one subgroup fits, the X-bar limits degrade to
/// [`simple_limits`] with k = 3 and the R limits are zeroed.
///
/// # Returns
///
/// `None` if `values` is empty or contains a non-finite value.
///
/// # Examples
///
/// ```
/// use factory_spc::spc::xbar_r_limits;
///
/// let values: Vec<f64> = (0..20).map(f64::from).collect();
/// let limits = xbar_r_limits(&values, 5).unwrap();
/// assert!((limits.xbar.center - 9.5).abs() < 1e-12);
/// assert!((limits.range.center - 4.0).abs() < 1e-12);
/// assert!(limits.xbar.ucl > limits.xbar.lcl);
/// ```
///
/// # Reference
///
/// Montgomery, D.C. (2019). *Introduction to Statistical Quality Control*, 8th ed.,
/// Chapter 6: Control Charts for Variables.
pub fn xbar_r_limits(values: &[f64], subgroup_size: usize) -> Option<SubgroupLimits> {
    if values.is_empty() || values.iter().any(|v| !v.is_finite()) {
        return None;
    }

    let n = values.len();
    let requested = subgroup_size.max(MIN_SUBGROUP_SIZE);
    let size = effective_subgroup_size(n, requested);
    if size != requested {
        tracing::debug!(n, requested, size, "shrinking subgroup size for short sequence");
    }

    if n < size {
        tracing::debug!(n, size, "no complete subgroup, using single-sequence limits");
        return Some(SubgroupLimits {
            subgroup_size: size,
            xbar: simple_limits(values, DEFAULT_SIGMA_MULTIPLIER)?,
            range: ControlLimits::zeroed(),
        });
    }

    let mut means = Vec::with_capacity(n / size);
    let mut ranges = Vec::with_capacity(n / size);
    for subgroup in values.chunks_exact(size) {
        means.push(finite_mean(subgroup)?);
        ranges.push(subgroup_range(subgroup)?);
    }

    let grand_mean = finite_mean(&means)?;
    let r_bar = finite_mean(&ranges)?;
    let factors = subgroup_factors(size);

    let limits = SubgroupLimits {
        subgroup_size: size,
        xbar: ControlLimits {
            center: grand_mean,
            ucl: grand_mean + factors.a2 * r_bar,
            lcl: grand_mean - factors.a2 * r_bar,
            sigma: population_std_or_zero(&means),
        },
        range: ControlLimits {
            center: r_bar,
            ucl: factors.d4 * r_bar,
            lcl: factors.d3 * r_bar,
            sigma: population_std_or_zero(&ranges),
        },
    };
    (limits.xbar.ucl.is_finite() && limits.xbar.lcl.is_finite() && limits.range.ucl.is_finite())
        .then_some(limits)
}

/// Subgroup size used for a sequence of length `n`.
fn effective_subgroup_size(n: usize, requested: usize) -> usize {
    if n >= requested.saturating_mul(2) {
        requested
    } else if n >= 4 {
        (n / 2).clamp(MIN_SUBGROUP_SIZE, MAX_SUBGROUP_SIZE)
    } else {
        MIN_SUBGROUP_SIZE
    }
}

/// Range (max - min) of a subgroup.
fn subgroup_range(subgroup: &[f64]) -> Option<f64> {
    let max = stats::max(subgroup)?;
    let min = stats::min(subgroup)?;
    Some(max - min)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn ramp(n: usize) -> Vec<f64> {
        (0..n).map(|i| i as f64).collect()
    }

    #[test]
    fn test_xbar_r_ramp_of_twenty() {
        let limits = xbar_r_limits(&ramp(20), 5).expect("finite input");
        assert_eq!(limits.subgroup_size, 5);
        // Subgroup means: 2, 7, 12, 17; every range is 4
        assert!((limits.xbar.center - 9.5).abs() < 1e-12);
        assert!((limits.range.center - 4.0).abs() < 1e-12);
        assert!((limits.xbar.ucl - (9.5 + 0.577 * 4.0)).abs() < 1e-12);
        assert!((limits.xbar.lcl - (9.5 - 0.577 * 4.0)).abs() < 1e-12);
        assert!((limits.range.ucl - 2.114 * 4.0).abs() < 1e-12);
        assert_eq!(limits.range.lcl, 0.0);
        // Population std of [2, 7, 12, 17]
        assert!((limits.xbar.sigma - 31.25_f64.sqrt()).abs() < 1e-12);
        assert_eq!(limits.range.sigma, 0.0);
    }

    #[test]
    fn test_xbar_r_basic_limits() {
        let data = [
            72.0, 84.0, 79.0, 49.0, 56.0, 87.0, 33.0, 42.0, 55.0, 73.0, 22.0, 60.0, 44.0, 80.0,
            54.0, 74.0, 97.0, 26.0, 48.0, 58.0,
        ];
        let limits = xbar_r_limits(&data, 4).expect("finite input");
        // Subgroup means: 71.0, 54.5, 52.5, 63.0, 57.25
        let expected_grand_mean = (71.0 + 54.5 + 52.5 + 63.0 + 57.25) / 5.0;
        assert!(
            (limits.xbar.center - expected_grand_mean).abs() < 1e-9,
            "CL={}, expected ~{expected_grand_mean}",
            limits.xbar.center
        );
        // Ranges: 35, 54, 51, 36, 71
        let r_bar = (35.0 + 54.0 + 51.0 + 36.0 + 71.0) / 5.0;
        assert!((limits.range.center - r_bar).abs() < 1e-9);
        assert!((limits.xbar.ucl - (expected_grand_mean + 0.729 * r_bar)).abs() < 1e-9);
    }

    #[test]
    fn test_xbar_r_discards_trailing_remainder() {
        // 12 values with n=5: two full subgroups, last two values dropped
        let mut data = ramp(10);
        data.extend([1000.0, -1000.0]);
        let limits = xbar_r_limits(&data, 5).expect("finite input");
        assert_eq!(limits.subgroup_size, 5);
        assert!((limits.xbar.center - 4.5).abs() < 1e-12);
    }

    #[test]
    fn test_xbar_r_shrinks_for_short_sequence() {
        // n=6 < 2*5, so size becomes min(6/2, 10) = 3
        let limits = xbar_r_limits(&ramp(6), 5).expect("finite input");
        assert_eq!(limits.subgroup_size, 3);
        // Means 1 and 4, ranges both 2
        assert!((limits.xbar.center - 2.5).abs() < 1e-12);
        assert!((limits.range.center - 2.0).abs() < 1e-12);
        assert!((limits.xbar.ucl - (2.5 + 1.023 * 2.0)).abs() < 1e-12);
        assert!((limits.xbar.sigma - 1.5).abs() < 1e-12);
    }

    #[test]
    fn test_xbar_r_three_values_uses_pairs() {
        let limits = xbar_r_limits(&[1.0, 3.0, 100.0], 5).expect("finite input");
        assert_eq!(limits.subgroup_size, 2);
        // Single subgroup [1, 3]; 100 is the discarded remainder
        assert!((limits.xbar.center - 2.0).abs() < 1e-12);
        assert!((limits.range.center - 2.0).abs() < 1e-12);
        assert_eq!(limits.xbar.sigma, 0.0);
        assert_eq!(limits.range.sigma, 0.0);
    }

    #[test]
    fn test_xbar_r_single_value_falls_back() {
        let limits = xbar_r_limits(&[42.0], 5).expect("finite input");
        assert_eq!(limits.xbar, simple_limits(&[42.0], 3.0).expect("finite input"));
        assert_eq!(limits.range, ControlLimits::zeroed());
    }

    #[test]
    fn test_xbar_r_constant_subgroups() {
        let limits = xbar_r_limits(&[10.0; 6], 3).expect("finite input");
        assert!((limits.xbar.center - 10.0).abs() < f64::EPSILON);
        assert_eq!(limits.xbar.ucl, limits.xbar.lcl);
        assert_eq!(limits.range.center, 0.0);
        assert_eq!(limits.range.ucl, 0.0);
    }

    #[test]
    fn test_xbar_r_large_size_uses_fallback_factors() {
        // 24 values with n=12: no shrink, factors from the n=5 row
        let limits = xbar_r_limits(&ramp(24), 12).expect("finite input");
        assert_eq!(limits.subgroup_size, 12);
        assert!((limits.range.center - 11.0).abs() < 1e-12);
        assert!((limits.xbar.ucl - (limits.xbar.center + 0.577 * 11.0)).abs() < 1e-12);
    }

    #[test]
    fn test_xbar_r_size_below_two_treated_as_two() {
        let a = xbar_r_limits(&ramp(10), 0).expect("finite input");
        let b = xbar_r_limits(&ramp(10), 2).expect("finite input");
        assert_eq!(a, b);
    }

    #[test]
    fn test_xbar_r_rejects_bad_input() {
        assert!(xbar_r_limits(&[], 5).is_none());
        assert!(xbar_r_limits(&[1.0, f64::NAN, 3.0, 4.0], 2).is_none());
    }

    #[test]
    fn test_r_chart_lcl_from_d3() {
        // n=7 has D3 = 0.076
        let limits = xbar_r_limits(&ramp(14), 7).expect("finite input");
        assert!((limits.range.center - 6.0).abs() < 1e-12);
        assert!((limits.range.lcl - 0.076 * 6.0).abs() < 1e-12);
        assert!((limits.range.ucl - 1.924 * 6.0).abs() < 1e-12);
    }

    #[test]
    fn test_subgroup_factors_table() {
        let f5 = subgroup_factors(5);
        assert!((f5.a2 - 0.577).abs() < 1e-10);
        assert!((f5.d3 - 0.0).abs() < 1e-10);
        assert!((f5.d4 - 2.114).abs() < 1e-10);

        let f10 = subgroup_factors(10);
        assert!((f10.a2 - 0.308).abs() < 1e-10);
        assert!((f10.d3 - 0.223).abs() < 1e-10);

        assert_eq!(subgroup_factors(1), f5);
        assert_eq!(subgroup_factors(11), f5);
    }

    #[test]
    fn test_effective_subgroup_size() {
        assert_eq!(effective_subgroup_size(100, 5), 5);
        assert_eq!(effective_subgroup_size(9, 5), 4);
        assert_eq!(effective_subgroup_size(4, 5), 2);
        assert_eq!(effective_subgroup_size(3, 5), 2);
        assert_eq!(effective_subgroup_size(40, 25), 10);
    }
}
