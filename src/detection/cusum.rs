//! One-sided upper Cumulative Sum (CUSUM) for detecting upward drift.
//!
//! # Algorithm
//!
//! Given observations x_0, ..., x_{n-1}, a target mu_0 and a dispersion
//! estimate sigma:
//!
//! ```text
//! C(-1) = 0
//! C(i)  = max(0, C(i-1) + (x_i - mu_0) - k * sigma)
//! ```
//!
//! The statistic is kept in the units of the data. Large or rising values
//! indicate a sustained upward shift; the zero floor resets it whenever the
//! process runs at or below target.
//!
//! # Parameters
//!
//! - **target**: mu_0, the sample mean when unset
//! - **k**: allowance in sigma units, default 0.5
//!
//! # Reference
//!
//! Page, E.S. (1954). "Continuous inspection schemes", *Biometrika* 41(1-2), pp. 100-115.

use serde::{Deserialize, Serialize};

use crate::config::{non_negative, DEFAULT_CUSUM_K};
use crate::error::{Result, SpcError};
use crate::summary::mean_and_population_std;

/// CUSUM parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CusumParams {
    /// Target process mean; the sample mean when `None`.
    pub target: Option<f64>,
    /// Allowance in sigma units.
    pub k: f64,
}

impl Default for CusumParams {
    fn default() -> Self {
        Self {
            target: None,
            k: DEFAULT_CUSUM_K,
        }
    }
}

impl CusumParams {
    /// Creates validated parameters.
    ///
    /// # Errors
    ///
    /// [`SpcError::InvalidParameter`] if `target` is non-finite or `k` is
    /// negative or non-finite.
    pub fn new(target: Option<f64>, k: f64) -> Result<Self> {
        if let Some(t) = target {
            if !t.is_finite() {
                return Err(SpcError::InvalidParameter {
                    name: "target",
                    value: t,
                });
            }
        }
        let k = non_negative("k", k)?;
        Ok(Self { target, k })
    }
}

/// Computes the upper CUSUM statistic for every observation.
///
/// Sigma is the population standard deviation of the finite observations,
/// floored to 1.0 when fewer than two are available or their variance is
/// zero. Non-finite observations carry the previous statistic forward and
/// take no part in the target or sigma estimate.
///
/// The output has the same length as `values` and every element is finite
/// and non-negative.
///
/// # Examples
///
/// ```
/// use factory_spc::detection::{cusum, CusumParams};
///
/// let drift = cusum(&[10.0, 10.0, 10.0, 12.0, 13.0, 14.0], &CusumParams::default());
/// assert_eq!(drift.len(), 6);
/// assert!(drift[5] > drift[3]);
/// assert!(drift.iter().all(|&c| c >= 0.0));
/// ```
///
/// # Complexity
///
/// Time: O(n), Space: O(n)
pub fn cusum(values: &[f64], params: &CusumParams) -> Vec<f64> {
    let (mean, sigma) = estimate(values);
    let target = match params.target {
        Some(t) if t.is_finite() => t,
        _ => mean,
    };
    let k = if params.k.is_finite() { params.k.max(0.0) } else { DEFAULT_CUSUM_K };
    let allowance = k * sigma;

    let mut results = Vec::with_capacity(values.len());
    let mut c = 0.0_f64;
    for &x in values {
        if x.is_finite() {
            let next = (c + (x - target) - allowance).max(0.0);
            if next.is_finite() {
                c = next;
            }
        }
        results.push(c);
    }
    results
}

/// Returns the indices where the CUSUM statistic exceeds `h · sigma`.
///
/// Uses the same target and sigma estimate as [`cusum`]. A convenience for
/// callers that want a decision rule on top of the raw drift signal.
///
/// # Errors
///
/// [`SpcError::InvalidParameter`] if `h` is negative or non-finite.
pub fn drift_points(values: &[f64], params: &CusumParams, h: f64) -> Result<Vec<usize>> {
    let h = non_negative("h", h)?;
    let (_, sigma) = estimate(values);
    let limit = h * sigma;
    Ok(cusum(values, params)
        .into_iter()
        .enumerate()
        .filter(|&(_, c)| c > limit)
        .map(|(i, _)| i)
        .collect())
}

/// Mean and sigma of the finite observations.
///
/// The mean is 0 when there are none; sigma is floored to 1.0 for fewer
/// than two observations or zero variance.
fn estimate(values: &[f64]) -> (f64, f64) {
    let finite: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
    match mean_and_population_std(&finite) {
        Some((mean, std)) if finite.len() > 1 && std > 0.0 => (mean, std),
        Some((mean, _)) => (mean, 1.0),
        None => (0.0, 1.0),
    }
}
