//! Population moments shared by the limits, drift, and outlier routines.
//!
//! Thin wrappers over `u_numflow::stats`: the Kahan-compensated mean and the
//! Welford population standard deviation (ddof = 0), which is what every SPC
//! routine in this crate reports as sigma. The wrappers add an overflow
//! guard, since finite input can still sum past `f64::MAX`.

use u_numflow::stats;

/// Population mean and standard deviation of `data`.
///
/// Finite data whose moments overflow (magnitudes near `f64::MAX`) is
/// rescaled by its largest magnitude first. `None` only if `data` is empty
/// or contains a non-finite value.
pub(crate) fn mean_and_population_std(data: &[f64]) -> Option<(f64, f64)> {
    moments(data).or_else(|| rescaled_moments(data))
}

fn moments(data: &[f64]) -> Option<(f64, f64)> {
    let mean = stats::mean(data).filter(|m| m.is_finite())?;
    let std = stats::population_std_dev(data).filter(|s| s.is_finite())?;
    Some((mean, std))
}

fn rescaled_moments(data: &[f64]) -> Option<(f64, f64)> {
    let magnitudes: Vec<f64> = data.iter().map(|v| v.abs()).collect();
    let scale = stats::max(&magnitudes).filter(|s| s.is_finite() && *s > 0.0)?;
    let scaled: Vec<f64> = data.iter().map(|v| v / scale).collect();
    let (mean, std) = moments(&scaled)?;
    Some((mean * scale, std * scale)).filter(|(m, s)| m.is_finite() && s.is_finite())
}

/// Mean of `data` with the same overflow rescaling as
/// [`mean_and_population_std`].
pub(crate) fn finite_mean(data: &[f64]) -> Option<f64> {
    stats::mean(data)
        .filter(|m| m.is_finite())
        .or_else(|| rescaled_moments(data).map(|(mean, _)| mean))
}

/// Population standard deviation, or 0 for fewer than two values.
pub(crate) fn population_std_or_zero(data: &[f64]) -> f64 {
    if data.len() < 2 {
        return 0.0;
    }
    mean_and_population_std(data).map_or(0.0, |(_, std)| std)
}

/// Minimum and maximum of non-empty, finite `data`.
pub(crate) fn min_max(data: &[f64]) -> Option<(f64, f64)> {
    if data.iter().any(|v| !v.is_finite()) {
        return None;
    }
    Some((stats::min(data)?, stats::max(data)?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_population_std_known_value() {
        // Mean 5, squared deviations sum to 32, n = 8
        let data = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        let (mean, std) = mean_and_population_std(&data).expect("finite data");
        assert!((mean - 5.0).abs() < 1e-12);
        assert!((std - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_rejects_empty_and_non_finite() {
        assert!(mean_and_population_std(&[]).is_none());
        assert!(mean_and_population_std(&[1.0, f64::NAN]).is_none());
        assert!(min_max(&[]).is_none());
        assert!(min_max(&[f64::INFINITY]).is_none());
    }

    #[test]
    fn test_huge_magnitudes_rescaled() {
        let (mean, std) = mean_and_population_std(&[1e308, 1e308, 1e308]).expect("finite data");
        assert!((mean - 1e308).abs() <= 1e293);
        assert_eq!(std, 0.0);

        let (mean, std) = mean_and_population_std(&[1e308, -1e308]).expect("finite data");
        assert!(mean.abs() <= 1e293);
        assert!((std - 1e308).abs() <= 1e293);
        assert_eq!(min_max(&[1e308, -1e308]), Some((-1e308, 1e308)));
        assert!(finite_mean(&[1.7e308, 1.7e308]).is_some_and(f64::is_finite));
    }

    #[test]
    fn test_std_or_zero_short_input() {
        assert_eq!(population_std_or_zero(&[]), 0.0);
        assert_eq!(population_std_or_zero(&[42.0]), 0.0);
        assert!((population_std_or_zero(&[1.0, 3.0]) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_min_max() {
        assert_eq!(min_max(&[3.0, -1.0, 7.5, 2.0]), Some((-1.0, 7.5)));
    }
}
