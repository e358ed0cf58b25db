//! Error types.
//!
//! Numeric routines never fail on valid numbers; degenerate inputs resolve to
//! documented fallbacks instead. [`SpcError`] is reserved for caller mistakes:
//! unknown method names, out-of-range parameters, and mismatched inputs.

use thiserror::Error;

/// Errors surfaced by the query, configuration, and chart layers.
#[derive(Debug, Error)]
pub enum SpcError {
    /// Anomaly detection method name outside `{"zscore", "iqr"}`.
    #[error("unknown anomaly detection method '{0}', expected 'zscore' or 'iqr'")]
    UnknownMethod(String),

    /// A numeric parameter is out of its accepted range.
    #[error("invalid parameter {name}: {value}")]
    InvalidParameter { name: &'static str, value: f64 },

    /// Parallel label and value sequences differ in length.
    #[error("{labels} labels supplied for {values} values")]
    LengthMismatch { labels: usize, values: usize },

    /// A reading value is NaN or infinite.
    #[error("non-finite reading at index {index}")]
    NonFiniteValue { index: usize },

    /// Configuration document could not be parsed.
    #[error("failed to parse configuration: {0}")]
    Config(#[from] serde_json::Error),
}

/// Crate-wide result alias.
pub type Result<T> = core::result::Result<T, SpcError>;

/// Rejects the first non-finite value in `values`.
pub(crate) fn ensure_finite(values: &[f64]) -> Result<()> {
    match values.iter().position(|v| !v.is_finite()) {
        Some(index) => Err(SpcError::NonFiniteValue { index }),
        None => Ok(()),
    }
}

/// Rejects label sequences whose length differs from `values_len`.
pub(crate) fn ensure_same_len(labels: usize, values: usize) -> Result<()> {
    if labels == values {
        Ok(())
    } else {
        Err(SpcError::LengthMismatch { labels, values })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ensure_finite_reports_first_bad_index() {
        let err = ensure_finite(&[1.0, 2.0, f64::NAN, f64::INFINITY]).unwrap_err();
        assert!(matches!(err, SpcError::NonFiniteValue { index: 2 }));
        assert!(ensure_finite(&[]).is_ok());
    }

    #[test]
    fn test_ensure_same_len() {
        assert!(ensure_same_len(3, 3).is_ok());
        let err = ensure_same_len(2, 3).unwrap_err();
        assert_eq!(err.to_string(), "2 labels supplied for 3 values");
    }

    #[test]
    fn test_unknown_method_message() {
        let err = SpcError::UnknownMethod("mad".into());
        assert!(err.to_string().contains("'mad'"));
    }
}
