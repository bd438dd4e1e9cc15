//! Error types for Ahorro operations.
//!
//! Provides rich error context for library consumers.

use std::fmt;

/// Main error type for Ahorro operations.
///
/// Covers the prediction-domain failures (unknown labels, unloaded
/// snapshots, empty training data, invalid derived features) as well as
/// the numeric and I/O failures underneath them.
///
/// # Examples
///
/// ```
/// use ahorro::error::AhorroError;
///
/// let err = AhorroError::UnknownLabel {
///     field: "category".to_string(),
///     label: "NotARealCategory".to_string(),
/// };
/// assert!(err.to_string().contains("unknown category"));
/// ```
#[derive(Debug)]
pub enum AhorroError {
    /// Categorical label absent from the training-time dictionary.
    UnknownLabel {
        /// Encoded field ("category" or "platform")
        field: String,
        /// The label that was not seen during training
        label: String,
    },

    /// Snapshot not loaded or incomplete; inference must not proceed.
    NotReady {
        /// The artifact that is missing or unreadable
        missing: String,
    },

    /// Training was invoked with zero source rows.
    NoData {
        /// Description of the empty source
        source: String,
    },

    /// Invalid value in a derived-feature computation (e.g. zero price).
    Domain {
        /// What made the input invalid
        message: String,
    },

    /// Matrix/vector dimensions don't match for the operation.
    DimensionMismatch {
        /// Expected dimensions description
        expected: String,
        /// Actual dimensions found
        actual: String,
    },

    /// I/O error (file not found, permission denied, etc.).
    Io(std::io::Error),

    /// Serialization/deserialization error.
    Serialization(String),

    /// Generic error with string message.
    Other(String),
}

impl fmt::Display for AhorroError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AhorroError::UnknownLabel { field, label } => {
                write!(f, "unknown {field} label: {label:?} was not seen during training")
            }
            AhorroError::NotReady { missing } => {
                write!(f, "snapshot not ready: {missing}")
            }
            AhorroError::NoData { source } => {
                write!(f, "no training data: {source}")
            }
            AhorroError::Domain { message } => {
                write!(f, "domain error: {message}")
            }
            AhorroError::DimensionMismatch { expected, actual } => {
                write!(f, "dimension mismatch: expected {expected}, got {actual}")
            }
            AhorroError::Io(e) => write!(f, "I/O error: {e}"),
            AhorroError::Serialization(msg) => write!(f, "Serialization error: {msg}"),
            AhorroError::Other(msg) => write!(f, "{msg}"),
        }
    }
}

impl std::error::Error for AhorroError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AhorroError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for AhorroError {
    fn from(err: std::io::Error) -> Self {
        AhorroError::Io(err)
    }
}

impl From<&str> for AhorroError {
    fn from(msg: &str) -> Self {
        AhorroError::Other(msg.to_string())
    }
}

impl From<String> for AhorroError {
    fn from(msg: String) -> Self {
        AhorroError::Other(msg)
    }
}

impl AhorroError {
    /// Create an unknown-label error for an encoded categorical field.
    #[must_use]
    pub fn unknown_label(field: &str, label: &str) -> Self {
        Self::UnknownLabel {
            field: field.to_string(),
            label: label.to_string(),
        }
    }

    /// Create a not-ready error naming the missing artifact.
    #[must_use]
    pub fn not_ready(missing: &str) -> Self {
        Self::NotReady {
            missing: missing.to_string(),
        }
    }

    /// Create a domain error with descriptive context.
    #[must_use]
    pub fn domain(message: impl Into<String>) -> Self {
        Self::Domain {
            message: message.into(),
        }
    }

    /// Create a dimension mismatch error for a feature-width check.
    #[must_use]
    pub fn dimension_mismatch(context: &str, expected: usize, actual: usize) -> Self {
        Self::DimensionMismatch {
            expected: format!("{context}={expected}"),
            actual: format!("{actual}"),
        }
    }
}

/// Convenience type alias for Results.
pub type Result<T> = std::result::Result<T, AhorroError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_label_display() {
        let err = AhorroError::unknown_label("platform", "Etsy");
        let msg = err.to_string();
        assert!(msg.contains("unknown platform label"));
        assert!(msg.contains("Etsy"));
    }

    #[test]
    fn test_not_ready_display() {
        let err = AhorroError::not_ready("discount_model.bin");
        assert!(err.to_string().contains("snapshot not ready"));
        assert!(err.to_string().contains("discount_model.bin"));
    }

    #[test]
    fn test_no_data_display() {
        let err = AhorroError::NoData {
            source: "products table is empty".to_string(),
        };
        assert!(err.to_string().contains("no training data"));
    }

    #[test]
    fn test_domain_display() {
        let err = AhorroError::domain("price must be positive, got 0");
        assert!(err.to_string().contains("domain error"));
        assert!(err.to_string().contains("price must be positive"));
    }

    #[test]
    fn test_dimension_mismatch_display() {
        let err = AhorroError::dimension_mismatch("features", 8, 7);
        let msg = err.to_string();
        assert!(msg.contains("features=8"));
        assert!(msg.contains('7'));
    }

    #[test]
    fn test_from_str() {
        let err: AhorroError = "test error".into();
        assert!(matches!(err, AhorroError::Other(_)));
        assert_eq!(err.to_string(), "test error");
    }

    #[test]
    fn test_from_string() {
        let err: AhorroError = "test error".to_string().into();
        assert!(matches!(err, AhorroError::Other(_)));
    }

    #[test]
    fn test_from_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: AhorroError = io_err.into();
        assert!(matches!(err, AhorroError::Io(_)));
    }

    #[test]
    fn test_error_source_io() {
        use std::error::Error;
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err = AhorroError::Io(io_err);
        assert!(err.source().is_some());
    }

    #[test]
    fn test_error_source_other() {
        use std::error::Error;
        let err = AhorroError::Other("test".to_string());
        assert!(err.source().is_none());
    }
}
