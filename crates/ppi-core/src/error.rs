//! Error type for the ppi-core public API.
//!
//! Every weighted average in the crate adds a small epsilon to its
//! denominator, so numerically degenerate regions (flat patches, identical
//! neighbors) produce a defined value instead of an error. The variants
//! below are the only failures a caller can observe.

use thiserror::Error;

/// Unified error type for all core operations.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CoreError {
    /// No channel data was supplied.
    #[error("input not found: {0}")]
    InputNotFound(String),

    /// Two images that must share dimensions do not.
    #[error("shape mismatch in {context}: expected {expected:?}, found {found:?}")]
    ShapeMismatch {
        /// Which operation detected the mismatch
        context: &'static str,
        /// Expected `(height, width)`
        expected: (usize, usize),
        /// Actual `(height, width)`
        found: (usize, usize),
    },

    /// A method name, scale factor or numeric option is out of range.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),
}

impl CoreError {
    pub(crate) fn shape(
        context: &'static str,
        expected: (usize, usize),
        found: (usize, usize),
    ) -> Self {
        CoreError::ShapeMismatch {
            context,
            expected,
            found,
        }
    }
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, CoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_input_not_found_message() {
        let error = CoreError::InputNotFound("empty channel stack".to_string());
        assert_eq!(error.to_string(), "input not found: empty channel stack");
    }

    #[test]
    fn test_shape_mismatch_message() {
        let error = CoreError::shape("difference", (4, 5), (4, 6));
        assert_eq!(
            error.to_string(),
            "shape mismatch in difference: expected (4, 5), found (4, 6)"
        );
    }

    #[test]
    fn test_invalid_parameter_message() {
        let error = CoreError::InvalidParameter("scale_factor must be >= 1".to_string());
        assert_eq!(
            error.to_string(),
            "invalid parameter: scale_factor must be >= 1"
        );
    }
}
