// Copyright Peter Bower 2025. All Rights Reserved.
// Licensed under MIT License.

//! # Error Module - Custom *Operator* Error Type
//!
//! Defines the unified error type for tensor operators.
//!
//! ## Features
//! - Covers operator configuration problems, broadcast shape incompatibility,
//! storage aliasing, and unimplemented code paths.
//! - Every variant names the operator (`"Div"`, `"TileND"`, ...) that raised it.

use thiserror::Error;

/// Catch all error type for operators and tensors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum OpError {
    /// Bad operator configuration, e.g. a tile list length mismatch or a
    /// non-positive tile factor. The operator instance cannot proceed.
    #[error("{op} configuration error: {message}")]
    Configuration { op: &'static str, message: String },

    /// Operand shapes are incompatible, or the output does not fit the
    /// inferred shape, or the output aliases an input.
    #[error("{op} shape error: {message}")]
    Shape { op: &'static str, message: String },

    /// The requested code path does not exist for this operator.
    #[error("{op} does not implement {what}")]
    NotImplemented { op: &'static str, what: &'static str },

    /// The output buffer is held by another tensor handle and cannot be written.
    #[error("{op} output storage is shared with another tensor handle")]
    SharedOutput { op: &'static str },
}

impl OpError {
    /// Shorthand for [`OpError::Configuration`].
    pub fn config(op: &'static str, message: impl Into<String>) -> Self {
        OpError::Configuration { op, message: message.into() }
    }

    /// Shorthand for [`OpError::Shape`].
    pub fn shape(op: &'static str, message: impl Into<String>) -> Self {
        OpError::Shape { op, message: message.into() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_names_operator() {
        let e = OpError::shape("Div", "dimensions must be equal or 1 at axis 1 (3 vs 4)");
        assert_eq!(
            e.to_string(),
            "Div shape error: dimensions must be equal or 1 at axis 1 (3 vs 4)"
        );

        let e = OpError::NotImplemented { op: "TileND", what: "backward" };
        assert_eq!(e.to_string(), "TileND does not implement backward");
    }
}
