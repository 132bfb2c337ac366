// Copyright Peter Bower 2025. All Rights Reserved.
// Licensed under MIT License.

//! # Divisor Enum Module
//!
//! Where the right-hand operand of a division comes from.

/// Source of a division's right-hand operand.
///
/// Generic over the payload so the same resolution serves shape inference
/// (`Divisor<&Shape>`) and evaluation (`Divisor<&Tensor<T>>`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Divisor<D> {
    /// Second input of the operator.
    SecondOperand(D),

    /// Parameter tensor stored on the operator, used when only one input is wired.
    StoredParameter(D),
}

impl<D> Divisor<D> {
    /// The payload regardless of its source.
    #[inline]
    pub fn into_inner(self) -> D {
        match self {
            Divisor::SecondOperand(d) | Divisor::StoredParameter(d) => d,
        }
    }

    #[inline]
    pub fn is_parameter(&self) -> bool {
        matches!(self, Divisor::StoredParameter(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_and_payload() {
        let d = Divisor::StoredParameter(6);
        assert!(d.is_parameter());
        assert_eq!(d.into_inner(), 6);
        assert!(!Divisor::SecondOperand(1).is_parameter());
        assert_eq!(Divisor::SecondOperand("b").into_inner(), "b");
    }
}
