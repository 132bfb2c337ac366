// Copyright Peter Bower 2025. All Rights Reserved.
// Licensed under MIT License.

//! # Shaped Trait Module
//!
//! Unified way to ask anything with a row-major [`Shape`] for its rank,
//! and element count.

use crate::structs::shape::Shape;

/// Shaped trait.
///
/// Implementors only provide `shape`; the rest are derived from it.
pub trait Shaped {
    /// Returns the row-major shape of the receiver
    fn shape(&self) -> &Shape;

    /// Number of axes
    #[inline]
    fn rank(&self) -> usize {
        self.shape().rank()
    }

    /// Total element count, `1` for a scalar
    #[inline]
    fn count(&self) -> usize {
        self.shape().count()
    }

    /// True for rank 0
    #[inline]
    fn is_scalar(&self) -> bool {
        self.shape().is_scalar()
    }
}

impl Shaped for Shape {
    fn shape(&self) -> &Shape {
        self
    }
}
