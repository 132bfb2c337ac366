// Copyright Peter Bower 2025. All Rights Reserved.
// Licensed under MIT License.

//! # Tensor Arithmetic Operators
//!
//! Implementation of the standard Rust `Div` operator for [`Tensor`]
//! with automatic broadcasting support.
//!
//! This enables ergonomic operations like:
//! ```rust
//! use ndbroadcast::{Tensor, tensor};
//! let a = tensor!([2, 2]; 2.0f64, 4.0, 6.0, 8.0).unwrap();
//! let b = Tensor::scalar(2.0f64);
//! let result = (&a / &b).unwrap();  // Broadcasts the scalar across `a`
//! assert_eq!(result.as_slice(), &[1.0, 2.0, 3.0, 4.0]);
//! ```
//!
//! The output is a `Result` as incompatible shapes cannot be divided.

use std::ops::Div;

use crate::enums::error::OpError;
use crate::kernels::divide::divide;
use crate::structs::tensor::Tensor;
use crate::traits::type_unions::Float;

impl<T: Float> Div for Tensor<T> {
    type Output = Result<Tensor<T>, OpError>;

    fn div(self, rhs: Self) -> Self::Output {
        divide(&self, &rhs)
    }
}

// Reference implementation for convenience
impl<T: Float> Div<&Tensor<T>> for &Tensor<T> {
    type Output = Result<Tensor<T>, OpError>;

    fn div(self, rhs: &Tensor<T>) -> Self::Output {
        divide(self, rhs)
    }
}

/// Divides every element by a plain value.
impl<T: Float> Div<T> for &Tensor<T> {
    type Output = Result<Tensor<T>, OpError>;

    fn div(self, rhs: T) -> Self::Output {
        divide(self, &Tensor::scalar(rhs))
    }
}
