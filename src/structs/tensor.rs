// Copyright Peter Bower 2025. All Rights Reserved.
// Licensed under MIT License.

//! # Tensor Module - *Contiguous N-dimensional Buffer*
//!
//! Row-major tensor backed by a 64-byte aligned [`Vec64`] buffer.
//!
//! ## Storage sharing
//! Cloning a `Tensor` shares its storage, the same way one blob can back
//! several graph edges. Operators use [`Tensor::shares_storage`] to refuse
//! in-place computation, and can only write an output whose storage is
//! uniquely held.

use std::fmt;
use std::sync::Arc;

use vec64::{Vec64, vec64};

use crate::enums::error::OpError;
use crate::structs::shape::Shape;
use crate::traits::shape::Shaped;
use crate::traits::type_unions::Primitive;

/// # Tensor
///
/// Dense row-major N-dimensional tensor.
///
/// ### Properties
/// - `shape`: dimension sizes and per-axis counts.
/// - `data`: shared flat buffer, always `shape.count()` long.
#[derive(Clone)]
pub struct Tensor<T: Primitive> {
    shape: Shape,
    data: Arc<Vec64<T>>,
}

impl<T: Primitive> Tensor<T> {
    /// Tensor of `T::default()` values.
    pub fn zeros(shape: impl Into<Shape>) -> Self {
        Self::full(shape, T::default())
    }

    /// Tensor filled with `value`.
    pub fn full(shape: impl Into<Shape>, value: T) -> Self {
        let shape = shape.into();
        let data = vec64![value; shape.count()];
        Tensor { shape, data: Arc::new(data) }
    }

    /// Rank-0 tensor holding one value.
    pub fn scalar(value: T) -> Self {
        Self::full(Shape::scalar(), value)
    }

    /// Wraps an existing buffer. Errors if its length does not match the shape.
    pub fn from_vec64(data: Vec64<T>, shape: impl Into<Shape>) -> Result<Self, OpError> {
        let shape = shape.into();
        if data.len() != shape.count() {
            return Err(OpError::shape(
                "Tensor",
                format!(
                    "buffer length {} does not match shape {} (count {})",
                    data.len(),
                    shape,
                    shape.count()
                ),
            ));
        }
        Ok(Tensor { shape, data: Arc::new(data) })
    }

    /// Copies `data` into a new tensor. Errors if its length does not match the shape.
    pub fn from_slice(data: &[T], shape: impl Into<Shape>) -> Result<Self, OpError> {
        Self::from_vec64(data.iter().copied().collect::<Vec64<T>>(), shape)
    }

    /// Returns an immutable reference to the flat buffer.
    #[inline]
    pub fn as_slice(&self) -> &[T] {
        self.data.as_slice()
    }

    /// Mutable access to the flat buffer.
    ///
    /// Returns `None` while another handle shares the storage.
    #[inline]
    pub fn data_mut(&mut self) -> Option<&mut [T]> {
        Arc::get_mut(&mut self.data).map(|v| v.as_mut_slice())
    }

    /// Value at `coords`, or `None` when out of bounds.
    pub fn get(&self, coords: &[usize]) -> Option<T> {
        if coords.len() != self.shape.rank()
            || coords.iter().zip(self.shape.dims()).any(|(c, d)| c >= d)
        {
            return None;
        }
        Some(self.data[self.shape.offset(coords)])
    }

    /// The single value of a one-element tensor.
    pub fn item(&self) -> Option<T> {
        if self.shape.count() == 1 { Some(self.data[0]) } else { None }
    }

    /// True when both handles point at the same buffer.
    #[inline]
    pub fn shares_storage(&self, other: &Tensor<T>) -> bool {
        Arc::ptr_eq(&self.data, &other.data)
    }

    /// Sets a new shape.
    ///
    /// The buffer is kept when the element count is unchanged, otherwise it
    /// is replaced with a fresh zeroed allocation detached from any other handle.
    pub fn reshape(&mut self, shape: impl Into<Shape>) {
        let shape = shape.into();
        if shape.count() != self.data.len() {
            self.data = Arc::new(vec64![T::default(); shape.count()]);
        }
        self.shape = shape;
    }

    /// Consumes the tensor and returns its buffer, cloning if the storage is shared.
    pub fn into_vec64(self) -> Vec64<T> {
        Arc::unwrap_or_clone(self.data)
    }

    /// Copies the buffer into a plain `Vec`.
    pub fn to_vec(&self) -> Vec<T> {
        self.data.to_vec()
    }
}

impl<T: Primitive> Shaped for Tensor<T> {
    fn shape(&self) -> &Shape {
        &self.shape
    }
}

/// Empty rank-1 tensor, the usual starting state of an output that an
/// operator will reshape.
impl<T: Primitive> Default for Tensor<T> {
    fn default() -> Self {
        Self::zeros(Shape::from([0]))
    }
}

impl<T: Primitive> PartialEq for Tensor<T> {
    fn eq(&self, other: &Self) -> bool {
        self.shape == other.shape && self.as_slice() == other.as_slice()
    }
}

// Pretty print
impl<T: Primitive> fmt::Debug for Tensor<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Tensor {} [row-major] [", self.shape)?;
        for (i, v) in self.data.iter().take(8).enumerate() {
            if i > 0 {
                write!(f, ",")?;
            }
            write!(f, " {:?}", v)?;
        }
        if self.data.len() > 8 {
            write!(f, ", ...")?;
        }
        write!(f, " ]")
    }
}
