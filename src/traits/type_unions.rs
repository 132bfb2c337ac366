// Copyright Peter Bower 2025. All Rights Reserved.
// Licensed under MIT License.

//! # Type Unions
//!
//! Element-type bounds for tensor buffers.

use std::fmt::Debug;

use num_traits::{Float as NumFloat, ToPrimitive};

/// Trait for types valid as tensor elements, i.e., floats, integers, and booleans.
///
/// Useful when specifying `my_fn::<T: Primitive>() {}`.
///
/// Pure data movement kernels such as tiling only need this bound.
pub trait Primitive: Copy + Default + PartialEq + Debug + Send + Sync + 'static {}
impl Primitive for f32 {}
impl Primitive for f64 {}
impl Primitive for i8 {}
impl Primitive for i16 {}
impl Primitive for i32 {}
impl Primitive for i64 {}
impl Primitive for u8 {}
impl Primitive for u16 {}
impl Primitive for u32 {}
impl Primitive for u64 {}
impl Primitive for bool {}

/// Trait for types valid as float elements in tensors.
///
/// Useful when specifying `my_fn::<T: Float>() {}`.
///
/// Extends and constrains the *num-traits* `Float` implementation to fit the crate's type universe.
/// Division follows IEEE-754, so a zero divisor yields `±inf` or `NaN` rather than a panic.
pub trait Float: Primitive + NumFloat + ToPrimitive {}
impl Float for f32 {}
impl Float for f64 {}
