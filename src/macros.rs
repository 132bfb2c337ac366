// Copyright Peter Bower 2025. All Rights Reserved.
// Licensed under MIT License.

//! # Macros
//!
//! Literal construction helpers.

/// Builds a [`Tensor`](crate::Tensor) from a shape and its row-major values.
///
/// Evaluates to `Result<Tensor<T>, OpError>`, failing when the number of
/// values does not match the shape.
///
/// ```rust
/// use ndbroadcast::tensor;
/// let t = tensor!([2, 3]; 1.0f32, 2.0, 3.0, 4.0, 5.0, 6.0).unwrap();
/// assert_eq!(t.get(&[1, 2]), Some(6.0));
///
/// let s = tensor!(4.0f64).unwrap();
/// assert_eq!(s.item(), Some(4.0));
/// ```
#[macro_export]
macro_rules! tensor {
    ([$($d:expr),* $(,)?]; $($x:expr),+ $(,)?) => {{
        #[allow(unused_imports)]
        use $crate::Vec64;
        let temp_vec = $crate::vec64![$($x),+];
        $crate::Tensor::from_vec64(temp_vec, $crate::Shape::new(vec![$($d),*]))
    }};
    ($x:expr) => {
        Ok::<_, $crate::OpError>($crate::Tensor::scalar($x))
    };
}
