// Copyright Peter Bower 2025. All Rights Reserved.
// Licensed under MIT License.

//! # Shape Module - *Row-Major Shape and Index Arithmetic*
//!
//! Dimension sizes plus the precomputed per-axis element counts that drive
//! every flat-index decomposition in the kernels.
//!
//! ## Layout
//! For a shape `[s0, .., s(R-1)]`, `count_from(i)` is the number of elements
//! addressed by varying only axes `i..R`, with `count_from(R) == 1`.
//! A flat offset `d` sits at coordinate `(d % count_from(i)) / count_from(i + 1)` on axis `i`.

use std::fmt;

/// # Shape
///
/// Ordered dimension sizes of a tensor, rank 0 for a scalar.
///
/// ### Properties
/// - `dims`: per-axis sizes.
/// - `counts`: `rank + 1` suffix products, `counts[rank] == 1`.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Shape {
    dims: Vec<usize>,
    counts: Vec<usize>,
}

impl Shape {
    /// Creates a shape from its dimension sizes.
    pub fn new(dims: Vec<usize>) -> Self {
        let mut counts = vec![1usize; dims.len() + 1];
        for i in (0..dims.len()).rev() {
            counts[i] = counts[i + 1] * dims[i];
        }
        Shape { dims, counts }
    }

    /// Element count of `dims`, or `None` if any suffix count does not fit in `usize`.
    ///
    /// Folds from the last axis, the same order [`Shape::new`] builds its
    /// counts in, so a zero-length leading axis cannot hide an overflow further right.
    pub fn checked_count(dims: &[usize]) -> Option<usize> {
        dims.iter().rev().try_fold(1usize, |acc, &d| acc.checked_mul(d))
    }

    /// Creates a rank-0 (scalar) shape.
    pub fn scalar() -> Self {
        Shape::new(Vec::new())
    }

    /// Number of axes.
    #[inline]
    pub fn rank(&self) -> usize {
        self.dims.len()
    }

    /// Dimension sizes as a slice.
    #[inline]
    pub fn dims(&self) -> &[usize] {
        &self.dims
    }

    /// Size of `axis`. Panics if out of bounds.
    #[inline]
    pub fn dim(&self, axis: usize) -> usize {
        self.dims[axis]
    }

    /// Total number of elements. `1` for a scalar.
    #[inline]
    pub fn count(&self) -> usize {
        self.counts[0]
    }

    /// Elements addressed by axes `axis..rank`, valid for `axis <= rank`.
    #[inline]
    pub fn count_from(&self, axis: usize) -> usize {
        self.counts[axis]
    }

    /// True for rank 0.
    #[inline]
    pub fn is_scalar(&self) -> bool {
        self.dims.is_empty()
    }

    /// Coordinate of flat offset `d` along `axis`.
    ///
    /// Requires `axis < rank` and `d < count()`.
    #[inline]
    pub fn coordinate(&self, d: usize, axis: usize) -> usize {
        (d % self.counts[axis]) / self.counts[axis + 1]
    }

    /// Row-major flat offset of `coords`. Inverse of [`Shape::coordinate`].
    pub fn offset(&self, coords: &[usize]) -> usize {
        debug_assert_eq!(coords.len(), self.rank());
        coords
            .iter()
            .enumerate()
            .map(|(axis, c)| c * self.counts[axis + 1])
            .sum()
    }

    /// Resolves a possibly negative axis, counting from the end, into `0..rank`.
    pub fn canonical_axis(&self, axis: isize) -> Option<usize> {
        let rank = self.rank() as isize;
        let resolved = if axis < 0 { axis + rank } else { axis };
        if (0..rank).contains(&resolved) {
            Some(resolved as usize)
        } else {
            None
        }
    }
}

impl Default for Shape {
    fn default() -> Self {
        Shape::scalar()
    }
}

impl fmt::Debug for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Shape({:?})", self.dims)
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(")?;
        for (i, d) in self.dims.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", d)?;
        }
        if self.dims.len() == 1 {
            write!(f, ",")?;
        }
        write!(f, ")")
    }
}

impl From<Vec<usize>> for Shape {
    fn from(dims: Vec<usize>) -> Self {
        Shape::new(dims)
    }
}

impl From<&[usize]> for Shape {
    fn from(dims: &[usize]) -> Self {
        Shape::new(dims.to_vec())
    }
}

impl<const N: usize> From<[usize; N]> for Shape {
    fn from(dims: [usize; N]) -> Self {
        Shape::new(dims.to_vec())
    }
}

impl From<&Shape> for Shape {
    fn from(shape: &Shape) -> Self {
        shape.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts() {
        let s = Shape::from([2, 3, 4]);
        assert_eq!(s.rank(), 3);
        assert_eq!(s.count(), 24);
        assert_eq!(s.count_from(1), 12);
        assert_eq!(s.count_from(2), 4);
        assert_eq!(s.count_from(3), 1);
    }

    #[test]
    fn test_scalar_shape() {
        let s = Shape::scalar();
        assert!(s.is_scalar());
        assert_eq!(s.rank(), 0);
        assert_eq!(s.count(), 1);
        assert_eq!(s.count_from(0), 1);
    }

    #[test]
    fn test_coordinate_decomposition() {
        let s = Shape::from([2, 3, 4]);
        // 1*12 + 2*4 + 3
        let d = 23;
        assert_eq!(s.coordinate(d, 0), 1);
        assert_eq!(s.coordinate(d, 1), 2);
        assert_eq!(s.coordinate(d, 2), 3);

        for d in 0..s.count() {
            let coords: Vec<usize> = (0..s.rank()).map(|i| s.coordinate(d, i)).collect();
            assert_eq!(s.offset(&coords), d);
        }
    }

    #[test]
    fn test_checked_count() {
        assert_eq!(Shape::checked_count(&[2, 3, 4]), Some(24));
        assert_eq!(Shape::checked_count(&[]), Some(1));
        assert_eq!(Shape::checked_count(&[usize::MAX, 2]), None);
        assert_eq!(Shape::checked_count(&[0, usize::MAX, 2]), None);
        assert_eq!(Shape::checked_count(&[2, usize::MAX, 0]), Some(0));
    }

    #[test]
    fn test_zero_extent() {
        let s = Shape::from([3, 0, 2]);
        assert_eq!(s.count(), 0);
        assert_eq!(s.count_from(2), 2);
    }

    #[test]
    fn test_canonical_axis() {
        let s = Shape::from([2, 3, 4]);
        assert_eq!(s.canonical_axis(0), Some(0));
        assert_eq!(s.canonical_axis(2), Some(2));
        assert_eq!(s.canonical_axis(-1), Some(2));
        assert_eq!(s.canonical_axis(-3), Some(0));
        assert_eq!(s.canonical_axis(3), None);
        assert_eq!(s.canonical_axis(-4), None);
        assert_eq!(Shape::scalar().canonical_axis(0), None);
    }

    #[test]
    fn test_display() {
        assert_eq!(Shape::from([2, 3]).to_string(), "(2, 3)");
        assert_eq!(Shape::from([5]).to_string(), "(5,)");
        assert_eq!(Shape::scalar().to_string(), "()");
    }
}
