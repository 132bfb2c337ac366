// Copyright Peter Bower 2025. All Rights Reserved.
// Licensed under MIT License.

//! # Tile Kernel
//!
//! Repeats a tensor along selected axes by integer factors.
//!
//! The output keeps the input rank; configured axes grow by their factor.
//! Every output coordinate reads the input at `coordinate % input_dim` on each
//! axis, so the input pattern wraps around instead of being copied block by block.
//! There is no gradient path.

use std::marker::PhantomData;

use crate::enums::error::OpError;
use crate::kernels::routing::fill_indexed;
use crate::structs::shape::Shape;
use crate::structs::tensor::Tensor;
use crate::structs::tile_config::TileConfig;
use crate::traits::operator::{Operator, ShapeInference, check_disjoint, check_shape};
use crate::traits::shape::Shaped;
use crate::traits::type_unions::Primitive;

const TILE: &str = "TileND";

#[derive(Debug, Clone)]
struct TileState {
    input: Shape,
    output: Shape,
}

/// # TileExpand
///
/// Axis-wise tile operator, layer type `"TileND"`.
///
/// Works on any [`Primitive`] element since it only moves values.
///
/// ### Example
/// ```rust
/// use ndbroadcast::{Operator, Tensor, TileConfig, TileExpand};
///
/// let x = Tensor::from_slice(&[1, 2, 3, 4, 5, 6], [2, 3]).unwrap();
/// let mut op = TileExpand::new(TileConfig::single(1, 2)).unwrap();
/// let mut out = Tensor::default();
/// op.reshape(&[&x], &mut out).unwrap();
/// op.forward(&[&x], &mut out).unwrap();
/// assert_eq!(out.as_slice(), &[1, 2, 3, 1, 2, 3, 4, 5, 6, 4, 5, 6]);
/// ```
#[derive(Debug, Clone)]
pub struct TileExpand<T: Primitive> {
    pairs: Vec<(isize, usize)>,
    state: Option<TileState>,
    _phantom: PhantomData<T>,
}

impl<T: Primitive> TileExpand<T> {
    /// Validates `config`. Axes are resolved on the first shape inference.
    pub fn new(config: TileConfig) -> Result<Self, OpError> {
        let pairs = config.validate(TILE)?;
        Ok(TileExpand { pairs, state: None, _phantom: PhantomData })
    }

    /// `(axis, factor)` pairs as configured, axes unresolved.
    pub fn pairs(&self) -> &[(isize, usize)] {
        &self.pairs
    }

    /// Output shape from the last successful shape inference.
    pub fn output_shape(&self) -> Option<&Shape> {
        self.state.as_ref().map(|s| &s.output)
    }

    /// Resolves every configured axis against `input`, rejecting out of range
    /// and repeated axes.
    pub fn resolve_axes(&self, input: &Shape) -> Result<Vec<(usize, usize)>, OpError> {
        let mut resolved: Vec<(usize, usize)> = Vec::with_capacity(self.pairs.len());
        for &(axis, factor) in &self.pairs {
            let a = input.canonical_axis(axis).ok_or_else(|| {
                OpError::config(
                    TILE,
                    format!("axis {axis} is out of range for an input of rank {}", input.rank()),
                )
            })?;
            if resolved.iter().any(|&(seen, _)| seen == a) {
                return Err(OpError::config(TILE, format!("axis {a} is tiled more than once")));
            }
            resolved.push((a, factor));
        }
        Ok(resolved)
    }
}

impl<T: Primitive> ShapeInference for TileExpand<T> {
    fn type_name(&self) -> &'static str {
        TILE
    }

    fn infer_shape(&mut self, inputs: &[&Shape]) -> Result<Shape, OpError> {
        self.state = None;
        self.check_num_inputs(inputs.len())?;
        let input = inputs[0];

        let mut dims = input.dims().to_vec();
        for (axis, factor) in self.resolve_axes(input)? {
            dims[axis] = dims[axis].checked_mul(factor).ok_or_else(|| {
                OpError::shape(
                    TILE,
                    format!("tiling axis {axis} of {input} by {factor} overflows"),
                )
            })?;
        }
        if Shape::checked_count(&dims).is_none() {
            return Err(OpError::shape(TILE, format!("element count of {dims:?} overflows")));
        }
        let output = Shape::new(dims);

        log::debug!("{TILE}: {input} -> {output}");
        self.state = Some(TileState { input: input.clone(), output: output.clone() });
        Ok(output)
    }
}

impl<T: Primitive> Operator<T> for TileExpand<T> {
    fn forward(&self, bottom: &[&Tensor<T>], top: &mut Tensor<T>) -> Result<(), OpError> {
        self.check_num_inputs(bottom.len())?;
        check_disjoint(TILE, bottom, top)?;
        let state = self
            .state
            .as_ref()
            .ok_or_else(|| OpError::shape(TILE, "forward called before reshape"))?;
        let x = bottom[0];
        check_shape(TILE, "input", &state.input, x.shape())?;
        check_shape(TILE, "output", &state.output, top.shape())?;

        let input = &state.input;
        let output = &state.output;
        let src = x.as_slice();
        let out = top.data_mut().ok_or(OpError::SharedOutput { op: TILE })?;
        log::trace!("{TILE} forward: {} elements", out.len());

        fill_indexed(out, |d| {
            let mut offset = 0;
            for axis in 0..output.rank() {
                let c = output.coordinate(d, axis) % input.dim(axis);
                offset += c * input.count_from(axis + 1);
            }
            src[offset]
        });
        Ok(())
    }

    /// Tiling has no gradient path; always fails.
    fn backward(
        &self,
        _top_diff: &[&Tensor<T>],
        _propagate_down: &[bool],
        _bottom_diff: &mut [Tensor<T>],
    ) -> Result<(), OpError> {
        Err(OpError::NotImplemented { op: TILE, what: "backward" })
    }
}

/// Tile `input` per `config` into a new tensor.
pub fn tile<T: Primitive>(input: &Tensor<T>, config: TileConfig) -> Result<Tensor<T>, OpError> {
    let mut op = TileExpand::new(config)?;
    let mut out = Tensor::default();
    op.reshape(&[input], &mut out)?;
    op.forward(&[input], &mut out)?;
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tile_leading_axis() {
        let x = Tensor::from_slice(&[1.0f32, 2.0], [1, 2]).unwrap();
        let out = tile(&x, TileConfig::single(0, 3)).unwrap();
        assert_eq!(out.shape(), &Shape::from([3, 2]));
        assert_eq!(out.as_slice(), &[1.0, 2.0, 1.0, 2.0, 1.0, 2.0]);
    }

    #[test]
    fn test_tile_two_axes() {
        let x = Tensor::from_slice(&[1u8, 2, 3, 4], [2, 2]).unwrap();
        let out = tile(&x, TileConfig::single(0, 2).with(-1, 2)).unwrap();
        assert_eq!(out.shape(), &Shape::from([4, 4]));
        assert_eq!(
            out.as_slice(),
            &[1, 2, 1, 2, 3, 4, 3, 4, 1, 2, 1, 2, 3, 4, 3, 4]
        );
    }

    #[test]
    fn test_factor_one_is_identity() {
        let x = Tensor::from_slice(&[true, false, true], [3]).unwrap();
        let out = tile(&x, TileConfig::single(0, 1)).unwrap();
        assert_eq!(out, x);
    }

    #[test]
    fn test_axis_out_of_range() {
        let mut op = TileExpand::<f32>::new(TileConfig::single(2, 2)).unwrap();
        let err = op.infer_shape(&[&Shape::from([2, 3])]).unwrap_err();
        assert!(matches!(err, OpError::Configuration { op: "TileND", .. }));
    }

    #[test]
    fn test_scalar_input_has_no_axes() {
        let mut op = TileExpand::<f32>::new(TileConfig::single(0, 2)).unwrap();
        assert!(op.infer_shape(&[&Shape::scalar()]).is_err());
    }

    #[test]
    fn test_duplicate_axis() {
        let op = TileExpand::<f32>::new(TileConfig::single(1, 2).with(-1, 3)).unwrap();
        let err = op.resolve_axes(&Shape::from([4, 5])).unwrap_err();
        assert_eq!(err, OpError::config("TileND", "axis 1 is tiled more than once"));
    }

    #[test]
    fn test_zero_extent_input() {
        let x = Tensor::<f64>::zeros([0, 3]);
        let out = tile(&x, TileConfig::single(1, 4)).unwrap();
        assert_eq!(out.shape(), &Shape::from([0, 12]));
        assert_eq!(out.count(), 0);
    }

    #[test]
    fn test_overflow_behind_zero_extent_axis() {
        let x = Tensor::<f32>::zeros([0, 1, usize::MAX / 2 + 1]);
        let err = tile(&x, TileConfig::single(1, 2)).unwrap_err();
        assert!(matches!(err, OpError::Shape { op: "TileND", .. }));
    }

    #[test]
    fn test_input_shape_changed_since_reshape() {
        let x = Tensor::<i32>::zeros([2, 2]);
        let y = Tensor::<i32>::zeros([3, 2]);
        let mut op = TileExpand::new(TileConfig::single(0, 2)).unwrap();
        let mut out = Tensor::default();
        op.reshape(&[&x], &mut out).unwrap();
        let err = op.forward(&[&y], &mut out).unwrap_err();
        assert!(matches!(err, OpError::Shape { op: "TileND", .. }));
    }
}
