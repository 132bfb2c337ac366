// Copyright Peter Bower 2025. All Rights Reserved.
// Licensed under MIT License.

//! # Operator Traits Module
//!
//! The two-phase contract every operator exposes to the surrounding graph:
//! shape inference whenever input shapes may have changed, then any number
//! of forward passes over tensors of those shapes.

use crate::enums::error::OpError;
use crate::structs::shape::Shape;
use crate::structs::tensor::Tensor;
use crate::traits::shape::Shaped;
use crate::traits::type_unions::Primitive;

/// Shape-only half of an operator.
///
/// Independent of the element type so shapes can be planned before any
/// buffer exists.
pub trait ShapeInference {
    /// Layer type name used in errors and logs, e.g. `"Div"`.
    fn type_name(&self) -> &'static str;

    /// Fewest inputs the operator accepts.
    fn min_num_inputs(&self) -> usize {
        1
    }

    /// Most inputs the operator accepts.
    fn max_num_inputs(&self) -> usize {
        1
    }

    /// Errors unless `n` lies within the accepted input arity.
    fn check_num_inputs(&self, n: usize) -> Result<(), OpError> {
        let (min, max) = (self.min_num_inputs(), self.max_num_inputs());
        if n < min || n > max {
            let expected = if min == max { format!("{min}") } else { format!("{min} to {max}") };
            return Err(OpError::config(
                self.type_name(),
                format!("expected {expected} inputs, got {n}"),
            ));
        }
        Ok(())
    }

    /// Computes the output shape for `inputs` and records whatever the
    /// forward pass needs. Must run before the first forward and again
    /// whenever an input shape changes.
    fn infer_shape(&mut self, inputs: &[&Shape]) -> Result<Shape, OpError>;
}

/// Tensor half of an operator over element type `T`.
pub trait Operator<T: Primitive>: ShapeInference {
    /// Tensor-level shape inference: refuses in-place computation, infers the
    /// output shape, then resizes `top` to it.
    ///
    /// On error `top` is left untouched.
    fn reshape(&mut self, bottom: &[&Tensor<T>], top: &mut Tensor<T>) -> Result<(), OpError> {
        check_disjoint(self.type_name(), bottom, top)?;
        let shapes: Vec<&Shape> = bottom.iter().map(|t| t.shape()).collect();
        let shape = self.infer_shape(&shapes)?;
        top.reshape(shape);
        Ok(())
    }

    /// Writes the result for `bottom` into `top`.
    ///
    /// `top` must already have the shape from the last shape inference and
    /// must not share storage with any input.
    fn forward(&self, bottom: &[&Tensor<T>], top: &mut Tensor<T>) -> Result<(), OpError>;

    /// Propagates `top_diff` back into `bottom_diff`.
    fn backward(
        &self,
        top_diff: &[&Tensor<T>],
        propagate_down: &[bool],
        bottom_diff: &mut [Tensor<T>],
    ) -> Result<(), OpError> {
        let _ = (top_diff, propagate_down, bottom_diff);
        Err(OpError::NotImplemented { op: self.type_name(), what: "backward" })
    }
}

/// Errors if `top` shares storage with any of `inputs`.
pub fn check_disjoint<T: Primitive>(
    op: &'static str,
    inputs: &[&Tensor<T>],
    top: &Tensor<T>,
) -> Result<(), OpError> {
    if let Some(i) = inputs.iter().position(|t| t.shares_storage(top)) {
        return Err(OpError::shape(
            op,
            format!("output shares storage with input {i}; in-place computation is not allowed"),
        ));
    }
    Ok(())
}

/// Errors unless `actual` matches the shape recorded at inference time.
pub(crate) fn check_shape(
    op: &'static str,
    what: &str,
    expected: &Shape,
    actual: &Shape,
) -> Result<(), OpError> {
    if expected != actual {
        return Err(OpError::shape(
            op,
            format!("{what} has shape {actual}, expected {expected} from the last reshape"),
        ));
    }
    Ok(())
}
