// Copyright Peter Bower 2025. All Rights Reserved.
// Licensed under MIT License.

//! # Broadcast Divide Kernel
//!
//! Elementwise `lhs / rhs` with NumPy-style broadcasting between operands
//! of any rank.
//!
//! ## Behaviour
//! - A rank-0 operand is a true scalar and takes a single-pass fast path.
//! - Otherwise shapes align from the right, the narrower operand gaining
//!   implicit leading size-1 axes, and every axis pair must be equal or
//!   contain a `1`.
//! - Each output slot is computed straight from the source offsets, no
//!   broadcast copy of either operand is built.
//! - Division by zero follows IEEE-754.
//!
//! The divisor is either the second input or, when only one input is wired,
//! a parameter tensor stored on the operator.

use crate::enums::divisor::Divisor;
use crate::enums::error::OpError;
use crate::kernels::routing::{BroadcastPlan, fill_indexed};
use crate::structs::shape::Shape;
use crate::structs::tensor::Tensor;
use crate::traits::operator::{Operator, ShapeInference, check_disjoint, check_shape};
use crate::traits::shape::Shaped;
use crate::traits::type_unions::Float;

const DIV: &str = "Div";

/// Shapes and walk plan recorded by the last successful shape inference.
#[derive(Debug, Clone)]
struct DivideState {
    lhs: Shape,
    rhs: Shape,
    output: Shape,
    plan: BroadcastPlan,
}

/// # BroadcastDivide
///
/// Broadcast division operator, layer type `"Div"`.
///
/// ### Example
/// ```rust
/// use ndbroadcast::{BroadcastDivide, Operator, Tensor};
///
/// let a = Tensor::from_slice(&[2.0f32, 4.0, 6.0, 8.0, 10.0, 12.0], [2, 3]).unwrap();
/// let b = Tensor::from_slice(&[1.0f32, 2.0, 3.0], [3]).unwrap();
///
/// let mut op = BroadcastDivide::new();
/// let mut out = Tensor::default();
/// op.reshape(&[&a, &b], &mut out).unwrap();
/// op.forward(&[&a, &b], &mut out).unwrap();
/// assert_eq!(out.as_slice(), &[2.0, 2.0, 2.0, 8.0, 5.0, 4.0]);
/// ```
#[derive(Debug, Clone)]
pub struct BroadcastDivide<T: Float> {
    parameter: Option<Tensor<T>>,
    state: Option<DivideState>,
}

impl<T: Float> BroadcastDivide<T> {
    /// Operator dividing its first input by its second.
    pub fn new() -> Self {
        BroadcastDivide { parameter: None, state: None }
    }

    /// Operator dividing its single input by `parameter`.
    ///
    /// A second input, when wired, takes precedence over the parameter.
    pub fn with_parameter(parameter: Tensor<T>) -> Self {
        BroadcastDivide { parameter: Some(parameter), state: None }
    }

    /// The stored divisor, if any.
    pub fn parameter(&self) -> Option<&Tensor<T>> {
        self.parameter.as_ref()
    }

    /// Output shape from the last successful shape inference.
    pub fn output_shape(&self) -> Option<&Shape> {
        self.state.as_ref().map(|s| &s.output)
    }

    /// Walk plan from the last successful shape inference.
    pub fn plan(&self) -> Option<&BroadcastPlan> {
        self.state.as_ref().map(|s| &s.plan)
    }

    fn resolve_divisor<'a>(&'a self, inputs: &[&'a Tensor<T>]) -> Result<Divisor<&'a Tensor<T>>, OpError> {
        match (inputs.get(1), self.parameter.as_ref()) {
            (Some(t), _) => Ok(Divisor::SecondOperand(*t)),
            (None, Some(p)) => Ok(Divisor::StoredParameter(p)),
            (None, None) => Err(missing_divisor()),
        }
    }

    fn resolve_divisor_shape<'a>(&'a self, inputs: &[&'a Shape]) -> Result<Divisor<&'a Shape>, OpError> {
        match (inputs.get(1), self.parameter.as_ref()) {
            (Some(s), _) => Ok(Divisor::SecondOperand(*s)),
            (None, Some(p)) => Ok(Divisor::StoredParameter(p.shape())),
            (None, None) => Err(missing_divisor()),
        }
    }

    fn check_parameter_disjoint(&self, top: &Tensor<T>) -> Result<(), OpError> {
        match &self.parameter {
            Some(p) if p.shares_storage(top) => Err(OpError::shape(
                DIV,
                "output shares storage with the stored divisor; in-place computation is not allowed",
            )),
            _ => Ok(()),
        }
    }
}

fn missing_divisor() -> OpError {
    OpError::config(DIV, "a single input needs a stored divisor parameter")
}

impl<T: Float> Default for BroadcastDivide<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Float> ShapeInference for BroadcastDivide<T> {
    fn type_name(&self) -> &'static str {
        DIV
    }

    fn max_num_inputs(&self) -> usize {
        2
    }

    fn infer_shape(&mut self, inputs: &[&Shape]) -> Result<Shape, OpError> {
        self.state = None;
        self.check_num_inputs(inputs.len())?;
        let lhs = inputs[0].clone();
        let divisor = self.resolve_divisor_shape(inputs)?;
        let from_parameter = divisor.is_parameter();
        let rhs = divisor.into_inner().clone();

        let (plan, output) = BroadcastPlan::resolve(DIV, &lhs, &rhs)?;
        log::debug!(
            "{DIV}: {lhs} / {rhs}{} -> {output} ({})",
            if from_parameter { " (stored)" } else { "" },
            match &plan {
                BroadcastPlan::ScalarRhs => "scalar divisor".to_string(),
                BroadcastPlan::ScalarLhs => "scalar dividend".to_string(),
                BroadcastPlan::Aligned { alignment, .. } => {
                    format!("aligned, rank diff {}", alignment.rank_diff())
                }
            }
        );
        self.state = Some(DivideState { lhs, rhs, output: output.clone(), plan });
        Ok(output)
    }
}

impl<T: Float> Operator<T> for BroadcastDivide<T> {
    fn reshape(&mut self, bottom: &[&Tensor<T>], top: &mut Tensor<T>) -> Result<(), OpError> {
        check_disjoint(DIV, bottom, top)?;
        self.check_parameter_disjoint(top)?;
        let shapes: Vec<&Shape> = bottom.iter().map(|t| t.shape()).collect();
        let shape = self.infer_shape(&shapes)?;
        top.reshape(shape);
        Ok(())
    }

    fn forward(&self, bottom: &[&Tensor<T>], top: &mut Tensor<T>) -> Result<(), OpError> {
        self.check_num_inputs(bottom.len())?;
        check_disjoint(DIV, bottom, top)?;
        self.check_parameter_disjoint(top)?;
        let state = self
            .state
            .as_ref()
            .ok_or_else(|| OpError::shape(DIV, "forward called before reshape"))?;

        let lhs = bottom[0];
        let rhs = self.resolve_divisor(bottom)?.into_inner();
        check_shape(DIV, "dividend", &state.lhs, lhs.shape())?;
        check_shape(DIV, "divisor", &state.rhs, rhs.shape())?;
        check_shape(DIV, "output", &state.output, top.shape())?;

        let a = lhs.as_slice();
        let b = rhs.as_slice();
        let out = top.data_mut().ok_or(OpError::SharedOutput { op: DIV })?;
        log::trace!(
            "{DIV} forward: {} elements, {} path",
            out.len(),
            if state.plan.is_scalar() { "scalar" } else { "aligned" }
        );

        match &state.plan {
            BroadcastPlan::ScalarRhs => {
                let s = b[0];
                fill_indexed(out, |d| a[d] / s);
            }
            BroadcastPlan::ScalarLhs => {
                let s = a[0];
                fill_indexed(out, |d| s / b[d]);
            }
            BroadcastPlan::Aligned { indexer, .. } => {
                fill_indexed(out, |d| {
                    let (l, r) = indexer.offsets(d);
                    a[l] / b[r]
                });
            }
        }
        Ok(())
    }
}

/// Divide `lhs` by `rhs` with broadcasting into a new tensor.
pub fn divide<T: Float>(lhs: &Tensor<T>, rhs: &Tensor<T>) -> Result<Tensor<T>, OpError> {
    let mut op = BroadcastDivide::new();
    let mut out = Tensor::default();
    op.reshape(&[lhs, rhs], &mut out)?;
    op.forward(&[lhs, rhs], &mut out)?;
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kernels::routing::Regime;

    fn t(data: &[f64], shape: &[usize]) -> Tensor<f64> {
        Tensor::from_slice(data, shape).unwrap()
    }

    #[test]
    fn test_equal_shapes() {
        let a = t(&[2.0, 4.0, 9.0, 16.0], &[2, 2]);
        let b = t(&[1.0, 2.0, 3.0, 4.0], &[2, 2]);
        let out = divide(&a, &b).unwrap();
        assert_eq!(out.shape(), &Shape::from([2, 2]));
        assert_eq!(out.as_slice(), &[2.0, 2.0, 3.0, 4.0]);
    }

    #[test]
    fn test_rhs_wider() {
        // [2] against [2, 2]
        let a = t(&[8.0, 6.0], &[2]);
        let b = t(&[2.0, 3.0, 4.0, 1.0], &[2, 2]);
        let mut op = BroadcastDivide::new();
        let mut out = Tensor::default();
        op.reshape(&[&a, &b], &mut out).unwrap();
        match op.plan() {
            Some(BroadcastPlan::Aligned { alignment, .. }) => {
                assert_eq!(alignment.regime(), Regime::RhsWider(1))
            }
            other => panic!("unexpected plan {other:?}"),
        }
        op.forward(&[&a, &b], &mut out).unwrap();
        assert_eq!(out.as_slice(), &[4.0, 2.0, 2.0, 6.0]);
    }

    #[test]
    fn test_stored_parameter() {
        let a = t(&[3.0, 6.0, 9.0], &[3]);
        let mut op = BroadcastDivide::with_parameter(Tensor::scalar(3.0));
        let mut out = Tensor::default();
        op.reshape(&[&a], &mut out).unwrap();
        op.forward(&[&a], &mut out).unwrap();
        assert_eq!(out.as_slice(), &[1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_second_operand_wins_over_parameter() {
        let a = t(&[4.0, 8.0], &[2]);
        let b = t(&[2.0, 2.0], &[2]);
        let mut op = BroadcastDivide::with_parameter(Tensor::scalar(4.0));
        let mut out = Tensor::default();
        op.reshape(&[&a, &b], &mut out).unwrap();
        op.forward(&[&a, &b], &mut out).unwrap();
        assert_eq!(out.as_slice(), &[2.0, 4.0]);
    }

    #[test]
    fn test_single_input_without_parameter() {
        let a = t(&[1.0], &[1]);
        let mut op = BroadcastDivide::<f64>::new();
        let err = op.infer_shape(&[a.shape()]).unwrap_err();
        assert!(matches!(err, OpError::Configuration { op: "Div", .. }));
    }

    #[test]
    fn test_output_aliasing_parameter() {
        let p = Tensor::scalar(2.0);
        let a = t(&[1.0], &[1]);
        let mut op = BroadcastDivide::with_parameter(p.clone());
        let mut out = p.clone();
        let err = op.reshape(&[&a], &mut out).unwrap_err();
        assert!(matches!(err, OpError::Shape { op: "Div", .. }));
    }

    #[test]
    fn test_forward_before_reshape() {
        let a = t(&[1.0], &[1]);
        let b = t(&[1.0], &[1]);
        let op = BroadcastDivide::new();
        let mut out = Tensor::zeros([1]);
        let err = op.forward(&[&a, &b], &mut out).unwrap_err();
        assert!(matches!(err, OpError::Shape { .. }));
    }

    #[test]
    fn test_failed_inference_clears_plan() {
        let mut op = BroadcastDivide::<f32>::new();
        op.infer_shape(&[&Shape::from([2]), &Shape::from([2])]).unwrap();
        assert!(op.plan().is_some());
        assert!(op.infer_shape(&[&Shape::from([2]), &Shape::from([3])]).is_err());
        assert!(op.plan().is_none());
        assert!(op.output_shape().is_none());
    }

    #[test]
    fn test_overflow_behind_zero_extent_axis() {
        // [0, MAX, 2] has zero elements but its inner counts do not fit
        let mut op = BroadcastDivide::<f64>::new();
        let err = op
            .infer_shape(&[&Shape::from([0, 1, 2]), &Shape::from([usize::MAX, 1])])
            .unwrap_err();
        assert!(matches!(err, OpError::Shape { op: "Div", .. }));
        assert!(op.plan().is_none());
    }

    #[test]
    fn test_too_many_inputs() {
        let mut op = BroadcastDivide::<f32>::new();
        let s = Shape::from([1]);
        let err = op.infer_shape(&[&s, &s, &s]).unwrap_err();
        assert_eq!(
            err,
            OpError::config("Div", "expected 1 to 2 inputs, got 3")
        );
    }
}
