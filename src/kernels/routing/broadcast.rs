// Copyright Peter Bower 2025. All Rights Reserved.
// Licensed under MIT License.

//! # Broadcast Routing Module
//!
//! Shape alignment for broadcast binary kernels.
//!
//! Two operands of rank `Rl` and `Rr` line up against an output of rank
//! `max(Rl, Rr)`; the narrower operand is padded with implicit leading size-1
//! axes. [`AxisAlignment`] records which of the three regimes applies and maps
//! output axes back onto operand axes. Shape inference and the forward index
//! walk both go through it, so the regime branch exists exactly once.

use crate::enums::error::OpError;
use crate::structs::shape::Shape;

/// Which operand of a binary kernel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operand {
    Lhs,
    Rhs,
}

/// Rank relationship between the two operands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Regime {
    /// Same rank, axes line up one to one.
    Equal,
    /// LHS has this many more leading axes than RHS.
    LhsWider(usize),
    /// RHS has this many more leading axes than LHS.
    RhsWider(usize),
}

/// Axis mapping between a broadcast output and its two operands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AxisAlignment {
    regime: Regime,
    rank: usize,
}

impl AxisAlignment {
    /// Alignment for operands of rank `lhs_rank` and `rhs_rank`.
    pub fn new(lhs_rank: usize, rhs_rank: usize) -> Self {
        let regime = if lhs_rank > rhs_rank {
            Regime::LhsWider(lhs_rank - rhs_rank)
        } else if rhs_rank > lhs_rank {
            Regime::RhsWider(rhs_rank - lhs_rank)
        } else {
            Regime::Equal
        };
        AxisAlignment { regime, rank: lhs_rank.max(rhs_rank) }
    }

    #[inline]
    pub fn regime(&self) -> Regime {
        self.regime
    }

    /// Output rank.
    #[inline]
    pub fn rank(&self) -> usize {
        self.rank
    }

    /// `rank(lhs) - rank(rhs)`.
    pub fn rank_diff(&self) -> isize {
        match self.regime {
            Regime::Equal => 0,
            Regime::LhsWider(k) => k as isize,
            Regime::RhsWider(k) => -(k as isize),
        }
    }

    /// Operand axis that output `axis` reads from, `None` where the operand is padded.
    #[inline]
    pub fn source_axis(&self, side: Operand, axis: usize) -> Option<usize> {
        match (self.regime, side) {
            (Regime::Equal, _) => Some(axis),
            (Regime::LhsWider(_), Operand::Lhs) | (Regime::RhsWider(_), Operand::Rhs) => Some(axis),
            (Regime::LhsWider(k), Operand::Rhs) | (Regime::RhsWider(k), Operand::Lhs) => {
                axis.checked_sub(k)
            }
        }
    }

    /// Broadcast output shape, or a shape error naming the first offending axis.
    pub fn output_shape(&self, op: &'static str, lhs: &Shape, rhs: &Shape) -> Result<Shape, OpError> {
        let mut dims = Vec::with_capacity(self.rank);
        for axis in 0..self.rank {
            let l = self.source_axis(Operand::Lhs, axis).map(|a| lhs.dim(a));
            let r = self.source_axis(Operand::Rhs, axis).map(|a| rhs.dim(a));
            let dim = match (l, r) {
                (Some(l), Some(r)) => broadcast_dim(l, r).ok_or_else(|| {
                    OpError::shape(
                        op,
                        format!(
                            "dimensions must be equal or 1 at axis {axis}: {l} vs {r} ({lhs} vs {rhs})"
                        ),
                    )
                })?,
                (Some(d), None) | (None, Some(d)) => d,
                (None, None) => unreachable!("at least one operand spans every output axis"),
            };
            dims.push(dim);
        }
        if Shape::checked_count(&dims).is_none() {
            return Err(OpError::shape(op, format!("element count of {dims:?} overflows")));
        }
        Ok(Shape::new(dims))
    }

    /// Per output axis, the step in `side`'s buffer for one unit of output coordinate.
    ///
    /// Padded axes and size-1 axes step by `0`, which is what stretches them.
    pub fn source_strides(&self, side: Operand, source: &Shape) -> Vec<usize> {
        (0..self.rank)
            .map(|axis| match self.source_axis(side, axis) {
                Some(a) if source.dim(a) != 1 => source.count_from(a + 1),
                _ => 0,
            })
            .collect()
    }
}

/// Broadcast size of one axis pair: equal sizes pass, a `1` takes the other side.
#[inline]
pub fn broadcast_dim(l: usize, r: usize) -> Option<usize> {
    if l == r || r == 1 {
        Some(l)
    } else if l == 1 {
        Some(r)
    } else {
        None
    }
}

/// Precomputed flat-index walker for one aligned broadcast.
///
/// Decomposes an output offset into per-axis coordinates and accumulates each
/// operand's source offset without materialising any broadcast copy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BroadcastIndexer {
    output: Shape,
    lhs_strides: Vec<usize>,
    rhs_strides: Vec<usize>,
}

impl BroadcastIndexer {
    pub fn new(alignment: &AxisAlignment, lhs: &Shape, rhs: &Shape, output: &Shape) -> Self {
        debug_assert_eq!(alignment.rank(), output.rank());
        BroadcastIndexer {
            output: output.clone(),
            lhs_strides: alignment.source_strides(Operand::Lhs, lhs),
            rhs_strides: alignment.source_strides(Operand::Rhs, rhs),
        }
    }

    /// Source offsets `(lhs, rhs)` for output offset `d`.
    #[inline]
    pub fn offsets(&self, d: usize) -> (usize, usize) {
        let mut l = 0;
        let mut r = 0;
        for axis in 0..self.output.rank() {
            let c = self.output.coordinate(d, axis);
            l += c * self.lhs_strides[axis];
            r += c * self.rhs_strides[axis];
        }
        (l, r)
    }
}

/// How a broadcast binary kernel walks its operands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BroadcastPlan {
    /// RHS is rank 0: one pass over LHS. Also covers scalar with scalar.
    ScalarRhs,
    /// LHS is rank 0, RHS is not: one pass over RHS.
    ScalarLhs,
    /// Neither is a scalar.
    Aligned {
        alignment: AxisAlignment,
        indexer: BroadcastIndexer,
    },
}

impl BroadcastPlan {
    /// Plans a broadcast of `lhs` against `rhs`, returning it with the output shape.
    pub fn resolve(op: &'static str, lhs: &Shape, rhs: &Shape) -> Result<(Self, Shape), OpError> {
        if rhs.is_scalar() {
            return Ok((BroadcastPlan::ScalarRhs, lhs.clone()));
        }
        if lhs.is_scalar() {
            return Ok((BroadcastPlan::ScalarLhs, rhs.clone()));
        }
        let alignment = AxisAlignment::new(lhs.rank(), rhs.rank());
        let output = alignment.output_shape(op, lhs, rhs)?;
        let indexer = BroadcastIndexer::new(&alignment, lhs, rhs, &output);
        Ok((BroadcastPlan::Aligned { alignment, indexer }, output))
    }

    #[inline]
    pub fn is_scalar(&self) -> bool {
        !matches!(self, BroadcastPlan::Aligned { .. })
    }
}
