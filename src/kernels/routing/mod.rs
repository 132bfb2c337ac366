// Copyright Peter Bower 2025. All Rights Reserved.
// Licensed under MIT License.

//! # Routing Module
//!
//! Shape alignment and index walking shared by the operator kernels.

pub mod broadcast;
pub mod index_map;

pub use broadcast::{AxisAlignment, BroadcastIndexer, BroadcastPlan, Operand, Regime, broadcast_dim};
pub use index_map::fill_indexed;
