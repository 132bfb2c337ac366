//! Copyright © 2025 Peter Garfield Bower. All rights reserved.
//!
//! # ndbroadcast
//!
//! N-dimensional tensor kernels over contiguous row-major buffers:
//!
//! - [`BroadcastDivide`] (`"Div"`) - elementwise division with NumPy-style
//!   broadcasting between operands of any rank, including a rank-0 scalar fast path.
//! - [`TileExpand`] (`"TileND"`) - repeats a tensor along selected axes by
//!   integer factors.
//!
//! Both follow the same two-phase [`Operator`] contract: shape inference
//! whenever input shapes change, then forward passes that compute every
//! output slot directly from source offsets. Nothing is materialised along
//! the way.
//!
//! Enable `parallel_proc` to split forward passes across the rayon pool.

pub mod enums {
    pub mod divisor;
    pub mod error;
}

pub mod structs {
    pub mod shape;
    pub mod tensor;
    pub mod tile_config;
}

pub mod kernels {
    pub mod arithmetic {
        pub mod types;
    }
    pub mod routing;
    pub mod divide;
    pub mod tile;
}

pub mod traits {
    pub mod operator;
    pub mod shape;
    pub mod type_unions;
}

pub mod macros;

pub use enums::divisor::Divisor;
pub use enums::error::OpError;
pub use kernels::divide::{BroadcastDivide, divide};
pub use kernels::routing::{AxisAlignment, BroadcastPlan, Regime};
pub use kernels::tile::{TileExpand, tile};
pub use structs::shape::Shape;
pub use structs::tensor::Tensor;
pub use structs::tile_config::TileConfig;
pub use traits::operator::{Operator, ShapeInference};
pub use traits::shape::Shaped;
pub use traits::type_unions::{Float, Primitive};
pub use vec64::{Vec64, vec64};
