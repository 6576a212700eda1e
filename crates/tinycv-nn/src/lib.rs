#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

/// Error types for the network module.
pub mod error;

/// Feedforward network with manual backpropagation.
pub mod feedforward;

/// Dense row-major matrix support.
pub mod matrix;

pub use crate::error::NetworkError;
pub use crate::feedforward::{FeedForwardConfig, FeedForwardNetwork};
pub use crate::matrix::Matrix;
