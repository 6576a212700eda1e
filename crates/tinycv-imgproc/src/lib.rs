#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

/// bounding box utilities module.
pub mod bbox;

/// compute image histogram module.
pub mod histogram;

/// histogram of oriented gradients module.
pub mod hog;

/// spatial padding module.
pub mod padding;

/// module containing parallization utilities.
pub mod parallel;

/// image pooling module.
pub mod pooling;

/// operations to threshold images.
pub mod threshold;
