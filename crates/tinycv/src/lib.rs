#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

#[doc(inline)]
pub use tinycv_image as image;

#[doc(inline)]
pub use tinycv_imgproc as imgproc;

#[doc(inline)]
pub use tinycv_nn as nn;
