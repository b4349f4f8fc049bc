#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

/// channel extraction and grayscale conversions module.
pub mod color;

/// edge detection filters module.
pub mod filter;

/// compute image histogram module.
pub mod histogram;

/// magic lens compositing module.
pub mod lens;

/// row-wise pixel iteration utilities.
pub mod pixel_iter;

/// utility functions for resizing images.
pub mod resize;

/// threshold lookup tables module.
pub mod threshold;
