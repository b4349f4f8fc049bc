//! Filter operations
//!
//! This module provides the fixed-kernel edge detection filters. Every filter
//! converts its RGB8 input to luminance first and writes the edge strength
//! replicated over the three output channels.

/// Filter kernels
pub mod kernels;

/// Filter operations
mod ops;
pub use ops::*;
