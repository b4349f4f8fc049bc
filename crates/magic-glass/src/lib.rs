#![deny(missing_docs)]
//! Magic glass: pixel-level image processing with a magic lens.
//!
//! The building blocks live in the re-exported crates. [`Session`] ties them
//! together into the state of an interactive viewer: zoom, pan, full-frame views
//! and a lens that processes only a disc around the pointer.
//!
//! ```
//! use magic_glass::image::{Image, ImageSize};
//! use magic_glass::imgproc::color::ChannelMode;
//! use magic_glass::{LensConfig, Session};
//!
//! let image = Image::<u8, 3>::from_size_pixel(
//!     ImageSize { width: 320, height: 240 },
//!     [200, 100, 50],
//! )
//! .unwrap();
//!
//! let mut session = Session::new(image, LensConfig::default()).unwrap();
//! session.enable_lens().unwrap();
//! session.select_lens_mode(ChannelMode::Green).unwrap();
//!
//! let readout = session.pointer_moved(160, 120).unwrap().unwrap();
//! assert_eq!(readout.rgb, [100, 100, 100]);
//! ```

#[doc(inline)]
pub use magic_glass_image as image;

#[doc(inline)]
pub use magic_glass_imgproc as imgproc;

#[doc(inline)]
pub use magic_glass_io as io;

mod config;
mod error;
mod session;

pub use config::LensConfig;
pub use error::SessionError;
pub use session::{PointerReadout, Session, View};
