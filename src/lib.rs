//! Gray/color raster image model with an editable display buffer.
//!
//! - [`loader::load`] reads a file and picks the gray or color layout
//! - [`image_data::ImageData`] holds the original samples, the editable
//!   display samples and the packed RGB buffer the viewer draws
//! - [`pixel`] converts unpacked samples to packed RGB with clamping
//!
//! ```no_run
//! use raster_viewer::loader;
//!
//! # fn main() -> raster_viewer::Result<()> {
//! let mut image = loader::load("scan.pgm")?.into_image();
//! for v in image.display_samples_mut() {
//!     *v = 255 - *v;
//! }
//! image.repack();
//! image.make_permanent();
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod image_data;
pub mod loader;
pub mod pixel;
pub mod state;

pub use crate::error::{ImageError, Result};
pub use crate::image_data::{ColorImage, GrayImage, ImageData, ImageKind, ImageRecord};
pub use crate::loader::{load, Advisory, Loaded};
