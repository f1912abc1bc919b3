#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

/// N-dimensional image representation with geometry metadata.
pub mod image;

/// Pixel scalar traits and type tags.
pub mod pixel;

/// Error types for the image module.
pub mod error;

pub use crate::error::ImageError;
pub use crate::image::{get_strides_from_shape, Image, ImageGeometry};
pub use crate::pixel::{PixelKind, PixelType, Scalar};
