#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

/// Error types for I/O operations.
pub mod error;

/// The ndm file header.
pub mod header;

/// Little-endian encoding of pixel values.
pub mod pixels;

/// Reading and writing ndm files.
///
/// See [`ndm::read_image`] and [`ndm::write_image`].
pub mod ndm;

pub use crate::error::IoError;
pub use crate::header::ImageHeader;
pub use crate::ndm::{read_header, read_image, write_image};
pub use crate::pixels::PixelCodec;
