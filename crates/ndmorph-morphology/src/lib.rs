#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

/// Error types used by the dilation operations.
pub mod error;

/// Ball structuring element and radius vector.
pub mod structuring;

/// Boundary values and textual pixel value parsing.
pub mod boundary;

/// Grayscale (max) dilation with a flat structuring element.
pub mod grayscale;

/// Binary (set) dilation with a flat structuring element.
pub mod binary;

/// Separable parabolic dilation.
pub mod parabolic;

/// High level entry points that validate parameters and allocate the output.
pub mod dilate;

/// module containing parallelization utilities.
pub mod parallel;

mod neighborhood;

pub use crate::boundary::{parse_pixel_value, resolve_boundary, BinaryValues};
pub use crate::dilate::{
    dilate, dilate_binary_image, dilate_grayscale_image, dilate_parabolic_image, DilationConfig,
    DilationKind,
};
pub use crate::error::MorphologyError;
pub use crate::parabolic::ParabolaScale;
pub use crate::parallel::ExecutionStrategy;
pub use crate::structuring::{RadiusVector, StructuringElement};
