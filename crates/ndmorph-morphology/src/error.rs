use ndmorph_image::ImageError;

use crate::parallel::ParallelError;

/// Errors related to dilation operations.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum MorphologyError {
    /// The radius has a negative component or does not match the element dimensionality.
    #[error("Invalid radius {radius:?}: {reason}")]
    InvalidRadius {
        /// The offending radius.
        radius: Vec<i64>,
        /// Why the radius was rejected.
        reason: String,
    },

    /// The boundary override text could not be parsed as a pixel value.
    #[error("Malformed boundary value: {0:?}")]
    MalformedBoundaryValue(String),

    /// A foreground or background override could not be parsed as a pixel value.
    #[error("Malformed binary value: {0:?}")]
    MalformedBinaryValue(String),

    /// The image dimensionality differs from the number of radius components.
    #[error("Image has {image} dimensions but the radius has {radius} components")]
    DimensionMismatch {
        /// Dimensionality of the image.
        image: usize,
        /// Number of radius components.
        radius: usize,
    },

    /// A parabola scale is not a positive finite number.
    #[error("Parabola scale along axis {axis} must be positive and finite, got {value}")]
    InvalidScale {
        /// The axis of the offending scale.
        axis: usize,
        /// The offending scale.
        value: f64,
    },

    /// The source and destination images have different sizes.
    #[error("Source size {0:?} does not match destination size {1:?}")]
    ImageSizeMismatch(Vec<usize>, Vec<usize>),

    /// The dilation kind name is not recognized.
    #[error("Unknown dilation kind: {0}")]
    UnknownDilationKind(String),

    /// Error from the image module.
    #[error(transparent)]
    Image(#[from] ImageError),

    /// Error from the parallel execution helpers.
    #[error(transparent)]
    Parallel(#[from] ParallelError),
}
