/// An error type for the image module.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum ImageError {
    /// Error when the data length does not match the image size.
    #[error("Data length ({0}) does not match the image size ({1})")]
    InvalidDataLength(usize, usize),

    /// Error when one of the axes has zero length.
    #[error("Image size must be non-zero along every axis, got {0:?}")]
    EmptyImage(Vec<usize>),

    /// Error when the pixel count does not fit in `usize`.
    #[error("Image size {0:?} has too many pixels")]
    SizeOverflow(Vec<usize>),

    /// Error when the spacing along an axis is not a positive finite number.
    #[error("Spacing along axis {0} must be positive and finite, got {1}")]
    InvalidSpacing(usize, f64),

    /// Error when a pixel value cannot be cast to the target type.
    #[error("Failed to cast image data")]
    CastError,

    /// Error when a pixel type name is not recognized.
    #[error("Unknown pixel type: {0}")]
    UnknownPixelType(String),
}
