use ndmorph_image::PixelType;

/// An error type for the io module.
#[derive(thiserror::Error, Debug)]
pub enum IoError {
    /// Error when the file does not exist.
    #[error("File does not exist: {0}")]
    FileDoesNotExist(std::path::PathBuf),

    /// Error to open, read or write the file.
    #[error("Failed to manipulate the file. {0}")]
    FileError(#[from] std::io::Error),

    /// The file does not start with the ndm magic bytes.
    #[error("Not an ndm file: bad magic {0:?}")]
    InvalidMagic([u8; 4]),

    /// The JSON header could not be encoded or decoded.
    #[error("Failed to parse the header. {0}")]
    HeaderError(#[from] serde_json::Error),

    /// The encoded header does not fit the 32-bit length field.
    #[error("Header of {0} bytes is too large")]
    HeaderTooLarge(usize),

    /// The header describes an inconsistent geometry.
    #[error("Invalid header: {0}")]
    InvalidHeader(String),

    /// The stored pixel type differs from the requested one.
    #[error("Pixel type mismatch: file holds {found}, requested {expected}")]
    PixelTypeMismatch {
        /// The requested pixel type.
        expected: PixelType,
        /// The pixel type stored in the file.
        found: PixelType,
    },

    /// The stored dimensionality differs from the requested one.
    #[error("Dimension mismatch: file holds a {found}-D image, requested {expected}-D")]
    DimensionMismatch {
        /// The requested dimensionality.
        expected: usize,
        /// The dimensionality stored in the file.
        found: usize,
    },

    /// The pixel payload does not match the size in the header.
    #[error("Payload has {actual} bytes, expected {expected}")]
    PayloadLength {
        /// Bytes implied by the header.
        expected: usize,
        /// Bytes found in the file.
        actual: usize,
    },

    /// Error to create the image.
    #[error("Failed to create image. {0}")]
    ImageCreationError(#[from] ndmorph_image::ImageError),
}
