use ndmorph_image::{Image, ImageGeometry, PixelType, Scalar};
use serde::{Deserialize, Serialize};

use crate::error::IoError;

/// Metadata stored in front of the pixel payload of an ndm file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageHeader {
    /// Storage type of the pixels.
    #[serde(with = "pixel_type_name")]
    pub pixel_type: PixelType,
    /// Number of pixels along each axis, outermost axis first.
    pub size: Vec<usize>,
    /// Physical distance between pixel centers along each axis.
    pub spacing: Vec<f64>,
    /// Physical position of the first pixel.
    pub origin: Vec<f64>,
    /// Whether the payload is zlib compressed.
    #[serde(default)]
    pub compressed: bool,
}

impl ImageHeader {
    /// Describe `image` for storage.
    pub fn from_image<T: Scalar, const N: usize>(image: &Image<T, N>, compressed: bool) -> Self {
        Self {
            pixel_type: T::PIXEL_TYPE,
            size: image.size().to_vec(),
            spacing: image.spacing().to_vec(),
            origin: image.origin().to_vec(),
            compressed,
        }
    }

    /// Number of axes.
    pub fn ndim(&self) -> usize {
        self.size.len()
    }

    /// Total number of pixels.
    ///
    /// # Errors
    ///
    /// Returns [`IoError::InvalidHeader`] if the count does not fit in `usize`.
    pub fn numel(&self) -> Result<usize, IoError> {
        self.size
            .iter()
            .try_fold(1usize, |acc, &s| acc.checked_mul(s))
            .ok_or_else(|| IoError::InvalidHeader(format!("size {:?} overflows", self.size)))
    }

    /// Number of bytes of the uncompressed payload.
    ///
    /// # Errors
    ///
    /// Returns [`IoError::InvalidHeader`] if the length does not fit in `usize`.
    pub fn payload_len(&self) -> Result<usize, IoError> {
        self.numel()?
            .checked_mul(self.pixel_type.size_of())
            .ok_or_else(|| IoError::InvalidHeader(format!("size {:?} overflows", self.size)))
    }

    /// Rebuild the geometry of an `N`-dimensional image.
    ///
    /// # Errors
    ///
    /// Returns [`IoError::DimensionMismatch`] if the header holds another dimensionality,
    /// or [`IoError::InvalidHeader`] if spacing or origin have the wrong length.
    pub fn geometry<const N: usize>(&self) -> Result<ImageGeometry<N>, IoError> {
        let size: [usize; N] =
            self.size
                .as_slice()
                .try_into()
                .map_err(|_| IoError::DimensionMismatch {
                    expected: N,
                    found: self.ndim(),
                })?;
        let spacing: [f64; N] = self.spacing.as_slice().try_into().map_err(|_| {
            IoError::InvalidHeader(format!(
                "{} spacing values for {} axes",
                self.spacing.len(),
                N
            ))
        })?;
        let origin: [f64; N] = self.origin.as_slice().try_into().map_err(|_| {
            IoError::InvalidHeader(format!(
                "{} origin values for {} axes",
                self.origin.len(),
                N
            ))
        })?;

        Ok(ImageGeometry::from_size(size)
            .with_spacing(spacing)
            .with_origin(origin))
    }
}

mod pixel_type_name {
    use ndmorph_image::PixelType;
    use serde::{de::Error, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(pixel_type: &PixelType, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(pixel_type.name())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<PixelType, D::Error> {
        let name = String::deserialize(d)?;
        name.parse().map_err(D::Error::custom)
    }
}
