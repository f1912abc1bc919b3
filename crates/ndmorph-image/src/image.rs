use crate::error::ImageError;

/// Computes the strides for a row-major (C-contiguous) layout.
///
/// The last axis has stride 1 and each other axis has the product of the
/// sizes to its right.
///
/// # Arguments
///
/// * `shape` - The size of the image along each axis.
///
/// # Examples
///
/// ```
/// use ndmorph_image::get_strides_from_shape;
///
/// assert_eq!(get_strides_from_shape([2, 3]), [3, 1]);
/// assert_eq!(get_strides_from_shape([2, 3, 4]), [12, 4, 1]);
/// ```
pub fn get_strides_from_shape<const N: usize>(shape: [usize; N]) -> [usize; N] {
    let mut strides: [usize; N] = [0; N];
    let mut stride = 1;
    for i in (0..shape.len()).rev() {
        strides[i] = stride;
        stride *= shape[i];
    }
    strides
}

/// Geometry of an N-dimensional image.
///
/// Axis `i` of `size`, `spacing` and `origin` all refer to the same image axis.
///
/// # Examples
///
/// ```
/// use ndmorph_image::ImageGeometry;
///
/// let geometry = ImageGeometry::from_size([20, 10]);
///
/// assert_eq!(geometry.size, [20, 10]);
/// assert_eq!(geometry.spacing, [1.0, 1.0]);
/// assert_eq!(geometry.origin, [0.0, 0.0]);
/// assert_eq!(geometry.numel(), 200);
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ImageGeometry<const N: usize> {
    /// Number of pixels along each axis.
    pub size: [usize; N],
    /// Physical distance between two pixel centers along each axis.
    pub spacing: [f64; N],
    /// Physical position of the first pixel.
    pub origin: [f64; N],
}

impl<const N: usize> ImageGeometry<N> {
    /// Create a geometry with unit spacing and zero origin.
    pub fn from_size(size: [usize; N]) -> Self {
        Self {
            size,
            spacing: [1.0; N],
            origin: [0.0; N],
        }
    }

    /// Replace the spacing of the geometry.
    pub fn with_spacing(mut self, spacing: [f64; N]) -> Self {
        self.spacing = spacing;
        self
    }

    /// Replace the origin of the geometry.
    pub fn with_origin(mut self, origin: [f64; N]) -> Self {
        self.origin = origin;
        self
    }

    /// Total number of pixels, or `None` if it does not fit in `usize`.
    pub fn checked_numel(&self) -> Option<usize> {
        self.size
            .iter()
            .try_fold(1usize, |acc, &s| acc.checked_mul(s))
    }

    /// Total number of pixels.
    ///
    /// Saturates at `usize::MAX`; [`ImageGeometry::validate`] rejects such geometries.
    pub fn numel(&self) -> usize {
        self.checked_numel().unwrap_or(usize::MAX)
    }

    /// Check that every axis is non-empty, the pixel count is representable and
    /// every spacing is positive.
    pub fn validate(&self) -> Result<(), ImageError> {
        if self.size.iter().any(|&s| s == 0) {
            return Err(ImageError::EmptyImage(self.size.to_vec()));
        }
        if self.checked_numel().is_none() {
            return Err(ImageError::SizeOverflow(self.size.to_vec()));
        }
        for (axis, &sp) in self.spacing.iter().enumerate() {
            if !(sp.is_finite() && sp > 0.0) {
                return Err(ImageError::InvalidSpacing(axis, sp));
            }
        }
        Ok(())
    }
}

impl<const N: usize> From<[usize; N]> for ImageGeometry<N> {
    fn from(size: [usize; N]) -> Self {
        Self::from_size(size)
    }
}

impl<const N: usize> std::fmt::Display for ImageGeometry<N> {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(
            f,
            "ImageGeometry {{ size: {:?}, spacing: {:?}, origin: {:?} }}",
            self.size, self.spacing, self.origin
        )
    }
}

/// Represents an N-dimensional image with pixel data.
///
/// The pixels are stored in row-major order: the last axis is contiguous in memory.
/// An index `[i0, i1, .., iN-1]` addresses axis 0 with `i0` and so on.
#[derive(Clone, Debug, PartialEq)]
pub struct Image<T, const N: usize> {
    geometry: ImageGeometry<N>,
    strides: [usize; N],
    data: Vec<T>,
}

impl<T, const N: usize> Image<T, N> {
    /// Create a new image from pixel data.
    ///
    /// # Arguments
    ///
    /// * `geometry` - The geometry of the image.
    /// * `data` - The pixel data in row-major order.
    ///
    /// # Errors
    ///
    /// If the geometry is invalid or the data length does not match it, an error is returned.
    ///
    /// # Examples
    ///
    /// ```
    /// use ndmorph_image::{Image, ImageGeometry};
    ///
    /// let image = Image::<u8, 3>::new(ImageGeometry::from_size([2, 3, 4]), vec![0u8; 24]).unwrap();
    ///
    /// assert_eq!(image.size(), [2, 3, 4]);
    /// assert_eq!(image.strides(), [12, 4, 1]);
    /// ```
    pub fn new(geometry: ImageGeometry<N>, data: Vec<T>) -> Result<Self, ImageError> {
        geometry.validate()?;

        if data.len() != geometry.numel() {
            return Err(ImageError::InvalidDataLength(data.len(), geometry.numel()));
        }

        Ok(Self {
            strides: get_strides_from_shape(geometry.size),
            geometry,
            data,
        })
    }

    /// Create a new image with unit spacing from a size and a fill value.
    ///
    /// # Examples
    ///
    /// ```
    /// use ndmorph_image::Image;
    ///
    /// let image = Image::<f32, 2>::from_size_val([4, 5], 1.5).unwrap();
    ///
    /// assert_eq!(image.numel(), 20);
    /// assert_eq!(image.get([3, 4]), Some(&1.5));
    /// ```
    pub fn from_size_val(size: [usize; N], val: T) -> Result<Self, ImageError>
    where
        T: Clone,
    {
        Self::from_geometry_val(ImageGeometry::from_size(size), val)
    }

    /// Create a new image with the given geometry and fill value.
    pub fn from_geometry_val(geometry: ImageGeometry<N>, val: T) -> Result<Self, ImageError>
    where
        T: Clone,
    {
        geometry.validate()?;
        let data = vec![val; geometry.numel()];
        Self::new(geometry, data)
    }

    /// Create a new image by evaluating `f` at every pixel index.
    pub fn from_fn<F>(geometry: ImageGeometry<N>, mut f: F) -> Result<Self, ImageError>
    where
        F: FnMut([usize; N]) -> T,
    {
        geometry.validate()?;
        let strides = get_strides_from_shape(geometry.size);
        let data = (0..geometry.numel())
            .map(|offset| f(index_from_offset(offset, &strides)))
            .collect();
        Self::new(geometry, data)
    }

    /// Get the geometry of the image.
    pub fn geometry(&self) -> &ImageGeometry<N> {
        &self.geometry
    }

    /// Get the number of pixels along each axis.
    pub fn size(&self) -> [usize; N] {
        self.geometry.size
    }

    /// Get the pixel spacing along each axis.
    pub fn spacing(&self) -> [f64; N] {
        self.geometry.spacing
    }

    /// Get the physical position of the first pixel.
    pub fn origin(&self) -> [f64; N] {
        self.geometry.origin
    }

    /// Get the memory strides of each axis, in elements.
    pub fn strides(&self) -> [usize; N] {
        self.strides
    }

    /// Get the dimensionality of the image.
    pub fn ndim(&self) -> usize {
        N
    }

    /// Get the total number of pixels.
    pub fn numel(&self) -> usize {
        self.data.len()
    }

    /// Get the pixel data as a slice.
    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    /// Get the pixel data as a mutable slice.
    pub fn as_slice_mut(&mut self) -> &mut [T] {
        &mut self.data
    }

    /// Consume the image and return its pixel data.
    pub fn into_vec(self) -> Vec<T> {
        self.data
    }

    /// Get the offset of the pixel at the given index, or `None` if it is out of bounds.
    pub fn get_iter_offset(&self, index: [usize; N]) -> Option<usize> {
        let mut offset = 0;
        for ((&idx, dim_size), stride) in index.iter().zip(self.geometry.size).zip(self.strides) {
            if idx >= dim_size {
                return None;
            }
            offset += idx * stride;
        }
        Some(offset)
    }

    /// Get the index of the pixel at the given offset without checking bounds.
    pub fn get_index_unchecked(&self, offset: usize) -> [usize; N] {
        index_from_offset(offset, &self.strides)
    }

    /// Get the pixel at the given index.
    pub fn get(&self, index: [usize; N]) -> Option<&T> {
        self.get_iter_offset(index).map(|offset| &self.data[offset])
    }

    /// Get a mutable reference to the pixel at the given index.
    pub fn get_mut(&mut self, index: [usize; N]) -> Option<&mut T> {
        self.get_iter_offset(index)
            .map(move |offset| &mut self.data[offset])
    }

    /// Apply `f` to every pixel, producing an image with the same geometry.
    pub fn map<U, F>(&self, f: F) -> Image<U, N>
    where
        F: FnMut(&T) -> U,
    {
        Image {
            geometry: self.geometry,
            strides: self.strides,
            data: self.data.iter().map(f).collect(),
        }
    }

    /// Cast the pixel data of the image to a different type.
    ///
    /// # Errors
    ///
    /// If a pixel value is not representable in the target type, an error is returned.
    pub fn cast<U>(&self) -> Result<Image<U, N>, ImageError>
    where
        T: num_traits::NumCast + Copy,
        U: num_traits::NumCast,
    {
        let data = self
            .data
            .iter()
            .map(|&x| U::from(x).ok_or(ImageError::CastError))
            .collect::<Result<Vec<U>, ImageError>>()?;

        Ok(Image {
            geometry: self.geometry,
            strides: self.strides,
            data,
        })
    }
}

fn index_from_offset<const N: usize>(offset: usize, strides: &[usize; N]) -> [usize; N] {
    let mut idx = [0; N];
    let mut rem = offset;
    for (dim_i, &s) in strides.iter().enumerate() {
        idx[dim_i] = rem / s;
        rem %= s;
    }
    idx
}
