use std::time::Instant;

use ndmorph_image::{Image, Scalar};

use crate::binary::dilate_binary;
use crate::boundary::{resolve_boundary, BinaryValues};
use crate::error::MorphologyError;
use crate::grayscale::dilate_grayscale;
use crate::parabolic::{dilate_parabolic, ParabolaScale};
use crate::parallel::ExecutionStrategy;
use crate::structuring::{RadiusVector, StructuringElement};

/// The dilation variant to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DilationKind {
    /// Maximum over a flat ball.
    #[default]
    Grayscale,
    /// Set union over a flat ball.
    Binary,
    /// Separable quadratic envelope.
    Parabolic,
}

impl std::str::FromStr for DilationKind {
    type Err = MorphologyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "grayscale" | "greyscale" | "gray" | "grey" => Ok(Self::Grayscale),
            "binary" | "bin" => Ok(Self::Binary),
            "parabolic" | "parabola" => Ok(Self::Parabolic),
            _ => Err(MorphologyError::UnknownDilationKind(s.to_string())),
        }
    }
}

impl std::fmt::Display for DilationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Grayscale => "grayscale",
            Self::Binary => "binary",
            Self::Parabolic => "parabolic",
        };
        write!(f, "{name}")
    }
}

/// Parameters of a dilation call.
///
/// Overrides are kept as text and parsed for the pixel type of the image being dilated.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DilationConfig {
    /// The dilation variant.
    pub kind: DilationKind,
    /// Radius along every axis, outermost axis first.
    pub radius: Vec<i64>,
    /// Value of pixels outside the image for grayscale dilation.
    pub boundary: Option<String>,
    /// Foreground and background labels for binary dilation, honored only as a pair.
    pub binary_values: Vec<String>,
    /// How independent lines are scheduled.
    pub strategy: ExecutionStrategy,
    /// Measure parabolic distances in physical units.
    pub use_image_spacing: bool,
}

impl DilationConfig {
    /// Create a configuration with the given kind and radius and defaults otherwise.
    pub fn new(kind: DilationKind, radius: &[i64]) -> Self {
        Self {
            kind,
            radius: radius.to_vec(),
            ..Default::default()
        }
    }
}

fn check_dimensions<const N: usize>(radius: &RadiusVector) -> Result<(), MorphologyError> {
    if radius.len() != N {
        return Err(MorphologyError::DimensionMismatch {
            image: N,
            radius: radius.len(),
        });
    }
    Ok(())
}

fn allocate_like<T: Scalar, const N: usize>(
    src: &Image<T, N>,
) -> Result<Image<T, N>, MorphologyError> {
    Ok(Image::from_geometry_val(*src.geometry(), T::default())?)
}

/// Grayscale dilation of `src` with a ball of the given radius.
///
/// # Arguments
///
/// * `src` - The source image.
/// * `radius` - The ball radius along every axis.
/// * `boundary` - Optional text value for pixels outside the image. Defaults to the lowest value of `T`.
/// * `strategy` - How image lines are scheduled.
///
/// # Returns
///
/// A new image with the same geometry as `src`.
///
/// # Examples
///
/// ```
/// use ndmorph_image::Image;
/// use ndmorph_morphology::{dilate_grayscale_image, ExecutionStrategy, RadiusVector};
///
/// let src = Image::<i16, 1>::from_fn([5].into(), |[x]| if x == 2 { 4 } else { 0 }).unwrap();
/// let radius = RadiusVector::from([1]);
///
/// let dst = dilate_grayscale_image(&src, &radius, None, ExecutionStrategy::Serial).unwrap();
/// assert_eq!(dst.as_slice(), &[0, 4, 4, 4, 0]);
/// ```
pub fn dilate_grayscale_image<T: Scalar, const N: usize>(
    src: &Image<T, N>,
    radius: &RadiusVector,
    boundary: Option<&str>,
    strategy: ExecutionStrategy,
) -> Result<Image<T, N>, MorphologyError> {
    check_dimensions::<N>(radius)?;
    let boundary = resolve_boundary::<T>(boundary)?;
    let element = StructuringElement::<N>::ball(radius)?;

    log::debug!(
        "grayscale dilation of {} with {} offsets, boundary {:?}",
        src.geometry(),
        element.len(),
        boundary
    );

    let mut dst = allocate_like(src)?;
    let start = Instant::now();
    dilate_grayscale(src, &mut dst, &element, boundary, strategy)?;
    log::debug!("grayscale dilation took {:?}", start.elapsed());

    Ok(dst)
}

/// Binary dilation of `src` with a ball of the given radius.
///
/// # Arguments
///
/// * `src` - The source image.
/// * `radius` - The ball radius along every axis.
/// * `binary_values` - Optional `[foreground, background]` text labels. Defaults to `1` and `0`.
/// * `strategy` - How image lines are scheduled.
///
/// # Returns
///
/// A new image holding only the foreground and background labels.
pub fn dilate_binary_image<T: Scalar, S: AsRef<str>, const N: usize>(
    src: &Image<T, N>,
    radius: &RadiusVector,
    binary_values: &[S],
    strategy: ExecutionStrategy,
) -> Result<Image<T, N>, MorphologyError> {
    check_dimensions::<N>(radius)?;
    let values = BinaryValues::<T>::resolve(binary_values)?;
    let element = StructuringElement::<N>::ball(radius)?;

    log::debug!(
        "binary dilation of {} with {} offsets, foreground {:?}, background {:?}",
        src.geometry(),
        element.len(),
        values.foreground,
        values.background
    );

    let mut dst = allocate_like(src)?;
    let start = Instant::now();
    dilate_binary(src, &mut dst, &element, values, strategy)?;
    log::debug!("binary dilation took {:?}", start.elapsed());

    Ok(dst)
}

/// Parabolic dilation of `src` with scales derived from the given radius.
///
/// See [`ParabolaScale::from_radius`] for the radius to scale mapping.
///
/// # Arguments
///
/// * `src` - The source image.
/// * `radius` - The radius along every axis.
/// * `use_image_spacing` - Measure distances in physical units instead of pixels.
/// * `strategy` - How independent lines are scheduled.
///
/// # Returns
///
/// A new image with the same geometry as `src`.
pub fn dilate_parabolic_image<T: Scalar, const N: usize>(
    src: &Image<T, N>,
    radius: &RadiusVector,
    use_image_spacing: bool,
    strategy: ExecutionStrategy,
) -> Result<Image<T, N>, MorphologyError> {
    check_dimensions::<N>(radius)?;
    let scale = ParabolaScale::from_radius(radius);

    log::debug!(
        "parabolic dilation of {} with scales {:?}",
        src.geometry(),
        scale.as_slice()
    );

    let mut dst = allocate_like(src)?;
    let start = Instant::now();
    dilate_parabolic(src, &mut dst, &scale, use_image_spacing, strategy)?;
    log::debug!("parabolic dilation took {:?}", start.elapsed());

    Ok(dst)
}

/// Run the dilation described by `config` on `src`.
///
/// # Errors
///
/// Fails before allocating the output if the radius has a negative component, its
/// length differs from `N`, or an override cannot be parsed for `T`.
///
/// # Examples
///
/// ```
/// use ndmorph_image::Image;
/// use ndmorph_morphology::{dilate, DilationConfig, DilationKind};
///
/// let src = Image::<u8, 2>::from_fn([3, 3].into(), |[y, x]| u8::from(y == 1 && x == 1)).unwrap();
/// let config = DilationConfig::new(DilationKind::Binary, &[1, 1]);
///
/// let dst = dilate(&src, &config).unwrap();
/// assert_eq!(dst.as_slice(), &[0, 1, 0, 1, 1, 1, 0, 1, 0]);
/// ```
pub fn dilate<T: Scalar, const N: usize>(
    src: &Image<T, N>,
    config: &DilationConfig,
) -> Result<Image<T, N>, MorphologyError> {
    let radius = RadiusVector::new(&config.radius)?;
    match config.kind {
        DilationKind::Grayscale => {
            dilate_grayscale_image(src, &radius, config.boundary.as_deref(), config.strategy)
        }
        DilationKind::Binary => {
            dilate_binary_image(src, &radius, config.binary_values.as_slice(), config.strategy)
        }
        DilationKind::Parabolic => {
            dilate_parabolic_image(src, &radius, config.use_image_spacing, config.strategy)
        }
    }
}
