use ndmorph_image::{PixelKind, Scalar};

use crate::error::MorphologyError;

/// Parse a textual pixel value for the pixel type `T`.
///
/// Integer pixel types accept integer literals only, floating-point types accept
/// any float literal except NaN. Surrounding whitespace is ignored. Returns `None`
/// if the text does not parse or the value is not representable in `T`.
///
/// # Examples
///
/// ```
/// use ndmorph_morphology::parse_pixel_value;
///
/// assert_eq!(parse_pixel_value::<i16>(" -12 "), Some(-12));
/// assert_eq!(parse_pixel_value::<u8>("300"), None);
/// assert_eq!(parse_pixel_value::<u8>("1.5"), None);
/// assert_eq!(parse_pixel_value::<f32>("1.5"), Some(1.5));
/// ```
pub fn parse_pixel_value<T: Scalar>(text: &str) -> Option<T> {
    let text = text.trim();
    match T::KIND {
        PixelKind::Integer => text.parse::<i64>().ok().and_then(num_traits::cast),
        PixelKind::FloatingPoint => text
            .parse::<f64>()
            .ok()
            .filter(|v| !v.is_nan())
            .and_then(num_traits::cast),
    }
}

/// Resolve the value used for pixels outside the image in grayscale dilation.
///
/// Without an override (or with an empty one) this is the most negative value
/// of `T`, so the border never suppresses the maximum.
///
/// # Errors
///
/// Returns [`MorphologyError::MalformedBoundaryValue`] if the override cannot be parsed.
pub fn resolve_boundary<T: Scalar>(override_text: Option<&str>) -> Result<T, MorphologyError> {
    match override_text {
        Some(text) if !text.trim().is_empty() => parse_pixel_value(text)
            .ok_or_else(|| MorphologyError::MalformedBoundaryValue(text.to_string())),
        _ => Ok(T::lowest()),
    }
}

/// Foreground and background labels of a binary image.
///
/// Pixels outside the image are always background.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BinaryValues<T> {
    /// Value marking object pixels.
    pub foreground: T,
    /// Value written to every pixel that is not reached by the dilation.
    pub background: T,
}

impl<T: Scalar> Default for BinaryValues<T> {
    fn default() -> Self {
        Self {
            foreground: T::one(),
            background: T::zero(),
        }
    }
}

impl<T: Scalar> BinaryValues<T> {
    /// Resolve the labels from textual overrides `[foreground, background]`.
    ///
    /// Overrides are only honored as a pair. Any other number of entries falls
    /// back to foreground `1` and background `0`.
    ///
    /// # Errors
    ///
    /// Returns [`MorphologyError::MalformedBinaryValue`] if one of the pair cannot be parsed.
    pub fn resolve<S: AsRef<str>>(overrides: &[S]) -> Result<Self, MorphologyError> {
        let [foreground, background] = overrides else {
            if !overrides.is_empty() {
                log::debug!(
                    "ignoring {} binary value override(s), expected a pair",
                    overrides.len()
                );
            }
            return Ok(Self::default());
        };

        let parse = |text: &S| {
            let text = text.as_ref();
            parse_pixel_value(text)
                .ok_or_else(|| MorphologyError::MalformedBinaryValue(text.to_string()))
        };

        Ok(Self {
            foreground: parse(foreground)?,
            background: parse(background)?,
        })
    }
}
