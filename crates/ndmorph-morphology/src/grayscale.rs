use ndmorph_image::{Image, Scalar};

use crate::error::MorphologyError;
use crate::neighborhood::{ensure_same_size, line_start_index, Neighborhood};
use crate::parallel::{for_each_chunk, ExecutionStrategy};
use crate::structuring::StructuringElement;

/// Dilate a grayscale image with a flat structuring element.
///
/// Each pixel is replaced by the maximum value in the neighborhood defined by the
/// element. Neighbors outside the image read as `boundary`.
///
/// # Arguments
///
/// * `src` - The source image.
/// * `dst` - The destination image (will be overwritten).
/// * `element` - The structuring element.
/// * `boundary` - The value of every pixel outside the image.
/// * `strategy` - How image lines are scheduled.
///
/// # Returns
///
/// Ok(()) on success, or [`MorphologyError`] if the sizes don't match.
///
/// # Examples
///
/// ```
/// use ndmorph_image::{Image, ImageGeometry};
/// use ndmorph_morphology::{grayscale::dilate_grayscale, ExecutionStrategy, RadiusVector, StructuringElement};
///
/// let src = Image::<u8, 2>::new(ImageGeometry::from_size([1, 5]), vec![0, 0, 9, 0, 0]).unwrap();
/// let mut dst = Image::<u8, 2>::from_size_val([1, 5], 0).unwrap();
/// let element = StructuringElement::ball(&RadiusVector::from([0, 1])).unwrap();
///
/// dilate_grayscale(&src, &mut dst, &element, 0, ExecutionStrategy::Serial).unwrap();
/// assert_eq!(dst.as_slice(), &[0, 9, 9, 9, 0]);
/// ```
pub fn dilate_grayscale<T: Scalar, const N: usize>(
    src: &Image<T, N>,
    dst: &mut Image<T, N>,
    element: &StructuringElement<N>,
    boundary: T,
    strategy: ExecutionStrategy,
) -> Result<(), MorphologyError> {
    ensure_same_size(src, dst)?;

    let neighborhood = Neighborhood::new(src, element);
    let src_data = src.as_slice();
    let line_len = src.size().last().copied().unwrap_or(1);

    for_each_chunk(dst.as_slice_mut(), line_len, strategy, |line, dst_line| {
        let mut index = line_start_index(src, line);
        let start = line * line_len;
        for (x, dst_pixel) in dst_line.iter_mut().enumerate() {
            if let Some(last) = index.last_mut() {
                *last = x;
            }
            let offset = start + x;
            *dst_pixel = neighborhood
                .values(src_data, offset, index)
                .map(|v| v.unwrap_or(boundary))
                .fold(src_data[offset], |acc, v| if v > acc { v } else { acc });
        }
    })?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::structuring::RadiusVector;
    use ndmorph_image::ImageGeometry;

    fn ball<const N: usize>(radius: [usize; N]) -> Result<StructuringElement<N>, MorphologyError> {
        StructuringElement::ball(&RadiusVector::from(radius))
    }

    #[test]
    fn test_dilate_single_peak() -> Result<(), MorphologyError> {
        #[rustfmt::skip]
        let src = Image::<u8, 2>::new(
            ImageGeometry::from_size([5, 5]),
            vec![
                0, 0, 0, 0, 0,
                0, 0, 0, 0, 0,
                0, 0, 9, 0, 0,
                0, 0, 0, 0, 0,
                0, 0, 0, 0, 0,
            ],
        )?;
        let mut dst = Image::<u8, 2>::from_size_val([5, 5], 0)?;
        dilate_grayscale(&src, &mut dst, &ball([1, 1])?, 0, ExecutionStrategy::Serial)?;

        #[rustfmt::skip]
        let expected = vec![
            0, 0, 0, 0, 0,
            0, 0, 9, 0, 0,
            0, 9, 9, 9, 0,
            0, 0, 9, 0, 0,
            0, 0, 0, 0, 0,
        ];
        assert_eq!(dst.as_slice(), expected.as_slice());
        Ok(())
    }

    #[test]
    fn test_dilate_takes_maximum() -> Result<(), MorphologyError> {
        let src = Image::<i16, 1>::new(ImageGeometry::from_size([6]), vec![3, -2, 7, 1, 1, 5])?;
        let mut dst = Image::<i16, 1>::from_size_val([6], 0)?;
        dilate_grayscale(&src, &mut dst, &ball([1])?, i16::MIN, ExecutionStrategy::Serial)?;
        assert_eq!(dst.as_slice(), &[3, 7, 7, 7, 5, 5]);
        Ok(())
    }

    #[test]
    fn test_dilate_boundary_override() -> Result<(), MorphologyError> {
        // single-pixel-wide image: every horizontal neighbor is outside
        let src = Image::<f32, 2>::new(ImageGeometry::from_size([3, 1]), vec![1.0, 2.0, 3.0])?;
        let mut dst = Image::<f32, 2>::from_size_val([3, 1], 0.0)?;

        dilate_grayscale(&src, &mut dst, &ball([0, 2])?, 10.0, ExecutionStrategy::Serial)?;
        assert_eq!(dst.as_slice(), &[10.0, 10.0, 10.0]);

        dilate_grayscale(&src, &mut dst, &ball([0, 2])?, -1.0, ExecutionStrategy::Serial)?;
        assert_eq!(dst.as_slice(), &[1.0, 2.0, 3.0]);
        Ok(())
    }

    #[test]
    fn test_dilate_3d() -> Result<(), MorphologyError> {
        let mut src = Image::<u16, 3>::from_size_val([3, 3, 3], 0)?;
        if let Some(px) = src.get_mut([1, 1, 1]) {
            *px = 100;
        }
        let mut dst = Image::<u16, 3>::from_size_val([3, 3, 3], 0)?;
        dilate_grayscale(&src, &mut dst, &ball([1, 1, 1])?, 0, ExecutionStrategy::ParallelLines)?;

        let lit = dst.as_slice().iter().filter(|&&v| v == 100).count();
        assert_eq!(lit, 7);
        assert_eq!(dst.get([0, 1, 1]), Some(&100));
        assert_eq!(dst.get([0, 0, 1]), Some(&0));
        Ok(())
    }

    #[test]
    fn test_dilate_strategies_agree() -> Result<(), MorphologyError> {
        let src = Image::<u8, 2>::from_fn(ImageGeometry::from_size([7, 9]), |[y, x]| {
            ((y * 31 + x * 17) % 23) as u8
        })?;
        let element = ball([2, 3])?;

        let mut serial = Image::<u8, 2>::from_size_val([7, 9], 0)?;
        dilate_grayscale(&src, &mut serial, &element, 0, ExecutionStrategy::Serial)?;

        for strategy in [ExecutionStrategy::ParallelLines, ExecutionStrategy::Fixed(3)] {
            let mut dst = Image::<u8, 2>::from_size_val([7, 9], 0)?;
            dilate_grayscale(&src, &mut dst, &element, 0, strategy)?;
            assert_eq!(dst, serial);
        }
        Ok(())
    }

    #[test]
    fn test_dilate_size_mismatch() -> Result<(), MorphologyError> {
        let src = Image::<u8, 2>::from_size_val([2, 3], 0)?;
        let mut dst = Image::<u8, 2>::from_size_val([3, 2], 0)?;
        let res = dilate_grayscale(&src, &mut dst, &ball([1, 1])?, 0, ExecutionStrategy::Serial);
        assert_eq!(
            res,
            Err(MorphologyError::ImageSizeMismatch(vec![2, 3], vec![3, 2]))
        );
        Ok(())
    }
}
