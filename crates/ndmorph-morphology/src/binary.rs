use ndmorph_image::{Image, Scalar};

use crate::boundary::BinaryValues;
use crate::error::MorphologyError;
use crate::neighborhood::{ensure_same_size, line_start_index, Neighborhood};
use crate::parallel::{for_each_chunk, ExecutionStrategy};
use crate::structuring::StructuringElement;

/// Dilate a binary image with a flat structuring element.
///
/// A pixel becomes foreground iff the element centered on it covers at least one
/// foreground pixel of the source; every other pixel becomes background. Pixels
/// outside the image never count as foreground.
///
/// # Arguments
///
/// * `src` - The source image.
/// * `dst` - The destination image (will be overwritten).
/// * `element` - The structuring element.
/// * `values` - The foreground and background labels.
/// * `strategy` - How image lines are scheduled.
///
/// # Returns
///
/// Ok(()) on success, or [`MorphologyError`] if the sizes don't match.
pub fn dilate_binary<T: Scalar, const N: usize>(
    src: &Image<T, N>,
    dst: &mut Image<T, N>,
    element: &StructuringElement<N>,
    values: BinaryValues<T>,
    strategy: ExecutionStrategy,
) -> Result<(), MorphologyError> {
    ensure_same_size(src, dst)?;

    let neighborhood = Neighborhood::new(src, element);
    let src_data = src.as_slice();
    let line_len = src.size().last().copied().unwrap_or(1);
    let BinaryValues {
        foreground,
        background,
    } = values;

    for_each_chunk(dst.as_slice_mut(), line_len, strategy, |line, dst_line| {
        let mut index = line_start_index(src, line);
        let start = line * line_len;
        for (x, dst_pixel) in dst_line.iter_mut().enumerate() {
            if let Some(last) = index.last_mut() {
                *last = x;
            }
            let hit = neighborhood
                .values(src_data, start + x, index)
                .any(|v| v == Some(foreground));
            *dst_pixel = if hit { foreground } else { background };
        }
    })?;

    Ok(())
}
