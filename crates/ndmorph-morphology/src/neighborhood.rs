use ndmorph_image::Image;

use crate::error::MorphologyError;
use crate::structuring::StructuringElement;

/// Pre-computed flat offsets of a structuring element laid over an image.
pub(crate) struct Neighborhood<'a, const N: usize> {
    offsets: &'a [[isize; N]],
    deltas: Vec<isize>,
    radius: [usize; N],
    size: [usize; N],
}

impl<'a, const N: usize> Neighborhood<'a, N> {
    pub(crate) fn new<T>(image: &Image<T, N>, element: &'a StructuringElement<N>) -> Self {
        let strides = image.strides();
        let deltas = element
            .offsets()
            .iter()
            .map(|o| {
                o.iter()
                    .zip(strides.iter())
                    .map(|(&oi, &si)| oi * si as isize)
                    .sum()
            })
            .collect();

        Self {
            offsets: element.offsets(),
            deltas,
            radius: element.radius(),
            size: image.size(),
        }
    }

    /// Whether the whole element centered at `index` lies inside the image.
    fn is_interior(&self, index: &[usize; N]) -> bool {
        index
            .iter()
            .zip(self.radius.iter().zip(self.size.iter()))
            .all(|(&i, (&r, &s))| i >= r && i + r < s)
    }

    fn in_bounds(&self, index: &[usize; N], offset: &[isize; N]) -> bool {
        index
            .iter()
            .zip(offset.iter().zip(self.size.iter()))
            .all(|(&i, (&o, &s))| {
                let p = i as isize + o;
                p >= 0 && (p as usize) < s
            })
    }

    /// Yields the value under every element offset centered at `index`, or `None`
    /// where the offset falls outside the image.
    ///
    /// `offset` is the flat position of `index` in `data`.
    pub(crate) fn values<'b, T: Copy>(
        &'b self,
        data: &'b [T],
        offset: usize,
        index: [usize; N],
    ) -> impl Iterator<Item = Option<T>> + 'b {
        let interior = self.is_interior(&index);
        self.offsets
            .iter()
            .zip(self.deltas.iter())
            .map(move |(o, &delta)| {
                if interior || self.in_bounds(&index, o) {
                    Some(data[(offset as isize + delta) as usize])
                } else {
                    None
                }
            })
    }
}

/// Index of the first pixel of the line `line` when lines run along the last axis.
pub(crate) fn line_start_index<T, const N: usize>(image: &Image<T, N>, line: usize) -> [usize; N] {
    let line_len = image.size().last().copied().unwrap_or(1);
    image.get_index_unchecked(line * line_len)
}

/// Check that `src` and `dst` cover the same pixel grid.
pub(crate) fn ensure_same_size<T, U, const N: usize>(
    src: &Image<T, N>,
    dst: &Image<U, N>,
) -> Result<(), MorphologyError> {
    if src.size() != dst.size() {
        return Err(MorphologyError::ImageSizeMismatch(
            src.size().to_vec(),
            dst.size().to_vec(),
        ));
    }
    Ok(())
}
