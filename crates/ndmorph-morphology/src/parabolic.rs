use ndmorph_image::{Image, Scalar};
use num_traits::ToPrimitive;

use crate::error::MorphologyError;
use crate::neighborhood::ensure_same_size;
use crate::parallel::{for_each_chunk, ExecutionStrategy};
use crate::structuring::RadiusVector;

/// Per-axis coefficient of the quadratic structuring function.
///
/// Along axis `i` the structuring function is `-(d^2) / (4 * scale_i)`.
///
/// # Examples
///
/// ```
/// use ndmorph_morphology::{ParabolaScale, RadiusVector};
///
/// let scale = ParabolaScale::from_radius(&RadiusVector::from([0, 1, 4]));
/// assert_eq!(scale.as_slice(), &[1.0, 1.5, 9.0]);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ParabolaScale(Vec<f64>);

impl ParabolaScale {
    /// Create a scale from explicit per-axis values.
    ///
    /// # Errors
    ///
    /// Returns [`MorphologyError::InvalidScale`] if a value is not positive and finite.
    pub fn new(scales: Vec<f64>) -> Result<Self, MorphologyError> {
        if let Some((axis, &value)) = scales
            .iter()
            .enumerate()
            .find(|&(_, &s)| !(s.is_finite() && s > 0.0))
        {
            return Err(MorphologyError::InvalidScale { axis, value });
        }
        Ok(Self(scales))
    }

    /// Map a ball radius onto parabola scales with `scale_i = r_i^2 / 2 + 1`.
    ///
    /// The mapping is fixed so that parabolic dilation stays comparable to the
    /// ball based operations for the same radius.
    pub fn from_radius(radius: &RadiusVector) -> Self {
        Self(
            radius
                .as_slice()
                .iter()
                .map(|&r| {
                    let r = r as f64;
                    r * r / 2.0 + 1.0
                })
                .collect(),
        )
    }

    /// Number of axes.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the scale has no axes.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The per-axis scales.
    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }
}

/// Dilate an image with a separable parabolic structuring function.
///
/// Along every line parallel to axis `i` each sample becomes
/// `max_k (f[k] - (x - k)^2 / (4 * scale_i))`, and the result of axis `i` feeds
/// axis `i + 1`. Only samples inside the image take part. Each line is solved in
/// linear time with the upper envelope of the parabolas rooted at its samples.
///
/// Intermediate passes are computed in `f64`. The final values are cast back to `T`,
/// which truncates toward zero for integer pixels.
///
/// # Arguments
///
/// * `src` - The source image.
/// * `dst` - The destination image (will be overwritten).
/// * `scale` - The parabola scale of every axis.
/// * `use_image_spacing` - Measure distances in physical units instead of pixels.
/// * `strategy` - How independent lines are scheduled.
///
/// # Returns
///
/// Ok(()) on success, or [`MorphologyError`] if the sizes or the number of scales don't match.
pub fn dilate_parabolic<T: Scalar, const N: usize>(
    src: &Image<T, N>,
    dst: &mut Image<T, N>,
    scale: &ParabolaScale,
    use_image_spacing: bool,
    strategy: ExecutionStrategy,
) -> Result<(), MorphologyError> {
    ensure_same_size(src, dst)?;
    if scale.len() != N {
        return Err(MorphologyError::DimensionMismatch {
            image: N,
            radius: scale.len(),
        });
    }

    let mut work: Vec<f64> = src
        .as_slice()
        .iter()
        .map(|v| v.to_f64().unwrap_or_default())
        .collect();

    let size = src.size();
    let strides = src.strides();
    let spacing = src.spacing();

    for axis in 0..N {
        let len = size[axis];
        if len < 2 {
            continue;
        }
        let stride = strides[axis];
        let step = if use_image_spacing { spacing[axis] } else { 1.0 };
        let width = 4.0 * scale.as_slice()[axis];

        // a block holds `stride` interleaved lines of `len` samples
        for_each_chunk(&mut work, len * stride, strategy, |_, block| {
            let mut envelope = Envelope::new(len);
            let mut line = vec![0.0; len];
            let mut out = vec![0.0; len];
            for first in 0..stride {
                for (k, v) in line.iter_mut().enumerate() {
                    *v = block[first + k * stride];
                }
                envelope.dilate(&line, step, width, &mut out);
                for (k, &v) in out.iter().enumerate() {
                    block[first + k * stride] = v;
                }
            }
        })?;
    }

    dst.as_slice_mut()
        .iter_mut()
        .zip(work.iter().zip(src.as_slice()))
        .for_each(|(d, (&w, &s))| *d = num_traits::cast(w).unwrap_or(s));

    Ok(())
}

/// Scratch buffers of the upper envelope computation for one line.
struct Envelope {
    /// Samples whose parabolas form the envelope, left to right.
    roots: Vec<usize>,
    /// `bounds[j]..bounds[j + 1]` is the range where `roots[j]` dominates.
    bounds: Vec<f64>,
}

impl Envelope {
    fn new(len: usize) -> Self {
        Self {
            roots: vec![0; len],
            bounds: vec![0.0; len + 1],
        }
    }

    /// `out[x] = max_k (f[k] - (p_x - p_k)^2 / width)` with `p_k = k * step`.
    ///
    /// Samples at `-inf` or NaN never dominate and are left out of the envelope; a
    /// `+inf` sample dominates the whole line.
    fn dilate(&mut self, f: &[f64], step: f64, width: f64, out: &mut [f64]) {
        if f.iter().any(|&v| v == f64::INFINITY) {
            out.fill(f64::INFINITY);
            return;
        }

        let pos = |k: usize| k as f64 * step;
        // finite for every finite sample, even at -f64::MAX
        let key = |k: usize| pos(k) * pos(k) / width - f[k];

        let roots = &mut self.roots;
        let bounds = &mut self.bounds;
        let mut count = 0;

        for q in (0..f.len()).filter(|&q| f[q].is_finite()) {
            if count == 0 {
                roots[0] = q;
                bounds[0] = f64::NEG_INFINITY;
                bounds[1] = f64::INFINITY;
                count = 1;
                continue;
            }
            // keys are finite, so `s` may be infinite but never NaN
            let mut s;
            loop {
                let r = roots[count - 1];
                s = (key(q) - key(r)) * width / (2.0 * (pos(q) - pos(r)));
                if count > 1 && s <= bounds[count - 1] {
                    count -= 1;
                } else {
                    break;
                }
            }
            roots[count] = q;
            bounds[count] = s;
            bounds[count + 1] = f64::INFINITY;
            count += 1;
        }

        if count == 0 {
            out.fill(f64::NEG_INFINITY);
            return;
        }

        let mut j = 0;
        for (x, o) in out.iter_mut().enumerate() {
            let p = pos(x);
            while bounds[j + 1] < p {
                j += 1;
            }
            let r = roots[j];
            let d = p - pos(r);
            *o = f[r] - d * d / width;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dilate::dilate_parabolic_image;
    use approx::assert_relative_eq;
    use ndmorph_image::ImageGeometry;

    /// O(n^2) reference of the 1-D envelope.
    fn brute_force(f: &[f64], step: f64, width: f64) -> Vec<f64> {
        (0..f.len())
            .map(|x| {
                f.iter()
                    .enumerate()
                    .map(|(k, &v)| {
                        let d = (x as f64 - k as f64) * step;
                        v - d * d / width
                    })
                    .fold(f64::NEG_INFINITY, f64::max)
            })
            .collect()
    }

    #[test]
    fn test_scale_from_radius() {
        let scale = ParabolaScale::from_radius(&RadiusVector::from([1, 2, 3]));
        assert_eq!(scale.as_slice(), &[1.5, 3.0, 5.5]);
    }

    #[test]
    fn test_scale_invalid() {
        assert_eq!(
            ParabolaScale::new(vec![1.0, 0.0]),
            Err(MorphologyError::InvalidScale {
                axis: 1,
                value: 0.0
            })
        );
        assert!(ParabolaScale::new(vec![f64::NAN]).is_err());
        assert!(ParabolaScale::new(vec![2.0, 0.5]).is_ok());
    }

    #[test]
    fn test_envelope_matches_brute_force() {
        let lines: [&[f64]; 4] = [
            &[0.0, 0.0, 0.0, 5.0, 0.0, 0.0, 0.0, 0.0, 0.0],
            &[3.0, -1.0, 4.0, 1.0, -5.0, 9.0, 2.0, 6.0],
            &[7.0, 7.0, 7.0, 7.0],
            &[1.0, 100.0, 1.0, 1.0, 50.0, 1.0, 1.0, 1.0, 1.0, 80.0],
        ];
        for line in lines {
            for (step, width) in [(1.0, 6.0), (1.0, 4.0), (0.5, 38.0), (2.0, 1.0)] {
                let mut envelope = Envelope::new(line.len());
                let mut out = vec![0.0; line.len()];
                envelope.dilate(line, step, width, &mut out);
                let expected = brute_force(line, step, width);
                for (a, b) in out.iter().zip(expected.iter()) {
                    assert_relative_eq!(a, b, epsilon = 1e-9);
                }
            }
        }
    }

    #[test]
    fn test_envelope_extreme_samples() {
        let lowest = f64::MIN;
        let lines: [&[f64]; 9] = [
            &[lowest, lowest, 5.0],
            &[f64::NEG_INFINITY, f64::NEG_INFINITY, 5.0],
            &[lowest, lowest / 5.0, lowest],
            &[f64::MAX, lowest, 0.0, lowest, f64::MAX],
            &[lowest, f64::MAX, lowest, -3.0, f64::NEG_INFINITY],
            &[f64::NEG_INFINITY, 2.0, f64::NEG_INFINITY, lowest, 7.0],
            &[f64::NEG_INFINITY; 4],
            &[1.0, f64::INFINITY, f64::NEG_INFINITY, 2.0],
            &[lowest; 3],
        ];
        for line in lines {
            for (step, width) in [(1.0, 6.0), (0.5, 38.0), (2.0, 1.0)] {
                let mut envelope = Envelope::new(line.len());
                let mut out = vec![0.0; line.len()];
                envelope.dilate(line, step, width, &mut out);
                let expected = brute_force(line, step, width);
                for (a, b) in out.iter().zip(expected.iter()) {
                    assert_relative_eq!(a, b, epsilon = 1e-9);
                }
            }
        }
    }

    #[test]
    fn test_dilate_parabolic_lowest_neighbours() -> Result<(), MorphologyError> {
        let src = Image::<f64, 1>::new(
            ImageGeometry::from_size([3]),
            vec![f64::lowest(), f64::lowest(), 5.0],
        )?;
        let dst = dilate_parabolic_image(&src, &RadiusVector::from([1]), false, ExecutionStrategy::Serial)?;
        assert_eq!(dst.as_slice(), &[5.0 - 4.0 / 6.0, 5.0 - 1.0 / 6.0, 5.0]);

        #[rustfmt::skip]
        let src = Image::<f32, 2>::new(
            ImageGeometry::from_size([2, 3]),
            vec![
                f32::NEG_INFINITY, f32::NEG_INFINITY, 5.0,
                f32::NEG_INFINITY, f32::NEG_INFINITY, f32::NEG_INFINITY,
            ],
        )?;
        let dst = dilate_parabolic_image(&src, &RadiusVector::from([1, 1]), false, ExecutionStrategy::Serial)?;
        for (y, x) in [(0, 0), (0, 1), (0, 2), (1, 0), (1, 1), (1, 2)] {
            let dy = y as f32;
            let dx = x as f32 - 2.0;
            let expected = 5.0 - dy * dy / 6.0 - dx * dx / 6.0;
            let got = dst.get([y, x]).copied().unwrap_or(f32::NAN);
            assert_relative_eq!(got, expected, epsilon = 1e-5);
        }

        // the result never drops below the input
        let src = Image::<f64, 1>::new(
            ImageGeometry::from_size([6]),
            vec![f64::MAX, f64::lowest(), 0.0, f64::NEG_INFINITY, f64::lowest(), -1.0],
        )?;
        let dst = dilate_parabolic_image(&src, &RadiusVector::from([2]), false, ExecutionStrategy::Serial)?;
        assert!(src.as_slice().iter().zip(dst.as_slice()).all(|(a, b)| a <= b));
        Ok(())
    }

    #[test]
    fn test_dilate_parabolic_line() -> Result<(), MorphologyError> {
        let src = Image::<f64, 1>::new(
            ImageGeometry::from_size([9]),
            vec![0.0, 0.0, 0.0, 5.0, 0.0, 0.0, 0.0, 0.0, 0.0],
        )?;
        let mut dst = Image::<f64, 1>::from_size_val([9], 0.0)?;
        let scale = ParabolaScale::from_radius(&RadiusVector::from([1]));
        dilate_parabolic(&src, &mut dst, &scale, false, ExecutionStrategy::Serial)?;

        for (x, &v) in dst.as_slice().iter().enumerate() {
            let d = x as f64 - 3.0;
            let expected = (5.0 - d * d / 6.0).max(0.0);
            assert_relative_eq!(v, expected, epsilon = 1e-12);
        }
        assert_eq!(dst.as_slice()[3], 5.0);
        Ok(())
    }

    #[test]
    fn test_dilate_parabolic_integer_truncates() -> Result<(), MorphologyError> {
        let src = Image::<u8, 1>::new(ImageGeometry::from_size([5]), vec![0, 0, 60, 0, 0])?;
        let mut dst = Image::<u8, 1>::from_size_val([5], 0)?;
        let scale = ParabolaScale::new(vec![1.0])?;
        dilate_parabolic(&src, &mut dst, &scale, false, ExecutionStrategy::Serial)?;
        // 60 - 1/4 = 59.75, 60 - 4/4 = 59
        assert_eq!(dst.as_slice(), &[59, 59, 60, 59, 59]);
        Ok(())
    }

    #[test]
    fn test_dilate_parabolic_separable() -> Result<(), MorphologyError> {
        let mut src = Image::<f32, 2>::from_size_val([5, 7], 0.0)?;
        if let Some(px) = src.get_mut([2, 3]) {
            *px = 10.0;
        }
        let mut dst = Image::<f32, 2>::from_size_val([5, 7], 0.0)?;
        let scale = ParabolaScale::new(vec![2.0, 3.0])?;
        dilate_parabolic(&src, &mut dst, &scale, false, ExecutionStrategy::ParallelLines)?;

        for y in 0..5 {
            for x in 0..7 {
                let dy = y as f32 - 2.0;
                let dx = x as f32 - 3.0;
                let expected = (10.0 - dy * dy / 8.0 - dx * dx / 12.0).max(0.0);
                let got = dst.get([y, x]).copied().unwrap_or(f32::NAN);
                assert_relative_eq!(got, expected, epsilon = 1e-5);
            }
        }
        Ok(())
    }

    #[test]
    fn test_dilate_parabolic_image_spacing() -> Result<(), MorphologyError> {
        let geometry = ImageGeometry::from_size([5]).with_spacing([2.0]);
        let src = Image::<f64, 1>::new(geometry, vec![0.0, 0.0, 8.0, 0.0, 0.0])?;
        let mut dst = Image::<f64, 1>::from_geometry_val(geometry, 0.0)?;
        let scale = ParabolaScale::new(vec![1.0])?;

        dilate_parabolic(&src, &mut dst, &scale, true, ExecutionStrategy::Serial)?;
        assert_eq!(dst.as_slice(), &[4.0, 7.0, 8.0, 7.0, 4.0]);

        dilate_parabolic(&src, &mut dst, &scale, false, ExecutionStrategy::Serial)?;
        assert_eq!(dst.as_slice(), &[7.0, 7.75, 8.0, 7.75, 7.0]);
        Ok(())
    }

    #[test]
    fn test_dilate_parabolic_scale_mismatch() -> Result<(), MorphologyError> {
        let src = Image::<f32, 2>::from_size_val([3, 3], 0.0)?;
        let mut dst = src.clone();
        let scale = ParabolaScale::new(vec![1.0])?;
        let res = dilate_parabolic(&src, &mut dst, &scale, false, ExecutionStrategy::Serial);
        assert_eq!(
            res,
            Err(MorphologyError::DimensionMismatch {
                image: 2,
                radius: 1
            })
        );
        Ok(())
    }
}
