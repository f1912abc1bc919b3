use ndmorph_image::get_strides_from_shape;

use crate::error::MorphologyError;

/// Half extent of a structuring element along each axis.
///
/// # Examples
///
/// ```
/// use ndmorph_morphology::RadiusVector;
///
/// let radius = RadiusVector::new(&[2, 0, 1]).unwrap();
/// assert_eq!(radius.as_slice(), &[2, 0, 1]);
///
/// assert!(RadiusVector::new(&[1, -1]).is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RadiusVector(Vec<usize>);

impl RadiusVector {
    /// Create a radius vector from signed components.
    ///
    /// # Errors
    ///
    /// Returns [`MorphologyError::InvalidRadius`] if any component is negative.
    pub fn new(components: &[i64]) -> Result<Self, MorphologyError> {
        let radius = components
            .iter()
            .map(|&r| usize::try_from(r).ok())
            .collect::<Option<Vec<usize>>>()
            .ok_or_else(|| MorphologyError::InvalidRadius {
                radius: components.to_vec(),
                reason: "components must be non-negative".to_string(),
            })?;
        Ok(Self(radius))
    }

    /// Create a radius vector with the same radius along `ndim` axes.
    pub fn uniform(radius: usize, ndim: usize) -> Self {
        Self(vec![radius; ndim])
    }

    /// Number of components.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the vector has no components.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The components as a slice.
    pub fn as_slice(&self) -> &[usize] {
        &self.0
    }

    /// Whether every component is zero.
    pub fn is_zero(&self) -> bool {
        self.0.iter().all(|&r| r == 0)
    }

    fn to_signed(&self) -> Vec<i64> {
        self.0
            .iter()
            .map(|&r| i64::try_from(r).unwrap_or(i64::MAX))
            .collect()
    }
}

impl<const N: usize> From<[usize; N]> for RadiusVector {
    fn from(radius: [usize; N]) -> Self {
        Self(radius.to_vec())
    }
}

impl From<Vec<usize>> for RadiusVector {
    fn from(radius: Vec<usize>) -> Self {
        Self(radius)
    }
}

/// A flat N-dimensional ball (ellipsoid) structuring element.
///
/// The element is a boolean mask over the offsets `[-r_i, r_i]` of each axis. An
/// offset `o` is active iff `sum_i (o_i / r_i)^2 <= 1`; an axis with zero radius only
/// admits `o_i == 0`. The mask is symmetric under negation and always contains the
/// zero offset.
#[derive(Debug, Clone, PartialEq)]
pub struct StructuringElement<const N: usize> {
    radius: [usize; N],
    shape: [usize; N],
    mask: Vec<bool>,
    offsets: Vec<[isize; N]>,
}

impl<const N: usize> StructuringElement<N> {
    /// Build the ball element for the given radius.
    ///
    /// # Errors
    ///
    /// Returns [`MorphologyError::InvalidRadius`] if the radius does not have exactly
    /// `N` components, or if its bounding box cannot be represented in memory.
    ///
    /// # Examples
    ///
    /// ```
    /// use ndmorph_morphology::{RadiusVector, StructuringElement};
    ///
    /// let element = StructuringElement::<2>::ball(&RadiusVector::from([1, 1])).unwrap();
    ///
    /// assert_eq!(element.len(), 5);
    /// assert!(element.contains([0, 1]));
    /// assert!(!element.contains([1, 1]));
    /// ```
    pub fn ball(radius: &RadiusVector) -> Result<Self, MorphologyError> {
        let radius: [usize; N] =
            radius
                .as_slice()
                .try_into()
                .map_err(|_| MorphologyError::InvalidRadius {
                    radius: radius.to_signed(),
                    reason: format!("expected {} components", N),
                })?;

        let too_large = || MorphologyError::InvalidRadius {
            radius: radius.iter().map(|&r| i64::try_from(r).unwrap_or(i64::MAX)).collect(),
            reason: "bounding box is too large".to_string(),
        };

        let mut shape = [0; N];
        for (s, &r) in shape.iter_mut().zip(radius.iter()) {
            *s = r
                .checked_mul(2)
                .and_then(|d| d.checked_add(1))
                .ok_or_else(too_large)?;
        }
        let strides = get_strides_from_shape(shape);
        let numel = shape
            .iter()
            .try_fold(1usize, |acc, &s| acc.checked_mul(s))
            .ok_or_else(too_large)?;

        let mut mask = Vec::new();
        mask.try_reserve_exact(numel).map_err(|_| too_large())?;
        mask.resize(numel, false);
        let mut offsets = Vec::new();
        for (linear, active) in mask.iter_mut().enumerate() {
            let mut offset = [0isize; N];
            let mut rem = linear;
            for i in 0..N {
                offset[i] = (rem / strides[i]) as isize - radius[i] as isize;
                rem %= strides[i];
            }
            if in_ball(&offset, &radius) {
                *active = true;
                offsets.push(offset);
            }
        }

        Ok(Self {
            radius,
            shape,
            mask,
            offsets,
        })
    }

    /// The radius along each axis.
    pub fn radius(&self) -> [usize; N] {
        self.radius
    }

    /// The size of the bounding box along each axis (`2 r_i + 1`).
    pub fn shape(&self) -> [usize; N] {
        self.shape
    }

    /// The mask over the bounding box in row-major order.
    pub fn mask(&self) -> &[bool] {
        &self.mask
    }

    /// The active offsets in lexicographic order.
    pub fn offsets(&self) -> &[[isize; N]] {
        &self.offsets
    }

    /// Number of active offsets.
    pub fn len(&self) -> usize {
        self.offsets.len()
    }

    /// Whether the element has no active offsets. Never true for a ball.
    pub fn is_empty(&self) -> bool {
        self.offsets.is_empty()
    }

    /// Whether the given offset is part of the element.
    pub fn contains(&self, offset: [isize; N]) -> bool {
        let mut linear = 0;
        let strides = get_strides_from_shape(self.shape);
        for i in 0..N {
            let r = self.radius[i] as isize;
            if offset[i] < -r || offset[i] > r {
                return false;
            }
            linear += (offset[i] + r) as usize * strides[i];
        }
        self.mask[linear]
    }
}

/// Exact ellipsoid test `sum_i (o_i / r_i)^2 <= 1`, evaluated on integers as
/// `sum_i o_i^2 * prod_{j != i} r_j^2 <= prod_j r_j^2` over the non-degenerate axes.
fn in_ball<const N: usize>(offset: &[isize; N], radius: &[usize; N]) -> bool {
    if offset
        .iter()
        .zip(radius.iter())
        .any(|(&o, &r)| r == 0 && o != 0)
    {
        return false;
    }

    match in_ball_exact(offset, radius) {
        Some(inside) => inside,
        None => {
            let sum: f64 = offset
                .iter()
                .zip(radius.iter())
                .filter(|(_, &r)| r > 0)
                .map(|(&o, &r)| {
                    let t = o as f64 / r as f64;
                    t * t
                })
                .sum();
            sum <= 1.0
        }
    }
}

/// Returns `None` if the integer evaluation overflows.
fn in_ball_exact<const N: usize>(offset: &[isize; N], radius: &[usize; N]) -> Option<bool> {
    let squares: Vec<(u128, u128)> = offset
        .iter()
        .zip(radius.iter())
        .filter(|(_, &r)| r > 0)
        .map(|(&o, &r)| {
            let o = o.unsigned_abs() as u128;
            let r = r as u128;
            (o * o, r * r)
        })
        .collect();

    let denominator = squares
        .iter()
        .try_fold(1u128, |acc, &(_, r2)| acc.checked_mul(r2))?;

    let mut numerator = 0u128;
    for &(o2, r2) in &squares {
        // denominator is a product that includes r2, so the division is exact
        let term = o2.checked_mul(denominator / r2)?;
        numerator = numerator.checked_add(term)?;
    }
    Some(numerator <= denominator)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render<const N: usize>(element: &StructuringElement<N>) -> String {
        let cols = element.shape()[N - 1];
        element
            .mask()
            .chunks(cols)
            .map(|row| {
                row.iter()
                    .map(|&v| if v { '1' } else { '0' })
                    .collect::<String>()
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn test_ball_radius_one() -> Result<(), MorphologyError> {
        let element = StructuringElement::<2>::ball(&RadiusVector::from([1, 1]))?;
        assert_eq!(element.shape(), [3, 3]);
        assert_eq!(render(&element), "010\n111\n010");
        assert_eq!(
            element.offsets(),
            &[[-1, 0], [0, -1], [0, 0], [0, 1], [1, 0]]
        );
        Ok(())
    }

    #[test]
    fn test_ball_radius_two() -> Result<(), MorphologyError> {
        let element = StructuringElement::<2>::ball(&RadiusVector::from([2, 2]))?;
        assert_eq!(
            render(&element),
            "00100\n01110\n11111\n01110\n00100"
        );
        assert_eq!(element.len(), 13);
        Ok(())
    }

    #[test]
    fn test_ball_exact_boundary() -> Result<(), MorphologyError> {
        // 3-4-5 triangle lies exactly on the circle of radius 5
        let element = StructuringElement::<2>::ball(&RadiusVector::from([5, 5]))?;
        assert!(element.contains([3, 4]));
        assert!(element.contains([-4, 3]));
        assert!(!element.contains([4, 4]));
        Ok(())
    }

    #[test]
    fn test_ball_anisotropic() -> Result<(), MorphologyError> {
        let element = StructuringElement::<2>::ball(&RadiusVector::from([1, 3]))?;
        assert_eq!(element.shape(), [3, 7]);
        assert_eq!(render(&element), "0001000\n1111111\n0001000");
        Ok(())
    }

    #[test]
    fn test_ball_degenerate_axis() -> Result<(), MorphologyError> {
        let element = StructuringElement::<3>::ball(&RadiusVector::from([0, 2, 1]))?;
        assert_eq!(element.shape(), [1, 5, 3]);
        assert!(element.offsets().iter().all(|o| o[0] == 0));
        assert!(element.contains([0, 2, 0]));
        assert!(!element.contains([0, 2, 1]));
        assert!(!element.contains([1, 0, 0]));
        Ok(())
    }

    #[test]
    fn test_ball_too_large() {
        for radius in [[usize::MAX, 1], [usize::MAX / 4, usize::MAX / 4]] {
            let res = StructuringElement::<2>::ball(&RadiusVector::from(radius));
            assert!(matches!(
                res,
                Err(MorphologyError::InvalidRadius { reason, .. }) if reason == "bounding box is too large"
            ));
        }
    }

    #[test]
    fn test_ball_zero_radius() -> Result<(), MorphologyError> {
        let element = StructuringElement::<3>::ball(&RadiusVector::from([0, 0, 0]))?;
        assert_eq!(element.offsets(), &[[0, 0, 0]]);
        assert!(!element.is_empty());
        Ok(())
    }

    #[test]
    fn test_ball_symmetric() -> Result<(), MorphologyError> {
        for radius in [[0, 3, 1], [2, 2, 2], [1, 4, 3], [3, 0, 5]] {
            let element = StructuringElement::<3>::ball(&RadiusVector::from(radius))?;
            for o in element.offsets() {
                assert!(element.contains([-o[0], -o[1], -o[2]]), "{o:?} in {radius:?}");
            }
        }
        Ok(())
    }

    #[test]
    fn test_ball_wrong_dimensionality() {
        let res = StructuringElement::<3>::ball(&RadiusVector::from([1, 1]));
        assert!(matches!(res, Err(MorphologyError::InvalidRadius { .. })));
    }

    #[test]
    fn test_radius_negative() {
        let res = RadiusVector::new(&[2, -1, 0]);
        assert_eq!(
            res,
            Err(MorphologyError::InvalidRadius {
                radius: vec![2, -1, 0],
                reason: "components must be non-negative".to_string(),
            })
        );
    }

    #[test]
    fn test_radius_uniform() {
        let radius = RadiusVector::uniform(3, 2);
        assert_eq!(radius.as_slice(), &[3, 3]);
        assert!(!radius.is_zero());
        assert!(RadiusVector::uniform(0, 4).is_zero());
    }
}
