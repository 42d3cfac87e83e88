//! Linear filtering primitives.
//!
//! Every filter in the crate is separable, so the building block is a
//! single 1-D correlation along one axis with an explicit border rule:
//!
//! ```text
//! Symmetric   d c b a | a b c d | d c b a   (edge sample repeated)
//! Mirror        d c b | a b c d | c b a     (edge sample not repeated)
//! Clamp       a a a a | a b c d | d d d d
//! ```
//!
//! Smoothing and derivative filters use [`Border::Symmetric`]; the PPID
//! correction window uses [`Border::Mirror`]; resampling uses
//! [`Border::Clamp`].

mod box_filter;
mod gaussian;
mod guided;
mod sobel;

pub use box_filter::{box_filter, Window};
pub use gaussian::{gaussian_filter, gaussian_kernel, lowpass_5x5};
pub use guided::{guided_filter, GuidedFilterParams};
pub use sobel::{gradient_magnitude, sobel};

use crate::plane::Plane;

/// Image axis a 1-D operation runs along.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    /// Along a row (varying x)
    Horizontal,
    /// Along a column (varying y)
    Vertical,
}

/// Rule for sampling outside the image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Border {
    /// Half-sample symmetric reflection; the edge sample is repeated.
    Symmetric,
    /// Whole-sample reflection; the edge sample is not repeated.
    Mirror,
    /// Replicate the nearest edge sample.
    Clamp,
}

impl Border {
    /// Map a possibly out-of-range index onto `0..len`.
    #[inline]
    pub fn resolve(self, index: isize, len: usize) -> usize {
        debug_assert!(len > 0);
        let n = len as isize;
        if (0..n).contains(&index) {
            return index as usize;
        }
        match self {
            Border::Clamp => index.clamp(0, n - 1) as usize,
            Border::Symmetric => {
                let period = 2 * n;
                let i = index.rem_euclid(period);
                if i < n {
                    i as usize
                } else {
                    (period - 1 - i) as usize
                }
            }
            Border::Mirror => {
                if n == 1 {
                    return 0;
                }
                let period = 2 * n - 2;
                let i = index.rem_euclid(period);
                if i < n {
                    i as usize
                } else {
                    (period - i) as usize
                }
            }
        }
    }
}

/// Correlate every row (or column) of `plane` with an odd-length kernel
/// centred on its middle tap.
pub fn correlate1d(plane: &Plane, kernel: &[f64], axis: Axis, border: Border) -> Plane {
    debug_assert!(kernel.len() % 2 == 1, "kernel length must be odd");
    let (height, width) = plane.shape();
    if plane.is_empty() {
        return plane.clone();
    }
    let half = (kernel.len() / 2) as isize;
    let src = plane.as_slice();
    let mut out = vec![0.0; width * height];

    match axis {
        Axis::Horizontal => {
            for y in 0..height {
                let row = &src[y * width..(y + 1) * width];
                for x in 0..width {
                    let mut acc = 0.0;
                    for (k, &w) in kernel.iter().enumerate() {
                        let xi = border.resolve(x as isize + k as isize - half, width);
                        acc += w * row[xi];
                    }
                    out[y * width + x] = acc;
                }
            }
        }
        Axis::Vertical => {
            for y in 0..height {
                for (k, &w) in kernel.iter().enumerate() {
                    let yi = border.resolve(y as isize + k as isize - half, height);
                    let row = &src[yi * width..(yi + 1) * width];
                    let dst = &mut out[y * width..(y + 1) * width];
                    for (d, &s) in dst.iter_mut().zip(row) {
                        *d += w * s;
                    }
                }
            }
        }
    }

    Plane::from_parts(out, width, height)
}

/// Apply `horizontal` along rows, then `vertical` along columns.
pub fn separable(plane: &Plane, horizontal: &[f64], vertical: &[f64], border: Border) -> Plane {
    let rows = correlate1d(plane, horizontal, Axis::Horizontal, border);
    correlate1d(&rows, vertical, Axis::Vertical, border)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_symmetric_border_repeats_edge() {
        let resolved: Vec<usize> = (-3..7).map(|i| Border::Symmetric.resolve(i, 4)).collect();
        assert_eq!(resolved, vec![2, 1, 0, 0, 1, 2, 3, 3, 2, 1]);
    }

    #[test]
    fn test_mirror_border_skips_edge() {
        let resolved: Vec<usize> = (-3..7).map(|i| Border::Mirror.resolve(i, 4)).collect();
        assert_eq!(resolved, vec![3, 2, 1, 0, 1, 2, 3, 2, 1, 0]);
    }

    #[test]
    fn test_mirror_border_single_sample() {
        assert_eq!(Border::Mirror.resolve(-5, 1), 0);
        assert_eq!(Border::Mirror.resolve(3, 1), 0);
    }

    #[test]
    fn test_clamp_border() {
        assert_eq!(Border::Clamp.resolve(-2, 5), 0);
        assert_eq!(Border::Clamp.resolve(9, 5), 4);
    }

    #[test]
    fn test_correlate_identity_kernel() {
        let plane = Plane::from_fn(5, 4, |y, x| (y * 5 + x) as f64);
        let out = correlate1d(&plane, &[0.0, 1.0, 0.0], Axis::Vertical, Border::Symmetric);
        assert_eq!(out, plane);
    }

    #[test]
    fn test_correlate_is_not_flipped() {
        // A shift kernel picks the right neighbour; a convolution would pick the left.
        let plane = Plane::from_fn(4, 1, |_, x| x as f64);
        let out = correlate1d(&plane, &[0.0, 0.0, 1.0], Axis::Horizontal, Border::Clamp);
        assert_eq!(out.as_slice(), &[1.0, 2.0, 3.0, 3.0]);
    }
}
