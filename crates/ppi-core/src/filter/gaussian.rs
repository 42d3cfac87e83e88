//! Gaussian smoothing and the fixed 5x5 IGFPPI low-pass kernel.

use super::{separable, Border};
use crate::plane::Plane;

/// Kernel support in standard deviations.
const TRUNCATE: f64 = 4.0;

/// Sampled, normalized 1-D Gaussian with radius `round(4 * sigma)`.
pub fn gaussian_kernel(sigma: f64) -> Vec<f64> {
    let radius = (TRUNCATE * sigma + 0.5) as isize;
    let denom = 2.0 * sigma * sigma;
    let mut kernel: Vec<f64> = (-radius..=radius)
        .map(|x| (-((x * x) as f64) / denom).exp())
        .collect();
    let sum: f64 = kernel.iter().sum();
    for w in &mut kernel {
        *w /= sum;
    }
    kernel
}

/// Separable Gaussian blur with symmetric borders.
///
/// A non-positive `sigma` returns the input unchanged.
pub fn gaussian_filter(plane: &Plane, sigma: f64) -> Plane {
    if sigma <= f64::EPSILON {
        return plane.clone();
    }
    let kernel = gaussian_kernel(sigma);
    separable(plane, &kernel, &kernel, Border::Symmetric)
}

/// Low-pass seed filter for IGFPPI.
///
/// ```text
///          | 1 2 2 2 1 |
///          | 2 4 4 4 2 |
/// 1/64  *  | 2 4 4 4 2 |
///          | 2 4 4 4 2 |
///          | 1 2 2 2 1 |
/// ```
///
/// The kernel is the outer product of `[1, 2, 2, 2, 1] / 8` with itself.
pub fn lowpass_5x5(plane: &Plane) -> Plane {
    const TAPS: [f64; 5] = [1.0 / 8.0, 2.0 / 8.0, 2.0 / 8.0, 2.0 / 8.0, 1.0 / 8.0];
    separable(plane, &TAPS, &TAPS, Border::Symmetric)
}
