//! Sobel first-derivative operator.

use super::{correlate1d, Axis, Border};
use crate::plane::Plane;

const DERIVATIVE: [f64; 3] = [-1.0, 0.0, 1.0];
const SMOOTHING: [f64; 3] = [1.0, 2.0, 1.0];

/// Sobel derivative along `axis`, smoothed across the other axis.
pub fn sobel(plane: &Plane, axis: Axis) -> Plane {
    match axis {
        Axis::Horizontal => {
            let d = correlate1d(plane, &DERIVATIVE, Axis::Horizontal, Border::Symmetric);
            correlate1d(&d, &SMOOTHING, Axis::Vertical, Border::Symmetric)
        }
        Axis::Vertical => {
            let d = correlate1d(plane, &DERIVATIVE, Axis::Vertical, Border::Symmetric);
            correlate1d(&d, &SMOOTHING, Axis::Horizontal, Border::Symmetric)
        }
    }
}

/// `sqrt(dx^2 + dy^2)` of the two Sobel derivatives.
pub fn gradient_magnitude(plane: &Plane) -> Plane {
    let dx = sobel(plane, Axis::Horizontal);
    let dy = sobel(plane, Axis::Vertical);
    dx.zip_map(&dy, |gx, gy| (gx * gx + gy * gy).sqrt())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flat_plane_has_no_gradient() {
        let out = gradient_magnitude(&Plane::filled(6, 6, 80.0));
        assert!(out.as_slice().iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_vertical_step_edge() {
        let plane = Plane::from_fn(8, 5, |_, x| if x >= 4 { 10.0 } else { 0.0 });
        let dx = sobel(&plane, Axis::Horizontal);
        let dy = sobel(&plane, Axis::Vertical);
        // Columns 3 and 4 straddle the edge: 10 * (1 + 2 + 1)
        assert_eq!(dx.get(2, 3), 40.0);
        assert_eq!(dx.get(2, 4), 40.0);
        assert_eq!(dx.get(2, 0), 0.0);
        assert!(dy.as_slice().iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_magnitude_peaks_on_edge() {
        let plane = Plane::from_fn(8, 8, |y, _| if y >= 4 { 50.0 } else { 0.0 });
        let mag = gradient_magnitude(&plane);
        assert!(mag.get(3, 3) > mag.get(0, 3));
        assert!(mag.get(4, 3) > mag.get(7, 3));
    }
}
