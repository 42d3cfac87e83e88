//! Separable spline resampling.
//!
//! Coordinates are corner-aligned: the first and last output samples sit
//! exactly on the first and last input samples. Taps that fall outside
//! the input are clamped to the edge, and weights are renormalized per
//! output sample so constant images stay constant.

use std::f64::consts::PI;

use crate::filter::{Axis, Border};
use crate::plane::Plane;

/// Interpolation kernel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kernel {
    /// Keys cubic convolution, `a = -0.5`
    Cubic,
    /// Windowed sinc with three lobes
    Lanczos3,
}

impl Kernel {
    /// Half-width of the kernel support in input samples.
    pub fn radius(self) -> usize {
        match self {
            Kernel::Cubic => 2,
            Kernel::Lanczos3 => 3,
        }
    }

    pub fn weight(self, x: f64) -> f64 {
        match self {
            Kernel::Cubic => keys_cubic(x),
            Kernel::Lanczos3 => lanczos(x, 3.0),
        }
    }
}

fn keys_cubic(x: f64) -> f64 {
    const A: f64 = -0.5;
    let x = x.abs();
    if x < 1.0 {
        ((A + 2.0) * x - (A + 3.0)) * x * x + 1.0
    } else if x < 2.0 {
        ((A * x - 5.0 * A) * x + 8.0 * A) * x - 4.0 * A
    } else {
        0.0
    }
}

fn sinc(x: f64) -> f64 {
    if x.abs() < 1e-12 {
        1.0
    } else {
        let px = PI * x;
        px.sin() / px
    }
}

fn lanczos(x: f64, lobes: f64) -> f64 {
    if x.abs() < lobes {
        sinc(x) * sinc(x / lobes)
    } else {
        0.0
    }
}

/// `round(len * factor)`, never below one sample.
pub fn scaled_len(len: usize, factor: f64) -> usize {
    ((len as f64 * factor).round() as usize).max(1)
}

/// Resample `plane` to `width x height`.
pub fn resize(plane: &Plane, width: usize, height: usize, kernel: Kernel) -> Plane {
    if plane.is_empty() || (plane.width(), plane.height()) == (width, height) {
        return plane.clone();
    }
    let rows = resample_axis(plane, width, Axis::Horizontal, kernel);
    resample_axis(&rows, height, Axis::Vertical, kernel)
}

/// Per-output-sample taps: `(first input index, weights)` before clamping.
fn taps(in_len: usize, out_len: usize, kernel: Kernel) -> Vec<(isize, Vec<f64>)> {
    let step = if out_len > 1 {
        (in_len - 1) as f64 / (out_len - 1) as f64
    } else {
        0.0
    };
    let radius = kernel.radius() as isize;
    (0..out_len)
        .map(|o| {
            let pos = o as f64 * step;
            let base = pos.floor() as isize;
            let first = base - radius + 1;
            let mut weights: Vec<f64> = (first..=base + radius)
                .map(|i| kernel.weight(pos - i as f64))
                .collect();
            let sum: f64 = weights.iter().sum();
            for w in &mut weights {
                *w /= sum;
            }
            (first, weights)
        })
        .collect()
}

fn resample_axis(plane: &Plane, out_len: usize, axis: Axis, kernel: Kernel) -> Plane {
    let (height, width) = plane.shape();
    let in_len = match axis {
        Axis::Horizontal => width,
        Axis::Vertical => height,
    };
    if in_len == out_len {
        return plane.clone();
    }
    let taps = taps(in_len, out_len, kernel);

    match axis {
        Axis::Horizontal => Plane::from_fn(out_len, height, |y, x| {
            let row = plane.row(y);
            let (first, weights) = &taps[x];
            weights
                .iter()
                .enumerate()
                .map(|(k, w)| w * row[Border::Clamp.resolve(first + k as isize, in_len)])
                .sum()
        }),
        Axis::Vertical => Plane::from_fn(width, out_len, |y, x| {
            let (first, weights) = &taps[y];
            weights
                .iter()
                .enumerate()
                .map(|(k, w)| w * plane.get(Border::Clamp.resolve(first + k as isize, in_len), x))
                .sum()
        }),
    }
}
