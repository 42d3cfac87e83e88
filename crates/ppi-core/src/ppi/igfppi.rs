//! IGFPPI: iterative guided filtering in two elongated windows.
//!
//! The simple PPI is the guide for every pass. Starting from a 5x5
//! low-pass seed, the guided filter is re-applied to its own output until
//! the result settles. This runs twice, once with a horizontal window and
//! once with a vertical one, and the two results are blended per pixel
//! according to how stable each direction ended up.

use serde::{Deserialize, Serialize};

use super::options::IgfppiOptions;
use crate::filter::{guided_filter, lowpass_5x5, Window};
use crate::plane::Plane;

/// Lower bound on the instability metric before it is inverted.
const MIN_INSTABILITY: f64 = 1e-10;

/// Fraction of pixels that must be stable for early termination.
const STABLE_FRACTION: f64 = 0.99;

/// Iterations used by each refinement direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IterationReport {
    pub horizontal: usize,
    pub vertical: usize,
}

/// Result of one directional refinement.
#[derive(Debug, Clone)]
struct Refinement {
    plane: Plane,
    /// Per-pixel `|new - previous| * |new - current|` of the last iteration
    instability: Plane,
    iterations: usize,
}

pub(crate) fn igfppi(simple: &Plane, options: &IgfppiOptions) -> (Plane, IterationReport) {
    let seed = lowpass_5x5(simple);

    let horizontal = refine(simple, &seed, Window::HORIZONTAL, options);
    let vertical = refine(simple, &seed, Window::VERTICAL, options);

    tracing::debug!(
        horizontal = horizontal.iterations,
        vertical = vertical.iterations,
        "IGFPPI refinement converged"
    );

    let report = IterationReport {
        horizontal: horizontal.iterations,
        vertical: vertical.iterations,
    };
    (combine(&horizontal, &vertical), report)
}

fn refine(guide: &Plane, seed: &Plane, window: Window, options: &IgfppiOptions) -> Refinement {
    let mut current = seed.clone();
    let mut previous = seed.clone();
    let mut instability = Plane::zeros(seed.width(), seed.height());
    let mut iterations = 0;

    for iteration in 0..options.max_iterations {
        let filtered = guided_filter(&current, guide, window, options.regularization);
        let delta = filtered.zip_map(&current, |f, c| (f - c).abs());
        let drift = filtered.zip_map(&previous, |f, p| (f - p).abs());
        instability = drift.zip_map(&delta, |d, dl| d * dl);

        previous = current;
        current = filtered;
        iterations = iteration + 1;

        let mean_change = delta.mean();
        if mean_change < options.epsilon_global {
            tracing::trace!(?window, iterations, mean_change, "global threshold reached");
            break;
        }

        let stable = instability
            .as_slice()
            .iter()
            .filter(|&&v| v < options.epsilon_pixel)
            .count();
        if stable as f64 >= STABLE_FRACTION * instability.len() as f64 {
            tracing::trace!(?window, iterations, stable, "pixelwise threshold reached");
            break;
        }
    }

    Refinement {
        plane: current,
        instability,
        iterations,
    }
}

/// `(w_h * I_h + w_v * I_v) / (w_h + w_v)` with `w = 1 / max(D, 1e-10)`.
fn combine(horizontal: &Refinement, vertical: &Refinement) -> Plane {
    let (height, width) = horizontal.plane.shape();
    let out = horizontal
        .plane
        .as_slice()
        .iter()
        .zip(horizontal.instability.as_slice())
        .zip(vertical.plane.as_slice().iter().zip(vertical.instability.as_slice()))
        .map(|((&ih, &dh), (&iv, &dv))| {
            let wh = 1.0 / dh.max(MIN_INSTABILITY);
            let wv = 1.0 / dv.max(MIN_INSTABILITY);
            (wh * ih + wv * iv) / (wh + wv)
        })
        .collect();
    Plane::from_parts(out, width, height)
}
