//! PPID: Gaussian low-pass with an intensity-weighted high-frequency
//! correction.
//!
//! For every pixel the correction is a weighted average of
//! `lowfreq[q] - simple[q]` over a square window, where neighbours whose
//! simple-PPI intensity is close to the centre pixel get large weights:
//!
//! ```text
//! w(q)       = 1 / (|simple[c] - simple[q]| + eps)
//! correction = sum(w(q) * (lowfreq[q] - simple[q])) / sum(w(q))
//! ppid       = simple + correction
//! ```

use super::options::PpidOptions;
use crate::filter::{gaussian_filter, Border};
use crate::plane::Plane;

pub(crate) fn ppid(simple: &Plane, options: &PpidOptions) -> Plane {
    let lowfreq = gaussian_filter(simple, options.sigma);
    let detail = lowfreq.zip_map(simple, |low, s| low - s);

    let (height, width) = simple.shape();
    let radius = (options.window_size / 2) as isize;
    let src = simple.as_slice();
    let det = detail.as_slice();
    let mut out = Vec::with_capacity(src.len());

    for y in 0..height {
        for x in 0..width {
            let center = src[y * width + x];
            let mut weighted = 0.0;
            let mut total = 0.0;
            for dy in -radius..=radius {
                let yi = Border::Mirror.resolve(y as isize + dy, height);
                for dx in -radius..=radius {
                    let xi = Border::Mirror.resolve(x as isize + dx, width);
                    let q = yi * width + xi;
                    let w = 1.0 / ((center - src[q]).abs() + options.epsilon);
                    weighted += w * det[q];
                    total += w;
                }
            }
            out.push(center + weighted / total);
        }
    }

    tracing::debug!(
        sigma = options.sigma,
        window = options.window_size,
        "PPID correction applied"
    );
    Plane::from_parts(out, width, height)
}
