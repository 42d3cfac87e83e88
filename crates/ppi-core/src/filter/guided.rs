//! Local linear-regression guided filter (He et al., 2010).
//!
//! Within every window the output is modelled as a linear function of the
//! guide, `q = a * I + b`, with
//!
//! ```text
//! a = cov(I, p) / (var(I) + eps)
//! b = mean(p) - a * mean(I)
//! ```
//!
//! and the per-window coefficients are averaged before being applied, so
//! edges present in the guide survive while flat guide regions are smoothed.

use serde::{Deserialize, Serialize};

use super::box_filter::{box_filter, Window};
use crate::error::{CoreError, Result};
use crate::plane::Plane;

/// One guided-filter pass of `input` steered by `guide`.
///
/// Both planes must share a shape; callers validate.
pub fn guided_filter(input: &Plane, guide: &Plane, window: Window, eps: f64) -> Plane {
    debug_assert_eq!(input.shape(), guide.shape());
    let mean_i = box_filter(guide, window);
    let mean_p = box_filter(input, window);
    let mean_ip = box_filter(&guide.zip_map(input, |g, p| g * p), window);
    let mean_ii = box_filter(&guide.map(|g| g * g), window);

    let cov_ip = mean_ip.zip_map(&mean_i.zip_map(&mean_p, |i, p| i * p), |ip, ip_bar| ip - ip_bar);
    let var_i = mean_ii.zip_map(&mean_i, |ii, i| ii - i * i);

    let a = cov_ip.zip_map(&var_i, |cov, var| cov / (var + eps));
    let b = mean_p.zip_map(&a.zip_map(&mean_i, |a, i| a * i), |p, ai| p - ai);

    let mean_a = box_filter(&a, window);
    let mean_b = box_filter(&b, window);

    mean_a
        .zip_map(guide, |a, g| a * g)
        .zip_map(&mean_b, |ag, b| ag + b)
}

/// Parameters of the optional edge-aware smoothing pass applied after
/// guided upscaling.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GuidedFilterParams {
    /// Window radius; the window is `2 * radius + 1` square
    pub radius: usize,
    /// Regularization added to the guide variance (> 0)
    pub epsilon: f64,
}

impl Default for GuidedFilterParams {
    fn default() -> Self {
        Self {
            radius: 4,
            epsilon: 1e-2,
        }
    }
}

impl GuidedFilterParams {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn radius(mut self, radius: usize) -> Self {
        self.radius = radius;
        self
    }

    #[inline]
    pub fn epsilon(mut self, epsilon: f64) -> Self {
        self.epsilon = epsilon;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if !self.epsilon.is_finite() || self.epsilon <= 0.0 {
            return Err(CoreError::InvalidParameter(format!(
                "guided filter epsilon must be finite and > 0, got {}",
                self.epsilon
            )));
        }
        Ok(())
    }

    /// Smooth `input` with `guide` as the structure reference.
    pub fn apply(&self, input: &Plane, guide: &Plane) -> Result<Plane> {
        self.validate()?;
        input.ensure_same_shape(guide, "guided filter")?;
        Ok(guided_filter(
            input,
            guide,
            Window::square(self.radius),
            self.epsilon,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn ramp_with_step() -> Plane {
        Plane::from_fn(50, 50, |_, x| {
            let base = 50.0 + 150.0 * x as f64 / 49.0;
            if x >= 25 {
                base + 50.0
            } else {
                base
            }
        })
    }

    #[test]
    fn test_self_guided_constant_is_unchanged() {
        let plane = Plane::filled(12, 12, 150.0);
        let out = guided_filter(&plane, &plane, Window::HORIZONTAL, 1e-6);
        for &v in out.as_slice() {
            assert!((v - 150.0).abs() < 1e-9);
        }
    }

    #[test]
    fn test_output_shape() {
        let plane = ramp_with_step();
        let guide = plane.map(|v| v / 255.0);
        let out = GuidedFilterParams::new()
            .radius(2)
            .epsilon(0.01)
            .apply(&plane, &guide)
            .unwrap();
        assert_eq!(out.shape(), plane.shape());
    }

    #[test]
    fn test_smooths_noise() {
        let clean = ramp_with_step();
        let mut rng = StdRng::seed_from_u64(7);
        let noisy = clean.map(|v| v + rng_noise(&mut rng));
        let guide = clean.map(|v| v / 255.0);

        let out = GuidedFilterParams::new()
            .radius(4)
            .epsilon(0.1)
            .apply(&noisy, &guide)
            .unwrap();

        assert!(out.std() < noisy.std());
    }

    fn rng_noise(rng: &mut StdRng) -> f64 {
        rng.gen_range(-10.0..10.0)
    }

    #[test]
    fn test_shape_mismatch_is_rejected() {
        let result = GuidedFilterParams::new().apply(&Plane::zeros(4, 4), &Plane::zeros(5, 4));
        assert!(matches!(result, Err(CoreError::ShapeMismatch { .. })));
    }

    #[test]
    fn test_negative_epsilon_is_rejected() {
        let result = GuidedFilterParams::new()
            .epsilon(-1.0)
            .apply(&Plane::zeros(4, 4), &Plane::zeros(4, 4));
        assert!(matches!(result, Err(CoreError::InvalidParameter(_))));
    }

    #[test]
    fn test_zero_epsilon_is_rejected() {
        let result = GuidedFilterParams::new()
            .epsilon(0.0)
            .apply(&Plane::filled(8, 8, 1.0), &Plane::filled(8, 8, 1.0));
        assert!(matches!(result, Err(CoreError::InvalidParameter(_))));
    }
}
