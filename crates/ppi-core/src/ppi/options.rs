//! Synthesis method selection and per-method tuning.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};

/// Options for PPID synthesis (Gaussian low-pass plus weighted
/// high-frequency correction).
///
/// # Example
///
/// ```
/// use ppi_core::PpidOptions;
///
/// let options = PpidOptions::new().sigma(1.5).window_size(7);
/// assert!(options.validate().is_ok());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PpidOptions {
    /// Standard deviation of the low-frequency Gaussian.
    ///
    /// Default: `1.0`
    pub sigma: f64,

    /// Side of the square correction window (odd).
    ///
    /// Default: `5`
    pub window_size: usize,

    /// Added to every intensity difference before inversion.
    ///
    /// Default: `1e-6`
    pub epsilon: f64,
}

impl Default for PpidOptions {
    fn default() -> Self {
        Self {
            sigma: 1.0,
            window_size: 5,
            epsilon: 1e-6,
        }
    }
}

impl PpidOptions {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn sigma(mut self, sigma: f64) -> Self {
        self.sigma = sigma;
        self
    }

    #[inline]
    pub fn window_size(mut self, window_size: usize) -> Self {
        self.window_size = window_size;
        self
    }

    #[inline]
    pub fn epsilon(mut self, epsilon: f64) -> Self {
        self.epsilon = epsilon;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if !self.sigma.is_finite() || self.sigma < 0.0 {
            return Err(CoreError::InvalidParameter(format!(
                "ppid sigma must be finite and >= 0, got {}",
                self.sigma
            )));
        }
        if self.window_size == 0 || self.window_size % 2 == 0 {
            return Err(CoreError::InvalidParameter(format!(
                "ppid window_size must be a positive odd number, got {}",
                self.window_size
            )));
        }
        if !self.epsilon.is_finite() || self.epsilon <= 0.0 {
            return Err(CoreError::InvalidParameter(format!(
                "ppid epsilon must be finite and > 0, got {}",
                self.epsilon
            )));
        }
        Ok(())
    }
}

/// Options for IGFPPI synthesis (iterative directional guided filtering).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IgfppiOptions {
    /// Pixelwise stability threshold on the product of consecutive deltas.
    ///
    /// Default: `1e-4`
    pub epsilon_pixel: f64,

    /// Threshold on the mean absolute change between iterations.
    ///
    /// Default: `1e-3`
    pub epsilon_global: f64,

    /// Hard bound on iterations per direction.
    ///
    /// Default: `50`
    pub max_iterations: usize,

    /// Regularization added to the guide variance; must be positive so
    /// flat windows stay finite.
    ///
    /// Default: `1e-6`
    pub regularization: f64,
}

impl Default for IgfppiOptions {
    fn default() -> Self {
        Self {
            epsilon_pixel: 1e-4,
            epsilon_global: 1e-3,
            max_iterations: 50,
            regularization: 1e-6,
        }
    }
}

impl IgfppiOptions {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn epsilon_pixel(mut self, epsilon: f64) -> Self {
        self.epsilon_pixel = epsilon;
        self
    }

    #[inline]
    pub fn epsilon_global(mut self, epsilon: f64) -> Self {
        self.epsilon_global = epsilon;
        self
    }

    #[inline]
    pub fn max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    #[inline]
    pub fn regularization(mut self, regularization: f64) -> Self {
        self.regularization = regularization;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.max_iterations == 0 {
            return Err(CoreError::InvalidParameter(
                "igfppi max_iterations must be >= 1".to_string(),
            ));
        }
        if !self.regularization.is_finite() || self.regularization <= 0.0 {
            return Err(CoreError::InvalidParameter(format!(
                "igfppi regularization must be finite and > 0, got {}",
                self.regularization
            )));
        }
        for (name, value) in [
            ("epsilon_pixel", self.epsilon_pixel),
            ("epsilon_global", self.epsilon_global),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(CoreError::InvalidParameter(format!(
                    "igfppi {name} must be finite and >= 0, got {value}"
                )));
            }
        }
        Ok(())
    }
}

/// Band-synthesis algorithm, with its tuning.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PpiMethod {
    /// Arithmetic mean across channels
    Simple,
    /// Gaussian low-pass with weighted high-frequency correction
    Ppid(PpidOptions),
    /// Iterative horizontal/vertical guided filtering
    Igfppi(IgfppiOptions),
}

impl PpiMethod {
    /// All method names accepted by [`FromStr`].
    pub const NAMES: [&'static str; 3] = ["simple", "ppid", "igfppi"];

    /// Short lowercase identifier used in file names and reports.
    pub fn name(&self) -> &'static str {
        match self {
            PpiMethod::Simple => "simple",
            PpiMethod::Ppid(_) => "ppid",
            PpiMethod::Igfppi(_) => "igfppi",
        }
    }

    pub fn validate(&self) -> Result<()> {
        match self {
            PpiMethod::Simple => Ok(()),
            PpiMethod::Ppid(options) => options.validate(),
            PpiMethod::Igfppi(options) => options.validate(),
        }
    }
}

impl Default for PpiMethod {
    fn default() -> Self {
        PpiMethod::Igfppi(IgfppiOptions::default())
    }
}

impl fmt::Display for PpiMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Parses a method name (case-insensitive) with default tuning.
impl FromStr for PpiMethod {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "simple" => Ok(PpiMethod::Simple),
            "ppid" => Ok(PpiMethod::Ppid(PpidOptions::default())),
            "igfppi" => Ok(PpiMethod::Igfppi(IgfppiOptions::default())),
            other => Err(CoreError::InvalidParameter(format!(
                "unknown ppi method: {other} (expected one of {})",
                Self::NAMES.join(", ")
            ))),
        }
    }
}
