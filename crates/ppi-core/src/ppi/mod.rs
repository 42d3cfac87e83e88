//! Pseudo-panchromatic band synthesis.
//!
//! A [`PpiGenerator`] borrows a [`ChannelStack`] and synthesizes one
//! band from it with the selected [`PpiMethod`]. The band is computed on
//! the first call to [`PpiGenerator::generate`] and cached; later calls
//! return the same band.
//!
//! # Example
//!
//! ```
//! use ppi_core::{ChannelStack, Plane, PpiGenerator, PpiMethod};
//!
//! let stack = ChannelStack::new(vec![
//!     Plane::filled(8, 8, 100.0),
//!     Plane::filled(8, 8, 200.0),
//! ])
//! .unwrap();
//!
//! let generator = PpiGenerator::new(&stack, PpiMethod::Simple).unwrap();
//! let band = generator.generate();
//! assert_eq!(band.plane().get(3, 3), 150.0);
//! assert!(std::ptr::eq(band, generator.generate()));
//! ```

mod igfppi;
mod options;
mod ppid;
mod simple;

pub use igfppi::IterationReport;
pub use options::{IgfppiOptions, PpiMethod, PpidOptions};

use std::sync::OnceLock;

use serde::Serialize;

use crate::error::Result;
use crate::plane::Plane;
use crate::stack::ChannelStack;

/// A synthesized band with the metadata of the run that produced it.
#[derive(Debug, Clone)]
pub struct PpiBand {
    plane: Plane,
    method: PpiMethod,
    num_channels: usize,
    iterations: Option<IterationReport>,
}

impl PpiBand {
    pub fn plane(&self) -> &Plane {
        &self.plane
    }

    pub fn into_plane(self) -> Plane {
        self.plane
    }

    pub fn method(&self) -> PpiMethod {
        self.method
    }

    /// Iterations per direction; only IGFPPI iterates.
    pub fn iterations(&self) -> Option<IterationReport> {
        self.iterations
    }

    pub fn statistics(&self) -> PpiStatistics {
        let stats = self.plane.stats();
        PpiStatistics {
            method: self.method.name().to_string(),
            mean: stats.mean,
            std: stats.std,
            min: stats.min,
            max: stats.max,
            shape: self.plane.shape(),
            num_channels: self.num_channels,
            iterations_horizontal: self.iterations.map(|r| r.horizontal),
            iterations_vertical: self.iterations.map(|r| r.vertical),
        }
    }
}

/// Summary of a synthesized band, as written to `statistics.json`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PpiStatistics {
    pub method: String,
    pub mean: f64,
    pub std: f64,
    pub min: f64,
    pub max: f64,
    /// `(height, width)`
    pub shape: (usize, usize),
    pub num_channels: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub iterations_horizontal: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub iterations_vertical: Option<usize>,
}

/// Synthesizes, and caches, the PPI of one channel stack.
#[derive(Debug)]
pub struct PpiGenerator<'a> {
    stack: &'a ChannelStack,
    method: PpiMethod,
    cache: OnceLock<PpiBand>,
}

impl<'a> PpiGenerator<'a> {
    /// # Errors
    ///
    /// [`CoreError::InvalidParameter`](crate::CoreError::InvalidParameter)
    /// when the method's options are out of range.
    pub fn new(stack: &'a ChannelStack, method: PpiMethod) -> Result<Self> {
        method.validate()?;
        Ok(Self {
            stack,
            method,
            cache: OnceLock::new(),
        })
    }

    pub fn method(&self) -> PpiMethod {
        self.method
    }

    pub fn stack(&self) -> &'a ChannelStack {
        self.stack
    }

    /// The synthesized band, computed on first use.
    pub fn generate(&self) -> &PpiBand {
        self.cache.get_or_init(|| self.compute())
    }

    fn compute(&self) -> PpiBand {
        let (height, width) = self.stack.shape();
        tracing::debug!(
            method = self.method.name(),
            channels = self.stack.len(),
            height,
            width,
            "Synthesizing PPI"
        );

        let base = simple::simple(self.stack);
        let (plane, iterations) = match &self.method {
            PpiMethod::Simple => (base, None),
            PpiMethod::Ppid(options) => (ppid::ppid(&base, options), None),
            PpiMethod::Igfppi(options) => {
                let (plane, report) = igfppi::igfppi(&base, options);
                (plane, Some(report))
            }
        };

        PpiBand {
            plane,
            method: self.method,
            num_channels: self.stack.len(),
            iterations,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CoreError;

    fn uniform_stack(values: &[f64], width: usize, height: usize) -> ChannelStack {
        ChannelStack::new(
            values
                .iter()
                .map(|&v| Plane::filled(width, height, v))
                .collect(),
        )
        .unwrap()
    }

    #[test]
    fn test_generate_is_cached() {
        let stack = uniform_stack(&[10.0, 20.0], 4, 4);
        let generator = PpiGenerator::new(&stack, PpiMethod::Simple).unwrap();
        let first = generator.generate() as *const PpiBand;
        let second = generator.generate() as *const PpiBand;
        assert_eq!(first, second);
    }

    #[test]
    fn test_invalid_options_rejected_at_construction() {
        let stack = uniform_stack(&[10.0], 4, 4);
        let method = PpiMethod::Ppid(PpidOptions::new().window_size(2));
        assert!(matches!(
            PpiGenerator::new(&stack, method),
            Err(CoreError::InvalidParameter(_))
        ));
    }

    #[test]
    fn test_uniform_channels_all_methods() {
        let stack = uniform_stack(&[100.0, 150.0, 200.0], 30, 30);
        for name in PpiMethod::NAMES {
            let method: PpiMethod = name.parse().unwrap();
            let generator = PpiGenerator::new(&stack, method).unwrap();
            let band = generator.generate();
            assert!(
                (band.plane().mean() - 150.0).abs() < 1.0,
                "{name}: mean {}",
                band.plane().mean()
            );
        }
    }

    #[test]
    fn test_statistics() {
        let stack = uniform_stack(&[100.0, 200.0], 6, 5);
        let generator = PpiGenerator::new(&stack, PpiMethod::default()).unwrap();
        let stats = generator.generate().statistics();
        assert_eq!(stats.method, "igfppi");
        assert_eq!(stats.shape, (5, 6));
        assert_eq!(stats.num_channels, 2);
        assert!(stats.iterations_horizontal.unwrap() >= 1);
        assert!(stats.iterations_vertical.unwrap() >= 1);
        assert!((stats.mean - 150.0).abs() < 1e-6);
    }

    #[test]
    fn test_simple_has_no_iterations() {
        let stack = uniform_stack(&[1.0], 3, 3);
        let generator = PpiGenerator::new(&stack, PpiMethod::Simple).unwrap();
        assert_eq!(generator.generate().iterations(), None);
        assert_eq!(generator.generate().statistics().iterations_vertical, None);
    }
}
