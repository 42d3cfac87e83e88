use rayon::prelude::*;

use super::{difference, reconstruct};
use crate::error::{CoreError, Result};
use crate::interpolate::DirectionalInterpolator;
use crate::plane::Plane;
use crate::stack::ChannelStack;

/// Upscales every band of a stack 2x by residual transfer.
///
/// Channels are independent. With more than one worker they are
/// dispatched onto a dedicated rayon pool of that size and merged back by
/// channel index, which gives the same result as sequential processing.
///
/// # Example
///
/// ```
/// use ppi_core::{ChannelStack, Plane, SpectralUpsampler};
///
/// let stack = ChannelStack::new(vec![Plane::filled(4, 4, 80.0); 3]).unwrap();
/// let ppi = stack.mean_plane();
/// let ppi_2x = Plane::filled(8, 8, 80.0);
///
/// let upscaled = SpectralUpsampler::new(2.0)
///     .unwrap()
///     .workers(2)
///     .upsample_all(&stack, &ppi, &ppi_2x)
///     .unwrap();
/// assert_eq!(upscaled.shape(), (8, 8));
/// ```
#[derive(Debug, Clone)]
pub struct SpectralUpsampler {
    interpolator: DirectionalInterpolator,
    workers: usize,
}

impl SpectralUpsampler {
    /// Only a factor of 2 is supported.
    pub fn new(scale: f64) -> Result<Self> {
        if scale != 2.0 {
            return Err(CoreError::InvalidParameter(format!(
                "spectral upsampling only supports a factor of 2, got {scale}"
            )));
        }
        Ok(Self {
            interpolator: DirectionalInterpolator::new(),
            workers: 1,
        })
    }

    /// Channels processed concurrently; `0` and `1` mean sequential.
    #[inline]
    pub fn workers(mut self, workers: usize) -> Self {
        self.workers = workers.max(1);
        self
    }

    /// Difference, interpolate and reconstruct one band.
    pub fn upsample_channel(&self, channel: &Plane, ppi: &Plane, ppi_2x: &Plane) -> Result<Plane> {
        let delta = difference(channel, ppi)?;
        let delta_2x = self.interpolator.interpolate(&delta, ppi_2x)?;
        reconstruct(ppi_2x, &delta_2x)
    }

    /// Upscale every band of `stack`; labels are carried over.
    ///
    /// # Errors
    ///
    /// [`CoreError::ShapeMismatch`] unless `ppi` matches the stack and
    /// `ppi_2x` is exactly twice its size.
    pub fn upsample_all(
        &self,
        stack: &ChannelStack,
        ppi: &Plane,
        ppi_2x: &Plane,
    ) -> Result<ChannelStack> {
        let (height, width) = stack.shape();
        if ppi.shape() != (height, width) {
            return Err(CoreError::shape("spectral upsampling ppi", (height, width), ppi.shape()));
        }
        if ppi_2x.shape() != (2 * height, 2 * width) {
            return Err(CoreError::shape(
                "spectral upsampling ppi_2x",
                (2 * height, 2 * width),
                ppi_2x.shape(),
            ));
        }

        tracing::debug!(channels = stack.len(), workers = self.workers, "Upsampling channels");
        let channels = if self.workers > 1 {
            match rayon::ThreadPoolBuilder::new().num_threads(self.workers).build() {
                Ok(pool) => pool.install(|| self.parallel(stack, ppi, ppi_2x))?,
                Err(e) => {
                    tracing::warn!(%e, "Failed to build worker pool, running sequentially");
                    self.sequential(stack, ppi, ppi_2x)?
                }
            }
        } else {
            self.sequential(stack, ppi, ppi_2x)?
        };

        ChannelStack::with_labels(channels, stack.labels().to_vec())
    }

    fn sequential(&self, stack: &ChannelStack, ppi: &Plane, ppi_2x: &Plane) -> Result<Vec<Plane>> {
        stack
            .channels()
            .iter()
            .map(|channel| self.upsample_channel(channel, ppi, ppi_2x))
            .collect()
    }

    fn parallel(&self, stack: &ChannelStack, ppi: &Plane, ppi_2x: &Plane) -> Result<Vec<Plane>> {
        let tagged: Vec<(usize, Result<Plane>)> = stack
            .channels()
            .par_iter()
            .enumerate()
            .map(|(index, channel)| (index, self.upsample_channel(channel, ppi, ppi_2x)))
            .collect();

        let mut slots: Vec<Option<Plane>> = vec![None; stack.len()];
        for (index, result) in tagged {
            slots[index] = Some(result?);
        }
        slots
            .into_iter()
            .enumerate()
            .map(|(index, slot)| {
                slot.ok_or_else(|| {
                    CoreError::InvalidParameter(format!("channel {index} produced no result"))
                })
            })
            .collect()
    }
}
