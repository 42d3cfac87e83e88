//! Per-channel spectral detail transfer.
//!
//! Each band is split into the PPI and a residual (`channel - ppi`). The
//! residual is upscaled with the [`DirectionalInterpolator`] steered by
//! the upscaled PPI, and added back onto the upscaled PPI.
//!
//! [`DirectionalInterpolator`]: crate::DirectionalInterpolator

mod upsampler;

pub use upsampler::SpectralUpsampler;

use crate::error::Result;
use crate::plane::Plane;
use crate::stack::ChannelStack;

/// `channel - ppi`, elementwise and unclamped.
pub fn difference(channel: &Plane, ppi: &Plane) -> Result<Plane> {
    channel.ensure_same_shape(ppi, "spectral difference")?;
    Ok(channel.zip_map(ppi, |c, p| c - p))
}

/// [`difference`] for every channel of `stack`, in channel order.
pub fn difference_all(stack: &ChannelStack, ppi: &Plane) -> Result<Vec<Plane>> {
    stack.channels().iter().map(|c| difference(c, ppi)).collect()
}

/// `ppi_2x + delta_2x`, elementwise.
pub fn reconstruct(ppi_2x: &Plane, delta_2x: &Plane) -> Result<Plane> {
    ppi_2x.ensure_same_shape(delta_2x, "spectral reconstruction")?;
    Ok(ppi_2x.zip_map(delta_2x, |p, d| p + d))
}

/// [`reconstruct`] for every upscaled residual, in order.
pub fn reconstruct_all(ppi_2x: &Plane, deltas_2x: &[Plane]) -> Result<Vec<Plane>> {
    deltas_2x.iter().map(|d| reconstruct(ppi_2x, d)).collect()
}
