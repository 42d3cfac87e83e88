//! ppi-upscale - Pseudo-Panchromatic Image synthesis and guided upscaling
//!
//! Command-line front end for [`ppi_core`]: loads `<wavelength>nm.png`
//! band images, synthesizes a PPI, upscales it and reconstructs every
//! band at twice the resolution.
//! This library exposes modules for integration testing.

pub mod error;
pub mod models;
pub mod rendering;
pub mod services;
