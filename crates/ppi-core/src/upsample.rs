//! PPI upscaling: edge-guided 2x, or plain spline resampling.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};
use crate::filter::GuidedFilterParams;
use crate::guide::GuideBuilder;
use crate::interpolate::{expand_bilinear, DirectionalInterpolator};
use crate::plane::Plane;
use crate::resample::{resize, scaled_len, Kernel};
use crate::stack::ChannelStack;

/// How [`GuidedUpsampler`] enlarges an image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UpscaleMethod {
    /// Directional interpolation weighted by a guide image (2x only)
    #[default]
    Guided,
    /// Keys cubic convolution
    Bicubic,
    /// Lanczos-3
    Lanczos,
}

impl UpscaleMethod {
    pub const NAMES: [&'static str; 3] = ["guided", "bicubic", "lanczos"];

    pub fn name(self) -> &'static str {
        match self {
            UpscaleMethod::Guided => "guided",
            UpscaleMethod::Bicubic => "bicubic",
            UpscaleMethod::Lanczos => "lanczos",
        }
    }
}

impl fmt::Display for UpscaleMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for UpscaleMethod {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "guided" => Ok(UpscaleMethod::Guided),
            "bicubic" => Ok(UpscaleMethod::Bicubic),
            "lanczos" => Ok(UpscaleMethod::Lanczos),
            other => Err(CoreError::InvalidParameter(format!(
                "unknown upscale method: {other} (expected one of {})",
                Self::NAMES.join(", ")
            ))),
        }
    }
}

/// Upscales a single band.
///
/// With [`UpscaleMethod::Guided`] the factor must be 2: a guide image is
/// built from the channel stack (or, without one, from the edges of the
/// image itself) and drives the [`DirectionalInterpolator`]. The result
/// can optionally be smoothed with a classical guided filter.
///
/// # Example
///
/// ```
/// use ppi_core::{GuidedUpsampler, Plane, UpscaleMethod};
///
/// let upsampler = GuidedUpsampler::new(2.0, UpscaleMethod::Guided).unwrap();
/// assert_eq!(upsampler.get_output_size(10, 12), (20, 24));
///
/// let image = Plane::filled(12, 10, 64.0);
/// let up = upsampler.upscale(&image, None).unwrap();
/// assert_eq!(up.shape(), (20, 24));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct GuidedUpsampler {
    scale: f64,
    method: UpscaleMethod,
    refine: Option<GuidedFilterParams>,
    interpolator: DirectionalInterpolator,
}

impl GuidedUpsampler {
    /// # Errors
    ///
    /// [`CoreError::InvalidParameter`] when `scale` is not finite or below
    /// 1, or when the guided method is asked for anything but 2x.
    pub fn new(scale: f64, method: UpscaleMethod) -> Result<Self> {
        if !scale.is_finite() || scale < 1.0 {
            return Err(CoreError::InvalidParameter(format!(
                "scale factor must be >= 1, got {scale}"
            )));
        }
        if method == UpscaleMethod::Guided && scale != 2.0 {
            return Err(CoreError::InvalidParameter(format!(
                "guided upscaling only supports a factor of 2, got {scale}"
            )));
        }
        Ok(Self {
            scale,
            method,
            refine: None,
            interpolator: DirectionalInterpolator::new(),
        })
    }

    /// Smooth guided results with a classical guided filter.
    pub fn with_refinement(mut self, params: GuidedFilterParams) -> Result<Self> {
        params.validate()?;
        self.refine = Some(params);
        Ok(self)
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    pub fn method(&self) -> UpscaleMethod {
        self.method
    }

    pub fn refinement(&self) -> Option<GuidedFilterParams> {
        self.refine
    }

    /// `(height, width)` of the upscaled image.
    pub fn get_output_size(&self, height: usize, width: usize) -> (usize, usize) {
        (scaled_len(height, self.scale), scaled_len(width, self.scale))
    }

    /// Upscale `image`, using `guide_source` to steer guided interpolation.
    ///
    /// # Errors
    ///
    /// - [`CoreError::ShapeMismatch`] when `guide_source` has another shape
    /// - [`CoreError::InvalidParameter`] for an empty image
    pub fn upscale(&self, image: &Plane, guide_source: Option<&ChannelStack>) -> Result<Plane> {
        if image.is_empty() {
            return Err(CoreError::InvalidParameter(
                "cannot upscale an empty image".to_string(),
            ));
        }
        let (height, width) = self.get_output_size(image.height(), image.width());
        tracing::debug!(
            method = self.method.name(),
            scale = self.scale,
            from = ?image.shape(),
            to = ?(height, width),
            "Upscaling"
        );

        match self.method {
            UpscaleMethod::Guided => self.guided(image, guide_source),
            UpscaleMethod::Bicubic => Ok(resize(image, width, height, Kernel::Cubic)),
            UpscaleMethod::Lanczos => Ok(resize(image, width, height, Kernel::Lanczos3)),
        }
    }

    fn guided(&self, image: &Plane, guide_source: Option<&ChannelStack>) -> Result<Plane> {
        let builder = GuideBuilder::new();
        let guide = match guide_source {
            Some(stack) => {
                if stack.shape() != image.shape() {
                    return Err(CoreError::shape(
                        "upscale guide source",
                        image.shape(),
                        stack.shape(),
                    ));
                }
                builder.build(stack)
            }
            None => builder.edge_only(image),
        };

        let upscaled = self.interpolator.interpolate(image, &guide)?;
        match &self.refine {
            Some(params) => params.apply(&upscaled, &expand_bilinear(&guide)),
            None => Ok(upscaled),
        }
    }
}
