use std::path::Path;

use ppi_core::{GuidedFilterParams, IgfppiOptions, PpiMethod, PpidOptions, UpscaleMethod};
use serde::{Deserialize, Serialize};

use crate::error::PipelineError;

/// Band-synthesis method as written in config files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MethodName {
    Simple,
    Ppid,
    #[default]
    Igfppi,
}

impl std::str::FromStr for MethodName {
    type Err = PipelineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "simple" => Ok(MethodName::Simple),
            "ppid" => Ok(MethodName::Ppid),
            "igfppi" => Ok(MethodName::Igfppi),
            other => Err(PipelineError::Config(format!(
                "unknown method: {other} (expected simple, ppid or igfppi)"
            ))),
        }
    }
}

/// Pipeline configuration loaded from YAML
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PipelineConfig {
    /// PPI synthesis method
    pub method: MethodName,

    /// PPI upscaling
    pub upscale: UpscaleConfig,

    /// Tuning for `method: ppid`
    pub ppid: PpidOptions,

    /// Tuning for `method: igfppi`
    pub igfppi: IgfppiOptions,

    /// Channels reconstructed concurrently (1 = sequential)
    pub workers: usize,

    /// Which files to write
    pub output: OutputConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct UpscaleConfig {
    pub factor: f64,
    pub method: UpscaleMethod,
    /// Optional guided-filter smoothing after guided upscaling
    pub refine: Option<GuidedFilterParams>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OutputConfig {
    pub save_guide: bool,
    pub save_channels: bool,
    /// Recompress written PNGs with oxipng
    pub optimize_png: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            method: MethodName::default(),
            upscale: UpscaleConfig::default(),
            ppid: PpidOptions::default(),
            igfppi: IgfppiOptions::default(),
            workers: 1,
            output: OutputConfig::default(),
        }
    }
}

impl Default for UpscaleConfig {
    fn default() -> Self {
        Self {
            factor: 2.0,
            method: UpscaleMethod::Guided,
            refine: None,
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            save_guide: true,
            save_channels: true,
            optimize_png: true,
        }
    }
}

/// Values given on the command line; `None` keeps the configured value.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub method: Option<MethodName>,
    pub upscale_factor: Option<f64>,
    pub upscale_method: Option<UpscaleMethod>,
    pub workers: Option<usize>,
}

impl PipelineConfig {
    /// Parse a YAML document; keys left out keep their defaults.
    pub fn from_yaml_str(content: &str) -> Result<Self, PipelineError> {
        serde_yaml::from_str(content).map_err(|e| PipelineError::Config(e.to_string()))
    }

    /// Load an explicitly requested config file. Read and parse failures
    /// are errors.
    pub fn load(path: &Path) -> Result<Self, PipelineError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            PipelineError::Config(format!("failed to read {}: {e}", path.display()))
        })?;
        let config = Self::from_yaml_str(&content)?;
        tracing::info!(path = %path.display(), method = ?config.method, "Loaded configuration");
        Ok(config)
    }

    /// Load the file named by `CONFIG_FILE`, if any, falling back to
    /// defaults when it cannot be used.
    pub fn from_env() -> Self {
        match std::env::var("CONFIG_FILE") {
            Ok(path) => Self::load_or_default(Path::new(&path)),
            Err(_) => Self::default(),
        }
    }

    fn load_or_default(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(content) => match Self::from_yaml_str(&content) {
                Ok(config) => {
                    tracing::info!(path = %path.display(), "Loaded configuration");
                    config
                }
                Err(e) => {
                    tracing::warn!(%e, "Failed to parse config, using defaults");
                    Self::default()
                }
            },
            Err(e) => {
                tracing::warn!(%e, "Failed to read config, using defaults");
                Self::default()
            }
        }
    }

    /// Apply command-line values on top of this configuration.
    pub fn apply(&mut self, overrides: &ConfigOverrides) {
        if let Some(method) = overrides.method {
            self.method = method;
        }
        if let Some(factor) = overrides.upscale_factor {
            self.upscale.factor = factor;
        }
        if let Some(method) = overrides.upscale_method {
            self.upscale.method = method;
        }
        if let Some(workers) = overrides.workers {
            self.workers = workers;
        }
    }

    /// The synthesis method with its configured tuning.
    pub fn ppi_method(&self) -> PpiMethod {
        match self.method {
            MethodName::Simple => PpiMethod::Simple,
            MethodName::Ppid => PpiMethod::Ppid(self.ppid),
            MethodName::Igfppi => PpiMethod::Igfppi(self.igfppi),
        }
    }
}
