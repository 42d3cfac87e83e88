pub mod config;

pub use config::{ConfigOverrides, MethodName, OutputConfig, PipelineConfig, UpscaleConfig};
