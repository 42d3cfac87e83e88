use std::path::{Path, PathBuf};

use ppi_core::{
    ChannelStack, GuideBuilder, GuidedUpsampler, PlaneStats, PpiBand, PpiGenerator,
    PpiStatistics, SpectralUpsampler,
};
use serde::Serialize;

use crate::error::PipelineError;
use crate::models::PipelineConfig;
use crate::rendering::{decode_luma, save_normalized, save_plane};
use crate::services::channel_loader::load_channels;

/// Name of the JSON summary written next to the images.
pub const STATISTICS_FILE: &str = "statistics.json";

/// Summary of one pipeline run, written as `statistics.json`.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub ppi: PpiStatistics,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub upscaled_ppi: Option<UpscaledStatistics>,
    pub num_channels: usize,
    /// `(height, width)` of the input bands
    pub input_shape: (usize, usize),
    /// Number of bands reconstructed at 2x
    pub upscaled_channels: usize,
    /// Written files, relative to the output directory
    pub files: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct UpscaledStatistics {
    pub method: String,
    pub factor: f64,
    pub shape: (usize, usize),
    #[serde(flatten)]
    pub stats: PlaneStats,
}

/// Load → synthesize → upscale → reconstruct → write.
pub struct Pipeline {
    config: PipelineConfig,
}

impl Pipeline {
    /// Validates every stage's parameters up front.
    pub fn new(config: PipelineConfig) -> Result<Self, PipelineError> {
        config.ppi_method().validate()?;
        let pipeline = Self { config };
        pipeline.upsampler()?;
        Ok(pipeline)
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    fn upsampler(&self) -> Result<GuidedUpsampler, PipelineError> {
        let upscale = &self.config.upscale;
        let upsampler = GuidedUpsampler::new(upscale.factor, upscale.method)?;
        Ok(match upscale.refine {
            Some(params) => upsampler.with_refinement(params)?,
            None => upsampler,
        })
    }

    /// Synthesize the PPI of `stack` with the configured method.
    pub fn synthesize(&self, stack: &ChannelStack) -> Result<PpiBand, PipelineError> {
        let generator = PpiGenerator::new(stack, self.config.ppi_method())?;
        Ok(generator.generate().clone())
    }

    /// Run every stage on the bands in `input_dir`, writing into `output_dir`.
    pub fn run(&self, input_dir: &Path, output_dir: &Path) -> Result<RunReport, PipelineError> {
        let optimize = self.config.output.optimize_png;
        let method = self.config.ppi_method().name();
        std::fs::create_dir_all(output_dir)?;
        let mut files = Vec::new();

        let stack = load_channels(input_dir)?;

        let band = self.synthesize(&stack)?;
        let ppi = band.plane();
        let ppi_name = format!("ppi_{method}.png");
        save_plane(&output_dir.join(&ppi_name), ppi, optimize)?;
        files.push(ppi_name);
        tracing::info!(method, shape = ?ppi.shape(), "Generated PPI");

        if self.config.output.save_guide {
            let guide = GuideBuilder::new().build(&stack);
            save_normalized(&output_dir.join("guide.png"), &guide, optimize)?;
            files.push("guide.png".to_string());
        }

        let upsampler = self.upsampler()?;
        let ppi_up = upsampler.upscale(ppi, Some(&stack))?;
        let up_name = format!(
            "ppi_{method}_{}x_{}.png",
            upsampler.scale(),
            upsampler.method()
        );
        save_plane(&output_dir.join(&up_name), &ppi_up, optimize)?;
        files.push(up_name);
        tracing::info!(
            factor = upsampler.scale(),
            upscale_method = %upsampler.method(),
            shape = ?ppi_up.shape(),
            "Upscaled PPI"
        );

        let mut upscaled_channels = 0;
        if self.config.output.save_channels {
            if ppi_up.shape() == (2 * stack.height(), 2 * stack.width()) {
                let channels = SpectralUpsampler::new(2.0)?
                    .workers(self.config.workers)
                    .upsample_all(&stack, ppi, &ppi_up)?;
                let dir_name = "channels_2x";
                for (label, plane) in channels.iter() {
                    let name = format!("{dir_name}/{label}.png");
                    save_plane(&output_dir.join(&name), plane, optimize)?;
                    files.push(name);
                }
                upscaled_channels = channels.len();
                tracing::info!(channels = upscaled_channels, "Reconstructed channels at 2x");
            } else {
                tracing::warn!(
                    factor = upsampler.scale(),
                    "Channel reconstruction needs a 2x PPI, skipping channels"
                );
            }
        }

        let report = RunReport {
            ppi: band.statistics(),
            upscaled_ppi: Some(UpscaledStatistics {
                method: upsampler.method().to_string(),
                factor: upsampler.scale(),
                shape: ppi_up.shape(),
                stats: ppi_up.stats(),
            }),
            num_channels: stack.len(),
            input_shape: stack.shape(),
            upscaled_channels,
            files,
        };

        let json = serde_json::to_string_pretty(&report)
            .map_err(|e| PipelineError::Config(format!("failed to serialize statistics: {e}")))?;
        std::fs::write(output_dir.join(STATISTICS_FILE), json)?;

        Ok(report)
    }

    /// Synthesize and write only the PPI.
    pub fn write_ppi(&self, input_dir: &Path, output: &Path) -> Result<PpiStatistics, PipelineError> {
        let stack = load_channels(input_dir)?;
        let band = self.synthesize(&stack)?;
        save_plane(output, band.plane(), self.config.output.optimize_png)?;
        Ok(band.statistics())
    }

    /// Build and write only the guide image.
    pub fn write_guide(&self, input_dir: &Path, output: &Path) -> Result<(usize, usize), PipelineError> {
        let stack = load_channels(input_dir)?;
        let guide = GuideBuilder::new().build(&stack);
        save_normalized(output, &guide, self.config.output.optimize_png)?;
        Ok(guide.shape())
    }

    /// Upscale a single greyscale image; guided mode uses its own edges.
    pub fn upscale_file(&self, input: &Path, output: &Path) -> Result<(usize, usize), PipelineError> {
        let bytes = std::fs::read(input)?;
        let image = decode_luma(&bytes)
            .map_err(|e| PipelineError::PngDecode(format!("{}: {e}", input.display())))?;
        let upscaled = self.upsampler()?.upscale(&image, None)?;
        save_plane(output, &upscaled, self.config.output.optimize_png)?;
        Ok(upscaled.shape())
    }
}

/// Default output path for `ppi` when none is given.
pub fn default_ppi_path(output_dir: &Path, method: &str) -> PathBuf {
    output_dir.join(format!("ppi_{method}.png"))
}
