//! Test fixtures: synthetic band directories on disk.

use std::path::{Path, PathBuf};

use ppi_core::Plane;
use ppi_upscale::models::PipelineConfig;
use ppi_upscale::rendering::encode_gray8;
use ppi_upscale::rendering::png_codec::quantize;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tempfile::TempDir;

/// Wavelengths used by [`TestWorkspace::with_bands`].
pub fn wavelength(index: usize) -> u32 {
    400 + 20 * index as u32
}

/// Input and output directories that disappear with the test.
pub struct TestWorkspace {
    root: TempDir,
}

impl TestWorkspace {
    pub fn new() -> Self {
        let root = tempfile::tempdir().expect("Failed to create temp dir");
        std::fs::create_dir(root.path().join("data")).expect("Failed to create data dir");
        Self { root }
    }

    /// `count` smooth random bands of `width` x `height`.
    pub fn with_bands(count: usize, width: usize, height: usize, seed: u64) -> Self {
        let workspace = Self::new();
        let mut rng = StdRng::seed_from_u64(seed);
        for i in 0..count {
            let gain = rng.gen_range(0.6..1.2);
            let offset = rng.gen_range(20.0..60.0);
            let plane = Plane::from_fn(width, height, |y, x| {
                let step = if x >= width / 2 { 80.0 } else { 0.0 };
                let structure = step + 4.0 * y as f64;
                offset + gain * structure + rng.gen_range(-5.0..5.0)
            });
            workspace.write_band(&format!("{}nm.png", wavelength(i)), &plane);
        }
        workspace
    }

    pub fn input(&self) -> PathBuf {
        self.root.path().join("data")
    }

    pub fn output(&self) -> PathBuf {
        self.root.path().join("output")
    }

    /// Write `plane` as an 8-bit greyscale PNG into the input directory.
    pub fn write_band(&self, name: &str, plane: &Plane) -> PathBuf {
        let path = self.input().join(name);
        write_gray_png(&path, plane);
        path
    }

    /// Write raw bytes (not necessarily an image) into the input directory.
    pub fn write_file(&self, name: &str, bytes: &[u8]) -> PathBuf {
        let path = self.input().join(name);
        std::fs::write(&path, bytes).expect("Failed to write file");
        path
    }
}

pub fn write_gray_png(path: &Path, plane: &Plane) {
    let bytes = encode_gray8(plane.width(), plane.height(), &quantize(plane), false)
        .expect("Failed to encode PNG");
    std::fs::write(path, bytes).expect("Failed to write PNG");
}

/// Encode an 8-bit RGB image.
pub fn rgb_png(width: u32, height: u32, pixel: [u8; 3]) -> Vec<u8> {
    let mut buf = Vec::new();
    {
        let mut encoder = png::Encoder::new(&mut buf, width, height);
        encoder.set_color(png::ColorType::Rgb);
        encoder.set_depth(png::BitDepth::Eight);
        let mut writer = encoder.write_header().expect("Failed to write header");
        let data: Vec<u8> = (0..width * height).flat_map(|_| pixel).collect();
        writer
            .write_image_data(&data)
            .expect("Failed to write image data");
    }
    buf
}

/// Defaults without oxipng, which only slows tests down.
pub fn fast_config() -> PipelineConfig {
    let mut config = PipelineConfig::default();
    config.output.optimize_png = false;
    config
}
