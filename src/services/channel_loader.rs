use std::path::{Path, PathBuf};

use ppi_core::{ChannelStack, CoreError};
use regex::Regex;

use crate::error::PipelineError;
use crate::rendering::decode_luma;

/// `<wavelength>nm.png`, extension case-insensitive
const CHANNEL_PATTERN: &str = r"^(\d+)nm\.(?i:png)$";

fn channel_pattern() -> Result<Regex, PipelineError> {
    Regex::new(CHANNEL_PATTERN).map_err(|e| PipelineError::Config(e.to_string()))
}

/// One band file found in an input directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelFile {
    pub path: PathBuf,
    /// File stem, e.g. `"410nm"`
    pub label: String,
    pub wavelength_nm: u32,
}

/// Band files in `dir`, sorted by file name.
///
/// Names are compared as strings, so `1000nm.png` sorts before `410nm.png`.
pub fn list_channel_files(dir: &Path) -> Result<Vec<ChannelFile>, PipelineError> {
    let pattern = channel_pattern()?;
    let mut files = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        if !entry.file_type()?.is_file() {
            continue;
        }
        let name = entry.file_name();
        let Some(name) = name.to_str() else {
            continue;
        };
        let Some(caps) = pattern.captures(name) else {
            continue;
        };
        let wavelength_nm = match caps[1].parse() {
            Ok(nm) => nm,
            Err(e) => {
                tracing::warn!(file = name, %e, "Skipping band with unusable wavelength");
                continue;
            }
        };
        let label = name[..name.len() - ".png".len()].to_string();
        files.push(ChannelFile {
            path: entry.path(),
            label,
            wavelength_nm,
        });
    }
    files.sort_by(|a, b| a.path.file_name().cmp(&b.path.file_name()));
    Ok(files)
}

/// Load every `<wavelength>nm.png` in `dir` as one channel stack.
///
/// # Errors
///
/// - `InputNotFound` when no file matches
/// - `ShapeMismatch` when the bands differ in size
pub fn load_channels(dir: &Path) -> Result<ChannelStack, PipelineError> {
    let files = list_channel_files(dir)?;
    if files.is_empty() {
        return Err(CoreError::InputNotFound(format!(
            "no <wavelength>nm.png files in {}",
            dir.display()
        ))
        .into());
    }

    let mut channels = Vec::with_capacity(files.len());
    let mut labels = Vec::with_capacity(files.len());
    for file in files {
        let bytes = std::fs::read(&file.path)?;
        let plane = decode_luma(&bytes)
            .map_err(|e| PipelineError::PngDecode(format!("{}: {e}", file.path.display())))?;
        tracing::debug!(label = %file.label, shape = ?plane.shape(), "Loaded channel");
        channels.push(plane);
        labels.push(file.label);
    }

    let stack = ChannelStack::with_labels(channels, labels)?;
    tracing::info!(
        channels = stack.len(),
        height = stack.height(),
        width = stack.width(),
        "Loaded channel stack"
    );
    Ok(stack)
}
