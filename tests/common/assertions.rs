//! Assertion helpers for tests.

use std::path::Path;

use ppi_core::Plane;
use ppi_upscale::rendering::decode_luma;
use pretty_assertions::assert_eq;

/// Decode a PNG written by the pipeline.
pub fn read_png(path: &Path) -> Plane {
    let bytes = std::fs::read(path)
        .unwrap_or_else(|e| panic!("Failed to read {}: {e}", path.display()));
    decode_luma(&bytes).unwrap_or_else(|e| panic!("Failed to decode {}: {e}", path.display()))
}

/// Assert `path` is a PNG with the given `(height, width)`.
pub fn assert_png_shape(path: &Path, expected: (usize, usize)) {
    assert!(path.exists(), "Expected {} to exist", path.display());
    assert_eq!(
        read_png(path).shape(),
        expected,
        "Unexpected shape for {}",
        path.display()
    );
}

/// Assert every sample of `plane` equals `value`.
pub fn assert_uniform(plane: &Plane, value: f64) {
    for (i, &v) in plane.as_slice().iter().enumerate() {
        assert_eq!(v, value, "Sample {i} differs");
    }
}
