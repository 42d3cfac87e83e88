//! Greyscale PNG encoding and single-band decoding.

use std::io::Cursor;
use std::path::Path;

use ppi_core::guide::min_max_normalize;
use ppi_core::Plane;

use crate::error::PipelineError;

/// Decode a PNG into one floating-point band in `[0, 255]`.
///
/// Palette and low-bit images are expanded and 16-bit samples stripped to
/// 8 bits. Colour images are reduced to ITU-R 601-2 luma; alpha is ignored.
pub fn decode_luma(bytes: &[u8]) -> Result<Plane, PipelineError> {
    let mut decoder = png::Decoder::new(Cursor::new(bytes));
    decoder.set_transformations(png::Transformations::EXPAND | png::Transformations::STRIP_16);
    let mut reader = decoder
        .read_info()
        .map_err(|e| PipelineError::PngDecode(e.to_string()))?;

    let mut buf = vec![0; reader.output_buffer_size()];
    let info = reader
        .next_frame(&mut buf)
        .map_err(|e| PipelineError::PngDecode(e.to_string()))?;
    let data = &buf[..info.buffer_size()];

    let samples = info.color_type.samples();
    let (width, height) = (info.width as usize, info.height as usize);
    let mut luma = Vec::with_capacity(width * height);
    for y in 0..height {
        let row = &data[y * info.line_size..(y + 1) * info.line_size];
        for px in row.chunks_exact(samples).take(width) {
            let value = match info.color_type {
                png::ColorType::Grayscale | png::ColorType::GrayscaleAlpha => px[0],
                png::ColorType::Rgb | png::ColorType::Rgba => rgb_to_luma(px[0], px[1], px[2]),
                png::ColorType::Indexed => {
                    return Err(PipelineError::PngDecode(
                        "indexed image was not expanded".to_string(),
                    ))
                }
            };
            luma.push(value as f64);
        }
    }

    Plane::new(luma, width, height).map_err(PipelineError::from)
}

/// ITU-R 601-2 luma in 16-bit fixed point.
#[inline]
pub fn rgb_to_luma(r: u8, g: u8, b: u8) -> u8 {
    ((19595 * r as u32 + 38470 * g as u32 + 7471 * b as u32 + 32768) >> 16) as u8
}

/// Clamp to `[0, 255]` and truncate to 8 bits.
pub fn quantize(plane: &Plane) -> Vec<u8> {
    plane
        .as_slice()
        .iter()
        .map(|&v| v.clamp(0.0, 255.0) as u8)
        .collect()
}

/// Stretch `[min, max]` onto `[0, 255]` and truncate; flat planes become 0.
pub fn quantize_normalized(plane: &Plane) -> Vec<u8> {
    quantize(&min_max_normalize(plane).map(|v| v * 255.0))
}

/// Encode 8-bit greyscale samples as PNG, optionally recompressed with oxipng.
pub fn encode_gray8(
    width: usize,
    height: usize,
    samples: &[u8],
    optimize: bool,
) -> Result<Vec<u8>, PipelineError> {
    let mut buf = Cursor::new(Vec::new());
    {
        let mut encoder = png::Encoder::new(&mut buf, width as u32, height as u32);
        encoder.set_color(png::ColorType::Grayscale);
        encoder.set_depth(png::BitDepth::Eight);
        encoder.set_compression(png::Compression::Fast);
        let mut writer = encoder
            .write_header()
            .map_err(|e| PipelineError::PngEncode(e.to_string()))?;
        writer
            .write_image_data(samples)
            .map_err(|e| PipelineError::PngEncode(e.to_string()))?;
    }
    let png_bytes = buf.into_inner();

    if !optimize {
        return Ok(png_bytes);
    }
    Ok(oxipng::optimize_from_memory(
        &png_bytes,
        &oxipng::Options {
            strip: oxipng::StripChunks::Safe,
            optimize_alpha: false,
            ..Default::default()
        },
    )
    .unwrap_or(png_bytes))
}

/// Write `plane` clamped and truncated to 8 bits.
pub fn save_plane(path: &Path, plane: &Plane, optimize: bool) -> Result<(), PipelineError> {
    write_gray8(path, plane, &quantize(plane), optimize)
}

/// Write `plane` min-max stretched to the full 8-bit range.
pub fn save_normalized(path: &Path, plane: &Plane, optimize: bool) -> Result<(), PipelineError> {
    write_gray8(path, plane, &quantize_normalized(plane), optimize)
}

fn write_gray8(
    path: &Path,
    plane: &Plane,
    samples: &[u8],
    optimize: bool,
) -> Result<(), PipelineError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let bytes = encode_gray8(plane.width(), plane.height(), samples, optimize)?;
    std::fs::write(path, &bytes)?;
    tracing::debug!(path = %path.display(), bytes = bytes.len(), "Wrote PNG");
    Ok(())
}
