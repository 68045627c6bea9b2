//! 16-bit grayscale PNG export for scalar fields.

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use image::codecs::png::{CompressionType, FilterType, PngEncoder};
use image::{ImageBuffer, ImageEncoder, Luma};
use thiserror::Error;

use crate::terrain::Grid;

/// Errors that can occur during PNG export.
#[derive(Error, Debug)]
pub enum ExportError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Image encoding error: {0}")]
    Image(#[from] image::ImageError),
    #[error("Invalid value range: min ({0}) >= max ({1})")]
    InvalidRange(f64, f64),
    #[error("Grid of {0}x{1} cells is too large for an image")]
    TooLarge(usize, usize),
}

/// Options for scalar PNG export.
#[derive(Debug, Clone)]
pub struct PngExportOptions {
    /// Value mapped to black.
    pub min_value: f64,
    /// Value mapped to white.
    pub max_value: f64,
    /// PNG compression type.
    pub compression: CompressionType,
    /// PNG filter type.
    pub filter: FilterType,
}

impl Default for PngExportOptions {
    fn default() -> Self {
        Self {
            min_value: 0.0,
            max_value: 1.0,
            compression: CompressionType::Default,
            filter: FilterType::Adaptive,
        }
    }
}

impl PngExportOptions {
    /// Creates options spanning the grid's own value range.
    ///
    /// A constant grid gets a unit-wide range so it still exports.
    pub fn auto_range(grid: &Grid<f64>) -> Self {
        let (min, max) = grid.range();
        let max = if max > min { max } else { min + 1.0 };
        Self {
            min_value: min,
            max_value: max,
            ..Default::default()
        }
    }
}

/// Converts grid dimensions into image dimensions.
pub(crate) fn image_size<T>(grid: &Grid<T>) -> Result<(u32, u32), ExportError> {
    let too_large = || ExportError::TooLarge(grid.width(), grid.height());
    let w = u32::try_from(grid.width()).map_err(|_| too_large())?;
    let h = u32::try_from(grid.height()).map_err(|_| too_large())?;
    Ok((w, h))
}

/// Exports a scalar field as a 16-bit grayscale PNG, row `z` as image row.
pub fn export_scalar_png(
    grid: &Grid<f64>,
    path: &Path,
    options: &PngExportOptions,
) -> Result<(), ExportError> {
    let min = options.min_value;
    let max = options.max_value;
    if !(min < max) {
        return Err(ExportError::InvalidRange(min, max));
    }

    let (width, height) = image_size(grid)?;
    let range = max - min;

    let mut img: ImageBuffer<Luma<u16>, Vec<u16>> = ImageBuffer::new(width, height);
    for (i, &v) in grid.iter().enumerate() {
        let (x, z) = grid.coords(i);
        let normalized = ((v - min) / range).clamp(0.0, 1.0);
        let value = (normalized * 65535.0) as u16;
        img.put_pixel(x as u32, z as u32, Luma([value]));
    }

    let file = File::create(path)?;
    let writer = BufWriter::new(file);
    let encoder = PngEncoder::new_with_quality(writer, options.compression, options.filter);

    // Convert u16 slice to bytes for the encoder
    let byte_slice: &[u8] = bytemuck::cast_slice(img.as_raw());
    encoder.write_image(byte_slice, width, height, image::ExtendedColorType::L16)?;

    Ok(())
}
