//! Top-down RGB preview of the simulation, colored by terrain band.

use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use image::codecs::png::{CompressionType, FilterType, PngEncoder};
use image::{ImageBuffer, ImageEncoder, Rgb};

use super::bands::BandThresholds;
use super::png::{ExportError, PngExportOptions, export_scalar_png, image_size};
use crate::erosion::Engine;

/// Options for terrain map export.
#[derive(Debug, Clone)]
pub struct TerrainMapOptions {
    pub compression: CompressionType,
    pub filter: FilterType,
    pub thresholds: BandThresholds,
}

impl Default for TerrainMapOptions {
    fn default() -> Self {
        Self {
            compression: CompressionType::Default,
            filter: FilterType::Adaptive,
            thresholds: BandThresholds::default(),
        }
    }
}

/// Exports the engine's current state as an RGB band map.
///
/// Reads only `height_at` and `water_at`; the engine is never modified.
pub fn export_terrain_png(
    engine: &Engine,
    path: &Path,
    options: &TerrainMapOptions,
) -> Result<(), ExportError> {
    let (width, height) = image_size(engine.heights())?;
    let mut img: ImageBuffer<Rgb<u8>, Vec<u8>> = ImageBuffer::new(width, height);

    for z in 0..engine.height() {
        for x in 0..engine.width() {
            let band = options
                .thresholds
                .classify(engine.height_at(x, z), engine.water_at(x, z));
            img.put_pixel(x as u32, z as u32, Rgb(band.preview_rgb()));
        }
    }

    let file = File::create(path)?;
    let writer = BufWriter::new(file);
    let encoder = PngEncoder::new_with_quality(writer, options.compression, options.filter);
    encoder.write_image(img.as_raw(), width, height, image::ExtendedColorType::Rgb8)?;

    Ok(())
}

/// Writes height, water, sediment and band maps for the current state.
///
/// Files are named `{base_name}_{field}.png` inside `output_dir`, which is
/// created if missing. Returns the written paths in that order.
pub fn export_snapshot(
    engine: &Engine,
    output_dir: &Path,
    base_name: &str,
    options: &TerrainMapOptions,
) -> Result<Vec<PathBuf>, ExportError> {
    std::fs::create_dir_all(output_dir)?;

    let mut written = Vec::with_capacity(4);
    for (field, grid) in [
        ("height", engine.heights()),
        ("water", engine.water()),
        ("sediment", engine.sediment()),
    ] {
        let path = output_dir.join(format!("{base_name}_{field}.png"));
        let png = PngExportOptions {
            compression: options.compression,
            filter: options.filter,
            ..PngExportOptions::auto_range(grid)
        };
        export_scalar_png(grid, &path, &png)?;
        written.push(path);
    }

    let path = output_dir.join(format!("{base_name}_terrain.png"));
    export_terrain_png(engine, &path, options)?;
    written.push(path);

    Ok(written)
}
