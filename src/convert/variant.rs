use image::codecs::png::{CompressionType, FilterType as PngFilter, PngEncoder};
use image::imageops::FilterType;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

use super::asset::format_mb;
use crate::error::ConvertError;

/// A fixed transformation producing one derived copy of a source image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VariantSpec {
    pub suffix: &'static str,
    /// Each side is divided by this; `None` keeps the source size.
    pub divisor: Option<u32>,
    pub quality: u8,
    pub compression_level: u8,
    pub progressive: bool,
}

pub const MEDIUM: VariantSpec = VariantSpec {
    suffix: "md",
    divisor: Some(3),
    quality: 85,
    compression_level: 6,
    progressive: false,
};

pub const SMALL: VariantSpec = VariantSpec {
    suffix: "sm",
    divisor: Some(10),
    quality: 90,
    compression_level: 6,
    progressive: false,
};

/// Full-size recompression. Kept out of [`ENABLED_VARIANTS`] for disk space.
pub const LOW: VariantSpec = VariantSpec {
    suffix: "low",
    divisor: None,
    quality: 70,
    compression_level: 9,
    progressive: true,
};

pub const ENABLED_VARIANTS: [VariantSpec; 2] = [MEDIUM, SMALL];

impl VariantSpec {
    fn compression(&self) -> CompressionType {
        if self.compression_level >= 7 {
            CompressionType::Best
        } else {
            CompressionType::Default
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariantReport {
    pub source_dimensions: (u32, u32),
    pub dimensions: (u32, u32),
    pub source_size: u64,
    pub size: u64,
}

/// `card.PNG` + `md` gives `card_md.PNG`.
pub fn output_file_name(original: &str, suffix: &str) -> String {
    let path = Path::new(original);
    let stem = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or(original);
    match path.extension().and_then(|e| e.to_str()) {
        Some(ext) => format!("{}_{}.{}", stem, suffix, ext),
        None => format!("{}_{}", stem, suffix),
    }
}

fn scale_side(side: u32, divisor: u32) -> u32 {
    let scaled = (f64::from(side) / f64::from(divisor)).round() as u32;
    scaled.clamp(1, side.max(1))
}

/// Rounded target size, never larger than the source and never zero.
pub fn target_dimensions(width: u32, height: u32, divisor: Option<u32>) -> (u32, u32) {
    match divisor {
        Some(d) if d > 0 => (scale_side(width, d), scale_side(height, d)),
        _ => (width, height),
    }
}

/// Writes one variant of `input` to `output`, replacing any existing file.
pub fn generate_variant(
    spec: &VariantSpec,
    input: &Path,
    output: &Path,
) -> Result<VariantReport, ConvertError> {
    let source = image::open(input).map_err(|e| ConvertError::image(input, e))?;
    let source_dimensions = (source.width(), source.height());
    let (width, height) = target_dimensions(source.width(), source.height(), spec.divisor);

    let resized = if (width, height) == source_dimensions {
        source
    } else {
        source.resize_exact(width, height, FilterType::Lanczos3)
    };

    log::debug!(
        "Encoding {} (quality {}, compression {}, progressive {})",
        output.display(),
        spec.quality,
        spec.compression_level,
        spec.progressive
    );
    let file = File::create(output).map_err(|e| ConvertError::io(output, e))?;
    let mut writer = BufWriter::new(file);
    let encoder =
        PngEncoder::new_with_quality(&mut writer, spec.compression(), PngFilter::Adaptive);
    resized
        .write_with_encoder(encoder)
        .map_err(|e| ConvertError::image(output, e))?;
    writer.flush().map_err(|e| ConvertError::io(output, e))?;

    let source_size = fs::metadata(input)
        .map_err(|e| ConvertError::io(input, e))?
        .len();
    let size = fs::metadata(output)
        .map_err(|e| ConvertError::io(output, e))?
        .len();

    log::info!(
        "✓ {}: {} ({}x{} → {}x{}, {} → {})",
        spec.suffix,
        output.file_name().unwrap_or_default().to_string_lossy(),
        source_dimensions.0,
        source_dimensions.1,
        width,
        height,
        format_mb(source_size),
        format_mb(size)
    );

    Ok(VariantReport {
        source_dimensions,
        dimensions: (width, height),
        source_size,
        size,
    })
}
