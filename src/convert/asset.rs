use std::fs;
use std::path::{Path, PathBuf};

use super::discovery::ordinal;
use crate::error::ConvertError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageAsset {
    pub path: PathBuf,
    pub ordinal: Option<i128>,
    pub width: u32,
    pub height: u32,
    pub size: u64,
}

impl ImageAsset {
    /// Reads dimensions from the image header and size from metadata.
    pub fn read(path: &Path) -> Result<Self, ConvertError> {
        let (width, height) =
            image::image_dimensions(path).map_err(|e| ConvertError::image(path, e))?;
        let size = fs::metadata(path)
            .map_err(|e| ConvertError::io(path, e))?
            .len();
        let ordinal = path
            .file_name()
            .and_then(|name| name.to_str())
            .and_then(ordinal);

        Ok(ImageAsset {
            path: path.to_path_buf(),
            ordinal,
            width,
            height,
            size,
        })
    }

    pub fn size_in_mb(&self) -> String {
        format_mb(self.size)
    }
}

pub fn format_mb(bytes: u64) -> String {
    format!("{:.2}MB", bytes as f64 / (1024.0 * 1024.0))
}
