use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Failure of one conversion step. Always tied to the file it concerns.
#[derive(Debug, Error)]
pub enum ConvertError {
    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("image error on {}: {source}", .path.display())]
    Image {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("unsupported file format: {extension:?} (supported: {supported})")]
    UnsupportedExtension {
        extension: String,
        supported: String,
    },

    #[error("variant worker for {} panicked", .path.display())]
    WorkerPanicked { path: PathBuf },
}

impl ConvertError {
    pub fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub fn image(path: impl Into<PathBuf>, source: image::ImageError) -> Self {
        Self::Image {
            path: path.into(),
            source,
        }
    }
}

/// Problems with the command line that stop a conversion run before any work.
#[derive(Debug, Error)]
pub enum UsageError {
    #[error("input path not found: {}", .0.display())]
    InputNotFound(PathBuf),

    #[error("output directory not found: {}", .0.display())]
    OutputNotFound(PathBuf),

    #[error("an output directory is required when the input is a directory")]
    OutputRequired,
}
