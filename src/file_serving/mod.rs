pub mod handlers;
mod path_utils;

use percent_encoding::percent_decode_str;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::logging::LoggingExt;

pub use path_utils::{resolve_request_path, ResolvedPath};

/// A file read from under the document root, ready to be written out.
#[derive(Debug)]
pub struct ServedFile {
    pub path: PathBuf,
    pub content: Vec<u8>,
    pub mime_type: String,
}

#[derive(Debug)]
pub enum ServeOutcome {
    Found(ServedFile),
    /// The target resolves outside the document root.
    Forbidden,
    /// Carries the decoded request path for the error page.
    NotFound(String),
    Failed(io::Error),
}
