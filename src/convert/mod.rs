//! Batch PNG variant generation.
//!
//! Discovery finds `.png`/`.PNG` files in card order, each file is turned into
//! every enabled [`VariantSpec`] concurrently, and files are processed one
//! after another. Failures are logged and counted, never fatal to the batch.

pub mod asset;
pub mod cli;
pub mod discovery;
pub mod pipeline;
pub mod variant;

pub use asset::ImageAsset;
pub use discovery::{classify_path, find_png_files, PathKind};
pub use pipeline::{BatchSummary, ConversionResult, Converter};
pub use variant::{VariantSpec, ENABLED_VARIANTS, LOW, MEDIUM, SMALL};
