use std::path::{Path, PathBuf};

use super::discovery::{classify_path, PathKind};
use super::pipeline::{BatchSummary, Converter};
use crate::args::ConvertArgs;
use crate::error::{ConvertError, UsageError};

/// Files converted by `--test` in directory mode.
pub const TEST_MODE_LIMIT: usize = 3;

#[derive(Debug, PartialEq, Eq)]
pub enum RunOutcome {
    Batch(BatchSummary),
    /// `None` when the file was skipped for its extension.
    SingleFile(Option<bool>),
}

fn existing_output(output: &Path) -> Result<PathBuf, UsageError> {
    if output.exists() {
        Ok(output.to_path_buf())
    } else {
        Err(UsageError::OutputNotFound(output.to_path_buf()))
    }
}

/// Validates the paths, picks the mode and runs it.
///
/// Per-file failures are reported through the outcome, never as an error.
pub fn run(args: &ConvertArgs) -> Result<RunOutcome, UsageError> {
    match classify_path(&args.input) {
        PathKind::NotFound => Err(UsageError::InputNotFound(args.input.clone())),
        PathKind::File => {
            log::info!("📄 Single file mode");
            let output_dir = match &args.output {
                Some(output) => existing_output(output)?,
                None => args
                    .input
                    .parent()
                    .map(Path::to_path_buf)
                    .unwrap_or_default(),
            };
            let converter = Converter::new(output_dir);
            log::info!("📁 Input file: {}", args.input.display());
            log::info!("📁 Output directory: {}", converter.output_dir().display());
            if args.test {
                log::info!("🧪 Single file test mode");
            }

            let converted = match converter.convert_single_file(&args.input) {
                Ok(success) => Some(success),
                Err(e @ ConvertError::UnsupportedExtension { .. }) => {
                    log::error!("❌ {}", e);
                    None
                }
                Err(e) => {
                    log::error!("❌ Conversion error: {}", e);
                    Some(false)
                }
            };
            if args.test && converted == Some(true) {
                log::info!("🧪 Test complete, check the results.");
            }
            Ok(RunOutcome::SingleFile(converted))
        }
        PathKind::Directory => {
            log::info!("📁 Directory mode");
            let output = args.output.as_deref().ok_or(UsageError::OutputRequired)?;
            let converter = Converter::new(existing_output(output)?);
            log::info!("📁 Input directory: {}", args.input.display());
            log::info!("📁 Output directory: {}", converter.output_dir().display());

            let limit = if args.test {
                log::info!("🧪 Test mode: only the first {} files", TEST_MODE_LIMIT);
                Some(TEST_MODE_LIMIT)
            } else {
                None
            };
            let summary = converter.convert_all(&args.input, limit);
            if args.test && summary.total > 0 {
                log::info!("🧪 Test complete, check the results.");
            }
            Ok(RunOutcome::Batch(summary))
        }
    }
}
