use std::path::{Path, PathBuf};
use std::thread;

use super::asset::ImageAsset;
use super::discovery::{find_png_files, is_supported, SUPPORTED_EXTENSIONS};
use super::variant::{
    generate_variant, output_file_name, VariantReport, VariantSpec, ENABLED_VARIANTS,
};
use crate::error::ConvertError;

/// One variant's output path and what happened when writing it.
#[derive(Debug)]
pub struct VariantOutcome {
    pub spec: VariantSpec,
    pub output: PathBuf,
    pub result: Result<VariantReport, ConvertError>,
}

#[derive(Debug)]
pub struct ConversionResult {
    pub input: PathBuf,
    pub outcomes: Vec<VariantOutcome>,
}

impl ConversionResult {
    pub fn is_success(&self) -> bool {
        self.outcomes.iter().all(|o| o.result.is_ok())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BatchSummary {
    pub succeeded: usize,
    pub total: usize,
}

impl BatchSummary {
    pub fn failed(&self) -> usize {
        self.total - self.succeeded
    }
}

/// Writes the configured variants of each source image into `output_dir`.
#[derive(Debug, Clone)]
pub struct Converter {
    output_dir: PathBuf,
    variants: Vec<VariantSpec>,
}

impl Converter {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self::with_variants(output_dir, ENABLED_VARIANTS.to_vec())
    }

    pub fn with_variants(output_dir: impl Into<PathBuf>, variants: Vec<VariantSpec>) -> Self {
        Converter {
            output_dir: output_dir.into(),
            variants,
        }
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    pub fn variants(&self) -> &[VariantSpec] {
        &self.variants
    }

    fn output_path(&self, input: &Path, spec: &VariantSpec) -> PathBuf {
        let name = input
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        self.output_dir.join(output_file_name(&name, spec.suffix))
    }

    /// Runs every variant of `input` concurrently and waits for all of them.
    ///
    /// A failing variant never cancels its siblings; their files are still
    /// written.
    pub fn convert_single_image(&self, input: &Path) -> ConversionResult {
        self.convert_with(input, generate_variant)
    }

    fn convert_with<F>(&self, input: &Path, generate: F) -> ConversionResult
    where
        F: Fn(&VariantSpec, &Path, &Path) -> Result<VariantReport, ConvertError> + Sync,
    {
        log::info!(
            "🎨 Processing: {}",
            input.file_name().unwrap_or_default().to_string_lossy()
        );
        match ImageAsset::read(input) {
            Ok(asset) => log::info!(
                "   Original: {}x{}, {}",
                asset.width,
                asset.height,
                asset.size_in_mb()
            ),
            Err(e) => log::warn!("Could not read image info: {}", e),
        }

        let jobs: Vec<(VariantSpec, PathBuf)> = self
            .variants
            .iter()
            .map(|spec| (*spec, self.output_path(input, spec)))
            .collect();

        let generate = &generate;
        let outcomes: Vec<VariantOutcome> = thread::scope(|scope| {
            let handles: Vec<_> = jobs
                .iter()
                .map(|(spec, output)| scope.spawn(move || generate(spec, input, output)))
                .collect();

            handles
                .into_iter()
                .zip(jobs.iter())
                .map(|(handle, (spec, output))| {
                    let result = handle.join().unwrap_or_else(|_| {
                        Err(ConvertError::WorkerPanicked {
                            path: output.clone(),
                        })
                    });
                    if let Err(e) = &result {
                        log::error!(
                            "{} conversion failed ({}): {}",
                            spec.suffix,
                            input.display(),
                            e
                        );
                    }
                    VariantOutcome {
                        spec: *spec,
                        output: output.clone(),
                        result,
                    }
                })
                .collect()
        });

        ConversionResult {
            input: input.to_path_buf(),
            outcomes,
        }
    }

    /// Converts the discovered images of `input_dir` one file at a time.
    ///
    /// `limit` keeps only the first files in card order.
    pub fn convert_all(&self, input_dir: &Path, limit: Option<usize>) -> BatchSummary {
        let mut files = find_png_files(input_dir);
        if let Some(limit) = limit {
            files.truncate(limit);
        }

        let mut summary = BatchSummary {
            succeeded: 0,
            total: files.len(),
        };
        if files.is_empty() {
            log::warn!("❌ No PNG files found in {}", input_dir.display());
            return summary;
        }

        log::info!("📸 Found {} PNG file(s): {}", files.len(), files.join(", "));
        log::info!("🎯 Variants per image: {}", self.describe_variants());

        for (i, name) in files.iter().enumerate() {
            log::info!("⏳ Progress: {}/{}", i + 1, summary.total);
            if self.convert_single_image(&input_dir.join(name)).is_success() {
                summary.succeeded += 1;
            }
        }

        log::info!("✅ Succeeded: {}/{}", summary.succeeded, summary.total);
        if summary.failed() > 0 {
            log::warn!("❌ Failed: {}/{}", summary.failed(), summary.total);
        }
        summary
    }

    /// Converts one file after checking its extension.
    pub fn convert_single_file(&self, input: &Path) -> Result<bool, ConvertError> {
        if !is_supported(input) {
            return Err(ConvertError::UnsupportedExtension {
                extension: input
                    .extension()
                    .map(|e| format!(".{}", e.to_string_lossy()))
                    .unwrap_or_default(),
                supported: SUPPORTED_EXTENSIONS
                    .iter()
                    .map(|e| format!(".{}", e))
                    .collect::<Vec<_>>()
                    .join(", "),
            });
        }

        log::info!("🎯 Variants: {}", self.describe_variants());
        let success = self.convert_single_image(input).is_success();
        let name = input.file_name().unwrap_or_default().to_string_lossy();
        if success {
            log::info!("✅ {} converted", name);
        } else {
            log::error!("❌ {} failed to convert", name);
        }
        Ok(success)
    }

    fn describe_variants(&self) -> String {
        self.variants
            .iter()
            .map(|v| match v.divisor {
                Some(d) => format!("_{} (1/{} size)", v.suffix, d),
                None => format!("_{} (recompressed)", v.suffix),
            })
            .collect::<Vec<_>>()
            .join(", ")
    }
}
