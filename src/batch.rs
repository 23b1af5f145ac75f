use std::fs;
use std::path::{Path, PathBuf};

use log::{info, warn};

use crate::config::BatchOptions;
use crate::error::ConvertError;
use crate::files::list_with_extension;
use crate::tracer::MaskTracer;
use crate::vectorizer::{Conversion, Vectorizer};
use crate::{CatfontError, CatfontResult};

/// Result of converting one input file.
#[derive(Debug)]
pub struct FileOutcome {
    pub input: PathBuf,
    pub result: Result<Conversion, ConvertError>,
}

/// Per-file results of a batch run, in processing order.
#[derive(Debug, Default)]
pub struct BatchReport {
    pub outcomes: Vec<FileOutcome>,
}

impl BatchReport {
    pub fn total(&self) -> usize {
        self.outcomes.len()
    }

    pub fn succeeded(&self) -> usize {
        self.outcomes.iter().filter(|o| o.result.is_ok()).count()
    }

    pub fn failures(&self) -> impl Iterator<Item = (&Path, &ConvertError)> {
        self.outcomes
            .iter()
            .filter_map(|o| o.result.as_ref().err().map(|e| (o.input.as_path(), e)))
    }

    pub fn summary(&self) -> String {
        format!(
            "Successfully converted {} out of {} files.",
            self.succeeded(),
            self.total()
        )
    }
}

/// Convert every matching image in `input_dir` into `<stem>.svg` inside `output_dir`.
///
/// The output directory is created when absent. Files are processed in name order and a
/// failing file is recorded in the report without stopping the run. Having no input at
/// all is the only error.
pub fn run_batch<T: MaskTracer>(
    vectorizer: &Vectorizer<T>,
    input_dir: &Path,
    output_dir: &Path,
    options: &BatchOptions,
) -> CatfontResult<BatchReport> {
    if !output_dir.is_dir() {
        fs::create_dir_all(output_dir)?;
        info!("Created directory: {}", output_dir.display());
    }

    let inputs = list_with_extension(input_dir, &options.extension)?;
    if inputs.is_empty() {
        return Err(CatfontError::NoInputs {
            dir: input_dir.to_path_buf(),
            extension: options.extension.clone(),
        });
    }
    info!(
        "Found {} .{} files. Starting conversion...",
        inputs.len(),
        options.extension
    );

    let outcomes = inputs
        .into_iter()
        .map(|input| {
            let mut name = input.file_stem().unwrap_or_default().to_os_string();
            name.push(".svg");
            let output = output_dir.join(name);
            let result = vectorizer.convert(&input, &output);
            if let Err(err) = &result {
                warn!("Error converting {} ({}): {err}", input.display(), err.kind());
            }
            FileOutcome { input, result }
        })
        .collect();

    Ok(BatchReport { outcomes })
}
