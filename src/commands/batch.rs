use std::path::Path;

use catfont::{
    BatchOptions, BatchReport, CatfontError, CatfontResult, MaskTracer, Vectorizer, run_batch,
};

use crate::cli::{BatchCommand, GlobalOptions, TraceOptionsArgs};

use super::utils::{WithVectorizer, with_vectorizer};

struct ConvertAll<'a> {
    input_dir: &'a Path,
    output_dir: &'a Path,
    options: BatchOptions,
}

impl WithVectorizer for ConvertAll<'_> {
    type Output = BatchReport;

    fn call<T: MaskTracer>(self, vectorizer: &Vectorizer<T>) -> CatfontResult<BatchReport> {
        run_batch(vectorizer, self.input_dir, self.output_dir, &self.options)
    }
}

/// Convert the input directory and print the summary.
///
/// Returns `None` when there was nothing to convert; that is reported but not an error.
pub fn convert_directory(
    global: &GlobalOptions,
    trace_options: &TraceOptionsArgs,
) -> CatfontResult<Option<BatchReport>> {
    let job = ConvertAll {
        input_dir: &global.input_dir,
        output_dir: &global.svg_dir,
        options: BatchOptions::from(global),
    };
    match with_vectorizer(trace_options, job) {
        Ok(report) => {
            println!("Conversion completed. {}", report.summary());
            println!("SVG files are saved in the '{}' directory.", global.svg_dir.display());
            Ok(Some(report))
        }
        Err(err @ CatfontError::NoInputs { .. }) => {
            println!("{err}");
            Ok(None)
        }
        Err(err) => Err(err),
    }
}

/// The main function to run the batch command.
pub fn run(global: &GlobalOptions, cmd: BatchCommand) -> CatfontResult<()> {
    convert_directory(global, &cmd.trace_options)?;
    Ok(())
}
