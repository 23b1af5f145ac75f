use std::path::PathBuf;

use catfont::{CatfontResult, MaskTracer, Vectorizer};

use crate::cli::ConvertCommand;

use super::utils::{WithVectorizer, derive_svg_path, with_vectorizer};

struct ConvertOne {
    input: PathBuf,
    output: PathBuf,
}

impl WithVectorizer for ConvertOne {
    type Output = ();

    fn call<T: MaskTracer>(self, vectorizer: &Vectorizer<T>) -> CatfontResult<()> {
        let conversion = vectorizer.convert(&self.input, &self.output)?;
        println!(
            "SVG saved to {} ({} paths)",
            conversion.output.display(),
            conversion.curves
        );
        Ok(())
    }
}

/// The main function to run the convert command.
pub fn run(cmd: ConvertCommand) -> CatfontResult<()> {
    let output = cmd
        .output
        .clone()
        .unwrap_or_else(|| derive_svg_path(&cmd.input));
    with_vectorizer(
        &cmd.trace_options,
        ConvertOne {
            input: cmd.input,
            output,
        },
    )
}
