use catfont::CatfontResult;

use crate::cli::{GlobalOptions, RunCommand};

/// The main function to run the full pipeline.
pub fn run(global: &GlobalOptions, cmd: RunCommand) -> CatfontResult<()> {
    if !cmd.no_rename {
        super::rename::run(global)?;
    }
    if super::batch::convert_directory(global, &cmd.trace_options)?.is_none() {
        return Ok(());
    }
    super::font::build(global, &cmd.font_options)
}
