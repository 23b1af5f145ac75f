use catfont::{CatfontResult, FontOptions, FontWriter, OtfWriter, SvgFontWriter, build_font};

use crate::cli::{FontCommand, FontFormatArg, FontOptionsArgs, GlobalOptions};

/// Build the font from the SVG directory and print where it went.
pub fn build(global: &GlobalOptions, args: &FontOptionsArgs) -> CatfontResult<()> {
    match args.font_format {
        FontFormatArg::Otf => build_with(&OtfWriter, global, args),
        FontFormatArg::Svg => build_with(&SvgFontWriter, global, args),
    }
}

fn build_with<W: FontWriter>(
    writer: &W,
    global: &GlobalOptions,
    args: &FontOptionsArgs,
) -> CatfontResult<()> {
    let options = FontOptions::from(args);
    let set = build_font(writer, &global.svg_dir, &global.font_output, &options)?;
    println!(
        "Font generated: {} ({} glyphs, {} files skipped)",
        global.font_output.display(),
        set.glyphs.len(),
        set.skipped.len()
    );
    Ok(())
}

/// The main function to run the font command.
pub fn run(global: &GlobalOptions, cmd: FontCommand) -> CatfontResult<()> {
    build(global, &cmd.font_options)
}
