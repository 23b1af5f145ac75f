use catfont::CatfontError;

pub fn report_error(err: &CatfontError) {
    match err {
        CatfontError::Io(io) if io.kind() == std::io::ErrorKind::NotFound => {
            eprintln!("{err}");
            eprintln!();
            eprintln!("Check the directory options:");
            eprintln!("  - Use --input-dir / --svg-dir / --font-output");
            eprintln!(
                "  - Or set the environment variables {}, {}, {}",
                catfont::ENV_INPUT_DIR,
                catfont::ENV_SVG_DIR,
                catfont::ENV_FONT_OUTPUT
            );
        }
        _ => {
            eprintln!("{err}");
        }
    }
}
