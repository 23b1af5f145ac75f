use catfont::{CatfontResult, RenameOptions, rename_to_letters};

use crate::cli::GlobalOptions;

/// The main function to run the rename command.
pub fn run(global: &GlobalOptions) -> CatfontResult<()> {
    let options = RenameOptions::from(global);
    let report = rename_to_letters(&global.input_dir, &options)?;
    println!(
        "Renamed {} files ({} skipped, {} failed) in {}",
        report.renamed(),
        report.skipped(),
        report.failed(),
        global.input_dir.display()
    );
    if report.leftover > 0 {
        println!("{} files were left unchanged: no letters left.", report.leftover);
    }
    Ok(())
}
