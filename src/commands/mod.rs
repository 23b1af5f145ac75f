mod batch;
mod convert;
mod font;
mod rename;
mod run;
mod utils;

use crate::cli::{Cli, Commands, GlobalOptions};
use catfont::CatfontResult;

/// The main function to run the command based on CLI input.
pub fn run(cli: Cli) -> CatfontResult<()> {
    let Cli { global, command } = cli;
    dispatch(&global, command)
}

/// Dispatch the command to the appropriate handler.
fn dispatch(global: &GlobalOptions, command: Commands) -> CatfontResult<()> {
    match command {
        Commands::Rename => rename::run(global),
        Commands::Convert(cmd) => convert::run(cmd),
        Commands::Batch(cmd) => batch::run(global, cmd),
        Commands::Font(cmd) => font::run(global, cmd),
        Commands::Run(cmd) => run::run(global, cmd),
    }
}
