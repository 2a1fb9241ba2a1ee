//! Binary crate for the `powdertime` command-line tool.

use clap::Parser;
use std::process::ExitCode;

mod cli;

fn main() -> ExitCode {
    let cli = cli::Cli::parse();

    match cli.run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("❌ Error: {e:#}");
            if let Some(hint) = cli::hint_for(&e) {
                eprintln!("{hint}");
            }
            ExitCode::FAILURE
        }
    }
}
