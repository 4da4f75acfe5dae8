use std::error::Error;
use std::process::ExitCode;

use clap::Parser;

use kaleidoscope_front::{cli::Cli, repl};

fn main() -> Result<ExitCode, Box<dyn Error>> {
    env_logger::init();

    let cli = Cli::parse();

    // If a file was given, parse all of it, otherwise start up the interpreter.
    match cli.file {
        Some(path) => {
            let summary = repl::parse_file(&path, cli.inspect_tree)?;

            if summary.errors > 0 {
                log::warn!("{} top-level items failed to parse", summary.errors);
                return Ok(ExitCode::FAILURE);
            }
        }
        None => {
            repl::ast_parser_driver(&cli.prompt, cli.inspect_tree);
        }
    }

    Ok(ExitCode::SUCCESS)
}
