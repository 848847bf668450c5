//! jsonck CLI.
//!
//! Reads a named file, parses it as one complete JSON document, and
//! reports either the value's type or a caret-marked syntax diagnostic.

use clap::Parser;
use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use json_grammar::{parse_with_limits, Limits, ParseError};

#[derive(Parser)]
#[command(name = "jsonck")]
#[command(about = "Parse a JSON file and report syntax errors", long_about = None)]
#[command(version)]
struct Cli {
    /// Path to the JSON document
    file: PathBuf,

    /// Use relaxed resource limits (larger inputs, deeper nesting)
    #[arg(long)]
    relaxed: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let source = match fs::read_to_string(&cli.file) {
        Ok(source) => source,
        Err(e) => {
            eprintln!("error: cannot read {}: {}", cli.file.display(), e);
            return ExitCode::FAILURE;
        }
    };

    let limits = if cli.relaxed {
        Limits::relaxed()
    } else {
        Limits::standard()
    };

    match parse_with_limits(&source, limits) {
        Ok(value) => {
            println!("ok: {}", value.type_name());
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("error: {}", err);
            if let ParseError::Syntax(syntax) = &err {
                eprintln!("{}", syntax.render());
            }
            ExitCode::FAILURE
        }
    }
}
