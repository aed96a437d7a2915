#![deny(clippy::expect_used)]
//! pybackport Command-Line Interface
//!
//! Usage:
//!   pybackport file.py              # Transcode a file, result to stdout
//!   pybackport -                    # Read source from stdin
//!   pybackport -e "code"            # Transcode a code string
//!   pybackport -o out.py file.py    # Write the result to a file
//!   pybackport --diag file.py       # Also emit JSON diagnostics to stderr
//!   pybackport --config cfg.toml file.py

use std::env;
use std::fs;
use std::io::Read;
use std::path::Path;

use pybackport::{transcode_with_diagnostics, TranscoderConfig};

fn main() {
    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        eprintln!("Usage: pybackport <file.py | -> [-e code] [-o output] [--diag] [--config cfg.toml]");
        std::process::exit(1);
    }

    let mut input_file = None;
    let mut code_string = None;
    let mut output_file = None;
    let mut config_file = None;
    let mut emit_diagnostics = false;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "-e" | "--eval" => {
                i += 1;
                if i < args.len() {
                    code_string = Some(args[i].clone());
                }
            }
            "-o" | "--output" => {
                i += 1;
                if i < args.len() {
                    output_file = Some(args[i].clone());
                }
            }
            "--config" => {
                i += 1;
                if i < args.len() {
                    config_file = Some(args[i].clone());
                }
            }
            "--diag" => {
                emit_diagnostics = true;
            }
            "-" => {
                input_file = Some("-".to_string());
            }
            arg if !arg.starts_with('-') => {
                input_file = Some(arg.to_string());
            }
            _ => {
                eprintln!("Unknown argument: {}", args[i]);
                std::process::exit(1);
            }
        }
        i += 1;
    }

    let config = match config_file {
        Some(path) => TranscoderConfig::from_file(Path::new(&path)).unwrap_or_else(|e| {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }),
        None => TranscoderConfig::from_env(),
    };

    let source = match (code_string, input_file.as_deref()) {
        (Some(code), _) => code,
        (None, Some("-")) => {
            let mut buffer = String::new();
            if let Err(e) = std::io::stdin().read_to_string(&mut buffer) {
                eprintln!("Error: failed to read stdin: {}", e);
                std::process::exit(1);
            }
            buffer
        }
        (None, Some(path)) => fs::read_to_string(path).unwrap_or_else(|e| {
            eprintln!("Error: failed to read input file '{}': {}", path, e);
            std::process::exit(1);
        }),
        (None, None) => {
            eprintln!("Error: input file, '-', or -e code required");
            std::process::exit(1);
        }
    };

    let (result, diagnostics) = transcode_with_diagnostics(&source, &config);

    if emit_diagnostics && !diagnostics.is_empty() {
        match serde_json::to_string_pretty(&diagnostics) {
            Ok(json) => eprintln!("{}", json),
            Err(e) => eprintln!("Error: failed to serialize diagnostics: {}", e),
        }
    }

    match output_file {
        Some(path) => {
            if let Err(e) = fs::write(&path, result.text) {
                eprintln!("Error: failed to write '{}': {}", path, e);
                std::process::exit(1);
            }
        }
        None => print!("{}", result.text),
    }
}
