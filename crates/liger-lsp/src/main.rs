//! `liger`: a Language Server Protocol server for Crystal.
//!
//! Usage:
//!   liger [options]
//!
//! Options:
//!   --strict     Advisory strict-mode flag, currently unconsulted by any operation
//!   --version    Show version information
//!   --help       Show this help message

use anyhow::{Context, Result};
use liger_lsp::{run_loop, LspServer};
use std::env;
use std::io::{self, BufReader};
use std::process;

fn main() {
    match try_main() {
        Ok(code) => process::exit(code),
        Err(e) => {
            eprintln!("[liger] fatal: {e:#}");
            process::exit(1);
        }
    }
}

fn try_main() -> Result<i32> {
    let args: Vec<String> = env::args().collect();
    let mut strict = false;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--strict" => strict = true,
            "--version" | "-v" => {
                println!("liger {}", env!("CARGO_PKG_VERSION"));
                return Ok(0);
            }
            "--help" | "-h" => {
                print_help();
                return Ok(0);
            }
            other => {
                eprintln!("[liger] unknown option: {other}");
                print_help();
                return Ok(1);
            }
        }
        i += 1;
    }

    let root = env::current_dir().context("failed to determine current working directory")?;
    let mut server = LspServer::new(root);
    server.strict = strict;

    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut reader = BufReader::new(stdin.lock());
    let mut writer = stdout.lock();

    Ok(run_loop(&mut server, &mut reader, &mut writer))
}

fn print_help() {
    eprintln!("liger: a Language Server Protocol server for Crystal");
    eprintln!();
    eprintln!("Usage: liger [options]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --strict     Advisory strict-mode flag");
    eprintln!("  --version    Show version information");
    eprintln!("  --help       Show this help message");
    eprintln!();
    eprintln!("Communicates over stdio using the LSP Base Protocol.");
}
