//! parenpress CLI - A structured pretty-printer for s-expression files

use clap::Parser;
use parenpress::cli::{discover_files, Cli, Commands};
use parenpress::PrinterConfig;
use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = Cli::parse();

    match cli.command {
        Commands::Fmt {
            write,
            margin,
            files,
        } => run_fmt(&files, write, margin),
        Commands::Check { margin, files } => run_check(&files, margin),
    }
}

/// Run the fmt command
fn run_fmt(files: &[PathBuf], write_mode: bool, margin: usize) -> ExitCode {
    let config = PrinterConfig::new().with_margin(margin);
    let mut had_errors = false;

    for file_path in files {
        if file_path == Path::new("-") {
            match format_stdin(&config) {
                Ok(formatted) => print!("{}", formatted),
                Err(e) => {
                    eprintln!("Error: {}", e);
                    had_errors = true;
                }
            }
            continue;
        }

        for entry in discover_files(file_path) {
            if let Err(e) = format_file(&entry, write_mode, &config) {
                eprintln!("{}: {}", entry.display(), e);
                had_errors = true;
            }
        }
    }

    if had_errors {
        ExitCode::from(2)
    } else {
        ExitCode::SUCCESS
    }
}

/// Run the check command
fn run_check(files: &[PathBuf], margin: usize) -> ExitCode {
    let config = PrinterConfig::new().with_margin(margin);
    let mut needs_formatting = false;
    let mut had_errors = false;

    for file_path in files {
        if file_path == Path::new("-") {
            match check_stdin(&config) {
                Ok(formatted) => {
                    if !formatted {
                        eprintln!("<stdin>: needs formatting");
                        needs_formatting = true;
                    }
                }
                Err(e) => {
                    eprintln!("Error: {}", e);
                    had_errors = true;
                }
            }
            continue;
        }

        for entry in discover_files(file_path) {
            match check_file(&entry, &config) {
                Ok(formatted) => {
                    if !formatted {
                        eprintln!("{}: needs formatting", entry.display());
                        needs_formatting = true;
                    }
                }
                Err(e) => {
                    eprintln!("{}: {}", entry.display(), e);
                    had_errors = true;
                }
            }
        }
    }

    if had_errors {
        ExitCode::from(2)
    } else if needs_formatting {
        ExitCode::from(1)
    } else {
        ExitCode::SUCCESS
    }
}

/// Format a single file, returning whether it changed
fn format_file(
    path: &Path,
    write_mode: bool,
    config: &PrinterConfig,
) -> Result<bool, parenpress::Error> {
    let contents = fs::read_to_string(path)?;
    let formatted = parenpress::format_with(&contents, config)?;

    if formatted == contents {
        if !write_mode {
            print!("{}", formatted);
        }
        return Ok(false);
    }

    if write_mode {
        fs::write(path, &formatted)?;
    } else {
        print!("{}", formatted);
    }

    Ok(true)
}

/// Check a single file
fn check_file(path: &Path, config: &PrinterConfig) -> Result<bool, parenpress::Error> {
    let contents = fs::read_to_string(path)?;
    let formatted = parenpress::format_with(&contents, config)?;
    Ok(formatted == contents)
}

/// Format from stdin
fn format_stdin(config: &PrinterConfig) -> Result<String, parenpress::Error> {
    let mut contents = String::new();
    io::stdin().read_to_string(&mut contents)?;
    parenpress::format_with(&contents, config)
}

/// Check stdin
fn check_stdin(config: &PrinterConfig) -> Result<bool, parenpress::Error> {
    let mut contents = String::new();
    io::stdin().read_to_string(&mut contents)?;
    let formatted = parenpress::format_with(&contents, config)?;
    Ok(formatted == contents)
}
