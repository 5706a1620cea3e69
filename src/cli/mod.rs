//! CLI argument parsing and file discovery

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

/// parenpress - A structured pretty-printer for s-expression files
#[derive(Parser, Debug)]
#[command(name = "parenpress")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Format s-expression files
    Fmt {
        /// Write formatted output back to files
        #[arg(short, long)]
        write: bool,

        /// Right margin in columns
        #[arg(long, default_value_t = crate::config::DEFAULT_MARGIN)]
        margin: usize,

        /// Files or directories to format (use - for stdin)
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
    /// Check if files are formatted (exit code 1 if not)
    Check {
        /// Right margin in columns
        #[arg(long, default_value_t = crate::config::DEFAULT_MARGIN)]
        margin: usize,

        /// Files or directories to check
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
}

const SOURCE_EXTENSIONS: &[&str] = &["lisp", "sexp", "el"];

fn has_source_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| SOURCE_EXTENSIONS.contains(&ext))
}

/// Discover source files from a path (file, directory or glob pattern)
pub fn discover_files(path: &Path) -> Vec<PathBuf> {
    if path.is_file() {
        return vec![path.to_path_buf()];
    }

    if path.is_dir() {
        let mut files = Vec::new();
        for entry in walkdir::WalkDir::new(path)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file())
        {
            if has_source_extension(entry.path()) {
                files.push(entry.path().to_path_buf());
            }
        }
        return files;
    }

    if let Ok(paths) = glob::glob(path.to_str().unwrap_or("")) {
        return paths
            .filter_map(|p| p.ok())
            .filter(|p| p.is_file() && has_source_extension(p))
            .collect();
    }

    vec![]
}
