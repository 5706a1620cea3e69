//! parenpress - A structured pretty-printer for s-expression data
//!
//! This library provides a streaming layout engine (logical blocks,
//! conditional newlines, indentation, tab stops) behind a reader, a
//! pretty-print dispatch table and the parenpress CLI.

pub mod cli;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod printers;
pub mod reader;
pub mod stream;
pub mod value;

pub use config::PrinterConfig;
pub use dispatch::DispatchTable;
pub use error::{Error, Result};
pub use printers::{output_object, output_pretty, output_ugly};
pub use stream::{with_pretty_stream, IndentKind, NewlineKind, PrettyStream, TabKind};
pub use value::Value;

/// Format source text and return the formatted result
pub fn format(input: &str) -> Result<String> {
    format_with(input, &PrinterConfig::default())
}

/// Format source text under an explicit configuration
pub fn format_with(input: &str, config: &PrinterConfig) -> Result<String> {
    let forms = reader::read_all(input)?;
    let mut out = String::new();
    for form in &forms {
        printers::output_pretty(&mut out, form, config)?;
        out.push('\n');
    }
    Ok(out)
}

/// Check if source text is already formatted
pub fn check(input: &str) -> Result<bool> {
    let formatted = format(input)?;
    Ok(formatted == input)
}
