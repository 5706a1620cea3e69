//! Error types for parenpress

use miette::Diagnostic;
use thiserror::Error;

/// Result type alias for parenpress operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for parenpress
#[derive(Error, Diagnostic, Debug)]
pub enum Error {
    #[error("Read error: {message}")]
    #[diagnostic(code(parenpress::read_error))]
    ReadError {
        message: String,
        #[label("here")]
        span: Option<(usize, usize)>,
    },

    #[error("Invalid type specifier: {spec}")]
    #[diagnostic(code(parenpress::invalid_type_spec))]
    InvalidTypeSpec { spec: String },

    #[error("The standard pprint dispatch table is read-only")]
    #[diagnostic(
        code(parenpress::standard_table_frozen),
        help("call copy_pprint_dispatch first and mutate the copy")
    )]
    StandardTableFrozen,

    /// Internal signal raised when the configured line budget is hit.
    /// Caught by `with_pretty_stream`; never escapes the top-level driver.
    #[error("Line limit reached")]
    #[diagnostic(code(parenpress::line_limit))]
    LineLimitReached,

    #[error("IO error: {0}")]
    #[diagnostic(code(parenpress::io_error))]
    IoError(#[from] std::io::Error),

    #[error("Output error: {0}")]
    #[diagnostic(code(parenpress::sink_error))]
    SinkError(#[from] std::fmt::Error),
}
