//! Printer configuration
//!
//! All layout settings are captured here and read exactly once, when a
//! pretty stream is constructed. Changing a config after a stream exists
//! has no effect on that stream.

use crate::dispatch::DispatchTable;
use std::rc::Rc;

/// Default right margin in columns
pub const DEFAULT_MARGIN: usize = 80;

/// Configuration for pretty-printing
#[derive(Clone)]
pub struct PrinterConfig {
    /// Target line length in columns
    pub right_margin: usize,
    /// Threshold below which miser mode activates; `None` disables miser mode
    pub miser_width: Option<usize>,
    /// Total budget for emitted lines; output is truncated with ` ..` when hit
    pub lines: Option<usize>,
    /// When set, disables line-budget truncation
    pub readably: bool,
    /// Dispatch table consulted by the object printer
    pub dispatch: Rc<DispatchTable>,
}

impl Default for PrinterConfig {
    fn default() -> Self {
        PrinterConfig {
            right_margin: DEFAULT_MARGIN,
            miser_width: None,
            lines: None,
            readably: false,
            dispatch: Rc::new(DispatchTable::initial()),
        }
    }
}

impl PrinterConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the right margin
    pub fn with_margin(mut self, margin: usize) -> Self {
        self.right_margin = margin;
        self
    }

    /// Set the miser width threshold
    pub fn with_miser_width(mut self, width: usize) -> Self {
        self.miser_width = Some(width);
        self
    }

    /// Set the line budget
    pub fn with_lines(mut self, lines: usize) -> Self {
        self.lines = Some(lines);
        self
    }

    /// Set the dispatch table
    pub fn with_dispatch(mut self, table: DispatchTable) -> Self {
        self.dispatch = Rc::new(table);
        self
    }
}
