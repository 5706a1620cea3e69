//! Logical block bookkeeping
//!
//! A committed logical block records the columns that govern wrapping
//! inside it. The stack always holds at least the sentinel block, whose
//! fields are all zero.

use super::{grown_size, PrettyStream};

/// Per-block layout state, pushed when the driver commits a block start
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct LogicalBlock {
    /// Column at which the block started
    pub start_column: usize,
    /// Column at which the current section started
    pub section_column: usize,
    /// Columns of `prefix` occupied by per-line prefixes; indentation
    /// never retreats past this
    pub per_line_prefix_end: usize,
    /// Valid columns of the line prefix (per-line prefixes plus pad)
    pub prefix_length: usize,
    /// Valid chars at the tail of the suffix buffer
    pub suffix_length: usize,
    /// Line number at which the current section started
    pub section_start_line: usize,
}

impl PrettyStream<'_> {
    /// Move the current indentation to `column`, clamped to the per-line
    /// prefix and never retreating the space fill
    pub(crate) fn set_indentation(&mut self, column: usize) {
        let block = self.innermost();
        let current = block.prefix_length;
        let minimum = block.per_line_prefix_end;
        let column = column.max(minimum);
        if column > self.prefix.len() {
            let len = self.prefix.len();
            self.prefix.resize(grown_size(len, column - len), ' ');
        }
        if column > current {
            self.prefix[current..column].fill(' ');
        }
        self.innermost_mut().prefix_length = column;
    }

    /// Commit a block start drained from the queue
    pub(crate) fn really_start_block(
        &mut self,
        column: usize,
        per_line_prefix: Option<&str>,
        suffix: &str,
    ) {
        let prev = *self.innermost();
        self.blocks.push(LogicalBlock {
            start_column: column,
            section_column: column,
            per_line_prefix_end: prev.per_line_prefix_end,
            prefix_length: prev.prefix_length,
            suffix_length: prev.suffix_length,
            section_start_line: self.line_number,
        });
        self.set_indentation(column);
        if let Some(per_line) = per_line_prefix {
            let chars: Vec<char> = per_line.chars().collect();
            self.innermost_mut().per_line_prefix_end = column;
            self.prefix[column - chars.len()..column].copy_from_slice(&chars);
        }
        if !suffix.is_empty() {
            let additional = suffix.chars().count();
            let new_suffix_len = prev.suffix_length + additional;
            let total_len = self.suffix.len();
            if new_suffix_len > total_len {
                let new_total = grown_size(total_len, additional);
                let mut grown = vec![' '; new_total];
                grown[new_total - prev.suffix_length..]
                    .copy_from_slice(&self.suffix[total_len - prev.suffix_length..]);
                self.suffix = grown;
            }
            let total_len = self.suffix.len();
            for (i, ch) in suffix.chars().enumerate() {
                self.suffix[total_len - new_suffix_len + i] = ch;
            }
            self.innermost_mut().suffix_length = new_suffix_len;
        }
    }

    /// Pop the innermost committed block. When the surrounding indentation
    /// is deeper than the block's, the extra prefix columns are refilled
    /// with spaces.
    ///
    /// # Panics
    ///
    /// Panics if only the sentinel remains.
    pub(crate) fn really_end_block(&mut self) {
        assert!(self.blocks.len() > 1, "logical block underflow");
        let old = self.blocks.pop().expect("block stack holds a sentinel");
        let new_indent = self.innermost().prefix_length;
        if new_indent > old.prefix_length {
            self.prefix[old.prefix_length..new_indent].fill(' ');
        }
    }
}
