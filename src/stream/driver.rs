//! Break-decision driver
//!
//! `maybe_output` drains the operation queue from the front, deciding for
//! each directive whether enough of the stream is known to commit it. A
//! fill newline or block start whose section end is still unknown stops
//! the loop; more input will disambiguate it.

use super::queue::{IndentKind, NewlineKind, Op, OpId};
use super::{grown_size, PrettyStream};
use crate::error::{Error, Result};
use tracing::trace;

/// Verdict of a fit measurement
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Fitness {
    Fits,
    Overflows,
    Unknown,
}

impl PrettyStream<'_> {
    /// True when the innermost block leaves too little room and fill
    /// newlines should degrade to mandatory breaks
    pub(crate) fn misering(&self) -> bool {
        match self.miser_width {
            Some(miser_width) => {
                self.line_length
                    .saturating_sub(self.innermost().start_column)
                    <= miser_width
            }
            None => false,
        }
    }

    /// Would everything up to `until` (or the whole buffer) fit on the
    /// current line? When the next line is the last the budget allows,
    /// room is reserved for the ` ..` marker and pending suffixes.
    pub(crate) fn fits_on_line(&self, until: Option<OpId>, force: bool) -> Fitness {
        let mut available = self.line_length;
        if let Some(limit) = self.print_lines {
            if self.line_number + 1 >= limit {
                available =
                    available.saturating_sub(3 + self.innermost().suffix_length);
            }
        }
        if let Some(until) = until {
            let posn = self
                .op_posn(until)
                .expect("section end must still be queued");
            if self.posn_column(posn) <= available {
                Fitness::Fits
            } else {
                Fitness::Overflows
            }
        } else if force {
            Fitness::Overflows
        } else if self.index_column(self.buffer_fill) > available {
            Fitness::Overflows
        } else {
            Fitness::Unknown
        }
    }

    /// Drain every queue entry that can be decided. Returns whether any
    /// line was emitted.
    pub(crate) fn maybe_output(&mut self, force: bool) -> Result<bool> {
        let mut output_anything = false;
        loop {
            let Some(front) = self.queue.front() else {
                break;
            };
            let id = front.id;
            let posn = front.posn;
            match front.op.clone() {
                Op::Newline {
                    kind, section_end, ..
                } => {
                    let fire = match kind {
                        NewlineKind::Literal | NewlineKind::Mandatory | NewlineKind::Linear => {
                            true
                        }
                        NewlineKind::Miser => self.misering(),
                        NewlineKind::Fill => {
                            if self.misering()
                                || self.line_number > self.innermost().section_start_line
                            {
                                true
                            } else {
                                match self.fits_on_line(section_end, force) {
                                    Fitness::Fits => false,
                                    Fitness::Overflows => true,
                                    Fitness::Unknown => break,
                                }
                            }
                        }
                    };
                    self.queue.pop_front();
                    if fire {
                        trace!(?kind, posn, "newline fires");
                        output_anything = true;
                        self.output_line(posn, kind)?;
                    }
                }
                Op::Indentation { kind, amount } => {
                    self.queue.pop_front();
                    if !self.misering() {
                        let base = match kind {
                            IndentKind::Block => self.innermost().start_column as isize,
                            IndentKind::Current => self.posn_column(posn) as isize,
                        };
                        self.set_indentation((base + amount).max(0) as usize);
                    }
                }
                Op::BlockStart {
                    per_line_prefix,
                    suffix,
                    section_end,
                    block_end,
                    ..
                } => {
                    match self.fits_on_line(section_end, force) {
                        Fitness::Fits => {
                            // The whole block fits: flatten it into one
                            // long literal and drop its directives.
                            let end =
                                block_end.expect("fitting block has a queued end");
                            trace!(posn, "block fits, flattened");
                            self.expand_tabs(Some(end));
                            while let Some(dropped) = self.queue.pop_front() {
                                if dropped.id == end {
                                    break;
                                }
                            }
                        }
                        Fitness::Overflows => {
                            let column = self.posn_column(posn);
                            trace!(posn, column, "block committed");
                            self.queue.pop_front();
                            self.really_start_block(
                                column,
                                per_line_prefix.as_deref(),
                                &suffix,
                            );
                        }
                        Fitness::Unknown => break,
                    }
                }
                Op::BlockEnd => {
                    self.queue.pop_front();
                    self.really_end_block();
                }
                Op::Tab { .. } => {
                    self.expand_tabs(Some(id));
                    self.queue.pop_front();
                }
            }
        }
        Ok(output_anything)
    }

    /// Emit one line: everything up to the fired newline's posn, minus
    /// trailing blanks for conditional breaks, then shift the buffer and
    /// lay down the fresh line prefix.
    fn output_line(&mut self, newline_posn: usize, kind: NewlineKind) -> Result<()> {
        let literal = kind == NewlineKind::Literal;
        let amount_to_consume = self.posn_to_index(newline_posn);
        let amount_to_print = if literal {
            amount_to_consume
        } else {
            self.buffer[..amount_to_consume]
                .iter()
                .rposition(|&c| c != ' ')
                .map_or(0, |i| i + 1)
        };
        let line: String = self.buffer[..amount_to_print].iter().collect();
        self.target.write_str(&line)?;
        self.line_number += 1;
        if let Some(limit) = self.print_lines {
            if self.line_number >= limit {
                self.target.write_str(" ..")?;
                let suffix_length = self.innermost().suffix_length;
                if suffix_length > 0 {
                    let tail: String = self.suffix[self.suffix.len() - suffix_length..]
                        .iter()
                        .collect();
                    self.target.write_str(&tail)?;
                }
                return Err(Error::LineLimitReached);
            }
        }
        self.target.write_char('\n')?;
        self.buffer_start_column = 0;
        let block = *self.innermost();
        let prefix_length = if literal {
            block.per_line_prefix_end
        } else {
            block.prefix_length
        };
        let shift = amount_to_consume as isize - prefix_length as isize;
        let new_fill = (self.buffer_fill as isize - shift) as usize;
        if new_fill > self.buffer.len() {
            let len = self.buffer.len();
            self.buffer.resize(grown_size(len, new_fill - len), ' ');
        }
        self.buffer
            .copy_within(amount_to_consume..self.buffer_fill, prefix_length);
        self.buffer[..prefix_length].copy_from_slice(&self.prefix[..prefix_length]);
        self.buffer_fill = new_fill;
        self.buffer_offset += shift;
        if !literal {
            let line_number = self.line_number;
            let block = self.innermost_mut();
            block.section_column = prefix_length;
            block.section_start_line = line_number;
        }
        Ok(())
    }

    /// Dump buffered text up to the first queued directive. Last-resort
    /// relief when the buffer outgrew the line and nothing can break.
    ///
    /// # Panics
    ///
    /// Panics when there is nothing to output; callers must check first.
    fn output_partial_line(&mut self) -> Result<()> {
        let count = match self.queue.front() {
            Some(op) => self.posn_to_index(op.posn),
            None => self.buffer_fill,
        };
        assert!(count > 0, "output_partial_line with nothing to output");
        let line: String = self.buffer[..count].iter().collect();
        self.target.write_str(&line)?;
        self.buffer_start_column += count;
        self.buffer.copy_within(count..self.buffer_fill, 0);
        self.buffer_fill -= count;
        self.buffer_offset += count as isize;
        Ok(())
    }

    /// Make room for `want` more characters, draining or growing as needed.
    /// Returns the space now available.
    pub(crate) fn ensure_space_in_buffer(&mut self, want: usize) -> Result<usize> {
        loop {
            let available = self.buffer.len() - self.buffer_fill;
            if available > 0 {
                return Ok(available);
            }
            if self.buffer_fill > self.line_length {
                // Stalled with no breakable directive in reach.
                if !self.maybe_output(false)? {
                    self.output_partial_line()?;
                }
            } else {
                let len = self.buffer.len();
                self.buffer.resize(grown_size(len, want), ' ');
            }
        }
    }

    /// Drain what can be decided, expand remaining tabs and write out the
    /// residual buffer. Afterwards the buffer and queue are empty, so a
    /// second flush is a no-op.
    pub fn force_output(&mut self) -> Result<()> {
        self.maybe_output(false)?;
        self.expand_tabs(None);
        if self.buffer_fill > 0 {
            let line: String = self.buffer[..self.buffer_fill].iter().collect();
            self.target.write_str(&line)?;
            self.buffer_start_column += self.buffer_fill;
            self.buffer_offset += self.buffer_fill as isize;
            self.buffer_fill = 0;
        }
        self.queue.clear();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::config::PrinterConfig;
    use crate::stream::{NewlineKind, PrettyStream};

    #[test]
    fn flush_empties_buffer_and_queue() {
        let mut out = String::new();
        let config = PrinterConfig::default();
        let mut stream = PrettyStream::new(&mut out, &config);
        stream.start_logical_block(Some("("), false, ")").unwrap();
        stream.write_str("a ").unwrap();
        stream.newline(NewlineKind::Fill).unwrap();
        stream.write_str("b").unwrap();
        stream.end_logical_block().unwrap();
        stream.force_output().unwrap();
        assert_eq!(stream.buffer_fill, 0);
        assert!(stream.queue.is_empty());
    }

    #[test]
    fn posn_arithmetic_survives_line_shifts() {
        let mut out = String::new();
        let config = PrinterConfig::new().with_margin(8);
        let mut stream = PrettyStream::new(&mut out, &config);
        stream.start_logical_block(Some("("), false, ")").unwrap();
        stream.write_str("aaaaaaaa ").unwrap();
        stream.newline(NewlineKind::Linear).unwrap();
        assert!(stream.buffer_offset > 0, "firing a break shifts the buffer");
        let posn = stream.index_to_posn(stream.buffer_fill);
        assert_eq!(stream.posn_to_index(posn), stream.buffer_fill);
        stream.write_str("b").unwrap();
        stream.end_logical_block().unwrap();
        stream.force_output().unwrap();
        assert_eq!(out, "(aaaaaaaa\n b)");
    }
}
