//! Buffered pretty-printing stream
//!
//! The stream accepts characters interleaved with layout directives
//! (logical blocks, conditional newlines, indentation changes, tab stops)
//! and emits text that respects the configured right margin and line
//! budget. Text is held in a rolling buffer while queued directives wait
//! for enough look-ahead to decide whether each conditional break fires.
//!
//! Three coordinate systems are in play:
//! - *column*: visible offset from the start of the current output line
//! - *index*: offset into the rolling buffer
//! - *posn*: monotonic stream position, invariant under buffer shifts
//!
//! `posn = index + buffer_offset`. Every code path that moves characters
//! within the buffer adjusts `buffer_offset` by the same amount, so queued
//! directives can keep referring to posns across shifts.

mod block;
mod driver;
mod queue;
mod tabs;

use crate::config::PrinterConfig;
use crate::dispatch::DispatchTable;
use crate::error::{Error, Result};
use block::LogicalBlock;
use queue::{Op, OpId, QueuedOp};
use std::collections::VecDeque;
use std::fmt;
use std::rc::Rc;

pub use queue::{IndentKind, NewlineKind, TabKind};

const INITIAL_BUFFER_SIZE: usize = 128;

/// Growth policy shared by the buffer, prefix and suffix arrays
pub(crate) fn grown_size(old: usize, added: usize) -> usize {
    (old * 2).max(old + added * 5 / 4)
}

/// A block that has been opened but whose start the driver has not yet
/// committed or skipped. The suffix is kept here because the matching
/// close may run after the start operation has left the queue.
struct PendingBlock {
    op_id: OpId,
    suffix: String,
}

/// The pretty-printing stream state
pub struct PrettyStream<'a> {
    /// Downstream character sink
    target: &'a mut dyn fmt::Write,
    /// Fixed right margin, captured at construction
    line_length: usize,
    /// Line budget; `None` when unset or when `readably` disabled it
    print_lines: Option<usize>,
    /// Miser-mode threshold
    miser_width: Option<usize>,
    /// Dispatch table consulted by the object printer
    dispatch: Rc<DispatchTable>,

    /// Rolling character buffer; `buffer[..buffer_fill]` is valid
    buffer: Vec<char>,
    buffer_fill: usize,
    /// Cumulative shift between stream posns and buffer indices. Signed:
    /// tab expansion splices spaces in and moves it backwards.
    buffer_offset: isize,
    /// Column at which `buffer[0]` will appear if emitted now
    buffer_start_column: usize,
    /// Count of newlines already emitted
    line_number: usize,

    /// Committed logical blocks, innermost last; `blocks[0]` is a sentinel
    blocks: Vec<LogicalBlock>,
    /// Left-margin prefix active at `buffer[0]`; `prefix[..prefix_length]`
    /// of the innermost block is valid
    prefix: Vec<char>,
    /// Closing suffixes, right-justified: valid chars live at the tail
    suffix: Vec<char>,

    /// Pending layout operations in FIFO order
    queue: VecDeque<QueuedOp>,
    next_op_id: OpId,
    /// Block starts enqueued but not yet committed by the driver
    pending_blocks: Vec<PendingBlock>,

    /// One-shot hook consulted before the next character write; returning
    /// true buffers a space ahead of that character
    char_out_hook: Option<fn(char) -> bool>,
}

impl<'a> PrettyStream<'a> {
    /// Wrap `target` in a pretty stream. Configuration is read once, here.
    pub fn new(target: &'a mut dyn fmt::Write, config: &PrinterConfig) -> Self {
        PrettyStream {
            target,
            line_length: config.right_margin,
            print_lines: if config.readably { None } else { config.lines },
            miser_width: config.miser_width,
            dispatch: config.dispatch.clone(),
            buffer: vec![' '; INITIAL_BUFFER_SIZE],
            buffer_fill: 0,
            buffer_offset: 0,
            buffer_start_column: 0,
            line_number: 0,
            blocks: vec![LogicalBlock::default()],
            prefix: vec![' '; INITIAL_BUFFER_SIZE],
            suffix: vec![' '; INITIAL_BUFFER_SIZE],
            queue: VecDeque::new(),
            next_op_id: 0,
            pending_blocks: Vec::new(),
            char_out_hook: None,
        }
    }

    /// The dispatch table this stream was configured with
    pub fn dispatch(&self) -> Rc<DispatchTable> {
        self.dispatch.clone()
    }

    /// Number of newlines emitted so far
    pub fn line_number(&self) -> usize {
        self.line_number
    }

    /// Arm the one-shot character hook
    pub fn set_char_out_hook(&mut self, hook: fn(char) -> bool) {
        self.char_out_hook = Some(hook);
    }

    // ----- position arithmetic --------------------------------------------

    pub(crate) fn index_to_posn(&self, index: usize) -> usize {
        (index as isize + self.buffer_offset) as usize
    }

    pub(crate) fn posn_to_index(&self, posn: usize) -> usize {
        (posn as isize - self.buffer_offset) as usize
    }

    /// The column at which `buffer[index]` would appear if the stream were
    /// emitted right now, with no further breaks but with queued tabs
    /// expanded. This hypothetical column is what break decisions need.
    pub(crate) fn index_column(&self, index: usize) -> usize {
        let mut column = self.buffer_start_column;
        let mut section_start = self.innermost().section_column;
        let end_posn = self.index_to_posn(index);
        for qop in self.queue.iter() {
            if qop.posn >= end_posn {
                break;
            }
            match &qop.op {
                Op::Tab {
                    kind,
                    colnum,
                    colinc,
                } => {
                    column += tabs::compute_tab_size(
                        *kind,
                        *colnum,
                        *colinc,
                        section_start,
                        column + self.posn_to_index(qop.posn),
                    );
                }
                Op::Newline { .. } | Op::BlockStart { .. } => {
                    section_start = column + self.posn_to_index(qop.posn);
                }
                _ => {}
            }
        }
        column + index
    }

    pub(crate) fn posn_column(&self, posn: usize) -> usize {
        self.index_column(self.posn_to_index(posn))
    }

    // ----- queue ----------------------------------------------------------

    pub(crate) fn innermost(&self) -> &LogicalBlock {
        self.blocks.last().expect("block stack holds a sentinel")
    }

    pub(crate) fn innermost_mut(&mut self) -> &mut LogicalBlock {
        self.blocks.last_mut().expect("block stack holds a sentinel")
    }

    fn enqueue(&mut self, op: Op) -> OpId {
        let id = self.next_op_id;
        self.next_op_id += 1;
        let posn = self.index_to_posn(self.buffer_fill);
        self.queue.push_back(QueuedOp { id, posn, op });
        id
    }

    /// Queue position of an op id, if the op is still queued
    pub(crate) fn op_index(&self, id: OpId) -> Option<usize> {
        let front = self.queue.front()?;
        id.checked_sub(front.id).filter(|&i| i < self.queue.len())
    }

    pub(crate) fn op_posn(&self, id: OpId) -> Option<usize> {
        self.op_index(id).map(|i| self.queue[i].posn)
    }

    /// Record `new_id` as the section end of every open section opener at
    /// `depth` or deeper
    fn close_open_sections(&mut self, new_id: OpId, depth: usize) {
        for qop in self.queue.iter_mut() {
            if qop.id == new_id {
                continue;
            }
            match &mut qop.op {
                Op::Newline {
                    depth: d,
                    section_end,
                    ..
                }
                | Op::BlockStart {
                    depth: d,
                    section_end,
                    ..
                } if section_end.is_none() && *d >= depth => {
                    *section_end = Some(new_id);
                }
                _ => {}
            }
        }
    }

    // ----- character input ------------------------------------------------

    /// Buffer one character; embedded `\n` becomes a literal newline
    pub fn write_char(&mut self, ch: char) -> Result<()> {
        if let Some(hook) = self.char_out_hook.take() {
            if hook(ch) {
                self.push_char(' ')?;
            }
        }
        if ch == '\n' {
            self.enqueue_newline(NewlineKind::Literal)
        } else {
            self.push_char(ch)
        }
    }

    /// Buffer a string, splitting on embedded `\n` into literal newlines.
    /// Iterative over segments, so newline-dense strings stay flat.
    pub fn write_str(&mut self, s: &str) -> Result<()> {
        let mut first = true;
        for segment in s.split('\n') {
            if !first {
                self.enqueue_newline(NewlineKind::Literal)?;
            }
            first = false;
            for ch in segment.chars() {
                if let Some(hook) = self.char_out_hook.take() {
                    if hook(ch) {
                        self.push_char(' ')?;
                    }
                }
                self.push_char(ch)?;
            }
        }
        Ok(())
    }

    fn push_char(&mut self, ch: char) -> Result<()> {
        self.ensure_space_in_buffer(1)?;
        self.buffer[self.buffer_fill] = ch;
        self.buffer_fill += 1;
        Ok(())
    }

    // ----- layout directives ----------------------------------------------

    /// Enqueue a conditional newline. Literal and mandatory kinds force the
    /// driver to drain everything they can decide.
    pub fn newline(&mut self, kind: NewlineKind) -> Result<()> {
        self.enqueue_newline(kind)
    }

    fn enqueue_newline(&mut self, kind: NewlineKind) -> Result<()> {
        let depth = self.pending_blocks.len();
        let id = self.enqueue(Op::Newline {
            kind,
            depth,
            section_end: None,
        });
        self.close_open_sections(id, depth);
        let force = matches!(kind, NewlineKind::Literal | NewlineKind::Mandatory);
        self.maybe_output(force)?;
        Ok(())
    }

    /// Queue an indentation change, effective at the next line break.
    /// `amount` may be negative.
    pub fn indent(&mut self, kind: IndentKind, amount: isize) {
        self.enqueue(Op::Indentation { kind, amount });
    }

    /// Queue a tab stop
    pub fn tab(&mut self, kind: TabKind, colnum: usize, colinc: usize) {
        self.enqueue(Op::Tab {
            kind,
            colnum,
            colinc,
        });
    }

    /// Open a logical block. The prefix, if any, is emitted immediately;
    /// with `per_line` it also repeats after every wrap inside the block.
    /// The suffix is saved and emitted by the matching `end_logical_block`.
    pub fn start_logical_block(
        &mut self,
        prefix: Option<&str>,
        per_line: bool,
        suffix: &str,
    ) -> Result<()> {
        if let Some(prefix) = prefix {
            self.write_str(prefix)?;
        }
        let depth = self.pending_blocks.len();
        let per_line_prefix = if per_line {
            prefix.map(str::to_string)
        } else {
            None
        };
        let id = self.enqueue(Op::BlockStart {
            depth,
            per_line_prefix,
            suffix: suffix.to_string(),
            section_end: None,
            block_end: None,
        });
        self.pending_blocks.push(PendingBlock {
            op_id: id,
            suffix: suffix.to_string(),
        });
        Ok(())
    }

    /// Emit the saved suffix and close the innermost pending block.
    ///
    /// # Panics
    ///
    /// Panics when no block is open; unbalanced block ends are a
    /// programmer error.
    pub fn end_logical_block(&mut self) -> Result<()> {
        let pending = self
            .pending_blocks
            .pop()
            .expect("end_logical_block without a matching start_logical_block");
        if !pending.suffix.is_empty() {
            self.write_str(&pending.suffix)?;
        }
        let depth = self.pending_blocks.len();
        let id = self.enqueue(Op::BlockEnd);
        // The block end terminates the sections strictly inside the block
        // and the block's own first section, but not sections of the
        // enclosing block.
        self.close_open_sections(id, depth + 1);
        if let Some(i) = self.op_index(pending.op_id) {
            if let Op::BlockStart {
                block_end,
                section_end,
                ..
            } = &mut self.queue[i].op
            {
                *block_end = Some(id);
                if section_end.is_none() {
                    *section_end = Some(id);
                }
            }
        }
        Ok(())
    }
}

/// Run `body` against a fresh pretty stream over `target`, flushing on the
/// way out. Hitting the line budget aborts the body cleanly: the truncated
/// output has already been finalized with ` ..` and any pending suffixes,
/// so the residual buffer is dropped rather than flushed.
pub fn with_pretty_stream<F>(
    target: &mut dyn fmt::Write,
    config: &PrinterConfig,
    body: F,
) -> Result<()>
where
    F: FnOnce(&mut PrettyStream<'_>) -> Result<()>,
{
    let mut stream = PrettyStream::new(target, config);
    match body(&mut stream) {
        Ok(()) => stream.force_output(),
        Err(Error::LineLimitReached) => Ok(()),
        Err(e) => Err(e),
    }
}
