//! Tab expansion
//!
//! A tab's width depends on the column its text would land on, so tabs
//! stay queued until the driver reaches them (or flattens a block over
//! them). Expansion retroactively splices spaces into the buffer and
//! compensates `buffer_offset`, keeping every queued posn pointed at the
//! same character.

use super::queue::{Op, OpId, TabKind};
use super::{grown_size, PrettyStream};

/// Number of spaces a tab inserts, given the section origin and the
/// hypothetical column of the tab itself
pub(crate) fn compute_tab_size(
    kind: TabKind,
    colnum: usize,
    colinc: usize,
    section_start: usize,
    column: usize,
) -> usize {
    let (section_relative, additive) = kind.flags();
    let origin = if section_relative { section_start } else { 0 };
    let position = column.saturating_sub(origin);
    if additive {
        let mut size = colnum;
        if colinc > 1 {
            let rem = (position + size) % colinc;
            if rem != 0 {
                size += colinc - rem;
            }
        }
        size
    } else if position < colnum {
        colnum - position
    } else if colinc == 0 {
        0
    } else {
        colinc - ((position - colnum) % colinc)
    }
}

impl PrettyStream<'_> {
    /// Expand every queued tab up to and including `through` (all of them
    /// when `None`), splicing the computed spaces into the buffer.
    pub(crate) fn expand_tabs(&mut self, through: Option<OpId>) {
        let mut insertions: Vec<(usize, usize)> = Vec::new();
        let mut additional = 0;
        let mut column = self.buffer_start_column;
        let mut section_start = self.innermost().section_column;
        for qop in self.queue.iter() {
            match &qop.op {
                Op::Tab {
                    kind,
                    colnum,
                    colinc,
                } => {
                    let index = self.posn_to_index(qop.posn);
                    let size = compute_tab_size(
                        *kind,
                        *colnum,
                        *colinc,
                        section_start,
                        column + index,
                    );
                    if size > 0 {
                        insertions.push((index, size));
                        additional += size;
                        column += size;
                    }
                }
                Op::Newline { .. } | Op::BlockStart { .. } => {
                    section_start = column + self.posn_to_index(qop.posn);
                }
                _ => {}
            }
            if Some(qop.id) == through {
                break;
            }
        }
        if insertions.is_empty() {
            return;
        }
        let fill = self.buffer_fill;
        let new_fill = fill + additional;
        if new_fill > self.buffer.len() {
            let len = self.buffer.len();
            self.buffer.resize(grown_size(len, additional), ' ');
        }
        self.buffer_fill = new_fill;
        self.buffer_offset -= additional as isize;
        // Splice right to left so each segment moves exactly once.
        let mut inserted_after = additional;
        let mut end = fill;
        for &(index, amount) in insertions.iter().rev() {
            let dst = index + inserted_after;
            self.buffer.copy_within(index..end, dst);
            self.buffer[dst - amount..dst].fill(' ');
            inserted_after -= amount;
            end = index;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn section_relative_rounds_to_multiple() {
        // Section at column 4, three characters in, pad to the next
        // multiple of 8 from the section start.
        let size = compute_tab_size(TabKind::SectionRelative, 0, 8, 4, 7);
        assert_eq!(size, 5);
    }

    #[test]
    fn line_tab_before_colnum_pads_to_it() {
        assert_eq!(compute_tab_size(TabKind::Line, 10, 4, 0, 3), 7);
    }

    #[test]
    fn line_tab_past_colnum_advances_to_next_stop() {
        assert_eq!(compute_tab_size(TabKind::Line, 10, 4, 0, 13), 1);
        assert_eq!(compute_tab_size(TabKind::Line, 10, 4, 0, 14), 4);
    }

    #[test]
    fn line_tab_past_colnum_with_zero_colinc_is_noop() {
        assert_eq!(compute_tab_size(TabKind::Line, 10, 0, 0, 13), 0);
    }

    #[test]
    fn additive_tab_emits_colnum_then_rounds() {
        assert_eq!(compute_tab_size(TabKind::LineRelative, 3, 1, 0, 5), 3);
        // 5 + 2 = 7, rounded up to the multiple-of-4 stop at 8
        assert_eq!(compute_tab_size(TabKind::LineRelative, 2, 4, 0, 5), 3);
    }
}
