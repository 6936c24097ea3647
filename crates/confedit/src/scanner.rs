//! Byte-level cursor over the input buffer with line/column tracking.
//!
//! The scanner owns the three primitive concerns everything above it relies
//! on: bounded lookahead, clamped advancement, and the offset → (line,
//! column) mapping used by every error message. Columns are 0-based and
//! tab-aware: a tab jumps to the next multiple of [`TAB_WIDTH`].

use bstr::ByteSlice;

/// Tab stop width used for column tracking, matching git-config tooling.
pub(crate) const TAB_WIDTH: usize = 8;

/// A location in the input buffer.
///
/// `line` and `column` are 0-based here; diagnostics add 1 to both when
/// rendering.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct Position {
    pub offset: usize,
    pub line: usize,
    pub column: usize,
}

#[derive(Debug)]
pub(crate) struct Scanner<'a> {
    input: &'a [u8],
    pos: Position,
}

impl<'a> Scanner<'a> {
    pub fn new(input: &'a [u8]) -> Self {
        Self {
            input,
            pos: Position::default(),
        }
    }

    pub fn input(&self) -> &'a [u8] {
        self.input
    }

    pub fn position(&self) -> Position {
        self.pos
    }

    pub fn offset(&self) -> usize {
        self.pos.offset
    }

    pub fn remaining(&self) -> usize {
        self.input.len() - self.pos.offset
    }

    /// The unread tail of the input.
    pub fn rest(&self) -> &'a [u8] {
        &self.input[self.pos.offset..]
    }

    /// The next unread byte, if any.
    pub fn peek(&self) -> Option<u8> {
        self.input.get(self.pos.offset).copied()
    }

    /// Lookahead `n` bytes past the cursor without advancing.
    pub fn at(&self, n: usize) -> Option<u8> {
        self.input.get(self.pos.offset + n).copied()
    }

    /// Advance by `n` bytes (clamped to the end of input), updating the
    /// line/column tally byte by byte.
    pub fn skip(&mut self, n: usize) {
        let stop = usize::min(self.pos.offset.saturating_add(n), self.input.len());
        for i in self.pos.offset..stop {
            match self.input[i] {
                b'\n' => {
                    self.pos.line += 1;
                    self.pos.column = 0;
                }
                b'\t' => self.pos.column += TAB_WIDTH - (self.pos.column % TAB_WIDTH),
                _ => self.pos.column += 1,
            }
        }
        self.pos.offset = stop;
    }

    /// Consume `b` if it is the next byte.
    pub fn match_byte(&mut self, b: u8) -> bool {
        if self.peek() == Some(b) {
            self.skip(1);
            true
        } else {
            false
        }
    }

    /// Skip bytes while `pred` holds; returns whether anything was skipped.
    pub fn skip_while(&mut self, pred: impl Fn(u8) -> bool) -> bool {
        let n = self.rest().iter().take_while(|&&b| pred(b)).count();
        if n > 0 {
            self.skip(n);
            true
        } else {
            false
        }
    }

    /// Like [`skip_while`](Self::skip_while), returning the consumed slice.
    pub fn take_while(&mut self, pred: impl Fn(u8) -> bool) -> &'a [u8] {
        let start = self.pos.offset;
        self.skip_while(pred);
        &self.input[start..self.pos.offset]
    }

    /// Advance to the next occurrence of `b`, leaving the cursor on it.
    /// Returns `false` if `b` does not occur; the rest of the input is
    /// consumed.
    pub fn skip_to(&mut self, b: u8) -> bool {
        match self.rest().find_byte(b) {
            Some(i) => {
                self.skip(i);
                true
            }
            None => {
                self.skip(self.remaining());
                false
            }
        }
    }

    /// Skip horizontal whitespace (space, tab, carriage return).
    pub fn skip_ws(&mut self) -> bool {
        self.skip_while(|b| matches!(b, b' ' | b'\t' | b'\r'))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn columns_round_up_to_tab_stops() {
        let mut s = Scanner::new(b"a\tb\tc");
        s.skip(1);
        assert_eq!(s.position().column, 1);
        s.skip(1); // tab: 1 -> 8
        assert_eq!(s.position().column, 8);
        s.skip(1);
        assert_eq!(s.position().column, 9);
        s.skip(1); // tab: 9 -> 16
        assert_eq!(s.position().column, 16);
    }

    #[test]
    fn newline_resets_column_and_bumps_line() {
        let mut s = Scanner::new(b"ab\ncd");
        s.skip(4);
        assert_eq!(s.position().line, 1);
        assert_eq!(s.position().column, 1);
    }

    #[test]
    fn skip_clamps_past_end() {
        let mut s = Scanner::new(b"xy");
        s.skip(10);
        assert_eq!(s.offset(), 2);
        assert_eq!(s.peek(), None);
    }

    #[test]
    fn skip_to_stops_on_target() {
        let mut s = Scanner::new(b"abc\ndef");
        assert!(s.skip_to(b'\n'));
        assert_eq!(s.peek(), Some(b'\n'));
        assert!(!s.skip_to(b'@'));
        assert_eq!(s.remaining(), 0);
    }
}
