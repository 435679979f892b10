use regex::{Captures, Regex};

use crate::error::ErrorKind;
use crate::{Error, Result};

/// A cursor over the template source.
///
/// Every operation is a regex match relative to the current position.
/// [`scan`][Scanner::scan] and [`check`][Scanner::check] only match when the
/// pattern matches exactly at the cursor, [`scan_until`][Scanner::scan_until]
/// and [`check_until`][Scanner::check_until] search forward for the first
/// match.
/// The `scan*` methods advance the cursor on success, the `check*` methods
/// never move it. On failure the cursor is left untouched.
///
/// Anchored patterns should start with `^` so that a failed match does not
/// search the rest of the source.
#[derive(Debug)]
pub struct Scanner<'source> {
    source: &'source str,
    pos: usize,
}

/// The result of a forward search.
#[derive(Debug)]
pub struct Until<'source> {
    /// The source from the cursor up to and including the match.
    pub consumed: &'source str,
    /// The byte offset where the match starts.
    pub start: usize,
    /// The match and its capture groups, offsets are relative to the whole
    /// source.
    pub captures: Captures<'source>,
}

impl<'source> Scanner<'source> {
    pub fn new(source: &'source str) -> Self {
        Self { source, pos: 0 }
    }

    pub fn source(&self) -> &'source str {
        self.source
    }

    /// Match the pattern at the cursor and advance past the match.
    pub fn scan(&mut self, re: &Regex) -> Option<Captures<'source>> {
        let captures = self.check(re)?;
        self.pos += captures.get(0).map_or(0, |m| m.end());
        Some(captures)
    }

    /// Match the pattern at the cursor without advancing.
    ///
    /// Capture offsets are relative to the cursor.
    pub fn check(&self, re: &Regex) -> Option<Captures<'source>> {
        let rest = &self.source[self.pos..];
        let captures = re.captures(rest)?;
        match captures.get(0) {
            Some(m) if m.start() == 0 => Some(captures),
            _ => None,
        }
    }

    /// Search for the pattern and advance to just past the match.
    pub fn scan_until(&mut self, re: &Regex) -> Option<Until<'source>> {
        let until = self.check_until(re)?;
        self.pos += until.consumed.len();
        Some(until)
    }

    /// Search for the pattern without advancing.
    pub fn check_until(&self, re: &Regex) -> Option<Until<'source>> {
        // Searching the whole source rather than the remainder means that
        // line anchors see the real preceding character.
        let captures = re.captures_at(self.source, self.pos)?;
        let m = captures.get(0)?;
        Some(Until {
            consumed: &self.source[self.pos..m.end()],
            start: m.start(),
            captures,
        })
    }

    pub fn pos(&self) -> usize {
        self.pos
    }

    pub fn set_pos(&mut self, pos: usize) -> Result<()> {
        if pos > self.source.len() {
            return Err(Error::new(
                ErrorKind::OutOfRange,
                format!(
                    "pos {pos} is outside the allowed range of [0, {}]",
                    self.source.len()
                ),
            ));
        }
        self.pos = pos;
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.source.len()
    }

    /// Returns the source between the two byte offsets.
    pub fn substring(&self, start: usize, end: usize) -> Result<&'source str> {
        let len = self.source.len();
        let msg = if start >= len {
            format!("start index {start} is outside the allowed range of [0, {len})")
        } else if end > len {
            format!("end index {end} is outside the allowed range of [0, {len}]")
        } else if start >= end {
            format!("start index {start} is >= end index {end}")
        } else {
            return self.source.get(start..end).ok_or_else(|| {
                Error::new(
                    ErrorKind::OutOfRange,
                    format!("range {start}..{end} does not fall on character boundaries"),
                )
            });
        };
        Err(Error::new(ErrorKind::OutOfRange, msg))
    }

    /// Whether the cursor is at the start of the source or just after a
    /// newline.
    pub fn at_start_of_line(&self) -> bool {
        self.pos == 0 || self.source.as_bytes()[self.pos - 1] == b'\n'
    }

    pub fn done(&self) -> bool {
        self.pos == self.source.len()
    }
}
