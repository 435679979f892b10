//! Byte ranges in the template source, used to point at the offending tag
//! when reporting compile errors.

use std::ops::Index;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        debug_assert!(start <= end);
        Self { start, end }
    }

    /// Extends this span up to the given byte offset.
    pub fn to(self, end: usize) -> Self {
        Self::new(self.start, end.max(self.end))
    }
}

impl Index<Span> for str {
    type Output = str;

    fn index(&self, span: Span) -> &Self::Output {
        &self[span.start..span.end]
    }
}
