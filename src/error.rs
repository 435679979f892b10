use std::cmp::max;
use std::fmt;
use std::io;

use crate::types::span::Span;

/// An error that can occur during template compilation or rendering.
#[derive(Clone)]
pub struct Error {
    kind: ErrorKind,
    msg: String,
    span: Option<(String, Span)>,
}

/// The category of an [`Error`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum ErrorKind {
    /// The character after `{{` is not a known sigil and cannot start a
    /// variable name.
    UnexpectedTagSigil,
    /// The tag content is empty or contains disallowed characters.
    IllegalTagContent,
    /// No close sequence was found for a tag.
    UnclosedTag,
    /// A section was opened but never closed.
    UnclosedSection,
    /// A close tag does not match the currently open section.
    SectionMismatch,
    /// A scanner position was outside of the template source.
    OutOfRange,
    /// The render context does not support name based lookup.
    LookupType,
    /// A value could not be formatted.
    Format,
    /// Partials were nested deeper than allowed.
    MaxPartialDepth,
    /// The render context could not be converted to a value.
    Serialize,
    /// Writing the rendered output failed.
    Io,
}

impl Error {
    /// Construct a new error pointing at a region of the template source.
    pub(crate) fn syntax(
        kind: ErrorKind,
        msg: impl Into<String>,
        source: &str,
        span: Span,
    ) -> Self {
        Self {
            kind,
            msg: msg.into(),
            span: Some((source.to_owned(), span)),
        }
    }

    /// Construct a new error without any source information.
    pub(crate) fn new(kind: ErrorKind, msg: impl Into<String>) -> Self {
        Self {
            kind,
            msg: msg.into(),
            span: None,
        }
    }

    pub(crate) fn lookup_type(name: &str, human: &str) -> Self {
        Self::new(
            ErrorKind::LookupType,
            format!("cannot look up `{name}`, only map contexts are supported, found {human}"),
        )
    }

    pub(crate) fn max_partial_depth(max: usize) -> Self {
        Self::new(
            ErrorKind::MaxPartialDepth,
            format!("reached maximum partial depth ({max})"),
        )
    }

    /// Returns the category of this error.
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Returns the error message without any source information.
    pub fn message(&self) -> &str {
        &self.msg
    }
}

#[cfg(feature = "serde")]
impl serde::ser::Error for Error {
    fn custom<T>(msg: T) -> Self
    where
        T: fmt::Display,
    {
        Self::new(ErrorKind::Serialize, msg.to_string())
    }
}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Self {
        Self::new(ErrorKind::Io, format!("failed to write output: {err}"))
    }
}

impl From<fmt::Error> for Error {
    fn from(_: fmt::Error) -> Self {
        Self::new(ErrorKind::Format, "format error")
    }
}

impl std::error::Error for Error {}

impl fmt::Debug for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.span {
            Some((source, span)) => fmt_pretty(&self.msg, source, *span, f),
            None => write!(f, "{}", self.msg),
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.span {
            Some((source, span)) => {
                if f.alternate() {
                    fmt_pretty(&self.msg, source, *span, f)
                } else {
                    write!(f, "{} between bytes {} and {}", self.msg, span.start, span.end)
                }
            }
            None => write!(f, "{}", self.msg),
        }
    }
}

fn fmt_pretty(msg: &str, source: &str, span: Span, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let lines: Vec<_> = source.split_terminator('\n').collect();
    let (line, col) = to_line_col(&lines, source, span.start);
    // Multiline tags are underlined up to the end of their first line.
    let first = source[span].split('\n').next().unwrap_or_default();
    let width = max(1, width(first));
    let code = lines
        .get(line)
        .or_else(|| lines.last())
        .copied()
        .unwrap_or_default()
        .trim_end_matches('\r')
        .replace('\t', &" ".repeat(TAB_WIDTH));

    let num = (line + 1).to_string();
    let pad = num.len();
    let pipe = "|";
    let underline = "^".repeat(width);

    write!(
        f,
        "\n \
        {0:pad$} {pipe}\n \
        {num:>} {pipe} {code}\n \
        {0:pad$} {pipe} {underline:>width$} {msg}\n",
        "",
        pad = pad,
        pipe = pipe,
        num = num,
        code = code,
        underline = underline,
        width = col + width,
        msg = msg
    )
}

fn to_line_col(lines: &[&str], source: &str, offset: usize) -> (usize, usize) {
    let mut n = 0;
    for (i, line) in lines.iter().enumerate() {
        let len = line.len() + 1;
        if n + len > offset {
            return (i, width(&source[n..offset]));
        }
        n += len;
    }
    (lines.len(), lines.last().map(|l| width(l)).unwrap_or(0))
}

/// Tabs in the excerpt are expanded to this many spaces.
const TAB_WIDTH: usize = 4;

fn width(s: &str) -> usize {
    let tabs = s.matches('\t').count();
    s.split('\t').map(text_width).sum::<usize>() + tabs * TAB_WIDTH
}

#[cfg(feature = "unicode")]
fn text_width(s: &str) -> usize {
    unicode_width::UnicodeWidthStr::width(s)
}

#[cfg(not(feature = "unicode"))]
fn text_width(s: &str) -> usize {
    s.chars().count()
}
