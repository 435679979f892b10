//! Types for writing rendered output.
//!
//! This module defines a [`Formatter`] type that is similar to
//! [`std::fmt::Formatter`]. A mutable reference to it is passed to escape
//! functions and writing to it updates the underlying buffer, be it a
//! [`String`] or an arbitrary [`std::io::Write`] buffer.
//!
//! All escape functions must have the following signature.
//!
//! ```text
//! use whisker::fmt;
//! Fn(&mut fmt::Formatter<'_>, &str) -> fmt::Result;
//! ```
//!
//! # Examples
//!
//! ### Escape non-ASCII
//!
//! Consider a use case where you are not rendering HTML at all, but want to
//! escape all non-ASCII characters in escaped variables.
//!
//! ```
//! use std::fmt::Write;
//! use whisker::fmt;
//!
//! fn escape_ascii(f: &mut fmt::Formatter<'_>, s: &str) -> fmt::Result {
//!     write!(f, "{}", s.as_bytes().escape_ascii())?;
//!     Ok(())
//! }
//!
//! let template = whisker::compile("{{ name }} {{{ name }}}")?;
//! let result = template
//!     .renderer()
//!     .with_escape(&escape_ascii)
//!     .to_string_from(&whisker::value! { name: "Žižek" })?;
//! assert_eq!(result, r"\xc5\xbdi\xc5\xbeek Žižek");
//! # Ok::<(), whisker::Error>(())
//! ```

use std::fmt;
use std::fmt::Write;
use std::io;

use crate::Value;

/// An escape function or closure.
pub type EscapeFn = dyn Fn(&mut Formatter<'_>, &str) -> Result + Sync + Send + 'static;

/// A [`std::fmt::Write`] façade.
pub struct Formatter<'a> {
    buf: &'a mut (dyn fmt::Write + 'a),
}

/// The result type returned from an escape function.
pub type Result = std::result::Result<(), Error>;

/// The error type returned from an escape function.
#[derive(Debug, Clone)]
pub struct Error(Option<String>);

pub(crate) struct Writer<W> {
    writer: W,
    err: Option<io::Error>,
}

impl<'a> Formatter<'a> {
    pub(crate) fn with_string(buf: &'a mut String) -> Self {
        Self { buf }
    }

    pub(crate) fn with_writer<W>(buf: &'a mut Writer<W>) -> Self
    where
        W: io::Write,
    {
        Self { buf }
    }
}

impl fmt::Write for Formatter<'_> {
    #[inline]
    fn write_str(&mut self, s: &str) -> fmt::Result {
        fmt::Write::write_str(self.buf, s)
    }

    #[inline]
    fn write_char(&mut self, c: char) -> fmt::Result {
        fmt::Write::write_char(self.buf, c)
    }

    #[inline]
    fn write_fmt(&mut self, args: fmt::Arguments<'_>) -> fmt::Result {
        fmt::Write::write_fmt(self.buf, args)
    }
}

impl Error {
    pub(crate) fn message(self) -> Option<String> {
        self.0
    }
}

impl std::error::Error for Error {}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.0 {
            Some(msg) => write!(f, "{msg}"),
            None => write!(f, "format error"),
        }
    }
}

impl From<&str> for Error {
    fn from(msg: &str) -> Self {
        Self(Some(msg.to_owned()))
    }
}

impl From<String> for Error {
    fn from(msg: String) -> Self {
        Self(Some(msg))
    }
}

impl From<fmt::Error> for Error {
    fn from(_: fmt::Error) -> Self {
        Self(None)
    }
}

impl<W> Writer<W>
where
    W: io::Write,
{
    pub fn new(writer: W) -> Self {
        Self { writer, err: None }
    }

    pub fn take_err(&mut self) -> Option<io::Error> {
        self.err.take()
    }
}

impl<W> fmt::Write for Writer<W>
where
    W: io::Write,
{
    #[inline]
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.writer.write_all(s.as_bytes()).map_err(|e| {
            self.err = Some(e);
            fmt::Error
        })
    }
}

/// Formats a value the way variable tags print it, without escaping.
///
/// Values are formatted as follows:
/// - [`Value::None`]: empty string
/// - [`Value::Bool`]: `true` or `false`
/// - [`Value::Integer`]: the integer formatted using [`Display`][std::fmt::Display]
/// - [`Value::Float`]: the float formatted using [`Display`][std::fmt::Display]
/// - [`Value::String`]: the string, unescaped
///
/// Errors if the value is a [`Value::List`] or [`Value::Map`].
#[inline]
pub fn default(f: &mut Formatter<'_>, value: &Value) -> Result {
    match value {
        Value::None => {}
        Value::Bool(b) => write!(f, "{b}")?,
        Value::Integer(n) => write!(f, "{n}")?,
        Value::Float(n) => write!(f, "{n}")?,
        Value::String(s) => f.write_str(s)?,
        value => {
            return Err(Error::from(format!(
                "variable evaluated to unformattable type {}",
                value.human()
            )));
        }
    }
    Ok(())
}

/// The default escape function, escapes text for HTML output.
///
/// The characters `<`, `>`, `&`, `'`, `"` are replaced by entities and NUL
/// is replaced by U+FFFD.
pub fn escape_html(f: &mut Formatter<'_>, s: &str) -> Result {
    let mut last = 0;
    for (i, byte) in s.bytes().enumerate() {
        let entity = match byte {
            b'<' => "&lt;",
            b'>' => "&gt;",
            b'&' => "&amp;",
            b'\'' => "&#39;",
            b'"' => "&#34;",
            b'\0' => "\u{FFFD}",
            _ => continue,
        };
        f.write_str(&s[last..i])?;
        f.write_str(entity)?;
        last = i + 1;
    }
    f.write_str(&s[last..])?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn escape(s: &str) -> String {
        let mut buf = String::new();
        escape_html(&mut Formatter::with_string(&mut buf), s).unwrap();
        buf
    }

    fn format(value: &Value) -> std::result::Result<String, Error> {
        let mut buf = String::new();
        default(&mut Formatter::with_string(&mut buf), value)?;
        Ok(buf)
    }

    #[test]
    fn escape_html_entities() {
        assert_eq!(escape("<b>"), "&lt;b&gt;");
        assert_eq!(escape(r#"'a' & "b""#), "&#39;a&#39; &amp; &#34;b&#34;");
        assert_eq!(escape("nul\0"), "nul\u{FFFD}");
    }

    #[test]
    fn escape_html_passthrough() {
        assert_eq!(escape(""), "");
        assert_eq!(escape("привіт"), "привіт");
    }

    #[test]
    fn default_scalars() {
        assert_eq!(format(&Value::None).unwrap(), "");
        assert_eq!(format(&Value::Bool(true)).unwrap(), "true");
        assert_eq!(format(&Value::Integer(-7)).unwrap(), "-7");
        assert_eq!(format(&Value::Float(1.5)).unwrap(), "1.5");
        assert_eq!(format(&Value::from("<b>")).unwrap(), "<b>");
    }

    #[test]
    fn default_unformattable() {
        let err = format(&Value::List(vec![])).unwrap_err();
        assert_eq!(
            err.message().unwrap(),
            "variable evaluated to unformattable type list"
        );
    }
}
