use once_cell::sync::Lazy;
use regex::{Captures, Regex};

use crate::compile::scan::Scanner;
use crate::error::ErrorKind;
use crate::types::span::Span;
use crate::types::token::Token;
use crate::{Error, Result};

/// An opening delimiter preceded by optional horizontal whitespace.
static OPEN_TAG: Lazy<Regex> = Lazy::new(|| regex(r"^([ \t]*)(\{\{)"));

/// The next place a tag could start. Leading whitespace is only part of the
/// match at the start of a line, since only then can it be stripped.
static NEXT_OPEN_TAG: Lazy<Regex> = Lazy::new(|| regex(r"(?m)(^[ \t]*)?\{\{"));

static SIGIL: Lazy<Regex> = Lazy::new(|| regex(r"^[!{&#^/>]"));

static WHITESPACE: Lazy<Regex> = Lazy::new(|| regex(r"^\s*"));

static CONTENT: Lazy<Regex> = Lazy::new(|| regex(&format!(r"^(?:{WORD}|[?!/.\-])+")));

static CLOSE: Lazy<Regex> = Lazy::new(|| regex(r"^\}\}"));
static CLOSE_TRIPLE: Lazy<Regex> = Lazy::new(|| regex(r"^\}\}\}"));
static FIND_CLOSE: Lazy<Regex> = Lazy::new(|| regex(r"\}\}"));
static FIND_CLOSE_TRIPLE: Lazy<Regex> = Lazy::new(|| regex(r"\}\}\}"));
static FIND_CLOSE_COMMENT: Lazy<Regex> = Lazy::new(|| regex(r"[ \t]*!?\}\}"));

/// The rest of a line after a standalone tag.
static STANDALONE_END: Lazy<Regex> = Lazy::new(|| regex(r"^[ \t]*(?:\r?\n|$)"));

#[cfg(feature = "unicode")]
const WORD: &str = r"\w";

#[cfg(not(feature = "unicode"))]
const WORD: &str = r"[0-9A-Za-z_]";

fn regex(pattern: &str) -> Regex {
    Regex::new(pattern).unwrap_or_else(|err| panic!("invalid pattern `{pattern}`: {err}"))
}

/// A parser that turns the template source into a token tree.
///
/// The parser alternates between two moves until the source is exhausted:
/// try to parse a tag at the cursor, otherwise consume text up to the next
/// place a tag could start.
pub struct Parser<'source> {
    scanner: Scanner<'source>,

    /// Tokens at the top level of the template.
    root: Vec<Token>,

    /// The currently open sections, innermost last.
    sections: Vec<Frame<'source>>,
}

/// A section that has been opened but not yet closed.
struct Frame<'source> {
    name: &'source str,
    inverted: bool,
    tokens: Vec<Token>,
    /// The span of the open tag.
    span: Span,
}

/// The kind of tag, determined by the character after `{{`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Tag {
    /// `{{! comment }}`
    Comment,
    /// `{{ name }}`
    Escaped,
    /// `{{{ name }}}`
    Triple,
    /// `{{& name }}`
    Ampersand,
    /// `{{# name }}`
    Section,
    /// `{{^ name }}`
    Inverted,
    /// `{{/ name }}`
    Close,
    /// `{{> name }}`
    Partial,
}

/// A matched opening delimiter.
struct OpenTag<'source> {
    /// Horizontal whitespace before the delimiter.
    padding: &'source str,
    /// The span of the delimiter itself.
    span: Span,
}

impl<'source> OpenTag<'source> {
    fn from_captures(captures: &Captures<'source>, pos: usize) -> Self {
        let padding = captures.get(1).map_or("", |m| m.as_str());
        let delim = captures.get(2).map_or(0..0, |m| m.range());
        Self {
            padding,
            span: Span::new(pos + delim.start, pos + delim.end),
        }
    }
}

impl<'source> Parser<'source> {
    /// Construct a new parser.
    pub fn new(source: &'source str) -> Self {
        Self {
            scanner: Scanner::new(source),
            root: Vec::new(),
            sections: Vec::new(),
        }
    }

    /// Parses the template, returning the top level tokens.
    pub fn parse_template(mut self) -> Result<Vec<Token>> {
        while !self.scanner.done() {
            if self.parse_tag()? {
                continue;
            }
            self.parse_text()?;
        }

        if let Some(frame) = self.sections.first() {
            return Err(Error::syntax(
                ErrorKind::UnclosedSection,
                format!("unclosed section `{}`", frame.name),
                self.source(),
                frame.span,
            ));
        }

        Ok(self.root)
    }

    /// Attempts to parse a tag at the cursor.
    ///
    /// Returns `false` if there is no tag here, in which case nothing was
    /// consumed.
    fn parse_tag(&mut self) -> Result<bool> {
        let start_of_line = self.scanner.at_start_of_line();

        let pos = self.scanner.pos();
        let open = match self.scanner.scan(&OPEN_TAG) {
            Some(captures) => OpenTag::from_captures(&captures, pos),
            None => return Ok(false),
        };

        // At the start of a line the padding is held back, the whole line
        // might be removed depending on what this tag turns out to be.
        if !start_of_line && !open.padding.is_empty() {
            self.push(Token::Text(open.padding.to_owned()));
        }

        let tag = self.parse_tag_kind();
        self.scanner.scan(&WHITESPACE);

        let name = match tag {
            Tag::Comment => {
                self.parse_comment(&open)?;
                ""
            }
            tag => {
                let name = self.parse_content(tag, &open)?;
                self.scanner.scan(&WHITESPACE);
                self.parse_close(tag, &open)?;
                name
            }
        };

        let span = open.span.to(self.scanner.pos());

        if start_of_line {
            if tag.is_standalone() && self.scanner.scan(&STANDALONE_END).is_some() {
                tracing::trace!(tag = tag.human(), name, "stripped standalone line");
            } else if !open.padding.is_empty() {
                self.push(Token::Text(open.padding.to_owned()));
            }
        }

        self.apply(tag, name, span)?;
        Ok(true)
    }

    /// Parses the character after the opening delimiter.
    fn parse_tag_kind(&mut self) -> Tag {
        match self.scanner.scan(&SIGIL) {
            Some(captures) => match &captures[0] {
                "!" => Tag::Comment,
                "{" => Tag::Triple,
                "&" => Tag::Ampersand,
                "#" => Tag::Section,
                "^" => Tag::Inverted,
                "/" => Tag::Close,
                ">" => Tag::Partial,
                sigil => unreachable!("sigil pattern matched `{sigil}`"),
            },
            None => Tag::Escaped,
        }
    }

    /// Skips over the body and close of a comment.
    fn parse_comment(&mut self, open: &OpenTag<'_>) -> Result<()> {
        match self.scanner.scan_until(&FIND_CLOSE_COMMENT) {
            Some(_) => Ok(()),
            None => Err(self.err_unclosed(Tag::Comment, open)),
        }
    }

    /// Parses the name inside a tag.
    fn parse_content(&mut self, tag: Tag, open: &OpenTag<'_>) -> Result<&'source str> {
        let i = self.scanner.pos();
        if let Some(captures) = self.scanner.scan(&CONTENT) {
            return Ok(captures.get(0).map_or("", |m| m.as_str()));
        }

        if self.scanner.check(tag.close()).is_some() {
            return Err(Error::syntax(
                ErrorKind::IllegalTagContent,
                "illegal content in tag, expected a name",
                self.source(),
                open.span.to(i),
            ));
        }

        if tag == Tag::Escaped {
            if let Some(c) = self.source()[i..].chars().next() {
                return Err(Error::syntax(
                    ErrorKind::UnexpectedTagSigil,
                    format!("unexpected tag type `{c}`"),
                    self.source(),
                    Span::new(i, i + c.len_utf8()),
                ));
            }
        }

        Err(self.err_content(tag, open))
    }

    /// Parses the closing delimiter of a tag.
    fn parse_close(&mut self, tag: Tag, open: &OpenTag<'_>) -> Result<()> {
        match self.scanner.scan(tag.close()) {
            Some(_) => Ok(()),
            None => Err(self.err_content(tag, open)),
        }
    }

    /// Consumes text up to the next place a tag could start.
    fn parse_text(&mut self) -> Result<()> {
        let text = match self.scanner.scan_until(&NEXT_OPEN_TAG) {
            Some(until) => {
                // Rewind to the start of the match so that the tag parser
                // sees the padding and the delimiter.
                let matched = until.captures.get(0).map_or(0, |m| m.len());
                self.scanner.set_pos(until.start)?;
                &until.consumed[..until.consumed.len() - matched]
            }
            None => {
                let rest = self
                    .scanner
                    .substring(self.scanner.pos(), self.scanner.len())?;
                self.scanner.set_pos(self.scanner.len())?;
                rest
            }
        };
        if !text.is_empty() {
            self.push(Token::Text(text.to_owned()));
        }
        Ok(())
    }

    /// Adds the parsed tag to the token tree.
    fn apply(&mut self, tag: Tag, name: &'source str, span: Span) -> Result<()> {
        match tag {
            Tag::Comment => {}

            Tag::Escaped | Tag::Triple | Tag::Ampersand => {
                self.push(Token::Variable {
                    name: name.to_owned(),
                    escape: tag == Tag::Escaped,
                });
            }

            Tag::Section | Tag::Inverted => {
                self.sections.push(Frame {
                    name,
                    inverted: tag == Tag::Inverted,
                    tokens: Vec::new(),
                    span,
                });
            }

            Tag::Close => {
                let frame = match self.sections.pop() {
                    Some(frame) if frame.name == name => frame,
                    Some(frame) => {
                        return Err(Error::syntax(
                            ErrorKind::SectionMismatch,
                            format!("expected close tag for `{}`, found `{name}`", frame.name),
                            self.source(),
                            span,
                        ));
                    }
                    None => {
                        return Err(Error::syntax(
                            ErrorKind::SectionMismatch,
                            format!("unexpected close tag for `{name}`, no section is open"),
                            self.source(),
                            span,
                        ));
                    }
                };
                self.push(Token::Section {
                    name: frame.name.to_owned(),
                    inverted: frame.inverted,
                    tokens: frame.tokens,
                });
            }

            Tag::Partial => {
                self.push(Token::Partial {
                    name: name.to_owned(),
                });
            }
        }
        Ok(())
    }

    /// Appends a token to the innermost open section.
    fn push(&mut self, token: Token) {
        match self.sections.last_mut() {
            Some(frame) => frame.tokens.push(token),
            None => self.root.push(token),
        }
    }

    fn source(&self) -> &'source str {
        self.scanner.source()
    }

    /// The tag content didn't run up to a close sequence. Either there is a
    /// close sequence further on, in which case something in between is not
    /// allowed, or there is none at all.
    fn err_content(&self, tag: Tag, open: &OpenTag<'_>) -> Error {
        match self.scanner.check_until(tag.find_close()) {
            Some(until) => Error::syntax(
                ErrorKind::IllegalTagContent,
                "illegal content in tag",
                self.source(),
                open.span.to(until.start),
            ),
            None => self.err_unclosed(tag, open),
        }
    }

    fn err_unclosed(&self, tag: Tag, open: &OpenTag<'_>) -> Error {
        Error::syntax(
            ErrorKind::UnclosedTag,
            format!("unclosed {} tag", tag.human()),
            self.source(),
            open.span,
        )
    }
}

impl Tag {
    fn human(&self) -> &'static str {
        match self {
            Self::Comment => "comment",
            Self::Escaped => "variable",
            Self::Triple | Self::Ampersand => "unescaped variable",
            Self::Section => "section",
            Self::Inverted => "inverted section",
            Self::Close => "section close",
            Self::Partial => "partial",
        }
    }

    /// The anchored close sequence for this tag.
    fn close(&self) -> &'static Regex {
        match self {
            Self::Triple => &CLOSE_TRIPLE,
            _ => &CLOSE,
        }
    }

    fn find_close(&self) -> &'static Regex {
        match self {
            Self::Triple => &FIND_CLOSE_TRIPLE,
            _ => &FIND_CLOSE,
        }
    }

    /// Whether this tag removes its whole line when it is the only thing on
    /// it. Variables never do.
    fn is_standalone(&self) -> bool {
        !matches!(self, Self::Escaped | Self::Triple | Self::Ampersand)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn text(s: &str) -> Token {
        Token::Text(s.to_owned())
    }

    fn var(name: &str) -> Token {
        Token::Variable {
            name: name.to_owned(),
            escape: true,
        }
    }

    #[track_caller]
    fn parse(source: &str) -> Vec<Token> {
        Parser::new(source).parse_template().unwrap()
    }

    #[track_caller]
    fn parse_err(source: &str) -> ErrorKind {
        Parser::new(source).parse_template().unwrap_err().kind()
    }

    #[test]
    fn parse_empty() {
        assert!(parse("").is_empty());
    }

    #[test]
    fn parse_padding_mid_line_is_text() {
        assert_eq!(parse("{{a}}  {{b}}"), [var("a"), text("  "), var("b")]);
    }

    #[test]
    fn parse_padding_before_variable_keeps_order() {
        assert_eq!(parse("  {{a}} x\n"), [text("  "), var("a"), text(" x\n")]);
    }

    #[test]
    fn parse_text_stops_before_line_padding() {
        assert_eq!(parse("ab\n\t {{a}}"), [text("ab\n"), text("\t "), var("a")]);
        assert_eq!(parse("ab {{a}}"), [text("ab "), var("a")]);
    }

    #[test]
    fn parse_standalone_at_end_of_input() {
        assert_eq!(parse("a\n  {{! c }}  "), [text("a\n")]);
    }

    #[test]
    fn parse_standalone_crlf() {
        assert_eq!(parse("a\r\n{{! c }}\r\nb"), [text("a\r\n"), text("b")]);
    }

    #[test]
    fn parse_variable_at_line_start_with_padding_at_end_of_input() {
        assert_eq!(parse("  {{a}}"), [text("  "), var("a")]);
    }

    #[test]
    fn parse_comment_spans_lines() {
        assert_eq!(parse("{{!\n}}\n}}x"), [text("}}x")]);
    }

    #[test]
    fn parse_sigil_errors() {
        assert_eq!(parse_err("{{=<% %>=}}"), ErrorKind::UnexpectedTagSigil);
        assert_eq!(parse_err("{{ @name }}"), ErrorKind::UnexpectedTagSigil);
    }

    #[test]
    fn parse_content_errors() {
        assert_eq!(parse_err("{{}}"), ErrorKind::IllegalTagContent);
        assert_eq!(parse_err("{{#  }}"), ErrorKind::IllegalTagContent);
        assert_eq!(parse_err("{{a b}}"), ErrorKind::IllegalTagContent);
        assert_eq!(parse_err("{{{a }}"), ErrorKind::UnclosedTag);
        assert_eq!(parse_err("{{a"), ErrorKind::UnclosedTag);
        assert_eq!(parse_err("{{"), ErrorKind::UnclosedTag);
        assert_eq!(parse_err("{{! never closed"), ErrorKind::UnclosedTag);
    }
}
