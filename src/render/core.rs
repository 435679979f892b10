use std::fmt::Write;

use crate::error::ErrorKind;
use crate::fmt::{self, EscapeFn, Formatter};
use crate::render::stack::Stack;
use crate::render::Partials;
use crate::types::token::Token;
use crate::{Error, Result, Template, Value};

/// Walks the token tree depth first, writing to the formatter.
pub struct RendererImpl<'a> {
    pub(crate) partials: Option<&'a dyn Partials>,
    pub(crate) escape: &'a EscapeFn,
    pub(crate) max_partial_depth: usize,
    pub(crate) stack: Stack<'a>,
}

impl<'a> RendererImpl<'a> {
    pub(crate) fn render(mut self, f: &mut Formatter<'_>, template: &'a Template) -> Result<()> {
        self.render_tokens(f, &template.tokens, 0)
    }

    fn render_tokens(
        &mut self,
        f: &mut Formatter<'_>,
        tokens: &'a [Token],
        depth: usize,
    ) -> Result<()> {
        for token in tokens {
            match token {
                Token::Text(text) => {
                    f.write_str(text)?;
                }

                Token::Variable { name, escape } => {
                    if let Some(value) = self.stack.lookup(name)? {
                        self.emit(f, name, value, *escape)?;
                    }
                }

                Token::Section {
                    name,
                    inverted: false,
                    tokens,
                } => match self.stack.lookup(name)? {
                    Some(Value::List(list)) => {
                        tracing::trace!(section = %name, len = list.len(), "rendering section for each item");
                        for item in list {
                            self.render_scope(f, item, tokens, depth)?;
                        }
                    }
                    Some(value) if value.is_truthy() => {
                        tracing::trace!(section = %name, "rendering section");
                        self.render_scope(f, value, tokens, depth)?;
                    }
                    _ => {}
                },

                Token::Section {
                    name,
                    inverted: true,
                    tokens,
                } => {
                    let truthy = self.stack.lookup(name)?.map_or(false, Value::is_truthy);
                    if !truthy {
                        tracing::trace!(section = %name, "rendering inverted section");
                        self.render_tokens(f, tokens, depth)?;
                    }
                }

                Token::Partial { name } => {
                    match self.partials.and_then(|partials| partials.get_partial(name)) {
                        Some(partial) => {
                            if depth >= self.max_partial_depth {
                                return Err(Error::max_partial_depth(self.max_partial_depth));
                            }
                            tracing::trace!(partial = %name, depth, "expanding partial");
                            self.render_tokens(f, &partial.tokens, depth + 1)?;
                        }
                        None => {
                            tracing::debug!(partial = %name, "unknown partial, rendering nothing");
                        }
                    }
                }
            }
        }
        Ok(())
    }

    /// Renders the tokens with the value pushed onto the context stack.
    fn render_scope(
        &mut self,
        f: &mut Formatter<'_>,
        value: &'a Value,
        tokens: &'a [Token],
        depth: usize,
    ) -> Result<()> {
        self.stack.push(value);
        let result = self.render_tokens(f, tokens, depth);
        self.stack.pop();
        result
    }

    /// Writes a variable, escaping it if required.
    fn emit(&self, f: &mut Formatter<'_>, name: &str, value: &Value, escape: bool) -> Result<()> {
        let result = match (value, escape) {
            (Value::String(s), true) => (self.escape)(f, s),
            (value, true) => {
                let mut s = String::new();
                let formatted = fmt::default(&mut Formatter::with_string(&mut s), value);
                formatted.and_then(|()| (self.escape)(f, &s))
            }
            (value, false) => fmt::default(f, value),
        };
        result.map_err(|err| {
            let msg = match err.message() {
                Some(msg) => format!("failed to render `{name}`: {msg}"),
                None => format!("failed to render `{name}`"),
            };
            Error::new(ErrorKind::Format, msg)
        })
    }
}
