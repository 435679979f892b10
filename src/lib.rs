//! A logic-less Mustache template engine.
//!
//! # Features
//!
//! ### Syntax
//!
//! - Variables: `{{ user.name }}`, unescaped: `{{{ user.name }}}` or
//!   `{{& user.name }}`
//! - Sections: `{{# users }} ... {{/ users }}`
//! - Inverted sections: `{{^ users }} ... {{/ users }}`
//! - Partials: `{{> user }}`
//! - Comments: `{{! ignored }}`
//! - Standalone tags are removed together with their line
//!
//! ### Engine
//!
//! - Compile once into an inspectable token tree, render many times
//! - Render to a [`String`] or any [`std::io::Write`] implementor
//! - Render using any [`serde`] serializable values
//! - Customizable escape function, HTML escaping by default
//! - Convenient macro for quick rendering:
//!   `whisker::value!{ name: "John", age: 42 }`
//!
//! # Getting started
//!
//! A template is compiled using [`compile`] and rendered with
//! [`.render`][Template::render].
//!
//! ```
//! let template = whisker::compile("Hello {{ user.name }}!")?;
//! let result = template.render(whisker::value! { user: { name: "John Smith" } })?;
//! assert_eq!(result, "Hello John Smith!");
//! # Ok::<(), whisker::Error>(())
//! ```
//!
//! Compiled templates can be inspected.
//!
//! ```
//! use whisker::Token;
//!
//! let template = whisker::compile("Hi {{ name }}")?;
//! assert_eq!(
//!     template.tokens(),
//!     [
//!         Token::Text("Hi ".into()),
//!         Token::Variable { name: "name".into(), escape: true },
//!     ]
//! );
//! # Ok::<(), whisker::Error>(())
//! ```
//!
//! Partials are stored in an [`Engine`], see its documentation for more.
//!
//! # Examples
//!
//! ### Render using structured data
//!
//! ```
//! #[derive(serde::Serialize)]
//! struct Context { users: Vec<User> }
//!
//! #[derive(serde::Serialize)]
//! struct User { name: String }
//!
//! let ctx = Context {
//!     users: vec![User { name: "John".into() }, User { name: "Jane".into() }],
//! };
//!
//! let result = whisker::compile("{{# users }}<{{ name }}>{{/ users }}")?.render(&ctx)?;
//! assert_eq!(result, "<John><Jane>");
//! # Ok::<(), whisker::Error>(())
//! ```
//!
//! ### Render a template to an `impl io::Write`
//!
//! ```
//! use std::io;
//!
//! let stdout = io::BufWriter::new(io::stdout());
//!
//! whisker::compile("Hello {{ user.name }}")?
//!     .render_to_writer(stdout, whisker::value! { user: { name: "John Smith" } })?;
//! # Ok::<(), whisker::Error>(())
//! ```
//!
//! ### Errors
//!
//! Compile errors point at the offending tag.
//!
//! ```
//! let err = whisker::compile("Hello {{ user.name }!").unwrap_err();
//! assert_eq!(err.kind(), whisker::ErrorKind::UnclosedTag);
//! assert_eq!(
//!     format!("{:#}", err),
//!     "
//!    |
//!  1 | Hello {{ user.name }!
//!    |       ^^ unclosed variable tag
//! "
//! );
//! ```
//!
//! # Features
//!
//! - **`serde`** _(enabled by default)_: render any [`serde::Serialize`]
//!   context and convert values using [`to_value`].
//! - **`unicode`** _(enabled by default)_: allow Unicode word characters in
//!   tag names and use display width when formatting errors.

#![cfg_attr(docsrs, feature(doc_cfg))]

mod compile;
mod engine;
mod error;
pub mod fmt;
mod macros;
mod render;
mod types;
mod value;

pub use crate::engine::Engine;
pub use crate::error::{Error, ErrorKind};
pub use crate::render::{Partials, Renderer};
pub use crate::types::token::Token;
#[cfg(feature = "serde")]
pub use crate::value::to_value;
pub use crate::value::{List, Map, Value};

/// A type alias for results in this crate.
pub type Result<T> = std::result::Result<T, Error>;

/// A compiled template.
///
/// Owns its token tree, it can be stored, shared between threads, and
/// rendered any number of times.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    tokens: Vec<Token>,
}

/// Compile a template.
#[inline]
pub fn compile(source: &str) -> Result<Template> {
    Template::compile(source)
}

impl Template {
    /// Compile a template.
    #[inline]
    pub fn compile(source: &str) -> Result<Self> {
        compile::template(source)
    }

    /// Returns the compiled token tree.
    #[inline]
    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    /// Render the template to a string using the provided serializable
    /// context.
    ///
    /// Partial tags render as empty strings, use an [`Engine`] or
    /// [`.renderer()`][Template::renderer] to provide partials.
    #[cfg(feature = "serde")]
    #[cfg_attr(docsrs, doc(cfg(feature = "serde")))]
    #[inline]
    pub fn render<S>(&self, ctx: S) -> Result<String>
    where
        S: serde::Serialize,
    {
        self.renderer().to_string(ctx)
    }

    /// Render the template to a string using the provided value.
    #[inline]
    pub fn render_from(&self, ctx: &Value) -> Result<String> {
        self.renderer().to_string_from(ctx)
    }

    /// Render the template to a writer using the provided serializable
    /// context.
    #[cfg(feature = "serde")]
    #[cfg_attr(docsrs, doc(cfg(feature = "serde")))]
    #[inline]
    pub fn render_to_writer<W, S>(&self, writer: W, ctx: S) -> Result<()>
    where
        W: std::io::Write,
        S: serde::Serialize,
    {
        self.renderer().to_writer(writer, ctx)
    }

    /// Returns a renderer for this template that can be configured with
    /// partials, an escape function, and a maximum partial depth.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::collections::BTreeMap;
    ///
    /// let mut partials = BTreeMap::new();
    /// partials.insert("name".to_owned(), whisker::compile("<b>{{ name }}</b>")?);
    ///
    /// let result = whisker::compile("Hello {{> name }}")?
    ///     .renderer()
    ///     .with_partials(&partials)
    ///     .to_string_from(&whisker::value! { name: "John" })?;
    /// assert_eq!(result, "Hello <b>John</b>");
    /// # Ok::<(), whisker::Error>(())
    /// ```
    #[inline]
    pub fn renderer(&self) -> Renderer<'_> {
        Renderer::new(self)
    }
}
