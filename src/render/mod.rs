#![allow(clippy::wrong_self_convention)]

mod core;
mod stack;

use std::collections::{BTreeMap, HashMap};
use std::io;

use crate::fmt::{escape_html, EscapeFn, Formatter, Writer};
use crate::render::core::RendererImpl;
use crate::render::stack::Stack;
use crate::{Error, Result, Template, Value};

/// The default maximum number of nested partials.
pub(crate) const DEFAULT_MAX_PARTIAL_DEPTH: usize = 64;

/// A registry of named templates that `{{> name }}` tags resolve against.
///
/// Implemented for [`Engine`][crate::Engine] and for maps of compiled
/// templates.
pub trait Partials {
    /// Returns the partial with the given name, if any.
    fn get_partial(&self, name: &str) -> Option<&Template>;
}

impl Partials for BTreeMap<String, Template> {
    fn get_partial(&self, name: &str) -> Option<&Template> {
        self.get(name)
    }
}

impl<S> Partials for HashMap<String, Template, S>
where
    S: std::hash::BuildHasher,
{
    fn get_partial(&self, name: &str) -> Option<&Template> {
        self.get(name)
    }
}

/// A renderer that walks a compiled [`Template`] against a context.
///
/// This struct is created by [`Template::renderer`] or
/// [`Engine::renderer`][crate::Engine::renderer].
#[must_use = "must call `.to_string()` or `.to_writer(..)` on the renderer"]
pub struct Renderer<'render> {
    template: &'render Template,
    partials: Option<&'render dyn Partials>,
    escape: &'render EscapeFn,
    max_partial_depth: usize,
}

impl<'render> Renderer<'render> {
    pub(crate) fn new(template: &'render Template) -> Self {
        Self {
            template,
            partials: None,
            escape: &escape_html,
            max_partial_depth: DEFAULT_MAX_PARTIAL_DEPTH,
        }
    }

    /// Set the registry used to resolve partial tags.
    ///
    /// Without a registry every partial renders as an empty string.
    pub fn with_partials(mut self, partials: &'render dyn Partials) -> Self {
        self.partials = Some(partials);
        self
    }

    /// Set the function used to escape variables, defaults to
    /// [`escape_html`].
    pub fn with_escape(mut self, escape: &'render EscapeFn) -> Self {
        self.escape = escape;
        self
    }

    /// Set the maximum number of nested partials.
    ///
    /// Defaults to the engine setting, or 64 without an engine.
    pub fn with_max_partial_depth(mut self, depth: usize) -> Self {
        self.max_partial_depth = depth;
        self
    }

    /// Render the template to a string using the provided serializable
    /// context.
    #[cfg(feature = "serde")]
    #[cfg_attr(docsrs, doc(cfg(feature = "serde")))]
    pub fn to_string<S>(self, ctx: S) -> Result<String>
    where
        S: ::serde::Serialize,
    {
        let globals = crate::to_value(ctx)?;
        self.to_string_from(&globals)
    }

    /// Render the template to a string using the provided value.
    pub fn to_string_from(self, globals: &Value) -> Result<String> {
        let mut s = String::new();
        let mut f = Formatter::with_string(&mut s);
        self.into_impl(globals).render(&mut f, self.template)?;
        Ok(s)
    }

    /// Render the template to the given writer using the provided
    /// serializable context.
    #[cfg(feature = "serde")]
    #[cfg_attr(docsrs, doc(cfg(feature = "serde")))]
    pub fn to_writer<W, S>(self, writer: W, ctx: S) -> Result<()>
    where
        W: io::Write,
        S: ::serde::Serialize,
    {
        let globals = crate::to_value(ctx)?;
        self.to_writer_from(writer, &globals)
    }

    /// Render the template to the given writer using the provided value.
    pub fn to_writer_from<W>(self, writer: W, globals: &Value) -> Result<()>
    where
        W: io::Write,
    {
        let mut w = Writer::new(writer);
        let mut f = Formatter::with_writer(&mut w);
        self.into_impl(globals)
            .render(&mut f, self.template)
            .map_err(|err| w.take_err().map(Error::from).unwrap_or(err))
    }

    fn into_impl<'a>(&self, globals: &'a Value) -> RendererImpl<'a>
    where
        'render: 'a,
    {
        RendererImpl {
            partials: self.partials,
            escape: self.escape,
            max_partial_depth: self.max_partial_depth,
            stack: Stack::new(globals),
        }
    }
}
