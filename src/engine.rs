use std::collections::BTreeMap;
use std::fmt;

use crate::fmt::{escape_html, EscapeFn, Formatter};
use crate::render::{Partials, Renderer, DEFAULT_MAX_PARTIAL_DEPTH};
use crate::{Result, Template};

/// The rendering engine.
///
/// The engine stores named templates that `{{> name }}` tags resolve against,
/// the escape function, and the maximum partial depth. Generally, you only
/// need to construct one engine during the lifetime of a program.
///
/// # Examples
///
/// ```
/// let mut engine = whisker::Engine::new();
/// engine.add_partial("user", "<b>{{ name }}</b>")?;
///
/// let template = engine.compile("{{# users }}{{> user }}{{/ users }}")?;
/// let result = engine
///     .renderer(&template)
///     .to_string_from(&whisker::value! { users: [{ name: "John" }, { name: "Jane" }] })?;
///
/// assert_eq!(result, "<b>John</b><b>Jane</b>");
/// # Ok::<(), whisker::Error>(())
/// ```
pub struct Engine {
    templates: BTreeMap<String, Template>,
    escape: Box<EscapeFn>,
    max_partial_depth: usize,
}

impl Default for Engine {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl Engine {
    /// Construct a new engine.
    #[inline]
    pub fn new() -> Self {
        Self {
            templates: BTreeMap::new(),
            escape: Box::new(escape_html),
            max_partial_depth: DEFAULT_MAX_PARTIAL_DEPTH,
        }
    }

    /// Set the function used to escape variables.
    ///
    /// Defaults to [`escape_html`][crate::fmt::escape_html].
    ///
    /// # Examples
    ///
    /// ```
    /// use std::fmt::Write;
    ///
    /// let mut engine = whisker::Engine::new();
    /// engine.set_escape(|f, s| {
    ///     f.write_str(&s.to_uppercase())?;
    ///     Ok(())
    /// });
    ///
    /// let template = engine.compile("{{ name }}")?;
    /// let result = engine
    ///     .renderer(&template)
    ///     .to_string_from(&whisker::value! { name: "john" })?;
    /// assert_eq!(result, "JOHN");
    /// # Ok::<(), whisker::Error>(())
    /// ```
    #[inline]
    pub fn set_escape<F>(&mut self, escape: F)
    where
        F: Fn(&mut Formatter<'_>, &str) -> crate::fmt::Result + Sync + Send + 'static,
    {
        self.escape = Box::new(escape);
    }

    /// Set the maximum number of nested partials, defaults to 64.
    ///
    /// Rendering fails with [`ErrorKind::MaxPartialDepth`][crate::ErrorKind]
    /// once partials are nested deeper than this.
    #[inline]
    pub fn set_max_partial_depth(&mut self, depth: usize) {
        self.max_partial_depth = depth;
    }

    /// Compile a template and store it under the given name.
    ///
    /// Replaces any existing template with the same name.
    #[inline]
    pub fn add_partial(&mut self, name: impl Into<String>, source: &str) -> Result<()> {
        let template = Template::compile(source)?;
        self.templates.insert(name.into(), template);
        Ok(())
    }

    /// Lookup a stored template by name.
    #[inline]
    pub fn get_partial(&self, name: &str) -> Option<&Template> {
        self.templates.get(name)
    }

    /// Remove a stored template, returning it if it existed.
    #[inline]
    pub fn remove_partial(&mut self, name: &str) -> Option<Template> {
        self.templates.remove(name)
    }

    /// Compile a template without storing it.
    #[inline]
    pub fn compile(&self, source: &str) -> Result<Template> {
        Template::compile(source)
    }

    /// Returns a renderer for the template configured with this engine's
    /// partials, escape function, and maximum partial depth.
    #[inline]
    pub fn renderer<'a>(&'a self, template: &'a Template) -> Renderer<'a> {
        template
            .renderer()
            .with_partials(self)
            .with_escape(&*self.escape)
            .with_max_partial_depth(self.max_partial_depth)
    }

    /// Render a stored template to a string using the provided serializable
    /// context.
    ///
    /// A name that is not stored renders as an empty string, the same as an
    /// unknown partial tag.
    ///
    /// # Examples
    ///
    /// ```
    /// let mut engine = whisker::Engine::new();
    /// engine.add_partial("hello", "Hello {{ name }}!")?;
    ///
    /// let result = engine.render("hello", whisker::value! { name: "World" })?;
    /// assert_eq!(result, "Hello World!");
    /// # Ok::<(), whisker::Error>(())
    /// ```
    #[cfg(feature = "serde")]
    #[cfg_attr(docsrs, doc(cfg(feature = "serde")))]
    pub fn render<S>(&self, name: &str, ctx: S) -> Result<String>
    where
        S: ::serde::Serialize,
    {
        match self.templates.get(name) {
            Some(template) => self.renderer(template).to_string(ctx),
            None => {
                tracing::debug!(template = %name, "unknown template, rendering nothing");
                Ok(String::new())
            }
        }
    }
}

impl Partials for Engine {
    #[inline]
    fn get_partial(&self, name: &str) -> Option<&Template> {
        self.templates.get(name)
    }
}

impl fmt::Debug for Engine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Engine")
            .field("templates", &self.templates.keys())
            .field("escape", &"<escape>")
            .field("max_partial_depth", &self.max_partial_depth)
            .finish()
    }
}
