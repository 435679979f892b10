//! The token tree produced by compiling a template.

/// A single node in a compiled template.
///
/// Comments and section close tags only exist while parsing, a compiled
/// template never contains them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// Raw template text, emitted verbatim.
    Text(String),

    /// A variable tag, e.g. `{{ name }}` or `{{{ name }}}`.
    Variable {
        /// The name to look up in the context.
        name: String,
        /// Whether the value is HTML escaped when rendered.
        escape: bool,
    },

    /// A section, e.g. `{{# name }} ... {{/ name }}` or
    /// `{{^ name }} ... {{/ name }}`.
    Section {
        /// The name to look up in the context.
        name: String,
        /// Whether this is an inverted section.
        inverted: bool,
        /// The tokens between the open and close tags.
        tokens: Vec<Token>,
    },

    /// A partial reference, e.g. `{{> name }}`.
    Partial {
        /// The name of the partial template.
        name: String,
    },
}

impl Token {
    /// Returns the name of the token, or `None` for text.
    pub fn name(&self) -> Option<&str> {
        match self {
            Self::Text(_) => None,
            Self::Variable { name, .. } | Self::Section { name, .. } | Self::Partial { name } => {
                Some(name)
            }
        }
    }

    /// Returns the child tokens of a section.
    pub fn tokens(&self) -> Option<&[Token]> {
        match self {
            Self::Section { tokens, .. } => Some(tokens),
            _ => None,
        }
    }
}
