//! Compile the template source into a token tree.
//!
//! This process has two layers:
//! - The scanner is a cursor over the source that matches patterns.
//! - The parser drives the scanner, recognizing tags and text, and builds
//!   the token tree.

mod parse;
mod scan;

use crate::{Result, Template};

/// Compile a template into a token tree.
pub fn template(source: &str) -> Result<Template> {
    let tokens = parse::Parser::new(source).parse_template()?;
    tracing::debug!(tokens = tokens.len(), "compiled template");
    Ok(Template { tokens })
}
