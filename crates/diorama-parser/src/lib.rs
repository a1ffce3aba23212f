//! # Diorama Parser
//!
//! Reads AsciiDoc source far enough to find what Diorama needs: document
//! attribute entries and block macro directives. Every other line is kept as
//! opaque text so the document can be written back after the directives are
//! replaced.
//!
//! ## Usage
//!
//! ```
//! # use diorama_parser::{parse, ItemKind, ParseError};
//!
//! fn main() -> Result<(), ParseError> {
//!     let source = "\
//! = Architecture
//! :imagesdir: diagrams
//!
//! structurizrc4::model/workspace.dsl[viewKey=SystemContext, title=\"System context\"]
//! ";
//!
//!     let document = parse(source)?;
//!     assert_eq!(document.attributes().get("imagesdir"), Some("diagrams"));
//!
//!     let (item, directive) = document.directives().next().unwrap();
//!     assert_eq!(item.line(), 4);
//!     assert_eq!(directive.name(), "structurizrc4");
//!     assert_eq!(directive.target(), "model/workspace.dsl");
//!     assert_eq!(directive.attributes().get("title"), Some("System context"));
//!     Ok(())
//! }
//! ```

pub mod error;

mod parser;
mod source;
mod span;

pub use error::ParseError;
pub use source::{Directive, Item, ItemKind, SourceDocument};
pub use span::Span;

/// Parse document source into classified lines.
///
/// Attribute entries (`:name: value`) and block macros
/// (`name::target[attributes]`) are recognized outside verbatim delimited
/// blocks. Malformed attribute lists are reported together.
///
/// # Errors
///
/// Returns a [`ParseError`] holding every error [`error::Diagnostic`] when at
/// least one directive is malformed. Warnings alone do not fail the parse;
/// they are available from [`SourceDocument::warnings`].
pub fn parse(source: &str) -> Result<SourceDocument, ParseError> {
    parser::parse_document(source)
}
