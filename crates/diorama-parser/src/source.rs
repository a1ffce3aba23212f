//! Parsed representation of a document source.
//!
//! The parser does not build a full AsciiDoc tree. It splits the source into
//! lines and classifies each one as plain text, an attribute entry or a block
//! macro directive; the original text of every line is kept so the document
//! can be written back unchanged apart from the directives that get replaced.

use diorama_core::attributes::AttributeMap;

use crate::{error::Diagnostic, span::Span};

/// A document split into classified lines.
#[derive(Debug, Clone, Default)]
pub struct SourceDocument {
    items: Vec<Item>,
    warnings: Vec<Diagnostic>,
}

impl SourceDocument {
    pub(crate) fn new(items: Vec<Item>, warnings: Vec<Diagnostic>) -> Self {
        Self { items, warnings }
    }

    /// All lines in document order.
    pub fn items(&self) -> &[Item] {
        &self.items
    }

    /// Warnings found while parsing.
    pub fn warnings(&self) -> &[Diagnostic] {
        &self.warnings
    }

    /// Iterates over the block macro directives in document order.
    pub fn directives(&self) -> impl Iterator<Item = (&Item, &Directive)> {
        self.items.iter().filter_map(|item| match item.kind() {
            ItemKind::Directive(directive) => Some((item, directive)),
            _ => None,
        })
    }

    /// Folds every attribute entry into the effective document attributes.
    ///
    /// Later entries override earlier ones; `:name!:` removes an attribute.
    pub fn attributes(&self) -> AttributeMap {
        let mut attributes = AttributeMap::new();
        for item in &self.items {
            if let ItemKind::AttributeEntry { name, value } = item.kind() {
                match value {
                    Some(value) => {
                        attributes.insert(name.as_str(), value.as_str());
                    }
                    None => {
                        attributes.remove(name);
                    }
                }
            }
        }
        attributes
    }
}

/// One source line.
#[derive(Debug, Clone)]
pub struct Item {
    line: usize,
    span: Span,
    text: String,
    kind: ItemKind,
}

impl Item {
    pub(crate) fn new(line: usize, span: Span, text: impl Into<String>, kind: ItemKind) -> Self {
        Self {
            line,
            span,
            text: text.into(),
            kind,
        }
    }

    /// 1-based line number.
    pub fn line(&self) -> usize {
        self.line
    }

    /// Span of the line, without its line terminator.
    pub fn span(&self) -> Span {
        self.span
    }

    /// Original text of the line, without its line terminator.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Classification of the line.
    pub fn kind(&self) -> &ItemKind {
        &self.kind
    }
}

/// Classification of a source line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemKind {
    /// Anything that is not processed: prose, other blocks, comments and
    /// lines inside delimited blocks.
    Text,
    /// `:name: value` sets an attribute, `:name!:` unsets it (`value` is `None`).
    AttributeEntry { name: String, value: Option<String> },
    /// A block macro `name::target[attributes]`.
    Directive(Directive),
}

/// A block macro directive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Directive {
    name: String,
    target: String,
    attributes: AttributeMap,
}

impl Directive {
    pub(crate) fn new(
        name: impl Into<String>,
        target: impl Into<String>,
        attributes: AttributeMap,
    ) -> Self {
        Self {
            name: name.into(),
            target: target.into(),
            attributes,
        }
    }

    /// Macro name, the part before `::`.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Macro target, the part between `::` and `[`.
    pub fn target(&self) -> &str {
        &self.target
    }

    /// Parsed attribute list. Positional values are stored as `"1"`, `"2"`, ...
    pub fn attributes(&self) -> &AttributeMap {
        &self.attributes
    }
}
