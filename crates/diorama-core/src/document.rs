//! Document and block node types.
//!
//! This module models the small part of an AsciiDoc document tree that the
//! diagram macro interacts with:
//!
//! - [`Document`] - the document-level attribute and option mappings, plus
//!   the base directory used to resolve relative paths.
//! - [`Block`] - a structural node produced by a block macro, created through
//!   [`Block::new`] (the tree's block-creation primitive).
//! - [`BlockContext`] - the node type of a [`Block`].

use std::{fmt, path::PathBuf};

use crate::attributes::AttributeMap;

/// Document attribute holding the directory of the source document.
pub const DOCDIR_ATTRIBUTE: &str = "docdir";

/// Document option holding the base directory of the conversion.
pub const BASE_DIR_OPTION: &str = "base_dir";

/// Read-only view of a document's configuration.
///
/// Attributes come from the document header and from the command line;
/// options come from the API or the command line (for example `to_dir` and
/// `base_dir`). The two are deliberately kept apart because directory
/// resolution consults them as separate tiers.
#[derive(Debug, Clone, Default)]
pub struct Document {
    attributes: AttributeMap,
    options: AttributeMap,
}

impl Document {
    /// Creates a document from its attribute and option mappings.
    pub fn new(attributes: AttributeMap, options: AttributeMap) -> Self {
        Self {
            attributes,
            options,
        }
    }

    /// Returns the document attributes.
    pub fn attributes(&self) -> &AttributeMap {
        &self.attributes
    }

    /// Returns the document options.
    pub fn options(&self) -> &AttributeMap {
        &self.options
    }

    /// Returns the directory that relative paths in the document resolve against.
    ///
    /// Uses the `docdir` attribute, then the `base_dir` option, and finally the
    /// current directory.
    pub fn base_dir(&self) -> PathBuf {
        self.attributes
            .get_non_blank(DOCDIR_ATTRIBUTE)
            .or_else(|| self.options.get_non_blank(BASE_DIR_OPTION))
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("."))
    }
}

/// The node type of a [`Block`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BlockContext {
    /// A block image (`image::target[]`).
    Image,
    /// A paragraph of literal content.
    Paragraph,
}

impl BlockContext {
    /// Returns the AsciiDoc name of the context.
    pub fn as_str(&self) -> &'static str {
        match self {
            BlockContext::Image => "image",
            BlockContext::Paragraph => "paragraph",
        }
    }
}

impl fmt::Display for BlockContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A structural node created by a block macro.
///
/// The `title` attribute, when present, becomes the block title. For image
/// blocks the `target` attribute names the image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    context: BlockContext,
    content: String,
    attributes: AttributeMap,
}

impl Block {
    /// Creates a new block node.
    ///
    /// # Arguments
    ///
    /// * `context` - Node type of the block.
    /// * `content` - Literal content (empty for images).
    /// * `attributes` - Block attributes such as `target` and `title`.
    ///
    /// # Examples
    ///
    /// ```
    /// use diorama_core::{attributes::AttributeMap, document::{Block, BlockContext}};
    ///
    /// let attrs: AttributeMap = [("target", "Context.svg"), ("title", "Context")]
    ///     .into_iter()
    ///     .collect();
    /// let block = Block::new(BlockContext::Image, "", attrs);
    ///
    /// assert_eq!(block.to_asciidoc(), ".Context\nimage::Context.svg[]");
    /// ```
    pub fn new(context: BlockContext, content: impl Into<String>, attributes: AttributeMap) -> Self {
        Self {
            context,
            content: content.into(),
            attributes,
        }
    }

    /// Returns the node type.
    pub fn context(&self) -> BlockContext {
        self.context
    }

    /// Returns the literal content.
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Returns the block attributes.
    pub fn attributes(&self) -> &AttributeMap {
        &self.attributes
    }

    /// Returns the block title, if one was set.
    pub fn title(&self) -> Option<&str> {
        self.attributes.get_non_blank("title")
    }

    /// Returns the image target for image blocks.
    pub fn target(&self) -> Option<&str> {
        self.attributes.get("target")
    }

    /// Serializes the block back to AsciiDoc source.
    pub fn to_asciidoc(&self) -> String {
        let mut out = String::new();
        if let Some(title) = self.title() {
            out.push('.');
            out.push_str(title);
            out.push('\n');
        }

        match self.context {
            BlockContext::Image => {
                let extra: AttributeMap = self
                    .attributes
                    .iter()
                    .filter(|(name, _)| !matches!(*name, "target" | "title"))
                    .collect();
                out.push_str("image::");
                out.push_str(self.target().unwrap_or_default());
                out.push('[');
                out.push_str(&extra.to_string());
                out.push(']');
            }
            BlockContext::Paragraph => out.push_str(&self.content),
        }

        out
    }
}
