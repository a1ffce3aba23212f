//! Labeled source spans for diagnostic messages.

use crate::span::Span;

/// A message attached to a span of the document source.
///
/// A diagnostic normally carries one primary label marking where the problem
/// is, and optionally secondary labels pointing at related text:
///
/// ```text
/// error[E101]: unterminated quoted value
///   --> architecture.adoc:12:27
///    |
/// 12 | structurizrc4::model.dsl[title="Context view]
///    |                          ------ ^^^^^^^^^^^^^^ closing `"` is missing
///    |                          |
///    |                          value starts here
/// ```
#[derive(Debug, Clone)]
pub struct Label {
    span: Span,
    message: String,
    is_primary: bool,
}

impl Label {
    /// Create a label marking the main location of a diagnostic.
    pub fn primary(span: Span, message: impl Into<String>) -> Self {
        Self {
            span,
            message: message.into(),
            is_primary: true,
        }
    }

    /// Create a label giving additional context.
    pub fn secondary(span: Span, message: impl Into<String>) -> Self {
        Self {
            span,
            message: message.into(),
            is_primary: false,
        }
    }

    /// Get the span this label applies to.
    pub fn span(&self) -> Span {
        self.span
    }

    /// Get the label message.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Check if this is a primary label.
    pub fn is_primary(&self) -> bool {
        self.is_primary
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_label_kinds() {
        let primary = Label::primary(Span::new(30..44), "closing `\"` is missing");
        let secondary = Label::secondary(Span::new(24..30), "value starts here");

        assert!(primary.is_primary());
        assert!(!secondary.is_primary());
        assert_eq!(primary.span().start(), 30);
        assert_eq!(secondary.span().end(), 30);
        assert_eq!(secondary.message(), "value starts here");
    }
}
