//! The ParseError type for wrapping parsing diagnostics.

use thiserror::Error;

use crate::error::Diagnostic;

/// Error returned by [`parse`](crate::parse).
///
/// Wraps every error diagnostic found in the document; parsing does not stop
/// at the first malformed directive.
#[derive(Debug, Error)]
#[error("{}", summary(.diagnostics))]
pub struct ParseError {
    diagnostics: Vec<Diagnostic>,
}

impl ParseError {
    /// Create a new parse error from diagnostics.
    pub fn new(diagnostics: Vec<Diagnostic>) -> Self {
        Self { diagnostics }
    }

    /// Get all diagnostics in this error.
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }
}

fn summary(diagnostics: &[Diagnostic]) -> String {
    match diagnostics {
        [] => String::new(),
        [only] => only.to_string(),
        [first, rest @ ..] => format!("{first} (+{} more)", rest.len()),
    }
}

impl From<Diagnostic> for ParseError {
    fn from(diagnostic: Diagnostic) -> Self {
        Self {
            diagnostics: vec![diagnostic],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;

    #[test]
    fn test_parse_error_display_single() {
        let err: ParseError = Diagnostic::error("unterminated attribute list")
            .with_code(ErrorCode::E100)
            .into();

        assert_eq!(err.diagnostics().len(), 1);
        assert_eq!(err.to_string(), "error[E100]: unterminated attribute list");
    }

    #[test]
    fn test_parse_error_display_multiple() {
        let err = ParseError::new(vec![
            Diagnostic::error("first"),
            Diagnostic::error("second"),
            Diagnostic::error("third"),
        ]);

        assert_eq!(err.to_string(), "error: first (+2 more)");
    }
}
