//! Collector for accumulating diagnostics while scanning a document.

use crate::error::{Diagnostic, ParseError};

/// Accumulates diagnostics so that every malformed directive is reported,
/// not only the first one.
#[derive(Debug, Default)]
pub(crate) struct DiagnosticCollector {
    diagnostics: Vec<Diagnostic>,
    has_errors: bool,
}

impl DiagnosticCollector {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Record a diagnostic, marking the collector as failed for errors.
    pub(crate) fn emit(&mut self, diagnostic: Diagnostic) {
        if diagnostic.severity().is_error() {
            self.has_errors = true;
        }
        self.diagnostics.push(diagnostic);
    }

    /// Finish collection.
    ///
    /// - If any error was emitted, returns `Err(ParseError)` with all diagnostics.
    /// - Otherwise returns the warnings.
    pub(crate) fn finish(self) -> Result<Vec<Diagnostic>, ParseError> {
        if self.has_errors {
            Err(ParseError::new(self.diagnostics))
        } else {
            Ok(self.diagnostics)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{error::ErrorCode, span::Span};

    #[test]
    fn test_warnings_only_succeed() {
        let mut collector = DiagnosticCollector::new();
        collector.emit(Diagnostic::warning("delimited block is never closed").with_code(ErrorCode::W001));

        let warnings = collector.finish().expect("warnings must not fail");
        assert_eq!(warnings.len(), 1);
    }

    #[test]
    fn test_errors_keep_all_diagnostics() {
        let mut collector = DiagnosticCollector::new();
        collector.emit(Diagnostic::warning("delimited block is never closed"));
        collector.emit(
            Diagnostic::error("unterminated attribute list")
                .with_code(ErrorCode::E100)
                .with_label(Span::new(0..5), "here"),
        );

        let err = collector.finish().unwrap_err();
        assert_eq!(err.diagnostics().len(), 2);
    }
}
