//! Error adapter for converting Diorama errors to miette diagnostics.
//!
//! This module provides the bridge between the library's standard error types
//! and miette's rich diagnostic formatting used in the CLI.
//!
//! # Multi-Error Support
//!
//! When a [`diorama_parser::ParseError`] contains multiple diagnostics, each
//! diagnostic is rendered independently. Diagram blocks that failed during
//! processing are rendered one by one, pointing at their directive.

use std::fmt;

use miette::{Diagnostic as MietteDiagnostic, LabeledSpan, SourceSpan};

use diorama::{ConfigError, DioramaError, preprocess::BlockFailure};
use diorama_parser::error::Diagnostic;

/// Adapter for a single parser diagnostic.
pub struct DiagnosticAdapter<'a> {
    diag: &'a Diagnostic,
    src: &'a str,
}

impl<'a> DiagnosticAdapter<'a> {
    /// Create a new diagnostic adapter.
    pub fn new(diag: &'a Diagnostic, src: &'a str) -> Self {
        Self { diag, src }
    }
}

impl fmt::Debug for DiagnosticAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DiagnosticAdapter")
            .field("diag", &self.diag)
            .finish()
    }
}

impl fmt::Display for DiagnosticAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.diag.message())
    }
}

impl std::error::Error for DiagnosticAdapter<'_> {}

impl MietteDiagnostic for DiagnosticAdapter<'_> {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        self.diag
            .code()
            .map(|c| Box::new(c) as Box<dyn fmt::Display>)
    }

    fn severity(&self) -> Option<miette::Severity> {
        Some(match self.diag.severity() {
            diorama_parser::error::Severity::Error => miette::Severity::Error,
            diorama_parser::error::Severity::Warning => miette::Severity::Warning,
        })
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        self.diag
            .help()
            .map(|h| Box::new(h) as Box<dyn fmt::Display>)
    }

    fn source_code(&self) -> Option<&dyn miette::SourceCode> {
        Some(&self.src as &dyn miette::SourceCode)
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        let labels = self.diag.labels();
        if labels.is_empty() {
            return None;
        }

        Some(Box::new(labels.iter().map(|label| {
            let span = span_to_miette(label.span());
            let message = Some(label.message().to_string());
            if label.is_primary() {
                LabeledSpan::new_primary_with_span(message, span)
            } else {
                LabeledSpan::new_with_span(message, span)
            }
        })))
    }
}

/// Adapter for [`DioramaError`] variants without source locations.
pub struct ErrorAdapter<'a>(pub &'a DioramaError);

impl fmt::Debug for ErrorAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.0, f)
    }
}

impl fmt::Display for ErrorAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl std::error::Error for ErrorAdapter<'_> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.0.source()
    }
}

impl MietteDiagnostic for ErrorAdapter<'_> {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        error_code(self.0).map(|code| Box::new(code) as Box<dyn fmt::Display>)
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        error_help(self.0).map(|help| Box::new(help) as Box<dyn fmt::Display>)
    }
}

/// Adapter for a diagram block that failed to render.
pub struct BlockAdapter<'a> {
    failure: &'a BlockFailure,
    src: &'a str,
}

impl<'a> BlockAdapter<'a> {
    /// Create a new block adapter.
    pub fn new(failure: &'a BlockFailure, src: &'a str) -> Self {
        Self { failure, src }
    }
}

impl fmt::Debug for BlockAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BlockAdapter")
            .field("failure", &self.failure)
            .finish()
    }
}

impl fmt::Display for BlockAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self.failure.error(), f)
    }
}

impl std::error::Error for BlockAdapter<'_> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.failure.error().source()
    }
}

impl MietteDiagnostic for BlockAdapter<'_> {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        error_code(self.failure.error()).map(|code| Box::new(code) as Box<dyn fmt::Display>)
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        error_help(self.failure.error()).map(|help| Box::new(help) as Box<dyn fmt::Display>)
    }

    fn source_code(&self) -> Option<&dyn miette::SourceCode> {
        Some(&self.src as &dyn miette::SourceCode)
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        let span = span_to_miette(self.failure.span());
        Some(Box::new(std::iter::once(LabeledSpan::new_primary_with_span(
            Some("diagram left unrendered".to_string()),
            span,
        ))))
    }
}

/// A reportable error that can be rendered by miette.
#[derive(Debug)]
pub enum Reportable<'a> {
    /// A parser diagnostic with source location information.
    Diagnostic(DiagnosticAdapter<'a>),
    /// A failed diagram block, pointing at its directive.
    Block(BlockAdapter<'a>),
    /// A simple error without source location.
    Error(ErrorAdapter<'a>),
}

impl Reportable<'_> {
    fn inner(&self) -> &dyn MietteDiagnostic {
        match self {
            Reportable::Diagnostic(d) => d,
            Reportable::Block(b) => b,
            Reportable::Error(e) => e,
        }
    }
}

impl fmt::Display for Reportable<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self.inner(), f)
    }
}

impl std::error::Error for Reportable<'_> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.inner().source()
    }
}

impl MietteDiagnostic for Reportable<'_> {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        self.inner().code()
    }

    fn severity(&self) -> Option<miette::Severity> {
        self.inner().severity()
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        self.inner().help()
    }

    fn source_code(&self) -> Option<&dyn miette::SourceCode> {
        self.inner().source_code()
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        self.inner().labels()
    }
}

fn error_code(err: &DioramaError) -> Option<&'static str> {
    match err {
        DioramaError::Io(_) => Some("diorama::io"),
        DioramaError::Parse { .. } => None,
        DioramaError::Config(_) => Some("diorama::config"),
        DioramaError::Input(_) => Some("diorama::input"),
        DioramaError::Render(_) => Some("diorama::render"),
    }
}

fn error_help(err: &DioramaError) -> Option<&'static str> {
    match err {
        DioramaError::Config(ConfigError::MissingViewKey) => {
            Some("add `viewKey=<view key>` to the directive attributes")
        }
        DioramaError::Config(ConfigError::UnresolvedOutputDir) => {
            Some("set the `imagesoutdir` attribute or pass --destination-dir")
        }
        DioramaError::Input(_) => {
            Some("workspace paths are relative to the directory of the document")
        }
        _ => None,
    }
}

/// Convert a [`DioramaError`] into a list of reportable errors.
///
/// For [`DioramaError::Parse`], this returns one [`Reportable`] for each
/// diagnostic in the error. For other error variants, this returns a single
/// [`Reportable`].
pub fn to_reportables(err: &DioramaError) -> Vec<Reportable<'_>> {
    match err {
        DioramaError::Parse {
            err: parse_err,
            src,
        } => parse_err
            .diagnostics()
            .iter()
            .map(|d| Reportable::Diagnostic(DiagnosticAdapter::new(d, src)))
            .collect(),
        _ => vec![Reportable::Error(ErrorAdapter(err))],
    }
}

/// Convert failed diagram blocks into reportable errors.
pub fn failures_to_reportables<'a>(
    failures: &'a [BlockFailure],
    src: &'a str,
) -> Vec<Reportable<'a>> {
    failures
        .iter()
        .map(|failure| Reportable::Block(BlockAdapter::new(failure, src)))
        .collect()
}

/// Convert a parser [`Span`](diorama_parser::Span) to a miette [`SourceSpan`].
fn span_to_miette(span: diorama_parser::Span) -> SourceSpan {
    SourceSpan::new(span.start().into(), span.len())
}

#[cfg(test)]
mod tests {
    use diorama::{DocumentProcessor, attributes::AttributeMap};
    use diorama_parser::{
        Span,
        error::{ErrorCode, ParseError},
    };

    use super::*;

    #[test]
    fn test_single_diagnostic() {
        let diag = Diagnostic::error("unterminated attribute list")
            .with_code(ErrorCode::E100)
            .with_label(Span::new(0..5), "here")
            .with_help("close the list");
        let err = DioramaError::new_parse_error(ParseError::from(diag), "hello");

        let reportables = to_reportables(&err);
        assert_eq!(reportables.len(), 1);

        match &reportables[0] {
            Reportable::Diagnostic(d) => {
                assert_eq!(d.to_string(), "unterminated attribute list");
                assert_eq!(d.code().unwrap().to_string(), "E100");
            }
            _ => panic!("Expected Diagnostic"),
        }
    }

    #[test]
    fn test_multiple_diagnostics() {
        let parse_err = ParseError::new(vec![
            Diagnostic::error("first error").with_label(Span::new(0..5), "first"),
            Diagnostic::error("second error")
                .with_code(ErrorCode::E102)
                .with_label(Span::new(10..15), "second"),
        ]);
        let err = DioramaError::new_parse_error(parse_err, "source code here...");

        let reportables = to_reportables(&err);

        assert_eq!(reportables.len(), 2);
        assert_eq!(reportables[0].to_string(), "first error");
        assert_eq!(reportables[1].to_string(), "second error");
    }

    #[test]
    fn test_error_codes_by_kind() {
        let config = DioramaError::Config(ConfigError::MissingViewKey);
        let reportables = to_reportables(&config);

        assert_eq!(reportables.len(), 1);
        assert_eq!(reportables[0].code().unwrap().to_string(), "diorama::config");
        assert!(reportables[0].help().is_some());

        let io = DioramaError::Io(std::io::Error::other("disk full"));
        assert_eq!(
            to_reportables(&io)[0].code().unwrap().to_string(),
            "diorama::io"
        );
    }

    #[test]
    fn test_block_failure_points_at_directive() {
        let src = "= Doc\nstructurizrc4::w.dsl[renderer=mermaid]\n";
        let report = DocumentProcessor::default()
            .process(src, AttributeMap::new(), AttributeMap::new())
            .unwrap();

        let reportables = failures_to_reportables(report.failures(), src);
        assert_eq!(reportables.len(), 1);

        let labels: Vec<_> = reportables[0].labels().unwrap().collect();
        assert_eq!(labels.len(), 1);
        assert!(labels[0].primary());
        assert_eq!(labels[0].offset(), 6);
        assert_eq!(labels[0].len(), 38);
        assert_eq!(reportables[0].code().unwrap().to_string(), "diorama::config");
    }
}
