//! Diorama - architecture diagrams for AsciiDoc documents.
//!
//! Diorama finds `structurizrc4::<workspace>[viewKey=...]` block macros in an
//! AsciiDoc document, renders the requested view of the model workspace with
//! one of several backends (the native Structurizr renderer, C4-PlantUML or
//! Mermaid) and replaces each macro with an image block pointing at the
//! rendered SVG.
//!
//! The pieces can be used on their own:
//!
//! - [`output`] resolves where images are written.
//! - [`registry`] maps a renderer selector to an exporter.
//! - [`inputs`] resolves the workspace and overlay paths.
//! - [`orchestrator`] handles a single directive.
//! - [`embed`] builds the resulting image block.
//! - [`preprocess`] applies the macro to a whole document.

pub mod config;
pub mod embed;
pub mod export;
pub mod inputs;
pub mod orchestrator;
pub mod output;
pub mod preprocess;
pub mod registry;
pub mod workspace;

mod error;

pub use diorama_core::{attributes, document, selector};
pub use diorama_parser as parser;

pub use error::{ConfigError, DioramaError, InputError, RenderError};

use log::{debug, info, trace};

use attributes::AttributeMap;
use config::AppConfig;
use document::Document;
use orchestrator::DiagramMacro;
use preprocess::{Preprocessor, ProcessReport};

/// Builder for processing AsciiDoc documents.
///
/// Owns one [`DiagramMacro`] for its whole lifetime, so the expensive
/// renderer session is started at most once however many documents are
/// processed.
///
/// # Examples
///
/// ```rust,no_run
/// use diorama::{DocumentProcessor, attributes::AttributeMap, config::AppConfig};
///
/// let source = "\
/// :imagesoutdir: build/images
///
/// structurizrc4::workspace.dsl[viewKey=SystemContext]
/// ";
///
/// let processor = DocumentProcessor::new(&AppConfig::default());
/// let attributes: AttributeMap = [("docdir", "docs")].into_iter().collect();
///
/// let report = processor
///     .process(source, attributes, AttributeMap::new())
///     .expect("Failed to parse");
/// println!("{}", report.output());
/// ```
pub struct DocumentProcessor {
    diagram_macro: DiagramMacro,
}

impl Default for DocumentProcessor {
    fn default() -> Self {
        Self::new(&AppConfig::default())
    }
}

impl DocumentProcessor {
    /// Create a new processor driving the toolchain described by `config`.
    pub fn new(config: &AppConfig) -> Self {
        Self::with_macro(DiagramMacro::new(config))
    }

    /// Create a processor around an existing macro instance.
    pub fn with_macro(diagram_macro: DiagramMacro) -> Self {
        Self { diagram_macro }
    }

    /// Returns the macro used for diagram directives.
    pub fn diagram_macro(&self) -> &DiagramMacro {
        &self.diagram_macro
    }

    /// Parse document source.
    ///
    /// # Errors
    ///
    /// Returns [`DioramaError::Parse`] carrying every malformed directive
    /// together with the source.
    pub fn parse(&self, source: &str) -> Result<parser::SourceDocument, DioramaError> {
        info!("Parsing document");
        let document = parser::parse(source)
            .map_err(|err| DioramaError::new_parse_error(err, source))?;

        debug!(
            items = document.items().len(),
            directives = document.directives().count();
            "Document parsed successfully"
        );
        for warning in document.warnings() {
            trace!(warning:%; "Parser warning");
        }

        Ok(document)
    }

    /// Parse and process document source.
    ///
    /// # Arguments
    ///
    /// * `source` - AsciiDoc source.
    /// * `attributes` - Caller supplied attributes, such as `docdir`. These
    ///   override attribute entries in the document.
    /// * `options` - Processing options such as `to_dir` and `base_dir`.
    ///
    /// # Errors
    ///
    /// Returns [`DioramaError::Parse`] if the source is malformed. Failures of
    /// individual diagrams do not fail the call; they are listed in the
    /// returned [`ProcessReport`].
    pub fn process(
        &self,
        source: &str,
        attributes: AttributeMap,
        options: AttributeMap,
    ) -> Result<ProcessReport, DioramaError> {
        let parsed = self.parse(source)?;
        let document = Document::new(attributes, options);

        Ok(Preprocessor::new(&self.diagram_macro).process(&document, &parsed))
    }
}
