//! Whole-document processing.
//!
//! [`Preprocessor`] walks a parsed document, replaces every diagram
//! directive with the image block produced by a [`DiagramMacro`] and passes
//! every other line through untouched.
//!
//! Attribute entries take effect from the line they appear on, the way an
//! AsciiDoc processor reads them, so two directives of one document can see
//! different output locations. Attributes supplied by the caller win over
//! entries in the document.

use log::{error, info};

use diorama_core::{attributes::AttributeMap, document::Document};
use diorama_parser::{ItemKind, SourceDocument, Span};

use crate::{error::DioramaError, orchestrator::DiagramMacro};

/// A directive that could not be rendered.
#[derive(Debug)]
pub struct BlockFailure {
    line: usize,
    span: Span,
    text: String,
    error: DioramaError,
}

impl BlockFailure {
    /// 1-based line of the directive.
    pub fn line(&self) -> usize {
        self.line
    }

    /// Span of the directive in the document source.
    pub fn span(&self) -> Span {
        self.span
    }

    /// Original text of the directive.
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn error(&self) -> &DioramaError {
        &self.error
    }
}

/// Result of processing one document.
#[derive(Debug, Default)]
pub struct ProcessReport {
    output: String,
    rendered: usize,
    failures: Vec<BlockFailure>,
}

impl ProcessReport {
    /// The processed document source.
    pub fn output(&self) -> &str {
        &self.output
    }

    /// Number of directives replaced by an image block.
    pub fn rendered(&self) -> usize {
        self.rendered
    }

    /// Directives left in place because they failed.
    pub fn failures(&self) -> &[BlockFailure] {
        &self.failures
    }

    /// Returns `true` when every directive was rendered.
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Applies a [`DiagramMacro`] to every matching directive of a document.
pub struct Preprocessor<'a> {
    diagram_macro: &'a DiagramMacro,
}

impl<'a> Preprocessor<'a> {
    pub fn new(diagram_macro: &'a DiagramMacro) -> Self {
        Self { diagram_macro }
    }

    /// Processes a parsed document.
    ///
    /// `document` carries the caller supplied attributes and options.
    /// A failing directive is logged, kept verbatim in the output and
    /// recorded in the report; processing continues with the next line.
    pub fn process(&self, document: &Document, source: &SourceDocument) -> ProcessReport {
        let locked = document.attributes();
        let mut attributes = locked.clone();
        let mut report = ProcessReport::default();

        for item in source.items() {
            match item.kind() {
                ItemKind::AttributeEntry { name, value } if !locked.contains(name) => {
                    apply_entry(&mut attributes, name, value.as_deref());
                    report.push_line(item.text());
                }
                ItemKind::Directive(directive) if directive.name() == self.diagram_macro.name() => {
                    let current = Document::new(attributes.clone(), document.options().clone());
                    match self.diagram_macro.process(
                        &current,
                        directive.target(),
                        directive.attributes(),
                    ) {
                        Ok(block) => {
                            report.push_line(&block.to_asciidoc());
                            report.rendered += 1;
                        }
                        Err(err) => {
                            error!(line = item.line(), err:%; "Diagram block failed");
                            report.push_line(item.text());
                            report.failures.push(BlockFailure {
                                line: item.line(),
                                span: item.span(),
                                text: item.text().to_string(),
                                error: err,
                            });
                        }
                    }
                }
                _ => report.push_line(item.text()),
            }
        }

        info!(
            rendered = report.rendered,
            failed = report.failures.len();
            "Document processed"
        );
        report
    }
}

impl ProcessReport {
    fn push_line(&mut self, line: &str) {
        self.output.push_str(line);
        self.output.push('\n');
    }
}

fn apply_entry(attributes: &mut AttributeMap, name: &str, value: Option<&str>) {
    match value {
        Some(value) => {
            attributes.insert(name, value);
        }
        None => {
            attributes.remove(name);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::{
        path::PathBuf,
        sync::{Arc, Mutex},
    };

    use diorama_core::selector::{Renderer, RendererKind};

    use super::*;
    use crate::{
        config::OutputConfig,
        error::RenderError,
        export::{DiagramExporter, DiagramExports, ExportRequest},
        registry::ExporterFactory,
    };

    /// Renders any view except `Broken`, recording output directories.
    #[derive(Default)]
    struct RecordingFactory {
        output_dirs: Arc<Mutex<Vec<PathBuf>>>,
    }

    struct RecordingExporter {
        output_dirs: Arc<Mutex<Vec<PathBuf>>>,
    }

    impl DiagramExporter for RecordingExporter {
        fn renderer(&self) -> RendererKind {
            RendererKind::Structurizr
        }

        fn export(&self, request: &ExportRequest<'_>) -> Result<DiagramExports, RenderError> {
            self.output_dirs
                .lock()
                .unwrap()
                .push(request.output_dir().to_path_buf());
            let mut exports = DiagramExports::new();
            if request.view_key().as_str() != "Broken" {
                let key = request.view_key().as_str();
                exports.insert(key, request.output_dir().join(format!("{key}.svg")));
            }
            Ok(exports)
        }
    }

    impl ExporterFactory for RecordingFactory {
        fn create(&self, _renderer: Renderer) -> Result<Arc<dyn DiagramExporter>, RenderError> {
            Ok(Arc::new(RecordingExporter {
                output_dirs: Arc::clone(&self.output_dirs),
            }))
        }
    }

    fn process(source: &str, locked: &[(&str, &str)]) -> (ProcessReport, Vec<PathBuf>) {
        let factory = RecordingFactory::default();
        let output_dirs = Arc::clone(&factory.output_dirs);
        let diagram_macro = DiagramMacro::with_factory(factory, OutputConfig::default());

        let attributes: AttributeMap = locked.iter().copied().collect();
        let document = Document::new(attributes, AttributeMap::new());
        let source = diorama_parser::parse(source).unwrap();

        let report = Preprocessor::new(&diagram_macro).process(&document, &source);
        let dirs = output_dirs.lock().unwrap().clone();
        (report, dirs)
    }

    #[test]
    fn test_directive_replaced_and_text_kept() {
        let source = "\
= Guide
:imagesoutdir: /out

Intro text.

structurizrc4::workspace.dsl[viewKey=Context, title=\"System context\"]

image::other.png[]
";
        let (report, _) = process(source, &[]);

        assert!(report.is_success());
        assert_eq!(report.rendered(), 1);
        assert_eq!(
            report.output(),
            "\
= Guide
:imagesoutdir: /out

Intro text.

.System context
image::Context.svg[]

image::other.png[]
"
        );
    }

    #[test]
    fn test_failed_block_is_kept_and_reported() {
        let source = "\
:imagesoutdir: /out
structurizrc4::w.dsl[viewKey=Broken]
structurizrc4::w.dsl[viewKey=Fine]
";
        let (report, _) = process(source, &[]);

        assert!(!report.is_success());
        assert_eq!(report.rendered(), 1);
        assert_eq!(report.failures().len(), 1);

        let failure = &report.failures()[0];
        assert_eq!(failure.line(), 2);
        assert_eq!(failure.text(), "structurizrc4::w.dsl[viewKey=Broken]");
        assert!(matches!(
            failure.error(),
            DioramaError::Render(RenderError::MissingView { .. })
        ));
        assert!(report.output().contains("structurizrc4::w.dsl[viewKey=Broken]\n"));
        assert!(report.output().contains("image::Fine.svg[]"));
    }

    #[test]
    fn test_entries_apply_from_their_line() {
        let source = "\
:imagesoutdir: /first
structurizrc4::w.dsl[viewKey=A]
:imagesoutdir: /second
structurizrc4::w.dsl[viewKey=B]
:imagesoutdir!:
structurizrc4::w.dsl[viewKey=C]
";
        let (report, dirs) = process(source, &[]);

        assert_eq!(dirs, [PathBuf::from("/first"), PathBuf::from("/second")]);
        assert_eq!(report.failures().len(), 1);
        assert_eq!(report.failures()[0].line(), 6);
    }

    #[test]
    fn test_locked_attributes_win() {
        let source = ":imagesoutdir: /from-document\nstructurizrc4::w.dsl[viewKey=A]\n";
        let (report, dirs) = process(source, &[("imagesoutdir", "/from-caller")]);

        assert!(report.is_success());
        assert_eq!(dirs, [PathBuf::from("/from-caller")]);
        assert!(report.output().starts_with(":imagesoutdir: /from-document\n"));
    }

    #[test]
    fn test_other_macros_pass_through() {
        let source = "plantuml::diagram.puml[format=svg]\n";
        let (report, dirs) = process(source, &[("imagesoutdir", "/out")]);

        assert_eq!(report.output(), source);
        assert_eq!(report.rendered(), 0);
        assert!(dirs.is_empty());
    }
}
