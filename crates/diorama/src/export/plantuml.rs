//! C4-PlantUML rendering.
//!
//! The workspace is converted to C4-PlantUML sources, which PlantUML then
//! renders to SVG with the requested layout engine.

use log::info;

use diorama_core::selector::{LayoutEngine, RendererKind};

use crate::{
    error::RenderError,
    export::{
        DiagramExporter, DiagramExports, ExportRequest, ImageNames, convert_workspace, publish,
        tool::{Placeholders, Tool, ToolSpec},
    },
    workspace::Workspace,
};

const FORMAT: &str = "c4plantuml";
const SOURCE_EXTENSION: &str = "puml";

/// Exporter rendering through C4-PlantUML. Cheap to create.
#[derive(Debug, Clone)]
pub struct PlantUmlExporter {
    converter: ToolSpec,
    plantuml: ToolSpec,
    layout: LayoutEngine,
}

impl PlantUmlExporter {
    pub fn new(converter: ToolSpec, plantuml: ToolSpec, layout: LayoutEngine) -> Self {
        Self {
            converter,
            plantuml,
            layout,
        }
    }

    /// The layout engine PlantUML is asked to use.
    pub fn layout(&self) -> LayoutEngine {
        self.layout
    }
}

impl DiagramExporter for PlantUmlExporter {
    fn renderer(&self) -> RendererKind {
        RendererKind::PlantUmlC4
    }

    fn export(&self, request: &ExportRequest<'_>) -> Result<DiagramExports, RenderError> {
        let workspace = Workspace::load(request.workspace(), request.overlay())?;
        let staging = tempfile::Builder::new()
            .prefix("diorama-plantuml-")
            .tempdir()?;

        let sources = convert_workspace(
            &self.converter,
            &workspace,
            FORMAT,
            SOURCE_EXTENSION,
            staging.path(),
        )?;
        if sources.is_empty() {
            return Ok(DiagramExports::new());
        }

        let mut placeholders = Placeholders::new()
            .with("input", staging.path())
            .with("output", staging.path())
            .with("view", request.view_key().as_str());
        // Graphviz is PlantUML's own default.
        if self.layout != LayoutEngine::Graphviz {
            let layout: &'static str = self.layout.into();
            placeholders = placeholders.with("layout", layout);
        }
        Tool::locate(&self.plantuml)?.run(&placeholders, None)?;

        let exports = publish(
            staging.path(),
            request.output_dir(),
            ImageNames::ConverterPrefixed,
        )?;
        info!(
            layout = self.layout.to_string(),
            views = exports.len();
            "PlantUML diagrams rendered"
        );

        Ok(exports)
    }
}
