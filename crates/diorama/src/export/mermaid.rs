//! Mermaid rendering.
//!
//! The workspace is converted to Mermaid sources and each one is rendered by
//! the Mermaid CLI.

use log::info;

use diorama_core::selector::RendererKind;

use crate::{
    error::RenderError,
    export::{
        DiagramExporter, DiagramExports, ExportRequest, ImageNames, convert_workspace, publish,
        tool::{Placeholders, Tool, ToolSpec},
    },
    workspace::Workspace,
};

const FORMAT: &str = "mermaid";
const SOURCE_EXTENSION: &str = "mmd";

/// Exporter rendering through Mermaid. Cheap to create.
#[derive(Debug, Clone)]
pub struct MermaidExporter {
    converter: ToolSpec,
    mermaid: ToolSpec,
}

impl MermaidExporter {
    pub fn new(converter: ToolSpec, mermaid: ToolSpec) -> Self {
        Self { converter, mermaid }
    }
}

impl DiagramExporter for MermaidExporter {
    fn renderer(&self) -> RendererKind {
        RendererKind::Mermaid
    }

    fn export(&self, request: &ExportRequest<'_>) -> Result<DiagramExports, RenderError> {
        let workspace = Workspace::load(request.workspace(), request.overlay())?;
        let staging = tempfile::Builder::new()
            .prefix("diorama-mermaid-")
            .tempdir()?;

        let sources = convert_workspace(
            &self.converter,
            &workspace,
            FORMAT,
            SOURCE_EXTENSION,
            staging.path(),
        )?;

        if !sources.is_empty() {
            let mermaid = Tool::locate(&self.mermaid)?;
            for source in &sources {
                let placeholders = Placeholders::new()
                    .with("input", source)
                    .with("output", source.with_extension("svg"))
                    .with("view", request.view_key().as_str());
                mermaid.run(&placeholders, None)?;
            }
        }

        let exports = publish(
            staging.path(),
            request.output_dir(),
            ImageNames::ConverterPrefixed,
        )?;
        info!(views = exports.len(); "Mermaid diagrams rendered");

        Ok(exports)
    }
}
