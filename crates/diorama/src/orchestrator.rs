//! The diagram block macro.
//!
//! [`DiagramMacro`] handles one `structurizrc4::<workspace>[...]` directive:
//! it validates the directive attributes, picks an exporter, renders the
//! workspace and returns the image block that replaces the directive.
//!
//! One macro instance lives for a whole document processing run and may be
//! called from several threads; see [`ExporterRegistry`] for how the
//! expensive backend is shared.

use std::path::{Path, PathBuf};

use log::{debug, info};

use diorama_core::{
    attributes::AttributeMap,
    document::{Block, Document},
    selector::{Renderer, ViewKey},
};

use crate::{
    config::{AppConfig, OutputConfig},
    embed,
    error::{ConfigError, DioramaError, RenderError},
    export::ExportRequest,
    inputs::WorkspaceInputs,
    output,
    registry::{ExporterFactory, ExporterRegistry, ToolchainFactory},
};

/// Name of the block macro.
pub const MACRO_NAME: &str = "structurizrc4";

/// View to render. Required.
pub const VIEW_KEY_ATTRIBUTE: &str = "viewKey";
/// Renderer selector, `structurizr` by default.
pub const RENDERER_ATTRIBUTE: &str = "renderer";
/// PlantUML layout engine, `graphviz` by default.
pub const LAYOUT_ENGINE_ATTRIBUTE: &str = "plantumlLayoutEngine";
/// Path of the layout overlay, relative to the document directory.
pub const OVERLAY_ATTRIBUTE: &str = "workspaceJson";
/// Image title, the view key by default.
pub const TITLE_ATTRIBUTE: &str = "title";

/// Renders workspace views and turns them into image blocks.
pub struct DiagramMacro {
    registry: ExporterRegistry,
    output: OutputConfig,
}

impl DiagramMacro {
    /// Creates a macro driving the external toolchain described by `config`.
    pub fn new(config: &AppConfig) -> Self {
        Self::with_factory(
            ToolchainFactory::new(config.exporters().clone()),
            config.output().clone(),
        )
    }

    /// Creates a macro whose exporters come from `factory`.
    pub fn with_factory(factory: impl ExporterFactory + 'static, output: OutputConfig) -> Self {
        Self {
            registry: ExporterRegistry::new(factory),
            output,
        }
    }

    /// Name the macro is registered under.
    pub fn name(&self) -> &'static str {
        MACRO_NAME
    }

    pub fn registry(&self) -> &ExporterRegistry {
        &self.registry
    }

    /// Processes one directive.
    ///
    /// # Arguments
    ///
    /// * `document` - Configuration of the document being processed.
    /// * `target` - Workspace path from the directive, relative to the
    ///   document base directory.
    /// * `attributes` - Directive attributes.
    ///
    /// # Errors
    ///
    /// - [`DioramaError::Config`] for a missing view key, an unknown renderer
    ///   or layout engine, or an unresolvable output directory.
    /// - [`DioramaError::Input`] when the workspace cannot be read.
    /// - [`DioramaError::Render`] when the backend fails or does not produce
    ///   the requested view.
    pub fn process(
        &self,
        document: &Document,
        target: &str,
        attributes: &AttributeMap,
    ) -> Result<Block, DioramaError> {
        let view_key = attributes
            .get(VIEW_KEY_ATTRIBUTE)
            .ok_or(ConfigError::MissingViewKey)?;
        let view_key = ViewKey::new(view_key).map_err(ConfigError::from)?;

        let renderer = Renderer::resolve(
            attributes.get(RENDERER_ATTRIBUTE),
            attributes.get(LAYOUT_ENGINE_ATTRIBUTE),
        )?;
        let exporter = self.registry.exporter(renderer)?;

        let inputs = WorkspaceInputs::resolve(
            &document.base_dir(),
            target,
            attributes.get(OVERLAY_ATTRIBUTE),
        );
        let output_dir = output::resolve_output_dir(document.attributes(), document.options())?;
        let render_dir = self.render_dir(&output_dir, renderer);

        info!(
            view_key = view_key.as_str(),
            renderer:% = renderer,
            workspace:? = inputs.workspace();
            "Rendering diagram"
        );
        let request = ExportRequest::new(
            inputs.workspace(),
            inputs.overlay(),
            &render_dir,
            &view_key,
        );
        let diagrams = exporter.export(&request)?;
        debug!(views = diagrams.len(); "Exporter finished");

        let artifact = diagrams
            .get(&view_key)
            .ok_or_else(|| RenderError::MissingView {
                renderer: renderer.kind(),
                view_key: view_key.clone(),
            })?;

        let title = attributes
            .get_non_blank(TITLE_ATTRIBUTE)
            .unwrap_or(view_key.as_str());

        Ok(embed::image_block(artifact, &output_dir, title))
    }

    fn render_dir(&self, output_dir: &Path, renderer: Renderer) -> PathBuf {
        if self.output.renderer_subdirectories() {
            output_dir.join(renderer.kind().to_string())
        } else {
            output_dir.to_path_buf()
        }
    }
}
