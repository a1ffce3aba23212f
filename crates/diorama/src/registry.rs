//! Exporter registry.
//!
//! Maps a resolved [`Renderer`] to a ready-to-use exporter. Cheap backends
//! are created afresh on every lookup. The native Structurizr backend is
//! expensive to start, so the registry keeps one instance in a lazily filled
//! slot and hands out that same instance for its whole lifetime.

use std::sync::{Arc, Mutex, PoisonError};

use log::{debug, info};

use diorama_core::selector::Renderer;

use crate::{
    config::ExportersConfig,
    error::{DioramaError, RenderError},
    export::{
        DiagramExporter, mermaid::MermaidExporter, plantuml::PlantUmlExporter,
        structurizr::StructurizrExporter,
    },
};

/// Creates exporter instances.
pub trait ExporterFactory: Send + Sync {
    /// Create an exporter for `renderer`.
    ///
    /// # Errors
    ///
    /// Returns a [`RenderError`] when the backend cannot be started.
    fn create(&self, renderer: Renderer) -> Result<Arc<dyn DiagramExporter>, RenderError>;
}

/// Factory building the exporters that drive the external toolchain.
#[derive(Debug, Clone, Default)]
pub struct ToolchainFactory {
    exporters: ExportersConfig,
}

impl ToolchainFactory {
    pub fn new(exporters: ExportersConfig) -> Self {
        Self { exporters }
    }
}

impl ExporterFactory for ToolchainFactory {
    fn create(&self, renderer: Renderer) -> Result<Arc<dyn DiagramExporter>, RenderError> {
        Ok(match renderer {
            Renderer::Structurizr => {
                Arc::new(StructurizrExporter::start(&self.exporters.structurizr())?)
            }
            Renderer::PlantUmlC4 { layout } => Arc::new(PlantUmlExporter::new(
                self.exporters.converter(),
                self.exporters.plantuml(),
                layout,
            )),
            Renderer::Mermaid => Arc::new(MermaidExporter::new(
                self.exporters.converter(),
                self.exporters.mermaid(),
            )),
        })
    }
}

/// Hands out exporters, constructing the expensive one at most once.
pub struct ExporterRegistry {
    factory: Box<dyn ExporterFactory>,
    structurizr: Mutex<Option<Arc<dyn DiagramExporter>>>,
}

impl ExporterRegistry {
    pub fn new(factory: impl ExporterFactory + 'static) -> Self {
        Self {
            factory: Box::new(factory),
            structurizr: Mutex::new(None),
        }
    }

    /// Resolves the raw selector attributes and returns the exporter.
    ///
    /// # Errors
    ///
    /// Returns [`DioramaError::Config`] for an unknown renderer or layout
    /// engine and [`DioramaError::Render`] when the backend cannot start.
    pub fn lookup(
        &self,
        renderer: Option<&str>,
        layout: Option<&str>,
    ) -> Result<Arc<dyn DiagramExporter>, DioramaError> {
        let renderer = Renderer::resolve(renderer, layout)?;
        Ok(self.exporter(renderer)?)
    }

    /// Returns the exporter for a resolved renderer.
    ///
    /// # Errors
    ///
    /// Returns a [`RenderError`] when the backend cannot be started. A failed
    /// start of the expensive backend leaves the slot empty, so a later call
    /// tries again.
    pub fn exporter(&self, renderer: Renderer) -> Result<Arc<dyn DiagramExporter>, RenderError> {
        match renderer {
            Renderer::Structurizr => self.shared(renderer),
            _ => {
                debug!(renderer:% = renderer; "Creating exporter");
                self.factory.create(renderer)
            }
        }
    }

    fn shared(&self, renderer: Renderer) -> Result<Arc<dyn DiagramExporter>, RenderError> {
        // Held across construction so concurrent first uses build one instance.
        let mut slot = self
            .structurizr
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        if let Some(exporter) = slot.as_ref() {
            return Ok(Arc::clone(exporter));
        }

        info!(renderer:% = renderer; "Starting shared exporter");
        let exporter = self.factory.create(renderer)?;
        *slot = Some(Arc::clone(&exporter));
        Ok(exporter)
    }
}
