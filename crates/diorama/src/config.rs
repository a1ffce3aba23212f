//! Configuration types for Diorama.
//!
//! This module provides the configuration structures that control which
//! external tools render diagrams and where rendered files are placed. All
//! types implement [`serde::Deserialize`] so the command line can load them
//! from a TOML file.
//!
//! # Overview
//!
//! - [`AppConfig`] - Top-level application configuration.
//! - [`ExportersConfig`] - Per-tool overrides for the rendering backends.
//! - [`ToolConfig`] - Overrides for one external program.
//! - [`OutputConfig`] - Placement of rendered files.
//!
//! # Example
//!
//! ```
//! # use diorama::config::AppConfig;
//! let config = AppConfig::default();
//! assert_eq!(config.exporters().plantuml().program(), "plantuml");
//! assert!(!config.output().renderer_subdirectories());
//! ```

use serde::Deserialize;

use crate::export::tool::ToolSpec;

/// Top-level application configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Rendering backend section.
    #[serde(default)]
    exporters: ExportersConfig,

    /// Output placement section.
    #[serde(default)]
    output: OutputConfig,
}

impl AppConfig {
    /// Creates a new [`AppConfig`] from its sections.
    pub fn new(exporters: ExportersConfig, output: OutputConfig) -> Self {
        Self { exporters, output }
    }

    /// Returns the rendering backend configuration.
    pub fn exporters(&self) -> &ExportersConfig {
        &self.exporters
    }

    /// Returns the output placement configuration.
    pub fn output(&self) -> &OutputConfig {
        &self.output
    }
}

/// Overrides for the external programs used by the rendering backends.
///
/// Every field is optional; unset values keep the built-in invocation of the
/// corresponding tool.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ExportersConfig {
    /// The native Structurizr renderer.
    #[serde(default)]
    structurizr: ToolConfig,

    /// The workspace converter that exports PlantUML and Mermaid sources.
    #[serde(default)]
    converter: ToolConfig,

    /// PlantUML.
    #[serde(default)]
    plantuml: ToolConfig,

    /// The Mermaid command line renderer.
    #[serde(default)]
    mermaid: ToolConfig,
}

impl ExportersConfig {
    /// Returns the invocation of the native Structurizr renderer.
    pub fn structurizr(&self) -> ToolSpec {
        self.structurizr.apply(ToolSpec::structurizr())
    }

    /// Returns the invocation of the workspace converter.
    pub fn converter(&self) -> ToolSpec {
        self.converter.apply(ToolSpec::converter())
    }

    /// Returns the invocation of PlantUML.
    pub fn plantuml(&self) -> ToolSpec {
        self.plantuml.apply(ToolSpec::plantuml())
    }

    /// Returns the invocation of the Mermaid renderer.
    pub fn mermaid(&self) -> ToolSpec {
        self.mermaid.apply(ToolSpec::mermaid())
    }
}

/// Overrides for one external program.
///
/// Argument templates may use the placeholders documented on [`ToolSpec`].
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ToolConfig {
    /// Program name looked up on `PATH`, or a path to the executable.
    #[serde(default)]
    program: Option<String>,

    /// Argument template.
    #[serde(default)]
    args: Option<Vec<String>>,

    /// Extra arguments appended when a layout overlay is present.
    #[serde(default)]
    overlay_args: Option<Vec<String>>,

    /// Extra arguments appended when a non-default layout engine is requested.
    #[serde(default)]
    layout_args: Option<Vec<String>>,

    /// Arguments of the version probe run when a session starts.
    #[serde(default)]
    probe_args: Option<Vec<String>>,
}

impl ToolConfig {
    fn apply(&self, mut spec: ToolSpec) -> ToolSpec {
        if let Some(program) = &self.program {
            spec = spec.with_program(program);
        }
        if let Some(args) = &self.args {
            spec = spec.with_args(args.clone());
        }
        if let Some(args) = &self.overlay_args {
            spec = spec.with_overlay_args(args.clone());
        }
        if let Some(args) = &self.layout_args {
            spec = spec.with_layout_args(args.clone());
        }
        if let Some(args) = &self.probe_args {
            spec = spec.with_probe_args(args.clone());
        }
        spec
    }
}

/// Placement of rendered diagram files.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OutputConfig {
    /// Write each renderer's files into its own subdirectory of the images
    /// output directory, so the same view rendered by two backends does not
    /// collide.
    #[serde(default)]
    renderer_subdirectories: bool,
}

impl OutputConfig {
    /// Creates a new [`OutputConfig`].
    pub fn new(renderer_subdirectories: bool) -> Self {
        Self {
            renderer_subdirectories,
        }
    }

    /// Returns `true` when renderers write into per-renderer subdirectories.
    pub fn renderer_subdirectories(&self) -> bool {
        self.renderer_subdirectories
    }
}
