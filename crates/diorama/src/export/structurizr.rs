//! Native Structurizr rendering.
//!
//! The renderer drives a headless browser, which is slow to start. A
//! [`StructurizrExporter`] therefore locates and probes the renderer once and
//! keeps a scratch session directory (browser profile, caches) for its whole
//! lifetime. Calls into the session are serialized.

use std::sync::{Mutex, PoisonError};

use log::{debug, info};
use tempfile::TempDir;

use diorama_core::selector::RendererKind;

use crate::{
    error::RenderError,
    export::{
        DiagramExporter, DiagramExports, ExportRequest, ImageNames, publish,
        tool::{Placeholders, Tool, ToolSpec},
    },
    workspace::Workspace,
};

/// Long-lived state of the renderer.
#[derive(Debug)]
struct Session {
    tool: Tool,
    scratch: TempDir,
    renders: usize,
}

/// Exporter backed by the native Structurizr renderer.
#[derive(Debug)]
pub struct StructurizrExporter {
    version: String,
    session: Mutex<Session>,
}

impl StructurizrExporter {
    /// Starts a renderer session.
    ///
    /// # Errors
    ///
    /// Returns a [`RenderError`] when the renderer cannot be found, its
    /// version probe fails or the scratch directory cannot be created.
    pub fn start(spec: &ToolSpec) -> Result<Self, RenderError> {
        let tool = Tool::locate(spec)?;
        let version = tool.version()?;
        let scratch = tempfile::Builder::new()
            .prefix("diorama-structurizr-")
            .tempdir()?;

        info!(
            program = spec.program(),
            version = version.as_str(),
            session:? = scratch.path();
            "Structurizr renderer session started"
        );

        Ok(Self {
            version,
            session: Mutex::new(Session {
                tool,
                scratch,
                renders: 0,
            }),
        })
    }

    /// Version reported by the renderer when the session started.
    pub fn version(&self) -> &str {
        &self.version
    }
}

impl DiagramExporter for StructurizrExporter {
    fn renderer(&self) -> RendererKind {
        RendererKind::Structurizr
    }

    fn export(&self, request: &ExportRequest<'_>) -> Result<DiagramExports, RenderError> {
        let workspace = Workspace::load(request.workspace(), request.overlay())?;

        let mut session = self.session.lock().unwrap_or_else(PoisonError::into_inner);
        session.renders += 1;

        let staging = tempfile::Builder::new()
            .prefix("render-")
            .tempdir_in(session.scratch.path())?;

        let mut placeholders = Placeholders::new()
            .with("workspace", workspace.source_path())
            .with("output", staging.path())
            .with("view", request.view_key().as_str())
            .with("session", session.scratch.path());
        if let Some(overlay) = workspace.overlay_path() {
            placeholders = placeholders.with("overlay", overlay);
        }

        session
            .tool
            .run(&placeholders, Some(session.scratch.path()))?;

        let exports = publish(staging.path(), request.output_dir(), ImageNames::ViewKey)?;
        debug!(
            render = session.renders,
            views = exports.len();
            "Structurizr workspace rendered"
        );

        Ok(exports)
    }
}

#[cfg(all(test, unix))]
mod tests {
    use std::fs;

    use diorama_core::selector::ViewKey;

    use super::*;

    /// A stand-in renderer: writes one SVG per name listed in the workspace.
    fn fake_renderer() -> ToolSpec {
        ToolSpec::new("sh")
            .with_args(vec![
                "-c".to_string(),
                r#"for view in $(cat "$1"); do echo "<svg/>" > "$2/$view.svg"; done"#.to_string(),
                "sh".to_string(),
                "{workspace}".to_string(),
                "{output}".to_string(),
            ])
            .with_probe_args(vec!["-c".to_string(), "echo fake 1.0".to_string()])
    }

    #[test]
    fn test_start_probes_version() {
        let exporter = StructurizrExporter::start(&fake_renderer()).unwrap();
        assert_eq!(exporter.version(), "fake 1.0");
    }

    #[test]
    fn test_start_fails_without_renderer() {
        let spec = ToolSpec::new("diorama-test-missing-renderer");
        assert!(matches!(
            StructurizrExporter::start(&spec),
            Err(RenderError::ToolNotFound { .. })
        ));
    }

    #[test]
    fn test_export_renders_all_views() {
        let dir = tempfile::tempdir().unwrap();
        let workspace = dir.path().join("workspace.dsl");
        fs::write(&workspace, "Context Containers").unwrap();
        let output_dir = dir.path().join("images");
        let view_key = ViewKey::new("Context").unwrap();

        let exporter = StructurizrExporter::start(&fake_renderer()).unwrap();
        let request = ExportRequest::new(&workspace, None, &output_dir, &view_key);
        let exports = exporter.export(&request).unwrap();

        assert_eq!(exports.len(), 2);
        assert_eq!(
            exports.get(&view_key),
            Some(output_dir.join("Context.svg").as_path())
        );
        assert!(output_dir.join("Containers.svg").is_file());
    }

    #[test]
    fn test_export_keeps_native_view_names() {
        let dir = tempfile::tempdir().unwrap();
        let workspace = dir.path().join("workspace.dsl");
        fs::write(&workspace, "structurizr-Landscape").unwrap();
        let output_dir = dir.path().join("images");
        let view_key = ViewKey::new("structurizr-Landscape").unwrap();

        let exporter = StructurizrExporter::start(&fake_renderer()).unwrap();
        let request = ExportRequest::new(&workspace, None, &output_dir, &view_key);
        let exports = exporter.export(&request).unwrap();

        assert_eq!(
            exports.get(&view_key),
            Some(output_dir.join("structurizr-Landscape.svg").as_path())
        );
        assert!(!output_dir.join("Landscape.svg").exists());
    }

    #[test]
    fn test_export_reports_missing_workspace_as_input() {
        let dir = tempfile::tempdir().unwrap();
        let view_key = ViewKey::new("Context").unwrap();
        let exporter = StructurizrExporter::start(&fake_renderer()).unwrap();

        let workspace = dir.path().join("missing.dsl");
        let request = ExportRequest::new(&workspace, None, dir.path(), &view_key);

        assert!(matches!(
            exporter.export(&request),
            Err(RenderError::Input(_))
        ));
    }
}
