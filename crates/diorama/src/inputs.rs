//! Workspace input references.

use std::path::{Path, PathBuf};

/// The model files one directive renders from.
///
/// Paths are joined onto the document base directory; nothing is read or
/// checked here. Missing files surface when the exporter loads them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkspaceInputs {
    workspace: PathBuf,
    overlay: Option<PathBuf>,
}

impl WorkspaceInputs {
    /// Resolves the workspace path and the optional layout overlay path.
    ///
    /// # Arguments
    ///
    /// * `base_dir` - Directory that relative paths resolve against.
    /// * `target` - Workspace path as written in the directive.
    /// * `overlay` - Overlay path attribute; blank values count as absent.
    pub fn resolve(base_dir: &Path, target: &str, overlay: Option<&str>) -> Self {
        Self {
            workspace: base_dir.join(target),
            overlay: overlay
                .filter(|value| !value.trim().is_empty())
                .map(|value| base_dir.join(value)),
        }
    }

    /// Returns the workspace path.
    pub fn workspace(&self) -> &Path {
        &self.workspace
    }

    /// Returns the layout overlay path, if one was given.
    pub fn overlay(&self) -> Option<&Path> {
        self.overlay.as_deref()
    }
}
