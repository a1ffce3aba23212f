//! Loading of model workspaces.

use std::{
    fs::{self, File},
    io,
    path::{Path, PathBuf},
};

use log::debug;

use crate::error::InputError;

/// A checked model workspace, with its optional layout overlay.
///
/// Exporters load the workspace before running any external tool so that a
/// missing or empty model is reported as an input problem rather than as a
/// tool failure. The tools read the files themselves; only the paths are
/// kept.
#[derive(Debug, Clone)]
pub struct Workspace {
    source_path: PathBuf,
    overlay_path: Option<PathBuf>,
}

impl Workspace {
    /// Checks the workspace source and, if given, the overlay.
    ///
    /// # Errors
    ///
    /// Returns [`InputError`] naming the path when the source is missing,
    /// unreadable or blank, or when the overlay is unreadable.
    pub fn load(source_path: &Path, overlay_path: Option<&Path>) -> Result<Self, InputError> {
        let source = fs::read_to_string(source_path).map_err(|source| InputError::Unreadable {
            path: source_path.to_path_buf(),
            source,
        })?;
        if source.trim().is_empty() {
            return Err(InputError::Empty(source_path.to_path_buf()));
        }

        if let Some(path) = overlay_path {
            check_readable(path).map_err(|source| InputError::OverlayUnreadable {
                path: path.to_path_buf(),
                source,
            })?;
        }

        debug!(
            workspace:? = source_path,
            bytes = source.len(),
            overlay:? = overlay_path;
            "Workspace loaded"
        );

        Ok(Self {
            source_path: source_path.to_path_buf(),
            overlay_path: overlay_path.map(Path::to_path_buf),
        })
    }

    /// Returns the path of the workspace source.
    pub fn source_path(&self) -> &Path {
        &self.source_path
    }

    /// Returns the path of the layout overlay.
    pub fn overlay_path(&self) -> Option<&Path> {
        self.overlay_path.as_deref()
    }
}

/// Opens `path` to make sure it is a readable regular file.
fn check_readable(path: &Path) -> io::Result<()> {
    if File::open(path)?.metadata()?.is_file() {
        Ok(())
    } else {
        Err(io::Error::new(io::ErrorKind::InvalidInput, "not a regular file"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_source_and_overlay() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("workspace.dsl");
        let overlay = dir.path().join("workspace.json");
        fs::write(&source, "workspace {\n}\n").unwrap();
        fs::write(&overlay, "{}").unwrap();

        let workspace = Workspace::load(&source, Some(&overlay)).unwrap();

        assert_eq!(workspace.source_path(), source);
        assert_eq!(workspace.overlay_path(), Some(overlay.as_path()));
    }

    #[test]
    fn test_missing_source() {
        let dir = tempfile::tempdir().unwrap();
        let err = Workspace::load(&dir.path().join("nope.dsl"), None).unwrap_err();

        assert!(matches!(err, InputError::Unreadable { .. }));
        assert!(err.to_string().contains("nope.dsl"));
    }

    #[test]
    fn test_blank_source() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("blank.dsl");
        fs::write(&source, "  \n").unwrap();

        assert!(matches!(
            Workspace::load(&source, None),
            Err(InputError::Empty(_))
        ));
    }

    #[test]
    fn test_missing_overlay() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("workspace.dsl");
        fs::write(&source, "workspace {}").unwrap();

        let err = Workspace::load(&source, Some(&dir.path().join("gone.json"))).unwrap_err();
        assert!(matches!(err, InputError::OverlayUnreadable { .. }));
    }

    #[test]
    fn test_overlay_directory_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("workspace.dsl");
        fs::write(&source, "workspace {}").unwrap();

        let err = Workspace::load(&source, Some(dir.path())).unwrap_err();
        assert!(matches!(err, InputError::OverlayUnreadable { .. }));
    }
}
