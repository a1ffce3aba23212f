//! Diagram exporter backends.
//!
//! Every backend implements [`DiagramExporter`]. Backends render all views
//! of a workspace in one batch, so the returned [`DiagramExports`] may hold
//! more views than the one requested.
//!
//! Backends render into a private staging directory first and then
//! [`publish`] the produced images into the output directory. Only files
//! produced by the current call end up in the result, so stale images left
//! in the output directory by earlier runs never mask a missing view.

pub mod mermaid;
pub mod plantuml;
pub mod structurizr;
pub mod tool;

use std::{
    fs,
    path::{Path, PathBuf},
};

use indexmap::IndexMap;
use log::{debug, trace};

use diorama_core::selector::{RendererKind, ViewKey};

use crate::{
    error::RenderError,
    export::tool::{Placeholders, Tool, ToolSpec},
    workspace::Workspace,
};

/// File name prefix some converters put in front of the view key.
const CONVERTER_PREFIX: &str = "structurizr-";

/// Extension of rendered images.
const IMAGE_EXTENSION: &str = "svg";

/// A rendering backend.
///
/// Implementations must be usable from several threads; the registry hands
/// the same instance of an expensive backend to every caller.
pub trait DiagramExporter: Send + Sync {
    /// The backend family this exporter implements.
    fn renderer(&self) -> RendererKind;

    /// Render the views of a workspace into the output directory.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::Input`] when the workspace cannot be loaded and
    /// another [`RenderError`] when the backend fails.
    fn export(&self, request: &ExportRequest<'_>) -> Result<DiagramExports, RenderError>;
}

/// Arguments of one export call.
#[derive(Debug, Clone, Copy)]
pub struct ExportRequest<'a> {
    workspace: &'a Path,
    overlay: Option<&'a Path>,
    output_dir: &'a Path,
    view_key: &'a ViewKey,
}

impl<'a> ExportRequest<'a> {
    pub fn new(
        workspace: &'a Path,
        overlay: Option<&'a Path>,
        output_dir: &'a Path,
        view_key: &'a ViewKey,
    ) -> Self {
        Self {
            workspace,
            overlay,
            output_dir,
            view_key,
        }
    }

    pub fn workspace(&self) -> &'a Path {
        self.workspace
    }

    pub fn overlay(&self) -> Option<&'a Path> {
        self.overlay
    }

    pub fn output_dir(&self) -> &'a Path {
        self.output_dir
    }

    /// The view the caller is interested in. Backends may render more.
    pub fn view_key(&self) -> &'a ViewKey {
        self.view_key
    }
}

/// Rendered images keyed by view key.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DiagramExports {
    diagrams: IndexMap<String, PathBuf>,
}

impl DiagramExports {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the image of a view, replacing any earlier entry.
    pub fn insert(&mut self, view_key: impl Into<String>, path: impl Into<PathBuf>) {
        self.diagrams.insert(view_key.into(), path.into());
    }

    /// Returns the image of a view.
    pub fn get(&self, view_key: &ViewKey) -> Option<&Path> {
        self.diagrams.get(view_key.as_str()).map(PathBuf::as_path)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Path)> {
        self.diagrams
            .iter()
            .map(|(key, path)| (key.as_str(), path.as_path()))
    }

    pub fn len(&self) -> usize {
        self.diagrams.len()
    }

    pub fn is_empty(&self) -> bool {
        self.diagrams.is_empty()
    }
}

/// How a backend names the images it renders.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ImageNames {
    /// `<key>.svg`, as written by the native renderer.
    ViewKey,
    /// `structurizr-<key>.svg`, as written by the workspace converter.
    ConverterPrefixed,
}

impl ImageNames {
    /// Maps a rendered file stem to its view key.
    fn view_key<'s>(self, stem: &'s str) -> &'s str {
        match self {
            Self::ViewKey => stem,
            Self::ConverterPrefixed => stem
                .strip_prefix(CONVERTER_PREFIX)
                .filter(|key| !key.is_empty())
                .unwrap_or(stem),
        }
    }
}

/// Lists files in `dir` with the given extension, sorted by name.
pub(crate) fn files_with_extension(dir: &Path, extension: &str) -> Result<Vec<PathBuf>, RenderError> {
    let mut files = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_file() && path.extension().is_some_and(|ext| ext == extension) {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

/// Copies every image in `staging` into `output_dir` as `<view key>.svg`.
///
/// The output directory is created if needed. Returns the published images.
pub(crate) fn publish(
    staging: &Path,
    output_dir: &Path,
    names: ImageNames,
) -> Result<DiagramExports, RenderError> {
    fs::create_dir_all(output_dir)?;

    let mut exports = DiagramExports::new();
    for image in files_with_extension(staging, IMAGE_EXTENSION)? {
        let Some(stem) = image.file_stem().and_then(|stem| stem.to_str()) else {
            continue;
        };
        let view_key = names.view_key(stem);
        let target = output_dir.join(format!("{view_key}.{IMAGE_EXTENSION}"));

        fs::copy(&image, &target)?;
        trace!(view_key, image:? = target; "Image published");
        exports.insert(view_key, target);
    }

    Ok(exports)
}

/// Runs the workspace converter, writing diagram sources of `format` into
/// `staging`. Returns the produced files with the given extension.
///
/// The layout overlay, if any, is bound to `{overlay}` so the converter's
/// `overlay_args` are passed.
pub(crate) fn convert_workspace(
    converter: &ToolSpec,
    workspace: &Workspace,
    format: &str,
    extension: &str,
    staging: &Path,
) -> Result<Vec<PathBuf>, RenderError> {
    let mut placeholders = Placeholders::new()
        .with("workspace", workspace.source_path())
        .with("format", format)
        .with("output", staging);
    if let Some(overlay) = workspace.overlay_path() {
        placeholders = placeholders.with("overlay", overlay);
    }
    Tool::locate(converter)?.run(&placeholders, None)?;

    let sources = files_with_extension(staging, extension)?;
    debug!(format, sources = sources.len(); "Workspace converted");
    Ok(sources)
}
