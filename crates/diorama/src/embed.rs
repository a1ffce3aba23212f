//! Embedding of rendered images into the document.

use std::path::{Component, Path};

use diorama_core::{
    attributes::AttributeMap,
    document::{Block, BlockContext},
};

/// Builds the image block that replaces a diagram directive.
///
/// The image target is the artifact's path relative to `output_dir`, which
/// is its bare file name unless renderers write into subdirectories. Path
/// separators are always `/` so the target is valid AsciiDoc on every
/// platform. Artifacts outside `output_dir` fall back to their file name.
///
/// # Examples
///
/// ```
/// use std::path::Path;
/// use diorama::embed::image_block;
///
/// let block = image_block(
///     Path::new("/docs/images/SystemContext.svg"),
///     Path::new("/docs/images"),
///     "System context",
/// );
/// assert_eq!(block.target(), Some("SystemContext.svg"));
/// assert_eq!(block.title(), Some("System context"));
/// ```
pub fn image_block(artifact: &Path, output_dir: &Path, title: &str) -> Block {
    let target = artifact
        .strip_prefix(output_dir)
        .ok()
        .map(relative_target)
        .filter(|target| !target.is_empty())
        .or_else(|| {
            artifact
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
        })
        .unwrap_or_default();

    let mut attributes = AttributeMap::new();
    attributes.insert("target", target);
    attributes.insert("title", title);

    Block::new(BlockContext::Image, "", attributes)
}

fn relative_target(path: &Path) -> String {
    path.components()
        .filter_map(|component| match component {
            Component::Normal(part) => Some(part.to_string_lossy()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}
