//! Output directory resolution.
//!
//! Rendered images go into a directory derived from document configuration.
//! The candidates are checked first in the document attributes and then in
//! the document options; within each source the first key with a value wins:
//!
//! 1. `imagesoutdir`, used verbatim.
//! 2. `outdir` joined with `imagesdir`.
//! 3. `to_dir` joined with `imagesdir`.
//! 4. `base_dir` joined with `imagesdir`.
//!
//! `imagesdir` is resolved once up front: the option value, then the
//! attribute value, then `./images`.
//!
//! The result is never cached; two blocks of one document may be processed
//! with different configuration.

use std::path::PathBuf;

use log::debug;

use diorama_core::attributes::AttributeMap;

use crate::error::ConfigError;

pub const IMAGES_OUT_DIR: &str = "imagesoutdir";
pub const OUT_DIR: &str = "outdir";
pub const TO_DIR: &str = "to_dir";
pub const BASE_DIR: &str = "base_dir";
pub const IMAGES_DIR: &str = "imagesdir";

const DEFAULT_IMAGES_DIR: &str = "./images";

/// How a matched key turns into the output directory.
#[derive(Debug, Clone, Copy)]
enum Placement {
    Verbatim,
    JoinImagesDir,
}

const CANDIDATES: [(&str, Placement); 4] = [
    (IMAGES_OUT_DIR, Placement::Verbatim),
    (OUT_DIR, Placement::JoinImagesDir),
    (TO_DIR, Placement::JoinImagesDir),
    (BASE_DIR, Placement::JoinImagesDir),
];

/// Returns the first candidate key present in `source`, with its value.
fn first_match<'a>(source: &'a AttributeMap) -> Option<(&'static str, &'a str, Placement)> {
    CANDIDATES.iter().find_map(|&(key, placement)| {
        source.get(key).map(|value| (key, value, placement))
    })
}

/// Resolves the `imagesdir` value: option, then attribute, then `./images`.
pub fn images_dir<'a>(attributes: &'a AttributeMap, options: &'a AttributeMap) -> &'a str {
    options
        .get(IMAGES_DIR)
        .or_else(|| attributes.get(IMAGES_DIR))
        .unwrap_or(DEFAULT_IMAGES_DIR)
}

/// Resolves the directory rendered images are written to.
///
/// No filesystem access happens here; the exporter creates the directory.
///
/// # Errors
///
/// Returns [`ConfigError::UnresolvedOutputDir`] when neither source supplies
/// any of `imagesoutdir`, `outdir`, `to_dir` or `base_dir`.
///
/// # Examples
///
/// ```
/// use std::path::PathBuf;
/// use diorama::{attributes::AttributeMap, output::resolve_output_dir};
///
/// let attributes: AttributeMap = [("base_dir", "/docs"), ("imagesdir", "diagrams")]
///     .into_iter()
///     .collect();
/// let dir = resolve_output_dir(&attributes, &AttributeMap::new()).unwrap();
/// assert_eq!(dir, PathBuf::from("/docs/diagrams"));
/// ```
pub fn resolve_output_dir(
    attributes: &AttributeMap,
    options: &AttributeMap,
) -> Result<PathBuf, ConfigError> {
    let images_dir = images_dir(attributes, options);

    let (key, value, placement) = first_match(attributes)
        .or_else(|| first_match(options))
        .ok_or(ConfigError::UnresolvedOutputDir)?;

    let dir = match placement {
        Placement::Verbatim => PathBuf::from(value),
        Placement::JoinImagesDir => PathBuf::from(value).join(images_dir),
    };
    debug!(key, output_dir:? = dir; "Output directory resolved");

    Ok(dir)
}
