//! Error types for Diorama operations.
//!
//! [`DioramaError`] is the error returned by every public operation. Its
//! variants group failures by the stage that raised them so callers, notably
//! the command line, can report them distinctly:
//!
//! - [`ConfigError`] - the directive or document is misconfigured.
//! - [`InputError`] - the model workspace could not be loaded.
//! - [`RenderError`] - an exporter backend failed or produced no diagram.

use std::{io, path::PathBuf, process::ExitStatus};

use thiserror::Error;

use diorama_core::selector::{RendererKind, SelectorError, ViewKey};
use diorama_parser::ParseError;

/// The main error type for Diorama operations.
///
/// # Diagnostic Variants
///
/// The `Parse` variant contains structured error information with source code
/// spans, together with the source itself, for rich error reporting.
#[derive(Debug, Error)]
pub enum DioramaError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("{err}")]
    Parse { err: ParseError, src: String },

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Input error: {0}")]
    Input(#[from] InputError),

    #[error("Rendering error: {0}")]
    Render(RenderError),
}

impl DioramaError {
    /// Create a new `Parse` error with the associated source code.
    pub fn new_parse_error(err: ParseError, src: impl Into<String>) -> Self {
        Self::Parse {
            err,
            src: src.into(),
        }
    }
}

impl From<RenderError> for DioramaError {
    fn from(error: RenderError) -> Self {
        match error {
            RenderError::Input(err) => Self::Input(err),
            other => Self::Render(other),
        }
    }
}

impl From<SelectorError> for DioramaError {
    fn from(error: SelectorError) -> Self {
        Self::Config(ConfigError::from(error))
    }
}

/// A directive or document configuration problem.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("no viewKey specified for diagram")]
    MissingViewKey,

    #[error(transparent)]
    Selector(#[from] SelectorError),

    #[error(
        "could not resolve configuration for images output directory \
         (set one of imagesoutdir, outdir, to_dir or base_dir)"
    )]
    UnresolvedOutputDir,
}

/// A failure to load the model workspace.
#[derive(Debug, Error)]
pub enum InputError {
    #[error("could not read workspace `{}`: {source}", .path.display())]
    Unreadable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("workspace `{}` is empty", .0.display())]
    Empty(PathBuf),

    #[error("could not read layout overlay `{}`: {source}", .path.display())]
    OverlayUnreadable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// A failure of an exporter backend.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("could not find `{program}`: {source}")]
    ToolNotFound {
        program: String,
        #[source]
        source: which::Error,
    },

    #[error("could not run `{program}`: {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },

    #[error("`{program}` failed with {status}: {stderr}")]
    ToolFailed {
        program: String,
        status: ExitStatus,
        stderr: String,
    },

    #[error("the {renderer} renderer did not produce view `{view_key}`")]
    MissingView {
        renderer: RendererKind,
        view_key: ViewKey,
    },

    #[error("could not create the {renderer} renderer: {reason}")]
    Unavailable {
        renderer: RendererKind,
        reason: String,
    },

    #[error(transparent)]
    Input(#[from] InputError),

    #[error("I/O error while rendering: {0}")]
    Io(#[from] io::Error),
}
