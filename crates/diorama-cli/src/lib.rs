//! CLI logic for the Diorama document processor.
//!
//! Reads an AsciiDoc document, renders every `structurizrc4` diagram it
//! contains and writes the processed document.

pub mod error_adapter;

mod args;
mod config;

pub use args::Args;

use std::{
    fs,
    path::{Path, PathBuf},
};

use log::info;

use diorama::{
    DioramaError, DocumentProcessor, attributes::AttributeMap, preprocess::ProcessReport,
};

/// Outcome of a successful run.
///
/// Individual diagram failures do not fail the run; they are listed in
/// [`RunOutput::report`].
#[derive(Debug)]
pub struct RunOutput {
    source: String,
    output_path: PathBuf,
    report: ProcessReport,
}

impl RunOutput {
    /// The input document source.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Where the processed document was written.
    pub fn output_path(&self) -> &Path {
        &self.output_path
    }

    /// Per-directive results.
    pub fn report(&self) -> &ProcessReport {
        &self.report
    }
}

/// Run the Diorama CLI application
///
/// This function processes the input document through the Diorama pipeline
/// and writes the processed document to the output file.
///
/// # Arguments
///
/// * `args` - Command-line arguments
///
/// # Errors
///
/// Returns `DioramaError` for:
/// - File I/O errors
/// - Configuration loading errors
/// - Parsing errors
pub fn run(args: &Args) -> Result<RunOutput, DioramaError> {
    let input = std::path::absolute(&args.input)?;
    let output_path = match &args.output {
        Some(output) => std::path::absolute(output)?,
        None => default_output_path(&input),
    };

    info!(
        input_path:? = input,
        output_path:? = output_path;
        "Processing document"
    );

    let app_config = config::load_config(args.config.as_ref())?;

    let source = fs::read_to_string(&input)?;

    let (attributes, options) = document_settings(args, &input, &output_path)?;
    let processor = DocumentProcessor::new(&app_config);
    let report = processor.process(&source, attributes, options)?;

    if let Some(parent) = output_path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(&output_path, report.output())?;

    info!(
        output_file:? = output_path,
        rendered = report.rendered(),
        failed = report.failures().len();
        "Document written"
    );

    Ok(RunOutput {
        source,
        output_path,
        report,
    })
}

/// `<dir>/<stem>.out.adoc` next to the input.
fn default_output_path(input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| "document".to_string());
    input.with_file_name(format!("{stem}.out.adoc"))
}

/// Builds the document attributes and options the way an AsciiDoc processor
/// would for a file conversion.
///
/// `docdir` is the input directory. `outdir` is the destination directory if
/// given, else the output file's directory. Attributes from the command line
/// are applied last.
fn document_settings(
    args: &Args,
    input: &Path,
    output_path: &Path,
) -> Result<(AttributeMap, AttributeMap), DioramaError> {
    let docdir = input.parent().unwrap_or(Path::new("."));
    let destination = args
        .destination_dir
        .as_deref()
        .map(std::path::absolute)
        .transpose()?;
    let outdir = destination
        .as_deref()
        .or_else(|| output_path.parent())
        .unwrap_or(docdir);
    let base_dir = match &args.base_dir {
        Some(base_dir) => std::path::absolute(base_dir)?,
        None => docdir.to_path_buf(),
    };

    let mut attributes = AttributeMap::new();
    attributes.insert("docdir", docdir.to_string_lossy());
    attributes.insert("outdir", outdir.to_string_lossy());
    for (name, value) in &args.attributes {
        attributes.insert(name.as_str(), value.as_str());
    }

    let mut options = AttributeMap::new();
    options.insert("base_dir", base_dir.to_string_lossy());
    if let Some(destination) = &destination {
        options.insert("to_dir", destination.to_string_lossy());
    }

    Ok((attributes, options))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(input: &str) -> Args {
        Args {
            input: input.to_string(),
            output: None,
            config: None,
            base_dir: None,
            destination_dir: None,
            attributes: Vec::new(),
            log_level: "off".to_string(),
        }
    }

    #[test]
    fn test_default_output_path() {
        assert_eq!(
            default_output_path(Path::new("/docs/guide.adoc")),
            PathBuf::from("/docs/guide.out.adoc")
        );
    }

    #[test]
    fn test_document_settings() {
        let mut args = args("/docs/guide.adoc");
        args.destination_dir = Some("/site".to_string());
        args.attributes = vec![("outdir".to_string(), "/custom".to_string())];

        let (attributes, options) = document_settings(
            &args,
            Path::new("/docs/guide.adoc"),
            Path::new("/docs/guide.out.adoc"),
        )
        .unwrap();

        assert_eq!(attributes.get("docdir"), Some("/docs"));
        assert_eq!(attributes.get("outdir"), Some("/custom"));
        assert_eq!(options.get("base_dir"), Some("/docs"));
        assert_eq!(options.get("to_dir"), Some("/site"));
    }

    #[test]
    fn test_outdir_defaults_to_output_directory() {
        let (attributes, options) = document_settings(
            &args("/docs/guide.adoc"),
            Path::new("/docs/guide.adoc"),
            Path::new("/build/guide.adoc"),
        )
        .unwrap();

        assert_eq!(attributes.get("outdir"), Some("/build"));
        assert!(!options.contains("to_dir"));
    }
}
