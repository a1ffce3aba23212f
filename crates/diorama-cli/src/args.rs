//! Command-line argument definitions for the Diorama CLI.
//!
//! This module defines the [`Args`] structure parsed from the command line
//! using [`clap`]. Arguments control input/output paths, the document
//! attributes and options handed to the processor, configuration file
//! selection, and logging verbosity.

use clap::Parser;

/// Command-line arguments for the Diorama document processor
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path to the input AsciiDoc file
    #[arg(help = "Path to the input file")]
    pub input: String,

    /// Path to the processed AsciiDoc file [default: <input>.out.adoc]
    #[arg(short, long)]
    pub output: Option<String>,

    /// Path to configuration file (TOML)
    #[arg(short, long)]
    pub config: Option<String>,

    /// Base directory of the conversion [default: directory of the input]
    #[arg(short = 'B', long)]
    pub base_dir: Option<String>,

    /// Destination directory; images go under it
    #[arg(short = 'D', long)]
    pub destination_dir: Option<String>,

    /// Document attribute as name=value (repeatable); overrides the document
    #[arg(short, long = "attribute", value_name = "NAME=VALUE", value_parser = parse_attribute)]
    pub attributes: Vec<(String, String)>,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    pub log_level: String,
}

/// Parse `name=value`; a bare `name` sets an empty value.
fn parse_attribute(raw: &str) -> Result<(String, String), String> {
    let (name, value) = raw.split_once('=').unwrap_or((raw, ""));
    let name = name.trim();
    if name.is_empty() {
        return Err(format!("attribute `{raw}` has no name"));
    }
    Ok((name.to_string(), value.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_attribute() {
        assert_eq!(
            parse_attribute("imagesdir=img"),
            Ok(("imagesdir".to_string(), "img".to_string()))
        );
        assert_eq!(
            parse_attribute("toc"),
            Ok(("toc".to_string(), String::new()))
        );
        assert_eq!(
            parse_attribute("title=a=b"),
            Ok(("title".to_string(), "a=b".to_string()))
        );
        assert!(parse_attribute("=value").is_err());
    }

    #[test]
    fn test_args_from_command_line() {
        let args = Args::try_parse_from([
            "diorama",
            "guide.adoc",
            "-a",
            "imagesoutdir=/tmp/img",
            "--attribute",
            "toc",
            "-D",
            "site",
            "--log-level",
            "debug",
        ])
        .unwrap();

        assert_eq!(args.input, "guide.adoc");
        assert_eq!(args.output, None);
        assert_eq!(args.destination_dir.as_deref(), Some("site"));
        assert_eq!(args.attributes.len(), 2);
        assert_eq!(args.attributes[0].1, "/tmp/img");
        assert_eq!(args.log_level, "debug");
    }
}
