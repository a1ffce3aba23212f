//! Configuration file loading for the CLI
//!
//! This module handles finding and loading TOML configuration files
//! from various locations (explicit path, local directory, system directory).

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use directories::ProjectDirs;
use log::{debug, info};
use thiserror::Error;

use diorama::{DioramaError, config::AppConfig};

/// Configuration file errors
#[derive(Debug, Error)]
pub enum ConfigFileError {
    #[error("Failed to parse TOML configuration `{}`: {message}", .path.display())]
    Parse { path: PathBuf, message: String },

    #[error("Missing configuration file: {}", .0.display())]
    MissingFile(PathBuf),
}

impl From<ConfigFileError> for DioramaError {
    fn from(err: ConfigFileError) -> Self {
        DioramaError::Io(io::Error::other(err.to_string()))
    }
}

/// Find and load configuration from various locations
///
/// Search order:
/// 1. Explicit path if provided
/// 2. Local project directory (diorama/config.toml)
/// 3. Platform-specific config directory
/// 4. Default config if none found
///
/// # Errors
///
/// Returns error if:
/// - Explicit path is provided but file doesn't exist
/// - Config file exists but cannot be parsed
pub fn load_config(explicit_path: Option<impl AsRef<Path>>) -> Result<AppConfig, DioramaError> {
    if let Some(path) = explicit_path {
        let path = path.as_ref();
        info!(path = path.display().to_string(); "Loading configuration from explicit path");
        return load_config_file(path);
    }

    let local_config = Path::new("diorama/config.toml");
    if local_config.exists() {
        info!(path = local_config.display().to_string(); "Loading configuration from local path");
        return load_config_file(local_config);
    }

    if let Some(proj_dirs) = ProjectDirs::from("com", "diorama", "diorama") {
        let system_config = proj_dirs.config_dir().join("config.toml");

        if system_config.exists() {
            info!(path = system_config.display().to_string(); "Loading configuration from system path");
            return load_config_file(system_config);
        }

        debug!(path = system_config.display().to_string(); "System configuration file not found");
    } else {
        debug!("Could not determine platform-specific config directory");
    }

    debug!("No configuration file found, using default configuration");
    Ok(AppConfig::default())
}

/// Load configuration from a TOML file
fn load_config_file(path: impl AsRef<Path>) -> Result<AppConfig, DioramaError> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(ConfigFileError::MissingFile(path.to_path_buf()).into());
    }

    let content = fs::read_to_string(path)?;

    let config: AppConfig = toml::from_str(&content).map_err(|e| ConfigFileError::Parse {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explicit_config_is_loaded() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("diorama.toml");
        fs::write(
            &path,
            "[exporters.mermaid]\nprogram = \"/opt/mmdc\"\n\n[output]\nrenderer_subdirectories = true\n",
        )
        .unwrap();

        let config = load_config(Some(&path)).unwrap();

        assert_eq!(config.exporters().mermaid().program(), "/opt/mmdc");
        assert!(config.output().renderer_subdirectories());
    }

    #[test]
    fn test_missing_explicit_config() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_config(Some(dir.path().join("absent.toml"))).unwrap_err();

        assert!(matches!(err, DioramaError::Io(_)));
        assert!(err.to_string().contains("Missing configuration file"));
    }

    #[test]
    fn test_invalid_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.toml");
        fs::write(&path, "[output]\nrenderer_subdirectories = \"yes\"\n").unwrap();

        let err = load_config(Some(&path)).unwrap_err();
        assert!(err.to_string().contains("Failed to parse TOML configuration"));
    }
}
