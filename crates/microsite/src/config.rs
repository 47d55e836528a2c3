//! CLI configuration: thin wrapper around `microsite_config` shared types.
//!
//! Adds resolution that respects `GlobalOpts` flag overrides (--config,
//! --output) and anchors relative storage paths at the config file.

use std::path::{Path, PathBuf};

use clap::ValueEnum;

use crate::cli::{ColorMode, GlobalOpts, OutputFormat};
use crate::error::CliError;

pub use microsite_config::{Config, config_path, load_config_from};

/// The config file in effect: `--config` / `MICROSITE_CONFIG`, else the
/// platform default.
pub fn active_config_path(global: &GlobalOpts) -> PathBuf {
    global.config.clone().unwrap_or_else(config_path)
}

/// Output format: flag > env > `defaults.output` > table.
pub fn resolve_output(global: &GlobalOpts, config: &Config) -> Result<OutputFormat, CliError> {
    if let Some(ref format) = global.output {
        return Ok(format.clone());
    }
    OutputFormat::from_str(&config.defaults.output, true).map_err(|reason| CliError::Validation {
        field: "defaults.output".into(),
        reason,
    })
}

/// Color mode: an explicit `--color always|never` wins, `auto` defers to
/// `defaults.color`. Unknown config values fall back to auto-detection.
pub fn resolve_color(global: &GlobalOpts, config: &Config) -> ColorMode {
    match global.color {
        ColorMode::Auto => {
            ColorMode::from_str(&config.defaults.color, true).unwrap_or(ColorMode::Auto)
        }
        ref explicit => explicit.clone(),
    }
}

/// Relative storage paths are relative to the directory of the config file.
pub fn anchor_path(config_file: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        return path.to_path_buf();
    }
    config_file
        .parent()
        .map_or_else(|| path.to_path_buf(), |dir| dir.join(path))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn relative_paths_follow_config_file() {
        let anchored = anchor_path(Path::new("/etc/microsite/config.toml"), Path::new("sites.json"));
        assert_eq!(anchored, PathBuf::from("/etc/microsite/sites.json"));
    }

    #[test]
    fn absolute_paths_are_kept() {
        let anchored = anchor_path(Path::new("/etc/microsite/config.toml"), Path::new("/var/s.json"));
        assert_eq!(anchored, PathBuf::from("/var/s.json"));
    }
}
