//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` / `ConfigError` variants into user-facing errors with
//! actionable help text.

use std::path::Path;

use miette::Diagnostic;
use thiserror::Error;

use microsite_config::ConfigError;
use microsite_core::{CoreError, StoreError};

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const NOT_FOUND: i32 = 4;
    pub const CONFLICT: i32 = 6;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Configuration ────────────────────────────────────────────────

    #[error("No override settings found to override micro site URL")]
    #[diagnostic(
        code(microsite::no_settings),
        help(
            "Add an [override_url] section to {path}, for example:\n\
             [override_url.global]\n\
             method = \"prefix\"\n\
             pattern = \"new\""
        )
    )]
    NoSettings { path: String },

    #[error(transparent)]
    #[diagnostic(code(microsite::config))]
    Config(#[from] ConfigError),

    // ── Resources ────────────────────────────────────────────────────

    #[error("No micro sites found to be {action}")]
    #[diagnostic(
        code(microsite::no_sites),
        help("Run: microsite sites list to see available micro sites")
    )]
    NoSites { action: String },

    #[error("{resource_type} '{identifier}' not found")]
    #[diagnostic(
        code(microsite::not_found),
        help("Run: microsite {list_command} to see available {resource_type}s")
    )]
    NotFound {
        resource_type: String,
        identifier: String,
        list_command: String,
    },

    // ── Storage ──────────────────────────────────────────────────────

    #[error(transparent)]
    #[diagnostic(
        code(microsite::storage),
        help("Check the [storage] paths in your configuration.")
    )]
    Storage(#[from] StoreError),

    // ── Validation ───────────────────────────────────────────────────

    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(microsite::validation))]
    Validation { field: String, reason: String },

    // ── Interactive ──────────────────────────────────────────────────

    #[error("Destructive operation '{action}' requires confirmation")]
    #[diagnostic(
        code(microsite::confirmation_required),
        help("Use --yes (-y) to skip confirmation in non-interactive contexts.")
    )]
    NonInteractiveRequiresYes { action: String },

    // ── IO / Serialization ────────────────────────────────────────────

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Invalid JSON payload: {0}")]
    #[diagnostic(code(microsite::json), help("Check the JSON file contents and try again."))]
    Json(#[from] serde_json::Error),

    #[error("failed to render configuration: {0}")]
    #[diagnostic(code(microsite::toml))]
    Toml(#[from] toml::ser::Error),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::NotFound { .. } | Self::NoSites { .. } => exit_code::NOT_FOUND,
            Self::Validation { .. } | Self::NonInteractiveRequiresYes { .. } => exit_code::USAGE,
            Self::Storage(StoreError::UnknownSite { .. } | StoreError::Rejected { .. }) => {
                exit_code::CONFLICT
            }
            _ => exit_code::GENERAL,
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl CliError {
    /// Map a domain error, naming `config_path` in help text that points
    /// at the configuration.
    pub fn from_core(err: CoreError, config_path: &Path) -> Self {
        match err {
            CoreError::NoOverrideSettings => CliError::NoSettings {
                path: config_path.display().to_string(),
            },

            CoreError::NoSitesFound { action } => CliError::NoSites {
                action: action.into(),
            },

            CoreError::InvalidSiteId { value } => CliError::Validation {
                field: "site id".into(),
                reason: format!("'{value}' is not a number"),
            },

            CoreError::InvalidSite { field, reason } => CliError::Validation { field, reason },

            CoreError::SiteNotFound { id } => CliError::NotFound {
                resource_type: "micro site".into(),
                identifier: id.to_string(),
                list_command: "sites list".into(),
            },

            CoreError::Store(e) => CliError::Storage(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use microsite_core::SiteId;

    #[test]
    fn missing_settings_names_the_given_config_file() {
        let err = CliError::from_core(CoreError::NoOverrideSettings, Path::new("/srv/alt.toml"));
        assert!(matches!(err, CliError::NoSettings { ref path } if path == "/srv/alt.toml"));
        assert_eq!(err.exit_code(), exit_code::GENERAL);
    }

    #[test]
    fn missing_site_maps_to_not_found() {
        let err = CliError::from_core(
            CoreError::SiteNotFound { id: SiteId::new(4) },
            Path::new("config.toml"),
        );
        assert_eq!(err.exit_code(), exit_code::NOT_FOUND);
    }
}
