//! Shared configuration for the microsite tools.
//!
//! One TOML file holds output defaults, where the site directory and the
//! processed-state store live, and the URL override mapping. Values are
//! layered with figment: built-in defaults, then the file, then
//! `MICROSITE_*` environment variables (`__` separates nested keys).

use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use microsite_core::OverrideSettings;

/// Environment variable naming an explicit config file.
pub const CONFIG_ENV: &str = "MICROSITE_CONFIG";

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration.
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub defaults: Defaults,

    #[serde(default)]
    pub storage: Storage,

    /// Desired URL / scheme per site id, site URL, site type or `global`.
    #[serde(default, alias = "micro_site_override_url")]
    pub override_url: OverrideSettings,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct Defaults {
    #[serde(default = "default_output")]
    pub output: String,

    #[serde(default = "default_color")]
    pub color: String,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            output: default_output(),
            color: default_color(),
        }
    }
}

fn default_output() -> String {
    "table".into()
}
fn default_color() -> String {
    "auto".into()
}

/// Backing files of the site directory and processed-state store.
#[derive(Debug, Deserialize, Serialize)]
pub struct Storage {
    #[serde(default = "default_sites_path")]
    pub sites: PathBuf,

    #[serde(default = "default_state_path")]
    pub state: PathBuf,
}

impl Default for Storage {
    fn default() -> Self {
        Self {
            sites: default_sites_path(),
            state: default_state_path(),
        }
    }
}

fn default_sites_path() -> PathBuf {
    data_dir().join("sites.json")
}
fn default_state_path() -> PathBuf {
    data_dir().join("state.json")
}

// ── Paths ───────────────────────────────────────────────────────────

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("org", "microsite", "microsite")
}

fn home_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("microsite");
    p
}

/// Resolve the default config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    if let Some(explicit) = std::env::var_os(CONFIG_ENV) {
        return PathBuf::from(explicit);
    }
    project_dirs().map_or_else(
        || home_fallback().join("config.toml"),
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

/// Directory holding the default storage files.
pub fn data_dir() -> PathBuf {
    project_dirs().map_or_else(home_fallback, |dirs| dirs.data_dir().to_path_buf())
}

// ── Config loading ──────────────────────────────────────────────────

fn figment_for(path: &Path) -> Figment {
    Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed("MICROSITE_").ignore(&["CONFIG"]).split("__"))
}

/// Load the full Config from `path` + environment.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let config: Config = figment_for(path).extract()?;
    Ok(config)
}

// ── Config saving ───────────────────────────────────────────────────

/// Serialize config to TOML and write it to `path`.
pub fn save_config_to(cfg: &Config, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(path, toml_str)?;
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use figment::Jail;
    use microsite_core::overrides::GLOBAL_KEY;
    use pretty_assertions::assert_eq;

    #[test]
    fn missing_file_yields_defaults() {
        Jail::expect_with(|jail| {
            let cfg = load_config_from(&jail.directory().join("absent.toml")).unwrap();
            assert_eq!(cfg.defaults.output, "table");
            assert!(cfg.override_url.is_empty());
            assert!(cfg.storage.sites.ends_with("sites.json"));
            Ok(())
        });
    }

    #[test]
    fn override_mapping_is_read_from_toml() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "config.toml",
                r#"
                [storage]
                sites = "data/sites.json"
                state = "data/state.json"

                [override_url.global]
                method = "prefix"
                pattern = "new"
                https = true

                [override_url."5"]
                site_url = "five.example.org"
                "#,
            )?;
            let cfg = load_config_from(&jail.directory().join("config.toml")).unwrap();
            assert_eq!(cfg.storage.sites, PathBuf::from("data/sites.json"));
            assert_eq!(cfg.override_url.len(), 2);
            let global = cfg.override_url.get(GLOBAL_KEY).unwrap();
            assert_eq!(global.pattern.as_deref(), Some("new"));
            assert_eq!(global.https, Some(true));
            assert_eq!(
                cfg.override_url.get("5").unwrap().site_url.as_deref(),
                Some("five.example.org")
            );
            Ok(())
        });
    }

    #[test]
    fn legacy_section_name_is_accepted() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "config.toml",
                r#"
                [micro_site_override_url.generic]
                method = "tld"
                pattern = "org"
                "#,
            )?;
            let cfg = load_config_from(&jail.directory().join("config.toml")).unwrap();
            assert!(cfg.override_url.get("generic").is_some());
            Ok(())
        });
    }

    #[test]
    fn environment_overrides_file() {
        Jail::expect_with(|jail| {
            jail.create_file("config.toml", "[defaults]\noutput = \"json\"\n")?;
            jail.set_env("MICROSITE_DEFAULTS__OUTPUT", "yaml");
            let cfg = load_config_from(&jail.directory().join("config.toml")).unwrap();
            assert_eq!(cfg.defaults.output, "yaml");
            Ok(())
        });
    }

    #[test]
    fn save_then_load_keeps_overrides() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        let mut cfg = Config::default();
        cfg.override_url.insert(
            GLOBAL_KEY,
            microsite_core::OverrideRecord::rewrite(microsite_core::Method::Tld, "org"),
        );
        save_config_to(&cfg, &path).unwrap();

        let loaded = load_config_from(&path).unwrap();
        assert_eq!(loaded.override_url, cfg.override_url);
    }
}
