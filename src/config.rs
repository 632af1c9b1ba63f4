use anyhow::{Context, Result};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::messages::Locale;

const APP_NAME: &str = "chime";
const CONFIG_FILENAME: &str = "config.yaml";
const DEFAULT_APP_ID: &str = "Anthropic.Claude.Code";
const DEFAULT_LEGACY_ENCODING: &str = "EUC-KR";

/// Policy gate settings
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GateConfig {
    /// Encoding that non-UTF-8 files are assumed to use, named in deny reasons
    pub legacy_encoding: String,
    /// File name globs that must not be written by the built-in Write tool
    pub legacy_write_globs: Vec<String>,
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            legacy_encoding: DEFAULT_LEGACY_ENCODING.to_string(),
            legacy_write_globs: vec!["*.cpp".to_string(), "*.h".to_string()],
        }
    }
}

/// Raw configuration structure (as parsed from YAML)
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    app_id: Option<String>,
    icon_path: Option<PathBuf>,
    ntfy_url: Option<String>,
    error_log: Option<PathBuf>,
    locale: Option<String>,
    gate: Option<GateConfig>,
    /// Prompt keyword -> skill name
    skills: Option<BTreeMap<String, String>>,
}

/// Resolved configuration, built once at startup and passed down explicitly.
#[derive(Debug, Clone)]
pub struct Config {
    /// Application identifier the desktop toast is attributed to
    pub app_id: String,
    /// Optional icon shown in the desktop toast
    pub icon_path: Option<PathBuf>,
    /// Remote push endpoint; mobile notifications are skipped when unset
    pub ntfy_url: Option<String>,
    /// Append-only log of remote push failures
    pub error_log: PathBuf,
    pub locale: Locale,
    pub gate: GateConfig,
    pub skills: BTreeMap<String, String>,
}

impl Config {
    /// Load configuration from the YAML file and the process environment.
    ///
    /// The file is `$CHIME_CONFIG` if set, otherwise
    /// `$XDG_CONFIG_HOME/chime/config.yaml`. A missing file is not an error;
    /// an unreadable or malformed one is logged and skipped, and environment
    /// overrides still apply.
    pub fn load() -> Config {
        Config::load_with(|key: &str| std::env::var(key).ok())
    }

    fn load_with(env: impl Fn(&str) -> Option<String>) -> Config {
        let path = env("CHIME_CONFIG")
            .map(PathBuf::from)
            .unwrap_or_else(|| xdg_dir("XDG_CONFIG_HOME", ".config", &env).join(CONFIG_FILENAME));

        let file = if path.exists() {
            match load_file(&path) {
                Ok(file) => Some(file),
                Err(e) => {
                    tracing::warn!("ignoring config file, using defaults: {e:#}");
                    None
                }
            }
        } else {
            None
        };

        Config::resolve(file, env)
    }

    /// Combine an optional parsed file with environment overrides.
    /// Environment values win over file values; blank values count as unset.
    fn resolve(file: Option<ConfigFile>, env: impl Fn(&str) -> Option<String>) -> Config {
        let file = file.unwrap_or_default();
        let env = |key: &str| env(key).filter(|v| !v.trim().is_empty());

        let locale = match env("CHIME_LOCALE").or(file.locale) {
            Some(tag) => Locale::parse(&tag).unwrap_or_else(|| {
                tracing::warn!("unknown locale '{}', expected 'en' or 'ko'", tag);
                Locale::default()
            }),
            None => Locale::default(),
        };

        let error_log = env("CHIME_ERROR_LOG")
            .map(PathBuf::from)
            .or(file.error_log)
            .unwrap_or_else(|| xdg_dir("XDG_STATE_HOME", ".local/state", &env).join("error.log"));

        Config {
            app_id: env("APP_ID")
                .or(file.app_id)
                .unwrap_or_else(|| DEFAULT_APP_ID.to_string()),
            icon_path: env("ICON_PATH").map(PathBuf::from).or(file.icon_path),
            ntfy_url: env("NTFY_URL").or(file.ntfy_url),
            error_log,
            locale,
            gate: file.gate.unwrap_or_default(),
            skills: file.skills.unwrap_or_default(),
        }
    }

    /// Every value at its default, independent of file and environment
    #[cfg(test)]
    pub fn fallback() -> Config {
        Config {
            app_id: DEFAULT_APP_ID.to_string(),
            icon_path: None,
            ntfy_url: None,
            error_log: PathBuf::from("error.log"),
            locale: Locale::default(),
            gate: GateConfig::default(),
            skills: BTreeMap::new(),
        }
    }
}

fn load_file(path: &Path) -> Result<ConfigFile> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config: {}", path.display()))?;

    // An empty file parses as YAML null
    if content.trim().is_empty() {
        return Ok(ConfigFile::default());
    }

    serde_yaml::from_str(&content)
        .with_context(|| format!("Failed to parse config: {}", path.display()))
}

/// `$<var>/chime`, falling back to `$HOME/<fallback>/chime`
fn xdg_dir(var: &str, fallback: &str, env: impl Fn(&str) -> Option<String>) -> PathBuf {
    let base = env(var).map(PathBuf::from).unwrap_or_else(|| {
        let home = env("HOME").unwrap_or_else(|| ".".to_string());
        PathBuf::from(home).join(fallback)
    });
    base.join(APP_NAME)
}
