//! Configuration loading.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use prepwise_core::PASS_THRESHOLD_PERCENT;

/// Top-level prepwise configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrepwiseConfig {
    /// Where the profile and attempt history are stored.
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
    /// Extra content packs loaded on top of the built-in topics.
    #[serde(default)]
    pub content_dir: Option<PathBuf>,
    /// Topic served for unknown keys. Unset means unknown keys are an error.
    #[serde(default)]
    pub fallback_topic: Option<String>,
    /// Percentage needed to pass a quiz or be certified on a drill.
    #[serde(default = "default_pass_threshold")]
    pub pass_threshold: u8,
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("./.prepwise")
}
fn default_pass_threshold() -> u8 {
    PASS_THRESHOLD_PERCENT
}

impl Default for PrepwiseConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            content_dir: None,
            fallback_topic: None,
            pass_threshold: default_pass_threshold(),
        }
    }
}

/// Resolve environment variable references like `${VAR_NAME}` in a string.
fn resolve_env_vars(s: &str) -> String {
    let mut result = s.to_string();
    let mut pos = 0;
    while let Some(found) = result[pos..].find("${") {
        let start = pos + found;
        let Some(end) = result[start..].find('}') else {
            break;
        };
        let value = std::env::var(&result[start + 2..start + end]).unwrap_or_default();
        result = format!("{}{}{}", &result[..start], value, &result[start + end + 1..]);
        // Substituted text is not expanded again.
        pos = start + value.len();
    }
    result
}

fn resolve_path(path: &Path) -> PathBuf {
    PathBuf::from(resolve_env_vars(&path.to_string_lossy()))
}

/// Load configuration from well-known paths.
///
/// Search order:
/// 1. `prepwise.toml` in the current directory
/// 2. `~/.config/prepwise/config.toml`
///
/// Environment variable overrides: `PREPWISE_DATA_DIR`, `PREPWISE_CONTENT_DIR`.
pub fn load_config() -> Result<PrepwiseConfig> {
    load_config_from(None)
}

/// Load config from an explicit path, or search the default locations.
pub fn load_config_from(path: Option<&Path>) -> Result<PrepwiseConfig> {
    let config_path = match path {
        Some(p) if p.exists() => Some(p.to_path_buf()),
        Some(p) => anyhow::bail!("config file not found: {}", p.display()),
        None => {
            let local = PathBuf::from("prepwise.toml");
            if local.exists() {
                Some(local)
            } else {
                dirs_path()
                    .map(|home| home.join("config.toml"))
                    .filter(|global| global.exists())
            }
        }
    };

    let mut config = match config_path {
        Some(path) => {
            tracing::debug!("loading config from {}", path.display());
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read config: {}", path.display()))?;
            toml::from_str::<PrepwiseConfig>(&content)
                .with_context(|| format!("failed to parse config: {}", path.display()))?
        }
        None => PrepwiseConfig::default(),
    };

    if let Ok(dir) = std::env::var("PREPWISE_DATA_DIR") {
        config.data_dir = PathBuf::from(dir);
    }
    if let Ok(dir) = std::env::var("PREPWISE_CONTENT_DIR") {
        config.content_dir = Some(PathBuf::from(dir));
    }

    config.data_dir = resolve_path(&config.data_dir);
    config.content_dir = config.content_dir.as_deref().map(resolve_path);

    if config.pass_threshold > 100 {
        anyhow::bail!(
            "pass_threshold must be between 0 and 100, got {}",
            config.pass_threshold
        );
    }

    Ok(config)
}

fn dirs_path() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|h| PathBuf::from(h).join(".config").join("prepwise"))
}
