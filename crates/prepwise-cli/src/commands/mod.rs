pub mod dashboard;
pub mod init;
pub mod login;
pub mod review;
pub mod run;
pub mod topics;
pub mod validate;

use std::path::PathBuf;

use anyhow::{Context, Result};

use prepwise_core::ContentStore;
use prepwise_profile::{
    load_config_from, FileAttemptStore, FileProfileStore, PrepwiseConfig, SessionContext,
};

/// Options shared by every subcommand.
pub struct Globals {
    pub config: Option<PathBuf>,
    pub data_dir: Option<PathBuf>,
}

impl Globals {
    pub fn config(&self) -> Result<PrepwiseConfig> {
        let mut config = load_config_from(self.config.as_deref())?;
        if let Some(dir) = &self.data_dir {
            config.data_dir = dir.clone();
        }
        Ok(config)
    }
}

/// Session context over the file stores in the configured data dir.
pub fn open_context(config: &PrepwiseConfig) -> SessionContext {
    SessionContext::load(
        Box::new(FileProfileStore::new(&config.data_dir)),
        Box::new(FileAttemptStore::new(&config.data_dir)),
    )
}

/// Built-in topics plus any configured content packs.
pub fn load_content(config: &PrepwiseConfig) -> Result<ContentStore> {
    let mut store = ContentStore::builtin().context("built-in content is invalid")?;

    if let Some(dir) = &config.content_dir {
        if dir.is_dir() {
            let added = store
                .load_dir(dir)
                .with_context(|| format!("failed to load content from {}", dir.display()))?;
            tracing::debug!("loaded {added} topic(s) from {}", dir.display());
        } else {
            tracing::warn!("content dir {} does not exist, skipping", dir.display());
        }
    }

    if let Some(key) = &config.fallback_topic {
        store = store.with_fallback(key.clone());
    }
    Ok(store)
}
