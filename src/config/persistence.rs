//! Settings file load.

use anyhow::{anyhow, Context, Result};
use std::path::{Path, PathBuf};
use tracing::info;

use crate::config::types::AgentSettings;

/// `settings.json` next to the executable.
pub fn default_settings_path() -> Result<PathBuf> {
    let exe_dir = std::env::current_exe()?
        .parent()
        .ok_or_else(|| anyhow!("Cannot determine executable directory"))?
        .to_path_buf();
    Ok(exe_dir.join("settings.json"))
}

pub async fn load_settings(path: Option<&str>) -> Result<AgentSettings> {
    let settings_path = match path {
        Some(p) => PathBuf::from(p),
        None => default_settings_path()?,
    };
    load_settings_from(&settings_path).await
}

pub async fn load_settings_from(settings_path: &Path) -> Result<AgentSettings> {
    if settings_path.exists() {
        let content = tokio::fs::read_to_string(settings_path)
            .await
            .with_context(|| format!("Failed to read settings: {:?}", settings_path))?;
        let settings: AgentSettings = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse settings JSON: {:?}", settings_path))?;

        info!("Loaded settings from: {:?}", settings_path);
        Ok(settings)
    } else {
        info!("Settings file {:?} not found, using defaults", settings_path);
        Ok(AgentSettings::default())
    }
}
