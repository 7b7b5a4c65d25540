use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};

use crate::feed_list::LayoutKind;
use crate::source::SourceConfig;
use crate::theme::ThemeVariant;

const APP_SENTINEL: &str = "loadmore";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    #[serde(rename = "_app")]
    pub app: String,

    pub layout: LayoutKind,
    /// Lanes for the grid and staggered layouts.
    pub columns: usize,
    pub page_size: usize,
    pub max_pages: usize,
    pub latency_ms: u64,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub fail_every: Option<u64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub theme: Option<ThemeVariant>,
}

impl Default for Settings {
    fn default() -> Self {
        let source = SourceConfig::default();
        Self {
            app: APP_SENTINEL.to_string(),
            layout: LayoutKind::default(),
            columns: 3,
            page_size: source.page_size,
            max_pages: source.max_pages,
            latency_ms: source.latency.as_millis() as u64,
            fail_every: source.fail_every,
            theme: None,
        }
    }
}

impl Settings {
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read settings from {}", path.display()))?;

        let settings: Settings = toml::from_str(&content)
            .with_context(|| format!("Failed to parse settings from {}", path.display()))?;

        settings.validate()?;
        Ok(settings)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {}", parent.display()))?;
        }

        let content =
            toml::to_string_pretty(self).with_context(|| "Failed to serialize settings")?;

        fs::write(path, content)
            .with_context(|| format!("Failed to write settings to {}", path.display()))?;

        Ok(())
    }

    pub fn source_config(&self) -> SourceConfig {
        SourceConfig {
            page_size: self.page_size,
            max_pages: self.max_pages,
            latency: Duration::from_millis(self.latency_ms),
            fail_every: self.fail_every,
        }
    }

    fn validate(&self) -> Result<()> {
        if self.app != APP_SENTINEL {
            bail!(
                "Settings file appears to belong to another application (expected _app = '{}', found '{}')",
                APP_SENTINEL,
                self.app
            );
        }
        if self.page_size == 0 {
            bail!("page_size must be at least 1");
        }
        if self.max_pages == 0 {
            bail!("max_pages must be at least 1");
        }
        if self.columns == 0 {
            bail!("columns must be at least 1");
        }
        Ok(())
    }
}

pub fn config_dir(custom: Option<&PathBuf>) -> Option<PathBuf> {
    custom
        .cloned()
        .or_else(|| dirs::home_dir().map(|p| p.join(".config").join("loadmore")))
}

pub fn settings_path(config_dir: &Path) -> PathBuf {
    config_dir.join("settings.toml")
}

pub fn log_path(config_dir: &Path) -> PathBuf {
    config_dir.join("loadmore.log")
}
