use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use weekly_common::KnownTagCatalog;
use weekly_editor::EditorConfig;

pub const DEFAULT_CONFIG_NAME: &str = "weekly.config.json";

/// Weekly configuration file format
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Config {
    /// Directory compiled issues and previews are written to
    pub out_dir: String,

    /// Quiet window before a preview pass, in milliseconds
    pub preview_quiet_ms: u64,

    /// Preview frame interval, in milliseconds
    pub frame_interval_ms: u64,

    /// Delay between an href edit and its scrape, in milliseconds
    pub scrape_debounce_ms: u64,

    pub short_summary_length: usize,

    /// Known tags offered on link sections
    pub known_tags: KnownTagCatalog,
}

impl Config {
    /// Load config from a directory
    pub fn load(cwd: &str) -> anyhow::Result<Self> {
        let config_path = PathBuf::from(cwd).join(DEFAULT_CONFIG_NAME);

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let config: Config = serde_json::from_str(&content)?;
            Ok(config)
        } else {
            // Return default config if none exists
            Ok(Config::default())
        }
    }

    /// Get absolute path to the output directory, honoring an override
    pub fn get_out_dir(&self, cwd: &str, out_dir: Option<&str>) -> PathBuf {
        Path::new(cwd).join(out_dir.unwrap_or(&self.out_dir))
    }

    pub fn editor_config(&self) -> EditorConfig {
        EditorConfig {
            preview_quiet: Duration::from_millis(self.preview_quiet_ms),
            frame_interval: Duration::from_millis(self.frame_interval_ms),
            scrape_debounce: Duration::from_millis(self.scrape_debounce_ms),
            short_summary_length: self.short_summary_length,
            known_tags: self.known_tags.clone(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        let editor = EditorConfig::default();
        Self {
            out_dir: "dist".to_string(),
            preview_quiet_ms: editor.preview_quiet.as_millis() as u64,
            frame_interval_ms: editor.frame_interval.as_millis() as u64,
            scrape_debounce_ms: editor.scrape_debounce.as_millis() as u64,
            short_summary_length: editor.short_summary_length,
            known_tags: editor.known_tags,
        }
    }
}
