use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use retouch_core::SessionConfig;

/// Environment variable naming a JSON settings file.
pub const CONFIG_ENV: &str = "RETOUCH_CONFIG";

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub session: SessionConfig,
    /// Where `display` and `histogram` write their PNGs.
    pub preview_dir: Option<PathBuf>,
}

impl Settings {
    /// Read the file named by `RETOUCH_CONFIG`, or fall back to defaults.
    pub fn load() -> Result<Self> {
        match env::var_os(CONFIG_ENV) {
            Some(path) => Self::from_file(Path::new(&path)),
            None => Ok(Self::default()),
        }
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("read settings: {}", path.display()))?;
        serde_json::from_str(&text).with_context(|| format!("parse settings: {}", path.display()))
    }

    pub fn preview_dir(&self) -> PathBuf {
        self.preview_dir.clone().unwrap_or_else(|| {
            dirs::cache_dir()
                .unwrap_or_else(env::temp_dir)
                .join("retouch")
                .join("previews")
        })
    }
}
