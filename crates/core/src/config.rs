//! Pipeline configuration.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::language::fallback::FallbackKind;

/// Environment variable naming the lexicon directory.
pub const LEXICON_DIR_ENV: &str = "LEXIPHONE_LEXICON_DIR";

/// Configuration for building a [`crate::G2p`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct G2pConfig {
    /// British dialect instead of US
    pub british: bool,
    /// Directory holding `{us,gb}_{gold,silver}.json`
    pub lexicon_dir: Option<PathBuf>,
    /// Placeholder for words nothing could resolve
    pub unk: String,
    pub fallback: FallbackKind,
    pub espeak_binary: String,
}

impl Default for G2pConfig {
    fn default() -> Self {
        Self {
            british: false,
            lexicon_dir: None,
            unk: "❓".to_string(),
            fallback: FallbackKind::Auto,
            espeak_binary: "espeak-ng".to_string(),
        }
    }
}

impl G2pConfig {
    /// Load a JSON config file. Missing fields take their defaults.
    pub fn from_file(path: &Path) -> Result<Self> {
        let data = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config: {}", path.display()))?;
        let config: G2pConfig = serde_json::from_str(&data)
            .with_context(|| format!("Invalid config JSON: {}", path.display()))?;
        Ok(config)
    }

    /// Fill unset fields from the environment.
    pub fn with_env_overrides(self) -> Self {
        self.with_lexicon_dir_fallback(std::env::var(LEXICON_DIR_ENV).ok())
    }

    fn with_lexicon_dir_fallback(mut self, dir: Option<String>) -> Self {
        if self.lexicon_dir.is_none() {
            self.lexicon_dir = dir.filter(|d| !d.is_empty()).map(PathBuf::from);
        }
        self
    }

    /// The configured lexicon directory, or `~/.local/share/lexiphone`.
    pub fn resolved_lexicon_dir(&self) -> PathBuf {
        if let Some(dir) = &self.lexicon_dir {
            return dir.clone();
        }
        let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".to_string());
        PathBuf::from(home).join(".local").join("share").join("lexiphone")
    }
}
