use anyhow::{Context, Result};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::fs;
use std::path::PathBuf;
use tracing::{info, warn};

use crate::domain::account::Account;
use crate::domain::config::GlobalConfig;

const ACCOUNTS_FILE: &str = "accounts.json";
const CONFIG_FILE: &str = "config.json";

/// JSON-file persistence for the account collection and the global config.
///
/// Loads never fail: absent or malformed records are replaced by defaults
/// and logged, not surfaced. Saves are atomic (temp file then rename).
pub struct Store {
    dir: PathBuf,
}

impl Store {
    /// Store rooted at `~/.propmon`.
    pub fn new() -> Result<Self> {
        let home = std::env::var("HOME").context("Could not find HOME directory")?;
        Ok(Self::with_dir(PathBuf::from(home).join(".propmon")))
    }

    /// Store rooted at an explicit directory. Used by tests.
    pub fn with_dir(dir: PathBuf) -> Self {
        Self { dir }
    }

    pub fn load_accounts(&self) -> Vec<Account> {
        self.load_json(ACCOUNTS_FILE).unwrap_or_default()
    }

    pub fn save_accounts(&self, accounts: &[Account]) -> Result<()> {
        self.save_json(ACCOUNTS_FILE, &accounts)
    }

    pub fn load_config(&self) -> GlobalConfig {
        // Partial records upgrade field-by-field via the serde defaults on
        // GlobalConfig itself.
        self.load_json(CONFIG_FILE).unwrap_or_default()
    }

    pub fn save_config(&self, config: &GlobalConfig) -> Result<()> {
        self.save_json(CONFIG_FILE, config)
    }

    /// Clears both persisted records.
    pub fn reset(&self) -> Result<()> {
        for file in [ACCOUNTS_FILE, CONFIG_FILE] {
            let path = self.dir.join(file);
            if path.exists() {
                fs::remove_file(&path).with_context(|| format!("Failed to remove {file}"))?;
            }
        }
        info!("Cleared persisted state in {:?}", self.dir);
        Ok(())
    }

    fn load_json<T: DeserializeOwned>(&self, file: &str) -> Option<T> {
        let path = self.dir.join(file);
        if !path.exists() {
            return None;
        }

        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) => {
                warn!("Failed to read {path:?}, using defaults: {e}");
                return None;
            }
        };

        match serde_json::from_str(&content) {
            Ok(value) => Some(value),
            Err(e) => {
                // Malformed data is treated as absent
                warn!("Failed to parse {path:?}, using defaults: {e}");
                None
            }
        }
    }

    fn save_json<T: Serialize>(&self, file: &str, value: &T) -> Result<()> {
        if !self.dir.exists() {
            fs::create_dir_all(&self.dir).context("Failed to create store directory")?;
        }

        let content = serde_json::to_string_pretty(value).context("Failed to serialize record")?;
        let path = self.dir.join(file);

        // Atomic write: write to temp file then rename
        let temp_path = path.with_extension("tmp");
        fs::write(&temp_path, content).with_context(|| format!("Failed to write {file}"))?;
        fs::rename(&temp_path, &path).with_context(|| format!("Failed to rename {file}"))?;

        info!("Saved {file} to {:?}", self.dir);
        Ok(())
    }
}
