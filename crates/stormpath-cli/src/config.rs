//! CLI configuration file.
//!
//! Configuration is loaded from `~/.config/stormpath/config.toml` unless a
//! path is given explicitly. Every field is optional; command-line flags and
//! environment variables take precedence over the file.
//!
//! ## Example Configuration
//!
//! ```toml
//! base_url = "https://api.stormpath.com/v1"
//! timeout_seconds = 30
//!
//! [credentials]
//! id = "YOUR_API_KEY_ID"
//! secret = "YOUR_API_KEY_SECRET"
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

/// Contents of the CLI configuration file.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FileConfig {
    /// API base address.
    #[serde(default)]
    pub base_url: Option<String>,

    /// Per-request timeout in seconds.
    #[serde(default)]
    pub timeout_seconds: Option<u64>,

    /// API key pair.
    #[serde(default)]
    pub credentials: Option<FileCredentials>,
}

/// API key pair as written in the configuration file.
#[derive(Clone, Deserialize)]
pub struct FileCredentials {
    pub id: String,
    pub secret: String,
}

impl std::fmt::Debug for FileCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileCredentials")
            .field("id", &self.id)
            .field("secret", &"[REDACTED]")
            .finish()
    }
}

impl FileConfig {
    /// Default location of the configuration file.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("stormpath").join("config.toml"))
    }

    /// Load configuration.
    ///
    /// An explicit path must exist. The default path is optional: if it is
    /// missing an empty configuration is returned.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        match explicit {
            Some(path) => Self::load_from(path),
            None => match Self::default_path() {
                Some(path) if path.exists() => Self::load_from(&path),
                _ => Ok(Self::default()),
            },
        }
    }

    fn load_from(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        Self::parse(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    fn parse(contents: &str) -> Result<Self> {
        Ok(toml::from_str(contents)?)
    }
}
