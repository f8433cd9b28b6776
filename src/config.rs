//! TOML configuration loading.
//!
//! ```toml
//! [db]
//! path = "./data/docdrop.sqlite"
//! collection = "ingested_data"
//!
//! [server]
//! bind = "127.0.0.1:7331"
//! ```

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub db: DbConfig,
    pub server: ServerConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DbConfig {
    pub path: PathBuf,
    /// Table holding ingested records.
    #[serde(default = "default_collection")]
    pub collection: String,
}

fn default_collection() -> String {
    "ingested_data".to_string()
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub bind: String,
}

impl ServerConfig {
    /// Base URL a local client uses to reach this server.
    ///
    /// A wildcard bind address (`0.0.0.0`) is rewritten to loopback.
    pub fn base_url(&self) -> String {
        let bind = match self.bind.strip_prefix("0.0.0.0:") {
            Some(port) => format!("127.0.0.1:{}", port),
            None => self.bind.clone(),
        };
        format!("http://{}", bind)
    }
}

/// Returns `true` if `name` can be used unquoted as a SQL table name.
pub fn is_sql_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

pub fn parse_config(content: &str) -> Result<Config> {
    let config: Config = toml::from_str(content).with_context(|| "Failed to parse config file")?;

    if !is_sql_identifier(&config.db.collection) {
        anyhow::bail!(
            "db.collection must be a plain identifier (letters, digits, '_'), got '{}'",
            config.db.collection
        );
    }

    if config.server.bind.trim().is_empty() {
        anyhow::bail!("server.bind must not be empty");
    }

    Ok(config)
}

pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;
    parse_config(&content)
}
