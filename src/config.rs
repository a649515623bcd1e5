use std::{
    env,
    fmt::Display,
    fs,
    path::{Path, PathBuf},
    str::FromStr,
};

use anyhow::{Context, Result};
use log::info;
use serde::{Deserialize, Serialize};

pub const CONFIG_FILE_VAR: &str = "IRONLOG_CONFIG";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub database_path: PathBuf,
    /// Cap for the dashboard listing.
    pub recent_limit: usize,
    /// Progress window used when a request does not name one.
    pub default_lookback_days: u32,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".into(),
            port: 5000,
            database_path: PathBuf::from("data/ironlog.sqlite3"),
            recent_limit: 50,
            default_lookback_days: 30,
        }
    }
}

impl AppConfig {
    /// Defaults, then the JSON file named by `IRONLOG_CONFIG` if set, then
    /// individual `IRONLOG_*` variables.
    pub fn load() -> Result<Self> {
        let mut config = match env::var(CONFIG_FILE_VAR) {
            Ok(path) => Self::from_file(Path::new(&path))?,
            Err(_) => Self::default(),
        };
        config.apply_overrides(|key| env::var(key).ok())?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config from {}", path.display()))?;
        let config = serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse config in {}", path.display()))?;
        info!("Loaded config from {}", path.display());
        Ok(config)
    }

    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(host) = lookup("IRONLOG_HOST") {
            self.host = host;
        }
        if let Some(raw) = lookup("IRONLOG_PORT") {
            self.port = parse_var("IRONLOG_PORT", &raw)?;
        }
        if let Some(path) = lookup("IRONLOG_DB_PATH") {
            self.database_path = PathBuf::from(path);
        }
        if let Some(raw) = lookup("IRONLOG_RECENT_LIMIT") {
            self.recent_limit = parse_var("IRONLOG_RECENT_LIMIT", &raw)?;
        }
        if let Some(raw) = lookup("IRONLOG_LOOKBACK_DAYS") {
            self.default_lookback_days = parse_var("IRONLOG_LOOKBACK_DAYS", &raw)?;
        }
        Ok(())
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_var<T: FromStr>(key: &str, raw: &str) -> Result<T>
where
    T::Err: Display,
{
    raw.trim()
        .parse()
        .map_err(|e| anyhow::anyhow!("Invalid {key} value '{raw}': {e}"))
}
