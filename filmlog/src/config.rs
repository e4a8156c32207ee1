//! Configuration loading
//!
//! Each setting resolves in priority order:
//! 1. Environment variable
//! 2. TOML config file (`FILMLOG_CONFIG`, or the platform config dir)
//! 3. Compiled default

use std::path::PathBuf;

/// Runtime configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// SQLite database file
    pub db_path: PathBuf,
    /// Address the HTTP chat gateway binds to
    pub bind_addr: String,
    /// TMDB API key; absent disables external film lookup
    pub tmdb_api_key: Option<String>,
}

const DEFAULT_BIND_ADDR: &str = "127.0.0.1:5760";

impl Config {
    pub fn load() -> Config {
        let file = load_config_file();
        let file_str = |key: &str| -> Option<String> {
            file.as_ref()
                .and_then(|v| v.get(key))
                .and_then(|v| v.as_str())
                .map(str::to_string)
        };

        let db_path = std::env::var("FILMLOG_DB_PATH")
            .ok()
            .or_else(|| file_str("db_path"))
            .map(PathBuf::from)
            .unwrap_or_else(default_db_path);

        let bind_addr = std::env::var("FILMLOG_BIND")
            .ok()
            .or_else(|| file_str("bind"))
            .unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());

        let tmdb_api_key = std::env::var("FILMLOG_TMDB_API_KEY")
            .ok()
            .or_else(|| file_str("tmdb_api_key"))
            .filter(|key| !key.is_empty());

        if tmdb_api_key.is_none() {
            tracing::warn!("TMDB API key not configured, external film lookup disabled");
        }

        Config {
            db_path,
            bind_addr,
            tmdb_api_key,
        }
    }
}

/// Parse the config file if one exists; parse failures are logged and
/// treated as no file
fn load_config_file() -> Option<toml::Value> {
    let path = std::env::var("FILMLOG_CONFIG")
        .ok()
        .map(PathBuf::from)
        .or_else(|| dirs::config_dir().map(|d| d.join("filmlog").join("config.toml")))?;

    let content = std::fs::read_to_string(&path).ok()?;
    match toml::from_str(&content) {
        Ok(value) => Some(value),
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "Ignoring unparsable config file");
            None
        }
    }
}

/// OS-dependent default database location
fn default_db_path() -> PathBuf {
    dirs::data_local_dir()
        .map(|d| d.join("filmlog").join("films.db"))
        .unwrap_or_else(|| PathBuf::from("./filmlog_data/films.db"))
}
