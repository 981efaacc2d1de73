use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::warn;

const DEFAULT_PORT: u16 = 5000;
const DEFAULT_TOKEN_TTL_SECS: u64 = 7 * 24 * 60 * 60;

fn default_bind_address() -> String {
    "127.0.0.1".to_string()
}

fn default_data_dir() -> PathBuf {
    dirs_home()
        .map(|h| h.join(".taskd"))
        .unwrap_or_else(|| PathBuf::from(".taskd"))
}

fn dirs_home() -> Option<PathBuf> {
    std::env::var_os("HOME")
        .or_else(|| std::env::var_os("USERPROFILE"))
        .map(PathBuf::from)
}

/// Server configuration, resolved once at startup.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Listening port (`TASKD_PORT`, default 5000).
    pub port: u16,
    /// Bind address (`TASKD_BIND`, default "127.0.0.1").
    pub bind_address: String,
    /// Data directory holding the database file and optional config.toml.
    pub data_dir: PathBuf,
    /// Database connection string (`TASKD_DB_URL`). None = sqlite file
    /// under `data_dir`.
    pub db_url: Option<String>,
    /// Log filter, e.g. "info" or "taskd=debug".
    pub log: String,
    /// Log output format: "pretty" (default) | "json".
    pub log_format: String,
    /// Secret for bearer token signing (`TASKD_AUTH_SECRET` or
    /// `auth_secret` in config.toml). None = ephemeral secret per run.
    pub auth_secret: Option<String>,
    /// Issued token lifetime in seconds (default: 7 days).
    pub token_ttl_secs: u64,
    /// Slow-query log threshold in milliseconds (0 = disabled).
    pub slow_query_ms: u64,
}

/// `{data_dir}/config.toml` — the lowest-priority override layer.
#[derive(Debug, Default, Deserialize)]
struct ConfigToml {
    port: Option<u16>,
    bind_address: Option<String>,
    db_url: Option<String>,
    log: Option<String>,
    log_format: Option<String>,
    auth_secret: Option<String>,
    token_ttl_secs: Option<u64>,
    slow_query_ms: Option<u64>,
}

fn load_toml(data_dir: &Path) -> Option<ConfigToml> {
    let path = data_dir.join("config.toml");
    let contents = std::fs::read_to_string(&path).ok()?;
    match toml::from_str(&contents) {
        Ok(cfg) => Some(cfg),
        Err(e) => {
            warn!("ignoring malformed {}: {e}", path.display());
            None
        }
    }
}

impl ServerConfig {
    /// Build config from CLI/env args + optional TOML file.
    ///
    /// Priority (highest to lowest):
    ///   1. CLI / env — passed as `Some(value)` from clap
    ///   2. TOML file at `{data_dir}/config.toml`
    ///   3. Built-in defaults
    pub fn new(
        port: Option<u16>,
        data_dir: Option<PathBuf>,
        db_url: Option<String>,
        log: Option<String>,
        bind_address: Option<String>,
    ) -> Self {
        let data_dir = data_dir.unwrap_or_else(default_data_dir);
        let toml = load_toml(&data_dir).unwrap_or_default();

        let port = port.or(toml.port).unwrap_or(DEFAULT_PORT);
        let db_url = db_url.or(toml.db_url);
        let log = log.or(toml.log).unwrap_or_else(|| "info".to_string());

        let bind_address = bind_address
            .or(toml.bind_address)
            .unwrap_or_else(default_bind_address);

        let log_format = std::env::var("TASKD_LOG_FORMAT")
            .ok()
            .filter(|s| !s.is_empty())
            .or(toml.log_format)
            .unwrap_or_else(|| "pretty".to_string());

        let auth_secret = std::env::var("TASKD_AUTH_SECRET")
            .ok()
            .filter(|s| !s.is_empty())
            .or(toml.auth_secret);

        let token_ttl_secs = toml.token_ttl_secs.unwrap_or(DEFAULT_TOKEN_TTL_SECS);
        let slow_query_ms = toml.slow_query_ms.unwrap_or(0);

        Self {
            port,
            bind_address,
            data_dir,
            db_url,
            log,
            log_format,
            auth_secret,
            token_ttl_secs,
            slow_query_ms,
        }
    }

    /// Connection string for the store: explicit `db_url` override, or a
    /// sqlite file under the data directory.
    pub fn database_url(&self) -> String {
        match &self.db_url {
            Some(url) => url.clone(),
            None => format!(
                "sqlite://{}?mode=rwc",
                self.data_dir.join("taskd.db").display()
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_apply_without_toml() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = ServerConfig::new(None, Some(dir.path().to_path_buf()), None, None, None);
        assert_eq!(cfg.port, 5000);
        assert_eq!(cfg.bind_address, "127.0.0.1");
        assert_eq!(cfg.log, "info");
        assert_eq!(cfg.token_ttl_secs, 7 * 24 * 60 * 60);
        assert!(cfg.database_url().starts_with("sqlite://"));
        assert!(cfg.database_url().contains("taskd.db"));
    }

    #[test]
    fn cli_overrides_toml() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("config.toml"), "port = 6000\nlog = \"debug\"\n").unwrap();
        let cfg = ServerConfig::new(
            Some(7000),
            Some(dir.path().to_path_buf()),
            None,
            None,
            None,
        );
        assert_eq!(cfg.port, 7000);
        assert_eq!(cfg.log, "debug");
    }

    #[test]
    fn explicit_db_url_wins() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = ServerConfig::new(
            None,
            Some(dir.path().to_path_buf()),
            Some("sqlite::memory:".to_string()),
            None,
            None,
        );
        assert_eq!(cfg.database_url(), "sqlite::memory:");
    }
}
