use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};

use taskd::{config::ServerConfig, rest, storage::Storage, AppContext};

#[derive(Parser)]
#[command(name = "taskd", version, about = "Task-management REST backend")]
struct Args {
    /// Listening port (default: 5000)
    #[arg(long, env = "TASKD_PORT")]
    port: Option<u16>,

    /// Data directory for the database and config.toml (default: ~/.taskd)
    #[arg(long, env = "TASKD_DATA_DIR")]
    data_dir: Option<PathBuf>,

    /// Database connection string (default: sqlite file in the data dir)
    #[arg(long, env = "TASKD_DB_URL")]
    db_url: Option<String>,

    /// Bind address (default: 127.0.0.1)
    #[arg(long, env = "TASKD_BIND")]
    bind: Option<String>,

    /// Log filter, e.g. "info" or "taskd=debug"
    #[arg(long, env = "TASKD_LOG")]
    log: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Init once — must happen before any tracing calls.
    let log_level = args.log.as_deref().unwrap_or("info").to_owned();
    let log_format =
        std::env::var("TASKD_LOG_FORMAT").unwrap_or_else(|_| "pretty".to_string());
    setup_logging(&log_level, &log_format);

    let config = Arc::new(ServerConfig::new(
        args.port,
        args.data_dir,
        args.db_url,
        args.log,
        args.bind,
    ));

    let auth_secret = match &config.auth_secret {
        Some(secret) => secret.clone(),
        None => {
            warn!("TASKD_AUTH_SECRET not set — using an ephemeral secret; issued tokens will not survive a restart");
            uuid::Uuid::new_v4().simple().to_string()
        }
    };

    let storage = Arc::new(Storage::new(&config).await?);
    info!("database ready at {}", config.database_url());

    let ctx = Arc::new(AppContext::new(config, storage, auth_secret));
    rest::start_rest_server(ctx).await
}

fn setup_logging(log_level: &str, log_format: &str) {
    if log_format == "json" {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(log_level)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(log_level)
            .compact()
            .init();
    }
}
