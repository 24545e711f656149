use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use log::{info, warn};
use tokio::net::TcpListener;

use soundvault::config::Config;
use soundvault::repository::{MemoryStore, PgStore};
use soundvault::storage::{MemoryObjectStore, ObjectStore, S3Store};
use soundvault::{app, AppState};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[arg(long, short, default_value_t = 3)]
    verbosity: usize,
    #[arg(long, short, default_value_t = false)]
    quiet: bool,
    /// JSON configuration file; defaults plus environment when absent.
    #[arg(long, short, env = "SOUNDVAULT_CONFIG")]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    stderrlog::new()
        .verbosity(args.verbosity)
        .quiet(args.quiet)
        .timestamp(stderrlog::Timestamp::Millisecond)
        .init()
        .context("Couldn't initialise logging")?;

    if let Some(path) = &args.config {
        info!("Configuration path: {}", path.display());
    }
    let config = Config::load(args.config.as_deref())?;
    if config.uses_default_secret() {
        warn!("Using the default JWT secret; set JWT_SECRET before exposing this server");
    }

    let storage: Arc<dyn ObjectStore> = match &config.storage {
        Some(storage) => {
            info!("Storing uploads in bucket {}", storage.bucket);
            Arc::new(S3Store::new(storage))
        }
        None => {
            warn!("No object storage configured, uploads are kept in memory");
            Arc::new(MemoryObjectStore::new("local"))
        }
    };

    let state = match &config.database {
        Some(database) => {
            let store = PgStore::connect(database)
                .await
                .context("Error connecting to database")?;
            store.migrate().await.context("Error running migrations")?;
            AppState::new(Arc::new(store), storage, &config)
        }
        None => {
            warn!("No database configured, using the in-memory store");
            AppState::new(Arc::new(MemoryStore::new()), storage, &config)
        }
    };

    if let Some(admin) = &config.bootstrap_admin {
        state.auth.ensure_admin(admin).await?;
    }

    let listener = TcpListener::bind((config.host.as_str(), config.port))
        .await
        .with_context(|| format!("Couldn't bind {}:{}", config.host, config.port))?;
    info!("Listening on {}:{}", config.host, config.port);
    info!("Welcome to SoundVault!");
    axum::serve(listener, app(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!("Couldn't listen for shutdown signal: {}", err);
        std::future::pending::<()>().await;
    }
    info!("Shutting down");
}
