use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tasktrack_adapter_pg::PostgresStore;
use tasktrack_core::config::CONFIG_ENV;
use tasktrack_core::{ConfigSource, StoreBackend, TrackerConfig};
use tasktrack_server::{AppState, create_router, routes::check_token_route};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "tasktrack-server", version, about = "Task tracker HTTP server")]
struct Cli {
    /// Path to the TOML config file (default: tasktrack.toml)
    #[arg(long, env = CONFIG_ENV)]
    config: Option<PathBuf>,

    /// Override `server.bind`
    #[arg(long)]
    bind: Option<String>,

    #[command(subcommand)]
    cmd: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, Copy)]
enum Command {
    /// Create the schema if needed, then serve HTTP (default)
    Serve,

    /// Create the schema if needed and exit
    InitDb,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config_path = TrackerConfig::resolve_path(cli.config.as_deref());
    let (mut config, source) = TrackerConfig::load_or_default(&config_path)?;
    if let Some(bind) = cli.bind {
        config.server.bind = bind;
    }

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.logging.level));
    tracing_subscriber::fmt().with_env_filter(filter).init();
    match source {
        ConfigSource::File(path) => {
            tracing::info!(path = %path.display(), "configuration loaded")
        }
        ConfigSource::Defaults => tracing::warn!(
            path = %config_path.display(),
            "config file not found, using defaults"
        ),
    }

    match cli.cmd.unwrap_or(Command::Serve) {
        Command::Serve => serve(config).await,
        Command::InitDb => init_db(&config).await,
    }
}

async fn serve(config: TrackerConfig) -> anyhow::Result<()> {
    check_token_route(&config)?;

    let state = AppState::init(&config).await?;
    let app = create_router(state);

    let addr = config.server.bind.clone();
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(
        address = %addr,
        token_route = %config.auth.token_route(),
        "tasktrack-server listening"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("tasktrack-server stopped");
    Ok(())
}

async fn init_db(config: &TrackerConfig) -> anyhow::Result<()> {
    if config.database.backend != StoreBackend::Postgres {
        anyhow::bail!("init-db needs database.backend = \"postgres\"");
    }
    let store = PostgresStore::connect(&config.database).await?;
    store.bootstrap_schema().await?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutdown signal received");
}
