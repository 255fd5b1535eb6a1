use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use boathouse_backend_lib::{
    auth::PasswordHasher,
    config::{LogFormat, Settings},
    router,
    storage::Store,
    AppState,
};
use boathouse_common::Credential;
use clap::{Parser, Subcommand};
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "boathouse", version, about = "Boathouse sign-in server")]
struct Cli {
    /// Config file (defaults to ./boathouse.toml)
    #[arg(long, short, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Run the HTTP server (default)
    Serve,
    /// Add a login to the credential store
    AddUser {
        identifier: String,
        #[arg(long, env = "BOATHOUSE_NEW_PASSWORD", hide_env_values = true)]
        password: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let settings = Settings::load_from(cli.config.as_deref()).context("loading settings")?;
    init_tracing(&settings)?;

    let store = Store::connect(&settings.database_url)
        .await
        .context("opening the credential/session store")?;

    match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => serve(store, settings).await,
        Command::AddUser {
            identifier,
            password,
        } => add_user(&store, &settings, identifier, &password).await,
    }
}

fn init_tracing(settings: &Settings) -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&settings.log_level))?;
    let builder = tracing_subscriber::fmt().with_env_filter(filter);

    match settings.log_format {
        LogFormat::Json => builder.json().try_init(),
        LogFormat::Pretty => builder.try_init(),
    }
    .map_err(|e| anyhow::anyhow!("failed to install tracing subscriber: {e}"))
}

async fn serve(store: Store, settings: Settings) -> anyhow::Result<()> {
    let addr = settings.bind_addr;
    let cleanup_interval = Duration::from_secs(settings.session.cleanup_interval_secs);

    let state = Arc::new(AppState::new(
        store.credentials(),
        store.sessions(),
        settings,
    )?);
    let cleanup = state.sessions.spawn_cleanup(cleanup_interval);
    let app = router::create_router(state);

    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("binding {addr}"))?;
    info!(%addr, "listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    cleanup.abort();
    store.close().await;
    info!("server stopped");
    Ok(())
}

async fn add_user(
    store: &Store,
    settings: &Settings,
    identifier: String,
    password: &str,
) -> anyhow::Result<()> {
    let hasher = PasswordHasher::new(settings.password.work_factor)?;
    let hash = hasher.hash(password)?;

    store
        .insert_credential(&Credential::new(identifier.clone(), hash.into_string()))
        .await
        .with_context(|| format!("adding {identifier}"))?;
    store.close().await;
    info!(%identifier, "credential added");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("shutdown requested");
}
