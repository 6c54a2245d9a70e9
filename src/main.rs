use anyhow::{Context, Result};
use clap::Parser;
use eyesfree::{app, create_router, AppState, Collaborators, Config, ControlEvent, StatusSnapshot};
use tokio::sync::{mpsc, watch};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "eyesfree", version, about = "Hands-free capture client")]
struct Args {
    /// Config file (extension optional)
    #[arg(short, long, default_value = "config/eyesfree")]
    config: String,

    /// Control API bind address
    #[arg(long)]
    bind: Option<String>,

    /// Control API port
    #[arg(long)]
    port: Option<u16>,

    /// User agent used to pick the navigation strategy
    #[arg(long)]
    user_agent: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();

    let mut cfg = Config::load(&args.config)?;
    if let Some(bind) = args.bind {
        cfg.http.bind = bind;
    }
    if let Some(port) = args.port {
        cfg.http.port = port;
    }
    if let Some(user_agent) = args.user_agent {
        cfg.navigation.user_agent = Some(user_agent);
    }

    info!("Eyesfree v{}", env!("CARGO_PKG_VERSION"));
    info!("Loaded config: {}", cfg.service.name);
    info!("Backend: {}", cfg.backend.base_url);
    info!("Navigation platform: {:?}", cfg.navigation.resolve_platform());

    let (events_tx, events_rx) = mpsc::channel(64);
    let (status_tx, status_rx) = watch::channel(StatusSnapshot::default());

    let addr = format!("{}:{}", cfg.http.bind, cfg.http.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind control API to {}", addr))?;
    info!("Control API listening on {}", addr);

    let router = create_router(AppState::new(events_tx.clone(), status_rx));
    let server = tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, router).await {
            error!("Control API failed: {}", e);
        }
    });

    let shutdown_tx = events_tx.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("Received Ctrl-C, shutting down");
            let _ = shutdown_tx.send(ControlEvent::Shutdown).await;
        }
    });
    drop(events_tx);

    let collaborators = Collaborators::local(&cfg);
    let result = app::run(cfg, collaborators, events_rx, status_tx).await;

    server.abort();
    result
}
