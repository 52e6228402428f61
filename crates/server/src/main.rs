use std::{net::SocketAddr, path::PathBuf, sync::Arc};

use anyhow::Context;
use db::DBProvider;
use executors::orchestrator::{ItemLauncher, NotificationSink};
use server::{
    AppState,
    events::EventBus,
    notifications::{CompositeSink, DesktopNotifier},
    routes,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn init_tracing() {
    let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| "info,sqlx=warn".to_string());
    let fmt_layer = tracing_subscriber::fmt::layer().with_target(false);

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(env_filter))
        .with(fmt_layer)
        .init();
}

fn database_url() -> anyhow::Result<String> {
    if let Ok(path) = std::env::var("LAUNCHPAD_DB") {
        return Ok(format!("sqlite://{path}"));
    }
    let dir = dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("launchpad");
    std::fs::create_dir_all(&dir).context("failed to create data directory")?;
    Ok(format!("sqlite://{}", dir.join("launchpad.sqlite").display()))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let db = DBProvider::connect(&database_url()?)
        .await
        .context("failed to open database")?;

    let events = EventBus::default();
    let sinks: Vec<Arc<dyn NotificationSink>> =
        vec![Arc::new(events.clone()), Arc::new(DesktopNotifier)];
    let launcher = Arc::new(ItemLauncher::new(
        Arc::new(CompositeSink::new(sinks)),
        Arc::new(events.clone()),
    ));
    let state = AppState::new(db, events, launcher);

    let host = std::env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
    let port = std::env::var("PORT").unwrap_or_else(|_| "8720".to_string());
    let addr: SocketAddr = format!("{host}:{port}")
        .parse()
        .context("listen address is invalid")?;

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("failed to bind tcp listener")?;
    tracing::info!(%addr, "launcher API listening");

    axum::serve(listener, routes::router(state).into_make_service())
        .await
        .context("server failure")?;
    Ok(())
}
