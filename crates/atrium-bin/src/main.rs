//! Atrium service entry point

use std::sync::Arc;

use anyhow::Context;
use tracing::info;

use atrium_config::Config;
use atrium_guard::StaticSession;
use atrium_observe::{init_logging, LogFormat};
use atrium_types::Principal;

mod initialization;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env().context("failed to load configuration")?;

    let format: LogFormat = config.log.format.parse()?;
    init_logging(format, config.log.filter.as_deref())?;

    // Identity resolution belongs to the session collaborator. Until it
    // is wired in, a dev identity can be injected for local runs; with
    // none set every request is unauthenticated.
    let sessions = match std::env::var("ATRIUM_DEV_USER").ok().filter(|v| !v.is_empty()) {
        Some(user) => {
            info!(user = %user, "using fixed development identity");
            Arc::new(StaticSession(Some(Principal::new(user))))
        }
        None => Arc::new(StaticSession(None)),
    };

    let state = initialization::build_state(&config, sessions).await?;
    let app = atrium_api::router(state);

    let listener = tokio::net::TcpListener::bind(&config.server.listen_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.server.listen_addr))?;
    info!(addr = %config.server.listen_addr, "atrium listening");

    axum::serve(listener, app).await.context("server exited")?;
    Ok(())
}
