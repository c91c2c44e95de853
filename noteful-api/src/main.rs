mod config;

mod app;
mod ctx;
mod db;
mod errors;
mod folders;
mod notes;
mod openapi;
mod state;
mod telemetry;
mod validation;

#[cfg(test)]
mod fixtures;

use std::net::SocketAddr;

use app::AppParams;
pub use db::{init_db, DB};
pub use errors::{Error, Result};
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> errors::Result<()> {
    let config = config::load()?;

    telemetry::setup_tracing(config.log_json);

    let conn = init_db().await?;

    let (app, _) = app::create(AppParams {
        db: conn.clone(),
        router: app::resources,
    })
    .await?;

    let app = telemetry::add_tracing_layer(app);

    let listener = TcpListener::bind(config.addr()).await?;

    tracing::info!("listening on http://{}", listener.local_addr()?);

    axum::serve(listener, app.into_make_service_with_connect_info::<SocketAddr>())
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("closing database");
    conn.close().await.map_err(db::Error::from)?;

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(error) = tokio::signal::ctrl_c().await {
            tracing::error!("failed to listen for ctrl-c: {error}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(error) => {
                tracing::error!("failed to listen for SIGTERM: {error}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("shutting down");
}
