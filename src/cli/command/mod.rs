use std::sync::Arc;

use axum::Router;
use tokio::net::TcpListener;
use tokio::sync::mpsc;
use tracing::info;

use crate::configuration::Settings;
use crate::error::AppErrors as Error;
use crate::pipeline::SessionOutcome;
use crate::routes::{router, AppState};

pub mod connect;
pub mod serve;

pub use connect::connect;
pub use serve::serve;

// Bind the listener and build the router both commands share
async fn front_door(
    settings: Settings,
) -> Result<(TcpListener, Router, mpsc::UnboundedReceiver<SessionOutcome>), Error> {
    let address = format!("{}:{}", settings.application.host, settings.application.port);
    let listener = TcpListener::bind(&address).await?;
    info!(address = %listener.local_addr()?, "listening");

    let (outcome_tx, outcome_rx) = mpsc::unbounded_channel();
    let state = AppState {
        settings: Arc::new(settings),
        outcome_tx,
    };

    Ok((listener, router(state), outcome_rx))
}
