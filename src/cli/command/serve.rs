//! Serve
//!
//! This command runs the callback server until Ctrl-C. Every finished session
//! is logged: the ranked descriptions on success, the error otherwise.

use tracing::{error, info};

use super::front_door;
use crate::configuration::Settings;
use crate::error::AppErrors as Error;
use crate::pipeline::SessionOutcome;

pub async fn serve(settings: Settings) -> Result<(), Error> {
    let (listener, app, mut outcome_rx) = front_door(settings).await?;

    let reporter = tokio::spawn(async move {
        while let Some(outcome) = outcome_rx.recv().await {
            log_outcome(&outcome);
        }
    });

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    reporter.abort();

    Ok(())
}

fn log_outcome(outcome: &SessionOutcome) {
    let session_id = outcome.session_id;
    match &outcome.result {
        Ok(report) => {
            let frequencies = serde_json::to_string(&report.frequencies).unwrap_or_default();
            info!(
                %session_id,
                accumulated = report.accumulated,
                windowed = report.ledger.len(),
                cutoff = %report.cutoff,
                %frequencies,
                "session complete"
            );
        }
        Err(e) => error!(%session_id, error = %e, "session failed"),
    }
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("shutting down");
    }
}
