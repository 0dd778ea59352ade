//! Session pipeline
//!
//! exchange code -> page through transactions -> trailing window -> rank descriptions

use std::time::Duration;

use chrono::{NaiveDate, Utc};
use serde::Serialize;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::client::{auth::exchange_code, TinkClient, TransactionSource};
use crate::configuration::{PipelineSettings, Settings};
use crate::error::AppErrors as Error;
use crate::ledger::{cutoff_date, Ledger};
use crate::model::frequency::{aggregate, DescriptionFrequency};
use crate::model::transaction::TransactionRecord;

/// The result of one OAuth session
#[derive(Serialize, Debug, Clone)]
pub struct SessionReport {
    /// Records collected before windowing
    pub accumulated: usize,
    pub cutoff: NaiveDate,
    /// Records inside the window
    pub ledger: Ledger,
    pub frequencies: Vec<DescriptionFrequency>,
}

/// Sent when a session's pipeline finishes, successfully or not
#[derive(Debug)]
pub struct SessionOutcome {
    pub session_id: Uuid,
    pub result: Result<SessionReport, Error>,
}

/// Run the whole pipeline for an auth code handed back by Tink Link.
///
/// # Errors
/// Will return the first error from the exchange, paging or windowing.
#[tracing::instrument(name = "Run session", skip(settings, code))]
pub async fn run_session(settings: &Settings, code: &str) -> Result<SessionReport, Error> {
    let timeout = Duration::from_secs(settings.pipeline.request_timeout_secs);

    let token = exchange_code(&settings.tink, &settings.oauth, code, timeout).await?;
    let client = TinkClient::new(&settings.tink.api_base_url, &token.access_token, timeout)?;

    let ledger = accumulate(&client, &settings.pipeline).await?;

    summarise(ledger, settings.pipeline.window_months, Utc::now().date_naive())
}

/// Page through transactions until the record threshold is met.
///
/// Stops early when upstream has no continuation token or after
/// `max_pages` requests. Records beyond the threshold are discarded.
///
/// # Errors
/// Will return `UpstreamRequestFailed` if a page can't be fetched and
/// `MalformedRecord` if a transaction lacks a required field.
#[tracing::instrument(name = "Accumulate transactions", skip_all, fields(threshold = limits.record_threshold))]
pub async fn accumulate<S>(source: &S, limits: &PipelineSettings) -> Result<Ledger, Error>
where
    S: TransactionSource + Sync + ?Sized,
{
    let mut ledger = Ledger::new();
    let mut page_token: Option<String> = None;

    for page in 0..limits.max_pages as usize {
        let response = source
            .transactions_page(limits.page_size, page_token.as_deref())
            .await
            .map_err(|e| Error::UpstreamRequestFailed {
                page,
                reason: e.to_string(),
            })?;

        let records = response
            .transactions
            .iter()
            .enumerate()
            .map(|(index, tx)| {
                TransactionRecord::try_from(tx).map_err(|source| {
                    warn!(page, index, error = %source, "malformed transaction");
                    Error::MalformedRecord {
                        page,
                        index,
                        source,
                    }
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let remaining = limits.record_threshold.saturating_sub(ledger.len());
        ledger.extend(records.into_iter().take(remaining));
        debug!(page, total = ledger.len(), "page accumulated");

        if ledger.len() >= limits.record_threshold {
            info!(pages = page + 1, total = ledger.len(), "record threshold reached");
            return Ok(ledger);
        }

        match response.continuation() {
            Some(token) => page_token = Some(token.to_string()),
            None => {
                info!(pages = page + 1, total = ledger.len(), "no more transactions upstream");
                return Ok(ledger);
            }
        }
    }

    warn!(
        max_pages = limits.max_pages,
        total = ledger.len(),
        "page cap reached before the record threshold"
    );
    Ok(ledger)
}

/// Apply the trailing window to `ledger` and rank what is left.
///
/// # Errors
/// Will return an error if the cutoff date can't be computed.
pub fn summarise(mut ledger: Ledger, months: u32, today: NaiveDate) -> Result<SessionReport, Error> {
    let accumulated = ledger.len();
    let cutoff = cutoff_date(today, months)?;
    let removed = ledger.truncate_from_cutoff(cutoff);
    info!(%cutoff, accumulated, removed, "applied trailing window");

    let frequencies = aggregate(ledger.records());

    Ok(SessionReport {
        accumulated,
        cutoff,
        ledger,
        frequencies,
    })
}
