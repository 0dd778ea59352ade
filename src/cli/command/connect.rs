//! Connect
//!
//! This command opens Tink Link in the browser, waits for the callback
//! session to finish and prints its windowed transactions and the most
//! frequent descriptions.
//!
//! Implementation note: the server runs alongside a wait on the outcome
//! channel; whichever finishes first ends the command.

use colored::Colorize;
use rust_decimal::Decimal;
use rusty_money::{iso, Money};
use tracing::warn;

use super::front_door;
use crate::configuration::Settings;
use crate::error::AppErrors as Error;
use crate::pipeline::SessionReport;

pub async fn connect(settings: Settings) -> Result<(), Error> {
    let (listener, app, mut outcome_rx) = front_door(settings).await?;
    let entry_url = format!("http://{}/", listener.local_addr()?);

    tokio::select! {
        served = async { axum::serve(listener, app).await } => {
            served?;
            Err(Error::ServerError)
        },

        outcome = async {
            open_browser(&entry_url);
            outcome_rx.recv().await
        } => {
            let outcome = outcome.ok_or(Error::SessionChannelClosed)?;
            let report = outcome.result?;
            print_report(&report);
            Ok(())
        }
    }
}

fn open_browser(url: &str) {
    println!("Opening {url}");
    if let Err(e) = webbrowser::open(url) {
        warn!(error = %e, "can't open a browser");
        println!("Open {url} in a browser to continue");
    }
}

/// Print the windowed transactions and the description ranking
fn print_report(report: &SessionReport) {
    println!("{:>60}", "TRANSACTIONS".bold());
    println!("------------------------------------------------------------");

    for tx in report.ledger.records() {
        println!(
            "{:<11} {:>14}  {}",
            tx.date.format("%Y-%m-%d").to_string(),
            format_amount(tx.amount, &tx.currency),
            tx.description
        );
    }

    println!();
    println!(
        "{} {} records since {} ({} fetched)",
        "MOST FREQUENT".bold(),
        report.ledger.len(),
        report.cutoff,
        report.accumulated
    );
    println!("------------------------------------------------------------");

    for frequency in &report.frequencies {
        println!("{:>6}  {}", frequency.count, frequency.description);
    }
}

fn format_amount(amount: Decimal, currency: &str) -> String {
    match iso::find(currency) {
        Some(iso_code) => Money::from_decimal(amount, iso_code).to_string(),
        None => format!("{amount} {currency}"),
    }
}
