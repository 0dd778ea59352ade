//! Tracing setup
//!
//! Logs are emitted as bunyan-formatted JSON. The filter defaults to the
//! supplied level and can be overridden with `RUST_LOG`.

use tracing::subscriber::set_global_default;
use tracing::Subscriber;
use tracing_bunyan_formatter::{BunyanFormattingLayer, JsonStorageLayer};
use tracing_log::LogTracer;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::{layer::SubscriberExt, EnvFilter, Registry};

use crate::error::AppErrors as Error;

/// Compose multiple layers into a `tracing` subscriber.
///
/// `sink` decides where the formatted spans end up (stdout, stderr, or a
/// sink in tests).
pub fn get_subscriber<Sink>(
    name: String,
    env_filter: String,
    sink: Sink,
) -> impl Subscriber + Send + Sync
where
    Sink: for<'a> MakeWriter<'a> + Send + Sync + 'static,
{
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(env_filter));
    let formatting_layer = BunyanFormattingLayer::new(name, sink);

    Registry::default()
        .with(env_filter)
        .with(JsonStorageLayer)
        .with(formatting_layer)
}

/// Register a subscriber as global default to process span data.
///
/// # Errors
/// Will return an error if called more than once.
pub fn init_subscriber(subscriber: impl Subscriber + Send + Sync) -> Result<(), Error> {
    LogTracer::init()?;
    set_global_default(subscriber)?;

    Ok(())
}
