use config::builder::DefaultState;
use config::{Config, ConfigBuilder, Environment, File, FileFormat};
use secrecy::Secret;
use serde::Deserialize;

use crate::error::AppErrors as Error;

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub application: ApplicationSettings,
    pub oauth: OauthCredentials,
    pub tink: TinkSettings,
    pub pipeline: PipelineSettings,
}

/// Where the callback server listens
#[derive(Debug, Clone, Deserialize)]
pub struct ApplicationSettings {
    pub host: String,
    pub port: u16,
}

/// Structure for representing the components of the Oauth client
#[derive(Debug, Clone, Deserialize)]
pub struct OauthCredentials {
    pub client_id: String,
    pub client_secret: Secret<String>,
    pub redirect_uri: String,
}

/// Upstream endpoints and the fixed Tink Link parameters
#[derive(Debug, Clone, Deserialize)]
pub struct TinkSettings {
    pub link_url: String,
    pub api_base_url: String,
    pub market: String,
    pub locale: String,
    pub test: bool,
}

/// Limits for a single session's transaction run
#[derive(Debug, Clone, Deserialize)]
pub struct PipelineSettings {
    pub page_size: u32,
    pub record_threshold: usize,
    pub window_months: u32,
    pub max_pages: u32,
    pub request_timeout_secs: u64,
}

/// Get the configuration from defaults, `configuration.yaml` and the environment.
///
/// `TINK_CLIENT_ID`, `TINK_CLIENT_SECRET` and `PORT` are honoured directly;
/// anything else can be overridden with `APP_<SECTION>__<KEY>`. Unless set
/// explicitly, `oauth.redirect_uri` points at `/callback` on the resolved port.
///
/// # Errors
/// Will return errors if the config can't be read or deserialised.
pub fn get_configuration() -> Result<Settings, Error> {
    dotenv::dotenv().ok();

    let port: u16 = layered()?.build()?.get("application.port")?;

    let settings = layered()?
        .set_default(
            "oauth.redirect_uri",
            format!("http://localhost:{port}/callback"),
        )?
        .build()?;

    Ok(settings.try_deserialize::<Settings>()?)
}

// defaults, the optional file and the environment, in rising precedence
fn layered() -> Result<ConfigBuilder<DefaultState>, Error> {
    let builder = Config::builder()
        .set_default("application.host", "127.0.0.1")?
        .set_default("application.port", 3000)?
        .set_default(
            "tink.link_url",
            "https://link.tink.com/1.0/transactions/connect-accounts/",
        )?
        .set_default("tink.api_base_url", "https://api.tink.com")?
        .set_default("tink.market", "GB")?
        .set_default("tink.locale", "en_US")?
        .set_default("tink.test", true)?
        .set_default("pipeline.page_size", 100)?
        .set_default("pipeline.record_threshold", 500)?
        .set_default("pipeline.window_months", 3)?
        .set_default("pipeline.max_pages", 50)?
        .set_default("pipeline.request_timeout_secs", 30)?
        .add_source(File::new("configuration.yaml", FileFormat::Yaml).required(false))
        .add_source(
            Environment::with_prefix("APP")
                .prefix_separator("_")
                .separator("__"),
        )
        .set_override_option("oauth.client_id", std::env::var("TINK_CLIENT_ID").ok())?
        .set_override_option(
            "oauth.client_secret",
            std::env::var("TINK_CLIENT_SECRET").ok(),
        )?
        .set_override_option("application.port", std::env::var("PORT").ok())?;

    Ok(builder)
}
