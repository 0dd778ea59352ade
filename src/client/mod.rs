//! Tink API client
//!
//! A bearer-authenticated `reqwest` client for the data endpoints, plus the
//! OAuth code exchange in [`auth`].

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{self, HeaderMap, HeaderValue};
use reqwest::Response;
use secrecy::{ExposeSecret, Secret};
use serde::de::DeserializeOwned;

use crate::error::AppErrors as Error;
use crate::model::transaction::TransactionsPage;

pub mod auth;
pub mod transactions;

/// Anything that can hand out pages of transactions
#[async_trait]
pub trait TransactionSource {
    /// Fetch one page. `page_token` is `None` for the first page.
    async fn transactions_page(
        &self,
        page_size: u32,
        page_token: Option<&str>,
    ) -> Result<TransactionsPage, Error>;
}

#[derive(Debug, Clone)]
pub struct TinkClient {
    base_url: String,
    client: reqwest::Client,
}

impl TinkClient {
    /// Create a client that sends `access_token` with every request.
    ///
    /// # Errors
    /// Will return an error if the token isn't a valid header value or the
    /// client can't be built.
    pub fn new(
        base_url: &str,
        access_token: &Secret<String>,
        timeout: Duration,
    ) -> Result<Self, Error> {
        let mut auth_header_value =
            HeaderValue::from_str(&format!("Bearer {}", access_token.expose_secret()))?;
        auth_header_value.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, auth_header_value);

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()?;

        Ok(TinkClient {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    pub(crate) async fn handle_response<T: DeserializeOwned>(response: Response) -> Result<T, Error> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::UpstreamStatus { status, body });
        }

        let bytes = response.bytes().await?;
        let deserializer = &mut serde_json::Deserializer::from_slice(&bytes);
        let result = serde_path_to_error::deserialize(deserializer)?;

        Ok(result)
    }
}
