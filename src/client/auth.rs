//! OAuth code exchange

use std::collections::HashMap;
use std::time::Duration;

use secrecy::{ExposeSecret, Secret};
use serde::Deserialize;
use tracing::{error, info};

use crate::configuration::{OauthCredentials, TinkSettings};
use crate::error::AppErrors as Error;

/// Structure for representing the access token request response
#[derive(Debug)]
pub struct AccessToken {
    pub access_token: Secret<String>,
    pub token_type: Option<String>,
    pub expires_in: Option<u64>,
    pub scope: Option<String>,
}

// The token endpoint may answer 200 without a token, so every field is optional here
#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: Option<Secret<String>>,
    token_type: Option<String>,
    expires_in: Option<u64>,
    scope: Option<String>,
}

/// Exchange the auth code for an access token
///
/// # Errors
/// Will return `AuthExchangeFailed` if the endpoint can't be reached, rejects
/// the code, or answers without an access token.
#[tracing::instrument(name = "Exchange auth code", skip(tink, credentials, code))]
pub async fn exchange_code(
    tink: &TinkSettings,
    credentials: &OauthCredentials,
    code: &str,
    timeout: Duration,
) -> Result<AccessToken, Error> {
    let url = format!("{}/api/v1/oauth/token", tink.api_base_url.trim_end_matches('/'));
    let params = build_form(credentials, code);

    let client = reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| Error::AuthExchangeFailed(e.to_string()))?;
    let response = client
        .post(&url)
        .form(&params)
        .send()
        .await
        .map_err(|e| Error::AuthExchangeFailed(e.to_string()))?;

    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        error!(%status, %body, "token endpoint rejected the auth code");
        return Err(Error::AuthExchangeFailed(format!("{status}: {body}")));
    }

    let token = response
        .json::<TokenResponse>()
        .await
        .map_err(|e| Error::AuthExchangeFailed(e.to_string()))?;

    let access_token = token
        .access_token
        .ok_or_else(|| Error::AuthExchangeFailed("response has no access_token".to_string()))?;
    info!(expires_in = ?token.expires_in, scope = ?token.scope, "received access token");

    Ok(AccessToken {
        access_token,
        token_type: token.token_type,
        expires_in: token.expires_in,
        scope: token.scope,
    })
}

// Build the form for the access token request
fn build_form<'a>(credentials: &'a OauthCredentials, code: &'a str) -> HashMap<&'a str, &'a str> {
    let mut params = HashMap::new();
    params.insert("code", code);
    params.insert("client_id", credentials.client_id.as_str());
    params.insert("client_secret", credentials.client_secret.expose_secret().as_str());
    params.insert("grant_type", "authorization_code");

    params
}
