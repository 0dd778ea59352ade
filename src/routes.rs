//! HTTP front door
//!
//! `/` sends the browser to Tink Link; `/callback` receives the auth code and
//! starts a session pipeline in the background. Finished sessions are reported
//! on the outcome channel.

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;
use tokio::sync::mpsc;
use tracing::{error, info, warn, Instrument};
use url::Url;
use uuid::Uuid;

use crate::configuration::Settings;
use crate::error::AppErrors as Error;
use crate::pipeline::{run_session, SessionOutcome};

#[derive(Clone)]
pub struct AppState {
    pub settings: Arc<Settings>,
    pub outcome_tx: mpsc::UnboundedSender<SessionOutcome>,
}

/// Query parameters Tink Link appends to the redirect URI
#[derive(Deserialize, Debug)]
pub struct CallbackParams {
    pub code: Option<String>,
    pub error: Option<String>,
    pub message: Option<String>,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(connect))
        .route("/callback", get(oauth_callback))
        .with_state(state)
}

// redirect the browser to Tink Link
async fn connect(State(state): State<AppState>) -> Response {
    match link_url(&state.settings) {
        Ok(url) => Redirect::to(url.as_str()).into_response(),
        Err(e) => {
            error!(error = %e, "can't build the Tink Link url");
            (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response()
        }
    }
}

// oauth callback function - echoes the auth code and starts the session
#[tracing::instrument(name = "OAuth callback", skip(params, state))]
async fn oauth_callback(
    Query(params): Query<CallbackParams>,
    State(state): State<AppState>,
) -> Response {
    let Some(code) = params.code else {
        let reason = params.error.unwrap_or_else(|| "missing_code".to_string());
        warn!(%reason, message = ?params.message, "callback without an auth code");
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": reason, "message": params.message })),
        )
            .into_response();
    };

    let session_id = Uuid::new_v4();
    info!(%session_id, "auth code received, starting session");
    spawn_session(state, session_id, code.clone());

    Json(json!({ "OAuth": code })).into_response()
}

fn spawn_session(state: AppState, session_id: Uuid, code: String) {
    let span = tracing::info_span!("Session", %session_id);

    tokio::spawn(
        async move {
            let result = run_session(&state.settings, &code).await;
            if state
                .outcome_tx
                .send(SessionOutcome { session_id, result })
                .is_err()
            {
                warn!("nobody is listening for session outcomes");
            }
        }
        .instrument(span),
    );
}

/// The Tink Link url the browser is sent to
///
/// # Errors
/// Will return an error if the configured link url is not a valid url.
pub fn link_url(settings: &Settings) -> Result<Url, Error> {
    let mut url = Url::parse(&settings.tink.link_url)?;
    url.query_pairs_mut()
        .append_pair("client_id", &settings.oauth.client_id)
        .append_pair("redirect_uri", &settings.oauth.redirect_uri)
        .append_pair("market", &settings.tink.market)
        .append_pair("locale", &settings.tink.locale)
        .append_pair("test", &settings.tink.test.to_string());

    Ok(url)
}
