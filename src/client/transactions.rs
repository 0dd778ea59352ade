//! Transaction related functions
//!
//! This module gets pages of transactions from the Tink data API.

use async_trait::async_trait;
use tracing::debug;

use super::{TinkClient, TransactionSource};
use crate::error::AppErrors as Error;
use crate::model::transaction::TransactionsPage;

#[async_trait]
impl TransactionSource for TinkClient {
    #[tracing::instrument(name = "Get transactions page", skip(self, page_token))]
    async fn transactions_page(
        &self,
        page_size: u32,
        page_token: Option<&str>,
    ) -> Result<TransactionsPage, Error> {
        let url = format!("{}/data/v2/transactions", self.base_url);

        let mut query = vec![("pageSize", page_size.to_string())];
        if let Some(token) = page_token {
            query.push(("pageToken", token.to_string()));
        }
        debug!(url = %url, continued = page_token.is_some(), "requesting transactions");

        let response = self.client.get(&url).query(&query).send().await?;

        Self::handle_response(response).await
    }
}

#[cfg(test)]
mod test {
    use std::time::Duration;

    use secrecy::Secret;
    use serde_json::json;
    use wiremock::matchers::{header, method, path, query_param, query_param_is_missing};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;
    use crate::tests::test::{init_tracing, upstream_transaction};

    fn client(server: &MockServer) -> TinkClient {
        TinkClient::new(
            &server.uri(),
            &Secret::new("tok1".to_string()),
            Duration::from_secs(5),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn first_page_sends_bearer_and_page_size() {
        init_tracing();
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/data/v2/transactions"))
            .and(header("authorization", "Bearer tok1"))
            .and(query_param("pageSize", "100"))
            .and(query_param_is_missing("pageToken"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "transactions": [upstream_transaction("2024-05-02", "Coffee", "-320")],
                "nextPageToken": "page-2"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let page = client(&server).transactions_page(100, None).await.unwrap();

        assert_eq!(page.transactions.len(), 1);
        assert_eq!(page.continuation(), Some("page-2"));
    }

    #[tokio::test]
    async fn continuation_token_is_forwarded() {
        init_tracing();
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/data/v2/transactions"))
            .and(query_param("pageToken", "page-2"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({ "transactions": [], "nextPageToken": "" })),
            )
            .expect(1)
            .mount(&server)
            .await;

        let page = client(&server)
            .transactions_page(100, Some("page-2"))
            .await
            .unwrap();

        assert!(page.transactions.is_empty());
        assert_eq!(page.continuation(), None);
    }

    #[tokio::test]
    async fn error_status_is_reported_with_body() {
        init_tracing();
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/data/v2/transactions"))
            .respond_with(ResponseTemplate::new(401).set_body_string("token expired"))
            .mount(&server)
            .await;

        let err = client(&server).transactions_page(100, None).await.unwrap_err();

        match err {
            Error::UpstreamStatus { status, body } => {
                assert_eq!(status.as_u16(), 401);
                assert_eq!(body, "token expired");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn decode_failure_reports_json_path() {
        init_tracing();
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/data/v2/transactions"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({ "transactions": [{ "dates": { "booked": 20240501 } }] })),
            )
            .mount(&server)
            .await;

        let err = client(&server).transactions_page(100, None).await.unwrap_err();

        match err {
            Error::DecodeError { path, .. } => assert_eq!(path, "transactions[0].dates.booked"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn slow_page_times_out() {
        init_tracing();
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/data/v2/transactions"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({ "transactions": [], "nextPageToken": "" }))
                    .set_delay(Duration::from_secs(5)),
            )
            .mount(&server)
            .await;
        let client = TinkClient::new(
            &server.uri(),
            &Secret::new("tok1".to_string()),
            Duration::from_secs(1),
        )
        .unwrap();

        let started = std::time::Instant::now();
        let err = client.transactions_page(100, None).await.unwrap_err();

        assert!(matches!(err, Error::ReqwestError(_)));
        assert!(started.elapsed() < Duration::from_secs(4));
    }
}
