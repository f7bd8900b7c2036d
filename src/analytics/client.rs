//! Analytics HTTP client for single page reads

use async_trait::async_trait;
use log::debug;
use reqwest::{Client, StatusCode};
use std::time::Duration;

use super::credentials::Credential;
use super::models::Page;
use super::request::PageRequest;
use super::traits::PageFetcher;
use crate::error::{ExportError, Result};

/// Analytics API client
pub struct AnalyticsClient {
    client: Client,
}

impl Default for AnalyticsClient {
    fn default() -> Self {
        Self::new()
    }
}

impl AnalyticsClient {
    /// Create a new client with connection settings suited to slow report queries
    pub fn new() -> Self {
        let client = Client::builder()
            .pool_idle_timeout(Duration::from_secs(90))
            .tcp_keepalive(Duration::from_secs(60))
            .connect_timeout(Duration::from_secs(10))
            .timeout(Duration::from_secs(120))
            .build()
            .unwrap_or_else(|_| Client::new());

        Self { client }
    }
}

/// Map a non-success status to a failure class
fn classify_status(status: StatusCode, body: &str) -> ExportError {
    let message = if body.is_empty() {
        status
            .canonical_reason()
            .unwrap_or("request failed")
            .to_string()
    } else {
        body.to_string()
    };

    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => ExportError::Unauthorized {
            status: status.as_u16(),
            message,
        },
        _ => ExportError::Transient(format!("status {}: {}", status.as_u16(), message)),
    }
}

#[async_trait]
impl PageFetcher for AnalyticsClient {
    async fn fetch_page(&self, request: &PageRequest, credential: &Credential) -> Result<Page> {
        debug!("Fetching page from: {}", request.url());

        let response = self
            .client
            .get(request.url())
            .header("Authorization", credential.bearer())
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(classify_status(status, &body));
        }

        let page: Page = serde_json::from_str(&body)?;
        debug!(
            "Page returned {} rows, {} headers",
            page.rows.len(),
            page.column_headers.len()
        );
        Ok(page)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn page_json(self_link: &str) -> serde_json::Value {
        serde_json::json!({
            "columnHeaders": [{"name": "ga:date"}, {"name": "ga:users"}],
            "rows": [["20230101", "10"]],
            "selfLink": self_link,
            "totalResults": 1,
            "itemsPerPage": 1000
        })
    }

    #[test]
    fn test_classify_unauthorized() {
        let err = classify_status(StatusCode::UNAUTHORIZED, "");
        match err {
            ExportError::Unauthorized { status, message } => {
                assert_eq!(status, 401);
                assert_eq!(message, "Unauthorized");
            }
            _ => panic!("Expected ExportError::Unauthorized"),
        }
    }

    #[test]
    fn test_classify_server_error_is_transient() {
        let err = classify_status(StatusCode::SERVICE_UNAVAILABLE, "backend error");
        assert!(matches!(err, ExportError::Transient(ref m) if m.contains("503")));
    }

    #[tokio::test]
    async fn test_fetch_page_sends_bearer() {
        let mock_server = MockServer::start().await;
        let url = format!("{}/ga?ids=ga%3A1", mock_server.uri());

        Mock::given(method("GET"))
            .and(path("/ga"))
            .and(query_param("ids", "ga:1"))
            .and(header("Authorization", "Bearer tok-1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(page_json(&url)))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = AnalyticsClient::new();
        let page = client
            .fetch_page(&PageRequest::continuation(&url), &Credential::new("tok-1"))
            .await
            .unwrap();

        assert_eq!(page.rows.len(), 1);
        assert_eq!(page.self_link, url);
    }

    #[tokio::test]
    async fn test_fetch_page_unauthorized() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/ga"))
            .respond_with(ResponseTemplate::new(401).set_body_string("Invalid Credentials"))
            .mount(&mock_server)
            .await;

        let client = AnalyticsClient::new();
        let result = client
            .fetch_page(
                &PageRequest::continuation(&format!("{}/ga", mock_server.uri())),
                &Credential::new("expired"),
            )
            .await;

        match result {
            Err(ExportError::Unauthorized { status, message }) => {
                assert_eq!(status, 401);
                assert!(message.contains("Invalid Credentials"));
            }
            other => panic!("Expected Unauthorized, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_fetch_page_server_error_is_transient() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/ga"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&mock_server)
            .await;

        let client = AnalyticsClient::new();
        let result = client
            .fetch_page(
                &PageRequest::continuation(&format!("{}/ga", mock_server.uri())),
                &Credential::new("tok"),
            )
            .await;

        assert!(matches!(result, Err(ExportError::Transient(_))));
    }

    #[tokio::test]
    async fn test_fetch_page_missing_fields_is_malformed() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/ga"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({"rows": []})),
            )
            .mount(&mock_server)
            .await;

        let client = AnalyticsClient::new();
        let result = client
            .fetch_page(
                &PageRequest::continuation(&format!("{}/ga", mock_server.uri())),
                &Credential::new("tok"),
            )
            .await;

        assert!(matches!(result, Err(ExportError::Malformed(_))));
    }

    #[tokio::test]
    async fn test_fetch_page_connection_refused_is_transient() {
        let client = AnalyticsClient::new();
        let result = client
            .fetch_page(
                &PageRequest::continuation("http://127.0.0.1:1/ga"),
                &Credential::new("tok"),
            )
            .await;

        assert!(matches!(result, Err(ExportError::Transient(_))));
    }
}
