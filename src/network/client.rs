//! HTTP client for querying translation endpoints

use super::escape::escape;
use super::response::QueryResponse;
use crate::config::NetworkSettings;
use crate::error::{ConfigError, QueryError, Result};
use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};
use reqwest::{Client, StatusCode, Url};
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

/// Query client holding a configured reqwest client.
///
/// Every request carries the configured `User-Agent` header and is bounded by
/// the configured timeout. The client is safe to share across tasks.
///
/// [`QueryClient::dispose`] is idempotent: the first call releases the
/// connection pool and cancels in-flight requests, later calls do nothing.
/// Queries issued after disposal report [`QueryError::Disposed`].
pub struct QueryClient {
    client: Mutex<Option<Client>>,
    settings: NetworkSettings,
    shutdown: CancellationToken,
}

enum Fetched {
    Body(StatusCode, String),
    Failed(StatusCode),
}

impl QueryClient {
    /// Create a new query client with default settings
    pub fn new() -> Result<Self> {
        Self::with_settings(&NetworkSettings::default())
    }

    /// Create a new query client with custom settings
    pub fn with_settings(settings: &NetworkSettings) -> Result<Self> {
        settings.validate()?;

        let mut headers = HeaderMap::new();
        let user_agent = HeaderValue::from_str(&settings.user_agent)
            .map_err(|_| ConfigError::InvalidUserAgent(settings.user_agent.clone()))?;
        headers.insert(USER_AGENT, user_agent);

        let client = Client::builder()
            .timeout(settings.timeout())
            .default_headers(headers)
            .gzip(true)
            .brotli(true)
            .build()
            .map_err(QueryError::Build)?;

        debug!(
            "Query client initialized (timeout {} ms, user agent {:?})",
            settings.timeout_ms, settings.user_agent
        );

        Ok(Self {
            client: Mutex::new(Some(client)),
            settings: settings.clone(),
            shutdown: CancellationToken::new(),
        })
    }

    /// Escape text for a URL query component
    pub fn escape(text: &str) -> String {
        escape(text)
    }

    /// GET `url` without a cancellation signal
    pub async fn get(&self, url: &str) -> QueryResponse {
        self.get_query_response(url, &CancellationToken::new()).await
    }

    /// GET `url` and return the body, the status description and any fault.
    ///
    /// Never fails: invalid URLs, transport errors, timeouts, cancellation and
    /// disposal are all reported through [`QueryResponse::fault`].
    pub async fn get_query_response(&self, url: &str, cancel: &CancellationToken) -> QueryResponse {
        debug!("GET {}", url);
        match self.fetch(url, cancel).await {
            Ok(Fetched::Body(status, body)) => QueryResponse {
                http_status: Some(status),
                ..QueryResponse::ok(body)
            },
            Ok(Fetched::Failed(status)) => {
                warn!("GET {} returned {}", url, status);
                QueryResponse::from_status(status)
            }
            Err(e) => {
                warn!("GET {} failed: {}", url, e);
                QueryResponse::from_fault(e)
            }
        }
    }

    async fn fetch(&self, url: &str, cancel: &CancellationToken) -> Result<Fetched> {
        let client = self.client()?;
        let url = Url::parse(url)?;

        let request = async {
            let response = client
                .get(url)
                .send()
                .await
                .map_err(|e| self.transport_error(e))?;

            let status = response.status();
            if !status.is_success() {
                return Ok(Fetched::Failed(status));
            }

            let body = response.text().await.map_err(|e| self.transport_error(e))?;
            Ok::<_, QueryError>(Fetched::Body(status, body))
        };

        // Dropping `request` aborts the exchange and frees its connection.
        tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(QueryError::Cancelled),
            _ = self.shutdown.cancelled() => Err(QueryError::Disposed),
            result = request => result,
        }
    }

    fn transport_error(&self, error: reqwest::Error) -> QueryError {
        if error.is_timeout() {
            QueryError::Timeout {
                timeout_ms: self.settings.timeout_ms,
            }
        } else {
            QueryError::Transport(error)
        }
    }

    fn client(&self) -> Result<Client> {
        self.lock().clone().ok_or(QueryError::Disposed)
    }

    fn lock(&self) -> MutexGuard<'_, Option<Client>> {
        self.client.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Release the underlying HTTP client and cancel in-flight requests
    pub fn dispose(&self) {
        if self.lock().take().is_some() {
            self.shutdown.cancel();
            debug!("Query client disposed");
        }
    }

    pub fn is_disposed(&self) -> bool {
        self.lock().is_none()
    }

    pub fn settings(&self) -> &NetworkSettings {
        &self.settings
    }

    pub fn user_agent(&self) -> &str {
        &self.settings.user_agent
    }

    pub fn timeout(&self) -> Duration {
        self.settings.timeout()
    }
}

impl Drop for QueryClient {
    fn drop(&mut self) {
        self.dispose();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::network::{DEFAULT_USER_AGENT, STATUS_OK};
    use std::sync::Arc;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn fast_client(timeout_ms: u64) -> QueryClient {
        QueryClient::with_settings(&NetworkSettings::default().with_timeout_ms(timeout_ms)).unwrap()
    }

    #[tokio::test]
    async fn test_client_creation() {
        let client = tokio_test::assert_ok!(QueryClient::new());
        assert_eq!(client.timeout(), Duration::from_millis(2000));
        assert_eq!(client.user_agent(), DEFAULT_USER_AGENT);
        assert!(!client.is_disposed());
    }

    #[test]
    fn test_rejects_invalid_settings() {
        let zero = NetworkSettings::default().with_timeout_ms(0);
        assert!(matches!(QueryClient::with_settings(&zero), Err(QueryError::Config(_))));

        let bad_agent = NetworkSettings::default().with_user_agent("a\r\nb");
        assert!(matches!(QueryClient::with_settings(&bad_agent), Err(QueryError::Config(_))));
    }

    #[test]
    fn test_escape() {
        assert_eq!(QueryClient::escape("how are you?"), "how%20are%20you%3F");
    }

    #[tokio::test]
    async fn test_success_returns_body() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/translate"))
            .respond_with(ResponseTemplate::new(200).set_body_string("[[\"Bonjour\",\"Hello\"]]"))
            .expect(1)
            .mount(&server)
            .await;

        let client = fast_client(2000);
        let response = client.get(&format!("{}/translate?q=Hello", server.uri())).await;

        assert_eq!(response.body.as_deref(), Some("[[\"Bonjour\",\"Hello\"]]"));
        assert_eq!(response.status, STATUS_OK);
        assert!(response.fault.is_none());
        assert_eq!(response.http_status, Some(StatusCode::OK));
    }

    #[tokio::test]
    async fn test_user_agent_header_sent() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(header("User-Agent", "netquery-test/1.0"))
            .respond_with(ResponseTemplate::new(200).set_body_string("ok"))
            .expect(1)
            .mount(&server)
            .await;

        let settings = NetworkSettings::default().with_user_agent("netquery-test/1.0");
        let client = QueryClient::with_settings(&settings).unwrap();
        let response = client.get(&server.uri()).await;

        assert!(response.is_success());
    }

    #[tokio::test]
    async fn test_not_found_reports_status_name() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404).set_body_string("missing"))
            .mount(&server)
            .await;

        let (body, status, fault) = fast_client(2000).get(&server.uri()).await.into_parts();

        assert!(body.is_none());
        assert_eq!(status, "NotFound");
        assert!(fault.is_none());
    }

    #[tokio::test]
    async fn test_server_error_into_result() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let response = fast_client(2000).get(&server.uri()).await;
        assert_eq!(response.status, "ServiceUnavailable");
        assert!(matches!(
            response.into_result(),
            Err(QueryError::Status(StatusCode::SERVICE_UNAVAILABLE))
        ));
    }

    #[tokio::test]
    async fn test_timeout_is_captured() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_millis(1000)))
            .mount(&server)
            .await;

        let response = fast_client(100).get(&server.uri()).await;

        assert!(response.body.is_none());
        assert!(!response.status.is_empty());
        let fault = response.fault.expect("timeout fault");
        assert!(fault.is_timeout());
        assert_eq!(response.status, fault.to_string());
    }

    #[tokio::test]
    async fn test_cancellation_is_captured_and_client_stays_usable() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/slow"))
            .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_millis(1500)))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/fast"))
            .respond_with(ResponseTemplate::new(200).set_body_string("fast"))
            .mount(&server)
            .await;

        let client = fast_client(5000);
        let token = CancellationToken::new();
        let trigger = token.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(50)).await;
            trigger.cancel();
        });

        let response = client
            .get_query_response(&format!("{}/slow", server.uri()), &token)
            .await;
        assert!(response.body.is_none());
        assert!(!response.status.is_empty());
        assert!(response.fault.expect("cancellation fault").is_cancelled());

        let response = client.get(&format!("{}/fast", server.uri())).await;
        assert_eq!(response.body.as_deref(), Some("fast"));
    }

    #[tokio::test]
    async fn test_cancelled_token_short_circuits() {
        let token = CancellationToken::new();
        token.cancel();

        // Nothing listens on port 9; a cancelled token must win regardless.
        let response = fast_client(2000)
            .get_query_response("http://127.0.0.1:9/", &token)
            .await;
        assert!(matches!(response.fault, Some(QueryError::Cancelled)));
    }

    #[tokio::test]
    async fn test_invalid_url_is_captured() {
        let response = fast_client(2000).get("not a url").await;
        assert!(response.body.is_none());
        assert!(matches!(response.fault, Some(QueryError::InvalidUrl(_))));
        assert!(response.status.starts_with("invalid URL"));
    }

    #[tokio::test]
    async fn test_connection_failure_is_captured() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let uri = format!("http://{}/", listener.local_addr().unwrap());
        drop(listener);

        let response = fast_client(2000).get(&uri).await;
        assert!(response.body.is_none());
        assert!(!response.status.is_empty());
        assert!(matches!(response.fault, Some(QueryError::Transport(_))));
    }

    #[tokio::test]
    async fn test_dispose_is_idempotent_and_blocks_queries() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("ok"))
            .mount(&server)
            .await;

        let client = fast_client(2000);
        assert!(client.get(&server.uri()).await.is_success());

        client.dispose();
        client.dispose();
        assert!(client.is_disposed());

        let response = client.get(&server.uri()).await;
        assert!(response.body.is_none());
        assert!(matches!(response.fault, Some(QueryError::Disposed)));
    }

    #[tokio::test]
    async fn test_dispose_cancels_in_flight_request() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_millis(1500)))
            .mount(&server)
            .await;

        let client = Arc::new(fast_client(5000));
        let uri = server.uri();
        let pending = {
            let client = client.clone();
            tokio::spawn(async move { client.get(&uri).await })
        };

        tokio::time::sleep(Duration::from_millis(50)).await;
        client.dispose();

        let response = pending.await.unwrap();
        assert!(matches!(response.fault, Some(QueryError::Disposed)));
    }

    #[tokio::test]
    async fn test_concurrent_queries_share_client() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("shared"))
            .expect(8)
            .mount(&server)
            .await;

        let client = Arc::new(fast_client(2000));
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let client = client.clone();
                let uri = server.uri();
                tokio::spawn(async move { client.get(&uri).await })
            })
            .collect();

        for handle in handles {
            assert_eq!(handle.await.unwrap().body.as_deref(), Some("shared"));
        }
    }
}
