//! HTTP gateway to the SRE Command backend with retry and error normalization.

use anyhow::Result;
use log::{debug, warn};
use reqwest::{Client, Method, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::Arc;

use super::error::{ApiError, ApiResult};
use super::request::{ApiRequest, QueryParams};
use super::retry::{RetryDecision, RetryPolicy, Sleeper, TokioSleeper, classify_status};
use crate::config::ApiConfig;

/// Shared entry point for every backend call.
///
/// Cloning is cheap: clones share the connection pool and cookie store.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    policy: RetryPolicy,
    sleeper: Arc<dyn Sleeper>,
}

/// Why a single attempt failed.
#[derive(Debug)]
enum AttemptFailure {
    /// No response was received.
    Network(reqwest::Error),
    /// The backend answered with a non-success status.
    Status { status: StatusCode, body: String },
    /// The success body didn't decode into the expected type.
    Decode {
        status: StatusCode,
        body: String,
        reason: String,
    },
}

impl AttemptFailure {
    fn decision(&self) -> RetryDecision {
        match self {
            AttemptFailure::Network(_) => RetryDecision::Retry,
            AttemptFailure::Status { status, .. } => classify_status(*status),
            AttemptFailure::Decode { .. } => RetryDecision::Fail,
        }
    }

    fn into_api_error(self, attempts: u32) -> ApiError {
        match self {
            AttemptFailure::Network(_) => ApiError::network(attempts),
            AttemptFailure::Status { status, body } => {
                ApiError::from_response(status.as_u16(), &body, attempts)
            }
            AttemptFailure::Decode {
                status,
                body,
                reason,
            } => ApiError::decode(status.as_u16(), &body, &reason, attempts),
        }
    }
}

impl std::fmt::Display for AttemptFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AttemptFailure::Network(e) => write!(f, "{}", e),
            AttemptFailure::Status { status, .. } => write!(f, "HTTP {}", status),
            AttemptFailure::Decode { reason, .. } => write!(f, "invalid body: {}", reason),
        }
    }
}

impl ApiClient {
    /// Creates a client from resolved configuration.
    pub fn new(config: &ApiConfig) -> Result<Self> {
        let client = config.build_http_client()?;
        Ok(Self::with_client(
            client,
            &config.base_url,
            config.retry_policy(),
        ))
    }

    /// Creates a client around an existing reqwest Client.
    pub fn with_client(client: Client, base_url: &str, policy: RetryPolicy) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            policy,
            sleeper: Arc::new(TokioSleeper),
        }
    }

    /// Replaces how the client waits between attempts.
    pub fn with_sleeper(mut self, sleeper: Arc<dyn Sleeper>) -> Self {
        self.sleeper = sleeper;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn policy(&self) -> RetryPolicy {
        self.policy
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str, query: QueryParams) -> ApiResult<T> {
        self.send(ApiRequest::new(Method::GET, path).query(query))
            .await
    }

    pub async fn post<T, B>(&self, path: &str, body: &B) -> ApiResult<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let body = to_body(body)?;
        self.send(ApiRequest::new(Method::POST, path).body(body))
            .await
    }

    /// POST without a request body.
    pub async fn post_empty<T: DeserializeOwned>(&self, path: &str) -> ApiResult<T> {
        self.send(ApiRequest::new(Method::POST, path)).await
    }

    pub async fn put<T, B>(&self, path: &str, body: &B) -> ApiResult<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let body = to_body(body)?;
        self.send(ApiRequest::new(Method::PUT, path).body(body))
            .await
    }

    pub async fn delete<T: DeserializeOwned>(&self, path: &str) -> ApiResult<T> {
        self.send(ApiRequest::new(Method::DELETE, path)).await
    }

    /// Sends a request, retrying transient failures with exponential backoff.
    ///
    /// Returns the decoded body on success. Any terminal failure (a 4xx other
    /// than 408/429, an undecodable body, or exhausted retries) is returned as a
    /// normalized [`ApiError`].
    #[tracing::instrument(skip(self, request), fields(method = %request.method, path = %request.path))]
    pub async fn send<T: DeserializeOwned>(&self, request: ApiRequest) -> ApiResult<T> {
        let mut retry_index: u32 = 0;

        loop {
            let failure = match self.attempt(&request).await {
                Ok(payload) => return Ok(payload),
                Err(failure) => failure,
            };
            let attempts = retry_index.saturating_add(1);

            if failure.decision() == RetryDecision::Fail {
                debug!(
                    "{} {}: non-retryable failure: {}",
                    request.method, request.path, failure
                );
                return Err(failure.into_api_error(attempts));
            }

            if !self.policy.can_retry(retry_index) {
                debug!(
                    "{} {}: giving up after {} attempts: {}",
                    request.method, request.path, attempts, failure
                );
                return Err(failure.into_api_error(attempts));
            }

            let delay = self.policy.delay_for(retry_index);
            warn!(
                "{} {}: attempt {}/{} failed ({}), retrying in {}ms...",
                request.method,
                request.path,
                attempts,
                self.policy.max_retries.saturating_add(1),
                failure,
                delay.as_millis()
            );
            self.sleeper.sleep(delay).await;
            retry_index += 1;
        }
    }

    /// Single transport attempt without retry.
    async fn attempt<T: DeserializeOwned>(
        &self,
        request: &ApiRequest,
    ) -> std::result::Result<T, AttemptFailure> {
        let url = self.url_for(&request.path);
        debug!("{} {}...", request.method, url);

        let mut builder = self.client.request(request.method.clone(), &url);
        if !request.query.is_empty() {
            builder = builder.query(request.query.pairs());
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder.send().await.map_err(AttemptFailure::Network)?;
        let status = response.status();
        let body = match response.text().await {
            Ok(body) => body,
            // A failing status already decides the outcome, even if its body is lost.
            Err(e) if !status.is_success() => {
                debug!("Failed to read {} response body: {}", status, e);
                String::new()
            }
            Err(e) => return Err(AttemptFailure::Network(e)),
        };

        if !status.is_success() {
            return Err(AttemptFailure::Status { status, body });
        }

        decode_payload(&body).map_err(|e| AttemptFailure::Decode {
            status,
            body,
            reason: e.to_string(),
        })
    }

    fn url_for(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}/{}", self.base_url, path)
        }
    }
}

/// Decodes a success body. An empty body decodes as JSON `null`.
fn decode_payload<T: DeserializeOwned>(body: &str) -> serde_json::Result<T> {
    if body.trim().is_empty() {
        serde_json::from_value(Value::Null)
    } else {
        serde_json::from_str(body)
    }
}

fn to_body<B: Serialize + ?Sized>(body: &B) -> ApiResult<Value> {
    serde_json::to_value(body).map_err(|e| {
        ApiError::invalid_request(format!("Failed to serialize request body: {}", e))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::error::{GENERIC_ERROR_MESSAGE, NETWORK_ERROR_MESSAGE};
    use crate::api::retry::MockSleeper;
    use crate::test_utils::{RecordingSleeper, test_client, unreachable_url};
    use mockito::Matcher;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    fn ms(values: &[u64]) -> Vec<Duration> {
        values.iter().map(|v| Duration::from_millis(*v)).collect()
    }

    #[tokio::test]
    async fn test_get_returns_unwrapped_body() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/test")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"foo": "bar"}"#)
            .create_async()
            .await;

        let (client, sleeper) = test_client(&server.url());
        let result: Value = client.get("/test", QueryParams::new()).await.unwrap();

        mock.assert_async().await;
        assert_eq!(result, json!({"foo": "bar"}));
        assert!(sleeper.delays().is_empty());
    }

    #[tokio::test]
    async fn test_every_verb_returns_unwrapped_body() {
        let mut server = mockito::Server::new_async().await;
        let mut mocks = Vec::new();
        for method in ["GET", "POST", "PUT", "DELETE"] {
            mocks.push(
                server
                    .mock(method, "/items/1")
                    .with_status(200)
                    .with_body(r#"{"foo": "bar"}"#)
                    .create_async()
                    .await,
            );
        }

        let (client, _) = test_client(&server.url());
        let expected = json!({"foo": "bar"});

        let got: Value = client.get("/items/1", QueryParams::new()).await.unwrap();
        assert_eq!(got, expected);
        let got: Value = client.post("/items/1", &json!({"a": 1})).await.unwrap();
        assert_eq!(got, expected);
        let got: Value = client.put("/items/1", &json!({"a": 2})).await.unwrap();
        assert_eq!(got, expected);
        let got: Value = client.delete("/items/1").await.unwrap();
        assert_eq!(got, expected);

        for mock in mocks {
            mock.assert_async().await;
        }
    }

    #[tokio::test]
    async fn test_get_sends_query_params() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/telemetry/logs")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("skip".into(), "0".into()),
                Matcher::UrlEncoded("limit".into(), "100".into()),
                Matcher::UrlEncoded("service_name".into(), "payment api".into()),
            ]))
            .with_status(200)
            .with_body(r#"{"total": 0, "skip": 0, "limit": 100, "items": []}"#)
            .create_async()
            .await;

        let (client, _) = test_client(&server.url());
        let query = QueryParams::new()
            .with("skip", 0)
            .with("limit", 100)
            .with_opt("service_name", Some("payment api"));
        let result: Value = client.get("/telemetry/logs", query).await.unwrap();

        mock.assert_async().await;
        assert_eq!(result["limit"], 100);
    }

    #[tokio::test]
    async fn test_post_sends_json_body() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/auth/login")
            .match_header("content-type", "application/json")
            .match_body(Matcher::Json(
                json!({"email": "sre@example.com", "password": "hunter2"}),
            ))
            .with_status(200)
            .with_body(r#"{"access_token": "t"}"#)
            .create_async()
            .await;

        let (client, _) = test_client(&server.url());
        let result: Value = client
            .post(
                "/auth/login",
                &json!({"email": "sre@example.com", "password": "hunter2"}),
            )
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(result["access_token"], "t");
    }

    #[tokio::test]
    async fn test_empty_success_body_decodes_as_null() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/auth/logout")
            .with_status(204)
            .expect(2)
            .create_async()
            .await;

        let (client, _) = test_client(&server.url());
        let result: Value = client.post_empty("/auth/logout").await.unwrap();
        let unit: () = client.post_empty("/auth/logout").await.unwrap();

        mock.assert_async().await;
        assert_eq!(result, Value::Null);
        let () = unit;
    }

    #[tokio::test]
    async fn test_client_errors_are_not_retried() {
        for status in [400, 401, 403, 404, 422] {
            let mut server = mockito::Server::new_async().await;
            let mock = server
                .mock("GET", "/resource")
                .with_status(status)
                .with_body(r#"{"detail": "nope"}"#)
                .expect(1)
                .create_async()
                .await;

            let mut sleeper = MockSleeper::new();
            sleeper.expect_sleep().never();
            let client = ApiClient::with_client(
                Client::new(),
                &server.url(),
                RetryPolicy::default(),
            )
            .with_sleeper(Arc::new(sleeper));

            let err = client
                .get::<Value>("/resource", QueryParams::new())
                .await
                .unwrap_err();

            mock.assert_async().await;
            assert_eq!(err.status, Some(status as u16));
            assert_eq!(err.message, "nope");
            assert_eq!(err.attempts, 1);
            assert!(!err.was_retried());
        }
    }

    #[test_log::test(tokio::test)]
    async fn test_transient_statuses_exhaust_retries() {
        for status in [408, 429, 500, 502, 503] {
            let mut server = mockito::Server::new_async().await;
            let mock = server
                .mock("GET", "/flaky")
                .with_status(status)
                .with_body(r#"{"message": "try later"}"#)
                .expect(4)
                .create_async()
                .await;

            let (client, sleeper) = test_client(&server.url());
            let err = client
                .get::<Value>("/flaky", QueryParams::new())
                .await
                .unwrap_err();

            mock.assert_async().await;
            assert_eq!(err.status, Some(status as u16));
            assert_eq!(err.message, "try later");
            assert_eq!(err.attempts, 4);
            assert_eq!(sleeper.delays(), ms(&[1000, 2000, 4000]));
        }
    }

    #[tokio::test]
    async fn test_recovers_after_two_service_unavailable() {
        let mut server = mockito::Server::new_async().await;
        let failing = server
            .mock("GET", "/dashboard/overview/1")
            .with_status(503)
            .expect(2)
            .create_async()
            .await;
        let ok = server
            .mock("GET", "/dashboard/overview/1")
            .with_status(200)
            .with_body(r#"{"data": {"total_services": 12}}"#)
            .expect(1)
            .create_async()
            .await;

        let (client, sleeper) = test_client(&server.url());
        let result: Value = client
            .get("/dashboard/overview/1", QueryParams::new())
            .await
            .unwrap();

        failing.assert_async().await;
        ok.assert_async().await;
        assert_eq!(result, json!({"data": {"total_services": 12}}));
        assert_eq!(sleeper.delays(), ms(&[1000, 2000]));
    }

    #[tokio::test]
    async fn test_network_failure_exhausts_retries() {
        let (client, sleeper) = test_client(&unreachable_url());
        let err = client
            .get::<Value>("/dashboard/services/health", QueryParams::new())
            .await
            .unwrap_err();

        assert_eq!(err.message, NETWORK_ERROR_MESSAGE);
        assert_eq!(err.status, None);
        assert_eq!(err.data, None);
        assert_eq!(err.attempts, 4);
        assert_eq!(sleeper.delays(), ms(&[1000, 2000, 4000]));
    }

    #[tokio::test]
    async fn test_network_failure_on_post_uses_connectivity_message() {
        let (client, _) = test_client(&unreachable_url());
        let err = client
            .post::<Value, _>("/auth/login", &json!({"detail": "not an error body"}))
            .await
            .unwrap_err();

        assert_eq!(err.message, NETWORK_ERROR_MESSAGE);
        assert_eq!(err.data, None);
    }

    /// Answers the first connection with `first` and hangs up on every later
    /// one without responding. Returns the base URL and a connection counter.
    async fn answer_once_then_hang_up(first: String) -> (String, Arc<AtomicUsize>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let url = format!("http://{}", listener.local_addr().unwrap());
        let connections = Arc::new(AtomicUsize::new(0));
        let counter = connections.clone();

        tokio::spawn(async move {
            while let Ok((mut socket, _)) = listener.accept().await {
                if counter.fetch_add(1, Ordering::SeqCst) != 0 {
                    continue;
                }
                let first = first.clone();
                tokio::spawn(async move {
                    let mut buf = [0u8; 4096];
                    let _ = socket.read(&mut buf).await;
                    let _ = socket.write_all(first.as_bytes()).await;
                    let _ = socket.shutdown().await;
                    // Drain until the client hangs up so the close is not a reset.
                    while matches!(socket.read(&mut buf).await, Ok(n) if n > 0) {}
                });
            }
        });

        (url, connections)
    }

    #[tokio::test]
    async fn test_network_failure_after_error_response_uses_connectivity_message() {
        let body = r#"{"detail":"stale"}"#;
        let first = format!(
            "HTTP/1.1 503 Service Unavailable\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
            body.len(),
            body
        );
        let (url, connections) = answer_once_then_hang_up(first).await;

        let (client, sleeper) = test_client(&url);
        let err = client
            .get::<Value>("/dashboard/overview/1", QueryParams::new())
            .await
            .unwrap_err();

        assert_eq!(err.message, NETWORK_ERROR_MESSAGE);
        assert_eq!(err.status, None);
        assert_eq!(err.data, None);
        assert_eq!(err.attempts, 4);
        assert_eq!(connections.load(Ordering::SeqCst), 4);
        assert_eq!(sleeper.delays(), ms(&[1000, 2000, 4000]));
    }

    #[tokio::test]
    async fn test_truncated_client_error_body_is_classified_by_status() {
        let first = "HTTP/1.1 401 Unauthorized\r\nContent-Type: application/json\r\nContent-Length: 100\r\nConnection: close\r\n\r\n{\"detail\""
            .to_string();
        let (url, connections) = answer_once_then_hang_up(first).await;

        let (client, sleeper) = test_client(&url);
        let err = client
            .post::<Value, _>("/auth/login", &json!({"email": "a", "password": "b"}))
            .await
            .unwrap_err();

        assert_eq!(err.status, Some(401));
        assert_eq!(err.message, GENERIC_ERROR_MESSAGE);
        assert_eq!(err.data, None);
        assert_eq!(err.attempts, 1);
        assert_eq!(connections.load(Ordering::SeqCst), 1);
        assert!(sleeper.delays().is_empty());
    }

    #[test_log::test(tokio::test)]
    async fn test_unbounded_retry_cap_logs_without_overflow() {
        let mut server = mockito::Server::new_async().await;
        let failing = server
            .mock("GET", "/x")
            .with_status(503)
            .expect(1)
            .create_async()
            .await;
        let ok = server
            .mock("GET", "/x")
            .with_status(200)
            .with_body("{}")
            .expect(1)
            .create_async()
            .await;

        let sleeper = Arc::new(RecordingSleeper::default());
        let client = ApiClient::with_client(
            Client::new(),
            &server.url(),
            RetryPolicy::new(u32::MAX, Duration::from_millis(1)),
        )
        .with_sleeper(sleeper.clone());

        let result: Value = client.get("/x", QueryParams::new()).await.unwrap();

        failing.assert_async().await;
        ok.assert_async().await;
        assert_eq!(result, json!({}));
        assert_eq!(sleeper.delays(), ms(&[1]));
    }

    #[tokio::test]
    async fn test_zero_retries_fails_on_first_transient_error() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/x")
            .with_status(500)
            .expect(1)
            .create_async()
            .await;

        let sleeper = Arc::new(RecordingSleeper::default());
        let client = ApiClient::with_client(
            Client::new(),
            &server.url(),
            RetryPolicy::new(0, Duration::from_millis(1000)),
        )
        .with_sleeper(sleeper.clone());

        let err = client.get::<Value>("/x", QueryParams::new()).await.unwrap_err();

        mock.assert_async().await;
        assert_eq!(err.attempts, 1);
        assert!(sleeper.delays().is_empty());
    }

    #[tokio::test]
    async fn test_undecodable_body_is_not_retried() {
        #[derive(serde::Deserialize, Debug)]
        #[allow(dead_code)]
        struct Expected {
            count: u32,
        }

        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/stats")
            .with_status(200)
            .with_body("<html>maintenance</html>")
            .expect(1)
            .create_async()
            .await;

        let (client, sleeper) = test_client(&server.url());
        let err = client
            .get::<Expected>("/stats", QueryParams::new())
            .await
            .unwrap_err();

        mock.assert_async().await;
        assert!(err.message.starts_with("Failed to parse response"));
        assert_eq!(err.status, Some(200));
        assert_eq!(
            err.data,
            Some(Value::String("<html>maintenance</html>".to_string()))
        );
        assert!(sleeper.delays().is_empty());
    }

    #[tokio::test]
    async fn test_login_bad_credentials_rejects_immediately() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/auth/login")
            .with_status(401)
            .with_body(r#"{"detail": "Invalid credentials"}"#)
            .expect(1)
            .create_async()
            .await;

        let (client, sleeper) = test_client(&server.url());
        let err = client
            .post::<Value, _>(
                "/auth/login",
                &json!({"email": "sre@example.com", "password": "wrong"}),
            )
            .await
            .unwrap_err();

        mock.assert_async().await;
        assert_eq!(err.message, "Invalid credentials");
        assert_eq!(err.status, Some(401));
        assert_eq!(err.data, Some(json!({"detail": "Invalid credentials"})));
        assert!(sleeper.delays().is_empty());
    }

    #[tokio::test]
    async fn test_cookies_are_forwarded() {
        let mut server = mockito::Server::new_async().await;
        let login = server
            .mock("POST", "/auth/login")
            .with_status(200)
            .with_header("set-cookie", "session=abc123; Path=/")
            .with_body("{}")
            .create_async()
            .await;
        let overview = server
            .mock("GET", "/dashboard/overview/7")
            .match_header("cookie", Matcher::Regex("session=abc123".to_string()))
            .with_status(200)
            .with_body("{}")
            .create_async()
            .await;

        let client = ApiClient::new(&ApiConfig {
            base_url: server.url(),
            ..ApiConfig::default()
        })
        .unwrap();

        let _: Value = client
            .post("/auth/login", &json!({"email": "a", "password": "b"}))
            .await
            .unwrap();
        let _: Value = client
            .get("/dashboard/overview/7", QueryParams::new())
            .await
            .unwrap();

        login.assert_async().await;
        overview.assert_async().await;
    }

    #[test]
    fn test_url_for_joins_base_and_path() {
        let client = ApiClient::with_client(
            Client::new(),
            "http://localhost:8000/api/",
            RetryPolicy::default(),
        );
        assert_eq!(client.base_url(), "http://localhost:8000/api");
        assert_eq!(
            client.url_for("/auth/login"),
            "http://localhost:8000/api/auth/login"
        );
        assert_eq!(
            client.url_for("telemetry/services"),
            "http://localhost:8000/api/telemetry/services"
        );
    }

    #[test]
    fn test_to_body_rejects_unserializable() {
        let mut map = std::collections::HashMap::new();
        map.insert(vec![1u8], "non-string key");
        let err = to_body(&map).unwrap_err();
        assert!(err.message.contains("serialize"));
        assert_eq!(err.attempts, 0);
    }
}
