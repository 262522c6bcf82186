//! Integration tests for the client pipeline against a mock transport.
//!
//! These exercise the full path: input normalization, multipart assembly,
//! header construction, response decoding, and error surfacing, without
//! touching the network.

use async_trait::async_trait;
use poof::transport::{Method, RequestBody, Transport, TransportRequest, TransportResponse};
use poof::{
    ApiErrorKind, Channels, ClientConfig, OutputFormat, PoofClient, PoofError, RemovalOptions,
};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// What the client actually handed to the transport.
#[derive(Debug, Clone)]
struct RecordedRequest {
    method: Method,
    url: String,
    headers: Vec<(String, String)>,
    form_fields: Vec<(String, String)>,
    file_name: Option<String>,
    file_content_type: Option<String>,
    timeout: Duration,
}

/// Scripted transport: records every request and replays a fixed outcome.
struct MockTransport {
    status: u16,
    headers: Vec<(String, String)>,
    body: Vec<u8>,
    timeout_failure: Option<Duration>,
    requests: Mutex<Vec<RecordedRequest>>,
    close_count: AtomicUsize,
}

impl MockTransport {
    fn respond_with(status: u16, headers: &[(&str, &str)], body: &[u8]) -> Arc<Self> {
        Arc::new(Self {
            status,
            headers: headers
                .iter()
                .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
                .collect(),
            body: body.to_vec(),
            timeout_failure: None,
            requests: Mutex::new(Vec::new()),
            close_count: AtomicUsize::new(0),
        })
    }

    fn time_out_after(timeout: Duration) -> Arc<Self> {
        Arc::new(Self {
            status: 0,
            headers: Vec::new(),
            body: Vec::new(),
            timeout_failure: Some(timeout),
            requests: Mutex::new(Vec::new()),
            close_count: AtomicUsize::new(0),
        })
    }

    fn recorded(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn execute(&self, request: TransportRequest) -> poof::Result<TransportResponse> {
        let (form_fields, file_name, file_content_type) = match &request.body {
            RequestBody::Empty => (Vec::new(), None, None),
            RequestBody::Multipart(multipart) => (
                multipart
                    .fields
                    .iter()
                    .map(|(k, v)| ((*k).to_string(), v.clone()))
                    .collect(),
                Some(multipart.file.filename.clone()),
                Some(multipart.file.content_type.clone()),
            ),
        };
        self.requests.lock().unwrap().push(RecordedRequest {
            method: request.method,
            url: request.url.clone(),
            headers: request
                .headers
                .iter()
                .map(|(k, v)| ((*k).to_string(), v.clone()))
                .collect(),
            form_fields,
            file_name,
            file_content_type,
            timeout: request.timeout,
        });

        if let Some(timeout) = self.timeout_failure {
            return Err(PoofError::Timeout(timeout));
        }
        Ok(TransportResponse::new(
            self.status,
            self.headers.clone(),
            self.body.clone(),
        ))
    }

    fn supports_concurrent_use(&self) -> bool {
        true
    }

    fn close(&self) {
        self.close_count.fetch_add(1, Ordering::SeqCst);
    }
}

fn client_with(transport: Arc<MockTransport>) -> PoofClient {
    let config = ClientConfig::builder("test-key")
        .base_url("https://api.test/v1")
        .timeout(Duration::from_secs(7))
        .transport(transport)
        .build()
        .unwrap();
    PoofClient::new(config).unwrap()
}

fn success_headers() -> Vec<(&'static str, &'static str)> {
    vec![
        ("Content-Type", "image/png"),
        ("X-Image-Width", "800"),
        ("X-Image-Height", "600"),
        ("X-Processing-Time-Ms", "120"),
        ("X-Request-ID", "r1"),
    ]
}

fn header<'a>(request: &'a RecordedRequest, name: &str) -> Option<&'a str> {
    request
        .headers
        .iter()
        .find(|(k, _)| k.eq_ignore_ascii_case(name))
        .map(|(_, v)| v.as_str())
}

#[tokio::test]
async fn remove_background_sends_expected_request() {
    let transport = MockTransport::respond_with(200, &success_headers(), b"processed");
    let client = client_with(transport.clone());

    let options = RemovalOptions::builder()
        .format(OutputFormat::WebP)
        .channels(Channels::Rgb)
        .bg_color("#ffffff")
        .crop(true)
        .build();
    let result = client
        .remove_background(b"raw image".as_slice(), &options)
        .await
        .unwrap();

    assert_eq!(result.data, b"processed");
    assert_eq!(result.width, 800);
    assert_eq!(result.height, 600);
    assert_eq!(result.processing_time_ms, 120);
    assert_eq!(result.request_id, "r1");
    assert_eq!(result.content_type, "image/png");

    let requests = transport.recorded();
    assert_eq!(requests.len(), 1);
    let request = requests.first().unwrap();
    assert_eq!(request.method, Method::Post);
    assert_eq!(request.url, "https://api.test/v1/remove-background");
    assert_eq!(request.timeout, Duration::from_secs(7));
    assert_eq!(header(request, "x-api-key"), Some("test-key"));
    assert!(header(request, "User-Agent").unwrap().starts_with("poof-rust/"));
    assert_eq!(
        request.form_fields,
        vec![
            ("format".to_string(), "webp".to_string()),
            ("channels".to_string(), "rgb".to_string()),
            ("bg_color".to_string(), "#ffffff".to_string()),
            ("crop".to_string(), "true".to_string()),
        ]
    );
    // Byte input has no filename or extension to go on.
    assert_eq!(request.file_name.as_deref(), Some("image"));
    assert_eq!(
        request.file_content_type.as_deref(),
        Some("application/octet-stream")
    );
}

#[tokio::test]
async fn remove_background_with_default_options_sends_no_fields() {
    let transport = MockTransport::respond_with(200, &success_headers(), b"out");
    let client = client_with(transport.clone());

    client
        .remove_background(vec![1u8, 2, 3], &RemovalOptions::default())
        .await
        .unwrap();

    let requests = transport.recorded();
    assert!(requests.first().unwrap().form_fields.is_empty());
}

#[tokio::test]
async fn account_info_round_trip() {
    let transport = MockTransport::respond_with(
        200,
        &[("Content-Type", "application/json")],
        br#"{"organizationId": "org_1", "plan": "pro", "maxCredits": 500, "usedCredits": 42.5}"#,
    );
    let client = client_with(transport.clone());

    let info = client.account_info().await.unwrap();
    assert_eq!(info.organization_id, "org_1");
    assert_eq!(info.plan, "pro");
    assert!((info.max_credits - 500.0).abs() < f64::EPSILON);
    assert!((info.used_credits - 42.5).abs() < f64::EPSILON);
    assert_eq!(info.auto_recharge_threshold, None);

    let requests = transport.recorded();
    let request = requests.first().unwrap();
    assert_eq!(request.method, Method::Get);
    assert_eq!(request.url, "https://api.test/v1/me");
    assert!(request.form_fields.is_empty());
    assert_eq!(request.file_name, None);
    assert_eq!(header(request, "x-api-key"), Some("test-key"));
}

#[tokio::test]
async fn auth_failure_surfaces_typed_error() {
    let transport = MockTransport::respond_with(
        401,
        &[],
        br#"{"message": "bad key", "code": "auth_failed", "request_id": "r2"}"#,
    );
    let client = client_with(transport);

    let err = client
        .remove_background(vec![0u8], &RemovalOptions::default())
        .await
        .unwrap_err();
    let api = err.as_api_error().expect("expected API error");
    assert_eq!(api.kind, ApiErrorKind::Auth);
    assert_eq!(api.message, "bad key");
    assert_eq!(api.code.as_deref(), Some("auth_failed"));
    assert_eq!(api.request_id.as_deref(), Some("r2"));
    assert_eq!(api.status_code, 401);
}

#[tokio::test]
async fn rate_limit_applies_to_account_calls_too() {
    let transport =
        MockTransport::respond_with(429, &[], br#"{"message": "slow down", "code": "rate_limited"}"#);
    let client = client_with(transport);

    let err = client.account_info().await.unwrap_err();
    assert_eq!(err.as_api_error().unwrap().kind, ApiErrorKind::RateLimit);
}

#[tokio::test]
async fn timeout_surfaces_as_transport_kind_never_api() {
    let transport = MockTransport::time_out_after(Duration::from_secs(7));
    let client = client_with(transport);

    let err = client
        .remove_background(vec![0u8], &RemovalOptions::default())
        .await
        .unwrap_err();
    assert!(matches!(err, PoofError::Timeout(_)));
    assert!(err.as_api_error().is_none());
}

#[tokio::test]
async fn injected_transport_survives_client_close() {
    let transport = MockTransport::respond_with(200, &success_headers(), b"out");
    let client = client_with(transport.clone());

    client.close();
    drop(client);
    assert_eq!(transport.close_count.load(Ordering::SeqCst), 0);

    // Still usable by a second client after the first is gone.
    let client = client_with(transport.clone());
    client
        .remove_background(vec![9u8], &RemovalOptions::default())
        .await
        .unwrap();
}

#[tokio::test]
async fn concurrent_use_reflects_transport_declaration() {
    let transport = MockTransport::respond_with(200, &success_headers(), b"out");
    let client = client_with(transport);
    assert!(client.supports_concurrent_use());
}
