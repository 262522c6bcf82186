//! HTTP transport seam
//!
//! [`Transport`] is the narrow interface between the client and the
//! network: send one request, receive status + headers + body. The default
//! [`HttpTransport`] wraps a [`reqwest::Client`]; tests and embedders can
//! inject their own implementation through
//! [`ClientConfigBuilder::transport`](crate::ClientConfigBuilder::transport).
//!
//! Transport failures (connection, DNS, TLS, timeout) surface as
//! [`PoofError::Transport`] / [`PoofError::Timeout`], never as API errors.
//! No retries happen at this layer.

use crate::error::{PoofError, Result};
use crate::request::MultipartRequest;
use async_trait::async_trait;
use std::collections::HashMap;
use std::time::Duration;

/// HTTP method of a transport request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    /// GET request
    Get,
    /// POST request
    Post,
}

impl std::fmt::Display for Method {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Get => write!(f, "GET"),
            Self::Post => write!(f, "POST"),
        }
    }
}

/// Body of a transport request
#[derive(Debug)]
pub enum RequestBody {
    /// No request body
    Empty,
    /// Multipart form upload
    Multipart(MultipartRequest),
}

/// A single HTTP request handed to the transport
#[derive(Debug)]
pub struct TransportRequest {
    /// HTTP method
    pub method: Method,
    /// Absolute request URL
    pub url: String,
    /// Request headers (credential included)
    pub headers: Vec<(&'static str, String)>,
    /// Request body
    pub body: RequestBody,
    /// Hard timeout covering connect and read of this single request
    pub timeout: Duration,
}

/// Raw response returned by a transport: status, headers, body bytes.
#[derive(Debug, Clone)]
pub struct TransportResponse {
    /// HTTP status code
    pub status: u16,
    /// Response body bytes
    pub body: Vec<u8>,
    headers: HashMap<String, String>,
}

impl TransportResponse {
    /// Build a response from raw parts. Header names are matched
    /// case-insensitively on lookup.
    pub fn new<I, K, V>(status: u16, headers: I, body: Vec<u8>) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let headers = headers
            .into_iter()
            .map(|(k, v)| (k.as_ref().to_ascii_lowercase(), v.into()))
            .collect();
        Self {
            status,
            body,
            headers,
        }
    }

    /// Look up a header value by name, case-insensitively
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_ascii_lowercase())
            .map(String::as_str)
    }

    /// Whether the status code is in the 2xx range
    #[must_use]
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Narrow seam over an HTTP client.
///
/// Implementations must not retry: retry policy belongs to the caller.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Perform one HTTP request and return the raw response.
    ///
    /// # Errors
    /// - `PoofError::Timeout` when the request timeout elapses
    /// - `PoofError::Transport` for connection, DNS, TLS, or protocol
    ///   failures
    async fn execute(&self, request: TransportRequest) -> Result<TransportResponse>;

    /// Whether this transport may be used from concurrent call sites.
    fn supports_concurrent_use(&self) -> bool;

    /// Release underlying resources. Called at most once by an owning
    /// client; default is a no-op.
    fn close(&self) {}
}

/// Default transport backed by a [`reqwest::Client`].
///
/// The connection pool is released when the last clone of the inner client
/// is dropped; `close` needs no extra work here.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    /// Create a transport with a fresh HTTP client.
    ///
    /// Timeouts are applied per request from [`TransportRequest::timeout`],
    /// not on the client itself.
    ///
    /// # Errors
    /// - `PoofError::Transport` if the TLS backend cannot be initialized
    pub fn new() -> Result<Self> {
        let client = reqwest::Client::builder()
            .build()
            .map_err(|e| PoofError::transport(format!("failed to create HTTP client: {e}")))?;
        Ok(Self { client })
    }

    /// Wrap an existing [`reqwest::Client`], reusing its pool and TLS setup.
    #[must_use]
    pub fn from_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn execute(&self, request: TransportRequest) -> Result<TransportResponse> {
        let timeout = request.timeout;
        let mut builder = match request.method {
            Method::Get => self.client.get(&request.url),
            Method::Post => self.client.post(&request.url),
        };
        builder = builder.timeout(timeout);
        for (name, value) in &request.headers {
            builder = builder.header(*name, value.as_str());
        }
        if let RequestBody::Multipart(multipart) = request.body {
            builder = builder.multipart(to_reqwest_form(multipart)?);
        }

        tracing::debug!(method = %request.method, url = %request.url, "sending request");
        let response = builder
            .send()
            .await
            .map_err(|e| map_reqwest_error(&e, timeout))?;

        let status = response.status().as_u16();
        let headers: Vec<(String, String)> = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|v| (name.as_str().to_string(), v.to_string()))
            })
            .collect();
        let body = response
            .bytes()
            .await
            .map_err(|e| map_reqwest_error(&e, timeout))?
            .to_vec();

        tracing::debug!(status, bytes = body.len(), "received response");
        Ok(TransportResponse::new(status, headers, body))
    }

    fn supports_concurrent_use(&self) -> bool {
        // reqwest::Client is an internally pooled handle, safe to share.
        true
    }
}

fn to_reqwest_form(multipart: MultipartRequest) -> Result<reqwest::multipart::Form> {
    let mut form = reqwest::multipart::Form::new();
    for (name, value) in multipart.fields {
        form = form.text(name, value);
    }
    let part = reqwest::multipart::Part::bytes(multipart.file.bytes)
        .file_name(multipart.file.filename)
        .mime_str(&multipart.file.content_type)
        .map_err(|e| PoofError::transport(format!("invalid file part MIME type: {e}")))?;
    Ok(form.part(multipart.file.field_name, part))
}

fn map_reqwest_error(error: &reqwest::Error, timeout: Duration) -> PoofError {
    if error.is_timeout() {
        PoofError::Timeout(timeout)
    } else {
        PoofError::Transport(error.to_string())
    }
}
