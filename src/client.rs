//! The Poof API client

use crate::config::ClientConfig;
use crate::decode;
use crate::error::Result;
use crate::input::ImageSource;
use crate::request::{self, RemovalOptions};
use crate::transport::{HttpTransport, Method, RequestBody, Transport, TransportRequest};
use crate::types::{AccountInfo, RemoveBackgroundResult};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Client for the Poof background removal API.
///
/// The client holds only immutable configuration and a transport handle,
/// so it can serve concurrent calls from independent call sites as long as
/// [`supports_concurrent_use`](Self::supports_concurrent_use) holds (true
/// for the default transport).
///
/// Teardown: [`close`](Self::close) (or `Drop`) releases the transport
/// exactly once when the client built it, and never when the caller
/// supplied one through
/// [`ClientConfigBuilder::transport`](crate::ClientConfigBuilder::transport).
/// Closing while a request is in flight is the caller's responsibility to
/// avoid.
///
/// # Examples
///
/// ```rust,no_run
/// use poof::{ClientConfig, PoofClient, RemovalOptions};
///
/// # async fn example() -> Result<(), poof::PoofError> {
/// let config = ClientConfig::builder("your-api-key").build()?;
/// let client = PoofClient::new(config)?;
///
/// let result = client
///     .remove_background("photo.jpg", &RemovalOptions::default())
///     .await?;
/// result.save("output.png")?;
///
/// let info = client.account_info().await?;
/// println!("used {} of {} credits", info.used_credits, info.max_credits);
/// # Ok(())
/// # }
/// ```
pub struct PoofClient {
    config: ClientConfig,
    transport: Arc<dyn Transport>,
    owns_transport: bool,
    closed: AtomicBool,
}

impl PoofClient {
    /// Create a client from a validated configuration.
    ///
    /// Without an injected transport, the client builds its own
    /// [`HttpTransport`] and owns its lifecycle.
    ///
    /// # Errors
    /// - Invalid configuration (empty API key or base URL)
    /// - Transport initialization failure
    pub fn new(config: ClientConfig) -> Result<Self> {
        config.validate()?;
        let (transport, owns_transport): (Arc<dyn Transport>, bool) = match &config.transport {
            Some(injected) => (Arc::clone(injected), false),
            None => (Arc::new(HttpTransport::new()?), true),
        };
        Ok(Self::from_parts(config, transport, owns_transport))
    }

    /// Assemble a client from explicit parts. The ownership flag decides
    /// whether teardown closes the transport.
    pub(crate) fn from_parts(
        config: ClientConfig,
        transport: Arc<dyn Transport>,
        owns_transport: bool,
    ) -> Self {
        Self {
            config,
            transport,
            owns_transport,
            closed: AtomicBool::new(false),
        }
    }

    /// Remove the background from an image.
    ///
    /// `image` may be a file path (`&str`, `&Path`, `PathBuf`), a byte
    /// buffer, or an [`ImageSource::reader`] stream.
    ///
    /// # Errors
    /// - `PoofError::Io` if a path input is missing or unreadable
    /// - `PoofError::Transport` / `PoofError::Timeout` for network failures
    /// - `PoofError::Api` when the service rejects the request (bad key,
    ///   insufficient credits, rate limit, validation)
    /// - `PoofError::Decode` if a success response is malformed
    ///
    /// # Examples
    ///
    /// ```rust,no_run
    /// # use poof::{PoofClient, OutputFormat, RemovalOptions};
    /// # async fn example(client: &PoofClient) -> Result<(), poof::PoofError> {
    /// let options = RemovalOptions::builder()
    ///     .format(OutputFormat::WebP)
    ///     .crop(true)
    ///     .build();
    /// let result = client.remove_background("photo.jpg", &options).await?;
    /// result.save("output.webp")?;
    /// # Ok(())
    /// # }
    /// ```
    pub async fn remove_background(
        &self,
        image: impl Into<ImageSource>,
        options: &RemovalOptions,
    ) -> Result<RemoveBackgroundResult> {
        let unit = image.into().into_upload_unit().await?;
        tracing::debug!(
            filename = %unit.filename,
            bytes = unit.bytes.len(),
            "uploading image for background removal"
        );
        let multipart = request::build_removal_request(unit, options);
        let response = self
            .transport
            .execute(TransportRequest {
                method: Method::Post,
                url: format!("{}/remove-background", self.config.base_url),
                headers: self.default_headers(),
                body: RequestBody::Multipart(multipart),
                timeout: self.config.timeout,
            })
            .await?;
        decode::decode_removal(response)
    }

    /// Fetch account information for the authenticated key: plan details
    /// and credit usage. No caching across calls.
    ///
    /// # Errors
    /// - `PoofError::Transport` / `PoofError::Timeout` for network failures
    /// - `PoofError::Api` when the service rejects the request
    /// - `PoofError::Decode` if a success response is malformed
    pub async fn account_info(&self) -> Result<AccountInfo> {
        let response = self
            .transport
            .execute(TransportRequest {
                method: Method::Get,
                url: format!("{}/me", self.config.base_url),
                headers: self.default_headers(),
                body: RequestBody::Empty,
                timeout: self.config.timeout,
            })
            .await?;
        decode::decode_account(&response)
    }

    /// Whether this client may be used from concurrent call sites,
    /// as declared by its transport.
    #[must_use]
    pub fn supports_concurrent_use(&self) -> bool {
        self.transport.supports_concurrent_use()
    }

    /// The client configuration
    #[must_use]
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Release the transport if this client owns it.
    ///
    /// Idempotent: the transport is closed at most once, whether through
    /// explicit calls or `Drop`. A caller-supplied transport is never
    /// closed here.
    pub fn close(&self) {
        if self.owns_transport && !self.closed.swap(true, Ordering::SeqCst) {
            tracing::debug!("closing owned transport");
            self.transport.close();
        }
    }

    fn default_headers(&self) -> Vec<(&'static str, String)> {
        vec![
            ("x-api-key", self.config.api_key.clone()),
            (
                "User-Agent",
                format!("poof-rust/{}", env!("CARGO_PKG_VERSION")),
            ),
        ]
    }
}

impl Drop for PoofClient {
    fn drop(&mut self) {
        self.close();
    }
}

impl std::fmt::Debug for PoofClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PoofClient")
            .field("config", &self.config)
            .field("owns_transport", &self.owns_transport)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::TransportResponse;
    use async_trait::async_trait;
    use std::sync::atomic::AtomicUsize;

    struct CountingTransport {
        close_count: AtomicUsize,
    }

    impl CountingTransport {
        fn new() -> Arc<Self> {
            Arc::new(Self {
                close_count: AtomicUsize::new(0),
            })
        }
    }

    #[async_trait]
    impl Transport for CountingTransport {
        async fn execute(&self, _request: TransportRequest) -> Result<TransportResponse> {
            Ok(TransportResponse::new(
                200,
                Vec::<(&str, String)>::new(),
                Vec::new(),
            ))
        }

        fn supports_concurrent_use(&self) -> bool {
            true
        }

        fn close(&self) {
            self.close_count.fetch_add(1, Ordering::SeqCst);
        }
    }

    fn config() -> ClientConfig {
        ClientConfig::builder("test-key").build().unwrap()
    }

    #[test]
    fn test_owned_transport_closed_exactly_once() {
        let transport = CountingTransport::new();
        let client = PoofClient::from_parts(config(), transport.clone(), true);
        client.close();
        client.close();
        drop(client);
        assert_eq!(transport.close_count.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_owned_transport_closed_on_drop() {
        let transport = CountingTransport::new();
        let client = PoofClient::from_parts(config(), transport.clone(), true);
        drop(client);
        assert_eq!(transport.close_count.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_borrowed_transport_never_closed() {
        let transport = CountingTransport::new();
        let client = PoofClient::from_parts(config(), transport.clone(), false);
        client.close();
        drop(client);
        assert_eq!(transport.close_count.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_injected_transport_is_borrowed() {
        let transport = CountingTransport::new();
        let config = ClientConfig::builder("test-key")
            .transport(transport.clone())
            .build()
            .unwrap();
        let client = PoofClient::new(config).unwrap();
        drop(client);
        assert_eq!(transport.close_count.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_debug_does_not_leak_api_key() {
        let transport = CountingTransport::new();
        let client = PoofClient::from_parts(
            ClientConfig::builder("super-secret").build().unwrap(),
            transport,
            false,
        );
        assert!(!format!("{client:?}").contains("super-secret"));
    }
}
