//! Client configuration

use crate::error::{PoofError, Result};
use crate::transport::Transport;
use std::sync::Arc;
use std::time::Duration;

/// Default API base URL
pub const DEFAULT_BASE_URL: &str = "https://api.poof.bg/v1";

/// Default request timeout
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// Configuration for a [`PoofClient`](crate::PoofClient).
///
/// Constructed once through the builder and immutable thereafter.
///
/// # Examples
///
/// ```rust
/// use poof::ClientConfig;
/// use std::time::Duration;
///
/// let config = ClientConfig::builder("your-api-key")
///     .base_url("https://api.poof.bg/v1")
///     .timeout(Duration::from_secs(30))
///     .build()
///     .unwrap();
/// ```
#[derive(Clone)]
pub struct ClientConfig {
    /// API key used as the opaque bearer credential. Never logged.
    pub api_key: String,
    /// API base URL, without a trailing slash
    pub base_url: String,
    /// Hard timeout applied to each request (connect + read)
    pub timeout: Duration,
    /// Caller-supplied transport. When set, the client borrows it and will
    /// not close it on teardown; when unset, the client builds and owns an
    /// [`HttpTransport`](crate::transport::HttpTransport).
    pub transport: Option<Arc<dyn Transport>>,
}

impl ClientConfig {
    /// Create a new configuration builder with the required API key
    #[must_use]
    pub fn builder<S: Into<String>>(api_key: S) -> ClientConfigBuilder {
        ClientConfigBuilder {
            config: Self {
                api_key: api_key.into(),
                base_url: DEFAULT_BASE_URL.to_string(),
                timeout: DEFAULT_TIMEOUT,
                transport: None,
            },
        }
    }

    /// Validate the configuration.
    ///
    /// # Errors
    /// - Empty API key
    /// - Empty base URL
    pub fn validate(&self) -> Result<()> {
        if self.api_key.is_empty() {
            return Err(PoofError::invalid_config("api_key is required"));
        }
        if self.base_url.is_empty() {
            return Err(PoofError::invalid_config("base_url must not be empty"));
        }
        Ok(())
    }
}

// The API key must never leak through logs or debug output.
impl std::fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientConfig")
            .field("api_key", &"[redacted]")
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .field(
                "transport",
                &self.transport.as_ref().map(|_| "injected"),
            )
            .finish()
    }
}

/// Builder for [`ClientConfig`]
#[derive(Debug)]
pub struct ClientConfigBuilder {
    config: ClientConfig,
}

impl ClientConfigBuilder {
    /// Set the API base URL. A trailing slash is trimmed.
    #[must_use]
    pub fn base_url<S: Into<String>>(mut self, base_url: S) -> Self {
        let mut url = base_url.into();
        while url.ends_with('/') {
            url.pop();
        }
        self.config.base_url = url;
        self
    }

    /// Set the per-request timeout
    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    /// Set the per-request timeout in whole seconds
    #[must_use]
    pub fn timeout_secs(mut self, seconds: u64) -> Self {
        self.config.timeout = Duration::from_secs(seconds);
        self
    }

    /// Supply an external transport. The client borrows it: teardown will
    /// not close a transport provided here.
    #[must_use]
    pub fn transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.config.transport = Some(transport);
        self
    }

    /// Build and validate the configuration.
    ///
    /// # Errors
    /// - Empty API key
    /// - Empty base URL
    pub fn build(self) -> Result<ClientConfig> {
        let config = self.config;
        config.validate()?;
        Ok(config)
    }
}
