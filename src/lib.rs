#![allow(clippy::missing_errors_doc)]
#![allow(clippy::uninlined_format_args)]

//! # Poof Rust SDK
//!
//! Rust client for the [Poof](https://poof.bg) background removal API:
//! upload an image, get back the processed image bytes plus metadata.
//!
//! ## Features
//!
//! - **Flexible input**: file paths, byte buffers, or async readers,
//!   normalized through one [`ImageSource`] union
//! - **Typed options**: format, channels, background color, size preset,
//!   crop — unset options fall back to server defaults
//! - **Typed errors**: transport, decode, and API failures are distinct;
//!   API rejections carry a status-derived [`ApiErrorKind`] for
//!   programmatic branching
//! - **Injectable transport**: the HTTP seam is a trait, so tests and
//!   embedders can swap the network layer
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use poof::{ClientConfig, PoofClient, RemovalOptions};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), poof::PoofError> {
//!     let config = ClientConfig::builder("your-api-key").build()?;
//!     let client = PoofClient::new(config)?;
//!
//!     let result = client
//!         .remove_background("photo.jpg", &RemovalOptions::default())
//!         .await?;
//!     result.save("output.png")?;
//!     Ok(())
//! }
//! ```
//!
//! ## Error Handling
//!
//! ```rust,no_run
//! use poof::{ApiErrorKind, PoofError};
//!
//! # async fn example(client: &poof::PoofClient) {
//! match client.account_info().await {
//!     Ok(info) => println!("{} credits left", info.max_credits - info.used_credits),
//!     Err(PoofError::Api(err)) if err.kind == ApiErrorKind::Auth => {
//!         eprintln!("check your API key (request {:?})", err.request_id);
//!     },
//!     Err(PoofError::Timeout(elapsed)) => eprintln!("timed out after {elapsed:?}"),
//!     Err(err) => eprintln!("{err}"),
//! }
//! # }
//! ```
//!
//! Retries are deliberately left to the caller: no request is ever retried
//! inside the SDK.

mod client;
mod config;
mod decode;
mod error;
mod input;
mod request;
pub mod transport;
mod types;

pub use client::PoofClient;
pub use config::{ClientConfig, ClientConfigBuilder, DEFAULT_BASE_URL, DEFAULT_TIMEOUT};
pub use error::{ApiError, ApiErrorKind, PoofError, Result};
pub use input::{ImageSource, UploadUnit};
pub use request::{
    Channels, FilePart, MultipartRequest, OutputFormat, OutputSize, RemovalOptions,
    RemovalOptionsBuilder,
};
pub use transport::{HttpTransport, Transport};
pub use types::{AccountInfo, RemoveBackgroundResult};
