//! Result and account types returned by the Poof API

use crate::error::{PoofError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Result of a background removal operation.
///
/// Immutable once constructed: the processed image bytes plus the metadata
/// carried in the response headers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoveBackgroundResult {
    /// The processed image bytes
    pub data: Vec<u8>,
    /// MIME type of the image (e.g. `image/png`)
    pub content_type: String,
    /// Output image width in pixels
    pub width: u32,
    /// Output image height in pixels
    pub height: u32,
    /// Server-side processing time in milliseconds
    pub processing_time_ms: u64,
    /// Unique request identifier for support
    pub request_id: String,
}

impl RemoveBackgroundResult {
    /// Write the processed image bytes to a file.
    ///
    /// # Errors
    /// - `PoofError::Io` if the file cannot be written
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        std::fs::write(path.as_ref(), &self.data)
            .map_err(|e| PoofError::file_io_error("save result image", path.as_ref(), e))
    }

    /// Size of the image data in bytes
    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Whether the image data is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// Account information returned by the `/me` endpoint.
///
/// A read-only snapshot; nothing is cached across calls.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountInfo {
    /// Organization the API key belongs to
    pub organization_id: String,
    /// Subscription plan name
    pub plan: String,
    /// Credit allowance for the current billing cycle
    pub max_credits: f64,
    /// Credits consumed in the current billing cycle
    pub used_credits: f64,
    /// Auto-recharge trigger threshold, when configured
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auto_recharge_threshold: Option<f64>,
}
