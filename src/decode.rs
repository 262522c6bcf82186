//! Response decoding and API error mapping
//!
//! This is the single boundary where HTTP-level outcomes become typed
//! results or typed errors. Success metadata header names mirror the
//! service's documented wire contract verbatim.

use crate::error::{ApiError, ApiErrorKind, PoofError, Result};
use crate::transport::TransportResponse;
use crate::types::{AccountInfo, RemoveBackgroundResult};
use serde::Deserialize;
use std::str::FromStr;

const HEADER_WIDTH: &str = "X-Image-Width";
const HEADER_HEIGHT: &str = "X-Image-Height";
const HEADER_PROCESSING_TIME: &str = "X-Processing-Time-Ms";
const HEADER_REQUEST_ID: &str = "X-Request-ID";

/// Structured error body returned by the API for non-2xx responses.
#[derive(Debug, Deserialize)]
struct ErrorPayload {
    message: Option<String>,
    code: Option<String>,
    details: Option<serde_json::Value>,
    request_id: Option<String>,
}

/// Decode a `remove-background` response into a result or a typed error.
pub(crate) fn decode_removal(response: TransportResponse) -> Result<RemoveBackgroundResult> {
    if !response.is_success() {
        return Err(decode_api_error(&response));
    }

    let content_type = response
        .header("Content-Type")
        .unwrap_or("application/octet-stream")
        .to_string();
    let width = required_numeric_header(&response, HEADER_WIDTH)?;
    let height = required_numeric_header(&response, HEADER_HEIGHT)?;
    let processing_time_ms = required_numeric_header(&response, HEADER_PROCESSING_TIME)?;
    let request_id = response
        .header(HEADER_REQUEST_ID)
        .ok_or_else(|| PoofError::decode(format!("missing {HEADER_REQUEST_ID} header")))?
        .to_string();

    Ok(RemoveBackgroundResult {
        data: response.body,
        content_type,
        width,
        height,
        processing_time_ms,
        request_id,
    })
}

/// Decode a `/me` response into account info or a typed error.
pub(crate) fn decode_account(response: &TransportResponse) -> Result<AccountInfo> {
    if !response.is_success() {
        return Err(decode_api_error(response));
    }
    serde_json::from_slice(&response.body)
        .map_err(|e| PoofError::decode(format!("invalid account payload: {e}")))
}

/// Map a non-2xx response to a typed [`ApiError`].
///
/// A malformed error body still produces a typed error: the status code
/// selects the kind, the raw body text (or `HTTP <status>`) becomes the
/// message, and the request id is recovered from the response header.
pub(crate) fn decode_api_error(response: &TransportResponse) -> PoofError {
    let status = response.status;
    let kind = ApiErrorKind::from_status(status);

    let error = match serde_json::from_slice::<ErrorPayload>(&response.body) {
        Ok(payload) => ApiError {
            kind,
            message: payload.message.unwrap_or_else(|| "Unknown error".to_string()),
            code: payload.code.or_else(|| Some("unknown_error".to_string())),
            details: payload.details,
            request_id: payload.request_id,
            status_code: status,
        },
        Err(_) => {
            let text = String::from_utf8_lossy(&response.body).trim().to_string();
            let message = if text.is_empty() {
                format!("HTTP {status}")
            } else {
                text
            };
            ApiError {
                kind,
                message,
                code: Some("unknown_error".to_string()),
                details: None,
                request_id: response.header(HEADER_REQUEST_ID).map(str::to_string),
                status_code: status,
            }
        },
    };

    PoofError::Api(error)
}

fn required_numeric_header<T>(response: &TransportResponse, name: &str) -> Result<T>
where
    T: FromStr,
{
    let value = response
        .header(name)
        .ok_or_else(|| PoofError::decode(format!("missing {name} header")))?;
    value
        .parse()
        .map_err(|_| PoofError::decode(format!("non-numeric {name} header: '{value}'")))
}
