//! Request options and multipart serialization
//!
//! Options the caller leaves unset are omitted from the form entirely, so
//! the server applies its own defaults (png, rgba, full size, no crop).
//! A set option is always transmitted verbatim; in particular `bg_color`
//! is never validated or dropped locally, even alongside `channels=rgba` —
//! validation authority for it lives server-side.

use crate::input::UploadUnit;
use serde::{Deserialize, Serialize};

/// Multipart field name for the uploaded image.
const IMAGE_FIELD: &str = "image_file";

/// MIME type sent when the input carried no recognizable extension.
const OCTET_STREAM: &str = "application/octet-stream";

/// Output image format (server default: png)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OutputFormat {
    /// PNG with alpha channel transparency
    Png,
    /// JPEG (no transparency)
    Jpg,
    /// WebP with alpha channel transparency
    WebP,
}

impl OutputFormat {
    pub(crate) fn as_str(self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Jpg => "jpg",
            Self::WebP => "webp",
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Output color channels (server default: rgba)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Channels {
    /// RGBA with transparency
    Rgba,
    /// Opaque RGB, composited over `bg_color`
    Rgb,
}

impl Channels {
    pub(crate) fn as_str(self) -> &'static str {
        match self {
            Self::Rgba => "rgba",
            Self::Rgb => "rgb",
        }
    }
}

impl std::fmt::Display for Channels {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Output size preset (server default: full)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OutputSize {
    /// Full resolution
    Full,
    /// Low-resolution preview
    Preview,
    /// Small preset
    Small,
    /// Medium preset
    Medium,
    /// Large preset
    Large,
}

impl OutputSize {
    pub(crate) fn as_str(self) -> &'static str {
        match self {
            Self::Full => "full",
            Self::Preview => "preview",
            Self::Small => "small",
            Self::Medium => "medium",
            Self::Large => "large",
        }
    }
}

impl std::fmt::Display for OutputSize {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Options for a background removal request.
///
/// # Examples
///
/// ```rust
/// use poof::{Channels, OutputFormat, RemovalOptions};
///
/// let options = RemovalOptions::builder()
///     .format(OutputFormat::WebP)
///     .channels(Channels::Rgb)
///     .bg_color("#ffffff")
///     .crop(true)
///     .build();
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RemovalOptions {
    /// Output format
    pub format: Option<OutputFormat>,
    /// Output color channels
    pub channels: Option<Channels>,
    /// Background color used when `channels` is [`Channels::Rgb`]; hex
    /// (`#ffffff`), `rgb(...)`, or a color name. Sent as-is.
    pub bg_color: Option<String>,
    /// Output size preset
    pub size: Option<OutputSize>,
    /// Crop the output to the subject bounds
    pub crop: Option<bool>,
}

impl RemovalOptions {
    /// Create a new options builder for fluent construction
    #[must_use]
    pub fn builder() -> RemovalOptionsBuilder {
        RemovalOptionsBuilder::default()
    }

    /// Serialize the set options as an ordered form field list.
    ///
    /// Deterministic: identical options always produce the identical field
    /// sequence. Unset options do not appear.
    pub(crate) fn form_fields(&self) -> Vec<(&'static str, String)> {
        let mut fields = Vec::new();
        if let Some(format) = self.format {
            fields.push(("format", format.as_str().to_string()));
        }
        if let Some(channels) = self.channels {
            fields.push(("channels", channels.as_str().to_string()));
        }
        if let Some(bg_color) = &self.bg_color {
            fields.push(("bg_color", bg_color.clone()));
        }
        if let Some(size) = self.size {
            fields.push(("size", size.as_str().to_string()));
        }
        if let Some(crop) = self.crop {
            fields.push(("crop", crop.to_string()));
        }
        fields
    }
}

/// Builder for [`RemovalOptions`]
#[derive(Debug, Default)]
pub struct RemovalOptionsBuilder {
    options: RemovalOptions,
}

impl RemovalOptionsBuilder {
    /// Set the output format
    #[must_use]
    pub fn format(mut self, format: OutputFormat) -> Self {
        self.options.format = Some(format);
        self
    }

    /// Set the output color channels
    #[must_use]
    pub fn channels(mut self, channels: Channels) -> Self {
        self.options.channels = Some(channels);
        self
    }

    /// Set the background color for [`Channels::Rgb`] output
    #[must_use]
    pub fn bg_color<S: Into<String>>(mut self, color: S) -> Self {
        self.options.bg_color = Some(color.into());
        self
    }

    /// Set the output size preset
    #[must_use]
    pub fn size(mut self, size: OutputSize) -> Self {
        self.options.size = Some(size);
        self
    }

    /// Enable or disable cropping to the subject bounds
    #[must_use]
    pub fn crop(mut self, crop: bool) -> Self {
        self.options.crop = Some(crop);
        self
    }

    /// Build the options. Structural validity is carried by the enum types,
    /// so construction cannot fail.
    #[must_use]
    pub fn build(self) -> RemovalOptions {
        self.options
    }
}

/// The file part of a multipart request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilePart {
    /// Multipart field name
    pub field_name: &'static str,
    /// Filename transmitted with the part
    pub filename: String,
    /// Raw file bytes
    pub bytes: Vec<u8>,
    /// MIME type of the part
    pub content_type: String,
}

/// Transport-ready multipart request descriptor: the ordered form fields
/// plus the image file part.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MultipartRequest {
    /// Ordered scalar form fields
    pub fields: Vec<(&'static str, String)>,
    /// The image file part
    pub file: FilePart,
}

/// Assemble the multipart descriptor for a background removal call.
pub(crate) fn build_removal_request(
    unit: UploadUnit,
    options: &RemovalOptions,
) -> MultipartRequest {
    MultipartRequest {
        fields: options.form_fields(),
        file: FilePart {
            field_name: IMAGE_FIELD,
            filename: unit.filename,
            bytes: unit.bytes,
            content_type: unit.mime_hint.unwrap_or_else(|| OCTET_STREAM.to_string()),
        },
    }
}
