//! Image input normalization
//!
//! The API accepts an image from a filesystem path, an in-memory byte
//! buffer, or any async reader. [`ImageSource`] is the tagged union over
//! those input kinds; normalization produces a single [`UploadUnit`] ready
//! for multipart transmission.

use crate::error::{PoofError, Result};
use std::path::{Path, PathBuf};
use tokio::io::{AsyncRead, AsyncReadExt};

/// Synthesized filename when the input carries none.
const FALLBACK_FILENAME: &str = "image";

/// Normalized upload payload: the image bytes plus the filename and MIME
/// hint sent with the multipart file part. Consumed once per request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadUnit {
    /// Raw image bytes
    pub bytes: Vec<u8>,
    /// Filename transmitted with the file part
    pub filename: String,
    /// MIME type guessed from the filename extension, if recognized
    pub mime_hint: Option<String>,
}

/// An image input accepted by [`remove_background`](crate::PoofClient::remove_background).
///
/// Construct it through the `From` conversions for paths and byte buffers,
/// or [`ImageSource::reader`] / [`ImageSource::reader_named`] for streams.
pub enum ImageSource {
    /// Read the image from a filesystem path
    Path(PathBuf),
    /// Use an in-memory byte buffer verbatim
    Bytes(Vec<u8>),
    /// Read to exhaustion from an async reader. The reader is consumed from
    /// its current position and is never closed by the client.
    Reader {
        /// Source to read from
        reader: Box<dyn AsyncRead + Send + Unpin>,
        /// Optional filename associated with the reader
        name: Option<String>,
    },
}

impl ImageSource {
    /// Wrap an async reader with no associated filename
    pub fn reader<R: AsyncRead + Send + Unpin + 'static>(reader: R) -> Self {
        Self::Reader {
            reader: Box::new(reader),
            name: None,
        }
    }

    /// Wrap an async reader with an associated filename (used for the
    /// multipart file part and MIME guessing)
    pub fn reader_named<R, S>(reader: R, name: S) -> Self
    where
        R: AsyncRead + Send + Unpin + 'static,
        S: Into<String>,
    {
        Self::Reader {
            reader: Box::new(reader),
            name: Some(name.into()),
        }
    }

    /// Normalize this input into an [`UploadUnit`].
    ///
    /// # Errors
    /// - `PoofError::Io` if a path input is missing or unreadable, or the
    ///   reader fails mid-stream
    pub(crate) async fn into_upload_unit(self) -> Result<UploadUnit> {
        match self {
            Self::Path(path) => {
                let bytes = tokio::fs::read(&path)
                    .await
                    .map_err(|e| PoofError::file_io_error("read image file", &path, e))?;
                let filename = base_name(&path).unwrap_or(FALLBACK_FILENAME).to_string();
                Ok(UploadUnit {
                    mime_hint: guess_mime(&filename),
                    bytes,
                    filename,
                })
            },
            Self::Bytes(bytes) => Ok(UploadUnit {
                bytes,
                filename: FALLBACK_FILENAME.to_string(),
                mime_hint: None,
            }),
            Self::Reader { mut reader, name } => {
                let mut bytes = Vec::new();
                reader.read_to_end(&mut bytes).await?;
                // Names may arrive as full paths; keep only the base name.
                let filename = name
                    .as_deref()
                    .and_then(|n| base_name(Path::new(n)))
                    .unwrap_or(FALLBACK_FILENAME)
                    .to_string();
                Ok(UploadUnit {
                    mime_hint: guess_mime(&filename),
                    bytes,
                    filename,
                })
            },
        }
    }
}

impl std::fmt::Debug for ImageSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Path(path) => f.debug_tuple("Path").field(path).finish(),
            Self::Bytes(bytes) => f
                .debug_struct("Bytes")
                .field("len", &bytes.len())
                .finish(),
            Self::Reader { name, .. } => f.debug_struct("Reader").field("name", name).finish(),
        }
    }
}

impl From<PathBuf> for ImageSource {
    fn from(path: PathBuf) -> Self {
        Self::Path(path)
    }
}

impl From<&Path> for ImageSource {
    fn from(path: &Path) -> Self {
        Self::Path(path.to_path_buf())
    }
}

impl From<&str> for ImageSource {
    fn from(path: &str) -> Self {
        Self::Path(PathBuf::from(path))
    }
}

impl From<String> for ImageSource {
    fn from(path: String) -> Self {
        Self::Path(PathBuf::from(path))
    }
}

impl From<Vec<u8>> for ImageSource {
    fn from(bytes: Vec<u8>) -> Self {
        Self::Bytes(bytes)
    }
}

impl From<&[u8]> for ImageSource {
    fn from(bytes: &[u8]) -> Self {
        Self::Bytes(bytes.to_vec())
    }
}

fn base_name(path: &Path) -> Option<&str> {
    path.file_name().and_then(|n| n.to_str())
}

/// Guess a MIME type from the filename extension.
///
/// Unrecognized extensions return `None`; the request layer falls back to
/// `application/octet-stream` for the file part.
fn guess_mime(filename: &str) -> Option<String> {
    let extension = Path::new(filename)
        .extension()
        .and_then(|e| e.to_str())?
        .to_ascii_lowercase();
    let mime = match extension.as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "webp" => "image/webp",
        "gif" => "image/gif",
        "bmp" => "image/bmp",
        "tif" | "tiff" => "image/tiff",
        _ => return None,
    };
    Some(mime.to_string())
}
