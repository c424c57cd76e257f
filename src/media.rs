//! # Media Helpers
//!
//! Data URL encoding and image type sniffing, shared by import, export and the
//! upload handlers.
//!
//! ```
//! use template_composer::media::{DataUrl, ImageKind};
//!
//! let url = DataUrl::encode("image/png", b"\x89PNG\r\n\x1a\n....");
//! assert!(url.starts_with("data:image/png;base64,"));
//!
//! let parsed = DataUrl::parse(&url).unwrap();
//! assert_eq!(ImageKind::sniff(&parsed.data), Some(ImageKind::Png));
//! ```

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum MediaError {
    #[error("not a data URL")]
    NotDataUrl,

    #[error("data URL is not base64 encoded")]
    NotBase64,

    #[error("invalid base64 payload: {0}")]
    Decode(String),
}

/// A decoded `data:` URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataUrl {
    pub mime: String,
    pub data: Vec<u8>,
}

impl DataUrl {
    /// Parse `data:<mime>;base64,<payload>`.
    ///
    /// An empty mime reads as `application/octet-stream`. Only base64 payloads
    /// are accepted; images are never percent-encoded in practice.
    pub fn parse(url: &str) -> Result<Self, MediaError> {
        let rest = url.strip_prefix("data:").ok_or(MediaError::NotDataUrl)?;
        let (header, payload) = rest.split_once(',').ok_or(MediaError::NotDataUrl)?;
        let mime = header
            .strip_suffix(";base64")
            .ok_or(MediaError::NotBase64)?;
        let data = STANDARD
            .decode(payload.trim())
            .map_err(|e| MediaError::Decode(e.to_string()))?;
        let mime = if mime.is_empty() {
            "application/octet-stream".to_string()
        } else {
            mime.to_string()
        };
        Ok(Self { mime, data })
    }

    pub fn encode(mime: &str, data: &[u8]) -> String {
        format!("data:{};base64,{}", mime, STANDARD.encode(data))
    }

    pub fn is_data_url(s: &str) -> bool {
        s.starts_with("data:")
    }
}

/// Image formats accepted as backgrounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageKind {
    Jpeg,
    Png,
    Gif,
}

impl ImageKind {
    /// Identify an image by its magic bytes.
    pub fn sniff(data: &[u8]) -> Option<Self> {
        if data.starts_with(&[0xFF, 0xD8, 0xFF]) {
            Some(Self::Jpeg)
        } else if data.starts_with(b"\x89PNG\r\n\x1a\n") {
            Some(Self::Png)
        } else if data.starts_with(b"GIF87a") || data.starts_with(b"GIF89a") {
            Some(Self::Gif)
        } else {
            None
        }
    }

    /// Match a MIME type. `image/jpg` is accepted as a JPEG alias.
    pub fn from_mime(mime: &str) -> Option<Self> {
        match mime.to_ascii_lowercase().as_str() {
            "image/jpeg" | "image/jpg" => Some(Self::Jpeg),
            "image/png" => Some(Self::Png),
            "image/gif" => Some(Self::Gif),
            _ => None,
        }
    }

    /// Match a file extension, with or without the leading dot.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.trim_start_matches('.').to_ascii_lowercase().as_str() {
            "jpeg" | "jpg" => Some(Self::Jpeg),
            "png" => Some(Self::Png),
            "gif" => Some(Self::Gif),
            _ => None,
        }
    }

    pub fn mime(self) -> &'static str {
        match self {
            Self::Jpeg => "image/jpeg",
            Self::Png => "image/png",
            Self::Gif => "image/gif",
        }
    }
}
