//! Payload classification and normalization.
//!
//! The `data` field of an ingestion request means different things
//! depending on its source tag: raw text, a remote PDF URL, a data URL
//! produced by a browser file reader, or PDF bytes supplied directly.
//! [`Payload::classify`] decides which one it is at the request boundary,
//! and [`normalize`] turns the result into the string form that is stored.
//!
//! # Storage Contract
//!
//! | Payload | Stored `data` |
//! |---------|---------------|
//! | `Text(s)` | `s`, verbatim |
//! | `PdfInline(bytes)` | standard padded base64 of `bytes` |
//! | `PdfUrl(url)` | must be resolved to bytes first |
//!
//! Data URLs have their `data:<mime>;base64,` prefix stripped and their
//! payload decoded, so the stored value is always plain base64 of the
//! original file, never a data URL.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use thiserror::Error;

use crate::models::PDF_SOURCE;

/// Errors raised while classifying or normalizing a payload.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum NormalizeError {
    /// A data URL declared base64 content that does not decode.
    #[error("data URL payload is not valid base64: {0}")]
    InvalidBase64(String),

    /// A data URL without the comma separating metadata from content.
    #[error("malformed data URL: missing ',' separator")]
    MalformedDataUrl,

    /// A remote URL reached the normalizer without being fetched.
    #[error("remote PDF URL must be fetched before normalization: {0}")]
    Unresolved(String),
}

/// An ingestion payload, tagged by what the caller actually sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Payload {
    /// Free-form text stored as received.
    Text(String),
    /// A PDF to be fetched from an `http://` or `https://` URL.
    PdfUrl(String),
    /// PDF bytes supplied in the request itself.
    PdfInline(Vec<u8>),
}

impl Payload {
    /// Classifies a `(source, data)` pair from an ingestion request.
    ///
    /// Only the exact `pdf` source tag is treated as binary. For PDFs, an
    /// HTTP(S) URL becomes [`Payload::PdfUrl`], a data URL is decoded into
    /// [`Payload::PdfInline`], and any other string is taken as the raw
    /// bytes of the document.
    pub fn classify(source: &str, data: String) -> Result<Self, NormalizeError> {
        if source != PDF_SOURCE {
            return Ok(Payload::Text(data));
        }

        if is_remote_url(&data) {
            return Ok(Payload::PdfUrl(data));
        }

        if data.starts_with("data:") {
            return decode_data_url(&data).map(Payload::PdfInline);
        }

        Ok(Payload::PdfInline(data.into_bytes()))
    }

    /// Short label used in logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Payload::Text(_) => "text",
            Payload::PdfUrl(_) => "pdf_url",
            Payload::PdfInline(_) => "pdf_inline",
        }
    }
}

/// Returns `true` for strings starting with an HTTP(S) scheme.
pub fn is_remote_url(data: &str) -> bool {
    data.starts_with("http://") || data.starts_with("https://")
}

/// Produces the storable string for a payload.
pub fn normalize(payload: &Payload) -> Result<String, NormalizeError> {
    match payload {
        Payload::Text(text) => Ok(text.clone()),
        Payload::PdfInline(bytes) => Ok(STANDARD.encode(bytes)),
        Payload::PdfUrl(url) => Err(NormalizeError::Unresolved(url.clone())),
    }
}

/// Produces the storable string for PDF bytes fetched from a remote URL.
pub fn normalize_fetched(bytes: &[u8]) -> String {
    STANDARD.encode(bytes)
}

/// Decodes `data:[<mime>][;base64],<content>` into raw bytes.
fn decode_data_url(url: &str) -> Result<Vec<u8>, NormalizeError> {
    let rest = &url["data:".len()..];
    let (meta, content) = rest
        .split_once(',')
        .ok_or(NormalizeError::MalformedDataUrl)?;

    if meta
        .split(';')
        .any(|param| param.eq_ignore_ascii_case("base64"))
    {
        // Line-wrapped base64 is accepted.
        let compact: String = content.chars().filter(|c| !c.is_whitespace()).collect();
        STANDARD
            .decode(compact.as_bytes())
            .map_err(|e| NormalizeError::InvalidBase64(e.to_string()))
    } else {
        Ok(content.as_bytes().to_vec())
    }
}
