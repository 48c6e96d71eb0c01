//! Error types for the edgequake-img2xlsx library.
//!
//! Two distinct error types reflect two distinct failure modes:
//!
//! * [`Img2XlsxError`] — **Fatal**: the batch cannot proceed at all (no API
//!   key, invalid configuration, broken upload stream). Returned as
//!   `Err(Img2XlsxError)` from constructors and request-level entry points.
//!
//! * [`ItemError`] — **Non-fatal**: a single image failed (undecodable file,
//!   provider error, response outside the expected grammar) but every other
//!   image is fine. Stored inside [`crate::output::ResultRecord`] and rendered
//!   as a sentinel row, so the result table always has one row per upload.

use crate::output::ExtractionResult;
use thiserror::Error;

/// Source-text sentinel used when the response did not match the grammar.
pub const EXTRACTION_FAILED: &str = "extraction failed";

/// Translation sentinel used for every failed image.
pub const TRANSLATION_UNAVAILABLE: &str = "translation unavailable";

/// Prefix of the source-text column when an image errored out.
pub const ERROR_OCCURRED_PREFIX: &str = "error occurred: ";

/// All fatal errors returned by the edgequake-img2xlsx library.
///
/// Image-level failures use [`ItemError`] and are stored in
/// [`crate::output::ResultRecord`] rather than propagated here.
#[derive(Debug, Error)]
pub enum Img2XlsxError {
    // ── Config errors ─────────────────────────────────────────────────────
    /// No API key was supplied for the session.
    #[error("OpenAI API key is missing.\nEnter your API key before uploading images.")]
    MissingCredential,

    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Request errors ────────────────────────────────────────────────────
    /// The multipart upload could not be read.
    #[error("Invalid upload: {0}")]
    InvalidUpload(String),

    /// The whole request exceeded the body limit.
    #[error("Request too large: {0}")]
    RequestTooLarge(String),

    // ── Export errors ─────────────────────────────────────────────────────
    /// The spreadsheet could not be produced.
    #[error("Failed to build the Excel workbook: {0}")]
    ExportFailed(#[from] rust_xlsxwriter::XlsxError),

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// A non-fatal error for a single image.
///
/// The batch continues regardless; [`ItemError::fallback`] gives the row that
/// replaces the missing result.
#[derive(Debug, Clone, PartialEq, Eq, Error, serde::Serialize, serde::Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ItemError {
    /// The upload is not a decodable PNG/JPEG image.
    #[error("invalid image: {detail}")]
    InvalidImage { detail: String },

    /// The provider call failed (auth, quota, network, bad request).
    #[error("{message}")]
    Transport { message: String },

    /// The model answered, but not in the `<result>` grammar.
    #[error("response did not contain a <result> block")]
    NoMatch,
}

impl ItemError {
    /// The sentinel result shown in place of a real extraction.
    pub fn fallback(&self) -> ExtractionResult {
        match self {
            ItemError::NoMatch => {
                ExtractionResult::new(EXTRACTION_FAILED, TRANSLATION_UNAVAILABLE)
            }
            other => ExtractionResult::new(
                format!("{ERROR_OCCURRED_PREFIX}{other}"),
                TRANSLATION_UNAVAILABLE,
            ),
        }
    }
}

/// Failure reported by a [`crate::pipeline::llm::VisionBackend`].
///
/// Carries the provider's message verbatim; it ends up in the result table.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct BackendError {
    pub message: String,
}

impl BackendError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl From<BackendError> for ItemError {
    fn from(e: BackendError) -> Self {
        ItemError::Transport { message: e.message }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_match_fallback_is_fixed_sentinel() {
        let r = ItemError::NoMatch.fallback();
        assert_eq!(r.source_text, "extraction failed");
        assert_eq!(r.translated_text, "translation unavailable");
    }

    #[test]
    fn transport_fallback_embeds_message() {
        let r = ItemError::from(BackendError::new("rate limit exceeded")).fallback();
        assert_eq!(r.source_text, "error occurred: rate limit exceeded");
        assert_eq!(r.translated_text, "translation unavailable");
    }

    #[test]
    fn invalid_image_fallback_mentions_detail() {
        let e = ItemError::InvalidImage {
            detail: "unsupported format".into(),
        };
        let r = e.fallback();
        assert!(r.source_text.starts_with("error occurred: "), "got: {}", r.source_text);
        assert!(r.source_text.contains("unsupported format"));
    }

    #[test]
    fn missing_credential_display() {
        let msg = Img2XlsxError::MissingCredential.to_string();
        assert!(msg.contains("API key"), "got: {msg}");
    }

    #[test]
    fn request_too_large_display() {
        let e = Img2XlsxError::RequestTooLarge("length limit exceeded".into());
        assert_eq!(e.to_string(), "Request too large: length limit exceeded");
    }

    #[test]
    fn item_error_serialises_with_kind_tag() {
        let json = serde_json::to_string(&ItemError::NoMatch).unwrap();
        assert_eq!(json, r#"{"kind":"no_match"}"#);
    }
}
