//! Error types for the flyer-client library.
//!
//! Two distinct error types reflect two distinct failure modes:
//!
//! * [`FlyerError`] — **Fatal** for one user action: the action cannot
//!   proceed (wrong file type, empty list, backend rejected the request).
//!   Returned as `Err(FlyerError)` from the session operations. Session
//!   state is left as it was before the action.
//!
//! * [`FileError`] — **Non-fatal**: one picked file was skipped (not an
//!   image, too large, unreadable) while the rest of the batch was added.
//!   Collected in [`crate::session::AddImagesReport::skipped`].

use crate::backend::Endpoint;
use std::path::PathBuf;
use thiserror::Error;

/// All fatal errors returned by the flyer-client library.
#[derive(Debug, Error)]
pub enum FlyerError {
    // ── Input errors ──────────────────────────────────────────────────────
    /// Input file was not found at the given path.
    #[error("File not found: '{path}'\nCheck the path exists and is readable.")]
    FileNotFound { path: PathBuf },

    /// Process does not have read permission on the file.
    #[error("Permission denied reading '{path}'\nTry: chmod +r {path:?}")]
    PermissionDenied { path: PathBuf },

    /// The picked file is not a PDF.
    #[error("Please choose a PDF file: '{name}' has type {mime}")]
    NotAPdf { name: String, mime: String },

    /// Generation was requested with nothing to submit.
    #[error("Upload a PDF or images first.")]
    NoFiles,

    /// Files were picked but none of them passed validation.
    #[error("No valid images were added ({skipped} file(s) skipped).")]
    NoValidImages { skipped: usize },

    /// A list index does not address an existing pending file.
    #[error("Index {index} is out of range (list has {len} file(s))")]
    IndexOutOfRange { index: usize, len: usize },

    // ── Backend errors ────────────────────────────────────────────────────
    /// The backend answered with a non-success HTTP status.
    #[error("{endpoint} failed with HTTP {status}: {body}")]
    Backend {
        endpoint: Endpoint,
        status: u16,
        body: String,
    },

    /// The request never produced a response (connection refused, DNS, TLS).
    #[error("{endpoint} request failed: {reason}")]
    Request { endpoint: Endpoint, reason: String },

    /// The request exceeded the configured timeout.
    #[error("{endpoint} timed out after {secs}s\nIncrease --timeout.")]
    Timeout { endpoint: Endpoint, secs: u64 },

    /// The backend answered 2xx but the body could not be understood.
    #[error("{endpoint} returned an invalid response: {detail}")]
    InvalidResponse { endpoint: Endpoint, detail: String },

    // ── Image errors ──────────────────────────────────────────────────────
    /// Image bytes could not be decoded, encoded or resized.
    #[error("Invalid image: {0}")]
    InvalidImage(String),

    /// A download was requested before any flyer was generated.
    #[error("No flyer has been generated yet")]
    NoResult,

    // ── I/O errors ────────────────────────────────────────────────────────
    /// Could not create or write an output file.
    #[error("Failed to write output file '{path}': {source}")]
    OutputWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl FlyerError {
    /// Whether the error came back from (or on the way to) the backend.
    pub fn is_backend(&self) -> bool {
        matches!(
            self,
            FlyerError::Backend { .. }
                | FlyerError::Request { .. }
                | FlyerError::Timeout { .. }
                | FlyerError::InvalidResponse { .. }
        )
    }
}

/// A non-fatal error for a single picked file.
///
/// The file is skipped; the other files of the same pick continue.
#[derive(Debug, Clone, Error, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum FileError {
    /// MIME type is not `image/*`.
    #[error("{name}: not an image ({mime})")]
    NotAnImage { name: String, mime: String },

    /// File exceeds the configured size cap.
    #[error("{name}: {size} bytes exceeds the {limit}-byte limit")]
    TooLarge { name: String, size: u64, limit: u64 },

    /// Reading the file failed.
    #[error("{name}: read failed: {detail}")]
    ReadFailed { name: String, detail: String },
}

impl FileError {
    /// Name of the file this error refers to.
    pub fn name(&self) -> &str {
        match self {
            FileError::NotAnImage { name, .. }
            | FileError::TooLarge { name, .. }
            | FileError::ReadFailed { name, .. } => name,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backend_display_carries_status_and_body() {
        let e = FlyerError::Backend {
            endpoint: Endpoint::Flyer,
            status: 400,
            body: "Provide at least one artwork image".into(),
        };
        let msg = e.to_string();
        assert!(msg.contains("400"), "got: {msg}");
        assert!(msg.contains("/api/flyer"), "got: {msg}");
        assert!(msg.contains("at least one artwork"), "got: {msg}");
        assert!(e.is_backend());
    }

    #[test]
    fn validation_errors_are_not_backend() {
        assert!(!FlyerError::NoFiles.is_backend());
        assert!(!FlyerError::NotAPdf {
            name: "a.png".into(),
            mime: "image/png".into()
        }
        .is_backend());
    }

    #[test]
    fn timeout_display() {
        let e = FlyerError::Timeout {
            endpoint: Endpoint::PdfExtract,
            secs: 30,
        };
        assert!(e.to_string().contains("30s"));
        assert!(e.to_string().contains("/api/pdf_extract"));
    }

    #[test]
    fn file_error_name() {
        let e = FileError::TooLarge {
            name: "huge.png".into(),
            size: 200,
            limit: 100,
        };
        assert_eq!(e.name(), "huge.png");
        assert!(e.to_string().contains("100-byte"));
    }
}
