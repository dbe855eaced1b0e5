//! The flyer backend: two JSON-over-HTTP operations.
//!
//! ```text
//! FlyerSession ──▶ dyn FlyerBackend ──▶ POST /api/pdf_extract
//!                                   └─▶ POST /api/flyer
//! ```
//!
//! 1. [`wire`] — request/response bodies, exactly as they travel
//! 2. [`http`] — the reqwest implementation used in production
//!
//! The session only sees the [`FlyerBackend`] trait, so tests and embedding
//! applications can supply their own implementation.

pub mod http;
pub mod wire;

use crate::error::FlyerError;
use async_trait::async_trait;
use std::fmt;

pub use http::HttpBackend;
pub use wire::{
    ExtractedPanel, FlyerRequest, FlyerResponse, IntegrityReport, PdfExtractRequest,
    PdfExtractResponse,
};

/// The two backend operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    /// Panel extraction from a PDF dieline.
    PdfExtract,
    /// Flyer composition from artwork panels.
    Flyer,
}

impl Endpoint {
    /// Path relative to the backend root.
    pub fn path(self) -> &'static str {
        match self {
            Endpoint::PdfExtract => "/api/pdf_extract",
            Endpoint::Flyer => "/api/flyer",
        }
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "POST {}", self.path())
    }
}

/// A service that extracts panels and composes flyers.
///
/// Any non-success answer must come back as `Err`; implementations never
/// hand a partial response to the caller.
#[async_trait]
pub trait FlyerBackend: Send + Sync {
    /// Split a PDF into artwork panels.
    async fn extract_panels(
        &self,
        request: &PdfExtractRequest,
    ) -> Result<PdfExtractResponse, FlyerError>;

    /// Compose a flyer image from tagged panels.
    async fn compose_flyer(&self, request: &FlyerRequest) -> Result<FlyerResponse, FlyerError>;
}
