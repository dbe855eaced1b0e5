//! JSON bodies for the two backend endpoints.
//!
//! Field names are the backend's; do not rename them.

use crate::pending::PendingFiles;
use crate::role::PanelRole;
use crate::selection::{Platform, Pose, SelectionState, Sector, Shape, Template};
use serde::{Deserialize, Serialize};

/// Body of `POST /api/pdf_extract`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PdfExtractRequest {
    pub pdf_b64: String,
    /// Rasterisation resolution in DPI.
    pub dpi: u32,
}

/// One panel cut out of a PDF page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedPanel {
    pub image_b64: String,
    /// Role hint; may be missing or outside the known set.
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub w: Option<u32>,
    #[serde(default)]
    pub h: Option<u32>,
}

/// Answer of `POST /api/pdf_extract`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PdfExtractResponse {
    #[serde(default)]
    pub panels: Vec<ExtractedPanel>,
    /// Number of pages the PDF had.
    #[serde(default)]
    pub pages: u32,
}

/// Body of `POST /api/flyer`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlyerRequest {
    pub images_b64: Vec<String>,
    /// Parallel to `images_b64`.
    pub panel_roles: Vec<PanelRole>,
    pub shape: Shape,
    pub sector: Sector,
    /// Free-text style notes.
    pub style: String,
    pub template: Template,
    pub platform: Platform,
    pub pose: Pose,
}

impl FlyerRequest {
    /// Assemble a request from the pending list, in list order.
    pub fn new(files: &PendingFiles, selection: &SelectionState, style: impl Into<String>) -> Self {
        Self {
            images_b64: files.contents(),
            panel_roles: files.roles(),
            shape: selection.shape,
            sector: selection.sector,
            style: style.into(),
            template: selection.template,
            platform: selection.platform,
            pose: selection.pose,
        }
    }
}

/// Text-integrity check the backend may attach to a flyer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntegrityReport {
    pub ok: bool,
    #[serde(default)]
    pub missing: Vec<String>,
}

/// Answer of `POST /api/flyer`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlyerResponse {
    /// Composed image, base64 PNG.
    pub image_b64: String,
    /// Pixel size the download should be resized to.
    pub target_w: u32,
    pub target_h: u32,
    #[serde(default)]
    pub integrity: Option<IntegrityReport>,
}
