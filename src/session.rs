//! The flyer session: everything a user does between picking files and
//! downloading a flyer.
//!
//! A [`FlyerSession`] owns the pending artwork list, the option selection,
//! the style notes, the last result and two status lines. Every operation
//! takes `&mut self`, so a session can run at most one network call at a
//! time; a second submission cannot start while the first is in flight.
//!
//! ## Failure semantics
//!
//! * Validation failures (no file, wrong type, empty list) return
//!   immediately and change nothing.
//! * Unreadable image files are skipped one by one; the rest of the pick is
//!   still added.
//! * Backend failures are logged, written to the matching status line, and
//!   returned. The control goes back to idle and no result is stored. There
//!   are no retries.

use crate::backend::{
    FlyerBackend, FlyerRequest, FlyerResponse, HttpBackend, IntegrityReport, PdfExtractRequest,
};
use crate::config::ClientConfig;
use crate::encode::{data_uri, from_base64, png_data_uri, to_base64};
use crate::error::{FileError, FlyerError};
use crate::input::InputFile;
use crate::pending::{PendingFile, PendingFiles, Preview};
use crate::progress::{Control, ControlState, NoopObserver, ObserverHandle, StatusArea};
use crate::render;
use crate::role::{infer_role, PanelRole};
use crate::selection::{Platform, Pose, SelectionState, Sector, Shape, Template};
use futures::stream::{self, StreamExt};
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

pub const STATUS_EXTRACTING: &str = "Extracting panels from PDF…";
pub const STATUS_NO_PANELS: &str = "No panels detected. You can still upload images manually.";
pub const STATUS_EXTRACT_FAILED: &str = "Failed to extract panels.";
pub const STATUS_GENERATING: &str = "Generating flyer...";
pub const STATUS_READY: &str = "Flyer ready.";
pub const STATUS_GENERATE_FAILED: &str = "Error generating flyer.";
pub const STATUS_CLEARED: &str = "Cleared. Ready for the next flyer.";

/// What a PDF extraction added to the list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtractOutcome {
    /// `panels` items were appended from a document of `pages` pages.
    Added { panels: usize, pages: u32 },
    /// The backend found nothing; the list is unchanged.
    NoPanels { pages: u32 },
}

/// Result of one `add_images` call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AddImagesReport {
    /// Number of items appended to the list.
    pub added: usize,
    /// Files that were skipped, in pick order.
    pub skipped: Vec<FileError>,
}

/// A composed flyer, ready for download.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlyerResult {
    /// Decoded image as returned by the backend.
    pub image: Vec<u8>,
    /// Download size reported by the backend.
    pub target_w: u32,
    pub target_h: u32,
    /// Suggested filename, from the template active at generation time.
    pub download_name: String,
    pub integrity: Option<IntegrityReport>,
}

/// Client-side state and operations of one flyer-building session.
pub struct FlyerSession {
    config: ClientConfig,
    backend: Arc<dyn FlyerBackend>,
    observer: ObserverHandle,
    files: PendingFiles,
    selection: SelectionState,
    style: String,
    result: Option<FlyerResult>,
    pdf_status: String,
    status: String,
    extract_state: ControlState,
    generate_state: ControlState,
}

impl FlyerSession {
    /// Session talking to the HTTP backend named in `config`.
    pub fn new(config: ClientConfig) -> Result<Self, FlyerError> {
        let backend = HttpBackend::new(&config)?;
        Ok(Self::with_backend(config, Arc::new(backend)))
    }

    /// Session using a caller-supplied backend.
    pub fn with_backend(config: ClientConfig, backend: Arc<dyn FlyerBackend>) -> Self {
        Self {
            config,
            backend,
            observer: Arc::new(NoopObserver),
            files: PendingFiles::new(),
            selection: SelectionState::default(),
            style: String::new(),
            result: None,
            pdf_status: String::new(),
            status: String::new(),
            extract_state: ControlState::Idle,
            generate_state: ControlState::Idle,
        }
    }

    /// Attach an observer for control and status events.
    pub fn with_observer(mut self, observer: ObserverHandle) -> Self {
        self.observer = observer;
        self
    }

    // ── Accessors ────────────────────────────────────────────────────────

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn files(&self) -> &PendingFiles {
        &self.files
    }

    pub fn selection(&self) -> &SelectionState {
        &self.selection
    }

    pub fn style(&self) -> &str {
        &self.style
    }

    /// The last generated flyer. `None` until a generation succeeds.
    pub fn result(&self) -> Option<&FlyerResult> {
        self.result.as_ref()
    }

    pub fn status(&self, area: StatusArea) -> &str {
        match area {
            StatusArea::Pdf => &self.pdf_status,
            StatusArea::Flyer => &self.status,
        }
    }

    pub fn control_state(&self, control: Control) -> ControlState {
        match control {
            Control::ExtractPdf => self.extract_state,
            Control::GenerateFlyer => self.generate_state,
        }
    }

    // ── Selection ────────────────────────────────────────────────────────

    pub fn set_template(&mut self, template: Template) {
        self.selection.template = template;
    }

    pub fn set_shape(&mut self, shape: Shape) {
        self.selection.shape = shape;
    }

    pub fn set_sector(&mut self, sector: Sector) {
        self.selection.sector = sector;
    }

    pub fn set_platform(&mut self, platform: Platform) {
        self.selection.platform = platform;
    }

    pub fn set_pose(&mut self, pose: Pose) {
        self.selection.pose = pose;
    }

    pub fn set_selection(&mut self, selection: SelectionState) {
        self.selection = selection;
    }

    /// Free-text style notes sent with the next generation.
    pub fn set_style(&mut self, style: impl Into<String>) {
        self.style = style.into();
    }

    // ── PDF extraction ───────────────────────────────────────────────────

    /// Send a PDF to the panel extractor and append every returned panel.
    pub async fn extract_pdf_panels(
        &mut self,
        file: &InputFile,
    ) -> Result<ExtractOutcome, FlyerError> {
        if !file.is_pdf() {
            return Err(FlyerError::NotAPdf {
                name: file.name().to_string(),
                mime: file.mime().to_string(),
            });
        }

        info!("Extracting panels from {}", file.name());
        self.set_status(StatusArea::Pdf, STATUS_EXTRACTING);
        self.set_control(Control::ExtractPdf, ControlState::InFlight);

        let outcome = self.request_panels(file).await;

        self.set_control(Control::ExtractPdf, ControlState::Idle);

        match outcome {
            Ok(outcome) => Ok(outcome),
            Err(e) => {
                error!("Panel extraction failed for {}: {}", file.name(), e);
                self.set_status(StatusArea::Pdf, STATUS_EXTRACT_FAILED);
                Err(e)
            }
        }
    }

    async fn request_panels(&mut self, file: &InputFile) -> Result<ExtractOutcome, FlyerError> {
        let bytes = file.load().await?;
        let request = PdfExtractRequest {
            pdf_b64: to_base64(&bytes),
            dpi: self.config.pdf_resolution,
        };
        let response = self.backend.extract_panels(&request).await?;

        if response.panels.is_empty() {
            info!("No panels detected in {} ({} page(s))", file.name(), response.pages);
            self.set_status(StatusArea::Pdf, STATUS_NO_PANELS);
            return Ok(ExtractOutcome::NoPanels {
                pages: response.pages,
            });
        }

        let count = response.panels.len();
        for (i, panel) in response.panels.into_iter().enumerate() {
            let role = PanelRole::from_hint(panel.role.as_deref());
            debug!("Panel {} → {} ({:?}×{:?})", i + 1, role, panel.w, panel.h);
            self.files.push(PendingFile {
                name: format!("pdf_panel_{}.png", i + 1),
                preview: Some(Preview::DataUri(png_data_uri(&panel.image_b64))),
                content: panel.image_b64,
                role,
            });
        }

        info!("Added {} panel(s) from {} page(s)", count, response.pages);
        self.set_status(
            StatusArea::Pdf,
            &format!("Added {} panel(s) from {} page(s).", count, response.pages),
        );
        Ok(ExtractOutcome::Added {
            panels: count,
            pages: response.pages,
        })
    }

    // ── Image upload ─────────────────────────────────────────────────────

    /// Append every valid image of a pick, in pick order.
    ///
    /// Non-images, files over the size cap and unreadable files are skipped
    /// and reported; the others are still added. Picking files of which none
    /// is valid is an error.
    pub async fn add_images(&mut self, picked: &[InputFile]) -> Result<AddImagesReport, FlyerError> {
        if picked.is_empty() {
            return Ok(AddImagesReport::default());
        }

        let limit = self.config.max_image_bytes;
        let loaded: Vec<Result<PendingFile, FileError>> = stream::iter(picked)
            .map(|file| load_image(file, limit))
            .buffered(self.config.read_concurrency.max(1))
            .collect()
            .await;

        let mut report = AddImagesReport::default();
        for item in loaded {
            match item {
                Ok(file) => {
                    debug!("Added {} as {}", file.name, file.role);
                    self.files.push(file);
                    report.added += 1;
                }
                Err(e) => {
                    warn!("Skipping {}", e);
                    self.observer.on_file_skipped(&e);
                    report.skipped.push(e);
                }
            }
        }

        if report.added == 0 {
            warn!("No valid images among {} picked file(s)", picked.len());
            return Err(FlyerError::NoValidImages {
                skipped: report.skipped.len(),
            });
        }

        info!(
            "Added {} image(s), skipped {}; {} pending",
            report.added,
            report.skipped.len(),
            self.files.len()
        );
        Ok(report)
    }

    // ── List editing ─────────────────────────────────────────────────────

    /// Change the role of the item at `index`.
    pub fn edit_role(&mut self, index: usize, role: PanelRole) -> Result<(), FlyerError> {
        self.files.set_role(index, role)
    }

    /// Remove the item at `index`, keeping the order of the rest.
    pub fn remove_file(&mut self, index: usize) -> Result<PendingFile, FlyerError> {
        self.files.remove(index)
    }

    /// Empty the pending list. Selection, style and result are kept.
    pub fn clear_files(&mut self) {
        self.files.clear();
    }

    // ── Generation ───────────────────────────────────────────────────────

    /// Submit every pending item with the current selection and style notes.
    pub async fn generate_flyer(&mut self) -> Result<&FlyerResult, FlyerError> {
        if self.files.is_empty() {
            return Err(FlyerError::NoFiles);
        }

        self.result = None;
        self.set_status(StatusArea::Flyer, STATUS_GENERATING);
        self.set_control(Control::GenerateFlyer, ControlState::InFlight);

        let request = FlyerRequest::new(&self.files, &self.selection, self.style.clone());
        let template = self.selection.template;
        info!(
            "Generating {} flyer from {} panel(s)",
            template,
            request.images_b64.len()
        );

        let outcome = match self.backend.compose_flyer(&request).await {
            Ok(response) => flyer_result(response, template),
            Err(e) => Err(e),
        };

        self.set_control(Control::GenerateFlyer, ControlState::Idle);

        match outcome {
            Ok(result) => {
                info!(
                    "Flyer ready: {} bytes, download {}×{}",
                    result.image.len(),
                    result.target_w,
                    result.target_h
                );
                self.set_status(StatusArea::Flyer, STATUS_READY);
                Ok(self.result.insert(result))
            }
            Err(e) => {
                error!("Flyer generation failed: {}", e);
                self.set_status(StatusArea::Flyer, STATUS_GENERATE_FAILED);
                Err(e)
            }
        }
    }

    /// Save the last generated flyer, letterboxed to its target size.
    pub async fn download_result(&self, path: impl AsRef<Path>) -> Result<(), FlyerError> {
        let result = self.result.as_ref().ok_or(FlyerError::NoResult)?;
        render::download_resized(&result.image, result.target_w, result.target_h, path).await
    }

    // ── Reset ────────────────────────────────────────────────────────────

    /// Return the session to its initial state.
    pub fn reset(&mut self) {
        self.files.clear();
        self.result = None;
        self.style.clear();
        self.selection.reset();
        self.set_status(StatusArea::Pdf, "");
        self.set_status(StatusArea::Flyer, STATUS_CLEARED);
        info!("Session reset");
    }

    // ── Internals ────────────────────────────────────────────────────────

    fn set_status(&mut self, area: StatusArea, message: &str) {
        match area {
            StatusArea::Pdf => self.pdf_status = message.to_string(),
            StatusArea::Flyer => self.status = message.to_string(),
        }
        self.observer.on_status(area, message);
    }

    fn set_control(&mut self, control: Control, state: ControlState) {
        match control {
            Control::ExtractPdf => self.extract_state = state,
            Control::GenerateFlyer => self.generate_state = state,
        }
        self.observer.on_control_change(control, state);
    }
}

/// Validate, read and encode one picked image.
async fn load_image(file: &InputFile, limit: u64) -> Result<PendingFile, FileError> {
    if !file.is_image() {
        return Err(FileError::NotAnImage {
            name: file.name().to_string(),
            mime: file.mime().to_string(),
        });
    }
    if file.size() > limit {
        return Err(FileError::TooLarge {
            name: file.name().to_string(),
            size: file.size(),
            limit,
        });
    }

    let bytes = file.read().await.map_err(|e| FileError::ReadFailed {
        name: file.name().to_string(),
        detail: e.to_string(),
    })?;
    let content = to_base64(&bytes);
    let preview = match file.path() {
        Some(path) => Preview::Path(path.to_path_buf()),
        None => Preview::DataUri(data_uri(file.mime(), &content)),
    };

    Ok(PendingFile {
        name: file.name().to_string(),
        content,
        role: infer_role(file.name()),
        preview: Some(preview),
    })
}

/// Turn a composition response into a stored result.
fn flyer_result(response: FlyerResponse, template: Template) -> Result<FlyerResult, FlyerError> {
    let endpoint = crate::backend::Endpoint::Flyer;
    if response.target_w == 0 || response.target_h == 0 {
        return Err(FlyerError::InvalidResponse {
            endpoint,
            detail: format!(
                "target size is {}×{}",
                response.target_w, response.target_h
            ),
        });
    }

    let image = from_base64(&response.image_b64).map_err(|e| FlyerError::InvalidResponse {
        endpoint,
        detail: format!("image_b64 is not valid base64: {e}"),
    })?;
    image::guess_format(&image).map_err(|e| FlyerError::InvalidResponse {
        endpoint,
        detail: format!("image_b64 is not an image: {e}"),
    })?;

    if let Some(report) = response.integrity.as_ref().filter(|r| !r.ok) {
        warn!(
            "Backend integrity check failed; missing terms: {}",
            report.missing.join(", ")
        );
    }

    Ok(FlyerResult {
        image,
        target_w: response.target_w,
        target_h: response.target_h,
        download_name: template.download_name().to_string(),
        integrity: response.integrity,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{ExtractedPanel, PdfExtractResponse};
    use crate::encode::encode_png;
    use crate::progress::SessionObserver;
    use async_trait::async_trait;
    use image::{DynamicImage, Rgba, RgbaImage};
    use std::sync::Mutex;

    fn png_b64(w: u32, h: u32) -> String {
        let img = DynamicImage::ImageRgba8(RgbaImage::from_pixel(w, h, Rgba([1, 2, 3, 255])));
        to_base64(&encode_png(&img).unwrap())
    }

    /// Backend returning canned answers and recording what it was sent.
    #[derive(Default)]
    struct FakeBackend {
        panels: Option<Result<PdfExtractResponse, u16>>,
        flyer: Option<Result<FlyerResponse, u16>>,
        extract_requests: Mutex<Vec<PdfExtractRequest>>,
        flyer_requests: Mutex<Vec<FlyerRequest>>,
    }

    fn http_error(endpoint: crate::backend::Endpoint, status: u16) -> FlyerError {
        FlyerError::Backend {
            endpoint,
            status,
            body: "boom".into(),
        }
    }

    #[async_trait]
    impl FlyerBackend for FakeBackend {
        async fn extract_panels(
            &self,
            request: &PdfExtractRequest,
        ) -> Result<PdfExtractResponse, FlyerError> {
            self.extract_requests.lock().unwrap().push(request.clone());
            match self.panels.clone() {
                Some(Ok(r)) => Ok(r),
                Some(Err(status)) => Err(http_error(crate::backend::Endpoint::PdfExtract, status)),
                None => Ok(PdfExtractResponse::default()),
            }
        }

        async fn compose_flyer(&self, request: &FlyerRequest) -> Result<FlyerResponse, FlyerError> {
            self.flyer_requests.lock().unwrap().push(request.clone());
            match self.flyer.clone() {
                Some(Ok(r)) => Ok(r),
                Some(Err(status)) => Err(http_error(crate::backend::Endpoint::Flyer, status)),
                None => Err(http_error(crate::backend::Endpoint::Flyer, 500)),
            }
        }
    }

    #[derive(Default)]
    struct ControlLog(Mutex<Vec<(Control, ControlState)>>);

    impl SessionObserver for ControlLog {
        fn on_control_change(&self, control: Control, state: ControlState) {
            self.0.lock().unwrap().push((control, state));
        }
    }

    fn session(backend: FakeBackend) -> (FlyerSession, Arc<FakeBackend>) {
        let backend = Arc::new(backend);
        let s = FlyerSession::with_backend(ClientConfig::default(), backend.clone());
        (s, backend)
    }

    fn image(name: &str) -> InputFile {
        InputFile::from_bytes(name, name.as_bytes().to_vec())
    }

    fn names(s: &FlyerSession) -> Vec<String> {
        s.files().iter().map(|f| f.name.clone()).collect()
    }

    #[tokio::test]
    async fn adding_n_images_yields_n_entries_in_order() {
        let (mut s, _) = session(FakeBackend::default());
        let picked = vec![image("c_front.png"), image("a_back.jpg"), image("b.png")];

        let report = s.add_images(&picked).await.unwrap();

        assert_eq!(report.added, 3);
        assert!(report.skipped.is_empty());
        assert_eq!(names(&s), vec!["c_front.png", "a_back.jpg", "b.png"]);
        assert_eq!(
            s.files().roles(),
            vec![PanelRole::Front, PanelRole::Back, PanelRole::Back]
        );
    }

    #[tokio::test]
    async fn invalid_files_are_skipped_individually() {
        let (mut s, _) = session(FakeBackend::default());
        let config = ClientConfig::builder().max_image_bytes(8).build().unwrap();
        s.config = config;

        let picked = vec![
            image("notes.txt"),
            InputFile::from_bytes("huge.png", vec![0u8; 9]),
            image("ok.png"),
        ];
        let report = s.add_images(&picked).await.unwrap();

        assert_eq!(report.added, 1);
        assert_eq!(report.skipped.len(), 2);
        assert!(matches!(report.skipped[0], FileError::NotAnImage { .. }));
        assert!(matches!(report.skipped[1], FileError::TooLarge { .. }));
        assert_eq!(names(&s), vec!["ok.png"]);
    }

    #[tokio::test]
    async fn none_valid_is_an_error_and_changes_nothing() {
        let (mut s, _) = session(FakeBackend::default());
        let err = s.add_images(&[image("a.txt"), image("b.doc")]).await.unwrap_err();
        assert!(matches!(err, FlyerError::NoValidImages { skipped: 2 }));
        assert!(s.files().is_empty());

        // An empty pick is a quiet no-op.
        assert_eq!(s.add_images(&[]).await.unwrap(), AddImagesReport::default());
    }

    #[tokio::test]
    async fn memory_images_get_data_uri_previews() {
        let (mut s, _) = session(FakeBackend::default());
        s.add_images(&[image("x.png")]).await.unwrap();
        let preview = s.files().get(0).unwrap().preview.clone().unwrap();
        assert!(matches!(preview, Preview::DataUri(uri) if uri.starts_with("data:image/png;base64,")));
    }

    #[tokio::test]
    async fn extract_rejects_non_pdf_without_calling_backend() {
        let (mut s, backend) = session(FakeBackend::default());
        let err = s.extract_pdf_panels(&image("front.png")).await.unwrap_err();
        assert!(matches!(err, FlyerError::NotAPdf { .. }));
        assert!(backend.extract_requests.lock().unwrap().is_empty());
        assert_eq!(s.status(StatusArea::Pdf), "");
    }

    #[tokio::test]
    async fn extract_appends_panels_with_hinted_roles() {
        let panels = PdfExtractResponse {
            panels: vec![
                ExtractedPanel {
                    image_b64: "AAA".into(),
                    role: Some("front".into()),
                    w: Some(10),
                    h: Some(20),
                },
                ExtractedPanel {
                    image_b64: "BBB".into(),
                    role: None,
                    w: None,
                    h: None,
                },
            ],
            pages: 1,
        };
        let (mut s, backend) = session(FakeBackend {
            panels: Some(Ok(panels)),
            ..Default::default()
        });
        s.add_images(&[image("existing.png")]).await.unwrap();

        let pdf = InputFile::from_bytes("dieline.pdf", b"%PDF-1.7".to_vec());
        let outcome = s.extract_pdf_panels(&pdf).await.unwrap();

        assert_eq!(outcome, ExtractOutcome::Added { panels: 2, pages: 1 });
        assert_eq!(names(&s), vec!["existing.png", "pdf_panel_1.png", "pdf_panel_2.png"]);
        assert_eq!(s.files().get(1).unwrap().role, PanelRole::Front);
        assert_eq!(s.files().get(2).unwrap().role, PanelRole::Generic);
        assert_eq!(
            s.files().get(2).unwrap().preview,
            Some(Preview::DataUri("data:image/png;base64,BBB".into()))
        );
        assert_eq!(s.status(StatusArea::Pdf), "Added 2 panel(s) from 1 page(s).");

        let sent = backend.extract_requests.lock().unwrap();
        assert_eq!(sent[0].dpi, 400);
        assert_eq!(sent[0].pdf_b64, "JVBERi0xLjc=");
    }

    #[tokio::test]
    async fn extract_with_no_panels_reports_it() {
        let (mut s, _) = session(FakeBackend {
            panels: Some(Ok(PdfExtractResponse {
                panels: vec![],
                pages: 3,
            })),
            ..Default::default()
        });
        let pdf = InputFile::from_bytes("blank.pdf", b"%PDF".to_vec());
        let outcome = s.extract_pdf_panels(&pdf).await.unwrap();
        assert_eq!(outcome, ExtractOutcome::NoPanels { pages: 3 });
        assert!(s.files().is_empty());
        assert_eq!(s.status(StatusArea::Pdf), STATUS_NO_PANELS);
    }

    #[tokio::test]
    async fn extract_failure_leaves_list_and_reenables_control() {
        let log = Arc::new(ControlLog::default());
        let (s, _) = session(FakeBackend {
            panels: Some(Err(502)),
            ..Default::default()
        });
        let mut s = s.with_observer(log.clone());
        s.add_images(&[image("keep.png")]).await.unwrap();

        let pdf = InputFile::from_bytes("x.pdf", b"%PDF".to_vec());
        let err = s.extract_pdf_panels(&pdf).await.unwrap_err();

        assert!(matches!(err, FlyerError::Backend { status: 502, .. }));
        assert_eq!(names(&s), vec!["keep.png"]);
        assert_eq!(s.status(StatusArea::Pdf), STATUS_EXTRACT_FAILED);
        assert_eq!(s.control_state(Control::ExtractPdf), ControlState::Idle);
        assert_eq!(
            *log.0.lock().unwrap(),
            vec![
                (Control::ExtractPdf, ControlState::InFlight),
                (Control::ExtractPdf, ControlState::Idle)
            ]
        );
    }

    #[tokio::test]
    async fn generate_requires_files() {
        let (mut s, backend) = session(FakeBackend::default());
        let err = s.generate_flyer().await.unwrap_err();
        assert!(matches!(err, FlyerError::NoFiles));
        assert!(backend.flyer_requests.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn generate_submits_list_order_and_selection() {
        let (mut s, backend) = session(FakeBackend {
            flyer: Some(Ok(FlyerResponse {
                image_b64: png_b64(4, 6),
                target_w: 1080,
                target_h: 1920,
                integrity: None,
            })),
            ..Default::default()
        });
        s.add_images(&[image("front.png"), image("back.png"), image("side.png")])
            .await
            .unwrap();
        s.edit_role(2, PanelRole::Left).unwrap();
        s.remove_file(1).unwrap();
        s.set_template(Template::Story);
        s.set_shape(Shape::Can);
        s.set_style("bold, citrus");

        let result = s.generate_flyer().await.unwrap();
        assert_eq!((result.target_w, result.target_h), (1080, 1920));
        assert_eq!(result.download_name, "story.png");
        assert_eq!(s.status(StatusArea::Flyer), STATUS_READY);
        assert_eq!(s.control_state(Control::GenerateFlyer), ControlState::Idle);

        let sent = backend.flyer_requests.lock().unwrap();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].panel_roles, vec![PanelRole::Front, PanelRole::Left]);
        assert_eq!(
            sent[0].images_b64,
            vec![to_base64(b"front.png"), to_base64(b"side.png")]
        );
        assert_eq!(sent[0].template, Template::Story);
        assert_eq!(sent[0].shape, Shape::Can);
        assert_eq!(sent[0].style, "bold, citrus");
    }

    #[tokio::test]
    async fn generate_failure_never_populates_result() {
        let (mut s, _) = session(FakeBackend {
            flyer: Some(Err(500)),
            ..Default::default()
        });
        s.add_images(&[image("front.png")]).await.unwrap();

        let err = s.generate_flyer().await.unwrap_err();
        assert!(matches!(err, FlyerError::Backend { status: 500, .. }));
        assert!(s.result().is_none());
        assert_eq!(s.status(StatusArea::Flyer), STATUS_GENERATE_FAILED);
        assert_eq!(s.control_state(Control::GenerateFlyer), ControlState::Idle);
        assert!(matches!(
            s.download_result("never.png").await,
            Err(FlyerError::NoResult)
        ));
    }

    #[tokio::test]
    async fn garbage_image_is_invalid_response() {
        let (mut s, _) = session(FakeBackend {
            flyer: Some(Ok(FlyerResponse {
                image_b64: to_base64(b"not an image"),
                target_w: 10,
                target_h: 10,
                integrity: None,
            })),
            ..Default::default()
        });
        s.add_images(&[image("front.png")]).await.unwrap();
        let err = s.generate_flyer().await.unwrap_err();
        assert!(matches!(err, FlyerError::InvalidResponse { .. }));
        assert!(s.result().is_none());
    }

    #[test]
    fn reset_restores_defaults_and_empties_list() {
        let (mut s, _) = session(FakeBackend::default());
        tokio_test::block_on(s.add_images(&[image("front.png")])).unwrap();
        s.set_template(Template::Print);
        s.set_sector(Sector::Dairy);
        s.set_platform(Platform::Linkedin);
        s.set_pose(Pose::Isometric);
        s.set_shape(Shape::Jar);
        s.set_style("retro");

        s.reset();

        assert!(s.files().is_empty());
        assert!(s.result().is_none());
        assert_eq!(s.style(), "");
        assert_eq!(*s.selection(), SelectionState::default());
        assert_eq!(s.status(StatusArea::Flyer), STATUS_CLEARED);
        assert_eq!(s.status(StatusArea::Pdf), "");
    }

    #[test]
    fn clear_files_keeps_selection() {
        let (mut s, _) = session(FakeBackend::default());
        tokio_test::block_on(s.add_images(&[image("a.png"), image("b.png")])).unwrap();
        s.set_template(Template::Quote);
        s.clear_files();
        assert!(s.files().is_empty());
        assert_eq!(s.selection().template, Template::Quote);
    }

    #[test]
    fn edit_and_remove_out_of_range() {
        let (mut s, _) = session(FakeBackend::default());
        assert!(matches!(
            s.edit_role(0, PanelRole::Top),
            Err(FlyerError::IndexOutOfRange { index: 0, len: 0 })
        ));
        assert!(s.remove_file(3).is_err());
    }
}
