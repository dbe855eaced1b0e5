//! # flyer-client
//!
//! Client for a packaging-flyer backend: collect artwork, tag panel roles,
//! have the backend compose a marketing flyer, and download it at the exact
//! pixel size of the chosen template.
//!
//! ## Workflow
//!
//! ```text
//! PDF dieline ──▶ POST /api/pdf_extract ──┐
//!                                         ├─▶ pending list ──▶ POST /api/flyer ──▶ letterboxed PNG
//! image files ──▶ role inference ─────────┘   (edit roles,      (selection +
//!                                              remove items)     style notes)
//! ```
//!
//! 1. [`input`]     picked files with extension-derived MIME types
//! 2. [`role`]      guess each image's packaging face from its filename
//! 3. [`pending`]   ordered list of tagged artwork, in submission order
//! 4. [`selection`] template, shape, sector, platform and pose
//! 5. [`backend`]   the two JSON endpoints, behind the [`FlyerBackend`] trait
//! 6. [`render`]    aspect-preserving resize to the template's target size
//!
//! [`FlyerSession`] ties these together and keeps the state a user edits.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use flyer_client::{ClientConfig, FlyerSession, InputFile, Template};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ClientConfig::builder()
//!         .base_url("http://localhost:5000")
//!         .build()?;
//!     let mut session = FlyerSession::new(config)?;
//!
//!     session.extract_pdf_panels(&InputFile::open("dieline.pdf")?).await?;
//!     session
//!         .add_images(&[InputFile::open("bottle_front.png")?])
//!         .await?;
//!     session.set_template(Template::Story);
//!
//!     let name = session.generate_flyer().await?.download_name.clone();
//!     session.download_result(&name).await?;
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `flyer` binary (clap + anyhow + tracing-subscriber + indicatif) |
//!
//! Disable `cli` when using only the library:
//! ```toml
//! flyer-client = { version = "0.1", default-features = false }
//! ```

// ── Modules ──────────────────────────────────────────────────────────────

pub mod backend;
pub mod config;
pub mod encode;
pub mod error;
pub mod input;
pub mod pending;
pub mod progress;
pub mod render;
pub mod role;
pub mod selection;
pub mod session;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use backend::{Endpoint, FlyerBackend, HttpBackend};
pub use config::{ClientConfig, ClientConfigBuilder};
pub use error::{FileError, FlyerError};
pub use input::InputFile;
pub use pending::{PendingFile, PendingFiles, Preview};
pub use progress::{Control, ControlState, NoopObserver, SessionObserver, StatusArea};
pub use render::{download_resized, fit_rect, DrawRect};
pub use role::{infer_role, PanelRole};
pub use selection::{Platform, Pose, SelectionState, Sector, Shape, Template};
pub use session::{AddImagesReport, ExtractOutcome, FlyerResult, FlyerSession};
