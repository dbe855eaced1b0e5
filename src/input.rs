//! Picked input files: where the bytes live and what type they claim to be.
//!
//! Like a browser `File`, an [`InputFile`] carries a name, a size and a MIME
//! type derived from the filename extension. Bytes are read lazily so that
//! type and size checks can reject a file before it is loaded.

use crate::error::FlyerError;
use image::ImageFormat;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::debug;

/// MIME type reported for PDF files.
pub const PDF_MIME: &str = "application/pdf";

/// MIME type reported when the extension is not recognised.
pub const UNKNOWN_MIME: &str = "application/octet-stream";

/// Where an input file's bytes come from.
#[derive(Debug, Clone)]
pub enum FileSource {
    /// A file on the local file system.
    Path(PathBuf),
    /// Bytes already in memory (tests, embedding applications).
    Memory(Arc<[u8]>),
}

/// A user-picked file.
#[derive(Debug, Clone)]
pub struct InputFile {
    name: String,
    mime: String,
    size: u64,
    source: FileSource,
}

impl InputFile {
    /// Open a local file, validating that it exists and is readable.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, FlyerError> {
        let path = path.as_ref().to_path_buf();

        if !path.exists() {
            return Err(FlyerError::FileNotFound { path });
        }

        let size = match std::fs::File::open(&path).and_then(|f| f.metadata()) {
            Ok(meta) if meta.is_file() => meta.len(),
            Ok(_) => return Err(FlyerError::FileNotFound { path }),
            Err(e) if e.kind() == std::io::ErrorKind::PermissionDenied => {
                return Err(FlyerError::PermissionDenied { path });
            }
            Err(_) => return Err(FlyerError::FileNotFound { path }),
        };

        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let mime = mime_from_name(&name).to_string();
        debug!("Opened {} ({}, {} bytes)", path.display(), mime, size);

        Ok(Self {
            name,
            mime,
            size,
            source: FileSource::Path(path),
        })
    }

    /// Wrap in-memory bytes under the given filename.
    pub fn from_bytes(name: impl Into<String>, bytes: impl Into<Arc<[u8]>>) -> Self {
        let name = name.into();
        let bytes: Arc<[u8]> = bytes.into();
        Self {
            mime: mime_from_name(&name).to_string(),
            size: bytes.len() as u64,
            name,
            source: FileSource::Memory(bytes),
        }
    }

    /// Override the extension-derived MIME type.
    pub fn with_mime(mut self, mime: impl Into<String>) -> Self {
        self.mime = mime.into();
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn mime(&self) -> &str {
        &self.mime
    }

    pub fn size(&self) -> u64 {
        self.size
    }

    pub fn source(&self) -> &FileSource {
        &self.source
    }

    /// Local path, if the file lives on disk.
    pub fn path(&self) -> Option<&Path> {
        match &self.source {
            FileSource::Path(p) => Some(p),
            FileSource::Memory(_) => None,
        }
    }

    pub fn is_pdf(&self) -> bool {
        self.mime == PDF_MIME
    }

    pub fn is_image(&self) -> bool {
        self.mime.starts_with("image/")
    }

    /// Load the file's bytes.
    pub async fn read(&self) -> std::io::Result<Vec<u8>> {
        match &self.source {
            FileSource::Path(p) => tokio::fs::read(p).await,
            FileSource::Memory(bytes) => Ok(bytes.to_vec()),
        }
    }

    /// Load the file's bytes, mapping I/O failures to [`FlyerError`].
    pub async fn load(&self) -> Result<Vec<u8>, FlyerError> {
        self.read().await.map_err(|e| {
            let path = self
                .path()
                .map(Path::to_path_buf)
                .unwrap_or_else(|| PathBuf::from(&self.name));
            match e.kind() {
                std::io::ErrorKind::NotFound => FlyerError::FileNotFound { path },
                std::io::ErrorKind::PermissionDenied => FlyerError::PermissionDenied { path },
                _ => FlyerError::Internal(format!("reading '{}' failed: {}", path.display(), e)),
            }
        })
    }
}

/// MIME type for a filename, judged by its extension only.
pub fn mime_from_name(name: &str) -> &'static str {
    let Some(ext) = Path::new(name).extension().and_then(|e| e.to_str()) else {
        return UNKNOWN_MIME;
    };
    let ext = ext.to_ascii_lowercase();
    match ext.as_str() {
        "pdf" => PDF_MIME,
        "svg" => "image/svg+xml",
        "heic" => "image/heic",
        "heif" => "image/heif",
        _ => ImageFormat::from_extension(&ext)
            .map(|f| f.to_mime_type())
            .unwrap_or(UNKNOWN_MIME),
    }
}
