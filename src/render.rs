//! Letterboxed resize of a finished flyer to its target pixel size.
//!
//! The backend renders at a model-friendly size (e.g. 1024×1536) and reports
//! the size the user actually wants (e.g. 1080×1920). The download is the
//! source scaled uniformly to fit inside the target box and centred on a
//! transparent canvas, so nothing is cropped or stretched.
//!
//! Resizing is CPU-bound and runs in `spawn_blocking` when called from the
//! async download path.

use crate::encode::encode_png;
use crate::error::FlyerError;
use image::imageops::{self, FilterType};
use image::{DynamicImage, RgbaImage};
use std::io::Write;
use std::path::Path;
use tracing::{debug, info};

/// Where the scaled source lands on the target canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DrawRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

/// Compute the centred, aspect-preserving rectangle for a source of
/// `src_w × src_h` inside a `target_w × target_h` box.
///
/// Sizes and offsets are rounded to the nearest pixel; a non-degenerate
/// source never collapses below one pixel.
pub fn fit_rect(
    src_w: u32,
    src_h: u32,
    target_w: u32,
    target_h: u32,
) -> Result<DrawRect, FlyerError> {
    if src_w == 0 || src_h == 0 {
        return Err(FlyerError::InvalidImage(format!(
            "source image has zero size ({src_w}×{src_h})"
        )));
    }
    if target_w == 0 || target_h == 0 {
        return Err(FlyerError::InvalidImage(format!(
            "target size is zero ({target_w}×{target_h})"
        )));
    }

    let scale = f64::min(
        target_w as f64 / src_w as f64,
        target_h as f64 / src_h as f64,
    );
    let width = ((src_w as f64 * scale).round() as u32).clamp(1, target_w);
    let height = ((src_h as f64 * scale).round() as u32).clamp(1, target_h);
    let x = ((target_w - width) as f64 / 2.0).round() as u32;
    let y = ((target_h - height) as f64 / 2.0).round() as u32;

    Ok(DrawRect {
        x,
        y,
        width,
        height,
    })
}

/// Render `source` letterboxed onto a transparent `target_w × target_h` canvas.
pub fn letterbox(
    source: &DynamicImage,
    target_w: u32,
    target_h: u32,
) -> Result<RgbaImage, FlyerError> {
    let rect = fit_rect(source.width(), source.height(), target_w, target_h)?;
    debug!(
        "Letterbox {}×{} → {}×{} at ({}, {}) on {}×{}",
        source.width(),
        source.height(),
        rect.width,
        rect.height,
        rect.x,
        rect.y,
        target_w,
        target_h
    );

    let scaled = imageops::resize(
        &source.to_rgba8(),
        rect.width,
        rect.height,
        FilterType::Lanczos3,
    );
    let mut canvas = RgbaImage::new(target_w, target_h);
    imageops::overlay(&mut canvas, &scaled, i64::from(rect.x), i64::from(rect.y));
    Ok(canvas)
}

/// Decode `image_bytes`, letterbox it to the target size and return PNG bytes.
pub fn resize_to_png(
    image_bytes: &[u8],
    target_w: u32,
    target_h: u32,
) -> Result<Vec<u8>, FlyerError> {
    let source = image::load_from_memory(image_bytes)
        .map_err(|e| FlyerError::InvalidImage(format!("cannot decode image: {e}")))?;
    let canvas = letterbox(&source, target_w, target_h)?;
    encode_png(&DynamicImage::ImageRgba8(canvas))
        .map_err(|e| FlyerError::InvalidImage(format!("PNG encoding failed: {e}")))
}

/// Letterbox `image_bytes` to `target_w × target_h` and save it as PNG at `path`.
///
/// Uses atomic write (temp file + rename) to prevent partial files.
pub async fn download_resized(
    image_bytes: &[u8],
    target_w: u32,
    target_h: u32,
    path: impl AsRef<Path>,
) -> Result<(), FlyerError> {
    let path = path.as_ref().to_path_buf();
    let bytes = image_bytes.to_vec();

    let png = tokio::task::spawn_blocking(move || resize_to_png(&bytes, target_w, target_h))
        .await
        .map_err(|e| FlyerError::Internal(format!("Resize task panicked: {e}")))??;

    let write_path = path.clone();
    tokio::task::spawn_blocking(move || write_atomic(&write_path, &png))
        .await
        .map_err(|e| FlyerError::Internal(format!("Write task panicked: {e}")))?
        .map_err(|source| FlyerError::OutputWriteFailed {
            path: path.clone(),
            source,
        })?;

    info!("Saved {}×{} flyer to {}", target_w, target_h, path.display());
    Ok(())
}

fn write_atomic(path: &Path, data: &[u8]) -> std::io::Result<()> {
    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(parent)?;

    let mut tmp = tempfile::NamedTempFile::new_in(parent)?;
    tmp.write_all(data)?;
    tmp.flush()?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}
