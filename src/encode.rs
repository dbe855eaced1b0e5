//! base64 helpers for the JSON wire format.
//!
//! The backend exchanges every file as standard (padded) base64 inside the
//! JSON body. Previews of server-side panels are kept as `data:` URIs.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use image::DynamicImage;
use std::io::Cursor;
use tracing::debug;

/// Encode raw bytes as standard base64.
pub fn to_base64(bytes: &[u8]) -> String {
    let b64 = STANDARD.encode(bytes);
    debug!("Encoded {} bytes → {} bytes base64", bytes.len(), b64.len());
    b64
}

/// Decode standard base64, ignoring surrounding whitespace.
pub fn from_base64(b64: &str) -> Result<Vec<u8>, base64::DecodeError> {
    STANDARD.decode(b64.trim())
}

/// Wrap base64 data in a `data:{mime};base64,…` URI.
pub fn data_uri(mime: &str, b64: &str) -> String {
    format!("data:{mime};base64,{b64}")
}

/// Wrap base64 PNG data in a `data:image/png;base64,…` URI.
pub fn png_data_uri(b64: &str) -> String {
    data_uri("image/png", b64)
}

/// Encode an image as PNG bytes.
pub fn encode_png(img: &DynamicImage) -> Result<Vec<u8>, image::ImageError> {
    let mut buf = Vec::new();
    img.write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)?;
    Ok(buf)
}
