//! Importing image files as data URLs for lesson and homework records.

use crate::error::CoreResult;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use std::path::Path;

/// Returns the media type for an image file, by extension.
#[must_use]
pub fn media_type(path: &Path) -> &'static str {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase);

    match extension.as_deref() {
        Some("png") => "image/png",
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        Some("svg") => "image/svg+xml",
        _ => "application/octet-stream",
    }
}

/// Encodes raw bytes as a `data:` URL.
#[must_use]
pub fn encode_data_url(media_type: &str, bytes: &[u8]) -> String {
    format!("data:{media_type};base64,{}", STANDARD.encode(bytes))
}

/// Reads an image file and encodes it as a `data:` URL.
///
/// # Errors
///
/// Returns an I/O error if the file cannot be read.
pub fn encode_image_file(path: impl AsRef<Path>) -> CoreResult<String> {
    let path = path.as_ref();
    let bytes = std::fs::read(path)?;
    Ok(encode_data_url(media_type(path), &bytes))
}
