use std::io::Cursor;

use image::{ImageFormat, ImageReader};

/// Maximum accepted upload size in bytes (2MB).
pub const MAX_FILE_SIZE: usize = 2 * 1024 * 1024;

pub const ALLOWED_FORMATS: &[ImageFormat] = &[
    ImageFormat::Jpeg,
    ImageFormat::Png,
    ImageFormat::Gif,
    ImageFormat::WebP,
];

/// Detect the image format from magic bytes and check it's one we accept.
/// Returns the mime type to store alongside the blob.
pub fn sniff_image(data: &[u8]) -> Result<&'static str, String> {
    if data.is_empty() {
        return Err("File is empty".to_string());
    }

    if data.len() > MAX_FILE_SIZE {
        return Err(format!(
            "File too large. Maximum size is {} bytes",
            MAX_FILE_SIZE
        ));
    }

    let reader = ImageReader::new(Cursor::new(data))
        .with_guessed_format()
        .map_err(|e| format!("Failed to read image: {}", e))?;

    let format = reader
        .format()
        .ok_or_else(|| "Could not detect image format".to_string())?;

    if !ALLOWED_FORMATS.contains(&format) {
        return Err(format!(
            "Unsupported image format: {:?}. Allowed: JPEG, PNG, GIF, WebP",
            format
        ));
    }

    Ok(format.to_mime_type())
}

/// Keep only the final path component and characters that are safe in a
/// Content-Disposition header.
pub fn sanitize_filename(name: &str) -> String {
    let base = name.rsplit(['/', '\\']).next().unwrap_or_default();
    let cleaned: String = base
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_'))
        .take(255)
        .collect();

    if cleaned.is_empty() || cleaned.chars().all(|c| c == '.') {
        "upload".to_string()
    } else {
        cleaned
    }
}
