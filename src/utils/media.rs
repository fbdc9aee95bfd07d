// utils/media.rs
use base64::engine::general_purpose::STANDARD;
use base64::Engine;

use crate::models::ordermodel::MediaType;

pub const MAX_IMAGE_SIZE_MB: usize = 10;

/// Convert a locally picked media file into the representation the message
/// endpoint accepts in a single JSON request.
///
/// Images are read from disk and inlined as a base64 data URI. Videos are
/// passed through as the raw device URI: the order API has no upload
/// endpoint, so a video is only guaranteed to render on the device that
/// sent it. Until an out-of-band upload step exists, video attachments
/// must not be treated as durable.
pub fn compose_media(uri: &str, media_type: MediaType) -> Result<String, Box<dyn std::error::Error>> {
    match media_type {
        MediaType::Video => Ok(uri.to_string()),
        MediaType::Image => {
            let bytes = std::fs::read(uri)
                .map_err(|e| format!("Failed to read image {}: {}", uri, e))?;
            if bytes.len() > MAX_IMAGE_SIZE_MB * 1024 * 1024 {
                return Err(format!("Image exceeds the {}MB limit", MAX_IMAGE_SIZE_MB).into());
            }
            Ok(format!("data:{};base64,{}", image_mime(uri), STANDARD.encode(&bytes)))
        }
    }
}

fn image_mime(uri: &str) -> &'static str {
    let lower = uri.to_ascii_lowercase();
    if lower.ends_with(".png") {
        "image/png"
    } else if lower.ends_with(".gif") {
        "image/gif"
    } else if lower.ends_with(".webp") {
        "image/webp"
    } else {
        "image/jpeg"
    }
}

pub fn validate_media_size(base64_data: &str, max_size_mb: usize) -> bool {
    let clean_data = if base64_data.starts_with("data:") {
        base64_data.split(',').nth(1).unwrap_or(base64_data)
    } else {
        base64_data
    };

    let size_in_bytes = (clean_data.len() * 3) / 4; // Approximate decoded size
    size_in_bytes <= max_size_mb * 1024 * 1024
}
