//! Image embedding: upload limits and `data:` URI encoding.
//!
//! Images are never sent to object storage. Uploaded files and generated
//! images are both embedded as a `data:` URI and stored verbatim in the
//! project's `image` field, so the size cap keeps documents small.

use base64::engine::general_purpose;
use base64::Engine;
use image::ImageFormat;

use crate::error::CoreError;
use crate::notice;

/// Largest accepted upload (100 KB).
pub const MAX_UPLOAD_BYTES: usize = 100 * 1024;

/// MIME type of images returned by the image generator.
pub const GENERATED_IMAGE_MIME: &str = "image/png";

/// Encode an uploaded image file as a `data:` URI.
///
/// Rejects files above [`MAX_UPLOAD_BYTES`] and anything whose magic bytes
/// are not a supported image format.
pub fn encode_upload(bytes: &[u8]) -> Result<String, CoreError> {
    if bytes.len() > MAX_UPLOAD_BYTES {
        return Err(CoreError::Validation(notice::IMAGE_TOO_LARGE.into()));
    }
    let mime = sniff_mime(bytes)?;
    Ok(data_uri(mime, bytes))
}

/// Wrap an already base64-encoded generated image as a `data:` URI.
pub fn generated_image_uri(base64_payload: &str) -> String {
    format!("data:{GENERATED_IMAGE_MIME};base64,{base64_payload}")
}

/// Build a `data:` URI from raw bytes.
pub fn data_uri(mime: &str, bytes: &[u8]) -> String {
    format!("data:{mime};base64,{}", general_purpose::STANDARD.encode(bytes))
}

pub fn is_data_uri(value: &str) -> bool {
    value.starts_with("data:")
}

fn sniff_mime(bytes: &[u8]) -> Result<&'static str, CoreError> {
    let format = image::guess_format(bytes)
        .map_err(|_| CoreError::Validation(notice::IMAGE_UNSUPPORTED.into()))?;
    match format {
        ImageFormat::Png => Ok("image/png"),
        ImageFormat::Jpeg => Ok("image/jpeg"),
        ImageFormat::WebP => Ok("image/webp"),
        ImageFormat::Gif => Ok("image/gif"),
        _ => Err(CoreError::Validation(notice::IMAGE_UNSUPPORTED.into())),
    }
}
