use std::path::Path;

use base64::Engine;
use tracing::debug;

use crate::{EncodeError, EncodedFile};

const FALLBACK_MIME: &str = "application/octet-stream";

/// Encodes raw bytes as a `data:` URL.
///
/// Fails with [`EncodeError::SizeExceeded`] when `data` is larger than
/// `max_bytes`; nothing is encoded in that case.
pub fn encode_bytes(data: &[u8], mime: &str, max_bytes: u64) -> Result<String, EncodeError> {
    let size = data.len() as u64;
    if size > max_bytes {
        return Err(EncodeError::SizeExceeded {
            size,
            limit: max_bytes,
        });
    }

    let b64 = base64::engine::general_purpose::STANDARD.encode(data);
    Ok(format!("data:{mime};base64,{b64}"))
}

/// Reads and encodes a file from disk.
///
/// The size is checked against the file metadata before any byte is read,
/// and again on the bytes actually read.
pub async fn encode_file(path: &Path, max_bytes: u64) -> Result<EncodedFile, EncodeError> {
    let size = tokio::fs::metadata(path).await?.len();
    if size > max_bytes {
        return Err(EncodeError::SizeExceeded {
            size,
            limit: max_bytes,
        });
    }

    let data = tokio::fs::read(path).await?;
    let mime = detect_mime(path);
    let data_url = encode_bytes(&data, mime, max_bytes)?;

    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    debug!(file = %file_name, size = data.len(), mime, "encoded file");

    Ok(EncodedFile {
        file_name,
        mime: mime.to_string(),
        size: data.len() as u64,
        data_url,
    })
}

/// Detects a MIME type from the file extension.
///
/// Unknown or missing extensions map to `application/octet-stream`.
pub fn detect_mime(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase());

    match ext.as_deref() {
        Some("png") => "image/png",
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("webp") => "image/webp",
        Some("gif") => "image/gif",
        Some("ico") => "image/x-icon",
        Some("zip") => "application/zip",
        Some("json") => "application/json",
        Some("txt") => "text/plain",
        _ => FALLBACK_MIME,
    }
}
