//! Turns raw image files into [`ImagePayload`]s and back.

use crate::{
    error::{RestyleError, Result},
    models::{ImagePayload, MediaType},
};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use std::path::Path;

pub fn encode(bytes: &[u8], media_type: &str) -> Result<ImagePayload> {
    let media_type: MediaType = media_type
        .parse()
        .map_err(|e: RestyleError| RestyleError::Encoding(e.to_string()))?;

    if bytes.is_empty() {
        return Err(RestyleError::Encoding("input is empty".into()));
    }

    Ok(ImagePayload::new(STANDARD.encode(bytes), media_type))
}

/// Reads `path` once and encodes it, taking the media type from the extension.
pub fn encode_file(path: impl AsRef<Path>) -> Result<ImagePayload> {
    let path = path.as_ref();

    let declared = mime_guess::from_path(path).first().ok_or_else(|| {
        RestyleError::Encoding(format!("cannot determine the type of {}", path.display()))
    })?;

    let bytes = std::fs::read(path)
        .map_err(|e| RestyleError::Encoding(format!("failed to read {}: {}", path.display(), e)))?;

    log::debug!(
        "Encoding {} ({}, {} bytes)",
        path.display(),
        declared.essence_str(),
        bytes.len()
    );

    encode(&bytes, declared.essence_str())
}

/// Parses `data:<type>;base64,<payload>`.
pub fn from_data_url(url: &str) -> Result<ImagePayload> {
    let rest = url
        .strip_prefix("data:")
        .ok_or_else(|| RestyleError::Encoding("not a data URL".into()))?;

    let (meta, payload) = rest.split_once(',').ok_or_else(|| {
        RestyleError::Encoding("missing separator between metadata and payload".into())
    })?;

    let media_type = meta
        .strip_suffix(";base64")
        .ok_or_else(|| RestyleError::Encoding("data URL is not base64 encoded".into()))?;

    if payload.is_empty() {
        return Err(RestyleError::Encoding("data URL has no payload".into()));
    }

    let media_type: MediaType = media_type
        .parse()
        .map_err(|e: RestyleError| RestyleError::Encoding(e.to_string()))?;

    Ok(ImagePayload::new(payload, media_type))
}

pub fn to_data_url(image: &ImagePayload) -> String {
    format!("data:{};base64,{}", image.media_type, image.data)
}

pub fn decode(image: &ImagePayload) -> Result<Vec<u8>> {
    STANDARD
        .decode(image.data.as_bytes())
        .map_err(|e| RestyleError::Encoding(format!("invalid base64 data: {}", e)))
}
