use crate::error::{RestyleError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MediaType {
    #[serde(rename = "image/png")]
    Png,
    #[serde(rename = "image/jpeg")]
    Jpeg,
    #[serde(rename = "image/webp")]
    Webp,
}

impl MediaType {
    pub const ALL: [MediaType; 3] = [MediaType::Png, MediaType::Jpeg, MediaType::Webp];

    pub fn as_str(&self) -> &'static str {
        match self {
            MediaType::Png => "image/png",
            MediaType::Jpeg => "image/jpeg",
            MediaType::Webp => "image/webp",
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            MediaType::Png => "png",
            MediaType::Jpeg => "jpg",
            MediaType::Webp => "webp",
        }
    }

    /// Comma separated list of the accepted media types, for error messages.
    pub fn accepted() -> String {
        Self::ALL
            .iter()
            .map(|m| m.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl FromStr for MediaType {
    type Err = RestyleError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "image/png" => Ok(MediaType::Png),
            "image/jpeg" | "image/jpg" => Ok(MediaType::Jpeg),
            "image/webp" => Ok(MediaType::Webp),
            other => Err(RestyleError::Validation(format!(
                "Unsupported mimeType '{}'; expected one of: {}",
                other,
                Self::accepted()
            ))),
        }
    }
}

impl fmt::Display for MediaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Base64 image data together with its declared media type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImagePayload {
    pub data: String,
    pub media_type: MediaType,
}

impl ImagePayload {
    pub fn new(data: impl Into<String>, media_type: MediaType) -> Self {
        Self {
            data: data.into(),
            media_type,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}
