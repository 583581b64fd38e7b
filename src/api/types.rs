// src/api/types.rs
// =============================================================================
// The shapes that travel between the editor and the business API.
//
// - Profile / LinkRecord: what the server sends back (authoritative)
// - ProfilePayload / LinkPayload: what we send when saving
// - LogoChange: the pending asset operation, sent as multipart on its own
// - BusinessPath: a validated slug, the identity of a profile
// =============================================================================

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use thiserror::Error;

use crate::platform::Platform;

/// Longest path the server accepts.
pub const MAX_PATH_LEN: usize = 50;

/// A business profile as the server returns it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    #[serde(default)]
    pub id: Option<u64>,
    pub path: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Absolute URL of the uploaded logo, if any
    #[serde(default)]
    pub logo: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub links: Vec<LinkRecord>,
}

/// One persisted link. `order` is the server's position for it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkRecord {
    #[serde(default)]
    pub id: Option<u64>,
    #[serde(default)]
    pub title: String,
    pub url: String,
    #[serde(default)]
    pub icon_type: Platform,
    #[serde(default)]
    pub order: u32,
}

/// Body of the create / full-replace request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProfilePayload {
    pub path: String,
    pub name: String,
    pub description: String,
    pub links: Vec<LinkPayload>,
}

/// A link as it is submitted: normalized, classified and positioned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LinkPayload {
    pub title: String,
    pub url: String,
    pub icon_type: Platform,
    pub order: u32,
}

/// A logo change waiting to be sent after the profile itself is saved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogoChange {
    Upload(LogoFile),
    Remove,
}

/// An image read from disk, ready for the multipart upload.
#[derive(Clone, PartialEq, Eq)]
pub struct LogoFile {
    pub file_name: String,
    pub mime: &'static str,
    pub bytes: Vec<u8>,
}

// Raw image bytes are noise in debug output
impl fmt::Debug for LogoFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LogoFile")
            .field("file_name", &self.file_name)
            .field("mime", &self.mime)
            .field("len", &self.bytes.len())
            .finish()
    }
}

#[derive(Debug, Error)]
pub enum LogoError {
    #[error("'{0}' is not an image (expected png, jpg, gif, webp or svg)")]
    NotAnImage(String),
    #[error("could not read logo file '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

impl LogoFile {
    /// Reads an image from disk. Only image types are accepted, judged by
    /// extension, the same way the upload field only takes `image/*`.
    pub async fn from_path(path: &Path) -> Result<Self, LogoError> {
        let display = path.display().to_string();
        let mime = path
            .extension()
            .and_then(|ext| ext.to_str())
            .and_then(image_mime)
            .ok_or_else(|| LogoError::NotAnImage(display.clone()))?;

        let bytes = tokio::fs::read(path).await.map_err(|source| LogoError::Io {
            path: display.clone(),
            source,
        })?;

        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "logo".to_string());

        Ok(LogoFile { file_name, mime, bytes })
    }
}

fn image_mime(extension: &str) -> Option<&'static str> {
    match extension.to_ascii_lowercase().as_str() {
        "png" => Some("image/png"),
        "jpg" | "jpeg" => Some("image/jpeg"),
        "gif" => Some("image/gif"),
        "webp" => Some("image/webp"),
        "svg" => Some("image/svg+xml"),
        _ => None,
    }
}

/// A validated business path: lowercase ascii letters, digits, `-` and `_`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BusinessPath(String);

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PathError {
    #[error("path is empty")]
    Empty,
    #[error("path is longer than {} characters", MAX_PATH_LEN)]
    TooLong,
}

impl BusinessPath {
    /// Sanitizes `raw` the way the path field does while typing, then
    /// checks what is left.
    pub fn parse(raw: &str) -> Result<Self, PathError> {
        let clean = sanitize_path(raw);
        if clean.is_empty() {
            return Err(PathError::Empty);
        }
        if clean.len() > MAX_PATH_LEN {
            return Err(PathError::TooLong);
        }
        Ok(BusinessPath(clean))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BusinessPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Lowercases and drops every character that cannot appear in a path.
pub fn sanitize_path(raw: &str) -> String {
    raw.to_lowercase()
        .chars()
        .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || *c == '-' || *c == '_')
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_path() {
        assert_eq!(sanitize_path("My Brand!"), "mybrand");
        assert_eq!(sanitize_path("coffee_shop-42"), "coffee_shop-42");
        assert_eq!(sanitize_path("Ёлка"), "");
    }

    #[test]
    fn test_business_path_parse() {
        assert_eq!(BusinessPath::parse("MyBrand").unwrap().as_str(), "mybrand");
        assert_eq!(BusinessPath::parse("!!!"), Err(PathError::Empty));
        assert_eq!(BusinessPath::parse(&"a".repeat(51)), Err(PathError::TooLong));
        assert!(BusinessPath::parse(&"a".repeat(50)).is_ok());
    }

    #[test]
    fn test_profile_from_server_json() {
        let json = r#"{
            "id": 7,
            "path": "mybrand",
            "name": "My Brand",
            "description": "",
            "logo": null,
            "created_at": "2024-05-01T10:00:00Z",
            "links": [
                {"id": 3, "title": "Chat", "url": "tel:+998901234567", "icon_type": "telegram_number", "order": 1},
                {"id": 2, "title": "Shop", "url": "https://t.me/shop", "icon_type": "telegram", "order": 0}
            ]
        }"#;

        let profile: Profile = serde_json::from_str(json).unwrap();
        assert_eq!(profile.path, "mybrand");
        assert_eq!(profile.links.len(), 2);
        assert_eq!(profile.links[0].icon_type, Platform::Website);
        assert_eq!(profile.links[1].icon_type, Platform::Telegram);
    }

    #[test]
    fn test_payload_serializes_wire_tags() {
        let payload = ProfilePayload {
            path: "mybrand".to_string(),
            name: "My Brand".to_string(),
            description: String::new(),
            links: vec![LinkPayload {
                title: "Map".to_string(),
                url: "https://maps.app.goo.gl/x".to_string(),
                icon_type: Platform::GoogleMap,
                order: 0,
            }],
        };

        let value = serde_json::to_value(&payload).unwrap();
        assert_eq!(value["links"][0]["icon_type"], "google_map");
        assert_eq!(value["links"][0]["order"], 0);
    }

    #[tokio::test]
    async fn test_logo_rejects_non_images() {
        let result = LogoFile::from_path(Path::new("notes.txt")).await;
        assert!(matches!(result, Err(LogoError::NotAnImage(_))));
    }
}
