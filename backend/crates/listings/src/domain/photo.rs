//! Photo upload validation
//!
//! Checks applied to every file before anything is stored.

use std::fmt;
use std::path::Path;

/// Accepted file extensions (lower-case, without the dot)
pub const ALLOWED_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif", "webp"];

/// Used when the client sends no file name
const FALLBACK_EXTENSION: &str = "jpg";

/// A file received from the client, fully buffered.
#[derive(Clone)]
pub struct PhotoUpload {
    pub filename: Option<String>,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

impl fmt::Debug for PhotoUpload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PhotoUpload")
            .field("filename", &self.filename)
            .field("content_type", &self.content_type)
            .field("size", &self.bytes.len())
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PhotoError {
    #[error("Photo is empty")]
    Empty,

    #[error("Invalid file type '{extension}'. Allowed types: jpg, jpeg, png, gif, webp")]
    UnsupportedType { extension: String },

    #[error("Photo is too large ({size} bytes, maximum {max} bytes)")]
    TooLarge { size: usize, max: usize },
}

impl PhotoUpload {
    /// Lower-case extension without the dot. Files without a name are
    /// treated as JPEG; named files without an extension yield `""`.
    pub fn extension(&self) -> String {
        match &self.filename {
            None => FALLBACK_EXTENSION.to_string(),
            Some(name) => Path::new(name)
                .extension()
                .and_then(|ext| ext.to_str())
                .map(str::to_ascii_lowercase)
                .unwrap_or_default(),
        }
    }

    /// MIME type derived from the extension; the client's value is only
    /// used as a fallback.
    pub fn mime_type(&self) -> &str {
        match self.extension().as_str() {
            "jpg" | "jpeg" => "image/jpeg",
            "png" => "image/png",
            "gif" => "image/gif",
            "webp" => "image/webp",
            _ => self.content_type.as_deref().unwrap_or("application/octet-stream"),
        }
    }

    pub fn size(&self) -> usize {
        self.bytes.len()
    }

    pub fn validate(&self, max_bytes: usize) -> Result<(), PhotoError> {
        let extension = self.extension();
        if !ALLOWED_EXTENSIONS.contains(&extension.as_str()) {
            return Err(PhotoError::UnsupportedType { extension });
        }
        if self.bytes.is_empty() {
            return Err(PhotoError::Empty);
        }
        if self.bytes.len() > max_bytes {
            return Err(PhotoError::TooLarge {
                size: self.bytes.len(),
                max: max_bytes,
            });
        }
        Ok(())
    }
}
