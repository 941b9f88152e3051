//! Photo storage backends
//!
//! The backend is picked at startup and shared as `Arc<dyn PhotoStorage>`.

mod local;
mod supabase;

pub use local::LocalStorage;
pub use supabase::SupabaseStorage;

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::photo::PhotoUpload;

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("Storage request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Storage responded with status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Storage misconfigured: {0}")]
    Config(String),
}

#[async_trait]
pub trait PhotoStorage: Send + Sync {
    /// Store the photo under `{folder}/{uuid}.{ext}` and return its public URL.
    async fn upload(&self, photo: &PhotoUpload, folder: &str) -> Result<String, StorageError>;

    /// Remove an object by public URL. `false` when the URL does not belong
    /// to this backend or the delete failed.
    async fn delete(&self, url: &str) -> bool;

    fn name(&self) -> &'static str;
}

/// Fresh object key for an upload.
pub fn object_key(folder: &str, extension: &str) -> String {
    let folder = folder.trim_matches('/');
    if folder.is_empty() {
        format!("{}.{extension}", Uuid::new_v4())
    } else {
        format!("{folder}/{}.{extension}", Uuid::new_v4())
    }
}

/// Object key for a public URL under `prefix`, rejecting anything that could
/// escape the bucket.
pub(crate) fn key_from_url<'a>(url: &'a str, prefix: &str) -> Option<&'a str> {
    let key = url.strip_prefix(prefix)?;
    let safe = !key.is_empty()
        && !key.starts_with('/')
        && key.split('/').all(|segment| !segment.is_empty() && segment != "." && segment != "..");
    safe.then_some(key)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_object_key() {
        let key = object_key("listings", "png");
        let (folder, file) = key.split_once('/').unwrap();
        assert_eq!(folder, "listings");
        let (stem, ext) = file.rsplit_once('.').unwrap();
        assert!(Uuid::parse_str(stem).is_ok());
        assert_eq!(ext, "png");

        assert_ne!(object_key("listings", "png"), key);
        assert!(!object_key("/", "jpg").contains('/'));
    }

    #[test]
    fn test_key_from_url() {
        let prefix = "https://cdn.example/public/bucket/";
        assert_eq!(
            key_from_url("https://cdn.example/public/bucket/listings/a.jpg", prefix),
            Some("listings/a.jpg")
        );
        assert_eq!(key_from_url("https://elsewhere/a.jpg", prefix), None);
        assert_eq!(key_from_url(prefix, prefix), None);
        assert_eq!(
            key_from_url("https://cdn.example/public/bucket/../secrets", prefix),
            None
        );
        assert_eq!(
            key_from_url("https://cdn.example/public/bucket//etc/passwd", prefix),
            None
        );
    }
}
