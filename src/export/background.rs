//! Resolving a template's background reference to image bytes.

use std::path::{Path, PathBuf};

use super::ExportError;
use crate::media::DataUrl;

/// Loads the bytes behind a `backgroundImage` reference.
pub trait ImageLoader: Send + Sync {
    fn load(&self, reference: &str) -> Result<Vec<u8>, ExportError>;
}

/// Accepts data URLs only.
#[derive(Debug, Clone, Copy, Default)]
pub struct DataUrlLoader;

impl ImageLoader for DataUrlLoader {
    fn load(&self, reference: &str) -> Result<Vec<u8>, ExportError> {
        DataUrl::parse(reference)
            .map(|url| url.data)
            .map_err(|e| ExportError::Background(e.to_string()))
    }
}

/// Accepts data URLs and upload URLs (`/api/uploads/<name>`) served from a directory.
#[derive(Debug, Clone)]
pub struct UploadDirLoader {
    dir: PathBuf,
    url_prefix: String,
}

impl UploadDirLoader {
    pub const DEFAULT_PREFIX: &'static str = "/api/uploads/";

    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            url_prefix: Self::DEFAULT_PREFIX.to_string(),
        }
    }

    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.url_prefix = prefix.into();
        self
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Map an upload URL onto a file in the directory.
    ///
    /// Only a bare file name is accepted after the prefix, so a reference
    /// can never reach outside the upload directory.
    fn resolve(&self, reference: &str) -> Option<PathBuf> {
        let name = reference.strip_prefix(&self.url_prefix)?;
        let name = name.split(['?', '#']).next()?;
        let valid = !name.is_empty()
            && name != "."
            && name != ".."
            && !name.contains(['/', '\\']);
        valid.then(|| self.dir.join(name))
    }
}

impl ImageLoader for UploadDirLoader {
    fn load(&self, reference: &str) -> Result<Vec<u8>, ExportError> {
        if DataUrl::is_data_url(reference) {
            return DataUrlLoader.load(reference);
        }
        let path = self.resolve(reference).ok_or_else(|| {
            ExportError::Background(format!("unsupported image reference {reference:?}"))
        })?;
        std::fs::read(&path).map_err(|e| {
            ExportError::Background(format!("{}: {}", path.display(), e))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upload_dir_loader_reads_uploads() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("image-1-2.png"), b"png bytes").unwrap();
        let loader = UploadDirLoader::new(dir.path());
        assert_eq!(loader.load("/api/uploads/image-1-2.png").unwrap(), b"png bytes");
    }

    #[test]
    fn test_upload_dir_loader_rejects_traversal() {
        let dir = tempfile::tempdir().unwrap();
        let loader = UploadDirLoader::new(dir.path());
        for reference in ["/api/uploads/../secret", "/api/uploads/a/b.png", "/other/x.png"] {
            assert!(matches!(
                loader.load(reference),
                Err(ExportError::Background(_))
            ));
        }
    }

    #[test]
    fn test_data_url_loader() {
        let url = DataUrl::encode("image/png", b"abc");
        assert_eq!(DataUrlLoader.load(&url).unwrap(), b"abc");
        assert!(DataUrlLoader.load("/api/uploads/x.png").is_err());
    }
}
