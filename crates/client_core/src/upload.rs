use std::{path::Path, sync::Arc};

use anyhow::{anyhow, Context, Result};

/// A single selected file, ready to be posted to the classifier.
///
/// The payload is shared, so cloning a request never copies the image bytes.
#[derive(Debug, Clone)]
pub struct UploadRequest {
    filename: String,
    bytes: Arc<[u8]>,
}

impl UploadRequest {
    pub fn new(filename: impl Into<String>, bytes: impl Into<Arc<[u8]>>) -> Self {
        Self {
            filename: filename.into(),
            bytes: bytes.into(),
        }
    }

    pub async fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let filename = path
            .file_name()
            .and_then(|name| name.to_str())
            .map(str::to_string)
            .ok_or_else(|| anyhow!("'{}' does not name a file", path.display()))?;
        let bytes = tokio::fs::read(path)
            .await
            .with_context(|| format!("failed to read image '{}'", path.display()))?;
        Ok(Self::new(filename, bytes))
    }

    pub fn filename(&self) -> &str {
        &self.filename
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn mime_type(&self) -> String {
        mime_guess::from_path(&self.filename)
            .first_or_octet_stream()
            .essence_str()
            .to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn guesses_mime_type_from_filename() {
        assert_eq!(UploadRequest::new("cell.png", vec![1u8]).mime_type(), "image/png");
        assert_eq!(UploadRequest::new("cell.JPG", vec![1u8]).mime_type(), "image/jpeg");
        assert_eq!(
            UploadRequest::new("cell", vec![1u8]).mime_type(),
            "application/octet-stream"
        );
    }

    #[tokio::test]
    async fn reads_file_name_and_bytes_from_disk() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("smear.png");
        std::fs::write(&path, b"png-bytes").expect("write");

        let upload = UploadRequest::from_path(&path).await.expect("load");
        assert_eq!(upload.filename(), "smear.png");
        assert_eq!(upload.bytes(), b"png-bytes");
        assert_eq!(upload.len(), 9);
    }

    #[tokio::test]
    async fn missing_file_reports_path() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("absent.png");

        let err = UploadRequest::from_path(&path).await.expect_err("must fail");
        assert!(err.to_string().contains("absent.png"), "unexpected error: {err}");
    }
}
