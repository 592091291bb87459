use crate::{ImagePayload, IngestError, IngestResult};
use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD as BASE64_STANDARD, Engine};
use std::sync::Arc;
use tracing::debug;

/// Largest accepted upload, inclusive: 5 MiB.
pub const MAX_UPLOAD_BYTES: u64 = 5 * 1024 * 1024;

/// Types a file picker should offer. Validation itself accepts any `image/*`.
pub const ACCEPTED_MIME_TYPES: [&str; 3] = ["image/png", "image/jpeg", "image/webp"];

/// A file handed over by the user, with the content type declared by the
/// platform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedFile {
    pub name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl UploadedFile {
    pub fn new(
        name: impl Into<String>,
        content_type: impl Into<String>,
        bytes: impl Into<Vec<u8>>,
    ) -> Self {
        Self {
            name: name.into(),
            content_type: content_type.into(),
            bytes: bytes.into(),
        }
    }

    #[must_use]
    pub fn size(&self) -> u64 {
        self.bytes.len() as u64
    }
}

/// Asynchronous file-reading capability provided by the platform.
#[async_trait]
pub trait FileReader: Send + Sync {
    /// Read the file as a `data:<mimeType>;base64,<data>` URL.
    async fn read_as_data_url(&self, file: &UploadedFile) -> IngestResult<String>;
}

/// Reads files that are already in memory.
#[derive(Debug, Clone, Copy, Default)]
pub struct InMemoryFileReader;

#[async_trait]
impl FileReader for InMemoryFileReader {
    async fn read_as_data_url(&self, file: &UploadedFile) -> IngestResult<String> {
        Ok(format!(
            "data:{};base64,{}",
            file.content_type,
            BASE64_STANDARD.encode(&file.bytes)
        ))
    }
}

#[derive(Debug, Clone)]
pub struct IngestOptions {
    /// Inclusive size limit in bytes.
    pub max_bytes: u64,
}

impl Default for IngestOptions {
    fn default() -> Self {
        Self {
            max_bytes: MAX_UPLOAD_BYTES,
        }
    }
}

/// Validates user files and turns them into [`ImagePayload`]s.
#[derive(Clone)]
pub struct ImageIngestor {
    options: IngestOptions,
    reader: Arc<dyn FileReader>,
}

impl Default for ImageIngestor {
    fn default() -> Self {
        Self::new(IngestOptions::default())
    }
}

impl ImageIngestor {
    #[must_use]
    pub fn new(options: IngestOptions) -> Self {
        Self {
            options,
            reader: Arc::new(InMemoryFileReader),
        }
    }

    #[must_use]
    pub fn with_reader(mut self, reader: Arc<dyn FileReader>) -> Self {
        self.reader = reader;
        self
    }

    /// Check the declared type and size without reading the file.
    pub fn validate(&self, file: &UploadedFile) -> IngestResult<()> {
        if !file.content_type.starts_with("image/") {
            return Err(IngestError::NotAnImage(file.content_type.clone()));
        }
        if file.size() > self.options.max_bytes {
            return Err(IngestError::TooLarge {
                size: file.size(),
                max: self.options.max_bytes,
            });
        }
        Ok(())
    }

    pub async fn ingest(&self, file: &UploadedFile) -> IngestResult<ImagePayload> {
        self.validate(file)?;
        let data_url = self.reader.read_as_data_url(file).await?;
        let payload = parse_data_url(&data_url)?;
        debug!(
            name = %file.name,
            mime_type = %payload.mime_type,
            size = file.size(),
            "ingested image"
        );
        Ok(payload)
    }
}

/// Split a `data:<mimeType>;base64,<data>` URL. Both the MIME type and the
/// data must be non-empty and on a single line.
pub fn parse_data_url(url: &str) -> IngestResult<ImagePayload> {
    let malformed = || IngestError::Decode("expected data:<mimeType>;base64,<data>".to_string());

    if url.contains('\n') || url.contains('\r') {
        return Err(malformed());
    }
    let rest = url.strip_prefix("data:").ok_or_else(malformed)?;
    let (mime_type, data) = rest.rsplit_once(";base64,").ok_or_else(malformed)?;
    if mime_type.is_empty() || data.is_empty() {
        return Err(malformed());
    }

    Ok(ImagePayload::new(data, mime_type))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_data_url_splits_mime_type_and_data() {
        let payload = parse_data_url("data:image/png;base64,iVBORw0KGgo=").unwrap();
        assert_eq!(payload, ImagePayload::new("iVBORw0KGgo=", "image/png"));
    }

    #[test]
    fn parse_data_url_rejects_missing_parts() {
        for url in [
            "image/png;base64,abc",
            "data:;base64,abc",
            "data:image/png;base64,",
            "data:image/png,abc",
            "data:image/png;base64,ab\ncd",
        ] {
            assert!(
                matches!(parse_data_url(url), Err(IngestError::Decode(_))),
                "{url} should be rejected"
            );
        }
    }

    #[test]
    fn validate_checks_type_before_size() {
        let ingestor = ImageIngestor::new(IngestOptions { max_bytes: 1 });
        let file = UploadedFile::new("notes.txt", "text/plain", vec![0; 4]);
        assert!(matches!(
            ingestor.validate(&file),
            Err(IngestError::NotAnImage(t)) if t == "text/plain"
        ));
    }
}
