//! Turn files on disk into uploads the controller can ingest.

use stadium_sdk::{IngestError, UploadedFile};
use std::path::Path;

/// Guess a content type from the file extension, the way a browser file
/// picker would. Unknown extensions are not treated as images.
#[must_use]
pub fn content_type_for(path: &Path) -> &'static str {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase);

    match extension.as_deref() {
        Some("png") => "image/png",
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("webp") => "image/webp",
        Some("gif") => "image/gif",
        _ => "application/octet-stream",
    }
}

pub async fn load_upload(path: impl AsRef<Path>) -> Result<UploadedFile, IngestError> {
    let path = path.as_ref();
    let bytes = tokio::fs::read(path)
        .await
        .map_err(|error| IngestError::Read(format!("{}: {error}", path.display())))?;
    let name = path
        .file_name()
        .map_or_else(|| path.display().to_string(), |name| name.to_string_lossy().into_owned());

    Ok(UploadedFile::new(name, content_type_for(path), bytes))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn content_type_follows_extension() {
        assert_eq!(content_type_for(Path::new("fan.PNG")), "image/png");
        assert_eq!(content_type_for(Path::new("fan.jpeg")), "image/jpeg");
        assert_eq!(content_type_for(Path::new("fan.jpg")), "image/jpeg");
        assert_eq!(content_type_for(Path::new("fan.webp")), "image/webp");
        assert_eq!(content_type_for(Path::new("notes.txt")), "application/octet-stream");
        assert_eq!(content_type_for(Path::new("README")), "application/octet-stream");
    }

    #[tokio::test]
    async fn missing_file_is_a_read_error() {
        let err = load_upload("/nonexistent/stadium-swap/fan.png")
            .await
            .expect_err("missing file");
        assert!(matches!(err, IngestError::Read(_)));
    }
}
