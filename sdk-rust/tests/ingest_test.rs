mod common;
use crate::common::fake_gemini::RED_PIXEL_PNG;
use base64::{engine::general_purpose::STANDARD as BASE64_STANDARD, Engine};
use stadium_sdk::*;
use std::sync::Arc;

fn png_bytes() -> Vec<u8> {
    BASE64_STANDARD.decode(RED_PIXEL_PNG).expect("fixture is base64")
}

#[tokio::test]
async fn ingest_small_png_yields_payload() {
    let file = UploadedFile::new("test-fan.png", "image/png", png_bytes());

    let payload = ImageIngestor::default()
        .ingest(&file)
        .await
        .expect("png is accepted");

    assert_eq!(payload, ImagePayload::new(RED_PIXEL_PNG, "image/png"));
    assert_eq!(
        payload.data_url(),
        format!("data:image/png;base64,{RED_PIXEL_PNG}")
    );
}

#[tokio::test]
async fn ingest_rejects_non_image_content_types() {
    let ingestor = ImageIngestor::default();
    for content_type in ["text/plain", "application/pdf", "", "video/mp4", "IMAGE/PNG"] {
        let file = UploadedFile::new("file", content_type, png_bytes());
        let err = ingestor
            .ingest(&file)
            .await
            .expect_err("non-image must be rejected");
        assert!(
            matches!(err, IngestError::NotAnImage(ref t) if t == content_type),
            "{content_type}: {err:?}"
        );
    }
}

#[tokio::test]
async fn size_limit_is_inclusive_at_five_mebibytes() {
    let ingestor = ImageIngestor::default();
    let limit = usize::try_from(MAX_UPLOAD_BYTES).expect("fits usize");
    assert_eq!(limit, 5 * 1024 * 1024);

    let at_limit = UploadedFile::new("big.jpg", "image/jpeg", vec![0u8; limit]);
    let payload = ingestor
        .ingest(&at_limit)
        .await
        .expect("exactly 5 MiB passes");
    assert_eq!(payload.mime_type, "image/jpeg");

    let over_limit = UploadedFile::new("bigger.jpg", "image/jpeg", vec![0u8; limit + 1]);
    let err = ingestor
        .ingest(&over_limit)
        .await
        .expect_err("one byte over fails");
    match err {
        IngestError::TooLarge { size, max } => {
            assert_eq!(size, MAX_UPLOAD_BYTES + 1);
            assert_eq!(max, MAX_UPLOAD_BYTES);
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

struct BrokenReader;

#[async_trait::async_trait]
impl FileReader for BrokenReader {
    async fn read_as_data_url(&self, _file: &UploadedFile) -> IngestResult<String> {
        Ok("not a data url".to_string())
    }
}

#[tokio::test]
async fn malformed_reader_output_is_a_decode_error() {
    let ingestor = ImageIngestor::default().with_reader(Arc::new(BrokenReader));
    let file = UploadedFile::new("test-fan.png", "image/png", png_bytes());

    let err = ingestor.ingest(&file).await.expect_err("must not decode");
    assert!(matches!(err, IngestError::Decode(_)));
}

#[tokio::test]
async fn empty_file_produces_no_payload() {
    let file = UploadedFile::new("empty.png", "image/png", Vec::new());
    let err = ImageIngestor::default()
        .ingest(&file)
        .await
        .expect_err("empty data cannot be split");
    assert!(matches!(err, IngestError::Decode(_)));
}
