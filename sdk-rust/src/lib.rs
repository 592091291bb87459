mod client_utils;
mod errors;
pub mod google;
mod image_model;
mod ingest;
mod opentelemetry;
mod prompt;
pub mod stadium_sdk_test;
mod types;
mod types_ext;

pub use errors::*;
pub use image_model::ImageModel;
pub use ingest::{
    parse_data_url, FileReader, ImageIngestor, InMemoryFileReader, IngestOptions, UploadedFile,
    ACCEPTED_MIME_TYPES, MAX_UPLOAD_BYTES,
};
pub use prompt::build_prompt;
pub use types::*;
