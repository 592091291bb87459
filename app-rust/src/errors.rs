use stadium_sdk::IngestError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    /// The upload was rejected. Shown to the user as a blocking notice.
    #[error(transparent)]
    Ingest(#[from] IngestError),
    #[error("Upload a photo before generating.")]
    NoImage,
    #[error("Please enter team colors to continue.")]
    MissingTeamColors,
    /// No usable API key is selected; only key selection is reachable.
    #[error("Select an API key to continue.")]
    MissingApiKey,
    /// A generation is already in flight.
    #[error("A generation is already in progress.")]
    Busy,
    #[error("Credential provider error: {0}")]
    Credential(#[source] BoxedError),
}

pub type BoxedError = Box<dyn std::error::Error + Send + Sync>;
