use thiserror::Error;

/// Fallback message used when an upstream failure carries no message of its
/// own.
pub const GENERIC_FAILURE_MESSAGE: &str = "Failed to transform image.";

/// Substring Google returns when the selected API key (or the project behind
/// it) cannot be resolved.
pub const ENTITY_NOT_FOUND_SIGNAL: &str = "Requested entity was not found";

#[derive(Error, Debug)]
pub enum IngestError {
    /// The declared content type does not start with `image/`.
    #[error("Please upload an image file (received {0:?}).")]
    NotAnImage(String),
    #[error("File is too large ({size} bytes). Please upload an image smaller than {max} bytes.")]
    TooLarge { size: u64, max: u64 },
    /// The platform file reader failed.
    #[error("Failed to read file: {0}")]
    Read(String),
    /// The file reader produced something that is not a base64 data URL.
    #[error("Failed to decode file: {0}")]
    Decode(String),
}

pub type IngestResult<T> = Result<T, IngestError>;

#[derive(Error, Debug)]
pub enum GenerationError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    /// No credential value could be resolved for the call.
    #[error("Missing API key: {0}")]
    MissingApiKey(String),
    /// The request to the provider failed or the parsing of the response
    /// failed.
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),
    /// The request returns a non-OK status code. The message is the one
    /// reported by the provider when available.
    #[error("{1} (Status {0})")]
    StatusCode(reqwest::StatusCode, String),
    /// The response from the provider was unexpected.
    #[error("Invariant from {0}: {1}")]
    Invariant(&'static str, String),
    /// The model answered without any inline image (text only or refusal).
    #[error(
        "No image was generated. The model might have refused the request or returned text only."
    )]
    NoImageProduced,
}

impl GenerationError {
    /// Whether the provider reported that the credential in use does not
    /// resolve to a usable entity.
    #[must_use]
    pub fn is_entity_not_found(&self) -> bool {
        self.to_string().contains(ENTITY_NOT_FOUND_SIGNAL)
    }

    /// Message suitable for display. Never empty. Provider errors show the
    /// provider's message without the status.
    #[must_use]
    pub fn display_message(&self) -> String {
        let message = match self {
            Self::StatusCode(_, message) => message.clone(),
            other => other.to_string(),
        };
        if message.trim().is_empty() {
            GENERIC_FAILURE_MESSAGE.to_string()
        } else {
            message
        }
    }
}

pub type GenerationResult<T> = Result<T, GenerationError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_message_drops_the_status_of_provider_errors() {
        let error = GenerationError::StatusCode(
            reqwest::StatusCode::TOO_MANY_REQUESTS,
            "Quota exceeded".to_string(),
        );
        assert_eq!(error.to_string(), "Quota exceeded (Status 429 Too Many Requests)");
        assert_eq!(error.display_message(), "Quota exceeded");

        let error = GenerationError::StatusCode(reqwest::StatusCode::BAD_GATEWAY, String::new());
        assert_eq!(error.display_message(), GENERIC_FAILURE_MESSAGE);
        assert!(GenerationError::NoImageProduced
            .display_message()
            .starts_with("No image was generated"));
    }
}
