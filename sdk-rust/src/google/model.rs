use super::api::{
    Blob, Content, ErrorResponse, GenerateContentConfig, GenerateContentParameters,
    GenerateContentResponse, GenerateContentResponseUsageMetadata, ImageConfig,
    Part as GooglePart,
};
use crate::{
    client_utils, prompt, FanConfig, GeneratedImage, GenerationError, GenerationResult,
    ImageModel, ImagePayload, ModelUsage, GENERIC_FAILURE_MESSAGE,
};
use reqwest::{
    header::{HeaderMap, HeaderName, HeaderValue},
    Client,
};
use std::collections::HashMap;
use tracing::debug;

const PROVIDER: &str = "google";

pub const DEFAULT_MODEL_ID: &str = "gemini-3-pro-image-preview";
pub const DEFAULT_API_KEY_ENV: &str = "GOOGLE_API_KEY";
const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Where the API key comes from. The key is resolved on every call so a key
/// selected while the process runs is picked up without a restart.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ApiKeySource {
    Static(String),
    /// Read from the named environment variable.
    Env(String),
}

impl Default for ApiKeySource {
    fn default() -> Self {
        Self::Env(DEFAULT_API_KEY_ENV.to_string())
    }
}

impl ApiKeySource {
    pub fn resolve(&self) -> GenerationResult<String> {
        let key = match self {
            Self::Static(key) => key.clone(),
            Self::Env(var) => std::env::var(var).map_err(|_| {
                GenerationError::MissingApiKey(format!("environment variable {var} is not set"))
            })?,
        };
        if key.is_empty() {
            return Err(GenerationError::MissingApiKey("API key is empty".to_string()));
        }
        Ok(key)
    }
}

/// Fixed output parameters sent with every request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ImageOutputConfig {
    pub aspect_ratio: String,
    pub image_size: String,
}

impl Default for ImageOutputConfig {
    fn default() -> Self {
        Self {
            aspect_ratio: "4:3".to_string(),
            image_size: "1K".to_string(),
        }
    }
}

pub struct GoogleImageModel {
    model_id: String,
    api_key: ApiKeySource,
    base_url: String,
    client: Client,
    headers: HashMap<String, String>,
    image_config: ImageOutputConfig,
}

#[derive(Clone, Default)]
pub struct GoogleImageModelOptions {
    pub api_key: ApiKeySource,
    pub base_url: Option<String>,
    pub headers: Option<HashMap<String, String>>,
    pub client: Option<Client>,
    pub image_config: ImageOutputConfig,
}

impl GoogleImageModel {
    #[must_use]
    pub fn new(model_id: impl Into<String>, options: GoogleImageModelOptions) -> Self {
        let GoogleImageModelOptions {
            api_key,
            base_url,
            headers,
            client,
            image_config,
        } = options;

        let base_url = base_url
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
            .trim_end_matches('/')
            .to_string();
        let client = client.unwrap_or_else(Client::new);
        let headers = headers.unwrap_or_default();

        Self {
            model_id: model_id.into(),
            api_key,
            base_url,
            client,
            headers,
            image_config,
        }
    }

    fn request_headers(&self, api_key: &str) -> GenerationResult<HeaderMap> {
        let mut headers = HeaderMap::new();

        let key_value = HeaderValue::from_str(api_key).map_err(|error| {
            GenerationError::InvalidInput(format!("Invalid Google API key: {error}"))
        })?;
        headers.insert(HeaderName::from_static("x-goog-api-key"), key_value);

        for (key, value) in &self.headers {
            let header_name = HeaderName::from_bytes(key.as_bytes()).map_err(|error| {
                GenerationError::InvalidInput(format!(
                    "Invalid Google header name '{key}': {error}"
                ))
            })?;
            let header_value = HeaderValue::from_str(value).map_err(|error| {
                GenerationError::InvalidInput(format!(
                    "Invalid Google header value for '{key}': {error}"
                ))
            })?;
            headers.insert(header_name, header_value);
        }

        Ok(headers)
    }

    async fn send(
        &self,
        image: &ImagePayload,
        config: &FanConfig,
    ) -> GenerationResult<GeneratedImage> {
        let api_key = self.api_key.resolve()?;
        let params = convert_to_generate_content_parameters(image, config, &self.image_config);

        let url = format!("{}/models/{}:generateContent", self.base_url, self.model_id);

        let headers = self.request_headers(&api_key)?;
        let response: GenerateContentResponse =
            client_utils::send_json(&self.client, &url, &params, headers)
                .await
                .map_err(map_google_error)?;

        map_google_response(response)
    }
}

#[async_trait::async_trait]
impl ImageModel for GoogleImageModel {
    fn provider(&self) -> &'static str {
        PROVIDER
    }

    fn model_id(&self) -> String {
        self.model_id.clone()
    }

    async fn generate(
        &self,
        image: &ImagePayload,
        config: &FanConfig,
    ) -> GenerationResult<GeneratedImage> {
        crate::opentelemetry::trace_generate(
            self.provider(),
            &self.model_id,
            &image.mime_type,
            self.send(image, config),
        )
        .await
    }
}

/// Exactly one image part followed by one text part.
pub(crate) fn convert_to_generate_content_parameters(
    image: &ImagePayload,
    config: &FanConfig,
    image_config: &ImageOutputConfig,
) -> GenerateContentParameters {
    GenerateContentParameters {
        contents: vec![Content {
            role: Some("user".to_string()),
            parts: Some(vec![
                GooglePart {
                    inline_data: Some(Blob {
                        data: Some(image.data.clone()),
                        mime_type: Some(image.mime_type.clone()),
                    }),
                    ..Default::default()
                },
                GooglePart {
                    text: Some(prompt::build_prompt(config)),
                    ..Default::default()
                },
            ]),
        }],
        generation_config: Some(GenerateContentConfig {
            image_config: Some(ImageConfig {
                aspect_ratio: Some(image_config.aspect_ratio.clone()),
                image_size: Some(image_config.image_size.clone()),
            }),
        }),
    }
}

/// Take the first inline data part of the first candidate, in order.
pub(crate) fn map_google_response(
    response: GenerateContentResponse,
) -> GenerationResult<GeneratedImage> {
    let usage = response
        .usage_metadata
        .as_ref()
        .map(map_google_usage_metadata);

    if let Some(feedback) = &response.prompt_feedback {
        debug!(
            block_reason = ?feedback.block_reason,
            message = ?feedback.block_reason_message,
            "prompt feedback"
        );
    }

    let Some(candidate) = response.candidates.and_then(|c| c.into_iter().next()) else {
        return Err(GenerationError::NoImageProduced);
    };
    let finish_reason = candidate.finish_reason;
    let parts = candidate.content.and_then(|c| c.parts).unwrap_or_default();

    let image = parts.into_iter().find_map(|part| {
        part.inline_data.and_then(|blob| match blob.data {
            Some(data) if !data.is_empty() => Some(GeneratedImage::new(data, blob.mime_type)),
            _ => None,
        })
    });

    match image {
        Some(image) => Ok(match usage {
            Some(usage) => image.with_usage(usage),
            None => image,
        }),
        None => {
            debug!(finish_reason = ?finish_reason, "no inline image in response");
            Err(GenerationError::NoImageProduced)
        }
    }
}

/// Replace the raw body of a status error with the message from Google's
/// error envelope.
fn map_google_error(error: GenerationError) -> GenerationError {
    match error {
        GenerationError::StatusCode(status, body) => {
            let message = serde_json::from_str::<ErrorResponse>(&body)
                .ok()
                .and_then(|response| response.error.message)
                .filter(|message| !message.trim().is_empty())
                .or_else(|| {
                    let body = body.trim();
                    (!body.is_empty()).then(|| body.to_string())
                })
                .unwrap_or_else(|| GENERIC_FAILURE_MESSAGE.to_string());
            GenerationError::StatusCode(status, message)
        }
        other => other,
    }
}

fn map_google_usage_metadata(usage: &GenerateContentResponseUsageMetadata) -> ModelUsage {
    ModelUsage {
        input_tokens: usage.prompt_token_count.unwrap_or(0),
        output_tokens: usage.candidates_token_count.unwrap_or(0),
    }
}
