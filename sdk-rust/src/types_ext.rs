use crate::{FanConfig, GeneratedImage, ImagePayload, Intensity, ModelUsage};
use base64::{engine::general_purpose::STANDARD as BASE64_STANDARD, Engine};

const DEFAULT_OUTPUT_MIME_TYPE: &str = "image/png";

impl ImagePayload {
    pub fn new(data: impl Into<String>, mime_type: impl Into<String>) -> Self {
        Self {
            data: data.into(),
            mime_type: mime_type.into(),
        }
    }

    /// Encode raw bytes into a payload.
    pub fn from_bytes(bytes: &[u8], mime_type: impl Into<String>) -> Self {
        Self::new(BASE64_STANDARD.encode(bytes), mime_type)
    }

    /// The payload rendered as a `data:` URL, e.g. for a thumbnail.
    #[must_use]
    pub fn data_url(&self) -> String {
        format!("data:{};base64,{}", self.mime_type, self.data)
    }
}

impl FanConfig {
    #[must_use]
    pub fn with_sport(mut self, sport: impl Into<String>) -> Self {
        self.sport = sport.into();
        self
    }

    #[must_use]
    pub fn with_team_colors(mut self, team_colors: impl Into<String>) -> Self {
        self.team_colors = team_colors.into();
        self
    }

    #[must_use]
    pub fn with_atmosphere(mut self, atmosphere: impl Into<String>) -> Self {
        self.atmosphere = atmosphere.into();
        self
    }

    #[must_use]
    pub fn with_intensity(mut self, intensity: Intensity) -> Self {
        self.intensity = intensity;
        self
    }
}

impl GeneratedImage {
    /// Build a generated image, falling back to "image/png" when the provider
    /// did not report a MIME type.
    pub fn new(image_data: impl Into<String>, mime_type: Option<String>) -> Self {
        Self {
            mime_type: mime_type
                .filter(|m| !m.is_empty())
                .unwrap_or_else(|| DEFAULT_OUTPUT_MIME_TYPE.to_string()),
            image_data: image_data.into(),
            usage: None,
        }
    }

    #[must_use]
    pub fn with_usage(mut self, usage: ModelUsage) -> Self {
        self.usage = Some(usage);
        self
    }

    /// A displayable `data:` URL for the image.
    #[must_use]
    pub fn url(&self) -> String {
        format!("data:{};base64,{}", self.mime_type, self.image_data)
    }

    /// Decode the image into raw bytes.
    pub fn decode(&self) -> Result<Vec<u8>, base64::DecodeError> {
        BASE64_STANDARD.decode(&self.image_data)
    }

    /// Suggested file name when saving the image.
    #[must_use]
    pub fn download_file_name(&self) -> String {
        let ext = match self.mime_type.split('/').nth(1) {
            Some("jpeg") => "jpg",
            Some(subtype) if !subtype.is_empty() => subtype,
            _ => "png",
        };
        format!("stadium-swap-fan.{ext}")
    }
}
