use serde::{Deserialize, Serialize};
use std::fmt;

/// Sports offered to the user. The first entry is the default.
pub const SPORTS: [&str; 9] = [
    "Soccer",
    "American Football",
    "Basketball",
    "Baseball",
    "Ice Hockey",
    "Tennis",
    "Cricket",
    "Rugby",
    "Esports Arena",
];

/// Stadium atmospheres offered to the user. The second entry is the default.
pub const ATMOSPHERES: [&str; 5] = [
    "Sunny Day Game",
    "Electric Night Game",
    "Rainy Intense Match",
    "Championship Confetti",
    "Golden Hour",
];

/// How emphatic the generated fan expressions and poses should be.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "utoipa", derive(utoipa::ToSchema))]
pub enum Intensity {
    Low,
    Medium,
    #[default]
    High,
}

impl Intensity {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::High => "High",
        }
    }
}

impl fmt::Display for Intensity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The user's transformation configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[cfg_attr(feature = "utoipa", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct FanConfig {
    /// One of [`SPORTS`].
    pub sport: String,
    /// Free text: colors or a team name. Must be non-empty to generate.
    pub team_colors: String,
    /// One of [`ATMOSPHERES`].
    pub atmosphere: String,
    pub intensity: Intensity,
}

impl Default for FanConfig {
    fn default() -> Self {
        Self {
            sport: SPORTS[0].to_string(),
            team_colors: String::new(),
            atmosphere: ATMOSPHERES[1].to_string(),
            intensity: Intensity::High,
        }
    }
}

/// A base64-encoded image ready to be sent to a provider.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[cfg_attr(feature = "utoipa", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct ImagePayload {
    /// The base64-encoded bytes, without any `data:` prefix.
    pub data: String,
    /// The MIME type of the image. E.g. "image/jpeg", "image/png".
    pub mime_type: String,
}

/// Token usage reported by the provider for one generation.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[cfg_attr(feature = "utoipa", derive(utoipa::ToSchema))]
pub struct ModelUsage {
    pub input_tokens: u32,
    pub output_tokens: u32,
}

/// The image returned by a provider.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[cfg_attr(feature = "utoipa", derive(utoipa::ToSchema))]
pub struct GeneratedImage {
    /// The MIME type of the returned image. Defaults to "image/png" when the
    /// provider omits it.
    pub mime_type: String,
    /// The base64-encoded image data.
    pub image_data: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub usage: Option<ModelUsage>,
}
