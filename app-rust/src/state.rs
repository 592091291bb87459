use serde::Serialize;
use stadium_sdk::{FanConfig, GeneratedImage, ImagePayload};
use std::sync::Arc;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProcessingStatus {
    #[default]
    Idle,
    /// Reserved. Uploads complete without entering this state.
    Uploading,
    Generating,
    Success,
    Error,
}

/// Immutable view of the controller, published after every transition.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AppSnapshot {
    pub status: ProcessingStatus,
    pub has_api_key: bool,
    pub image: Option<Arc<ImagePayload>>,
    pub result: Option<Arc<GeneratedImage>>,
    /// Set only in [`ProcessingStatus::Error`], never empty.
    pub error: Option<String>,
    pub config: FanConfig,
}

/// Which user actions are currently enabled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Affordances {
    pub select_key: bool,
    pub upload: bool,
    pub remove_image: bool,
    pub edit_config: bool,
    pub generate: bool,
    pub reset: bool,
    pub download: bool,
}

impl AppSnapshot {
    #[must_use]
    pub fn has_image(&self) -> bool {
        self.image.is_some()
    }

    #[must_use]
    pub fn is_generating(&self) -> bool {
        self.status == ProcessingStatus::Generating
    }

    /// Displayable URL of the generated image.
    #[must_use]
    pub fn result_url(&self) -> Option<String> {
        self.result.as_ref().map(|image| image.url())
    }

    #[must_use]
    pub fn can_generate(&self) -> bool {
        self.affordances().generate
    }

    #[must_use]
    pub fn affordances(&self) -> Affordances {
        if !self.has_api_key {
            return Affordances {
                select_key: true,
                ..Affordances::default()
            };
        }

        let generating = self.is_generating();
        let editable = self.has_image() && !generating;

        Affordances {
            select_key: false,
            upload: !self.has_image() && !generating,
            remove_image: editable,
            edit_config: editable,
            generate: editable && !self.config.team_colors.is_empty(),
            reset: matches!(
                self.status,
                ProcessingStatus::Success | ProcessingStatus::Error
            ),
            download: self.result.is_some(),
        }
    }
}
