use crate::{AppController, CredentialContext};
use stadium_sdk::{FanConfig, ImageIngestor, ImageModel};
use std::{sync::Arc, time::Duration};

/// Pause between entering `Generating` and calling the model, so a loading
/// indicator can render first.
pub const DEFAULT_SETTLE_DELAY: Duration = Duration::from_millis(100);

/// Parameters required to create a new controller.
/// # Default Values
/// - `credentials`: `CredentialContext::permissive()`
/// - `ingestor`: `ImageIngestor::default()` (5 MiB limit)
/// - `settle_delay`: 100ms
/// - `initial_config`: `FanConfig::default()`
pub struct ControllerParams {
    /// The model that restages photos.
    pub model: Arc<dyn ImageModel>,
    /// API key state shared with the rest of the process.
    pub credentials: Arc<CredentialContext>,
    /// Validates and decodes uploads.
    pub ingestor: ImageIngestor,
    pub settle_delay: Duration,
    pub initial_config: FanConfig,
}

impl ControllerParams {
    pub fn new(model: Arc<dyn ImageModel>) -> Self {
        Self {
            model,
            credentials: Arc::new(CredentialContext::permissive()),
            ingestor: ImageIngestor::default(),
            settle_delay: DEFAULT_SETTLE_DELAY,
            initial_config: FanConfig::default(),
        }
    }

    /// Set the credential context, usually created with
    /// `CredentialContext::init` at startup.
    #[must_use]
    pub fn credentials(mut self, credentials: Arc<CredentialContext>) -> Self {
        self.credentials = credentials;
        self
    }

    #[must_use]
    pub fn ingestor(mut self, ingestor: ImageIngestor) -> Self {
        self.ingestor = ingestor;
        self
    }

    #[must_use]
    pub fn settle_delay(mut self, settle_delay: Duration) -> Self {
        self.settle_delay = settle_delay;
        self
    }

    #[must_use]
    pub fn initial_config(mut self, initial_config: FanConfig) -> Self {
        self.initial_config = initial_config;
        self
    }

    #[must_use]
    pub fn build(self) -> AppController {
        AppController::new(self)
    }
}
