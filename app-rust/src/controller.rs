use crate::{
    config_store::ConfigStore, AppError, AppSnapshot, ControllerParams, CredentialContext,
    ProcessingStatus,
};
use stadium_sdk::{
    FanConfig, GeneratedImage, GenerationError, ImageIngestor, ImageModel, ImagePayload,
    Intensity, UploadedFile,
};
use std::{
    sync::{Arc, Mutex, MutexGuard, PoisonError},
    time::Duration,
};
use tokio::sync::watch;
use tracing::{debug, error, info, info_span, warn};
use tracing_futures::Instrument;

struct ControllerState {
    status: ProcessingStatus,
    image: Option<Arc<ImagePayload>>,
    result: Option<Arc<GeneratedImage>>,
    error: Option<String>,
    config: ConfigStore,
    /// Bumped whenever an in-flight generation stops being the one the user
    /// is waiting for.
    epoch: u64,
}

/// Drives upload, configuration, generation and reset.
///
/// All methods take `&self`; state lives behind a mutex that is never held
/// across an await, so a reset can interleave with an in-flight generation.
/// Every transition publishes an [`AppSnapshot`] to subscribers.
pub struct AppController {
    model: Arc<dyn ImageModel>,
    credentials: Arc<CredentialContext>,
    ingestor: ImageIngestor,
    settle_delay: Duration,
    state: Mutex<ControllerState>,
    snapshots: watch::Sender<AppSnapshot>,
}

impl AppController {
    #[must_use]
    pub fn new(params: ControllerParams) -> Self {
        let state = ControllerState {
            status: ProcessingStatus::Idle,
            image: None,
            result: None,
            error: None,
            config: ConfigStore::new(params.initial_config),
            epoch: 0,
        };
        let (snapshots, _) = watch::channel(snapshot_of(&state, params.credentials.has_api_key()));

        Self {
            model: params.model,
            credentials: params.credentials,
            ingestor: params.ingestor,
            settle_delay: params.settle_delay,
            state: Mutex::new(state),
            snapshots,
        }
    }

    pub fn builder(model: Arc<dyn ImageModel>) -> ControllerParams {
        ControllerParams::new(model)
    }

    #[must_use]
    pub fn snapshot(&self) -> AppSnapshot {
        let state = self.lock();
        self.snapshot_locked(&state)
    }

    /// Receive a snapshot after every transition. The current snapshot is
    /// marked as seen.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<AppSnapshot> {
        self.snapshots.subscribe()
    }

    /// The key selection affordance shown while no API key is selected.
    pub async fn select_key(&self) -> Result<AppSnapshot, AppError> {
        self.credentials.select_key().await?;
        info!("API key selected");
        Ok(self.publish_current())
    }

    /// Validate and load a photo, replacing any previous one and its result.
    pub async fn upload(&self, file: &UploadedFile) -> Result<AppSnapshot, AppError> {
        self.ensure_interactive()?;

        let payload = self.ingestor.ingest(file).await.inspect_err(|error| {
            warn!(name = %file.name, %error, "upload rejected");
        })?;

        let mut state = self.lock();
        if state.status == ProcessingStatus::Generating {
            return Err(AppError::Busy);
        }
        state.image = Some(Arc::new(payload));
        state.result = None;
        state.error = None;
        state.status = ProcessingStatus::Idle;
        debug!(name = %file.name, "image loaded");
        Ok(self.publish(&state))
    }

    pub fn remove_image(&self) -> Result<AppSnapshot, AppError> {
        self.ensure_interactive()?;

        let mut state = self.lock();
        ensure_editable(&state)?;
        state.image = None;
        state.result = None;
        state.error = None;
        state.status = ProcessingStatus::Idle;
        debug!("image removed");
        Ok(self.publish(&state))
    }

    pub fn set_sport(&self, sport: impl Into<String>) -> Result<AppSnapshot, AppError> {
        self.update_config(|config| config.set_sport(sport))
    }

    pub fn set_team_colors(
        &self,
        team_colors: impl Into<String>,
    ) -> Result<AppSnapshot, AppError> {
        self.update_config(|config| config.set_team_colors(team_colors))
    }

    pub fn set_atmosphere(&self, atmosphere: impl Into<String>) -> Result<AppSnapshot, AppError> {
        self.update_config(|config| config.set_atmosphere(atmosphere))
    }

    pub fn set_intensity(&self, intensity: Intensity) -> Result<AppSnapshot, AppError> {
        self.update_config(|config| config.set_intensity(intensity))
    }

    /// Restage the loaded photo with the current configuration.
    ///
    /// Refuses to call the model unless a key is selected, a photo is loaded,
    /// team colors are set and no other generation is running. Model failures
    /// never escape: they become the `Error` state, or a silent return to
    /// `Idle` plus key selection when the provider rejects the key.
    pub async fn generate(&self) -> Result<AppSnapshot, AppError> {
        let (image, config, epoch) = self.begin_generation()?;

        let span = info_span!(
            "stadium_app.generate",
            provider = self.model.provider(),
            model = %self.model.model_id(),
            epoch
        );

        async move {
            tokio::time::sleep(self.settle_delay).await;
            if !self.is_current(epoch) {
                debug!("generation superseded before the request was sent");
                return Ok(self.snapshot());
            }

            let outcome = self.model.generate(&image, &config).await;
            Ok(self.finish_generation(epoch, outcome).await)
        }
        .instrument(span)
        .await
    }

    /// Back to `Idle` with no photo, no result, no error and no team colors.
    /// Any in-flight generation is abandoned.
    ///
    /// Always accepted, even while generating or without an API key: it only
    /// discards session data and never reaches the provider.
    pub fn reset(&self) -> AppSnapshot {
        let mut state = self.lock();
        state.image = None;
        state.result = None;
        state.error = None;
        state.config.reset();
        state.status = ProcessingStatus::Idle;
        state.epoch += 1;
        debug!("reset");
        self.publish(&state)
    }

    fn begin_generation(&self) -> Result<(Arc<ImagePayload>, FanConfig, u64), AppError> {
        self.ensure_interactive()?;

        let mut state = self.lock();
        if state.status == ProcessingStatus::Generating {
            return Err(AppError::Busy);
        }
        let image = state.image.clone().ok_or(AppError::NoImage)?;
        if !state.config.has_team_colors() {
            return Err(AppError::MissingTeamColors);
        }

        state.epoch += 1;
        state.status = ProcessingStatus::Generating;
        state.error = None;
        state.result = None;
        self.publish(&state);

        Ok((image, state.config.config().clone(), state.epoch))
    }

    async fn finish_generation(
        &self,
        epoch: u64,
        outcome: Result<GeneratedImage, GenerationError>,
    ) -> AppSnapshot {
        match outcome {
            Ok(generated) => {
                let mut state = self.lock();
                if !is_current(&state, epoch) {
                    warn!("discarding generated image for a superseded request");
                    return self.snapshot_locked(&state);
                }
                info!(mime_type = %generated.mime_type, "image generated");
                state.result = Some(Arc::new(generated));
                state.status = ProcessingStatus::Success;
                self.publish(&state)
            }
            Err(error) if error.is_entity_not_found() => {
                {
                    let mut state = self.lock();
                    if !is_current(&state, epoch) {
                        warn!(%error, "discarding failure for a superseded request");
                        return self.snapshot_locked(&state);
                    }
                    warn!(%error, "API key rejected, reopening key selection");
                    self.credentials.clear();
                    state.status = ProcessingStatus::Idle;
                    self.publish(&state);
                }

                let recovered = self.credentials.recover().await;
                debug!(recovered, "key selection finished");
                self.publish_current()
            }
            Err(error) => {
                let mut state = self.lock();
                if !is_current(&state, epoch) {
                    warn!(%error, "discarding failure for a superseded request");
                    return self.snapshot_locked(&state);
                }
                error!(%error, "generation failed");
                state.error = Some(error.display_message());
                state.status = ProcessingStatus::Error;
                self.publish(&state)
            }
        }
    }

    /// While no key is selected only key selection is reachable.
    fn ensure_interactive(&self) -> Result<(), AppError> {
        if self.credentials.has_api_key() {
            Ok(())
        } else {
            Err(AppError::MissingApiKey)
        }
    }

    fn is_current(&self, epoch: u64) -> bool {
        is_current(&self.lock(), epoch)
    }

    fn update_config(
        &self,
        update: impl FnOnce(&mut ConfigStore),
    ) -> Result<AppSnapshot, AppError> {
        self.ensure_interactive()?;

        let mut state = self.lock();
        ensure_editable(&state)?;
        update(&mut state.config);
        Ok(self.publish(&state))
    }

    fn lock(&self) -> MutexGuard<'_, ControllerState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn snapshot_locked(&self, state: &ControllerState) -> AppSnapshot {
        snapshot_of(state, self.credentials.has_api_key())
    }

    fn publish(&self, state: &ControllerState) -> AppSnapshot {
        let snapshot = self.snapshot_locked(state);
        self.snapshots.send_replace(snapshot.clone());
        snapshot
    }

    fn publish_current(&self) -> AppSnapshot {
        let state = self.lock();
        self.publish(&state)
    }
}

/// The photo and its configuration can only change while a photo is loaded
/// and nothing is generating.
fn ensure_editable(state: &ControllerState) -> Result<(), AppError> {
    if state.status == ProcessingStatus::Generating {
        return Err(AppError::Busy);
    }
    if state.image.is_none() {
        return Err(AppError::NoImage);
    }
    Ok(())
}

fn is_current(state: &ControllerState, epoch: u64) -> bool {
    state.epoch == epoch && state.status == ProcessingStatus::Generating
}

fn snapshot_of(state: &ControllerState, has_api_key: bool) -> AppSnapshot {
    AppSnapshot {
        status: state.status,
        has_api_key,
        image: state.image.clone(),
        result: state.result.clone(),
        error: state.error.clone(),
        config: state.config.config().clone(),
    }
}
