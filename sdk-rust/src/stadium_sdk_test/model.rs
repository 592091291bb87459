use std::{collections::VecDeque, sync::Mutex};

use crate::{
    errors::{GenerationError, GenerationResult},
    FanConfig, GeneratedImage, ImageModel, ImagePayload,
};

/// Result for a mocked `generate` call.
/// It can either be an image or an error to return.
pub enum MockGenerateResult {
    Image(GeneratedImage),
    Error(GenerationError),
}

impl MockGenerateResult {
    /// Construct a result that yields the provided image.
    pub fn image(image: GeneratedImage) -> Self {
        Self::Image(image)
    }

    /// Construct a result that yields the provided error.
    pub fn error(error: GenerationError) -> Self {
        Self::Error(error)
    }
}

impl From<GeneratedImage> for MockGenerateResult {
    fn from(image: GeneratedImage) -> Self {
        Self::image(image)
    }
}

impl From<GenerationError> for MockGenerateResult {
    fn from(error: GenerationError) -> Self {
        Self::error(error)
    }
}

impl From<GenerationResult<GeneratedImage>> for MockGenerateResult {
    fn from(result: GenerationResult<GeneratedImage>) -> Self {
        match result {
            Ok(image) => Self::Image(image),
            Err(error) => Self::Error(error),
        }
    }
}

#[derive(Default)]
struct MockImageModelState {
    mocked_generate_results: VecDeque<MockGenerateResult>,
    tracked_generate_inputs: Vec<(ImagePayload, FanConfig)>,
}

impl MockImageModelState {
    fn enqueue_generate_result(&mut self, result: MockGenerateResult) {
        self.mocked_generate_results.push_back(result);
    }

    fn reset(&mut self) {
        self.tracked_generate_inputs.clear();
    }

    fn restore(&mut self) {
        self.mocked_generate_results.clear();
        self.reset();
    }
}

/// A mock image model for testing that tracks inputs and yields predefined
/// outputs.
pub struct MockImageModel {
    provider: &'static str,
    model_id: String,
    state: Mutex<MockImageModelState>,
}

impl Default for MockImageModel {
    fn default() -> Self {
        Self {
            provider: "mock",
            model_id: "mock-image-model".to_string(),
            state: Mutex::new(MockImageModelState::default()),
        }
    }
}

impl MockImageModel {
    /// Construct a new mock image model instance.
    pub fn new() -> Self {
        Self::default()
    }

    /// Override the provider identifier returned by the mock.
    pub fn set_provider(&mut self, provider: &'static str) {
        self.provider = provider;
    }

    /// Override the model identifier returned by the mock.
    pub fn set_model_id<S: Into<String>>(&mut self, model_id: S) {
        self.model_id = model_id.into();
    }

    /// Enqueue one or more mocked generate results.
    pub fn enqueue_generate_results<I>(&self, results: I) -> &Self
    where
        I: IntoIterator<Item = MockGenerateResult>,
    {
        let mut state = self.state.lock().expect("mock state poisoned");
        for result in results {
            state.enqueue_generate_result(result);
        }
        drop(state);
        self
    }

    /// Convenience to enqueue a single mocked generate result.
    pub fn enqueue_generate<R>(&self, result: R) -> &Self
    where
        R: Into<MockGenerateResult>,
    {
        self.enqueue_generate_results(std::iter::once(result.into()))
    }

    /// Retrieve the tracked `(image, config)` inputs accumulated so far.
    pub fn tracked_generate_inputs(&self) -> Vec<(ImagePayload, FanConfig)> {
        let state = self.state.lock().expect("mock state poisoned");
        state.tracked_generate_inputs.clone()
    }

    /// Reset tracked inputs without touching enqueued results.
    pub fn reset(&self) {
        let mut state = self.state.lock().expect("mock state poisoned");
        state.reset();
    }

    /// Clear both tracked inputs and enqueued results.
    pub fn restore(&self) {
        let mut state = self.state.lock().expect("mock state poisoned");
        state.restore();
    }
}

#[async_trait::async_trait]
impl ImageModel for MockImageModel {
    fn provider(&self) -> &'static str {
        self.provider
    }

    fn model_id(&self) -> String {
        self.model_id.clone()
    }

    async fn generate(
        &self,
        image: &ImagePayload,
        config: &FanConfig,
    ) -> GenerationResult<GeneratedImage> {
        let mut state = self.state.lock().expect("mock state poisoned");
        state
            .tracked_generate_inputs
            .push((image.clone(), config.clone()));

        let result = state.mocked_generate_results.pop_front().ok_or_else(|| {
            GenerationError::Invariant(self.provider, "no mocked generate results available".into())
        })?;

        match result {
            MockGenerateResult::Image(image) => Ok(image),
            MockGenerateResult::Error(error) => Err(error),
        }
    }
}
