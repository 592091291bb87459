use crate::{FanConfig, GeneratedImage, GenerationResult, ImagePayload};

/// A provider able to restage a photo as a fan scene.
///
/// Each call issues exactly one request and performs no retries.
#[async_trait::async_trait]
pub trait ImageModel: Send + Sync {
    fn provider(&self) -> &'static str;
    fn model_id(&self) -> String;
    /// Send the photo and the prompt rendered from `config`, returning the
    /// first image the provider produced.
    async fn generate(
        &self,
        image: &ImagePayload,
        config: &FanConfig,
    ) -> GenerationResult<GeneratedImage>;
}
