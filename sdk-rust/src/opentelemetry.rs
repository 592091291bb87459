use crate::{GeneratedImage, GenerationResult, ModelUsage};
use opentelemetry::trace::Status;
use std::time::Instant;
use tracing::{info_span, Span};
use tracing_futures::Instrument;
use tracing_opentelemetry::OpenTelemetrySpanExt;

pub struct GenerationSpan {
    span: Span,
    usage: Option<ModelUsage>,
    output_mime_type: Option<String>,
    start_time: Instant,
}

impl GenerationSpan {
    pub fn new(provider: &str, model_id: &str, input_mime_type: &str) -> Self {
        let span = info_span!("stadium_sdk.generate");
        span.set_attribute("gen_ai.operation.name", "generate_content");
        span.set_attribute("gen_ai.provider.name", provider.to_string());
        span.set_attribute("gen_ai.request.model", model_id.to_string());
        span.set_attribute("stadium_sdk.input.mime_type", input_mime_type.to_string());

        Self {
            span,
            usage: None,
            output_mime_type: None,
            start_time: Instant::now(),
        }
    }

    fn span(&self) -> Span {
        self.span.clone()
    }

    pub async fn instrument_future<F>(&self, future: F) -> F::Output
    where
        F: std::future::Future,
    {
        future.instrument(self.span()).await
    }

    pub fn on_response(&mut self, image: &GeneratedImage) {
        self.usage.clone_from(&image.usage);
        self.output_mime_type = Some(image.mime_type.clone());
    }

    pub fn on_error(&mut self, error: &(dyn std::error::Error + 'static)) {
        self.span.set_attribute("exception.message", error.to_string());
        self.span.set_status(Status::error(error.to_string()));
    }

    pub fn on_end(&mut self) {
        if let Some(usage) = &self.usage {
            self.span.set_attribute("gen_ai.usage.input_tokens", i64::from(usage.input_tokens));
            self.span.set_attribute("gen_ai.usage.output_tokens", i64::from(usage.output_tokens));
        }
        if let Some(mime_type) = &self.output_mime_type {
            self.span.set_attribute("stadium_sdk.output.mime_type", mime_type.clone());
        }
        self.span.set_attribute(
            "stadium_sdk.duration_seconds",
            self.start_time.elapsed().as_secs_f64(),
        );
    }
}

pub async fn trace_generate<Fut>(
    provider: &str,
    model_id: &str,
    input_mime_type: &str,
    f: Fut,
) -> GenerationResult<GeneratedImage>
where
    Fut: std::future::Future<Output = GenerationResult<GeneratedImage>>,
{
    let mut span = GenerationSpan::new(provider, model_id, input_mime_type);
    let result = span.instrument_future(f).await;

    match &result {
        Ok(image) => span.on_response(image),
        Err(error) => span.on_error(error),
    }

    span.on_end();
    result
}
