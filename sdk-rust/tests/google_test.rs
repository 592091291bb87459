mod common;
use crate::common::fake_gemini::{self, RED_PIXEL_PNG};
use axum::http::StatusCode;
use serde_json::json;
use stadium_sdk::{google::*, *};

fn google_model(base_url: &str, api_key: ApiKeySource) -> GoogleImageModel {
    GoogleImageModel::new(
        DEFAULT_MODEL_ID,
        GoogleImageModelOptions {
            api_key,
            base_url: Some(format!("{base_url}/")),
            ..Default::default()
        },
    )
}

fn fan_config() -> FanConfig {
    FanConfig::default()
        .with_sport("Basketball")
        .with_team_colors("Purple and Gold")
        .with_atmosphere("Electric Night Game")
}

fn image_reply() -> serde_json::Value {
    json!({
        "candidates": [{
            "content": {
                "role": "model",
                "parts": [
                    { "text": "Here is your stadium photo." },
                    { "inlineData": { "mimeType": "image/png", "data": RED_PIXEL_PNG } }
                ]
            },
            "finishReason": "STOP"
        }],
        "usageMetadata": { "promptTokenCount": 1290, "candidatesTokenCount": 1120, "totalTokenCount": 2410 }
    })
}

#[tokio::test]
async fn generate_returns_first_inline_image_as_data_url() {
    let (base_url, fake) = fake_gemini::spawn(StatusCode::OK, image_reply()).await;
    let model = google_model(&base_url, ApiKeySource::Static("test-key".to_string()));

    let image = ImagePayload::new(RED_PIXEL_PNG, "image/png");
    let generated = model
        .generate(&image, &fan_config())
        .await
        .expect("generate succeeds");

    assert_eq!(
        generated.url(),
        format!("data:image/png;base64,{RED_PIXEL_PNG}")
    );
    assert_eq!(
        generated.usage,
        Some(ModelUsage {
            input_tokens: 1290,
            output_tokens: 1120,
        })
    );

    let requests = fake.requests();
    assert_eq!(requests.len(), 1);
    let request = &requests[0];
    assert_eq!(
        request.model_action,
        "gemini-3-pro-image-preview:generateContent"
    );
    assert_eq!(request.api_key.as_deref(), Some("test-key"));

    let parts = request.body["contents"][0]["parts"]
        .as_array()
        .expect("parts array");
    assert_eq!(parts.len(), 2);
    assert_eq!(
        parts[0]["inlineData"],
        json!({ "data": RED_PIXEL_PNG, "mimeType": "image/png" })
    );
    assert_eq!(parts[1]["text"], json!(build_prompt(&fan_config())));
    assert_eq!(
        request.body["generationConfig"],
        json!({ "imageConfig": { "aspectRatio": "4:3", "imageSize": "1K" } })
    );
}

#[tokio::test]
async fn generate_fails_when_model_returns_text_only() {
    let (base_url, _fake) = fake_gemini::spawn(
        StatusCode::OK,
        json!({
            "candidates": [{
                "content": { "role": "model", "parts": [{ "text": "I can't edit this photo." }] },
                "finishReason": "NO_IMAGE"
            }]
        }),
    )
    .await;
    let model = google_model(&base_url, ApiKeySource::Static("test-key".to_string()));

    let err = model
        .generate(&ImagePayload::new(RED_PIXEL_PNG, "image/png"), &fan_config())
        .await
        .expect_err("text-only response must fail");

    assert!(matches!(err, GenerationError::NoImageProduced));
    assert!(err.to_string().contains("No image was generated"));
}

#[tokio::test]
async fn generate_surfaces_upstream_error_message() {
    let (base_url, _fake) = fake_gemini::spawn(
        StatusCode::NOT_FOUND,
        json!({
            "error": {
                "code": 404,
                "message": "Requested entity was not found.",
                "status": "NOT_FOUND"
            }
        }),
    )
    .await;
    let model = google_model(&base_url, ApiKeySource::Static("stale-key".to_string()));

    let err = model
        .generate(&ImagePayload::new(RED_PIXEL_PNG, "image/png"), &fan_config())
        .await
        .expect_err("404 must fail");

    match &err {
        GenerationError::StatusCode(status, message) => {
            assert_eq!(*status, reqwest::StatusCode::NOT_FOUND);
            assert_eq!(message, "Requested entity was not found.");
        }
        other => panic!("unexpected error variant: {other:?}"),
    }
    assert!(err.is_entity_not_found());
}

#[tokio::test]
async fn generate_without_api_key_sends_nothing() {
    let (base_url, fake) = fake_gemini::spawn(StatusCode::OK, image_reply()).await;
    let model = google_model(
        &base_url,
        ApiKeySource::Env("STADIUM_SDK_TEST_UNSET_API_KEY".to_string()),
    );

    let err = model
        .generate(&ImagePayload::new(RED_PIXEL_PNG, "image/png"), &fan_config())
        .await
        .expect_err("missing key must fail");

    assert!(matches!(err, GenerationError::MissingApiKey(_)));
    assert!(fake.requests().is_empty());
}

#[tokio::test]
async fn api_key_is_read_from_environment_on_every_call() {
    const VAR: &str = "STADIUM_SDK_TEST_ROTATING_API_KEY";
    let (base_url, fake) = fake_gemini::spawn(StatusCode::OK, image_reply()).await;
    let model = google_model(&base_url, ApiKeySource::Env(VAR.to_string()));
    let image = ImagePayload::new(RED_PIXEL_PNG, "image/png");

    std::env::set_var(VAR, "first-key");
    model
        .generate(&image, &fan_config())
        .await
        .expect("first call");
    std::env::set_var(VAR, "second-key");
    model
        .generate(&image, &fan_config())
        .await
        .expect("second call");

    let keys: Vec<_> = fake
        .requests()
        .into_iter()
        .map(|request| request.api_key)
        .collect();
    assert_eq!(
        keys,
        vec![Some("first-key".to_string()), Some("second-key".to_string())]
    );
}
