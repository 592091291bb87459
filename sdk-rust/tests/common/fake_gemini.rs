use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    routing::post,
    Json, Router,
};
use serde_json::Value;
use std::sync::{Arc, Mutex};

/// A 1x1 red PNG.
pub const RED_PIXEL_PNG: &str =
    "iVBORw0KGgoAAAANSUhEUgAAAAEAAAABCAYAAAAfFcSJAAAADUlEQVR42mP8z8BQDwAEhQGAhKmMIQAAAABJRU5ErkJggg==";

#[derive(Debug, Clone)]
pub struct RecordedRequest {
    /// The `{model}:{method}` path segment.
    pub model_action: String,
    pub api_key: Option<String>,
    pub body: Value,
}

/// In-process stand-in for the `generateContent` endpoint.
#[derive(Clone)]
pub struct FakeGemini {
    reply: Arc<(StatusCode, Value)>,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

impl FakeGemini {
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().expect("requests poisoned").clone()
    }
}

async fn generate_content(
    State(fake): State<FakeGemini>,
    Path(model_action): Path<String>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    let api_key = headers
        .get("x-goog-api-key")
        .and_then(|value| value.to_str().ok())
        .map(ToString::to_string);
    fake.requests
        .lock()
        .expect("requests poisoned")
        .push(RecordedRequest {
            model_action,
            api_key,
            body,
        });
    let (status, reply) = fake.reply.as_ref();
    (*status, Json(reply.clone()))
}

/// Start a fake server answering every call with `reply`. Returns the base URL
/// to hand to the model.
pub async fn spawn(status: StatusCode, reply: Value) -> (String, FakeGemini) {
    let fake = FakeGemini {
        reply: Arc::new((status, reply)),
        requests: Arc::new(Mutex::new(Vec::new())),
    };
    let app = Router::new()
        .route("/models/{model_action}", post(generate_content))
        .with_state(fake.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind fake server");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("fake server");
    });

    (format!("http://{addr}"), fake)
}
