//! Restage a photo from disk as a stadium fan shot.
//!
//! ```sh
//! GOOGLE_API_KEY=... cargo run --example transform -- photo.jpg "Purple and Gold" Basketball "Electric Night Game" High
//! ```

use dotenvy::dotenv;
use stadium_app::{
    upload::load_upload, AppController, CredentialContext, CredentialProvider,
    EnvCredentialProvider, ProcessingStatus,
};
use stadium_sdk::{
    google::{GoogleImageModel, GoogleImageModelOptions, DEFAULT_API_KEY_ENV, DEFAULT_MODEL_ID},
    Intensity,
};
use std::{env, fs, sync::Arc};
use tracing_subscriber::EnvFilter;

fn parse_intensity(value: &str) -> Intensity {
    match value.to_ascii_lowercase().as_str() {
        "low" => Intensity::Low,
        "medium" => Intensity::Medium,
        _ => Intensity::High,
    }
}

#[tokio::main]
async fn main() {
    dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let mut args = env::args().skip(1);
    let path = args
        .next()
        .expect("usage: transform <photo> <team colors> [sport] [atmosphere] [intensity]");
    let team_colors = args.next().unwrap_or_default();

    let provider: Arc<dyn CredentialProvider> =
        Arc::new(EnvCredentialProvider::new(DEFAULT_API_KEY_ENV));
    let credentials = Arc::new(CredentialContext::init(Some(provider)).await);

    let model = Arc::new(GoogleImageModel::new(
        DEFAULT_MODEL_ID,
        GoogleImageModelOptions::default(),
    ));
    let controller = AppController::builder(model)
        .credentials(credentials)
        .build();

    if !controller.snapshot().has_api_key {
        if let Err(err) = controller.select_key().await {
            eprintln!("{err}");
            return;
        }
    }

    let file = load_upload(&path).await.expect("failed to read photo");
    if let Err(err) = controller.upload(&file).await {
        eprintln!("{err}");
        return;
    }

    controller
        .set_team_colors(team_colors)
        .expect("photo is loaded");
    if let Some(sport) = args.next() {
        controller.set_sport(sport).expect("photo is loaded");
    }
    if let Some(atmosphere) = args.next() {
        controller
            .set_atmosphere(atmosphere)
            .expect("photo is loaded");
    }
    if let Some(intensity) = args.next() {
        controller
            .set_intensity(parse_intensity(&intensity))
            .expect("photo is loaded");
    }

    let snapshot = match controller.generate().await {
        Ok(snapshot) => snapshot,
        Err(err) => {
            eprintln!("{err}");
            return;
        }
    };

    match (snapshot.status, snapshot.result) {
        (ProcessingStatus::Success, Some(result)) => {
            let file_name = result.download_file_name();
            let bytes = result.decode().expect("invalid base64 image data");
            fs::write(&file_name, bytes).expect("failed to write image file");
            println!("Saved image to {file_name}");
        }
        (ProcessingStatus::Error, _) => {
            eprintln!("{}", snapshot.error.unwrap_or_default());
        }
        (status, _) => {
            eprintln!("Generation ended in {status:?}; select a valid API key and try again.");
        }
    }
}
