pub mod api;
mod model;

pub use model::{
    ApiKeySource, GoogleImageModel, GoogleImageModelOptions, ImageOutputConfig,
    DEFAULT_API_KEY_ENV, DEFAULT_MODEL_ID,
};
