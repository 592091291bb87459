mod config_store;
mod controller;
mod credentials;
mod errors;
mod params;
mod state;
pub mod upload;

pub use config_store::ConfigStore;
pub use controller::AppController;
pub use credentials::{CredentialContext, CredentialProvider, EnvCredentialProvider};
pub use errors::{AppError, BoxedError};
pub use params::{ControllerParams, DEFAULT_SETTLE_DELAY};
pub use state::{Affordances, AppSnapshot, ProcessingStatus};
