use crate::{errors::BoxedError, AppError};
use async_trait::async_trait;
use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};
use tracing::{debug, warn};

/// The hosting environment's API key picker.
#[async_trait]
pub trait CredentialProvider: Send + Sync {
    /// Whether the user already picked a key.
    async fn has_selected_key(&self) -> Result<bool, BoxedError>;
    /// Open the key selection UI. Resolves once the user is done with it,
    /// which does not mean a valid key was picked.
    async fn open_key_selection(&self) -> Result<(), BoxedError>;
}

/// Reports a key as selected when an environment variable is set.
/// Selection cannot be opened from here; the variable has to be exported
/// before retrying.
pub struct EnvCredentialProvider {
    var: String,
}

impl EnvCredentialProvider {
    pub fn new(var: impl Into<String>) -> Self {
        Self { var: var.into() }
    }

    fn is_set(&self) -> bool {
        std::env::var(&self.var).is_ok_and(|value| !value.is_empty())
    }
}

#[async_trait]
impl CredentialProvider for EnvCredentialProvider {
    async fn has_selected_key(&self) -> Result<bool, BoxedError> {
        Ok(self.is_set())
    }

    async fn open_key_selection(&self) -> Result<(), BoxedError> {
        if self.is_set() {
            Ok(())
        } else {
            Err(format!("set {} and try again", self.var).into())
        }
    }
}

/// Process-scoped API key state, shared by everything that talks to the
/// generation API.
pub struct CredentialContext {
    provider: Option<Arc<dyn CredentialProvider>>,
    has_api_key: AtomicBool,
}

impl CredentialContext {
    /// Query the provider once. Without a provider the key is assumed to be
    /// present; a failing provider counts as no key.
    pub async fn init(provider: Option<Arc<dyn CredentialProvider>>) -> Self {
        let has_api_key = match &provider {
            Some(provider) => match provider.has_selected_key().await {
                Ok(selected) => selected,
                Err(error) => {
                    warn!(%error, "failed to query selected API key");
                    false
                }
            },
            None => true,
        };
        debug!(has_api_key, "credential context initialized");

        Self {
            provider,
            has_api_key: AtomicBool::new(has_api_key),
        }
    }

    /// A context without provider, where a key is always assumed.
    #[must_use]
    pub fn permissive() -> Self {
        Self {
            provider: None,
            has_api_key: AtomicBool::new(true),
        }
    }

    #[must_use]
    pub fn has_api_key(&self) -> bool {
        self.has_api_key.load(Ordering::SeqCst)
    }

    pub(crate) fn clear(&self) {
        self.has_api_key.store(false, Ordering::SeqCst);
    }

    /// Open key selection and optimistically mark the key as present once it
    /// returns. The key is not re-verified.
    pub async fn select_key(&self) -> Result<(), AppError> {
        if let Some(provider) = &self.provider {
            provider
                .open_key_selection()
                .await
                .map_err(AppError::Credential)?;
        }
        self.has_api_key.store(true, Ordering::SeqCst);
        Ok(())
    }

    /// Best-effort recovery after the provider rejected the key. Failures are
    /// logged and leave the key cleared. Returns whether a key is now assumed.
    pub(crate) async fn recover(&self) -> bool {
        self.clear();
        match self.select_key().await {
            Ok(()) => true,
            Err(error) => {
                warn!(%error, "error opening key selection");
                false
            }
        }
    }
}

impl Default for CredentialContext {
    fn default() -> Self {
        Self::permissive()
    }
}
