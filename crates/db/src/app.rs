//! Firebase application context.

use std::sync::Arc;

use crate::config::{Credentials, FirebaseConfig};
use crate::error::ClientError;

/// Name given to the app when none is requested.
pub const DEFAULT_APP_NAME: &str = "[DEFAULT]";

/// An initialized application context. Clients are derived from it.
///
/// Cheap to clone; all clones share the same options snapshot.
#[derive(Debug, Clone)]
pub struct FirebaseApp {
    inner: Arc<AppInner>,
}

#[derive(Debug)]
struct AppInner {
    name: String,
    options: FirebaseConfig,
}

impl FirebaseApp {
    /// Build the context from the options carried by `credentials`.
    ///
    /// Only the API key is checked here. The remaining options are passed
    /// through untouched; a client that needs one checks it when derived.
    pub fn new(name: impl Into<String>, credentials: Credentials<'_>) -> Result<Self, ClientError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(ClientError::invalid("app_name", "must not be empty"));
        }

        validate_api_key(credentials.api_key())?;

        Ok(Self {
            inner: Arc::new(AppInner {
                name,
                options: credentials.config().clone(),
            }),
        })
    }

    pub fn name(&self) -> &str {
        &self.inner.name
    }

    pub fn options(&self) -> &FirebaseConfig {
        &self.inner.options
    }
}

fn validate_api_key(key: &str) -> Result<(), ClientError> {
    if key.chars().any(|c| c.is_whitespace() || c.is_control()) {
        return Err(ClientError::invalid(
            "api_key",
            "must not contain whitespace or control characters",
        ));
    }
    Ok(())
}
