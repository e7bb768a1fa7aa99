//! Client factory seam.

use crate::app::{FirebaseApp, DEFAULT_APP_NAME};
use crate::client::Firestore;
use crate::config::Credentials;
use crate::error::ClientError;

/// Builds the application context and the Firestore client from it.
///
/// Both steps run synchronously. Implementations report every failure as a
/// [`ClientError`]; the initializer turns those into an absent handle.
pub trait Connector: Send + Sync {
    fn initialize_app(&self, credentials: Credentials<'_>) -> Result<FirebaseApp, ClientError>;

    fn firestore(&self, app: &FirebaseApp) -> Result<Firestore, ClientError>;
}

/// Builds clients without contacting the service.
///
/// Options are checked for shape only; credentials are first exercised by
/// whatever uses the handle.
#[derive(Debug, Clone)]
pub struct LocalConnector {
    app_name: String,
}

impl LocalConnector {
    pub fn new() -> Self {
        Self::named(DEFAULT_APP_NAME)
    }

    /// Use a non-default app name.
    pub fn named(app_name: impl Into<String>) -> Self {
        Self {
            app_name: app_name.into(),
        }
    }
}

impl Default for LocalConnector {
    fn default() -> Self {
        Self::new()
    }
}

impl Connector for LocalConnector {
    fn initialize_app(&self, credentials: Credentials<'_>) -> Result<FirebaseApp, ClientError> {
        FirebaseApp::new(self.app_name.clone(), credentials)
    }

    fn firestore(&self, app: &FirebaseApp) -> Result<Firestore, ClientError> {
        Firestore::new(app)
    }
}
