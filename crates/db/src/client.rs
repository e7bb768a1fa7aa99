//! The Firestore client handle.

use std::fmt;
use std::sync::Arc;

use crate::app::FirebaseApp;
use crate::error::ClientError;

pub const DEFAULT_DATABASE_ID: &str = "(default)";
const PRODUCTION_HOST: &str = "firestore.googleapis.com";

/// Shared, immutable handle to a Firestore database.
///
/// Clones refer to the same underlying client; use [`Firestore::ptr_eq`] to
/// check identity.
#[derive(Clone)]
pub struct Firestore {
    inner: Arc<FirestoreInner>,
}

struct FirestoreInner {
    app: FirebaseApp,
    project_id: String,
    database_id: String,
    documents_url: String,
    emulated: bool,
}

impl Firestore {
    /// Derive the default-database client from an app context.
    ///
    /// Requires a `project_id`. Targets the emulator instead of production
    /// when the app options carry an `emulator_host`.
    pub fn new(app: &FirebaseApp) -> Result<Self, ClientError> {
        let options = app.options();
        let project_id = options
            .project_id
            .as_deref()
            .ok_or_else(|| ClientError::invalid("project_id", "required to address Firestore"))?;
        validate_project_id(project_id)?;

        let database_id = DEFAULT_DATABASE_ID;
        let (base, emulated) = match options.emulator_host.as_deref() {
            Some(host) => {
                validate_emulator_host(host)?;
                (format!("http://{host}"), true)
            }
            None => (format!("https://{PRODUCTION_HOST}"), false),
        };
        let documents_url =
            format!("{base}/v1/projects/{project_id}/databases/{database_id}/documents");

        Ok(Self {
            inner: Arc::new(FirestoreInner {
                app: app.clone(),
                project_id: project_id.to_string(),
                database_id: database_id.to_string(),
                documents_url,
                emulated,
            }),
        })
    }

    pub fn app(&self) -> &FirebaseApp {
        &self.inner.app
    }

    pub fn project_id(&self) -> &str {
        &self.inner.project_id
    }

    pub fn database_id(&self) -> &str {
        &self.inner.database_id
    }

    /// Base REST URL for document paths.
    pub fn documents_url(&self) -> &str {
        &self.inner.documents_url
    }

    pub fn is_emulated(&self) -> bool {
        self.inner.emulated
    }

    /// Whether both handles refer to the same client.
    pub fn ptr_eq(&self, other: &Firestore) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl fmt::Debug for Firestore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Firestore")
            .field("app", &self.inner.app.name())
            .field("project_id", &self.inner.project_id)
            .field("database_id", &self.inner.database_id)
            .field("emulated", &self.inner.emulated)
            .finish()
    }
}

/// 6 to 30 characters: lowercase letters, digits, hyphens. Starts with a
/// letter and does not end with a hyphen. Domain-scoped projects carry a
/// `domain:` prefix, e.g. `google.com:demo-app`.
fn validate_project_id(project_id: &str) -> Result<(), ClientError> {
    let (domain, name) = match project_id.split_once(':') {
        Some((domain, name)) => (Some(domain), name),
        None => (None, project_id),
    };

    if domain.map_or(true, is_host_name) && is_project_name(name) {
        Ok(())
    } else {
        Err(ClientError::invalid(
            "project_id",
            format!("`{project_id}` is not a valid project id"),
        ))
    }
}

fn is_project_name(name: &str) -> bool {
    (6..=30).contains(&name.len())
        && name.chars().next().is_some_and(|c| c.is_ascii_lowercase())
        && name
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
        && !name.ends_with('-')
}

fn is_host_name(value: &str) -> bool {
    !value.is_empty()
        && value.split('.').all(|label| {
            !label.is_empty()
                && !label.starts_with('-')
                && !label.ends_with('-')
                && label
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        })
}

fn validate_emulator_host(host: &str) -> Result<(), ClientError> {
    let invalid = || {
        ClientError::invalid(
            "emulator_host",
            format!("`{host}` is not of the form host:port"),
        )
    };

    let (name, port) = host.rsplit_once(':').ok_or_else(invalid)?;
    if !is_host_name(name) || port.parse::<u16>().map_or(true, |p| p == 0) {
        return Err(invalid());
    }
    Ok(())
}
