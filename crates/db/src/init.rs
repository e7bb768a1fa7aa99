//! One-shot, fail-soft construction of the Firestore handle.

use std::any::Any;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};

use crate::client::Firestore;
use crate::config::{EnvSource, FirebaseConfig};
use crate::connector::{Connector, LocalConnector};
use crate::error::{ClientError, ErrorKind, InitError};

/// The value handed to the rest of the program: a usable handle, or the
/// reason there is none.
#[derive(Debug, Clone)]
pub enum Database {
    Ready(Firestore),
    Unavailable(Unavailable),
}

/// Why no handle is available.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Unavailable {
    MissingConfig { key: &'static str },
    Construction { kind: ErrorKind, message: String },
}

impl fmt::Display for Unavailable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Unavailable::MissingConfig { key } => write!(f, "missing {key}"),
            Unavailable::Construction { kind, message } => write!(f, "{kind} error: {message}"),
        }
    }
}

impl From<InitError> for Unavailable {
    fn from(err: InitError) -> Self {
        match err {
            InitError::MissingConfig(missing) => Unavailable::MissingConfig { key: missing.key },
            InitError::Construction(client) => Unavailable::Construction {
                kind: client.kind(),
                message: client.to_string(),
            },
        }
    }
}

impl Database {
    pub fn handle(&self) -> Option<&Firestore> {
        match self {
            Database::Ready(db) => Some(db),
            Database::Unavailable(_) => None,
        }
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, Database::Ready(_))
    }

    pub fn unavailable(&self) -> Option<&Unavailable> {
        match self {
            Database::Ready(_) => None,
            Database::Unavailable(reason) => Some(reason),
        }
    }

    /// Same handle identity, or both absent for the same reason.
    pub fn same_as(&self, other: &Database) -> bool {
        match (self, other) {
            (Database::Ready(a), Database::Ready(b)) => a.ptr_eq(b),
            (Database::Unavailable(a), Database::Unavailable(b)) => a == b,
            _ => false,
        }
    }
}

impl From<Result<Firestore, InitError>> for Database {
    fn from(result: Result<Firestore, InitError>) -> Self {
        match result {
            Ok(db) => Database::Ready(db),
            Err(err) => Database::Unavailable(err.into()),
        }
    }
}

/// Build the handle, reporting why not as a typed error.
///
/// The connector is not called at all when the API key is absent.
pub fn try_initialize(
    config: &FirebaseConfig,
    connector: &dyn Connector,
) -> Result<Firestore, InitError> {
    let credentials = config.credentials()?;

    let built = panic::catch_unwind(AssertUnwindSafe(|| {
        let app = connector.initialize_app(credentials)?;
        connector.firestore(&app)
    }));

    match built {
        Ok(result) => Ok(result?),
        Err(payload) => Err(ClientError::Internal(panic_message(payload.as_ref())).into()),
    }
}

/// Build the handle, never failing.
///
/// A missing API key logs a warning and a construction failure logs an
/// error; both yield [`Database::Unavailable`].
pub fn initialize(config: &FirebaseConfig, connector: &dyn Connector) -> Database {
    match try_initialize(config, connector) {
        Ok(db) => {
            tracing::info!(
                target: "hearth-db",
                project_id = db.project_id(),
                emulated = db.is_emulated(),
                "firestore client initialized"
            );
            Database::Ready(db)
        }
        Err(InitError::MissingConfig(missing)) => {
            tracing::warn!(
                target: "hearth-db",
                key = missing.key,
                "firebase configuration not found; document storage is disabled"
            );
            Database::Unavailable(Unavailable::MissingConfig { key: missing.key })
        }
        Err(InitError::Construction(err)) => {
            tracing::error!(
                target: "hearth-db",
                error_kind = %err.kind(),
                error = %err,
                "error initializing firebase"
            );
            Database::Unavailable(InitError::Construction(err).into())
        }
    }
}

/// Read the configuration record from `env` and initialize with a
/// [`LocalConnector`].
pub fn initialize_from_env(env: &impl EnvSource) -> Database {
    initialize(&FirebaseConfig::from_env(env), &LocalConnector::new())
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(msg) = payload.downcast_ref::<&str>() {
        (*msg).to_string()
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.clone()
    } else {
        "unknown panic".to_string()
    }
}

#[cfg(test)]
mod tests {
    use std::io;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    use tracing_subscriber::fmt::MakeWriter;

    use super::*;
    use crate::app::FirebaseApp;
    use crate::config::{self, Credentials, MapEnv};

    #[derive(Clone, Default)]
    struct Captured(Arc<Mutex<Vec<u8>>>);

    impl io::Write for Captured {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl<'a> MakeWriter<'a> for Captured {
        type Writer = Captured;

        fn make_writer(&'a self) -> Self::Writer {
            self.clone()
        }
    }

    fn with_logs<T>(f: impl FnOnce() -> T) -> (T, String) {
        let buf = Captured::default();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(buf.clone())
            .with_ansi(false)
            .finish();
        let out = tracing::subscriber::with_default(subscriber, f);
        let logs = String::from_utf8(buf.0.lock().unwrap().clone()).unwrap();
        (out, logs)
    }

    /// Counts calls and optionally fails the second step.
    #[derive(Default)]
    struct Recording {
        apps: AtomicUsize,
        clients: AtomicUsize,
        fail_with: Option<ClientError>,
        panic_with: Option<&'static str>,
    }

    impl Connector for Recording {
        fn initialize_app(
            &self,
            credentials: Credentials<'_>,
        ) -> Result<FirebaseApp, ClientError> {
            self.apps.fetch_add(1, Ordering::SeqCst);
            LocalConnector::new().initialize_app(credentials)
        }

        fn firestore(&self, app: &FirebaseApp) -> Result<Firestore, ClientError> {
            self.clients.fetch_add(1, Ordering::SeqCst);
            if let Some(msg) = self.panic_with {
                panic!("{msg}");
            }
            match &self.fail_with {
                Some(err) => Err(err.clone()),
                None => Firestore::new(app),
            }
        }
    }

    fn complete_env() -> MapEnv {
        MapEnv::new()
            .with(config::API_KEY_VAR, "AIzaSyExampleKey0123456789")
            .with(config::AUTH_DOMAIN_VAR, "demo-app.firebaseapp.com")
            .with(config::PROJECT_ID_VAR, "demo-app")
            .with(config::STORAGE_BUCKET_VAR, "demo-app.appspot.com")
            .with(config::MESSAGING_SENDER_ID_VAR, "123456789012")
            .with(config::APP_ID_VAR, "1:123456789012:web:abc123def456")
    }

    #[test]
    fn missing_api_key_warns_and_skips_construction() {
        let config = FirebaseConfig::from_env(
            &MapEnv::new().with(config::PROJECT_ID_VAR, "demo-app"),
        );
        let connector = Recording::default();

        let (db, logs) = with_logs(|| initialize(&config, &connector));

        assert!(!db.is_ready());
        assert_eq!(
            db.unavailable(),
            Some(&Unavailable::MissingConfig {
                key: config::API_KEY_VAR
            })
        );
        assert_eq!(connector.apps.load(Ordering::SeqCst), 0);
        assert_eq!(connector.clients.load(Ordering::SeqCst), 0);
        assert!(logs.contains("WARN"));
        assert!(logs.contains("firebase configuration not found"));
        assert!(!logs.contains("ERROR"));
    }

    #[test]
    fn empty_api_key_is_treated_as_missing() {
        let env = complete_env().with(config::API_KEY_VAR, "");
        let (db, _) = with_logs(|| initialize_from_env(&env));
        assert!(matches!(
            db,
            Database::Unavailable(Unavailable::MissingConfig { .. })
        ));
    }

    #[test]
    fn complete_config_yields_handle_without_errors() {
        let config = FirebaseConfig::from_env(&complete_env());
        let connector = Recording::default();

        let (db, logs) = with_logs(|| initialize(&config, &connector));

        let handle = db.handle().expect("handle should be ready");
        assert_eq!(handle.project_id(), "demo-app");
        assert_eq!(connector.apps.load(Ordering::SeqCst), 1);
        assert_eq!(connector.clients.load(Ordering::SeqCst), 1);
        assert!(logs.contains("firestore client initialized"));
        assert!(!logs.contains("ERROR"));
        assert!(!logs.contains("WARN"));
    }

    #[test]
    fn rejected_credentials_log_error_with_detail() {
        let config = FirebaseConfig::from_env(&complete_env());
        let connector = Recording {
            fail_with: Some(ClientError::Rejected(
                "API key not valid. Please pass a valid API key.".into(),
            )),
            ..Default::default()
        };

        let (db, logs) = with_logs(|| initialize(&config, &connector));

        assert_eq!(
            db.unavailable(),
            Some(&Unavailable::Construction {
                kind: ErrorKind::Auth,
                message: "credentials rejected: API key not valid. Please pass a valid API key."
                    .into(),
            })
        );
        assert!(logs.contains("ERROR"));
        assert!(logs.contains("error initializing firebase"));
        assert!(logs.contains("API key not valid"));
    }

    #[test]
    fn malformed_option_degrades_to_absence() {
        let env = complete_env().with(config::PROJECT_ID_VAR, "Not A Project");
        let (db, logs) = with_logs(|| initialize_from_env(&env));

        match db {
            Database::Unavailable(Unavailable::Construction { kind, .. }) => {
                assert_eq!(kind, ErrorKind::Malformed)
            }
            other => panic!("expected construction failure, got {other:?}"),
        }
        assert!(logs.contains("project_id"));
    }

    #[test]
    fn accepted_sdk_option_forms_yield_handle() {
        let variants = [
            (config::STORAGE_BUCKET_VAR, "gs://demo-app.appspot.com"),
            (config::AUTH_DOMAIN_VAR, "localhost:5000"),
            (config::PROJECT_ID_VAR, "google.com:demo-app"),
            (config::APP_ID_VAR, "demo-web-app"),
            (config::MESSAGING_SENDER_ID_VAR, "sender"),
        ];

        for (key, value) in variants {
            let env = complete_env().with(key, value);
            let (db, logs) = with_logs(|| initialize_from_env(&env));
            assert!(db.is_ready(), "{key}={value} should initialize, got {db:?}");
            assert!(!logs.contains("ERROR"), "{key}={value} logged an error");
        }
    }

    #[test]
    fn missing_project_id_fails_at_client_step() {
        let env = MapEnv::new().with(config::API_KEY_VAR, "AIzaSyExampleKey0123456789");
        let err = try_initialize(&FirebaseConfig::from_env(&env), &LocalConnector::new())
            .unwrap_err();
        assert!(matches!(
            err,
            InitError::Construction(ClientError::InvalidOption {
                field: "project_id",
                ..
            })
        ));
    }

    #[test]
    fn panicking_connector_is_contained() {
        let config = FirebaseConfig::from_env(&complete_env());
        let connector = Recording {
            panic_with: Some("socket exploded"),
            ..Default::default()
        };

        let (db, logs) = with_logs(|| initialize(&config, &connector));

        assert_eq!(
            db.unavailable(),
            Some(&Unavailable::Construction {
                kind: ErrorKind::Internal,
                message: "client panicked: socket exploded".into(),
            })
        );
        assert!(logs.contains("socket exploded"));
    }

    #[test]
    fn try_initialize_reports_missing_config() {
        let err = try_initialize(&FirebaseConfig::default(), &LocalConnector::new()).unwrap_err();
        assert_eq!(err.to_string(), "required configuration `FIREBASE_API_KEY` is not set");
    }

    #[test]
    fn database_identity() {
        let db = initialize_from_env(&complete_env());
        let copy = db.clone();
        let rebuilt = initialize_from_env(&complete_env());

        assert!(db.same_as(&copy));
        assert!(!db.same_as(&rebuilt));

        let absent = initialize_from_env(&MapEnv::new());
        assert!(absent.same_as(&absent.clone()));
        assert!(!absent.same_as(&db));
    }

    #[test]
    fn unavailable_display() {
        let missing = Unavailable::MissingConfig {
            key: config::API_KEY_VAR,
        };
        assert_eq!(missing.to_string(), "missing FIREBASE_API_KEY");

        let failed = Unavailable::Construction {
            kind: ErrorKind::Network,
            message: "transport failure: timed out".into(),
        };
        assert_eq!(failed.to_string(), "network error: transport failure: timed out");
    }
}
