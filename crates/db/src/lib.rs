//! Firestore client factory for Hearth.
//!
//! Reads the Firebase web configuration, builds a [`Firestore`] handle when
//! the API key is present, and degrades to [`Database::Unavailable`] on any
//! failure instead of erroring out.

pub mod app;
pub mod binding;
pub mod client;
pub mod config;
pub mod connector;
pub mod error;
pub mod init;

pub use app::FirebaseApp;
pub use binding::DatabaseBinding;
pub use client::Firestore;
pub use config::{Credentials, EnvSource, FirebaseConfig, MapEnv, MissingConfig, ProcessEnv};
pub use connector::{Connector, LocalConnector};
pub use error::{ClientError, ErrorKind, InitError};
pub use init::{initialize, initialize_from_env, try_initialize, Database, Unavailable};
