//! Firebase configuration record and the environment sources it is read from.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const API_KEY_VAR: &str = "FIREBASE_API_KEY";
pub const AUTH_DOMAIN_VAR: &str = "FIREBASE_AUTH_DOMAIN";
pub const PROJECT_ID_VAR: &str = "FIREBASE_PROJECT_ID";
pub const STORAGE_BUCKET_VAR: &str = "FIREBASE_STORAGE_BUCKET";
pub const MESSAGING_SENDER_ID_VAR: &str = "FIREBASE_MESSAGING_SENDER_ID";
pub const APP_ID_VAR: &str = "FIREBASE_APP_ID";
pub const EMULATOR_HOST_VAR: &str = "FIRESTORE_EMULATOR_HOST";

/// Read-only access to named environment values.
pub trait EnvSource {
    /// Returns the raw value of `key`, or `None` if it is not set.
    fn var(&self, key: &str) -> Option<String>;
}

/// The real process environment.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl EnvSource for ProcessEnv {
    fn var(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }
}

/// In-memory environment, used by tests and by callers that already hold
/// their configuration as key/value pairs.
#[derive(Debug, Clone, Default)]
pub struct MapEnv {
    vars: HashMap<String, String>,
}

impl MapEnv {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.vars.insert(key.into(), value.into());
        self
    }
}

impl<K, V> FromIterator<(K, V)> for MapEnv
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            vars: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

impl EnvSource for MapEnv {
    fn var(&self, key: &str) -> Option<String> {
        self.vars.get(key).cloned()
    }
}

/// The primary credential is missing, so no client should be built.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("required configuration `{key}` is not set")]
pub struct MissingConfig {
    pub key: &'static str,
}

/// Named, optional Firebase web-app settings.
///
/// Every field is optional; only [`api_key`](Self::api_key) decides whether a
/// client is built at all. Format checks are left to the
/// [`Connector`](crate::Connector).
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FirebaseConfig {
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default)]
    pub auth_domain: Option<String>,
    #[serde(default)]
    pub project_id: Option<String>,
    #[serde(default)]
    pub storage_bucket: Option<String>,
    #[serde(default)]
    pub messaging_sender_id: Option<String>,
    #[serde(default)]
    pub app_id: Option<String>,
    #[serde(default)]
    pub emulator_host: Option<String>,
}

impl FirebaseConfig {
    /// Populate the record from the fixed `FIREBASE_*` variable names.
    ///
    /// Unset, empty and whitespace-only variables all come back as `None`.
    pub fn from_env(env: &impl EnvSource) -> Self {
        let read = |key: &str| normalize(env.var(key));
        Self {
            api_key: read(API_KEY_VAR),
            auth_domain: read(AUTH_DOMAIN_VAR),
            project_id: read(PROJECT_ID_VAR),
            storage_bucket: read(STORAGE_BUCKET_VAR),
            messaging_sender_id: read(MESSAGING_SENDER_ID_VAR),
            app_id: read(APP_ID_VAR),
            emulator_host: read(EMULATOR_HOST_VAR),
        }
    }

    /// Field-by-field overlay: values present in `other` replace ours.
    pub fn merge(mut self, other: FirebaseConfig) -> Self {
        fn pick(ours: &mut Option<String>, theirs: Option<String>) {
            if theirs.is_some() {
                *ours = theirs;
            }
        }

        pick(&mut self.api_key, other.api_key);
        pick(&mut self.auth_domain, other.auth_domain);
        pick(&mut self.project_id, other.project_id);
        pick(&mut self.storage_bucket, other.storage_bucket);
        pick(&mut self.messaging_sender_id, other.messaging_sender_id);
        pick(&mut self.app_id, other.app_id);
        pick(&mut self.emulator_host, other.emulator_host);
        self
    }

    /// Normalizes values that came from somewhere other than [`from_env`](Self::from_env),
    /// e.g. a deserialized config file.
    pub fn normalized(self) -> Self {
        Self {
            api_key: normalize(self.api_key),
            auth_domain: normalize(self.auth_domain),
            project_id: normalize(self.project_id),
            storage_bucket: normalize(self.storage_bucket),
            messaging_sender_id: normalize(self.messaging_sender_id),
            app_id: normalize(self.app_id),
            emulator_host: normalize(self.emulator_host),
        }
    }

    /// Checks that the primary credential is present.
    pub fn credentials(&self) -> Result<Credentials<'_>, MissingConfig> {
        match self.api_key.as_deref().map(str::trim) {
            Some(key) if !key.is_empty() => Ok(Credentials {
                api_key: key,
                config: self,
            }),
            _ => Err(MissingConfig { key: API_KEY_VAR }),
        }
    }
}

impl fmt::Debug for FirebaseConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FirebaseConfig")
            .field("api_key", &self.api_key.as_deref().map(redact))
            .field("auth_domain", &self.auth_domain)
            .field("project_id", &self.project_id)
            .field("storage_bucket", &self.storage_bucket)
            .field("messaging_sender_id", &self.messaging_sender_id)
            .field("app_id", &self.app_id)
            .field("emulator_host", &self.emulator_host)
            .finish()
    }
}

/// A configuration record whose primary credential is known to be present.
#[derive(Clone, Copy)]
pub struct Credentials<'a> {
    api_key: &'a str,
    config: &'a FirebaseConfig,
}

impl<'a> Credentials<'a> {
    pub fn api_key(&self) -> &'a str {
        self.api_key
    }

    pub fn config(&self) -> &'a FirebaseConfig {
        self.config
    }
}

impl fmt::Debug for Credentials<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("api_key", &redact(self.api_key))
            .finish_non_exhaustive()
    }
}

/// Masks all but the last four characters of a secret.
pub fn redact(secret: &str) -> String {
    let chars: Vec<char> = secret.chars().collect();
    if chars.len() <= 4 {
        return "****".to_string();
    }
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("****{tail}")
}

fn normalize(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
