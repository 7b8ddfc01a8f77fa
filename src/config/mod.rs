//! Connection parameters for the bridge backend.
//!
//! A [`Configuration`] bundles the Firebase app configuration, the service account credentials,
//! the Realtime Database URL and the Storage bucket. Every request sent by a capability client
//! carries these four values as custom headers, see [`Configuration::produce_headers`].
//!
//! # Examples
//!
//! ```rust,no_run
//! # use databridge::config::Configuration;
//! # use serde_json::json;
//! let config = Configuration::new(
//!     json!({ "apiKey": "key", "projectId": "my-project" }),
//!     std::path::Path::new("service-account.json"),
//!     "https://my-project.firebaseio.com",
//!     "my-project.appspot.com",
//! )?;
//!
//! let headers = config.produce_headers();
//! assert_eq!(headers["storagebucket"], "my-project.appspot.com");
//! # Ok::<(), databridge::config::ConfigError>(())
//! ```

use serde::Serialize;
use serde_json::ser::{Formatter, Serializer};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use std::fs::File;
use std::hash::{Hash, Hasher};
use std::io::{self, BufReader, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[cfg(test)]
mod tests;

/// Base URL of the hosted bridge backend, used unless overridden with
/// [`Configuration::with_base_url`].
pub const DEFAULT_BASE_URL: &str = "https://fir-connect-ea9c9.uc.r.appspot.com";

/// The header mapping sent with every request.
pub type Headers = BTreeMap<String, String>;

const FIREBASE_CONFIG: &str = "firebase_config";
const SERVICE_ACCOUNT: &str = "service_account";
const DATABASE_URL: &str = "database_url";
const STORAGE_BUCKET: &str = "storage_bucket";

/// Field names accepted by [`Configuration::get`] and [`Configuration::set`], in declaration order.
pub const FIELDS: [&str; 4] = [FIREBASE_CONFIG, SERVICE_ACCOUNT, DATABASE_URL, STORAGE_BUCKET];

/// Errors that can occur while building or editing a [`Configuration`].
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The service account file could not be opened or read.
    #[error("failed to read service account file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// The service account file does not contain valid JSON.
    #[error("invalid service account JSON: {0}")]
    Json(#[from] serde_json::Error),
    /// The key is not one of [`FIELDS`].
    #[error("unknown field: {0}")]
    UnknownField(String),
    /// A string field was assigned a non-string value.
    #[error("field {field} expects a string value")]
    InvalidValue { field: &'static str },
}

/// Where the service account credentials come from.
#[derive(Debug, Clone)]
pub enum ServiceAccount {
    /// Credentials given as an already-parsed JSON object.
    Inline(Value),
    /// Path to a JSON file holding the credentials. Read once, when the configuration is built.
    Path(PathBuf),
}

impl From<Value> for ServiceAccount {
    fn from(value: Value) -> Self {
        ServiceAccount::Inline(value)
    }
}

impl From<PathBuf> for ServiceAccount {
    fn from(path: PathBuf) -> Self {
        ServiceAccount::Path(path)
    }
}

impl From<&Path> for ServiceAccount {
    fn from(path: &Path) -> Self {
        ServiceAccount::Path(path.to_path_buf())
    }
}

impl ServiceAccount {
    fn resolve(self) -> Result<Value, ConfigError> {
        match self {
            ServiceAccount::Inline(value) => Ok(value),
            ServiceAccount::Path(path) => {
                let file = File::open(&path).map_err(|source| ConfigError::Io {
                    path: path.clone(),
                    source,
                })?;
                Ok(serde_json::from_reader(BufReader::new(file))?)
            }
        }
    }
}

/// Credentials and locations from which request headers are derived.
///
/// Equality and hashing consider the four header fields only; the base URL is ignored.
#[derive(Debug, Clone)]
pub struct Configuration {
    firebase_config: Value,
    service_account: Value,
    database_url: String,
    storage_bucket: String,
    base_url: String,
}

impl Configuration {
    /// Creates a new `Configuration` pointing at [`DEFAULT_BASE_URL`].
    ///
    /// When `service_account` is a path the file is read and parsed here, exactly once.
    /// None of the values are otherwise validated.
    pub fn new(
        firebase_config: Value,
        service_account: impl Into<ServiceAccount>,
        database_url: impl Into<String>,
        storage_bucket: impl Into<String>,
    ) -> Result<Self, ConfigError> {
        Ok(Self {
            firebase_config,
            service_account: service_account.into().resolve()?,
            database_url: database_url.into(),
            storage_bucket: storage_bucket.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
        })
    }

    /// Replaces the base URL requests are sent to.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn app_config(&self) -> &Value {
        &self.firebase_config
    }

    pub fn service_account(&self) -> &Value {
        &self.service_account
    }

    pub fn database_url(&self) -> &str {
        &self.database_url
    }

    pub fn storage_bucket(&self) -> &str {
        &self.storage_bucket
    }

    /// Builds the header mapping from the current field values.
    ///
    /// The result is computed on every call, so edits made through [`Configuration::set`]
    /// show up in the next call. The two JSON headers are compact and pure ASCII: any other
    /// character is written as a `\uXXXX` escape.
    pub fn produce_headers(&self) -> Headers {
        Headers::from([
            ("firebaseconfig".to_string(), ascii_json(&self.firebase_config)),
            ("serviceaccount".to_string(), ascii_json(&self.service_account)),
            ("databaseurl".to_string(), self.database_url.clone()),
            ("storagebucket".to_string(), self.storage_bucket.clone()),
        ])
    }

    /// Number of fields addressable through [`Configuration::get`].
    pub fn len(&self) -> usize {
        FIELDS.len()
    }

    /// A configuration always has its four fields, so this is always `false`.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Returns the value of the named field.
    pub fn get(&self, key: &str) -> Result<Value, ConfigError> {
        match key {
            FIREBASE_CONFIG => Ok(self.firebase_config.clone()),
            SERVICE_ACCOUNT => Ok(self.service_account.clone()),
            DATABASE_URL => Ok(Value::String(self.database_url.clone())),
            STORAGE_BUCKET => Ok(Value::String(self.storage_bucket.clone())),
            _ => Err(ConfigError::UnknownField(key.to_string())),
        }
    }

    /// Replaces the value of the named field.
    pub fn set(&mut self, key: &str, value: Value) -> Result<(), ConfigError> {
        match key {
            FIREBASE_CONFIG => self.firebase_config = value,
            SERVICE_ACCOUNT => self.service_account = value,
            DATABASE_URL => self.database_url = expect_string(DATABASE_URL, value)?,
            STORAGE_BUCKET => self.storage_bucket = expect_string(STORAGE_BUCKET, value)?,
            _ => return Err(ConfigError::UnknownField(key.to_string())),
        }
        Ok(())
    }

    /// Iterates over `(field, value)` pairs in the order of [`FIELDS`].
    pub fn entries(&self) -> impl Iterator<Item = (&'static str, Value)> + '_ {
        FIELDS.into_iter().filter_map(move |key| Some((key, self.get(key).ok()?)))
    }
}

fn expect_string(field: &'static str, value: Value) -> Result<String, ConfigError> {
    match value {
        Value::String(s) => Ok(s),
        _ => Err(ConfigError::InvalidValue { field }),
    }
}

/// Compact JSON formatter that escapes every non-ASCII character, surrogate pairs included.
struct AsciiFormatter;

impl Formatter for AsciiFormatter {
    fn write_string_fragment<W>(&mut self, writer: &mut W, fragment: &str) -> io::Result<()>
    where
        W: ?Sized + Write,
    {
        let mut units = [0u16; 2];
        for ch in fragment.chars() {
            if ch.is_ascii() {
                writer.write_all(&[ch as u8])?;
            } else {
                for unit in ch.encode_utf16(&mut units) {
                    write!(writer, "\\u{:04x}", unit)?;
                }
            }
        }
        Ok(())
    }
}

fn ascii_json(value: &Value) -> String {
    let mut out = Vec::new();
    let mut serializer = Serializer::with_formatter(&mut out, AsciiFormatter);
    match value.serialize(&mut serializer) {
        // The formatter only emits ASCII.
        Ok(()) => String::from_utf8_lossy(&out).into_owned(),
        Err(_) => value.to_string(),
    }
}

// Object keys are sorted so that equal values always hash alike, whatever the map ordering.
fn canonical_json(value: &Value) -> String {
    match value {
        Value::Object(map) => {
            let mut entries: Vec<_> = map.iter().collect();
            entries.sort_by(|a, b| a.0.cmp(b.0));
            let fields: Vec<String> = entries
                .into_iter()
                .map(|(key, value)| format!("{}:{}", Value::from(key.as_str()), canonical_json(value)))
                .collect();
            format!("{{{}}}", fields.join(","))
        }
        Value::Array(items) => {
            let items: Vec<String> = items.iter().map(canonical_json).collect();
            format!("[{}]", items.join(","))
        }
        other => other.to_string(),
    }
}

impl PartialEq for Configuration {
    fn eq(&self, other: &Self) -> bool {
        self.firebase_config == other.firebase_config
            && self.service_account == other.service_account
            && self.database_url == other.database_url
            && self.storage_bucket == other.storage_bucket
    }
}

impl Eq for Configuration {}

impl Hash for Configuration {
    fn hash<H: Hasher>(&self, state: &mut H) {
        canonical_json(&self.firebase_config).hash(state);
        canonical_json(&self.service_account).hash(state);
        self.database_url.hash(state);
        self.storage_bucket.hash(state);
    }
}

impl fmt::Display for Configuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rendered =
            serde_json::to_string_pretty(&self.produce_headers()).map_err(|_| fmt::Error)?;
        f.write_str(&rendered)
    }
}
