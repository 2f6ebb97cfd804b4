use std::collections::BTreeMap;
use std::fmt;

use thiserror::Error;

use crate::types::ResourceKind;

/// Field-level validation messages, keyed by field name.
///
/// Produced both by local form validation and by the backend's 400/422
/// responses, so the form can show them inline either way.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors(BTreeMap<String, String>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a message for `field`. The first message for a field wins.
    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.0.entry(field.into()).or_insert_with(|| message.into());
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }

    pub fn merge(&mut self, other: FieldErrors) {
        for (field, message) in other.0 {
            self.add(field, message);
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn into_result(self) -> Result<()> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(KeepsakeError::Validation(self))
        }
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.0.iter().map(|(k, v)| format!("{k}: {v}")).collect();
        write!(f, "{}", parts.join("; "))
    }
}

#[derive(Error, Debug)]
pub enum KeepsakeError {
    #[error("network error: {0}")]
    Network(String),

    #[error("authentication error: {0}")]
    Auth(String),

    #[error("validation failed: {0}")]
    Validation(FieldErrors),

    #[error("server error{}: {message}", .status.map(|s| format!(" ({s})")).unwrap_or_default())]
    Server {
        status: Option<u16>,
        message: String,
    },

    #[error("not found: {0}")]
    NotFound(String),

    #[error("{kind} does not support {operation}")]
    Unsupported {
        kind: ResourceKind,
        operation: &'static str,
    },

    #[error("page size {size} is not allowed for {kind} (allowed: {allowed})")]
    InvalidPageSize {
        kind: ResourceKind,
        size: u32,
        allowed: String,
    },

    #[error("configuration error: {0}")]
    Config(String),

    #[error("invalid URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parse error: {0}")]
    YamlParse(#[from] serde_yaml_ng::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{0}")]
    Other(String),
}

/// Coarse classification used to decide how an error is surfaced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Network,
    Auth,
    Validation,
    Server,
    NotFound,
    /// Rejected locally before reaching the backend.
    Client,
}

impl KeepsakeError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            KeepsakeError::Network(_) => ErrorKind::Network,
            KeepsakeError::Auth(_) => ErrorKind::Auth,
            KeepsakeError::Validation(_) => ErrorKind::Validation,
            KeepsakeError::Server { .. } | KeepsakeError::Json(_) => ErrorKind::Server,
            KeepsakeError::NotFound(_) => ErrorKind::NotFound,
            _ => ErrorKind::Client,
        }
    }

    /// Whether the session has to be re-established before retrying.
    pub fn requires_login(&self) -> bool {
        self.kind() == ErrorKind::Auth
    }

    pub fn unexpected_shape(detail: impl fmt::Display) -> Self {
        KeepsakeError::Server {
            status: None,
            message: format!("unexpected response shape: {detail}"),
        }
    }
}

pub type Result<T> = std::result::Result<T, KeepsakeError>;
