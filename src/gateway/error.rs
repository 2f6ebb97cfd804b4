//! Mapping of HTTP failures onto the client's error taxonomy.
//!
//! Backends report errors in several shapes (`{"detail": "..."}`,
//! `{"detail": [{"loc": [...], "msg": "..."}]}`, `{"message": "...",
//! "errors": {...}}`); [`ApiError`] normalizes them before they are turned into
//! a [`KeepsakeError`].

use std::fmt;

use reqwest::StatusCode;
use serde_json::Value;

use crate::error::{FieldErrors, KeepsakeError};

/// Field key for validation messages that do not belong to a single field.
pub const FORM_FIELD: &str = "form";

/// A non-2xx response, with whatever detail could be extracted from its body.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
    pub fields: FieldErrors,
}

impl ApiError {
    pub fn from_response(status: StatusCode, body: &str) -> Self {
        let mut fields = FieldErrors::new();
        let mut message = None;

        if let Ok(json) = serde_json::from_str::<Value>(body) {
            match json.get("detail") {
                Some(Value::String(s)) => message = Some(s.clone()),
                Some(Value::Array(entries)) => {
                    for entry in entries {
                        if let Some((field, msg)) = fastapi_entry(entry) {
                            fields.add(field, msg);
                        }
                    }
                }
                _ => {}
            }

            for key in ["message", "error"] {
                if message.is_none()
                    && let Some(Value::String(s)) = json.get(key)
                {
                    message = Some(s.clone());
                }
            }

            if let Some(Value::Object(errors)) = json.get("errors") {
                for (field, value) in errors {
                    let msg = match value {
                        Value::String(s) => Some(s.clone()),
                        Value::Array(list) => list.iter().find_map(|v| v.as_str()).map(String::from),
                        _ => None,
                    };
                    if let Some(msg) = msg {
                        fields.add(field.clone(), msg);
                    }
                }
            }
        } else if !body.trim().is_empty() {
            message = Some(body.trim().chars().take(200).collect());
        }

        let message = message.unwrap_or_else(|| {
            status
                .canonical_reason()
                .unwrap_or("unexpected status")
                .to_string()
        });

        Self {
            status,
            message,
            fields,
        }
    }

    /// Convert into the client's error taxonomy.
    pub fn into_error(self) -> KeepsakeError {
        match self.status.as_u16() {
            401 | 403 => KeepsakeError::Auth(self.message),
            404 => KeepsakeError::NotFound(self.message),
            400 | 409 | 422 => {
                let mut fields = self.fields;
                if fields.is_empty() {
                    fields.add(FORM_FIELD, self.message);
                }
                KeepsakeError::Validation(fields)
            }
            code => KeepsakeError::Server {
                status: Some(code),
                message: self.message,
            },
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.status.as_u16(), self.message)
    }
}

impl From<ApiError> for KeepsakeError {
    fn from(error: ApiError) -> Self {
        error.into_error()
    }
}

/// `{"loc": ["body", "name"], "msg": "field required"}` → `("name", "field required")`.
/// A location naming only the request part belongs to the whole form.
fn fastapi_entry(entry: &Value) -> Option<(String, String)> {
    let msg = entry.get("msg")?.as_str()?.to_string();
    let field = entry
        .get("loc")
        .and_then(Value::as_array)
        .and_then(|loc| {
            loc.iter()
                .filter(|part| !matches!(part.as_str(), Some("body" | "query" | "path")))
                .next_back()
        })
        .map(|last| match last {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        })
        .unwrap_or_else(|| FORM_FIELD.to_string());
    Some((field, msg))
}

/// Classify a transport-level failure (no usable response).
pub fn transport_error(error: reqwest::Error) -> KeepsakeError {
    if error.is_timeout() {
        KeepsakeError::Network("request timed out".to_string())
    } else if error.is_connect() {
        KeepsakeError::Network(format!("connection failed: {error}"))
    } else if error.is_decode() {
        KeepsakeError::unexpected_shape(error)
    } else {
        KeepsakeError::Network(error.to_string())
    }
}
