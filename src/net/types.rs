//! Wire types shared by the auth gateway, resource services and session store.
//!
//! DESIGN
//! ======
//! Server failures arrive as loosely shaped JSON (`message`, `errors`, bare
//! strings, or nothing). They are decoded exactly once, at the gateway
//! boundary, into [`AuthError`] so nothing downstream inspects raw bodies.

#[cfg(test)]
#[path = "types_test.rs"]
mod types_test;

use std::collections::BTreeMap;

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use super::api::HttpError;

/// Request body for login, registration and password-reset calls. The core
/// treats it as an opaque map of field name to value.
pub type Payload = serde_json::Map<String, Value>;

/// Field name -> validation messages, as returned with a 422.
pub type FieldErrors = BTreeMap<String, Vec<String>>;

/// The signed-in user as returned by the current-user endpoint.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Identity {
    /// User identifier; numeric ids are normalised to their decimal string.
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,
    /// Role name (e.g. `"admin"`, `"faculty"`), if the server sends one.
    /// Numeric roles and `{"name": ...}` role objects are reduced to text;
    /// any other shape is dropped rather than rejecting the user.
    #[serde(default, deserialize_with = "deserialize_role", skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    /// Every other field, kept verbatim for display.
    #[serde(flatten)]
    pub attributes: Payload,
}

impl Identity {
    /// Decode an identity from a current-user response. Accepts both the
    /// `{"data": {...}}` envelope and a bare user object.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::Decode`] if the payload is not a user object.
    pub fn from_response(value: Value) -> Result<Self, AuthError> {
        let user = match value {
            Value::Object(mut map) if map.get("data").is_some_and(Value::is_object) => {
                map.remove("data").unwrap_or(Value::Null)
            }
            other => other,
        };
        serde_json::from_value(user).map_err(|e| AuthError::Decode(e.to_string()))
    }

    /// Name for display, falling back to the identifier.
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.attributes
            .get("name")
            .and_then(Value::as_str)
            .unwrap_or(&self.id)
    }
}

fn deserialize_role<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let role = match Value::deserialize(deserializer)? {
        Value::String(role) => Some(role),
        Value::Number(number) => Some(number.to_string()),
        Value::Object(map) => map.get("name").and_then(Value::as_str).map(str::to_owned),
        _ => None,
    };
    Ok(role.filter(|r| !r.trim().is_empty()))
}

fn deserialize_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(id) if !id.is_empty() => Ok(id),
        Value::Number(number) if number.is_u64() || number.is_i64() => Ok(number.to_string()),
        Value::Number(_) => Err(D::Error::custom("expected integer id")),
        _ => Err(D::Error::custom("expected string or integer id")),
    }
}

// =============================================================================
// ERROR BODY
// =============================================================================

/// The parts of a server error body the console understands.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ErrorBody {
    pub message: Option<String>,
    pub errors: FieldErrors,
}

impl ErrorBody {
    /// Pull `message` and `errors` out of an arbitrary body. Unexpected shapes
    /// yield empty fields rather than an error.
    #[must_use]
    pub fn parse(body: &Value) -> Self {
        let message = match body {
            Value::Object(map) => map.get("message").and_then(Value::as_str),
            Value::String(text) => Some(text.as_str()),
            _ => None,
        }
        .map(str::trim)
        .filter(|m| !m.is_empty())
        .map(str::to_owned);

        let errors = body
            .get("errors")
            .and_then(|errors| serde_json::from_value::<FieldErrors>(errors.clone()).ok())
            .unwrap_or_default();

        Self { message, errors }
    }

    /// Server message, else the first field error.
    #[must_use]
    pub fn user_message(&self) -> Option<String> {
        if let Some(message) = &self.message {
            return Some(message.clone());
        }
        self.errors
            .values()
            .find_map(|messages| messages.first())
            .cloned()
    }
}

// =============================================================================
// AUTH ERROR
// =============================================================================

/// A classified failure from the auth gateway or a resource call.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum AuthError {
    /// 401: the session is absent or expired.
    #[error("{message}")]
    AuthorizationDenied { message: String },
    /// 419: the anti-forgery token is stale.
    #[error("{message}")]
    AntiForgeryMismatch { message: String },
    /// 422: field-level validation errors.
    #[error("{message}")]
    ValidationFailed { message: String, fields: FieldErrors },
    /// Any other 4xx.
    #[error("{message}")]
    Rejected { status: u16, message: String },
    /// 5xx, or no response at all (`status` is `None`).
    #[error("{message}")]
    Transient { status: Option<u16>, message: String },
    /// A success response whose body was not the expected shape.
    #[error("unexpected response: {0}")]
    Decode(String),
    /// The result belonged to a session operation that a newer one replaced.
    #[error("superseded by a newer session operation")]
    Superseded,
}

impl AuthError {
    /// Classify a transport failure. `fallback` is used when the server gave
    /// no usable message.
    #[must_use]
    pub fn from_http(err: HttpError, fallback: &str) -> Self {
        let body = ErrorBody::parse(&err.body);
        let message = body.user_message().unwrap_or_else(|| fallback.to_owned());
        match err.status {
            Some(401) => Self::AuthorizationDenied { message },
            Some(419) => Self::AntiForgeryMismatch { message },
            Some(422) => Self::ValidationFailed { message, fields: body.errors },
            Some(status) if (400..500).contains(&status) => Self::Rejected { status, message },
            status => Self::Transient { status, message },
        }
    }

    /// Whether this failure proves the server-side session is gone.
    #[must_use]
    pub fn is_authorization_denied(&self) -> bool {
        matches!(self, Self::AuthorizationDenied { .. })
    }

    /// Field errors of a validation failure.
    #[must_use]
    pub fn field_errors(&self) -> Option<&FieldErrors> {
        match self {
            Self::ValidationFailed { fields, .. } => Some(fields),
            _ => None,
        }
    }
}
