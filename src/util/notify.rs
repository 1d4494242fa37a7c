//! Toast notifications: what to tell the user after an operation.
//!
//! Error text follows one chain everywhere: the server's `message`, else the
//! first field error, else a generic apology. Classified errors already carry
//! the first two steps (see `AuthError::from_http`), so only errors without a
//! server explanation fall through to the generic text here.

#[cfg(test)]
#[path = "notify_test.rs"]
mod notify_test;

use crate::net::types::AuthError;

pub const GENERIC_FAILURE: &str = "An unexpected error occurred. Please try again.";

/// How long a toast stays on screen.
pub const TOAST_LIFETIME_MS: u32 = 3000;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ToastKind {
    Success,
    Error,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Toast {
    pub kind: ToastKind,
    pub text: String,
}

impl Toast {
    #[must_use]
    pub fn success(text: impl Into<String>) -> Self {
        Self { kind: ToastKind::Success, text: text.into() }
    }

    /// Error toast for `err`, with `custom` taking precedence when given.
    /// Superseded results are silent: the operation that replaced them
    /// reports its own outcome.
    #[must_use]
    pub fn error(err: &AuthError, custom: Option<&str>) -> Option<Self> {
        if matches!(err, AuthError::Superseded) {
            return None;
        }
        let text = custom.map_or_else(|| error_message(err), str::to_owned);
        Some(Self { kind: ToastKind::Error, text })
    }
}

/// User-facing text for `err`.
#[must_use]
pub fn error_message(err: &AuthError) -> String {
    match err {
        AuthError::AuthorizationDenied { message }
        | AuthError::AntiForgeryMismatch { message }
        | AuthError::ValidationFailed { message, .. }
        | AuthError::Rejected { message, .. }
        | AuthError::Transient { message, .. } => {
            let trimmed = message.trim();
            if trimmed.is_empty() {
                GENERIC_FAILURE.to_owned()
            } else {
                trimmed.to_owned()
            }
        }
        AuthError::Decode(_) | AuthError::Superseded => GENERIC_FAILURE.to_owned(),
    }
}
