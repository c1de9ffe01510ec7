//! Mapping of raw backend errors onto stable, user-facing messages.
//!
//! Backends word their errors however they like and may change that wording
//! between releases.  [`normalize_error`] pins the known cases to fixed
//! messages, passes unknown messages through, and never fails.
use serde_json::Value;

use crate::envelope::{Envelope, Failure};

/// Message used when an error carries nothing usable.
pub const FALLBACK_MESSAGE: &str = "An unexpected error occurred";

const NOT_FOUND: &str = "The requested record was not found";
const PERMISSION_DENIED: &str = "You do not have permission to perform this action";

/// Postgres appends ` for table "<name>"` to this one.
const RLS_VIOLATION: &str = "new row violates row-level security policy";

const MESSAGE_TABLE: &[(&str, &str)] = &[
    ("Invalid login credentials", "Invalid email or password"),
    (
        "User already registered",
        "An account with this email already exists",
    ),
    (
        "Email not confirmed",
        "Please confirm your email address before signing in",
    ),
    (
        "JSON object requested, multiple (or no) rows returned",
        NOT_FOUND,
    ),
    (RLS_VIOLATION, PERMISSION_DENIED),
];

const CODE_TABLE: &[(&str, &str)] = &[("PGRST116", NOT_FOUND), ("42501", PERMISSION_DENIED)];

/// Error shapes a backend call can fail with.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum RawError {
    Message {
        message: String,
        code: Option<String>,
    },
    Code {
        code: String,
    },
    /// Present, but without anything to show.
    #[default]
    Empty,
}

impl RawError {
    pub fn message(message: impl Into<String>) -> Self {
        RawError::Message {
            message: message.into(),
            code: None,
        }
    }

    pub fn code(code: impl Into<String>) -> Self {
        RawError::Code { code: code.into() }
    }

    /// Attach (or replace) the backend code.
    pub fn with_code(self, code: impl Into<String>) -> Self {
        match self {
            RawError::Message { message, .. } => RawError::Message {
                message,
                code: Some(code.into()),
            },
            RawError::Code { .. } | RawError::Empty => RawError::code(code),
        }
    }

    /// Read an error out of arbitrary JSON.
    ///
    /// Only `message` (string) and `code` (string or number) are looked at;
    /// anything else, including non-objects, degrades to a partial variant or
    /// [`RawError::Empty`].
    pub fn from_json(value: &Value) -> Self {
        let message = value
            .get("message")
            .and_then(Value::as_str)
            .map(str::to_owned);
        let code = value.get("code").and_then(|code| match code {
            Value::String(code) => Some(code.clone()),
            Value::Number(code) => Some(code.to_string()),
            _ => None,
        });

        match (message, code) {
            (Some(message), code) => RawError::Message { message, code },
            (None, Some(code)) => RawError::Code { code },
            (None, None) => RawError::Empty,
        }
    }

    pub fn message_text(&self) -> Option<&str> {
        match self {
            RawError::Message { message, .. } => Some(message),
            RawError::Code { .. } | RawError::Empty => None,
        }
    }

    pub fn code_text(&self) -> Option<&str> {
        match self {
            RawError::Message { code, .. } => code.as_deref(),
            RawError::Code { code } => Some(code),
            RawError::Empty => None,
        }
    }
}

impl From<&str> for RawError {
    fn from(message: &str) -> Self {
        RawError::message(message)
    }
}

impl From<String> for RawError {
    fn from(message: String) -> Self {
        RawError::message(message)
    }
}

impl From<Value> for RawError {
    fn from(value: Value) -> Self {
        RawError::from_json(&value)
    }
}

fn lookup_message(message: &str) -> Option<&'static str> {
    MESSAGE_TABLE
        .iter()
        .find(|(raw, _)| *raw == message)
        .map(|(_, friendly)| *friendly)
        .or_else(|| message.starts_with(RLS_VIOLATION).then_some(PERMISSION_DENIED))
}

fn lookup_code(code: &str) -> Option<&'static str> {
    CODE_TABLE
        .iter()
        .find(|(raw, _)| *raw == code)
        .map(|(_, friendly)| *friendly)
}

/// Turn any error, or the lack of one, into a [`Failure`].
///
/// Resolution order: known message, known code, the raw message itself,
/// [`FALLBACK_MESSAGE`].  The backend code is carried over untouched.
pub fn normalize_error(error: Option<&RawError>) -> Failure {
    tracing::error!(?error, "backend call failed");

    let message = error
        .and_then(RawError::message_text)
        .filter(|message| !message.is_empty());
    let code = error.and_then(RawError::code_text);

    let resolved = message
        .and_then(lookup_message)
        .or_else(|| code.and_then(lookup_code))
        .or(message)
        .unwrap_or(FALLBACK_MESSAGE);

    Failure::new(resolved.to_owned(), code.map(str::to_owned))
}

/// Wrap a call result: any present error, even [`RawError::Empty`], makes
/// the envelope a failure regardless of `data`.
pub fn wrap_response<T>(data: Option<T>, error: Option<&RawError>) -> Envelope<T> {
    match error {
        Some(error) => Envelope::Failure(normalize_error(Some(error))),
        None => Envelope::Success(data),
    }
}
