//! The uniform result shape handed back to application code.
//!
//! On the wire an [`Envelope`] looks like
//!
//! ```json
//! { "success": true,  "data": { "id": 1 } }
//! { "success": false, "error": "Invalid email or password", "code": "invalid_credentials" }
//! ```
//!
//! `data` is omitted when absent, and `code` is omitted when the backend did
//! not report one.  A success never carries `error`; a failure never carries
//! `data` and its `error` is never empty.
use serde::{Deserialize, Deserializer, Serialize, Serializer, de};
use thiserror::Error;

use crate::normalize::{RawError, normalize_error};

/// User-facing description of a failed call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{error}")]
pub struct Failure {
    error: String,
    code: Option<String>,
}

impl Failure {
    /// `error` must be non-empty; [`normalize_error`] is the only producer.
    pub(crate) fn new(error: String, code: Option<String>) -> Self {
        debug_assert!(!error.is_empty());
        Self { error, code }
    }

    /// Human-readable message, stable for the known error set.
    pub fn message(&self) -> &str {
        &self.error
    }

    /// Code reported by the backend, untouched.
    pub fn code(&self) -> Option<&str> {
        self.code.as_deref()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Envelope<T> {
    Success(Option<T>),
    Failure(Failure),
}

impl<T> Envelope<T> {
    /// Fold a backend call result into an envelope, normalizing the error.
    pub fn from_result<E>(result: std::result::Result<T, E>) -> Self
    where
        E: Into<RawError>,
    {
        match result {
            Ok(data) => Envelope::Success(Some(data)),
            Err(err) => Envelope::Failure(normalize_error(Some(&err.into()))),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Envelope::Success(_))
    }

    pub fn is_failure(&self) -> bool {
        !self.is_success()
    }

    pub fn data(&self) -> Option<&T> {
        match self {
            Envelope::Success(data) => data.as_ref(),
            Envelope::Failure(_) => None,
        }
    }

    pub fn failure(&self) -> Option<&Failure> {
        match self {
            Envelope::Success(_) => None,
            Envelope::Failure(failure) => Some(failure),
        }
    }

    pub fn error(&self) -> Option<&str> {
        self.failure().map(Failure::message)
    }

    pub fn code(&self) -> Option<&str> {
        self.failure().and_then(Failure::code)
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Envelope<U> {
        match self {
            Envelope::Success(data) => Envelope::Success(data.map(f)),
            Envelope::Failure(failure) => Envelope::Failure(failure),
        }
    }

    /// Leave envelope land, e.g. to use `?` at the call site.
    pub fn into_result(self) -> std::result::Result<Option<T>, Failure> {
        match self {
            Envelope::Success(data) => Ok(data),
            Envelope::Failure(failure) => Err(failure),
        }
    }
}

impl<T> From<Failure> for Envelope<T> {
    fn from(failure: Failure) -> Self {
        Envelope::Failure(failure)
    }
}

#[derive(Serialize)]
struct EnvelopeRef<'a, T> {
    success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<&'a T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    code: Option<&'a str>,
}

#[derive(Deserialize)]
struct EnvelopeOwned<T> {
    success: bool,
    data: Option<T>,
    error: Option<String>,
    code: Option<String>,
}

impl<T: Serialize> Serialize for Envelope<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let repr = match self {
            Envelope::Success(data) => EnvelopeRef {
                success: true,
                data: data.as_ref(),
                error: None,
                code: None,
            },
            Envelope::Failure(failure) => EnvelopeRef {
                success: false,
                data: None,
                error: Some(failure.message()),
                code: failure.code(),
            },
        };
        repr.serialize(serializer)
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for Envelope<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let repr = EnvelopeOwned::<T>::deserialize(deserializer)?;

        if repr.success {
            if repr.error.is_some() {
                return Err(de::Error::custom("successful envelope carries an error"));
            }
            return Ok(Envelope::Success(repr.data));
        }

        if repr.data.is_some() {
            return Err(de::Error::custom("failed envelope carries data"));
        }
        match repr.error {
            Some(error) if !error.is_empty() => Ok(Envelope::Failure(Failure {
                error,
                code: repr.code,
            })),
            _ => Err(de::Error::custom("failed envelope has no error message")),
        }
    }
}
