use keystone_core::{error::KeystoneError, normalize::RawError};
use reqwest::StatusCode;

use crate::api_v1::ApiErrorBody;

/// High-level error type covering every failure mode the client can hit.
#[derive(Debug, thiserror::Error)]
pub enum SupabaseError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("couldn’t serialise body: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("Supabase returned non-success status {status}: {body}")]
    Api { status: StatusCode, body: ApiErrorBody },

    #[error("Supabase format error: {0}")]
    Format(String),
}

impl From<SupabaseError> for KeystoneError {
    fn from(value: SupabaseError) -> Self {
        KeystoneError::Backend(Box::new(value))
    }
}

impl From<SupabaseError> for RawError {
    fn from(value: SupabaseError) -> Self {
        match value {
            // A body without message or code still has a status worth keeping.
            SupabaseError::Api { status, body } => match RawError::from(&body) {
                RawError::Empty => RawError::code(status.as_u16().to_string()),
                raw => raw,
            },
            other => RawError::message(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_error_keeps_backend_message_and_code() {
        let body: ApiErrorBody = serde_json::from_str(
            r#"{"code":"PGRST116","details":"The result contains 0 rows","hint":null,"message":"JSON object requested, multiple (or no) rows returned"}"#,
        )
        .unwrap();
        let err = SupabaseError::Api {
            status: StatusCode::NOT_ACCEPTABLE,
            body,
        };

        assert_eq!(
            RawError::from(err),
            RawError::message("JSON object requested, multiple (or no) rows returned")
                .with_code("PGRST116")
        );
    }

    #[test]
    fn empty_api_body_falls_back_to_status() {
        let err = SupabaseError::Api {
            status: StatusCode::BAD_GATEWAY,
            body: ApiErrorBody::default(),
        };
        assert_eq!(RawError::from(err), RawError::code("502"));
    }

    #[test]
    fn other_errors_become_messages() {
        let err = SupabaseError::Format("missing session".into());
        assert_eq!(
            RawError::from(err),
            RawError::message("Supabase format error: missing session")
        );
    }

    #[test]
    fn converts_into_backend_error() {
        let err: KeystoneError = SupabaseError::Format("x".into()).into();
        assert!(matches!(err, KeystoneError::Backend(_)));
        assert!(!err.is_config());
    }
}
