use std::fmt;

use keystone_core::normalize::RawError;
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[macro_export]
macro_rules! impl_builder_methods {
    ($builder:ident, $($field:ident: $field_type:ty),*) => {
        impl $builder {
            $(
                pub fn $field(mut self, $field: $field_type) -> Self {
                    self.$field = Some($field);
                    self
                }
            )*
        }
    };
}

/// Error body returned by any Supabase endpoint.
///
/// PostgREST answers with `message`/`code`/`details`/`hint`; the auth server
/// uses `msg`/`error_code` (numeric `code` = HTTP status) or, on older
/// releases, `error`/`error_description`.  All fields are optional so every
/// variant deserializes into the same struct.
#[derive(Debug, Default, Deserialize, Serialize, Clone, PartialEq)]
pub struct ApiErrorBody {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub msg: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hint: Option<Value>,
}

impl ApiErrorBody {
    /// Parse a response body field by field.
    ///
    /// Fields of an unexpected type are skipped rather than failing the whole
    /// body; only text that is not JSON at all is kept verbatim as the message.
    pub fn from_text(text: &str) -> Self {
        match serde_json::from_str::<Value>(text) {
            Ok(Value::Object(fields)) => {
                let text_field = |name: &str| {
                    fields
                        .get(name)
                        .and_then(Value::as_str)
                        .map(str::to_owned)
                };
                let raw_field = |name: &str| fields.get(name).filter(|v| !v.is_null()).cloned();

                Self {
                    message: text_field("message"),
                    msg: text_field("msg"),
                    error_description: text_field("error_description"),
                    code: raw_field("code"),
                    error_code: text_field("error_code"),
                    error: text_field("error"),
                    details: raw_field("details"),
                    hint: raw_field("hint"),
                }
            }
            Ok(Value::String(message)) => Self {
                message: Some(message),
                ..Self::default()
            },
            Ok(_) => Self::default(),
            Err(_) => Self {
                message: Some(text.trim().to_owned()).filter(|text| !text.is_empty()),
                ..Self::default()
            },
        }
    }

    /// First non-empty of `message`, `msg`, `error_description`.
    pub fn message(&self) -> Option<&str> {
        [&self.message, &self.msg, &self.error_description]
            .into_iter()
            .filter_map(|candidate| candidate.as_deref())
            .find(|candidate| !candidate.is_empty())
    }

    /// Most specific code available: auth `error_code`, PostgREST `code`,
    /// then the legacy `error` field.
    pub fn code(&self) -> Option<String> {
        let numeric_or_text = match &self.code {
            Some(Value::String(code)) => Some(code.clone()),
            Some(Value::Number(code)) => Some(code.to_string()),
            _ => None,
        };

        self.error_code
            .clone()
            .filter(|code| !code.is_empty())
            .or(numeric_or_text.filter(|code| !code.is_empty()))
            .or(self.error.clone().filter(|code| !code.is_empty()))
    }
}

impl fmt::Display for ApiErrorBody {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.message(), self.code()) {
            (Some(message), Some(code)) => write!(f, "{message} ({code})"),
            (Some(message), None) => f.write_str(message),
            (None, Some(code)) => write!(f, "({code})"),
            (None, None) => f.write_str("<empty body>"),
        }
    }
}

impl From<&ApiErrorBody> for RawError {
    fn from(body: &ApiErrorBody) -> Self {
        match (body.message(), body.code()) {
            (Some(message), Some(code)) => RawError::message(message).with_code(code),
            (Some(message), None) => RawError::message(message),
            (None, Some(code)) => RawError::code(code),
            (None, None) => RawError::Empty,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn auth_body_prefers_error_code() {
        let body = ApiErrorBody::from_text(
            r#"{"code":400,"error_code":"invalid_credentials","msg":"Invalid login credentials"}"#,
        );
        assert_eq!(body.message(), Some("Invalid login credentials"));
        assert_eq!(body.code().as_deref(), Some("invalid_credentials"));
    }

    #[test]
    fn legacy_auth_body_is_understood() {
        let body = ApiErrorBody::from_text(
            r#"{"error":"invalid_grant","error_description":"Email not confirmed"}"#,
        );
        assert_eq!(
            RawError::from(&body),
            RawError::message("Email not confirmed").with_code("invalid_grant")
        );
    }

    #[test]
    fn mistyped_fields_do_not_hide_the_rest() {
        let body = ApiErrorBody::from_text(r#"{"message":5,"code":"PGRST116"}"#);
        assert_eq!(body.message(), None);
        assert_eq!(body.code().as_deref(), Some("PGRST116"));
        assert_eq!(RawError::from(&body), RawError::code("PGRST116"));
        assert_eq!(
            keystone_core::normalize_error(Some(&RawError::from(&body))).message(),
            "The requested record was not found"
        );

        let body = ApiErrorBody::from_text(
            r#"{"code":"42501","details":["x"],"hint":{"a":1},"message":"permission denied for table notes"}"#,
        );
        assert_eq!(body.message(), Some("permission denied for table notes"));
        assert_eq!(body.code().as_deref(), Some("42501"));
    }

    #[test]
    fn empty_message_defers_to_other_fields() {
        let body = ApiErrorBody::from_text(r#"{"message":"","msg":"Invalid login credentials"}"#);
        assert_eq!(body.message(), Some("Invalid login credentials"));
        assert_eq!(
            keystone_core::normalize_error(Some(&RawError::from(&body))).message(),
            "Invalid email or password"
        );

        let body = ApiErrorBody::from_text(r#"{"error_code":"","code":400}"#);
        assert_eq!(body.code().as_deref(), Some("400"));
    }

    #[test]
    fn non_object_json_is_tolerated() {
        assert_eq!(
            ApiErrorBody::from_text(r#""gateway down""#).message(),
            Some("gateway down")
        );
        assert_eq!(ApiErrorBody::from_text("[1,2]"), ApiErrorBody::default());
        assert_eq!(ApiErrorBody::from_text("null"), ApiErrorBody::default());
    }

    #[test]
    fn plain_text_body_becomes_message() {
        let body = ApiErrorBody::from_text("upstream timed out\n");
        assert_eq!(body.message(), Some("upstream timed out"));
        assert_eq!(body.to_string(), "upstream timed out");

        assert_eq!(ApiErrorBody::from_text(""), ApiErrorBody::default());
        assert_eq!(RawError::from(&ApiErrorBody::default()), RawError::Empty);
    }
}
