use std::{env, time::Duration};

use keystone_core::{
    connection::{ConnectionInfo, SessionOptions},
    error::{KeystoneError, Result},
};
use reqwest::{
    Client as HttpClient, Url,
    header::{AUTHORIZATION, HeaderMap, HeaderValue},
};

use crate::{client::SupabaseClient, error::SupabaseError};

/// Environment variable holding the project URL.
pub const URL_ENV: &str = "SUPABASE_URL";

/// Environment variable holding the public (anon) API key.
pub const ANON_KEY_ENV: &str = "SUPABASE_ANON_KEY";

pub const DEFAULT_SCHEMA: &str = "public";

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Builder for [`SupabaseClient`].
///
/// # Typical usage
///
/// ```rust,no_run
/// use keystone_supabase::SupabaseClientBuilder;
///
/// let backend = SupabaseClientBuilder::new_from_env()
///     .build()
///     .expect("SUPABASE_URL and SUPABASE_ANON_KEY must be set");
/// ```
///
/// Nothing is validated until [`Self::build`], so setters can be chained in
/// any order.
#[derive(Default)]
pub struct SupabaseClientBuilder {
    pub(crate) url: Option<String>,
    pub(crate) anon_key: Option<String>,
    pub(crate) schema: Option<String>,
    pub(crate) session: Option<SessionOptions>,
    pub(crate) http: Option<HttpClient>,
    pub(crate) timeout: Option<Duration>,
}

impl SupabaseClientBuilder {
    /// Create an *empty* builder. Remember to supply URL and key manually.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load [`URL_ENV`] and [`ANON_KEY_ENV`] from the process environment.
    ///
    /// # Panics
    ///
    /// Never panics. Missing values only surface during [`Self::build`].
    pub fn new_from_env() -> Self {
        Self::new_from_lookup(|name| env::var(name).ok())
    }

    /// Same as [`Self::new_from_env`] but reads through `lookup`.
    pub fn new_from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        Self {
            url: lookup(URL_ENV),
            anon_key: lookup(ANON_KEY_ENV),
            ..Self::default()
        }
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    pub fn with_anon_key(mut self, anon_key: impl Into<String>) -> Self {
        self.anon_key = Some(anon_key.into());
        self
    }

    /// Target a schema other than [`DEFAULT_SCHEMA`].
    pub fn with_schema(mut self, schema: impl Into<String>) -> Self {
        self.schema = Some(schema.into());
        self
    }

    pub fn with_session_options(mut self, session: SessionOptions) -> Self {
        self.session = Some(session);
        self
    }

    /// Use a custom `reqwest::Client` (proxy settings, custom TLS, …).
    /// Overrides [`Self::with_timeout`].
    pub fn with_http_client(mut self, http: HttpClient) -> Self {
        self.http = Some(http);
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Finalise the builder and return a ready-to-use client.
    ///
    /// # Errors
    ///
    /// * [`KeystoneError::MissingConfig`] – URL or key absent or empty.
    /// * [`KeystoneError::InvalidConfig`] – URL not http(s) or carrying a
    ///   query or fragment, key not usable as a header, or empty schema.
    pub fn build(self) -> Result<SupabaseClient> {
        let url = required(self.url, URL_ENV)?;
        let anon_key = required(self.anon_key, ANON_KEY_ENV)?;

        let parsed = Url::parse(&url).map_err(|err| KeystoneError::InvalidConfig {
            var: URL_ENV,
            reason: err.to_string(),
        })?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(KeystoneError::InvalidConfig {
                var: URL_ENV,
                reason: format!("unsupported scheme `{}`", parsed.scheme()),
            });
        }
        if parsed.query().is_some() || parsed.fragment().is_some() {
            return Err(KeystoneError::InvalidConfig {
                var: URL_ENV,
                reason: "project URL must not carry a query or fragment".into(),
            });
        }

        let schema = self.schema.unwrap_or_else(|| DEFAULT_SCHEMA.to_owned());
        if schema.trim().is_empty() {
            return Err(KeystoneError::InvalidConfig {
                var: "schema",
                reason: "schema name must not be empty".into(),
            });
        }

        let headers = auth_headers(&anon_key)?;

        let http = match self.http {
            Some(http) => {
                if self.timeout.is_some() {
                    tracing::warn!("custom http client supplied, ignoring timeout");
                }
                http
            }
            None => HttpClient::builder()
                .timeout(self.timeout.unwrap_or(DEFAULT_TIMEOUT))
                .build()
                .map_err(SupabaseError::from)?,
        };

        let connection = ConnectionInfo::new(
            parsed.as_str(),
            anon_key,
            schema,
            self.session.unwrap_or_default(),
        );
        tracing::debug!(
            base_url = connection.base_url(),
            schema = connection.schema(),
            "supabase client configured"
        );

        Ok(SupabaseClient::new(connection, http, headers))
    }
}

/// Surrounding whitespace is dropped; whitespace-only counts as missing.
fn required(value: Option<String>, var: &'static str) -> Result<String> {
    value
        .map(|value| value.trim().to_owned())
        .filter(|value| !value.is_empty())
        .ok_or(KeystoneError::MissingConfig { var })
}

fn auth_headers(anon_key: &str) -> Result<HeaderMap> {
    let invalid_key = |err: reqwest::header::InvalidHeaderValue| KeystoneError::InvalidConfig {
        var: ANON_KEY_ENV,
        reason: err.to_string(),
    };

    let mut headers = HeaderMap::new();
    headers.insert("apikey", HeaderValue::from_str(anon_key).map_err(invalid_key)?);
    headers.insert(
        AUTHORIZATION,
        HeaderValue::from_str(&format!("Bearer {anon_key}")).map_err(invalid_key)?,
    );
    Ok(headers)
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use keystone_core::backend::Backend;

    use super::*;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| vars.get(name).cloned()
    }

    #[test]
    fn builds_from_both_values() {
        let client = SupabaseClientBuilder::new_from_lookup(lookup(&[
            (URL_ENV, "https://demo.supabase.co/"),
            (ANON_KEY_ENV, "anon-key"),
        ]))
        .build()
        .unwrap();

        let connection = client.connection();
        assert_eq!(connection.base_url(), "https://demo.supabase.co");
        assert_eq!(connection.public_key(), "anon-key");
        assert_eq!(connection.schema(), DEFAULT_SCHEMA);
        assert_eq!(connection.session(), SessionOptions::default());
    }

    #[test]
    fn missing_url_is_reported() {
        let err = SupabaseClientBuilder::new_from_lookup(lookup(&[(ANON_KEY_ENV, "anon-key")]))
            .build()
            .unwrap_err();
        assert!(matches!(err, KeystoneError::MissingConfig { var } if var == URL_ENV));
    }

    #[test]
    fn empty_key_counts_as_missing() {
        let err = SupabaseClientBuilder::new_from_lookup(lookup(&[
            (URL_ENV, "https://demo.supabase.co"),
            (ANON_KEY_ENV, ""),
        ]))
        .build()
        .unwrap_err();
        assert!(matches!(err, KeystoneError::MissingConfig { var } if var == ANON_KEY_ENV));
        assert!(err.is_config());
    }

    #[test]
    fn whitespace_only_values_count_as_missing() {
        let err = SupabaseClientBuilder::new_from_lookup(lookup(&[
            (URL_ENV, "   "),
            (ANON_KEY_ENV, "anon-key"),
        ]))
        .build()
        .unwrap_err();
        assert!(matches!(err, KeystoneError::MissingConfig { var } if var == URL_ENV));

        let err = SupabaseClientBuilder::new_from_lookup(lookup(&[
            (URL_ENV, "https://demo.supabase.co"),
            (ANON_KEY_ENV, "\t\n"),
        ]))
        .build()
        .unwrap_err();
        assert!(matches!(err, KeystoneError::MissingConfig { var } if var == ANON_KEY_ENV));
    }

    #[test]
    fn padded_values_are_trimmed() {
        let client = SupabaseClientBuilder::new_from_lookup(lookup(&[
            (URL_ENV, " https://demo.supabase.co \n"),
            (ANON_KEY_ENV, "anon-key\n"),
        ]))
        .build()
        .unwrap();

        assert_eq!(client.connection().base_url(), "https://demo.supabase.co");
        assert_eq!(client.connection().public_key(), "anon-key");
        assert_eq!(
            client.rest_url("notes"),
            "https://demo.supabase.co/rest/v1/notes"
        );
        assert_eq!(
            client.auth_url("token"),
            "https://demo.supabase.co/auth/v1/token"
        );
    }

    #[test]
    fn url_path_is_kept_without_trailing_slash() {
        let client = SupabaseClientBuilder::new()
            .with_url("http://localhost:8000/supabase/")
            .with_anon_key("anon-key")
            .build()
            .unwrap();
        assert_eq!(
            client.rest_url("notes"),
            "http://localhost:8000/supabase/rest/v1/notes"
        );
    }

    #[test]
    fn url_with_query_or_fragment_is_rejected() {
        for url in [
            "https://demo.supabase.co/?x=1",
            "https://demo.supabase.co/#access_token=abc",
        ] {
            let err = SupabaseClientBuilder::new()
                .with_url(url)
                .with_anon_key("anon-key")
                .build()
                .unwrap_err();
            assert!(
                matches!(err, KeystoneError::InvalidConfig { var, .. } if var == URL_ENV),
                "{url} should be rejected"
            );
        }
    }

    #[test]
    fn nothing_set_reports_url_first() {
        let err = SupabaseClientBuilder::new().build().unwrap_err();
        assert_eq!(err.to_string(), "missing env variable: `SUPABASE_URL`");
    }

    #[test]
    fn rejects_unusable_values() {
        let err = SupabaseClientBuilder::new()
            .with_url("not a url")
            .with_anon_key("anon-key")
            .build()
            .unwrap_err();
        assert!(matches!(err, KeystoneError::InvalidConfig { var, .. } if var == URL_ENV));

        let err = SupabaseClientBuilder::new()
            .with_url("ftp://demo.supabase.co")
            .with_anon_key("anon-key")
            .build()
            .unwrap_err();
        assert!(matches!(err, KeystoneError::InvalidConfig { var, .. } if var == URL_ENV));

        let err = SupabaseClientBuilder::new()
            .with_url("https://demo.supabase.co")
            .with_anon_key("bad\nkey")
            .build()
            .unwrap_err();
        assert!(matches!(err, KeystoneError::InvalidConfig { var, .. } if var == ANON_KEY_ENV));

        let err = SupabaseClientBuilder::new()
            .with_url("https://demo.supabase.co")
            .with_anon_key("anon-key")
            .with_schema(" ")
            .build()
            .unwrap_err();
        assert!(matches!(err, KeystoneError::InvalidConfig { var: "schema", .. }));
    }

    #[test]
    fn custom_schema_and_session_options_are_kept() {
        let session = SessionOptions {
            persist_session: false,
            ..SessionOptions::default()
        };
        let client = SupabaseClientBuilder::new()
            .with_url("http://localhost:54321")
            .with_anon_key("anon-key")
            .with_schema("private")
            .with_session_options(session)
            .with_timeout(Duration::from_secs(5))
            .build()
            .unwrap();

        assert_eq!(client.connection().schema(), "private");
        assert!(!client.connection().session().persist_session);
    }
}
