use keystone_core::{backend::Backend, connection::ConnectionInfo};
use reqwest::{
    Client as HttpClient, RequestBuilder,
    header::{ACCEPT, HeaderMap},
};
use serde::{Serialize, de::DeserializeOwned};
use serde_json::Value;

use crate::{
    api_v1::{
        ACCEPT_PROFILE, ApiErrorBody, CONTENT_PROFILE, PREFER, PasswordCredentials,
        RETURN_REPRESENTATION, SINGLE_OBJECT, Session, eq_filter,
    },
    error::SupabaseError,
};

/// Minimal HTTP client for a Supabase project's REST and auth endpoints.
///
/// * Every request carries the public key as `apikey` and bearer token.
/// * Reads and writes are scoped to the configured schema.
/// * Session handling (refresh, persistence) stays with the caller; the
///   flags in [`ConnectionInfo::session`] only describe the intent.
///
/// Built through [`SupabaseClientBuilder`](crate::SupabaseClientBuilder).
#[derive(Clone, Debug)]
pub struct SupabaseClient {
    connection: ConnectionInfo,
    http: HttpClient,
    headers: HeaderMap,
}

impl SupabaseClient {
    pub(crate) fn new(connection: ConnectionInfo, http: HttpClient, headers: HeaderMap) -> Self {
        Self {
            connection,
            http,
            headers,
        }
    }

    pub fn rest_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{table}", self.connection.base_url())
    }

    pub fn auth_url(&self, path: &str) -> String {
        format!("{}/auth/v1/{path}", self.connection.base_url())
    }

    /// `GET /rest/v1/{table}?select={columns}`
    pub async fn select<T>(&self, table: &str, columns: &str) -> Result<Vec<T>, SupabaseError>
    where
        T: DeserializeOwned,
    {
        let request = self
            .http
            .get(self.rest_url(table))
            .header(ACCEPT_PROFILE, self.connection.schema())
            .query(&[("select", columns)]);

        self.send(request).await
    }

    /// Fetch exactly one row where `column` equals `value`.
    ///
    /// Zero or several matches fail with the backend's `PGRST116`.
    pub async fn select_one<T>(
        &self,
        table: &str,
        columns: &str,
        column: &str,
        value: &str,
    ) -> Result<T, SupabaseError>
    where
        T: DeserializeOwned,
    {
        let request = self
            .http
            .get(self.rest_url(table))
            .header(ACCEPT_PROFILE, self.connection.schema())
            .header(ACCEPT, SINGLE_OBJECT)
            .query(&[("select", columns)])
            .query(&[eq_filter(column, value)]);

        self.send(request).await
    }

    /// Insert `rows` (one object or an array) and return what was written.
    pub async fn insert<R, T>(&self, table: &str, rows: &R) -> Result<Vec<T>, SupabaseError>
    where
        R: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let request = self
            .http
            .post(self.rest_url(table))
            .header(CONTENT_PROFILE, self.connection.schema())
            .header(PREFER, RETURN_REPRESENTATION)
            .json(rows);

        self.send(request).await
    }

    /// `POST /auth/v1/token?grant_type=password`
    pub async fn sign_in_with_password(
        &self,
        credentials: &PasswordCredentials,
    ) -> Result<Session, SupabaseError> {
        let request = self
            .http
            .post(self.auth_url("token"))
            .query(&[("grant_type", "password")])
            .json(credentials);

        self.send(request).await
    }

    /// `POST /auth/v1/signup`
    ///
    /// Depending on the project's confirmation settings the answer is a user
    /// or a session, so it is returned as raw JSON.
    pub async fn sign_up(&self, credentials: &PasswordCredentials) -> Result<Value, SupabaseError> {
        let request = self.http.post(self.auth_url("signup")).json(credentials);

        self.send(request).await
    }

    async fn send<T>(&self, request: RequestBuilder) -> Result<T, SupabaseError>
    where
        T: DeserializeOwned,
    {
        let resp = request.headers(self.headers.clone()).send().await?;
        let status = resp.status();
        tracing::debug!(url = %resp.url(), %status, "supabase response");

        if !status.is_success() {
            let text = resp.text().await?;
            return Err(SupabaseError::Api {
                status,
                body: ApiErrorBody::from_text(&text),
            });
        }

        let bytes = resp.bytes().await?;
        if bytes.is_empty() {
            return Err(SupabaseError::Format(format!(
                "empty response body with status {status}"
            )));
        }
        let parsed = serde_json::from_slice(&bytes)?;
        Ok(parsed)
    }
}

impl Backend for SupabaseClient {
    fn connection(&self) -> &ConnectionInfo {
        &self.connection
    }
}
