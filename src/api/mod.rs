//! HTTP client for the Costumerie REST API
//!
//! `ApiClient` is the shared request helper: it prefixes the configured base
//! URL, attaches the bearer token when one is held, maps non-2xx responses to
//! [`ClientError`] and decodes bodies strictly. Endpoint methods live in the
//! submodules, one per resource.

mod auth;
mod costumes;
mod reservations;
mod uploads;
mod users;

pub use uploads::{image_data_uri, mime_for_extension};

use std::time::Instant;

use reqwest::header::ACCEPT;
use reqwest::{Client, Method};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::config::Config;
use crate::error::{ClientError, ClientResult};

/// API client bound to one backend and, optionally, one bearer token
#[derive(Clone)]
pub struct ApiClient {
    http: Client,
    base_url: String,
    token: Option<String>,
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url)
            .field("authenticated", &self.token.is_some())
            .finish()
    }
}

impl ApiClient {
    /// Create an anonymous client for the configured backend
    pub fn new(config: &Config) -> ClientResult<Self> {
        let mut builder = Client::builder().user_agent(concat!(
            env!("CARGO_PKG_NAME"),
            "/",
            env!("CARGO_PKG_VERSION")
        ));
        if let Some(timeout) = config.http_timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder
            .build()
            .map_err(|e| ClientError::Transport(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http,
            base_url: config.api_base_url.clone(),
            token: None,
        })
    }

    /// Same client carrying `token` as its bearer credential
    pub fn with_token(&self, token: Option<String>) -> Self {
        Self {
            http: self.http.clone(),
            base_url: self.base_url.clone(),
            token,
        }
    }

    /// Same client without credentials
    pub fn anonymous(&self) -> Self {
        self.with_token(None)
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub(crate) async fn get<T: DeserializeOwned>(&self, path: &str) -> ClientResult<T> {
        let text = self.execute(Method::GET, path, None).await?;
        decode(path, &text)
    }

    pub(crate) async fn post<B, T>(&self, path: &str, body: &B) -> ClientResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let text = self
            .execute(Method::POST, path, Some(serde_json::to_value(body)?))
            .await?;
        decode(path, &text)
    }

    pub(crate) async fn put<B, T>(&self, path: &str, body: &B) -> ClientResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let text = self
            .execute(Method::PUT, path, Some(serde_json::to_value(body)?))
            .await?;
        decode(path, &text)
    }

    /// DELETE ignores whatever body the server sends back
    pub(crate) async fn delete(&self, path: &str) -> ClientResult<()> {
        self.execute(Method::DELETE, path, None).await?;
        Ok(())
    }

    async fn execute(
        &self,
        method: Method,
        path: &str,
        body: Option<serde_json::Value>,
    ) -> ClientResult<String> {
        let url = format!("{}{}", self.base_url, path);
        let mut request = self
            .http
            .request(method.clone(), &url)
            .header(ACCEPT, "application/json");
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }
        if let Some(body) = body {
            request = request.json(&body);
        }

        let start = Instant::now();
        tracing::debug!(
            method = %method,
            path = %path,
            authenticated = self.token.is_some(),
            "Request started"
        );

        let response = match request.send().await {
            Ok(response) => response,
            Err(e) => {
                tracing::error!(method = %method, path = %path, error = %e, "Request failed");
                return Err(e.into());
            }
        };

        let status = response.status();
        let text = response.text().await?;
        let duration = start.elapsed();

        if status.is_server_error() {
            tracing::error!(
                method = %method,
                path = %path,
                status = %status.as_u16(),
                duration_ms = %duration.as_millis(),
                "Request completed with error"
            );
        } else if status.is_client_error() {
            tracing::warn!(
                method = %method,
                path = %path,
                status = %status.as_u16(),
                duration_ms = %duration.as_millis(),
                "Request completed with client error"
            );
        } else {
            tracing::info!(
                method = %method,
                path = %path,
                status = %status.as_u16(),
                duration_ms = %duration.as_millis(),
                "Request completed"
            );
        }

        if !status.is_success() {
            return Err(ClientError::from_response(status, &text));
        }
        Ok(text)
    }
}

fn decode<T: DeserializeOwned>(path: &str, text: &str) -> ClientResult<T> {
    serde_json::from_str(text).map_err(|e| ClientError::Decode(format!("{}: {}", path, e)))
}
