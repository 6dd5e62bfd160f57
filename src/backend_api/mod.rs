use std::sync::Arc;

use reqwest::header::AUTHORIZATION;
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use thiserror::Error;
use tracing::error;

use crate::session::SessionStore;

pub mod analytics;
pub mod auth;
pub mod billing;
pub mod content;
pub mod experiments;
pub mod export;
pub mod messages;
pub mod promo_codes;
pub mod spreads;
pub mod users;

/// The single error shape the rest of the console sees: an HTTP status with
/// the backend's message, or a transport failure with no status. Validation,
/// auth and backend failures all collapse into it.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ApiError {
    #[error("backend responded {status}: {message}")]
    Http { status: u16, message: String },

    #[error("backend unreachable: {message}")]
    Transport { message: String },
}

impl ApiError {
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Http { status, .. } => Some(*status),
            ApiError::Transport { .. } => None,
        }
    }

    pub fn message(&self) -> &str {
        match self {
            ApiError::Http { message, .. } => message,
            ApiError::Transport { message } => message,
        }
    }
}

/// FastAPI error envelope: `{"detail": "..."}` (or a structured value for
/// validation errors).
#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    detail: serde_json::Value,
}

/// Client for the bot backend's admin REST surface. Attaches the base URL and
/// the bearer token read from the session store on every request; callers
/// never see transport-level detail.
///
/// A 401 from the backend surfaces as a normal [`ApiError`] and does not touch
/// the session; the route guard handles logout separately on navigation.
pub struct BackendClient {
    http: reqwest::Client,
    base_url: String,
    session: Arc<SessionStore>,
}

impl BackendClient {
    pub fn new(base_url: String, session: Arc<SessionStore>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            session,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn authorize(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match self.session.token() {
            Some(token) => request.header(AUTHORIZATION, format!("Bearer {}", token)),
            None => request,
        }
    }

    fn transport(err: reqwest::Error, context: &str) -> ApiError {
        error!(error = %err, context, "backend api transport failure");
        ApiError::Transport {
            message: format!("{}: {}", context, err),
        }
    }

    async fn ensure_success(resp: reqwest::Response, context: &str) -> Result<reqwest::Response, ApiError> {
        if resp.status().is_success() {
            return Ok(resp);
        }

        let status = resp.status();
        let body = match resp.text().await {
            Ok(text) if !text.is_empty() => text,
            Ok(_) => "<empty response body>".to_string(),
            Err(err) => format!("<failed to read response body: {}>", err),
        };

        let message = match serde_json::from_str::<ErrorEnvelope>(&body) {
            Ok(envelope) => match envelope.detail {
                serde_json::Value::String(detail) => detail,
                other => other.to_string(),
            },
            Err(_) => body,
        };

        error!(
            status = status.as_u16(),
            message = %message,
            context,
            "backend api request failed"
        );

        Err(ApiError::Http {
            status: status.as_u16(),
            message,
        })
    }

    async fn decode<T: DeserializeOwned>(resp: reqwest::Response, context: &str) -> Result<T, ApiError> {
        resp.json::<T>()
            .await
            .map_err(|err| Self::transport(err, context))
    }

    pub(crate) async fn get<T: DeserializeOwned>(&self, path: &str, context: &str) -> Result<T, ApiError> {
        let resp = self
            .authorize(self.http.get(self.url(path)))
            .send()
            .await
            .map_err(|err| Self::transport(err, context))?;
        let resp = Self::ensure_success(resp, context).await?;
        Self::decode(resp, context).await
    }

    pub(crate) async fn get_with_query<T, Q>(&self, path: &str, query: &Q, context: &str) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        Q: Serialize + ?Sized,
    {
        let resp = self
            .authorize(self.http.get(self.url(path)).query(query))
            .send()
            .await
            .map_err(|err| Self::transport(err, context))?;
        let resp = Self::ensure_success(resp, context).await?;
        Self::decode(resp, context).await
    }

    pub(crate) async fn get_text(&self, path: &str, context: &str) -> Result<String, ApiError> {
        let resp = self
            .authorize(self.http.get(self.url(path)))
            .send()
            .await
            .map_err(|err| Self::transport(err, context))?;
        let resp = Self::ensure_success(resp, context).await?;
        resp.text()
            .await
            .map_err(|err| Self::transport(err, context))
    }

    pub(crate) async fn post<T, B>(&self, path: &str, body: &B, context: &str) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let resp = self
            .authorize(self.http.post(self.url(path)).json(body))
            .send()
            .await
            .map_err(|err| Self::transport(err, context))?;
        let resp = Self::ensure_success(resp, context).await?;
        Self::decode(resp, context).await
    }

    pub(crate) async fn post_unit<B>(&self, path: &str, body: &B, context: &str) -> Result<(), ApiError>
    where
        B: Serialize + ?Sized,
    {
        let resp = self
            .authorize(self.http.post(self.url(path)).json(body))
            .send()
            .await
            .map_err(|err| Self::transport(err, context))?;
        Self::ensure_success(resp, context).await?;
        Ok(())
    }

    pub(crate) async fn post_empty(&self, path: &str, context: &str) -> Result<(), ApiError> {
        let resp = self
            .authorize(self.http.post(self.url(path)))
            .send()
            .await
            .map_err(|err| Self::transport(err, context))?;
        Self::ensure_success(resp, context).await?;
        Ok(())
    }

    /// Form-encoded POST, used by the OAuth2 password login flow.
    pub(crate) async fn post_form<T, F>(&self, path: &str, form: &F, context: &str) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        F: Serialize + ?Sized,
    {
        let resp = self
            .http
            .post(self.url(path))
            .form(form)
            .send()
            .await
            .map_err(|err| Self::transport(err, context))?;
        let resp = Self::ensure_success(resp, context).await?;
        Self::decode(resp, context).await
    }

    pub(crate) async fn patch_unit<B>(&self, path: &str, body: &B, context: &str) -> Result<(), ApiError>
    where
        B: Serialize + ?Sized,
    {
        let resp = self
            .authorize(self.http.patch(self.url(path)).json(body))
            .send()
            .await
            .map_err(|err| Self::transport(err, context))?;
        Self::ensure_success(resp, context).await?;
        Ok(())
    }

    pub(crate) async fn put<T, B>(&self, path: &str, body: &B, context: &str) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let resp = self
            .authorize(self.http.put(self.url(path)).json(body))
            .send()
            .await
            .map_err(|err| Self::transport(err, context))?;
        let resp = Self::ensure_success(resp, context).await?;
        Self::decode(resp, context).await
    }

    pub(crate) async fn delete_unit(&self, path: &str, context: &str) -> Result<(), ApiError> {
        let resp = self
            .authorize(self.http.delete(self.url(path)))
            .send()
            .await
            .map_err(|err| Self::transport(err, context))?;
        Self::ensure_success(resp, context).await?;
        Ok(())
    }
}
