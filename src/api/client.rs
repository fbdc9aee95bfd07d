// api/client.rs
use std::sync::Arc;
use std::time::Duration;

use reqwest::{RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::config::Config;
use crate::error::ApiError;
use crate::session::SessionStore;

/// Thin wrapper over the marketplace REST API: one shared HTTP client with
/// a fixed timeout, the session's bearer token attached per request, and
/// non-2xx responses normalized into [`ApiError`]. A 401 clears the
/// persisted session as a side effect, so the outer app falls back to the
/// login flow on its next identity read.
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    session: Arc<SessionStore>,
}

impl ApiClient {
    pub fn new(config: &Config, session: Arc<SessionStore>) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;
        Ok(ApiClient {
            http,
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
            session,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn dispatch(&self, request: RequestBuilder) -> Result<Response, ApiError> {
        let request = match self.session.token() {
            Some(token) => request.bearer_auth(token),
            None => request,
        };

        let response = request.send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let message = Self::error_message(response, status).await;
        if status == StatusCode::UNAUTHORIZED {
            if let Err(e) = self.session.clear() {
                tracing::warn!("Failed to clear session after 401: {}", e);
            }
            return Err(ApiError::Unauthorized(message));
        }
        Err(ApiError::Api {
            status: status.as_u16(),
            message,
        })
    }

    // The backend reports failures as `{ "message": ... }`; fall back to the
    // HTTP status text when the body has no usable message.
    async fn error_message(response: Response, status: StatusCode) -> String {
        let fallback = || {
            status
                .canonical_reason()
                .unwrap_or("Request failed")
                .to_string()
        };
        match response.json::<serde_json::Value>().await {
            Ok(body) => body
                .get("message")
                .and_then(|m| m.as_str())
                .map(str::to_string)
                .unwrap_or_else(fallback),
            Err(_) => fallback(),
        }
    }

    pub(crate) async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let response = self.dispatch(self.http.get(self.url(path))).await?;
        Ok(response.json().await?)
    }

    pub(crate) async fn post_json<B, T>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let response = self
            .dispatch(self.http.post(self.url(path)).json(body))
            .await?;
        Ok(response.json().await?)
    }

    pub(crate) async fn delete(&self, path: &str) -> Result<(), ApiError> {
        self.dispatch(self.http.delete(self.url(path))).await?;
        Ok(())
    }
}
