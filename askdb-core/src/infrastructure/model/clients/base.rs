//! Base HTTP client with shared logic

use crate::infrastructure::model::types::{ModelError, is_transient_status};
use reqwest::{Client, RequestBuilder};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::time::Duration;

const ERROR_BODY_PREVIEW: usize = 200;

/// Base HTTP client with shared functionality
#[derive(Clone)]
pub struct HttpClientBase {
    pub id: String,
    pub endpoint: String,
    pub api_key: Option<String>,
    pub http: Client,
}

impl HttpClientBase {
    pub fn new(id: String, endpoint: String, api_key: Option<String>, timeout: Duration) -> Self {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_else(|_| Client::new());
        Self {
            id,
            endpoint,
            api_key,
            http,
        }
    }

    /// Build URL from endpoint and path
    pub fn build_url(&self, path: &str) -> String {
        let base = self.endpoint.trim_end_matches('/');
        let path = path.trim_start_matches('/');
        format!("{base}/{path}")
    }

    /// Post JSON with bearer auth
    pub async fn post_with_bearer<Req, Res>(&self, url: &str, body: &Req) -> Result<Res, ModelError>
    where
        Req: Serialize,
        Res: DeserializeOwned,
    {
        let api_key = self.require_api_key()?;
        let request = self
            .http
            .post(url)
            .header("Authorization", format!("Bearer {api_key}"))
            .json(body);
        self.send(request).await
    }

    /// Post JSON without auth (for local services like Ollama)
    pub async fn post_no_auth<Req, Res>(&self, url: &str, body: &Req) -> Result<Res, ModelError>
    where
        Req: Serialize,
        Res: DeserializeOwned,
    {
        self.send(self.http.post(url).json(body)).await
    }

    async fn send<Res>(&self, request: RequestBuilder) -> Result<Res, ModelError>
    where
        Res: DeserializeOwned,
    {
        let response = request
            .send()
            .await
            .map_err(|e| ModelError::network(&self.id, e))?;

        let status = response.status();
        if is_transient_status(status) {
            let body = response.text().await.unwrap_or_default();
            let preview: String = body.chars().take(ERROR_BODY_PREVIEW).collect();
            return Err(ModelError::unavailable(
                &self.id,
                Some(status.as_u16()),
                preview,
            ));
        }

        response
            .error_for_status()
            .map_err(|e| ModelError::network(&self.id, e))?
            .json()
            .await
            .map_err(|e| ModelError::invalid_response(&self.id, e.to_string()))
    }

    fn require_api_key(&self) -> Result<&str, ModelError> {
        self.api_key
            .as_deref()
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| ModelError::missing_api_key(&self.id))
    }
}
