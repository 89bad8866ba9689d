use async_trait::async_trait;
use reqwest::{RequestBuilder, Response};
use serde_json::Value;

use super::{Collection, Filter, RemoteError, RemoteStore};
use crate::config::RemoteConfig;

/// Client for a PostgREST-style store (`<url>/rest/v1/<collection>`).
///
/// The bearer credential is attached to every request. Any 2xx status is a
/// success; everything else becomes [`RemoteError::Status`].
pub struct RestClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl RestClient {
    /// Creates a client from config.
    ///
    /// Returns an error if the remote store is not configured.
    pub fn from_config(config: &RemoteConfig) -> Result<Self, RemoteError> {
        let url = config.url.clone().ok_or(RemoteError::NotConfigured)?;
        let api_key = config.api_key.clone().ok_or(RemoteError::NotConfigured)?;
        Ok(Self::new(url, api_key))
    }

    /// Creates a client with explicit parameters.
    pub fn new(base_url: String, api_key: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn collection_url(&self, collection: Collection, query: &[String]) -> String {
        let mut url = format!("{}/rest/v1/{}", self.base_url, collection);
        if !query.is_empty() {
            url.push('?');
            url.push_str(&query.join("&"));
        }
        url
    }

    async fn send(&self, request: RequestBuilder) -> Result<Response, RemoteError> {
        let response = request
            .header("apikey", &self.api_key)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .header("Prefer", "return=representation")
            .send()
            .await
            .map_err(|e| RemoteError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(RemoteError::Status {
                status: status.as_u16(),
                body,
            });
        }

        Ok(response)
    }

    async fn rows(response: Response) -> Result<Vec<Value>, RemoteError> {
        response
            .json()
            .await
            .map_err(|e| RemoteError::Decode(e.to_string()))
    }
}

#[async_trait]
impl RemoteStore for RestClient {
    async fn create(&self, collection: Collection, row: &Value) -> Result<Value, RemoteError> {
        let url = self.collection_url(collection, &[]);
        let response = self.send(self.http.post(&url).json(row)).await?;

        Self::rows(response)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| RemoteError::Decode(format!("empty representation from {}", collection)))
    }

    async fn update(
        &self,
        collection: Collection,
        filter: &Filter,
        row: &Value,
    ) -> Result<Vec<Value>, RemoteError> {
        let url = self.collection_url(collection, &[filter.to_query()]);
        let response = self.send(self.http.patch(&url).json(row)).await?;

        let body = response
            .text()
            .await
            .map_err(|e| RemoteError::Decode(e.to_string()))?;
        if body.trim().is_empty() {
            return Ok(Vec::new());
        }
        serde_json::from_str(&body).map_err(|e| RemoteError::Decode(e.to_string()))
    }

    async fn list(
        &self,
        collection: Collection,
        filter: Option<&Filter>,
    ) -> Result<Vec<Value>, RemoteError> {
        let mut query = vec!["select=*".to_string()];
        if let Some(filter) = filter {
            query.push(filter.to_query());
        }
        let url = self.collection_url(collection, &query);
        let response = self.send(self.http.get(&url)).await?;
        Self::rows(response).await
    }

    async fn ping(&self) -> Result<(), RemoteError> {
        let url = self.collection_url(
            Collection::Days,
            &["select=date".to_string(), "limit=1".to_string()],
        );
        self.send(self.http.get(&url)).await?;
        Ok(())
    }
}
