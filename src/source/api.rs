//! Remote API source
//!
//! Endpoints (relative to the configured base URL):
//! - GET /tasks
//! - GET /notes
//! - GET /tasks/activity/heatmap

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use tracing::debug;

use super::{FetchError, RecordSource};
use crate::model::{DayBucket, NoteRecord, TaskRecord};

pub struct ApiSource {
    client: Client,
    base_url: String,
    token: Option<String>,
}

impl ApiSource {
    /// `token` is the session capability sent as a bearer token
    pub fn new(base_url: impl Into<String>, token: Option<String>) -> Result<Self, FetchError> {
        let client = Client::builder()
            .user_agent(concat!("pulseboard/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| FetchError::Network(e.to_string()))?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, FetchError> {
        let url = self.url(path);
        debug!(%url, "GET");

        let mut request = self.client.get(&url);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request
            .send()
            .await
            .map_err(|e| FetchError::Network(e.to_string()))?;

        let status = response.status();
        if let Some(err) = status_error(status) {
            return Err(err);
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| FetchError::Network(e.to_string()))?;
        Ok(serde_json::from_slice(&body)?)
    }
}

fn status_error(status: StatusCode) -> Option<FetchError> {
    if status.is_success() {
        None
    } else if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
        Some(FetchError::Auth(status.to_string()))
    } else {
        Some(FetchError::Network(format!("unexpected status {status}")))
    }
}

#[async_trait]
impl RecordSource for ApiSource {
    fn id(&self) -> &str {
        "api"
    }

    fn description(&self) -> String {
        format!("Remote API at {}", self.base_url)
    }

    async fn fetch_tasks(&self) -> Result<Vec<TaskRecord>, FetchError> {
        self.get_json("/tasks").await
    }

    async fn fetch_notes(&self) -> Result<Vec<NoteRecord>, FetchError> {
        self.get_json("/notes").await
    }

    async fn fetch_heatmap(&self) -> Result<Vec<DayBucket>, FetchError> {
        self.get_json("/tasks/activity/heatmap").await
    }
}
