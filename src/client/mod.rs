//! HTTP client for the task API.
//!
//! Every call is a single request with no retries; mutations return the
//! server's confirmation and callers re-list to see the new state.

pub mod render;

use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use thiserror::Error;

use crate::api::types::{
    CreatedTaskResponse, ErrorResponse, HealthResponse, MessageResponse, MoveRequest,
    TaskListResponse,
};
use crate::task_store::{MoveDirection, Task, TaskFields};

/// Default server location when `TAREFAS_API_URL` is unset.
pub const DEFAULT_API_URL: &str = "http://localhost:3000";

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The server answered with a non-success status. `message` is the
    /// server-provided `error` text when there is one.
    #[error("{message} (HTTP {status})")]
    Api { status: u16, message: String },
}

impl ClientError {
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            Self::Http(e) => e.status().map(|s| s.as_u16()),
        }
    }
}

#[derive(Debug, Clone)]
pub struct TaskClient {
    base_url: String,
    http: reqwest::Client,
}

impl TaskClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            base_url,
            http: reqwest::Client::new(),
        }
    }

    /// Build a client from `TAREFAS_API_URL`, falling back to localhost.
    pub fn from_env() -> Self {
        let url = std::env::var("TAREFAS_API_URL")
            .ok()
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());
        Self::new(url)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn tasks_url(&self) -> String {
        format!("{}/api/tarefas", self.base_url)
    }

    fn task_url(&self, id: i64) -> String {
        format!("{}/api/tarefas/{}", self.base_url, id)
    }

    pub async fn health(&self) -> Result<HealthResponse, ClientError> {
        let response = self
            .http
            .get(format!("{}/api/health", self.base_url))
            .send()
            .await?;
        decode(response).await
    }

    pub async fn list(&self) -> Result<Vec<Task>, ClientError> {
        let response = self.http.get(self.tasks_url()).send().await?;
        let body: TaskListResponse = decode(response).await?;
        Ok(body.tasks)
    }

    pub async fn create(&self, fields: &TaskFields) -> Result<Task, ClientError> {
        let response = self.http.post(self.tasks_url()).json(fields).send().await?;
        let body: CreatedTaskResponse = decode(response).await?;
        Ok(body.task)
    }

    pub async fn update(&self, id: i64, fields: &TaskFields) -> Result<String, ClientError> {
        let response = self.http.put(self.task_url(id)).json(fields).send().await?;
        let body: MessageResponse = decode(response).await?;
        Ok(body.message)
    }

    pub async fn delete(&self, id: i64) -> Result<String, ClientError> {
        let response = self.http.delete(self.task_url(id)).send().await?;
        let body: MessageResponse = decode(response).await?;
        Ok(body.message)
    }

    pub async fn move_task(&self, id: i64, direction: MoveDirection) -> Result<String, ClientError> {
        let response = self
            .http
            .post(format!("{}/move", self.task_url(id)))
            .json(&MoveRequest { direction })
            .send()
            .await?;
        let body: MessageResponse = decode(response).await?;
        Ok(body.message)
    }
}

/// Decode a success body, or turn an error status into `ClientError::Api`.
async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ClientError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response.json().await?);
    }

    let text = response.text().await.unwrap_or_default();
    Err(ClientError::Api {
        status: status.as_u16(),
        message: error_message(status, &text),
    })
}

fn error_message(status: StatusCode, body: &str) -> String {
    match serde_json::from_str::<ErrorResponse>(body) {
        Ok(payload) => payload.error,
        Err(_) if !body.trim().is_empty() => body.trim().to_string(),
        Err(_) => format!("API returned error: {}", status),
    }
}
