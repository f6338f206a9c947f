//! HTTP client for the netlist conversion backend.

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;

use super::{NetlistBackend, UploadError, UploadRequest};
use crate::config::Config;
use crate::payload::CircuitPayload;

/// Backend reachable over HTTP at a configured base URL
pub struct HttpBackend {
    client: Client,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct HealthResponse {
    status: String,
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    detail: Value,
}

impl HttpBackend {
    pub fn new(config: &Config) -> Result<Self, UploadError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url().to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }
}

#[async_trait]
impl NetlistBackend for HttpBackend {
    fn name(&self) -> &str {
        "http"
    }

    async fn upload(&self, request: UploadRequest) -> Result<CircuitPayload, UploadError> {
        let url = self.endpoint("upload");
        tracing::info!("Uploading {} ({} bytes) to {}", request.filename, request.contents.len(), url);

        let file = Part::bytes(request.contents)
            .file_name(request.filename.clone())
            .mime_str("text/plain")?;
        let mut form = Form::new().part("file", file);
        if let Some(specs) = &request.perf_specs {
            form = form.text("perf_specs", specs.to_string());
        }

        let response = self.client.post(&url).multipart(form).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ErrorResponse>(&body)
                .map(|e| match e.detail {
                    Value::String(s) => s,
                    other => other.to_string(),
                })
                .unwrap_or(body);
            return Err(UploadError::Status {
                status: status.as_u16(),
                message,
            });
        }

        let raw: Value = response.json().await?;
        let payload = CircuitPayload::from_value(raw)?;
        tracing::info!("Received {} payload for {}", payload.shape(), request.filename);
        Ok(payload)
    }

    async fn health(&self) -> Result<bool, UploadError> {
        let response = self.client.get(self.endpoint("health")).send().await?;
        if !response.status().is_success() {
            return Ok(false);
        }
        let health: HealthResponse = response
            .json()
            .await
            .map_err(|e| UploadError::Failed(format!("unexpected health response: {}", e)))?;
        Ok(health.status.eq_ignore_ascii_case("ok"))
    }
}
