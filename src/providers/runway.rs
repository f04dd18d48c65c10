use std::time::Duration;
use async_trait::async_trait;
use bytes::Bytes;
use serde::{Serialize, Deserialize};
use reqwest::{Client, RequestBuilder, Response};
use log::{debug, error};

use crate::errors::ProviderError;
use crate::providers::{MediaJobService, TaskSnapshot, TaskStatus, VideoJobRequest};

/// Runway client for asynchronous image and video generation tasks
#[derive(Debug)]
pub struct Runway {
    /// HTTP client for API requests
    client: Client,
    /// API key for authentication
    api_key: String,
    /// API base URL
    endpoint: String,
    /// Value of the X-Runway-Version header
    api_version: String,
    /// Model for text-to-image tasks
    image_model: String,
    /// Model for image-to-video tasks
    video_model: String,
    /// Timeout for clip downloads, separate from the API calls
    download_timeout: Duration,
}

/// Text-to-image task request
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TextToImageRequest {
    /// Model name
    pub model: String,
    /// Image description
    pub prompt_text: String,
    /// Output ratio, e.g. "1920:1080"
    pub ratio: String,
}

/// Image-to-video task request
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageToVideoRequest {
    /// Model name
    pub model: String,
    /// URL or data URI of the first frame
    pub prompt_image: String,
    /// Motion description
    pub prompt_text: String,
    /// Clip length in seconds
    pub duration: u32,
    /// Output ratio, e.g. "1280:768"
    pub ratio: String,
}

/// Response to a task submission
#[derive(Debug, Deserialize)]
pub struct TaskCreated {
    /// Task identifier
    pub id: String,
}

/// Task details returned by the tasks endpoint
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskDetails {
    /// Task identifier
    pub id: String,
    /// Current task status
    pub status: TaskStatus,
    /// Output asset URLs once succeeded
    #[serde(default)]
    pub output: Option<Vec<String>>,
    /// Human readable failure reason
    #[serde(default)]
    pub failure: Option<String>,
    /// Machine readable failure code
    #[serde(default)]
    pub failure_code: Option<String>,
}

impl From<TaskDetails> for TaskSnapshot {
    fn from(details: TaskDetails) -> Self {
        let failure = match (details.failure, details.failure_code) {
            (Some(reason), Some(code)) => Some(format!("{} ({})", reason, code)),
            (Some(reason), None) => Some(reason),
            (None, Some(code)) => Some(code),
            (None, None) => None,
        };

        Self {
            status: details.status,
            output: details.output.unwrap_or_default(),
            failure,
        }
    }
}

impl Runway {
    /// Create a new Runway client
    pub fn new(
        api_key: impl Into<String>,
        endpoint: impl Into<String>,
        api_version: impl Into<String>,
        timeout_secs: u64,
    ) -> Self {
        Self {
            client: Client::builder()
                .timeout(Duration::from_secs(timeout_secs))
                .build()
                .unwrap_or_default(),
            api_key: api_key.into(),
            endpoint: endpoint.into(),
            api_version: api_version.into(),
            image_model: "gen4_image".to_string(),
            video_model: "gen3a_turbo".to_string(),
            download_timeout: Duration::from_secs(timeout_secs),
        }
    }

    /// Override the timeout used for clip downloads
    pub fn with_download_timeout(mut self, timeout_secs: u64) -> Self {
        self.download_timeout = Duration::from_secs(timeout_secs);
        self
    }

    /// Override the generation models
    pub fn with_models(mut self, image_model: impl Into<String>, video_model: impl Into<String>) -> Self {
        self.image_model = image_model.into();
        self.video_model = video_model.into();
        self
    }

    fn url(&self, path: &str) -> String {
        let base = if self.endpoint.is_empty() {
            "https://api.dev.runwayml.com"
        } else {
            self.endpoint.trim_end_matches('/')
        };
        format!("{}/v1/{}", base, path)
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        request
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("X-Runway-Version", &self.api_version)
    }

    async fn check(response: Response, what: &str) -> Result<Response, ProviderError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let error_text = response.text().await
            .unwrap_or_else(|_| "Failed to get error response text".to_string());
        error!("Runway {} error ({}): {}", what, status, error_text);
        Err(ProviderError::from_status(status.as_u16(), error_text))
    }

    async fn create_task<T: Serialize + Sync>(&self, path: &str, body: &T) -> Result<String, ProviderError> {
        let response = self.authorized(self.client.post(self.url(path)))
            .json(body)
            .send()
            .await?;
        let response = Self::check(response, path).await?;

        let created = response.json::<TaskCreated>().await
            .map_err(|e| ProviderError::ParseError(format!("Failed to parse Runway task id: {}", e)))?;
        debug!("Runway {} task created: {}", path, created.id);
        Ok(created.id)
    }
}

#[async_trait]
impl MediaJobService for Runway {
    async fn submit_image(&self, prompt: &str, aspect_ratio: &str) -> Result<String, ProviderError> {
        let request = TextToImageRequest {
            model: self.image_model.clone(),
            prompt_text: prompt.to_string(),
            ratio: aspect_ratio.to_string(),
        };
        self.create_task("text_to_image", &request).await
    }

    async fn submit_video(&self, request: &VideoJobRequest) -> Result<String, ProviderError> {
        let request = ImageToVideoRequest {
            model: self.video_model.clone(),
            prompt_image: request.image_reference.clone(),
            prompt_text: request.prompt.clone(),
            duration: request.duration_seconds,
            ratio: request.aspect_ratio.clone(),
        };
        self.create_task("image_to_video", &request).await
    }

    async fn poll_task(&self, task_id: &str) -> Result<TaskSnapshot, ProviderError> {
        let response = self.authorized(self.client.get(self.url(&format!("tasks/{}", task_id))))
            .send()
            .await?;
        let response = Self::check(response, "tasks").await?;

        let details = response.json::<TaskDetails>().await
            .map_err(|e| ProviderError::ParseError(format!("Failed to parse Runway task {}: {}", task_id, e)))?;
        Ok(details.into())
    }

    async fn download(&self, url: &str) -> Result<Bytes, ProviderError> {
        // Request timeout replaces the client-wide one
        let response = self.client.get(url).timeout(self.download_timeout).send().await?;
        let response = Self::check(response, "download").await?;
        Ok(response.bytes().await?)
    }
}
