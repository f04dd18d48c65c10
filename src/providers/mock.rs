/*!
 * Mock service implementations for testing.
 *
 * This module provides mocks that simulate the external services:
 * - `MockOracle` - screenplay oracle that returns fixed text or fails
 * - `MockMediaService` - media job service with scripted per-stage behavior
 */

use async_trait::async_trait;
use bytes::Bytes;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use crate::errors::ProviderError;
use crate::providers::{MediaJobService, ScriptOracle, ScriptPreferences, TaskSnapshot, TaskStatus, VideoJobRequest};

/// Mock screenplay oracle
#[derive(Debug, Clone)]
pub struct MockOracle {
    /// Text to return, or None to fail
    response: Option<String>,
    /// Number of generate calls
    request_count: Arc<AtomicUsize>,
}

impl MockOracle {
    /// Oracle that always returns the given text
    pub fn returning(text: impl Into<String>) -> Self {
        Self {
            response: Some(text.into()),
            request_count: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Oracle that always fails
    pub fn failing() -> Self {
        Self {
            response: None,
            request_count: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Number of generate calls so far
    pub fn request_count(&self) -> usize {
        self.request_count.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ScriptOracle for MockOracle {
    async fn generate(&self, _prompt: &str, _preferences: &ScriptPreferences) -> Result<String, ProviderError> {
        self.request_count.fetch_add(1, Ordering::SeqCst);
        match &self.response {
            Some(text) => Ok(text.clone()),
            None => Err(ProviderError::ApiError {
                status_code: 500,
                message: "Simulated oracle failure".to_string(),
            }),
        }
    }
}

/// Behavior of one stage of the mock media service
#[derive(Debug, Clone, PartialEq)]
pub enum StageBehavior {
    /// Report RUNNING for `after_polls` polls, then SUCCEEDED with an output
    Succeed { after_polls: usize },
    /// Report RUNNING for `after_polls` polls, then FAILED
    Fail { after_polls: usize, reason: String },
    /// Report SUCCEEDED with an empty output list
    SucceedWithoutOutput,
    /// Stay PENDING forever
    NeverFinish,
    /// Reject the submission
    RejectSubmit,
    /// Every poll returns a transport error
    PollError,
}

impl StageBehavior {
    /// Succeed on the first poll
    pub fn immediate() -> Self {
        Self::Succeed { after_polls: 0 }
    }

    /// Fail on the first poll
    pub fn failing(reason: impl Into<String>) -> Self {
        Self::Fail { after_polls: 0, reason: reason.into() }
    }
}

/// Mock media job service
#[derive(Debug, Clone)]
pub struct MockMediaService {
    image: StageBehavior,
    video: StageBehavior,
    /// Bytes served by `download`, or None to fail downloads
    payload: Option<Bytes>,
    image_submissions: Arc<AtomicUsize>,
    video_submissions: Arc<AtomicUsize>,
    downloads: Arc<AtomicUsize>,
    polls: Arc<Mutex<HashMap<String, usize>>>,
    video_requests: Arc<Mutex<Vec<VideoJobRequest>>>,
    image_prompts: Arc<Mutex<Vec<String>>>,
}

impl MockMediaService {
    /// Create a mock with the given stage behaviors
    pub fn new(image: StageBehavior, video: StageBehavior) -> Self {
        Self {
            image,
            video,
            payload: Some(Bytes::from_static(b"mock-video-bytes")),
            image_submissions: Arc::new(AtomicUsize::new(0)),
            video_submissions: Arc::new(AtomicUsize::new(0)),
            downloads: Arc::new(AtomicUsize::new(0)),
            polls: Arc::new(Mutex::new(HashMap::new())),
            video_requests: Arc::new(Mutex::new(Vec::new())),
            image_prompts: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Both stages succeed on the first poll
    pub fn working() -> Self {
        Self::new(StageBehavior::immediate(), StageBehavior::immediate())
    }

    /// Serve these bytes from `download`
    pub fn with_payload(mut self, payload: impl Into<Bytes>) -> Self {
        self.payload = Some(payload.into());
        self
    }

    /// Make every download fail
    pub fn with_failing_download(mut self) -> Self {
        self.payload = None;
        self
    }

    /// Number of image jobs submitted
    pub fn image_submissions(&self) -> usize {
        self.image_submissions.load(Ordering::SeqCst)
    }

    /// Number of video jobs submitted
    pub fn video_submissions(&self) -> usize {
        self.video_submissions.load(Ordering::SeqCst)
    }

    /// Number of downloads attempted
    pub fn downloads(&self) -> usize {
        self.downloads.load(Ordering::SeqCst)
    }

    /// Number of polls seen for a task id
    pub fn polls_for(&self, task_id: &str) -> usize {
        self.polls.lock().get(task_id).copied().unwrap_or(0)
    }

    /// Video job requests received, in order
    pub fn video_requests(&self) -> Vec<VideoJobRequest> {
        self.video_requests.lock().clone()
    }

    /// Image prompts received, in order
    pub fn image_prompts(&self) -> Vec<String> {
        self.image_prompts.lock().clone()
    }

    fn snapshot(behavior: &StageBehavior, task_id: &str, poll_number: usize) -> Result<TaskSnapshot, ProviderError> {
        match behavior {
            StageBehavior::Succeed { after_polls } if poll_number > *after_polls => {
                Ok(TaskSnapshot::succeeded(format!("https://mock.media/{}", task_id)))
            }
            StageBehavior::Fail { after_polls, reason } if poll_number > *after_polls => {
                Ok(TaskSnapshot::failed(reason.clone()))
            }
            StageBehavior::Succeed { .. } | StageBehavior::Fail { .. } => {
                Ok(TaskSnapshot::with_status(TaskStatus::Running))
            }
            StageBehavior::SucceedWithoutOutput => Ok(TaskSnapshot::with_status(TaskStatus::Succeeded)),
            StageBehavior::NeverFinish => Ok(TaskSnapshot::with_status(TaskStatus::Pending)),
            StageBehavior::PollError => Err(ProviderError::ConnectionError("Simulated connection reset".to_string())),
            StageBehavior::RejectSubmit => Err(ProviderError::ParseError(format!("Unknown task {}", task_id))),
        }
    }
}

#[async_trait]
impl MediaJobService for MockMediaService {
    async fn submit_image(&self, prompt: &str, _aspect_ratio: &str) -> Result<String, ProviderError> {
        let count = self.image_submissions.fetch_add(1, Ordering::SeqCst);
        self.image_prompts.lock().push(prompt.to_string());
        if self.image == StageBehavior::RejectSubmit {
            return Err(ProviderError::ApiError {
                status_code: 400,
                message: "Simulated image submission rejection".to_string(),
            });
        }
        Ok(format!("image-{}", count))
    }

    async fn submit_video(&self, request: &VideoJobRequest) -> Result<String, ProviderError> {
        let count = self.video_submissions.fetch_add(1, Ordering::SeqCst);
        self.video_requests.lock().push(request.clone());
        if self.video == StageBehavior::RejectSubmit {
            return Err(ProviderError::ApiError {
                status_code: 400,
                message: "Simulated video submission rejection".to_string(),
            });
        }
        Ok(format!("video-{}", count))
    }

    async fn poll_task(&self, task_id: &str) -> Result<TaskSnapshot, ProviderError> {
        let poll_number = {
            let mut polls = self.polls.lock();
            let entry = polls.entry(task_id.to_string()).or_insert(0);
            *entry += 1;
            *entry
        };

        let behavior = if task_id.starts_with("image-") { &self.image } else { &self.video };
        Self::snapshot(behavior, task_id, poll_number)
    }

    async fn download(&self, url: &str) -> Result<Bytes, ProviderError> {
        self.downloads.fetch_add(1, Ordering::SeqCst);
        match &self.payload {
            Some(bytes) => Ok(bytes.clone()),
            None => Err(ProviderError::ApiError {
                status_code: 404,
                message: format!("Simulated missing asset: {}", url),
            }),
        }
    }
}
