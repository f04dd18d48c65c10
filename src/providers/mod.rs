/*!
 * Clients for the external AI services.
 *
 * The core never talks HTTP directly; it depends on the two traits below so
 * that the real clients can be swapped for mocks:
 * - `ScriptOracle`: LLM screenplay generation (Anthropic)
 * - `MediaJobService`: asynchronous text-to-image and image-to-video jobs (Runway)
 */

use async_trait::async_trait;
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use std::fmt::Debug;

use crate::errors::ProviderError;

/// Optional steering for screenplay generation
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScriptPreferences {
    /// Target duration in seconds
    #[serde(default)]
    pub duration_seconds: Option<u32>,

    /// Genre, e.g. "drama"
    #[serde(default)]
    pub genre: Option<String>,

    /// Tone, e.g. "nostalgic"
    #[serde(default)]
    pub tone: Option<String>,
}

/// Language model that writes screenplays
#[async_trait]
pub trait ScriptOracle: Send + Sync + Debug {
    /// Generate screenplay text for a story idea
    ///
    /// # Arguments
    /// * `prompt` - The story idea
    /// * `preferences` - Genre, tone and duration hints
    ///
    /// # Returns
    /// * `Result<String, ProviderError>` - Raw screenplay text or an error
    async fn generate(&self, prompt: &str, preferences: &ScriptPreferences) -> Result<String, ProviderError>;
}

/// Status of a remote generation task
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskStatus {
    Pending,
    Throttled,
    Running,
    Succeeded,
    Failed,
    Cancelled,
    /// Any status string this client does not know
    #[serde(other)]
    Unknown,
}

impl TaskStatus {
    /// Whether no further transition will happen
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Succeeded | Self::Failed | Self::Cancelled)
    }
}

/// One poll of a remote task
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskSnapshot {
    /// Current status
    pub status: TaskStatus,

    /// Output references (image or video URLs) once succeeded
    pub output: Vec<String>,

    /// Failure reason once failed
    pub failure: Option<String>,
}

impl TaskSnapshot {
    /// A snapshot with no output and no failure
    pub fn with_status(status: TaskStatus) -> Self {
        Self {
            status,
            output: Vec::new(),
            failure: None,
        }
    }

    /// A succeeded snapshot with a single output reference
    pub fn succeeded(output: impl Into<String>) -> Self {
        Self {
            status: TaskStatus::Succeeded,
            output: vec![output.into()],
            failure: None,
        }
    }

    /// A failed snapshot with a reason
    pub fn failed(reason: impl Into<String>) -> Self {
        Self {
            status: TaskStatus::Failed,
            output: Vec::new(),
            failure: Some(reason.into()),
        }
    }

    /// First output reference, if any
    pub fn first_output(&self) -> Option<&str> {
        self.output.first().map(String::as_str)
    }
}

/// Parameters for an image-to-video job
#[derive(Debug, Clone, PartialEq)]
pub struct VideoJobRequest {
    /// Motion prompt, already truncated to the service limit
    pub prompt: String,

    /// Reference produced by the image stage
    pub image_reference: String,

    /// Clip length in whole seconds
    pub duration_seconds: u32,

    /// Aspect ratio, e.g. "1280:768"
    pub aspect_ratio: String,
}

/// Asynchronous media generation service
///
/// Jobs are submitted, then polled by id until they reach a terminal status.
#[async_trait]
pub trait MediaJobService: Send + Sync + Debug {
    /// Submit a text-to-image job and return its task id
    async fn submit_image(&self, prompt: &str, aspect_ratio: &str) -> Result<String, ProviderError>;

    /// Submit an image-to-video job and return its task id
    async fn submit_video(&self, request: &VideoJobRequest) -> Result<String, ProviderError>;

    /// Fetch the current state of a task
    async fn poll_task(&self, task_id: &str) -> Result<TaskSnapshot, ProviderError>;

    /// Download a finished asset
    async fn download(&self, url: &str) -> Result<Bytes, ProviderError>;
}

pub mod anthropic;
pub mod mock;
pub mod runway;
