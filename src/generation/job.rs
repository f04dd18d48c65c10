/*!
 * Per-scene generation job state.
 *
 * A job moves forward through its phases exactly once and ends in either
 * `Succeeded` or `Failed`. Terminal jobs are never restarted.
 */

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Phase of a scene generation job, in transition order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum JobPhase {
    ImagePending,
    ImagePolling,
    VideoPending,
    VideoPolling,
    Succeeded,
    Failed,
}

impl JobPhase {
    /// Whether no further transition can happen.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Succeeded | Self::Failed)
    }
}

impl fmt::Display for JobPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::ImagePending => "IMAGE_PENDING",
            Self::ImagePolling => "IMAGE_POLLING",
            Self::VideoPending => "VIDEO_PENDING",
            Self::VideoPolling => "VIDEO_POLLING",
            Self::Succeeded => "SUCCEEDED",
            Self::Failed => "FAILED",
        };
        write!(f, "{}", name)
    }
}

/// Final status reported to callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SceneStatus {
    Completed,
    Failed,
}

/// Outcome of generating one scene.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneResult {
    /// Index of the scene this result belongs to
    pub scene_index: usize,

    /// Completed or failed
    pub status: SceneStatus,

    /// Local clip path when completed
    pub media_path: Option<PathBuf>,

    /// Requested clip length in seconds
    pub duration: f64,
}

impl SceneResult {
    /// Whether the clip was produced.
    pub fn is_completed(&self) -> bool {
        self.status == SceneStatus::Completed
    }
}

/// Ephemeral state of one scene generation attempt.
#[derive(Debug, Clone)]
pub struct GenerationJob {
    scene_index: usize,
    phase: JobPhase,
    image_reference: Option<String>,
    result_path: Option<PathBuf>,
    failure_reason: Option<String>,
}

impl GenerationJob {
    /// Start a job for a scene.
    pub fn new(scene_index: usize) -> Self {
        Self {
            scene_index,
            phase: JobPhase::ImagePending,
            image_reference: None,
            result_path: None,
            failure_reason: None,
        }
    }

    /// Scene this job generates.
    pub fn scene_index(&self) -> usize {
        self.scene_index
    }

    /// Current phase.
    pub fn phase(&self) -> JobPhase {
        self.phase
    }

    /// Reference produced by the image stage.
    pub fn image_reference(&self) -> Option<&str> {
        self.image_reference.as_deref()
    }

    /// Local clip path once succeeded.
    pub fn result_path(&self) -> Option<&PathBuf> {
        self.result_path.as_ref()
    }

    /// Diagnostic text once failed.
    pub fn failure_reason(&self) -> Option<&str> {
        self.failure_reason.as_deref()
    }

    /// Terminal status, if reached.
    pub fn result_status(&self) -> Option<SceneStatus> {
        match self.phase {
            JobPhase::Succeeded => Some(SceneStatus::Completed),
            JobPhase::Failed => Some(SceneStatus::Failed),
            _ => None,
        }
    }

    /// Move forward to a non-terminal phase.
    ///
    /// Returns false, leaving the job untouched, when the move would go
    /// backwards, stay in place, or leave a terminal phase.
    pub fn advance(&mut self, next: JobPhase) -> bool {
        if self.phase.is_terminal() || next.is_terminal() || next <= self.phase {
            return false;
        }
        self.phase = next;
        true
    }

    /// Record the image stage output and move to `VideoPending`.
    pub fn image_ready(&mut self, reference: impl Into<String>) -> bool {
        if self.phase != JobPhase::ImagePolling {
            return false;
        }
        self.image_reference = Some(reference.into());
        self.phase = JobPhase::VideoPending;
        true
    }

    /// Finish successfully with the local clip path.
    pub fn succeed(&mut self, path: PathBuf) -> bool {
        if self.phase != JobPhase::VideoPolling {
            return false;
        }
        self.result_path = Some(path);
        self.phase = JobPhase::Succeeded;
        true
    }

    /// Finish with a failure from any non-terminal phase.
    pub fn fail(&mut self, reason: impl Into<String>) -> bool {
        if self.phase.is_terminal() {
            return false;
        }
        self.failure_reason = Some(reason.into());
        self.phase = JobPhase::Failed;
        true
    }
}
