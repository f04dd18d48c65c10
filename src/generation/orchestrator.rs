/*!
 * Two-phase scene generation driver.
 *
 * For one scene: submit a text-to-image job, poll it to a terminal status,
 * submit an image-to-video job from the resulting image, poll that, then
 * download the clip into the output directory. Every failure along the way
 * (remote failure, timeout, transport or storage error) ends the job as
 * `Failed`; `run` itself never returns an error.
 *
 * On timeout the remote task is abandoned, not cancelled.
 */

use log::{debug, error, info, warn};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::{Instant, sleep};

use crate::app_config::Config;
use crate::errors::{GenerationError, GenerationStage};
use crate::file_utils::FileManager;
use crate::providers::{MediaJobService, TaskSnapshot, TaskStatus, VideoJobRequest};
use crate::script::Scene;
use crate::script::prompt::truncate_prompt;

use super::job::{GenerationJob, JobPhase, SceneResult, SceneStatus};

/// Timing budgets and service limits for scene jobs.
#[derive(Debug, Clone, PartialEq)]
pub struct OrchestratorSettings {
    /// Delay between image task polls
    pub image_interval: Duration,
    /// Give up on the image task after this long
    pub image_max_wait: Duration,
    /// Delay between video task polls
    pub video_interval: Duration,
    /// Give up on the video task after this long
    pub video_max_wait: Duration,
    /// Image prompt length cap, in characters
    pub image_prompt_limit: usize,
    /// Video prompt length cap, in characters
    pub video_prompt_limit: usize,
    /// Longest clip the video model accepts, in seconds
    pub max_clip_seconds: u32,
    /// Keyframe aspect ratio
    pub image_ratio: String,
    /// Clip aspect ratio
    pub video_ratio: String,
}

impl OrchestratorSettings {
    /// Settings from the application configuration.
    pub fn from_config(config: &Config) -> Self {
        let polling = &config.polling;
        Self {
            image_interval: polling.image_interval(),
            image_max_wait: polling.image_max_wait(),
            video_interval: polling.video_interval(),
            video_max_wait: polling.video_max_wait(),
            image_prompt_limit: polling.image_prompt_limit,
            video_prompt_limit: polling.video_prompt_limit,
            max_clip_seconds: polling.max_clip_seconds,
            image_ratio: config.media.image_ratio.clone(),
            video_ratio: config.media.video_ratio.clone(),
        }
    }
}

impl Default for OrchestratorSettings {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

/// Clip length requested from the video model.
///
/// Rounded estimate capped at `max_seconds`; there is no lower clamp.
/// Halves round away from zero, so 2.5 becomes 3 and 4.5 becomes 5.
pub fn clip_duration(estimated_seconds: f64, max_seconds: u32) -> u32 {
    // Negative and NaN estimates saturate to 0
    let rounded = estimated_seconds.round() as u32;
    rounded.min(max_seconds)
}

/// Drives one scene through image then video generation.
#[derive(Debug, Clone)]
pub struct SceneJobOrchestrator {
    service: Arc<dyn MediaJobService>,
    settings: OrchestratorSettings,
    output_dir: PathBuf,
}

impl SceneJobOrchestrator {
    /// Create an orchestrator writing clips into `output_dir`.
    pub fn new(
        service: Arc<dyn MediaJobService>,
        settings: OrchestratorSettings,
        output_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            service,
            settings,
            output_dir: output_dir.into(),
        }
    }

    /// Output directory for clips.
    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Timing budgets in use.
    pub fn settings(&self) -> &OrchestratorSettings {
        &self.settings
    }

    /// Generate the clip for a scene.
    ///
    /// One attempt only. Failures are logged and reported through
    /// `SceneResult::status`.
    pub async fn run(&self, scene: &Scene) -> SceneResult {
        let (result, _job) = self.run_job(scene).await;
        result
    }

    /// Generate the clip and also return the finished job for inspection.
    pub async fn run_job(&self, scene: &Scene) -> (SceneResult, GenerationJob) {
        let duration = clip_duration(scene.estimated_duration_seconds, self.settings.max_clip_seconds);
        let mut job = GenerationJob::new(scene.index);

        info!("Scene {}: starting generation ({}s clip)", scene.index, duration);
        let started = Instant::now();

        if let Err(e) = self.drive(&mut job, scene, duration).await {
            error!("Scene {}: generation failed in {}: {}", scene.index, job.phase(), e);
            job.fail(e.to_string());
        }

        let status = job.result_status().unwrap_or(SceneStatus::Failed);
        if status == SceneStatus::Completed {
            info!("Scene {}: completed in {:?}", scene.index, started.elapsed());
        }

        let result = SceneResult {
            scene_index: scene.index,
            status,
            media_path: job.result_path().cloned(),
            duration: f64::from(duration),
        };
        (result, job)
    }

    async fn drive(&self, job: &mut GenerationJob, scene: &Scene, duration: u32) -> Result<(), GenerationError> {
        // Image stage
        let image_prompt = truncate_prompt(&scene.generation_prompt, self.settings.image_prompt_limit);
        let image_task = self.service.submit_image(image_prompt, &self.settings.image_ratio).await?;
        debug!("Scene {}: image task {} submitted", scene.index, image_task);
        job.advance(JobPhase::ImagePolling);

        let snapshot = self.wait_for_task(
            GenerationStage::Image,
            &image_task,
            self.settings.image_interval,
            self.settings.image_max_wait,
        ).await?;
        let image_reference = snapshot.first_output()
            .ok_or(GenerationError::MissingOutput { stage: GenerationStage::Image })?;
        job.image_ready(image_reference);

        // Video stage
        let request = VideoJobRequest {
            prompt: truncate_prompt(&scene.generation_prompt, self.settings.video_prompt_limit).to_string(),
            image_reference: image_reference.to_string(),
            duration_seconds: duration,
            aspect_ratio: self.settings.video_ratio.clone(),
        };
        let video_task = self.service.submit_video(&request).await?;
        debug!("Scene {}: video task {} submitted", scene.index, video_task);
        job.advance(JobPhase::VideoPolling);

        let snapshot = self.wait_for_task(
            GenerationStage::Video,
            &video_task,
            self.settings.video_interval,
            self.settings.video_max_wait,
        ).await?;
        let video_url = snapshot.first_output()
            .ok_or(GenerationError::MissingOutput { stage: GenerationStage::Video })?;

        // Only write once the whole clip is in memory
        let bytes = self.service.download(video_url).await?;
        let path = FileManager::scene_media_path(&self.output_dir, scene.index);
        FileManager::write_atomically(&path, &bytes)
            .map_err(|e| GenerationError::Storage(format!("{:#}", e)))?;
        debug!("Scene {}: wrote {} bytes to {:?}", scene.index, bytes.len(), path);

        job.succeed(path);
        Ok(())
    }

    /// Poll a task until it is terminal or `max_wait` has elapsed.
    ///
    /// The last sleep is cut short at the budget, and no poll is issued once
    /// the budget is spent.
    async fn wait_for_task(
        &self,
        stage: GenerationStage,
        task_id: &str,
        interval: Duration,
        max_wait: Duration,
    ) -> Result<TaskSnapshot, GenerationError> {
        let started = Instant::now();
        let mut attempt = 0u32;

        loop {
            let remaining = max_wait.saturating_sub(started.elapsed());
            sleep(interval.min(remaining)).await;

            let waited = started.elapsed();
            if waited >= max_wait {
                warn!(
                    "{} task {} not finished after {:?}; abandoning it, the remote task is not cancelled",
                    stage, task_id, waited
                );
                return Err(GenerationError::Timeout { stage, waited_secs: waited.as_secs() });
            }
            attempt += 1;

            let snapshot = self.service.poll_task(task_id).await?;
            match snapshot.status {
                TaskStatus::Succeeded => return Ok(snapshot),
                TaskStatus::Failed | TaskStatus::Cancelled => {
                    let reason = snapshot.failure
                        .unwrap_or_else(|| format!("task ended with status {:?}", snapshot.status));
                    return Err(GenerationError::JobFailed { stage, reason });
                }
                ref status => {
                    debug!("{} task {} status {:?} (poll {})", stage, task_id, status, attempt);
                }
            }
        }
    }
}
