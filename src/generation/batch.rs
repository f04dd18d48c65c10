/*!
 * Runs scene jobs for a whole script with bounded concurrency.
 *
 * Each scene is independent: one failed scene never stops the others.
 * Results come back ordered by scene index.
 */

use futures::stream::{self, StreamExt};
use log::{info, warn};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Instant;
use tokio::sync::Semaphore;

use crate::script::Scene;

use super::job::SceneResult;
use super::orchestrator::SceneJobOrchestrator;

/// Totals for a finished batch
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BatchSummary {
    /// Scenes that produced a clip
    pub completed: usize,

    /// Scenes that failed
    pub failed: usize,

    /// Sum of requested durations of completed clips
    pub total_clip_seconds: f64,
}

impl BatchSummary {
    /// Summarize a set of scene results
    pub fn from_results(results: &[SceneResult]) -> Self {
        results.iter().fold(Self::default(), |mut summary, result| {
            if result.is_completed() {
                summary.completed += 1;
                summary.total_clip_seconds += result.duration;
            } else {
                summary.failed += 1;
            }
            summary
        })
    }

    /// Whether every scene produced a clip
    pub fn all_completed(&self) -> bool {
        self.failed == 0
    }
}

/// Batch runner over a shared orchestrator
pub struct SceneBatchRunner {
    /// Orchestrator used for every scene
    orchestrator: SceneJobOrchestrator,

    /// Maximum number of scenes in flight
    max_concurrent_scenes: usize,
}

impl SceneBatchRunner {
    /// Create a runner; a concurrency of 0 is treated as 1
    pub fn new(orchestrator: SceneJobOrchestrator, max_concurrent_scenes: usize) -> Self {
        Self {
            orchestrator,
            max_concurrent_scenes: max_concurrent_scenes.max(1),
        }
    }

    /// Generate clips for the given scenes
    ///
    /// `progress_callback` receives (finished, total) after each scene.
    pub async fn run(
        &self,
        scenes: &[Scene],
        progress_callback: impl Fn(usize, usize) + Clone + Send + 'static,
    ) -> (Vec<SceneResult>, BatchSummary) {
        let total_scenes = scenes.len();
        let semaphore = Arc::new(Semaphore::new(self.max_concurrent_scenes));
        let finished_scenes = Arc::new(AtomicUsize::new(0));
        let start_time = Instant::now();

        info!("Generating {} scenes, {} at a time", total_scenes, self.max_concurrent_scenes);

        let mut results = stream::iter(scenes.iter())
            .map(|scene| {
                let orchestrator = &self.orchestrator;
                let semaphore = semaphore.clone();
                let finished_scenes = finished_scenes.clone();
                let progress_callback = progress_callback.clone();

                async move {
                    // The semaphore is never closed
                    let _permit = semaphore.acquire().await.ok();

                    let result = orchestrator.run(scene).await;

                    let current = finished_scenes.fetch_add(1, Ordering::SeqCst) + 1;
                    progress_callback(current, total_scenes);
                    result
                }
            })
            .buffer_unordered(self.max_concurrent_scenes)
            .collect::<Vec<_>>()
            .await;

        results.sort_by_key(|result| result.scene_index);

        let summary = BatchSummary::from_results(&results);
        if summary.all_completed() {
            info!("All {} scenes generated in {:?}", summary.completed, start_time.elapsed());
        } else {
            warn!(
                "{} of {} scenes failed after {:?}",
                summary.failed, total_scenes, start_time.elapsed()
            );
        }

        (results, summary)
    }
}
