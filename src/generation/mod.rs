/*!
 * Scene media generation.
 *
 * - `job`: per-scene job state and results
 * - `orchestrator`: image then video generation for one scene
 * - `batch`: bounded-concurrency runs over many scenes
 */

pub mod batch;
pub mod job;
pub mod orchestrator;

pub use batch::{BatchSummary, SceneBatchRunner};
pub use job::{GenerationJob, JobPhase, SceneResult, SceneStatus};
pub use orchestrator::{OrchestratorSettings, SceneJobOrchestrator, clip_duration};
