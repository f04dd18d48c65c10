/*!
 * # ScriptReel - screenplays to scene clips with AI
 *
 * A Rust library that turns a story idea or a screenplay into a set of
 * short video clips, one per scene.
 *
 * ## Features
 *
 * - Parse screenplay text into scenes (heading, description, dialogue)
 * - Estimate scene durations and synthesize visual prompts
 * - Generate screenplays from a story idea with an LLM (Anthropic API)
 * - Generate a keyframe then a clip per scene with an asynchronous
 *   media service (Runway API)
 * - Bounded-concurrency rendering of whole scripts
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `app_config`: Configuration management
 * - `script`: Screenplay model and processing:
 *   - `script::segmenter`: Screenplay parsing into scenes
 *   - `script::prompt`: Visual prompt synthesis
 *   - `script::writer`: LLM screenplay generation with fallback
 * - `generation`: Scene media generation:
 *   - `generation::orchestrator`: Image then video job for one scene
 *   - `generation::batch`: Runs over many scenes
 * - `providers`: Client implementations for the external services:
 *   - `providers::anthropic`: Anthropic API client
 *   - `providers::runway`: Runway API client
 *   - `providers::mock`: Mocks for tests
 * - `file_utils`: File system operations
 * - `errors`: Custom error types for the application
 *
 * ## License
 *
 * This project is licensed under the MIT License
 */

// Global lints configuration
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::redundant_closure_for_method_calls)]

// Public modules
pub mod app_config;
pub mod errors;
pub mod file_utils;
pub mod generation;
pub mod providers;
pub mod script;

// Re-export main types for easier usage
pub use app_config::Config;
pub use errors::{AppError, GenerationError, ProviderError};
pub use generation::{BatchSummary, SceneBatchRunner, SceneJobOrchestrator, SceneResult, SceneStatus};
pub use script::{Scene, ScriptDocument, ScriptSegmenter, ScriptWriter};
