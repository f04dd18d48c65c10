/*!
 * Screenplay handling.
 *
 * - `model`: Scene and ScriptDocument records
 * - `segmenter`: heading/cue/dialogue segmentation and duration estimates
 * - `prompt`: cinematic text-to-video prompt synthesis
 * - `writer`: screenplay generation through a language model, with fallback
 */

pub mod model;
pub mod prompt;
pub mod segmenter;
pub mod writer;

pub use model::{DialogueLine, Scene, ScriptDocument};
pub use segmenter::{SceneHeading, ScriptSegmenter, SegmenterConfig};
pub use writer::{ScriptDraft, ScriptWriter, derive_title};
