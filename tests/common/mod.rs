/*!
 * Common test utilities for the scriptreel test suite
 */

use anyhow::Result;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;

use scriptreel::generation::{OrchestratorSettings, SceneJobOrchestrator};
use scriptreel::providers::mock::MockMediaService;
use scriptreel::script::Scene;

/// Three scenes with dialogue, a hyphenated location and a markdown heading
pub const SAMPLE_SCRIPT: &str = r#"THE LAST TRAIN
Written by Someone

INT. TRAIN STATION - NIGHT

Rain hammers the glass roof. MAYA (30s) checks the departure board.

MAYA
It's late again.

CONDUCTOR
It's always late.

EXT. PLATFORM - NORTH END - NIGHT

The train pulls in, steam curling around the lamps.

**INT. TRAIN CAR - MORNING**

Sunlight floods the compartment. Maya sleeps against the window.
"#;

/// Initialize env_logger once for tests that want log output
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Creates a temporary directory for test files
pub fn create_temp_dir() -> Result<TempDir> {
    Ok(TempDir::new()?)
}

/// Creates a test file with the given content in the specified directory
pub fn create_test_file(dir: &Path, filename: &str, content: &str) -> Result<PathBuf> {
    let file_path = dir.join(filename);
    fs::write(&file_path, content)?;
    Ok(file_path)
}

/// Build a scene by hand, bypassing the segmenter
pub fn scene(index: usize, location: &str, time_of_day: &str, estimated_duration_seconds: f64) -> Scene {
    Scene {
        index,
        location: location.to_string(),
        time_of_day: time_of_day.to_string(),
        description: "A quiet moment.".to_string(),
        dialogue: Vec::new(),
        estimated_duration_seconds,
        generation_prompt: format!("Medium shot: {} during {}", location, time_of_day),
    }
}

/// Millisecond budgets so timeouts happen quickly
pub fn fast_settings() -> OrchestratorSettings {
    OrchestratorSettings {
        image_interval: Duration::from_millis(2),
        image_max_wait: Duration::from_millis(40),
        video_interval: Duration::from_millis(2),
        video_max_wait: Duration::from_millis(40),
        ..OrchestratorSettings::default()
    }
}

/// Orchestrator over a mock service writing into `output_dir`
pub fn orchestrator(service: &MockMediaService, output_dir: &Path) -> SceneJobOrchestrator {
    SceneJobOrchestrator::new(Arc::new(service.clone()), fast_settings(), output_dir)
}

/// Number of entries in a directory, or 0 when it does not exist
pub fn count_entries(dir: &Path) -> usize {
    fs::read_dir(dir).map(|entries| entries.count()).unwrap_or(0)
}
