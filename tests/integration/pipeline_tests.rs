/*!
 * End-to-end tests: screenplay text to document to scene clips
 */

use anyhow::Result;
use std::sync::Arc;

use scriptreel::app_config::Config;
use scriptreel::file_utils::FileManager;
use scriptreel::generation::{OrchestratorSettings, SceneBatchRunner, SceneJobOrchestrator, clip_duration};
use scriptreel::providers::ScriptPreferences;
use scriptreel::providers::mock::{MockMediaService, MockOracle};
use scriptreel::script::{ScriptSegmenter, ScriptWriter, derive_title};
use crate::common;

#[tokio::test]
async fn test_pipeline_sampleScript_shouldRenderEveryScene() -> Result<()> {
    common::init_logging();
    let temp_dir = common::create_temp_dir()?;
    let script_path = common::create_test_file(temp_dir.path(), "train.txt", common::SAMPLE_SCRIPT)?;
    let output_dir = temp_dir.path().join("clips");

    let text = FileManager::read_to_string(&script_path)?;
    let document = ScriptSegmenter::default().parse(&text, "The Last Train", None);
    let service = MockMediaService::working();
    let runner = SceneBatchRunner::new(common::orchestrator(&service, &output_dir), 2);

    let (results, summary) = runner.run(&document.scenes, |_, _| {}).await;

    assert_eq!(summary.completed, document.scene_count());
    for (scene, result) in document.scenes.iter().zip(results.iter()) {
        assert_eq!(result.scene_index, scene.index);
        assert_eq!(result.duration, f64::from(clip_duration(scene.estimated_duration_seconds, 10)));
        assert!(FileManager::file_exists(FileManager::scene_media_path(&output_dir, scene.index)));
    }

    let prompts = service.image_prompts();
    for scene in &document.scenes {
        assert!(prompts.contains(&scene.generation_prompt));
    }
    Ok(())
}

#[tokio::test]
async fn test_pipeline_generatedScript_shouldFeedSegmenter() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let idea = "A conductor and a passenger share one last night ride";
    let writer = ScriptWriter::new(MockOracle::returning(common::SAMPLE_SCRIPT));

    let draft = writer.write(idea, &ScriptPreferences::default()).await;
    let document = ScriptSegmenter::default()
        .parse(draft.text(), &derive_title(idea), Some("AI Generated"))
        .with_generated_id();

    assert_eq!(document.title, "A conductor and a passenger...");
    assert_eq!(document.scene_count(), 3);

    let service = MockMediaService::working();
    let first = document.scene(0).unwrap();
    let result = common::orchestrator(&service, temp_dir.path()).run(first).await;
    assert!(result.is_completed());
    Ok(())
}

#[tokio::test]
async fn test_pipeline_withSettingsFromConfig_shouldUseConfiguredRatios() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let mut config = Config::default();
    config.media.image_ratio = "1024:1024".to_string();
    config.media.video_ratio = "768:1280".to_string();
    config.polling.max_clip_seconds = 6;

    let mut settings = OrchestratorSettings::from_config(&config);
    settings.image_interval = std::time::Duration::from_millis(1);
    settings.video_interval = std::time::Duration::from_millis(1);
    let service = MockMediaService::working();
    let orchestrator = SceneJobOrchestrator::new(Arc::new(service.clone()), settings, temp_dir.path());

    let result = orchestrator.run(&common::scene(0, "EXT. SEA", "DAY", 9.0)).await;

    assert_eq!(result.duration, 6.0);
    assert_eq!(service.video_requests()[0].aspect_ratio, "768:1280");
    Ok(())
}
