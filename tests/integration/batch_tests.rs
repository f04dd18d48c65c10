/*!
 * Integration tests for multi-scene batch runs
 */

use anyhow::Result;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use scriptreel::file_utils::FileManager;
use scriptreel::generation::{SceneBatchRunner, SceneStatus};
use scriptreel::providers::mock::{MockMediaService, StageBehavior};
use crate::common;

#[tokio::test]
async fn test_run_shouldReturnResultsOrderedByIndex() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let service = MockMediaService::new(
        StageBehavior::Succeed { after_polls: 1 },
        StageBehavior::immediate(),
    );
    let scenes: Vec<_> = (0..5)
        .map(|i| common::scene(i, "INT. ROOM", "DAY", 5.0 + i as f64))
        .collect();
    let runner = SceneBatchRunner::new(common::orchestrator(&service, temp_dir.path()), 3);

    let (results, summary) = runner.run(&scenes, |_, _| {}).await;

    let indices: Vec<usize> = results.iter().map(|r| r.scene_index).collect();
    assert_eq!(indices, vec![0, 1, 2, 3, 4]);
    assert_eq!(summary.completed, 5);
    assert_eq!(summary.failed, 0);
    assert_eq!(summary.total_clip_seconds, 5.0 + 6.0 + 7.0 + 8.0 + 9.0);
    for i in 0..5 {
        assert!(FileManager::file_exists(FileManager::scene_media_path(temp_dir.path(), i)));
    }
    Ok(())
}

#[tokio::test]
async fn test_run_withFailingScenes_shouldContinueOthers() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let service = MockMediaService::working().with_failing_download();
    let scenes = vec![
        common::scene(0, "INT. A", "DAY", 5.0),
        common::scene(1, "INT. B", "DAY", 5.0),
    ];
    let runner = SceneBatchRunner::new(common::orchestrator(&service, temp_dir.path()), 2);

    let (results, summary) = runner.run(&scenes, |_, _| {}).await;

    assert_eq!(results.len(), 2);
    assert!(results.iter().all(|r| r.status == SceneStatus::Failed));
    assert_eq!(summary.failed, 2);
    assert_eq!(summary.total_clip_seconds, 0.0);
    assert!(!summary.all_completed());
    assert_eq!(service.downloads(), 2);
    Ok(())
}

#[tokio::test]
async fn test_run_shouldReportProgressForEveryScene() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let service = MockMediaService::working();
    let scenes: Vec<_> = (0..4).map(|i| common::scene(i, "EXT. YARD", "NIGHT", 5.0)).collect();
    let runner = SceneBatchRunner::new(common::orchestrator(&service, temp_dir.path()), 0);

    let calls = Arc::new(AtomicUsize::new(0));
    let last_total = Arc::new(AtomicUsize::new(0));
    let (calls_in_callback, total_in_callback) = (calls.clone(), last_total.clone());

    runner.run(&scenes, move |done, total| {
        calls_in_callback.fetch_add(1, Ordering::SeqCst);
        total_in_callback.store(total, Ordering::SeqCst);
        assert!(done <= total);
    }).await;

    assert_eq!(calls.load(Ordering::SeqCst), 4);
    assert_eq!(last_total.load(Ordering::SeqCst), 4);
    assert_eq!(service.image_submissions(), 4);
    Ok(())
}

#[tokio::test]
async fn test_run_withNoScenes_shouldReturnEmptySummary() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let service = MockMediaService::working();
    let runner = SceneBatchRunner::new(common::orchestrator(&service, temp_dir.path()), 2);

    let (results, summary) = runner.run(&[], |_, _| {}).await;

    assert!(results.is_empty());
    assert_eq!(summary.completed, 0);
    assert!(summary.all_completed());
    assert_eq!(service.image_submissions(), 0);
    Ok(())
}
