/*!
 * Tests for screenplay generation and the fallback script
 */

use scriptreel::providers::ScriptPreferences;
use scriptreel::providers::mock::MockOracle;
use scriptreel::script::writer::{FALLBACK_SCRIPT, GENERATED_AUTHOR};
use scriptreel::script::{ScriptDraft, ScriptSegmenter, ScriptWriter, derive_title};

#[test]
fn test_fallbackScript_shouldParseIntoThreeScenes() {
    let document = ScriptSegmenter::default().parse(FALLBACK_SCRIPT, "Fallback", Some(GENERATED_AUTHOR));

    assert_eq!(document.scene_count(), 3);
    assert_eq!(document.scenes[0].place(), "COFFEE SHOP");
    assert_eq!(document.scenes[1].place(), "PARK");
    assert_eq!(document.scenes[1].time_of_day, "EVENING");
    assert_eq!(document.scenes[2].place(), "SARAH'S APARTMENT");
    assert!(document.scenes[1].characters().contains(&"JOHN"));
}

#[tokio::test]
async fn test_write_withOracle_shouldCallItOnce() {
    let oracle = MockOracle::returning("EXT. DESERT - DAY\nSand everywhere.");
    let writer = ScriptWriter::new(oracle.clone());

    let draft = writer.write("a desert crossing", &ScriptPreferences::default()).await;

    assert!(!draft.is_fallback());
    assert_eq!(oracle.request_count(), 1);
    let document = ScriptSegmenter::default().parse(draft.text(), &derive_title("a desert crossing"), None);
    assert_eq!(document.scene_count(), 1);
}

#[tokio::test]
async fn test_write_withFailingOracle_shouldExposeReason() {
    let writer = ScriptWriter::new(MockOracle::failing());

    let draft = writer.write("two friends reunite", &ScriptPreferences::default()).await;

    match draft {
        ScriptDraft::Fallback { text, reason } => {
            assert_eq!(text, FALLBACK_SCRIPT);
            assert!(reason.contains("Simulated oracle failure"));
        }
        ScriptDraft::Generated(_) => panic!("expected fallback"),
    }
}

#[test]
fn test_write_blockingCall_shouldWorkOutsideRuntime() {
    let writer = ScriptWriter::new(MockOracle::returning("INT. CAVE - NIGHT\nDrip."));

    let draft = tokio_test::block_on(writer.write("a cave", &ScriptPreferences::default()));

    assert_eq!(draft.text(), "INT. CAVE - NIGHT\nDrip.");
}

#[test]
fn test_deriveTitle_shouldTruncateLongIdeas() {
    assert_eq!(derive_title("one two three four five six"), "one two three four five...");
    assert_eq!(derive_title("one two three four five"), "one two three four five");
    assert_eq!(derive_title(""), "Untitled");
}
