/*!
 * Tests for screenplay segmentation
 */

use scriptreel::script::{DialogueLine, ScriptSegmenter, SegmenterConfig};
use crate::common;

fn parse(text: &str) -> scriptreel::ScriptDocument {
    ScriptSegmenter::default().parse(text, "Test", None)
}

#[test]
fn test_parse_withoutHeadings_shouldReturnEmptyDocument() {
    for text in ["", "   \n\n", "Just a story about a dog.", "MAYA\nHello.", "INT. KITCHEN"] {
        let document = parse(text);

        assert!(document.scenes.is_empty(), "unexpected scenes for {:?}", text);
        assert!(document.total_duration.is_none());
    }
}

#[test]
fn test_parse_sampleScript_shouldNumberScenesContiguously() {
    let document = parse(common::SAMPLE_SCRIPT);

    assert_eq!(document.scene_count(), 3);
    for (i, scene) in document.scenes.iter().enumerate() {
        assert_eq!(scene.index, i);
    }
}

#[test]
fn test_parse_heading_shouldCaptureLocationAndTime() {
    let document = parse("INT. COFFEE SHOP - DAY\nSteam rises from the espresso machine.");
    let scene = &document.scenes[0];

    assert!(scene.location.contains("COFFEE SHOP"));
    assert_eq!(scene.time_of_day, "DAY");
    assert!(scene.is_interior());
    assert_eq!(scene.place(), "COFFEE SHOP");
}

#[test]
fn test_parse_hyphenatedLocation_shouldKeepEverythingBeforeTime() {
    let document = parse(common::SAMPLE_SCRIPT);
    let scene = &document.scenes[1];

    assert_eq!(scene.place(), "PLATFORM - NORTH END");
    assert_eq!(scene.time_of_day, "NIGHT");
    assert!(!scene.is_interior());
}

#[test]
fn test_parse_markdownHeading_shouldBeRecognized() {
    let document = parse(common::SAMPLE_SCRIPT);
    let scene = &document.scenes[2];

    assert_eq!(scene.place(), "TRAIN CAR");
    assert_eq!(scene.time_of_day, "MORNING");
}

#[test]
fn test_parse_consecutiveHeadings_shouldProduceEmptyFlooredScene() {
    let document = parse("INT. HALLWAY - DAY\nEXT. GARDEN - DAY\nBirds sing.");
    let empty = &document.scenes[0];

    assert_eq!(document.scene_count(), 2);
    assert!(empty.description.is_empty());
    assert!(empty.dialogue.is_empty());
    assert_eq!(empty.estimated_duration_seconds, 5.0);
}

#[test]
fn test_parse_longScene_shouldNeverGoBelowFloor() {
    let long_action = "word ".repeat(500);
    let text = format!(
        "INT. A - DAY\n{}\nEXT. B - NIGHT\nX.\nINT. C - DAY\nSAM\nHi.\nSAM\nBye.",
        long_action
    );
    let document = parse(&text);

    for scene in &document.scenes {
        assert!(scene.estimated_duration_seconds >= 5.0);
    }
    assert!((document.scenes[0].estimated_duration_seconds - 150.0).abs() < 1e-6);
    assert!((document.scenes[2].estimated_duration_seconds - 6.0).abs() < 1e-6);
}

#[test]
fn test_parse_totalDuration_shouldSumScenes() {
    let document = parse(common::SAMPLE_SCRIPT);
    let sum: f64 = document.scenes.iter().map(|s| s.estimated_duration_seconds).sum();

    assert_eq!(document.total_duration, Some(sum));
    assert!((document.scenes[0].estimated_duration_seconds - 9.3).abs() < 1e-6);
}

#[test]
fn test_parse_twice_shouldProduceIdenticalPrompts() {
    let first = parse(common::SAMPLE_SCRIPT);
    let second = parse(common::SAMPLE_SCRIPT);

    for (a, b) in first.scenes.iter().zip(second.scenes.iter()) {
        assert!(!a.generation_prompt.is_empty());
        assert_eq!(a.generation_prompt, b.generation_prompt);
    }
}

#[test]
fn test_parse_singleSceneExample_shouldMatchExpectedShape() {
    let document = parse("INT. ROOM - NIGHT\n\nA person sits alone.\n\nPERSON\nHello world.");

    assert_eq!(document.scene_count(), 1);
    let scene = &document.scenes[0];
    assert!(scene.location.contains("ROOM"));
    assert_eq!(scene.time_of_day, "NIGHT");
    assert_eq!(scene.dialogue, vec![DialogueLine::new("PERSON", "Hello world.")]);
    assert!(scene.estimated_duration_seconds > 0.0);
}

#[test]
fn test_parse_sampleScript_shouldAttributeDialogueInOrder() {
    let document = parse(common::SAMPLE_SCRIPT);
    let scene = &document.scenes[0];

    assert_eq!(scene.characters(), vec!["MAYA", "CONDUCTOR"]);
    assert_eq!(scene.dialogue[1].line, "It's always late.");
    assert!(scene.description.starts_with("Rain hammers"));
}

#[test]
fn test_parse_shortHeadingWithoutTime_shouldBecomeCharacterCue() {
    let document = parse("INT. ROOM - DAY\nINT. KITCHEN\nShe opens the fridge.");

    assert_eq!(document.scene_count(), 1);
    let scene = &document.scenes[0];
    assert_eq!(scene.description, "");
    assert_eq!(scene.dialogue, vec![DialogueLine::new("INT. KITCHEN", "She opens the fridge.")]);
}

#[test]
fn test_parse_longHeadingWithoutTime_shouldLandInDescription() {
    let document = parse("INT. ROOM - DAY\nINT. THE OLD STONE KITCHEN\nShe opens the fridge.");

    assert_eq!(document.scene_count(), 1);
    let scene = &document.scenes[0];
    assert_eq!(scene.description, "INT. THE OLD STONE KITCHEN She opens the fridge.");
    assert!(scene.dialogue.is_empty());
}

#[test]
fn test_parse_shouldKeepMetadataAndContent() {
    let document = ScriptSegmenter::default().parse(common::SAMPLE_SCRIPT, "The Last Train", Some("Someone"));

    assert_eq!(document.title, "The Last Train");
    assert_eq!(document.author.as_deref(), Some("Someone"));
    assert_eq!(document.content, common::SAMPLE_SCRIPT);
    assert!(document.id.is_none());
}

#[test]
fn test_withGeneratedId_shouldUseScriptPrefix() {
    let document = parse(common::SAMPLE_SCRIPT).with_generated_id();
    let id = document.id.unwrap();

    assert!(id.starts_with("script_"));
    assert_eq!(id.len(), "script_".len() + 12);
}

#[test]
fn test_customConfig_shouldChangeEstimates() {
    let segmenter = ScriptSegmenter::new(SegmenterConfig {
        min_scene_seconds: 2.0,
        ..SegmenterConfig::default()
    });

    let document = segmenter.parse("EXT. ROOF - DUSK\nWind.", "Short", None);

    assert!((document.scenes[0].estimated_duration_seconds - 2.0).abs() < 1e-9);
}

#[test]
fn test_document_shouldSerializeToJson() {
    let document = parse(common::SAMPLE_SCRIPT);

    let value = serde_json::to_value(&document).unwrap();

    assert_eq!(value["scenes"].as_array().unwrap().len(), 3);
    assert_eq!(value["scenes"][0]["dialogue"][0]["character"], "MAYA");
    assert!(value.get("id").is_none());
}
