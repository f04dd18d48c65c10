/*!
 * Tests for generation prompt synthesis
 */

use scriptreel::script::ScriptSegmenter;
use scriptreel::script::prompt::{CAMERA_ANGLES, Lighting, QUALITY_SUFFIX, camera_angle, synthesize, truncate_prompt};
use crate::common;

#[test]
fn test_synthesize_parsedScenes_shouldCycleCameraAngles() {
    let text: String = (0..10)
        .map(|i| format!("INT. ROOM {} - DAY\nSomething happens.\n", i))
        .collect();
    let document = ScriptSegmenter::default().parse(&text, "Angles", None);

    for scene in &document.scenes {
        let expected = CAMERA_ANGLES[scene.index % CAMERA_ANGLES.len()];
        assert!(scene.generation_prompt.starts_with(expected), "scene {}", scene.index);
    }
    assert_eq!(camera_angle(9), camera_angle(1));
}

#[test]
fn test_synthesize_shouldDescribePlaceWithoutMarker() {
    let scene = common::scene(0, "EXT. HARBOR", "DUSK", 5.0);

    let prompt = synthesize(&scene);

    assert!(prompt.contains("Exterior of harbor during dusk."));
    assert!(prompt.contains(Lighting::Evening.descriptor()));
    assert!(!prompt.contains("ext."));
}

#[test]
fn test_synthesize_middayAndDaybreak_shouldReadAsDay() {
    assert_eq!(Lighting::for_time_of_day("MIDDAY"), Lighting::Day);
    assert_eq!(Lighting::for_time_of_day("DAYBREAK"), Lighting::Day);
    assert_eq!(Lighting::for_time_of_day("LATER"), Lighting::Cinematic);
}

#[test]
fn test_synthesize_shouldEndWithQualitySuffix() {
    let document = ScriptSegmenter::default().parse(common::SAMPLE_SCRIPT, "Test", None);

    for scene in &document.scenes {
        assert!(scene.generation_prompt.ends_with(QUALITY_SUFFIX));
        assert!(scene.generation_prompt.contains(&scene.description));
    }
}

#[test]
fn test_truncatePrompt_atServiceLimits_shouldCountCharacters() {
    let prompt = "é".repeat(600);

    assert_eq!(truncate_prompt(&prompt, 512).chars().count(), 512);
    assert_eq!(truncate_prompt(&prompt, 1000), prompt);
    assert_eq!(truncate_prompt(&prompt, 0), "");
}
