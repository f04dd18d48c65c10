/*!
 * Prompt synthesis for text-to-video generation.
 *
 * Each scene gets a deterministic cinematic prompt built from its camera
 * framing, interior/exterior setting, lighting, location, time of day and
 * action description.
 */

use super::model::Scene;

/// Camera framings cycled by scene index.
pub const CAMERA_ANGLES: [&str; 8] = [
    "Medium shot",
    "Wide angle establishing shot",
    "Close-up shot",
    "Low angle shot",
    "Over-the-shoulder shot",
    "Dutch angle shot",
    "High angle shot",
    "Tracking shot",
];

/// Appended to every prompt.
pub const QUALITY_SUFFIX: &str = "Cinematic composition, professional film quality, 4K resolution, \
realistic textures and materials, subtle camera movement, film grain, shallow depth of field.";

const INTERIOR_DETAILS: &str = "realistic indoor environment, detailed set design, depth of field";
const EXTERIOR_DETAILS: &str = "outdoor setting, natural environment, atmospheric depth";

/// Lighting descriptor derived from the time of day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lighting {
    Day,
    Night,
    Morning,
    Evening,
    Cinematic,
}

impl Lighting {
    /// Pick lighting by substring match on the time-of-day token.
    ///
    /// DAY is checked first, so `MIDDAY` and `DAYBREAK` read as day.
    pub fn for_time_of_day(time_of_day: &str) -> Self {
        let time = time_of_day.to_uppercase();
        if time.contains("DAY") {
            Self::Day
        } else if time.contains("NIGHT") {
            Self::Night
        } else if time.contains("MORNING") {
            Self::Morning
        } else if time.contains("EVENING") || time.contains("DUSK") {
            Self::Evening
        } else {
            Self::Cinematic
        }
    }

    /// Prompt fragment for this lighting.
    pub fn descriptor(&self) -> &'static str {
        match self {
            Self::Day => "natural daylight, bright and clear, high contrast",
            Self::Night => "low-key lighting, atmospheric shadows, deep blacks, cinematic night",
            Self::Morning => "soft morning light, golden hour glow, warm tones",
            Self::Evening => "warm golden hour lighting, orange and pink sunset glow, rim lighting",
            Self::Cinematic => "cinematic lighting, dramatic contrast",
        }
    }
}

/// Camera framing for a scene index.
pub fn camera_angle(index: usize) -> &'static str {
    CAMERA_ANGLES[index % CAMERA_ANGLES.len()]
}

/// Build the generation prompt for a scene.
///
/// Only reads `index`, `location`, `time_of_day` and `description`, so it can
/// run before `generation_prompt` is filled in.
pub fn synthesize(scene: &Scene) -> String {
    let (setting, details) = if scene.is_interior() {
        ("Interior", INTERIOR_DETAILS)
    } else {
        ("Exterior", EXTERIOR_DETAILS)
    };
    let lighting = Lighting::for_time_of_day(&scene.time_of_day);

    let mut prompt = format!(
        "{}: {} of {} during {}. ",
        camera_angle(scene.index),
        setting,
        scene.place().to_lowercase(),
        scene.time_of_day.to_lowercase(),
    );

    let description = scene.description.trim();
    if !description.is_empty() {
        prompt.push_str(description);
        prompt.push(' ');
    }

    prompt.push_str(lighting.descriptor());
    prompt.push_str(". ");
    prompt.push_str(details);
    prompt.push_str(". ");
    prompt.push_str(QUALITY_SUFFIX);
    prompt
}

/// Truncate a prompt to at most `max_chars` characters.
///
/// Counts chars rather than bytes so multi-byte text is never split.
pub fn truncate_prompt(prompt: &str, max_chars: usize) -> &str {
    match prompt.char_indices().nth(max_chars) {
        Some((byte_index, _)) => &prompt[..byte_index],
        None => prompt,
    }
}
