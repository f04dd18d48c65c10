/*!
 * Scene segmentation for screenplay documents.
 *
 * Scenes start at INT./EXT. headings. Inside a scene, short all-caps lines
 * are character cues, the line after a cue is that character's dialogue, and
 * everything else is action. Text before the first heading belongs to no scene.
 */

use log::{debug, warn};
use once_cell::sync::Lazy;
use regex::Regex;

use super::model::{DialogueLine, Scene, ScriptDocument};
use super::prompt;

/// `INT. LOCATION - TIME`, optionally wrapped in markdown emphasis.
///
/// The location group is greedy so hyphenated places keep everything up to
/// the last ` - ` before the time token.
static SCENE_HEADING: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^\*{0,2}\s*(INT\.|EXT\.)\s+(.+)\s+-\s+([A-Z]+)\s*\*{0,2}").unwrap()
});

/// Timing and cue heuristics for segmentation.
#[derive(Debug, Clone)]
pub struct SegmenterConfig {
    /// Maximum words in an all-caps line for it to count as a character cue
    pub max_cue_words: usize,

    /// Seconds added per dialogue line
    pub seconds_per_dialogue_line: f64,

    /// Seconds added per description word
    pub seconds_per_description_word: f64,

    /// Lower bound for any scene duration
    pub min_scene_seconds: f64,
}

impl Default for SegmenterConfig {
    fn default() -> Self {
        Self {
            max_cue_words: 3,
            seconds_per_dialogue_line: 3.0,
            seconds_per_description_word: 0.3,
            min_scene_seconds: 5.0,
        }
    }
}

/// Fields captured from a scene heading.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SceneHeading {
    /// `INT.` or `EXT.` as written
    pub marker: String,

    /// Place name as written
    pub place: String,

    /// Time-of-day token as written
    pub time_of_day: String,
}

impl SceneHeading {
    /// Match a trimmed line against the heading pattern.
    pub fn parse(line: &str) -> Option<Self> {
        let captures = SCENE_HEADING.captures(line.trim())?;
        let place = captures.get(2)?.as_str().trim();
        if place.is_empty() {
            return None;
        }

        Some(Self {
            marker: captures.get(1)?.as_str().to_string(),
            place: place.to_string(),
            time_of_day: captures.get(3)?.as_str().to_string(),
        })
    }

    /// Location string stored on the scene.
    pub fn location(&self) -> String {
        format!("{} {}", self.marker, self.place)
    }
}

/// Scene under construction.
struct OpenScene {
    heading: SceneHeading,
    description: String,
    dialogue: Vec<DialogueLine>,
    pending_speaker: Option<String>,
}

impl OpenScene {
    fn new(heading: SceneHeading) -> Self {
        Self {
            heading,
            description: String::new(),
            dialogue: Vec::new(),
            pending_speaker: None,
        }
    }

    fn push_description(&mut self, line: &str) {
        if !self.description.is_empty() {
            self.description.push(' ');
        }
        self.description.push_str(line);
    }
}

/// Splits screenplay text into scenes with durations and generation prompts.
#[derive(Debug, Clone, Default)]
pub struct ScriptSegmenter {
    config: SegmenterConfig,
}

impl ScriptSegmenter {
    /// Create a new segmenter with the given configuration.
    pub fn new(config: SegmenterConfig) -> Self {
        Self { config }
    }

    /// Create a segmenter with default configuration.
    pub fn with_defaults() -> Self {
        Self::default()
    }

    /// Parse a screenplay into a document.
    ///
    /// Never fails: text without headings yields a document with no scenes
    /// and no total duration.
    pub fn parse(&self, text: &str, title: &str, author: Option<&str>) -> ScriptDocument {
        let scenes = self.extract_scenes(text);

        let total_duration = if scenes.is_empty() {
            None
        } else {
            Some(scenes.iter().map(|s| s.estimated_duration_seconds).sum())
        };

        debug!(
            "Parsed '{}': {} characters, {} scene(s)",
            title,
            text.len(),
            scenes.len()
        );
        if let Some(first) = scenes.first() {
            debug!("First scene location: {}", first.location);
        } else if !text.trim().is_empty() {
            warn!("No scene headings found in '{}', expected lines like 'INT. LOCATION - DAY'", title);
        }

        ScriptDocument {
            id: None,
            title: title.to_string(),
            author: author.map(str::to_string),
            content: text.to_string(),
            scenes,
            total_duration,
        }
    }

    /// Extract the ordered scene list from screenplay text.
    pub fn extract_scenes(&self, text: &str) -> Vec<Scene> {
        let mut scenes = Vec::new();
        let mut current: Option<OpenScene> = None;

        for raw_line in text.lines() {
            let line = raw_line.trim();
            if line.is_empty() {
                continue;
            }

            if let Some(heading) = SceneHeading::parse(line) {
                if let Some(open) = current.take() {
                    scenes.push(self.finalize(scenes.len(), open));
                }
                current = Some(OpenScene::new(heading));
                continue;
            }

            // Content before the first heading is dropped
            let Some(open) = current.as_mut() else {
                continue;
            };

            if self.is_character_cue(line) {
                open.pending_speaker = Some(line.to_string());
            } else if let Some(speaker) = open.pending_speaker.take() {
                open.dialogue.push(DialogueLine::new(speaker, line));
            } else {
                open.push_description(line);
            }
        }

        if let Some(open) = current {
            scenes.push(self.finalize(scenes.len(), open));
        }

        scenes
    }

    /// Whether a line reads as a character cue.
    ///
    /// Needs at least one letter, no lowercase letters, and at most
    /// `max_cue_words` words.
    pub fn is_character_cue(&self, line: &str) -> bool {
        let has_cased = line.chars().any(|c| c.is_uppercase() || c.is_lowercase());
        let all_upper = !line.chars().any(char::is_lowercase);
        has_cased && all_upper && line.split_whitespace().count() <= self.config.max_cue_words
    }

    /// Estimate a scene duration from its dialogue and description.
    pub fn estimate_duration(&self, dialogue_lines: usize, description_words: usize) -> f64 {
        let estimate = dialogue_lines as f64 * self.config.seconds_per_dialogue_line
            + description_words as f64 * self.config.seconds_per_description_word;
        estimate.max(self.config.min_scene_seconds)
    }

    fn finalize(&self, index: usize, open: OpenScene) -> Scene {
        let description = open.description.trim().to_string();
        let estimated_duration_seconds = self.estimate_duration(
            open.dialogue.len(),
            description.split_whitespace().count(),
        );

        let mut scene = Scene {
            index,
            location: open.heading.location(),
            time_of_day: open.heading.time_of_day,
            description,
            dialogue: open.dialogue,
            estimated_duration_seconds,
            generation_prompt: String::new(),
        };
        scene.generation_prompt = prompt::synthesize(&scene);
        scene
    }
}
