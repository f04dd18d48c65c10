/*!
 * Core document model types for parsed screenplays.
 *
 * These types are plain JSON-serializable records shared between the
 * segmenter that produces them and the generation pipeline that consumes them.
 */

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A single line of dialogue attributed to a character.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DialogueLine {
    /// Character cue as written in the script
    pub character: String,

    /// Spoken line
    pub line: String,
}

impl DialogueLine {
    /// Create a new dialogue line.
    pub fn new(character: impl Into<String>, line: impl Into<String>) -> Self {
        Self {
            character: character.into(),
            line: line.into(),
        }
    }
}

/// A scene extracted from a screenplay.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scene {
    /// Zero-based position in document order
    pub index: usize,

    /// Location from the heading, including the INT./EXT. marker
    pub location: String,

    /// Time of day token from the heading, case preserved
    pub time_of_day: String,

    /// Action lines joined with single spaces
    #[serde(default)]
    pub description: String,

    /// Dialogue in script order
    #[serde(default)]
    pub dialogue: Vec<DialogueLine>,

    /// Estimated on-screen duration, never below the floor
    pub estimated_duration_seconds: f64,

    /// Text-to-video prompt synthesized from the other fields
    pub generation_prompt: String,
}

impl Scene {
    /// Whether the heading marks an interior location.
    pub fn is_interior(&self) -> bool {
        self.location.trim().to_ascii_uppercase().starts_with("INT")
    }

    /// Location without the INT./EXT. marker.
    pub fn place(&self) -> &str {
        let location = self.location.trim();
        match location.split_once('.') {
            Some((marker, rest))
                if marker.eq_ignore_ascii_case("INT") || marker.eq_ignore_ascii_case("EXT") =>
            {
                rest.trim()
            }
            _ => location,
        }
    }

    /// Number of words in the description.
    pub fn description_word_count(&self) -> usize {
        self.description.split_whitespace().count()
    }

    /// Distinct speaking characters in order of first appearance.
    pub fn characters(&self) -> Vec<&str> {
        let mut seen: Vec<&str> = Vec::new();
        for entry in &self.dialogue {
            if !seen.contains(&entry.character.as_str()) {
                seen.push(entry.character.as_str());
            }
        }
        seen
    }
}

/// A parsed screenplay.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScriptDocument {
    /// Identifier assigned once the document is stored or generated
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// Script title
    pub title: String,

    /// Script author
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,

    /// Raw script text
    pub content: String,

    /// Scenes in document order
    #[serde(default)]
    pub scenes: Vec<Scene>,

    /// Sum of scene durations, absent when there are no scenes
    pub total_duration: Option<f64>,
}

impl ScriptDocument {
    /// Assign a fresh `script_<hex>` identifier.
    pub fn with_generated_id(mut self) -> Self {
        let hex = Uuid::new_v4().simple().to_string();
        self.id = Some(format!("script_{}", &hex[..12]));
        self
    }

    /// Number of scenes.
    pub fn scene_count(&self) -> usize {
        self.scenes.len()
    }

    /// Whether no scene heading was found.
    pub fn is_empty(&self) -> bool {
        self.scenes.is_empty()
    }

    /// Get a scene by index.
    pub fn scene(&self, index: usize) -> Option<&Scene> {
        self.scenes.get(index)
    }
}
