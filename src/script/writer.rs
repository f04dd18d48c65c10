/*!
 * Screenplay generation through a language model oracle.
 *
 * When the oracle fails or returns nothing, a bundled example script is used
 * instead and the caller is told so through `ScriptDraft::Fallback`.
 */

use log::{info, warn};

use crate::providers::{ScriptOracle, ScriptPreferences};

/// System prompt for the screenwriting model.
pub const SCREENWRITER_SYSTEM_PROMPT: &str = "You are a professional screenwriter. Generate short film scripts in proper screenplay format with scene headings (INT./EXT.), action lines, and dialogue. CRITICAL REQUIREMENT: Always create scripts with AT LEAST 3-5 DISTINCT SCENES with different locations or time periods. Each scene must have its own scene heading. Never create single-scene scripts. Keep it concise and cinematic.";

const SCREENPLAY_REQUIREMENTS: &str = r#"

=== CRITICAL REQUIREMENTS ===
1. Create a script with AT LEAST 3-5 DISTINCT SCENES
2. Each scene MUST have a different location and/or time period
3. Each scene MUST start with a scene heading (INT./EXT. LOCATION - TIME)
4. Tell a complete story arc across multiple scenes

Example structure:
- Scene 1: Opening/Setup (establish characters and situation)
- Scene 2: Development/Conflict (story progresses, time/location changes)
- Scene 3: Climax/Resolution (conclusion in different setting)
- Additional scenes as needed for the story

Format the script in proper screenplay format with:
- Scene headings (INT./EXT. LOCATION - TIME OF DAY)
- Action lines
- Character names in ALL CAPS before dialogue
- Dialogue beneath character names

Ensure the script tells a complete story with clear progression across multiple distinct scenes and locations. Keep it concise, cinematic, and appropriate for the target duration."#;

/// Used when the oracle is unavailable.
pub const FALLBACK_SCRIPT: &str = r#"INT. COFFEE SHOP - DAY

A young woman, SARAH, sits at a corner table, typing on her laptop.

SARAH
(to herself)
This deadline is impossible.

JOHN enters and waves.

JOHN
Hey! Mind if I join you?

SARAH
Of course not! How have you been?

They sit and talk about their shared project.

EXT. PARK - EVENING

The two walk through a scenic park at sunset, the sky painted orange and pink.

JOHN
I've been thinking about that idea we discussed.

SARAH
Really? I thought you'd moved on from it.

JOHN
Never. Some ideas are worth pursuing.

Sarah smiles, inspired by his determination.

INT. SARAH'S APARTMENT - NIGHT

Sarah sits at her desk, working late. She looks at a photo of her and John from the park. Motivated, she types furiously, bringing their idea to life.

FADE OUT."#;

/// Accepted range for the duration hint, in seconds.
pub const DURATION_RANGE: std::ops::RangeInclusive<u32> = 30..=600;

/// Author recorded on generated documents.
pub const GENERATED_AUTHOR: &str = "AI Generated";

/// Outcome of a generation request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScriptDraft {
    /// Text written by the oracle
    Generated(String),
    /// Bundled example script, with the reason the oracle was not used
    Fallback { text: String, reason: String },
}

impl ScriptDraft {
    /// Screenplay text regardless of origin.
    pub fn text(&self) -> &str {
        match self {
            Self::Generated(text) => text,
            Self::Fallback { text, .. } => text,
        }
    }

    /// Whether the fallback script was used.
    pub fn is_fallback(&self) -> bool {
        matches!(self, Self::Fallback { .. })
    }
}

/// Build the user message sent to the screenwriting model.
pub fn build_user_prompt(idea: &str, preferences: &ScriptPreferences) -> String {
    let mut prompt = format!("Write a short film script based on this idea: {}", idea.trim());
    if let Some(genre) = preferences.genre.as_deref().filter(|g| !g.trim().is_empty()) {
        prompt.push_str(&format!("\nGenre: {}", genre.trim()));
    }
    if let Some(tone) = preferences.tone.as_deref().filter(|t| !t.trim().is_empty()) {
        prompt.push_str(&format!("\nTone: {}", tone.trim()));
    }
    if let Some(duration) = preferences.duration_seconds {
        let duration = duration.clamp(*DURATION_RANGE.start(), *DURATION_RANGE.end());
        prompt.push_str(&format!("\nTarget duration: approximately {} seconds", duration));
    }
    prompt.push_str(SCREENPLAY_REQUIREMENTS);
    prompt
}

/// Title from the first five words of the idea, with `...` if cut.
pub fn derive_title(idea: &str) -> String {
    let words: Vec<&str> = idea.split_whitespace().collect();
    if words.is_empty() {
        return "Untitled".to_string();
    }

    let mut title = words.iter().take(5).copied().collect::<Vec<_>>().join(" ");
    if words.len() > 5 {
        title.push_str("...");
    }
    title
}

/// Writes screenplays through an injected oracle.
#[derive(Debug)]
pub struct ScriptWriter<O: ScriptOracle> {
    oracle: O,
}

impl<O: ScriptOracle> ScriptWriter<O> {
    /// Create a writer around an oracle.
    pub fn new(oracle: O) -> Self {
        Self { oracle }
    }

    /// Generate a screenplay, falling back to the bundled script on failure.
    pub async fn write(&self, idea: &str, preferences: &ScriptPreferences) -> ScriptDraft {
        info!("Requesting screenplay for idea: {}", derive_title(idea));

        match self.oracle.generate(idea, preferences).await {
            Ok(text) if !text.trim().is_empty() => ScriptDraft::Generated(text),
            Ok(_) => {
                warn!("Script oracle returned an empty screenplay, using fallback script");
                ScriptDraft::Fallback {
                    text: FALLBACK_SCRIPT.to_string(),
                    reason: "empty response".to_string(),
                }
            }
            Err(e) => {
                warn!("Script oracle failed ({}), using fallback script", e);
                ScriptDraft::Fallback {
                    text: FALLBACK_SCRIPT.to_string(),
                    reason: e.to_string(),
                }
            }
        }
    }
}
