//! Prompt templates for variation generation
//!
//! Templates are deterministic: parameterized only by the source content and
//! the angle-specific instruction block. The humanization rules and banned
//! phrase list apply to every task.

use crate::models::{Angle, Platform};

/// System prompt shared by every generation task
pub const SYSTEM_PROMPT: &str = "You are an expert ghostwriter and content creator specializing in professional tech thought leadership.";

/// Sampling temperature for every generation task
pub const TEMPERATURE: f32 = 0.8;

/// Completion budget for short-form tasks
pub const SHORT_FORM_MAX_TOKENS: u32 = 300;

/// Completion budget for long-form tasks
pub const LONG_FORM_MAX_TOKENS: u32 = 1500;

/// Editor rules appended to every prompt to strip AI-isms
const HUMANIZATION_RULES: &str = "Humanization rules:\n\
You are a strict editor removing AI-isms. Rewrite the text to be natural, neutral, and human. Strict Constraints:\n\
BANNED WORDS: 'delve', 'tapestry', 'testament', 'underscores', 'pivotal', 'landscape', 'nuanced', 'multifaceted'.\n\
STRUCTURE: Avoid 'Not only... but also'. No lists of 3 unless necessary.\n\
TONE: Remove puffery/exaggeration. If mundane, keep it mundane. No 'In conclusion'.\n\
HEADERS: Use Sentence case, NOT Title Case.";

/// One generation task: a fixed (platform, angle) pair
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GenerationTask {
    pub platform: Platform,
    pub angle: Angle,
}

impl GenerationTask {
    /// Completion budget for this task
    pub fn max_tokens(&self) -> u32 {
        if self.platform.is_short_form() {
            SHORT_FORM_MAX_TOKENS
        } else {
            LONG_FORM_MAX_TOKENS
        }
    }

    /// Build the user prompt for this task
    pub fn build_prompt(&self, source_content: &str) -> String {
        format!(
            "You are a ghostwriter for a tech thought leader. {}\n\n{}\n\nSource:\n{}",
            self.instructions(),
            HUMANIZATION_RULES,
            source_content
        )
    }

    /// Angle- and platform-specific instruction block
    fn instructions(&self) -> &'static str {
        match (self.platform, self.angle) {
            (Platform::Twitter, _) => {
                "Create a punchy, engaging tweet (max 140 characters) based on this source material. \
                 Include 1-2 relevant hashtags. Avoid markdown. Use very few emojis (0-2 max). \
                 Write ONLY the tweet, no explanations."
            }
            (_, Angle::Narrative) => {
                "Write a narrative-driven LinkedIn post with a human voice. Focus on storytelling, \
                 personal insights, and a clear takeaway. Use very few emojis (0-3 max). Avoid markdown \
                 and avoid bullet lists. Make the opening line distinct from other variations. \
                 Target: 800-1200 characters. Write ONLY the post content, no explanations."
            }
            (_, Angle::Educational) => {
                "Write an educational LinkedIn post that teaches key concepts with clear, simple \
                 structure. Use short paragraphs, no markdown, and no bullet lists. Use very few emojis \
                 (0-3 max). Make the structure and tone clearly different from the other variations. \
                 Target: 800-1200 characters. Write ONLY the post content, no explanations."
            }
            (_, Angle::Question) => {
                "Write a thought-provoking LinkedIn post that opens with a strong question or \
                 challenges a common assumption. Encourage discussion with a natural, conversational \
                 voice. Use very few emojis (0-3 max). Avoid markdown and avoid bullet lists. Make this \
                 feel clearly distinct from the other variations. Target: 800-1200 characters. Write \
                 ONLY the post content, no explanations."
            }
            (_, Angle::Practical) => {
                "Write a practical, actionable LinkedIn post with concrete steps readers can apply. \
                 Use short paragraphs with line breaks only (no bullets, no markdown). Use very few \
                 emojis (0-3 max). Ensure this feels different in tone and structure from the other \
                 variations. Target: 800-1200 characters. Write ONLY the post content, no explanations."
            }
            (_, Angle::Story) => {
                "Write a LinkedIn post built around one concrete story from the source: a moment, a \
                 mistake, a turnaround. Keep it specific and personal, no abstractions. Use very few \
                 emojis (0-3 max). Avoid markdown and avoid bullet lists. Target: 800-1200 characters. \
                 Write ONLY the post content, no explanations."
            }
        }
    }
}

/// The fixed task list: four LinkedIn angles plus one tweet
///
/// Order is deterministic and matches the order variations appear in the
/// assembled aggregate.
pub fn generation_tasks() -> Vec<GenerationTask> {
    vec![
        GenerationTask {
            platform: Platform::Linkedin,
            angle: Angle::Narrative,
        },
        GenerationTask {
            platform: Platform::Linkedin,
            angle: Angle::Educational,
        },
        GenerationTask {
            platform: Platform::Linkedin,
            angle: Angle::Question,
        },
        GenerationTask {
            platform: Platform::Linkedin,
            angle: Angle::Practical,
        },
        GenerationTask {
            platform: Platform::Twitter,
            angle: Angle::Narrative,
        },
    ]
}
