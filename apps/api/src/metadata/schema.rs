//! Schema definition — the output shape, field limits, and closed vocabularies.
//!
//! The vocabularies are configuration: `Config` may replace them at startup. Everything
//! else here is a fixed YouTube or product limit.

use std::ops::RangeInclusive;

/// YouTube's standard upload categories.
pub const DEFAULT_CATEGORIES: &[&str] = &[
    "Film & Animation",
    "Autos & Vehicles",
    "Music",
    "Pets & Animals",
    "Sports",
    "Travel & Events",
    "Gaming",
    "People & Blogs",
    "Comedy",
    "Entertainment",
    "News & Politics",
    "Howto & Style",
    "Education",
    "Science & Technology",
    "Nonprofits & Activism",
];

pub const DEFAULT_INTENTS: &[&str] = &[
    "educational",
    "entertainment",
    "informational",
    "promotional",
    "devotional",
    "vlog",
    "other",
];

// ────────────────────────────────────────────────────────────────────────────
// Field names (stable JSON keys)
// ────────────────────────────────────────────────────────────────────────────

pub const LANGUAGE_DETECTED: &str = "language_detected";
pub const TITLE: &str = "title";
pub const TITLE_ENGLISH: &str = "title_english";
pub const SHORT_DESCRIPTION: &str = "short_description";
pub const DESCRIPTION: &str = "description";
pub const DESCRIPTION_ENGLISH: &str = "description_english";
pub const TAGS: &str = "tags";
pub const HASHTAGS: &str = "hashtags";
pub const CATEGORY: &str = "category";
pub const TARGET_AUDIENCE: &str = "target_audience";
pub const VIDEO_INTENT: &str = "video_intent";
pub const THUMBNAIL_TEXT: &str = "thumbnail_text";

/// Pseudo-field used when the response as a whole is unusable (not JSON, backend error, timeout).
pub const RESPONSE: &str = "response";

/// Output constraints checked by the validator and listed in the prompt.
#[derive(Debug, Clone)]
pub struct SchemaDefinition {
    pub title_max_chars: usize,
    pub short_description_max_sentences: usize,
    pub description_max_chars: usize,
    pub tags_max_total_chars: usize,
    pub hashtag_count: RangeInclusive<usize>,
    pub thumbnail_count: RangeInclusive<usize>,
    pub thumbnail_max_chars: usize,
    pub categories: Vec<String>,
    pub intents: Vec<String>,
}

impl Default for SchemaDefinition {
    fn default() -> Self {
        Self {
            title_max_chars: 60,
            short_description_max_sentences: 2,
            description_max_chars: 5000,
            tags_max_total_chars: 500,
            hashtag_count: 8..=15,
            thumbnail_count: 2..=5,
            thumbnail_max_chars: 40,
            categories: DEFAULT_CATEGORIES.iter().map(|s| s.to_string()).collect(),
            intents: DEFAULT_INTENTS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl SchemaDefinition {
    /// Replaces the closed vocabularies, keeping every other limit at its default.
    pub fn with_vocabularies(categories: Vec<String>, intents: Vec<String>) -> Self {
        Self {
            categories,
            intents,
            ..Self::default()
        }
    }

    /// Canonical spelling of `value` in the category vocabulary (case-insensitive match).
    pub fn canonical_category(&self, value: &str) -> Option<&str> {
        lookup(&self.categories, value)
    }

    /// Canonical spelling of `value` in the intent vocabulary (case-insensitive match).
    pub fn canonical_intent(&self, value: &str) -> Option<&str> {
        lookup(&self.intents, value)
    }
}

fn lookup<'a>(vocabulary: &'a [String], value: &str) -> Option<&'a str> {
    let value = value.trim();
    vocabulary
        .iter()
        .find(|v| v.eq_ignore_ascii_case(value))
        .map(String::as_str)
}
