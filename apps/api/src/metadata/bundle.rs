//! The validated metadata bundle and the single gate that builds one.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::metadata::bilingual;
use crate::metadata::parser::ParsedObject;
use crate::metadata::schema::SchemaDefinition;
use crate::metadata::validator::{self, ValidationReport};

/// Structured YouTube metadata for one video.
///
/// Built only by [`accept`], from an object whose validation report is empty.
/// Bilingual fields are both non-empty for a non-English source and both `None` for an
/// English one; enum fields carry the canonical vocabulary spelling.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetadataBundle {
    pub language_detected: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title_english: Option<String>,
    pub short_description: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description_english: Option<String>,
    pub tags: Vec<String>,
    pub hashtags: Vec<String>,
    pub category: String,
    pub target_audience: String,
    pub video_intent: String,
    pub thumbnail_text: Vec<String>,
}

/// Validates `obj` (schema, then bilingual policy) and builds the bundle if nothing is wrong.
pub fn accept(
    obj: &ParsedObject,
    schema: &SchemaDefinition,
) -> Result<MetadataBundle, ValidationReport> {
    let report = bilingual::enforce(obj, validator::validate(obj, schema));
    if !report.is_empty() {
        return Err(report);
    }

    let raw: MetadataBundle = serde_json::from_value(Value::Object(obj.clone()))
        .map_err(|e| ValidationReport::malformed(e.to_string()))?;

    let category = schema
        .canonical_category(&raw.category)
        .map(str::to_string)
        .unwrap_or_else(|| raw.category.clone());
    let video_intent = schema
        .canonical_intent(&raw.video_intent)
        .map(str::to_string)
        .unwrap_or_else(|| raw.video_intent.clone());

    // The English pair only restates title/description for an English source.
    let (title_english, description_english) = if bilingual::is_english(&raw.language_detected) {
        (None, None)
    } else {
        (non_blank(raw.title_english), non_blank(raw.description_english))
    };

    Ok(MetadataBundle {
        category,
        video_intent,
        title_english,
        description_english,
        ..raw
    })
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.trim().is_empty())
}
