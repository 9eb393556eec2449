//! Bilingual policy — English fallbacks for non-English sources, plus title clickbait rules.
//!
//! Runs after the schema validator and only appends to its report.

use serde_json::Value;

use crate::metadata::parser::ParsedObject;
use crate::metadata::schema;
use crate::metadata::validator::{ValidationReport, ViolationKind};

/// Minimum cased letters before an all-uppercase title counts as shouting.
const MIN_CASED_FOR_CAPS_CHECK: usize = 4;

/// True when `language` names English: "English", "english (US)", "en", "eng", "en-GB", "en_IN".
pub fn is_english(language: &str) -> bool {
    let lang = language.trim().to_lowercase();
    lang == "en"
        || lang == "eng"
        || lang.starts_with("english")
        || lang.starts_with("en-")
        || lang.starts_with("en_")
}

/// Appends bilingual and clickbait violations for `obj` to `report`.
pub fn enforce(obj: &ParsedObject, mut report: ValidationReport) -> ValidationReport {
    for field in [schema::TITLE, schema::TITLE_ENGLISH] {
        if let Some(reason) = text_of(obj, field).and_then(clickbait_reason) {
            report.push(field, ViolationKind::Clickbait { reason });
        }
    }

    // An invalid language is already reported by the validator; the bilingual rule needs it.
    let Some(language) = text_of(obj, schema::LANGUAGE_DETECTED).filter(|l| !l.trim().is_empty())
    else {
        return report;
    };

    let title_en = present(obj, schema::TITLE_ENGLISH);
    let description_en = present(obj, schema::DESCRIPTION_ENGLISH);

    if !is_english(language) {
        for (field, ok) in [
            (schema::TITLE_ENGLISH, title_en),
            (schema::DESCRIPTION_ENGLISH, description_en),
        ] {
            if !ok {
                report.push(
                    field,
                    ViolationKind::BilingualRequired {
                        language: language.trim().to_string(),
                    },
                );
            }
        }
    } else if title_en != description_en {
        let missing = if title_en {
            schema::DESCRIPTION_ENGLISH
        } else {
            schema::TITLE_ENGLISH
        };
        report.push(missing, ViolationKind::BilingualIncomplete);
    }

    report
}

fn text_of<'a>(obj: &'a ParsedObject, field: &str) -> Option<&'a str> {
    obj.get(field).and_then(Value::as_str)
}

/// A bilingual field counts as present when it is a non-blank string.
fn present(obj: &ParsedObject, field: &str) -> bool {
    text_of(obj, field).is_some_and(|s| !s.trim().is_empty())
}

fn clickbait_reason(title: &str) -> Option<&'static str> {
    let mut previous_shout = false;
    for c in title.chars() {
        let shout = matches!(c, '!' | '?' | '！' | '？');
        if shout && previous_shout {
            return Some("repeated '!' or '?' punctuation");
        }
        previous_shout = shout;
    }

    let cased: Vec<char> = title
        .chars()
        .filter(|c| c.is_uppercase() || c.is_lowercase())
        .collect();
    if cased.len() >= MIN_CASED_FOR_CAPS_CHECK && cased.iter().all(|c| c.is_uppercase()) {
        return Some("title is written in all capital letters");
    }

    None
}
