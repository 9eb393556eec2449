//! Schema validator — checks a parsed object against `SchemaDefinition`.
//!
//! Validation is a rule list: one `FieldRule` per output field, each yielding zero or more
//! violations. Every rule runs on every call, so a report lists everything wrong at once.
//! Adding a field means adding a rule, not restructuring control flow.

use std::fmt;

use serde::Serialize;
use serde_json::Value;

use crate::metadata::parser::ParsedObject;
use crate::metadata::schema::{self, SchemaDefinition};

// ────────────────────────────────────────────────────────────────────────────
// Report types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ViolationKind {
    Missing,
    WrongType { expected: &'static str },
    Empty,
    TooLong { max: usize, actual: usize },
    CountOutOfRange { min: usize, max: usize, actual: usize },
    NotInVocabulary { value: String },
    ContainsEmoji,
    TooManySentences { max: usize, actual: usize },
    InvalidItem { index: usize, reason: String },
    BilingualRequired { language: String },
    BilingualIncomplete,
    Clickbait { reason: &'static str },
    Malformed { reason: String },
    NoResponse { reason: String },
}

impl ViolationKind {
    /// True for violations raised by the bilingual / content policy rather than the schema.
    pub fn is_policy(&self) -> bool {
        matches!(
            self,
            ViolationKind::BilingualRequired { .. }
                | ViolationKind::BilingualIncomplete
                | ViolationKind::Clickbait { .. }
        )
    }
}

impl fmt::Display for ViolationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ViolationKind::Missing => write!(f, "is required but missing"),
            ViolationKind::WrongType { expected } => write!(f, "must be {expected}"),
            ViolationKind::Empty => write!(f, "must not be empty"),
            ViolationKind::TooLong { max, actual } => {
                write!(f, "is {actual} characters long, maximum is {max}")
            }
            ViolationKind::CountOutOfRange { min, max, actual } => {
                write!(f, "has {actual} entries, expected between {min} and {max}")
            }
            ViolationKind::NotInVocabulary { value } => write!(
                f,
                "\"{value}\" is not one of the allowed values listed in the instructions"
            ),
            ViolationKind::ContainsEmoji => write!(f, "must not contain emoji"),
            ViolationKind::TooManySentences { max, actual } => {
                write!(f, "has {actual} sentences, maximum is {max}")
            }
            ViolationKind::InvalidItem { index, reason } => write!(f, "item [{index}] {reason}"),
            ViolationKind::BilingualRequired { language } => write!(
                f,
                "must be a non-empty English version because the detected language is {language}"
            ),
            ViolationKind::BilingualIncomplete => write!(
                f,
                "is missing while its English counterpart is present; provide both \
                 title_english and description_english or neither"
            ),
            ViolationKind::Clickbait { reason } => write!(f, "looks like clickbait: {reason}"),
            ViolationKind::Malformed { reason } => {
                write!(f, "was not a usable JSON object: {reason}")
            }
            ViolationKind::NoResponse { reason } => {
                write!(f, "no response from the generation backend: {reason}")
            }
        }
    }
}

/// A single field-level failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Violation {
    pub field: String,
    #[serde(flatten)]
    pub kind: ViolationKind,
    pub reason: String,
}

impl Violation {
    pub fn new(field: &str, kind: ViolationKind) -> Self {
        let reason = kind.to_string();
        Self {
            field: field.to_string(),
            kind,
            reason,
        }
    }
}

/// Ordered set of violations for one attempt. Empty means the object is acceptable.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationReport {
    violations: Vec<Violation>,
}

impl ValidationReport {
    pub fn push(&mut self, field: &str, kind: ViolationKind) {
        self.violations.push(Violation::new(field, kind));
    }

    pub fn is_empty(&self) -> bool {
        self.violations.is_empty()
    }

    pub fn len(&self) -> usize {
        self.violations.len()
    }

    pub fn violations(&self) -> &[Violation] {
        &self.violations
    }

    pub fn has_field(&self, field: &str) -> bool {
        self.violations.iter().any(|v| v.field == field)
    }

    /// True when every violation comes from the bilingual / content policy.
    pub fn is_policy_only(&self) -> bool {
        !self.is_empty() && self.violations.iter().all(|v| v.kind.is_policy())
    }

    /// One-entry report describing an unusable response as a whole.
    pub fn malformed(reason: impl Into<String>) -> Self {
        let mut report = Self::default();
        report.push(
            schema::RESPONSE,
            ViolationKind::Malformed {
                reason: reason.into(),
            },
        );
        report
    }

    /// One-entry report for an attempt where the backend produced nothing to validate.
    pub fn no_response(reason: impl Into<String>) -> Self {
        let mut report = Self::default();
        report.push(
            schema::RESPONSE,
            ViolationKind::NoResponse {
                reason: reason.into(),
            },
        );
        report
    }
}

impl fmt::Display for ValidationReport {
    /// One `- field: reason` line per violation.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, v) in self.violations.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "- {}: {}", v.field, v.reason)?;
        }
        Ok(())
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Rule list
// ────────────────────────────────────────────────────────────────────────────

type Check = fn(&Value, &SchemaDefinition) -> Vec<ViolationKind>;

struct FieldRule {
    field: &'static str,
    required: bool,
    check: Check,
}

#[rustfmt::skip]
const RULES: &[FieldRule] = &[
    FieldRule { field: schema::LANGUAGE_DETECTED, required: true, check: check_non_empty_text },
    FieldRule { field: schema::TITLE, required: true, check: check_title },
    FieldRule { field: schema::TITLE_ENGLISH, required: false, check: check_optional_title },
    FieldRule { field: schema::SHORT_DESCRIPTION, required: true, check: check_short_description },
    FieldRule { field: schema::DESCRIPTION, required: true, check: check_description },
    FieldRule { field: schema::DESCRIPTION_ENGLISH, required: false, check: check_optional_description },
    FieldRule { field: schema::TAGS, required: true, check: check_tags },
    FieldRule { field: schema::HASHTAGS, required: true, check: check_hashtags },
    FieldRule { field: schema::CATEGORY, required: true, check: check_category },
    FieldRule { field: schema::TARGET_AUDIENCE, required: true, check: check_non_empty_text },
    FieldRule { field: schema::VIDEO_INTENT, required: true, check: check_intent },
    FieldRule { field: schema::THUMBNAIL_TEXT, required: true, check: check_thumbnail_text },
];

/// Runs every field rule against `obj`. Pure; never short-circuits.
pub fn validate(obj: &ParsedObject, schema: &SchemaDefinition) -> ValidationReport {
    let mut report = ValidationReport::default();

    for rule in RULES {
        match obj.get(rule.field) {
            None | Some(Value::Null) => {
                if rule.required {
                    report.push(rule.field, ViolationKind::Missing);
                }
            }
            Some(value) => {
                for kind in (rule.check)(value, schema) {
                    report.push(rule.field, kind);
                }
            }
        }
    }

    report
}

// ────────────────────────────────────────────────────────────────────────────
// Field checks
// ────────────────────────────────────────────────────────────────────────────

const STRING: &str = "a string";
const ARRAY_OF_STRINGS: &str = "an array of strings";

fn check_non_empty_text(value: &Value, _schema: &SchemaDefinition) -> Vec<ViolationKind> {
    match value.as_str() {
        None => vec![ViolationKind::WrongType { expected: STRING }],
        Some(s) if s.trim().is_empty() => vec![ViolationKind::Empty],
        Some(_) => vec![],
    }
}

fn check_title(value: &Value, schema: &SchemaDefinition) -> Vec<ViolationKind> {
    match value.as_str() {
        None => vec![ViolationKind::WrongType { expected: STRING }],
        Some(s) if s.trim().is_empty() => vec![ViolationKind::Empty],
        Some(s) => title_rules(s, schema),
    }
}

/// `title_english` may be empty (absence is judged by the bilingual policy).
fn check_optional_title(value: &Value, schema: &SchemaDefinition) -> Vec<ViolationKind> {
    match value.as_str() {
        None => vec![ViolationKind::WrongType { expected: STRING }],
        Some(s) if s.trim().is_empty() => vec![],
        Some(s) => title_rules(s, schema),
    }
}

fn title_rules(title: &str, schema: &SchemaDefinition) -> Vec<ViolationKind> {
    let mut kinds = Vec::new();
    let len = title.chars().count();
    if len > schema.title_max_chars {
        kinds.push(ViolationKind::TooLong {
            max: schema.title_max_chars,
            actual: len,
        });
    }
    if title.chars().any(is_emoji) {
        kinds.push(ViolationKind::ContainsEmoji);
    }
    kinds
}

fn check_short_description(value: &Value, schema: &SchemaDefinition) -> Vec<ViolationKind> {
    match value.as_str() {
        None => vec![ViolationKind::WrongType { expected: STRING }],
        Some(s) if s.trim().is_empty() => vec![ViolationKind::Empty],
        Some(s) => {
            let sentences = sentence_count(s);
            if sentences > schema.short_description_max_sentences {
                vec![ViolationKind::TooManySentences {
                    max: schema.short_description_max_sentences,
                    actual: sentences,
                }]
            } else {
                vec![]
            }
        }
    }
}

fn check_description(value: &Value, schema: &SchemaDefinition) -> Vec<ViolationKind> {
    match value.as_str() {
        None => vec![ViolationKind::WrongType { expected: STRING }],
        Some(s) if s.trim().is_empty() => vec![ViolationKind::Empty],
        Some(s) => description_rules(s, schema),
    }
}

fn check_optional_description(value: &Value, schema: &SchemaDefinition) -> Vec<ViolationKind> {
    match value.as_str() {
        None => vec![ViolationKind::WrongType { expected: STRING }],
        Some(s) => description_rules(s, schema),
    }
}

fn description_rules(description: &str, schema: &SchemaDefinition) -> Vec<ViolationKind> {
    let len = description.chars().count();
    if len > schema.description_max_chars {
        vec![ViolationKind::TooLong {
            max: schema.description_max_chars,
            actual: len,
        }]
    } else {
        vec![]
    }
}

fn check_tags(value: &Value, schema: &SchemaDefinition) -> Vec<ViolationKind> {
    let Some(items) = value.as_array() else {
        return vec![ViolationKind::WrongType {
            expected: ARRAY_OF_STRINGS,
        }];
    };
    if items.is_empty() {
        return vec![ViolationKind::Empty];
    }

    let mut kinds = item_kinds(items, |_| None);
    let total: usize = items
        .iter()
        .filter_map(Value::as_str)
        .map(|t| t.chars().count())
        .sum();
    if total > schema.tags_max_total_chars {
        kinds.push(ViolationKind::TooLong {
            max: schema.tags_max_total_chars,
            actual: total,
        });
    }
    kinds
}

fn check_hashtags(value: &Value, schema: &SchemaDefinition) -> Vec<ViolationKind> {
    let Some(items) = value.as_array() else {
        return vec![ViolationKind::WrongType {
            expected: ARRAY_OF_STRINGS,
        }];
    };

    let mut kinds = Vec::new();
    if !schema.hashtag_count.contains(&items.len()) {
        kinds.push(ViolationKind::CountOutOfRange {
            min: *schema.hashtag_count.start(),
            max: *schema.hashtag_count.end(),
            actual: items.len(),
        });
    }
    kinds.extend(item_kinds(items, |tag| {
        if !tag.starts_with('#') {
            Some("must start with '#'".to_string())
        } else if tag.chars().count() < 2 {
            Some("must have text after '#'".to_string())
        } else if tag.chars().any(char::is_whitespace) {
            Some("must not contain whitespace".to_string())
        } else {
            None
        }
    }));
    kinds
}

fn check_category(value: &Value, schema: &SchemaDefinition) -> Vec<ViolationKind> {
    match value.as_str() {
        None => vec![ViolationKind::WrongType { expected: STRING }],
        Some(s) if schema.canonical_category(s).is_none() => {
            vec![ViolationKind::NotInVocabulary {
                value: s.to_string(),
            }]
        }
        Some(_) => vec![],
    }
}

fn check_intent(value: &Value, schema: &SchemaDefinition) -> Vec<ViolationKind> {
    match value.as_str() {
        None => vec![ViolationKind::WrongType { expected: STRING }],
        Some(s) if schema.canonical_intent(s).is_none() => {
            vec![ViolationKind::NotInVocabulary {
                value: s.to_string(),
            }]
        }
        Some(_) => vec![],
    }
}

fn check_thumbnail_text(value: &Value, schema: &SchemaDefinition) -> Vec<ViolationKind> {
    let Some(items) = value.as_array() else {
        return vec![ViolationKind::WrongType {
            expected: ARRAY_OF_STRINGS,
        }];
    };

    let mut kinds = Vec::new();
    if !schema.thumbnail_count.contains(&items.len()) {
        kinds.push(ViolationKind::CountOutOfRange {
            min: *schema.thumbnail_count.start(),
            max: *schema.thumbnail_count.end(),
            actual: items.len(),
        });
    }
    let max = schema.thumbnail_max_chars;
    kinds.extend(item_kinds(items, |text| {
        let len = text.chars().count();
        (len > max).then(|| format!("is {len} characters long, maximum is {max}"))
    }));
    kinds
}

/// Per-item checks shared by the array fields: every item must be a non-blank string,
/// then `extra` may reject it with a reason.
fn item_kinds(items: &[Value], extra: impl Fn(&str) -> Option<String>) -> Vec<ViolationKind> {
    items
        .iter()
        .enumerate()
        .filter_map(|(index, item)| {
            let reason = match item.as_str() {
                None => Some("must be a string".to_string()),
                Some(s) if s.trim().is_empty() => Some("must not be empty".to_string()),
                Some(s) => extra(s),
            };
            reason.map(|reason| ViolationKind::InvalidItem { index, reason })
        })
        .collect()
}

// ────────────────────────────────────────────────────────────────────────────
// Text helpers
// ────────────────────────────────────────────────────────────────────────────

/// Codepoints used for emoji: pictograph blocks, dingbats, regional indicators,
/// keycap and presentation modifiers, and emoji tag sequences.
pub fn is_emoji(c: char) -> bool {
    matches!(
        c as u32,
        0x1F000..=0x1FAFF
            | 0x2600..=0x27BF
            | 0x231A..=0x231B
            | 0x2328
            | 0x23CF
            | 0x23E9..=0x23F3
            | 0x23F8..=0x23FA
            | 0x24C2
            | 0x25AA..=0x25AB
            | 0x25B6
            | 0x25C0
            | 0x25FB..=0x25FE
            | 0x2934..=0x2935
            | 0x2B05..=0x2B07
            | 0x2B1B..=0x2B1C
            | 0x2B50
            | 0x2B55
            | 0x3030
            | 0x303D
            | 0x3297
            | 0x3299
            | 0x20E3
            | 0xFE0F
            | 0xE0020..=0xE007F
    )
}

fn is_terminator(c: char) -> bool {
    matches!(c, '.' | '!' | '?' | '।' | '॥') || is_fullwidth_terminator(c)
}

fn is_fullwidth_terminator(c: char) -> bool {
    matches!(c, '。' | '！' | '？')
}

/// Words that end in `.` without ending a sentence.
const ABBREVIATIONS: &[&str] = &[
    "dr", "mr", "mrs", "ms", "st", "vs", "jr", "sr", "prof", "e.g", "i.e",
];

/// A single-letter initial or a known abbreviation.
fn is_abbreviation(word: &str) -> bool {
    let mut chars = word.chars();
    let initial = matches!((chars.next(), chars.next()), (Some(c), None) if c.is_alphabetic());
    initial || ABBREVIATIONS.iter().any(|abbr| word.eq_ignore_ascii_case(abbr))
}

/// Approximate sentence count. A run of terminators ends a sentence when followed by
/// whitespace or end of text; full-width terminators always end one. A lone `.` after an
/// abbreviation ("Dr.", "e.g.") or an initial does not. Text after the last terminator counts
/// as a sentence.
fn sentence_count(text: &str) -> usize {
    let mut count = 0;
    let mut in_sentence = false;
    let mut word = String::new();
    let mut chars = text.trim().chars().peekable();

    while let Some(c) = chars.next() {
        if is_terminator(c) {
            let abbreviated = c == '.'
                && !chars.peek().is_some_and(|&n| is_terminator(n))
                && is_abbreviation(&word);
            let mut fullwidth = is_fullwidth_terminator(c);
            word.push(c);
            while let Some(&next) = chars.peek() {
                if !is_terminator(next) {
                    break;
                }
                fullwidth |= is_fullwidth_terminator(next);
                word.push(next);
                chars.next();
            }
            let boundary = fullwidth
                || (!abbreviated && chars.peek().map_or(true, |n| n.is_whitespace()));
            if boundary && in_sentence {
                count += 1;
                in_sentence = false;
            }
        } else if c.is_whitespace() {
            word.clear();
        } else {
            word.push(c);
            in_sentence = true;
        }
    }

    if in_sentence {
        count += 1;
    }
    count
}
