//! Template renderer — embeds untrusted user text into the instruction template.
//!
//! The user text becomes one JSON string literal: quotes, backslashes and control
//! characters are escaped, and so are the characters that could fake a marker or a line
//! break (`<`, `>`, U+2028, U+2029) or visually reorder the prompt (bidi controls).
//! The literal is spliced between a pre-rendered head and tail, so nothing inside it is
//! ever scanned for placeholders.

use serde_json::Value;

use crate::metadata::prompts::METADATA_PROMPT_TEMPLATE;
use crate::metadata::schema::SchemaDefinition;

const USER_PLACEHOLDER: &str = "{user_description}";

#[derive(Debug, Clone)]
pub struct TemplateRenderer {
    head: String,
    tail: String,
}

impl TemplateRenderer {
    pub fn new(schema: &SchemaDefinition) -> Self {
        let (head, tail) = METADATA_PROMPT_TEMPLATE
            .split_once(USER_PLACEHOLDER)
            .unwrap_or((METADATA_PROMPT_TEMPLATE, ""));

        Self {
            head: fill_schema(head, schema),
            tail: fill_schema(tail, schema),
        }
    }

    /// Renders the full prompt for `user_text`. Never fails; pure.
    pub fn render(&self, user_text: &str) -> String {
        let literal = encode_user_text(user_text);
        let mut prompt = String::with_capacity(self.head.len() + literal.len() + self.tail.len());
        prompt.push_str(&self.head);
        prompt.push_str(&literal);
        prompt.push_str(&self.tail);
        prompt
    }
}

fn fill_schema(fragment: &str, schema: &SchemaDefinition) -> String {
    fragment
        .replace("{title_max_chars}", &schema.title_max_chars.to_string())
        .replace("{hashtag_min}", &schema.hashtag_count.start().to_string())
        .replace("{hashtag_max}", &schema.hashtag_count.end().to_string())
        .replace("{thumbnail_min}", &schema.thumbnail_count.start().to_string())
        .replace("{thumbnail_max}", &schema.thumbnail_count.end().to_string())
        .replace(
            "{thumbnail_max_chars}",
            &schema.thumbnail_max_chars.to_string(),
        )
        .replace("{categories}", &quoted_list(&schema.categories))
        .replace("{intents}", &quoted_list(&schema.intents))
}

fn quoted_list(values: &[String]) -> String {
    values
        .iter()
        .map(|v| format!("\"{v}\""))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Encodes arbitrary text as a single-line JSON string literal safe to splice into the prompt.
fn encode_user_text(text: &str) -> String {
    let json = Value::String(text.to_string()).to_string();
    let mut out = String::with_capacity(json.len());
    for c in json.chars() {
        if needs_unicode_escape(c) {
            out.push_str(&format!("\\u{:04x}", c as u32));
        } else {
            out.push(c);
        }
    }
    out
}

fn needs_unicode_escape(c: char) -> bool {
    matches!(
        c,
        '<' | '>' | '\u{2028}' | '\u{2029}' | '\u{202A}'..='\u{202E}' | '\u{2066}'..='\u{2069}'
    )
}
