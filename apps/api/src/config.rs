use std::str::FromStr;
use std::time::Duration;

use anyhow::{bail, Context, Result};

use crate::llm_client::ANTHROPIC_API_URL;
use crate::metadata::schema::{SchemaDefinition, DEFAULT_CATEGORIES, DEFAULT_INTENTS};

const DEFAULT_MAX_ATTEMPTS: u32 = 3;
const DEFAULT_ATTEMPT_TIMEOUT_SECS: u64 = 90;

/// Application configuration loaded from environment variables.
/// Startup fails if required variables are missing or malformed.
#[derive(Debug, Clone)]
pub struct Config {
    pub anthropic_api_key: String,
    pub anthropic_api_url: String,
    pub port: u16,
    pub rust_log: String,
    pub max_attempts: u32,
    pub attempt_timeout: Duration,
    pub max_input_chars: Option<usize>,
    pub categories: Vec<String>,
    pub intents: Vec<String>,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let max_attempts: u32 = parse_env("METADATA_MAX_ATTEMPTS", DEFAULT_MAX_ATTEMPTS)?;
        if max_attempts == 0 {
            bail!("METADATA_MAX_ATTEMPTS must be at least 1");
        }

        Ok(Config {
            anthropic_api_key: require_env("ANTHROPIC_API_KEY")?,
            anthropic_api_url: std::env::var("ANTHROPIC_API_URL")
                .unwrap_or_else(|_| ANTHROPIC_API_URL.to_string()),
            port: parse_env("PORT", 8080)?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            max_attempts,
            attempt_timeout: Duration::from_secs(parse_env(
                "METADATA_ATTEMPT_TIMEOUT_SECS",
                DEFAULT_ATTEMPT_TIMEOUT_SECS,
            )?),
            max_input_chars: match std::env::var("METADATA_MAX_INPUT_CHARS") {
                Ok(raw) => Some(parse_value("METADATA_MAX_INPUT_CHARS", &raw)?),
                Err(_) => None,
            },
            categories: vocabulary_env("METADATA_CATEGORIES", DEFAULT_CATEGORIES)?,
            intents: vocabulary_env("METADATA_INTENTS", DEFAULT_INTENTS)?,
        })
    }

    /// Output schema with the configured vocabularies.
    pub fn schema(&self) -> SchemaDefinition {
        SchemaDefinition::with_vocabularies(self.categories.clone(), self.intents.clone())
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn parse_env<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(raw) => parse_value(key, &raw),
        Err(_) => Ok(default),
    }
}

fn parse_value<T>(key: &str, raw: &str) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    raw.trim()
        .parse::<T>()
        .with_context(|| format!("{key} must be a valid number, got '{raw}'"))
}

fn vocabulary_env(key: &str, default: &[&str]) -> Result<Vec<String>> {
    match std::env::var(key) {
        Ok(raw) => parse_vocabulary(key, &raw),
        Err(_) => Ok(default.iter().map(|s| s.to_string()).collect()),
    }
}

/// Splits a `;`-separated vocabulary, trimming entries and dropping blanks.
fn parse_vocabulary(key: &str, raw: &str) -> Result<Vec<String>> {
    let values: Vec<String> = raw
        .split(';')
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
        .collect();
    if values.is_empty() {
        bail!("{key} must list at least one value");
    }
    Ok(values)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_vocabulary_trims_and_drops_blanks() {
        let values = parse_vocabulary("X", " Music ; Gaming;; Film & Animation ;").unwrap();
        assert_eq!(values, vec!["Music", "Gaming", "Film & Animation"]);
    }

    #[test]
    fn test_parse_vocabulary_rejects_empty() {
        let err = parse_vocabulary("METADATA_INTENTS", " ; ; ").unwrap_err();
        assert!(err.to_string().contains("METADATA_INTENTS"));
    }

    #[test]
    fn test_parse_value() {
        assert_eq!(parse_value::<u32>("N", " 5 ").unwrap(), 5);
        let err = parse_value::<u16>("PORT", "eighty").unwrap_err();
        assert!(err.to_string().contains("PORT must be a valid number"));
    }

    #[test]
    fn test_schema_uses_configured_vocabularies() {
        let config = Config {
            anthropic_api_key: "k".to_string(),
            anthropic_api_url: ANTHROPIC_API_URL.to_string(),
            port: 8080,
            rust_log: "info".to_string(),
            max_attempts: 3,
            attempt_timeout: Duration::from_secs(90),
            max_input_chars: None,
            categories: vec!["Shorts".to_string()],
            intents: vec!["review".to_string()],
        };
        let schema = config.schema();
        assert_eq!(schema.canonical_category("shorts"), Some("Shorts"));
        assert_eq!(schema.canonical_intent("Review"), Some("review"));
    }
}
