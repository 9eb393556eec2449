//! Fixtures shared by the metadata tests: canned backend responses and a scripted generator.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::{json, Value};

use crate::llm_client::{LlmError, TextGenerator};

/// A complete, valid response for a Hindi devotional video.
pub fn hindi_response() -> Value {
    json!({
        "language_detected": "Hindi",
        "title": "हनुमान चालीसा पाठ | मंगलवार विशेष",
        "title_english": "Hanuman Chalisa Recitation | Tuesday Special",
        "short_description": "मंगलवार की सुबह हनुमान चालीसा का पूरा पाठ।",
        "description": "इस वीडियो में हनुमान चालीसा का शुद्ध उच्चारण के साथ पूरा पाठ है।",
        "description_english": "A complete recitation of the Hanuman Chalisa with clear pronunciation.",
        "tags": ["हनुमान चालीसा", "Hanuman Chalisa", "bhajan", "devotional"],
        "hashtags": ["#HanumanChalisa", "#Bhakti", "#Bhajan", "#Hanuman", "#Devotional",
                     "#Tuesday", "#Mantra", "#HinduPrayer"],
        "category": "music",
        "target_audience": "All ages, Hindi-speaking devotees",
        "video_intent": "Devotional",
        "thumbnail_text": ["हनुमान चालीसा", "Tuesday Special"]
    })
}

/// A complete, valid response for an English how-to video (bilingual fields left empty).
pub fn english_response() -> Value {
    json!({
        "language_detected": "English",
        "title": "Fix a Leaky Faucet in 10 Minutes",
        "title_english": "",
        "short_description": "Stop the drip with a wrench and a new washer.",
        "description": "We walk through shutting off the water, replacing the washer, and testing.",
        "description_english": "",
        "tags": ["leaky faucet", "plumbing", "home repair"],
        "hashtags": ["#DIY", "#Plumbing", "#HomeRepair", "#Faucet", "#FixIt",
                     "#Homeowner", "#Tools", "#HowTo"],
        "category": "Howto & Style",
        "target_audience": "Homeowners and renters, 25-60",
        "video_intent": "educational",
        "thumbnail_text": ["No More Drips", "10 Min Fix"]
    })
}

/// Same as `english_response` but without `category`.
pub fn response_missing_category() -> Value {
    let mut value = english_response();
    if let Some(obj) = value.as_object_mut() {
        obj.remove("category");
    }
    value
}

/// Replays a fixed script of backend results and records every prompt it receives.
pub struct ScriptedGenerator {
    script: Mutex<VecDeque<Result<String, LlmError>>>,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedGenerator {
    pub fn new(script: Vec<Result<String, LlmError>>) -> Self {
        Self {
            script: Mutex::new(script.into()),
            prompts: Mutex::new(Vec::new()),
        }
    }

    /// Returns `value` (serialized) on every call.
    pub fn always(value: &Value, calls: usize) -> Self {
        Self::new((0..calls).map(|_| Ok(value.to_string())).collect())
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }

    pub fn calls(&self) -> usize {
        self.prompts.lock().unwrap().len()
    }
}

#[async_trait]
impl TextGenerator for ScriptedGenerator {
    async fn generate(&self, prompt: &str) -> Result<String, LlmError> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        self.script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Err(LlmError::EmptyContent))
    }
}

pub fn unavailable() -> LlmError {
    LlmError::Api {
        status: 503,
        message: "overloaded".to_string(),
    }
}
