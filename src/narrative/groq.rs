//! Groq chat-completion narrator.
//!
//! Groq serves an OpenAI-compatible Chat Completions endpoint, so the request
//! and response shapes here are the standard `messages` / `choices` ones.
//! One request per story: no retries, and no client-side timeout unless one
//! is configured.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{NarrativeError, NarrativeGenerator, NarrativeRequest};

pub const DEFAULT_GROQ_BASE_URL: &str = "https://api.groq.com/openai/v1";
pub const DEFAULT_GROQ_MODEL: &str = "llama3-8b-8192";

/// Placeholder key shipped in sample env files; treated as "no key".
pub const PLACEHOLDER_API_KEY: &str = "demo-key";

/// Returned when the model answers with an empty message.
pub const EMPTY_STORY: &str = "The traveler's journey remains a mystery...";

const SYSTEM_PROMPT: &str = "You are an AI narrator for MindQuest, a personality-based RPG game. Generate a short, poetic story (2-3 sentences) about a player's personality journey based on their traits and choices. The story should be mystical and game-like, referring to them as a traveler in a fantasy realm.";

/// Connection and sampling settings for [`GroqNarrator`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NarratorConfig {
    pub api_key: Option<String>,
    pub base_url: String,
    pub model: String,
    pub max_tokens: u32,
    pub temperature: f64,
    /// Request timeout in seconds. `None` leaves timing to the service.
    pub timeout: Option<f64>,
}

impl Default for NarratorConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: DEFAULT_GROQ_BASE_URL.to_string(),
            model: DEFAULT_GROQ_MODEL.to_string(),
            max_tokens: 150,
            temperature: 0.8,
            timeout: None,
        }
    }
}

impl NarratorConfig {
    /// The API key, unless it is missing, blank or the placeholder.
    pub fn usable_api_key(&self) -> Option<&str> {
        self.api_key
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty() && *k != PLACEHOLDER_API_KEY)
    }
}

/// Remote narrator backed by the Groq API.
#[derive(Debug, Clone)]
pub struct GroqNarrator {
    config: NarratorConfig,
    api_key: String,
    client: reqwest::Client,
}

impl GroqNarrator {
    /// Build a narrator, or `None` when the config has no usable key.
    pub fn from_config(config: NarratorConfig) -> Result<Option<Self>, NarrativeError> {
        let Some(api_key) = config.usable_api_key().map(str::to_string) else {
            return Ok(None);
        };

        let mut builder = reqwest::Client::builder();
        if let Some(secs) = config.timeout {
            builder = builder.timeout(Duration::from_secs_f64(secs));
        }
        let client = builder.build()?;

        Ok(Some(Self {
            config,
            api_key,
            client,
        }))
    }

    pub fn config(&self) -> &NarratorConfig {
        &self.config
    }

    pub fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.config.base_url.trim_end_matches('/'))
    }

    /// Build the Chat Completions request body.
    pub fn build_request_body(&self, request: &NarrativeRequest) -> Value {
        serde_json::json!({
            "model": self.config.model,
            "messages": [
                { "role": "system", "content": SYSTEM_PROMPT },
                { "role": "user", "content": user_prompt(request) },
            ],
            "max_tokens": self.config.max_tokens,
            "temperature": self.config.temperature,
        })
    }
}

/// The user message: traits then the ordered choices.
pub fn user_prompt(request: &NarrativeRequest) -> String {
    let t = &request.traits;
    format!(
        "Player traits: Bravery {}, Logic {}, Empathy {}, Creativity {}, Greed {}, Wisdom {}. \n\nChoices made: {}\n\nGenerate a short mystical story about their personality journey.",
        t.bravery,
        t.logic,
        t.empathy,
        t.creativity,
        t.greed,
        t.wisdom,
        request.responses.join(", ")
    )
}

/// Pull the first choice's message content out of a completions response.
pub fn parse_completion(response: &Value) -> Result<String, NarrativeError> {
    let choice = response
        .get("choices")
        .and_then(|c| c.get(0))
        .ok_or_else(|| NarrativeError::MalformedResponse("no choices in response".into()))?;

    let content = choice
        .get("message")
        .and_then(|m| m.get("content"))
        .and_then(|c| c.as_str())
        .map(str::trim)
        .unwrap_or("");

    if content.is_empty() {
        Ok(EMPTY_STORY.to_string())
    } else {
        Ok(content.to_string())
    }
}

#[async_trait]
impl NarrativeGenerator for GroqNarrator {
    fn name(&self) -> &str {
        "groq"
    }

    async fn generate_story(&self, request: &NarrativeRequest) -> Result<String, NarrativeError> {
        log::debug!(
            "GroqNarrator.generate_story: model={}, responses={}",
            self.config.model,
            request.responses.len()
        );

        let body = self.build_request_body(request);
        let response = self
            .client
            .post(self.endpoint())
            .header("Content-Type", "application/json")
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;
        if !status.is_success() {
            return Err(NarrativeError::Api {
                status: status.as_u16(),
                body: text.chars().take(500).collect(),
            });
        }

        let json: Value = serde_json::from_str(&text)
            .map_err(|e| NarrativeError::MalformedResponse(e.to_string()))?;
        if let Some(usage) = json.get("usage") {
            log::debug!(
                "Groq token usage: prompt={}, completion={}",
                usage.get("prompt_tokens").and_then(Value::as_i64).unwrap_or(0),
                usage.get("completion_tokens").and_then(Value::as_i64).unwrap_or(0),
            );
        }
        parse_completion(&json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::TraitVector;

    fn keyed() -> GroqNarrator {
        GroqNarrator::from_config(NarratorConfig {
            api_key: Some("gsk_test".into()),
            ..NarratorConfig::default()
        })
        .unwrap()
        .unwrap()
    }

    #[test]
    fn test_missing_or_placeholder_key_builds_nothing() {
        assert!(GroqNarrator::from_config(NarratorConfig::default())
            .unwrap()
            .is_none());
        let placeholder = NarratorConfig {
            api_key: Some("demo-key".into()),
            ..NarratorConfig::default()
        };
        assert!(GroqNarrator::from_config(placeholder).unwrap().is_none());
        let blank = NarratorConfig {
            api_key: Some("   ".into()),
            ..NarratorConfig::default()
        };
        assert!(blank.usable_api_key().is_none());
    }

    #[test]
    fn test_request_body() {
        let narrator = keyed();
        let request = NarrativeRequest::new(
            TraitVector::from_array([60, 50, 70, 50, 40, 80]),
            vec!["Share it with trusted friends".into(), "Plan ahead".into()],
        );
        let body = narrator.build_request_body(&request);
        assert_eq!(body["model"], "llama3-8b-8192");
        assert_eq!(body["max_tokens"], 150);
        assert_eq!(body["temperature"], 0.8);
        assert_eq!(body["messages"][0]["role"], "system");
        let user = body["messages"][1]["content"].as_str().unwrap();
        assert!(user.contains("Bravery 60, Logic 50, Empathy 70"));
        assert!(user.contains("Choices made: Share it with trusted friends, Plan ahead"));
    }

    #[test]
    fn test_endpoint_trims_slash() {
        let narrator = GroqNarrator::from_config(NarratorConfig {
            api_key: Some("k".into()),
            base_url: "http://localhost:9/v1/".into(),
            ..NarratorConfig::default()
        })
        .unwrap()
        .unwrap();
        assert_eq!(narrator.endpoint(), "http://localhost:9/v1/chat/completions");
    }

    #[test]
    fn test_parse_completion() {
        let json = serde_json::json!({
            "choices": [{ "message": { "role": "assistant", "content": " Once upon a time. " } }]
        });
        assert_eq!(parse_completion(&json).unwrap(), "Once upon a time.");

        let empty = serde_json::json!({ "choices": [{ "message": { "content": "" } }] });
        assert_eq!(parse_completion(&empty).unwrap(), EMPTY_STORY);

        let none = serde_json::json!({ "choices": [] });
        assert!(matches!(
            parse_completion(&none),
            Err(NarrativeError::MalformedResponse(_))
        ));
    }

    #[tokio::test]
    async fn test_unreachable_service_errors() {
        let narrator = GroqNarrator::from_config(NarratorConfig {
            api_key: Some("k".into()),
            base_url: "http://127.0.0.1:1".into(),
            timeout: Some(5.0),
            ..NarratorConfig::default()
        })
        .unwrap()
        .unwrap();
        let request = NarrativeRequest::new(TraitVector::default(), vec![]);
        assert!(matches!(
            narrator.generate_story(&request).await,
            Err(NarrativeError::Http(_))
        ));
    }
}
