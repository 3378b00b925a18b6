//! Narrative generation for finished quests.
//!
//! A [`NarrativeGenerator`] turns the final trait vector and the ordered
//! answers into a short story. [`Narrator`] is what sessions use: it wraps an
//! optional remote generator and falls back to [`FallbackNarrator`] whenever
//! the remote one is absent or fails, so it never reports an error.
//!
//! The narrator is built once at startup and handed to whoever needs it.

pub mod fallback;
pub mod groq;

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::traits::TraitVector;

pub use fallback::{fallback_story, personality_type, type_label, FallbackNarrator};
pub use groq::{GroqNarrator, NarratorConfig};

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Failures of a remote narrative service.
#[derive(Debug, Error)]
pub enum NarrativeError {
    /// Transport-level failure (DNS, connect, TLS, timeout).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The service answered with a non-success status.
    #[error("Narrative API error ({status}): {body}")]
    Api { status: u16, body: String },

    /// The body was not a usable completion.
    #[error("Malformed narrative response: {0}")]
    MalformedResponse(String),

    /// Any other generator-specific failure.
    #[error("Narrative generation failed: {0}")]
    Other(String),
}

// ---------------------------------------------------------------------------
// Request / trait
// ---------------------------------------------------------------------------

/// Input to a generator: the final traits and answers in the order given.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NarrativeRequest {
    pub traits: TraitVector,
    pub responses: Vec<String>,
}

impl NarrativeRequest {
    pub fn new(traits: TraitVector, responses: Vec<String>) -> Self {
        Self { traits, responses }
    }
}

/// Produces a personality story.
#[async_trait]
pub trait NarrativeGenerator: Send + Sync + fmt::Debug {
    /// Short identifier used in logs.
    fn name(&self) -> &str;

    async fn generate_story(&self, request: &NarrativeRequest) -> Result<String, NarrativeError>;
}

// ---------------------------------------------------------------------------
// Narrator
// ---------------------------------------------------------------------------

/// Remote generator with a deterministic local fallback.
#[derive(Debug, Clone, Default)]
pub struct Narrator {
    remote: Option<Arc<dyn NarrativeGenerator>>,
    fallback: FallbackNarrator,
}

impl Narrator {
    /// A narrator that only uses the local fallback.
    pub fn offline() -> Self {
        Self::default()
    }

    pub fn with_remote(remote: Arc<dyn NarrativeGenerator>) -> Self {
        Self {
            remote: Some(remote),
            fallback: FallbackNarrator,
        }
    }

    /// Build from config: Groq when a usable key is present, offline otherwise.
    pub fn from_config(config: NarratorConfig) -> Result<Self, NarrativeError> {
        match GroqNarrator::from_config(config)? {
            Some(groq) => {
                log::info!("narrator: using {} via Groq", groq.config().model);
                Ok(Self::with_remote(Arc::new(groq)))
            }
            None => {
                log::info!("narrator: no API key configured, using fallback stories");
                Ok(Self::offline())
            }
        }
    }

    pub fn has_remote(&self) -> bool {
        self.remote.is_some()
    }
}

#[async_trait]
impl NarrativeGenerator for Narrator {
    fn name(&self) -> &str {
        self.remote.as_ref().map_or("fallback", |r| r.name())
    }

    async fn generate_story(&self, request: &NarrativeRequest) -> Result<String, NarrativeError> {
        if let Some(remote) = &self.remote {
            match remote.generate_story(request).await {
                Ok(story) => return Ok(story),
                Err(e) => {
                    log::warn!(
                        "narrator '{}' failed, using fallback story: {}",
                        remote.name(),
                        e
                    );
                }
            }
        }
        self.fallback.generate_story(request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::TraitKind;

    #[derive(Debug)]
    struct Failing;

    #[async_trait]
    impl NarrativeGenerator for Failing {
        fn name(&self) -> &str {
            "failing"
        }

        async fn generate_story(&self, _: &NarrativeRequest) -> Result<String, NarrativeError> {
            Err(NarrativeError::Other("service down".into()))
        }
    }

    #[derive(Debug)]
    struct Fixed(&'static str);

    #[async_trait]
    impl NarrativeGenerator for Fixed {
        fn name(&self) -> &str {
            "fixed"
        }

        async fn generate_story(&self, _: &NarrativeRequest) -> Result<String, NarrativeError> {
            Ok(self.0.to_string())
        }
    }

    fn logic_request() -> NarrativeRequest {
        NarrativeRequest::new(
            TraitVector::default().apply_deltas(&[(TraitKind::Logic, 20)]),
            vec!["Analyze all options before deciding".into()],
        )
    }

    #[tokio::test]
    async fn test_remote_failure_falls_back() {
        let narrator = Narrator::with_remote(Arc::new(Failing));
        let story = narrator.generate_story(&logic_request()).await.unwrap();
        assert_eq!(story, fallback_story(TraitKind::Logic));
    }

    #[tokio::test]
    async fn test_remote_success_is_used() {
        let narrator = Narrator::with_remote(Arc::new(Fixed("A remote tale.")));
        let story = narrator.generate_story(&logic_request()).await.unwrap();
        assert_eq!(story, "A remote tale.");
        assert_eq!(narrator.name(), "fixed");
    }

    #[tokio::test]
    async fn test_offline_uses_fallback() {
        let narrator = Narrator::offline();
        assert!(!narrator.has_remote());
        let story = narrator.generate_story(&logic_request()).await.unwrap();
        assert!(story.starts_with("In the crystalline halls"));
    }

    #[test]
    fn test_from_config_without_key_is_offline() {
        let narrator = Narrator::from_config(NarratorConfig::default()).unwrap();
        assert!(!narrator.has_remote());
    }
}
