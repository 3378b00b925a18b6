//! Deterministic narration keyed by the dominant trait.

use async_trait::async_trait;

use crate::traits::{TraitKind, TraitVector};

use super::{NarrativeError, NarrativeGenerator, NarrativeRequest};

/// The fixed story for a dominant trait.
pub fn fallback_story(kind: TraitKind) -> &'static str {
    match kind {
        TraitKind::Bravery => "Through the mists of the enchanted realm, a fearless warrior emerged, their courage shining like a beacon in the darkness. Every choice carved their legend deeper into the mystical tapestry of fate.",
        TraitKind::Logic => "In the crystalline halls of wisdom, an analytical mind unraveled the mysteries of the realm with precision and clarity. Their methodical approach illuminated paths hidden from others.",
        TraitKind::Empathy => "A compassionate soul wandered through the realm, their heart attuned to the whispers of all living things. Their kindness became a healing light that mended the fractured world around them.",
        TraitKind::Creativity => "An innovative dreamer painted reality with strokes of pure imagination, transforming the mundane into the magical. Their creative spirit sparked new possibilities in every corner of the realm.",
        TraitKind::Greed => "An ambitious seeker pursued the treasures of the realm with unwavering determination. Their desire for more became both their driving force and their greatest challenge.",
        TraitKind::Wisdom => "A sage traveler walked the ancient paths, gathering knowledge like precious gems. Their understanding grew with each step, illuminating the deeper truths of the mystical realm.",
    }
}

/// The fixed personality-type label for a dominant trait.
pub fn type_label(kind: TraitKind) -> &'static str {
    match kind {
        TraitKind::Bravery => "The Fearless Warrior",
        TraitKind::Logic => "The Analytical Mind",
        TraitKind::Empathy => "The Compassionate Soul",
        TraitKind::Creativity => "The Innovative Dreamer",
        TraitKind::Greed => "The Ambitious Collector",
        TraitKind::Wisdom => "The Enlightened Sage",
    }
}

/// Label a profile by its dominant trait (ties go to the earlier trait).
pub fn personality_type(traits: &TraitVector) -> &'static str {
    type_label(traits.dominant())
}

/// Offline generator: always succeeds, same input gives same story.
#[derive(Debug, Clone, Copy, Default)]
pub struct FallbackNarrator;

impl FallbackNarrator {
    pub fn story(&self, traits: &TraitVector) -> String {
        fallback_story(traits.dominant()).to_string()
    }
}

#[async_trait]
impl NarrativeGenerator for FallbackNarrator {
    fn name(&self) -> &str {
        "fallback"
    }

    async fn generate_story(&self, request: &NarrativeRequest) -> Result<String, NarrativeError> {
        Ok(self.story(&request.traits))
    }
}
