//! Built-in question catalogs.
//!
//! [`keyword_questions`] feeds the keyword scorer: every option is plain text
//! and scoring depends on the category label. [`adjustment_questions`] feeds
//! the adjustment scorer: every option carries its own percentage tuple in
//! `[bravery, logic, empathy, creativity, greed, wisdom]` order.

use super::{AnswerOption, Question};

pub const ADVENTURE_AND_RISK: &str = "Adventure & Risk";
pub const PROBLEM_SOLVING: &str = "Problem Solving";
pub const CREATIVITY_AND_INNOVATION: &str = "Creativity & Innovation";
pub const JUSTICE_AND_EMPATHY: &str = "Justice & Empathy";
pub const RESOURCE_MANAGEMENT: &str = "Resource Management";

fn plain(id: u32, text: &str, category: &str, options: [&str; 4]) -> Question {
    Question {
        id,
        text: text.to_string(),
        narrative: None,
        category: category.to_string(),
        options: options.iter().map(|o| AnswerOption::plain(*o)).collect(),
    }
}

fn adjusted(
    id: u32,
    text: &str,
    category: &str,
    narrative: &str,
    options: [(&str, [u16; 6]); 3],
) -> Question {
    Question {
        id,
        text: text.to_string(),
        narrative: Some(narrative.to_string()),
        category: category.to_string(),
        options: options
            .iter()
            .map(|(t, adj)| AnswerOption::with_adjustments(*t, *adj))
            .collect(),
    }
}

/// The five category-tagged questions scored by keyword matching.
pub fn keyword_questions() -> Vec<Question> {
    vec![
        plain(
            1,
            "You discover a hidden treasure map. What do you do?",
            ADVENTURE_AND_RISK,
            [
                "Follow it immediately, alone",
                "Research the map's authenticity first",
                "Share it with trusted friends",
                "Sell it to the highest bidder",
            ],
        ),
        plain(
            2,
            "A friend asks for help with a difficult problem. How do you respond?",
            PROBLEM_SOLVING,
            [
                "Solve it for them quickly",
                "Guide them through the solution step by step",
                "Listen and offer emotional support",
                "Suggest they figure it out themselves",
            ],
        ),
        plain(
            3,
            "You're given creative freedom on a project. What's your approach?",
            CREATIVITY_AND_INNOVATION,
            [
                "Follow proven methods and best practices",
                "Experiment with new and unconventional ideas",
                "Collaborate with others to combine perspectives",
                "Focus on efficiency and practical results",
            ],
        ),
        plain(
            4,
            "You witness someone being treated unfairly. What do you do?",
            JUSTICE_AND_EMPATHY,
            [
                "Intervene immediately to stop it",
                "Document the incident and report it",
                "Offer support to the victim afterward",
                "Stay out of it to avoid conflict",
            ],
        ),
        plain(
            5,
            "You have limited time and resources. How do you prioritize?",
            RESOURCE_MANAGEMENT,
            [
                "Focus on what brings the most immediate results",
                "Plan for long-term sustainability",
                "Help others first, then yourself",
                "Analyze all options before deciding",
            ],
        ),
    ]
}

/// The five narrated questions whose options carry percentage adjustments.
pub fn adjustment_questions() -> Vec<Question> {
    vec![
        adjusted(
            1,
            "You find a wallet on the ground with $500 cash inside.",
            "Integrity",
            "As you walk through the misty Forest of Choices, you stumble upon a leather wallet gleaming in the moonlight. Inside, crisp bills catch your eye...",
            [
                ("Take the money and leave the wallet", [110, 100, 80, 100, 130, 80]),
                ("Take the wallet to the police station", [100, 110, 120, 100, 80, 115]),
                ("Leave it where you found it", [90, 105, 105, 100, 85, 110]),
            ],
        ),
        adjusted(
            2,
            "You're offered a job that pays twice your current salary but requires you to move far from family.",
            "Ambition & Family",
            "In the Chamber of Echoing Decisions, a mysterious voice presents you with an opportunity that could change everything...",
            [
                ("Take the job immediately", [120, 115, 85, 110, 115, 95]),
                ("Decline to stay with family", [85, 100, 125, 100, 80, 110]),
                ("Negotiate for remote work", [105, 120, 110, 115, 105, 115]),
            ],
        ),
        adjusted(
            3,
            "You witness someone being bullied. What do you do?",
            JUSTICE_AND_EMPATHY,
            "In the Arena of Moral Trials, you see a figure in distress as shadows loom over them menacingly...",
            [
                ("Immediately step in to help", [130, 100, 120, 100, 95, 110]),
                ("Call for help/authorities", [105, 115, 115, 100, 100, 115]),
                ("Walk away to avoid trouble", [70, 95, 80, 100, 105, 90]),
            ],
        ),
        adjusted(
            4,
            "You're given a creative project with complete freedom but a tight deadline.",
            CREATIVITY_AND_INNOVATION,
            "The Tower of Infinite Possibilities opens before you, its walls pulsing with raw creative energy, but time slips away like sand...",
            [
                ("Create something completely original and risky", [115, 95, 100, 130, 100, 105]),
                ("Use a proven template and execute perfectly", [100, 120, 100, 90, 100, 110]),
                ("Collaborate with others for fresh ideas", [100, 110, 115, 115, 95, 115]),
            ],
        ),
        adjusted(
            5,
            "You discover your company is doing something unethical but legal.",
            "Ethics at Work",
            "In the Hall of Moral Mirrors, reflections of truth and consequence dance before your eyes, revealing uncomfortable realities...",
            [
                ("Blow the whistle publicly", [125, 105, 120, 100, 85, 120]),
                ("Keep quiet to protect your job", [80, 95, 85, 100, 115, 85]),
                ("Try to change things from within", [110, 115, 110, 110, 95, 115]),
            ],
        ),
    ]
}
