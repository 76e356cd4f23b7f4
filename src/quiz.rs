// src/quiz.rs
use crate::models::{EventKind, GameEvent};
use serde::Serialize;
use std::collections::BTreeMap;

/// Fraction of questions that must be answered correctly.
pub const PASS_RATIO: f64 = 0.66;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuizOption {
    pub id: String,
    pub label: String,
    #[serde(skip_serializing)]
    pub correct: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuizQuestion {
    pub id: String,
    pub prompt: String,
    pub options: Vec<QuizOption>,
}

impl QuizQuestion {
    pub fn is_correct(&self, answer: &str) -> bool {
        self.options.iter().any(|o| o.id == answer && o.correct)
    }
}

fn opt(id: &str, label: &str, correct: bool) -> QuizOption {
    QuizOption {
        id: id.to_string(),
        label: label.to_string(),
        correct,
    }
}

/// Questions for a quarter: the first event's direction, the second event's
/// type, and an investor-conduct question that targets unverified tips when
/// one is present.
pub fn build_questions(events: &[GameEvent]) -> Vec<QuizQuestion> {
    let mut questions = Vec::new();

    if let Some(e) = events.first() {
        questions.push(QuizQuestion {
            id: format!("q-dir-{}", e.id),
            prompt: format!("What is the likely price impact direction for: \"{}\"?", e.title),
            options: vec![
                opt("pos", "Positive", e.direction == 1),
                opt("neg", "Negative", e.direction == -1),
                opt("neu", "Neutral", e.direction == 0),
            ],
        });
    }

    if let Some(e) = events.get(1) {
        questions.push(QuizQuestion {
            id: format!("q-type-{}", e.id),
            prompt: format!("What type of event is: \"{}\"?", e.title),
            options: EventKind::ALL
                .iter()
                .map(|k| opt(k.as_str(), k.label(), *k == e.kind))
                .collect(),
        });
    }

    let has_tip = events.iter().any(|e| e.is_unverified_tip);
    questions.push(if has_tip {
        QuizQuestion {
            id: "q-sebi-tip".to_string(),
            prompt: "SEBI-compliant behavior regarding unverified tips is:".to_string(),
            options: vec![
                opt("act", "Act quickly on hot tips to maximize gains", false),
                opt("verify", "Verify information from official sources before acting", true),
                opt("ignore", "Ignore all official sources", false),
            ],
        }
    } else {
        QuizQuestion {
            id: "q-sebi-tip".to_string(),
            prompt: "Which is a SEBI-compliant investing behavior?".to_string(),
            options: vec![
                opt("div", "Diversify across sectors to reduce event impact", true),
                opt("all-in", "Put 80%+ in a single stock for faster returns", false),
                opt("rumors", "Trade based on market rumors", false),
            ],
        }
    });

    questions
}

pub fn pass_threshold(total: usize) -> usize {
    (total as f64 * PASS_RATIO).ceil() as usize
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuizResult {
    pub correct: usize,
    pub total: usize,
    /// Correct answers as a percentage, 0..=100.
    pub score: f64,
    pub passed: bool,
}

/// Grade answers keyed by question id. Missing or unknown answers count as wrong.
pub fn grade(questions: &[QuizQuestion], answers: &BTreeMap<String, String>) -> QuizResult {
    let total = questions.len();
    let correct = questions
        .iter()
        .filter(|q| answers.get(&q.id).map(|a| q.is_correct(a)).unwrap_or(false))
        .count();
    let score = if total > 0 {
        correct as f64 / total as f64 * 100.0
    } else {
        0.0
    };
    QuizResult {
        correct,
        total,
        score,
        passed: total > 0 && correct >= pass_threshold(total),
    }
}
