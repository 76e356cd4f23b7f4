// src/report.rs
use crate::models::{GameState, QuarterRecord};
use crate::scoring::max_stock_weight;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub enum Grade {
    #[serde(rename = "D")]
    D,
    #[serde(rename = "C")]
    C,
    #[serde(rename = "C+")]
    CPlus,
    #[serde(rename = "B")]
    B,
    #[serde(rename = "B+")]
    BPlus,
    #[serde(rename = "A")]
    A,
    #[serde(rename = "A+")]
    APlus,
}

impl Grade {
    /// Points on a 10-point scale; D is worth 3.
    pub fn value(&self) -> f64 {
        match self {
            Grade::APlus => 10.0,
            Grade::A => 9.0,
            Grade::BPlus => 8.0,
            Grade::B => 7.0,
            Grade::CPlus => 6.0,
            Grade::C => 5.0,
            Grade::D => 3.0,
        }
    }

    fn from_ladder(bands: [bool; 6]) -> Grade {
        const LADDER: [Grade; 6] = [
            Grade::APlus,
            Grade::A,
            Grade::BPlus,
            Grade::B,
            Grade::CPlus,
            Grade::C,
        ];
        bands
            .iter()
            .position(|hit| *hit)
            .map(|i| LADDER[i])
            .unwrap_or(Grade::D)
    }
}

pub fn return_grade(total_return: f64) -> Grade {
    let r = total_return;
    Grade::from_ladder([r >= 25.0, r >= 20.0, r >= 15.0, r >= 10.0, r >= 5.0, r >= 0.0])
}

pub fn diversification_grade(score: f64) -> Grade {
    let s = score;
    Grade::from_ladder([s >= 85.0, s >= 75.0, s >= 65.0, s >= 55.0, s >= 45.0, s >= 35.0])
}

pub fn risk_grade(score: f64) -> Grade {
    let s = score;
    Grade::from_ladder([s <= 40.0, s <= 50.0, s <= 60.0, s <= 70.0, s <= 80.0, s <= 90.0])
}

/// Share of quarters with a positive return. No quarters grades as D.
pub fn consistency_grade(history: &[QuarterRecord]) -> Grade {
    if history.is_empty() {
        return Grade::D;
    }
    let ratio = positive_quarters(history) as f64 / history.len() as f64;
    Grade::from_ladder([
        ratio >= 0.9,
        ratio >= 0.8,
        ratio >= 0.7,
        ratio >= 0.6,
        ratio >= 0.5,
        ratio >= 0.4,
    ])
}

/// Overall grade from the mean of the return, diversification and risk grades.
pub fn overall_grade(total_return: f64, diversification: f64, risk: f64) -> Grade {
    let avg = (return_grade(total_return).value()
        + diversification_grade(diversification).value()
        + risk_grade(risk).value())
        / 3.0;
    if avg >= 9.0 {
        Grade::APlus
    } else if avg >= 8.0 {
        Grade::A
    } else if avg >= 7.0 {
        Grade::BPlus
    } else if avg >= 6.0 {
        Grade::B
    } else if avg >= 5.0 {
        Grade::CPlus
    } else if avg >= 4.0 {
        Grade::C
    } else {
        Grade::D
    }
}

fn positive_quarters(history: &[QuarterRecord]) -> usize {
    history.iter().filter(|q| q.quarter_return > 0.0).count()
}

/// Population standard deviation of quarterly returns.
pub fn volatility(history: &[QuarterRecord]) -> f64 {
    if history.is_empty() {
        return 0.0;
    }
    let n = history.len() as f64;
    let mean = history.iter().map(|q| q.quarter_return).sum::<f64>() / n;
    let variance = history.iter().map(|q| (q.quarter_return - mean).powi(2)).sum::<f64>() / n;
    variance.sqrt()
}

pub fn final_score(state: &GameState) -> i64 {
    let Some(latest) = state.last_record() else {
        return 0;
    };
    let return_points = (latest.total_return * 100.0).max(0.0);
    let diversification_points = latest.diversification_score * 50.0;
    let consistency_bonus = positive_quarters(&state.quarter_history) as f64 * 100.0;
    (return_points + diversification_points + consistency_bonus).round() as i64
}

/// Final score with a penalty for risk above 50 and a bonus per rebalanced quarter.
pub fn leaderboard_score(state: &GameState) -> i64 {
    let Some(latest) = state.last_record() else {
        return 0;
    };
    let risk_penalty = ((latest.risk_score - 50.0) * 10.0).max(0.0);
    let rebalanced = state.quarter_history.iter().filter(|q| q.rebalanced).count();
    let rebalancing_bonus = rebalanced as f64 * 50.0;
    let base = (latest.total_return * 100.0).max(0.0)
        + latest.diversification_score * 50.0
        + positive_quarters(&state.quarter_history) as f64 * 100.0;
    (base - risk_penalty + rebalancing_bonus).round() as i64
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LearningGap {
    pub title: &'static str,
    pub description: &'static str,
    pub category: &'static str,
    pub severity: Severity,
}

pub fn learning_gaps(state: &GameState) -> Vec<LearningGap> {
    let mut gaps = Vec::new();
    let Some(last) = state.last_record() else {
        return gaps;
    };

    if last.diversification_score < 60.0 {
        gaps.push(LearningGap {
            title: "Diversification Improvement Needed",
            description: "Your portfolio showed low diversification. Consider spreading investments across more sectors and stocks.",
            category: "diversification",
            severity: Severity::High,
        });
    }

    if last.risk_score > 80.0 {
        gaps.push(LearningGap {
            title: "Risk Management",
            description: "High risk exposure detected. Balance volatile sectors with stable ones.",
            category: "risk",
            severity: Severity::Medium,
        });
    }

    let rebalanced = state.quarter_history.iter().filter(|q| q.rebalanced).count();
    if (rebalanced as f64 / state.quarter_history.len() as f64) < 0.3 {
        gaps.push(LearningGap {
            title: "Rebalancing Frequency",
            description: "Consider more frequent rebalancing to maintain target allocation.",
            category: "strategy",
            severity: Severity::Low,
        });
    }

    gaps
}

pub const DIVERSIFICATION_MASTER: &str = "diversification_master";
pub const RISK_MANAGER: &str = "risk_manager";
pub const BALANCED_BUILDER: &str = "balanced_builder";
pub const CONSISTENT_PERFORMER: &str = "consistent_performer";

/// Badges earned over the play-through so far.
pub fn evaluate_achievements(state: &GameState) -> Vec<String> {
    let history = &state.quarter_history;
    let mut earned = Vec::new();
    if history.is_empty() {
        return earned;
    }
    if history.iter().filter(|q| q.diversification_score >= 80.0).count() >= 6 {
        earned.push(DIVERSIFICATION_MASTER.to_string());
    }
    if history.iter().all(|q| q.risk_score < 60.0) {
        earned.push(RISK_MANAGER.to_string());
    }
    if !state.portfolio.is_empty() && max_stock_weight(&state.portfolio) <= 15.0 {
        earned.push(BALANCED_BUILDER.to_string());
    }
    if positive_quarters(history) >= 10 {
        earned.push(CONSISTENT_PERFORMER.to_string());
    }
    earned
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GameReport {
    pub quarters_played: usize,
    pub total_return: f64,
    pub final_score: i64,
    pub leaderboard_score: i64,
    pub grade: Grade,
    pub return_grade: Grade,
    pub diversification_grade: Grade,
    pub risk_grade: Grade,
    pub consistency_grade: Grade,
    pub volatility: f64,
    pub learning_gaps: Vec<LearningGap>,
    pub achievements: Vec<String>,
}

pub fn build_report(state: &GameState) -> GameReport {
    let last = state.last_record();
    let total_return = last.map(|r| r.total_return).unwrap_or(0.0);
    let diversification = last.map(|r| r.diversification_score).unwrap_or(0.0);
    let risk = last.map(|r| r.risk_score).unwrap_or(0.0);
    GameReport {
        quarters_played: state.quarter_history.len(),
        total_return,
        final_score: final_score(state),
        leaderboard_score: leaderboard_score(state),
        grade: overall_grade(total_return, diversification, risk),
        return_grade: return_grade(total_return),
        diversification_grade: diversification_grade(diversification),
        risk_grade: risk_grade(risk),
        consistency_grade: consistency_grade(&state.quarter_history),
        volatility: volatility(&state.quarter_history),
        learning_gaps: learning_gaps(state),
        achievements: state.achievements.clone(),
    }
}
