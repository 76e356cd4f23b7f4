// src/models.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub const STARTING_CAPITAL: f64 = 1_000_000.0;
pub const TOTAL_QUARTERS: u32 = 12;
pub const INITIAL_HINTS: u32 = 6;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stock {
    pub id: String,
    pub symbol: String,
    pub name: String,
    pub sector: String,
    pub price: f64,
    #[serde(default)]
    pub change: f64,
    #[serde(default)]
    pub change_percent: f64,
    #[serde(default)]
    pub market_cap: f64,
    #[serde(default)]
    pub pe: f64,
    #[serde(default)]
    pub dividend: f64,
}

/// A single position. `weight` is a percentage of invested value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Holding {
    pub stock: Stock,
    #[serde(default)]
    pub quantity: f64,
    #[serde(default)]
    pub value: f64,
    #[serde(default)]
    pub weight: f64,
    #[serde(default)]
    pub avg_price: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    Earnings,
    Macro,
    Geopolitical,
    Policy,
    Commodity,
    Sentiment,
}

impl EventKind {
    pub const ALL: [EventKind; 6] = [
        EventKind::Earnings,
        EventKind::Macro,
        EventKind::Geopolitical,
        EventKind::Policy,
        EventKind::Commodity,
        EventKind::Sentiment,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            EventKind::Earnings => "earnings",
            EventKind::Macro => "macro",
            EventKind::Geopolitical => "geopolitical",
            EventKind::Policy => "policy",
            EventKind::Commodity => "commodity",
            EventKind::Sentiment => "sentiment",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            EventKind::Earnings => "Earnings",
            EventKind::Macro => "Macro",
            EventKind::Geopolitical => "Geopolitical",
            EventKind::Policy => "Policy",
            EventKind::Commodity => "Commodity",
            EventKind::Sentiment => "Sentiment",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Confidence {
    Low,
    Medium,
    High,
}

impl Confidence {
    pub fn multiplier(&self) -> f64 {
        match self {
            Confidence::High => 1.0,
            Confidence::Medium => 0.75,
            Confidence::Low => 0.5,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShockProfile {
    Impulse,
    Step,
    Ramp,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameEvent {
    pub id: String,
    pub title: String,
    pub kind: EventKind,
    pub description: String,
    pub affected_sectors: Vec<String>,
    pub affected_stocks: Vec<String>,
    /// +1, -1 or 0.
    pub direction: i8,
    pub impact_score: f64,
    pub confidence: Confidence,
    pub is_unverified_tip: bool,
    pub shock_profile: ShockProfile,
    pub decay_half_life: u32,
}

/// The quarter currently being played. Journey flags live here until the
/// quarter is closed and frozen into a `QuarterRecord`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuarterProgress {
    pub quarter: u32,
    pub events: Vec<GameEvent>,
    /// Portfolio value at the close of the previous quarter.
    pub baseline_value: f64,
    pub events_reviewed: bool,
    pub quiz_answers: BTreeMap<String, String>,
    pub quiz_submitted: bool,
    pub quiz_score: Option<f64>,
    pub quiz_passed: bool,
    pub rebalanced: bool,
    /// Set when the rebalance step was passed without trading.
    pub rebalance_skipped: bool,
    pub ai_reviewed: bool,
    pub performance_reviewed: bool,
}

impl QuarterProgress {
    pub fn open(quarter: u32, events: Vec<GameEvent>, baseline_value: f64) -> Self {
        QuarterProgress {
            quarter,
            events,
            baseline_value,
            events_reviewed: false,
            quiz_answers: BTreeMap::new(),
            quiz_submitted: false,
            quiz_score: None,
            quiz_passed: false,
            rebalanced: false,
            rebalance_skipped: false,
            ai_reviewed: false,
            performance_reviewed: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuarterRecord {
    pub quarter: u32,
    pub quiz_score: f64,
    pub quiz_passed: bool,
    pub diversification_score: f64,
    pub risk_score: f64,
    pub quarter_return: f64,
    pub portfolio_value: f64,
    pub total_return: f64,
    pub rebalanced: bool,
    pub completed_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameStatus {
    NotStarted,
    InProgress,
    Complete,
}

/// Trades staged during the rebalance step, applied only when the player
/// submits the rebalance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PendingRebalance {
    pub holdings: Vec<Holding>,
    pub cash: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameState {
    pub status: GameStatus,
    pub current_quarter: u32,
    pub portfolio: Vec<Holding>,
    pub cash: f64,
    pub starting_capital: f64,
    pub hints_remaining: u32,
    pub hints_used: u32,
    pub quarter_history: Vec<QuarterRecord>,
    pub current: Option<QuarterProgress>,
    pub pending: Option<PendingRebalance>,
    pub achievements: Vec<String>,
}

impl GameState {
    pub fn new(starting_capital: f64) -> Self {
        GameState {
            status: GameStatus::NotStarted,
            current_quarter: 0,
            portfolio: Vec::new(),
            cash: starting_capital,
            starting_capital,
            hints_remaining: INITIAL_HINTS,
            hints_used: 0,
            quarter_history: Vec::new(),
            current: None,
            pending: None,
            achievements: Vec::new(),
        }
    }

    pub fn invested_value(&self) -> f64 {
        self.portfolio.iter().map(|h| h.value).sum()
    }

    pub fn portfolio_value(&self) -> f64 {
        self.invested_value() + self.cash
    }

    /// Percent return on starting capital; 0 when starting capital is not positive.
    pub fn total_return(&self) -> f64 {
        if self.starting_capital > 0.0 {
            (self.portfolio_value() - self.starting_capital) / self.starting_capital * 100.0
        } else {
            0.0
        }
    }

    pub fn last_record(&self) -> Option<&QuarterRecord> {
        self.quarter_history.last()
    }
}

impl Default for GameState {
    fn default() -> Self {
        GameState::new(STARTING_CAPITAL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_state_has_full_cash_and_zero_return() {
        let state = GameState::default();
        assert_eq!(state.status, GameStatus::NotStarted);
        assert_eq!(state.portfolio_value(), STARTING_CAPITAL);
        assert_eq!(state.total_return(), 0.0);
        assert!(state.last_record().is_none());
    }

    #[test]
    fn holding_deserializes_with_missing_numbers() {
        let json = r#"{
            "stock": {"id": "X", "symbol": "X", "name": "X", "sector": "IT", "price": 10.0},
            "weight": 45.0
        }"#;
        let h: Holding = serde_json::from_str(json).unwrap();
        assert_eq!(h.weight, 45.0);
        assert_eq!(h.value, 0.0);
        assert_eq!(h.stock.change_percent, 0.0);
    }

    #[test]
    fn event_kind_serializes_snake_case() {
        let s = serde_json::to_string(&EventKind::Geopolitical).unwrap();
        assert_eq!(s, "\"geopolitical\"");
    }
}
