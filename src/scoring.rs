// src/scoring.rs
use crate::config::Thresholds;
use crate::models::{GameState, GameStatus, Holding, TOTAL_QUARTERS};
use serde::Serialize;
use std::collections::BTreeMap;

fn finite_or_zero(v: f64) -> f64 {
    if v.is_finite() {
        v
    } else {
        0.0
    }
}

pub fn sector_weights(holdings: &[Holding]) -> BTreeMap<String, f64> {
    let mut weights = BTreeMap::new();
    for h in holdings {
        *weights.entry(h.stock.sector.clone()).or_insert(0.0) += finite_or_zero(h.weight);
    }
    weights
}

pub fn max_stock_weight(holdings: &[Holding]) -> f64 {
    holdings
        .iter()
        .map(|h| finite_or_zero(h.weight))
        .fold(0.0, f64::max)
}

pub fn max_sector_weight(holdings: &[Holding]) -> f64 {
    sector_weights(holdings).values().copied().fold(0.0, f64::max)
}

pub fn is_sector_over_concentrated(holdings: &[Holding], limit: f64) -> bool {
    sector_weights(holdings).values().any(|w| *w > limit)
}

pub fn is_stock_over_concentrated(holdings: &[Holding], limit: f64) -> bool {
    max_stock_weight(holdings) > limit
}

/// Herfindahl-Hirschman index over percentage weights, on a 0..1 scale.
fn hhi<I: IntoIterator<Item = f64>>(weights: I) -> f64 {
    weights
        .into_iter()
        .map(|w| {
            let w = finite_or_zero(w) / 100.0;
            w * w
        })
        .sum()
}

/// Mean of stock-level and sector-level `(1 - HHI) * 100`, each floored at 0.
pub fn diversification_score(holdings: &[Holding]) -> f64 {
    if holdings.is_empty() {
        return 0.0;
    }
    let stock_hhi = hhi(holdings.iter().map(|h| h.weight));
    let sector_hhi = hhi(sector_weights(holdings).into_values());
    let stock_div = ((1.0 - stock_hhi) * 100.0).max(0.0);
    let sector_div = ((1.0 - sector_hhi) * 100.0).max(0.0);
    (stock_div + sector_div) / 2.0
}

pub fn sector_risk_weight(sector: &str) -> f64 {
    match sector {
        "Technology" => 1.2,
        "Banking" => 0.8,
        "Oil & Gas" => 1.1,
        "Pharmaceuticals" => 0.9,
        "Automobiles" => 1.0,
        "Consumer Goods" => 0.7,
        "Metals" => 1.3,
        _ => 1.0,
    }
}

pub fn risk_score(holdings: &[Holding]) -> f64 {
    if holdings.is_empty() {
        return 0.0;
    }
    let weighted: f64 = holdings
        .iter()
        .map(|h| finite_or_zero(h.weight) / 100.0 * sector_risk_weight(&h.stock.sector))
        .sum();
    (weighted * 50.0).clamp(0.0, 100.0)
}

/// Recompute each holding's weight from its value. Weights are zeroed when
/// nothing is invested.
pub fn normalize_weights(holdings: &mut [Holding]) {
    let total: f64 = holdings.iter().map(|h| finite_or_zero(h.value)).sum();
    for h in holdings.iter_mut() {
        h.weight = if total > 0.0 {
            finite_or_zero(h.value) / total * 100.0
        } else {
            0.0
        };
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConcentrationReport {
    pub holdings_count: usize,
    pub sector_weights: BTreeMap<String, f64>,
    pub max_sector_weight: f64,
    pub max_stock_weight: f64,
    pub sector_over_concentrated: bool,
    pub stock_over_concentrated: bool,
    pub low_diversification: bool,
}

/// Concentration flags for a portfolio. An empty portfolio raises no flags.
pub fn concentration(holdings: &[Holding], thresholds: &Thresholds) -> ConcentrationReport {
    let sector_weights = sector_weights(holdings);
    let max_sector_weight = sector_weights.values().copied().fold(0.0, f64::max);
    let max_stock_weight = max_stock_weight(holdings);
    ConcentrationReport {
        holdings_count: holdings.len(),
        sector_over_concentrated: is_sector_over_concentrated(holdings, thresholds.sector_limit),
        stock_over_concentrated: is_stock_over_concentrated(holdings, thresholds.stock_limit),
        low_diversification: !holdings.is_empty() && holdings.len() < thresholds.min_holdings,
        sector_weights,
        max_sector_weight,
        max_stock_weight,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AdvanceLabel {
    ProceedToNextQuarter,
    FinishQuest,
}

impl AdvanceLabel {
    pub fn for_quarter(quarter: u32) -> Self {
        if quarter >= TOTAL_QUARTERS {
            AdvanceLabel::FinishQuest
        } else {
            AdvanceLabel::ProceedToNextQuarter
        }
    }

    pub fn text(&self) -> &'static str {
        match self {
            AdvanceLabel::ProceedToNextQuarter => "Proceed to Next Quarter",
            AdvanceLabel::FinishQuest => "Finish Quest",
        }
    }
}

pub fn quiz_gate(state: &GameState) -> bool {
    state.status == GameStatus::InProgress
        && state
            .current
            .as_ref()
            .map(|q| q.quarter == state.current_quarter && q.quiz_passed)
            .unwrap_or(false)
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Scorecard {
    pub quarter: u32,
    pub portfolio_value: f64,
    pub invested: f64,
    pub cash: f64,
    pub total_return: f64,
    pub concentration: ConcentrationReport,
    /// Surfaced from the most recent completed quarter.
    pub diversification_score: f64,
    pub risk_score: f64,
    /// Computed from the holdings as they stand now.
    pub live_diversification_score: f64,
    pub live_risk_score: f64,
    pub quiz_passed: bool,
    pub can_rebalance: bool,
    pub can_advance: bool,
    pub advance_label: AdvanceLabel,
    pub advance_text: &'static str,
}

pub fn scorecard(state: &GameState, thresholds: &Thresholds) -> Scorecard {
    let quiz_passed = quiz_gate(state);
    let (rebalanced, reviewed) = state
        .current
        .as_ref()
        .map(|q| (q.rebalanced, q.performance_reviewed))
        .unwrap_or((false, false));
    let label = AdvanceLabel::for_quarter(state.current_quarter);
    Scorecard {
        quarter: state.current_quarter,
        portfolio_value: state.portfolio_value(),
        invested: state.invested_value(),
        cash: state.cash,
        total_return: state.total_return(),
        concentration: concentration(&state.portfolio, thresholds),
        diversification_score: state.last_record().map(|r| r.diversification_score).unwrap_or(0.0),
        risk_score: state.last_record().map(|r| r.risk_score).unwrap_or(0.0),
        live_diversification_score: diversification_score(&state.portfolio),
        live_risk_score: risk_score(&state.portfolio),
        quiz_passed,
        can_rebalance: quiz_passed && !rebalanced,
        can_advance: quiz_passed && rebalanced && reviewed,
        advance_label: label,
        advance_text: label.text(),
    }
}
