// src/guidance.rs
use crate::config::Thresholds;
use crate::models::GameState;
use crate::scoring::{max_sector_weight, max_stock_weight};
use serde::Serialize;

const VOLATILE_SECTORS: [&str; 3] = ["Technology", "Metals", "Oil & Gas"];
const VOLATILE_EXPOSURE_LIMIT: f64 = 50.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum HintCategory {
    Diversification,
    Risk,
    Rebalancing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Hint {
    pub id: &'static str,
    pub category: HintCategory,
    pub title: &'static str,
    pub content: String,
    pub priority: Priority,
}

/// Hints for the player's current portfolio, highest priority first.
pub fn contextual_hints(state: &GameState, thresholds: &Thresholds) -> Vec<Hint> {
    let portfolio = &state.portfolio;
    let mut hints = Vec::new();

    if max_stock_weight(portfolio) > thresholds.stock_limit {
        hints.push(Hint {
            id: "high-concentration",
            category: HintCategory::Diversification,
            title: "High Stock Concentration Detected",
            content: format!(
                "SEBI guidelines recommend avoiding concentration of more than {}% in a single stock. \
                 Consider reducing your largest holding and diversifying across more stocks to minimize company-specific risk.",
                thresholds.stock_limit
            ),
            priority: Priority::High,
        });
    }

    if max_sector_weight(portfolio) > thresholds.sector_limit {
        hints.push(Hint {
            id: "sector-concentration",
            category: HintCategory::Diversification,
            title: "Sector Over-Concentration",
            content: "Your portfolio has significant exposure to one sector. Diversify across different sectors like \
                      Technology, Banking, Healthcare, and Consumer Goods to reduce sector-specific risks."
                .to_string(),
            priority: Priority::High,
        });
    }

    if portfolio.len() < thresholds.min_holdings {
        hints.push(Hint {
            id: "insufficient-diversification",
            category: HintCategory::Diversification,
            title: "Increase Portfolio Diversification",
            content: "Consider holding 8-12 stocks across different sectors for optimal diversification. This helps \
                      reduce unsystematic risk while maintaining manageable portfolio complexity."
                .to_string(),
            priority: Priority::Medium,
        });
    }

    let volatile_exposure: f64 = portfolio
        .iter()
        .filter(|h| VOLATILE_SECTORS.contains(&h.stock.sector.as_str()))
        .map(|h| h.weight)
        .sum();
    if volatile_exposure > VOLATILE_EXPOSURE_LIMIT {
        hints.push(Hint {
            id: "high-volatility-exposure",
            category: HintCategory::Risk,
            title: "High Volatility Sector Exposure",
            content: "Your portfolio has significant exposure to volatile sectors. Consider balancing with stable \
                      sectors like Consumer Goods, Utilities, or Banking to reduce overall portfolio volatility."
                .to_string(),
            priority: Priority::Medium,
        });
    }

    if let Some(q) = state.current.as_ref() {
        if q.quiz_passed && !q.rebalanced {
            hints.push(Hint {
                id: "rebalance-reminder",
                category: HintCategory::Rebalancing,
                title: "Time to Rebalance",
                content: format!(
                    "You passed the Q{} quiz. Review this quarter's events and adjust your holdings before moving on.",
                    q.quarter
                ),
                priority: Priority::Low,
            });
        }
    }

    hints.sort_by(|a, b| b.priority.cmp(&a.priority));
    hints
}
