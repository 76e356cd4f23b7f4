// src/risk.rs
use crate::models::Stock;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    Buy,
    Sell,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderType {
    Market,
    Limit,
    #[serde(rename = "SL")]
    StopLoss,
    #[serde(rename = "SL-M")]
    StopLossMarket,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TradingLevel {
    Beginner,
    Intermediate,
    Advanced,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub quantity: f64,
    pub avg_price: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderRiskInput {
    pub symbol: String,
    pub side: Side,
    pub quantity: f64,
    pub price: Option<f64>,
    pub order_type: OrderType,
    pub portfolio_value: f64,
    pub available_cash: f64,
    pub current_position: Option<Position>,
    pub stock: Option<Stock>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RiskAssessment {
    pub risk_level: RiskLevel,
    pub risk_score: f64,
    pub warnings: Vec<String>,
    pub nudges: Vec<String>,
    pub should_confirm: bool,
    pub delay_seconds: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EducationalContent {
    pub title: &'static str,
    pub content: &'static str,
    pub learn_more_url: &'static str,
}

/// Percentage of `whole`, or 0 when `whole` is not positive.
fn percent_of(part: f64, whole: f64) -> f64 {
    if whole > 0.0 {
        part / whole * 100.0
    } else {
        0.0
    }
}

fn volatility_risk(stock: Option<&Stock>) -> f64 {
    let Some(stock) = stock else {
        return 50.0;
    };
    let change = stock.change_percent.abs();
    if change > 10.0 {
        90.0
    } else if change > 5.0 {
        70.0
    } else if change > 2.0 {
        50.0
    } else {
        30.0
    }
}

fn leverage_risk(order_value: f64, available_cash: f64) -> f64 {
    let leverage = if available_cash > 0.0 {
        order_value / available_cash
    } else if order_value > 0.0 {
        f64::INFINITY
    } else {
        0.0
    };
    if leverage > 2.0 {
        90.0
    } else if leverage > 1.5 {
        70.0
    } else if leverage > 1.0 {
        50.0
    } else {
        20.0
    }
}

fn concentration_risk(concentration_percent: f64) -> f64 {
    if concentration_percent > 25.0 {
        90.0
    } else if concentration_percent > 15.0 {
        70.0
    } else if concentration_percent > 10.0 {
        50.0
    } else {
        30.0
    }
}

pub fn assess_order(input: &OrderRiskInput) -> RiskAssessment {
    let price = input
        .price
        .or_else(|| input.stock.as_ref().map(|s| s.price))
        .unwrap_or(0.0);
    let order_value = input.quantity * price;

    let exposure = order_value
        + input
            .current_position
            .map(|p| p.quantity * p.avg_price)
            .unwrap_or(0.0);
    let concentration_percent = percent_of(exposure, input.portfolio_value);
    let position_percent = percent_of(order_value, input.portfolio_value);

    let risk_score = (volatility_risk(input.stock.as_ref()) * 0.3
        + leverage_risk(order_value, input.available_cash) * 0.25
        + concentration_risk(concentration_percent) * 0.25
        + position_percent * 2.0)
        .round();

    let risk_level = if risk_score >= 80.0 {
        RiskLevel::High
    } else if risk_score >= 50.0 {
        RiskLevel::Medium
    } else {
        RiskLevel::Low
    };

    let mut warnings = Vec::new();
    let mut nudges = Vec::new();

    if position_percent > 20.0 {
        warnings.push(format!("This order represents {:.1}% of your portfolio", position_percent));
        nudges.push("Consider reducing position size to manage risk".to_string());
    }

    if let Some(stock) = input.stock.as_ref() {
        if stock.change_percent.abs() > 5.0 {
            warnings.push(format!("{} has moved {:.2}% today", input.symbol, stock.change_percent));
            nudges.push("High volatility detected - consider using limit orders".to_string());
        }
    }

    if concentration_percent > 15.0 {
        warnings.push(format!(
            "Total exposure to {} will be {:.1}% of portfolio",
            input.symbol, concentration_percent
        ));
        nudges.push("Consider diversifying across multiple stocks".to_string());
    }

    if order_value > input.available_cash {
        warnings.push("Insufficient cash - this order may be rejected".to_string());
        nudges.push("Consider reducing order size or adding funds".to_string());
    }

    if input.order_type == OrderType::Market && risk_level != RiskLevel::Low {
        warnings.push("Market orders execute at current market price".to_string());
        nudges.push("Consider using a limit order to control execution price".to_string());
    }

    let should_confirm = risk_level == RiskLevel::High || warnings.len() > 2;
    let delay_seconds = (risk_level == RiskLevel::High).then_some(5);

    RiskAssessment {
        risk_level,
        risk_score,
        warnings,
        nudges,
        should_confirm,
        delay_seconds,
    }
}

/// Beginners get a more conservative assessment and always confirm.
pub fn assess_for_level(input: &OrderRiskInput, level: TradingLevel) -> RiskAssessment {
    let mut assessment = assess_order(input);
    if level == TradingLevel::Beginner {
        assessment.risk_score = (assessment.risk_score + 20.0).min(100.0);
        assessment.risk_level = match assessment.risk_level {
            RiskLevel::Low => RiskLevel::Medium,
            RiskLevel::Medium | RiskLevel::High => RiskLevel::High,
        };
        assessment.nudges.push("New to trading? Start with smaller positions to learn".to_string());
        assessment.nudges.push("Consider paper trading first to practice strategies".to_string());
        assessment.should_confirm = true;
        assessment.delay_seconds = Some(8);
    }
    assessment
}

pub fn educational_content(assessment: &RiskAssessment) -> EducationalContent {
    if assessment.risk_level == RiskLevel::High {
        return EducationalContent {
            title: "High-Risk Trade Detected",
            content: "This trade has elevated risk factors. Consider reviewing your strategy and position sizing. High-risk trades can lead to significant losses.",
            learn_more_url: "/learn/risk-management",
        };
    }
    if assessment.warnings.iter().any(|w| w.contains("moved")) {
        return EducationalContent {
            title: "Understanding Volatility",
            content: "This stock is experiencing high volatility. Volatile stocks can move quickly in either direction, creating both opportunities and risks.",
            learn_more_url: "/learn/volatility-trading",
        };
    }
    if assessment.warnings.iter().any(|w| w.contains("exposure")) {
        return EducationalContent {
            title: "Portfolio Diversification",
            content: "You have significant exposure to this stock. Diversification across multiple assets can help reduce overall portfolio risk.",
            learn_more_url: "/learn/diversification",
        };
    }
    EducationalContent {
        title: "Trade Analysis Complete",
        content: "Your trade has been analyzed for risk factors. Always remember to trade within your risk tolerance.",
        learn_more_url: "/learn/trading-basics",
    }
}
