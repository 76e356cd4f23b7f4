// src/tools.rs
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GoalInput {
    #[serde(default)]
    pub specific: String,
    pub target_amount: f64,
    pub monthly_saving: f64,
    #[serde(default)]
    pub reason: String,
    pub years: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GoalPlan {
    pub months: u32,
    pub monthly_needed: f64,
    pub feasible: bool,
    pub statement: String,
}

fn sanitize(v: f64) -> f64 {
    if v.is_finite() {
        v
    } else {
        0.0
    }
}

/// A goal is feasible when the planned monthly saving reaches `tolerance`
/// of what is needed. The timeframe is at least one month.
pub fn goal_feasibility(input: &GoalInput, tolerance: f64) -> GoalPlan {
    let total = sanitize(input.target_amount);
    let per_month = sanitize(input.monthly_saving);
    let years = sanitize(input.years);
    let months = (years * 12.0).round().max(1.0) as u32;
    let monthly_needed = total / f64::from(months);
    let feasible = per_month >= monthly_needed * tolerance;

    let blank = input.specific.is_empty() && input.reason.is_empty();
    let statement = if blank && total == 0.0 && per_month == 0.0 && years == 0.0 {
        String::new()
    } else {
        format!(
            "I will {} by saving {:.0} in {} year{}, by setting aside {:.0} per month, because {}.",
            if input.specific.is_empty() { "my goal" } else { input.specific.as_str() },
            total,
            years,
            if years == 1.0 { "" } else { "s" },
            per_month,
            if input.reason.is_empty() { "it matters to me" } else { input.reason.as_str() },
        )
    };

    GoalPlan {
        months,
        monthly_needed,
        feasible,
        statement,
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum CalculatorInput {
    Loan {
        principal: f64,
        annual_rate: f64,
        years: f64,
    },
    Retirement {
        current_age: f64,
        retirement_age: f64,
        monthly_investment: f64,
        annual_return: f64,
    },
    NetWorth {
        assets: Vec<f64>,
        liabilities: Vec<f64>,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum CalculatorResult {
    Loan {
        emi: f64,
        total_interest: f64,
        total_payment: f64,
    },
    Retirement {
        corpus: f64,
        invested: f64,
        returns: f64,
    },
    NetWorth {
        assets: f64,
        liabilities: f64,
        net_worth: f64,
        /// Share of assets not consumed by liabilities, 0..=100.
        health: f64,
        hint: &'static str,
    },
}

pub fn loan_emi(principal: f64, annual_rate: f64, years: f64) -> CalculatorResult {
    let p = sanitize(principal);
    let r = sanitize(annual_rate) / 12.0 / 100.0;
    let n = (sanitize(years) * 12.0).round().max(0.0);
    let factor = if r > 0.0 { (1.0 + r).powf(n) } else { 1.0 };
    let emi = if n > 0.0 {
        if r > 0.0 {
            p * r * factor / (factor - 1.0)
        } else {
            p / n
        }
    } else {
        0.0
    };
    let total_payment = emi * n;
    CalculatorResult::Loan {
        emi,
        total_interest: (total_payment - p).max(0.0),
        total_payment,
    }
}

/// Corpus of an end-of-month SIP.
pub fn retirement_corpus(
    current_age: f64,
    retirement_age: f64,
    monthly_investment: f64,
    annual_return: f64,
) -> CalculatorResult {
    let months = ((sanitize(retirement_age) - sanitize(current_age)) * 12.0).round().max(0.0);
    let m = sanitize(monthly_investment);
    let i = sanitize(annual_return) / 12.0 / 100.0;
    let corpus = if i > 0.0 {
        m * (((1.0 + i).powf(months) - 1.0) / i)
    } else {
        m * months
    };
    let invested = m * months;
    CalculatorResult::Retirement {
        corpus,
        invested,
        returns: (corpus - invested).max(0.0),
    }
}

pub fn net_worth(assets: &[f64], liabilities: &[f64]) -> CalculatorResult {
    let asset_total: f64 = assets.iter().copied().map(sanitize).sum();
    let liability_total: f64 = liabilities.iter().copied().map(sanitize).sum();
    let net = asset_total - liability_total;
    let health = if asset_total == 0.0 {
        0.0
    } else {
        ((asset_total - liability_total) / asset_total * 100.0).clamp(0.0, 100.0)
    };
    let hint = if net >= 0.0 {
        "Your assets exceed your liabilities. Consider allocating more to investments to grow wealth steadily."
    } else {
        "Your liabilities exceed your assets. Try reducing high-interest debt (e.g., credit cards) first."
    };
    CalculatorResult::NetWorth {
        assets: asset_total,
        liabilities: liability_total,
        net_worth: net,
        health,
        hint,
    }
}

pub fn calculate(input: &CalculatorInput) -> CalculatorResult {
    match input {
        CalculatorInput::Loan {
            principal,
            annual_rate,
            years,
        } => loan_emi(*principal, *annual_rate, *years),
        CalculatorInput::Retirement {
            current_age,
            retirement_age,
            monthly_investment,
            annual_return,
        } => retirement_corpus(*current_age, *retirement_age, *monthly_investment, *annual_return),
        CalculatorInput::NetWorth { assets, liabilities } => net_worth(assets, liabilities),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Amount {
    BelowTwoLakh,
    AboveTwoLakh,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Urgency {
    Instant,
    CanWait,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Beneficiary {
    VpaOrQr,
    AccountAndIfsc,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum PaymentMethod {
    Upi,
    Imps,
    Rtgs,
    Neft,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentQuery {
    pub amount: Amount,
    pub urgency: Urgency,
    pub beneficiary: Beneficiary,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PaymentDecision {
    pub method: PaymentMethod,
    pub tagline: &'static str,
    pub points: Vec<&'static str>,
}

pub fn recommend_payment(query: &PaymentQuery) -> PaymentDecision {
    if query.beneficiary == Beneficiary::VpaOrQr {
        let mut points = vec![
            "24x7 availability, usually free",
            "Great for everyday payments and small-to-medium amounts",
        ];
        if query.amount == Amount::AboveTwoLakh {
            points.push("Note: UPI limits vary by bank; large transfers may require IMPS/RTGS");
        }
        return PaymentDecision {
            method: PaymentMethod::Upi,
            tagline: "Instant, convenient transfers using VPA/QR across banks",
            points,
        };
    }

    match (query.urgency, query.amount) {
        (Urgency::Instant, Amount::AboveTwoLakh) => PaymentDecision {
            method: PaymentMethod::Rtgs,
            tagline: "High-value transfers with near-real-time settlement",
            points: vec![
                "Best for urgent, high-value payments",
                "Typically available during banking hours",
                "Use when immediate credit is required",
            ],
        },
        (Urgency::Instant, Amount::BelowTwoLakh) => PaymentDecision {
            method: PaymentMethod::Imps,
            tagline: "Instant transfers using account + IFSC, 24x7",
            points: vec![
                "Suitable for small to medium amounts",
                "Works anytime, including holidays",
            ],
        },
        (Urgency::CanWait, _) => PaymentDecision {
            method: PaymentMethod::Neft,
            tagline: "Reliable bank transfers for non-urgent payments",
            points: vec![
                "Good for scheduled or non-urgent transfers",
                "Works for any transaction value",
            ],
        },
    }
}
