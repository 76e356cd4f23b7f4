// src/config.rs
use crate::models::STARTING_CAPITAL;
use std::net::SocketAddr;
use std::str::FromStr;

/// Heuristic limits used by the scorer and the goal calculator.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Thresholds {
    /// Percent of the portfolio above which a single sector is over-concentrated.
    pub sector_limit: f64,
    /// Percent of the portfolio above which a single holding is over-concentrated.
    pub stock_limit: f64,
    /// Portfolios with fewer holdings than this get a low-diversification warning.
    pub min_holdings: usize,
    /// Fraction of the required monthly saving that still counts as feasible.
    pub feasibility_tolerance: f64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Thresholds {
            sector_limit: 40.0,
            stock_limit: 25.0,
            min_holdings: 5,
            feasibility_tolerance: 0.9,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub addr: SocketAddr,
    pub jwt_secret: String,
    pub starting_capital: f64,
    pub thresholds: Thresholds,
    /// Fixed RNG seed for event generation; random per session when unset.
    pub seed: Option<u64>,
}

fn env_parse<T: FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok().and_then(|v| v.parse().ok())
}

impl Config {
    pub fn from_env() -> Self {
        let defaults = Config::default();
        let limits = defaults.thresholds;
        Self {
            addr: env_parse("QUEST_ADDR").unwrap_or(defaults.addr),
            jwt_secret: std::env::var("QUEST_JWT_SECRET").unwrap_or(defaults.jwt_secret),
            starting_capital: env_parse("QUEST_STARTING_CAPITAL")
                .unwrap_or(defaults.starting_capital),
            thresholds: Thresholds {
                sector_limit: env_parse("QUEST_SECTOR_LIMIT").unwrap_or(limits.sector_limit),
                stock_limit: env_parse("QUEST_STOCK_LIMIT").unwrap_or(limits.stock_limit),
                min_holdings: env_parse("QUEST_MIN_HOLDINGS").unwrap_or(limits.min_holdings),
                feasibility_tolerance: env_parse("QUEST_FEASIBILITY_TOLERANCE")
                    .unwrap_or(limits.feasibility_tolerance),
            },
            seed: env_parse("QUEST_SEED"),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            addr: SocketAddr::from(([127, 0, 0, 1], 3030)),
            jwt_secret: "dev_secret_key".to_string(),
            starting_capital: STARTING_CAPITAL,
            thresholds: Thresholds::default(),
            seed: None,
        }
    }
}
