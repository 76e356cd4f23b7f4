// src/market.rs
use crate::models::{Confidence, EventKind, GameEvent, Holding, ShockProfile, Stock};
use rand::Rng;

/// Per-quarter price impact is clamped to this fraction either way.
pub const MAX_QUARTER_IMPACT: f64 = 0.06;

const STOCK_SENSITIVITY: f64 = 1.0;
const SECTOR_SENSITIVITY: f64 = 0.4;

#[rustfmt::skip]
const UNIVERSE: &[(&str, &str, &str, f64, f64, f64, f64, f64, f64)] = &[
    // id, name, sector, price, change, change%, market cap, pe, dividend
    ("TCS", "Tata Consultancy Services", "Technology", 3850.0, 45.0, 1.18, 1_400_000.0, 28.5, 1.2),
    ("INFY", "Infosys Limited", "Technology", 1720.0, -12.0, -0.69, 720_000.0, 25.8, 2.1),
    ("WIPRO", "Wipro Limited", "Technology", 445.0, 8.0, 1.83, 245_000.0, 22.1, 1.8),
    ("HDFCBANK", "HDFC Bank Limited", "Banking", 1650.0, 25.0, 1.54, 1_250_000.0, 18.5, 1.5),
    ("ICICIBANK", "ICICI Bank Limited", "Banking", 1180.0, -8.0, -0.67, 825_000.0, 16.2, 1.8),
    ("KOTAKBANK", "Kotak Mahindra Bank", "Banking", 1750.0, 15.0, 0.87, 345_000.0, 20.1, 0.8),
    ("RELIANCE", "Reliance Industries", "Oil & Gas", 2850.0, 35.0, 1.24, 1_925_000.0, 24.8, 0.7),
    ("ONGC", "Oil & Natural Gas Corp", "Oil & Gas", 285.0, 12.0, 4.40, 358_000.0, 8.5, 5.2),
    ("IOC", "Indian Oil Corporation", "Oil & Gas", 145.0, -3.0, -2.03, 205_000.0, 12.1, 4.1),
    ("SUNPHARMA", "Sun Pharmaceutical", "Pharmaceuticals", 1485.0, 28.0, 1.92, 356_000.0, 32.5, 1.1),
    ("DRREDDY", "Dr Reddys Laboratories", "Pharmaceuticals", 6250.0, -85.0, -1.34, 104_000.0, 18.9, 0.9),
    ("CIPLA", "Cipla Limited", "Pharmaceuticals", 1580.0, 22.0, 1.41, 128_000.0, 28.1, 1.4),
    ("MARUTI", "Maruti Suzuki India", "Automobiles", 12500.0, 185.0, 1.50, 378_000.0, 26.8, 1.8),
    ("TATAMOTORS", "Tata Motors Limited", "Automobiles", 785.0, -15.0, -1.88, 289_000.0, 15.2, 0.0),
    ("M&M", "Mahindra & Mahindra", "Automobiles", 2850.0, 45.0, 1.60, 356_000.0, 22.5, 1.2),
    ("HINDUNILVR", "Hindustan Unilever", "Consumer Goods", 2650.0, 18.0, 0.68, 622_000.0, 58.2, 1.9),
    ("ITC", "ITC Limited", "Consumer Goods", 485.0, 8.0, 1.68, 602_000.0, 28.5, 5.2),
    ("NESTLEIND", "Nestle India Limited", "Consumer Goods", 2450.0, -25.0, -1.01, 236_000.0, 78.5, 2.8),
    ("TATASTEEL", "Tata Steel Limited", "Metals", 145.0, 8.0, 5.84, 178_000.0, 45.2, 0.0),
    ("HINDALCO", "Hindalco Industries", "Metals", 485.0, 12.0, 2.54, 108_000.0, 18.5, 1.2),
    ("JSWSTEEL", "JSW Steel Limited", "Metals", 885.0, 25.0, 2.91, 218_000.0, 28.5, 0.8),
];

pub fn available_stocks() -> Vec<Stock> {
    UNIVERSE
        .iter()
        .map(|&(id, name, sector, price, change, change_percent, market_cap, pe, dividend)| Stock {
            id: id.to_string(),
            symbol: id.to_string(),
            name: name.to_string(),
            sector: sector.to_string(),
            price,
            change,
            change_percent,
            market_cap,
            pe,
            dividend,
        })
        .collect()
}

pub fn find_stock(id: &str) -> Option<Stock> {
    available_stocks().into_iter().find(|s| s.id == id)
}

struct MacroTemplate {
    title: &'static str,
    description: &'static str,
    sectors: &'static [&'static str],
    kind: EventKind,
}

const MACRO_EVENTS: &[MacroTemplate] = &[
    MacroTemplate {
        title: "RBI Policy Rate Change",
        description: "Reserve Bank of India announces policy rate decision affecting banking sector.",
        sectors: &["Banking", "Financial Services"],
        kind: EventKind::Policy,
    },
    MacroTemplate {
        title: "Global Trade Tensions",
        description: "International trade disputes impact export-oriented sectors.",
        sectors: &["Technology", "Pharmaceuticals", "Textiles"],
        kind: EventKind::Geopolitical,
    },
    MacroTemplate {
        title: "Crude Oil Price Volatility",
        description: "Significant movement in global crude oil prices.",
        sectors: &["Oil & Gas", "Automobiles", "Airlines"],
        kind: EventKind::Commodity,
    },
];

/// Events for `quarter`: earnings for the three largest holdings, sometimes a
/// macro shock and occasionally an unverified tip.
pub fn generate_quarter_events<R: Rng + ?Sized>(
    quarter: u32,
    portfolio: &[Holding],
    rng: &mut R,
) -> Vec<GameEvent> {
    let mut events = Vec::new();

    let mut top: Vec<&Holding> = portfolio.iter().collect();
    top.sort_by(|a, b| b.weight.partial_cmp(&a.weight).unwrap_or(std::cmp::Ordering::Equal));
    for holding in top.into_iter().take(3) {
        let beat = rng.gen::<f64>() > 0.4;
        let stock = &holding.stock;
        events.push(GameEvent {
            id: format!("earnings-{}-q{}", stock.id, quarter),
            title: format!(
                "{} Q{} Earnings {}",
                stock.name,
                quarter,
                if beat { "Beat" } else { "Miss" }
            ),
            kind: EventKind::Earnings,
            description: format!(
                "{} reported {} quarterly results.",
                stock.name,
                if beat { "better than expected" } else { "disappointing" }
            ),
            affected_sectors: vec![stock.sector.clone()],
            affected_stocks: vec![stock.id.clone()],
            direction: if beat { 1 } else { -1 },
            impact_score: rng.gen_range(20.0..60.0),
            confidence: Confidence::High,
            is_unverified_tip: false,
            shock_profile: ShockProfile::Impulse,
            decay_half_life: 4,
        });
    }

    if rng.gen::<f64>() > 0.6 {
        let template = &MACRO_EVENTS[rng.gen_range(0..MACRO_EVENTS.len())];
        let positive = rng.gen::<f64>() > 0.5;
        events.push(GameEvent {
            id: format!("macro-q{}-{}", quarter, events.len()),
            title: template.title.to_string(),
            kind: template.kind,
            description: template.description.to_string(),
            affected_sectors: template.sectors.iter().map(|s| s.to_string()).collect(),
            affected_stocks: Vec::new(),
            direction: if positive { 1 } else { -1 },
            impact_score: rng.gen_range(15.0..45.0),
            confidence: Confidence::Medium,
            is_unverified_tip: false,
            shock_profile: ShockProfile::Step,
            decay_half_life: 8,
        });
    }

    if rng.gen::<f64>() > 0.8 {
        let (id, name, sector, ..) = UNIVERSE[rng.gen_range(0..UNIVERSE.len())];
        events.push(GameEvent {
            id: format!("tip-q{}-{}", quarter, events.len()),
            title: format!("Hot Tip: {} Set to Soar", name),
            kind: EventKind::Sentiment,
            description: "Unverified market rumor suggests significant upside potential.".to_string(),
            affected_sectors: vec![sector.to_string()],
            affected_stocks: vec![id.to_string()],
            direction: 1,
            impact_score: rng.gen_range(10.0..35.0),
            confidence: Confidence::Low,
            is_unverified_tip: true,
            shock_profile: ShockProfile::Ramp,
            decay_half_life: 2,
        });
    }

    events
}

/// Fractional price move for one holding from all matching events, clamped
/// to `MAX_QUARTER_IMPACT`.
pub fn event_impact(holding: &Holding, events: &[GameEvent]) -> f64 {
    let total: f64 = events
        .iter()
        .filter_map(|e| {
            let stock_hit = e.affected_stocks.iter().any(|s| *s == holding.stock.id);
            let sector_hit = e.affected_sectors.iter().any(|s| *s == holding.stock.sector);
            if !stock_hit && !sector_hit {
                return None;
            }
            let sensitivity = if stock_hit { STOCK_SENSITIVITY } else { SECTOR_SENSITIVITY };
            let signed = e.impact_score / 100.0 * f64::from(e.direction);
            Some(signed * sensitivity * e.confidence.multiplier())
        })
        .sum();
    total.clamp(-MAX_QUARTER_IMPACT, MAX_QUARTER_IMPACT)
}

/// Reprice every holding by its event impact. Quantities and weights are
/// left as they are.
pub fn apply_event_impacts(portfolio: &[Holding], events: &[GameEvent]) -> Vec<Holding> {
    portfolio
        .iter()
        .map(|holding| {
            let impact = event_impact(holding, events);
            let old_price = holding.stock.price;
            let new_price = old_price * (1.0 + impact);
            let mut updated = holding.clone();
            updated.stock.price = new_price;
            updated.stock.change = new_price - old_price;
            updated.stock.change_percent = impact * 100.0;
            updated.value = holding.quantity * new_price;
            updated
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    fn hold(id: &str, quantity: f64, weight: f64) -> Holding {
        let stock = find_stock(id).unwrap();
        Holding {
            value: quantity * stock.price,
            avg_price: stock.price,
            stock,
            quantity,
            weight,
        }
    }

    fn event(
        stocks: &[&str],
        sectors: &[&str],
        direction: i8,
        impact: f64,
        confidence: Confidence,
    ) -> GameEvent {
        GameEvent {
            id: "e".into(),
            title: "t".into(),
            kind: EventKind::Earnings,
            description: String::new(),
            affected_sectors: sectors.iter().map(|s| s.to_string()).collect(),
            affected_stocks: stocks.iter().map(|s| s.to_string()).collect(),
            direction,
            impact_score: impact,
            confidence,
            is_unverified_tip: false,
            shock_profile: ShockProfile::Impulse,
            decay_half_life: 4,
        }
    }

    #[test]
    fn universe_covers_seven_sectors() {
        let stocks = available_stocks();
        assert_eq!(stocks.len(), 21);
        let mut sectors: Vec<_> = stocks.iter().map(|s| s.sector.clone()).collect();
        sectors.sort();
        sectors.dedup();
        assert_eq!(sectors.len(), 7);
        assert!(find_stock("M&M").is_some());
        assert!(find_stock("NOPE").is_none());
    }

    #[test]
    fn empty_portfolio_gets_no_earnings_events() {
        let mut rng = StdRng::seed_from_u64(1);
        for q in 1..=12 {
            let events = generate_quarter_events(q, &[], &mut rng);
            assert!(events.iter().all(|e| e.kind != EventKind::Earnings));
        }
    }

    #[test]
    fn earnings_target_top_three_holdings() {
        let p = vec![
            hold("TCS", 10.0, 10.0),
            hold("ITC", 10.0, 40.0),
            hold("ONGC", 10.0, 30.0),
            hold("CIPLA", 10.0, 20.0),
        ];
        let mut rng = StdRng::seed_from_u64(42);
        let events = generate_quarter_events(2, &p, &mut rng);
        let earnings: Vec<_> = events.iter().filter(|e| e.kind == EventKind::Earnings).collect();
        assert_eq!(earnings.len(), 3);
        assert_eq!(earnings[0].affected_stocks, vec!["ITC".to_string()]);
        assert_eq!(earnings[1].affected_stocks, vec!["ONGC".to_string()]);
        assert_eq!(earnings[2].affected_stocks, vec!["CIPLA".to_string()]);
        for e in earnings {
            assert!(e.impact_score >= 20.0 && e.impact_score < 60.0);
            assert!(e.id.ends_with("-q2"));
        }
    }

    #[test]
    fn generation_is_reproducible_for_a_seed() {
        let p = vec![hold("TCS", 10.0, 50.0)];
        let a = generate_quarter_events(3, &p, &mut StdRng::seed_from_u64(9));
        let b = generate_quarter_events(3, &p, &mut StdRng::seed_from_u64(9));
        assert_eq!(a, b);
    }

    #[test]
    fn stock_hit_outweighs_sector_hit() {
        let h = hold("TCS", 1.0, 100.0);
        let direct = event_impact(&h, &[event(&["TCS"], &[], 1, 5.0, Confidence::High)]);
        let sector = event_impact(&h, &[event(&[], &["Technology"], 1, 5.0, Confidence::High)]);
        assert!((direct - 0.05).abs() < 1e-12);
        assert!((sector - 0.02).abs() < 1e-12);
        let medium = event_impact(&h, &[event(&["TCS"], &[], -1, 4.0, Confidence::Medium)]);
        assert!((medium + 0.03).abs() < 1e-12);
    }

    #[test]
    fn impact_is_clamped() {
        let h = hold("TCS", 2.0, 100.0);
        let events = vec![event(&["TCS"], &[], -1, 60.0, Confidence::High)];
        assert_eq!(event_impact(&h, &events), -MAX_QUARTER_IMPACT);
        let updated = apply_event_impacts(&[h.clone()], &events);
        assert!((updated[0].stock.price - 3850.0 * 0.94).abs() < 1e-9);
        assert!((updated[0].value - 2.0 * 3850.0 * 0.94).abs() < 1e-9);
        assert!((updated[0].stock.change_percent + 6.0).abs() < 1e-9);
    }

    #[test]
    fn unaffected_holdings_keep_value() {
        let h = hold("ITC", 3.0, 100.0);
        let tcs_beat = event(&["TCS"], &["Technology"], 1, 50.0, Confidence::High);
        let updated = apply_event_impacts(&[h.clone()], &[tcs_beat]);
        assert_eq!(updated[0].value, h.value);
        assert_eq!(updated[0].stock.change, 0.0);
    }
}
