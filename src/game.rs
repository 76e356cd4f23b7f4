// src/game.rs
use crate::config::Thresholds;
use crate::error::GameError;
use crate::guidance::{contextual_hints, Hint};
use crate::market::{apply_event_impacts, find_stock, generate_quarter_events};
use crate::models::{
    GameState, GameStatus, Holding, PendingRebalance, QuarterProgress, QuarterRecord,
    TOTAL_QUARTERS,
};
use crate::quiz::{build_questions, grade, QuizQuestion, QuizResult};
use crate::report::{build_report, evaluate_achievements, GameReport};
use crate::scoring::{self, normalize_weights, AdvanceLabel, Scorecard};
use chrono::Utc;
use log::{debug, info};
use rand::{rngs::StdRng, SeedableRng};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum JourneyStep {
    ReviewEvents,
    Quiz,
    Rebalance,
    AiReview,
    PerformanceReview,
    Advance,
}

impl JourneyStep {
    pub fn of(q: &QuarterProgress) -> Self {
        if !q.events_reviewed {
            JourneyStep::ReviewEvents
        } else if !q.quiz_passed {
            JourneyStep::Quiz
        } else if !q.rebalanced {
            JourneyStep::Rebalance
        } else if !q.ai_reviewed {
            JourneyStep::AiReview
        } else if !q.performance_reviewed {
            JourneyStep::PerformanceReview
        } else {
            JourneyStep::Advance
        }
    }
}

pub struct GameSession {
    state: GameState,
    thresholds: Thresholds,
    rng: StdRng,
}

fn positive_amount(amount: f64) -> f64 {
    if amount.is_finite() {
        amount.max(0.0)
    } else {
        0.0
    }
}

impl GameSession {
    pub fn new(starting_capital: f64, thresholds: Thresholds, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        GameSession {
            state: GameState::new(starting_capital),
            thresholds,
            rng,
        }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    fn progress(&self) -> Result<&QuarterProgress, GameError> {
        match self.state.status {
            GameStatus::NotStarted => Err(GameError::NotStarted),
            GameStatus::Complete => Err(GameError::AlreadyComplete),
            GameStatus::InProgress => self.state.current.as_ref().ok_or(GameError::NotStarted),
        }
    }

    fn progress_mut(&mut self) -> Result<&mut QuarterProgress, GameError> {
        match self.state.status {
            GameStatus::NotStarted => Err(GameError::NotStarted),
            GameStatus::Complete => Err(GameError::AlreadyComplete),
            GameStatus::InProgress => self.state.current.as_mut().ok_or(GameError::NotStarted),
        }
    }

    pub fn start(&mut self) {
        let mut state = GameState::new(self.state.starting_capital);
        let events = generate_quarter_events(1, &state.portfolio, &mut self.rng);
        state.status = GameStatus::InProgress;
        state.current_quarter = 1;
        state.current = Some(QuarterProgress::open(1, events, state.starting_capital));
        self.state = state;
        info!("Quest started with capital {:.2}", self.state.starting_capital);
    }

    pub fn reset(&mut self) {
        self.state = GameState::new(self.state.starting_capital);
        info!("Quest reset");
    }

    pub fn step(&self) -> Option<JourneyStep> {
        self.progress().ok().map(JourneyStep::of)
    }

    pub fn advance_label(&self) -> Result<AdvanceLabel, GameError> {
        self.progress()?;
        Ok(AdvanceLabel::for_quarter(self.state.current_quarter))
    }

    pub fn mark_events_reviewed(&mut self) -> Result<(), GameError> {
        let q = self.progress_mut()?;
        q.events_reviewed = true;
        debug!("Q{} events reviewed", q.quarter);
        Ok(())
    }

    pub fn questions(&self) -> Result<Vec<QuizQuestion>, GameError> {
        Ok(build_questions(&self.progress()?.events))
    }

    pub fn save_quiz_answer(&mut self, question_id: &str, answer: &str) -> Result<(), GameError> {
        let questions = self.questions()?;
        let q = self.progress_mut()?;
        if !q.events_reviewed {
            return Err(GameError::StepLocked {
                action: "answer the quiz",
                requires: "reviewing the quarter's events",
            });
        }
        if q.quiz_passed {
            return Err(GameError::QuizAlreadyPassed);
        }
        if q.quiz_submitted {
            return Err(GameError::StepLocked {
                action: "change answers",
                requires: "resetting the quiz",
            });
        }
        let question = questions
            .iter()
            .find(|qq| qq.id == question_id)
            .ok_or_else(|| GameError::InvalidInput(format!("unknown question {}", question_id)))?;
        if !question.options.iter().any(|o| o.id == answer) {
            return Err(GameError::InvalidInput(format!(
                "unknown option {} for {}",
                answer, question_id
            )));
        }
        q.quiz_answers.insert(question_id.to_string(), answer.to_string());
        Ok(())
    }

    pub fn submit_quiz(&mut self) -> Result<QuizResult, GameError> {
        let questions = self.questions()?;
        let q = self.progress_mut()?;
        if !q.events_reviewed {
            return Err(GameError::StepLocked {
                action: "submit the quiz",
                requires: "reviewing the quarter's events",
            });
        }
        if q.quiz_passed {
            return Err(GameError::QuizAlreadyPassed);
        }
        let result = grade(&questions, &q.quiz_answers);
        q.quiz_submitted = true;
        q.quiz_score = Some(result.score);
        q.quiz_passed = result.passed;
        info!(
            "Q{} quiz submitted: {}/{} ({})",
            q.quarter,
            result.correct,
            result.total,
            if result.passed { "passed" } else { "failed" }
        );
        Ok(result)
    }

    pub fn reset_quiz(&mut self) -> Result<(), GameError> {
        let q = self.progress_mut()?;
        if q.quiz_passed {
            return Err(GameError::QuizAlreadyPassed);
        }
        q.quiz_answers.clear();
        q.quiz_submitted = false;
        q.quiz_score = None;
        Ok(())
    }

    fn require_rebalance_step(&self) -> Result<(), GameError> {
        let q = self.progress()?;
        if !q.quiz_passed {
            return Err(GameError::StepLocked {
                action: "rebalance",
                requires: "passing the quiz",
            });
        }
        if q.rebalanced {
            return Err(GameError::StepLocked {
                action: "trade again",
                requires: "the next quarter",
            });
        }
        Ok(())
    }

    fn staged(&self) -> (&[Holding], f64) {
        match self.state.pending.as_ref() {
            Some(p) => (p.holdings.as_slice(), p.cash),
            None => (self.state.portfolio.as_slice(), self.state.cash),
        }
    }

    fn pending_mut(&mut self) -> &mut PendingRebalance {
        let portfolio = &self.state.portfolio;
        let cash = self.state.cash;
        self.state.pending.get_or_insert_with(|| PendingRebalance {
            holdings: portfolio.clone(),
            cash,
        })
    }

    /// Stage a purchase of as many whole shares as `amount` (capped by cash) buys.
    pub fn buy(&mut self, stock_id: &str, amount: f64) -> Result<Holding, GameError> {
        self.require_rebalance_step()?;
        let listed =
            find_stock(stock_id).ok_or_else(|| GameError::UnknownStock(stock_id.to_string()))?;
        let amount = positive_amount(amount);

        let (holdings, cash) = self.staged();
        let stock = holdings
            .iter()
            .find(|h| h.stock.id == stock_id)
            .map(|h| h.stock.clone())
            .unwrap_or(listed);
        if cash < stock.price {
            return Err(GameError::InsufficientCash {
                needed: stock.price,
                available: cash,
            });
        }
        let shares = (amount.min(cash) / stock.price).floor();
        if shares <= 0.0 {
            return Err(GameError::InvalidInput(format!(
                "{:.2} does not buy a whole share of {} at {:.2}",
                amount, stock.id, stock.price
            )));
        }
        let cost = shares * stock.price;

        let pending = self.pending_mut();
        let index = match pending.holdings.iter().position(|h| h.stock.id == stock_id) {
            Some(i) => {
                let h = &mut pending.holdings[i];
                let basis = h.avg_price * h.quantity + cost;
                h.quantity += shares;
                h.value += cost;
                h.avg_price = basis / h.quantity;
                i
            }
            None => {
                pending.holdings.push(Holding {
                    avg_price: stock.price,
                    stock,
                    quantity: shares,
                    value: cost,
                    weight: 0.0,
                });
                pending.holdings.len() - 1
            }
        };
        pending.cash -= cost;
        normalize_weights(&mut pending.holdings);
        debug!("Staged buy of {} x {} for {:.2}", shares, stock_id, cost);
        Ok(pending.holdings[index].clone())
    }

    /// Stage a sale of whole shares worth up to `amount`. Returns the
    /// remaining position, or `None` when it was closed.
    pub fn sell(&mut self, stock_id: &str, amount: f64) -> Result<Option<Holding>, GameError> {
        self.require_rebalance_step()?;
        if find_stock(stock_id).is_none() {
            return Err(GameError::UnknownStock(stock_id.to_string()));
        }
        let amount = positive_amount(amount);

        let (holdings, _) = self.staged();
        let index = holdings
            .iter()
            .position(|h| h.stock.id == stock_id)
            .ok_or_else(|| GameError::InvalidInput(format!("{} is not held", stock_id)))?;
        let holding = &holdings[index];
        let shares = (amount / holding.stock.price).floor().min(holding.quantity.floor());
        if shares <= 0.0 {
            return Err(GameError::InvalidInput(format!(
                "{:.2} does not sell a whole share of {}",
                amount, stock_id
            )));
        }
        let proceeds = shares * holding.stock.price;
        let closes = shares >= holding.quantity;

        let pending = self.pending_mut();
        pending.cash += proceeds;
        let remaining = if closes {
            pending.holdings.remove(index);
            None
        } else {
            let h = &mut pending.holdings[index];
            h.quantity -= shares;
            h.value = h.quantity * h.stock.price;
            Some(index)
        };
        normalize_weights(&mut pending.holdings);
        debug!("Staged sale of {} x {} for {:.2}", shares, stock_id, proceeds);
        Ok(remaining.map(|i| pending.holdings[i].clone()))
    }

    pub fn rebalance(&mut self) -> Result<(), GameError> {
        self.require_rebalance_step()?;
        let staged_empty = match self.state.pending.as_ref() {
            Some(p) => p.holdings.is_empty(),
            None => self.state.portfolio.is_empty(),
        };
        if staged_empty {
            return Err(GameError::InvalidInput("portfolio has no holdings".to_string()));
        }
        if let Some(pending) = self.state.pending.take() {
            self.state.portfolio = pending.holdings;
            self.state.cash = pending.cash;
        }
        normalize_weights(&mut self.state.portfolio);
        let quarter = self.state.current_quarter;
        if let Some(q) = self.state.current.as_mut() {
            q.rebalanced = true;
        }
        info!(
            "Q{} rebalanced: {} holdings, cash {:.2}",
            quarter,
            self.state.portfolio.len(),
            self.state.cash
        );
        Ok(())
    }

    /// Finish the rebalance step without trading; staged trades are discarded.
    pub fn skip_rebalance(&mut self) -> Result<(), GameError> {
        self.require_rebalance_step()?;
        self.state.pending = None;
        let q = self.progress_mut()?;
        q.rebalanced = true;
        q.rebalance_skipped = true;
        info!("Q{} rebalance skipped", q.quarter);
        Ok(())
    }

    pub fn mark_ai_reviewed(&mut self) -> Result<(), GameError> {
        let q = self.progress_mut()?;
        if !q.rebalanced {
            return Err(GameError::StepLocked {
                action: "finish the AI review",
                requires: "rebalancing",
            });
        }
        q.ai_reviewed = true;
        Ok(())
    }

    pub fn mark_performance_reviewed(&mut self) -> Result<(), GameError> {
        let q = self.progress_mut()?;
        if !q.ai_reviewed {
            return Err(GameError::StepLocked {
                action: "finish the performance review",
                requires: "the AI review",
            });
        }
        q.performance_reviewed = true;
        Ok(())
    }

    /// Close the current quarter and open the next one, or finish the quest
    /// after quarter 12. Returns the action that was taken.
    pub fn advance(&mut self) -> Result<AdvanceLabel, GameError> {
        {
            let q = self.progress()?;
            if !q.quiz_passed {
                return Err(GameError::StepLocked {
                    action: "advance",
                    requires: "passing the quiz",
                });
            }
            if !q.rebalanced {
                return Err(GameError::StepLocked {
                    action: "advance",
                    requires: "rebalancing",
                });
            }
            if !q.performance_reviewed {
                return Err(GameError::StepLocked {
                    action: "advance",
                    requires: "reviewing performance",
                });
            }
        }
        let q = self.state.current.take().ok_or(GameError::NotStarted)?;
        let label = AdvanceLabel::for_quarter(q.quarter);

        let value = self.state.portfolio_value();
        let quarter_return = if q.baseline_value > 0.0 {
            (value - q.baseline_value) / q.baseline_value * 100.0
        } else {
            0.0
        };
        self.state.quarter_history.push(QuarterRecord {
            quarter: q.quarter,
            quiz_score: q.quiz_score.unwrap_or(0.0),
            quiz_passed: q.quiz_passed,
            diversification_score: scoring::diversification_score(&self.state.portfolio),
            risk_score: scoring::risk_score(&self.state.portfolio),
            quarter_return,
            portfolio_value: value,
            total_return: self.state.total_return(),
            rebalanced: q.rebalanced && !q.rebalance_skipped,
            completed_at: Utc::now(),
        });

        if label == AdvanceLabel::FinishQuest {
            self.state.status = GameStatus::Complete;
            self.state.achievements = evaluate_achievements(&self.state);
            info!(
                "Quest complete after Q{}: value {:.2}, return {:.2}%",
                q.quarter,
                value,
                self.state.total_return()
            );
            return Ok(label);
        }

        let next = q.quarter + 1;
        let events = generate_quarter_events(next, &self.state.portfolio, &mut self.rng);
        let mut repriced = apply_event_impacts(&self.state.portfolio, &events);
        normalize_weights(&mut repriced);
        self.state.portfolio = repriced;
        self.state.current_quarter = next;
        self.state.current = Some(QuarterProgress::open(next, events, value));
        info!("Advanced to Q{} of {}", next, TOTAL_QUARTERS);
        Ok(label)
    }

    pub fn use_hint(&mut self) -> Result<Option<Hint>, GameError> {
        self.progress()?;
        if self.state.hints_remaining == 0 {
            return Err(GameError::HintsExhausted);
        }
        self.state.hints_remaining -= 1;
        self.state.hints_used += 1;
        Ok(self.hints().into_iter().next())
    }

    pub fn hints(&self) -> Vec<Hint> {
        contextual_hints(&self.state, &self.thresholds)
    }

    pub fn scorecard(&self) -> Scorecard {
        scoring::scorecard(&self.state, &self.thresholds)
    }

    pub fn report(&self) -> GameReport {
        build_report(&self.state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::STARTING_CAPITAL;
    use rand::Rng;

    fn session(seed: u64) -> GameSession {
        GameSession::new(STARTING_CAPITAL, Thresholds::default(), Some(seed))
    }

    fn pass_quiz(s: &mut GameSession) {
        s.mark_events_reviewed().unwrap();
        for q in s.questions().unwrap() {
            let answer = q.options.iter().find(|o| o.correct).unwrap().id.clone();
            s.save_quiz_answer(&q.id, &answer).unwrap();
        }
        assert!(s.submit_quiz().unwrap().passed);
    }

    fn finish_reviews(s: &mut GameSession) {
        s.mark_ai_reviewed().unwrap();
        s.mark_performance_reviewed().unwrap();
    }

    #[test]
    fn actions_before_start_are_rejected() {
        let mut s = session(1);
        assert_eq!(s.mark_events_reviewed(), Err(GameError::NotStarted));
        assert_eq!(s.advance(), Err(GameError::NotStarted));
        assert!(s.step().is_none());
    }

    #[test]
    fn first_quarter_walkthrough() {
        let mut s = session(2);
        s.start();
        assert_eq!(s.step(), Some(JourneyStep::ReviewEvents));
        assert_eq!(s.state().current_quarter, 1);
        assert!(s.state().quarter_history.is_empty());

        assert!(matches!(s.buy("TCS", 100_000.0), Err(GameError::StepLocked { .. })));
        pass_quiz(&mut s);
        assert_eq!(s.step(), Some(JourneyStep::Rebalance));

        let tcs = s.buy("TCS", 100_000.0).unwrap();
        assert_eq!(tcs.quantity, 25.0);
        assert_eq!(tcs.value, 96_250.0);
        s.buy("HDFCBANK", 100_000.0).unwrap();
        // staged trades do not touch the committed portfolio
        assert!(s.state().portfolio.is_empty());
        assert_eq!(s.state().cash, STARTING_CAPITAL);

        s.rebalance().unwrap();
        assert_eq!(s.state().portfolio.len(), 2);
        let weights: f64 = s.state().portfolio.iter().map(|h| h.weight).sum();
        assert!((weights - 100.0).abs() < 1e-9);
        assert!((s.state().portfolio_value() - STARTING_CAPITAL).abs() < 1e-6);

        finish_reviews(&mut s);
        assert_eq!(s.step(), Some(JourneyStep::Advance));
        assert_eq!(s.advance_label(), Ok(AdvanceLabel::ProceedToNextQuarter));
        assert_eq!(s.advance(), Ok(AdvanceLabel::ProceedToNextQuarter));

        let state = s.state();
        assert_eq!(state.current_quarter, 2);
        assert_eq!(state.quarter_history.len(), 1);
        let record = &state.quarter_history[0];
        assert_eq!(record.quarter, 1);
        assert!(record.quiz_passed);
        assert_eq!(record.quiz_score, 100.0);
        assert!(record.rebalanced);
        assert_eq!(record.quarter_return, 0.0);
        assert!(state.achievements.is_empty());
        assert_eq!(s.scorecard().diversification_score, record.diversification_score);
    }

    #[test]
    fn advance_requires_every_step() {
        let mut s = session(3);
        s.start();
        pass_quiz(&mut s);
        let err = s.advance().unwrap_err();
        assert_eq!(err, GameError::StepLocked { action: "advance", requires: "rebalancing" });
        s.skip_rebalance().unwrap();
        assert!(s.advance().is_err());
        s.mark_ai_reviewed().unwrap();
        assert!(s.advance().is_err());
        s.mark_performance_reviewed().unwrap();
        assert!(s.advance().is_ok());
        assert!(!s.state().quarter_history[0].rebalanced);
    }

    #[test]
    fn scorecard_closes_trading_once_rebalanced() {
        let mut s = session(12);
        s.start();
        pass_quiz(&mut s);
        assert!(s.scorecard().can_rebalance);
        s.buy("TCS", 100_000.0).unwrap();
        s.rebalance().unwrap();
        assert!(!s.scorecard().can_rebalance);
        assert!(matches!(s.rebalance(), Err(GameError::StepLocked { .. })));
        assert!(matches!(s.buy("ITC", 1_000.0), Err(GameError::StepLocked { .. })));

        let mut skipped = session(13);
        skipped.start();
        pass_quiz(&mut skipped);
        skipped.skip_rebalance().unwrap();
        assert!(!skipped.scorecard().can_rebalance);
        assert!(!skipped.scorecard().can_advance);
        finish_reviews(&mut skipped);
        assert!(skipped.scorecard().can_advance);
    }

    #[test]
    fn failed_quiz_can_be_retaken() {
        let mut s = session(4);
        s.start();
        s.mark_events_reviewed().unwrap();
        let questions = s.questions().unwrap();
        for q in &questions {
            let wrong = q.options.iter().find(|o| !o.correct).unwrap().id.clone();
            s.save_quiz_answer(&q.id, &wrong).unwrap();
        }
        let result = s.submit_quiz().unwrap();
        assert!(!result.passed);
        assert_eq!(result.score, 0.0);
        let locked = s.save_quiz_answer(&questions[0].id, "div");
        assert!(matches!(locked, Err(GameError::StepLocked { .. })));
        assert!(matches!(s.skip_rebalance(), Err(GameError::StepLocked { .. })));

        s.reset_quiz().unwrap();
        for q in &questions {
            let right = q.options.iter().find(|o| o.correct).unwrap().id.clone();
            s.save_quiz_answer(&q.id, &right).unwrap();
        }
        assert!(s.submit_quiz().unwrap().passed);
        assert_eq!(s.reset_quiz(), Err(GameError::QuizAlreadyPassed));
    }

    #[test]
    fn unknown_answers_are_rejected() {
        let mut s = session(5);
        s.start();
        s.mark_events_reviewed().unwrap();
        assert!(matches!(s.save_quiz_answer("nope", "div"), Err(GameError::InvalidInput(_))));
        let unknown = s.save_quiz_answer("q-sebi-tip", "moon");
        assert!(matches!(unknown, Err(GameError::InvalidInput(_))));
    }

    #[test]
    fn selling_returns_cash_and_closes_positions() {
        let mut s = session(6);
        s.start();
        pass_quiz(&mut s);
        s.buy("ITC", 4_850.0).unwrap();
        let left = s.sell("ITC", 970.0).unwrap().unwrap();
        assert_eq!(left.quantity, 8.0);
        assert!(s.sell("ITC", 1e9).unwrap().is_none());
        assert!(matches!(s.sell("ITC", 485.0), Err(GameError::InvalidInput(_))));
        assert!(matches!(s.sell("ZZZ", 485.0), Err(GameError::UnknownStock(_))));
        assert_eq!(s.rebalance(), Err(GameError::InvalidInput("portfolio has no holdings".into())));
    }

    #[test]
    fn buy_rejections_leave_state_unchanged() {
        let mut s = GameSession::new(1_000.0, Thresholds::default(), Some(7));
        s.start();
        pass_quiz(&mut s);
        let before = s.state().clone();
        assert!(matches!(s.buy("TCS", 100.0), Err(GameError::InsufficientCash { .. })));
        assert!(matches!(s.buy("IOC", 10.0), Err(GameError::InvalidInput(_))));
        assert!(matches!(s.buy("NOPE", 10.0), Err(GameError::UnknownStock(_))));
        assert_eq!(s.state(), &before);
    }

    #[test]
    fn full_quest_finishes_at_twelve() {
        let mut s = session(8);
        s.start();
        for quarter in 1..=TOTAL_QUARTERS {
            assert_eq!(s.state().current_quarter, quarter);
            pass_quiz(&mut s);
            if quarter == 1 {
                for id in ["TCS", "HDFCBANK", "ITC", "SUNPHARMA", "MARUTI", "HINDALCO", "ONGC"] {
                    s.buy(id, 120_000.0).unwrap();
                }
                s.rebalance().unwrap();
            } else {
                s.skip_rebalance().unwrap();
            }
            finish_reviews(&mut s);
            let expected = if quarter == TOTAL_QUARTERS {
                AdvanceLabel::FinishQuest
            } else {
                AdvanceLabel::ProceedToNextQuarter
            };
            assert_eq!(s.advance_label(), Ok(expected));
            assert_eq!(s.advance(), Ok(expected));
            assert!(s.state().quarter_history.len() as u32 <= s.state().current_quarter);
        }

        assert_eq!(s.advance(), Err(GameError::AlreadyComplete));
        assert_eq!(s.advance_label(), Err(GameError::AlreadyComplete));

        let state = s.state();
        assert_eq!(state.status, GameStatus::Complete);
        assert_eq!(state.current_quarter, TOTAL_QUARTERS);
        assert_eq!(state.quarter_history.len(), 12);
        assert!(state.quarter_history.windows(2).all(|w| w[0].quarter + 1 == w[1].quarter));

        let report = s.report();
        assert_eq!(report.quarters_played, 12);
        assert_eq!(report.achievements, evaluate_achievements(state));
        assert_eq!(state.achievements, report.achievements);
    }

    #[test]
    fn history_never_outgrows_current_quarter() {
        let mut rng = StdRng::seed_from_u64(99);
        let mut s = session(10);
        s.start();
        for _ in 0..2_000 {
            let action = rng.gen_range(0..12);
            let _ = match action {
                0 => s.mark_events_reviewed(),
                1 => {
                    let qs = s.questions().unwrap_or_default();
                    match qs.first() {
                        Some(q) => {
                            let pick = &q.options[rng.gen_range(0..q.options.len())];
                            s.save_quiz_answer(&q.id, &pick.id)
                        }
                        None => Ok(()),
                    }
                }
                2 => s.submit_quiz().map(|_| ()),
                3 => s.reset_quiz(),
                4 => s.buy("ITC", rng.gen_range(0.0..200_000.0)).map(|_| ()),
                5 => s.sell("ITC", rng.gen_range(0.0..200_000.0)).map(|_| ()),
                6 => s.rebalance(),
                7 => s.skip_rebalance(),
                8 => s.mark_ai_reviewed(),
                9 => s.mark_performance_reviewed(),
                10 => s.advance().map(|_| ()),
                _ => s.use_hint().map(|_| ()),
            };
            let state = s.state();
            assert!(state.quarter_history.len() as u32 <= state.current_quarter);
            assert!(state.current_quarter <= TOTAL_QUARTERS);
            assert!(state.cash >= 0.0);
        }
    }

    #[test]
    fn hints_run_out() {
        let mut s = session(11);
        s.start();
        for _ in 0..6 {
            assert!(s.use_hint().is_ok());
        }
        assert_eq!(s.use_hint(), Err(GameError::HintsExhausted));
        assert_eq!(s.state().hints_used, 6);
        s.reset();
        assert_eq!(s.state().hints_remaining, 6);
        assert_eq!(s.state().status, GameStatus::NotStarted);
    }
}
