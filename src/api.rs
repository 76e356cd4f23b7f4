// src/api.rs
use crate::auth::{create_token, with_user};
use crate::error::GameError;
use crate::game::{GameSession, JourneyStep};
use crate::market::{available_stocks, find_stock};
use crate::models::GameState;
use crate::risk::{
    assess_for_level, assess_order, educational_content, OrderRiskInput, TradingLevel,
};
use crate::scoring::Scorecard;
use crate::store::Store;
use crate::tools::{
    calculate, goal_feasibility, recommend_payment, CalculatorInput, GoalInput, PaymentQuery,
};
use log::{error, info, warn};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::convert::Infallible;
use std::sync::Arc;
use warp::http::StatusCode;
use warp::{Filter, Rejection, Reply};

/// Everything the client needs to render the current quarter.
#[derive(Debug, Serialize)]
pub struct GameView {
    pub state: GameState,
    pub step: Option<JourneyStep>,
    pub scorecard: Scorecard,
}

impl GameView {
    pub fn of(session: &GameSession) -> Self {
        GameView {
            state: session.state().clone(),
            step: session.step(),
            scorecard: session.scorecard(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct TokenRequest {
    user_id: String,
}

#[derive(Debug, Deserialize)]
struct AnswerRequest {
    question_id: String,
    answer: String,
}

#[derive(Debug, Deserialize)]
struct TradeRequest {
    stock_id: String,
    amount: f64,
}

#[derive(Debug, Deserialize)]
struct RiskRequest {
    #[serde(flatten)]
    order: OrderRiskInput,
    #[serde(default)]
    level: Option<TradingLevel>,
}

pub fn routes(store: Store) -> impl Filter<Extract = impl Reply, Error = Rejection> + Clone {
    let secret = Arc::new(store.config().jwt_secret.clone());

    let token = warp::path!("auth" / "token")
        .and(warp::post())
        .and(with_secret(secret.clone()))
        .and(warp::body::json())
        .and_then(token_handler);

    let stocks = warp::path!("stocks")
        .and(warp::get())
        .and_then(stocks_handler);

    token
        .or(stocks)
        .or(game_routes(store.clone(), secret))
        .or(tool_routes(store))
}

fn game_routes(
    store: Store,
    secret: Arc<String>,
) -> impl Filter<Extract = impl Reply, Error = Rejection> + Clone {
    let user = with_user(secret);

    let start = warp::path!("game")
        .and(warp::post())
        .and(user.clone())
        .and(with_store(store.clone()))
        .and_then(start_handler);

    let get = warp::path!("game")
        .and(warp::get())
        .and(user.clone())
        .and(with_store(store.clone()))
        .and_then(get_game_handler);

    let reset = warp::path!("game" / "reset")
        .and(warp::post())
        .and(user.clone())
        .and(with_store(store.clone()))
        .and_then(reset_handler);

    let exit = warp::path!("game")
        .and(warp::delete())
        .and(user.clone())
        .and(with_store(store.clone()))
        .and_then(exit_handler);

    let events_reviewed = warp::path!("game" / "events" / "reviewed")
        .and(warp::post())
        .and(user.clone())
        .and(with_store(store.clone()))
        .and_then(events_reviewed_handler);

    let questions = warp::path!("game" / "quiz")
        .and(warp::get())
        .and(user.clone())
        .and(with_store(store.clone()))
        .and_then(questions_handler);

    let answer = warp::path!("game" / "quiz" / "answers")
        .and(warp::post())
        .and(user.clone())
        .and(with_store(store.clone()))
        .and(warp::body::json())
        .and_then(answer_handler);

    let submit_quiz = warp::path!("game" / "quiz")
        .and(warp::post())
        .and(user.clone())
        .and(with_store(store.clone()))
        .and_then(submit_quiz_handler);

    let reset_quiz = warp::path!("game" / "quiz")
        .and(warp::delete())
        .and(user.clone())
        .and(with_store(store.clone()))
        .and_then(reset_quiz_handler);

    let buy = warp::path!("game" / "holdings" / "buy")
        .and(warp::post())
        .and(user.clone())
        .and(with_store(store.clone()))
        .and(warp::body::json())
        .and_then(buy_handler);

    let sell = warp::path!("game" / "holdings" / "sell")
        .and(warp::post())
        .and(user.clone())
        .and(with_store(store.clone()))
        .and(warp::body::json())
        .and_then(sell_handler);

    let rebalance = warp::path!("game" / "rebalance")
        .and(warp::post())
        .and(user.clone())
        .and(with_store(store.clone()))
        .and_then(rebalance_handler);

    let skip = warp::path!("game" / "rebalance" / "skip")
        .and(warp::post())
        .and(user.clone())
        .and(with_store(store.clone()))
        .and_then(skip_rebalance_handler);

    let ai_review = warp::path!("game" / "review" / "ai")
        .and(warp::post())
        .and(user.clone())
        .and(with_store(store.clone()))
        .and_then(ai_review_handler);

    let performance_review = warp::path!("game" / "review" / "performance")
        .and(warp::post())
        .and(user.clone())
        .and(with_store(store.clone()))
        .and_then(performance_review_handler);

    let advance = warp::path!("game" / "advance")
        .and(warp::post())
        .and(user.clone())
        .and(with_store(store.clone()))
        .and_then(advance_handler);

    let hint = warp::path!("game" / "hint")
        .and(warp::post())
        .and(user.clone())
        .and(with_store(store.clone()))
        .and_then(use_hint_handler);

    let hints = warp::path!("game" / "hints")
        .and(warp::get())
        .and(user.clone())
        .and(with_store(store.clone()))
        .and_then(hints_handler);

    let metrics = warp::path!("game" / "metrics")
        .and(warp::get())
        .and(user.clone())
        .and(with_store(store.clone()))
        .and_then(metrics_handler);

    let report = warp::path!("game" / "report")
        .and(warp::get())
        .and(user)
        .and(with_store(store))
        .and_then(report_handler);

    start
        .or(get)
        .or(reset)
        .or(exit)
        .or(events_reviewed)
        .or(questions)
        .or(answer)
        .or(submit_quiz)
        .or(reset_quiz)
        .or(buy)
        .or(sell)
        .or(rebalance)
        .or(skip)
        .or(ai_review)
        .or(performance_review)
        .or(advance)
        .or(hint)
        .or(hints)
        .or(metrics)
        .or(report)
}

fn tool_routes(store: Store) -> impl Filter<Extract = impl Reply, Error = Rejection> + Clone {
    let risk = warp::path!("tools" / "risk")
        .and(warp::post())
        .and(warp::body::json())
        .and_then(risk_handler);

    let goal = warp::path!("tools" / "goal")
        .and(warp::post())
        .and(with_store(store))
        .and(warp::body::json())
        .and_then(goal_handler);

    let calculator = warp::path!("tools" / "calculator")
        .and(warp::post())
        .and(warp::body::json())
        .and_then(calculator_handler);

    let payment = warp::path!("tools" / "payment")
        .and(warp::post())
        .and(warp::body::json())
        .and_then(payment_handler);

    risk.or(goal).or(calculator).or(payment)
}

fn with_store(store: Store) -> impl Filter<Extract = (Store,), Error = Infallible> + Clone {
    warp::any().map(move || store.clone())
}

fn with_secret(
    secret: Arc<String>,
) -> impl Filter<Extract = (Arc<String>,), Error = Infallible> + Clone {
    warp::any().map(move || secret.clone())
}

fn reject(action: &str, user: &str, e: GameError) -> Rejection {
    warn!("{} failed for {}: {}", action, user, e);
    warp::reject::custom(e)
}

/// Run one mutating action against the user's session and reply with its result.
async fn act<T, F>(
    store: &Store,
    user: &str,
    action: &str,
    f: F,
) -> Result<warp::reply::Json, Rejection>
where
    T: Serialize,
    F: FnOnce(&mut GameSession) -> Result<T, GameError>,
{
    match store.with_session(user, f).await {
        Ok(value) => {
            info!("{} for {}", action, user);
            Ok(warp::reply::json(&value))
        }
        Err(e) => Err(reject(action, user, e)),
    }
}

async fn inspect<T, F>(
    store: &Store,
    user: &str,
    action: &str,
    f: F,
) -> Result<warp::reply::Json, Rejection>
where
    T: Serialize,
    F: FnOnce(&GameSession) -> Result<T, GameError>,
{
    match store.read(user, f).await.and_then(|r| r) {
        Ok(value) => Ok(warp::reply::json(&value)),
        Err(e) => Err(reject(action, user, e)),
    }
}

async fn token_handler(secret: Arc<String>, body: TokenRequest) -> Result<impl Reply, Rejection> {
    let user_id = body.user_id.trim();
    if user_id.is_empty() {
        let e = GameError::InvalidInput("user_id must not be empty".into());
        return Err(reject("Token", "<anonymous>", e));
    }
    match create_token(user_id, &secret) {
        Ok(token) => {
            info!("Issued token for {}", user_id);
            Ok(warp::reply::json(&json!({ "token": token })))
        }
        Err(e) => {
            error!("Failed to issue token: {}", e);
            Err(warp::reject::custom(e))
        }
    }
}

async fn stocks_handler() -> Result<impl Reply, Rejection> {
    Ok(warp::reply::json(&available_stocks()))
}

async fn start_handler(user: String, store: Store) -> Result<impl Reply, Rejection> {
    let started = store
        .open(&user, |s| {
            s.start();
            Ok(GameView::of(s))
        })
        .await;
    match started {
        Ok(view) => {
            info!("Game started for {}", user);
            Ok(warp::reply::with_status(warp::reply::json(&view), StatusCode::CREATED))
        }
        Err(e) => Err(reject("Start", &user, e)),
    }
}

async fn get_game_handler(user: String, store: Store) -> Result<impl Reply, Rejection> {
    inspect(&store, &user, "Get game", |s| Ok(GameView::of(s))).await
}

async fn reset_handler(user: String, store: Store) -> Result<impl Reply, Rejection> {
    act(&store, &user, "Game reset", |s| {
        s.reset();
        Ok(GameView::of(s))
    })
    .await
}

async fn exit_handler(user: String, store: Store) -> Result<impl Reply, Rejection> {
    if store.remove(&user).await {
        info!("Session closed for {}", user);
        Ok(warp::reply::with_status(
            warp::reply::json(&json!({ "closed": true })),
            StatusCode::OK,
        ))
    } else {
        Err(reject("Exit", &user, GameError::SessionNotFound(user.clone())))
    }
}

async fn events_reviewed_handler(user: String, store: Store) -> Result<impl Reply, Rejection> {
    act(&store, &user, "Events reviewed", |s| {
        s.mark_events_reviewed()?;
        Ok(GameView::of(s))
    })
    .await
}

async fn questions_handler(user: String, store: Store) -> Result<impl Reply, Rejection> {
    inspect(&store, &user, "Quiz questions", |s| s.questions()).await
}

async fn answer_handler(
    user: String,
    store: Store,
    body: AnswerRequest,
) -> Result<impl Reply, Rejection> {
    act(&store, &user, "Quiz answer saved", |s| {
        s.save_quiz_answer(&body.question_id, &body.answer)?;
        Ok(GameView::of(s))
    })
    .await
}

async fn submit_quiz_handler(user: String, store: Store) -> Result<impl Reply, Rejection> {
    act(&store, &user, "Quiz submitted", |s| s.submit_quiz()).await
}

async fn reset_quiz_handler(user: String, store: Store) -> Result<impl Reply, Rejection> {
    act(&store, &user, "Quiz reset", |s| {
        s.reset_quiz()?;
        Ok(GameView::of(s))
    })
    .await
}

async fn buy_handler(
    user: String,
    store: Store,
    body: TradeRequest,
) -> Result<impl Reply, Rejection> {
    act(&store, &user, "Buy staged", |s| s.buy(&body.stock_id, body.amount)).await
}

async fn sell_handler(
    user: String,
    store: Store,
    body: TradeRequest,
) -> Result<impl Reply, Rejection> {
    act(&store, &user, "Sell staged", |s| s.sell(&body.stock_id, body.amount)).await
}

async fn rebalance_handler(user: String, store: Store) -> Result<impl Reply, Rejection> {
    act(&store, &user, "Rebalanced", |s| {
        s.rebalance()?;
        Ok(GameView::of(s))
    })
    .await
}

async fn skip_rebalance_handler(user: String, store: Store) -> Result<impl Reply, Rejection> {
    act(&store, &user, "Rebalance skipped", |s| {
        s.skip_rebalance()?;
        Ok(GameView::of(s))
    })
    .await
}

async fn ai_review_handler(user: String, store: Store) -> Result<impl Reply, Rejection> {
    act(&store, &user, "AI review done", |s| {
        s.mark_ai_reviewed()?;
        Ok(GameView::of(s))
    })
    .await
}

async fn performance_review_handler(user: String, store: Store) -> Result<impl Reply, Rejection> {
    act(&store, &user, "Performance review done", |s| {
        s.mark_performance_reviewed()?;
        Ok(GameView::of(s))
    })
    .await
}

async fn advance_handler(user: String, store: Store) -> Result<impl Reply, Rejection> {
    act(&store, &user, "Advanced", |s| {
        let label = s.advance()?;
        Ok(json!({ "action": label.text(), "game": GameView::of(s) }))
    })
    .await
}

async fn use_hint_handler(user: String, store: Store) -> Result<impl Reply, Rejection> {
    act(&store, &user, "Hint used", |s| {
        let hint = s.use_hint()?;
        Ok(json!({ "hint": hint, "hints_remaining": s.state().hints_remaining }))
    })
    .await
}

async fn hints_handler(user: String, store: Store) -> Result<impl Reply, Rejection> {
    inspect(&store, &user, "Hints", |s| Ok(s.hints())).await
}

async fn metrics_handler(user: String, store: Store) -> Result<impl Reply, Rejection> {
    inspect(&store, &user, "Metrics", |s| Ok(s.scorecard())).await
}

async fn report_handler(user: String, store: Store) -> Result<impl Reply, Rejection> {
    inspect(&store, &user, "Report", |s| Ok(s.report())).await
}

async fn risk_handler(body: RiskRequest) -> Result<impl Reply, Rejection> {
    let mut order = body.order;
    if order.stock.is_none() {
        order.stock = find_stock(&order.symbol);
    }
    let assessment = match body.level {
        Some(level) => assess_for_level(&order, level),
        None => assess_order(&order),
    };
    info!(
        "Risk assessed for {}: {:?} ({})",
        order.symbol, assessment.risk_level, assessment.risk_score
    );
    let education = educational_content(&assessment);
    Ok(warp::reply::json(&json!({ "assessment": assessment, "education": education })))
}

async fn goal_handler(store: Store, body: GoalInput) -> Result<impl Reply, Rejection> {
    let plan = goal_feasibility(&body, store.config().thresholds.feasibility_tolerance);
    Ok(warp::reply::json(&plan))
}

async fn calculator_handler(body: CalculatorInput) -> Result<impl Reply, Rejection> {
    Ok(warp::reply::json(&calculate(&body)))
}

async fn payment_handler(body: PaymentQuery) -> Result<impl Reply, Rejection> {
    Ok(warp::reply::json(&recommend_payment(&body)))
}

/// Renders every rejection as `{"error": ...}` with a matching status.
pub async fn handle_rejection(err: Rejection) -> Result<impl Reply, Infallible> {
    let (status, message) = if let Some(e) = err.find::<GameError>() {
        let message = match e {
            GameError::Unauthorized(_) => format!("{}. Please sign in again.", e),
            _ => e.to_string(),
        };
        (e.status(), message)
    } else if err.is_not_found() {
        (StatusCode::NOT_FOUND, "not found".to_string())
    } else if let Some(e) = err.find::<warp::filters::body::BodyDeserializeError>() {
        (StatusCode::BAD_REQUEST, format!("invalid body: {}", e))
    } else if err.find::<warp::reject::MethodNotAllowed>().is_some() {
        (StatusCode::METHOD_NOT_ALLOWED, "method not allowed".to_string())
    } else {
        error!("Unhandled rejection: {:?}", err);
        (StatusCode::INTERNAL_SERVER_ERROR, "internal error".to_string())
    };
    Ok(warp::reply::with_status(
        warp::reply::json(&json!({ "error": message })),
        status,
    ))
}
