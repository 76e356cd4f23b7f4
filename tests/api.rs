use diversify_quest::api::{handle_rejection, routes};
use diversify_quest::config::Config;
use diversify_quest::models::GameEvent;
use diversify_quest::quiz::build_questions;
use diversify_quest::store::Store;
use serde_json::{json, Value};
use warp::http::StatusCode;
use warp::Filter;

fn api() -> impl Filter<Extract = impl warp::Reply, Error = std::convert::Infallible> + Clone {
    let config = Config {
        seed: Some(42),
        ..Config::default()
    };
    routes(Store::new(config)).recover(handle_rejection)
}

fn body(res: &warp::http::Response<warp::hyper::body::Bytes>) -> Value {
    serde_json::from_slice(res.body()).unwrap_or(Value::Null)
}

async fn token_for<F>(api: &F, user: &str) -> String
where
    F: Filter + 'static,
    F::Extract: warp::Reply + Send,
{
    let res = warp::test::request()
        .method("POST")
        .path("/auth/token")
        .json(&json!({ "user_id": user }))
        .reply(api)
        .await;
    assert_eq!(res.status(), StatusCode::OK);
    body(&res)["token"].as_str().unwrap().to_string()
}

async fn post<F>(api: &F, path: &str, token: &str, payload: Option<Value>) -> (StatusCode, Value)
where
    F: Filter + 'static,
    F::Extract: warp::Reply + Send,
{
    let mut req = warp::test::request()
        .method("POST")
        .path(path)
        .header("authorization", format!("Bearer {}", token));
    if let Some(p) = payload {
        req = req.json(&p);
    }
    let res = req.reply(api).await;
    (res.status(), body(&res))
}

async fn get<F>(api: &F, path: &str, token: &str) -> (StatusCode, Value)
where
    F: Filter + 'static,
    F::Extract: warp::Reply + Send,
{
    let res = warp::test::request()
        .method("GET")
        .path(path)
        .header("authorization", format!("Bearer {}", token))
        .reply(api)
        .await;
    (res.status(), body(&res))
}

#[tokio::test]
async fn stocks_are_public() {
    let res = warp::test::request().method("GET").path("/stocks").reply(&api()).await;
    assert_eq!(res.status(), StatusCode::OK);
    let stocks = body(&res);
    assert_eq!(stocks.as_array().map(|a| a.len()), Some(21));
    assert_eq!(stocks[0]["id"], "TCS");
}

#[tokio::test]
async fn game_routes_require_a_bearer_token() {
    let api = api();
    let res = warp::test::request().method("GET").path("/game/metrics").reply(&api).await;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    assert!(body(&res)["error"].as_str().unwrap().contains("sign in"));

    let (status, _) = get(&api, "/game/metrics", "not-a-jwt").await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn missing_session_is_404() {
    let api = api();
    let token = token_for(&api, "nobody").await;
    let (status, value) = get(&api, "/game/metrics", &token).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(value["error"].as_str().unwrap().contains("nobody"));
}

#[tokio::test]
async fn empty_user_id_is_rejected() {
    let res = warp::test::request()
        .method("POST")
        .path("/auth/token")
        .json(&json!({ "user_id": "  " }))
        .reply(&api())
        .await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn first_quarter_over_http() {
    let api = api();
    let token = token_for(&api, "learner").await;

    let (status, view) = post(&api, "/game", &token, None).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(view["state"]["current_quarter"], 1);
    assert_eq!(view["step"], "review_events");
    assert_eq!(view["scorecard"]["advance_text"], "Proceed to Next Quarter");

    // trading is locked until the quiz is passed
    let (status, value) = post(&api, "/game/rebalance", &token, None).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(value["error"], "cannot rebalance before passing the quiz");

    let (status, view) = post(&api, "/game/events/reviewed", &token, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(view["step"], "quiz");

    let (status, served) = get(&api, "/game/quiz", &token).await;
    assert_eq!(status, StatusCode::OK);
    assert!(served[0]["options"][0].get("correct").is_none());

    let events: Vec<GameEvent> =
        serde_json::from_value(view["state"]["current"]["events"].clone()).unwrap();
    for q in build_questions(&events) {
        let answer = q.options.iter().find(|o| o.correct).unwrap().id.clone();
        let (status, _) = post(
            &api,
            "/game/quiz/answers",
            &token,
            Some(json!({ "question_id": q.id, "answer": answer })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
    }
    let (status, result) = post(&api, "/game/quiz", &token, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(result["passed"], true);

    let (status, holding) = post(
        &api,
        "/game/holdings/buy",
        &token,
        Some(json!({ "stock_id": "TCS", "amount": 100000.0 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(holding["quantity"], 25.0);

    let (status, _) = post(
        &api,
        "/game/holdings/buy",
        &token,
        Some(json!({ "stock_id": "NOPE", "amount": 100.0 })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, view) = post(&api, "/game/rebalance", &token, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(view["state"]["portfolio"][0]["weight"], 100.0);
    assert_eq!(view["scorecard"]["concentration"]["stock_over_concentrated"], true);

    let (status, hints) = get(&api, "/game/hints", &token).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(hints[0]["priority"], "high");

    post(&api, "/game/review/ai", &token, None).await;
    post(&api, "/game/review/performance", &token, None).await;
    let (status, advanced) = post(&api, "/game/advance", &token, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(advanced["action"], "Proceed to Next Quarter");
    assert_eq!(advanced["game"]["state"]["current_quarter"], 2);
    assert_eq!(advanced["game"]["state"]["quarter_history"].as_array().map(|h| h.len()), Some(1));

    let (status, report) = get(&api, "/game/report", &token).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(report["quarters_played"], 1);
}

#[tokio::test]
async fn malformed_body_is_400() {
    let api = api();
    let token = token_for(&api, "typo").await;
    post(&api, "/game", &token, None).await;
    let (status, value) = post(
        &api,
        "/game/holdings/buy",
        &token,
        Some(json!({ "stock": "TCS" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(value["error"].as_str().unwrap().starts_with("invalid body"));
}

#[tokio::test]
async fn payment_tool_recommends_upi_for_qr() {
    let res = warp::test::request()
        .method("POST")
        .path("/tools/payment")
        .json(&json!({
            "amount": "below_two_lakh",
            "urgency": "instant",
            "beneficiary": "vpa_or_qr"
        }))
        .reply(&api())
        .await;
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(body(&res)["method"], "UPI");
}

#[tokio::test]
async fn goal_tool_uses_configured_tolerance() {
    let res = warp::test::request()
        .method("POST")
        .path("/tools/goal")
        .json(&json!({ "target_amount": 120000.0, "monthly_saving": 9500.0, "years": 1.0 }))
        .reply(&api())
        .await;
    assert_eq!(res.status(), StatusCode::OK);
    let plan = body(&res);
    assert_eq!(plan["months"], 12);
    assert_eq!(plan["feasible"], true);
}

#[tokio::test]
async fn risk_tool_fills_in_catalog_stock() {
    let res = warp::test::request()
        .method("POST")
        .path("/tools/risk")
        .json(&json!({
            "symbol": "TATASTEEL",
            "side": "buy",
            "quantity": 1.0,
            "price": 145.0,
            "order_type": "LIMIT",
            "portfolio_value": 100000.0,
            "available_cash": 50000.0,
            "current_position": null,
            "stock": null
        }))
        .reply(&api())
        .await;
    assert_eq!(res.status(), StatusCode::OK);
    let value = body(&res);
    assert_eq!(value["education"]["title"], "Understanding Volatility");
}

#[tokio::test]
async fn exiting_frees_the_session() {
    let api = api();
    let token = token_for(&api, "leaver").await;
    post(&api, "/game", &token, None).await;
    post(&api, "/game/events/reviewed", &token, None).await;

    let (status, view) = post(&api, "/game/reset", &token, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(view["state"]["status"], "not_started");

    let delete = || {
        warp::test::request()
            .method("DELETE")
            .path("/game")
            .header("authorization", format!("Bearer {}", token))
    };
    let res = delete().reply(&api).await;
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(body(&res)["closed"], true);

    let (status, _) = get(&api, "/game/metrics", &token).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(delete().reply(&api).await.status(), StatusCode::NOT_FOUND);
}
