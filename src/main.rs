// src/main.rs
use diversify_quest::api;
use diversify_quest::config::Config;
use diversify_quest::store::Store;
use env_logger::Builder;
use log::{error, info, LevelFilter};
use warp::Filter;

#[tokio::main]
async fn main() {
    Builder::new()
        .filter_level(LevelFilter::Debug)
        .format_timestamp_secs()
        .parse_default_env()
        .init();

    let config = Config::from_env();
    if config.jwt_secret.is_empty() {
        error!("QUEST_JWT_SECRET must not be empty");
        return;
    }
    if config.starting_capital <= 0.0 {
        error!("QUEST_STARTING_CAPITAL must be positive, got {}", config.starting_capital);
        return;
    }
    info!("Starting Diversify Quest...");
    info!(
        "Thresholds: sector {}%, stock {}%, min holdings {}",
        config.thresholds.sector_limit,
        config.thresholds.stock_limit,
        config.thresholds.min_holdings
    );

    let addr = config.addr;
    let store = Store::new(config);

    // Define routes
    let api = api::routes(store)
        .recover(api::handle_rejection)
        .with(warp::log("diversify_quest"));

    // Start the server
    info!("Server running on http://{}", addr);
    warp::serve(api).run(addr).await;
}
