use cardnexus::adapters::inbound::http;
use cardnexus::adapters::outbound::card_store::postgres::Postgres;
use cardnexus::adapters::outbound::scanner::http::HttpScanner;
use cardnexus::config::Config;
use cardnexus::domain::app::App;
use cardnexus::domain::card::CardType;
use dotenv::dotenv;
use std::sync::Arc;

#[tokio::main]
async fn main() {
    dotenv().ok();
    env_logger::init();

    let config = Config::from_env();

    let card_store = Postgres::connect(&config.database_url)
        .await
        .expect("Failed Postgres connection");
    card_store
        .ensure_schema()
        .await
        .expect("Failed to prepare cards schema");

    let scanner = HttpScanner::new(&config.scanner_url);
    let app = Arc::new(App::new(card_store, scanner));

    let sources = [
        (&config.lorcana_cards_path, CardType::Lorcana),
        (&config.mtg_cards_path, CardType::MagicTheGathering),
    ];
    for (path, card_type) in sources {
        match app.import_file(path, card_type).await {
            Ok(outcome) => log::info!(
                "{card_type} import finished: {} imported, {} rejected",
                outcome.imported,
                outcome.rejected
            ),
            Err(why) => log::error!("{card_type} import failed - {why}"),
        }
    }

    let listener = tokio::net::TcpListener::bind(("0.0.0.0", config.port))
        .await
        .expect("Failed to bind HTTP listener");
    log::info!("starting server on port {}", config.port);

    axum::serve(listener, http::router(app))
        .await
        .expect("HTTP server failed");
}
