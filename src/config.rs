use std::env;
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub scanner_url: String,
    pub port: u16,
    pub lorcana_cards_path: PathBuf,
    pub mtg_cards_path: PathBuf,
}

impl Config {
    /// Reads configuration from the environment. Only the Postgres uri is
    /// mandatory; everything else has a local-development default.
    #[must_use]
    pub fn from_env() -> Self {
        let database_url = env::var("PSQL_URI").expect("Postgres uri wasn't in env vars");
        let scanner_url =
            env::var("SCANNER_API_URL").unwrap_or_else(|_| String::from("http://localhost:8000"));
        let port = env::var("PORT")
            .ok()
            .and_then(|value| value.parse().ok())
            .unwrap_or(3000);
        let lorcana_cards_path = env::var("LORCANA_CARDS_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("data/cards/lorcana-cards.json"));
        let mtg_cards_path = env::var("MTG_CARDS_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("data/cards/mtg-cards.json"));

        Self {
            database_url,
            scanner_url,
            port,
            lorcana_cards_path,
            mtg_cards_path,
        }
    }
}
