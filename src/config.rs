// src/config.rs
//
// Environment-driven configuration. `.env` is loaded by main before this
// runs; every knob has a sane fallback so a bare `cargo run` boots.

const DEFAULT_NEWS_API_BASE: &str = "https://newsapi.org";
const DEFAULT_SHEETS_API_BASE: &str = "https://sheets.googleapis.com";
const DEFAULT_RATE_STORE_PATH: &str = "payout_rate.json";
const DEFAULT_STATIC_DIR: &str = "static";
const DEFAULT_PORT: u16 = 8000;

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub static_dir: String,
    pub rate_store_path: String,
    pub news_api_base: String,
    pub news_api_key: String,
    pub sheets_api_base: String,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            port: std::env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(DEFAULT_PORT),
            static_dir: env_or("STATIC_DIR", DEFAULT_STATIC_DIR),
            rate_store_path: env_or("RATE_STORE_PATH", DEFAULT_RATE_STORE_PATH),
            news_api_base: env_or("NEWS_API_BASE", DEFAULT_NEWS_API_BASE),
            news_api_key: env_or("NEWS_API_KEY", ""),
            sheets_api_base: env_or("SHEETS_API_BASE", DEFAULT_SHEETS_API_BASE),
        }
    }
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}
