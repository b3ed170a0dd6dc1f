use std::env;

use crate::ai::config::AiConfig;

#[derive(Clone, Debug)]
pub struct Config {
    pub db_url: String,
    pub port: u16,
    pub rate_limit_per_second: Option<u64>,
    pub ai: Option<AiConfig>,
}

impl Config {
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();
        let db_url = env::var("DB_URL").unwrap_or_else(|_| "sqlite:barterbrain.db".to_string());
        let port = env::var("PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(3000);
        let rate_limit_per_second = env::var("API_RATE_LIMIT_PER_SECOND")
            .ok()
            .and_then(|v| v.parse().ok())
            .filter(|v| *v > 0);
        let ai = AiConfig::from_env();
        Self {
            db_url,
            port,
            rate_limit_per_second,
            ai,
        }
    }
}
