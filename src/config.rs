use anyhow::{Context, Result};
use dotenvy::dotenv;
use std::env;

pub const DEFAULT_PORT: u16 = 5000;
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.0-flash";

#[derive(Debug, Clone)]
pub struct Config {
    pub mongo_uri: Option<String>,
    pub mongo_db_name: String,
    pub gemini_api_key: Option<String>,
    pub gemini_model: String,
    pub port: u16,
}

impl Config {
    /// Read configuration from the process environment, loading `.env` first if present.
    pub fn from_env() -> Result<Config> {
        dotenv().ok();
        let port = match get_env_opt("PORT") {
            Some(port) => port
                .parse()
                .with_context(|| format!("PORT is not a valid port number: {port}"))?,
            None => DEFAULT_PORT,
        };

        Ok(Config {
            mongo_uri: get_env_opt("MONGO_URI"),
            mongo_db_name: get_env_or_default("MONGO_DB_NAME", "searchvault"),
            gemini_api_key: get_env_opt("GEMINI_API_KEY"),
            gemini_model: get_env_or_default("GEMINI_MODEL", DEFAULT_GEMINI_MODEL),
            port,
        })
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            mongo_uri: None,
            mongo_db_name: "searchvault".to_string(),
            gemini_api_key: None,
            gemini_model: DEFAULT_GEMINI_MODEL.to_string(),
            port: DEFAULT_PORT,
        }
    }
}

// Empty values count as unset, so `GEMINI_API_KEY=` in a .env does not enable the client.
fn get_env_opt(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn get_env_or_default(key: &str, default: &str) -> String {
    get_env_opt(key).unwrap_or_else(|| default.to_string())
}
