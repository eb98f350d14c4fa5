use std::env;

use crate::domain::normalize::{NormalizerConfig, RuralScaling, ScalingTable};
use crate::error::Result;

pub const DEFAULT_PORT: u16 = 9000;
pub const DEFAULT_JSON_LIMIT: usize = 2 * 1024 * 1024;
pub const DEFAULT_CACHE_CAPACITY: usize = 128;
pub const DEFAULT_SOLVER: &str = "glpk";

/// Settings read from the process environment (and `.env`, loaded by the binary)
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub port: u16,
    pub json_limit: usize,
    pub solver: String,
    /// When set, requests must carry a matching `X-API-Key` header
    pub api_key: Option<String>,
    pub cache_capacity: usize,
    pub normalizer: NormalizerConfig,
    pub sentry_dsn: Option<String>,
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        let port = env::var("PORT")
            .ok()
            .and_then(|s| s.parse::<u16>().ok())
            .unwrap_or(DEFAULT_PORT);

        let json_limit = env::var("JSON_PAYLOAD_LIMIT")
            .ok()
            .and_then(|v| v.parse::<usize>().ok())
            .unwrap_or(DEFAULT_JSON_LIMIT);

        let cache_capacity = env::var("CACHE_CAPACITY")
            .ok()
            .and_then(|v| v.parse::<usize>().ok())
            .unwrap_or(DEFAULT_CACHE_CAPACITY);

        let solver = non_empty("SOLVER").unwrap_or_else(|| DEFAULT_SOLVER.to_string());

        let scaling = match non_empty("PREFERENCE_SCALING") {
            Some(raw) => ScalingTable::parse(&raw)?,
            None => ScalingTable::default(),
        };
        let rural_scaling = non_empty("RURAL_SCALING")
            .map(|raw| RuralScaling::parse(&raw))
            .transpose()?;

        Ok(AppConfig {
            port,
            json_limit,
            solver,
            api_key: non_empty("API_KEY"),
            cache_capacity,
            normalizer: NormalizerConfig {
                scaling,
                rural_scaling,
            },
            sentry_dsn: non_empty("SENTRY_DSN"),
        })
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            port: DEFAULT_PORT,
            json_limit: DEFAULT_JSON_LIMIT,
            solver: DEFAULT_SOLVER.to_string(),
            api_key: None,
            cache_capacity: DEFAULT_CACHE_CAPACITY,
            normalizer: NormalizerConfig::default(),
            sentry_dsn: None,
        }
    }
}

fn non_empty(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
