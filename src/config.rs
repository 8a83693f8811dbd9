use crate::actors::apify::DEFAULT_BASE_URL;
use crate::error::CaptureError;
use tracing::debug;

pub const TOKEN_VAR: &str = "APIFY_API_TOKEN";
pub const BASE_URL_VAR: &str = "APIFY_API_BASE_URL";
pub const ACTOR_ID_VAR: &str = "LEAD_CAPTURE_ACTOR_ID";

/// OLX Brasil real-estate scraper
pub const DEFAULT_ACTOR_ID: &str = "israeloriente/olx-brasil-imoveis-scraper";

/// Settings read once at startup
#[derive(Clone)]
pub struct Config {
    pub api_token: String,
    pub base_url: String,
    pub actor_id: String,
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("api_token", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("actor_id", &self.actor_id)
            .finish()
    }
}

impl Config {
    /// Load from the process environment, after seeding it from `.env` if one exists
    pub fn load() -> Result<Self, CaptureError> {
        match dotenvy::dotenv() {
            Ok(path) => debug!("Loaded environment from {}", path.display()),
            Err(e) if e.not_found() => {}
            Err(e) => debug!("Ignoring unreadable .env file: {}", e),
        }

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup. Blank values count as absent.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, CaptureError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let api_token = read(TOKEN_VAR).ok_or_else(|| {
            CaptureError::ConfigurationMissing(format!(
                "o token da Apify não foi encontrado. Defina '{}' no ambiente ou em um arquivo .env.",
                TOKEN_VAR
            ))
        })?;

        Ok(Self {
            api_token,
            base_url: read(BASE_URL_VAR).unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            actor_id: read(ACTOR_ID_VAR).unwrap_or_else(|| DEFAULT_ACTOR_ID.to_string()),
        })
    }
}
