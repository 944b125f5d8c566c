// Configuration loader: reads the model key and the store credentials from
// the process environment once at startup. `main` builds a `Config` and
// passes it to the clients; nothing else reads the environment.

use crate::error::ConfigError;
use std::path::PathBuf;
use tracing::warn;

pub const DEFAULT_GEMINI_MODEL: &str = "gemini-1.5-flash";

/// Everything the clients need, resolved once.
#[derive(Clone, Debug)]
pub struct Config {
    pub gemini_api_key: String,
    pub gemini_model: String,
    pub supabase_url: String,
    pub supabase_key: String,
}

impl Config {
    /// Read the configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Resolve the configuration through an arbitrary lookup so the
    /// presence rules can be checked without touching the real environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &'static str| {
            lookup(key)
                .filter(|v| !v.trim().is_empty())
                .ok_or(ConfigError::Missing(key))
        };

        // A missing model key is not fatal: the review menu still works and
        // every recommendation fails soft with the API's rejection.
        let gemini_api_key = lookup("GEMINI_API_KEY").unwrap_or_default();
        if gemini_api_key.trim().is_empty() {
            warn!("GEMINI_API_KEY is not set; recommendations will fail");
        }

        Ok(Config {
            gemini_api_key,
            gemini_model: lookup("GEMINI_MODEL")
                .filter(|v| !v.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_GEMINI_MODEL.into()),
            supabase_url: required("SUPABASE_URL")?,
            supabase_key: required("SUPABASE_KEY")?,
        })
    }
}

/// Load `.env` files into the process environment. The working directory
/// wins over the per-user file, and variables that are already set are
/// never overwritten. Returns the files that were actually read.
pub fn load_dotenv() -> Vec<PathBuf> {
    let mut loaded = Vec::new();
    if let Ok(path) = dotenvy::dotenv() {
        loaded.push(path);
    }
    if let Some(path) = user_env_file() {
        if path.is_file() && dotenvy::from_path(&path).is_ok() {
            loaded.push(path);
        }
    }
    loaded
}

/// `~/.config/book-recommender/.env` on Linux, the platform equivalent
/// elsewhere.
fn user_env_file() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("book-recommender").join(".env"))
}
