use anyhow::{Context, Result};

/// Application configuration loaded from environment variables.
/// Every variable is optional; missing ones fall back to defaults.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    /// Enables LLM summaries. Without it the summary endpoints use the local fallback.
    pub groq_api_key: Option<String>,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            groq_api_key: optional_env("GROQ_API_KEY"),
        })
    }
}

/// Reads a variable, treating unset and blank the same.
fn optional_env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_optional_env_blank_is_none() {
        std::env::set_var("RESUME_API_TEST_BLANK", "   ");
        assert_eq!(optional_env("RESUME_API_TEST_BLANK"), None);
        assert_eq!(optional_env("RESUME_API_TEST_UNSET_VARIABLE"), None);

        std::env::set_var("RESUME_API_TEST_SET", " key ");
        assert_eq!(optional_env("RESUME_API_TEST_SET"), Some("key".to_string()));
    }
}
