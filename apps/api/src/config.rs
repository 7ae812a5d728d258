use anyhow::{Context, Result};
use uuid::Uuid;

/// Application configuration loaded from environment variables.
/// Startup fails if a required variable is missing.
#[derive(Debug, Clone)]
pub struct Config {
    /// Postgres record store. The in-memory store is used when unset.
    pub database_url: Option<String>,
    pub anthropic_api_key: String,
    pub port: u16,
    pub rust_log: String,
    /// Origin of the frontend that serves share links.
    pub public_base_url: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            database_url: optional_env("DATABASE_URL"),
            anthropic_api_key: require_env("ANTHROPIC_API_KEY")?,
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            public_base_url: optional_env("PUBLIC_BASE_URL")
                .unwrap_or_else(|| "http://localhost:5173".to_string()),
        })
    }

    /// Public link to the read-only view of a resume.
    pub fn share_url(&self, document_id: Uuid) -> String {
        format!(
            "{}/my-resume/{document_id}/view",
            self.public_base_url.trim_end_matches('/')
        )
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|value| !value.trim().is_empty())
}
