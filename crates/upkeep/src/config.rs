use anyhow::Context;

const DEFAULT_BASE_URL: &str = "http://localhost:3000";

/// Process-wide settings, read from the environment once at startup and
/// passed around explicitly afterwards.
#[derive(Debug, Clone)]
pub struct Config {
    pub base_url: String,
    pub secret_token: String,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        let base_url = std::env::var("NEXT_PUBLIC_BASE_URL")
            .map(|url| url.trim_end_matches('/').to_string())
            .unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());

        let secret_token = std::env::var("CRON_SECRET_TOKEN")
            .ok()
            .filter(|token| !token.is_empty())
            .context("CRON_SECRET_TOKEN should be set")?;

        Ok(Self {
            base_url,
            secret_token,
        })
    }
}
