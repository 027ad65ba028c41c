use std::env;

use anyhow::{Context, Result};
use url::Url;

use crate::cli::Cli;

static DEFAULT_API_URL: &str = "http://localhost:8000/api/v1";
static ENV_API_URL: &str = "TASKDECK_API_URL";
static ENV_TOKEN: &str = "TASKDECK_TOKEN";

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub api_url: Url,
    pub token: Option<String>,
}

impl AppConfig {
    /// Resolve the server settings from the flag, the environment, and the
    /// built-in default, in that order.
    pub fn discover(api_url_override: Option<String>, token_override: Option<String>) -> Result<Self> {
        let raw = api_url_override
            .or_else(|| env::var(ENV_API_URL).ok())
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());
        let api_url = Url::parse(&raw).with_context(|| format!("invalid API URL: {}", raw))?;
        let token = token_override.or_else(|| env::var(ENV_TOKEN).ok());
        Ok(Self { api_url, token })
    }
}

pub fn from_cli(cli: &Cli) -> Result<AppConfig> {
    AppConfig::discover(cli.api_url.clone(), cli.token.clone())
}
