use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::models::template::TemplateId;

/// Application configuration loaded from environment variables.
/// Every variable has a default; a value that is set but invalid fails startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    /// Where `DirectorySink` writes saved resumes.
    pub export_dir: PathBuf,
    pub default_template: TemplateId,
    /// JSON document loaded into the session at startup.
    pub initial_resume: Option<PathBuf>,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            port: env_or("PORT", "8080")
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: env_or("RUST_LOG", "info"),
            export_dir: PathBuf::from(env_or("EXPORT_DIR", "./exports")),
            default_template: env_or("DEFAULT_TEMPLATE", "single")
                .parse::<TemplateId>()
                .context("DEFAULT_TEMPLATE must name a registered template")?,
            initial_resume: optional_env("INITIAL_RESUME").map(PathBuf::from),
        })
    }
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

fn optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}
