use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use anyhow::{bail, Context, Result};

const PLACEHOLDER_API_KEY: &str = "your_openai_api_key_here";

/// Application configuration loaded from environment variables.
/// Built once at startup and handed to each component; nothing reads the
/// environment after this.
#[derive(Debug, Clone)]
pub struct Config {
    pub data_file: PathBuf,
    pub output_dir: PathBuf,
    pub tailoring: TailoringConfig,
    pub rust_log: String,
}

/// Limits applied by the tailoring pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TailoringConfig {
    pub max_experiences: usize,
    pub max_duties: usize,
    pub max_skills: usize,
}

impl Default for TailoringConfig {
    fn default() -> Self {
        Self {
            max_experiences: 3,
            max_duties: 5,
            max_skills: 15,
        }
    }
}

/// Settings for the generative-text API. Only `generate` needs these.
#[derive(Debug, Clone)]
pub struct LlmConfig {
    pub api_key: String,
    pub model: String,
    pub base_url: String,
    pub timeout: Duration,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let defaults = TailoringConfig::default();

        Ok(Config {
            data_file: env_or("RESUME_DATA_FILE", "data/user_data.json").into(),
            output_dir: env_or("RESUME_OUTPUT_DIR", "resumes").into(),
            tailoring: TailoringConfig {
                max_experiences: positive_env("RESUME_MAX_EXPERIENCES", defaults.max_experiences)?,
                max_duties: positive_env("RESUME_MAX_DUTIES", defaults.max_duties)?,
                max_skills: positive_env("RESUME_MAX_SKILLS", defaults.max_skills)?,
            },
            rust_log: env_or("RUST_LOG", "warn"),
        })
    }
}

impl LlmConfig {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let api_key = require_env("OPENAI_API_KEY")?;
        if api_key.trim().is_empty() || api_key == PLACEHOLDER_API_KEY {
            bail!("OPENAI_API_KEY is not set to a real key. Put it in your environment or .env file");
        }

        Ok(LlmConfig {
            api_key,
            model: env_or("OPENAI_MODEL", "gpt-4o-mini"),
            base_url: env_or("OPENAI_BASE_URL", "https://api.openai.com/v1")
                .trim_end_matches('/')
                .to_string(),
            timeout: Duration::from_secs(positive_env("OPENAI_TIMEOUT_SECS", 120u64)?),
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

fn positive_env<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr + PartialOrd + Default,
{
    match std::env::var(key) {
        Err(_) => Ok(default),
        Ok(raw) => parse_positive(key, &raw),
    }
}

fn parse_positive<T>(key: &str, raw: &str) -> Result<T>
where
    T: FromStr + PartialOrd + Default,
{
    let value = raw
        .trim()
        .parse::<T>()
        .ok()
        .with_context(|| format!("{key} must be a whole number, got '{raw}'"))?;
    if value <= T::default() {
        bail!("{key} must be greater than zero");
    }
    Ok(value)
}
