use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{Context, Result};

/// Application configuration loaded from environment variables.
/// Everything has a default; S3 is only configured when a bucket is named.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    pub ocr_enabled: bool,
    pub collaborator_timeout_ms: u64,
    pub max_concurrency: usize,
    /// JSON file overriding the built-in stopwords/skills/synonyms.
    pub matcher_config_path: Option<PathBuf>,
    pub s3: Option<S3Settings>,
}

/// Settings for presigned resume uploads.
#[derive(Debug, Clone, PartialEq)]
pub struct S3Settings {
    pub bucket: String,
    pub region: String,
    pub endpoint: Option<String>,
    pub access_key_id: Option<String>,
    pub secret_access_key: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 8080,
            rust_log: "info".to_string(),
            ocr_enabled: false,
            collaborator_timeout_ms: 5000,
            max_concurrency: 4,
            matcher_config_path: None,
            s3: None,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let defaults = Config::default();
        Ok(Config {
            port: parse_env("PORT", defaults.port)?,
            rust_log: optional_env("RUST_LOG").unwrap_or(defaults.rust_log),
            ocr_enabled: optional_env("OCR_ENABLED").is_some_and(|v| parse_flag(&v)),
            collaborator_timeout_ms: parse_env(
                "COLLABORATOR_TIMEOUT_MS",
                defaults.collaborator_timeout_ms,
            )?,
            max_concurrency: parse_env("MAX_CONCURRENCY", defaults.max_concurrency)?.max(1),
            matcher_config_path: optional_env("MATCHER_CONFIG_PATH").map(PathBuf::from),
            s3: optional_env("S3_BUCKET").map(|bucket| S3Settings {
                bucket,
                region: optional_env("AWS_REGION").unwrap_or_else(|| "us-east-1".to_string()),
                endpoint: optional_env("S3_ENDPOINT"),
                access_key_id: optional_env("AWS_ACCESS_KEY_ID"),
                secret_access_key: optional_env("AWS_SECRET_ACCESS_KEY"),
            }),
        })
    }
}

/// Unset and blank variables both read as absent.
fn optional_env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_env<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match optional_env(key) {
        Some(raw) => raw
            .parse::<T>()
            .with_context(|| format!("{key} must be a valid number, got '{raw}'")),
        None => Ok(default),
    }
}

fn parse_flag(value: &str) -> bool {
    matches!(value.to_ascii_lowercase().as_str(), "true" | "1" | "yes" | "on")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.port, 8080);
        assert_eq!(config.collaborator_timeout_ms, 5000);
        assert_eq!(config.max_concurrency, 4);
        assert!(!config.ocr_enabled);
        assert!(config.s3.is_none());
    }

    #[test]
    fn test_flag_parsing() {
        assert!(parse_flag("true"));
        assert!(parse_flag("TRUE"));
        assert!(parse_flag("1"));
        assert!(!parse_flag("false"));
        assert!(!parse_flag("nope"));
    }

    #[test]
    fn test_parse_env_uses_default_when_unset() {
        let port: u16 = parse_env("SHORTLIST_TEST_UNSET_PORT", 9000).unwrap();
        assert_eq!(port, 9000);
    }
}
