use secrecy::Secret;
use service_core::config as core_config;
use service_core::error::AppError;
use std::env;
use std::path::PathBuf;

pub const DEFAULT_MODEL: &str = "gpt-4";
pub const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
/// Viewer assets shipped with the crate, independent of the working directory.
pub const DEFAULT_STATIC_DIR: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/static");

#[derive(Debug, Clone)]
pub struct CompoundConfig {
    pub common: core_config::Config,
    pub openai: OpenAiSettings,
    /// Directory holding `index.html` and the viewer scripts.
    pub static_dir: PathBuf,
    /// OTLP collector endpoint; span export is disabled when unset.
    pub otlp_endpoint: Option<String>,
}

#[derive(Debug, Clone)]
pub struct OpenAiSettings {
    pub api_key: Secret<String>,
    pub model: String,
    pub base_url: String,
}

impl CompoundConfig {
    pub fn load() -> Result<Self, AppError> {
        let common = core_config::Config::load()?;
        let is_prod = env::var("ENVIRONMENT").unwrap_or_else(|_| "dev".to_string()) == "prod";

        Ok(CompoundConfig {
            common,
            openai: OpenAiSettings {
                api_key: Secret::new(get_env("OPENAI_API_KEY", None, is_prod)?),
                model: get_env("OPENAI_MODEL", Some(DEFAULT_MODEL), is_prod)?,
                base_url: get_env("OPENAI_BASE_URL", Some(DEFAULT_OPENAI_BASE_URL), is_prod)?,
            },
            static_dir: PathBuf::from(get_env("STATIC_DIR", Some(DEFAULT_STATIC_DIR), false)?),
            otlp_endpoint: env::var("OTLP_ENDPOINT").ok().filter(|v| !v.is_empty()),
        })
    }
}

/// Reads `key` from the environment.
///
/// Outside production a missing variable falls back to `default`; in
/// production every variable must be set explicitly.
fn get_env(key: &str, default: Option<&str>, is_prod: bool) -> Result<String, AppError> {
    if let Ok(val) = env::var(key) {
        return Ok(val);
    }

    match default {
        Some(def) if !is_prod => Ok(def.to_string()),
        _ if is_prod => Err(AppError::ConfigError(anyhow::anyhow!(
            "{} is required in production but not set",
            key
        ))),
        _ => Err(AppError::ConfigError(anyhow::anyhow!(
            "{} is required but not set",
            key
        ))),
    }
}
