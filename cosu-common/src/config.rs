//! Bootstrap configuration loading
//!
//! Settings resolve with priority:
//! 1. Command-line argument (handled by the binary)
//! 2. Environment variable
//! 3. TOML config file
//! 4. Compiled default
//!
//! A missing TOML file is not an error: a warning is logged and defaults
//! apply. A file that exists but cannot be parsed is.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Default HTTP port
pub const DEFAULT_PORT: u16 = 4000;
/// Default bind address
pub const DEFAULT_BIND: &str = "127.0.0.1";
/// Default acoustic scoring service
pub const DEFAULT_SCORING_URL: &str = "http://127.0.0.1:8000";
/// Default OpenAI-compatible API root
pub const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1";

/// Environment variables checked for the generative/transcription API key, in order
pub const API_KEY_ENV_VARS: [&str; 2] = ["COSU_OPENAI_API_KEY", "OPENAI_API_KEY"];
/// Environment variables checked for the acoustic scoring service URL, in order
pub const SCORING_URL_ENV_VARS: [&str; 2] = ["COSU_SCORING_SERVICE_URL", "SCORING_SERVICE_URL"];

/// Bootstrap configuration loaded from TOML
///
/// Every section is optional; absent keys take their compiled defaults.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct TomlConfig {
    /// Address the HTTP server binds to
    pub bind: String,
    /// HTTP server port
    pub port: u16,
    pub logging: LoggingConfig,
    pub openai: OpenAiConfig,
    pub scoring: ScoringConfig,
    pub timeouts: TimeoutConfig,
    pub assessment: AssessmentConfig,
}

impl Default for TomlConfig {
    fn default() -> Self {
        Self {
            bind: DEFAULT_BIND.to_string(),
            port: DEFAULT_PORT,
            logging: LoggingConfig::default(),
            openai: OpenAiConfig::default(),
            scoring: ScoringConfig::default(),
            timeouts: TimeoutConfig::default(),
            assessment: AssessmentConfig::default(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error); `RUST_LOG` overrides it
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

/// Generative engine and transcription provider (OpenAI-compatible API)
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct OpenAiConfig {
    pub api_key: Option<String>,
    pub base_url: String,
    /// Chat model used for assessment, tips and rewrites
    pub model: String,
    pub temperature: f32,
    /// Speech-to-text model
    pub transcription_model: String,
}

impl Default for OpenAiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: DEFAULT_OPENAI_BASE_URL.to_string(),
            model: "gpt-4o-mini".to_string(),
            temperature: 0.4,
            transcription_model: "whisper-1".to_string(),
        }
    }
}

/// Acoustic scoring service
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ScoringConfig {
    pub base_url: Option<String>,
}

/// Outbound call timeouts
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Per external call, in seconds
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self { request_secs: 60 }
    }
}

/// Text assessment post-processing
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct AssessmentConfig {
    /// Clamp each parsed text dimension to `baseline ± baseline_tolerance`
    pub enforce_baseline_tolerance: bool,
    pub baseline_tolerance: f64,
}

impl Default for AssessmentConfig {
    fn default() -> Self {
        Self {
            enforce_baseline_tolerance: true,
            baseline_tolerance: 2.0,
        }
    }
}

/// Platform default config file: `<config_dir>/cosu/cosu-api.toml`
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("cosu").join("cosu-api.toml"))
}

/// Load the TOML config, falling back to defaults when the file is absent
pub fn load_toml_config(path: &Path) -> Result<TomlConfig> {
    if !path.exists() {
        warn!(
            "Config file not found at {}, using built-in defaults",
            path.display()
        );
        return Ok(TomlConfig::default());
    }

    let content = std::fs::read_to_string(path)?;
    let config: TomlConfig = toml::from_str(&content)
        .map_err(|e| Error::Config(format!("Parse TOML {} failed: {}", path.display(), e)))?;

    if config.assessment.baseline_tolerance < 0.0 {
        return Err(Error::Config(format!(
            "assessment.baseline_tolerance must be >= 0 (got {})",
            config.assessment.baseline_tolerance
        )));
    }

    info!("Loaded config from {}", path.display());
    Ok(config)
}

/// Validate API key (non-empty, non-whitespace)
pub fn is_valid_key(key: &str) -> bool {
    !key.trim().is_empty()
}

/// Resolve the generative/transcription API key
///
/// **Priority:** ENV (`COSU_OPENAI_API_KEY`, then `OPENAI_API_KEY`) → TOML
pub fn resolve_openai_api_key(toml_config: &TomlConfig) -> Result<String> {
    let mut candidates: Vec<(&str, String)> = Vec::new();

    for var in API_KEY_ENV_VARS {
        if let Ok(key) = std::env::var(var) {
            if is_valid_key(&key) {
                candidates.push((var, key));
            }
        }
    }

    if let Some(key) = &toml_config.openai.api_key {
        if is_valid_key(key) {
            candidates.push(("TOML", key.clone()));
        }
    }

    if candidates.len() > 1 {
        let sources: Vec<&str> = candidates.iter().map(|(source, _)| *source).collect();
        warn!(
            "API key found in multiple sources: {}. Using {} (highest priority).",
            sources.join(", "),
            sources[0]
        );
    }

    match candidates.into_iter().next() {
        Some((source, key)) => {
            info!("API key loaded from {}", source);
            Ok(key.trim().to_string())
        }
        None => Err(Error::Config(
            "API key not configured. Set one of:\n\
             1. Environment: COSU_OPENAI_API_KEY=your-key (or OPENAI_API_KEY)\n\
             2. TOML config: [openai] api_key = \"your-key\""
                .to_string(),
        )),
    }
}

/// Resolve the acoustic scoring service base URL
///
/// **Priority:** ENV → TOML → default. Trailing slashes are removed.
pub fn resolve_scoring_url(toml_config: &TomlConfig) -> String {
    let from_env = SCORING_URL_ENV_VARS
        .iter()
        .find_map(|var| std::env::var(var).ok().filter(|v| !v.trim().is_empty()));

    let url = from_env
        .or_else(|| toml_config.scoring.base_url.clone().filter(|v| !v.trim().is_empty()))
        .unwrap_or_else(|| DEFAULT_SCORING_URL.to_string());

    url.trim().trim_end_matches('/').to_string()
}
