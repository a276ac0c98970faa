//! Service configuration for cosu-api
//!
//! Resolves the runtime settings with CLI → ENV → TOML → default priority.
//! The CLI and ENV tiers arrive together from clap (`#[arg(env = ...)]`);
//! secrets and service URLs are resolved by `cosu_common::config`.

use cosu_common::config::{resolve_openai_api_key, resolve_scoring_url, AssessmentConfig, TomlConfig};
use cosu_common::Result;
use std::net::{IpAddr, SocketAddr};
use tracing::info;

/// Values given on the command line or through their environment variables
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub bind: Option<String>,
    pub port: Option<u16>,
}

/// Generative engine and transcription settings
#[derive(Clone)]
pub struct OpenAiSettings {
    pub api_key: String,
    pub base_url: String,
    pub model: String,
    pub temperature: f32,
    pub transcription_model: String,
}

impl std::fmt::Debug for OpenAiSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAiSettings")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("temperature", &self.temperature)
            .field("transcription_model", &self.transcription_model)
            .finish()
    }
}

/// Fully resolved service configuration
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub listen_addr: SocketAddr,
    pub openai: OpenAiSettings,
    pub scoring_url: String,
    pub request_timeout_secs: u64,
    pub assessment: AssessmentConfig,
}

impl ServiceConfig {
    pub fn resolve(cli: &CliOverrides, toml_config: &TomlConfig) -> Result<Self> {
        let bind = cli.bind.clone().unwrap_or_else(|| toml_config.bind.clone());
        let ip: IpAddr = bind
            .trim()
            .parse()
            .map_err(|e| cosu_common::Error::Config(format!("Invalid bind address '{}': {}", bind, e)))?;
        let port = cli.port.unwrap_or(toml_config.port);

        let api_key = resolve_openai_api_key(toml_config)?;
        let scoring_url = resolve_scoring_url(toml_config);

        if toml_config.timeouts.request_secs == 0 {
            return Err(cosu_common::Error::Config(
                "timeouts.request_secs must be at least 1".to_string(),
            ));
        }

        let config = Self {
            listen_addr: SocketAddr::new(ip, port),
            openai: OpenAiSettings {
                api_key,
                base_url: toml_config.openai.base_url.trim_end_matches('/').to_string(),
                model: toml_config.openai.model.clone(),
                temperature: toml_config.openai.temperature,
                transcription_model: toml_config.openai.transcription_model.clone(),
            },
            scoring_url,
            request_timeout_secs: toml_config.timeouts.request_secs,
            assessment: toml_config.assessment.clone(),
        };

        info!(
            listen = %config.listen_addr,
            model = %config.openai.model,
            scoring_url = %config.scoring_url,
            timeout_secs = config.request_timeout_secs,
            enforce_baseline_tolerance = config.assessment.enforce_baseline_tolerance,
            "Configuration resolved"
        );

        Ok(config)
    }
}
