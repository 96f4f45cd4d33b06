use serde::Deserialize;

use crate::error::ConfigError;

pub const ENV_WEBHOOK_URL: &str = "SLACKLOG_WEBHOOK_URL";
pub const ENV_LABEL: &str = "SLACKLOG_LABEL";
pub const ENV_CHANNEL: &str = "SLACKLOG_CHANNEL";
pub const ENV_ENVIRONMENT: &str = "SLACKLOG_ENV";

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct SlackHookConfig {
    /// Incoming-webhook URL every message is POSTed to.
    pub webhook_url: String,

    /// Identifies the emitting service; shown in the attachment footer.
    pub label: String,

    /// Channel override (optional, webhook default otherwise)
    #[serde(default)]
    pub channel: Option<String>,

    /// Environment tag, prefixed to the footer as `"{env} - {label}"`
    #[serde(default)]
    pub env: Option<String>,
}

impl SlackHookConfig {
    pub fn new(webhook_url: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            webhook_url: webhook_url.into(),
            label: label.into(),
            channel: None,
            env: None,
        }
    }

    pub fn with_channel(mut self, channel: impl Into<String>) -> Self {
        self.channel = Some(channel.into());
        self
    }

    pub fn with_env(mut self, env: impl Into<String>) -> Self {
        self.env = Some(env.into());
        self
    }

    /// Reads `SLACKLOG_WEBHOOK_URL` and `SLACKLOG_LABEL` (required) plus
    /// `SLACKLOG_CHANNEL` and `SLACKLOG_ENV` (optional).
    pub fn from_env() -> Result<Self, ConfigError> {
        let webhook_url =
            std::env::var(ENV_WEBHOOK_URL).map_err(|_| ConfigError::MissingEnv(ENV_WEBHOOK_URL))?;
        let label = std::env::var(ENV_LABEL).map_err(|_| ConfigError::MissingEnv(ENV_LABEL))?;

        let cfg = Self {
            webhook_url,
            label,
            channel: non_empty_var(ENV_CHANNEL),
            env: non_empty_var(ENV_ENVIRONMENT),
        };
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let url = self.webhook_url.trim();
        if url.is_empty() {
            return Err(ConfigError::MissingWebhookUrl);
        }
        if let Err(e) = reqwest::Url::parse(url) {
            return Err(ConfigError::InvalidWebhookUrl {
                url: url.to_string(),
                reason: e.to_string(),
            });
        }
        if self.label.trim().is_empty() {
            return Err(ConfigError::MissingLabel);
        }
        Ok(())
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}
