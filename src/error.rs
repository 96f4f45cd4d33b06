//! Error types for webhook delivery and hook configuration.

use thiserror::Error;

/// Errors returned by [`SlackClient::send`](crate::observability::SlackClient::send).
#[derive(Debug, Error)]
pub enum NotifyError {
    /// The webhook answered with a status >= 400.
    #[error("[Slack]: {code} {reason}")]
    Delivery { code: u16, reason: String },

    /// No response was received (connect failure, reset, TLS, ...).
    #[error("cannot send message to slack: {0}")]
    Transport(#[source] reqwest::Error),

    /// The payload could not be serialized; nothing was sent.
    #[error("cannot encode slack message: {0}")]
    Encoding(#[from] serde_json::Error),
}

/// Errors surfaced by a [`Hook`](crate::hook::Hook) to the logging framework.
#[derive(Debug, Error)]
pub enum HookError {
    #[error("delivery hook error: {0}")]
    Delivery(#[from] NotifyError),

    /// The delivery runtime or its helper thread could not be started.
    #[error("delivery hook error: cannot start runtime: {0}")]
    Runtime(#[source] std::io::Error),

    #[error("delivery hook error: delivery thread panicked")]
    Panicked,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("slack webhook url is empty")]
    MissingWebhookUrl,

    #[error("slack webhook url {url:?} is invalid: {reason}")]
    InvalidWebhookUrl { url: String, reason: String },

    #[error("slack hook label is empty")]
    MissingLabel,

    #[error("environment variable {0} is not set")]
    MissingEnv(&'static str),
}
