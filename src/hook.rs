//! Logging-framework hook contract and the Slack implementation of it.

use std::future::Future;

use crate::config::SlackHookConfig;
use crate::core::{Entry, Severity};
use crate::error::{ConfigError, HookError};
use crate::observability::{Attachment, Field, Message, SlackClient};

/// A handler a logging framework invokes for each qualifying event.
pub trait Hook: Send + Sync + 'static {
    /// Severities this hook wants to see.
    fn levels(&self) -> &'static [Severity];

    /// Handles one event. Errors are returned, never raised.
    fn fire<'a>(
        &'a self,
        entry: &'a Entry,
    ) -> impl Future<Output = Result<(), HookError>> + Send + 'a;
}

/// Renders log entries as Slack messages and posts them via a [`SlackClient`].
#[derive(Debug, Clone)]
pub struct SlackHook {
    client: SlackClient,
    label: String,
    channel: Option<String>,
    env: Option<String>,
}

impl SlackHook {
    pub fn new(client: SlackClient, label: impl Into<String>) -> Self {
        Self {
            client,
            label: label.into(),
            channel: None,
            env: None,
        }
    }

    pub fn from_config(cfg: SlackHookConfig) -> Result<Self, ConfigError> {
        cfg.validate()?;
        Ok(Self {
            client: SlackClient::new(cfg.webhook_url.trim()),
            label: cfg.label,
            channel: cfg.channel.filter(|c| !c.trim().is_empty()),
            env: cfg.env.filter(|e| !e.trim().is_empty()),
        })
    }

    pub fn with_channel(mut self, channel: impl Into<String>) -> Self {
        self.channel = Some(channel.into());
        self
    }

    pub fn with_env(mut self, env: impl Into<String>) -> Self {
        self.env = Some(env.into());
        self
    }

    pub fn client(&self) -> &SlackClient {
        &self.client
    }

    fn footer(&self) -> String {
        match &self.env {
            Some(env) if !env.is_empty() => format!("{env} - {}", self.label),
            _ => self.label.clone(),
        }
    }

    /// Builds the webhook message for `entry`. Pure; no I/O.
    pub fn build_message(&self, entry: &Entry) -> Message {
        let fields = entry
            .data
            .iter()
            .map(|(key, value)| Field::new(key.clone(), value.render()))
            .collect();

        let level = entry.level.as_str().to_uppercase();

        Message {
            text: format!("*[{level}] {}*", entry.message),
            username: None,
            channel: self.channel.clone(),
            attachments: vec![Attachment {
                fallback: format!("[{level}] {}", entry.message),
                text: entry.message.clone(),
                color: entry.level.color().to_string(),
                fields,
                ts: entry.time.unix_timestamp(),
                footer: self.footer(),
                ..Attachment::default()
            }],
        }
    }
}

impl Hook for SlackHook {
    fn levels(&self) -> &'static [Severity] {
        &Severity::HOOKED
    }

    fn fire<'a>(
        &'a self,
        entry: &'a Entry,
    ) -> impl Future<Output = Result<(), HookError>> + Send + 'a {
        async move {
            let message = self.build_message(entry);
            self.client.send(std::slice::from_ref(&message)).await?;
            Ok(())
        }
    }
}

/// Shorthand for a hook with only a webhook URL and a label.
pub fn create_slack_hook(webhook_url: impl Into<String>, label: impl Into<String>) -> SlackHook {
    SlackHook::new(SlackClient::new(webhook_url), label)
}
