//! Ship log events to a Slack incoming webhook.
//!
//! [`SlackHook`] turns an [`Entry`] into a webhook [`Message`] (colored
//! attachment, context fields, footer label) and posts it with a
//! [`SlackClient`]. [`SlackLayer`] plugs the hook into `tracing`, and
//! [`initiate`] wires the whole thing into a global subscriber.

pub mod config;
pub mod core;
pub mod error;
pub mod hook;
pub mod instrumentation;
pub mod observability;

pub use config::{global, initiate, SlackHookConfig};
pub use crate::core::{Entry, Severity, Value};
pub use error::{ConfigError, HookError, NotifyError};
pub use hook::{create_slack_hook, Hook, SlackHook};
pub use instrumentation::SlackLayer;
pub use observability::{Attachment, Field, Message, SlackClient};
