use once_cell::sync::OnceCell;
use parking_lot::RwLock;

use super::hook::SlackHookConfig;
use crate::error::ConfigError;
use crate::hook::SlackHook;
use crate::instrumentation::SlackLayer;

static GLOBAL: OnceCell<RwLock<Option<SlackHookConfig>>> = OnceCell::new();

// -------------------------------------------------------
// INITIATE (GLOBAL INIT + TRACING SETUP)
// -------------------------------------------------------

/// Installs a global subscriber (env filter, fmt output, Slack layer) and
/// remembers `cfg`.
///
/// `RUST_LOG` drives the filter; without it everything from INFO up is kept.
/// If another global subscriber is already installed it is left in place.
pub fn initiate(cfg: SlackHookConfig) -> Result<(), ConfigError> {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let hook = SlackHook::from_config(cfg.clone())?;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let fmt_layer = fmt::layer().with_target(true);

    let installed = tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .with(SlackLayer::new(hook))
        .try_init()
        .is_ok();

    let label = cfg.label.clone();
    let cell = GLOBAL.get_or_init(|| RwLock::new(None));
    *cell.write() = Some(cfg);

    if installed {
        tracing::info!(target: "slacklog", label = %label, "slacklog initiated");
    } else {
        tracing::warn!(
            target: "slacklog",
            "a global subscriber was already set; slack layer not installed"
        );
    }
    Ok(())
}

// -------------------------------------------------------
// GETTER
// -------------------------------------------------------
pub fn global() -> Option<SlackHookConfig> {
    GLOBAL.get().and_then(|g| g.read().clone())
}
