use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Log event importance, most severe first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Severity {
    Panic,
    Fatal,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Attachment color bar per severity. Anything not listed uses [`DEFAULT_COLOR`].
pub const COLORS: &[(Severity, &str)] = &[
    (Severity::Error, "danger"),
    (Severity::Fatal, "#fe6565"),
    (Severity::Warn, "warning"),
    (Severity::Info, "good"),
];

pub const DEFAULT_COLOR: &str = "danger";

impl Severity {
    /// Levels a Slack hook is interested in. Debug and Trace never reach the webhook.
    pub const HOOKED: [Severity; 5] = [
        Severity::Panic,
        Severity::Fatal,
        Severity::Error,
        Severity::Warn,
        Severity::Info,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Severity::Panic => "panic",
            Severity::Fatal => "fatal",
            Severity::Error => "error",
            Severity::Warn => "warning",
            Severity::Info => "info",
            Severity::Debug => "debug",
            Severity::Trace => "trace",
        }
    }

    pub fn color(self) -> &'static str {
        COLORS
            .iter()
            .find(|(sev, _)| *sev == self)
            .map(|(_, color)| *color)
            .unwrap_or(DEFAULT_COLOR)
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown severity {0:?}")]
pub struct UnknownSeverity(pub String);

impl FromStr for Severity {
    type Err = UnknownSeverity;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "panic" => Ok(Severity::Panic),
            "fatal" => Ok(Severity::Fatal),
            "error" => Ok(Severity::Error),
            "warn" | "warning" => Ok(Severity::Warn),
            "info" => Ok(Severity::Info),
            "debug" => Ok(Severity::Debug),
            "trace" => Ok(Severity::Trace),
            _ => Err(UnknownSeverity(s.to_string())),
        }
    }
}

impl From<tracing::Level> for Severity {
    fn from(level: tracing::Level) -> Self {
        match level {
            tracing::Level::ERROR => Severity::Error,
            tracing::Level::WARN => Severity::Warn,
            tracing::Level::INFO => Severity::Info,
            tracing::Level::DEBUG => Severity::Debug,
            _ => Severity::Trace,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn color_table() {
        assert_eq!(Severity::Error.color(), "danger");
        assert_eq!(Severity::Fatal.color(), "#fe6565");
        assert_eq!(Severity::Warn.color(), "warning");
        assert_eq!(Severity::Info.color(), "good");
        assert_eq!(Severity::Panic.color(), "danger");
        assert_eq!(Severity::Debug.color(), "danger");
        assert_eq!(Severity::Trace.color(), "danger");
    }

    #[test]
    fn hooked_levels_exclude_debug_and_trace() {
        assert!(!Severity::HOOKED.contains(&Severity::Debug));
        assert!(!Severity::HOOKED.contains(&Severity::Trace));
        assert_eq!(Severity::HOOKED[0], Severity::Panic);
    }

    #[test]
    fn parses_names_and_aliases() {
        assert_eq!("FATAL".parse::<Severity>(), Ok(Severity::Fatal));
        assert_eq!("warn".parse::<Severity>(), Ok(Severity::Warn));
        assert_eq!(" warning ".parse::<Severity>(), Ok(Severity::Warn));
        let err = "loud".parse::<Severity>().unwrap_err();
        assert_eq!(err.to_string(), "unknown severity \"loud\"");
    }

    #[test]
    fn ordering_is_most_severe_first() {
        assert!(Severity::Panic < Severity::Fatal);
        assert!(Severity::Info < Severity::Debug);
    }

    #[test]
    fn maps_tracing_levels() {
        assert_eq!(Severity::from(tracing::Level::ERROR), Severity::Error);
        assert_eq!(Severity::from(tracing::Level::WARN), Severity::Warn);
        assert_eq!(Severity::from(tracing::Level::TRACE), Severity::Trace);
    }
}
