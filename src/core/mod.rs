pub mod entry;
pub mod severity;

pub use entry::{format_rfc1123, Entry, Value};
pub use severity::{Severity, UnknownSeverity, COLORS, DEFAULT_COLOR};
