use std::fmt;

use time::format_description::BorrowedFormatItem;
use time::macros::format_description;
use time::OffsetDateTime;

use super::severity::Severity;

/// `Mon, 02 Jan 2006 15:04:05` followed by the zone.
const RFC1123_PREFIX: &[BorrowedFormatItem<'static>] = format_description!(
    "[weekday repr:short], [day] [month repr:short] [year] [hour]:[minute]:[second]"
);
const NUMERIC_ZONE: &[BorrowedFormatItem<'static>] =
    format_description!("[offset_hour sign:mandatory][offset_minute]");

/// A single log event handed to a hook.
#[derive(Debug, Clone, PartialEq)]
pub struct Entry {
    pub level: Severity,
    pub message: String,
    pub time: OffsetDateTime,
    /// Context fields, in the order they were recorded.
    pub data: Vec<(String, Value)>,
}

impl Entry {
    pub fn new(level: Severity, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
            time: OffsetDateTime::now_utc(),
            data: Vec::new(),
        }
    }

    pub fn at(mut self, time: OffsetDateTime) -> Self {
        self.time = time;
        self
    }

    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.data.push((key.into(), value.into()));
        self
    }
}

/// A context value attached to an [`Entry`].
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Str(String),
    Int(i64),
    UInt(u64),
    Float(f64),
    Bool(bool),
    Time(OffsetDateTime),
}

impl Value {
    /// Text shown in the Slack field. Timestamps use the RFC 1123 layout.
    pub fn render(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Str(s) => f.write_str(s),
            Value::Int(v) => write!(f, "{v}"),
            Value::UInt(v) => write!(f, "{v}"),
            Value::Float(v) => write!(f, "{v}"),
            Value::Bool(v) => write!(f, "{v}"),
            Value::Time(t) => f.write_str(&format_rfc1123(*t)),
        }
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Str(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Str(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Int(v.into())
    }
}

impl From<u64> for Value {
    fn from(v: u64) -> Self {
        Value::UInt(v)
    }
}

impl From<u32> for Value {
    fn from(v: u32) -> Self {
        Value::UInt(v.into())
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<OffsetDateTime> for Value {
    fn from(v: OffsetDateTime) -> Self {
        Value::Time(v)
    }
}

/// Formats `t` like `Mon, 02 Jan 2006 15:04:05 UTC`. Non-UTC offsets print as `+0900`.
pub fn format_rfc1123(t: OffsetDateTime) -> String {
    let zone = if t.offset().is_utc() {
        Ok("UTC".to_string())
    } else {
        t.format(NUMERIC_ZONE)
    };

    match (t.format(RFC1123_PREFIX), zone) {
        (Ok(prefix), Ok(zone)) => format!("{prefix} {zone}"),
        // only reachable on formatter bugs; keep the field readable anyway
        _ => t.to_string(),
    }
}
