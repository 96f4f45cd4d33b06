use serde::{Deserialize, Serialize};

/// Values at or above this length are rendered full-width in Slack.
pub const SHORT_FIELD_MAX: usize = 25;

/// One incoming-webhook message.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub channel: Option<String>,
    #[serde(default)]
    pub attachments: Vec<Attachment>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Attachment {
    #[serde(default)]
    pub fallback: String,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub pretext: String,
    #[serde(default)]
    pub color: String,
    #[serde(default)]
    pub fields: Vec<Field>,
    /// Epoch seconds.
    #[serde(default)]
    pub ts: i64,
    #[serde(default)]
    pub footer: String,
    #[serde(default)]
    pub footer_icon: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Field {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title_url: Option<String>,
    pub value: String,
    pub short: bool,
}

impl Field {
    pub fn new(title: impl Into<String>, value: impl Into<String>) -> Self {
        let value = value.into();
        Self {
            title: title.into(),
            title_url: None,
            short: value.len() < SHORT_FIELD_MAX,
            value,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn short_flag_flips_at_25_bytes() {
        assert!(Field::new("k", "a".repeat(24)).short);
        assert!(!Field::new("k", "a".repeat(25)).short);
        assert!(!Field::new("k", "a".repeat(80)).short);
        assert!(Field::new("k", "").short);
    }

    #[test]
    fn serializes_with_webhook_field_names() {
        let msg = Message {
            text: "*[INFO] up*".into(),
            channel: Some("#ops".into()),
            attachments: vec![Attachment {
                color: "good".into(),
                fields: vec![Field::new("host", "db1")],
                ts: 1_136_214_245,
                footer: "api".into(),
                ..Attachment::default()
            }],
            ..Message::default()
        };

        let value = serde_json::to_value(&msg).unwrap();
        assert_eq!(value["channel"], json!("#ops"));
        assert!(value.get("username").is_none());
        let att = &value["attachments"][0];
        assert_eq!(att["ts"], json!(1_136_214_245));
        assert_eq!(att["footer_icon"], json!(""));
        assert_eq!(
            att["fields"][0],
            json!({ "title": "host", "value": "db1", "short": true })
        );
    }
}
