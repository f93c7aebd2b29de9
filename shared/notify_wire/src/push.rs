use serde::{Deserialize, Serialize};

/// Route opened when a push notification without `data.url` is clicked.
pub const DEFAULT_CLICK_URL: &str = "/dashboard";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PushData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

///
/// Push message envelope.
///
/// Every field is defaulted so a partial JSON document still parses.
/// `tag` is the OS tray coalescing key, `renotify` gates
/// vibration/sound on repeated alerts with the same tag.
///
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PushEnvelope {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub body: Option<String>,
    #[serde(default)]
    pub tag: Option<String>,
    #[serde(default = "default_renotify")]
    pub renotify: bool,
    #[serde(default)]
    pub data: PushData,
}

fn default_renotify() -> bool {
    true
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn envelope_parses_with_all_fields() {
        let json = r#"{
            "title": "studyfeed",
            "body": "3 new notes",
            "tag": "content:note:abc:math-101",
            "renotify": false,
            "data": { "url": "/courses/math-101" }
        }"#;

        let envelope = serde_json::from_str::<PushEnvelope>(json).unwrap();

        assert_eq!(envelope.tag.as_deref(), Some("content:note:abc:math-101"));
        assert!(!envelope.renotify);
        assert_eq!(envelope.data.url.as_deref(), Some("/courses/math-101"));
    }

    #[test]
    fn envelope_parses_with_missing_fields() {
        let envelope = serde_json::from_str::<PushEnvelope>("{}").unwrap();

        assert_eq!(envelope.title, None);
        assert_eq!(envelope.body, None);
        assert_eq!(envelope.tag, None);
        assert!(envelope.renotify);
        assert_eq!(envelope.data.url, None);
    }
}
