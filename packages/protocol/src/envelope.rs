//! The message envelope and tolerant decoding.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use sitecanvas_common::{next_message_id, now_millis};

/// Tagged envelope around one message.
///
/// On the wire this flattens to `{ type, messageId, timestamp, payload }`,
/// with `type`/`payload` contributed by the message enum itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Envelope<M> {
    pub message_id: String,
    pub timestamp: i64,
    #[serde(flatten)]
    pub message: M,
}

impl<M> Envelope<M> {
    /// Wrap a message, stamping a fresh id and the current time.
    pub fn new(message: M) -> Self {
        Self {
            message_id: next_message_id(),
            timestamp: now_millis(),
            message,
        }
    }
}

/// Decode an inbound envelope, tolerantly.
///
/// Returns `None` when the value is not an object, when any of the required
/// envelope fields (`type`, `messageId`, `timestamp`) is missing, or when
/// the `type` is not one this message family recognizes. Never errors:
/// receivers ignore what they do not understand.
pub fn decode<M: DeserializeOwned>(value: &serde_json::Value) -> Option<Envelope<M>> {
    let obj = value.as_object()?;
    if !obj.contains_key("type") || !obj.contains_key("messageId") || !obj.contains_key("timestamp")
    {
        return None;
    }
    serde_json::from_value(value.clone()).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::messages::{EditorMessage, PreviewMessage};
    use serde_json::json;
    use sitecanvas_common::ContentValue;

    #[test]
    fn test_envelope_wire_shape() {
        let env = Envelope::new(EditorMessage::EditorReady {
            site_id: "site-1".into(),
        });
        let value = serde_json::to_value(&env).unwrap();
        assert_eq!(value["type"], "EDITOR_READY");
        assert!(value["messageId"].is_string());
        assert!(value["timestamp"].is_i64());
        assert_eq!(value["payload"]["siteId"], "site-1");
    }

    #[test]
    fn test_decode_round_trip() {
        let env = Envelope::new(EditorMessage::UpdateContent {
            element_id: "home.headline".into(),
            content: ContentValue::Text("Hi".into()),
        });
        let value = serde_json::to_value(&env).unwrap();
        let back = decode::<EditorMessage>(&value).unwrap();
        assert_eq!(back, env);
    }

    #[test]
    fn test_decode_rejects_missing_envelope_fields() {
        let missing_id = json!({
            "type": "IFRAME_READY",
            "timestamp": 1,
        });
        assert!(decode::<PreviewMessage>(&missing_id).is_none());

        let missing_timestamp = json!({
            "type": "IFRAME_READY",
            "messageId": "msg-1",
        });
        assert!(decode::<PreviewMessage>(&missing_timestamp).is_none());

        let missing_type = json!({
            "messageId": "msg-1",
            "timestamp": 1,
        });
        assert!(decode::<PreviewMessage>(&missing_type).is_none());
    }

    #[test]
    fn test_decode_rejects_unknown_type() {
        let unknown = json!({
            "type": "SOMETHING_ELSE",
            "messageId": "msg-1",
            "timestamp": 1,
        });
        assert!(decode::<PreviewMessage>(&unknown).is_none());
        assert!(decode::<EditorMessage>(&unknown).is_none());
    }

    #[test]
    fn test_decode_rejects_non_object() {
        assert!(decode::<PreviewMessage>(&json!("IFRAME_READY")).is_none());
        assert!(decode::<PreviewMessage>(&json!(null)).is_none());
        assert!(decode::<PreviewMessage>(&json!([1, 2])).is_none());
    }

    #[test]
    fn test_decode_wrong_family_is_none() {
        // A preview report is not a valid editor command.
        let env = Envelope::new(PreviewMessage::ElementDeselected);
        let value = serde_json::to_value(&env).unwrap();
        assert!(decode::<EditorMessage>(&value).is_none());
    }
}
