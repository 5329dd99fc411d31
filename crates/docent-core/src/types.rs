use serde::{Deserialize, Serialize};

/// A file reference carried on an inbound chat message.
///
/// The transport hosts the file; only the URL and content type reach this
/// system. Bytes are fetched on demand during the upload pipeline.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attachment {
    /// URL the file bytes can be downloaded from.
    pub content_url: String,
    /// MIME content type as reported by the transport.
    pub content_type: String,
    /// Original file name, if the transport provides one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// One inbound chat message — the triggering event for a turn.
///
/// Immutable and single-use: a new value arrives for every turn.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct IncomingMessage {
    /// Stable identifier of the conversation this message belongs to.
    pub conversation_id: String,
    /// Raw message text as typed by the user.
    #[serde(default)]
    pub text: String,
    /// Zero or more file references attached to the message.
    #[serde(default)]
    pub attachments: Vec<Attachment>,
}

impl IncomingMessage {
    /// Construct a plain text message with no attachments.
    pub fn text(conversation_id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            conversation_id: conversation_id.into(),
            text: text.into(),
            attachments: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_constructor() {
        let msg = IncomingMessage::text("conv-1", "hello");
        assert_eq!(msg.conversation_id, "conv-1");
        assert_eq!(msg.text, "hello");
        assert!(msg.attachments.is_empty());
    }

    #[test]
    fn test_message_deserializes_without_optional_fields() {
        let msg: IncomingMessage =
            serde_json::from_str(r#"{"conversation_id": "c1"}"#).unwrap();
        assert_eq!(msg.conversation_id, "c1");
        assert!(msg.text.is_empty());
        assert!(msg.attachments.is_empty());
    }

    #[test]
    fn test_message_deserializes_with_attachments() {
        let msg: IncomingMessage = serde_json::from_str(
            r#"{
                "conversation_id": "c1",
                "text": "upload",
                "attachments": [
                    {"content_url": "http://files/report.pdf", "content_type": "application/pdf", "name": "report.pdf"}
                ]
            }"#,
        )
        .unwrap();
        assert_eq!(msg.attachments.len(), 1);
        assert_eq!(msg.attachments[0].content_type, "application/pdf");
        assert_eq!(msg.attachments[0].name.as_deref(), Some("report.pdf"));
    }

    #[test]
    fn test_attachment_name_optional() {
        let att: Attachment = serde_json::from_str(
            r#"{"content_url": "http://files/1", "content_type": "text/plain"}"#,
        )
        .unwrap();
        assert!(att.name.is_none());
    }

    #[test]
    fn test_message_serialization_roundtrip() {
        let msg = IncomingMessage {
            conversation_id: "c1".to_string(),
            text: "question what is the deadline".to_string(),
            attachments: vec![Attachment {
                content_url: "http://files/1".to_string(),
                content_type: "application/pdf".to_string(),
                name: None,
            }],
        };
        let json = serde_json::to_string(&msg).unwrap();
        let back: IncomingMessage = serde_json::from_str(&json).unwrap();
        assert_eq!(back, msg);
    }
}
