use serde::{Deserialize, Serialize};

/// Thread type the export assigns to multi-party conversations.
pub const GROUP_THREAD_TYPE: &str = "RegularGroup";

/// One decoded conversation file.
///
/// Participants are unique (first occurrence wins, file order kept) and
/// messages are kept in file order, including those without `content`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationRecord {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(deserialize_with = "crate::archive::deserializers::deserialize_participants")]
    pub participants: Vec<Participant>,
    pub messages: Vec<RawMessage>,
    #[serde(default)]
    pub thread_type: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Participant {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawMessage {
    #[serde(default)]
    pub sender_name: Option<String>,
    #[serde(deserialize_with = "crate::archive::deserializers::deserialize_timestamp_ms")]
    pub timestamp_ms: i64,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default, rename = "type")]
    pub message_type: Option<String>,
}

impl ConversationRecord {
    /// Whether the export's thread type marks this as a multi-party conversation.
    ///
    /// Participant counting needs the owner's aliases, see `UserIdentity::is_group`.
    pub fn is_marked_group(&self) -> bool {
        self.thread_type.as_deref() == Some(GROUP_THREAD_TYPE)
    }

    pub fn participant_names(&self) -> impl Iterator<Item = &str> {
        self.participants.iter().map(|p| p.name.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_minimal_record() {
        let json = r#"{
            "participants": [{"name": "Alice"}, {"name": "Bob"}],
            "messages": [
                {"sender_name": "Alice", "timestamp_ms": 1533900000000, "content": "Hi", "type": "Generic"},
                {"sender_name": "Bob", "timestamp_ms": 1533900001000, "type": "Generic"}
            ]
        }"#;

        let record: ConversationRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.title, None);
        assert_eq!(record.participant_names().collect::<Vec<_>>(), vec!["Alice", "Bob"]);
        assert_eq!(record.messages.len(), 2);
        assert_eq!(record.messages[0].content.as_deref(), Some("Hi"));
        // Content-less messages are kept at parse time
        assert_eq!(record.messages[1].content, None);
        assert!(!record.is_marked_group());
    }

    #[test]
    fn test_duplicate_participants_are_collapsed() {
        let json = r#"{
            "participants": [{"name": "Alice"}, {"name": "Bob"}, {"name": "Alice"}],
            "messages": []
        }"#;

        let record: ConversationRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.participant_names().collect::<Vec<_>>(), vec!["Alice", "Bob"]);
    }

    #[test]
    fn test_group_thread_type() {
        let json = r#"{
            "participants": [{"name": "Alice"}, {"name": "Bob"}, {"name": "Carol"}],
            "messages": [],
            "thread_type": "Regular"
        }"#;
        let record: ConversationRecord = serde_json::from_str(json).unwrap();
        assert!(!record.is_marked_group());

        let json = r#"{
            "participants": [{"name": "Alice"}, {"name": "Bob"}],
            "messages": [],
            "thread_type": "RegularGroup"
        }"#;
        let record: ConversationRecord = serde_json::from_str(json).unwrap();
        assert!(record.is_marked_group());
    }

    #[test]
    fn test_missing_messages_is_an_error() {
        let json = r#"{"participants": [{"name": "Alice"}]}"#;
        assert!(serde_json::from_str::<ConversationRecord>(json).is_err());
    }
}
