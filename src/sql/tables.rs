//! Fixed table descriptors for the normalized message store.
//!
//! Identifier columns hold random tokens, so they are declared as text keys.

use crate::models::{ColumnSchema, TableSchema};

pub const MESSAGES: &str = "Messages";
pub const ACTORS: &str = "Actors";
pub const CONVERSATIONS: &str = "Conversations";

pub const MESSAGE_ID: &str = "Message_ID";
pub const ACTOR_ID: &str = "Actor_ID";
pub const ACTOR_NAME: &str = "Actor_Name";
pub const CONVERSATION_ID: &str = "Conversation_ID";
pub const CONVERSATION_NAME: &str = "Conversation_Name";
pub const TIMESTAMP: &str = "Timestamp";
pub const CONTENT: &str = "Content";

pub fn message_table() -> TableSchema {
    TableSchema::new(
        MESSAGES,
        vec![
            ColumnSchema::new(MESSAGE_ID, "text").attributes(&["primary", "key"]),
            ColumnSchema::new(ACTOR_ID, "text"),
            ColumnSchema::new(CONVERSATION_ID, "text"),
            ColumnSchema::new(TIMESTAMP, "integer"),
            ColumnSchema::new(CONTENT, "text"),
        ],
    )
}

pub fn actor_table() -> TableSchema {
    TableSchema::new(
        ACTORS,
        vec![
            ColumnSchema::new(ACTOR_ID, "text").attributes(&["primary", "key"]),
            ColumnSchema::new(ACTOR_NAME, "text").unique(),
        ],
    )
}

pub fn conversation_table() -> TableSchema {
    TableSchema::new(
        CONVERSATIONS,
        vec![
            ColumnSchema::new(CONVERSATION_ID, "text").attributes(&["primary", "key"]),
            ColumnSchema::new(CONVERSATION_NAME, "text"),
        ],
    )
}

/// All tables, in creation order.
pub fn default_tables() -> Vec<TableSchema> {
    vec![message_table(), actor_table(), conversation_table()]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sql::{create_table, unique_index};

    #[test]
    fn test_default_table_statements() {
        let statements: Vec<String> = default_tables()
            .iter()
            .flat_map(|t| std::iter::once(create_table(t)).chain(unique_index(t)))
            .map(|s| s.to_string())
            .collect();

        assert_eq!(
            statements,
            vec![
                "CREATE table Messages(Message_ID text primary key, Actor_ID text, \
                 Conversation_ID text, Timestamp integer, Content text)",
                "CREATE table Actors(Actor_ID text primary key, Actor_Name text)",
                "CREATE UNIQUE INDEX Actors_index ON Actors (Actor_Name)",
                "CREATE table Conversations(Conversation_ID text primary key, Conversation_Name text)",
            ]
        );
    }
}
