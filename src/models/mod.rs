//! Data models for message archives and the relational store.
//!
//! - [`ConversationRecord`] - One decoded conversation file (participants + raw messages)
//! - [`RawMessage`] - A message exactly as the export stores it
//! - [`TableSchema`] - Abstract table descriptor consumed by the query builder
//!
//! Conversation models use serde with custom deserializers from
//! `archive::deserializers` for participant deduplication and timestamps.

pub mod conversation;
pub mod schema;

pub use conversation::{ConversationRecord, GROUP_THREAD_TYPE, Participant, RawMessage};
pub use schema::{ColumnSchema, TableSchema};
