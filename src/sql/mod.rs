//! Statement generation from abstract table descriptors.
//!
//! Every generated [`Statement`] has two forms: a parameterized one the store
//! executes, and a rendered one (values single-quoted, quotes stripped) for
//! logs and tests.

pub mod query;
pub mod statement;
pub mod tables;

pub use query::{InsertMode, create_table, insert, lookup_actor_id, sanitize, unique_index};
pub use statement::{SqlValue, Statement};
pub use tables::{actor_table, conversation_table, default_tables, message_table};
