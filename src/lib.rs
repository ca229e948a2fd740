//! Messenger Archive Loader - Load Facebook Messenger exports into a relational store
//!
//! This library validates a downloaded account export (a ZIP archive), decodes its
//! conversation files and normalizes them into three tables:
//!
//! - `Conversations` - one row per one-to-one conversation
//! - `Actors` - one row per distinct participant name
//! - `Messages` - one row per message with text content
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//!
//! use messenger_archive_loader::{Loader, SqliteStore, UuidIds, validate};
//!
//! let archive = validate(Path::new("facebook-export.zip"))?;
//! let mut store = SqliteStore::in_memory()?;
//! let summary = Loader::new(&archive, &mut store, UuidIds).populate(true)?;
//! println!("Loaded {} messages", summary.messages_inserted);
//! # Ok::<(), anyhow::Error>(())
//! ```

pub mod archive;
pub mod cli;
pub mod error;
pub mod loader;
pub mod logging;
pub mod models;
pub mod sql;
pub mod store;
pub mod utils;

// Re-export commonly used types
pub use archive::{Archive, MessageSource, validate, validate_with_threshold};
pub use error::{ArchiveError, LoadError, ParseError, SchemaError, StoreError};
pub use loader::{LoadSummary, Loader, LoaderOptions, UserIdentity, UuidIds};
pub use store::{QueryExecutor, SqliteStore};
