//! Loading of conversation files into the normalized store.
//!
//! # Error Handling Strategy
//!
//! - **Row-level failures**: a statement the store rejects is logged at error level with
//!   its text and the row is dropped. If the Conversation row of a file fails, the rest
//!   of that file is skipped since nothing could reference it.
//! - **File-level failures**: a conversation file that fails to parse is logged and
//!   skipped, unless [`LoaderOptions::strict`] is set.
//! - **Failure threshold**: the load fails if more than half of the message files fail
//!   to parse.
//! - **Schema errors** always propagate; they indicate a programming error.

use tracing::{debug, error, info, warn};

use super::identity::UserIdentity;
use super::ids::IdGenerator;
use crate::archive::MessageSource;
use crate::error::LoadError;
use crate::models::{ConversationRecord, RawMessage, TableSchema};
use crate::sql::tables::{
    ACTOR_ID, ACTOR_NAME, CONTENT, CONVERSATION_ID, CONVERSATION_NAME, MESSAGE_ID, TIMESTAMP,
};
use crate::sql::{
    InsertMode, SqlValue, Statement, actor_table, conversation_table, create_table,
    default_tables, insert, lookup_actor_id, message_table, unique_index,
};
use crate::store::QueryExecutor;

/// Actor identifier used when a sender cannot be resolved.
pub const UNKNOWN_ACTOR: &str = "UNKNOWN_ACTOR";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadState {
    Uninitialized,
    SchemaCreated,
    Populating,
    Complete,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoaderOptions {
    /// Abort the load on the first conversation file that fails to parse.
    pub strict: bool,
}

/// Counters collected over one load.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadSummary {
    pub files_processed: usize,
    pub files_failed: usize,
    pub group_conversations_skipped: usize,
    pub conversations: usize,
    pub actor_inserts: usize,
    pub messages_inserted: usize,
    pub messages_without_content: usize,
    pub unknown_senders: usize,
    pub failed_rows: usize,
    pub earliest_timestamp_ms: Option<i64>,
    pub latest_timestamp_ms: Option<i64>,
}

impl LoadSummary {
    fn record_timestamp(&mut self, timestamp_ms: i64) {
        self.earliest_timestamp_ms =
            Some(self.earliest_timestamp_ms.map_or(timestamp_ms, |t| t.min(timestamp_ms)));
        self.latest_timestamp_ms =
            Some(self.latest_timestamp_ms.map_or(timestamp_ms, |t| t.max(timestamp_ms)));
    }
}

/// Loads one archive into a store.
pub struct Loader<'a, A: MessageSource + ?Sized, S: QueryExecutor, G: IdGenerator> {
    archive: &'a A,
    store: S,
    ids: G,
    identity: UserIdentity,
    options: LoaderOptions,
    messages: TableSchema,
    actors: TableSchema,
    conversations: TableSchema,
    state: LoadState,
}

impl<'a, A, S, G> Loader<'a, A, S, G>
where
    A: MessageSource + ?Sized,
    S: QueryExecutor,
    G: IdGenerator,
{
    pub fn new(archive: &'a A, store: S, ids: G) -> Self {
        Self {
            archive,
            store,
            ids,
            identity: UserIdentity::default(),
            options: LoaderOptions::default(),
            messages: message_table(),
            actors: actor_table(),
            conversations: conversation_table(),
            state: LoadState::Uninitialized,
        }
    }

    pub fn with_identity(mut self, identity: UserIdentity) -> Self {
        self.identity = identity;
        self
    }

    pub fn with_options(mut self, options: LoaderOptions) -> Self {
        self.options = options;
        self
    }

    pub fn state(&self) -> LoadState {
        self.state
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    /// Create the default Messages, Actors and Conversations tables.
    pub fn create_default_tables(&mut self) -> Result<(), LoadError> {
        self.create_tables(&default_tables())
    }

    /// Create each table in order, followed by its unique index if it has one.
    ///
    /// Calling this again re-issues the statements; the store decides whether
    /// re-creation is an error.
    pub fn create_tables(&mut self, schemas: &[TableSchema]) -> Result<(), LoadError> {
        for schema in schemas {
            info!("Creating '{}' table...", schema.name);
            self.store.execute(&create_table(schema))?;
            if let Some(index) = unique_index(schema) {
                debug!("Enforcing unique columns...");
                self.store.execute(&index)?;
            }
        }
        self.state = LoadState::SchemaCreated;
        Ok(())
    }

    /// Load every conversation file of the archive.
    ///
    /// # Errors
    ///
    /// - [`LoadError::NotReady`] if tables were never created and `create_tables` is false
    /// - [`LoadError::Archive`] if message files cannot be listed
    /// - [`LoadError::Parse`] on the first bad file in strict mode
    /// - [`LoadError::TooManyFailures`] if more than half the files fail to parse
    pub fn populate(&mut self, create_tables: bool) -> Result<LoadSummary, LoadError> {
        if self.state == LoadState::Uninitialized {
            if !create_tables {
                return Err(LoadError::NotReady);
            }
            self.create_default_tables()?;
        }

        self.state = LoadState::Populating;
        let message_files = self.archive.list_message_files()?;
        info!("Processing {} message files", message_files.len());

        let mut summary = LoadSummary::default();
        for message_file in &message_files {
            info!("Populating data from '{}'...", message_file);
            let record = match self.archive.parse(message_file) {
                Ok(record) => record,
                Err(e) if !self.options.strict => {
                    warn!("Skipping message file {}: {}", message_file, e);
                    summary.files_failed += 1;
                    continue;
                }
                Err(e) => return Err(e.into()),
            };
            self.load_conversation(&record, &mut summary)?;
            summary.files_processed += 1;
        }

        let total = message_files.len();
        if summary.files_failed * 2 > total {
            return Err(LoadError::TooManyFailures { failed: summary.files_failed, total });
        }

        info!(
            "Loaded {} conversations and {} messages ({} files failed, {} rows failed)",
            summary.conversations,
            summary.messages_inserted,
            summary.files_failed,
            summary.failed_rows
        );
        self.state = LoadState::Complete;
        Ok(summary)
    }

    fn load_conversation(
        &mut self,
        record: &ConversationRecord,
        summary: &mut LoadSummary,
    ) -> Result<(), LoadError> {
        if self.identity.is_group(record) {
            info!(
                "Skipping group conversation with {} participants (group chats not supported)",
                self.identity.distinct_participants(record)
            );
            summary.group_conversations_skipped += 1;
            return Ok(());
        }

        debug!("Modelling Conversation...");
        let conversation_id = self.ids.next_id();
        let statement = insert(
            &self.conversations,
            &[
                (CONVERSATION_ID, SqlValue::from(conversation_id.as_str())),
                (CONVERSATION_NAME, SqlValue::from(self.identity.conversation_name(record))),
            ],
            InsertMode::AllowDuplicates,
        )?;
        if !self.run(&statement, summary) {
            return Ok(());
        }
        summary.conversations += 1;

        debug!("Extracting actors...");
        for participant in record.participant_names() {
            let actor_name = self.identity.canonical_name(participant).to_string();
            let actor_id = self.ids.next_id();
            let statement = insert(
                &self.actors,
                &[(ACTOR_ID, SqlValue::from(actor_id)), (ACTOR_NAME, SqlValue::from(actor_name))],
                InsertMode::IgnoreDuplicates,
            )?;
            if self.run(&statement, summary) {
                summary.actor_inserts += 1;
            }
        }

        debug!("Extracting messages...");
        for message in &record.messages {
            self.load_message(message, &conversation_id, summary)?;
        }
        Ok(())
    }

    fn load_message(
        &mut self,
        message: &RawMessage,
        conversation_id: &str,
        summary: &mut LoadSummary,
    ) -> Result<(), LoadError> {
        let Some(content) = message.content.as_deref() else {
            debug!(
                message_type = message.message_type.as_deref().unwrap_or("unknown"),
                "Skipping message without content"
            );
            summary.messages_without_content += 1;
            return Ok(());
        };

        let Some(actor_id) = self.lookup_sender_id(message.sender_name.as_deref(), summary) else {
            return Ok(());
        };

        let message_id = self.ids.next_id();
        let statement = insert(
            &self.messages,
            &[
                (MESSAGE_ID, SqlValue::from(message_id)),
                (ACTOR_ID, SqlValue::from(actor_id)),
                (CONVERSATION_ID, SqlValue::from(conversation_id)),
                (TIMESTAMP, SqlValue::from(message.timestamp_ms)),
                (CONTENT, SqlValue::from(content)),
            ],
            InsertMode::AllowDuplicates,
        )?;
        if self.run(&statement, summary) {
            summary.messages_inserted += 1;
            summary.record_timestamp(message.timestamp_ms);
        }
        Ok(())
    }

    /// Exact-name lookup; [`UNKNOWN_ACTOR`] when nobody matches.
    ///
    /// Returns `None` if the lookup itself failed, in which case the message is dropped.
    fn lookup_sender_id(
        &mut self,
        sender_name: Option<&str>,
        summary: &mut LoadSummary,
    ) -> Option<String> {
        let Some(sender_name) = sender_name else {
            summary.unknown_senders += 1;
            return Some(UNKNOWN_ACTOR.to_string());
        };

        let statement = lookup_actor_id(self.identity.canonical_name(sender_name));
        match self.store.execute(&statement) {
            Ok(rows) => {
                match rows.first().and_then(|row| row.first()).and_then(SqlValue::as_text) {
                    Some(actor_id) => Some(actor_id.to_string()),
                    None => {
                        debug!("No actor named '{}', using {}", sender_name, UNKNOWN_ACTOR);
                        summary.unknown_senders += 1;
                        Some(UNKNOWN_ACTOR.to_string())
                    }
                }
            }
            Err(e) => {
                error!("Failed to run query: {} ({})", statement, e);
                summary.failed_rows += 1;
                None
            }
        }
    }

    /// Execute one statement, logging and counting a failure instead of propagating it.
    fn run(&mut self, statement: &Statement, summary: &mut LoadSummary) -> bool {
        match self.store.execute(statement) {
            Ok(_) => true,
            Err(e) => {
                error!("Failed to run query: {} ({})", statement, e);
                summary.failed_rows += 1;
                false
            }
        }
    }
}
