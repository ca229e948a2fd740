//! Shared test utilities for integration tests
#![allow(dead_code)]

use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use messenger_archive_loader::archive::constants::EXPECTED_SUBDIRECTORIES;
use serde_json::{Value, json};
use tempfile::TempDir;
use zip::ZipWriter;
use zip::write::SimpleFileOptions;

/// A ZIP archive written into its own temp directory
pub struct TestArchive {
    temp_dir: TempDir,
    path: PathBuf,
}

impl TestArchive {
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// A path next to the archive that does not exist yet
    pub fn output_path(&self, name: &str) -> PathBuf {
        self.temp_dir.path().join(name)
    }
}

/// Builder for export archives
pub struct ArchiveBuilder {
    entries: Vec<(String, Option<Vec<u8>>)>,
}

impl ArchiveBuilder {
    /// An archive with no entries
    pub fn new() -> Self {
        Self { entries: Vec::new() }
    }

    /// An archive with every expected top-level directory
    pub fn export() -> Self {
        Self::new().with_directories(&EXPECTED_SUBDIRECTORIES)
    }

    /// Add empty directory entries
    pub fn with_directories(mut self, names: &[&str]) -> Self {
        for name in names {
            self.entries.push((format!("{}/", name), None));
        }
        self
    }

    /// Add a file entry with raw content
    pub fn with_file(mut self, name: &str, content: &[u8]) -> Self {
        self.entries.push((name.to_string(), Some(content.to_vec())));
        self
    }

    /// Add `messages/inbox/<thread>/message_<page>.json`
    pub fn with_conversation(
        self,
        thread: &str,
        page: u32,
        conversation: &ConversationBuilder,
    ) -> Self {
        let name = format!("messages/inbox/{}/message_{}.json", thread, page);
        let content = conversation.to_json();
        self.with_file(&name, content.as_bytes())
    }

    /// Write the archive to `<tempdir>/facebook-export.zip`
    pub fn build(self) -> TestArchive {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let path = temp_dir.path().join("facebook-export.zip");
        let file = File::create(&path).expect("Failed to create archive");

        let mut zip = ZipWriter::new(file);
        let options = SimpleFileOptions::default();
        for (name, content) in self.entries {
            match content {
                Some(bytes) => {
                    zip.start_file(name, options).expect("Failed to start entry");
                    zip.write_all(&bytes).expect("Failed to write entry");
                }
                None => zip.add_directory(name, options).expect("Failed to add directory"),
            }
        }
        zip.finish().expect("Failed to finish archive");

        TestArchive { temp_dir, path }
    }
}

impl Default for ArchiveBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for conversation files
pub struct ConversationBuilder {
    title: Option<String>,
    participants: Vec<String>,
    messages: Vec<MessageBuilder>,
    thread_type: Option<String>,
}

impl ConversationBuilder {
    pub fn new(participants: &[&str]) -> Self {
        Self {
            title: None,
            participants: participants.iter().map(|p| p.to_string()).collect(),
            messages: Vec::new(),
            thread_type: Some("Regular".to_string()),
        }
    }

    pub fn title(mut self, title: &str) -> Self {
        self.title = Some(title.to_string());
        self
    }

    pub fn thread_type(mut self, thread_type: &str) -> Self {
        self.thread_type = Some(thread_type.to_string());
        self
    }

    pub fn message(mut self, message: MessageBuilder) -> Self {
        self.messages.push(message);
        self
    }

    pub fn to_json(&self) -> String {
        let mut value = json!({
            "participants":
                self.participants.iter().map(|p| json!({"name": p})).collect::<Vec<_>>(),
            "messages": self.messages.iter().map(MessageBuilder::to_value).collect::<Vec<_>>(),
        });
        if let Some(title) = &self.title {
            value["title"] = json!(title);
        }
        if let Some(thread_type) = &self.thread_type {
            value["thread_type"] = json!(thread_type);
        }
        value.to_string()
    }
}

/// Builder for messages inside a conversation file
pub struct MessageBuilder {
    sender_name: Option<String>,
    timestamp_ms: i64,
    content: Option<String>,
}

impl MessageBuilder {
    pub fn new(sender_name: &str, timestamp_ms: i64) -> Self {
        Self { sender_name: Some(sender_name.to_string()), timestamp_ms, content: None }
    }

    pub fn text(sender_name: &str, timestamp_ms: i64, content: &str) -> Self {
        Self::new(sender_name, timestamp_ms).content(content)
    }

    pub fn content(mut self, content: &str) -> Self {
        self.content = Some(content.to_string());
        self
    }

    pub fn without_sender(mut self) -> Self {
        self.sender_name = None;
        self
    }

    pub fn to_value(&self) -> Value {
        let mut value = json!({"timestamp_ms": self.timestamp_ms, "type": "Generic"});
        if let Some(sender_name) = &self.sender_name {
            value["sender_name"] = json!(sender_name);
        }
        if let Some(content) = &self.content {
            value["content"] = json!(content);
        }
        value
    }
}

/// Alice and Bob talking in one conversation file
pub fn alice_and_bob() -> ConversationBuilder {
    ConversationBuilder::new(&["Alice", "Bob"])
        .message(MessageBuilder::text("Alice", 1533900000000, "Hi Bob"))
        .message(MessageBuilder::text("Bob", 1533900060000, "Hi Alice"))
}
