use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;
use zip::ZipArchive;

use super::locator::ArchiveFormat;
use crate::error::{ArchiveError, ParseError};
use crate::models::ConversationRecord;

/// `message.json` in current exports, `message_<n>.json` for paginated and older ones.
static MESSAGE_FILE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^message(?:_(\d+))?\.json$").expect("message file pattern is valid")
});

/// Capabilities every archive sub-format exposes to the loader.
pub trait MessageSource {
    /// Conversation file entries in load order.
    fn list_message_files(&self) -> Result<Vec<String>, ArchiveError>;

    /// Decode one conversation file.
    fn parse(&self, entry: &str) -> Result<ConversationRecord, ParseError>;
}

/// Location and cached entry list of an opened archive.
#[derive(Debug, Clone)]
pub struct ArchiveContents {
    location: PathBuf,
    entries: Vec<String>,
}

impl ArchiveContents {
    pub fn new(location: PathBuf, entries: Vec<String>) -> Self {
        Self { location, entries }
    }
}

#[derive(Debug, Clone)]
pub struct JsonArchive {
    contents: ArchiveContents,
}

/// Deprecated HTML export. Every operation fails.
#[derive(Debug, Clone)]
pub struct LegacyHtmlArchive {
    contents: ArchiveContents,
}

/// A validated export archive.
#[derive(Debug, Clone)]
pub enum Archive {
    Json(JsonArchive),
    LegacyHtml(LegacyHtmlArchive),
}

impl Archive {
    pub fn format(&self) -> ArchiveFormat {
        match self {
            Archive::Json(_) => ArchiveFormat::Json,
            Archive::LegacyHtml(_) => ArchiveFormat::LegacyHtml,
        }
    }

    fn contents(&self) -> &ArchiveContents {
        match self {
            Archive::Json(a) => &a.contents,
            Archive::LegacyHtml(a) => &a.contents,
        }
    }

    pub fn location(&self) -> &Path {
        &self.contents().location
    }

    pub fn entries(&self) -> &[String] {
        &self.contents().entries
    }
}

impl MessageSource for Archive {
    fn list_message_files(&self) -> Result<Vec<String>, ArchiveError> {
        match self {
            Archive::Json(a) => a.list_message_files(),
            Archive::LegacyHtml(a) => a.list_message_files(),
        }
    }

    fn parse(&self, entry: &str) -> Result<ConversationRecord, ParseError> {
        match self {
            Archive::Json(a) => a.parse(entry),
            Archive::LegacyHtml(a) => a.parse(entry),
        }
    }
}

impl JsonArchive {
    pub fn new(contents: ArchiveContents) -> Self {
        Self { contents }
    }
}

impl MessageSource for JsonArchive {
    fn list_message_files(&self) -> Result<Vec<String>, ArchiveError> {
        Ok(order_message_files(&self.contents.entries))
    }

    fn parse(&self, entry: &str) -> Result<ConversationRecord, ParseError> {
        let bytes = read_entry(&self.contents.location, entry)?;
        let record: ConversationRecord = serde_json::from_slice(&bytes)
            .map_err(|source| ParseError::Json { entry: entry.to_string(), source })?;
        debug!(
            entry,
            participants = record.participants.len(),
            messages = record.messages.len(),
            "Parsed conversation file"
        );
        Ok(record)
    }
}

impl LegacyHtmlArchive {
    pub fn new(contents: ArchiveContents) -> Self {
        Self { contents }
    }
}

impl MessageSource for LegacyHtmlArchive {
    fn list_message_files(&self) -> Result<Vec<String>, ArchiveError> {
        Err(ArchiveError::UnsupportedFormat(self.contents.location.clone()))
    }

    fn parse(&self, entry: &str) -> Result<ConversationRecord, ParseError> {
        Err(ParseError::UnsupportedFormat(entry.to_string()))
    }
}

/// Page number of a conversation file name, `None` if it is not one.
///
/// `message.json` counts as page 0.
pub fn message_file_page(entry: &str) -> Option<u64> {
    let file_name = entry.rsplit('/').next()?;
    let captures = MESSAGE_FILE_PATTERN.captures(file_name)?;
    match captures.get(1) {
        Some(page) => page.as_str().parse().ok(),
        None => Some(0),
    }
}

/// Keep conversation files, grouped by directory in first-seen order and
/// sorted by page number within a directory.
pub fn order_message_files(entries: &[String]) -> Vec<String> {
    let mut directory_rank: HashMap<&str, usize> = HashMap::new();
    let mut files: Vec<(usize, u64, &String)> = Vec::new();

    for entry in entries {
        let Some(page) = message_file_page(entry) else {
            continue;
        };
        let directory = entry.rsplit_once('/').map(|(dir, _)| dir).unwrap_or("");
        let next_rank = directory_rank.len();
        let rank = *directory_rank.entry(directory).or_insert(next_rank);
        files.push((rank, page, entry));
    }

    files.sort_by_key(|(rank, page, _)| (*rank, *page));
    files.into_iter().map(|(_, _, entry)| entry.clone()).collect()
}

/// Upper bound on the buffer reserved from an entry's declared size.
const MAX_PREALLOCATION: u64 = 8 * 1024 * 1024;

/// The declared size comes from the ZIP header and is not trusted.
fn preallocation(declared_size: u64) -> usize {
    declared_size.min(MAX_PREALLOCATION) as usize
}

/// Read one entry; the archive handle is closed on return.
fn read_entry(location: &Path, entry: &str) -> Result<Vec<u8>, ParseError> {
    let io_error = |source: std::io::Error| ParseError::Io { entry: entry.to_string(), source };
    let file = File::open(location).map_err(io_error)?;
    let mut zip = ZipArchive::new(file)
        .map_err(|source| ParseError::Read { entry: entry.to_string(), source })?;
    let mut zip_file = zip
        .by_name(entry)
        .map_err(|source| ParseError::Read { entry: entry.to_string(), source })?;

    let mut bytes = Vec::with_capacity(preallocation(zip_file.size()));
    zip_file.read_to_end(&mut bytes).map_err(io_error)?;
    Ok(bytes)
}
