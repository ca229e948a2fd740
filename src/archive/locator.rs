//! Validation of candidate export archives.
//!
//! An archive is accepted when it contains a top-level `messages` directory and
//! enough of the other expected category directories. Exports differ between
//! accounts, so the check is a confidence score against a threshold rather than
//! an exact match.

use std::collections::HashSet;
use std::fmt;
use std::fs::File;
use std::path::{Path, PathBuf};

use tracing::{debug, info};
use zip::ZipArchive;

use super::constants::{EXPECTED_SUBDIRECTORIES, LEGACY_HTML_INDEX, MESSAGES};
use super::reader::{Archive, ArchiveContents, JsonArchive, LegacyHtmlArchive};
use crate::error::ArchiveError;

/// Default fraction of expected categories an archive must contain.
pub const DEFAULT_CONFIDENCE_THRESHOLD: f64 = 0.8;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArchiveFormat {
    Json,
    LegacyHtml,
}

impl fmt::Display for ArchiveFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArchiveFormat::Json => write!(f, "json"),
            ArchiveFormat::LegacyHtml => write!(f, "html"),
        }
    }
}

/// Result of comparing an archive's top-level names against the expected categories.
#[derive(Debug, Clone, PartialEq)]
pub struct Fingerprint {
    pub has_messages: bool,
    pub matched: Vec<&'static str>,
    pub confidence: f64,
}

impl Fingerprint {
    pub fn from_entries<S: AsRef<str>>(entries: &[S]) -> Self {
        let found = top_level_names(entries);
        let matched: Vec<&'static str> =
            EXPECTED_SUBDIRECTORIES.iter().copied().filter(|name| found.contains(name)).collect();

        Self {
            has_messages: found.contains(MESSAGES),
            confidence: confidence(&EXPECTED_SUBDIRECTORIES, &found),
            matched,
        }
    }

    /// `messages` is mandatory regardless of the score.
    pub fn passes(&self, threshold: f64) -> bool {
        self.has_messages && self.confidence >= threshold
    }
}

/// Everything learned about an archive without judging it.
#[derive(Debug, Clone)]
pub struct Inspection {
    pub location: PathBuf,
    pub entries: Vec<String>,
    pub fingerprint: Fingerprint,
    pub format: ArchiveFormat,
}

/// Validate `path` with the default threshold and open it as a JSON archive.
pub fn validate(path: &Path) -> Result<Archive, ArchiveError> {
    validate_with_threshold(path, DEFAULT_CONFIDENCE_THRESHOLD)
}

/// Validate `path` and open it as a JSON archive.
///
/// # Errors
///
/// - [`ArchiveError::NotFound`] if `path` is not a regular file
/// - [`ArchiveError::InvalidFormat`] if the file is not a ZIP or the fingerprint check fails
/// - [`ArchiveError::UnsupportedFormat`] for legacy HTML exports
/// - [`ArchiveError::InvalidThreshold`] unless `0 < threshold <= 1`
pub fn validate_with_threshold(path: &Path, threshold: f64) -> Result<Archive, ArchiveError> {
    match open(path, threshold)? {
        Archive::LegacyHtml(_) => Err(ArchiveError::UnsupportedFormat(path.to_path_buf())),
        archive => Ok(archive),
    }
}

/// Open an archive that passes the fingerprint check, whatever its sub-format.
pub fn open(path: &Path, threshold: f64) -> Result<Archive, ArchiveError> {
    check_threshold(threshold)?;
    let inspection = inspect(path)?;

    if !inspection.fingerprint.has_messages {
        return Err(ArchiveError::InvalidFormat {
            path: path.to_path_buf(),
            reason: format!("no top-level '{}' directory", MESSAGES),
        });
    }
    if !inspection.fingerprint.passes(threshold) {
        return Err(ArchiveError::InvalidFormat {
            path: path.to_path_buf(),
            reason: format!(
                "confidence {:.2} is below the required {:.2}",
                inspection.fingerprint.confidence, threshold
            ),
        });
    }

    info!(
        path = %path.display(),
        format = %inspection.format,
        confidence = inspection.fingerprint.confidence,
        "Archive validated"
    );

    let contents = ArchiveContents::new(inspection.location, inspection.entries);
    Ok(match inspection.format {
        ArchiveFormat::Json => Archive::Json(JsonArchive::new(contents)),
        ArchiveFormat::LegacyHtml => Archive::LegacyHtml(LegacyHtmlArchive::new(contents)),
    })
}

/// Read the entry list of `path` and compute its fingerprint and sub-format.
pub fn inspect(path: &Path) -> Result<Inspection, ArchiveError> {
    if !path.is_file() {
        return Err(ArchiveError::NotFound(path.to_path_buf()));
    }

    let entries = read_entry_names(path)?;
    let fingerprint = Fingerprint::from_entries(&entries);
    let format = detect_format(&entries);
    debug!(
        entries = entries.len(),
        matched = fingerprint.matched.len(),
        "Inspected {}",
        path.display()
    );

    Ok(Inspection { location: path.to_path_buf(), entries, fingerprint, format })
}

/// List every entry name in the archive, in central directory order.
///
/// The file handle is released before returning.
pub fn read_entry_names(path: &Path) -> Result<Vec<String>, ArchiveError> {
    let file = File::open(path)?;
    let mut zip = ZipArchive::new(file).map_err(|e| ArchiveError::InvalidFormat {
        path: path.to_path_buf(),
        reason: format!("not a ZIP archive: {}", e),
    })?;

    let mut names = Vec::with_capacity(zip.len());
    for index in 0..zip.len() {
        let entry = zip.by_index_raw(index)?;
        names.push(entry.name().to_string());
    }
    Ok(names)
}

/// A legacy HTML export carries an `index.html` entry.
pub fn detect_format<S: AsRef<str>>(entries: &[S]) -> ArchiveFormat {
    let is_legacy = entries
        .iter()
        .any(|e| e.as_ref().rsplit('/').next() == Some(LEGACY_HTML_INDEX));
    if is_legacy { ArchiveFormat::LegacyHtml } else { ArchiveFormat::Json }
}

/// First path component of every entry.
pub fn top_level_names<S: AsRef<str>>(entries: &[S]) -> HashSet<&str> {
    entries
        .iter()
        .filter_map(|e| e.as_ref().split('/').next())
        .filter(|name| !name.is_empty())
        .collect()
}

/// Fraction of `expected` present in `found`, between 0 and 1.
pub fn confidence(expected: &[&str], found: &HashSet<&str>) -> f64 {
    if expected.is_empty() {
        return 0.0;
    }
    count_matches(expected, found) as f64 / expected.len() as f64
}

/// Number of items of `primary` present in `proposed`.
pub fn count_matches<T: AsRef<str>>(primary: &[T], proposed: &HashSet<&str>) -> usize {
    primary.iter().filter(|item| proposed.contains(item.as_ref())).count()
}

/// Fingerprint thresholds must satisfy `0 < threshold <= 1`.
pub fn check_threshold(threshold: f64) -> Result<(), ArchiveError> {
    if threshold > 0.0 && threshold <= 1.0 {
        Ok(())
    } else {
        Err(ArchiveError::InvalidThreshold(threshold))
    }
}
