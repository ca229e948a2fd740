use std::collections::HashSet;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result, bail};

use crate::models::ConversationRecord;

/// Names the account owner appears under, and the one to store them as.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserIdentity {
    aliases: Vec<String>,
    preferred_name: Option<String>,
}

impl UserIdentity {
    /// `preferred` is a 1-based index into `aliases`; the first alias is used when absent.
    ///
    /// # Errors
    ///
    /// Returns an error if `preferred` does not name an alias.
    pub fn new(aliases: Vec<String>, preferred: Option<usize>) -> Result<Self> {
        let preferred_name = match preferred {
            Some(index) => match index.checked_sub(1).and_then(|i| aliases.get(i)) {
                Some(alias) => Some(alias.clone()),
                None => bail!(
                    "Preferred alias {} is out of range (alias file has {} entries)",
                    index,
                    aliases.len()
                ),
            },
            None => aliases.first().cloned(),
        };
        Ok(Self { aliases, preferred_name })
    }

    /// Read an alias file: one alias per line, blank lines ignored.
    pub fn from_alias_file(path: &Path, preferred: Option<usize>) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read alias file: {}", path.display()))?;
        let aliases = content
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect();
        Self::new(aliases, preferred)
    }

    pub fn aliases(&self) -> &[String] {
        &self.aliases
    }

    pub fn preferred_name(&self) -> Option<&str> {
        self.preferred_name.as_deref()
    }

    pub fn is_self(&self, name: &str) -> bool {
        self.aliases.iter().any(|alias| alias == name)
    }

    /// Aliases of the account owner map to the preferred name.
    pub fn canonical_name<'a>(&'a self, name: &'a str) -> &'a str {
        match &self.preferred_name {
            Some(preferred) if self.is_self(name) => preferred.as_str(),
            _ => name,
        }
    }

    /// Number of participants once the owner's aliases are merged.
    pub fn distinct_participants(&self, record: &ConversationRecord) -> usize {
        record.participant_names().map(|n| self.canonical_name(n)).collect::<HashSet<_>>().len()
    }

    /// More than two distinct participants, or a thread type marking a group.
    pub fn is_group(&self, record: &ConversationRecord) -> bool {
        record.is_marked_group() || self.distinct_participants(record) > 2
    }

    /// The title, else the one other participant, else every participant.
    pub fn conversation_name(&self, record: &ConversationRecord) -> String {
        if let Some(title) = record.title.as_deref().filter(|t| !t.trim().is_empty()) {
            return title.to_string();
        }

        let others: Vec<&str> = record.participant_names().filter(|n| !self.is_self(n)).collect();
        if let [other] = others.as_slice() {
            return other.to_string();
        }

        record
            .participant_names()
            .map(|n| self.canonical_name(n))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use tempfile::NamedTempFile;

    use super::*;
    use crate::models::Participant;

    fn record(title: Option<&str>, names: &[&str]) -> ConversationRecord {
        ConversationRecord {
            title: title.map(str::to_string),
            participants: names.iter().map(|n| Participant { name: n.to_string() }).collect(),
            messages: Vec::new(),
            thread_type: None,
        }
    }

    #[test]
    fn test_default_identity_changes_nothing() {
        let identity = UserIdentity::default();
        assert!(!identity.is_self("Alice"));
        assert_eq!(identity.canonical_name("Alice"), "Alice");
        assert_eq!(identity.preferred_name(), None);
    }

    #[test]
    fn test_aliases_map_to_preferred_name() {
        let aliases = vec!["Mike".to_string(), "Michael Smith".to_string()];
        let identity = UserIdentity::new(aliases, Some(2)).unwrap();

        assert_eq!(identity.canonical_name("Mike"), "Michael Smith");
        assert_eq!(identity.canonical_name("Michael Smith"), "Michael Smith");
        assert_eq!(identity.canonical_name("Alice"), "Alice");
    }

    #[test]
    fn test_preferred_defaults_to_first_alias() {
        let identity = UserIdentity::new(vec!["Mike".to_string()], None).unwrap();
        assert_eq!(identity.preferred_name(), Some("Mike"));
    }

    #[test]
    fn test_preferred_out_of_range() {
        assert!(UserIdentity::new(vec!["Mike".to_string()], Some(2)).is_err());
        assert!(UserIdentity::new(vec!["Mike".to_string()], Some(0)).is_err());
    }

    #[test]
    fn test_from_alias_file() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"Mike\n\n  Michael Smith  \n").unwrap();
        file.flush().unwrap();

        let identity = UserIdentity::from_alias_file(file.path(), Some(2)).unwrap();
        assert_eq!(identity.aliases(), &["Mike".to_string(), "Michael Smith".to_string()]);
        assert_eq!(identity.preferred_name(), Some("Michael Smith"));
    }

    #[test]
    fn test_from_missing_alias_file() {
        let err = UserIdentity::from_alias_file(Path::new("/nonexistent/aliases.txt"), None)
            .unwrap_err();
        assert!(err.to_string().contains("Failed to read alias file"));
    }

    #[test]
    fn test_group_detection_merges_owner_aliases() {
        let identity =
            UserIdentity::new(vec!["Mike".to_string(), "Michael".to_string()], None).unwrap();
        let two_names_for_owner = record(None, &["Mike", "Michael", "Bob"]);

        assert_eq!(identity.distinct_participants(&two_names_for_owner), 2);
        assert!(!identity.is_group(&two_names_for_owner));
        assert!(UserIdentity::default().is_group(&two_names_for_owner));
        assert!(identity.is_group(&record(None, &["Mike", "Bob", "Carol"])));

        let mut marked = record(None, &["Mike", "Bob"]);
        marked.thread_type = Some("RegularGroup".to_string());
        assert!(identity.is_group(&marked));
    }

    #[test]
    fn test_conversation_name() {
        let identity = UserIdentity::new(vec!["Mike".to_string()], None).unwrap();

        assert_eq!(identity.conversation_name(&record(Some("Book club"), &["Mike", "Alice"])), "Book club");
        assert_eq!(identity.conversation_name(&record(None, &["Alice", "Mike"])), "Alice");
        assert_eq!(identity.conversation_name(&record(Some("  "), &["Mike", "Alice"])), "Alice");
        // Without a known owner, both names are used
        assert_eq!(
            UserIdentity::default().conversation_name(&record(None, &["Alice", "Bob"])),
            "Alice, Bob"
        );
    }
}
