//! Entries and the library collection.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::id::EntryId;

/// One bibliographic record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    /// Stable identity: the citation key.
    pub id: EntryId,

    /// Entry type, e.g. `article` or `book`.
    #[serde(rename = "type", default)]
    pub kind: String,

    /// Named field values (author, title, year, ...).
    #[serde(default)]
    pub fields: BTreeMap<String, String>,
}

impl Entry {
    /// Creates an entry with no fields.
    pub fn new(id: EntryId, kind: impl Into<String>) -> Self {
        Self {
            id,
            kind: kind.into(),
            fields: BTreeMap::new(),
        }
    }

    /// Adds a field value, returning the entry for chaining.
    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.insert(name.into().to_lowercase(), value.into());
        self
    }

    /// Looks up a field value by name, case-insensitively.
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    /// Iterates over all field values in field-name order.
    pub fn field_values(&self) -> impl Iterator<Item = &str> {
        self.fields.values().map(String::as_str)
    }
}

/// An ordered collection of entries: the active library.
///
/// Order is the source collection's order and is preserved by searches.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Library {
    /// The entries in collection order.
    entries: Vec<Entry>,
}

impl Library {
    /// Creates an empty library.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an entry at the end of the collection.
    pub fn push(&mut self, entry: Entry) {
        self.entries.push(entry);
    }

    /// The entries in collection order.
    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    /// Looks up an entry by its identity.
    pub fn get(&self, id: &EntryId) -> Option<&Entry> {
        self.entries.iter().find(|entry| entry.id == *id)
    }

    /// Number of entries in the library.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the library holds no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl From<Vec<Entry>> for Library {
    fn from(entries: Vec<Entry>) -> Self {
        Self { entries }
    }
}

impl FromIterator<Entry> for Library {
    fn from_iter<I: IntoIterator<Item = Entry>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(key: &str) -> Entry {
        Entry::new(EntryId::new(key).unwrap(), "article")
    }

    #[test]
    fn field_lookup_ignores_name_case() {
        let entry = entry("Smith2020").with_field("Author", "Smith, John");

        assert_eq!(entry.field("author"), Some("Smith, John"));
        assert_eq!(entry.field("AUTHOR"), Some("Smith, John"));
        assert_eq!(entry.field("title"), None);
    }

    #[test]
    fn library_preserves_insertion_order() {
        let library: Library = vec![entry("b"), entry("a"), entry("c")].into();

        let keys: Vec<&str> = library
            .entries()
            .iter()
            .map(|e| e.id.as_str())
            .collect();
        assert_eq!(keys, vec!["b", "a", "c"]);
    }

    #[test]
    fn deserializes_from_json_array() {
        let json = r#"[
            {"id": "Smith2020", "type": "article",
             "fields": {"author": "Smith, John", "title": "Electrical Engineering"}}
        ]"#;

        let library: Library = serde_json::from_str(json).unwrap();
        assert_eq!(library.len(), 1);
        assert_eq!(
            library.entries()[0].field("author"),
            Some("Smith, John")
        );
    }
}
