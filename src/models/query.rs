//! Query definitions and the normalized catalog.

use serde::{Deserialize, Serialize};

/// One named Resource Graph query.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct QueryDefinition {
    pub name: String,
    /// KQL text. Empty text means the entry is skipped, not failed.
    pub query: String,
    #[serde(default)]
    pub description: String,
    /// File name without extension used for `<stem>.json` / `<stem>.csv`.
    pub output_file: String,
}

impl QueryDefinition {
    pub fn new(name: impl Into<String>, query: impl Into<String>) -> Self {
        let name = name.into();
        QueryDefinition {
            output_file: default_file_stem(&name),
            name,
            query: query.into(),
            description: String::new(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_output_file(mut self, stem: impl Into<String>) -> Self {
        self.output_file = stem.into();
        self
    }

    /// Whitespace-only text counts as empty.
    pub fn has_query_text(&self) -> bool {
        !self.query.trim().is_empty()
    }
}

/// `"Key Vault Config"` -> `"key_vault_config"`.
pub fn default_file_stem(name: &str) -> String {
    name.replace(' ', "_").to_lowercase()
}

/// Insertion-ordered map of query name to definition.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryCatalog {
    entries: Vec<QueryDefinition>,
}

impl QueryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a definition. A definition with an existing name replaces the
    /// old one in place and the replaced value is returned.
    pub fn insert(&mut self, def: QueryDefinition) -> Option<QueryDefinition> {
        match self.entries.iter_mut().find(|e| e.name == def.name) {
            Some(slot) => Some(std::mem::replace(slot, def)),
            None => {
                self.entries.push(def);
                None
            }
        }
    }

    pub fn get(&self, name: &str) -> Option<&QueryDefinition> {
        self.entries.iter().find(|e| e.name == name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, QueryDefinition> {
        self.entries.iter()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.name.as_str())
    }
}

impl<'a> IntoIterator for &'a QueryCatalog {
    type Item = &'a QueryDefinition;
    type IntoIter = std::slice::Iter<'a, QueryDefinition>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

impl FromIterator<QueryDefinition> for QueryCatalog {
    fn from_iter<T: IntoIterator<Item = QueryDefinition>>(iter: T) -> Self {
        let mut catalog = QueryCatalog::new();
        for def in iter {
            catalog.insert(def);
        }
        catalog
    }
}
