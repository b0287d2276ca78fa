//! Query config normalization.
//!
//! Query config files come in three shapes. The first shape that matches, in
//! this order, decides how the document is read:
//!
//! 1. grouped: `{"<category>": {"queries": [{...}, ...]}, ...}`
//! 2. flat: `{"<name>": {"query": "..."}, ...}`
//! 3. list: `[{"name": "...", "query": "..."}, ...]`
//!
//! A document matching none of them yields an empty catalog.

use crate::models::{default_file_stem, QueryCatalog, QueryDefinition};
use serde_json::{Map, Value};

/// A config document tagged with the shape it was detected as.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CatalogDocument<'a> {
    Grouped(&'a Map<String, Value>),
    Flat(&'a Map<String, Value>),
    List(&'a [Value]),
    Unrecognized,
}

impl<'a> CatalogDocument<'a> {
    pub fn classify(doc: &'a Value) -> Self {
        match doc {
            Value::Object(map) if map.values().any(is_query_group) => Self::Grouped(map),
            Value::Object(map) if map.values().all(is_query_object) => Self::Flat(map),
            Value::Array(items) => Self::List(items),
            _ => Self::Unrecognized,
        }
    }

    pub fn shape(&self) -> &'static str {
        match self {
            Self::Grouped(_) => "grouped",
            Self::Flat(_) => "flat",
            Self::List(_) => "list",
            Self::Unrecognized => "unrecognized",
        }
    }

    pub fn into_catalog(self) -> QueryCatalog {
        let mut catalog = QueryCatalog::new();
        match self {
            Self::Grouped(map) => {
                for (category, group) in map {
                    let Some(queries) = group_queries(group) else {
                        log::debug!("Ignoring '{category}': no queries list");
                        continue;
                    };
                    for entry in queries {
                        let Some(obj) = entry.as_object() else {
                            log::warn!("Ignoring non-object query in category '{category}'");
                            continue;
                        };
                        let name = str_field(obj, "name")
                            .map(str::to_string)
                            .unwrap_or_else(|| format!("{category}_{}", catalog.len()));
                        insert(&mut catalog, definition_from(name, obj));
                    }
                }
            }
            Self::Flat(map) => {
                for (name, entry) in map {
                    if let Some(obj) = entry.as_object() {
                        insert(&mut catalog, definition_from(name.clone(), obj));
                    }
                }
            }
            Self::List(items) => {
                for (i, entry) in items.iter().enumerate() {
                    let Some(obj) = entry.as_object() else {
                        log::warn!("Ignoring non-object query at index {i}");
                        continue;
                    };
                    let name = str_field(obj, "name")
                        .map(str::to_string)
                        .unwrap_or_else(|| format!("query_{}", catalog.len()));
                    insert(&mut catalog, definition_from(name, obj));
                }
            }
            Self::Unrecognized => {}
        }
        catalog
    }
}

/// Normalize a parsed config document into a catalog.
pub fn normalize(doc: &Value) -> QueryCatalog {
    let document = CatalogDocument::classify(doc);
    let catalog = document.into_catalog();
    log::debug!(
        "Normalized {} query config into {} queries",
        document.shape(),
        catalog.len()
    );
    if matches!(document, CatalogDocument::Unrecognized) {
        log::warn!("Query config matches no known shape, catalog is empty");
    }
    catalog
}

fn group_queries(group: &Value) -> Option<&Vec<Value>> {
    group.as_object()?.get("queries")?.as_array()
}

fn is_query_group(value: &Value) -> bool {
    group_queries(value).is_some()
}

fn is_query_object(value: &Value) -> bool {
    value
        .as_object()
        .is_some_and(|obj| obj.contains_key("query") || obj.contains_key("kql"))
}

fn str_field<'a>(obj: &'a Map<String, Value>, key: &str) -> Option<&'a str> {
    obj.get(key).and_then(Value::as_str)
}

/// Read `query`/`kql`, `description` and `outputFile`/`output_file`.
fn definition_from(name: String, obj: &Map<String, Value>) -> QueryDefinition {
    let query = str_field(obj, "query")
        .or_else(|| str_field(obj, "kql"))
        .unwrap_or_default();
    let output_file = str_field(obj, "outputFile")
        .or_else(|| str_field(obj, "output_file"))
        .map(str::to_string)
        .unwrap_or_else(|| default_file_stem(&name));
    QueryDefinition::new(name, query)
        .with_description(str_field(obj, "description").unwrap_or_default())
        .with_output_file(output_file)
}

fn insert(catalog: &mut QueryCatalog, def: QueryDefinition) {
    let name = def.name.clone();
    if catalog.insert(def).is_some() {
        log::warn!("Duplicate query name '{name}', keeping the later definition");
    }
}
