//! In-process document store.

use std::cmp::Ordering;
use std::sync::Arc;

use dashmap::DashMap;
use serde_json::{Map, Value};
use uuid::Uuid;

/// Document primary key field.
pub const ID_FIELD: &str = "_id";

/// Collections of JSON documents keyed by `_id`.
#[derive(Clone, Default)]
pub struct Database {
    collections: Arc<DashMap<String, DashMap<String, Value>>>,
}

/// Filter, search and paging applied by [`Database::find`].
#[derive(Debug, Clone, Default)]
pub struct Query {
    /// Field equality conditions, all of which must hold.
    pub filter: Map<String, Value>,
    /// Fields searched case-insensitively for `search`.
    pub search_fields: Vec<String>,
    pub search: String,
    pub skip: u64,
    pub limit: u64,
}

/// One page of results plus the number of matches overall.
#[derive(Debug, Clone, PartialEq)]
pub struct Page {
    pub documents: Vec<Value>,
    pub total: u64,
}

impl Database {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a document, assigning it a fresh `_id`. Returns the id.
    pub fn insert(&self, collection: &str, mut document: Map<String, Value>) -> String {
        let id = Uuid::new_v4().to_string();
        document.insert(ID_FIELD.to_string(), Value::String(id.clone()));

        self.collections
            .entry(collection.to_string())
            .or_default()
            .insert(id.clone(), Value::Object(document));
        tracing::debug!(collection, id = %id, "Document inserted");
        id
    }

    pub fn find_by_id(&self, collection: &str, id: &str) -> Option<Value> {
        let documents = self.collections.get(collection)?;
        let document = documents.get(id)?;
        Some(document.value().clone())
    }

    /// Matching documents, newest first (`createdAt` descending, then `_id`).
    pub fn find(&self, collection: &str, query: &Query) -> Page {
        let Some(documents) = self.collections.get(collection) else {
            return Page {
                documents: Vec::new(),
                total: 0,
            };
        };

        let needle = query.search.to_lowercase();
        let mut matched: Vec<Value> = documents
            .iter()
            .filter(|entry| matches_filter(entry.value(), &query.filter))
            .filter(|entry| {
                needle.is_empty() || matches_search(entry.value(), &query.search_fields, &needle)
            })
            .map(|entry| entry.value().clone())
            .collect();
        drop(documents);

        matched.sort_by(newest_first);
        let total = matched.len() as u64;
        let documents = matched
            .into_iter()
            .skip(usize::try_from(query.skip).unwrap_or(usize::MAX))
            .take(usize::try_from(query.limit).unwrap_or(usize::MAX))
            .collect();

        Page { documents, total }
    }

    /// Merge `fields` into an existing document. Returns the updated
    /// document, or `None` when there is nothing to update.
    pub fn update(&self, collection: &str, id: &str, fields: Map<String, Value>) -> Option<Value> {
        let documents = self.collections.get(collection)?;
        let mut document = documents.get_mut(id)?;
        let Value::Object(existing) = document.value_mut() else {
            return None;
        };
        for (key, value) in fields {
            if key != ID_FIELD {
                existing.insert(key, value);
            }
        }
        Some(document.value().clone())
    }
}

fn matches_filter(document: &Value, filter: &Map<String, Value>) -> bool {
    filter
        .iter()
        .all(|(key, expected)| match document.get(key) {
            Some(actual) => loosely_equal(actual, expected),
            None => expected.is_null(),
        })
}

/// Query strings only carry text, so `"true"` matches `true` and `"3"` matches `3`.
fn loosely_equal(actual: &Value, expected: &Value) -> bool {
    match (actual, expected) {
        (Value::String(_), _) => actual == expected,
        (_, Value::String(text)) => actual.to_string() == *text,
        _ => actual == expected,
    }
}

fn matches_search(document: &Value, fields: &[String], needle: &str) -> bool {
    fields.iter().any(|field| {
        document
            .get(field)
            .and_then(Value::as_str)
            .is_some_and(|text| text.to_lowercase().contains(needle))
    })
}

fn newest_first(a: &Value, b: &Value) -> Ordering {
    let created = |v: &Value| v.get("createdAt").and_then(Value::as_u64).unwrap_or(0);
    let id = |v: &Value| v.get(ID_FIELD).and_then(Value::as_str).unwrap_or("").to_string();
    created(b).cmp(&created(a)).then_with(|| id(a).cmp(&id(b)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn doc(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_insert_and_find_by_id() {
        let db = Database::new();
        let id = db.insert("tasks", doc(json!({ "title": "Dig" })));

        let found = db.find_by_id("tasks", &id).unwrap();
        assert_eq!(found["title"], "Dig");
        assert_eq!(found[ID_FIELD], id.as_str());
        assert!(db.find_by_id("programs", &id).is_none());
    }

    #[test]
    fn test_find_filters_searches_and_pages() {
        let db = Database::new();
        for (i, title) in ["Water audit", "Tree planting", "Water harvesting"].iter().enumerate() {
            db.insert(
                "tasks",
                doc(json!({ "title": title, "createdAt": i as u64, "isDeleted": false })),
            );
        }

        let mut query = Query {
            search_fields: vec!["title".into()],
            search: "WATER".into(),
            limit: 10,
            ..Query::default()
        };
        query.filter.insert("isDeleted".into(), json!(false));

        let page = db.find("tasks", &query);
        assert_eq!(page.total, 2);
        assert_eq!(page.documents[0]["title"], "Water harvesting");

        query.limit = 1;
        query.skip = 1;
        let page = db.find("tasks", &query);
        assert_eq!(page.total, 2);
        assert_eq!(page.documents.len(), 1);
        assert_eq!(page.documents[0]["title"], "Water audit");
    }

    #[test]
    fn test_filter_from_query_text() {
        let db = Database::new();
        db.insert("tasks", doc(json!({ "isDeleted": true, "order": 3 })));

        let mut query = Query { limit: 10, ..Query::default() };
        query.filter.insert("isDeleted".into(), json!("true"));
        query.filter.insert("order".into(), json!("3"));
        assert_eq!(db.find("tasks", &query).total, 1);
    }

    #[test]
    fn test_update_merges_but_keeps_id() {
        let db = Database::new();
        let id = db.insert("tasks", doc(json!({ "title": "Dig", "status": "active" })));

        let updated = db
            .update("tasks", &id, doc(json!({ "status": "completed", "_id": "forged" })))
            .unwrap();
        assert_eq!(updated["status"], "completed");
        assert_eq!(updated["title"], "Dig");
        assert_eq!(updated[ID_FIELD], id.as_str());

        assert!(db.update("tasks", "missing", Map::new()).is_none());
    }
}
