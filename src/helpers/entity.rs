//! Generic entity helper: the rules every CRUD entity shares.

use std::time::{SystemTime, UNIX_EPOCH};

use serde_json::{json, Map, Value};

use crate::database::{Database, Page, Query, ID_FIELD};
use crate::error::ApiError;
use crate::http::middleware::Pagination;

/// Keys clients may never write. Bookkeeping belongs to the helper; file
/// locations are derived from the storage configuration.
const PROTECTED_FIELDS: &[&str] = &[
    ID_FIELD,
    "isDeleted",
    "createdAt",
    "createdBy",
    "updatedAt",
    "updatedBy",
    "filePath",
    "fileUrl",
];

/// Static description of one entity type.
#[derive(Debug, Clone, Copy)]
pub struct EntityKind {
    /// Controller name in the URL.
    pub controller: &'static str,
    /// Optional controller file segment.
    pub file: Option<&'static str>,
    /// Backing collection.
    pub collection: &'static str,
    /// Human label used in messages ("Task").
    pub label: &'static str,
    /// Fields matched by the `search` query parameter.
    pub search_fields: &'static [&'static str],
}

fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}

/// Copy of `body` without the bookkeeping keys. Non-object bodies are rejected.
fn writable_fields(body: &Value) -> Result<Map<String, Value>, ApiError> {
    let object = body
        .as_object()
        .ok_or_else(|| ApiError::bad_request("Request body must be a JSON object."))?;
    Ok(object
        .iter()
        .filter(|(key, _)| !PROTECTED_FIELDS.contains(&key.as_str()))
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect())
}

fn is_deleted(document: &Value) -> bool {
    document.get("isDeleted").and_then(Value::as_bool).unwrap_or(false)
}

impl EntityKind {
    /// Insert a new document on behalf of `actor`. Returns its id.
    pub fn create(&self, db: &Database, body: &Value, actor: &str) -> Result<String, ApiError> {
        let mut document = writable_fields(body)?;
        let now = now_millis();
        document
            .entry("status")
            .or_insert_with(|| Value::String("active".into()));
        document.insert("isDeleted".into(), Value::Bool(false));
        document.insert("createdAt".into(), json!(now));
        document.insert("updatedAt".into(), json!(now));
        document.insert("createdBy".into(), Value::String(actor.to_string()));
        document.insert("updatedBy".into(), Value::String(actor.to_string()));

        let id = db.insert(self.collection, document);
        tracing::info!(collection = self.collection, id = %id, "Entity created");
        Ok(id)
    }

    /// A live (not deleted) document.
    pub fn details(&self, db: &Database, id: &str) -> Result<Value, ApiError> {
        db.find_by_id(self.collection, id)
            .filter(|document| !is_deleted(document))
            .ok_or_else(|| self.not_found())
    }

    /// Merge the writable fields of `body` into a live document.
    pub fn update(&self, db: &Database, id: &str, body: &Value, actor: &str) -> Result<Value, ApiError> {
        self.details(db, id)?;

        let mut fields = writable_fields(body)?;
        if fields.is_empty() {
            return Err(ApiError::bad_request(format!("Nothing to update for {}.", self.label)));
        }
        fields.insert("updatedAt".into(), json!(now_millis()));
        fields.insert("updatedBy".into(), Value::String(actor.to_string()));

        db.update(self.collection, id, fields).ok_or_else(|| self.not_found())
    }

    /// Soft delete: the document stays but is no longer visible.
    pub fn delete(&self, db: &Database, id: &str, actor: &str) -> Result<(), ApiError> {
        self.details(db, id)?;

        let mut fields = Map::new();
        fields.insert("isDeleted".into(), Value::Bool(true));
        fields.insert("updatedAt".into(), json!(now_millis()));
        fields.insert("updatedBy".into(), Value::String(actor.to_string()));
        db.update(self.collection, id, fields).ok_or_else(|| self.not_found())?;

        tracing::info!(collection = self.collection, id = %id, "Entity deleted");
        Ok(())
    }

    /// One page of live documents. Query keys become equality filters;
    /// protected keys cannot be filtered on.
    pub fn list<'q>(
        &self,
        db: &Database,
        filters: impl IntoIterator<Item = (&'q String, &'q String)>,
        pagination: &Pagination,
    ) -> Page {
        let mut filter: Map<String, Value> = filters
            .into_iter()
            .filter(|(key, _)| key.as_str() != "search" && !PROTECTED_FIELDS.contains(&key.as_str()))
            .map(|(key, value)| (key.clone(), Value::String(value.clone())))
            .collect();
        filter.insert("isDeleted".into(), Value::Bool(false));

        let query = Query {
            filter,
            search_fields: self.search_fields.iter().map(|f| f.to_string()).collect(),
            search: pagination.search.clone(),
            skip: pagination.skip(),
            limit: pagination.limit,
        };
        db.find(self.collection, &query)
    }

    pub fn not_found(&self) -> ApiError {
        ApiError::not_found(format!("{} not found.", self.label))
    }
}
