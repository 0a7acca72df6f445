//! Remote Listing Contract
//!
//! The one remote operation the search engine consumes:
//! `list(query, fields, cursor) -> (entities, next_cursor)`.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::Result;

/// MIME type the provider uses to mark folders
pub const FOLDER_MIME_TYPE: &str = "application/vnd.google-apps.folder";

/// Field selector meaning "every field"
pub const ALL_FIELDS: &str = "*";

/// A file or folder summary returned by the remote listing operation.
///
/// The shape is whatever the caller's field selector asked for, so the
/// summary is kept as a JSON object with typed accessors for the handful of
/// fields the engine itself reads.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Entity(Map<String, Value>);

impl Entity {
    pub fn new(fields: Map<String, Value>) -> Self {
        Self(fields)
    }

    pub fn id(&self) -> Option<&str> {
        self.str_field("id")
    }

    pub fn name(&self) -> Option<&str> {
        self.str_field("name")
    }

    pub fn mime_type(&self) -> Option<&str> {
        self.str_field("mimeType")
    }

    /// Parent folder IDs, empty when the field was not requested
    pub fn parents(&self) -> Vec<&str> {
        self.0
            .get("parents")
            .and_then(Value::as_array)
            .map(|ids| ids.iter().filter_map(Value::as_str).collect())
            .unwrap_or_default()
    }

    pub fn is_folder(&self) -> bool {
        self.mime_type() == Some(FOLDER_MIME_TYPE)
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn into_fields(self) -> Map<String, Value> {
        self.0
    }

    fn str_field(&self, field: &str) -> Option<&str> {
        self.0.get(field).and_then(Value::as_str)
    }
}

impl From<Map<String, Value>> for Entity {
    fn from(fields: Map<String, Value>) -> Self {
        Self(fields)
    }
}

/// One call to the remote listing operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListRequest {
    /// Query string in the provider grammar; `None` lists everything visible
    pub query: Option<String>,
    /// Comma-joined field names or `*`, passed through verbatim
    pub fields: String,
    /// Continuation cursor from the previous page; `None` for the first page
    pub page_token: Option<String>,
}

impl ListRequest {
    pub fn new(query: Option<String>, fields: impl Into<String>) -> Self {
        Self {
            query,
            fields: fields.into(),
            page_token: None,
        }
    }

    pub fn with_page_token(mut self, token: Option<String>) -> Self {
        self.page_token = token;
        self
    }
}

/// One page of results plus the cursor for the next one.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Page {
    pub entities: Vec<Entity>,
    /// Opaque, provider-issued. Absent on the final page.
    pub next_cursor: Option<String>,
}

impl Page {
    pub fn new(entities: Vec<Entity>, next_cursor: Option<String>) -> Self {
        Self {
            entities,
            next_cursor,
        }
    }

    /// A final page with no continuation cursor
    pub fn last(entities: Vec<Entity>) -> Self {
        Self::new(entities, None)
    }

    pub fn has_more(&self) -> bool {
        self.next_cursor.is_some()
    }
}

/// Remote "list entities matching query" operation.
///
/// Implementations perform exactly one request per call and must hand the
/// cursor back unmodified. Retry and timeout policy live below this trait.
#[async_trait]
pub trait RemoteLister: Send + Sync {
    async fn list(&self, request: ListRequest) -> Result<Page>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn entity(value: Value) -> Entity {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_entity_accessors() {
        let file = entity(json!({
            "id": "file1",
            "name": "report.pdf",
            "mimeType": "application/pdf",
            "parents": ["root", "shared"]
        }));

        assert_eq!(file.id(), Some("file1"));
        assert_eq!(file.name(), Some("report.pdf"));
        assert_eq!(file.parents(), vec!["root", "shared"]);
        assert!(!file.is_folder());
    }

    #[test]
    fn test_folder_detection() {
        let folder = entity(json!({ "id": "f", "mimeType": FOLDER_MIME_TYPE }));
        assert!(folder.is_folder());

        let partial = entity(json!({ "id": "f" }));
        assert!(!partial.is_folder());
        assert!(partial.parents().is_empty());
    }

    #[test]
    fn test_entity_serializes_as_plain_object() {
        let file = entity(json!({ "id": "file1", "size": "42" }));
        assert_eq!(
            serde_json::to_value(&file).unwrap(),
            json!({ "id": "file1", "size": "42" })
        );
    }

    #[test]
    fn test_list_request_builder() {
        let request = ListRequest::new(Some("trashed = false".into()), ALL_FIELDS)
            .with_page_token(Some("cursor-1".into()));

        assert_eq!(request.query.as_deref(), Some("trashed = false"));
        assert_eq!(request.fields, "*");
        assert_eq!(request.page_token.as_deref(), Some("cursor-1"));
    }
}
