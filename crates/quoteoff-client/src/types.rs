//! Configuration and Firestore v1 wire types.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Retry policy for transient HTTP failures.
#[derive(Debug, Clone)]
pub struct RetryConfig {
    pub max_retries: usize,
    pub base_delay_ms: u64,
    pub max_delay_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            base_delay_ms: 500,
            max_delay_ms: 30_000,
        }
    }
}

/// Connection settings for a Firestore project.
#[derive(Debug, Clone)]
pub struct FirestoreConfig {
    /// API root. Point this at a local mock in tests.
    pub base_url: String,
    pub project_id: String,
    pub database_id: String,
    /// Collection holding the quote records.
    pub collection: String,
    /// Web API key appended as a query parameter, if the project needs one.
    pub api_key: Option<String>,
    pub timeout_secs: u64,
    pub retry: RetryConfig,
}

impl Default for FirestoreConfig {
    fn default() -> Self {
        Self {
            base_url: "https://firestore.googleapis.com/v1".to_string(),
            project_id: String::new(),
            database_id: "(default)".to_string(),
            collection: "quotes".to_string(),
            api_key: None,
            timeout_secs: 30,
            retry: RetryConfig::default(),
        }
    }
}

// ---------------------------------------------------------------------------
// Wire types (Firestore v1 REST)
// ---------------------------------------------------------------------------

/// Firestore typed-value envelope. Exactly one variant field is set;
/// integers travel as decimal strings.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub(crate) struct FireValue {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub integer_value: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub string_value: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub double_value: Option<f64>,
}

impl FireValue {
    pub fn integer(value: i64) -> Self {
        Self { integer_value: Some(value.to_string()), ..Self::default() }
    }

    pub fn string(value: &str) -> Self {
        Self { string_value: Some(value.to_string()), ..Self::default() }
    }

    /// Numeric view of the value, whichever envelope field carries it.
    pub fn as_i64(&self) -> Option<i64> {
        if let Some(raw) = &self.integer_value {
            return raw.parse().ok();
        }
        self.double_value.map(|d| d.round() as i64)
    }

    pub fn as_str(&self) -> Option<&str> {
        self.string_value.as_deref()
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub(crate) struct Document {
    /// Full resource name:
    /// `projects/{p}/databases/{d}/documents/{collection}/{doc_key}`.
    pub name: String,
    #[serde(default)]
    pub fields: BTreeMap<String, FireValue>,
}

impl Document {
    /// The record key: the last path segment of the resource name.
    pub fn doc_key(&self) -> &str {
        self.name.rsplit('/').next().unwrap_or(&self.name)
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RunQueryRequest {
    pub structured_query: StructuredQuery,
}

#[derive(Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct StructuredQuery {
    pub from: Vec<CollectionSelector>,
    #[serde(rename = "where", skip_serializing_if = "Option::is_none")]
    pub filter: Option<Filter>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub order_by: Vec<Order>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<i32>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CollectionSelector {
    pub collection_id: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct Filter {
    pub field_filter: FieldFilter,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct FieldFilter {
    pub field: FieldReference,
    pub op: String,
    pub value: FireValue,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct Order {
    pub field: FieldReference,
    pub direction: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct FieldReference {
    pub field_path: String,
}

/// One element of a `runQuery` response stream. Elements without a
/// `document` carry only read metadata.
#[derive(Debug, Deserialize)]
pub(crate) struct RunQueryResponseElement {
    #[serde(default)]
    pub document: Option<Document>,
}

#[derive(Debug, Serialize)]
pub(crate) struct CommitRequest {
    pub writes: Vec<Write>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct Write {
    pub update: Document,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub update_mask: Option<DocumentMask>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub update_transforms: Vec<FieldTransform>,
    /// `exists: true` makes the commit fail on a missing record instead of
    /// creating one, matching update-only semantics.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_document: Option<Precondition>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct DocumentMask {
    pub field_paths: Vec<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct FieldTransform {
    pub field_path: String,
    pub increment: FireValue,
}

#[derive(Debug, Serialize)]
pub(crate) struct Precondition {
    pub exists: bool,
}
