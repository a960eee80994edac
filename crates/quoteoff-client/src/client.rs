//! Firestore-backed implementation of the store seam.

use std::collections::BTreeMap;
use std::time::Duration;

use async_trait::async_trait;
use quoteoff_core::store::{
    FieldOp, FieldUpdate, QuoteStore, SortDirection, StoreResult, DISPLAY_TEXT_FIELD,
    QUOTE_ID_FIELD, RATING_FIELD, VOTE_COUNT_FIELD,
};
use quoteoff_types::{Quote, StoreError, STARTING_RATING};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::ClientError;
use crate::types::*;

/// A [`QuoteStore`] backed by one Firestore collection.
pub struct FirestoreStore {
    client: reqwest::Client,
    config: FirestoreConfig,
}

impl FirestoreStore {
    pub fn new(config: FirestoreConfig) -> Result<Self, ClientError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        tracing::info!(
            "[FirestoreStore] Using collection '{}' in project '{}'",
            config.collection,
            config.project_id
        );
        Ok(Self { client, config })
    }

    pub fn config(&self) -> &FirestoreConfig {
        &self.config
    }

    /// `projects/{p}/databases/{d}/documents` — resource prefix shared by
    /// query endpoints and document names.
    fn resource_root(&self) -> String {
        format!(
            "projects/{}/databases/{}/documents",
            self.config.project_id, self.config.database_id
        )
    }

    fn endpoint(&self, verb: &str) -> String {
        let mut url = format!("{}/{}:{}", self.config.base_url, self.resource_root(), verb);
        if let Some(key) = &self.config.api_key {
            url.push_str("?key=");
            url.push_str(key);
        }
        url
    }

    fn document_name(&self, doc_key: &str) -> String {
        format!("{}/{}/{}", self.resource_root(), self.config.collection, doc_key)
    }

    async fn post_with_retry<T: DeserializeOwned>(
        &self,
        url: &str,
        body: &impl Serialize,
    ) -> Result<T, ClientError> {
        let mut attempts = 0;
        let mut delay = self.config.retry.base_delay_ms;

        loop {
            attempts += 1;
            match self.post_once(url, body).await {
                Ok(response) => return Ok(response),
                Err(ClientError::RateLimited { retry_after }) => {
                    if attempts > self.config.retry.max_retries {
                        return Err(ClientError::RetriesExhausted { attempts });
                    }
                    let wait = retry_after.unwrap_or(delay / 1000).max(1);
                    tracing::debug!(
                        "[FirestoreStore] Rate limited, waiting {}s (attempt {})",
                        wait,
                        attempts
                    );
                    tokio::time::sleep(Duration::from_secs(wait)).await;
                    delay = (delay * 2).min(self.config.retry.max_delay_ms);
                }
                Err(ClientError::Server { status, .. }) if status >= 500 => {
                    if attempts > self.config.retry.max_retries {
                        return Err(ClientError::RetriesExhausted { attempts });
                    }
                    tracing::debug!(
                        "[FirestoreStore] Server error {}, retrying (attempt {})",
                        status,
                        attempts
                    );
                    tokio::time::sleep(Duration::from_millis(delay)).await;
                    delay = (delay * 2).min(self.config.retry.max_delay_ms);
                }
                Err(e) => return Err(e),
            }
        }
    }

    async fn post_once<T: DeserializeOwned>(
        &self,
        url: &str,
        body: &impl Serialize,
    ) -> Result<T, ClientError> {
        let resp = self.client.post(url).json(body).send().await?;
        let status = resp.status();

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            let retry_after = resp
                .headers()
                .get("retry-after")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse().ok());
            return Err(ClientError::RateLimited { retry_after });
        }

        if !status.is_success() {
            let message = resp.text().await.unwrap_or_default();
            return Err(ClientError::Server { status: status.as_u16(), message });
        }

        resp.json().await.map_err(|e| ClientError::InvalidResponse(e.to_string()))
    }

    async fn run_query(&self, query: StructuredQuery) -> Result<Vec<Document>, ClientError> {
        let elements: Vec<RunQueryResponseElement> = self
            .post_with_retry(&self.endpoint("runQuery"), &RunQueryRequest { structured_query: query })
            .await?;
        Ok(elements.into_iter().filter_map(|e| e.document).collect())
    }

    fn from_selector(&self) -> Vec<CollectionSelector> {
        vec![CollectionSelector { collection_id: self.config.collection.clone() }]
    }
}

fn decode_document(doc: Document) -> StoreResult<Quote> {
    let doc_key = doc.doc_key().to_string();

    let quote_id = doc
        .fields
        .get(QUOTE_ID_FIELD)
        .and_then(FireValue::as_i64)
        .and_then(|v| u32::try_from(v).ok())
        .ok_or_else(|| StoreError::Malformed {
            message: format!("document {doc_key} has no usable id field"),
        })?;

    let display_text = doc
        .fields
        .get(DISPLAY_TEXT_FIELD)
        .and_then(FireValue::as_str)
        .ok_or_else(|| StoreError::Malformed {
            message: format!("document {doc_key} has no displayText field"),
        })?
        .to_string();

    let rating =
        doc.fields.get(RATING_FIELD).and_then(FireValue::as_i64).unwrap_or(STARTING_RATING);
    let vote_count =
        doc.fields.get(VOTE_COUNT_FIELD).and_then(FireValue::as_i64).unwrap_or(0).max(0) as u64;

    Ok(Quote { doc_key, quote_id, display_text, rating, vote_count })
}

fn encode_value(value: &serde_json::Value) -> StoreResult<FireValue> {
    if let Some(i) = value.as_i64() {
        return Ok(FireValue::integer(i));
    }
    if let Some(s) = value.as_str() {
        return Ok(FireValue::string(s));
    }
    if let Some(d) = value.as_f64() {
        return Ok(FireValue { double_value: Some(d), ..FireValue::default() });
    }
    Err(StoreError::Malformed { message: format!("unsupported field value: {value}") })
}

#[async_trait]
impl QuoteStore for FirestoreStore {
    async fn query_by_field(
        &self,
        field: &str,
        value: i64,
        limit: usize,
    ) -> StoreResult<Vec<Quote>> {
        let query = StructuredQuery {
            from: self.from_selector(),
            filter: Some(Filter {
                field_filter: FieldFilter {
                    field: FieldReference { field_path: field.to_string() },
                    op: "EQUAL".to_string(),
                    value: FireValue::integer(value),
                },
            }),
            limit: Some(limit as i32),
            ..StructuredQuery::default()
        };

        let docs = self.run_query(query).await.map_err(ClientError::into_store_error)?;
        docs.into_iter().map(decode_document).collect()
    }

    async fn query_ordered(
        &self,
        field: &str,
        direction: SortDirection,
        limit: usize,
    ) -> StoreResult<Vec<Quote>> {
        let direction = match direction {
            SortDirection::Ascending => "ASCENDING",
            SortDirection::Descending => "DESCENDING",
        };
        let query = StructuredQuery {
            from: self.from_selector(),
            order_by: vec![Order {
                field: FieldReference { field_path: field.to_string() },
                direction: direction.to_string(),
            }],
            limit: Some(limit as i32),
            ..StructuredQuery::default()
        };

        let docs = self.run_query(query).await.map_err(ClientError::into_store_error)?;
        docs.into_iter().map(decode_document).collect()
    }

    async fn update_fields(&self, doc_key: &str, updates: &[FieldUpdate]) -> StoreResult<()> {
        let mut fields = BTreeMap::new();
        let mut mask = Vec::new();
        let mut transforms = Vec::new();

        for update in updates {
            match &update.op {
                FieldOp::Set(value) => {
                    fields.insert(update.field.clone(), encode_value(value)?);
                    mask.push(update.field.clone());
                }
                FieldOp::Increment(amount) => {
                    transforms.push(FieldTransform {
                        field_path: update.field.clone(),
                        increment: FireValue::integer(*amount),
                    });
                }
            }
        }

        let write = Write {
            update: Document { name: self.document_name(doc_key), fields },
            update_mask: (!mask.is_empty()).then(|| DocumentMask { field_paths: mask }),
            update_transforms: transforms,
            current_document: Some(Precondition { exists: true }),
        };

        let _: serde_json::Value = self
            .post_with_retry(&self.endpoint("commit"), &CommitRequest { writes: vec![write] })
            .await
            .map_err(|e| match e {
                ClientError::Server { status: 404, .. } => {
                    StoreError::NotFound { doc_key: doc_key.to_string() }
                }
                other => other.into_store_error(),
            })?;
        Ok(())
    }
}
