//! Firestore REST backend.
//!
//! Writes map onto the `documents` REST resource. The REST surface has no
//! push channel, so live subscriptions poll the collection and deliver a
//! snapshot whenever its content fingerprint changes.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use folio_core::types::DocId;
use serde::Deserialize;
use serde_json::{json, Map, Value};
use sha2::{Digest, Sha256};
use tokio::sync::RwLock;

use crate::document::{DocumentPatch, ProjectDocument, StoredDocument};
use crate::error::StoreError;
use crate::path::CollectionPath;
use crate::subscription::Subscription;
use crate::DocumentStore;

/// Default Firestore REST endpoint.
pub const DEFAULT_BASE_URL: &str = "https://firestore.googleapis.com/v1";

/// Documents requested per list page.
const LIST_PAGE_SIZE: u32 = 300;

/// Connection settings for [`FirestoreStore`].
#[derive(Debug, Clone)]
pub struct FirestoreConfig {
    /// Cloud project hosting the database.
    pub project_id: String,
    /// Web API key, sent as the `key` query parameter when present.
    pub api_key: Option<String>,
    /// REST endpoint, overridable for the local emulator.
    pub base_url: String,
    /// How often a subscription re-reads its collection.
    pub poll_interval: Duration,
}

/// Firestore document store over the REST API.
pub struct FirestoreStore {
    client: reqwest::Client,
    config: FirestoreConfig,
    id_token: Arc<RwLock<Option<String>>>,
}

/// One page of `documents.list`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListResponse {
    #[serde(default)]
    documents: Vec<RawDocument>,
    next_page_token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawDocument {
    name: String,
    #[serde(default)]
    fields: Map<String, Value>,
}

impl FirestoreStore {
    pub fn new(config: FirestoreConfig) -> Self {
        Self::with_client(reqwest::Client::new(), config)
    }

    /// Create a store reusing an existing [`reqwest::Client`].
    pub fn with_client(client: reqwest::Client, config: FirestoreConfig) -> Self {
        Self {
            client,
            config,
            id_token: Arc::new(RwLock::new(None)),
        }
    }

    fn collection_url(&self, path: &CollectionPath) -> String {
        collection_url(&self.config, path)
    }

    fn document_url(&self, path: &CollectionPath, id: &str) -> String {
        format!("{}/{id}", self.collection_url(path))
    }

    async fn authed(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        authed(&self.config, &self.id_token, builder).await
    }
}

// ---------------------------------------------------------------------------
// Request helpers (shared with the polling task)
// ---------------------------------------------------------------------------

fn collection_url(config: &FirestoreConfig, path: &CollectionPath) -> String {
    format!(
        "{}/projects/{}/databases/(default)/documents{}",
        config.base_url.trim_end_matches('/'),
        config.project_id,
        path
    )
}

async fn authed(
    config: &FirestoreConfig,
    id_token: &RwLock<Option<String>>,
    mut builder: reqwest::RequestBuilder,
) -> reqwest::RequestBuilder {
    if let Some(key) = &config.api_key {
        builder = builder.query(&[("key", key)]);
    }
    if let Some(token) = id_token.read().await.as_deref() {
        builder = builder.bearer_auth(token);
    }
    builder
}

/// Turn a non-success response into the matching [`StoreError`].
async fn ensure_success(
    response: reqwest::Response,
    id: Option<&str>,
) -> Result<reqwest::Response, StoreError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response
        .text()
        .await
        .unwrap_or_else(|_| "<unreadable body>".to_string());
    Err(match status.as_u16() {
        401 | 403 => StoreError::PermissionDenied(body),
        404 => StoreError::NotFound(id.unwrap_or_default().to_string()),
        code if status.is_server_error() => StoreError::Unavailable(format!("{code}: {body}")),
        code => StoreError::Rejected { status: code, body },
    })
}

async fn list_all(
    client: &reqwest::Client,
    config: &FirestoreConfig,
    id_token: &RwLock<Option<String>>,
    path: &CollectionPath,
) -> Result<Vec<StoredDocument>, StoreError> {
    let url = collection_url(config, path);
    let mut docs = Vec::new();
    let mut page_token: Option<String> = None;

    loop {
        let mut request = client
            .get(&url)
            .query(&[("pageSize", LIST_PAGE_SIZE.to_string())]);
        if let Some(token) = &page_token {
            request = request.query(&[("pageToken", token)]);
        }
        let response = authed(config, id_token, request).await.send().await?;
        let page: ListResponse = ensure_success(response, None).await?.json().await?;

        for raw in page.documents {
            docs.push(decode_document(raw)?);
        }
        match page.next_page_token {
            Some(token) if !token.is_empty() => page_token = Some(token),
            _ => break,
        }
    }
    Ok(docs)
}

// ---------------------------------------------------------------------------
// Value encoding
// ---------------------------------------------------------------------------

fn string_value(s: &str) -> Value {
    json!({ "stringValue": s })
}

fn encode_document(doc: &ProjectDocument) -> Value {
    let mut fields = Map::new();
    fields.insert("title".into(), string_value(&doc.title));
    fields.insert("description".into(), string_value(&doc.description));
    if let Some(image) = &doc.image {
        fields.insert("image".into(), string_value(image));
    }
    if let Some(created_at) = doc.created_at {
        fields.insert(
            "createdAt".into(),
            json!({ "timestampValue": created_at.to_rfc3339_opts(SecondsFormat::Micros, true) }),
        );
    }
    json!({ "fields": fields })
}

fn encode_patch(patch: &DocumentPatch) -> Value {
    let mut fields = Map::new();
    fields.insert("title".into(), string_value(&patch.title));
    fields.insert("description".into(), string_value(&patch.description));
    // `image` stays in the update mask even when absent, which clears it.
    if let Some(image) = &patch.image {
        fields.insert("image".into(), string_value(image));
    }
    json!({ "fields": fields })
}

fn field_str(fields: &Map<String, Value>, name: &str) -> Option<String> {
    fields
        .get(name)
        .and_then(|v| v.get("stringValue"))
        .and_then(Value::as_str)
        .map(str::to_string)
}

fn decode_document(raw: RawDocument) -> Result<StoredDocument, StoreError> {
    let id = raw
        .name
        .rsplit('/')
        .next()
        .filter(|s| !s.is_empty())
        .ok_or_else(|| StoreError::Malformed(format!("document name '{}'", raw.name)))?
        .to_string();

    let created_at = match raw
        .fields
        .get("createdAt")
        .and_then(|v| v.get("timestampValue"))
        .and_then(Value::as_str)
    {
        Some(ts) => Some(
            DateTime::parse_from_rfc3339(ts)
                .map_err(|e| StoreError::Malformed(format!("createdAt of {id}: {e}")))?
                .with_timezone(&Utc),
        ),
        None => None,
    };

    Ok(StoredDocument {
        data: ProjectDocument {
            title: field_str(&raw.fields, "title").unwrap_or_default(),
            description: field_str(&raw.fields, "description").unwrap_or_default(),
            image: field_str(&raw.fields, "image"),
            created_at,
        },
        id,
    })
}

/// Stable digest of a snapshot, used to skip unchanged polls.
fn fingerprint(docs: &[StoredDocument]) -> [u8; 32] {
    let mut hasher = Sha256::new();
    for doc in docs {
        hasher.update(doc.id.as_bytes());
        hasher.update([0]);
        hasher.update(encode_document(&doc.data).to_string().as_bytes());
        hasher.update([0]);
    }
    hasher.finalize().into()
}

// ---------------------------------------------------------------------------
// DocumentStore
// ---------------------------------------------------------------------------

#[async_trait]
impl DocumentStore for FirestoreStore {
    fn backend_name(&self) -> &'static str {
        "firestore"
    }

    fn subscribe(&self, path: &CollectionPath) -> Subscription {
        let (sink, subscription) = Subscription::channel();
        let client = self.client.clone();
        let config = self.config.clone();
        let id_token = Arc::clone(&self.id_token);
        let path = path.clone();

        tokio::spawn(async move {
            let mut interval = tokio::time::interval(config.poll_interval);
            interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
            let mut last: Option<[u8; 32]> = None;

            loop {
                tokio::select! {
                    () = sink.released() => break,
                    _ = interval.tick() => {}
                }
                match list_all(&client, &config, &id_token, &path).await {
                    Ok(docs) => {
                        let digest = fingerprint(&docs);
                        if last == Some(digest) {
                            continue;
                        }
                        last = Some(digest);
                        if !sink.send(docs).await {
                            break;
                        }
                    }
                    Err(e) => {
                        tracing::warn!(
                            %path,
                            error = %e,
                            "Firestore poll failed, ending subscription"
                        );
                        sink.fail(e).await;
                        break;
                    }
                }
            }
            tracing::debug!(%path, "Firestore subscription ended");
        });

        subscription
    }

    async fn create(
        &self,
        path: &CollectionPath,
        doc: &ProjectDocument,
    ) -> Result<DocId, StoreError> {
        let request = self
            .client
            .post(self.collection_url(path))
            .json(&encode_document(doc));
        let response = self.authed(request).await.send().await?;
        let raw: RawDocument = ensure_success(response, None).await?.json().await?;
        Ok(decode_document(raw)?.id)
    }

    async fn update(
        &self,
        path: &CollectionPath,
        id: &str,
        patch: &DocumentPatch,
    ) -> Result<(), StoreError> {
        let request = self
            .client
            .patch(self.document_url(path, id))
            .query(&[
                ("updateMask.fieldPaths", "title"),
                ("updateMask.fieldPaths", "description"),
                ("updateMask.fieldPaths", "image"),
                ("currentDocument.exists", "true"),
            ])
            .json(&encode_patch(patch));
        let response = self.authed(request).await.send().await?;
        ensure_success(response, Some(id)).await?;
        Ok(())
    }

    async fn delete(&self, path: &CollectionPath, id: &str) -> Result<(), StoreError> {
        let request = self.client.delete(self.document_url(path, id));
        let response = self.authed(request).await.send().await?;
        match ensure_success(response, Some(id)).await {
            Ok(_) | Err(StoreError::NotFound(_)) => Ok(()),
            Err(e) => Err(e),
        }
    }

    async fn authorize(&self, id_token: Option<String>) {
        *self.id_token.write().await = id_token;
    }
}
