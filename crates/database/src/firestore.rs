use crate::error::DbError;
use crate::filter::{EducationalFilter, FieldFilter, FilterOp, ProductFilter};
use crate::store::{decode_documents, Collection, DocumentStore, Record};
use async_trait::async_trait;
use configuration::FirestoreConfig;
use core_types::{EducationalContent, Product};
use gcp_auth::TokenProvider;
use serde::Deserialize;
use serde_json::{json, Map, Value as JsonValue};
use std::sync::Arc;

const PRODUCTION_BASE_URL: &str = "https://firestore.googleapis.com/v1";
const DATASTORE_SCOPE: &str = "https://www.googleapis.com/auth/datastore";
/// The emulator accepts this fixed token as an administrator.
const EMULATOR_TOKEN: &str = "owner";
const INDEX_URL_MARKER: &str = "You can create it here: ";

/// Where each request's bearer token comes from.
#[derive(Clone)]
enum Credentials {
    /// Emulator token or an operator-supplied access token.
    Static(String),
    /// Application default credentials; tokens are cached and refreshed by the provider.
    Provider(Arc<dyn TokenProvider>),
}

impl Credentials {
    async fn bearer(&self) -> Result<String, DbError> {
        match self {
            Credentials::Static(token) => Ok(token.clone()),
            Credentials::Provider(provider) => {
                let token = provider.token(&[DATASTORE_SCOPE]).await?;
                Ok(token.as_str().to_string())
            }
        }
    }
}

/// A document store backed by Cloud Firestore's REST API.
#[derive(Clone)]
pub struct FirestoreStore {
    client: reqwest::Client,
    credentials: Credentials,
    documents_url: String,
}

/// One element of a `runQuery` response stream.
#[derive(Debug, Deserialize)]
struct RunQueryItem {
    document: Option<FirestoreDocument>,
}

#[derive(Debug, Deserialize)]
struct FirestoreDocument {
    name: String,
    #[serde(default)]
    fields: Map<String, JsonValue>,
}

/// `runQuery` streams its error as a one-element array; other calls return the object.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ErrorBody {
    Stream(Vec<ErrorEnvelope>),
    Single(ErrorEnvelope),
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorStatus,
}

#[derive(Debug, Deserialize)]
struct ErrorStatus {
    #[serde(default)]
    status: String,
    #[serde(default)]
    message: String,
}

impl FirestoreStore {
    /// Connects using the emulator, a fixed access token, or application default
    /// credentials (`GOOGLE_APPLICATION_CREDENTIALS`, gcloud, or the metadata server),
    /// in that order of preference.
    ///
    /// Without a configured project id the one attached to the credentials is used.
    pub async fn connect(config: &FirestoreConfig) -> Result<Self, DbError> {
        let configured_project = config.project_id.clone().filter(|id| !id.is_empty());

        if let Some(host) = &config.emulator_host {
            let project_id = configured_project.ok_or_else(missing_project)?;
            return Self::with_credentials(
                format!("http://{host}/v1"),
                &project_id,
                &config.database_id,
                Credentials::Static(EMULATOR_TOKEN.to_string()),
            );
        }

        if let Some(token) = &config.access_token {
            let project_id = configured_project.ok_or_else(missing_project)?;
            tracing::warn!("Using a fixed Firestore access token; it will not be refreshed.");
            return Self::with_credentials(
                PRODUCTION_BASE_URL.to_string(),
                &project_id,
                &config.database_id,
                Credentials::Static(token.clone()),
            );
        }

        let provider = gcp_auth::provider().await?;
        let project_id = match configured_project {
            Some(id) => id,
            None => provider.project_id().await?.to_string(),
        };
        Self::with_credentials(
            PRODUCTION_BASE_URL.to_string(),
            &project_id,
            &config.database_id,
            Credentials::Provider(provider),
        )
    }

    fn with_credentials(
        base_url: String,
        project_id: &str,
        database_id: &str,
        credentials: Credentials,
    ) -> Result<Self, DbError> {
        Ok(Self {
            client: reqwest::Client::builder().build()?,
            credentials,
            documents_url: format!(
                "{base_url}/projects/{project_id}/databases/{database_id}/documents"
            ),
        })
    }

    async fn post(&self, url: &str, body: &JsonValue) -> Result<String, DbError> {
        let token = self.credentials.bearer().await?;
        let response = self
            .client
            .post(url)
            .bearer_auth(token)
            .json(body)
            .send()
            .await?;
        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            return Err(classify_error(&text));
        }
        Ok(text)
    }

    async fn query_collection(
        &self,
        collection: Collection,
        filters: &[FieldFilter],
    ) -> Result<Vec<JsonValue>, DbError> {
        let url = format!("{}:runQuery", self.documents_url);
        let text = self.post(&url, &structured_query(collection, filters)).await?;

        let items: Vec<RunQueryItem> = serde_json::from_str(&text)?;
        Ok(items
            .into_iter()
            .filter_map(|item| item.document)
            .map(|document| decode_fields(&document.fields))
            .collect())
    }

    async fn create_document(
        &self,
        collection: Collection,
        fields: &Map<String, JsonValue>,
    ) -> Result<String, DbError> {
        let url = format!("{}/{}", self.documents_url, collection.name());
        let body = json!({ "fields": encode_fields(fields) });
        let text = self.post(&url, &body).await?;

        let document: FirestoreDocument = serde_json::from_str(&text)?;
        Ok(document_id(&document.name).to_string())
    }
}

#[async_trait]
impl DocumentStore for FirestoreStore {
    async fn query_products(&self, filter: &ProductFilter) -> Result<Vec<Product>, DbError> {
        let documents = self
            .query_collection(Collection::Products, &filter.field_filters())
            .await?;
        decode_documents(documents)
    }

    async fn query_educational(
        &self,
        filter: &EducationalFilter,
    ) -> Result<Vec<EducationalContent>, DbError> {
        let documents = self
            .query_collection(Collection::Educational, &filter.field_filters())
            .await?;
        decode_documents(documents)
    }

    async fn add_record(&self, record: Record) -> Result<String, DbError> {
        let fields = record.to_document()?;
        self.create_document(record.collection(), &fields).await
    }
}

/// Builds a `runQuery` request body: a single field filter, or an AND of several.
fn structured_query(collection: Collection, filters: &[FieldFilter]) -> JsonValue {
    let mut query = json!({ "from": [{ "collectionId": collection.name() }] });

    let mut encoded: Vec<JsonValue> = filters.iter().map(encode_filter).collect();
    let condition = match encoded.len() {
        0 => None,
        1 => encoded.pop(),
        _ => Some(json!({ "compositeFilter": { "op": "AND", "filters": encoded } })),
    };
    if let Some(condition) = condition {
        query["where"] = condition;
    }

    json!({ "structuredQuery": query })
}

fn encode_filter(filter: &FieldFilter) -> JsonValue {
    let op = match filter.op {
        FilterOp::Eq => "EQUAL",
        FilterOp::Gte => "GREATER_THAN_OR_EQUAL",
        FilterOp::Lte => "LESS_THAN_OR_EQUAL",
    };
    json!({
        "fieldFilter": {
            "field": { "fieldPath": filter.field },
            "op": op,
            "value": encode_value(&filter.value),
        }
    })
}

/// Converts plain JSON into Firestore's typed value representation.
fn encode_value(value: &JsonValue) -> JsonValue {
    match value {
        JsonValue::Null => json!({ "nullValue": null }),
        JsonValue::Bool(b) => json!({ "booleanValue": b }),
        JsonValue::Number(n) => match n.as_i64() {
            Some(i) => json!({ "integerValue": i.to_string() }),
            None => json!({ "doubleValue": n.as_f64() }),
        },
        JsonValue::String(s) => json!({ "stringValue": s }),
        JsonValue::Array(items) => {
            let values: Vec<JsonValue> = items.iter().map(encode_value).collect();
            json!({ "arrayValue": { "values": values } })
        }
        JsonValue::Object(fields) => json!({ "mapValue": { "fields": encode_fields(fields) } }),
    }
}

fn encode_fields(fields: &Map<String, JsonValue>) -> JsonValue {
    JsonValue::Object(
        fields
            .iter()
            .map(|(key, value)| (key.clone(), encode_value(value)))
            .collect(),
    )
}

/// Converts a Firestore typed value back into plain JSON.
fn decode_value(value: &JsonValue) -> JsonValue {
    let Some((kind, inner)) = value.as_object().and_then(|typed| typed.iter().next()) else {
        return JsonValue::Null;
    };
    match kind.as_str() {
        "booleanValue" => inner.as_bool().map_or(JsonValue::Null, JsonValue::Bool),
        "integerValue" => match inner {
            JsonValue::String(s) => s.parse::<i64>().map_or(JsonValue::Null, JsonValue::from),
            JsonValue::Number(_) => inner.clone(),
            _ => JsonValue::Null,
        },
        // Non-finite doubles arrive as strings ("NaN", "Infinity") and have no JSON form.
        "doubleValue" => match inner {
            JsonValue::Number(_) => inner.clone(),
            _ => JsonValue::Null,
        },
        "stringValue" | "timestampValue" | "referenceValue" | "bytesValue" => inner.clone(),
        "arrayValue" => JsonValue::Array(
            inner
                .get("values")
                .and_then(JsonValue::as_array)
                .map(|values| values.iter().map(decode_value).collect())
                .unwrap_or_default(),
        ),
        "mapValue" => inner
            .get("fields")
            .and_then(JsonValue::as_object)
            .map_or_else(|| JsonValue::Object(Map::new()), decode_fields),
        "geoPointValue" => inner.clone(),
        _ => JsonValue::Null,
    }
}

fn decode_fields(fields: &Map<String, JsonValue>) -> JsonValue {
    JsonValue::Object(
        fields
            .iter()
            .map(|(key, value)| (key.clone(), decode_value(value)))
            .collect(),
    )
}

/// The last path segment of a document resource name.
fn document_id(name: &str) -> &str {
    name.rsplit('/').next().unwrap_or(name)
}

fn missing_project() -> DbError {
    DbError::ConnectionConfigError("Firestore project_id must be set.".to_string())
}

/// Turns an error body into a typed error.
///
/// A failed precondition about a missing index becomes `IndexRequired` carrying
/// the console link.
fn classify_error(body: &str) -> DbError {
    let status = match serde_json::from_str::<ErrorBody>(body) {
        Ok(ErrorBody::Single(envelope)) => Some(envelope.error),
        Ok(ErrorBody::Stream(envelopes)) => envelopes.into_iter().next().map(|e| e.error),
        Err(_) => None,
    };

    match status {
        Some(status) if status.message.contains("requires an index") => DbError::IndexRequired {
            hint: index_url(&status.message),
        },
        Some(status) if status.status.is_empty() => DbError::StoreError(status.message),
        Some(status) => DbError::StoreError(format!("{}: {}", status.status, status.message)),
        None => DbError::StoreError(body.trim().to_string()),
    }
}

fn index_url(message: &str) -> String {
    message
        .split_once(INDEX_URL_MARKER)
        .map(|(_, url)| url.trim().to_string())
        .unwrap_or_default()
}
