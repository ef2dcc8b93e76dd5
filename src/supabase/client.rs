use crate::config::SupabaseConfig;
use crate::error::AppError;
use crate::logging::SensitiveKey;
use crate::supabase::query::Select;
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;

/// PostgREST error body
#[derive(Debug, Deserialize)]
struct PostgrestError {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    hint: Option<String>,
}

/// Thin PostgREST client authenticated with the service-role key
#[derive(Clone)]
pub struct SupabaseClient {
    http: Client,
    rest_url: Url,
    key: Arc<str>,
    schema: Arc<str>,
    timeout: Duration,
}

impl std::fmt::Debug for SupabaseClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SupabaseClient")
            .field("rest_url", &self.rest_url.as_str())
            .field("key", &SensitiveKey::new(&self.key).to_string())
            .field("schema", &self.schema)
            .finish()
    }
}

impl SupabaseClient {
    pub fn new(config: &SupabaseConfig) -> Result<Self, AppError> {
        Self::with_http_client(Client::new(), config)
    }

    pub fn with_http_client(http: Client, config: &SupabaseConfig) -> Result<Self, AppError> {
        let mut base = config.url.clone();
        if !base.ends_with('/') {
            base.push('/');
        }
        let rest_url = Url::parse(&base)
            .and_then(|url| url.join("rest/v1/"))
            .map_err(|e| AppError::ConfigError(format!("Invalid Supabase URL '{}': {}", config.url, e)))?;

        Ok(Self {
            http,
            rest_url,
            key: Arc::from(config.service_role_key.as_str()),
            schema: Arc::from(config.schema.as_str()),
            timeout: Duration::from_secs(config.timeout_seconds),
        })
    }

    fn table_url(&self, table: &str) -> Result<Url, AppError> {
        self.rest_url
            .join(table)
            .map_err(|e| AppError::ConfigError(format!("Invalid table name '{}': {}", table, e)))
    }

    fn authorized(&self, builder: RequestBuilder) -> RequestBuilder {
        builder
            .header("apikey", self.key.as_ref())
            .header("Authorization", format!("Bearer {}", self.key))
            .header("Accept-Profile", self.schema.as_ref())
            .timeout(self.timeout)
    }

    /// Run a read and decode every row
    pub async fn select<T: DeserializeOwned>(&self, query: &Select) -> Result<Vec<T>, AppError> {
        let table = query.table();
        let url = self.table_url(table)?;

        debug!(table = %table, "Querying Supabase");

        let response = self
            .authorized(self.http.get(url))
            .query(&query.query_pairs())
            .send()
            .await
            .map_err(|e| AppError::data_fetch(table, e.to_string()))?;

        let response = check_status(table, response).await?;

        response
            .json::<Vec<T>>()
            .await
            .map_err(|e| AppError::data_fetch(table, format!("invalid response body: {}", e)))
    }

    /// Exact row count for `query`, read from `Content-Range`
    ///
    /// Only one row is transferred, so the server's `max-rows` cap does not
    /// apply to the total.
    pub async fn count(&self, query: &Select) -> Result<u64, AppError> {
        let table = query.table();
        let url = self.table_url(table)?;

        debug!(table = %table, "Counting Supabase rows");

        let response = self
            .authorized(self.http.get(url))
            .header("Prefer", "count=exact")
            .query(&query.clone().limit(1).query_pairs())
            .send()
            .await
            .map_err(|e| AppError::data_fetch(table, e.to_string()))?;

        let response = check_status(table, response).await?;

        response
            .headers()
            .get("Content-Range")
            .and_then(|v| v.to_str().ok())
            .and_then(content_range_total)
            .ok_or_else(|| AppError::data_fetch(table, "missing or invalid Content-Range total"))
    }

    /// Insert one row and return it as stored (`Prefer: return=representation`)
    pub async fn insert<B, T>(&self, table: &str, row: &B) -> Result<T, AppError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = self.table_url(table)?;

        debug!(table = %table, "Inserting into Supabase");

        let response = self
            .authorized(self.http.post(url))
            .header("Content-Profile", self.schema.as_ref())
            .header("Prefer", "return=representation")
            .json(row)
            .send()
            .await
            .map_err(|e| AppError::data_fetch(table, e.to_string()))?;

        let response = check_status(table, response).await?;

        let mut rows = response
            .json::<Vec<T>>()
            .await
            .map_err(|e| AppError::data_fetch(table, format!("invalid response body: {}", e)))?;

        if rows.is_empty() {
            return Err(AppError::data_fetch(table, "insert returned no rows"));
        }
        Ok(rows.swap_remove(0))
    }
}

/// Total from `0-0/1500` or `*/0`; `*` as total means the count was not computed
fn content_range_total(value: &str) -> Option<u64> {
    let (_, total) = value.split_once('/')?;
    total.trim().parse().ok()
}

async fn check_status(table: &str, response: Response) -> Result<Response, AppError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let message = match serde_json::from_str::<PostgrestError>(&body) {
        Ok(PostgrestError { message: Some(message), hint }) => match hint {
            Some(hint) if !hint.is_empty() => format!("{} ({})", message, hint),
            _ => message,
        },
        _ if body.is_empty() => format!("HTTP {}", status),
        _ => format!("HTTP {}: {}", status, body),
    };

    warn!(table = %table, status = %status, error = %message, "Supabase request failed");
    Err(AppError::data_fetch(table, message))
}
