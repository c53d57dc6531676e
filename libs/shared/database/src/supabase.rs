use reqwest::{
    Client,
    header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE},
    Method,
};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, error};

use shared_config::AppConfig;

use crate::error::DbError;

/// Error payload returned by PostgREST on a failed request.
#[derive(Debug, Deserialize)]
struct PostgrestError {
    code: Option<String>,
    message: Option<String>,
    details: Option<String>,
}

/// Thin client over the Supabase PostgREST endpoint.
///
/// One instance is built at startup and shared; the inner `reqwest::Client` pools connections
/// and applies the configured timeout to every call.
pub struct SupabaseClient {
    client: Client,
    base_url: String,
}

impl SupabaseClient {
    pub fn new(config: &AppConfig) -> Result<Self, DbError> {
        let mut headers = HeaderMap::new();

        let key = HeaderValue::from_str(&config.supabase_service_key)
            .map_err(|_| DbError::Configuration("service key is not a valid header value".to_string()))?;
        let bearer = HeaderValue::from_str(&format!("Bearer {}", config.supabase_service_key))
            .map_err(|_| DbError::Configuration("service key is not a valid header value".to_string()))?;

        headers.insert("apikey", key);
        headers.insert(AUTHORIZATION, bearer);
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let client = Client::builder()
            .default_headers(headers)
            .timeout(config.database_timeout)
            .build()
            .map_err(|e| DbError::Configuration(e.to_string()))?;

        Ok(Self {
            client,
            base_url: config.supabase_url.trim_end_matches('/').to_string(),
        })
    }

    pub async fn request<T>(&self, method: Method, path: &str, body: Option<Value>) -> Result<T, DbError>
    where
        T: DeserializeOwned,
    {
        self.request_with_headers(method, path, body, None).await
    }

    pub async fn request_with_headers<T>(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
        extra_headers: Option<HeaderMap>,
    ) -> Result<T, DbError>
    where
        T: DeserializeOwned,
    {
        let url = format!("{}{}", self.base_url, path);
        debug!("Making {} request to {}", method, url);

        let mut req = self.client.request(method, &url);

        if let Some(headers) = extra_headers {
            req = req.headers(headers);
        }

        if let Some(body_data) = body {
            req = req.json(&body_data);
        }

        let response = req.send().await?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await?;
            error!("API error ({}): {}", status, error_text);
            return Err(classify_error(status.as_u16(), &error_text));
        }

        let bytes = response.bytes().await?;
        serde_json::from_slice(&bytes).map_err(|e| DbError::Decode(e.to_string()))
    }

    /// Runs a filtered `GET` and deserializes every returned row.
    pub async fn select<T>(&self, path: &str) -> Result<Vec<T>, DbError>
    where
        T: DeserializeOwned,
    {
        self.request(Method::GET, path, None).await
    }

    /// Inserts one row into `table` and returns the stored representation.
    pub async fn insert<T>(&self, table: &str, row: Value) -> Result<T, DbError>
    where
        T: DeserializeOwned,
    {
        let path = format!("/rest/v1/{}", table);
        let rows: Vec<T> = self
            .request_with_headers(Method::POST, &path, Some(row), Some(return_representation()))
            .await?;

        rows.into_iter()
            .next()
            .ok_or_else(|| DbError::Decode(format!("insert into {} returned no rows", table)))
    }

    /// Patches the rows matched by `path` and returns the first updated row, if any matched.
    pub async fn update<T>(&self, path: &str, changes: Value) -> Result<Option<T>, DbError>
    where
        T: DeserializeOwned,
    {
        let rows: Vec<T> = self
            .request_with_headers(Method::PATCH, path, Some(changes), Some(return_representation()))
            .await?;

        Ok(rows.into_iter().next())
    }

    pub fn get_base_url(&self) -> &str {
        &self.base_url
    }
}

fn return_representation() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert("Prefer", HeaderValue::from_static("return=representation"));
    headers
}

/// Maps a failed PostgREST response onto a typed error using the Postgres SQLSTATE it carries.
fn classify_error(status: u16, body: &str) -> DbError {
    let parsed: Option<PostgrestError> = serde_json::from_str(body).ok();

    let (code, message) = match parsed {
        Some(err) => {
            let message = match (err.message, err.details) {
                (Some(message), Some(details)) => format!("{} ({})", message, details),
                (Some(message), None) => message,
                (None, Some(details)) => details,
                (None, None) => body.to_string(),
            };
            (err.code, message)
        }
        None => (None, body.to_string()),
    };

    match code.as_deref() {
        Some("23505") => DbError::UniqueViolation(message),
        Some("23503") => DbError::ForeignKeyViolation(message),
        Some("23514") => DbError::CheckViolation(message),
        Some("PGRST116") => DbError::NotFound,
        _ => DbError::Api { status, message },
    }
}
