//! Read-only client for the store table behind the Supabase REST API.
//!
//! One request per fetch: `GET {base}/rest/v1/{table}?select=*`. There is no
//! retry and no pagination; a failed fetch is reported to the caller as is.

use std::time::Duration;

use foodlink_core::{AppConfig, Dataset, RawStoreRow};
use reqwest::{Client, Url};

use crate::error::SupabaseError;

/// Client for one store table.
///
/// Use [`SupabaseClient::new`] with the loaded config or
/// [`SupabaseClient::with_base_url`] to point at a mock server in tests.
pub struct SupabaseClient {
    client: Client,
    api_key: String,
    table_url: Url,
}

impl SupabaseClient {
    /// # Errors
    ///
    /// Same as [`SupabaseClient::with_base_url`].
    pub fn new(config: &AppConfig) -> Result<Self, SupabaseError> {
        Self::with_base_url(
            &config.supabase_url,
            &config.supabase_key,
            &config.stores_table,
            config.request_timeout_secs,
            &config.user_agent,
        )
    }

    /// # Errors
    ///
    /// Returns [`SupabaseError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`SupabaseError::InvalidBaseUrl`] if
    /// `base_url` and `table` do not form a valid URL.
    pub fn with_base_url(
        base_url: &str,
        api_key: &str,
        table: &str,
        timeout_secs: u64,
        user_agent: &str,
    ) -> Result<Self, SupabaseError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;

        let invalid = |reason: String| SupabaseError::InvalidBaseUrl {
            url: base_url.to_owned(),
            reason,
        };
        if table.trim().is_empty() || table.contains('/') {
            return Err(invalid(format!("invalid table name '{table}'")));
        }

        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let mut table_url = Url::parse(&normalised)
            .and_then(|base| base.join(&format!("rest/v1/{table}")))
            .map_err(|e| invalid(e.to_string()))?;
        table_url.query_pairs_mut().append_pair("select", "*");

        Ok(Self {
            client,
            api_key: api_key.to_owned(),
            table_url,
        })
    }

    /// The fully-built request URL.
    #[must_use]
    pub fn table_url(&self) -> &Url {
        &self.table_url
    }

    /// Fetches every row of the store table and assembles a [`Dataset`].
    ///
    /// Rows that are not objects with an integer `id` are skipped with a
    /// warning; everything else is parsed leniently by the store model.
    ///
    /// # Errors
    ///
    /// - [`SupabaseError::Http`] on network failure.
    /// - [`SupabaseError::UnexpectedStatus`] on a non-2xx status.
    /// - [`SupabaseError::Deserialize`] if the body is not a JSON array.
    pub async fn fetch_stores(&self) -> Result<Dataset, SupabaseError> {
        tracing::info!(url = %self.table_url, "fetching store table");

        let response = self
            .client
            .get(self.table_url.clone())
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            tracing::error!(status = status.as_u16(), "store table request failed");
            return Err(SupabaseError::UnexpectedStatus {
                status: status.as_u16(),
                url: self.table_url.to_string(),
            });
        }

        let body = response.text().await?;
        let rows: Vec<serde_json::Value> =
            serde_json::from_str(&body).map_err(|e| SupabaseError::Deserialize {
                context: self.table_url.to_string(),
                source: e,
            })?;

        let total = rows.len();
        let parsed: Vec<RawStoreRow> = rows
            .into_iter()
            .enumerate()
            .filter_map(|(position, row)| match serde_json::from_value(row) {
                Ok(raw) => Some(raw),
                Err(e) => {
                    tracing::warn!(position, error = %e, "skipping malformed store row");
                    None
                }
            })
            .collect();

        let dataset = Dataset::from_rows(parsed);
        tracing::info!(rows = total, stores = dataset.len(), "store table loaded");
        Ok(dataset)
    }
}
