//! Client for the hosted table service's REST row interface.
//!
//! Every fetch is a full select-all of one table; there is no pagination and
//! no server-side filtering — all filtering happens client-side after
//! retrieval. Rows come back loosely typed, so they are normalized into
//! [`Post`] values immediately.

use std::time::Duration;

use reqwest::{Client, Url};
use serde_json::Value;

use pulselens_core::{normalize_row, Post};

use crate::error::ClientError;

/// Client for the hosted row source.
///
/// Use [`RowClient::new`] against the configured project URL; tests point it
/// at a wiremock server instead. [`RowClient::with_bearer`] swaps the
/// authorization token for a signed-in session's access token.
pub struct RowClient {
    client: Client,
    api_key: String,
    bearer: Option<String>,
    base_url: Url,
}

impl RowClient {
    /// Creates a new client for the given project URL.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`ClientError::Api`] if `project_url` is not
    /// a valid URL.
    pub fn new(project_url: &str, api_key: &str, timeout_secs: u64) -> Result<Self, ClientError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent("pulselens/0.1 (mention-tracking)")
            .build()?;

        // Normalise: ensure the base URL ends with exactly one slash so that
        // joins append to the root path rather than replacing the last
        // path segment.
        let normalised = format!("{}/", project_url.trim_end_matches('/'));
        let base_url = Url::parse(&normalised)
            .map_err(|e| ClientError::Api(format!("invalid project URL '{project_url}': {e}")))?;

        Ok(Self {
            client,
            api_key: api_key.to_owned(),
            bearer: None,
            base_url,
        })
    }

    /// Uses `token` as the bearer for subsequent requests instead of the
    /// anonymous API key.
    #[must_use]
    pub fn with_bearer(mut self, token: &str) -> Self {
        self.bearer = Some(token.to_owned());
        self
    }

    /// Fetches every row of `table` as loosely-typed JSON objects.
    ///
    /// # Errors
    ///
    /// - [`ClientError::Http`] on network failure or non-2xx HTTP status.
    /// - [`ClientError::Deserialize`] if the body is not valid JSON.
    /// - [`ClientError::Api`] if the body is JSON but not a row array.
    pub async fn fetch_rows(&self, table: &str) -> Result<Vec<Value>, ClientError> {
        let url = self.table_url(table)?;
        let bearer = self.bearer.as_deref().unwrap_or(&self.api_key);

        let response = self
            .client
            .get(url.clone())
            .header("apikey", &self.api_key)
            .bearer_auth(bearer)
            .send()
            .await?;
        let response = response.error_for_status()?;
        let body = response.text().await?;

        let value: Value =
            serde_json::from_str(&body).map_err(|e| ClientError::Deserialize {
                context: url.to_string(),
                source: e,
            })?;

        match value {
            Value::Array(rows) => Ok(rows),
            Value::Object(map) => {
                let msg = map
                    .get("message")
                    .and_then(Value::as_str)
                    .unwrap_or("unexpected object response")
                    .to_string();
                Err(ClientError::Api(msg))
            }
            _ => Err(ClientError::Api(format!(
                "unexpected response shape from table '{table}'"
            ))),
        }
    }

    /// Fetches and normalizes one table — the single-topic path.
    ///
    /// Posts are sorted by id, numerically when both ids parse as integers,
    /// lexicographically otherwise. Fetch failures propagate to the caller;
    /// this path does not swallow errors (unlike [`RowClient::fetch_all_posts`]).
    ///
    /// # Errors
    ///
    /// Any error from [`RowClient::fetch_rows`].
    pub async fn fetch_posts(&self, table: &str) -> Result<Vec<Post>, ClientError> {
        let rows = self.fetch_rows(table).await?;
        tracing::debug!(table, count = rows.len(), "fetched rows");

        let mut posts: Vec<Post> = rows
            .iter()
            .enumerate()
            .map(|(index, row)| normalize_row(row, table, index))
            .collect();

        posts.sort_by(|a, b| match (a.id.parse::<i64>(), b.id.parse::<i64>()) {
            (Ok(x), Ok(y)) => x.cmp(&y),
            _ => a.id.cmp(&b.id),
        });

        Ok(posts)
    }

    /// Fetches and normalizes every configured table — the all-sources path.
    ///
    /// A failed table is logged and skipped so one bad source does not abort
    /// the others; the result is simply missing that table's posts. Each post
    /// carries its originating table in `source`.
    pub async fn fetch_all_posts(&self, tables: &[String]) -> Vec<Post> {
        let mut all = Vec::new();

        for table in tables {
            match self.fetch_rows(table).await {
                Ok(rows) => {
                    tracing::debug!(table = %table, count = rows.len(), "fetched rows");
                    all.extend(rows.iter().enumerate().map(|(index, row)| {
                        let mut post = normalize_row(row, table, index);
                        post.source = Some(table.clone());
                        post
                    }));
                }
                Err(e) => {
                    tracing::error!(table = %table, error = %e, "row fetch failed, skipping table");
                }
            }
        }

        all
    }

    /// Builds the select-all URL for one table.
    fn table_url(&self, table: &str) -> Result<Url, ClientError> {
        let mut url = self
            .base_url
            .join(&format!("rest/v1/{table}"))
            .map_err(|e| ClientError::Api(format!("invalid table name '{table}': {e}")))?;
        url.query_pairs_mut().append_pair("select", "*");
        Ok(url)
    }
}
