use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Url;
use tracing::{debug, trace};

use crate::error::{CoreError, SourceError};
use crate::types::SourceRow;

use super::LedgerSource;

/// How much of an error response body to keep in the error message.
const ERROR_BODY_CAP: usize = 512;

/// Ledger query client over HTTP(S).
///
/// Posts `{"query": ..., "project": ...}` to the endpoint and expects a
/// `{"columns": [...], "rows": [[...], ...]}` result page. Per-attempt
/// result timeouts are owned by the fetcher, so the underlying client only
/// bounds connection establishment.
pub struct HttpLedgerClient {
    client: reqwest::Client,
    endpoint: String,
    api_token: Option<String>,
    project_id: String,
}

#[derive(serde::Serialize)]
struct QueryRequest<'a> {
    query: &'a str,
    project: &'a str,
}

#[derive(serde::Deserialize)]
struct QueryResponse {
    columns: Vec<String>,
    rows: Vec<Vec<serde_json::Value>>,
}

impl HttpLedgerClient {
    /// Create a client for an `http://` or `https://` query endpoint.
    pub fn new(
        endpoint: &str,
        api_token: Option<String>,
        project_id: &str,
    ) -> Result<Self, CoreError> {
        let endpoint = parse_endpoint(endpoint)?;

        let client = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .tcp_nodelay(true)
            .build()
            .expect("reqwest client builder uses valid static config");

        Ok(Self {
            client,
            endpoint,
            api_token,
            project_id: project_id.to_owned(),
        })
    }
}

#[async_trait]
impl LedgerSource for HttpLedgerClient {
    async fn run_query(&self, sql: &str) -> Result<Vec<SourceRow>, SourceError> {
        debug!(query_len = sql.len(), project = %self.project_id, "ledger query");
        trace!(query = %sql, "ledger query text");

        let mut builder = self.client.post(&self.endpoint).json(&QueryRequest {
            query: sql,
            project: &self.project_id,
        });
        if let Some(token) = &self.api_token {
            builder = builder.bearer_auth(token);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| SourceError::Transport(e.to_string()))?;
        let status = response.status();

        let body = response
            .text()
            .await
            .map_err(|e| SourceError::Transport(e.to_string()))?;
        debug!(%status, body_len = body.len(), "ledger response");

        if !status.is_success() {
            return Err(SourceError::Server {
                status: status.as_u16(),
                message: truncate_body(&body),
            });
        }

        let decoded: QueryResponse = serde_json::from_str(&body).map_err(|e| {
            SourceError::InvalidResponse(format!("decode query response: {e}"))
        })?;

        let columns = decoded.columns;
        Ok(decoded
            .rows
            .into_iter()
            .map(|values| SourceRow {
                columns: columns.clone(),
                values,
            })
            .collect())
    }
}

// ==============================================================================
// Credential and Endpoint Resolution
// ==============================================================================

/// Resolve the API token for the query service.
///
/// Precedence:
/// 1. explicit token
/// 2. first non-empty line of `token_file`
/// 3. no auth
pub fn resolve_api_token(
    token: Option<&str>,
    token_file: Option<&Path>,
) -> Result<Option<String>, CoreError> {
    if let Some(token) = token {
        if token.trim().is_empty() {
            return Err(CoreError::Credentials("api token is empty".to_owned()));
        }
        return Ok(Some(token.to_owned()));
    }

    let Some(token_file) = token_file else {
        return Ok(None);
    };

    let content = std::fs::read_to_string(token_file).map_err(|e| {
        CoreError::Credentials(format!(
            "failed to read token file {}: {e}",
            token_file.display()
        ))
    })?;
    let line = content
        .lines()
        .next()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .ok_or_else(|| {
            CoreError::Credentials(format!("token file {} is empty", token_file.display()))
        })?;

    Ok(Some(line.to_owned()))
}

fn parse_endpoint(endpoint: &str) -> Result<String, CoreError> {
    let parsed = Url::parse(endpoint).map_err(|e| {
        CoreError::Credentials(format!(
            "invalid endpoint `{endpoint}`: expected HTTP(S) URL ({e})"
        ))
    })?;
    match parsed.scheme() {
        "http" | "https" => Ok(endpoint.to_owned()),
        other => Err(CoreError::Credentials(format!(
            "unsupported endpoint scheme `{other}`; expected http or https"
        ))),
    }
}

fn truncate_body(body: &str) -> String {
    if body.len() <= ERROR_BODY_CAP {
        return body.to_owned();
    }
    let cut = body
        .char_indices()
        .take_while(|(i, _)| *i < ERROR_BODY_CAP)
        .last()
        .map(|(i, c)| i + c.len_utf8())
        .unwrap_or(0);
    format!("{}…", &body[..cut])
}
