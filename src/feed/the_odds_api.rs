use super::types::ApiQuota;
use super::OddsTransport;
use crate::error::{OddsError, Result};
use async_trait::async_trait;
use reqwest::header::HeaderMap;
use reqwest::Client;
use serde_json::Value;
use std::sync::Mutex;
use std::time::Duration;

/// reqwest-backed transport for the-odds-api.com v4.
pub struct TheOddsApi {
    client: Client,
    base_url: String,
    last_quota: Mutex<Option<ApiQuota>>,
}

/// Parse a quota header that may be an integer or float (e.g. "14527.0").
fn parse_quota_header(headers: &HeaderMap, name: &str) -> u64 {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse::<f64>().ok())
        .map(|v| v as u64)
        .unwrap_or(0)
}

/// Best-effort error detail: the JSON body re-serialized if it parses,
/// otherwise the raw text.
fn error_detail(body: &str) -> String {
    match serde_json::from_str::<Value>(body) {
        Ok(v) => v.to_string(),
        Err(_) => body.to_string(),
    }
}

impl TheOddsApi {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            last_quota: Mutex::new(None),
        })
    }

    /// Quota reported by the most recent response, if any.
    pub fn last_quota(&self) -> Option<ApiQuota> {
        self.last_quota.lock().ok().and_then(|q| q.clone())
    }

    fn record_quota(&self, headers: &HeaderMap) {
        if !headers.contains_key("x-requests-remaining") {
            return;
        }
        let quota = ApiQuota {
            requests_used: parse_quota_header(headers, "x-requests-used"),
            requests_remaining: parse_quota_header(headers, "x-requests-remaining"),
        };
        tracing::debug!(
            used = quota.requests_used,
            remaining = quota.requests_remaining,
            "odds api quota"
        );
        if let Ok(mut slot) = self.last_quota.lock() {
            *slot = Some(quota);
        }
    }
}

#[async_trait]
impl OddsTransport for TheOddsApi {
    async fn get_json(&self, path: &str, query: &[(String, String)]) -> Result<Value> {
        let url = format!("{}{}", self.base_url, path);

        let resp = self.client.get(&url).query(query).send().await?;
        self.record_quota(resp.headers());

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(OddsError::Http {
                status: status.as_u16(),
                url,
                detail: error_detail(&body),
            });
        }

        let body = resp.text().await?;
        serde_json::from_str(&body).map_err(|source| OddsError::Decode { context: url, source })
    }
}
