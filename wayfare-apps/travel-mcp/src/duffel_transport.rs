//!  Wayfare Travel MCP
//!
//!  Copyright (C) 2026  The Wayfare Travel MCP Authors
//!
//!  This program is free software: you can redistribute it and/or modify
//!  it under the terms of the GNU Affero General Public License as published by
//!  the Free Software Foundation, either version 3 of the License, or
//!  (at your option) any later version.
//!
//!  This program is distributed in the hope that it will be useful,
//!  but WITHOUT ANY WARRANTY; without even the implied warranty of
//!  MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
//!  GNU Affero General Public License for more details.
//!
//!  You should have received a copy of the GNU Affero General Public License
//!  along with this program.  If not, see <http://www.gnu.org/licenses/>.

//! # Duffel HTTP transport
//!
//! Effectful (network) half of the Duffel clients: authenticated JSON
//! requests with fixed headers and a fixed timeout. One attempt per call.

use std::sync::Arc;
use std::time::{Duration, Instant};

use serde::Serialize;
use serde_json::Value;
use wayfare_request_gate::RequestGate;

use crate::config::Config;
use crate::error::{Result, TravelError};

pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);
pub const DUFFEL_VERSION: &str = "v1";

const ERROR_BODY_PREVIEW_CHARS: usize = 500;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Method {
    Get,
    Post,
}

impl Method {
    fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
        }
    }
}

#[derive(Clone)]
pub struct DuffelTransport {
    client: Arc<wreq::Client>,
    gate: RequestGate,
    base_url: Arc<str>,
    authorization: Arc<str>,
}

impl DuffelTransport {
    pub fn new(config: &Config) -> Result<Self> {
        let client = wreq::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .connect_timeout(REQUEST_TIMEOUT)
            .build()?;

        let gate = match config.max_requests_per_second {
            Some(qps) => RequestGate::with_qps_limit(qps),
            None => RequestGate::with_concurrency_limit(config.max_concurrent_requests),
        };

        tracing::debug!(
            "Duffel transport ready: base URL {}, API key {}, {} requests in flight max",
            config.api_base_url,
            config.redacted_api_key(),
            gate.max_in_flight()
        );

        Ok(Self {
            client: Arc::new(client),
            gate,
            base_url: config.api_base_url.trim_end_matches('/').into(),
            authorization: format!("Bearer {}", config.api_key).into(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Absolute URL for `path` with a percent-encoded query string.
    pub fn url(&self, path: &str, query: &[(&str, String)]) -> String {
        let mut url = format!("{}{}", self.base_url, path);
        if !query.is_empty() {
            let pairs: Vec<String> = query
                .iter()
                .map(|(k, v)| format!("{}={}", k, urlencoding::encode(v)))
                .collect();
            url.push('?');
            url.push_str(&pairs.join("&"));
        }
        url
    }

    pub async fn post_json<B>(&self, path: &str, query: &[(&str, String)], body: &B) -> Result<Value>
    where
        B: Serialize + ?Sized,
    {
        let payload = serde_json::to_vec(body)?;
        tracing::debug!(
            "POST {} with {} byte body: {}",
            path,
            payload.len(),
            String::from_utf8_lossy(&payload)
        );
        self.send(Method::Post, self.url(path, query), Some(payload), DUFFEL_VERSION)
            .await
    }

    pub async fn get_json(&self, path: &str, query: &[(&str, String)]) -> Result<Value> {
        self.get_json_versioned(path, query, DUFFEL_VERSION).await
    }

    /// GET against an endpoint that only exists on a newer API version.
    pub async fn get_json_versioned(
        &self,
        path: &str,
        query: &[(&str, String)],
        version: &str,
    ) -> Result<Value> {
        self.send(Method::Get, self.url(path, query), None, version)
            .await
    }

    async fn send(
        &self,
        method: Method,
        url: String,
        payload: Option<Vec<u8>>,
        version: &str,
    ) -> Result<Value> {
        let body = self
            .gate
            .run(|| self.attempt(method, &url, payload, version))
            .await?;

        Ok(serde_json::from_str(&body)?)
    }

    async fn attempt(
        &self,
        method: Method,
        url: &str,
        payload: Option<Vec<u8>>,
        version: &str,
    ) -> Result<String> {
        let started = Instant::now();

        let request = match method {
            Method::Get => self.client.get(url),
            Method::Post => self.client.post(url),
        };
        let request = request
            .header("Accept", "application/json")
            .header("Duffel-Version", version)
            .header("Authorization", self.authorization.as_ref());
        let request = match payload {
            Some(bytes) => request
                .header("Content-Type", "application/json")
                .body(bytes),
            None => request,
        };

        tracing::trace!("[duffel] {} {}", method.as_str(), url);
        let response = request.send().await?;

        let status = response.status();
        tracing::debug!(
            "[duffel] {} {} -> {} {} in {:?}",
            method.as_str(),
            url,
            status.as_u16(),
            status.canonical_reason().unwrap_or("Unknown"),
            started.elapsed()
        );

        let body = response.text().await?;
        tracing::debug!("[duffel] Response body: {} KB", body.len() / 1024);

        if !status.is_success() {
            let preview = body.chars().take(ERROR_BODY_PREVIEW_CHARS).collect();
            return Err(TravelError::Http {
                status: status.as_u16(),
                body: preview,
            });
        }

        Ok(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn transport() -> DuffelTransport {
        DuffelTransport::new(&Config::new("duffel_test_key").with_base_url("http://127.0.0.1:1/"))
            .unwrap()
    }

    #[test]
    fn test_url_without_query() {
        let t = transport();
        assert_eq!(t.base_url(), "http://127.0.0.1:1");
        assert_eq!(t.url("/air/offers/off_1", &[]), "http://127.0.0.1:1/air/offers/off_1");
    }

    #[test]
    fn test_url_encodes_query_values() {
        let t = transport();
        let url = t.url(
            "/stays/accommodation/acc_1/reviews",
            &[("after", "g2wAAAAB d=".to_string()), ("limit", "20".to_string())],
        );
        assert_eq!(
            url,
            "http://127.0.0.1:1/stays/accommodation/acc_1/reviews?after=g2wAAAAB%20d%3D&limit=20"
        );
    }
}
