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

//! # Process configuration
//!
//! Read once at startup, then handed to the clients.

use crate::error::{Result, TravelError};

pub const API_KEY_VAR: &str = "DUFFEL_API_KEY";
pub const BASE_URL_VAR: &str = "DUFFEL_API_BASE_URL";
pub const MAX_CONCURRENT_VAR: &str = "WAYFARE_MAX_CONCURRENT_REQUESTS";
pub const MAX_QPS_VAR: &str = "WAYFARE_MAX_REQUESTS_PER_SECOND";

pub const DEFAULT_BASE_URL: &str = "https://api.duffel.com";
pub const DEFAULT_MAX_CONCURRENT_REQUESTS: u64 = 4;
/// Upper bound for both request limits.
pub const MAX_REQUEST_LIMIT: u64 = 1024;

#[derive(Clone)]
pub struct Config {
    pub api_key: String,
    pub api_base_url: String,
    pub max_concurrent_requests: u64,
    /// When set, upstream calls are paced per second instead of only capped.
    pub max_requests_per_second: Option<u64>,
}

impl Config {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            api_base_url: DEFAULT_BASE_URL.to_string(),
            max_concurrent_requests: DEFAULT_MAX_CONCURRENT_REQUESTS,
            max_requests_per_second: None,
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.api_base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_max_concurrent_requests(mut self, max_concurrent: u64) -> Self {
        self.max_concurrent_requests = max_concurrent.max(1);
        self
    }

    pub fn with_max_requests_per_second(mut self, qps: Option<u64>) -> Self {
        self.max_requests_per_second = qps.map(|q| q.max(1));
        self
    }

    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key/value source. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let api_key = get(API_KEY_VAR).ok_or_else(|| {
            TravelError::Config(format!("{} environment variable is not set", API_KEY_VAR))
        })?;

        let mut config = Self::new(api_key.trim());

        if let Some(base_url) = get(BASE_URL_VAR) {
            config = config.with_base_url(base_url.trim());
        }

        if let Some(raw) = get(MAX_CONCURRENT_VAR) {
            config = config.with_max_concurrent_requests(parse_limit(MAX_CONCURRENT_VAR, &raw)?);
        }

        if let Some(raw) = get(MAX_QPS_VAR) {
            config = config.with_max_requests_per_second(Some(parse_limit(MAX_QPS_VAR, &raw)?));
        }

        Ok(config)
    }

    /// First characters of the key, enough to tell test and live keys apart.
    pub fn redacted_api_key(&self) -> String {
        let prefix: String = self.api_key.chars().take(8).collect();
        format!("{}...", prefix)
    }
}

fn parse_limit(var: &str, raw: &str) -> Result<u64> {
    let value: u64 = raw
        .trim()
        .parse()
        .ok()
        .filter(|v| *v > 0)
        .ok_or_else(|| {
            TravelError::Config(format!("{} must be a positive integer, got '{}'", var, raw))
        })?;
    if value > MAX_REQUEST_LIMIT {
        return Err(TravelError::Config(format!(
            "{} must be at most {}, got {}",
            var, MAX_REQUEST_LIMIT, value
        )));
    }
    Ok(value)
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("api_key", &self.redacted_api_key())
            .field("api_base_url", &self.api_base_url)
            .field("max_concurrent_requests", &self.max_concurrent_requests)
            .field("max_requests_per_second", &self.max_requests_per_second)
            .finish()
    }
}
