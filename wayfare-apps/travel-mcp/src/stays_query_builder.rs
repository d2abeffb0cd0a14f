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

//! # Stays Query Builder
//!
//! Side-effect free input schemas and request shapes for Duffel Stays.

use serde::{Deserialize, Serialize};

use crate::error::{Result, TravelError};

pub const MIN_REVIEWS_LIMIT: u32 = 1;
pub const MAX_REVIEWS_LIMIT: u32 = 200;

/// Input of the `search_stays` tool. Serialized as-is for `/stays/offers`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "mcp", derive(schemars::JsonSchema))]
#[serde(rename_all = "snake_case")]
pub struct StaySearchInput {
    /// City, airport code, or area to search for stays
    pub location: String,
    /// Check-in date (YYYY-MM-DD)
    pub check_in_date: String,
    /// Check-out date (YYYY-MM-DD)
    pub check_out_date: String,
    /// Number of guests
    pub guests: u32,
    /// Number of rooms
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rooms: Option<u32>,
    /// Search radius in kilometers
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub radius_km: Option<f64>,
}

impl StaySearchInput {
    pub fn new(
        location: impl Into<String>,
        check_in_date: impl Into<String>,
        check_out_date: impl Into<String>,
        guests: u32,
    ) -> Self {
        Self {
            location: location.into(),
            check_in_date: check_in_date.into(),
            check_out_date: check_out_date.into(),
            guests,
            rooms: None,
            radius_km: None,
        }
    }

    pub fn rooms(mut self, rooms: Option<u32>) -> Self {
        self.rooms = rooms;
        self
    }

    pub fn radius_km(mut self, radius_km: Option<f64>) -> Self {
        self.radius_km = radius_km;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.guests < 1 {
            return Err(TravelError::validation("guests must be at least 1"));
        }
        if self.rooms.is_some_and(|r| r < 1) {
            return Err(TravelError::validation("rooms must be at least 1"));
        }
        if self.radius_km.is_some_and(|r| !r.is_finite()) {
            return Err(TravelError::validation("radius_km must be a finite number"));
        }
        Ok(())
    }
}

/// Input of the `get_stay_reviews` tool.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "mcp", derive(schemars::JsonSchema))]
#[serde(rename_all = "snake_case")]
pub struct StayReviewInput {
    /// Duffel stay/hotel ID (e.g., acc_0000AWr2VsUNIF1Vl91xg0)
    pub stay_id: String,
    /// Pagination cursor: after
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub after: Option<String>,
    /// Pagination cursor: before
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub before: Option<String>,
    /// Max reviews to return (1-200)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
}

impl StayReviewInput {
    pub fn new(stay_id: impl Into<String>) -> Self {
        Self {
            stay_id: stay_id.into(),
            ..Default::default()
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.stay_id.trim().is_empty() {
            return Err(TravelError::validation("stay_id is required"));
        }
        if let Some(limit) = self.limit {
            if !(MIN_REVIEWS_LIMIT..=MAX_REVIEWS_LIMIT).contains(&limit) {
                return Err(TravelError::validation(format!(
                    "limit must be between {} and {}, got {}",
                    MIN_REVIEWS_LIMIT, MAX_REVIEWS_LIMIT, limit
                )));
            }
        }
        Ok(())
    }

    /// Query pairs in a stable order; unset cursors are left out.
    pub fn query(&self) -> Vec<(&'static str, String)> {
        let mut query = Vec::new();
        if let Some(after) = self.after.as_ref().filter(|s| !s.is_empty()) {
            query.push(("after", after.clone()));
        }
        if let Some(before) = self.before.as_ref().filter(|s| !s.is_empty()) {
            query.push(("before", before.clone()));
        }
        if let Some(limit) = self.limit {
            query.push(("limit", limit.to_string()));
        }
        query
    }
}
