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

//! # Stays Results Parser
//!
//! Flattens Duffel Stays offers and reviews into compact records.
//! Missing fields become empty strings, never errors.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::Result;
use crate::flights_results_parser::Price;

// Raw upstream shapes
// ---------------------------------------------------------

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawStayOffersResponse {
    pub data: Option<Vec<RawStayOffer>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawStayOffer {
    pub id: Option<String>,
    pub hotel: Option<RawHotel>,
    pub total_amount: Option<String>,
    pub currency: Option<String>,
    pub room_type: Option<Value>,
    pub cancellation_policy: Option<Value>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawHotel {
    pub id: Option<String>,
    pub name: Option<String>,
    pub address: Option<RawAddress>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawAddress {
    pub line_1: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawReviewsResponse {
    pub meta: Option<ReviewsMeta>,
    pub data: Option<RawReviewsData>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawReviewsData {
    pub reviews: Option<Vec<RawReview>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawReview {
    pub text: Option<String>,
    pub score: Option<f64>,
    pub reviewer_name: Option<String>,
    pub created_at: Option<String>,
}

// Normalized records
// ---------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StayOffer {
    pub offer_id: String,
    pub hotel_id: String,
    pub hotel_name: String,
    pub address: String,
    pub price: Price,
    pub room_type: String,
    pub cancellation_policy: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StaySearchResult {
    pub offers: Vec<StayOffer>,
}

impl StaySearchResult {
    pub fn from_value(body: Value) -> Result<Self> {
        let raw: RawStayOffersResponse = serde_json::from_value(body)?;
        Ok(Self {
            offers: raw
                .data
                .as_deref()
                .unwrap_or_default()
                .iter()
                .map(normalize_stay_offer)
                .collect(),
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReviewsMeta {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub after: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub before: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StayReview {
    pub text: String,
    pub score: Option<f64>,
    pub reviewer_name: String,
    pub created_at: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StayReviewsResult {
    pub meta: ReviewsMeta,
    pub reviews: Vec<StayReview>,
}

impl StayReviewsResult {
    pub fn from_value(body: Value) -> Result<Self> {
        let raw: RawReviewsResponse = serde_json::from_value(body)?;
        let reviews = raw
            .data
            .and_then(|d| d.reviews)
            .unwrap_or_default()
            .into_iter()
            .map(|r| StayReview {
                text: r.text.unwrap_or_default(),
                score: r.score,
                reviewer_name: r.reviewer_name.unwrap_or_default(),
                created_at: r.created_at.unwrap_or_default(),
            })
            .collect();

        Ok(Self {
            meta: raw.meta.unwrap_or_default(),
            reviews,
        })
    }
}

pub fn normalize_stay_offer(offer: &RawStayOffer) -> StayOffer {
    let hotel = offer.hotel.as_ref();

    // A currency without an amount is meaningless; blank both.
    let price = match offer.total_amount.as_deref() {
        Some(amount) if !amount.is_empty() => Price {
            amount: amount.to_string(),
            currency: offer.currency.clone().unwrap_or_default(),
        },
        _ => Price {
            amount: String::new(),
            currency: String::new(),
        },
    };

    StayOffer {
        offer_id: offer.id.clone().unwrap_or_default(),
        hotel_id: hotel.and_then(|h| h.id.clone()).unwrap_or_default(),
        hotel_name: hotel.and_then(|h| h.name.clone()).unwrap_or_default(),
        address: hotel
            .and_then(|h| h.address.as_ref())
            .and_then(|a| a.line_1.clone())
            .unwrap_or_default(),
        price,
        room_type: value_text(offer.room_type.as_ref()),
        cancellation_policy: value_text(offer.cancellation_policy.as_ref()),
    }
}

/// Strings pass through; structured values are kept as compact JSON.
fn value_text(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}
