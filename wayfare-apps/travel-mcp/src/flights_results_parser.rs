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

//! # Flights Results Parser
//!
//! Side-effect free flattening of Duffel offer-request responses.
//! The raw schema below only names the fields we read; everything is
//! optional and defaults to empty.

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Offers kept per response, in upstream order.
pub const MAX_OFFERS: usize = 50;

pub const NO_SEGMENTS_DESCRIPTION: &str = "No segments available";

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawOfferResponse {
    #[serde(default)]
    pub data: Option<RawOfferRequest>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawOfferRequest {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub offers: Option<Vec<RawOffer>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawOffer {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub total_amount: Option<String>,
    #[serde(default)]
    pub total_currency: Option<String>,
    #[serde(default)]
    pub slices: Option<Vec<RawSlice>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawSlice {
    #[serde(default)]
    pub origin: Option<RawPlace>,
    #[serde(default)]
    pub destination: Option<RawPlace>,
    #[serde(default)]
    pub duration: Option<String>,
    #[serde(default)]
    pub segments: Option<Vec<RawSegment>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawSegment {
    #[serde(default)]
    pub departing_at: Option<String>,
    #[serde(default)]
    pub arriving_at: Option<String>,
    #[serde(default)]
    pub duration: Option<String>,
    #[serde(default)]
    pub destination: Option<RawPlace>,
    #[serde(default)]
    pub marketing_carrier: Option<RawCarrier>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawPlace {
    #[serde(default)]
    pub iata_code: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawCarrier {
    #[serde(default)]
    pub name: Option<String>,
}

fn text(field: &Option<String>) -> String {
    field.clone().unwrap_or_default()
}

fn iata(place: &Option<RawPlace>) -> String {
    place
        .as_ref()
        .and_then(|p| p.iata_code.clone())
        .unwrap_or_default()
}

impl RawSegment {
    fn carrier_name(&self) -> String {
        self.marketing_carrier
            .as_ref()
            .and_then(|c| c.name.clone())
            .unwrap_or_default()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Price {
    pub amount: String,
    pub currency: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Connection {
    pub airport: String,
    pub arrival: String,
    pub departure: String,
    pub duration: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SliceDetails {
    pub origin: String,
    pub destination: String,
    pub departure: String,
    pub arrival: String,
    pub duration: String,
    pub carrier: String,
    pub stops: usize,
    pub stops_description: String,
    pub connections: Vec<Connection>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizedOffer {
    pub offer_id: String,
    pub price: Price,
    pub slices: Vec<SliceDetails>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlightSearchResult {
    pub request_id: String,
    pub offers: Vec<NormalizedOffer>,
    /// Offers Duffel returned before the cap was applied.
    #[serde(skip)]
    pub received: usize,
}

impl FlightSearchResult {
    pub fn from_json(body: &str) -> Result<Self> {
        let raw: RawOfferResponse = serde_json::from_str(body)?;
        Ok(normalize(&raw))
    }

    pub fn from_value(body: serde_json::Value) -> Result<Self> {
        let raw: RawOfferResponse = serde_json::from_value(body)?;
        Ok(normalize(&raw))
    }

    pub fn len(&self) -> usize {
        self.offers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.offers.is_empty()
    }
}

pub fn normalize(raw: &RawOfferResponse) -> FlightSearchResult {
    let Some(data) = raw.data.as_ref() else {
        return FlightSearchResult {
            request_id: String::new(),
            offers: Vec::new(),
            received: 0,
        };
    };

    let all = data.offers.as_deref().unwrap_or_default();
    let offers = all.iter().take(MAX_OFFERS).map(normalize_offer).collect();

    FlightSearchResult {
        request_id: text(&data.id),
        offers,
        received: all.len(),
    }
}

pub fn normalize_offer(offer: &RawOffer) -> NormalizedOffer {
    NormalizedOffer {
        offer_id: text(&offer.id),
        price: Price {
            amount: text(&offer.total_amount),
            currency: text(&offer.total_currency),
        },
        slices: offer
            .slices
            .as_deref()
            .unwrap_or_default()
            .iter()
            .map(normalize_slice)
            .collect(),
    }
}

pub fn normalize_slice(slice: &RawSlice) -> SliceDetails {
    let segments = slice.segments.as_deref().unwrap_or_default();

    let (Some(first), Some(last)) = (segments.first(), segments.last()) else {
        return SliceDetails {
            origin: iata(&slice.origin),
            destination: iata(&slice.destination),
            departure: String::new(),
            arrival: String::new(),
            duration: text(&slice.duration),
            carrier: String::new(),
            stops: 0,
            stops_description: NO_SEGMENTS_DESCRIPTION.to_string(),
            connections: Vec::new(),
        };
    };

    let stops = segments.len() - 1;

    SliceDetails {
        origin: iata(&slice.origin),
        destination: iata(&slice.destination),
        departure: text(&first.departing_at),
        arrival: text(&last.arriving_at),
        duration: text(&slice.duration),
        carrier: first.carrier_name(),
        stops,
        stops_description: describe_stops(stops),
        connections: connections(segments),
    }
}

pub fn describe_stops(stops: usize) -> String {
    match stops {
        0 => "Non-stop".to_string(),
        1 => "1 stop".to_string(),
        n => format!("{} stops", n),
    }
}

// Duration is the onward segment's own flight time, not the ground time
// between the two segments.
fn connections(segments: &[RawSegment]) -> Vec<Connection> {
    segments
        .windows(2)
        .map(|pair| Connection {
            airport: iata(&pair[0].destination),
            arrival: text(&pair[0].arriving_at),
            departure: text(&pair[1].departing_at),
            duration: text(&pair[1].duration),
        })
        .collect()
}
