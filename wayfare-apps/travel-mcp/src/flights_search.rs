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

//! # Duffel Flights Search Client
//!
//! Effectful (network) operations against Duffel's `/air` API.

use serde_json::Value;

use crate::config::Config;
use crate::duffel_transport::DuffelTransport;
use crate::error::Result;
use crate::flights_query_builder::{
    FlightSearchInput, MultiCityInput, OfferRequestParams, check_offer_id,
};
use crate::flights_results_parser::FlightSearchResult;

const OFFER_REQUESTS_PATH: &str = "/air/offer_requests";
const OFFERS_PATH: &str = "/air/offers";

#[derive(Clone)]
pub struct DuffelFlightsClient {
    transport: DuffelTransport,
}

impl DuffelFlightsClient {
    pub fn new(config: &Config) -> Result<Self> {
        Ok(Self::with_transport(DuffelTransport::new(config)?))
    }

    pub fn with_transport(transport: DuffelTransport) -> Self {
        Self { transport }
    }
}

impl DuffelFlightsClient {
    /// Create an offer request and return its offers, flattened.
    pub async fn create_offer_request(
        &self,
        params: &OfferRequestParams,
    ) -> Result<FlightSearchResult> {
        let overall_start = std::time::Instant::now();
        tracing::info!(
            "Creating offer request with {} slice(s) for {} adult(s) in {} (supplier timeout {}ms)",
            params.slices.len(),
            params.adults,
            params.cabin_class.as_str_name(),
            params.supplier_timeout_ms
        );

        let body = self
            .transport
            .post_json(OFFER_REQUESTS_PATH, &params.query(), &params.body())
            .await?;
        let result = FlightSearchResult::from_value(body)?;

        tracing::info!("Created offer request with ID: {}", result.request_id);
        tracing::info!(
            "Received {} offers, kept {} in {:?}",
            result.received,
            result.len(),
            overall_start.elapsed()
        );

        Ok(result)
    }

    /// Full upstream body for one offer.
    pub async fn get_offer(&self, offer_id: &str) -> Result<Value> {
        check_offer_id(offer_id)?;
        let path = format!("{}/{}", OFFERS_PATH, urlencoding::encode(offer_id));
        tracing::info!("Fetching offer {}", offer_id);
        self.transport.get_json(&path, &[]).await
    }

    pub async fn search_flights(&self, input: &FlightSearchInput) -> Result<FlightSearchResult> {
        let params = input.offer_request()?;
        self.create_offer_request(&params).await
    }

    pub async fn search_multi_city(&self, input: &MultiCityInput) -> Result<FlightSearchResult> {
        let params = input.offer_request()?;
        self.create_offer_request(&params).await
    }
}
