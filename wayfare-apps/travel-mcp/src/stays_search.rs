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

//! # Duffel Stays Search Client

use crate::config::Config;
use crate::duffel_transport::DuffelTransport;
use crate::error::Result;
use crate::stays_query_builder::{StayReviewInput, StaySearchInput};
use crate::stays_results_parser::{StayReviewsResult, StaySearchResult};

const STAY_OFFERS_PATH: &str = "/stays/offers";
const ACCOMMODATION_PATH: &str = "/stays/accommodation";

/// Reviews are only served by the v2 API.
pub const REVIEWS_DUFFEL_VERSION: &str = "v2";

#[derive(Clone)]
pub struct DuffelStaysClient {
    transport: DuffelTransport,
}

impl DuffelStaysClient {
    pub fn new(config: &Config) -> Result<Self> {
        Ok(Self::with_transport(DuffelTransport::new(config)?))
    }

    pub fn with_transport(transport: DuffelTransport) -> Self {
        Self { transport }
    }

    pub async fn search_stays(&self, input: &StaySearchInput) -> Result<StaySearchResult> {
        input.validate()?;
        tracing::info!(
            "Searching stays in {} from {} to {} for {} guest(s)",
            input.location,
            input.check_in_date,
            input.check_out_date,
            input.guests
        );

        let body = self.transport.post_json(STAY_OFFERS_PATH, &[], input).await?;
        let result = StaySearchResult::from_value(body)?;

        tracing::info!("Found {} stay offers", result.offers.len());
        Ok(result)
    }

    pub async fn get_stay_reviews(&self, input: &StayReviewInput) -> Result<StayReviewsResult> {
        input.validate()?;
        let path = format!(
            "{}/{}/reviews",
            ACCOMMODATION_PATH,
            urlencoding::encode(&input.stay_id)
        );

        let body = self
            .transport
            .get_json_versioned(&path, &input.query(), REVIEWS_DUFFEL_VERSION)
            .await?;
        let result = StayReviewsResult::from_value(body)?;

        tracing::info!("Fetched {} reviews for {}", result.reviews.len(), input.stay_id);
        Ok(result)
    }
}
