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

// Library for wayfare-travel-mcp
// MCP server for travel search (flights, stays) backed by the Duffel API

pub mod config;
pub mod duffel_transport;
pub mod error;
pub mod flights_query_builder;
pub mod flights_results_parser;
mod flights_search;
pub mod stays_query_builder;
pub mod stays_results_parser;
mod stays_search;

#[cfg(feature = "mcp")]
pub mod mcp_server;

pub use config::Config;
pub use duffel_transport::DuffelTransport;
pub use error::{Result, TravelError};

pub use flights_query_builder::{
    CabinClass, FlightLeg, FlightSearchInput, MultiCityInput, OfferDetailsInput,
    OfferRequestParams, Slice, TimeSpec, TripType, build_slice,
};
pub use flights_results_parser::{FlightSearchResult, NormalizedOffer, SliceDetails};
pub use flights_search::DuffelFlightsClient;

pub use stays_query_builder::{StayReviewInput, StaySearchInput};
pub use stays_results_parser::{StayOffer, StayReviewsResult, StaySearchResult};
pub use stays_search::{DuffelStaysClient, REVIEWS_DUFFEL_VERSION};

#[cfg(feature = "mcp")]
pub use mcp_server::TravelMcpServer;
