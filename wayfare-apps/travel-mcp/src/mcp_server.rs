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

//! # MCP tool dispatcher
//!
//! One tool per search type. Each tool answers with a single text block of
//! pretty-printed JSON, or with the error message when anything fails.

use std::sync::Arc;

use rmcp::handler::server::{ServerHandler, tool::ToolRouter, wrapper::Parameters};
use rmcp::{tool, tool_router};
use serde::Serialize;

use crate::config::Config;
use crate::error::Result as TravelResult;
use crate::flights_query_builder::{FlightSearchInput, MultiCityInput, OfferDetailsInput};
use crate::flights_search::DuffelFlightsClient;
use crate::stays_query_builder::{StayReviewInput, StaySearchInput};
use crate::stays_search::DuffelStaysClient;

#[derive(Clone)]
pub struct TravelMcpServer {
    flights_client: Arc<DuffelFlightsClient>,
    stays_client: Arc<DuffelStaysClient>,
    tool_router: ToolRouter<Self>,
}

impl TravelMcpServer {
    pub fn new(flights_client: Arc<DuffelFlightsClient>, stays_client: Arc<DuffelStaysClient>) -> Self {
        Self {
            flights_client,
            stays_client,
            tool_router: Self::tool_router(),
        }
    }

    /// Both clients share one transport, hence one request gate.
    pub fn from_config(config: &Config) -> TravelResult<Self> {
        let transport = crate::duffel_transport::DuffelTransport::new(config)?;
        Ok(Self::new(
            Arc::new(DuffelFlightsClient::with_transport(transport.clone())),
            Arc::new(DuffelStaysClient::with_transport(transport)),
        ))
    }

    pub fn tool_names(&self) -> Vec<String> {
        self.tool_router
            .list_all()
            .into_iter()
            .map(|t| t.name.to_string())
            .collect()
    }
}

fn respond<T: Serialize>(tool: &str, result: TravelResult<T>) -> Result<String, String> {
    match result {
        Ok(value) => serde_json::to_string_pretty(&value).map_err(|e| {
            tracing::error!("Error serializing {} result: {}", tool, e);
            e.to_string()
        }),
        Err(e) => {
            tracing::error!("Error in {}: {}", tool, e);
            Err(e.to_string())
        }
    }
}

#[tool_router]
impl TravelMcpServer {
    #[tool(
        name = "search_flights",
        description = "Search for flights using Duffel. Parameters: type (one_way/round_trip/multi_city), origin (IATA), destination (IATA), departureDate (YYYY-MM-DD), returnDate (required for round_trip), departureTime/arrivalTime ({fromTime, toTime} HH:MM), cabinClass (economy/premium_economy/business/first), adults (1-9), maxConnections, additionalStops (multi_city legs)."
    )]
    pub async fn search_flights(
        &self,
        params: Parameters<FlightSearchInput>,
    ) -> Result<String, String> {
        let input = params.0;
        tracing::debug!("search_flights: {:?}", input);
        respond(
            "search_flights",
            self.flights_client.search_flights(&input).await,
        )
    }

    #[tool(
        name = "get_offer_details",
        description = "Get the full details of a flight offer. Parameters: offerId (starts with off_)."
    )]
    pub async fn get_offer_details(
        &self,
        params: Parameters<OfferDetailsInput>,
    ) -> Result<String, String> {
        let input = params.0;
        respond(
            "get_offer_details",
            self.flights_client.get_offer(&input.offer_id).await,
        )
    }

    #[tool(
        name = "search_multi_city",
        description = "Search for multi-city flights. Parameters: segments (at least 2 of {origin, destination, departureDate}), cabinClass, adults (1-9), maxConnections."
    )]
    pub async fn search_multi_city(
        &self,
        params: Parameters<MultiCityInput>,
    ) -> Result<String, String> {
        let input = params.0;
        tracing::debug!("search_multi_city: {} segment(s)", input.segments.len());
        respond(
            "search_multi_city",
            self.flights_client.search_multi_city(&input).await,
        )
    }

    #[tool(
        name = "search_stays",
        description = "Search for hotel and accommodation offers using Duffel Stays. Parameters: location (city/airport/area), check_in_date (YYYY-MM-DD), check_out_date (YYYY-MM-DD), guests (1+), rooms (1+), radius_km."
    )]
    pub async fn search_stays(&self, params: Parameters<StaySearchInput>) -> Result<String, String> {
        let input = params.0;
        respond("search_stays", self.stays_client.search_stays(&input).await)
    }

    #[tool(
        name = "get_stay_reviews",
        description = "Fetch guest reviews for a stay. Parameters: stay_id (acc_...), after/before (pagination cursors), limit (1-200)."
    )]
    pub async fn get_stay_reviews(
        &self,
        params: Parameters<StayReviewInput>,
    ) -> Result<String, String> {
        let input = params.0;
        respond(
            "get_stay_reviews",
            self.stays_client.get_stay_reviews(&input).await,
        )
    }
}

impl ServerHandler for TravelMcpServer {
    fn list_tools(
        &self,
        _request: Option<rmcp::model::PaginatedRequestParam>,
        _context: rmcp::service::RequestContext<rmcp::RoleServer>,
    ) -> impl Future<Output = Result<rmcp::model::ListToolsResult, rmcp::ErrorData>> + Send + '_
    {
        Box::pin(async move {
            let tools = self.tool_router.list_all();
            tracing::debug!("Returning {} tools", tools.len());
            Ok(rmcp::model::ListToolsResult::with_all_items(tools))
        })
    }

    fn call_tool(
        &self,
        request: rmcp::model::CallToolRequestParam,
        context: rmcp::service::RequestContext<rmcp::RoleServer>,
    ) -> impl Future<Output = Result<rmcp::model::CallToolResult, rmcp::ErrorData>> + Send + '_
    {
        tracing::info!("Tool call: {}", request.name);
        let tool_name = request.name.clone();
        let router = self.tool_router.clone();
        let self_clone = self.clone();
        Box::pin(async move {
            let context =
                rmcp::handler::server::tool::ToolCallContext::new(&self_clone, request, context);
            let result = router.call(context).await;
            if let Err(e) = &result {
                // Argument decoding failures never reach the tool body.
                tracing::error!("Error in {}: {}", tool_name, e.message);
            }
            result
        })
    }

    fn get_info(&self) -> rmcp::model::ServerInfo {
        rmcp::model::ServerInfo {
            protocol_version: rmcp::model::ProtocolVersion::V_2025_03_26,
            capabilities: rmcp::model::ServerCapabilities {
                tools: Some(rmcp::model::ToolsCapability::default()),
                ..Default::default()
            },
            server_info: rmcp::model::Implementation {
                name: env!("CARGO_PKG_NAME").to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
                ..rmcp::model::Implementation::from_build_env()
            },
            instructions: Some(
                "Flight and stay search backed by the Duffel API. Every tool returns pretty-printed JSON."
                    .into(),
            ),
        }
    }
}
