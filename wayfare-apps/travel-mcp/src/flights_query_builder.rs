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

//! # Flights Query Builder
//!
//! Side-effect free translation of flight search inputs into Duffel
//! offer-request payloads: input schemas, slice construction and the
//! `/air/offer_requests` body and query string.

use serde::{Deserialize, Serialize};

use crate::error::{Result, TravelError};

/// Upstream supplier aggregation budget for one-way and round-trip searches.
pub const SUPPLIER_TIMEOUT_MS: u64 = 15_000;
/// Multi-city searches fan out to more suppliers and get a longer budget.
pub const MULTI_CITY_SUPPLIER_TIMEOUT_MS: u64 = 30_000;

pub const DAY_START: &str = "00:00";
pub const DAY_END: &str = "23:59";

/// Duffel accepts at most nine passengers per offer request.
pub const MAX_ADULTS: u32 = 9;

const OFFER_ID_PREFIX: &str = "off_";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "mcp", derive(schemars::JsonSchema))]
#[serde(rename_all = "snake_case")]
pub enum TripType {
    #[default]
    OneWay,
    RoundTrip,
    MultiCity,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "mcp", derive(schemars::JsonSchema))]
#[serde(rename_all = "snake_case")]
pub enum CabinClass {
    #[default]
    Economy,
    PremiumEconomy,
    Business,
    First,
}

impl CabinClass {
    pub fn as_str_name(&self) -> &'static str {
        match self {
            CabinClass::Economy => "economy",
            CabinClass::PremiumEconomy => "premium_economy",
            CabinClass::Business => "business",
            CabinClass::First => "first",
        }
    }

    pub fn from_str_name(s: &str) -> Option<Self> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "economy" | "e" => Some(CabinClass::Economy),
            "premium_economy" | "premium" | "pe" => Some(CabinClass::PremiumEconomy),
            "business" | "b" => Some(CabinClass::Business),
            "first" | "f" => Some(CabinClass::First),
            _ => None,
        }
    }
}

/// Time window as supplied by callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "mcp", derive(schemars::JsonSchema))]
#[serde(rename_all = "camelCase")]
pub struct TimeSpec {
    /// Start time in 24-hour format (HH:MM)
    pub from_time: String,
    /// End time in 24-hour format (HH:MM)
    pub to_time: String,
}

impl TimeSpec {
    pub fn new(from_time: impl Into<String>, to_time: impl Into<String>) -> Self {
        Self {
            from_time: from_time.into(),
            to_time: to_time.into(),
        }
    }
}

/// One origin/destination/date leg of a multi-city trip.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "mcp", derive(schemars::JsonSchema))]
#[serde(rename_all = "camelCase")]
pub struct FlightLeg {
    /// Origin airport or city IATA code (e.g., SFO, NYC)
    pub origin: String,
    /// Destination airport or city IATA code (e.g., LAX, LHR)
    pub destination: String,
    /// Departure date in YYYY-MM-DD format
    pub departure_date: String,
}

impl FlightLeg {
    pub fn new(
        origin: impl Into<String>,
        destination: impl Into<String>,
        departure_date: impl Into<String>,
    ) -> Self {
        Self {
            origin: origin.into(),
            destination: destination.into(),
            departure_date: departure_date.into(),
        }
    }

    fn to_slice(&self) -> Slice {
        build_slice(&self.origin, &self.destination, &self.departure_date, None, None)
    }
}

fn default_adults() -> u32 {
    1
}

/// Input of the `search_flights` tool.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "mcp", derive(schemars::JsonSchema))]
#[serde(rename_all = "camelCase")]
pub struct FlightSearchInput {
    /// Type of flight
    #[serde(rename = "type")]
    pub trip_type: TripType,
    /// Origin airport or city IATA code (e.g., SFO, NYC)
    pub origin: String,
    /// Destination airport or city IATA code (e.g., LAX, LHR)
    pub destination: String,
    /// Departure date in YYYY-MM-DD format
    pub departure_date: String,
    /// Return date in YYYY-MM-DD format (required for round-trip)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub return_date: Option<String>,
    /// Preferred departure time window
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub departure_time: Option<TimeSpec>,
    /// Preferred arrival time window
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub arrival_time: Option<TimeSpec>,
    /// Cabin class
    pub cabin_class: CabinClass,
    /// Number of adult passengers (1-9)
    #[serde(default = "default_adults")]
    pub adults: u32,
    /// Maximum number of connections
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_connections: Option<u32>,
    /// Additional stops for multi-city flights
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub additional_stops: Option<Vec<FlightLeg>>,
}

impl FlightSearchInput {
    fn with_trip(
        trip_type: TripType,
        origin: impl Into<String>,
        destination: impl Into<String>,
        departure_date: impl Into<String>,
    ) -> Self {
        Self {
            trip_type,
            origin: origin.into(),
            destination: destination.into(),
            departure_date: departure_date.into(),
            return_date: None,
            departure_time: None,
            arrival_time: None,
            cabin_class: CabinClass::Economy,
            adults: 1,
            max_connections: None,
            additional_stops: None,
        }
    }

    pub fn one_way(
        origin: impl Into<String>,
        destination: impl Into<String>,
        departure_date: impl Into<String>,
    ) -> Self {
        Self::with_trip(TripType::OneWay, origin, destination, departure_date)
    }

    pub fn round_trip(
        origin: impl Into<String>,
        destination: impl Into<String>,
        departure_date: impl Into<String>,
        return_date: impl Into<String>,
    ) -> Self {
        let mut input = Self::with_trip(TripType::RoundTrip, origin, destination, departure_date);
        input.return_date = Some(return_date.into());
        input
    }

    pub fn multi_city(
        origin: impl Into<String>,
        destination: impl Into<String>,
        departure_date: impl Into<String>,
        additional_stops: Vec<FlightLeg>,
    ) -> Self {
        let mut input = Self::with_trip(TripType::MultiCity, origin, destination, departure_date);
        input.additional_stops = Some(additional_stops);
        input
    }

    pub fn cabin_class(mut self, cabin_class: CabinClass) -> Self {
        self.cabin_class = cabin_class;
        self
    }

    pub fn adults(mut self, adults: u32) -> Self {
        self.adults = adults;
        self
    }

    pub fn max_connections(mut self, max_connections: Option<u32>) -> Self {
        self.max_connections = max_connections;
        self
    }

    pub fn departure_time(mut self, window: TimeSpec) -> Self {
        self.departure_time = Some(window);
        self
    }

    pub fn arrival_time(mut self, window: TimeSpec) -> Self {
        self.arrival_time = Some(window);
        self
    }

    pub fn validate(&self) -> Result<()> {
        validate_adults(self.adults)
    }

    /// Slices for this trip, outbound first.
    ///
    /// Fails with a domain error, before any slice is built, when the trip
    /// type needs data the input does not carry.
    pub fn build_slices(&self) -> Result<Vec<Slice>> {
        match self.trip_type {
            TripType::OneWay => Ok(vec![self.outbound_slice()]),
            TripType::RoundTrip => {
                let Some(return_date) = self.return_date.as_deref() else {
                    return Err(TravelError::domain(
                        "Return date required for round-trip flights",
                    ));
                };
                Ok(vec![
                    self.outbound_slice(),
                    build_slice(
                        &self.destination,
                        &self.origin,
                        return_date,
                        self.departure_time.as_ref(),
                        self.arrival_time.as_ref(),
                    ),
                ])
            }
            TripType::MultiCity => {
                let stops = self.additional_stops.as_deref().unwrap_or_default();
                if stops.is_empty() {
                    return Err(TravelError::domain(
                        "Additional stops required for multi-city flights",
                    ));
                }
                let first = build_slice(
                    &self.origin,
                    &self.destination,
                    &self.departure_date,
                    None,
                    None,
                );
                Ok(std::iter::once(first)
                    .chain(stops.iter().map(FlightLeg::to_slice))
                    .collect())
            }
        }
    }

    fn outbound_slice(&self) -> Slice {
        build_slice(
            &self.origin,
            &self.destination,
            &self.departure_date,
            self.departure_time.as_ref(),
            self.arrival_time.as_ref(),
        )
    }

    pub fn offer_request(&self) -> Result<OfferRequestParams> {
        self.validate()?;
        let slices = self.build_slices()?;
        Ok(OfferRequestParams {
            slices,
            cabin_class: self.cabin_class,
            adults: self.adults,
            max_connections: self.max_connections,
            return_offers: true,
            supplier_timeout_ms: SUPPLIER_TIMEOUT_MS,
        })
    }
}

/// Input of the `search_multi_city` tool.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "mcp", derive(schemars::JsonSchema))]
#[serde(rename_all = "camelCase")]
pub struct MultiCityInput {
    /// Flight segments for multi-city trip (at least 2)
    pub segments: Vec<FlightLeg>,
    /// Cabin class
    pub cabin_class: CabinClass,
    /// Number of adult passengers (1-9)
    #[serde(default = "default_adults")]
    pub adults: u32,
    /// Maximum number of connections
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_connections: Option<u32>,
}

impl MultiCityInput {
    pub fn new(segments: Vec<FlightLeg>) -> Self {
        Self {
            segments,
            cabin_class: CabinClass::Economy,
            adults: 1,
            max_connections: None,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.segments.len() < 2 {
            return Err(TravelError::validation(format!(
                "segments must contain at least 2 legs, got {}",
                self.segments.len()
            )));
        }
        validate_adults(self.adults)
    }

    pub fn build_slices(&self) -> Vec<Slice> {
        self.segments.iter().map(FlightLeg::to_slice).collect()
    }

    pub fn offer_request(&self) -> Result<OfferRequestParams> {
        self.validate()?;
        Ok(OfferRequestParams {
            slices: self.build_slices(),
            cabin_class: self.cabin_class,
            adults: self.adults,
            max_connections: self.max_connections,
            return_offers: true,
            supplier_timeout_ms: MULTI_CITY_SUPPLIER_TIMEOUT_MS,
        })
    }
}

/// Input of the `get_offer_details` tool.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "mcp", derive(schemars::JsonSchema))]
#[serde(rename_all = "camelCase")]
pub struct OfferDetailsInput {
    /// Unique identifier for the flight offer
    pub offer_id: String,
}

/// Offer ids are minted by Duffel with an `off_` prefix.
pub fn check_offer_id(offer_id: &str) -> Result<()> {
    if offer_id.starts_with(OFFER_ID_PREFIX) {
        Ok(())
    } else {
        Err(TravelError::precondition(
            "Invalid offer ID format - must start with \"off_\"",
        ))
    }
}

fn validate_adults(adults: u32) -> Result<()> {
    if adults < 1 {
        return Err(TravelError::validation("adults must be at least 1"));
    }
    if adults > MAX_ADULTS {
        return Err(TravelError::validation(format!(
            "adults must be at most {}, got {}",
            MAX_ADULTS, adults
        )));
    }
    Ok(())
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeWindow {
    pub from: String,
    pub to: String,
}

impl TimeWindow {
    pub fn full_day() -> Self {
        Self {
            from: DAY_START.to_string(),
            to: DAY_END.to_string(),
        }
    }
}

impl From<&TimeSpec> for TimeWindow {
    fn from(window: &TimeSpec) -> Self {
        Self {
            from: window.from_time.clone(),
            to: window.to_time.clone(),
        }
    }
}

/// One directed travel leg in Duffel's offer-request shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Slice {
    pub origin: String,
    pub destination: String,
    pub departure_date: String,
    pub departure_time: TimeWindow,
    pub arrival_time: TimeWindow,
}

/// Build one slice. Missing windows become the full day.
///
/// Codes and dates are passed through as-is; Duffel is the judge of them.
pub fn build_slice(
    origin: &str,
    destination: &str,
    date: &str,
    departure_window: Option<&TimeSpec>,
    arrival_window: Option<&TimeSpec>,
) -> Slice {
    Slice {
        origin: origin.to_string(),
        destination: destination.to_string(),
        departure_date: date.to_string(),
        departure_time: departure_window.map_or_else(TimeWindow::full_day, TimeWindow::from),
        arrival_time: arrival_window.map_or_else(TimeWindow::full_day, TimeWindow::from),
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct OfferRequestParams {
    pub slices: Vec<Slice>,
    pub cabin_class: CabinClass,
    pub adults: u32,
    pub max_connections: Option<u32>,
    pub return_offers: bool,
    pub supplier_timeout_ms: u64,
}

#[derive(Debug, Serialize)]
pub struct OfferRequestBody<'a> {
    pub data: OfferRequestData<'a>,
}

#[derive(Debug, Serialize)]
pub struct OfferRequestData<'a> {
    pub slices: &'a [Slice],
    pub passengers: Vec<PassengerSpec>,
    pub cabin_class: CabinClass,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_connections: Option<u32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PassengerSpec {
    #[serde(rename = "type")]
    pub kind: &'static str,
}

impl OfferRequestParams {
    pub fn body(&self) -> OfferRequestBody<'_> {
        OfferRequestBody {
            data: OfferRequestData {
                slices: &self.slices,
                passengers: vec![PassengerSpec { kind: "adult" }; self.adults as usize],
                cabin_class: self.cabin_class,
                max_connections: self.max_connections,
            },
        }
    }

    pub fn query(&self) -> Vec<(&'static str, String)> {
        vec![
            ("return_offers", self.return_offers.to_string()),
            ("supplier_timeout", self.supplier_timeout_ms.to_string()),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_build_slice_defaults_to_full_day() {
        let slice = build_slice("SFO", "JFK", "2025-06-01", None, None);
        assert_eq!(slice.departure_time, TimeWindow::full_day());
        assert_eq!(slice.arrival_time, TimeWindow::full_day());
        assert_eq!(slice.departure_time.from, "00:00");
        assert_eq!(slice.departure_time.to, "23:59");
    }

    #[test]
    fn test_build_slice_keeps_windows() {
        let dep = TimeSpec::new("06:00", "11:00");
        let slice = build_slice("SFO", "JFK", "2025-06-01", Some(&dep), None);
        assert_eq!(slice.departure_time.from, "06:00");
        assert_eq!(slice.departure_time.to, "11:00");
        assert_eq!(slice.arrival_time, TimeWindow::full_day());
    }

    #[test]
    fn test_round_trip_reverses_return_leg() {
        let input = FlightSearchInput::round_trip("LHR", "CDG", "2025-07-01", "2025-07-08")
            .departure_time(TimeSpec::new("08:00", "12:00"));
        let slices = input.build_slices().unwrap();
        assert_eq!(slices.len(), 2);
        assert_eq!(slices[1].origin, "CDG");
        assert_eq!(slices[1].destination, "LHR");
        assert_eq!(slices[1].departure_date, "2025-07-08");
        assert_eq!(slices[1].departure_time.from, "08:00");
    }

    #[test]
    fn test_round_trip_without_return_date_is_domain_error() {
        let mut input = FlightSearchInput::one_way("SFO", "JFK", "2025-06-01");
        input.trip_type = TripType::RoundTrip;
        let err = input.build_slices().unwrap_err();
        assert!(matches!(err, TravelError::Domain(_)));
    }

    #[test]
    fn test_multi_city_ignores_time_windows() {
        let input = FlightSearchInput::multi_city(
            "SFO",
            "LHR",
            "2025-06-01",
            vec![FlightLeg::new("LHR", "CDG", "2025-06-05")],
        )
        .departure_time(TimeSpec::new("06:00", "09:00"));
        let slices = input.build_slices().unwrap();
        assert_eq!(slices.len(), 2);
        assert!(slices.iter().all(|s| s.departure_time == TimeWindow::full_day()));
    }

    #[test]
    fn test_multi_city_needs_stops() {
        let input = FlightSearchInput::multi_city("SFO", "LHR", "2025-06-01", vec![]);
        assert!(matches!(
            input.build_slices().unwrap_err(),
            TravelError::Domain(_)
        ));
    }

    #[test]
    fn test_offer_request_body_shape() {
        let params = FlightSearchInput::one_way("SFO", "JFK", "2025-06-01")
            .adults(2)
            .cabin_class(CabinClass::Business)
            .max_connections(Some(1))
            .offer_request()
            .unwrap();
        let body = serde_json::to_value(params.body()).unwrap();
        assert_eq!(body["data"]["cabin_class"], "business");
        assert_eq!(
            body["data"]["passengers"],
            json!([{"type": "adult"}, {"type": "adult"}])
        );
        assert_eq!(body["data"]["max_connections"], 1);
        assert_eq!(body["data"]["slices"][0]["departure_time"]["to"], "23:59");
        assert_eq!(
            params.query(),
            vec![
                ("return_offers", "true".to_string()),
                ("supplier_timeout", "15000".to_string())
            ]
        );
    }

    #[test]
    fn test_max_connections_omitted_when_unset() {
        let params = FlightSearchInput::one_way("SFO", "JFK", "2025-06-01")
            .offer_request()
            .unwrap();
        let body = serde_json::to_value(params.body()).unwrap();
        assert!(body["data"].get("max_connections").is_none());
    }

    #[test]
    fn test_multi_city_input_validation() {
        let one_leg = MultiCityInput::new(vec![FlightLeg::new("SFO", "LHR", "2025-06-01")]);
        assert!(matches!(
            one_leg.validate().unwrap_err(),
            TravelError::Validation(_)
        ));

        let mut two_legs = MultiCityInput::new(vec![
            FlightLeg::new("SFO", "LHR", "2025-06-01"),
            FlightLeg::new("LHR", "CDG", "2025-06-05"),
        ]);
        let params = two_legs.offer_request().unwrap();
        assert_eq!(params.supplier_timeout_ms, MULTI_CITY_SUPPLIER_TIMEOUT_MS);

        two_legs.adults = 0;
        assert!(matches!(
            two_legs.validate().unwrap_err(),
            TravelError::Validation(_)
        ));

        two_legs.adults = u32::MAX;
        assert!(matches!(
            two_legs.offer_request().unwrap_err(),
            TravelError::Validation(_)
        ));
    }

    #[test]
    fn test_adults_upper_bound() {
        let mut input: FlightSearchInput = serde_json::from_value(json!({
            "type": "one_way",
            "origin": "SFO",
            "destination": "JFK",
            "departureDate": "2025-06-01",
            "adults": 4294967295u32
        }))
        .unwrap();
        let err = input.offer_request().unwrap_err();
        assert_eq!(err.to_string(), "Invalid input: adults must be at most 9, got 4294967295");

        input.adults = MAX_ADULTS;
        let params = input.offer_request().unwrap();
        assert_eq!(params.body().data.passengers.len(), 9);
    }

    #[test]
    fn test_input_deserializes_tool_arguments() {
        let input: FlightSearchInput = serde_json::from_value(json!({
            "type": "round_trip",
            "origin": "SFO",
            "destination": "JFK",
            "departureDate": "2025-06-01",
            "returnDate": "2025-06-10",
            "departureTime": {"fromTime": "07:00", "toTime": "10:00"},
            "cabinClass": "premium_economy"
        }))
        .unwrap();
        assert_eq!(input.trip_type, TripType::RoundTrip);
        assert_eq!(input.cabin_class, CabinClass::PremiumEconomy);
        assert_eq!(input.adults, 1);
        assert_eq!(input.departure_time, Some(TimeSpec::new("07:00", "10:00")));

        let bad: std::result::Result<FlightSearchInput, _> = serde_json::from_value(json!({
            "type": "circle",
            "origin": "SFO",
            "destination": "JFK",
            "departureDate": "2025-06-01",
            "cabinClass": "economy"
        }));
        assert!(bad.is_err());
    }

    #[test]
    fn test_offer_id_precondition() {
        assert!(check_offer_id("off_0000AEdGRhtp5AUUdJqMxo").is_ok());
        let err = check_offer_id("orq_0000AEdGRhtp5AUUdJqMxo").unwrap_err();
        assert!(matches!(err, TravelError::Precondition(_)));
        assert!(check_offer_id("").is_err());
    }

    #[test]
    fn test_cabin_class_names() {
        assert_eq!(CabinClass::from_str_name("Premium-Economy"), Some(CabinClass::PremiumEconomy));
        assert_eq!(CabinClass::from_str_name("f"), Some(CabinClass::First));
        assert_eq!(CabinClass::from_str_name("coach"), None);
        assert_eq!(CabinClass::Business.as_str_name(), "business");
    }
}
