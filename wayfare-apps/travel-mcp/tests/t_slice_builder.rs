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

//! Slice construction per trip type, as seen through the public API.

use serde_json::json;
use wayfare_travel_mcp::{
    CabinClass, FlightLeg, FlightSearchInput, MultiCityInput, TimeSpec, TravelError, build_slice,
};

#[test]
fn test_round_trip_mirrors_outbound() {
    let input = FlightSearchInput::round_trip("SFO", "JFK", "2025-06-01", "2025-06-08")
        .departure_time(TimeSpec::new("08:00", "12:00"));
    let slices = input.build_slices().unwrap();

    assert_eq!(slices.len(), 2);
    assert_eq!(slices[0], build_slice("SFO", "JFK", "2025-06-01", input.departure_time.as_ref(), None));
    assert_eq!(slices[1].origin, "JFK");
    assert_eq!(slices[1].destination, "SFO");
    assert_eq!(slices[1].departure_date, "2025-06-08");
    // Both directions reuse the caller's windows.
    assert_eq!(slices[1].departure_time.from, "08:00");
    assert_eq!(slices[1].arrival_time.to, "23:59");
}

#[test]
fn test_multi_city_ignores_time_windows() {
    let input = FlightSearchInput::multi_city(
        "LHR",
        "CDG",
        "2025-06-10",
        vec![
            FlightLeg::new("CDG", "FCO", "2025-06-14"),
            FlightLeg::new("FCO", "LHR", "2025-06-20"),
        ],
    )
    .departure_time(TimeSpec::new("06:00", "09:00"));

    let slices = input.build_slices().unwrap();
    let route: Vec<(&str, &str, &str)> = slices
        .iter()
        .map(|s| (s.origin.as_str(), s.destination.as_str(), s.departure_date.as_str()))
        .collect();
    assert_eq!(
        route,
        vec![
            ("LHR", "CDG", "2025-06-10"),
            ("CDG", "FCO", "2025-06-14"),
            ("FCO", "LHR", "2025-06-20"),
        ]
    );
    for slice in &slices {
        assert_eq!(slice.departure_time.from, "00:00");
        assert_eq!(slice.departure_time.to, "23:59");
    }
}

#[test]
fn test_trip_type_preconditions() {
    let mut round = FlightSearchInput::round_trip("SFO", "JFK", "2025-06-01", "2025-06-08");
    round.return_date = None;
    match round.build_slices() {
        Err(TravelError::Domain(msg)) => {
            assert_eq!(msg, "Return date required for round-trip flights")
        }
        other => panic!("expected domain error, got {:?}", other),
    }

    let multi = FlightSearchInput::multi_city("LHR", "CDG", "2025-06-10", Vec::new());
    match multi.build_slices() {
        Err(TravelError::Domain(msg)) => {
            assert_eq!(msg, "Additional stops required for multi-city flights")
        }
        other => panic!("expected domain error, got {:?}", other),
    }
}

#[test]
fn test_tool_input_wire_names() {
    let input: FlightSearchInput = serde_json::from_value(json!({
        "type": "round_trip",
        "origin": "SFO",
        "destination": "LAX",
        "departureDate": "2025-06-01",
        "returnDate": "2025-06-03",
        "departureTime": {"fromTime": "07:00", "toTime": "10:00"},
        "cabinClass": "premium_economy",
        "maxConnections": 0
    }))
    .unwrap();

    assert_eq!(input.adults, 1);
    assert_eq!(input.cabin_class, CabinClass::PremiumEconomy);
    let params = input.offer_request().unwrap();
    assert_eq!(params.slices.len(), 2);
    assert_eq!(params.max_connections, Some(0));
    assert_eq!(params.supplier_timeout_ms, 15_000);

    let body = serde_json::to_value(params.body()).unwrap();
    assert_eq!(body["data"]["max_connections"], 0);
    assert_eq!(body["data"]["cabin_class"], "premium_economy");
    assert_eq!(body["data"]["passengers"], json!([{"type": "adult"}]));
}

#[test]
fn test_multi_city_tool_needs_two_segments() {
    let one = MultiCityInput::new(vec![FlightLeg::new("LHR", "CDG", "2025-06-10")]);
    assert!(matches!(one.offer_request(), Err(TravelError::Validation(_))));

    let mut two = MultiCityInput::new(vec![
        FlightLeg::new("LHR", "CDG", "2025-06-10"),
        FlightLeg::new("CDG", "LHR", "2025-06-12"),
    ]);
    two.adults = 3;
    let params = two.offer_request().unwrap();
    assert_eq!(params.supplier_timeout_ms, 30_000);
    assert_eq!(params.body().data.passengers.len(), 3);
}
