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

//! Offer normalizer against recorded Duffel offer-request responses.

use serde_json::{Value, json};
use std::path::Path;
use wayfare_travel_mcp::FlightSearchResult;
use wayfare_travel_mcp::flights_results_parser::MAX_OFFERS;

/// Fixture structure describing expected properties of normalized results.
struct FixtureTestCase {
    /// Filename in tests/fixtures-offers/ (without .json extension)
    name: &'static str,
    request_id: &'static str,
    offers: usize,
    /// Slices per offer, in order
    slices: &'static [usize],
    description: &'static str,
}

const FIXTURE_TESTS: &[FixtureTestCase] = &[
    FixtureTestCase {
        name: "one_way_sfo_jfk",
        request_id: "orq_0000AhTmH3ld2IWQHDCPsm",
        offers: 3,
        slices: &[1, 1, 1],
        description: "One-way with non-stop, 1-stop and 2-stop offers",
    },
    FixtureTestCase {
        name: "round_trip_lhr_jfk",
        request_id: "orq_round",
        offers: 1,
        slices: &[2],
        description: "Round trip, outbound then return slice",
    },
    FixtureTestCase {
        name: "sparse_fields",
        request_id: "orq_sparse",
        offers: 2,
        slices: &[1, 1],
        description: "Offers with missing price, places and carriers",
    },
    FixtureTestCase {
        name: "no_offers",
        request_id: "orq_empty",
        offers: 0,
        slices: &[],
        description: "Offer request that matched nothing",
    },
];

fn load_fixture(name: &str) -> String {
    let path = Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures-offers")
        .join(format!("{}.json", name));
    std::fs::read_to_string(&path)
        .unwrap_or_else(|e| panic!("Failed to load fixture {:?}: {}", path, e))
}

fn normalize_fixture(name: &str) -> FlightSearchResult {
    FlightSearchResult::from_json(&load_fixture(name))
        .unwrap_or_else(|e| panic!("Fixture {} failed to normalize: {}", name, e))
}

#[test]
fn test_all_fixtures() {
    for case in FIXTURE_TESTS {
        let result = normalize_fixture(case.name);
        assert_eq!(result.request_id, case.request_id, "{}", case.description);
        assert_eq!(result.len(), case.offers, "{}", case.description);
        let slices: Vec<usize> = result.offers.iter().map(|o| o.slices.len()).collect();
        assert_eq!(slices, case.slices, "{}", case.description);
    }
}

#[test]
fn test_stop_descriptions() {
    let result = normalize_fixture("one_way_sfo_jfk");
    let described: Vec<(usize, &str)> = result
        .offers
        .iter()
        .map(|o| (o.slices[0].stops, o.slices[0].stops_description.as_str()))
        .collect();
    assert_eq!(
        described,
        vec![(0, "Non-stop"), (1, "1 stop"), (2, "2 stops")]
    );
}

#[test]
fn test_connections_follow_segments() {
    let result = normalize_fixture("one_way_sfo_jfk");
    let two_stops = &result.offers[2].slices[0];

    assert_eq!(two_stops.origin, "SFO");
    assert_eq!(two_stops.destination, "JFK");
    assert_eq!(two_stops.departure, "2025-06-01T05:00:00");
    assert_eq!(two_stops.arrival, "2025-06-01T18:05:00");
    assert_eq!(two_stops.carrier, "Frontier");
    assert_eq!(two_stops.connections.len(), 2);

    let airports: Vec<&str> = two_stops
        .connections
        .iter()
        .map(|c| c.airport.as_str())
        .collect();
    assert_eq!(airports, vec!["DEN", "ATL"]);

    let den = &two_stops.connections[0];
    assert_eq!(den.arrival, "2025-06-01T08:30:00");
    assert_eq!(den.departure, "2025-06-01T09:40:00");
    // The onward segment's duration, as Duffel reports it.
    assert_eq!(den.duration, "PT3H10M");

    assert!(result.offers[0].slices[0].connections.is_empty());
}

#[test]
fn test_round_trip_slices_keep_order() {
    let result = normalize_fixture("round_trip_lhr_jfk");
    let offer = &result.offers[0];
    assert_eq!(offer.price.amount, "880.00");
    assert_eq!(offer.price.currency, "GBP");
    assert_eq!(
        (offer.slices[0].origin.as_str(), offer.slices[0].destination.as_str()),
        ("LHR", "JFK")
    );
    assert_eq!(
        (offer.slices[1].origin.as_str(), offer.slices[1].destination.as_str()),
        ("JFK", "LHR")
    );
    assert_eq!(offer.slices[1].carrier, "Virgin Atlantic");
}

#[test]
fn test_sparse_fields_default_to_empty() {
    let result = normalize_fixture("sparse_fields");

    let no_segments = &result.offers[0];
    assert_eq!(no_segments.price.amount, "");
    assert_eq!(no_segments.price.currency, "");
    let slice = &no_segments.slices[0];
    assert_eq!(slice.origin, "SYD");
    assert_eq!(slice.stops, 0);
    assert_eq!(slice.stops_description, "No segments available");
    assert_eq!(slice.departure, "");
    assert_eq!(slice.carrier, "");

    let partial = &result.offers[1].slices[0];
    assert_eq!(partial.origin, "");
    assert_eq!(partial.departure, "2025-08-01T09:00:00");
    assert_eq!(partial.arrival, "2025-08-01T17:00:00");
    assert_eq!(partial.stops, 1);
    assert_eq!(partial.connections[0].airport, "");
    assert_eq!(partial.connections[0].duration, "");
}

#[test]
fn test_offers_capped_in_upstream_order() {
    let offers: Vec<Value> = (0..MAX_OFFERS + 25)
        .map(|i| json!({"id": format!("off_{:03}", i), "total_amount": "1.00", "total_currency": "EUR", "slices": []}))
        .collect();
    let body = json!({"data": {"id": "orq_many", "offers": offers}});

    let result = FlightSearchResult::from_value(body).unwrap();
    assert_eq!(result.len(), MAX_OFFERS);
    assert_eq!(result.offers[0].offer_id, "off_000");
    assert_eq!(result.offers[MAX_OFFERS - 1].offer_id, "off_049");
}
