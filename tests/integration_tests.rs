//! Provider flows against a mock travel API

mod common;

use std::sync::Arc;

use common::*;
use httpmock::prelude::*;
use serde_json::{Value, json};
use tempfile::TempDir;
use trip_planner::itinerary::{ItineraryPlanner, ItineraryRequest};
use trip_planner::llm::ItineraryWriter;
use trip_planner::models::{BudgetInput, DatesInput};
use trip_planner::search::{
    ActivitySearchRequest, FlightSearchRequest, HotelSearchRequest, TransferSearchRequest,
};
use trip_planner::{AirportDataset, IataCode, LocationResolver, LocationSearch, TripPlannerError};

fn flight_request(origin: Option<&str>, destination: &str) -> FlightSearchRequest {
    FlightSearchRequest {
        origin: origin.map(str::to_string),
        destination: destination.to_string(),
        dates: DatesInput::Text("2026-06-01 to 2026-06-08".to_string()),
        budget: Some(BudgetInput::Text("2000-4000".to_string())),
        adults: Some(2),
        currency: None,
        non_stop: None,
        max_results: None,
    }
}

fn flight_offers_body() -> Value {
    json!({
        "data": [{
            "id": "1",
            "price": {"total": "912.35", "currency": "USD"},
            "itineraries": [
                {"duration": "PT7H10M", "segments": [{
                    "departure": {"iataCode": "BOS", "at": "2026-06-01T18:00:00"},
                    "arrival": {"iataCode": "CDG", "at": "2026-06-02T07:10:00"},
                    "carrierCode": "AF", "number": "333"
                }]},
                {"duration": "PT9H", "segments": [
                    {"departure": {"iataCode": "CDG", "at": "2026-06-08T10:00:00"},
                     "arrival": {"iataCode": "LHR", "at": "2026-06-08T10:20:00"},
                     "carrierCode": "BA", "number": "309"},
                    {"departure": {"iataCode": "LHR", "at": "2026-06-08T12:00:00"},
                     "arrival": {"iataCode": "BOS", "at": "2026-06-08T14:00:00"},
                     "carrierCode": "BA", "number": "213"}
                ]}
            ]
        }],
        "dictionaries": {"carriers": {"AF": "AIR FRANCE", "BA": "BRITISH AIRWAYS"}}
    })
}

#[tokio::test]
async fn test_remote_city_wins_over_local_dataset() {
    let server = MockServer::start_async().await;
    let config = config_for(&server);
    let token = mock_token(&server, "token-1").await;
    let locations = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/v1/reference-data/locations")
                .query_param("keyword", "Paris")
                .query_param("subType", "CITY,AIRPORT")
                .query_param("page[limit]", "10")
                .header("Authorization", "Bearer token-1");
            then.status(200).json_body(json!({"data": [
                {"subType": "AIRPORT", "iataCode": "ORY"},
                {"subType": "CITY", "iataCode": "PAR"}
            ]}));
        })
        .await;

    let client = build_client(&config);
    let remote: Arc<dyn LocationSearch> = client;
    let resolver = LocationResolver::new(Some(remote), sample_airports(), &config.resolver);

    assert_eq!(resolver.resolve("Paris").await, IataCode::parse("PAR"));
    token.assert_hits_async(1).await;
    locations.assert_hits_async(1).await;
}

#[tokio::test]
async fn test_remote_failure_falls_back_to_dataset() {
    let server = MockServer::start_async().await;
    let config = config_for(&server);
    mock_token(&server, "token-1").await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/v1/reference-data/locations");
            then.status(500).json_body(json!({"errors": [{"status": 500}]}));
        })
        .await;

    let client = build_client(&config);
    let remote: Arc<dyn LocationSearch> = client;
    let resolver = LocationResolver::new(Some(remote), sample_airports(), &config.resolver);

    assert_eq!(resolver.resolve("paris").await, IataCode::parse("CDG"));
    assert_eq!(resolver.resolve("Lundon").await, IataCode::parse("LHR"));
    assert!(resolver.resolve("Atlantis").await.is_none());
}

#[tokio::test]
async fn test_flight_search_summarizes_and_persists() {
    let server = MockServer::start_async().await;
    let config = config_for(&server);
    let dir = TempDir::new().unwrap();
    let results_path = dir.path().join("flight_results.json");

    mock_token(&server, "token-1").await;
    let offers = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/v2/shopping/flight-offers")
                .query_param("originLocationCode", "BOS")
                .query_param("destinationLocationCode", "CDG")
                .query_param("departureDate", "2026-06-01")
                .query_param("returnDate", "2026-06-08")
                .query_param("adults", "2")
                .query_param("maxPrice", "4000")
                .query_param("max", "5");
            then.status(200).json_body(flight_offers_body());
        })
        .await;

    let search = build_search(&config, sample_airports(), &results_path);
    let result = search
        .search_flights(&flight_request(Some("BOS"), "CDG"))
        .await
        .unwrap();

    offers.assert_hits_async(1).await;
    assert_eq!(result.origin, "BOS");
    assert_eq!(result.destination, "CDG");
    assert_eq!(result.offers.len(), 1);

    let offer = &result.offers[0];
    assert_eq!(offer.flight_codes, ["AF 333", "BA 309", "BA 213"]);
    let inbound = offer.inbound.as_ref().unwrap();
    assert_eq!(inbound.stops, 1);
    assert_eq!(inbound.airlines, ["BRITISH AIRWAYS"]);
    assert_eq!(inbound.to.as_deref(), Some("BOS"));

    let saved: Value = serde_json::from_str(&std::fs::read_to_string(&results_path).unwrap()).unwrap();
    assert_eq!(saved["destination"], "CDG");
    assert_eq!(saved["offers"][0]["flightCodes"][0], "AF 333");
}

#[tokio::test]
async fn test_missing_origin_uses_default() {
    let server = MockServer::start_async().await;
    let config = config_for(&server);
    let dir = TempDir::new().unwrap();

    mock_token(&server, "token-1").await;
    let offers = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/v2/shopping/flight-offers")
                .query_param("originLocationCode", "JFK");
            then.status(200).json_body(json!({"data": []}));
        })
        .await;

    let search = build_search(&config, sample_airports(), &dir.path().join("results.json"));
    let result = search.search_flights(&flight_request(None, "LHR")).await.unwrap();

    offers.assert_hits_async(1).await;
    assert_eq!(result.origin, "JFK");
    assert!(result.offers.is_empty());
}

#[tokio::test]
async fn test_unresolvable_destination_skips_offer_search() {
    let server = MockServer::start_async().await;
    let config = config_for(&server);
    let dir = TempDir::new().unwrap();

    mock_token(&server, "token-1").await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/v1/reference-data/locations");
            then.status(200).json_body(json!({"data": []}));
        })
        .await;
    let offers = server
        .mock_async(|when, then| {
            when.method(GET).path("/v2/shopping/flight-offers");
            then.status(200).json_body(json!({"data": []}));
        })
        .await;

    let search = build_search(&config, Arc::new(AirportDataset::empty()), &dir.path().join("r.json"));
    let err = search
        .search_flights(&flight_request(Some("BOS"), "Atlantis"))
        .await
        .unwrap_err();

    assert!(matches!(err, TripPlannerError::UnresolvableLocation { ref query } if query == "Atlantis"));
    assert_eq!(err.to_string(), "Could not resolve destination 'Atlantis'");
    offers.assert_hits_async(0).await;
}

#[tokio::test]
async fn test_rejected_token_is_refreshed_once() {
    let server = MockServer::start_async().await;
    let config = config_for(&server);
    let dir = TempDir::new().unwrap();

    // Prime the client with a token the offers endpoint will reject
    let mut stale_token = mock_token(&server, "stale").await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/v1/reference-data/locations");
            then.status(200).json_body(json!({"data": [{"subType": "CITY", "iataCode": "PAR"}]}));
        })
        .await;
    let search = build_search(&config, sample_airports(), &dir.path().join("r.json"));
    assert_eq!(search.resolver().resolve("Paris").await, IataCode::parse("PAR"));
    stale_token.assert_hits_async(1).await;
    stale_token.delete_async().await;

    let fresh_token = mock_token(&server, "fresh").await;
    let rejected = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/v2/shopping/flight-offers")
                .header("Authorization", "Bearer stale");
            then.status(401).json_body(json!({"errors": [{"code": 38192, "title": "Invalid access token"}]}));
        })
        .await;
    let accepted = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/v2/shopping/flight-offers")
                .header("Authorization", "Bearer fresh");
            then.status(200).json_body(flight_offers_body());
        })
        .await;

    let result = search
        .search_flights(&flight_request(Some("BOS"), "PAR"))
        .await
        .unwrap();

    assert_eq!(result.offers.len(), 1);
    fresh_token.assert_hits_async(1).await;
    rejected.assert_hits_async(1).await;
    accepted.assert_hits_async(1).await;
}

#[tokio::test]
async fn test_second_rejection_is_an_upstream_error() {
    let server = MockServer::start_async().await;
    let config = config_for(&server);
    let dir = TempDir::new().unwrap();

    let token = mock_token(&server, "never-valid").await;
    let offers = server
        .mock_async(|when, then| {
            when.method(GET).path("/v2/shopping/flight-offers");
            then.status(401).json_body(json!({"errors": [{"code": 38192}]}));
        })
        .await;

    let search = build_search(&config, sample_airports(), &dir.path().join("r.json"));
    let err = search
        .search_flights(&flight_request(Some("BOS"), "CDG"))
        .await
        .unwrap_err();

    match err {
        TripPlannerError::Upstream { status, details, .. } => {
            assert_eq!(status, Some(401));
            assert_eq!(details.unwrap()["errors"][0]["code"], 38192);
        }
        other => panic!("unexpected error: {other:?}"),
    }
    token.assert_hits_async(2).await;
    offers.assert_hits_async(2).await;
}

#[tokio::test]
async fn test_hotel_search_limits_ids_and_applies_budget() {
    let server = MockServer::start_async().await;
    let config = config_for(&server);
    let dir = TempDir::new().unwrap();

    let ids: Vec<String> = (0..30).map(|i| format!("HT{i:06}")).collect();
    let listed: Vec<Value> = ids.iter().map(|id| json!({"hotelId": id})).collect();
    let first_25 = ids[..25].join(",");

    mock_token(&server, "token-1").await;
    server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/v1/reference-data/locations/hotels/by-city")
                .query_param("cityCode", "PAR")
                .query_param("radius", "20");
            then.status(200).json_body(json!({"data": listed}));
        })
        .await;
    let offers = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/v3/shopping/hotel-offers")
                .query_param("hotelIds", first_25.as_str())
                .query_param("checkInDate", "2026-06-01")
                .query_param("checkOutDate", "2026-06-04");
            then.status(200).json_body(json!({"data": [
                {"hotel": {"hotelId": "HT000000", "name": "Budget Inn"},
                 "offers": [{"id": "O1", "price": {"total": "399.00", "currency": "USD"}}]},
                {"hotel": {"hotelId": "HT000001", "name": "Exact Fit"},
                 "offers": [{"id": "O2", "price": {"total": "400.00"}}, {"id": "O3", "price": {"total": "650.00"}}]},
                {"hotel": {"hotelId": "HT000002", "name": "Grand Palace"},
                 "offers": [{"id": "O4", "price": {"total": "401.00"}}]},
                {"hotel": {"hotelId": "HT000003", "name": "No Price"},
                 "offers": [{"id": "O5", "price": {"total": "n/a"}}]}
            ]}));
        })
        .await;

    let search = build_search(&config, sample_airports(), &dir.path().join("r.json"));
    let request = HotelSearchRequest {
        destination: "PAR, France".to_string(),
        dates: DatesInput::List(vec!["2026-06-01".to_string(), "2026-06-04".to_string()]),
        budget: Some(BudgetInput::Amount(1000.0)),
        adults: None,
        room_quantity: None,
        currency: None,
        max_results: None,
    };
    let result = search.search_hotels(&request).await.unwrap();

    offers.assert_hits_async(1).await;
    assert_eq!(result.city_code, "PAR");
    let names: Vec<_> = result.hotels.iter().filter_map(|h| h.name.as_deref()).collect();
    assert_eq!(names, ["Budget Inn", "Exact Fit"]);
    assert_eq!(result.hotels[1].cheapest_offer.offer_id.as_deref(), Some("O2"));
}

#[tokio::test]
async fn test_city_without_hotels_returns_empty_result() {
    let server = MockServer::start_async().await;
    let config = config_for(&server);
    let dir = TempDir::new().unwrap();

    mock_token(&server, "token-1").await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/v1/reference-data/locations/hotels/by-city");
            then.status(200).json_body(json!({"data": []}));
        })
        .await;
    let offers = server
        .mock_async(|when, then| {
            when.method(GET).path("/v3/shopping/hotel-offers");
            then.status(200).json_body(json!({"data": []}));
        })
        .await;

    let search = build_search(&config, sample_airports(), &dir.path().join("r.json"));
    let request = HotelSearchRequest {
        destination: "LHR".to_string(),
        dates: DatesInput::Text("2026-07-10".to_string()),
        budget: None,
        adults: None,
        room_quantity: None,
        currency: None,
        max_results: None,
    };
    let result = search.search_hotels(&request).await.unwrap();

    assert!(result.hotels.is_empty());
    assert_eq!(result.check_out, "2026-07-11");
    offers.assert_hits_async(0).await;
}

#[tokio::test]
async fn test_transfer_search_resolves_both_ends() {
    let server = MockServer::start_async().await;
    let config = config_for(&server);
    let dir = TempDir::new().unwrap();

    mock_token(&server, "token-1").await;
    let transfers = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/v1/shopping/transfers")
                .query_param("startLocationCode", "CDG")
                .query_param("endLocationCode", "LHR")
                .query_param("transferType", "PRIVATE")
                .query_param("passengers", "2");
            then.status(200).json_body(json!({"data": [{
                "id": "T1",
                "transferType": "PRIVATE",
                "start": {"dateTime": "2026-06-01T10:30:00", "locationCode": "CDG"},
                "end": {"locationCode": "LHR"},
                "vehicle": {"code": "CAR", "category": "BU", "description": "Business sedan"},
                "serviceProvider": {"code": "ABC", "name": "City Cars"},
                "quotation": {"monetaryAmount": "120.50", "currencyCode": "EUR"}
            }]}));
        })
        .await;

    let search = build_search(&config, sample_airports(), &dir.path().join("r.json"));
    let request = TransferSearchRequest {
        from: "Paris".to_string(),
        to: "london".to_string(),
        start_date_time: "2026-06-01T10:30:00".to_string(),
        passengers: Some(2),
        transfer_type: None,
        currency: None,
    };

    // No locations mock: the remote tier fails and the dataset answers
    let result = search.search_transfers(&request).await.unwrap();

    transfers.assert_hits_async(1).await;
    assert_eq!(result.from, "CDG");
    assert_eq!(result.to, "LHR");
    let offer = &result.offers[0];
    assert_eq!(offer.vehicle.as_deref(), Some("Business sedan"));
    assert_eq!(offer.provider.as_deref(), Some("City Cars"));
    assert_eq!(offer.price.total.as_deref(), Some("120.50"));
}

#[tokio::test]
async fn test_activity_search_uses_city_square() {
    let server = MockServer::start_async().await;
    let mut config = config_for(&server);
    config.activities.box_degrees = 0.5;
    let dir = TempDir::new().unwrap();

    mock_token(&server, "token-1").await;
    server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/v1/reference-data/locations/cities")
                .query_param("keyword", "Barcelona");
            then.status(200).json_body(json!({"data": [
                {"name": "BARCELONA", "iataCode": "BCN", "geoCode": {"latitude": 41.5, "longitude": 2.0}}
            ]}));
        })
        .await;
    let pois = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/v1/reference-data/locations/pois/by-square")
                .query_param("north", "42")
                .query_param("south", "41")
                .query_param("east", "2.5")
                .query_param("west", "1.5")
                .query_param("categories", "RESTAURANT,BEACH_PARK");
            then.status(200).json_body(json!({"data": [
                {"id": "P1", "name": "La Boqueria", "category": "RESTAURANT", "rank": 3, "tags": ["market"]},
                {"id": "P2", "name": "", "category": "SIGHTS"},
                {"id": "P3", "name": "Barceloneta", "category": "BEACH_PARK", "rank": "5",
                 "geoCode": {"latitude": 41.37, "longitude": 2.19}}
            ]}));
        })
        .await;

    let search = build_search(&config, sample_airports(), &dir.path().join("r.json"));
    let request = ActivitySearchRequest {
        destination: "Barcelona, Spain".to_string(),
        interests: vec!["food".to_string(), "beaches".to_string()],
        limit: None,
    };
    let result = search.search_activities(&request).await.unwrap();

    pois.assert_hits_async(1).await;
    let names: Vec<_> = result.activities.iter().filter_map(|a| a.name.as_deref()).collect();
    assert_eq!(names, ["La Boqueria", "Barceloneta"]);
    assert_eq!(result.activities[1].rank, Some(5));
    assert_eq!(result.activities[1].latitude, Some(41.37));
}

#[tokio::test]
async fn test_unknown_activity_city_is_unresolvable() {
    let server = MockServer::start_async().await;
    let config = config_for(&server);
    let dir = TempDir::new().unwrap();

    mock_token(&server, "token-1").await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/v1/reference-data/locations/cities");
            then.status(200).json_body(json!({"data": []}));
        })
        .await;

    let search = build_search(&config, sample_airports(), &dir.path().join("r.json"));
    let request = ActivitySearchRequest {
        destination: "Atlantis".to_string(),
        interests: Vec::new(),
        limit: None,
    };
    let err = search.search_activities(&request).await.unwrap_err();
    assert!(matches!(err, TripPlannerError::UnresolvableLocation { .. }));
}

struct CannedWriter(String);

#[async_trait::async_trait]
impl ItineraryWriter for CannedWriter {
    async fn write(&self, prompt: &str) -> trip_planner::Result<String> {
        assert!(prompt.contains("Hotel options"));
        Ok(self.0.clone())
    }
}

#[tokio::test]
async fn test_itinerary_keeps_sections_that_succeed() {
    let server = MockServer::start_async().await;
    let config = config_for(&server);
    let dir = TempDir::new().unwrap();

    mock_token(&server, "token-1").await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/v2/shopping/flight-offers");
            then.status(200).json_body(flight_offers_body());
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/v1/reference-data/locations/hotels/by-city");
            then.status(200).json_body(json!({"data": [{"hotelId": "HT1"}]}));
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/v3/shopping/hotel-offers");
            then.status(200).json_body(json!({"data": [
                {"hotel": {"hotelId": "HT1", "name": "Rive Gauche"},
                 "offers": [{"id": "O1", "price": {"total": "540.00"}}]}
            ]}));
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/v1/reference-data/locations/cities");
            then.status(500).json_body(json!({"errors": [{"status": 500, "title": "SYSTEM ERROR"}]}));
        })
        .await;

    let search = build_search(&config, sample_airports(), &dir.path().join("r.json"));
    let writer: Arc<dyn ItineraryWriter> = Arc::new(CannedWriter(
        r#"[{"day": 1, "title": "Arrival", "activities": ["Check in"]}]"#.to_string(),
    ));
    let planner = ItineraryPlanner::new(search, Some(writer));

    let request: ItineraryRequest = serde_json::from_value(json!({
        "origin": "BOS",
        "destination": "CDG",
        "dates": "2026-06-01 to 2026-06-08",
        "budget": "2000-4000",
        "interests": ["food"]
    }))
    .unwrap();
    let result = planner.plan(&request).await.unwrap();

    assert_eq!(
        result.message,
        "Great! I'm planning a trip to CDG from 2026-06-01 to 2026-06-08 with a 2000-4000 budget."
    );
    assert_eq!(result.flights.unwrap().offers.len(), 1);
    assert_eq!(result.hotels.unwrap().hotels.len(), 1);
    assert!(result.activities.is_none());
    assert_eq!(result.warnings.len(), 1);
    assert!(result.warnings[0].starts_with("activities:"));
    assert_eq!(result.itinerary[0].title, "Arrival");
}

#[tokio::test]
async fn test_itinerary_with_country_suffix_finds_flights() {
    let server = MockServer::start_async().await;
    let config = config_for(&server);
    let dir = TempDir::new().unwrap();

    mock_token(&server, "token-1").await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/v1/reference-data/locations");
            then.status(500);
        })
        .await;
    let offers = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/v2/shopping/flight-offers")
                .query_param("destinationLocationCode", "CDG");
            then.status(200).json_body(flight_offers_body());
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/v1/reference-data/locations/hotels/by-city");
            then.status(200).json_body(json!({"data": []}));
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/v1/reference-data/locations/cities");
            then.status(200).json_body(json!({"data": []}));
        })
        .await;

    let search = build_search(&config, sample_airports(), &dir.path().join("r.json"));
    let planner = ItineraryPlanner::new(search, None);

    let request: ItineraryRequest = serde_json::from_value(json!({
        "origin": "BOS",
        "destination": "Paris, France",
        "dates": "2026-06-01 to 2026-06-08"
    }))
    .unwrap();
    let result = planner.plan(&request).await.unwrap();

    offers.assert_hits_async(1).await;
    let flights = result.flights.unwrap();
    assert_eq!(flights.destination, "CDG");
    assert_eq!(flights.offers.len(), 1);
    assert!(result.message.contains("trip to Paris, France"));
}
