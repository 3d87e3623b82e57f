#![allow(dead_code)]

use std::path::Path;
use std::sync::Arc;

use httpmock::prelude::*;
use serde_json::json;
use trip_planner::api::AppState;
use trip_planner::itinerary::ItineraryPlanner;
use trip_planner::llm::ItineraryWriter;
use trip_planner::results_store::ResultsStore;
use trip_planner::search::TripSearch;
use trip_planner::{
    AirportDataset, AmadeusClient, LocationRecord, LocationResolver, LocationSearch,
    TripPlannerConfig,
};

pub const TOKEN_PATH: &str = "/v1/security/oauth2/token";

/// Config pointing the provider at the mock server
pub fn config_for(server: &MockServer) -> TripPlannerConfig {
    let mut config = TripPlannerConfig::default();
    config.provider.base_url = Some(server.base_url());
    config.provider.client_id = Some("test-client".to_string());
    config.provider.client_secret = Some("test-secret".to_string());
    config.provider.timeout_seconds = 5;
    config
}

pub async fn mock_token<'a>(server: &'a MockServer, token: &str) -> httpmock::Mock<'a> {
    let token = token.to_string();
    server
        .mock_async(|when, then| {
            when.method(POST).path(TOKEN_PATH);
            then.status(200)
                .header("Content-Type", "application/json")
                .json_body(json!({
                    "access_token": token,
                    "token_type": "bearer",
                    "expires_in": 1799
                }));
        })
        .await
}

pub fn sample_airports() -> Arc<AirportDataset> {
    Arc::new(AirportDataset::from_records(vec![
        LocationRecord::new("John F Kennedy International Airport", "New York", "United States", Some("JFK")),
        LocationRecord::new("Charles de Gaulle International Airport", "Paris", "France", Some("CDG")),
        LocationRecord::new("Heathrow Airport", "London", "United Kingdom", Some("LHR")),
    ]))
}

pub fn build_client(config: &TripPlannerConfig) -> Arc<AmadeusClient> {
    Arc::new(AmadeusClient::new(&config.provider).unwrap())
}

pub fn build_search(
    config: &TripPlannerConfig,
    airports: Arc<AirportDataset>,
    results_path: &Path,
) -> Arc<TripSearch> {
    let client = build_client(config);
    let remote: Arc<dyn LocationSearch> = client.clone();
    let resolver = Arc::new(LocationResolver::new(Some(remote), airports, &config.resolver));
    Arc::new(
        TripSearch::new(client, resolver, config)
            .with_results_store(ResultsStore::new(results_path)),
    )
}

pub fn build_state(
    search: Arc<TripSearch>,
    writer: Option<Arc<dyn ItineraryWriter>>,
) -> AppState {
    let planner = Arc::new(ItineraryPlanner::new(search.clone(), writer));
    AppState::new(search, planner)
}
