//! Search orchestration
//!
//! Each search resolves free-text places, queries the provider and
//! summarizes the answer. The service is built once in `main` and shared by
//! every request handler.

pub mod activities;
pub mod flights;
pub mod hotels;
pub mod transfers;

use std::sync::Arc;

use crate::amadeus::AmadeusClient;
use crate::config::{ActivitiesConfig, FlightsConfig, HotelsConfig, TripPlannerConfig};
use crate::location_resolver::LocationResolver;
use crate::models::IataCode;
use crate::results_store::ResultsStore;
use crate::{Result, TripPlannerError};

pub use activities::ActivitySearchRequest;
pub use flights::FlightSearchRequest;
pub use hotels::HotelSearchRequest;
pub use transfers::TransferSearchRequest;

pub struct TripSearch {
    client: Arc<AmadeusClient>,
    resolver: Arc<LocationResolver>,
    flights: FlightsConfig,
    hotels: HotelsConfig,
    activities: ActivitiesConfig,
    results: ResultsStore,
}

impl TripSearch {
    pub fn new(
        client: Arc<AmadeusClient>,
        resolver: Arc<LocationResolver>,
        config: &TripPlannerConfig,
    ) -> Self {
        Self {
            client,
            resolver,
            flights: config.flights.clone(),
            hotels: config.hotels.clone(),
            activities: config.activities.clone(),
            results: ResultsStore::new(&config.flights.results_path),
        }
    }

    /// Replace the flight results file
    #[must_use]
    pub fn with_results_store(mut self, results: ResultsStore) -> Self {
        self.results = results;
        self
    }

    pub fn client(&self) -> &AmadeusClient {
        &self.client
    }

    pub fn resolver(&self) -> &LocationResolver {
        &self.resolver
    }

    pub fn results_store(&self) -> &ResultsStore {
        &self.results
    }

    /// Resolve a place the search cannot continue without
    async fn require_code(&self, query: &str) -> Result<IataCode> {
        self.resolver
            .resolve(query)
            .await
            .ok_or_else(|| TripPlannerError::unresolvable(query.trim()))
    }
}

/// Destination text before the first comma, e.g. "Paris" from "Paris, France"
pub(crate) fn primary_place(destination: &str) -> &str {
    destination.split(',').next().unwrap_or(destination).trim()
}
