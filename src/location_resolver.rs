//! Location Resolution Module
//!
//! This module turns free-text place names ("Paris", "new york", "CDG") into
//! IATA codes. Tiers are tried in order and the first hit wins:
//!
//! 1. input that already is a 3-letter code is returned verbatim
//! 2. remote keyword search, preferring a `CITY` over an `AIRPORT`
//! 3. the local airport dataset: exact city name, then fuzzy city name
//!
//! Remote failures never escape `resolve`; they count as "no result".

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, instrument, warn};

use crate::Result;
use crate::airports::AirportDataset;
use crate::amadeus::payloads::LocationCandidate;
use crate::config::ResolverConfig;
use crate::models::IataCode;

/// Kinds of location the remote search can return
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocationSubType {
    City,
    Airport,
}

impl LocationSubType {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            LocationSubType::City => "CITY",
            LocationSubType::Airport => "AIRPORT",
        }
    }
}

/// Remote keyword search over cities and airports
#[async_trait]
pub trait LocationSearch: Send + Sync {
    async fn search_locations(
        &self,
        keyword: &str,
        sub_types: &[LocationSubType],
        limit: usize,
    ) -> Result<Vec<LocationCandidate>>;
}

/// Service for resolving place names to IATA codes
pub struct LocationResolver {
    remote: Option<Arc<dyn LocationSearch>>,
    airports: Arc<AirportDataset>,
    similarity_cutoff: f64,
    remote_limit: usize,
}

impl LocationResolver {
    pub fn new(
        remote: Option<Arc<dyn LocationSearch>>,
        airports: Arc<AirportDataset>,
        config: &ResolverConfig,
    ) -> Self {
        Self {
            remote,
            airports,
            similarity_cutoff: config.similarity_cutoff,
            remote_limit: config.remote_limit,
        }
    }

    /// Resolve a place name into a code; `None` means every tier missed
    #[instrument(skip(self))]
    pub async fn resolve(&self, query: &str) -> Option<IataCode> {
        if query.trim().is_empty() {
            return None;
        }

        if let Some(code) = IataCode::parse(query) {
            debug!("Input '{}' is already a code", query);
            return Some(code);
        }

        if let Some(code) = self.resolve_remote(query).await {
            debug!("Resolved '{}' to {} via remote search", query, code);
            return Some(code);
        }

        let code = self.resolve_local(query);
        match &code {
            Some(code) => debug!("Resolved '{}' to {} via airport dataset", query, code),
            None => warn!("Could not resolve location '{}'", query),
        }
        code
    }

    async fn resolve_remote(&self, query: &str) -> Option<IataCode> {
        let remote = self.remote.as_ref()?;

        let candidates = match remote
            .search_locations(
                query.trim(),
                &[LocationSubType::City, LocationSubType::Airport],
                self.remote_limit,
            )
            .await
        {
            Ok(candidates) => candidates,
            Err(e) => {
                debug!("Remote location search failed for '{}': {}", query, e);
                return None;
            }
        };

        pick_candidate(&candidates, LocationSubType::City)
            .or_else(|| pick_candidate(&candidates, LocationSubType::Airport))
    }

    /// Exact city match first, then the closest city above the cutoff
    pub fn resolve_local(&self, query: &str) -> Option<IataCode> {
        self.airports
            .exact_city_code(query)
            .or_else(|| self.airports.fuzzy_city_code(query, self.similarity_cutoff))
    }
}

fn pick_candidate(candidates: &[LocationCandidate], sub_type: LocationSubType) -> Option<IataCode> {
    candidates
        .iter()
        .filter(|candidate| candidate.sub_type.as_deref() == Some(sub_type.as_str()))
        .find_map(|candidate| candidate.iata_code.as_deref().and_then(IataCode::parse))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::TripPlannerError;
    use crate::models::LocationRecord;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct StubSearch {
        answer: Result<Vec<LocationCandidate>>,
        calls: AtomicUsize,
    }

    impl StubSearch {
        fn ok(candidates: Vec<LocationCandidate>) -> Arc<Self> {
            Arc::new(Self {
                answer: Ok(candidates),
                calls: AtomicUsize::new(0),
            })
        }

        fn failing() -> Arc<Self> {
            Arc::new(Self {
                answer: Err(TripPlannerError::network("connection refused")),
                calls: AtomicUsize::new(0),
            })
        }
    }

    #[async_trait]
    impl LocationSearch for StubSearch {
        async fn search_locations(
            &self,
            _keyword: &str,
            _sub_types: &[LocationSubType],
            _limit: usize,
        ) -> Result<Vec<LocationCandidate>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match &self.answer {
                Ok(candidates) => Ok(candidates.clone()),
                Err(e) => Err(TripPlannerError::network(e.to_string())),
            }
        }
    }

    fn dataset() -> Arc<AirportDataset> {
        Arc::new(AirportDataset::from_records(vec![
            LocationRecord::new("All Airports", "Paris", "France", Some("PAR")),
            LocationRecord::new("Heathrow", "London", "United Kingdom", Some("LHR")),
            LocationRecord::new("Narita", "Tokyo", "Japan", Some("NRT")),
        ]))
    }

    fn resolver(remote: Option<Arc<dyn LocationSearch>>) -> LocationResolver {
        LocationResolver::new(remote, dataset(), &ResolverConfig::default())
    }

    #[tokio::test]
    async fn test_code_input_skips_lookups() {
        let stub = StubSearch::ok(vec![LocationCandidate::new("CITY", Some("XXX"))]);
        let resolver = resolver(Some(stub.clone()));

        assert_eq!(resolver.resolve(" bos ").await.unwrap().as_str(), "BOS");
        assert_eq!(stub.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_remote_prefers_city_over_airport() {
        let stub = StubSearch::ok(vec![
            LocationCandidate::new("AIRPORT", Some("CDG")),
            LocationCandidate::new("CITY", None),
            LocationCandidate::new("CITY", Some("PAR")),
        ]);
        let resolver = resolver(Some(stub));
        assert_eq!(resolver.resolve("Paris").await.unwrap().as_str(), "PAR");
    }

    #[tokio::test]
    async fn test_remote_airport_when_no_city() {
        let stub = StubSearch::ok(vec![
            LocationCandidate::new("AIRPORT", None),
            LocationCandidate::new("AIRPORT", Some("JFK")),
        ]);
        let resolver = resolver(Some(stub));
        assert_eq!(resolver.resolve("Kennedy").await.unwrap().as_str(), "JFK");
    }

    #[tokio::test]
    async fn test_remote_failure_falls_back_to_exact_match() {
        let resolver = resolver(Some(StubSearch::failing()));
        assert_eq!(resolver.resolve("paris").await.unwrap().as_str(), "PAR");
    }

    #[tokio::test]
    async fn test_empty_remote_falls_back_to_fuzzy_match() {
        let resolver = resolver(Some(StubSearch::ok(vec![])));
        assert_eq!(resolver.resolve("Londn").await.unwrap().as_str(), "LHR");
    }

    #[tokio::test]
    async fn test_unresolvable_is_none() {
        let resolver = resolver(Some(StubSearch::failing()));
        assert!(resolver.resolve("Atlantis").await.is_none());
        assert!(resolver.resolve("   ").await.is_none());
    }

    #[test]
    fn test_fuzzy_below_cutoff_is_none() {
        // kyoto/tokyo scores 0.6
        let resolver = resolver(None);
        assert!(resolver.resolve_local("Kyoto").is_none());
    }

    #[tokio::test]
    async fn test_fuzzy_just_under_cutoff_is_none() {
        // lomdonn/london scores 10/13
        let resolver = resolver(Some(StubSearch::ok(vec![])));
        assert!(resolver.resolve("Lomdonn").await.is_none());
    }

    #[tokio::test]
    async fn test_fuzzy_at_cutoff_matches() {
        // tokio/tokyo scores exactly 0.8
        let resolver = resolver(Some(StubSearch::ok(vec![])));
        assert_eq!(resolver.resolve("Tokio").await.unwrap().as_str(), "NRT");
    }
}
