use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use super::TripSearch;
use crate::amadeus::FlightOfferQuery;
use crate::models::{BudgetInput, DatesInput, FlightSearchResult, IataCode};
use crate::summarizer::summarize_flight_offers;
use crate::{Result, TripPlannerError};

/// Flight search as posted by clients
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlightSearchRequest {
    #[serde(default)]
    pub origin: Option<String>,
    pub destination: String,
    pub dates: DatesInput,
    #[serde(default)]
    pub budget: Option<BudgetInput>,
    #[serde(default)]
    pub adults: Option<u32>,
    #[serde(default)]
    pub currency: Option<String>,
    #[serde(default)]
    pub non_stop: Option<bool>,
    #[serde(default)]
    pub max_results: Option<u32>,
}

impl TripSearch {
    /// Search flights and summarize the offers.
    ///
    /// An unresolvable destination fails before any offer search is sent.
    /// The result is also written to the flight results file.
    #[instrument(skip(self, request), fields(destination = %request.destination))]
    pub async fn search_flights(&self, request: &FlightSearchRequest) -> Result<FlightSearchResult> {
        let dates = request.dates.to_range()?;
        let budget = request
            .budget
            .as_ref()
            .map(BudgetInput::max_amount)
            .transpose()?
            .flatten();

        let origin = self.resolve_origin(request.origin.as_deref()).await?;
        let destination = self.require_code(&request.destination).await?;

        let query = FlightOfferQuery {
            origin: origin.clone(),
            destination: destination.clone(),
            departure_date: dates.start_str(),
            return_date: dates.end_str(),
            adults: request.adults.unwrap_or(1).max(1),
            currency: request
                .currency
                .clone()
                .unwrap_or_else(|| self.flights.currency.clone()),
            max_results: request.max_results.unwrap_or(self.flights.max_results),
            // Provider takes whole currency units
            max_price: budget.map(|amount| amount.trunc() as u64),
            non_stop: request.non_stop,
        };

        let payload = self.client.flight_offers(&query).await?;
        let offers = summarize_flight_offers(&payload);
        info!("Found {} flight offers {} -> {}", offers.len(), origin, destination);

        let result = FlightSearchResult {
            origin: origin.to_string(),
            destination: destination.to_string(),
            depart_date: query.departure_date,
            return_date: query.return_date,
            offers,
            saved_at: Utc::now().to_rfc3339(),
        };

        self.results.save(&result).await;
        Ok(result)
    }

    /// Origin from the request when it resolves, else the configured default
    async fn resolve_origin(&self, origin: Option<&str>) -> Result<IataCode> {
        if let Some(origin) = origin.filter(|origin| !origin.trim().is_empty()) {
            if let Some(code) = self.resolver.resolve(origin).await {
                return Ok(code);
            }
        }
        IataCode::parse(&self.flights.default_origin).ok_or_else(|| {
            TripPlannerError::config(format!(
                "Default origin '{}' is not a valid code",
                self.flights.default_origin
            ))
        })
    }
}
