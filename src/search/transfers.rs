use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use super::TripSearch;
use crate::amadeus::TransferQuery;
use crate::models::TransferSearchResult;
use crate::summarizer::summarize_transfer_offer;
use crate::{Result, TripPlannerError};

const DEFAULT_TRANSFER_TYPE: &str = "PRIVATE";

/// Ground transfer search as posted by clients
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferSearchRequest {
    pub from: String,
    pub to: String,
    /// Local pickup time, `YYYY-MM-DDTHH:MM:SS`
    pub start_date_time: String,
    #[serde(default)]
    pub passengers: Option<u32>,
    #[serde(default)]
    pub transfer_type: Option<String>,
    #[serde(default)]
    pub currency: Option<String>,
}

impl TripSearch {
    #[instrument(skip(self, request), fields(from = %request.from, to = %request.to))]
    pub async fn search_transfers(
        &self,
        request: &TransferSearchRequest,
    ) -> Result<TransferSearchResult> {
        let start_date_time = request.start_date_time.trim();
        if start_date_time.is_empty() {
            return Err(TripPlannerError::validation("startDateTime is required"));
        }

        let start = self.require_code(&request.from).await?;
        let end = self.require_code(&request.to).await?;

        let query = TransferQuery {
            start_location: start.clone(),
            end_location: end.clone(),
            start_date_time: start_date_time.to_string(),
            passengers: request.passengers.unwrap_or(1).max(1),
            transfer_type: request
                .transfer_type
                .as_deref()
                .filter(|kind| !kind.trim().is_empty())
                .unwrap_or(DEFAULT_TRANSFER_TYPE)
                .to_uppercase(),
            currency: request
                .currency
                .clone()
                .unwrap_or_else(|| self.flights.currency.clone()),
        };

        let payload = self.client.transfer_offers(&query).await?;
        let offers: Vec<_> = payload.data.iter().map(summarize_transfer_offer).collect();
        info!("Found {} transfer offers {} -> {}", offers.len(), start, end);

        Ok(TransferSearchResult {
            from: start.to_string(),
            to: end.to_string(),
            start_date_time: query.start_date_time,
            offers,
        })
    }
}
