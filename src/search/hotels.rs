use serde::{Deserialize, Serialize};
use tracing::{info, instrument, warn};

use super::{TripSearch, primary_place};
use crate::amadeus::HotelOfferQuery;
use crate::budget::BudgetContext;
use crate::models::{BudgetInput, DatesInput, HotelSearchResult};
use crate::summarizer::summarize_hotel_offers;
use crate::Result;

/// Hotel search as posted by clients
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HotelSearchRequest {
    pub destination: String,
    pub dates: DatesInput,
    /// Whole-trip budget; part of it is reserved for the stay
    #[serde(default)]
    pub budget: Option<BudgetInput>,
    #[serde(default)]
    pub adults: Option<u32>,
    #[serde(default, alias = "room_quantity")]
    pub room_quantity: Option<u32>,
    #[serde(default)]
    pub currency: Option<String>,
    #[serde(default)]
    pub max_results: Option<usize>,
}

impl TripSearch {
    /// Find hotels in the destination city and keep the ones within budget
    #[instrument(skip(self, request), fields(destination = %request.destination))]
    pub async fn search_hotels(&self, request: &HotelSearchRequest) -> Result<HotelSearchResult> {
        let dates = request.dates.to_range()?;
        let budget = request
            .budget
            .as_ref()
            .map(BudgetInput::max_amount)
            .transpose()?
            .flatten();

        let city_code = self.require_code(primary_place(&request.destination)).await?;
        let check_in = dates.start_str();
        let check_out = dates.check_out().format("%Y-%m-%d").to_string();

        let mut result = HotelSearchResult {
            destination: request.destination.clone(),
            city_code: city_code.to_string(),
            check_in: check_in.clone(),
            check_out: check_out.clone(),
            hotels: Vec::new(),
        };

        let mut hotel_ids = self
            .client
            .hotels_by_city(&city_code, self.hotels.radius_km)
            .await?;
        if hotel_ids.is_empty() {
            warn!("No hotels listed for city {}", city_code);
            return Ok(result);
        }
        hotel_ids.truncate(self.hotels.max_hotel_ids);

        let query = HotelOfferQuery {
            hotel_ids,
            check_in,
            check_out,
            adults: request.adults.unwrap_or(1).max(1),
            room_quantity: request.room_quantity.unwrap_or(1).max(1),
            currency: request
                .currency
                .clone()
                .unwrap_or_else(|| self.hotels.currency.clone()),
        };
        let payload = self.client.hotel_offers(&query).await?;

        let context = BudgetContext::new(
            budget,
            self.hotels.budget_reserve_fraction,
            request.max_results.unwrap_or(self.hotels.max_results),
        );
        result.hotels = summarize_hotel_offers(&payload.data, &context, Some(&dates));

        info!(
            "Kept {} hotels in {} (sub-budget {:?})",
            result.hotels.len(),
            city_code,
            context.sub_budget()
        );
        Ok(result)
    }
}
