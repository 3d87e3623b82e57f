//! Summarized hotel offers

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The lowest-priced offer attached to a hotel
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheapestOffer {
    /// Offer id to pass to the hotel booking endpoint
    pub offer_id: Option<String>,
    pub check_in_date: Option<String>,
    pub check_out_date: Option<String>,
    pub rate_type: Option<String>,
    pub board_type: Option<String>,
    pub room_type: Option<String>,
    /// Provider price object passed through untouched
    pub price: Value,
    /// Parsed `price.total` the offer was selected by
    #[serde(skip)]
    pub total: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HotelOffer {
    pub id: Option<String>,
    pub name: Option<String>,
    pub rating: Option<Value>,
    pub address: Option<Value>,
    pub cheapest_offer: CheapestOffer,
}

impl HotelOffer {
    /// Total stay cost of the selected offer
    #[must_use]
    pub fn total_price(&self) -> f64 {
        self.cheapest_offer.total
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HotelSearchResult {
    pub destination: String,
    pub city_code: String,
    pub check_in: String,
    pub check_out: String,
    pub hotels: Vec<HotelOffer>,
}
