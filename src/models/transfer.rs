//! Ground transfer offers

use serde::{Deserialize, Serialize};

use super::flight::Price;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferOffer {
    pub id: Option<String>,
    pub transfer_type: Option<String>,
    pub start_at: Option<String>,
    pub start_location: Option<String>,
    pub end_location: Option<String>,
    /// Vehicle description, e.g. "Mercedes E-Class or similar"
    pub vehicle: Option<String>,
    pub provider: Option<String>,
    pub price: Price,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransferSearchResult {
    pub from: String,
    pub to: String,
    pub start_date_time: String,
    pub offers: Vec<TransferOffer>,
}
