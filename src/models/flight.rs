//! Summarized flight offers as returned to the frontend

use serde::{Deserialize, Serialize};

/// Offer price as quoted by the provider (kept as the provider's decimal string)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Price {
    pub total: Option<String>,
    pub currency: Option<String>,
}

/// One direction of travel reduced to its overall start and end
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Itinerary {
    pub from: Option<String>,
    pub to: Option<String>,
    pub depart_at: Option<String>,
    pub arrive_at: Option<String>,
    pub stops: usize,
    pub duration: Option<String>,
    /// Human-readable carrier names, parallel to `carrier_codes`
    pub airlines: Vec<String>,
    pub carrier_codes: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlightOffer {
    pub id: Option<String>,
    pub price: Price,
    /// "<carrier> <number>" for every segment, outbound first
    pub flight_codes: Vec<String>,
    pub outbound: Option<Itinerary>,
    pub inbound: Option<Itinerary>,
}

/// Result of one flight search, also the shape persisted to the results file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlightSearchResult {
    pub origin: String,
    pub destination: String,
    pub depart_date: String,
    pub return_date: Option<String>,
    pub offers: Vec<FlightOffer>,
    pub saved_at: String,
}
