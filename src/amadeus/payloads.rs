//! Raw Amadeus response payloads
//!
//! Every field is optional: the provider omits or nulls fields freely, and an
//! unusable record is dropped later during summarization instead of failing
//! the whole response.

use serde::{Deserialize, Deserializer};
use serde_json::Value;
use std::collections::HashMap;

/// Treat an explicit `null` like a missing field
fn null_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Accept `"12.50"` as well as `12.5`
fn string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::String(s)) => Some(s),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}

// ---------------------------------------------------------------------------
// Locations
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationCandidate {
    #[serde(default)]
    pub sub_type: Option<String>,
    #[serde(default)]
    pub iata_code: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
}

impl LocationCandidate {
    #[must_use]
    pub fn new(sub_type: &str, iata_code: Option<&str>) -> Self {
        Self {
            sub_type: Some(sub_type.to_string()),
            iata_code: iata_code.map(str::to_string),
            name: None,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct LocationsPayload {
    #[serde(default, deserialize_with = "null_default")]
    pub data: Vec<LocationCandidate>,
}

#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq)]
pub struct GeoCode {
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawCity {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub iata_code: Option<String>,
    #[serde(default)]
    pub geo_code: Option<GeoCode>,
}

#[derive(Debug, Default, Deserialize)]
pub struct CitiesPayload {
    #[serde(default, deserialize_with = "null_default")]
    pub data: Vec<RawCity>,
}

// ---------------------------------------------------------------------------
// Flights
// ---------------------------------------------------------------------------

#[derive(Debug, Default, Deserialize)]
pub struct FlightOffersPayload {
    #[serde(default, deserialize_with = "null_default")]
    pub data: Vec<RawFlightOffer>,
    #[serde(default, deserialize_with = "null_default")]
    pub dictionaries: Dictionaries,
}

/// Lookup tables shipped alongside flight offers
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Dictionaries {
    /// Carrier code -> airline name
    #[serde(default, deserialize_with = "null_default")]
    pub carriers: HashMap<String, String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawFlightOffer {
    #[serde(default, deserialize_with = "string_or_number")]
    pub id: Option<String>,
    #[serde(default)]
    pub price: Option<RawPrice>,
    #[serde(default, deserialize_with = "null_default")]
    pub itineraries: Vec<RawItinerary>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawPrice {
    #[serde(default, deserialize_with = "string_or_number")]
    pub total: Option<String>,
    #[serde(default)]
    pub currency: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawItinerary {
    #[serde(default)]
    pub duration: Option<String>,
    #[serde(default, deserialize_with = "null_default")]
    pub segments: Vec<RawSegment>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawSegment {
    #[serde(default)]
    pub departure: Option<RawEndpoint>,
    #[serde(default)]
    pub arrival: Option<RawEndpoint>,
    #[serde(default)]
    pub carrier_code: Option<String>,
    #[serde(default, deserialize_with = "string_or_number")]
    pub number: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawEndpoint {
    #[serde(default)]
    pub iata_code: Option<String>,
    #[serde(default)]
    pub at: Option<String>,
}

// ---------------------------------------------------------------------------
// Hotels
// ---------------------------------------------------------------------------

#[derive(Debug, Default, Deserialize)]
pub struct HotelListPayload {
    #[serde(default, deserialize_with = "null_default")]
    pub data: Vec<HotelRef>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HotelRef {
    #[serde(default)]
    pub hotel_id: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct HotelOffersPayload {
    #[serde(default, deserialize_with = "null_default")]
    pub data: Vec<RawHotelGroup>,
}

/// A hotel together with every offer quoted for it
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawHotelGroup {
    #[serde(default)]
    pub hotel: Option<RawHotel>,
    #[serde(default, deserialize_with = "null_default")]
    pub offers: Vec<RawHotelOffer>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawHotel {
    #[serde(default)]
    pub hotel_id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub rating: Option<Value>,
    #[serde(default)]
    pub address: Option<Value>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawHotelOffer {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub check_in_date: Option<String>,
    #[serde(default)]
    pub check_out_date: Option<String>,
    #[serde(default)]
    pub rate_type: Option<String>,
    #[serde(default)]
    pub board_type: Option<String>,
    #[serde(default)]
    pub room: Option<RawRoom>,
    #[serde(default)]
    pub price: Option<Value>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawRoom {
    #[serde(default)]
    pub type_estimated: Option<RawRoomType>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawRoomType {
    #[serde(default)]
    pub category: Option<String>,
}

// ---------------------------------------------------------------------------
// Transfers
// ---------------------------------------------------------------------------

#[derive(Debug, Default, Deserialize)]
pub struct TransferOffersPayload {
    #[serde(default, deserialize_with = "null_default")]
    pub data: Vec<RawTransferOffer>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawTransferOffer {
    #[serde(default, deserialize_with = "string_or_number")]
    pub id: Option<String>,
    #[serde(default)]
    pub transfer_type: Option<String>,
    #[serde(default)]
    pub start: Option<RawTransferPoint>,
    #[serde(default)]
    pub end: Option<RawTransferPoint>,
    #[serde(default)]
    pub vehicle: Option<RawVehicle>,
    #[serde(default)]
    pub service_provider: Option<RawServiceProvider>,
    #[serde(default)]
    pub quotation: Option<RawQuotation>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawTransferPoint {
    #[serde(default)]
    pub date_time: Option<String>,
    #[serde(default)]
    pub location_code: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawVehicle {
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawServiceProvider {
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawQuotation {
    #[serde(default, deserialize_with = "string_or_number")]
    pub monetary_amount: Option<String>,
    #[serde(default)]
    pub currency_code: Option<String>,
}

// ---------------------------------------------------------------------------
// Points of interest
// ---------------------------------------------------------------------------

#[derive(Debug, Default, Deserialize)]
pub struct PoisPayload {
    #[serde(default, deserialize_with = "null_default")]
    pub data: Vec<RawPoi>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawPoi {
    #[serde(default, deserialize_with = "string_or_number")]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub rank: Option<Value>,
    #[serde(default, deserialize_with = "null_default")]
    pub tags: Vec<String>,
    #[serde(default)]
    pub geo_code: Option<GeoCode>,
}
