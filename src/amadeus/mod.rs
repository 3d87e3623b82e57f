//! Amadeus self-service API client
//!
//! One explicitly constructed client owns the HTTP connection pool and the
//! OAuth token. It is shared behind an `Arc` by the resolver and the search
//! services. A 401 answer triggers a single token refresh and one retry;
//! there is no other retry policy.

pub mod auth;
pub mod payloads;

use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::{Client, Method, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, info, instrument, warn};

use crate::config::ProviderConfig;
use crate::location_resolver::{LocationSearch, LocationSubType};
use crate::models::booking::{self, Guest, Passenger, PaymentCard, Traveler};
use crate::models::{BoundingBox, IataCode};
use crate::{Result, TripPlannerError};

use auth::TokenProvider;
use payloads::{
    CitiesPayload, FlightOffersPayload, GeoCode, HotelListPayload, HotelOffersPayload,
    LocationCandidate, LocationsPayload, PoisPayload, TransferOffersPayload,
};

/// Decoded provider answer
#[derive(Debug, Clone)]
pub struct ProviderResponse {
    pub status: StatusCode,
    pub body: Value,
}

impl ProviderResponse {
    /// Error payloads come either as a non-success status or as an `errors` array
    fn has_errors(&self) -> bool {
        !self.status.is_success()
            || self
                .body
                .get("errors")
                .and_then(Value::as_array)
                .is_some_and(|errors| !errors.is_empty())
    }

    /// Body of a successful response, or the payload wrapped as an upstream error
    pub fn into_success(self) -> Result<Value> {
        if self.has_errors() {
            warn!("Provider request failed with status {}", self.status);
            return Err(TripPlannerError::upstream(
                "Amadeus request failed",
                Some(self.status.as_u16()),
                Some(self.body),
            ));
        }
        Ok(self.body)
    }

    fn decode<T: DeserializeOwned>(self) -> Result<T> {
        let body = self.into_success()?;
        serde_json::from_value(body).map_err(|e| {
            TripPlannerError::upstream(format!("Unexpected provider payload: {e}"), None, None)
        })
    }
}

/// Parameters of a flight offers search
#[derive(Debug, Clone)]
pub struct FlightOfferQuery {
    pub origin: IataCode,
    pub destination: IataCode,
    pub departure_date: String,
    pub return_date: Option<String>,
    pub adults: u32,
    pub currency: String,
    pub max_results: u32,
    pub max_price: Option<u64>,
    pub non_stop: Option<bool>,
}

impl FlightOfferQuery {
    fn params(&self) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("originLocationCode", self.origin.to_string()),
            ("destinationLocationCode", self.destination.to_string()),
            ("departureDate", self.departure_date.clone()),
            ("adults", self.adults.to_string()),
            ("currencyCode", self.currency.clone()),
            ("max", self.max_results.to_string()),
        ];
        if let Some(return_date) = &self.return_date {
            params.push(("returnDate", return_date.clone()));
        }
        if let Some(max_price) = self.max_price {
            params.push(("maxPrice", max_price.to_string()));
        }
        if let Some(non_stop) = self.non_stop {
            params.push(("nonStop", non_stop.to_string()));
        }
        params
    }
}

/// Parameters of a hotel offers search
#[derive(Debug, Clone)]
pub struct HotelOfferQuery {
    pub hotel_ids: Vec<String>,
    pub check_in: String,
    pub check_out: String,
    pub adults: u32,
    pub room_quantity: u32,
    pub currency: String,
}

/// Parameters of a ground transfer search
#[derive(Debug, Clone)]
pub struct TransferQuery {
    pub start_location: IataCode,
    pub end_location: IataCode,
    pub start_date_time: String,
    pub passengers: u32,
    pub transfer_type: String,
    pub currency: String,
}

pub struct AmadeusClient {
    http: Client,
    base_url: String,
    tokens: TokenProvider,
    timeout: Duration,
}

impl AmadeusClient {
    pub fn new(config: &ProviderConfig) -> Result<Self> {
        let client_id = config
            .client_id
            .clone()
            .ok_or_else(|| TripPlannerError::config("Missing provider client_id (AMADEUS_CLIENT_ID)"))?;
        let client_secret = config.client_secret.clone().ok_or_else(|| {
            TripPlannerError::config("Missing provider client_secret (AMADEUS_CLIENT_SECRET)")
        })?;

        let base_url = config.base_url();
        let timeout = Duration::from_secs(config.timeout_seconds.into());

        let http = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("trip-planner/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| TripPlannerError::config(format!("Failed to create HTTP client: {e}")))?;

        let tokens = TokenProvider::new(&base_url, client_id, client_secret)?;

        Ok(Self {
            http,
            base_url,
            tokens,
            timeout,
        })
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Issue one provider request, refreshing the token once on HTTP 401
    #[instrument(level = "debug", skip(self, params, body, timeout))]
    pub async fn request(
        &self,
        method: Method,
        path: &str,
        params: &[(&str, String)],
        body: Option<&Value>,
        timeout: Option<Duration>,
    ) -> Result<ProviderResponse> {
        let url = self.endpoint(path, params)?;
        let timeout = timeout.unwrap_or(self.timeout);
        let start_time = Instant::now();

        let token = self.tokens.access_token().await?;
        let mut response = self
            .send_once(method.clone(), url.clone(), &token, body, timeout)
            .await?;

        if response.status() == StatusCode::UNAUTHORIZED {
            info!("Provider rejected token, refreshing and retrying once");
            let token = self.tokens.refresh(&token).await?;
            response = self.send_once(method, url, &token, body, timeout).await?;
        }

        let status = response.status();
        let text = response.text().await?;
        debug!(
            "Provider answered {} for {} in {:.3}s",
            status,
            path,
            start_time.elapsed().as_secs_f64()
        );

        let body = if text.trim().is_empty() {
            Value::Null
        } else {
            serde_json::from_str(&text).map_err(|e| {
                TripPlannerError::upstream(
                    format!("Provider returned non-JSON response: {e}"),
                    Some(status.as_u16()),
                    Some(Value::String(text.clone())),
                )
            })?
        };

        Ok(ProviderResponse { status, body })
    }

    async fn send_once(
        &self,
        method: Method,
        url: Url,
        token: &str,
        body: Option<&Value>,
        timeout: Duration,
    ) -> Result<reqwest::Response> {
        let mut request = self
            .http
            .request(method, url)
            .bearer_auth(token)
            .header("Accept", "application/json")
            .timeout(timeout);
        if let Some(body) = body {
            request = request.json(body);
        }
        Ok(request.send().await?)
    }

    fn endpoint(&self, path: &str, params: &[(&str, String)]) -> Result<Url> {
        let raw = format!("{}{}", self.base_url.trim_end_matches('/'), path);
        let parsed = if params.is_empty() {
            Url::parse(&raw)
        } else {
            Url::parse_with_params(&raw, params.iter().map(|(k, v)| (*k, v.as_str())))
        };
        parsed.map_err(|e| TripPlannerError::config(format!("Invalid provider URL {raw}: {e}")))
    }

    async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, String)],
        timeout: Option<Duration>,
    ) -> Result<T> {
        self.request(Method::GET, path, params, None, timeout)
            .await?
            .decode()
    }

    async fn post(&self, path: &str, body: &Value) -> Result<Value> {
        self.request(Method::POST, path, &[], Some(body), None)
            .await?
            .into_success()
    }

    // =====================================================================
    // Reference data
    // =====================================================================

    #[instrument(skip(self))]
    pub async fn locations(
        &self,
        keyword: &str,
        sub_types: &[LocationSubType],
        limit: usize,
    ) -> Result<Vec<LocationCandidate>> {
        let sub_type = sub_types
            .iter()
            .map(LocationSubType::as_str)
            .collect::<Vec<_>>()
            .join(",");
        let params = [
            ("keyword", keyword.to_string()),
            ("subType", sub_type),
            ("page[limit]", limit.to_string()),
        ];
        let payload: LocationsPayload = self
            .get("/v1/reference-data/locations", &params, None)
            .await?;
        Ok(payload.data)
    }

    /// Center of the first city matching `keyword`
    #[instrument(skip(self))]
    pub async fn city_coordinates(&self, keyword: &str) -> Result<Option<GeoCode>> {
        let params = [("keyword", keyword.to_string())];
        let payload: CitiesPayload = self
            .get("/v1/reference-data/locations/cities", &params, None)
            .await?;
        Ok(payload.data.into_iter().find_map(|city| city.geo_code))
    }

    #[instrument(skip(self))]
    pub async fn points_of_interest(
        &self,
        bbox: BoundingBox,
        categories: &[String],
        limit: usize,
    ) -> Result<PoisPayload> {
        let mut params = vec![
            ("north", bbox.north.to_string()),
            ("south", bbox.south.to_string()),
            ("east", bbox.east.to_string()),
            ("west", bbox.west.to_string()),
            ("page[limit]", limit.to_string()),
        ];
        if !categories.is_empty() {
            params.push(("categories", categories.join(",")));
        }
        self.get("/v1/reference-data/locations/pois/by-square", &params, None)
            .await
    }

    // =====================================================================
    // Flights
    // =====================================================================

    #[instrument(skip(self, query), fields(origin = %query.origin, destination = %query.destination))]
    pub async fn flight_offers(&self, query: &FlightOfferQuery) -> Result<FlightOffersPayload> {
        self.get("/v2/shopping/flight-offers", &query.params(), None)
            .await
    }

    /// Confirm the live price of an offer before ordering
    pub async fn price_flight_offer(&self, flight_offer: &Value) -> Result<Value> {
        self.post(
            "/v1/shopping/flight-offers/pricing",
            &booking::flight_pricing_body(flight_offer),
        )
        .await
    }

    pub async fn create_flight_order(&self, priced_offer: &Value, traveler: &Traveler) -> Result<Value> {
        self.post(
            "/v1/booking/flight-orders",
            &booking::flight_order_body(priced_offer, traveler),
        )
        .await
    }

    // =====================================================================
    // Hotels
    // =====================================================================

    /// Ids of hotels within `radius_km` of a city
    #[instrument(skip(self, city_code), fields(city = %city_code))]
    pub async fn hotels_by_city(&self, city_code: &IataCode, radius_km: u32) -> Result<Vec<String>> {
        let params = [
            ("cityCode", city_code.to_string()),
            ("radius", radius_km.to_string()),
            ("radiusUnit", "KM".to_string()),
        ];
        let payload: HotelListPayload = self
            .get(
                "/v1/reference-data/locations/hotels/by-city",
                &params,
                Some(Duration::from_secs(25)),
            )
            .await?;
        Ok(payload
            .data
            .into_iter()
            .filter_map(|hotel| hotel.hotel_id)
            .collect())
    }

    #[instrument(skip(self, query), fields(hotels = query.hotel_ids.len()))]
    pub async fn hotel_offers(&self, query: &HotelOfferQuery) -> Result<HotelOffersPayload> {
        let params = [
            ("hotelIds", query.hotel_ids.join(",")),
            ("checkInDate", query.check_in.clone()),
            ("checkOutDate", query.check_out.clone()),
            ("adults", query.adults.to_string()),
            ("roomQuantity", query.room_quantity.to_string()),
            ("currency", query.currency.clone()),
        ];
        self.get(
            "/v3/shopping/hotel-offers",
            &params,
            Some(Duration::from_secs(35)),
        )
        .await
    }

    pub async fn book_hotel(&self, offer_id: &str, guest: &Guest, card: &PaymentCard) -> Result<Value> {
        self.post(
            "/v1/booking/hotel-bookings",
            &booking::hotel_booking_body(offer_id, guest, card),
        )
        .await
    }

    // =====================================================================
    // Transfers
    // =====================================================================

    #[instrument(skip(self, query), fields(from = %query.start_location, to = %query.end_location))]
    pub async fn transfer_offers(&self, query: &TransferQuery) -> Result<TransferOffersPayload> {
        let params = [
            ("startLocationCode", query.start_location.to_string()),
            ("endLocationCode", query.end_location.to_string()),
            ("startDateTime", query.start_date_time.clone()),
            ("passengers", query.passengers.to_string()),
            ("transferType", query.transfer_type.clone()),
            ("currency", query.currency.clone()),
        ];
        self.get("/v1/shopping/transfers", &params, None).await
    }

    pub async fn book_transfer(&self, offer_id: &str, passenger: &Passenger) -> Result<Value> {
        self.post(
            "/v1/booking/transfers",
            &booking::transfer_booking_body(offer_id, passenger),
        )
        .await
    }
}

#[async_trait]
impl LocationSearch for AmadeusClient {
    async fn search_locations(
        &self,
        keyword: &str,
        sub_types: &[LocationSubType],
        limit: usize,
    ) -> Result<Vec<LocationCandidate>> {
        self.locations(keyword, sub_types, limit).await
    }
}
