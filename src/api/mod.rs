mod error;

use std::sync::Arc;

use axum::{
    Router,
    extract::{
        Query, State,
        rejection::{JsonRejection, QueryRejection},
    },
    response::Json,
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::itinerary::{ItineraryPlanner, ItineraryRequest, ItineraryResult};
use crate::models::booking::{Guest, Passenger, PaymentCard, Traveler};
use crate::models::{
    ActivitySearchResult, FlightSearchResult, HotelSearchResult, TransferSearchResult,
};
use crate::search::{
    ActivitySearchRequest, FlightSearchRequest, HotelSearchRequest, TransferSearchRequest,
    TripSearch,
};

pub use error::ApiError;

type ApiResult<T> = Result<Json<T>, ApiError>;

/// Services shared by every handler
#[derive(Clone)]
pub struct AppState {
    pub search: Arc<TripSearch>,
    pub planner: Arc<ItineraryPlanner>,
}

impl AppState {
    pub fn new(search: Arc<TripSearch>, planner: Arc<ItineraryPlanner>) -> Self {
        Self { search, planner }
    }
}

#[derive(Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

#[derive(Deserialize)]
pub struct ResolveParams {
    pub query: String,
}

#[derive(Serialize, Deserialize)]
pub struct ResolveResponse {
    pub query: String,
    pub code: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlightBookingRequest {
    pub flight_offer: Value,
    pub traveler: Traveler,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HotelBookingRequest {
    pub offer_id: String,
    pub guest: Guest,
    pub card: PaymentCard,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferBookingRequest {
    pub offer_id: String,
    pub passenger: Passenger,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/resolve", get(resolve))
        .route("/flights", post(search_flights))
        .route("/flights/price", post(price_flight))
        .route("/hotels", post(search_hotels))
        .route("/transfers", post(search_transfers))
        .route("/activities", post(search_activities))
        .route("/generate-itinerary", post(generate_itinerary))
        .route("/bookings/flight", post(book_flight))
        .route("/bookings/hotel", post(book_hotel))
        .route("/bookings/transfer", post(book_transfer))
        .with_state(state)
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: crate::VERSION.to_string(),
    })
}

async fn resolve(
    State(state): State<AppState>,
    params: Result<Query<ResolveParams>, QueryRejection>,
) -> ApiResult<ResolveResponse> {
    let Query(params) = params?;
    let code = state.search.resolver().resolve(&params.query).await;
    Ok(Json(ResolveResponse {
        query: params.query,
        code: code.map(|code| code.to_string()),
    }))
}

async fn search_flights(
    State(state): State<AppState>,
    payload: Result<Json<FlightSearchRequest>, JsonRejection>,
) -> ApiResult<FlightSearchResult> {
    let Json(request) = payload?;
    Ok(Json(state.search.search_flights(&request).await?))
}

async fn price_flight(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> ApiResult<Value> {
    let Json(flight_offer) = payload?;
    if !flight_offer.is_object() {
        return Err(ApiError::bad_request("Expected a flight offer object"));
    }
    Ok(Json(state.search.client().price_flight_offer(&flight_offer).await?))
}

async fn search_hotels(
    State(state): State<AppState>,
    payload: Result<Json<HotelSearchRequest>, JsonRejection>,
) -> ApiResult<HotelSearchResult> {
    let Json(request) = payload?;
    Ok(Json(state.search.search_hotels(&request).await?))
}

async fn search_transfers(
    State(state): State<AppState>,
    payload: Result<Json<TransferSearchRequest>, JsonRejection>,
) -> ApiResult<TransferSearchResult> {
    let Json(request) = payload?;
    Ok(Json(state.search.search_transfers(&request).await?))
}

async fn search_activities(
    State(state): State<AppState>,
    payload: Result<Json<ActivitySearchRequest>, JsonRejection>,
) -> ApiResult<ActivitySearchResult> {
    let Json(request) = payload?;
    Ok(Json(state.search.search_activities(&request).await?))
}

async fn generate_itinerary(
    State(state): State<AppState>,
    payload: Result<Json<ItineraryRequest>, JsonRejection>,
) -> ApiResult<ItineraryResult> {
    let Json(request) = payload?;
    Ok(Json(state.planner.plan(&request).await?))
}

async fn book_flight(
    State(state): State<AppState>,
    payload: Result<Json<FlightBookingRequest>, JsonRejection>,
) -> ApiResult<Value> {
    let Json(request) = payload?;
    let order = state
        .search
        .client()
        .create_flight_order(&request.flight_offer, &request.traveler)
        .await?;
    Ok(Json(order))
}

async fn book_hotel(
    State(state): State<AppState>,
    payload: Result<Json<HotelBookingRequest>, JsonRejection>,
) -> ApiResult<Value> {
    let Json(request) = payload?;
    let booking = state
        .search
        .client()
        .book_hotel(&request.offer_id, &request.guest, &request.card)
        .await?;
    Ok(Json(booking))
}

async fn book_transfer(
    State(state): State<AppState>,
    payload: Result<Json<TransferBookingRequest>, JsonRejection>,
) -> ApiResult<Value> {
    let Json(request) = payload?;
    let booking = state
        .search
        .client()
        .book_transfer(&request.offer_id, &request.passenger)
        .await?;
    Ok(Json(booking))
}
