//! `trip-planner` - travel planning backend
//!
//! Resolves free-text places to IATA codes, searches the travel provider
//! for flights, hotels, transfers and activities, and condenses the results
//! into flat records for the frontend.

pub mod airports;
pub mod amadeus;
pub mod api;
pub mod budget;
pub mod config;
pub mod error;
pub mod itinerary;
pub mod llm;
pub mod location_resolver;
pub mod logging;
pub mod models;
pub mod results_store;
pub mod search;
pub mod similarity;
pub mod summarizer;
pub mod web;

// Re-export core types for public API
pub use airports::AirportDataset;
pub use amadeus::AmadeusClient;
pub use budget::{BudgetContext, filter_by_budget};
pub use config::TripPlannerConfig;
pub use error::TripPlannerError;
pub use location_resolver::{LocationResolver, LocationSearch, LocationSubType};
pub use models::{DateRange, FlightOffer, HotelOffer, IataCode, LocationRecord};
pub use summarizer::{summarize_flight_offer, summarize_hotel_group, summarize_hotel_offers};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Core result type used throughout the library
pub type Result<T> = std::result::Result<T, TripPlannerError>;
