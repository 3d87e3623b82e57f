//! Data models for the trip planner
//!
//! This module contains the domain models organized by concern:
//! - Location: reference dataset records and IATA codes
//! - Flight, Hotel, Transfer, Activity: summarized offers returned to clients
//! - Trip: date ranges and budgets parsed from requests
//! - Booking: order payloads sent to the provider

pub mod activity;
pub mod booking;
pub mod flight;
pub mod hotel;
pub mod location;
pub mod transfer;
pub mod trip;

// Re-export all public types for convenient access
pub use activity::{Activity, ActivitySearchResult, BoundingBox};
pub use flight::{FlightOffer, FlightSearchResult, Itinerary, Price};
pub use hotel::{CheapestOffer, HotelOffer, HotelSearchResult};
pub use location::{IataCode, LocationRecord};
pub use transfer::{TransferOffer, TransferSearchResult};
pub use trip::{BudgetInput, DateRange, DatesInput};
