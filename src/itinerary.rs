//! Whole-trip planning
//!
//! Runs the flight, hotel and activity searches for one trip and, when an
//! LLM writer is configured, asks it for a day-by-day plan. A failing
//! search leaves its section empty and adds a warning instead of failing
//! the itinerary.

use std::fmt::Write as _;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{info, instrument, warn};

use crate::llm::ItineraryWriter;
use crate::models::{
    ActivitySearchResult, BudgetInput, DateRange, DatesInput, FlightSearchResult,
    HotelSearchResult,
};
use crate::search::{
    ActivitySearchRequest, FlightSearchRequest, HotelSearchRequest, TripSearch, primary_place,
};
use crate::{Result, TripPlannerError};

const PROMPT_FLIGHTS: usize = 3;
const PROMPT_HOTELS: usize = 5;
const PROMPT_ACTIVITIES: usize = 12;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItineraryRequest {
    #[serde(default)]
    pub origin: Option<String>,
    pub destination: String,
    pub dates: DatesInput,
    #[serde(default)]
    pub budget: Option<BudgetInput>,
    #[serde(default)]
    pub adults: Option<u32>,
    #[serde(default, alias = "room_quantity")]
    pub room_quantity: Option<u32>,
    /// Preferred way of getting around, e.g. "public transit"
    #[serde(default)]
    pub transport: Option<String>,
    #[serde(default)]
    pub interests: Vec<String>,
    /// Free-text wishes from the chat box
    #[serde(default)]
    pub message: Option<String>,
}

/// One day of the generated plan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItineraryDay {
    pub day: u32,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub activities: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ItineraryResult {
    pub message: String,
    pub itinerary: Vec<ItineraryDay>,
    pub flights: Option<FlightSearchResult>,
    pub hotels: Option<HotelSearchResult>,
    pub activities: Option<ActivitySearchResult>,
    /// Plan text the writer produced when it was not a day list
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}

pub struct ItineraryPlanner {
    search: Arc<TripSearch>,
    writer: Option<Arc<dyn ItineraryWriter>>,
}

impl ItineraryPlanner {
    pub fn new(search: Arc<TripSearch>, writer: Option<Arc<dyn ItineraryWriter>>) -> Self {
        Self { search, writer }
    }

    #[instrument(skip(self, request), fields(destination = %request.destination))]
    pub async fn plan(&self, request: &ItineraryRequest) -> Result<ItineraryResult> {
        if request.destination.trim().is_empty() {
            return Err(TripPlannerError::validation("destination is required"));
        }
        let dates = request.dates.to_range()?;

        let flight_request = FlightSearchRequest {
            origin: request.origin.clone(),
            destination: primary_place(&request.destination).to_string(),
            dates: request.dates.clone(),
            budget: request.budget.clone(),
            adults: request.adults,
            currency: None,
            non_stop: None,
            max_results: None,
        };
        let hotel_request = HotelSearchRequest {
            destination: request.destination.clone(),
            dates: request.dates.clone(),
            budget: request.budget.clone(),
            adults: request.adults,
            room_quantity: request.room_quantity,
            currency: None,
            max_results: None,
        };
        let activity_request = ActivitySearchRequest {
            destination: request.destination.clone(),
            interests: request.interests.clone(),
            limit: None,
        };

        let (flights, hotels, activities) = futures::join!(
            self.search.search_flights(&flight_request),
            self.search.search_hotels(&hotel_request),
            self.search.search_activities(&activity_request),
        );

        let mut warnings = Vec::new();
        let flights = keep_section("flights", flights, &mut warnings);
        let hotels = keep_section("hotels", hotels, &mut warnings);
        let activities = keep_section("activities", activities, &mut warnings);

        let mut result = ItineraryResult {
            message: greeting(request, &dates),
            itinerary: Vec::new(),
            flights,
            hotels,
            activities,
            notes: None,
            warnings,
        };

        if let Some(writer) = &self.writer {
            let prompt = build_prompt(request, &dates, &result);
            match writer.write(&prompt).await {
                Ok(text) => match parse_days(&text) {
                    Some(days) => result.itinerary = days,
                    None => result.notes = Some(text),
                },
                Err(e) => {
                    warn!("Itinerary generation failed: {}", e);
                    result.warnings.push(format!("itinerary: {}", e.user_message()));
                }
            }
        }

        info!(
            "Planned trip to {} with {} days and {} warnings",
            request.destination,
            result.itinerary.len(),
            result.warnings.len()
        );
        Ok(result)
    }
}

fn keep_section<T>(name: &str, outcome: Result<T>, warnings: &mut Vec<String>) -> Option<T> {
    match outcome {
        Ok(section) => Some(section),
        Err(e) => {
            warn!("Itinerary {} search failed: {}", name, e);
            warnings.push(format!("{name}: {}", e.user_message()));
            None
        }
    }
}

/// "Great! I'm planning a trip to Paris from 2026-06-01 to 2026-06-08 with a 2000-4000 budget."
#[must_use]
pub fn greeting(request: &ItineraryRequest, dates: &DateRange) -> String {
    format!(
        "Great! I'm planning a trip to {} from {} with a {} budget.",
        request.destination.trim(),
        dates,
        budget_label(request.budget.as_ref())
    )
}

fn budget_label(budget: Option<&BudgetInput>) -> String {
    match budget {
        Some(BudgetInput::Text(text)) if !text.trim().is_empty() => text.trim().to_string(),
        Some(BudgetInput::Amount(amount)) if amount.fract() == 0.0 => format!("{amount:.0}"),
        Some(BudgetInput::Amount(amount)) => format!("{amount:.2}"),
        _ => "flexible".to_string(),
    }
}

fn build_prompt(request: &ItineraryRequest, dates: &DateRange, found: &ItineraryResult) -> String {
    let mut prompt = String::new();
    let _ = writeln!(
        prompt,
        "Plan a day-by-day itinerary for a trip to {} from {}.",
        request.destination.trim(),
        dates
    );
    if let Some(nights) = dates.nights() {
        let _ = writeln!(prompt, "The stay is {nights} nights.");
    }
    let _ = writeln!(prompt, "Budget: {}.", budget_label(request.budget.as_ref()));
    if let Some(transport) = request.transport.as_deref().filter(|t| !t.trim().is_empty()) {
        let _ = writeln!(prompt, "Preferred transport: {transport}.");
    }
    if !request.interests.is_empty() {
        let _ = writeln!(prompt, "Interests: {}.", request.interests.join(", "));
    }
    if let Some(message) = request.message.as_deref().filter(|m| !m.trim().is_empty()) {
        let _ = writeln!(prompt, "Special requests: {message}");
    }

    if let Some(flights) = &found.flights {
        let _ = writeln!(prompt, "\nFlight options:");
        for offer in flights.offers.iter().take(PROMPT_FLIGHTS) {
            let _ = writeln!(
                prompt,
                "- {} for {} {}",
                offer.flight_codes.join(", "),
                offer.price.total.as_deref().unwrap_or("?"),
                offer.price.currency.as_deref().unwrap_or("")
            );
        }
    }
    if let Some(hotels) = &found.hotels {
        let _ = writeln!(prompt, "\nHotel options:");
        for hotel in hotels.hotels.iter().take(PROMPT_HOTELS) {
            let _ = writeln!(
                prompt,
                "- {} at {:.2} total",
                hotel.name.as_deref().unwrap_or("Unnamed hotel"),
                hotel.total_price()
            );
        }
    }
    if let Some(activities) = &found.activities {
        let _ = writeln!(prompt, "\nThings to do:");
        for activity in activities.activities.iter().take(PROMPT_ACTIVITIES) {
            let _ = writeln!(
                prompt,
                "- {} ({})",
                activity.name.as_deref().unwrap_or(""),
                activity.category.as_deref().unwrap_or("other")
            );
        }
    }

    prompt.push_str(
        "\nAnswer only with a JSON array of objects with the keys \
         \"day\" (number), \"title\" (string) and \"activities\" (array of strings).",
    );
    prompt
}

/// Day list from writer output, tolerating a fenced code block around it
#[must_use]
pub fn parse_days(text: &str) -> Option<Vec<ItineraryDay>> {
    let start = text.find('[')?;
    let end = text.rfind(']')?;
    if end < start {
        return None;
    }
    let days: Vec<ItineraryDay> = serde_json::from_str(&text[start..=end]).ok()?;
    (!days.is_empty()).then_some(days)
}
