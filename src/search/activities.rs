use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

use super::{TripSearch, primary_place};
use crate::models::{ActivitySearchResult, BoundingBox};
use crate::summarizer::summarize_poi;
use crate::{Result, TripPlannerError};

/// Activity search as posted by clients
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivitySearchRequest {
    pub destination: String,
    /// Free-form interests such as "food" or "museums"
    #[serde(default)]
    pub interests: Vec<String>,
    #[serde(default)]
    pub limit: Option<usize>,
}

/// Provider POI categories matching free-form interests, first-seen order
#[must_use]
pub fn interest_categories(interests: &[String]) -> Vec<String> {
    let mut categories: Vec<String> = Vec::new();
    for interest in interests {
        let interest = interest.trim().to_lowercase();
        let category = match interest.as_str() {
            "sights" | "sightseeing" | "culture" | "history" | "museum" | "museums" | "art" => {
                "SIGHTS"
            }
            "nightlife" | "bars" | "clubs" => "NIGHTLIFE",
            "food" | "restaurant" | "restaurants" | "dining" | "cuisine" => "RESTAURANT",
            "shopping" | "markets" => "SHOPPING",
            "beach" | "beaches" | "park" | "parks" | "nature" | "outdoors" => "BEACH_PARK",
            _ => {
                debug!("No activity category for interest '{}'", interest);
                continue;
            }
        };
        if !categories.iter().any(|seen| seen == category) {
            categories.push(category.to_string());
        }
    }
    categories
}

impl TripSearch {
    /// Points of interest in a square around the destination's city center
    #[instrument(skip(self, request), fields(destination = %request.destination))]
    pub async fn search_activities(
        &self,
        request: &ActivitySearchRequest,
    ) -> Result<ActivitySearchResult> {
        let place = primary_place(&request.destination);
        if place.is_empty() {
            return Err(TripPlannerError::validation("destination is required"));
        }

        let center = self
            .client
            .city_coordinates(place)
            .await?
            .ok_or_else(|| TripPlannerError::unresolvable(place))?;

        let bbox = BoundingBox::around(center.latitude, center.longitude, self.activities.box_degrees);
        let limit = request.limit.unwrap_or(self.activities.limit).max(1);
        let categories = interest_categories(&request.interests);

        let payload = self.client.points_of_interest(bbox, &categories, limit).await?;
        let activities: Vec<_> = payload
            .data
            .iter()
            .filter_map(summarize_poi)
            .take(limit)
            .collect();
        info!("Found {} activities around {}", activities.len(), place);

        Ok(ActivitySearchResult {
            destination: request.destination.clone(),
            latitude: center.latitude,
            longitude: center.longitude,
            activities,
        })
    }
}
