//! Points of interest near a destination

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Activity {
    pub id: Option<String>,
    pub name: Option<String>,
    pub category: Option<String>,
    pub rank: Option<u32>,
    pub tags: Vec<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

/// Search box around a city center, in decimal degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub north: f64,
    pub south: f64,
    pub east: f64,
    pub west: f64,
}

impl BoundingBox {
    #[must_use]
    pub fn around(latitude: f64, longitude: f64, half_side_degrees: f64) -> Self {
        Self {
            north: latitude + half_side_degrees,
            south: latitude - half_side_degrees,
            east: longitude + half_side_degrees,
            west: longitude - half_side_degrees,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActivitySearchResult {
    pub destination: String,
    pub latitude: f64,
    pub longitude: f64,
    pub activities: Vec<Activity>,
}
