//! Hotel budget filter
//!
//! A trip budget covers everything, so only a fraction of it is reserved for
//! the stay. A hotel is excluded when its cheapest total for the whole stay
//! is strictly greater than that reserve.

use tracing::debug;

use crate::models::HotelOffer;

/// Budget settings applied while summarizing hotel offers
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BudgetContext {
    /// Whole-trip budget; `None` disables filtering
    pub total_budget: Option<f64>,
    /// Share of `total_budget` reserved for the stay
    pub reserve_fraction: f64,
    /// Maximum number of hotels kept after filtering
    pub max_results: usize,
}

impl BudgetContext {
    #[must_use]
    pub fn new(total_budget: Option<f64>, reserve_fraction: f64, max_results: usize) -> Self {
        Self {
            total_budget,
            reserve_fraction,
            max_results,
        }
    }

    #[must_use]
    pub fn sub_budget(&self) -> Option<f64> {
        sub_budget(self.total_budget, self.reserve_fraction)
    }
}

/// Amount reserved for the stay, absent when no usable budget was given
#[must_use]
pub fn sub_budget(total_budget: Option<f64>, reserve_fraction: f64) -> Option<f64> {
    total_budget
        .filter(|total| total.is_finite() && *total > 0.0)
        .map(|total| total * reserve_fraction)
}

/// Drop hotels whose cheapest offer exceeds the reserved sub-budget
#[must_use]
pub fn filter_by_budget(
    hotels: Vec<HotelOffer>,
    total_budget: Option<f64>,
    reserve_fraction: f64,
) -> Vec<HotelOffer> {
    let Some(cap) = sub_budget(total_budget, reserve_fraction) else {
        return hotels;
    };

    let before = hotels.len();
    let kept: Vec<HotelOffer> = hotels
        .into_iter()
        .filter(|hotel| hotel.total_price() <= cap)
        .collect();

    debug!(
        "Budget filter kept {} of {} hotels (sub-budget {:.2})",
        kept.len(),
        before,
        cap
    );
    kept
}
