//! Trip-level inputs parsed once at the HTTP boundary

use chrono::NaiveDate;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::LazyLock;

use crate::{Result, TripPlannerError};

static ISO_DATE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d{4}-\d{2}-\d{2}").expect("Invalid ISO date pattern"));
static US_DATE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(\d{1,2})/(\d{1,2})/(\d{4})").expect("Invalid US date pattern")
});

const ISO_FORMAT: &str = "%Y-%m-%d";

/// Travel dates; a missing end means a one-way trip
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: Option<NaiveDate>,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: Option<NaiveDate>) -> Result<Self> {
        if let Some(end) = end {
            if end < start {
                return Err(TripPlannerError::invalid_date_range(
                    format!("{start} to {end}"),
                    "end date is before start date",
                ));
            }
        }
        Ok(Self { start, end })
    }

    /// Parse "YYYY-MM-DD to YYYY-MM-DD", a lone ISO date, or "M/D/YYYY - M/D/YYYY".
    /// Only the first two dates found are used.
    pub fn parse(input: &str) -> Result<Self> {
        let mut dates = Vec::new();

        for found in ISO_DATE_RE.find_iter(input).take(2) {
            let date = NaiveDate::parse_from_str(found.as_str(), ISO_FORMAT).map_err(|e| {
                TripPlannerError::invalid_date_range(input, format!("{}: {e}", found.as_str()))
            })?;
            dates.push(date);
        }

        if dates.is_empty() {
            for caps in US_DATE_RE.captures_iter(input).take(2) {
                let month: u32 = caps[1].parse().unwrap_or(0);
                let day: u32 = caps[2].parse().unwrap_or(0);
                let year: i32 = caps[3].parse().unwrap_or(0);
                let date = NaiveDate::from_ymd_opt(year, month, day).ok_or_else(|| {
                    TripPlannerError::invalid_date_range(input, format!("{} is not a calendar date", &caps[0]))
                })?;
                dates.push(date);
            }
        }

        match dates.as_slice() {
            [] => Err(TripPlannerError::invalid_date_range(input, "no dates found")),
            [start] => Self::new(*start, None),
            [start, end, ..] => Self::new(*start, Some(*end)),
        }
    }

    #[must_use]
    pub fn start_str(&self) -> String {
        self.start.format(ISO_FORMAT).to_string()
    }

    #[must_use]
    pub fn end_str(&self) -> Option<String> {
        self.end.map(|end| end.format(ISO_FORMAT).to_string())
    }

    /// Nights between check-in and check-out, at least one
    #[must_use]
    pub fn nights(&self) -> Option<i64> {
        self.end
            .map(|end| (end - self.start).num_days().max(1))
    }

    /// Check-out for stays: the end date, or the night after `start`
    #[must_use]
    pub fn check_out(&self) -> NaiveDate {
        self.end
            .unwrap_or_else(|| self.start.succ_opt().unwrap_or(self.start))
    }
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.end_str() {
            Some(end) => write!(f, "{} to {}", self.start_str(), end),
            None => f.write_str(&self.start_str()),
        }
    }
}

/// Dates as sent by clients: a free-text range or a `[start, end]` list
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(untagged)]
pub enum DatesInput {
    Text(String),
    List(Vec<String>),
}

impl DatesInput {
    pub fn to_range(&self) -> Result<DateRange> {
        match self {
            DatesInput::Text(text) => DateRange::parse(text),
            DatesInput::List(parts) => DateRange::parse(&parts.join(" to ")),
        }
    }
}

/// Budget as sent by clients: a number, or text such as "2000-4000" or "5000+"
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(untagged)]
pub enum BudgetInput {
    Amount(f64),
    Text(String),
}

impl BudgetInput {
    /// Upper bound of the budget; `None` when the client set no cap
    pub fn max_amount(&self) -> Result<Option<f64>> {
        match self {
            BudgetInput::Amount(amount) => Ok(positive(*amount)),
            BudgetInput::Text(text) => parse_budget_max(text),
        }
    }
}

fn positive(amount: f64) -> Option<f64> {
    (amount.is_finite() && amount > 0.0).then_some(amount)
}

fn parse_budget_max(text: &str) -> Result<Option<f64>> {
    let cleaned: String = text
        .chars()
        .filter(|c| !matches!(c, '$' | ',' | ' '))
        .collect();

    if cleaned.is_empty() || cleaned.contains('+') {
        return Ok(None);
    }

    let upper = match cleaned.split_once('-') {
        Some((_, high)) if !high.is_empty() => high,
        Some((low, _)) => low,
        None => cleaned.as_str(),
    };

    upper
        .parse::<f64>()
        .map(positive)
        .map_err(|_| TripPlannerError::validation(format!("Budget '{text}' is not a number")))
}
