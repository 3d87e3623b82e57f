//! Offer summarization
//!
//! Reduces the provider's nested offer graphs to the flat records the
//! frontend renders. Records that lack the data a summary needs are dropped
//! here instead of failing the whole response.

use serde_json::Value;
use tracing::debug;

use crate::amadeus::payloads::{
    Dictionaries, FlightOffersPayload, RawFlightOffer, RawHotelGroup, RawHotelOffer,
    RawItinerary, RawPoi, RawTransferOffer,
};
use crate::budget::{BudgetContext, filter_by_budget};
use crate::models::{
    Activity, CheapestOffer, DateRange, FlightOffer, HotelOffer, Itinerary, Price, TransferOffer,
};

// ---------------------------------------------------------------------------
// Flights
// ---------------------------------------------------------------------------

/// Summarize one flight offer; the first itinerary is outbound, the second inbound
#[must_use]
pub fn summarize_flight_offer(raw: &RawFlightOffer, dictionaries: &Dictionaries) -> FlightOffer {
    let flight_codes = raw
        .itineraries
        .iter()
        .flat_map(|itinerary| &itinerary.segments)
        .filter_map(|segment| match (&segment.carrier_code, &segment.number) {
            (Some(carrier), Some(number)) if !carrier.is_empty() && !number.is_empty() => {
                Some(format!("{carrier} {number}"))
            }
            _ => None,
        })
        .collect();

    FlightOffer {
        id: raw.id.clone(),
        price: raw
            .price
            .as_ref()
            .map(|price| Price {
                total: price.total.clone(),
                currency: price.currency.clone(),
            })
            .unwrap_or_default(),
        flight_codes,
        outbound: raw
            .itineraries
            .first()
            .and_then(|itinerary| summarize_itinerary(itinerary, dictionaries)),
        inbound: raw
            .itineraries
            .get(1)
            .and_then(|itinerary| summarize_itinerary(itinerary, dictionaries)),
    }
}

/// Summarize every offer in a flight search payload, in payload order
#[must_use]
pub fn summarize_flight_offers(payload: &FlightOffersPayload) -> Vec<FlightOffer> {
    payload
        .data
        .iter()
        .map(|offer| summarize_flight_offer(offer, &payload.dictionaries))
        .collect()
}

fn summarize_itinerary(itinerary: &RawItinerary, dictionaries: &Dictionaries) -> Option<Itinerary> {
    let first = itinerary.segments.first()?;
    let last = itinerary.segments.last()?;

    let mut carrier_codes: Vec<String> = Vec::new();
    for code in itinerary
        .segments
        .iter()
        .filter_map(|segment| segment.carrier_code.as_deref())
        .filter(|code| !code.is_empty())
    {
        if !carrier_codes.iter().any(|seen| seen == code) {
            carrier_codes.push(code.to_string());
        }
    }

    let airlines = carrier_codes
        .iter()
        .map(|code| {
            dictionaries
                .carriers
                .get(code)
                .cloned()
                .unwrap_or_else(|| code.clone())
        })
        .collect();

    let departure = first.departure.as_ref();
    let arrival = last.arrival.as_ref();

    Some(Itinerary {
        from: departure.and_then(|endpoint| endpoint.iata_code.clone()),
        to: arrival.and_then(|endpoint| endpoint.iata_code.clone()),
        depart_at: departure.and_then(|endpoint| endpoint.at.clone()),
        arrive_at: arrival.and_then(|endpoint| endpoint.at.clone()),
        stops: itinerary.segments.len().saturating_sub(1),
        duration: itinerary.duration.clone(),
        airlines,
        carrier_codes,
    })
}

// ---------------------------------------------------------------------------
// Hotels
// ---------------------------------------------------------------------------

/// Numeric `price.total` of a hotel offer, if it parses
#[must_use]
pub fn hotel_offer_total(offer: &RawHotelOffer) -> Option<f64> {
    let total = match offer.price.as_ref()?.get("total")? {
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        Value::Number(n) => n.as_f64()?,
        _ => return None,
    };
    total.is_finite().then_some(total)
}

/// Summarize a hotel by its cheapest offer.
///
/// Offers without a parseable total are ignored; a hotel left with none is
/// `None`. Offer dates fall back to the requested stay.
#[must_use]
pub fn summarize_hotel_group(group: &RawHotelGroup, stay: Option<&DateRange>) -> Option<HotelOffer> {
    let (cheapest, total) = group
        .offers
        .iter()
        .filter_map(|offer| hotel_offer_total(offer).map(|total| (offer, total)))
        // First of equally cheap offers wins
        .fold(None, |best: Option<(&RawHotelOffer, f64)>, (offer, total)| match best {
            Some((_, best_total)) if best_total <= total => best,
            _ => Some((offer, total)),
        })?;

    let hotel = group.hotel.clone().unwrap_or_default();

    Some(HotelOffer {
        id: hotel.hotel_id,
        name: hotel.name,
        rating: hotel.rating,
        address: hotel.address,
        cheapest_offer: CheapestOffer {
            offer_id: cheapest.id.clone(),
            check_in_date: cheapest
                .check_in_date
                .clone()
                .or_else(|| stay.map(DateRange::start_str)),
            check_out_date: cheapest
                .check_out_date
                .clone()
                .or_else(|| stay.map(|range| range.check_out().format("%Y-%m-%d").to_string())),
            rate_type: cheapest.rate_type.clone(),
            board_type: cheapest.board_type.clone(),
            room_type: cheapest
                .room
                .as_ref()
                .and_then(|room| room.type_estimated.as_ref())
                .and_then(|estimated| estimated.category.clone()),
            price: cheapest.price.clone().unwrap_or(Value::Null),
            total,
        },
    })
}

/// Summarize hotel groups, then apply the budget and the result cap
#[must_use]
pub fn summarize_hotel_offers(
    groups: &[RawHotelGroup],
    budget: &BudgetContext,
    stay: Option<&DateRange>,
) -> Vec<HotelOffer> {
    let summarized: Vec<HotelOffer> = groups
        .iter()
        .filter_map(|group| summarize_hotel_group(group, stay))
        .collect();

    let mut hotels = filter_by_budget(summarized, budget.total_budget, budget.reserve_fraction);
    hotels.truncate(budget.max_results);

    debug!(
        "Summarized {} of {} hotel groups",
        hotels.len(),
        groups.len()
    );
    hotels
}

// ---------------------------------------------------------------------------
// Transfers
// ---------------------------------------------------------------------------

#[must_use]
pub fn summarize_transfer_offer(raw: &RawTransferOffer) -> TransferOffer {
    let vehicle = raw.vehicle.as_ref().and_then(|vehicle| {
        vehicle
            .description
            .clone()
            .or_else(|| vehicle.category.clone())
            .or_else(|| vehicle.code.clone())
    });

    TransferOffer {
        id: raw.id.clone(),
        transfer_type: raw.transfer_type.clone(),
        start_at: raw.start.as_ref().and_then(|point| point.date_time.clone()),
        start_location: raw.start.as_ref().and_then(|point| point.location_code.clone()),
        end_location: raw.end.as_ref().and_then(|point| point.location_code.clone()),
        vehicle,
        provider: raw
            .service_provider
            .as_ref()
            .and_then(|provider| provider.name.clone().or_else(|| provider.code.clone())),
        price: raw
            .quotation
            .as_ref()
            .map(|quotation| Price {
                total: quotation.monetary_amount.clone(),
                currency: quotation.currency_code.clone(),
            })
            .unwrap_or_default(),
    }
}

// ---------------------------------------------------------------------------
// Points of interest
// ---------------------------------------------------------------------------

/// Summarize a POI; unnamed entries are dropped
#[must_use]
pub fn summarize_poi(raw: &RawPoi) -> Option<Activity> {
    let name = raw.name.as_ref().filter(|name| !name.trim().is_empty())?;

    let rank = match &raw.rank {
        Some(Value::Number(n)) => n.as_u64().and_then(|rank| u32::try_from(rank).ok()),
        Some(Value::String(s)) => s.trim().parse().ok(),
        _ => None,
    };

    Some(Activity {
        id: raw.id.clone(),
        name: Some(name.clone()),
        category: raw.category.clone(),
        rank,
        tags: raw.tags.clone(),
        latitude: raw.geo_code.map(|geo| geo.latitude),
        longitude: raw.geo_code.map(|geo| geo.longitude),
    })
}
