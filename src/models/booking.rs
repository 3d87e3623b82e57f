//! Booking order payloads sent to the provider
//!
//! These types serialize directly into the provider's request bodies.

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Phone {
    pub country_calling_code: String,
    pub number: String,
}

impl Phone {
    fn to_mobile(&self) -> Value {
        json!({
            "deviceType": "MOBILE",
            "countryCallingCode": self.country_calling_code,
            "number": self.number,
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Traveler {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub date_of_birth: String,
    pub gender: String,
    pub email: String,
    pub phone: Phone,
    /// Passport or identity documents, forwarded as given
    #[serde(default)]
    pub documents: Option<Vec<Value>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Guest {
    pub id: String,
    pub title: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentCard {
    pub vendor_code: String,
    pub card_number: String,
    pub expiry_date: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Passenger {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: Phone,
}

/// Body for `POST /v1/shopping/flight-offers/pricing`
#[must_use]
pub fn flight_pricing_body(flight_offer: &Value) -> Value {
    json!({
        "data": {
            "type": "flight-offers-pricing",
            "flightOffers": [flight_offer],
        }
    })
}

/// Body for `POST /v1/booking/flight-orders`
#[must_use]
pub fn flight_order_body(priced_offer: &Value, traveler: &Traveler) -> Value {
    let mut traveler_json = json!({
        "id": traveler.id,
        "dateOfBirth": traveler.date_of_birth,
        "name": {"firstName": traveler.first_name, "lastName": traveler.last_name},
        "gender": traveler.gender,
        "contact": {
            "emailAddress": traveler.email,
            "phones": [traveler.phone.to_mobile()],
        },
    });

    if let Some(documents) = traveler.documents.as_ref().filter(|docs| !docs.is_empty()) {
        traveler_json["documents"] = Value::Array(documents.clone());
    }

    json!({
        "data": {
            "type": "flight-order",
            "flightOffers": [priced_offer],
            "travelers": [traveler_json],
        }
    })
}

/// Body for `POST /v1/booking/hotel-bookings`
#[must_use]
pub fn hotel_booking_body(offer_id: &str, guest: &Guest, card: &PaymentCard) -> Value {
    json!({
        "data": {
            "offerId": offer_id,
            "guests": [{
                "id": guest.id,
                "name": {"title": guest.title, "firstName": guest.first_name, "lastName": guest.last_name},
                "contact": {"phone": guest.phone, "email": guest.email},
            }],
            "payments": [{
                "id": "1",
                "method": "creditCard",
                "card": {
                    "vendorCode": card.vendor_code,
                    "cardNumber": card.card_number,
                    "expiryDate": card.expiry_date,
                },
            }],
        }
    })
}

/// Body for `POST /v1/booking/transfers`
#[must_use]
pub fn transfer_booking_body(offer_id: &str, passenger: &Passenger) -> Value {
    json!({
        "data": {
            "offerId": offer_id,
            "passengers": [{
                "id": "1",
                "name": {"firstName": passenger.first_name, "lastName": passenger.last_name},
                "contact": {
                    "emailAddress": passenger.email,
                    "phones": [passenger.phone.to_mobile()],
                },
            }],
        }
    })
}
