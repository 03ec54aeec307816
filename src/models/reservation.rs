use chrono::NaiveDate;
use serde::{ Deserialize, Serialize };

use super::property::PropertyListing;

/// A guest's booking of a property over a date range
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reservation {
    pub id: i32,
    pub guest_id: i32,
    pub property_id: i32,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

/// A rating left by a guest after a stay
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertyReview {
    pub id: i32,
    pub guest_id: i32,
    pub property_id: i32,
    pub reservation_id: i32,
    pub rating: i16,
    #[serde(default)]
    pub message: Option<String>,
}

/// One row of a guest's reservation history
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GuestReservation {
    pub reservation: Reservation,
    pub property: PropertyListing,
}
