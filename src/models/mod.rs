mod booking;

pub use booking::{
    nights_between, Booking, BookingId, BookingKind, BookingPatch, ItemType, NewBooking,
    PropertySubmission,
};

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a listing. Backends hand these out as numbers or strings.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ListingId {
    Number(u64),
    Text(String),
}

impl fmt::Display for ListingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

impl ListingId {
    /// Loose comparison: `1` and `"1"` name the same listing
    pub fn matches(&self, other: &ListingId) -> bool {
        match (self, other) {
            (Self::Number(a), Self::Number(b)) => a == b,
            (Self::Text(a), Self::Text(b)) => a == b,
            (Self::Number(n), Self::Text(s)) | (Self::Text(s), Self::Number(n)) => {
                s.trim().parse::<u64>().map_or(false, |parsed| parsed == *n)
            }
        }
    }
}

impl From<u64> for ListingId {
    fn from(value: u64) -> Self {
        Self::Number(value)
    }
}

impl From<&str> for ListingId {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

/// A bookable home
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyListing {
    #[serde(alias = "_id")]
    pub id: ListingId,
    pub title: String,
    pub location: String,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub beds: u32,
    #[serde(default)]
    pub baths: u32,
    #[serde(default)]
    pub guests: u32,
    /// Nightly price in whole rupees
    #[serde(alias = "pricePerNight")]
    pub price: u64,
    #[serde(default)]
    pub rating: Option<f32>,
}

/// A rentable car
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CarListing {
    #[serde(alias = "_id")]
    pub id: ListingId,
    pub name: String,
    #[serde(rename = "type", default)]
    pub body_type: String,
    #[serde(default)]
    pub seats: u32,
    #[serde(default)]
    pub fuel: String,
    /// Daily price in whole rupees
    #[serde(alias = "pricePerDay")]
    pub price: u64,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub rating: Option<f32>,
}
