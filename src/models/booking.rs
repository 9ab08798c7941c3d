use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

use super::{CarListing, ListingId, PropertyListing};
use crate::error::LedgerError;

/// Image shown when a listing carries no pictures of its own
pub const DEFAULT_IMAGE: &str = "/assets/default.jpg";

/// Length of the stay created by a new-property submission
const SUBMISSION_STAY_DAYS: i64 = 7;

/// Unique identifier of a booking within a ledger
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct BookingId(String);

impl BookingId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub(crate) fn from_millis(millis: i64) -> Self {
        Self(format!("bk_{millis}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

// Older records used bare `Date.now()` numbers as ids
impl<'de> Deserialize<'de> for BookingId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Text(String),
            Number(u64),
        }

        Ok(match Raw::deserialize(deserializer)? {
            Raw::Text(text) => Self(text),
            Raw::Number(number) => Self(number.to_string()),
        })
    }
}

impl fmt::Display for BookingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for BookingId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for BookingId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// What kind of item a booking reserves
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemType {
    Property,
    Car,
}

impl fmt::Display for ItemType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Property => f.write_str("property"),
            Self::Car => f.write_str("car"),
        }
    }
}

/// Variant-specific booking data
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "itemType", rename_all = "camelCase")]
pub enum BookingKind {
    #[serde(rename_all = "camelCase")]
    Property {
        start_date: NaiveDate,
        end_date: NaiveDate,
        #[serde(alias = "price")]
        price_per_night: u64,
    },
    #[serde(rename_all = "camelCase")]
    Car {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pickup_date: Option<NaiveDate>,
        rental_days: u32,
        #[serde(alias = "price")]
        price_per_day: u64,
    },
}

impl BookingKind {
    /// Amount owed for this stay or rental, before any override
    pub fn derived_total(&self) -> Result<u64, LedgerError> {
        let (units, price) = match self {
            Self::Property {
                start_date,
                end_date,
                price_per_night,
            } => {
                let nights = nights_between(*start_date, *end_date).max(1);
                (u64::try_from(nights).unwrap_or(1), *price_per_night)
            }
            Self::Car {
                rental_days,
                price_per_day,
                ..
            } => (u64::from((*rental_days).max(1)), *price_per_day),
        };
        units
            .checked_mul(price)
            .ok_or_else(|| LedgerError::validation("total overflows"))
    }
}

/// Whole nights between two dates, negative when `end` precedes `start`
pub fn nights_between(start: NaiveDate, end: NaiveDate) -> i64 {
    (end - start).num_days()
}

/// A booking record owned by the ledger
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    pub id: BookingId,
    pub title: String,
    pub location: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub item_id: Option<ListingId>,
    pub guests: u32,
    pub images: Vec<String>,
    pub total: u64,
    #[serde(flatten)]
    pub kind: BookingKind,
}

impl Booking {
    pub fn item_type(&self) -> ItemType {
        match self.kind {
            BookingKind::Property { .. } => ItemType::Property,
            BookingKind::Car { .. } => ItemType::Car,
        }
    }

    /// Check-in date, or pickup date for cars when one was chosen
    pub fn start_date(&self) -> Option<NaiveDate> {
        match self.kind {
            BookingKind::Property { start_date, .. } => Some(start_date),
            BookingKind::Car { pickup_date, .. } => pickup_date,
        }
    }

    /// Check-out date, or return date for cars with a pickup date
    pub fn end_date(&self) -> Option<NaiveDate> {
        match self.kind {
            BookingKind::Property { end_date, .. } => Some(end_date),
            BookingKind::Car {
                pickup_date,
                rental_days,
                ..
            } => pickup_date.map(|date| date + Duration::days(i64::from(rental_days))),
        }
    }

    /// Price per night for homes, per day for cars
    pub fn unit_price(&self) -> u64 {
        match self.kind {
            BookingKind::Property {
                price_per_night, ..
            } => price_per_night,
            BookingKind::Car { price_per_day, .. } => price_per_day,
        }
    }

    /// Booked nights, counted only for property bookings
    pub fn nights(&self) -> u64 {
        match self.kind {
            BookingKind::Property {
                start_date,
                end_date,
                ..
            } => u64::try_from(nights_between(start_date, end_date).max(0)).unwrap_or(0),
            BookingKind::Car { .. } => 0,
        }
    }

    pub fn validate(&self) -> Result<(), LedgerError> {
        validate_fields(
            &self.title,
            &self.location,
            self.guests,
            &self.images,
            &self.kind,
        )
    }
}

fn validate_fields(
    title: &str,
    location: &str,
    guests: u32,
    images: &[String],
    kind: &BookingKind,
) -> Result<(), LedgerError> {
    if title.trim().is_empty() {
        return Err(LedgerError::validation("title is required"));
    }
    if location.trim().is_empty() {
        return Err(LedgerError::validation("location is required"));
    }
    if guests < 1 {
        return Err(LedgerError::validation("guests must be at least 1"));
    }
    if images.is_empty() {
        return Err(LedgerError::validation("at least one image is required"));
    }
    match kind {
        BookingKind::Property {
            start_date,
            end_date,
            ..
        } if end_date <= start_date => Err(LedgerError::validation(
            "check-out must be after check-in",
        )),
        BookingKind::Car { rental_days: 0, .. } => {
            Err(LedgerError::validation("rental days must be at least 1"))
        }
        _ => Ok(()),
    }
}

/// A booking about to enter the ledger
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewBooking {
    /// Caller-chosen id; the ledger assigns one when absent
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<BookingId>,
    pub title: String,
    pub location: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub item_id: Option<ListingId>,
    pub guests: u32,
    pub images: Vec<String>,
    /// Supplied total; derived from the dates and price when absent
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total: Option<u64>,
    #[serde(flatten)]
    pub kind: BookingKind,
}

impl NewBooking {
    /// Reserve a home for the nights between `start` and `end`
    pub fn for_property(
        listing: &PropertyListing,
        start: NaiveDate,
        end: NaiveDate,
        guests: u32,
    ) -> Self {
        Self {
            id: None,
            title: listing.title.clone(),
            location: listing.location.clone(),
            item_id: Some(listing.id.clone()),
            guests,
            images: images_or_default(&listing.images),
            total: None,
            kind: BookingKind::Property {
                start_date: start,
                end_date: end,
                price_per_night: listing.price,
            },
        }
    }

    /// Rent a car for `rental_days` days
    pub fn for_car(listing: &CarListing, pickup: Option<NaiveDate>, rental_days: u32) -> Self {
        Self {
            id: None,
            title: listing.name.clone(),
            location: "Car rental".to_string(),
            item_id: Some(listing.id.clone()),
            guests: 1,
            images: images_or_default(&listing.images),
            total: None,
            kind: BookingKind::Car {
                pickup_date: pickup,
                rental_days,
                price_per_day: listing.price,
            },
        }
    }

    /// Turn an "add your property" form into a week-long booking starting today
    pub fn from_submission(
        submission: &PropertySubmission,
        today: NaiveDate,
    ) -> Result<Self, LedgerError> {
        let missing = || LedgerError::validation("title, location, price and image are required");
        let Some(price) = submission.price.filter(|price| *price > 0) else {
            return Err(missing());
        };
        if [&submission.title, &submission.location, &submission.image]
            .iter()
            .any(|field| field.trim().is_empty())
        {
            return Err(missing());
        }

        Ok(Self {
            id: None,
            title: submission.title.trim().to_string(),
            location: submission.location.trim().to_string(),
            item_id: None,
            guests: submission.guests.max(1),
            images: vec![submission.image.trim().to_string()],
            total: Some(price),
            kind: BookingKind::Property {
                start_date: today,
                end_date: today + Duration::days(SUBMISSION_STAY_DAYS),
                price_per_night: price,
            },
        })
    }

    pub fn with_id(mut self, id: impl Into<BookingId>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_total(mut self, total: u64) -> Self {
        self.total = Some(total);
        self
    }

    pub fn validate(&self) -> Result<(), LedgerError> {
        validate_fields(
            &self.title,
            &self.location,
            self.guests,
            &self.images,
            &self.kind,
        )
    }

    pub(crate) fn into_booking(self, id: BookingId) -> Result<Booking, LedgerError> {
        let total = match self.total {
            Some(total) => total,
            None => self.kind.derived_total()?,
        };
        Ok(Booking {
            id,
            title: self.title,
            location: self.location,
            item_id: self.item_id,
            guests: self.guests,
            images: self.images,
            total,
            kind: self.kind,
        })
    }
}

impl From<Booking> for NewBooking {
    fn from(booking: Booking) -> Self {
        Self {
            id: Some(booking.id),
            title: booking.title,
            location: booking.location,
            item_id: booking.item_id,
            guests: booking.guests,
            images: booking.images,
            total: Some(booking.total),
            kind: booking.kind,
        }
    }
}

fn images_or_default(images: &[String]) -> Vec<String> {
    if images.is_empty() {
        vec![DEFAULT_IMAGE.to_string()]
    } else {
        images.to_vec()
    }
}

/// Form data from the "add property" page
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct PropertySubmission {
    pub title: String,
    pub location: String,
    pub price: Option<u64>,
    pub image: String,
    #[serde(default)]
    pub beds: u32,
    #[serde(default)]
    pub baths: u32,
    #[serde(default)]
    pub guests: u32,
}

/// Fields to merge into an existing booking; `None` leaves a field alone
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BookingPatch {
    pub title: Option<String>,
    pub location: Option<String>,
    pub guests: Option<u32>,
    /// Check-in date, or pickup date for cars
    pub start_date: Option<NaiveDate>,
    /// Check-out date; property bookings only
    pub end_date: Option<NaiveDate>,
    /// Price per night, or per day for cars
    pub price: Option<u64>,
    /// Rental length; car bookings only
    pub rental_days: Option<u32>,
    pub images: Option<Vec<String>>,
}

impl BookingPatch {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    pub fn dates(start: NaiveDate, end: NaiveDate) -> Self {
        Self {
            start_date: Some(start),
            end_date: Some(end),
            ..Self::default()
        }
    }

    pub fn guests(guests: u32) -> Self {
        Self {
            guests: Some(guests),
            ..Self::default()
        }
    }

    /// Apply the patch to a copy of `booking`, recomputing the total only when
    /// a pricing input actually changed
    pub(crate) fn apply(&self, booking: &Booking) -> Result<Booking, LedgerError> {
        let mut next = booking.clone();
        if let Some(title) = &self.title {
            next.title = title.clone();
        }
        if let Some(location) = &self.location {
            next.location = location.clone();
        }
        if let Some(guests) = self.guests {
            next.guests = guests;
        }
        if let Some(images) = &self.images {
            next.images = images.clone();
        }

        match &mut next.kind {
            BookingKind::Property {
                start_date,
                end_date,
                price_per_night,
            } => {
                if self.rental_days.is_some() {
                    return Err(LedgerError::validation(
                        "rental days only apply to car bookings",
                    ));
                }
                if let Some(start) = self.start_date {
                    *start_date = start;
                }
                if let Some(end) = self.end_date {
                    *end_date = end;
                }
                if let Some(price) = self.price {
                    *price_per_night = price;
                }
            }
            BookingKind::Car {
                pickup_date,
                rental_days,
                price_per_day,
            } => {
                if self.end_date.is_some() {
                    return Err(LedgerError::validation(
                        "end date only applies to property bookings",
                    ));
                }
                if let Some(start) = self.start_date {
                    *pickup_date = Some(start);
                }
                if let Some(days) = self.rental_days {
                    *rental_days = days;
                }
                if let Some(price) = self.price {
                    *price_per_day = price;
                }
            }
        }

        next.validate()?;
        if pricing_changed(&booking.kind, &next.kind) {
            next.total = next.kind.derived_total()?;
        }
        Ok(next)
    }
}

fn pricing_changed(before: &BookingKind, after: &BookingKind) -> bool {
    match (before, after) {
        (
            BookingKind::Property {
                start_date: s0,
                end_date: e0,
                price_per_night: p0,
            },
            BookingKind::Property {
                start_date: s1,
                end_date: e1,
                price_per_night: p1,
            },
        ) => s0 != s1 || e0 != e1 || p0 != p1,
        (
            BookingKind::Car {
                rental_days: d0,
                price_per_day: p0,
                ..
            },
            BookingKind::Car {
                rental_days: d1,
                price_per_day: p1,
                ..
            },
        ) => d0 != d1 || p0 != p1,
        _ => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn villa() -> Booking {
        Booking {
            id: BookingId::new("bk_1"),
            title: "Luxury Beachfront Villa".into(),
            location: "Goa, India".into(),
            item_id: None,
            guests: 4,
            images: vec!["/assets/villa1.jpg".into()],
            total: 32000,
            kind: BookingKind::Property {
                start_date: date("2025-11-15"),
                end_date: date("2025-11-20"),
                price_per_night: 6400,
            },
        }
    }

    #[test]
    fn deserializes_legacy_record_shape() {
        let raw = r#"{
            "id": 1731600000000,
            "title": "Cozy Loft",
            "location": "San Francisco, USA",
            "guests": 2,
            "beds": 1,
            "startDate": "2025-12-01",
            "endDate": "2025-12-04",
            "price": 120,
            "total": 360,
            "images": ["/images/loft1.jpg"],
            "itemType": "property"
        }"#;

        let booking: Booking = serde_json::from_str(raw).unwrap();
        assert_eq!(booking.id.as_str(), "1731600000000");
        assert_eq!(booking.unit_price(), 120);
        assert_eq!(booking.nights(), 3);
        assert_eq!(booking.item_type(), ItemType::Property);
    }

    #[test]
    fn serializes_with_item_type_tag() {
        let value = serde_json::to_value(villa()).unwrap();
        assert_eq!(value["itemType"], "property");
        assert_eq!(value["startDate"], "2025-11-15");
        assert_eq!(value["pricePerNight"], 6400);
        assert!(value.get("itemId").is_none());
    }

    #[test]
    fn car_end_date_counts_rental_days() {
        let car = Booking {
            kind: BookingKind::Car {
                pickup_date: Some(date("2025-11-01")),
                rental_days: 3,
                price_per_day: 50,
            },
            ..villa()
        };
        assert_eq!(car.end_date(), Some(date("2025-11-04")));
        assert_eq!(car.nights(), 0);
        assert_eq!(car.kind.derived_total(), Ok(150));
    }

    #[test]
    fn patch_recomputes_total_when_dates_change() {
        let patch = BookingPatch::dates(date("2025-11-15"), date("2025-11-17"));
        let next = patch.apply(&villa()).unwrap();
        assert_eq!(next.total, 2 * 6400);
    }

    #[test]
    fn patch_keeps_supplied_total_when_only_guests_change() {
        let mut booking = villa();
        booking.total = 1;
        let next = BookingPatch::guests(2).apply(&booking).unwrap();
        assert_eq!(next.total, 1);
        assert_eq!(next.guests, 2);
    }

    #[test]
    fn patch_rejects_price_that_overflows_total() {
        let patch = BookingPatch {
            price: Some(u64::MAX / 2),
            ..BookingPatch::default()
        };
        assert_eq!(
            patch.apply(&villa()),
            Err(LedgerError::validation("total overflows"))
        );
    }

    #[test]
    fn patch_rejects_inverted_dates() {
        let patch = BookingPatch::dates(date("2025-11-20"), date("2025-11-20"));
        assert!(matches!(
            patch.apply(&villa()),
            Err(LedgerError::Validation(_))
        ));
    }

    #[test]
    fn patch_rejects_end_date_on_car() {
        let car = Booking {
            kind: BookingKind::Car {
                pickup_date: None,
                rental_days: 2,
                price_per_day: 50,
            },
            ..villa()
        };
        let patch = BookingPatch {
            end_date: Some(date("2025-11-20")),
            ..BookingPatch::default()
        };
        assert!(patch.apply(&car).is_err());
    }

    #[test]
    fn submission_requires_fields() {
        let submission = PropertySubmission {
            title: "Treehouse".into(),
            location: "".into(),
            price: Some(900),
            image: "/assets/tree.jpg".into(),
            ..PropertySubmission::default()
        };
        assert!(NewBooking::from_submission(&submission, date("2025-11-01")).is_err());
    }

    #[test]
    fn submission_books_a_week_from_today() {
        let submission = PropertySubmission {
            title: "Treehouse".into(),
            location: "Coorg, India".into(),
            price: Some(900),
            image: "/assets/tree.jpg".into(),
            guests: 0,
            ..PropertySubmission::default()
        };
        let draft = NewBooking::from_submission(&submission, date("2025-11-01")).unwrap();
        assert_eq!(draft.guests, 1);
        assert_eq!(draft.total, Some(900));
        assert_eq!(
            draft.kind,
            BookingKind::Property {
                start_date: date("2025-11-01"),
                end_date: date("2025-11-08"),
                price_per_night: 900,
            }
        );
    }
}
