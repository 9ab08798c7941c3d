use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::str::FromStr;
use thiserror::Error;

use crate::models::Booking;

/// Bookings shown per page
pub const DEFAULT_PAGE_SIZE: usize = 8;

/// Unrecognized tab or sort name
#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown {kind}: {value}")]
pub struct UnknownOption {
    kind: &'static str,
    value: String,
}

/// Time window of the bookings list
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tab {
    #[default]
    Upcoming,
    Past,
    All,
}

impl Tab {
    /// Whether `booking` belongs in this window, comparing calendar dates only
    pub fn admits(self, booking: &Booking, today: NaiveDate) -> bool {
        match self {
            Self::Upcoming => booking.start_date().map_or(true, |start| start >= today),
            Self::Past => booking.end_date().is_some_and(|end| end < today),
            Self::All => true,
        }
    }
}

impl FromStr for Tab {
    type Err = UnknownOption;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "upcoming" => Ok(Self::Upcoming),
            "past" => Ok(Self::Past),
            "all" => Ok(Self::All),
            other => Err(UnknownOption {
                kind: "tab",
                value: other.to_string(),
            }),
        }
    }
}

/// Ordering of the bookings list
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
    #[default]
    DateDesc,
    DateAsc,
    PriceDesc,
    PriceAsc,
}

impl SortKey {
    fn compare(self, a: &Booking, b: &Booking) -> Ordering {
        // Undated bookings compare as the oldest
        match self {
            Self::DateDesc => b.start_date().cmp(&a.start_date()),
            Self::DateAsc => a.start_date().cmp(&b.start_date()),
            Self::PriceDesc => b.unit_price().cmp(&a.unit_price()),
            Self::PriceAsc => a.unit_price().cmp(&b.unit_price()),
        }
    }
}

impl FromStr for SortKey {
    type Err = UnknownOption;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "date_desc" => Ok(Self::DateDesc),
            "date_asc" => Ok(Self::DateAsc),
            "price_desc" => Ok(Self::PriceDesc),
            "price_asc" => Ok(Self::PriceAsc),
            other => Err(UnknownOption {
                kind: "sort key",
                value: other.to_string(),
            }),
        }
    }
}

/// Everything the bookings page lets the user pick
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewQuery {
    pub tab: Tab,
    pub text: String,
    pub sort: SortKey,
    /// 1-based page index, clamped when the result shrinks
    pub page: usize,
    pub page_size: usize,
}

impl Default for ViewQuery {
    fn default() -> Self {
        Self {
            tab: Tab::default(),
            text: String::new(),
            sort: SortKey::default(),
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl ViewQuery {
    pub fn tab(mut self, tab: Tab) -> Self {
        self.tab = tab;
        self
    }

    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    pub fn sort(mut self, sort: SortKey) -> Self {
        self.sort = sort;
        self
    }

    pub fn page(mut self, page: usize) -> Self {
        self.page = page;
        self
    }

    pub fn page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size;
        self
    }
}

/// One page of the filtered, sorted bookings
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingPage {
    pub items: Vec<Booking>,
    /// Page actually shown after clamping
    pub page: usize,
    pub total_pages: usize,
    pub total_matches: usize,
}

pub fn filter_by_tab<'a>(
    bookings: impl IntoIterator<Item = &'a Booking>,
    tab: Tab,
    today: NaiveDate,
) -> Vec<&'a Booking> {
    bookings
        .into_iter()
        .filter(|booking| tab.admits(booking, today))
        .collect()
}

/// Case-insensitive substring match on title or location
pub fn filter_by_text<'a>(
    bookings: impl IntoIterator<Item = &'a Booking>,
    text: &str,
) -> Vec<&'a Booking> {
    let needle = text.trim().to_lowercase();
    bookings
        .into_iter()
        .filter(|booking| {
            needle.is_empty()
                || booking.title.to_lowercase().contains(&needle)
                || booking.location.to_lowercase().contains(&needle)
        })
        .collect()
}

/// Stable sort; ties keep ledger order
pub fn sort_bookings(bookings: &mut [Booking], key: SortKey) {
    bookings.sort_by(|a, b| key.compare(a, b));
}

pub fn paginate(bookings: Vec<Booking>, page: usize, page_size: usize) -> BookingPage {
    let page_size = page_size.max(1);
    let total_matches = bookings.len();
    let total_pages = total_matches.div_ceil(page_size).max(1);
    let page = page.clamp(1, total_pages);

    let items = bookings
        .into_iter()
        .skip((page - 1) * page_size)
        .take(page_size)
        .collect();

    BookingPage {
        items,
        page,
        total_pages,
        total_matches,
    }
}

/// Project a ledger snapshot into the page the user is looking at
pub fn compute(bookings: &[Booking], query: &ViewQuery, today: NaiveDate) -> BookingPage {
    let in_window = filter_by_tab(bookings, query.tab, today);
    let mut matches: Vec<Booking> = filter_by_text(in_window, &query.text)
        .into_iter()
        .cloned()
        .collect();
    sort_bookings(&mut matches, query.sort);
    paginate(matches, query.page, query.page_size)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::starter_bookings;
    use crate::models::{BookingId, BookingKind};

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn car(id: &str, pickup: Option<&str>, price: u64) -> Booking {
        Booking {
            id: BookingId::new(id),
            title: "Ford Mustang".into(),
            location: "Car rental".into(),
            item_id: None,
            guests: 1,
            images: vec!["/images/car3.jpg".into()],
            total: price * 2,
            kind: BookingKind::Car {
                pickup_date: pickup.map(date),
                rental_days: 2,
                price_per_day: price,
            },
        }
    }

    #[test]
    fn past_and_upcoming_split_on_today() {
        let bookings = starter_bookings();
        let today = date("2025-11-25");

        let past = filter_by_tab(&bookings, Tab::Past, today);
        assert_eq!(past.len(), 1);
        assert_eq!(past[0].id.as_str(), "bk_1");

        let upcoming = filter_by_tab(&bookings, Tab::Upcoming, today);
        assert!(upcoming.iter().all(|booking| booking.id.as_str() != "bk_1"));
        assert_eq!(upcoming.len(), 2);
    }

    #[test]
    fn undated_booking_is_upcoming_never_past() {
        let bookings = vec![car("c", None, 50)];
        let today = date("2025-11-25");
        assert_eq!(filter_by_tab(&bookings, Tab::Upcoming, today).len(), 1);
        assert!(filter_by_tab(&bookings, Tab::Past, today).is_empty());
    }

    #[test]
    fn text_matches_title_or_location_ignoring_case() {
        let bookings = starter_bookings();
        assert_eq!(filter_by_text(&bookings, "  GOA ").len(), 1);
        assert_eq!(filter_by_text(&bookings, "cottage").len(), 1);
        assert_eq!(filter_by_text(&bookings, "").len(), 3);
        assert!(filter_by_text(&bookings, "paris").is_empty());
    }

    #[test]
    fn sorts_by_date_and_price() {
        let mut bookings = starter_bookings();
        sort_bookings(&mut bookings, SortKey::DateAsc);
        let ids: Vec<_> = bookings.iter().map(|b| b.id.as_str()).collect();
        assert_eq!(ids, ["bk_1", "bk_2", "bk_3"]);

        sort_bookings(&mut bookings, SortKey::PriceDesc);
        let prices: Vec<_> = bookings.iter().map(Booking::unit_price).collect();
        assert_eq!(prices, [6400, 6000, 4500]);
    }

    #[test]
    fn undated_bookings_sort_as_oldest() {
        let mut bookings = vec![car("undated", None, 50), car("dated", Some("2025-01-01"), 50)];
        sort_bookings(&mut bookings, SortKey::DateDesc);
        assert_eq!(bookings[1].id.as_str(), "undated");
    }

    #[test]
    fn price_ties_keep_ledger_order() {
        let mut bookings = vec![car("first", None, 50), car("second", None, 50)];
        sort_bookings(&mut bookings, SortKey::PriceAsc);
        assert_eq!(bookings[0].id.as_str(), "first");
    }

    #[test]
    fn page_is_clamped_to_available_range() {
        let bookings: Vec<_> = (0..10).map(|i| car(&format!("c{i}"), None, 50)).collect();

        let last = paginate(bookings.clone(), 5, 8);
        assert_eq!((last.page, last.total_pages, last.items.len()), (2, 2, 2));

        let first = paginate(bookings, 0, 8);
        assert_eq!((first.page, first.items.len()), (1, 8));

        let empty = paginate(Vec::new(), 3, 8);
        assert_eq!((empty.page, empty.total_pages, empty.total_matches), (1, 1, 0));
    }

    #[test]
    fn compute_combines_all_steps() {
        let query = ViewQuery::default().tab(Tab::All).text("india").sort(SortKey::PriceAsc);
        let page = compute(&starter_bookings(), &query, date("2025-11-25"));
        let titles: Vec<_> = page.items.iter().map(|b| b.title.as_str()).collect();
        assert_eq!(titles, ["Modern Apartment Downtown", "Luxury Beachfront Villa"]);
        assert_eq!(page.total_matches, 2);
    }

    #[test]
    fn parses_tab_and_sort_names() {
        assert_eq!("past".parse::<Tab>(), Ok(Tab::Past));
        assert_eq!("price_asc".parse::<SortKey>(), Ok(SortKey::PriceAsc));
        assert!("later".parse::<Tab>().is_err());
    }
}
