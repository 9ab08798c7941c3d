use chrono::NaiveDate;

use crate::models::{Booking, BookingId, BookingKind};

fn day(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap_or(NaiveDate::MIN)
}

fn images(paths: &[&str]) -> Vec<String> {
    paths.iter().map(|path| path.to_string()).collect()
}

/// Demo trips every fresh session starts with
pub fn starter_bookings() -> Vec<Booking> {
    vec![
        Booking {
            id: BookingId::new("bk_1"),
            title: "Luxury Beachfront Villa".to_string(),
            location: "Goa, India".to_string(),
            item_id: None,
            guests: 4,
            images: images(&[
                "/assets/villa1.jpg",
                "/assets/villa2.jpg",
                "/assets/villa3.jpg",
            ]),
            total: 32_000,
            kind: BookingKind::Property {
                start_date: day(2025, 11, 15),
                end_date: day(2025, 11, 20),
                price_per_night: 6_400,
            },
        },
        Booking {
            id: BookingId::new("bk_2"),
            title: "Mountain View Cottage".to_string(),
            location: "Manali, Himachal Pradesh".to_string(),
            item_id: None,
            guests: 2,
            images: images(&["/assets/hotel1.jpg", "/assets/hotel2.jpg"]),
            total: 18_000,
            kind: BookingKind::Property {
                start_date: day(2025, 12, 1),
                end_date: day(2025, 12, 4),
                price_per_night: 6_000,
            },
        },
        Booking {
            id: BookingId::new("bk_3"),
            title: "Modern Apartment Downtown".to_string(),
            location: "Bangalore, India".to_string(),
            item_id: None,
            guests: 3,
            images: images(&["/assets/apartment1.jpg", "/assets/apartment2.jpg"]),
            total: 18_000,
            kind: BookingKind::Property {
                start_date: day(2025, 12, 10),
                end_date: day(2025, 12, 14),
                price_per_night: 4_500,
            },
        },
    ]
}
