use std::sync::Arc;

use chrono::NaiveDate;
use stays_ledger::models::{BookingKind, ListingId};
use stays_ledger::sources::MockListings;
use stays_ledger::storage::{JsonDirStore, KeyValueStore, MemoryStore, BOOKINGS_KEY};
use stays_ledger::view::{compute, Tab};
use stays_ledger::{
    Booking, BookingId, BookingLedger, BookingPatch, LedgerError, NewBooking, PersistenceMirror,
    StorageError, ViewQuery,
};
use tempfile::tempdir;

fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

fn villa() -> NewBooking {
    NewBooking {
        id: None,
        title: "Luxury Beachfront Villa".into(),
        location: "Goa, India".into(),
        item_id: None,
        guests: 4,
        images: vec!["/assets/villa1.jpg".into()],
        total: None,
        kind: BookingKind::Property {
            start_date: date("2025-11-15"),
            end_date: date("2025-11-20"),
            price_per_night: 6400,
        },
    }
}

/// Store whose writes always fail, like a full browser quota
struct FullStore;

impl KeyValueStore for FullStore {
    fn get(&self, _key: &str) -> Result<Option<String>, StorageError> {
        Ok(None)
    }

    fn set(&self, _key: &str, _value: &str) -> Result<(), StorageError> {
        Err(std::io::Error::new(std::io::ErrorKind::Other, "quota exceeded").into())
    }

    fn remove(&self, _key: &str) -> Result<(), StorageError> {
        Err(std::io::Error::new(std::io::ErrorKind::Other, "quota exceeded").into())
    }
}

#[test]
fn inserted_booking_is_found_unchanged_apart_from_id() {
    let mut ledger = BookingLedger::in_memory();
    let draft = villa();
    let stored = ledger.add(draft.clone()).unwrap();

    let found = ledger.find_by_id(&stored.id).expect("booking present");
    let mut expected: NewBooking = found.clone().into();
    expected.id = None;
    expected.total = None;
    assert_eq!(expected, draft);
    assert_eq!(found.total, 5 * 6400);
}

#[test]
fn total_amount_tracks_every_mutation() {
    let listings = MockListings::new();
    let mut ledger = BookingLedger::seeded(None);
    let check = |ledger: &BookingLedger| {
        let expected: u64 = ledger.iter().map(|booking| booking.total).sum();
        assert_eq!(ledger.total_amount(), expected);
    };

    let mut ids = Vec::new();
    for (offset, property) in listings.property_list().iter().enumerate() {
        let start = date("2025-12-20") + chrono::Duration::days(offset as i64);
        let draft = NewBooking::for_property(property, start, start + chrono::Duration::days(2), 2);
        ids.push(ledger.add(draft).unwrap().id);
        check(&ledger);
    }
    for car in listings.car_list() {
        ids.push(ledger.add(NewBooking::for_car(&car, None, 3)).unwrap().id);
        check(&ledger);
    }

    for (step, id) in ids.iter().enumerate() {
        if step % 2 == 0 {
            let patch = BookingPatch {
                price: Some(10 * (step as u64 + 1)),
                ..BookingPatch::default()
            };
            ledger.update(id, &patch).unwrap();
        } else {
            ledger.remove(id).unwrap();
        }
        check(&ledger);
    }

    ledger.remove_for_item(&ListingId::Number(1));
    check(&ledger);
}

#[test]
fn editing_dates_recomputes_total_from_nightly_price() {
    let mut ledger = BookingLedger::in_memory();
    let booking = ledger.add(villa().with_total(1)).unwrap();

    let updated = ledger
        .update(&booking.id, &BookingPatch::dates(date("2025-11-16"), date("2025-11-19")))
        .unwrap();
    assert_eq!(updated.total, 3 * 6400);
    assert_eq!(ledger.find_by_id(&booking.id), Some(&updated));
}

#[test]
fn removing_unknown_id_changes_nothing() {
    let mut ledger = BookingLedger::seeded(None);
    let before = ledger.snapshot();

    let result = ledger.remove(&BookingId::new("bk_missing"));
    assert_eq!(result, Err(LedgerError::NotFound(BookingId::new("bk_missing"))));
    assert_eq!(ledger.snapshot(), before);
}

#[test]
fn nights_exclude_cars_and_removed_stays() {
    let mut ledger = BookingLedger::in_memory();
    let a = ledger.add(villa()).unwrap();
    let car = MockListings::new().car_list().remove(0);
    ledger.add(NewBooking::for_car(&car, Some(date("2025-11-15")), 4)).unwrap();

    assert_eq!(ledger.total_nights(), 5);
    ledger.remove(&a.id).unwrap();
    assert_eq!(ledger.total_nights(), 0);
    assert_eq!(ledger.len(), 1);
}

#[test]
fn past_booking_moves_out_of_upcoming() {
    let mut ledger = BookingLedger::in_memory();
    let booking = ledger.add(villa()).unwrap();
    let today = date("2025-11-25");

    let upcoming = compute(ledger.bookings(), &ViewQuery::default().tab(Tab::Upcoming), today);
    let past = compute(ledger.bookings(), &ViewQuery::default().tab(Tab::Past), today);

    assert!(upcoming.items.iter().all(|b: &Booking| b.id != booking.id));
    assert_eq!(past.items.len(), 1);
    assert_eq!(past.items[0].id, booking.id);
}

#[test]
fn mirror_survives_reload_through_json_files() {
    let dir = tempdir().expect("tempdir");
    let store: Arc<dyn KeyValueStore> = Arc::new(JsonDirStore::new(dir.path()).expect("store"));

    let added = {
        let mut ledger = BookingLedger::seeded(Some(PersistenceMirror::new(store.clone())));
        let added = ledger.add(villa()).unwrap();
        ledger.remove(&BookingId::new("bk_3")).unwrap();
        added
    };

    let path = dir.path().join(format!("{BOOKINGS_KEY}.json"));
    assert!(path.exists());
    let raw = std::fs::read_to_string(&path).unwrap();
    assert!(raw.contains("\"itemType\":\"property\""));

    let restored = BookingLedger::restore(PersistenceMirror::new(store));
    let ids: Vec<_> = restored.iter().map(|b| b.id.as_str().to_string()).collect();
    assert_eq!(ids, [added.id.as_str(), "bk_1", "bk_2"]);
}

#[test]
fn clear_empties_ledger_and_storage() {
    let store = Arc::new(MemoryStore::new());
    let mut ledger = BookingLedger::seeded(Some(PersistenceMirror::new(store.clone())));

    ledger.clear();
    assert!(ledger.is_empty());
    assert_eq!(ledger.total_amount(), 0);
    assert_eq!(ledger.total_nights(), 0);
    assert_eq!(store.get(BOOKINGS_KEY).unwrap(), None);
}

#[test]
fn failing_storage_does_not_fail_mutations() {
    let mut ledger = BookingLedger::seeded(Some(PersistenceMirror::new(Arc::new(FullStore))));

    let booking = ledger.add(villa()).unwrap();
    ledger.update(&booking.id, &BookingPatch::guests(2)).unwrap();
    ledger.remove(&BookingId::new("bk_1")).unwrap();
    ledger.clear();
    assert!(ledger.is_empty());
}

#[test]
fn duplicate_caller_id_is_rejected() {
    let mut ledger = BookingLedger::seeded(None);
    let result = ledger.add(villa().with_id("bk_1"));
    assert_eq!(result, Err(LedgerError::DuplicateId(BookingId::new("bk_1"))));
    assert_eq!(ledger.len(), 3);
}
