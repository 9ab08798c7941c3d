use std::path::PathBuf;
use std::sync::Arc;

use chrono::{Duration, Local};
use stays_ledger::models::BookingPatch;
use stays_ledger::sources::{ApiClient, BookingSync, ListingCatalog, ListingSource, ViewScope};
use stays_ledger::storage::{JsonDirStore, KeyValueStore};
use stays_ledger::view::{self, format_inr};
use stays_ledger::{AppConfig, BookingLedger, NewBooking, PersistenceMirror, Tab, ViewQuery};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    info!("🏡 Stays Ledger");
    info!("==============");

    let config_path = std::env::var_os("STAYS_CONFIG").map(PathBuf::from);
    let config = AppConfig::load(config_path.as_deref())?;

    let store: Arc<dyn KeyValueStore> = Arc::new(JsonDirStore::new(&config.data_dir)?);
    let mirror = PersistenceMirror::with_key(store.clone(), config.storage_key.clone());
    let mut ledger = if config.restore_from_mirror {
        BookingLedger::restore(mirror)
    } else {
        BookingLedger::seeded(Some(mirror))
    };

    let (catalog, sync) = if config.offline {
        (ListingCatalog::offline(), BookingSync::offline())
    } else {
        let client = ApiClient::with_settings(&config.api)?.with_token_store(store.clone());
        info!("Using {} at {}", client.source_name(), client.base_url());
        let client = Arc::new(client);
        (
            ListingCatalog::new(client.clone(), config.api.timeout),
            BookingSync::new(client, config.api.timeout),
        )
    };

    // Load listings the way the home page does
    let scope = ViewScope::new();
    let properties = scope.run(catalog.properties()).await.unwrap_or_default();
    let cars = scope.run(catalog.cars()).await.unwrap_or_default();
    info!("Found {} properties and {} cars", properties.len(), cars.len());
    let existing = sync.bookings(&ledger).await;
    info!("{} bookings on record", existing.len());

    let today = Local::now().date_naive();
    if let Some(listing) = properties.first() {
        let check_in = today + Duration::days(3);
        let draft = NewBooking::for_property(listing, check_in, check_in + Duration::days(3), 2);
        let booking = ledger.add(draft)?;
        info!("✅ Booked {} for {}", booking.title, format_inr(booking.total));

        let patch = BookingPatch::dates(check_in, check_in + Duration::days(5));
        let booking = ledger.update(&booking.id, &patch)?;
        info!("✏️ Extended stay, new total {}", format_inr(booking.total));
    }
    if let Some(car) = cars.first() {
        let booking = ledger.add(NewBooking::for_car(car, Some(today), 2))?;
        let receipt = ledger.cancel(&booking.id)?;
        info!("Cancelled {} with reference {}", receipt.booking.title, receipt.reference);
    }

    let summary = ledger.summary();
    println!(
        "{} bookings, {} nights, {} total",
        summary.total_bookings,
        summary.total_nights,
        format_inr(summary.total_amount)
    );
    println!();

    for tab in [Tab::Upcoming, Tab::Past] {
        let query = ViewQuery::default().tab(tab).page_size(config.page_size);
        let page = view::compute(ledger.bookings(), &query, today);
        println!(
            "{:?} ({} of {}, page {}/{})",
            tab,
            page.items.len(),
            page.total_matches,
            page.page,
            page.total_pages
        );
        for booking in &page.items {
            let dates = match (booking.start_date(), booking.end_date()) {
                (Some(start), Some(end)) => format!("{} → {}", start, end),
                _ => "flexible dates".to_string(),
            };
            println!("  {} · {} · {}", booking.title, booking.location, dates);
            println!("    {} guests, {}", booking.guests, format_inr(booking.total));
        }
    }

    if ledger.is_empty() {
        warn!("Ledger is empty");
    }

    Ok(())
}
