//! Tour catalog queries, booking creation and session lifecycle.

use chrono::{Duration, TimeZone, Utc};
use std::sync::Arc;
use tourbook::domain::booking::{NewBooking, TourFilter, TourSort};
use tourbook::domain::error::Error;
use tourbook::domain::model::BookingStatus;
use tourbook::storage::seed;
use tourbook::{
    AuthService, BookingService, Clock, FixedClock, MemoryBackend, RecordStore, TourCatalog,
};

fn fixed_clock() -> Arc<dyn Clock> {
    Arc::new(FixedClock(Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap()))
}

async fn seeded() -> (RecordStore, TourCatalog, BookingService) {
    let store = RecordStore::new(Arc::new(MemoryBackend::new()), fixed_clock());
    seed::initialize_data(&store).await.unwrap();
    let catalog = TourCatalog::new(store.clone());
    let bookings = BookingService::new(store.clone(), catalog.clone());
    (store, catalog, bookings)
}

fn booking_for(tour_id: i64, travelers: i64) -> NewBooking {
    NewBooking {
        name: "Jane Traveler".to_string(),
        email: "jane@example.com".to_string(),
        phone: "+30 123 456 7890".to_string(),
        tour_id,
        date: "2026-09-15".to_string(),
        travelers,
        special_requests: String::new(),
    }
}

#[tokio::test]
async fn booking_totals_price_and_snapshots_the_tour_name() {
    let (_, catalog, bookings) = seeded().await;
    let tour = catalog.get(1).await.unwrap().unwrap();

    let booking = bookings.create(booking_for(1, 3)).await.unwrap();
    assert_eq!(booking.total_price, tour.price * 3.0);
    assert_eq!(booking.tour_name, tour.name);
    assert_eq!(booking.status, BookingStatus::Pending);
    assert_eq!(booking.id, 1);
}

#[tokio::test]
async fn booking_an_unknown_tour_writes_nothing() {
    let (store, _, bookings) = seeded().await;
    let err = bookings.create(booking_for(999, 2)).await.unwrap_err();
    assert!(matches!(err, Error::NotFound(_)));
    assert!(store.read_all("bookings").await.unwrap().is_empty());
}

#[tokio::test]
async fn bookings_list_newest_first() {
    let (_, _, bookings) = seeded().await;
    bookings.create(booking_for(1, 1)).await.unwrap();
    bookings.create(booking_for(2, 2)).await.unwrap();

    let all = bookings.list().await.unwrap();
    assert_eq!(all.len(), 2);
    // Identical timestamps fall back to stored order; ids stay distinct.
    assert_ne!(all[0].id, all[1].id);
}

#[tokio::test]
async fn tour_filters_narrow_by_location_and_price() {
    let (_, catalog, _) = seeded().await;

    let filter = TourFilter {
        location: Some("greece".to_string()),
        ..Default::default()
    };
    let tours = catalog.list(&filter).await.unwrap();
    assert_eq!(tours.len(), 1);
    assert_eq!(tours[0].name, "Santorini Sunset Escape");

    let filter = TourFilter {
        max_price: Some(1500.0),
        min_price: Some(1000.0),
        ..Default::default()
    };
    let tours = catalog.list(&filter).await.unwrap();
    assert!(tours.iter().all(|t| t.price >= 1000.0 && t.price <= 1500.0));
    assert!(!tours.is_empty());
}

#[tokio::test]
async fn tour_sorts_order_by_price_and_rating() {
    let (_, catalog, _) = seeded().await;

    let filter = TourFilter { sort: Some(TourSort::PriceAsc), ..Default::default() };
    let tours = catalog.list(&filter).await.unwrap();
    assert!(tours.windows(2).all(|w| w[0].price <= w[1].price));

    let filter = TourFilter { sort: Some(TourSort::Rating), ..Default::default() };
    let tours = catalog.list(&filter).await.unwrap();
    assert!(tours.windows(2).all(|w| w[0].rating >= w[1].rating));
}

#[tokio::test]
async fn destinations_are_unique_locations() {
    let (_, catalog, _) = seeded().await;
    let destinations = catalog.destinations().await.unwrap();
    assert_eq!(destinations.len(), 4);
    let mut deduped = destinations.clone();
    deduped.dedup();
    assert_eq!(deduped, destinations);
}

#[tokio::test]
async fn register_rejects_taken_emails_and_login_checks_passwords() {
    let (store, _, _) = seeded().await;
    let auth = AuthService::new(store, fixed_clock(), 30);

    let err = auth
        .register("Someone Else", "user@library.com", "whatever", None)
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Conflict(_)));

    let (user, token) = auth.login("user@library.com", "user123").await.unwrap();
    assert_eq!(user.email, "user@library.com");
    let authed = auth.authenticate(&token).await.unwrap();
    assert_eq!(authed.id, user.id);

    let err = auth.login("user@library.com", "wrong").await.unwrap_err();
    assert!(matches!(err, Error::Unauthorized(_)));
    let err = auth.login("nobody@library.com", "user123").await.unwrap_err();
    assert!(matches!(err, Error::Unauthorized(_)));
}

#[tokio::test]
async fn sessions_expire() {
    let (store, _, _) = seeded().await;
    let issued_at = Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap();

    let auth = AuthService::new(store.clone(), Arc::new(FixedClock(issued_at)), 30);
    let (_, token) = auth.login("user@library.com", "user123").await.unwrap();

    // Same store, a clock 31 days later.
    let later = AuthService::new(
        store,
        Arc::new(FixedClock(issued_at + Duration::days(31))),
        30,
    );
    let err = later.authenticate(&token).await.unwrap_err();
    assert!(matches!(err, Error::Unauthorized(_)));
}
