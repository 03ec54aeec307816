//! Contract tests for the PostgreSQL store.
//!
//! These run only when `TEST_DATABASE_URL` points at a scratch database; the
//! schema is applied once per test binary.

use std::sync::atomic::{ AtomicU32, Ordering };
use std::time::{ SystemTime, UNIX_EPOCH };

use sqlx::postgres::PgPoolOptions;
use sqlx::{ Executor, PgPool };
use tokio::sync::OnceCell;

use rental_store::{
    NewProperty,
    NewUser,
    PgRentalStore,
    PropertyFilter,
    RentalDataStore,
    StoreError,
    DEFAULT_LIMIT,
};

const SCHEMA: &str = include_str!("../database/schema/schema.sql");

static SCHEMA_APPLIED: OnceCell<()> = OnceCell::const_new();
static COUNTER: AtomicU32 = AtomicU32::new(0);

async fn test_pool() -> Option<PgPool> {
    let url = match std::env::var("TEST_DATABASE_URL") {
        Ok(url) => url,
        Err(_) => {
            println!("TEST_DATABASE_URL not set, skipping");
            return None;
        }
    };

    let pool = PgPoolOptions::new()
        .max_connections(2)
        .connect(&url).await
        .expect("Failed to connect to test database");

    SCHEMA_APPLIED.get_or_init(|| async {
        pool.execute(SCHEMA).await.expect("Failed to apply schema");
    }).await;

    Some(pool)
}

/// An email no other test run has used
fn unique_email(tag: &str) -> String {
    let nanos = SystemTime::now().duration_since(UNIX_EPOCH).unwrap().as_nanos();
    let n = COUNTER.fetch_add(1, Ordering::SeqCst);
    format!("{}-{}-{}@test.local", tag, nanos, n)
}

fn new_property(owner_id: i32, city: &str, cost_per_night: i32) -> NewProperty {
    NewProperty {
        owner_id,
        title: "Test listing".to_string(),
        description: "description".to_string(),
        thumbnail_photo_url: "https://example.com/thumb.jpg".to_string(),
        cover_photo_url: "https://example.com/cover.jpg".to_string(),
        cost_per_night,
        street: "1 Main St".to_string(),
        city: city.to_string(),
        province: "BC".to_string(),
        post_code: "V5K 0A1".to_string(),
        country: "Canada".to_string(),
        parking_spaces: 1,
        number_of_bathrooms: 1,
        number_of_bedrooms: 2,
    }
}

// Scenario: add Ana, then read her back by id and by email
#[tokio::test]
async fn test_add_user_round_trip() {
    let Some(pool) = test_pool().await else { return };
    let store = PgRentalStore::new(pool);
    let email = unique_email("ana");

    let ana = store.add_user(NewUser::new("Ana", email.clone(), "p")).await.unwrap();

    assert_eq!(store.get_user_with_id(ana.id).await.unwrap(), Some(ana.clone()));
    assert_eq!(store.get_user_with_email(&email).await.unwrap().map(|u| u.id), Some(ana.id));
}

#[tokio::test]
async fn test_unknown_email_is_none() {
    let Some(pool) = test_pool().await else { return };
    let store = PgRentalStore::new(pool);

    let user = store.get_user_with_email(&unique_email("missing")).await.unwrap();

    assert_eq!(user, None);
}

#[tokio::test]
async fn test_duplicate_email_reports_duplicate() {
    let Some(pool) = test_pool().await else { return };
    let store = PgRentalStore::new(pool);
    let email = unique_email("dup");

    store.add_user(NewUser::new("First", email.clone(), "p")).await.unwrap();
    let err = store.add_user(NewUser::new("Second", email, "p")).await.unwrap_err();

    assert!(matches!(err, StoreError::Duplicate { .. }), "got {:?}", err);
}

#[tokio::test]
async fn test_unknown_owner_reports_missing_reference() {
    let Some(pool) = test_pool().await else { return };
    let store = PgRentalStore::new(pool);

    let err = store.add_property(new_property(-1, "Nowhere", 100)).await.unwrap_err();

    assert!(matches!(err, StoreError::MissingReference { .. }), "got {:?}", err);
}

#[tokio::test]
async fn test_listing_limit_and_order() {
    let Some(pool) = test_pool().await else { return };
    let store = PgRentalStore::new(pool);

    let listings = store.get_all_properties(&PropertyFilter::default(), 5).await.unwrap();

    assert!(listings.len() <= 5);
    assert!(
        listings.windows(2).all(|pair| pair[0].property.cost_per_night <= pair[1].property.cost_per_night)
    );
}

#[tokio::test]
async fn test_price_range_filter() {
    let Some(pool) = test_pool().await else { return };
    let store = PgRentalStore::new(pool);
    let filter = PropertyFilter {
        minimum_price_per_night: Some(100),
        maximum_price_per_night: Some(200),
        include_unreviewed: true,
        ..Default::default()
    };

    let listings = store.get_all_properties(&filter, 50).await.unwrap();

    assert!(
        listings
            .iter()
            .all(|l| (10_000..=20_000).contains(&l.property.cost_per_night))
    );
}

#[tokio::test]
async fn test_new_property_is_listed_for_owner() {
    let Some(pool) = test_pool().await else { return };
    let store = PgRentalStore::new(pool);
    let owner = store.add_user(NewUser::new("Owner", unique_email("owner"), "p")).await.unwrap();

    let property = store.add_property(new_property(owner.id, "Vancouver", 175)).await.unwrap();
    assert_eq!(property.cost_per_night, 17_500);

    let reviewed_only = PropertyFilter {
        owner_id: Some(owner.id),
        ..Default::default()
    };
    assert!(store.get_all_properties(&reviewed_only, DEFAULT_LIMIT).await.unwrap().is_empty());

    let filter = PropertyFilter {
        owner_id: Some(owner.id),
        city: Some("Vancouver".to_string()),
        include_unreviewed: true,
        ..Default::default()
    };
    let listings = store.get_all_properties(&filter, DEFAULT_LIMIT).await.unwrap();

    assert_eq!(listings.len(), 1);
    assert_eq!(listings[0].property, property);
    assert_eq!(listings[0].average_rating, None);
}

#[tokio::test]
async fn test_reviewed_reservation_is_listed() {
    let Some(pool) = test_pool().await else { return };
    let store = PgRentalStore::new(pool.clone());
    let owner = store.add_user(NewUser::new("Owner", unique_email("host"), "p")).await.unwrap();
    let guest = store.add_user(NewUser::new("Guest", unique_email("guest"), "p")).await.unwrap();
    let property = store.add_property(new_property(owner.id, "Tofino", 90)).await.unwrap();

    let reservation_id: i32 = sqlx
        ::query_scalar(
            "INSERT INTO reservations (start_date, end_date, property_id, guest_id)
             VALUES ('2023-06-01', '2023-06-05', $1, $2) RETURNING id"
        )
        .bind(property.id)
        .bind(guest.id)
        .fetch_one(&pool).await
        .unwrap();

    // Not yet reviewed, so the inner join hides it
    assert!(store.get_all_reservations(guest.id, DEFAULT_LIMIT).await.unwrap().is_empty());

    sqlx
        ::query(
            "INSERT INTO property_reviews (guest_id, property_id, reservation_id, rating)
             VALUES ($1, $2, $3, 4)"
        )
        .bind(guest.id)
        .bind(property.id)
        .bind(reservation_id)
        .execute(&pool).await
        .unwrap();

    let rows = store.get_all_reservations(guest.id, DEFAULT_LIMIT).await.unwrap();

    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].reservation.id, reservation_id);
    assert_eq!(rows[0].property.property.id, property.id);
    assert_eq!(rows[0].property.average_rating, Some(4.0));
}

#[tokio::test]
async fn test_guest_without_reservations() {
    let Some(pool) = test_pool().await else { return };
    let store = PgRentalStore::new(pool);
    let guest = store.add_user(NewUser::new("Guest", unique_email("idle"), "p")).await.unwrap();

    assert!(store.get_all_reservations(guest.id, DEFAULT_LIMIT).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_schema_rejects_out_of_range_rating() {
    let Some(pool) = test_pool().await else { return };
    let store = PgRentalStore::new(pool.clone());
    let owner = store.add_user(NewUser::new("Owner", unique_email("rater-host"), "p")).await.unwrap();
    let guest = store.add_user(NewUser::new("Guest", unique_email("rater"), "p")).await.unwrap();
    let property = store.add_property(new_property(owner.id, "Whistler", 120)).await.unwrap();

    let reservation_id: i32 = sqlx
        ::query_scalar(
            "INSERT INTO reservations (start_date, end_date, property_id, guest_id)
             VALUES ('2023-07-01', '2023-07-03', $1, $2) RETURNING id"
        )
        .bind(property.id)
        .bind(guest.id)
        .fetch_one(&pool).await
        .unwrap();

    let result = sqlx
        ::query(
            "INSERT INTO property_reviews (guest_id, property_id, reservation_id, rating)
             VALUES ($1, $2, $3, 99)"
        )
        .bind(guest.id)
        .bind(property.id)
        .bind(reservation_id)
        .execute(&pool).await;

    assert!(result.is_err());
}
