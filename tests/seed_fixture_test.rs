use rental_store::{
    InMemoryRentalStore,
    MemorySeed,
    NewUser,
    PropertyFilter,
    RentalDataStore,
    DEFAULT_LIMIT,
};

const SEED_PATH: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/database/seeds/memory_seed.json");

// Test that the bundled fixture loads and keeps its ids
#[tokio::test]
async fn test_bundled_seed_loads() {
    let store = InMemoryRentalStore::from_json_file(SEED_PATH).unwrap();

    let eva = store.get_user_with_id(1).await.unwrap().unwrap();
    assert_eq!(eva.email, "sebastianguerra@ymail.com");

    let listings = store.get_all_properties(&PropertyFilter::default(), DEFAULT_LIMIT).await.unwrap();
    let ids: Vec<i32> = listings.iter().map(|l| l.property.id).collect();

    // Property 3 has no reviews
    assert_eq!(ids, vec![2, 1]);
    assert_eq!(listings[1].average_rating, Some(3.5));
}

#[tokio::test]
async fn test_seeded_ids_continue_sequence() {
    let store = InMemoryRentalStore::from_json_file(SEED_PATH).unwrap();

    let user = store.add_user(NewUser::new("New", "new@x.com", "p")).await.unwrap();

    assert_eq!(user.id, 4);
}

#[tokio::test]
async fn test_seeded_reservations_for_guest() {
    let store = InMemoryRentalStore::from_json_file(SEED_PATH).unwrap();

    let rows = store.get_all_reservations(3, DEFAULT_LIMIT).await.unwrap();
    let reservation_ids: Vec<i32> = rows.iter().map(|r| r.reservation.id).collect();

    assert_eq!(reservation_ids, vec![1, 2]);
}

#[test]
fn test_seed_with_unknown_owner_is_rejected() {
    let seed: MemorySeed = serde_json
        ::from_str(
            r#"{
                "properties": [{
                    "id": 1, "owner_id": 9, "title": "Orphan", "description": "",
                    "thumbnail_photo_url": "", "cover_photo_url": "", "cost_per_night": 100,
                    "street": "", "city": "", "province": "", "post_code": "", "country": "",
                    "parking_spaces": 0, "number_of_bathrooms": 0, "number_of_bedrooms": 0,
                    "active": true
                }]
            }"#
        )
        .unwrap();

    assert!(InMemoryRentalStore::seeded(seed).is_err());
}

#[test]
fn test_missing_seed_file_is_an_error() {
    let result = InMemoryRentalStore::from_json_file("database/seeds/does_not_exist.json");

    assert!(result.is_err());
}

#[test]
fn test_seed_with_repeated_user_id_is_rejected() {
    let seed: MemorySeed = serde_json
        ::from_str(
            r#"{
                "users": [
                    { "id": 1, "name": "A", "email": "a@x.com", "password": "p" },
                    { "id": 1, "name": "B", "email": "b@x.com", "password": "p" }
                ]
            }"#
        )
        .unwrap();

    let err = InMemoryRentalStore::seeded(seed).err().unwrap();

    assert!(err.to_string().contains("Duplicate user id"));
}

#[test]
fn test_seed_with_repeated_property_id_is_rejected() {
    let mut seed = load_bundled_seed();
    let copy = seed.properties[0].clone();
    seed.properties.push(copy);

    assert!(InMemoryRentalStore::seeded(seed).is_err());
}

#[test]
fn test_seed_review_requires_reservation() {
    let mut seed = load_bundled_seed();
    seed.reviews[0].reservation_id = 99;

    assert!(InMemoryRentalStore::seeded(seed).is_err());
}

#[test]
fn test_seed_review_rating_out_of_range_is_rejected() {
    let mut seed = load_bundled_seed();
    seed.reviews[0].rating = 9;

    assert!(InMemoryRentalStore::seeded(seed).is_err());
}

fn load_bundled_seed() -> MemorySeed {
    let content = std::fs::read_to_string(SEED_PATH).unwrap();
    serde_json::from_str(&content).unwrap()
}
