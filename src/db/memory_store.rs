use anyhow::{ Context, Result };
use async_trait::async_trait;
use serde::{ Deserialize, Serialize };
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use std::sync::{ Mutex, MutexGuard };

use crate::db::error::{ StoreError, StoreResult };
use crate::db::filters::PropertyFilter;
use crate::db::rental_store::{ logged, RentalDataStore };
use crate::models::{
    GuestReservation,
    NewProperty,
    NewUser,
    Property,
    PropertyListing,
    PropertyReview,
    Reservation,
    User,
};
use crate::utils::logging::log_activity;

/// Fixture contents for the in-memory store
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MemorySeed {
    #[serde(default)]
    pub users: Vec<User>,
    #[serde(default)]
    pub properties: Vec<Property>,
    #[serde(default)]
    pub reservations: Vec<Reservation>,
    #[serde(default)]
    pub reviews: Vec<PropertyReview>,
}

#[derive(Default)]
struct Tables {
    users: BTreeMap<i32, User>,
    properties: BTreeMap<i32, Property>,
    reservations: BTreeMap<i32, Reservation>,
    reviews: BTreeMap<i32, PropertyReview>,
}

impl Tables {
    fn next_id<V>(table: &BTreeMap<i32, V>) -> i32 {
        table.keys().next_back().map_or(1, |id| id + 1)
    }

    fn require_user(&self, id: i32) -> StoreResult<()> {
        if self.users.contains_key(&id) {
            Ok(())
        } else {
            Err(StoreError::MissingReference { message: format!("No user with id {}", id) })
        }
    }

    fn require_property(&self, id: i32) -> StoreResult<()> {
        if self.properties.contains_key(&id) {
            Ok(())
        } else {
            Err(StoreError::MissingReference { message: format!("No property with id {}", id) })
        }
    }

    fn require_reservation(&self, id: i32) -> StoreResult<()> {
        if self.reservations.contains_key(&id) {
            Ok(())
        } else {
            Err(StoreError::MissingReference { message: format!("No reservation with id {}", id) })
        }
    }

    fn average_rating(&self, property_id: i32) -> Option<f64> {
        let ratings: Vec<f64> = self.reviews
            .values()
            .filter(|review| review.property_id == property_id)
            .map(|review| f64::from(review.rating))
            .collect();

        if ratings.is_empty() {
            None
        } else {
            Some(ratings.iter().sum::<f64>() / (ratings.len() as f64))
        }
    }
}

const RATING_RANGE: std::ops::RangeInclusive<i16> = 1..=5;

fn check_rating(rating: i16) -> StoreResult<()> {
    if RATING_RANGE.contains(&rating) {
        Ok(())
    } else {
        Err(StoreError::InvalidValue { message: format!("Rating must be between 1 and 5, got {}", rating) })
    }
}

/// Non-persistent stand-in for the database store
///
/// Ids are assigned sequentially and all rows live in process-local maps, so
/// everything is lost when the store is dropped. Listing semantics mirror the
/// SQL implementation, including the exclusion of unreviewed properties.
#[derive(Default)]
pub struct InMemoryRentalStore {
    tables: Mutex<Tables>,
}

impl InMemoryRentalStore {
    const COMPONENT: &'static str = "InMemoryRentalStore";

    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store pre-populated from a fixture, keeping its ids
    pub fn seeded(seed: MemorySeed) -> Result<Self> {
        let store = Self::new();
        {
            let mut tables = store.lock()?;
            for user in seed.users {
                if tables.users.contains_key(&user.id) {
                    anyhow::bail!("Duplicate user id in seed: {}", user.id);
                }
                if tables.users.values().any(|existing| existing.email == user.email) {
                    anyhow::bail!("Duplicate email in seed: {}", user.email);
                }
                tables.users.insert(user.id, user);
            }
            for property in seed.properties {
                if tables.properties.contains_key(&property.id) {
                    anyhow::bail!("Duplicate property id in seed: {}", property.id);
                }
                tables.require_user(property.owner_id)?;
                tables.properties.insert(property.id, property);
            }
            for reservation in seed.reservations {
                if tables.reservations.contains_key(&reservation.id) {
                    anyhow::bail!("Duplicate reservation id in seed: {}", reservation.id);
                }
                tables.require_user(reservation.guest_id)?;
                tables.require_property(reservation.property_id)?;
                tables.reservations.insert(reservation.id, reservation);
            }
            for review in seed.reviews {
                if tables.reviews.contains_key(&review.id) {
                    anyhow::bail!("Duplicate review id in seed: {}", review.id);
                }
                tables.require_user(review.guest_id)?;
                tables.require_property(review.property_id)?;
                tables.require_reservation(review.reservation_id)?;
                check_rating(review.rating)?;
                tables.reviews.insert(review.id, review);
            }
            log_activity(
                Self::COMPONENT,
                "Seeded",
                Some(
                    &format!(
                        "users={} properties={} reservations={} reviews={}",
                        tables.users.len(),
                        tables.properties.len(),
                        tables.reservations.len(),
                        tables.reviews.len()
                    )
                )
            );
        }
        Ok(store)
    }

    /// Load a JSON fixture file, see [`MemorySeed`]
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs
            ::read_to_string(path)
            .with_context(|| format!("Failed to read seed file: {}", path.display()))?;
        let seed: MemorySeed = serde_json
            ::from_str(&content)
            .with_context(|| format!("Failed to parse seed file: {}", path.display()))?;
        Self::seeded(seed)
    }

    /// Record a reservation, checking that guest and property exist
    pub fn add_reservation(
        &self,
        guest_id: i32,
        property_id: i32,
        start_date: chrono::NaiveDate,
        end_date: chrono::NaiveDate
    ) -> StoreResult<Reservation> {
        let mut tables = self.lock()?;
        tables.require_user(guest_id)?;
        tables.require_property(property_id)?;

        let reservation = Reservation {
            id: Tables::next_id(&tables.reservations),
            guest_id,
            property_id,
            start_date,
            end_date,
        };
        tables.reservations.insert(reservation.id, reservation.clone());
        Ok(reservation)
    }

    /// Record a review for an existing reservation
    pub fn add_review(
        &self,
        reservation_id: i32,
        rating: i16,
        message: Option<String>
    ) -> StoreResult<PropertyReview> {
        check_rating(rating)?;
        let mut tables = self.lock()?;
        let reservation = tables.reservations
            .get(&reservation_id)
            .cloned()
            .ok_or_else(|| StoreError::MissingReference {
                message: format!("No reservation with id {}", reservation_id),
            })?;

        let review = PropertyReview {
            id: Tables::next_id(&tables.reviews),
            guest_id: reservation.guest_id,
            property_id: reservation.property_id,
            reservation_id,
            rating,
            message,
        };
        tables.reviews.insert(review.id, review.clone());
        Ok(review)
    }

    fn lock(&self) -> StoreResult<MutexGuard<'_, Tables>> {
        self.tables.lock().map_err(|_| StoreError::Unavailable {
            message: "In-memory tables poisoned by an earlier panic".to_string(),
        })
    }

    fn insert_user(&self, user: NewUser) -> StoreResult<User> {
        let mut tables = self.lock()?;
        if tables.users.values().any(|existing| existing.email == user.email) {
            return Err(StoreError::Duplicate {
                message: format!("Email already registered: {}", user.email),
            });
        }

        let user = user.into_user(Tables::next_id(&tables.users));
        tables.users.insert(user.id, user.clone());
        Ok(user)
    }

    fn insert_property(&self, property: NewProperty) -> StoreResult<Property> {
        let mut tables = self.lock()?;
        tables.require_user(property.owner_id)?;

        let cost_per_night = i32::try_from(property.cost_in_cents()).map_err(|_| StoreError::InvalidValue {
            message: format!("Nightly cost out of range: {}", property.cost_per_night),
        })?;

        let stored = Property {
            id: Tables::next_id(&tables.properties),
            owner_id: property.owner_id,
            title: property.title,
            description: property.description,
            thumbnail_photo_url: property.thumbnail_photo_url,
            cover_photo_url: property.cover_photo_url,
            cost_per_night,
            street: property.street,
            city: property.city,
            province: property.province,
            post_code: property.post_code,
            country: property.country,
            parking_spaces: property.parking_spaces,
            number_of_bathrooms: property.number_of_bathrooms,
            number_of_bedrooms: property.number_of_bedrooms,
            active: true,
        };
        tables.properties.insert(stored.id, stored.clone());
        Ok(stored)
    }

    fn list_properties(&self, filter: &PropertyFilter, limit: u32) -> StoreResult<Vec<PropertyListing>> {
        let tables = self.lock()?;
        let predicates = filter.predicates();

        let mut listings: Vec<PropertyListing> = tables.properties
            .values()
            .filter(|property| predicates.iter().all(|p| p.matches(property)))
            .filter_map(|property| {
                let average_rating = tables.average_rating(property.id);
                if average_rating.is_none() && !filter.include_unreviewed {
                    return None;
                }
                if !filter.accepts_rating(average_rating) {
                    return None;
                }
                Some(PropertyListing { property: property.clone(), average_rating })
            })
            .collect();

        listings.sort_by_key(|listing| (listing.property.cost_per_night, listing.property.id));
        listings.truncate(limit as usize);
        Ok(listings)
    }

    fn list_reservations(&self, guest_id: i32, limit: u32) -> StoreResult<Vec<GuestReservation>> {
        let tables = self.lock()?;

        let mut rows: Vec<GuestReservation> = tables.reservations
            .values()
            .filter(|reservation| reservation.guest_id == guest_id)
            .filter_map(|reservation| {
                let property = tables.properties.get(&reservation.property_id)?;
                let average_rating = tables.average_rating(property.id)?;
                Some(GuestReservation {
                    reservation: reservation.clone(),
                    property: PropertyListing {
                        property: property.clone(),
                        average_rating: Some(average_rating),
                    },
                })
            })
            .collect();

        rows.sort_by_key(|row| (row.reservation.start_date, row.reservation.id));
        rows.truncate(limit as usize);
        Ok(rows)
    }
}

#[async_trait]
impl RentalDataStore for InMemoryRentalStore {
    async fn get_user_with_email(&self, email: &str) -> StoreResult<Option<User>> {
        let result = self
            .lock()
            .map(|tables| tables.users.values().find(|user| user.email == email).cloned());
        logged(Self::COMPONENT, "get_user_with_email", result)
    }

    async fn get_user_with_id(&self, id: i32) -> StoreResult<Option<User>> {
        let result = self.lock().map(|tables| tables.users.get(&id).cloned());
        logged(Self::COMPONENT, "get_user_with_id", result)
    }

    async fn add_user(&self, user: NewUser) -> StoreResult<User> {
        logged(Self::COMPONENT, "add_user", self.insert_user(user))
    }

    async fn get_all_reservations(
        &self,
        guest_id: i32,
        limit: u32
    ) -> StoreResult<Vec<GuestReservation>> {
        logged(Self::COMPONENT, "get_all_reservations", self.list_reservations(guest_id, limit))
    }

    async fn get_all_properties(
        &self,
        filter: &PropertyFilter,
        limit: u32
    ) -> StoreResult<Vec<PropertyListing>> {
        logged(Self::COMPONENT, "get_all_properties", self.list_properties(filter, limit))
    }

    async fn add_property(&self, property: NewProperty) -> StoreResult<Property> {
        logged(Self::COMPONENT, "add_property", self.insert_property(property))
    }
}
