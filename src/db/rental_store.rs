use anyhow::Result;
use async_trait::async_trait;
use sqlx::PgPool;

use crate::db::error::StoreResult;
use crate::db::filters::PropertyFilter;
use crate::db::memory_store::InMemoryRentalStore;
use crate::db::repositories::{ PropertyRepository, ReservationRepository, UserRepository };
use crate::models::{ GuestReservation, NewProperty, NewUser, Property, PropertyListing, User };
use crate::utils::logging::{ log_debug, log_error };

/// Row cap used when the caller has no preference
pub const DEFAULT_LIMIT: u32 = 10;

/// Data-access operations of the rental application
///
/// Every operation is a single statement against the backing store. Lookups
/// report a missing row as `Ok(None)`.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RentalDataStore: Send + Sync {
    /// Exact-match lookup used at login
    async fn get_user_with_email(&self, email: &str) -> StoreResult<Option<User>>;

    /// Primary-key lookup used to restore a session
    async fn get_user_with_id(&self, id: i32) -> StoreResult<Option<User>>;

    async fn add_user(&self, user: NewUser) -> StoreResult<User>;

    /// A guest's reservations, earliest start date first
    ///
    /// Properties that have never been reviewed are left out.
    async fn get_all_reservations(
        &self,
        guest_id: i32,
        limit: u32
    ) -> StoreResult<Vec<GuestReservation>>;

    /// Property listings matching every set filter, cheapest first
    async fn get_all_properties(
        &self,
        filter: &PropertyFilter,
        limit: u32
    ) -> StoreResult<Vec<PropertyListing>>;

    async fn add_property(&self, property: NewProperty) -> StoreResult<Property>;
}

/// Log a failed operation at the store boundary and pass the result through
pub(crate) fn logged<T>(component: &str, operation: &str, result: StoreResult<T>) -> StoreResult<T> {
    if let Err(err) = &result {
        log_error(component, operation, err);
    }
    result
}

/// Durable store over a PostgreSQL pool
#[derive(Clone)]
pub struct PgRentalStore {
    users: UserRepository,
    properties: PropertyRepository,
    reservations: ReservationRepository,
}

impl PgRentalStore {
    const COMPONENT: &'static str = "PgRentalStore";

    pub fn new(pool: PgPool) -> Self {
        Self {
            users: UserRepository::new(pool.clone()),
            properties: PropertyRepository::new(pool.clone()),
            reservations: ReservationRepository::new(pool),
        }
    }
}

#[async_trait]
impl RentalDataStore for PgRentalStore {
    async fn get_user_with_email(&self, email: &str) -> StoreResult<Option<User>> {
        logged(Self::COMPONENT, "get_user_with_email", self.users.find_by_email(email).await)
    }

    async fn get_user_with_id(&self, id: i32) -> StoreResult<Option<User>> {
        logged(Self::COMPONENT, "get_user_with_id", self.users.find_by_id(id).await)
    }

    async fn add_user(&self, user: NewUser) -> StoreResult<User> {
        logged(Self::COMPONENT, "add_user", self.users.insert(&user).await)
    }

    async fn get_all_reservations(
        &self,
        guest_id: i32,
        limit: u32
    ) -> StoreResult<Vec<GuestReservation>> {
        logged(
            Self::COMPONENT,
            "get_all_reservations",
            self.reservations.list_for_guest(guest_id, limit).await
        )
    }

    async fn get_all_properties(
        &self,
        filter: &PropertyFilter,
        limit: u32
    ) -> StoreResult<Vec<PropertyListing>> {
        log_debug(Self::COMPONENT, "get_all_properties", filter);
        logged(Self::COMPONENT, "get_all_properties", self.properties.list(filter, limit).await)
    }

    async fn add_property(&self, property: NewProperty) -> StoreResult<Property> {
        logged(Self::COMPONENT, "add_property", self.properties.insert(&property).await)
    }
}

/// Type of rental store to create
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum StoreKind {
    /// Process-local maps; nothing survives a restart
    #[value(name = "memory")]
    InMemory,
    #[value(name = "postgres")]
    Database,
}

/// Create a rental store of the specified kind
pub fn create_store(kind: StoreKind, db_pool: Option<PgPool>) -> Result<Box<dyn RentalDataStore>> {
    match kind {
        StoreKind::InMemory => Ok(Box::new(InMemoryRentalStore::new())),
        StoreKind::Database => {
            let pool = db_pool.ok_or_else(||
                anyhow::anyhow!("Database pool required for the database rental store")
            )?;
            Ok(Box::new(PgRentalStore::new(pool)))
        }
    }
}
