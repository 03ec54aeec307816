// Re-export core modules
pub mod models;
pub mod db;
pub mod commands;
pub mod utils;

// Re-export common types and traits
pub use models::{
    GuestReservation,
    NewProperty,
    NewUser,
    Property,
    PropertyListing,
    PropertyReview,
    Reservation,
    User,
};
pub use db::{ Database, DbConfig };
pub use db::{ ErrorDescriptor, StoreError, StoreResult };
pub use db::{ PropertyFilter, Predicate };
pub use db::{
    create_store,
    InMemoryRentalStore,
    MemorySeed,
    PgRentalStore,
    RentalDataStore,
    StoreKind,
    DEFAULT_LIMIT,
};
