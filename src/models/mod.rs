pub mod user;
pub mod property;
pub mod reservation;

pub use user::{ NewUser, User };
pub use property::{ NewProperty, Property, PropertyListing, cents_from_major };
pub use reservation::{ GuestReservation, PropertyReview, Reservation };
