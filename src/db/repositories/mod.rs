mod rows;
mod users;
mod properties;
mod reservations;

pub use users::UserRepository;
pub use properties::PropertyRepository;
pub use reservations::ReservationRepository;
