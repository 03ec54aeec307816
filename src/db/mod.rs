pub mod error;
pub mod filters;
pub mod memory_store;
pub mod pool;
pub mod rental_store;
pub mod repositories;

pub use error::*;
pub use filters::*;
pub use memory_store::*;
pub use pool::*;
pub use rental_store::*;
pub use repositories::*;
