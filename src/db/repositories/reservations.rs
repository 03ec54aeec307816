use sqlx::PgPool;

use super::rows::{ listing_from_row, reservation_from_row };
use crate::db::error::{ StoreError, StoreResult };
use crate::db::filters::LISTING_COLUMNS;
use crate::models::GuestReservation;

/// Repository for a guest's reservation history
#[derive(Clone)]
pub struct ReservationRepository {
    pool: PgPool,
}

impl ReservationRepository {
    /// Create a new repository instance
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Reservations of a guest ordered by start date
    ///
    /// The inner join through `property_reviews` drops reservations whose
    /// property has never been reviewed.
    pub async fn list_for_guest(&self, guest_id: i32, limit: u32) -> StoreResult<Vec<GuestReservation>> {
        let rows = sqlx
            ::query(
                &format!(
                    "SELECT {}, reservations.id AS reservation_id, reservations.guest_id,
                     reservations.property_id AS reservation_property_id,
                     reservations.start_date, reservations.end_date
                     FROM reservations
                     JOIN properties ON reservations.property_id = properties.id
                     JOIN property_reviews ON properties.id = property_reviews.property_id
                     WHERE reservations.guest_id = $1
                     GROUP BY properties.id, reservations.id
                     ORDER BY reservations.start_date, reservations.id
                     LIMIT $2",
                    LISTING_COLUMNS
                )
            )
            .bind(guest_id)
            .bind(i64::from(limit))
            .fetch_all(&self.pool).await
            .map_err(|e| StoreError::from_sqlx("Failed to fetch guest reservations", e))?;

        rows.iter()
            .map(|row| {
                Ok(GuestReservation {
                    reservation: reservation_from_row(row)?,
                    property: listing_from_row(row)?,
                })
            })
            .collect::<Result<Vec<_>, sqlx::Error>>()
            .map_err(|e| StoreError::from_sqlx("Failed to decode guest reservation", e))
    }
}
