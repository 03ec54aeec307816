use sqlx::PgPool;

use super::rows::{ listing_from_row, property_from_row, PROPERTY_COLUMNS };
use crate::db::error::{ StoreError, StoreResult };
use crate::db::filters::{ listing_query, PropertyFilter };
use crate::models::{ NewProperty, Property, PropertyListing };

/// Repository for property rows and their rating aggregates
#[derive(Clone)]
pub struct PropertyRepository {
    pool: PgPool,
}

impl PropertyRepository {
    /// Create a new repository instance
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// List properties matching the filter, cheapest first
    pub async fn list(&self, filter: &PropertyFilter, limit: u32) -> StoreResult<Vec<PropertyListing>> {
        let mut builder = listing_query(filter, limit);
        let rows = builder
            .build()
            .fetch_all(&self.pool).await
            .map_err(|e| StoreError::from_sqlx("Failed to fetch property listings", e))?;

        rows.iter()
            .map(listing_from_row)
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| StoreError::from_sqlx("Failed to decode property listing", e))
    }

    /// Insert a property; the nightly price is written in cents
    pub async fn insert(&self, property: &NewProperty) -> StoreResult<Property> {
        let row = sqlx
            ::query(
                &format!(
                    "INSERT INTO properties (owner_id, title, description, thumbnail_photo_url,
                     cover_photo_url, cost_per_night, street, city, province, post_code, country,
                     parking_spaces, number_of_bathrooms, number_of_bedrooms)
                     VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
                     RETURNING {}",
                    PROPERTY_COLUMNS
                )
            )
            .bind(property.owner_id)
            .bind(&property.title)
            .bind(&property.description)
            .bind(&property.thumbnail_photo_url)
            .bind(&property.cover_photo_url)
            .bind(property.cost_in_cents())
            .bind(&property.street)
            .bind(&property.city)
            .bind(&property.province)
            .bind(&property.post_code)
            .bind(&property.country)
            .bind(property.parking_spaces)
            .bind(property.number_of_bathrooms)
            .bind(property.number_of_bedrooms)
            .fetch_one(&self.pool).await
            .map_err(|e| StoreError::from_sqlx("Failed to insert property", e))?;

        property_from_row(&row).map_err(|e| StoreError::from_sqlx("Failed to decode property row", e))
    }
}
