use sqlx::postgres::PgRow;
use sqlx::Row;

use crate::models::{ Property, PropertyListing, Reservation, User };

pub(crate) const USER_COLUMNS: &str = "id, name, email, password";

pub(crate) const PROPERTY_COLUMNS: &str =
    "id, owner_id, title, description, thumbnail_photo_url, cover_photo_url, cost_per_night, \
     street, city, province, post_code, country, parking_spaces, number_of_bathrooms, \
     number_of_bedrooms, active";

pub(crate) fn user_from_row(row: &PgRow) -> Result<User, sqlx::Error> {
    Ok(User {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        email: row.try_get("email")?,
        password: row.try_get("password")?,
    })
}

pub(crate) fn property_from_row(row: &PgRow) -> Result<Property, sqlx::Error> {
    Ok(Property {
        id: row.try_get("id")?,
        owner_id: row.try_get("owner_id")?,
        title: row.try_get("title")?,
        description: row.try_get("description")?,
        thumbnail_photo_url: row.try_get("thumbnail_photo_url")?,
        cover_photo_url: row.try_get("cover_photo_url")?,
        cost_per_night: row.try_get("cost_per_night")?,
        street: row.try_get("street")?,
        city: row.try_get("city")?,
        province: row.try_get("province")?,
        post_code: row.try_get("post_code")?,
        country: row.try_get("country")?,
        parking_spaces: row.try_get("parking_spaces")?,
        number_of_bathrooms: row.try_get("number_of_bathrooms")?,
        number_of_bedrooms: row.try_get("number_of_bedrooms")?,
        active: row.try_get("active")?,
    })
}

pub(crate) fn listing_from_row(row: &PgRow) -> Result<PropertyListing, sqlx::Error> {
    Ok(PropertyListing {
        property: property_from_row(row)?,
        average_rating: row.try_get("average_rating")?,
    })
}

// Reservation columns are aliased in joined queries to avoid clashing with properties.id
pub(crate) fn reservation_from_row(row: &PgRow) -> Result<Reservation, sqlx::Error> {
    Ok(Reservation {
        id: row.try_get("reservation_id")?,
        guest_id: row.try_get("guest_id")?,
        property_id: row.try_get("reservation_property_id")?,
        start_date: row.try_get("start_date")?,
        end_date: row.try_get("end_date")?,
    })
}
