use sqlx::{ Postgres, QueryBuilder };

use crate::models::{ cents_from_major, Property };

/// Optional criteria for property listings, combined conjunctively
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PropertyFilter {
    pub owner_id: Option<i32>,
    /// Case-sensitive substring of the city name
    pub city: Option<String>,
    /// Major currency units
    pub minimum_price_per_night: Option<i32>,
    /// Major currency units
    pub maximum_price_per_night: Option<i32>,
    pub minimum_rating: Option<f64>,
    /// List properties without reviews as well, with no average rating
    pub include_unreviewed: bool,
}

/// A single row-level condition on `properties`
#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    OwnerIs(i32),
    CityContains(String),
    CostAtLeast(i64),
    CostAtMost(i64),
}

impl Predicate {
    /// Evaluate the condition against a stored property
    pub fn matches(&self, property: &Property) -> bool {
        let cost = i64::from(property.cost_per_night);
        match self {
            Predicate::OwnerIs(owner_id) => property.owner_id == *owner_id,
            Predicate::CityContains(city) => property.city.contains(city.as_str()),
            Predicate::CostAtLeast(cents) => cost >= *cents,
            Predicate::CostAtMost(cents) => cost <= *cents,
        }
    }
}

impl PropertyFilter {
    /// Row-level predicates in a fixed order; prices already in cents
    pub fn predicates(&self) -> Vec<Predicate> {
        let mut predicates = Vec::new();
        if let Some(owner_id) = self.owner_id {
            predicates.push(Predicate::OwnerIs(owner_id));
        }
        if let Some(city) = &self.city {
            predicates.push(Predicate::CityContains(city.clone()));
        }
        if let Some(minimum) = self.minimum_price_per_night {
            predicates.push(Predicate::CostAtLeast(cents_from_major(minimum)));
        }
        if let Some(maximum) = self.maximum_price_per_night {
            predicates.push(Predicate::CostAtMost(cents_from_major(maximum)));
        }
        predicates
    }

    /// Whether an aggregated rating passes the `minimum_rating` floor
    pub fn accepts_rating(&self, average_rating: Option<f64>) -> bool {
        match (self.minimum_rating, average_rating) {
            (None, _) => true,
            (Some(floor), Some(rating)) => rating >= floor,
            (Some(_), None) => false,
        }
    }
}

pub(crate) const LISTING_COLUMNS: &str =
    "properties.id, properties.owner_id, properties.title, properties.description, \
     properties.thumbnail_photo_url, properties.cover_photo_url, properties.cost_per_night, \
     properties.street, properties.city, properties.province, properties.post_code, \
     properties.country, properties.parking_spaces, properties.number_of_bathrooms, \
     properties.number_of_bedrooms, properties.active, \
     avg(property_reviews.rating)::float8 AS average_rating";

/// Render predicates as a single `WHERE` clause joined by `AND`
///
/// Emits nothing for an empty list.
pub fn push_where(builder: &mut QueryBuilder<'_, Postgres>, predicates: Vec<Predicate>) {
    if predicates.is_empty() {
        return;
    }

    builder.push(" WHERE ");
    let mut conjunction = builder.separated(" AND ");
    for predicate in predicates {
        match predicate {
            Predicate::OwnerIs(owner_id) => {
                conjunction.push("properties.owner_id = ");
                conjunction.push_bind_unseparated(owner_id);
            }
            Predicate::CityContains(city) => {
                conjunction.push("properties.city LIKE ");
                conjunction.push_bind_unseparated(format!("%{}%", city));
            }
            Predicate::CostAtLeast(cents) => {
                conjunction.push("properties.cost_per_night >= ");
                conjunction.push_bind_unseparated(cents);
            }
            Predicate::CostAtMost(cents) => {
                conjunction.push("properties.cost_per_night <= ");
                conjunction.push_bind_unseparated(cents);
            }
        }
    }
}

/// Build the full property listing statement
pub fn listing_query(filter: &PropertyFilter, limit: u32) -> QueryBuilder<'static, Postgres> {
    let join = if filter.include_unreviewed { "LEFT JOIN" } else { "JOIN" };

    let mut builder = QueryBuilder::new("SELECT ");
    builder.push(LISTING_COLUMNS);
    builder.push(" FROM properties ");
    builder.push(join);
    builder.push(" property_reviews ON properties.id = property_reviews.property_id");

    push_where(&mut builder, filter.predicates());

    builder.push(" GROUP BY properties.id");
    if let Some(floor) = filter.minimum_rating {
        builder.push(" HAVING avg(property_reviews.rating)::float8 >= ");
        builder.push_bind(floor);
    }

    builder.push(" ORDER BY properties.cost_per_night, properties.id LIMIT ");
    builder.push_bind(i64::from(limit));
    builder
}
