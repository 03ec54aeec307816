use serde::{ Deserialize, Serialize };

/// Convert a major-unit price (dollars) into the stored minor units (cents)
pub fn cents_from_major(amount: i32) -> i64 {
    i64::from(amount) * 100
}

/// A rental property as persisted
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Property {
    pub id: i32,
    pub owner_id: i32,
    pub title: String,
    pub description: String,
    pub thumbnail_photo_url: String,
    pub cover_photo_url: String,
    /// Price in cents
    pub cost_per_night: i32,
    pub street: String,
    pub city: String,
    pub province: String,
    pub post_code: String,
    pub country: String,
    pub parking_spaces: i32,
    pub number_of_bathrooms: i32,
    pub number_of_bedrooms: i32,
    pub active: bool,
}

/// A property together with its rating aggregate, as returned by listings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertyListing {
    #[serde(flatten)]
    pub property: Property,
    /// `None` only for unreviewed properties, which listings skip unless asked
    pub average_rating: Option<f64>,
}

/// Fields accepted when listing a new property
///
/// `cost_per_night` is given in major units and stored multiplied by 100.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewProperty {
    pub owner_id: i32,
    pub title: String,
    pub description: String,
    pub thumbnail_photo_url: String,
    pub cover_photo_url: String,
    pub cost_per_night: i32,
    pub street: String,
    pub city: String,
    pub province: String,
    pub post_code: String,
    pub country: String,
    pub parking_spaces: i32,
    pub number_of_bathrooms: i32,
    pub number_of_bedrooms: i32,
}

impl NewProperty {
    /// The nightly price as it will be written to storage
    pub fn cost_in_cents(&self) -> i64 {
        cents_from_major(self.cost_per_night)
    }
}
