use clap::{ Args, Subcommand };
use serde::Serialize;

use crate::db::{ PropertyFilter, RentalDataStore, StoreResult, DEFAULT_LIMIT };
use crate::models::{ GuestReservation, NewProperty, NewUser, Property, PropertyListing, User };

/// Store operations reachable from the command line
#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// Look up a user by exact email
    UserByEmail {
        email: String,
    },
    /// Look up a user by id
    UserById {
        id: i32,
    },
    /// Register a new user
    AddUser {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    /// List a guest's reservations, earliest first
    Reservations {
        guest_id: i32,
        #[arg(long, default_value_t = DEFAULT_LIMIT)]
        limit: u32,
    },
    /// List properties, cheapest first
    Properties {
        #[command(flatten)]
        filter: FilterArgs,
        #[arg(long, default_value_t = DEFAULT_LIMIT)]
        limit: u32,
    },
    /// List a new property
    AddProperty(PropertyArgs),
}

/// Listing filters; prices are in whole currency units
#[derive(Args, Debug, Clone, Default, PartialEq)]
pub struct FilterArgs {
    #[arg(long)]
    pub owner_id: Option<i32>,
    #[arg(long)]
    pub city: Option<String>,
    #[arg(long)]
    pub min_price: Option<i32>,
    #[arg(long)]
    pub max_price: Option<i32>,
    #[arg(long)]
    pub min_rating: Option<f64>,
    /// Also list properties nobody has reviewed yet
    #[arg(long)]
    pub include_unreviewed: bool,
}

impl From<FilterArgs> for PropertyFilter {
    fn from(args: FilterArgs) -> Self {
        PropertyFilter {
            owner_id: args.owner_id,
            city: args.city,
            minimum_price_per_night: args.min_price,
            maximum_price_per_night: args.max_price,
            minimum_rating: args.min_rating,
            include_unreviewed: args.include_unreviewed,
        }
    }
}

#[derive(Args, Debug, Clone, PartialEq)]
pub struct PropertyArgs {
    #[arg(long)]
    pub owner_id: i32,
    #[arg(long)]
    pub title: String,
    #[arg(long, default_value = "")]
    pub description: String,
    #[arg(long, default_value = "")]
    pub thumbnail_photo_url: String,
    #[arg(long, default_value = "")]
    pub cover_photo_url: String,
    /// Whole currency units; stored in cents
    #[arg(long)]
    pub cost_per_night: i32,
    #[arg(long)]
    pub street: String,
    #[arg(long)]
    pub city: String,
    #[arg(long)]
    pub province: String,
    #[arg(long)]
    pub post_code: String,
    #[arg(long)]
    pub country: String,
    #[arg(long, default_value_t = 0)]
    pub parking_spaces: i32,
    #[arg(long, default_value_t = 1)]
    pub number_of_bathrooms: i32,
    #[arg(long, default_value_t = 1)]
    pub number_of_bedrooms: i32,
}

impl From<PropertyArgs> for NewProperty {
    fn from(args: PropertyArgs) -> Self {
        NewProperty {
            owner_id: args.owner_id,
            title: args.title,
            description: args.description,
            thumbnail_photo_url: args.thumbnail_photo_url,
            cover_photo_url: args.cover_photo_url,
            cost_per_night: args.cost_per_night,
            street: args.street,
            city: args.city,
            province: args.province,
            post_code: args.post_code,
            country: args.country,
            parking_spaces: args.parking_spaces,
            number_of_bathrooms: args.number_of_bathrooms,
            number_of_bedrooms: args.number_of_bedrooms,
        }
    }
}

/// Result of a command, serialized as the bare record or list
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum CommandOutput {
    User(Option<User>),
    Reservations(Vec<GuestReservation>),
    Listings(Vec<PropertyListing>),
    Property(Property),
}

/// Run one command against the store
pub async fn execute(store: &dyn RentalDataStore, command: Command) -> StoreResult<CommandOutput> {
    let output = match command {
        Command::UserByEmail { email } => CommandOutput::User(store.get_user_with_email(&email).await?),
        Command::UserById { id } => CommandOutput::User(store.get_user_with_id(id).await?),
        Command::AddUser { name, email, password } => {
            let user = store.add_user(NewUser::new(name, email, password)).await?;
            CommandOutput::User(Some(user))
        }
        Command::Reservations { guest_id, limit } =>
            CommandOutput::Reservations(store.get_all_reservations(guest_id, limit).await?),
        Command::Properties { filter, limit } => {
            let filter = PropertyFilter::from(filter);
            CommandOutput::Listings(store.get_all_properties(&filter, limit).await?)
        }
        Command::AddProperty(args) => CommandOutput::Property(store.add_property(args.into()).await?),
    };

    Ok(output)
}
