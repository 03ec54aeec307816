use sqlx::PgPool;

use super::rows::{ user_from_row, USER_COLUMNS };
use crate::db::error::{ StoreError, StoreResult };
use crate::models::{ NewUser, User };

/// Repository for user account rows
#[derive(Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    /// Create a new repository instance
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Get a user by exact email match
    pub async fn find_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        let row = sqlx
            ::query(&format!("SELECT {} FROM users WHERE email = $1", USER_COLUMNS))
            .bind(email)
            .fetch_optional(&self.pool).await
            .map_err(|e| StoreError::from_sqlx("Failed to fetch user by email", e))?;

        row.as_ref()
            .map(user_from_row)
            .transpose()
            .map_err(|e| StoreError::from_sqlx("Failed to decode user row", e))
    }

    /// Get a user by primary id
    pub async fn find_by_id(&self, id: i32) -> StoreResult<Option<User>> {
        let row = sqlx
            ::query(&format!("SELECT {} FROM users WHERE id = $1", USER_COLUMNS))
            .bind(id)
            .fetch_optional(&self.pool).await
            .map_err(|e| StoreError::from_sqlx("Failed to fetch user by id", e))?;

        row.as_ref()
            .map(user_from_row)
            .transpose()
            .map_err(|e| StoreError::from_sqlx("Failed to decode user row", e))
    }

    /// Insert a user, relying on the unique index to reject duplicate emails
    pub async fn insert(&self, user: &NewUser) -> StoreResult<User> {
        let row = sqlx
            ::query(
                &format!(
                    "INSERT INTO users (name, email, password) VALUES ($1, $2, $3) RETURNING {}",
                    USER_COLUMNS
                )
            )
            .bind(&user.name)
            .bind(&user.email)
            .bind(&user.password)
            .fetch_one(&self.pool).await
            .map_err(|e| StoreError::from_sqlx("Failed to insert user", e))?;

        user_from_row(&row).map_err(|e| StoreError::from_sqlx("Failed to decode user row", e))
    }
}
