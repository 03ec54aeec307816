use serde::{ Deserialize, Serialize };
use thiserror::Error;

// Postgres SQLSTATE codes we classify
const UNIQUE_VIOLATION: &str = "23505";
const FOREIGN_KEY_VIOLATION: &str = "23503";

pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Failure of a store operation
///
/// A missing row is not an error: single-row lookups return `Ok(None)`.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The statement could not be executed or its rows could not be decoded
    #[error("{message}: {source}")]
    Query {
        message: String,
        #[source]
        source: sqlx::Error,
    },

    /// A unique constraint rejected the write
    #[error("{message}")]
    Duplicate {
        message: String,
    },

    /// The write referenced a row that does not exist
    #[error("{message}")]
    MissingReference {
        message: String,
    },

    /// A value does not fit its column
    #[error("{message}")]
    InvalidValue {
        message: String,
    },

    /// The in-memory tables are unusable after a panic while locked
    #[error("{message}")]
    Unavailable {
        message: String,
    },
}

/// Serializable `{ error, message }` shape handed to calling layers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorDescriptor {
    pub error: String,
    pub message: String,
}

impl StoreError {
    /// Classify a sqlx failure, keeping constraint violations distinguishable
    pub fn from_sqlx(context: impl Into<String>, err: sqlx::Error) -> Self {
        let context = context.into();
        let code = err
            .as_database_error()
            .and_then(|db| db.code())
            .map(|code| code.into_owned());

        match code.as_deref() {
            Some(UNIQUE_VIOLATION) =>
                Self::Duplicate {
                    message: format!("{}: {}", context, database_message(&err)),
                },
            Some(FOREIGN_KEY_VIOLATION) =>
                Self::MissingReference {
                    message: format!("{}: {}", context, database_message(&err)),
                },
            _ => Self::Query { message: context, source: err },
        }
    }

    /// Stable label for the failure kind
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Query { .. } => "QueryFailure",
            Self::Duplicate { .. } => "Duplicate",
            Self::MissingReference { .. } => "MissingReference",
            Self::InvalidValue { .. } => "InvalidValue",
            Self::Unavailable { .. } => "Unavailable",
        }
    }

    pub fn descriptor(&self) -> ErrorDescriptor {
        ErrorDescriptor {
            error: self.kind().to_string(),
            message: self.to_string(),
        }
    }
}

fn database_message(err: &sqlx::Error) -> String {
    match err.as_database_error() {
        Some(db) => db.message().to_string(),
        None => err.to_string(),
    }
}
