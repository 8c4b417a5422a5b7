use thiserror::Error;

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("config error: {0}")]
    Config(String),

    #[error("connection error: {0}")]
    Connection(String),

    #[error("database error: {0}")]
    Database(String),

    #[error("parse error: {0}")]
    Parse(String),

    #[error("{entity} with id {id} not found")]
    NotFound { entity: &'static str, id: i32 },

    #[error("attribute '{attribute}' was not loaded by this query")]
    MissingAttribute { attribute: &'static str },

    #[error("{entity} is marked read-only and cannot be saved")]
    ReadOnly { entity: &'static str },

    #[error("stale write rejected for {entity} {id}: row changed since it was loaded")]
    Stale { entity: &'static str, id: i32 },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

// Lets store code and transaction closures use `?` on Diesel results directly.
impl From<diesel::result::Error> for Error {
    fn from(e: diesel::result::Error) -> Self {
        Error::Database(e.to_string())
    }
}
