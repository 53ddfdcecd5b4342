use std::num::ParseIntError;

use diesel::r2d2::PoolError;
use rocket::tokio::task::JoinError;
use thiserror::Error;

/// Everything a resolver or the datastore layer can fail with.
///
/// The `Display` text is what clients see in the GraphQL error list.
#[derive(Debug, Error)]
pub enum Error {
    #[error("Invalid id")]
    InvalidId(#[source] ParseIntError),

    #[error("User not found")]
    UserNotFound,

    #[error("datastore unavailable: {0}")]
    Pool(#[from] PoolError),

    #[error("datastore error: {0}")]
    Datastore(#[from] diesel::result::Error),

    #[error("migration failed: {0}")]
    Migration(#[source] Box<dyn std::error::Error + Send + Sync>),

    #[error("datastore task failed: {0}")]
    Task(#[from] JoinError),
}

pub type Result<T> = std::result::Result<T, Error>;
