use crate::domain::ValidationError;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    // Malformed input
    #[error(transparent)]
    Validation(#[from] ValidationError),
    // No row for the requested id
    #[error("subscription with ID {id} not found")]
    NotFound { id: i64 },
    // Aggregated price does not fit in an i64
    #[error("total cost overflowed")]
    CostOverflow,
    // Database errors
    #[error(transparent)]
    Storage(#[from] sqlx::Error),
}
