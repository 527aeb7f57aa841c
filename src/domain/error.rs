use thiserror::Error;

/// Domain-level error taxonomy.
///
/// All variants are client-visible and request-scoped; none are retried
/// automatically. `Conflict` is the one error expected under legitimate
/// concurrent use; its message tells the user a different time window may
/// succeed, as opposed to `SpotUnavailable`, where the spot itself is closed.
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Not found: {entity} with {field}={value}")]
    NotFound {
        entity: &'static str,
        field: &'static str,
        value: String,
    },

    #[error("End time must be after start time")]
    InvalidRange,

    #[error("Cannot book for a past time")]
    InPast,

    #[error("This spot is under maintenance")]
    SpotUnavailable,

    #[error("This spot is already booked for the selected time; try a different time window")]
    Conflict,

    #[error("Cannot cancel a booking that has already started")]
    AlreadyStarted,

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Validation: {0}")]
    Validation(String),

    #[error("Database error: {0}")]
    Storage(String),
}

impl DomainError {
    pub fn not_found(entity: &'static str, field: &'static str, value: impl ToString) -> Self {
        Self::NotFound {
            entity,
            field,
            value: value.to_string(),
        }
    }
}

/// Result type for domain operations
pub type DomainResult<T> = Result<T, DomainError>;
