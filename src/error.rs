use thiserror::Error;

use crate::reorganize::ReorganizeError;
use crate::store::StoreError;
use crate::ValidationError;

/// Unified error returned by the services.
///
/// [`AdminError::status_code`] gives the HTTP status an admin API would
/// answer with.
#[derive(Debug, Error)]
pub enum AdminError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    NotFound(String),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Reorganize(#[from] ReorganizeError),
}

impl AdminError {
    /// Lock, persistence or stored-data failures rather than a bad request.
    #[must_use]
    pub fn is_infrastructure(&self) -> bool {
        matches!(self, AdminError::Store(_) | AdminError::Reorganize(_))
    }

    #[must_use]
    pub fn status_code(&self) -> u16 {
        match self {
            AdminError::Validation(_) => 400,
            AdminError::NotFound(_) => 404,
            AdminError::Conflict(_) => 409,
            AdminError::Store(_) | AdminError::Reorganize(_) => 500,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_codes() {
        assert_eq!(AdminError::from(ValidationError::EmptyRule).status_code(), 400);
        assert_eq!(AdminError::NotFound("x".into()).status_code(), 404);
        assert_eq!(AdminError::Conflict("x".into()).status_code(), 409);
        let lock = AdminError::from(StoreError::LockHeld { lock: "t".into() });
        assert_eq!(lock.status_code(), 500);
        assert!(lock.is_infrastructure());
    }

    #[test]
    fn transparent_messages() {
        let err = AdminError::from(ValidationError::EmptyRule);
        assert_eq!(err.to_string(), "Rule is empty");
        let err = AdminError::from(ReorganizeError::PriorityOutOfRange { priority: 9, len: 3 });
        assert_eq!(err.to_string(), "priority 9 is outside 1..=3");
    }
}
