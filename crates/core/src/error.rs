//! Centralized error types for the Territory workspace.

use thiserror::Error;

/// Top-level error enum. Link-time variants carry the names involved.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum TerritoryError {
    #[error("Distributor not found: {0}")]
    NotFound(String),

    #[error("Distributor already exists: {0}")]
    AlreadyExists(String),

    #[error("Cannot link {child} to {parent}: {region} is excluded in parent distributor")]
    Conflict {
        parent: String,
        child: String,
        region: String,
    },

    #[error("Cannot link {child} to {parent}: link would create a cycle")]
    CycleDetected { parent: String, child: String },

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type TerritoryResult<T> = Result<T, TerritoryError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn conflict_message_names_region() {
        let err = TerritoryError::Conflict {
            parent: "acme".into(),
            child: "retail".into(),
            region: "IN".into(),
        };
        assert_eq!(
            err.to_string(),
            "Cannot link retail to acme: IN is excluded in parent distributor"
        );
    }
}
