use thiserror::Error;

/// Failures raised by the in-memory record stores.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("{kind} integrity check failed: {reason}")]
    Integrity { kind: &'static str, reason: String },

    #[error("{kind} [{key}] already defined in store")]
    DuplicateKey { kind: &'static str, key: String },

    #[error("Invalid filter: {0}")]
    InvalidFilter(String),

    #[error("Operation not supported by the {0} store")]
    Unsupported(&'static str),
}

/// Failures raised by the catalog, ledger and analytics operations.
#[derive(Error, Debug)]
pub enum MarketError {
    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Stock [{symbol}] already exists")]
    DuplicateStock {
        symbol: String,
        #[source]
        source: StoreError,
    },

    #[error("{0}")]
    BusinessRule(String),

    #[error("Internal consistency violated: {0}")]
    InternalConsistency(String),

    #[error("Storage failure: {0}")]
    Storage(#[from] StoreError),
}

pub type Result<T> = std::result::Result<T, MarketError>;
