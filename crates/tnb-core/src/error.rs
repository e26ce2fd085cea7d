use thiserror::Error;

use crate::client::ClientError;
use crate::schema::SchemaError;

/// Field-level problems with values received from a node.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("account number must be {expected} hex characters: '{value}'")]
    InvalidAccountNumber { value: String, expected: usize },

    #[error("signature must be {expected} hex characters, got {len}")]
    InvalidSignature { len: usize, expected: usize },

    #[error("timestamp must be RFC3339 UTC: '{value}'")]
    TimestampNotUtc { value: String },

    #[error("unknown node type '{value}', expected BANK, PRIMARY_VALIDATOR or CONFIRMATION_VALIDATOR")]
    UnknownNodeType { value: String },

    #[error("unknown protocol '{value}', expected http or https")]
    UnknownProtocol { value: String },

    #[error("trust must be a finite decimal: '{value}'")]
    InvalidTrust { value: String },

    #[error("unknown ordering '{value}'")]
    UnknownOrdering { value: String },
}

/// Top-level error for node client operations.
#[derive(Debug, Error)]
pub enum TnbError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Schema(#[from] SchemaError),

    #[error(transparent)]
    Client(#[from] ClientError),
}
