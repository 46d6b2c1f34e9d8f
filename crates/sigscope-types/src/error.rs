use thiserror::Error;

/// Errors produced by type operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeError {
    #[error("invalid signature hash {0:?}: expected a non-empty hex string")]
    InvalidHash(String),

    #[error("empty {0} name")]
    EmptyName(&'static str),
}
