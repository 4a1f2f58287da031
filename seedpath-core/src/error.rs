use thiserror::Error;

pub type Result<T> = std::result::Result<T, ScanError>;

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("Invalid mnemonic: {0}")]
    InvalidMnemonic(String),

    #[error("Invalid target address: {0}")]
    InvalidTarget(String),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Bitcoin error: {0}")]
    Bitcoin(String),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Dialog error: {0}")]
    Dialog(String),
}

impl ScanError {
    pub fn invalid_mnemonic(msg: impl Into<String>) -> Self {
        Self::InvalidMnemonic(msg.into())
    }

    pub fn invalid_target(msg: impl Into<String>) -> Self {
        Self::InvalidTarget(msg.into())
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    pub fn bitcoin(msg: impl Into<String>) -> Self {
        Self::Bitcoin(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }
}

/// Failure to produce a single (scheme, index) candidate. Recovered inside
/// the search loop, never surfaced to callers of `find_derivation`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CandidateError {
    #[error("Invalid derivation path {path}: {reason}")]
    InvalidPath { path: String, reason: String },

    #[error("Key derivation failed at {path}: {reason}")]
    Derivation { path: String, reason: String },
}

// conversion from dialoguer::Error
impl From<dialoguer::Error> for ScanError {
    fn from(err: dialoguer::Error) -> Self {
        ScanError::Dialog(err.to_string())
    }
}
