use thiserror::Error;

/// Failure to split the input buffer into its fields.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DecodeError {
    #[error("input too short: expected at least {expected} bytes, got {got}")]
    TooShort { expected: usize, got: usize },
}

/// Failure of the decryption engine.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DecryptError {
    #[error("invalid public key")]
    InvalidPublicKey,

    #[error("invalid secret key")]
    InvalidSecretKey,

    #[error("decryption failed: {0}")]
    DecryptionFailed(String),
}

/// Everything that can end an invocation with a failure status.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GuestError {
    #[error(transparent)]
    Decode(#[from] DecodeError),

    #[error(transparent)]
    Decrypt(#[from] DecryptError),
}
