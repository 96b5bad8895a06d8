use thiserror::Error;

/// Parse failures in database / change-set text. All fatal: a malformed
/// input document stops the run before anything is written.
#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("invalid calendar date `{0}` (expected m/d/yyyy)")]
    InvalidDate(String),

    #[error("invalid wall-clock time `{0}` (expected HH:MM:SS)")]
    InvalidTime(String),

    #[error("invalid entry key `{0}` (expected security-market-ticker)")]
    InvalidKey(String),

    #[error("unknown security type `{0}`")]
    UnknownSecurityType(String),
}
