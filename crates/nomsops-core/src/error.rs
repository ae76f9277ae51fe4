//! Error types for nomsops-core

use thiserror::Error;

/// Why a submitted field value was rejected during cleaning.
///
/// Cleaning failures are never fatal: the engine logs them at debug
/// level and treats the field as if it were blank.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CleanError {
    #[error("Invalid amount")]
    InvalidAmount,

    #[error("Invalid choice: {value}")]
    InvalidChoice { value: String },

    #[error("Invalid date")]
    InvalidDate,

    #[error("Invalid prisoner number")]
    InvalidPrisonerNumber,

    #[error("Invalid email address")]
    InvalidEmail,

    #[error("Invalid IP address")]
    InvalidIpAddress,

    #[error("Not a number")]
    InvalidNumber,

    #[error("Value out of range: {value}")]
    OutOfRange { value: i64 },
}
