//! Error types for Stockbook Core.

use thiserror::Error;

/// Validation errors for candidate records and imported data.
///
/// These are the reasons an input is rejected before anything is written.
/// Storage-side failures live in the store crate; this enum is purely about
/// the shape of the data itself.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("item name must not be empty")]
    EmptyName,

    #[error("price must be a finite, non-negative number, got {0}")]
    InvalidPrice(String),

    #[error("units sold must be a finite, non-negative number, got {0}")]
    InvalidUnits(String),

    #[error("no name/item column found in CSV header")]
    MissingNameColumn,

    #[error("invalid date key: {0}")]
    InvalidDateKey(String),

    #[error("patch contains no fields to apply")]
    EmptyPatch,
}
