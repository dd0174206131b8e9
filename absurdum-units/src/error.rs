//! Errors raised by the unit engine

use absurdum_core::NumberError;
use thiserror::Error;

/// Errors that can occur while scanning or converting mentions
#[derive(Debug, Clone, PartialEq, Error)]
pub enum UnitsError {
    /// A category name outside the fixed set
    #[error("unknown unit category: {0}")]
    InvalidCategory(String),

    /// A numeric token that survived the pattern but not the parser
    #[error("could not parse number: {0}")]
    NumberParse(#[from] NumberError),
}
