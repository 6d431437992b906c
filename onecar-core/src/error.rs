//! Error types for the spending engine

use std::fmt;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("invalid transaction: {0}")]
    Validation(ValidationError),

    #[error("amount total overflowed at transaction #{index}")]
    AmountOverflow { index: usize },

    #[error("keyword table error: {0}")]
    Keywords(String),
}

pub type Result<T> = std::result::Result<T, Error>;

/// A transaction whose `paidAmt` is not a non-negative decimal integer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Position of the transaction in the input list
    pub index: usize,
    pub merchant: String,
    pub paid_amt: String,
    pub reason: &'static str,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "#{} ({}): {} (paidAmt = {:?})",
            self.index, self.merchant, self.reason, self.paid_amt
        )
    }
}

impl std::error::Error for ValidationError {}
