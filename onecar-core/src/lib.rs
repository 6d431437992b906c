//! onecar-core: Domain types shared by the onecar spending engine

pub mod error;
pub mod finance;

pub use error::{Error, Result, ValidationError};
pub use finance::{Category, CategorySummary, MonthlyTotals, Transaction};
