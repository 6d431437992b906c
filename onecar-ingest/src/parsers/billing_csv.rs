//! Billing history CSV export
//!
//! A header row is required:
//!   merchantNameMasked,paidAmt,paidDate
//!   GS칼텍스 강**점,85000,2024-01-15
//!
//! `paidDate` is optional and unknown columns are ignored.

use anyhow::{Context, Result};
use onecar_core::Transaction;
use std::io::Read;
use tracing::warn;

use crate::types::{CsvRow, RawTransaction, normalize_all};

/// Parse a billing CSV from any reader
pub fn parse_billing_csv<R: Read>(reader: R) -> Result<Vec<Transaction>> {
    let mut rdr = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut rows = Vec::new();
    for (i, result) in rdr.deserialize::<CsvRow>().enumerate() {
        // +2: one for the header, one for 1-based line numbers
        let row = result.with_context(|| format!("reading CSV line {}", i + 2))?;
        if row.is_blank() {
            warn!(line = i + 2, "skipping blank billing row");
            continue;
        }
        rows.push(RawTransaction::from(row));
    }

    normalize_all(rows)
}
