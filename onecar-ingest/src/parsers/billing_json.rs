//! Billing history JSON
//!
//! Either a bare array of rows or an API envelope holding the rows under
//! `transactions` or `bill_detail_list`.

use anyhow::{Context, Result};
use onecar_core::Transaction;
use serde::Deserialize;

use crate::types::{RawTransaction, normalize_all};

#[derive(Deserialize)]
#[serde(untagged)]
enum BillingDocument {
    Rows(Vec<RawTransaction>),
    Envelope {
        #[serde(alias = "bill_detail_list")]
        transactions: Vec<RawTransaction>,
    },
}

pub fn parse_billing_json(text: &str) -> Result<Vec<Transaction>> {
    let doc: BillingDocument =
        serde_json::from_str(text).context("billing JSON is neither a row array nor an envelope")?;
    let rows = match doc {
        BillingDocument::Rows(rows) => rows,
        BillingDocument::Envelope { transactions } => transactions,
    };
    normalize_all(rows)
}
