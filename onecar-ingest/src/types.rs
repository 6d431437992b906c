use anyhow::{Context, Result, bail};
use onecar_core::Transaction;
use onecar_core::finance::paid_date;
use serde::Deserialize;

/// Billing export formats understood by the loaders
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    Json,
    Csv,
}

impl SourceFormat {
    /// Pick a format from a file extension (case-insensitive)
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "json" => Some(SourceFormat::Json),
            "csv" => Some(SourceFormat::Csv),
            _ => None,
        }
    }
}

/// Amount as it appears in a JSON export: usually a digit string, sometimes a
/// bare number.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub(crate) enum RawAmount {
    Text(String),
    Number(serde_json::Number),
}

impl RawAmount {
    fn into_string(self) -> String {
        match self {
            RawAmount::Text(s) => s,
            RawAmount::Number(n) => n.to_string(),
        }
    }
}

/// One billing-history row before normalization.
///
/// Accepts both the camelCase names used by the dashboard and the snake_case
/// names of the open-banking card API.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct RawTransaction {
    #[serde(rename = "merchantNameMasked", alias = "merchant_name_masked")]
    pub merchant_name_masked: String,
    #[serde(rename = "paidAmt", alias = "paid_amt")]
    pub paid_amt: RawAmount,
    #[serde(default, rename = "paidDate", alias = "paid_date")]
    pub paid_date: Option<String>,
}

/// CSV row. Every field is read as text: the `csv` deserializer guesses
/// types for untagged enums, which would rewrite amounts like `+100` or `007`.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct CsvRow {
    #[serde(rename = "merchantNameMasked", alias = "merchant_name_masked")]
    pub merchant_name_masked: String,
    #[serde(rename = "paidAmt", alias = "paid_amt")]
    pub paid_amt: String,
    #[serde(default, rename = "paidDate", alias = "paid_date")]
    pub paid_date: Option<String>,
}

impl CsvRow {
    pub fn is_blank(&self) -> bool {
        self.merchant_name_masked.is_empty() && self.paid_amt.is_empty()
    }
}

impl From<CsvRow> for RawTransaction {
    fn from(row: CsvRow) -> Self {
        Self {
            merchant_name_masked: row.merchant_name_masked,
            paid_amt: RawAmount::Text(row.paid_amt),
            paid_date: row.paid_date,
        }
    }
}

impl RawTransaction {
    /// Amount text is kept verbatim; the engine validates it
    pub fn normalize(self, row: usize) -> Result<Transaction> {
        let mut txn = Transaction::new(self.merchant_name_masked, self.paid_amt.into_string());
        if let Some(raw) = self.paid_date.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            let Some(date) = paid_date::parse(raw) else {
                bail!("row {row}: invalid paidDate {raw:?} (expected YYYY-MM-DD or YYYYMMDD)");
            };
            txn = txn.with_date(date);
        }
        Ok(txn)
    }
}

pub(crate) fn normalize_all(rows: Vec<RawTransaction>) -> Result<Vec<Transaction>> {
    rows.into_iter()
        .enumerate()
        .map(|(i, raw)| raw.normalize(i).context("normalizing billing history"))
        .collect()
}
