//! onecar-ingest: loading card billing history (JSON/CSV) into transactions.

pub mod parsers;
pub mod types;

use anyhow::{Context, Result, bail};
use onecar_core::Transaction;
use std::fs;
use std::path::Path;
use tracing::debug;

pub use parsers::billing_csv::parse_billing_csv;
pub use parsers::billing_json::parse_billing_json;
pub use types::SourceFormat;

/// Load a billing history file, choosing the parser by extension
pub fn load_transactions(path: impl AsRef<Path>) -> Result<Vec<Transaction>> {
    let path = path.as_ref();
    let format = path
        .extension()
        .and_then(|e| e.to_str())
        .and_then(SourceFormat::from_extension);
    let Some(format) = format else {
        bail!(
            "unsupported billing file {} (expected .json or .csv)",
            path.display()
        );
    };
    load_transactions_as(path, format)
}

pub fn load_transactions_as(path: &Path, format: SourceFormat) -> Result<Vec<Transaction>> {
    let txns = match format {
        SourceFormat::Json => {
            let text =
                fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
            parse_billing_json(&text)
        }
        SourceFormat::Csv => {
            let file = fs::File::open(path).with_context(|| format!("open {}", path.display()))?;
            parse_billing_csv(file)
        }
    }
    .with_context(|| format!("parsing {}", path.display()))?;

    debug!(path = %path.display(), count = txns.len(), "loaded billing history");
    Ok(txns)
}
