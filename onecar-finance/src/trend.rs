//! Month-by-month spending per category, for the card usage trend chart.

use std::collections::BTreeMap;

use chrono::Datelike;
use onecar_core::{Category, MonthlyTotals, Result, Transaction};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::category_rules::KeywordTable;
use crate::stats::CategoryTotals;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyTrend {
    /// Months with at least one dated transaction, oldest first
    pub months: Vec<MonthlyTotals>,
    /// Transactions skipped because they carry no paid date
    pub undated: usize,
}

/// Monthly trend using the built-in keyword table
pub fn monthly_trend(transactions: &[Transaction]) -> Result<MonthlyTrend> {
    monthly_trend_with(KeywordTable::builtin(), transactions)
}

/// Group dated transactions by calendar month.
///
/// Every amount is validated, dated or not, so a file that fails `aggregate`
/// also fails here.
pub fn monthly_trend_with(
    table: &KeywordTable,
    transactions: &[Transaction],
) -> Result<MonthlyTrend> {
    let mut grand = CategoryTotals::default();
    let mut by_month: BTreeMap<(i32, u32), CategoryTotals> = BTreeMap::new();
    let mut undated = 0;

    for (index, txn) in transactions.iter().enumerate() {
        let amount = txn.amount(index)?;
        let category = table.categorize(&txn.merchant_name_masked);
        grand.add(index, category, amount)?;

        match txn.paid_date {
            Some(date) => by_month
                .entry((date.year(), date.month()))
                .or_default()
                .add(index, category, amount)?,
            None => undated += 1,
        }
    }

    let months: Vec<MonthlyTotals> = by_month
        .into_iter()
        .map(|((year, month), totals)| MonthlyTotals {
            year,
            month,
            amounts: Category::ALL
                .into_iter()
                .map(|c| (c, totals.amount(c)))
                .collect(),
            total: totals.total,
        })
        .collect();

    debug!(months = months.len(), undated, "built monthly trend");
    Ok(MonthlyTrend { months, undated })
}
