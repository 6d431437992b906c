//! Category statistics: totals per category and a percentage split that
//! always adds up to exactly 100.

use onecar_core::{Category, CategorySummary, Error, Result, Transaction};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::category_rules::KeywordTable;

/// Per-category totals plus the grand total over every transaction
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CategoryTotals {
    amounts: [u64; 4],
    pub total: u64,
}

impl CategoryTotals {
    /// Classify and sum a transaction list, rejecting malformed amounts
    pub fn collect(table: &KeywordTable, transactions: &[Transaction]) -> Result<Self> {
        let mut totals = Self::default();
        for (index, txn) in transactions.iter().enumerate() {
            let amount = txn.amount(index)?;
            let category = table.categorize(&txn.merchant_name_masked);
            totals.add(index, category, amount)?;
        }
        Ok(totals)
    }

    pub(crate) fn add(&mut self, index: usize, category: Category, amount: u64) -> Result<()> {
        let slot = &mut self.amounts[category.ordinal()];
        *slot = slot
            .checked_add(amount)
            .ok_or(Error::AmountOverflow { index })?;
        self.total = self
            .total
            .checked_add(amount)
            .ok_or(Error::AmountOverflow { index })?;
        Ok(())
    }

    pub fn amount(&self, category: Category) -> u64 {
        self.amounts[category.ordinal()]
    }

    /// Non-zero categories in display order: car-related first, each group by
    /// descending amount, ties by declaration order.
    pub fn display_order(&self) -> Vec<(Category, u64)> {
        let mut ordered: Vec<(Category, u64)> = Category::ALL
            .into_iter()
            .map(|c| (c, self.amount(c)))
            .filter(|(_, amount)| *amount > 0)
            .collect();
        // stable sort keeps declaration order among equal keys
        ordered.sort_by_key(|(c, amount)| (!c.is_car_related(), std::cmp::Reverse(*amount)));
        ordered
    }
}

/// Percentage of `total` rounded half up, computed exactly on integers
fn round_percent(amount: u64, total: u64) -> u8 {
    let amount = u128::from(amount);
    let total = u128::from(total);
    // floor(100 * amount / total + 1/2)
    ((200 * amount + total) / (2 * total)) as u8
}

/// Turn ordered (category, amount) pairs into summaries.
///
/// Every entry except the last takes its rounded percentage out of a budget of
/// 100; the last entry receives what is left. A rounded value is capped at the
/// remaining budget so no entry can go negative.
fn allocate(ordered: Vec<(Category, u64)>, total: u64) -> Vec<CategorySummary> {
    let last = ordered.len().saturating_sub(1);
    ordered
        .into_iter()
        .enumerate()
        .scan(100u8, |remaining, (i, (category, amount))| {
            let percent = if i == last {
                *remaining
            } else {
                round_percent(amount, total).min(*remaining)
            };
            *remaining -= percent;
            Some(CategorySummary::new(category, amount, percent))
        })
        .collect()
}

/// Category breakdown using the built-in keyword table
pub fn aggregate(transactions: &[Transaction]) -> Result<Vec<CategorySummary>> {
    aggregate_with(KeywordTable::builtin(), transactions)
}

/// Category breakdown using a caller-supplied keyword table.
///
/// Returns an empty list when there is nothing to show (no transactions, or
/// every amount is zero).
pub fn aggregate_with(
    table: &KeywordTable,
    transactions: &[Transaction],
) -> Result<Vec<CategorySummary>> {
    let totals = CategoryTotals::collect(table, transactions)?;
    let ordered = totals.display_order();
    if ordered.is_empty() {
        debug!(transactions = transactions.len(), "no spending to summarize");
        return Ok(Vec::new());
    }

    let summaries = allocate(ordered, totals.total);
    debug!(
        transactions = transactions.len(),
        categories = summaries.len(),
        total = totals.total,
        "aggregated category stats"
    );
    Ok(summaries)
}

/// Aggregate output together with the totals the dashboard shows next to it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Breakdown {
    pub summaries: Vec<CategorySummary>,
    pub total_amount: u64,
    /// Spending on fuel, maintenance and parking combined
    pub car_related_amount: u64,
}

impl Breakdown {
    pub fn is_empty(&self) -> bool {
        self.summaries.is_empty()
    }

    /// Sum of the car-related rows' rounded percentages
    pub fn car_related_percent(&self) -> u8 {
        self.summaries
            .iter()
            .filter(|s| s.is_car_related)
            .map(|s| s.percent)
            .sum()
    }
}

pub fn breakdown(table: &KeywordTable, transactions: &[Transaction]) -> Result<Breakdown> {
    let summaries = aggregate_with(table, transactions)?;
    let total_amount = summaries.iter().map(|s| s.amount).sum();
    let car_related_amount = summaries
        .iter()
        .filter(|s| s.is_car_related)
        .map(|s| s.amount)
        .sum();
    Ok(Breakdown {
        summaries,
        total_amount,
        car_related_amount,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn txn(merchant: &str, amt: &str) -> Transaction {
        Transaction::new(merchant, amt)
    }

    #[test]
    fn test_round_percent_half_up() {
        assert_eq!(round_percent(1, 2), 50);
        assert_eq!(round_percent(1, 3), 33);
        assert_eq!(round_percent(2, 3), 67);
        assert_eq!(round_percent(1, 200), 1); // 0.5 rounds up
        assert_eq!(round_percent(1, 201), 0);
        assert_eq!(round_percent(u64::MAX, u64::MAX), 100);
    }

    #[test]
    fn test_fuel_and_maintenance_scenario() {
        let stats = aggregate(&[
            txn("GS칼텍스 강남점", "85000"),
            txn("현대자동차 서비스센터", "180000"),
        ])
        .unwrap();

        assert_eq!(stats.len(), 2);
        assert_eq!(stats[0].name, Category::Maintenance);
        assert_eq!(stats[0].amount, 180000);
        assert_eq!(stats[0].percent, 68);
        assert_eq!(stats[1].name, Category::Fuel);
        assert_eq!(stats[1].amount, 85000);
        assert_eq!(stats[1].percent, 32);
        assert!(stats.iter().all(|s| s.is_car_related));
    }

    #[test]
    fn test_single_other_gets_everything() {
        let stats = aggregate(&[txn("스타벅스 역삼점", "1000")]).unwrap();
        assert_eq!(stats, vec![CategorySummary::new(Category::Other, 1000, 100)]);
        assert!(!stats[0].is_car_related);
        assert_eq!(stats[0].color, "#9ca3af");
    }

    #[test]
    fn test_empty_and_all_zero_inputs() {
        assert!(aggregate(&[]).unwrap().is_empty());
        assert!(
            aggregate(&[txn("GS칼텍스", "0"), txn("쿠팡", "0")])
                .unwrap()
                .is_empty()
        );
    }

    #[test]
    fn test_zero_category_excluded() {
        let stats = aggregate(&[
            txn("GS칼텍스 강남점", "50000"),
            txn("롯데마트 주차장", "0"),
            txn("쿠팡 자동차용품", "50000"),
        ])
        .unwrap();
        let names: Vec<_> = stats.iter().map(|s| s.name).collect();
        assert_eq!(names, vec![Category::Fuel, Category::Other]);
        assert_eq!(stats[0].percent + stats[1].percent, 100);
    }

    #[test]
    fn test_other_comes_after_car_related_even_when_larger() {
        let stats = aggregate(&[
            txn("롯데마트 주차장", "3000"),
            txn("쿠팡 자동차용품", "900000"),
            txn("SK에너지 역삼점", "92000"),
        ])
        .unwrap();
        let names: Vec<_> = stats.iter().map(|s| s.name).collect();
        assert_eq!(names, vec![Category::Fuel, Category::Parking, Category::Other]);
        // 9.2 -> 9, 0.3 -> 0, other absorbs the rest
        assert_eq!(stats[0].percent, 9);
        assert_eq!(stats[1].percent, 0);
        assert_eq!(stats[2].percent, 91);
    }

    #[test]
    fn test_ties_follow_declaration_order() {
        let stats = aggregate(&[
            txn("롯데마트 주차장", "1000"),
            txn("블루핸즈 정비소", "1000"),
            txn("GS칼텍스", "1000"),
        ])
        .unwrap();
        let names: Vec<_> = stats.iter().map(|s| s.name).collect();
        assert_eq!(
            names,
            vec![Category::Fuel, Category::Maintenance, Category::Parking]
        );
        let percents: Vec<_> = stats.iter().map(|s| s.percent).collect();
        assert_eq!(percents, vec![33, 33, 34]);
    }

    #[test]
    fn test_last_entry_never_goes_negative() {
        // exact: 33.5, 33.5, 32.5, 0.5 -> three round-ups would overdraw
        let stats = aggregate(&[
            txn("GS칼텍스", "335"),
            txn("카센터", "335"),
            txn("주차장", "325"),
            txn("편의점", "5"),
        ])
        .unwrap();
        let percents: Vec<_> = stats.iter().map(|s| s.percent).collect();
        assert_eq!(percents, vec![34, 34, 32, 0]);
        assert_eq!(stats[3].name, Category::Other);
    }

    #[test]
    fn test_invalid_amount_is_rejected_with_index() {
        let err = aggregate(&[txn("GS칼텍스", "100"), txn("쿠팡", "12a")]).unwrap_err();
        match err {
            Error::Validation(v) => {
                assert_eq!(v.index, 1);
                assert_eq!(v.merchant, "쿠팡");
            }
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn test_overflow_is_rejected() {
        let max = u64::MAX.to_string();
        let err = aggregate(&[txn("GS칼텍스", &max), txn("쿠팡", "1")]).unwrap_err();
        assert_eq!(err, Error::AmountOverflow { index: 1 });
    }

    #[test]
    fn test_custom_table() {
        let table = KeywordTable::new([(Category::Fuel, vec!["shell"])]).unwrap();
        let stats = aggregate_with(&table, &[txn("SHELL 0042", "10"), txn("GS칼텍스", "30")])
            .unwrap();
        assert_eq!(stats[0].name, Category::Fuel);
        assert_eq!(stats[0].percent, 25);
        assert_eq!(stats[1].name, Category::Other);
        assert_eq!(stats[1].percent, 75);
    }

    #[test]
    fn test_breakdown_totals() {
        let b = breakdown(
            KeywordTable::builtin(),
            &[
                txn("GS칼텍스 강남점", "85000"),
                txn("현대자동차 서비스센터", "180000"),
                txn("SK에너지 역삼점", "92000"),
                txn("롯데마트 주차장", "3000"),
                txn("쿠팡 자동차용품", "45000"),
            ],
        )
        .unwrap();
        assert_eq!(b.total_amount, 405000);
        assert_eq!(b.car_related_amount, 360000);
        assert_eq!(b.car_related_percent(), 89);
        assert!(!b.is_empty());
    }
}
