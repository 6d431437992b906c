//! Spending record types: card transactions in, category summaries out

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result, ValidationError};

/// A card transaction as reported by the billing history
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    /// Partially redacted merchant name (`*` marks hidden characters)
    pub merchant_name_masked: String,
    /// Paid amount as plain decimal digits, e.g. "85000"
    pub paid_amt: String,
    /// Payment date, when the source provides one
    #[serde(default, skip_serializing_if = "Option::is_none", with = "paid_date")]
    pub paid_date: Option<NaiveDate>,
}

impl Transaction {
    /// Create an undated transaction
    pub fn new(merchant_name_masked: impl Into<String>, paid_amt: impl Into<String>) -> Self {
        Self {
            merchant_name_masked: merchant_name_masked.into(),
            paid_amt: paid_amt.into(),
            paid_date: None,
        }
    }

    pub fn with_date(mut self, date: NaiveDate) -> Self {
        self.paid_date = Some(date);
        self
    }

    /// Parse `paid_amt` into a non-negative amount.
    ///
    /// `index` is the transaction's position in the caller's list and is only
    /// used to identify it in the returned error.
    pub fn amount(&self, index: usize) -> Result<u64> {
        parse_amount(&self.paid_amt).map_err(|reason| {
            Error::Validation(ValidationError {
                index,
                merchant: self.merchant_name_masked.clone(),
                paid_amt: self.paid_amt.clone(),
                reason,
            })
        })
    }
}

fn parse_amount(raw: &str) -> std::result::Result<u64, &'static str> {
    if raw.is_empty() {
        return Err("amount is empty");
    }
    if raw.starts_with('-') {
        return Err("amount is negative");
    }
    if !raw.bytes().all(|b| b.is_ascii_digit()) {
        return Err("amount is not a decimal integer");
    }
    raw.parse::<u64>().map_err(|_| "amount is too large")
}

/// Spending categories, in declaration order
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Category {
    Fuel,
    Maintenance,
    Parking,
    Other,
}

impl Category {
    /// Every category in declaration order
    pub const ALL: [Category; 4] = [
        Category::Fuel,
        Category::Maintenance,
        Category::Parking,
        Category::Other,
    ];

    /// Keyword-matched categories in classification priority order
    pub const CAR_RELATED: [Category; 3] =
        [Category::Fuel, Category::Maintenance, Category::Parking];

    pub fn is_car_related(&self) -> bool {
        !matches!(self, Category::Other)
    }

    /// Identifier used in serialized output and keyword files
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Fuel => "FUEL",
            Category::Maintenance => "MAINTENANCE",
            Category::Parking => "PARKING",
            Category::Other => "OTHER",
        }
    }

    /// Dashboard label
    pub fn label(&self) -> &'static str {
        match self {
            Category::Fuel => "주유",
            Category::Maintenance => "정비",
            Category::Parking => "주차",
            Category::Other => "기타",
        }
    }

    /// Chart color. Car-related categories get shades of green, darkest first.
    pub fn color(&self) -> &'static str {
        match self {
            Category::Fuel => "#166534",
            Category::Maintenance => "#16a34a",
            Category::Parking => "#22c55e",
            Category::Other => "#9ca3af",
        }
    }

    /// Position in declaration order, used as the tie-break key
    pub fn ordinal(&self) -> usize {
        *self as usize
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        Category::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(s) || c.label() == s)
            .ok_or_else(|| Error::Keywords(format!("unknown category: {s}")))
    }
}

/// One row of the category breakdown
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CategorySummary {
    pub name: Category,
    /// Sum of paid amounts classified into this category
    pub amount: u64,
    /// Rounded share of the grand total; all summaries add up to 100
    pub percent: u8,
    pub is_car_related: bool,
    pub color: String,
}

impl CategorySummary {
    pub fn new(name: Category, amount: u64, percent: u8) -> Self {
        Self {
            name,
            amount,
            percent,
            is_car_related: name.is_car_related(),
            color: name.color().to_string(),
        }
    }
}

/// Per-category spending for one calendar month
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyTotals {
    pub year: i32,
    pub month: u32,
    /// Amount per category in declaration order, zeros included
    pub amounts: Vec<(Category, u64)>,
    pub total: u64,
}

impl MonthlyTotals {
    pub fn amount_for(&self, category: Category) -> u64 {
        self.amounts
            .iter()
            .find(|(c, _)| *c == category)
            .map(|(_, a)| *a)
            .unwrap_or(0)
    }

    /// Short month label, e.g. "2024-01"
    pub fn label(&self) -> String {
        format!("{:04}-{:02}", self.year, self.month)
    }
}

/// Accepts `YYYY-MM-DD` or `YYYYMMDD`; always writes `YYYY-MM-DD`
pub mod paid_date {
    use chrono::NaiveDate;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn parse(s: &str) -> Option<NaiveDate> {
        let s = s.trim();
        NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .or_else(|_| NaiveDate::parse_from_str(s, "%Y%m%d"))
            .ok()
    }

    pub fn serialize<S: Serializer>(date: &Option<NaiveDate>, s: S) -> Result<S::Ok, S::Error> {
        match date {
            Some(d) => s.serialize_str(&d.format("%Y-%m-%d").to_string()),
            None => s.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<NaiveDate>, D::Error> {
        let raw: Option<String> = Option::deserialize(d)?;
        match raw.as_deref().map(str::trim) {
            None | Some("") => Ok(None),
            Some(s) => parse(s)
                .map(Some)
                .ok_or_else(|| serde::de::Error::custom(format!("invalid paidDate: {s}"))),
        }
    }
}
