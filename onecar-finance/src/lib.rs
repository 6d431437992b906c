//! onecar-finance: merchant keyword rules, category statistics and monthly trend

pub mod category_rules;
pub mod stats;
pub mod trend;

pub use category_rules::{KeywordTable, categorize};
pub use stats::{Breakdown, CategoryTotals, aggregate, aggregate_with, breakdown};
pub use trend::{MonthlyTrend, monthly_trend, monthly_trend_with};
