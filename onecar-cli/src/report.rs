//! Plain-text rendering for breakdowns and trends

use onecar_core::Category;
use onecar_finance::{Breakdown, MonthlyTrend};
use std::fmt::Write;

/// 1234567 -> "1,234,567원"
pub fn won(amount: u64) -> String {
    let digits = amount.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out.push('원');
    out
}

pub fn render_breakdown(b: &Breakdown) -> String {
    if b.is_empty() {
        return "no data\n".to_string();
    }

    let mut out = String::new();
    for s in &b.summaries {
        let _ = writeln!(
            out,
            "{:<12} {:<4} {:>14} {:>4}%  {}{}",
            s.name.as_str(),
            s.name.label(),
            won(s.amount),
            s.percent,
            s.color,
            if s.is_car_related { "  car" } else { "" }
        );
    }
    let _ = writeln!(out, "\ntotal        {}", won(b.total_amount));
    let _ = writeln!(
        out,
        "car-related  {} ({}%)",
        won(b.car_related_amount),
        b.car_related_percent()
    );
    out
}

pub fn render_trend(trend: &MonthlyTrend) -> String {
    let mut out = String::new();
    if trend.months.is_empty() {
        out.push_str("no data\n");
    } else {
        let _ = write!(out, "{:<8}", "month");
        for c in Category::ALL {
            let _ = write!(out, " {:>14}", c.as_str());
        }
        let _ = writeln!(out, " {:>14}", "TOTAL");

        for m in &trend.months {
            let _ = write!(out, "{:<8}", m.label());
            for (_, amount) in &m.amounts {
                let _ = write!(out, " {:>14}", won(*amount));
            }
            let _ = writeln!(out, " {:>14}", won(m.total));
        }
    }
    if trend.undated > 0 {
        let _ = writeln!(out, "\n({} transactions without a paid date skipped)", trend.undated);
    }
    out
}
