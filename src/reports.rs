use std::collections::BTreeMap;

use chrono::NaiveDate;

use crate::filter::{filter, DateRange};
use crate::models::{Dimension, EnrichedTransaction};

// ---------------------------------------------------------------------------
// Totals
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Totals {
    pub value: f64,
    pub count: usize,
    pub commission: f64,
}

pub fn totals(rows: &[&EnrichedTransaction]) -> Totals {
    Totals {
        value: rows.iter().map(|r| r.price).sum(),
        count: rows.len(),
        commission: rows.iter().map(|r| r.commission).sum(),
    }
}

// ---------------------------------------------------------------------------
// Daily series
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct DailyTotal {
    pub date: NaiveDate,
    pub total: f64,
}

/// Sales value per calendar day, ascending by date. Days without sales are absent.
pub fn daily_series(rows: &[&EnrichedTransaction]) -> Vec<DailyTotal> {
    let mut by_day: BTreeMap<NaiveDate, f64> = BTreeMap::new();
    for r in rows {
        *by_day.entry(r.date()).or_default() += r.price;
    }
    by_day
        .into_iter()
        .map(|(date, total)| DailyTotal { date, total })
        .collect()
}

// ---------------------------------------------------------------------------
// Dimension breakdown
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct GroupTotal {
    pub key: String,
    pub total: f64,
    pub count: usize,
}

/// Sales value per distinct value of `dimension`, ordered by key.
pub fn breakdown(rows: &[&EnrichedTransaction], dimension: Dimension) -> Vec<GroupTotal> {
    let mut groups: BTreeMap<&str, (f64, usize)> = BTreeMap::new();
    for r in rows {
        let entry = groups.entry(r.key(dimension)).or_default();
        entry.0 += r.price;
        entry.1 += 1;
    }
    groups
        .into_iter()
        .map(|(key, (total, count))| GroupTotal {
            key: key.to_string(),
            total,
            count,
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Sales report
// ---------------------------------------------------------------------------

pub struct SalesReport {
    pub range: Option<DateRange>,
    pub dimension: Dimension,
    pub totals: Totals,
    pub daily: Vec<DailyTotal>,
    pub breakdown: Vec<GroupTotal>,
}

impl SalesReport {
    /// True when no sale falls in the selected period.
    pub fn is_empty(&self) -> bool {
        self.totals.count == 0
    }

    /// Breakdown sorted by value, largest first (display order for the bar chart).
    pub fn breakdown_by_value(&self) -> Vec<&GroupTotal> {
        let mut items: Vec<&GroupTotal> = self.breakdown.iter().collect();
        items.sort_by(|a, b| b.total.total_cmp(&a.total).then_with(|| a.key.cmp(&b.key)));
        items
    }
}

/// Filter `rows` to `range` and run all three aggregations over the result.
/// A missing range selects nothing.
pub fn get_sales_report(
    rows: &[EnrichedTransaction],
    range: Option<DateRange>,
    dimension: Dimension,
) -> SalesReport {
    let filtered = match &range {
        Some(r) => filter(rows, r),
        None => Vec::new(),
    };
    log::debug!(
        "Sales report: {} of {} rows in {:?}, by {}",
        filtered.len(),
        rows.len(),
        range,
        dimension.label()
    );
    SalesReport {
        range,
        dimension,
        totals: totals(&filtered),
        daily: daily_series(&filtered),
        breakdown: breakdown(&filtered, dimension),
    }
}
