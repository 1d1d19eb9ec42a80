use chrono::{Days, NaiveDate, NaiveDateTime};

use crate::models::EnrichedTransaction;

/// Inclusive date range over transaction timestamps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    /// Earliest to latest of `dates`; `None` when there are none.
    pub fn from_dates(dates: impl IntoIterator<Item = NaiveDate>) -> Option<Self> {
        dates.into_iter().fold(None, |acc: Option<Self>, day| match acc {
            Some(r) => Some(Self::new(r.start.min(day), r.end.max(day))),
            None => Some(Self::new(day, day)),
        })
    }

    /// Fill missing bounds from `span`. `None` only when a bound is missing
    /// and there is no span to default it from.
    pub fn resolve(
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
        span: Option<Self>,
    ) -> Option<Self> {
        if let (Some(start), Some(end)) = (from, to) {
            return Some(Self::new(start, end));
        }
        let span = span?;
        Some(Self::new(from.unwrap_or(span.start), to.unwrap_or(span.end)))
    }

    /// `start <= ts` and `ts < end + 1 day`.
    pub fn contains(&self, ts: NaiveDateTime) -> bool {
        let day = ts.date();
        if day < self.start {
            return false;
        }
        match self.end.checked_add_days(Days::new(1)) {
            Some(upper) => day < upper,
            // end is the last representable date: nothing lies beyond it
            None => true,
        }
    }

    pub fn is_inverted(&self) -> bool {
        self.start > self.end
    }

    pub fn shift_start(&mut self, delta: i64) {
        self.start = shift(self.start, delta);
    }

    pub fn shift_end(&mut self, delta: i64) {
        self.end = shift(self.end, delta);
    }
}

fn shift(date: NaiveDate, delta: i64) -> NaiveDate {
    let days = Days::new(delta.unsigned_abs());
    let moved = if delta >= 0 {
        date.checked_add_days(days)
    } else {
        date.checked_sub_days(days)
    };
    moved.unwrap_or(date)
}

/// Rows whose timestamp falls inside `range`, in input order.
pub fn filter<'a>(
    rows: &'a [EnrichedTransaction],
    range: &DateRange,
) -> Vec<&'a EnrichedTransaction> {
    rows.iter()
        .filter(|r| range.contains(r.transaction.timestamp))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Transaction;

    fn d(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn row(ts: &str) -> EnrichedTransaction {
        EnrichedTransaction {
            transaction: Transaction {
                timestamp: NaiveDateTime::parse_from_str(ts, "%Y-%m-%d %H:%M:%S").unwrap(),
                branch: "Centro".to_string(),
                seller: "Ana".to_string(),
                product: "P1".to_string(),
                extra: Default::default(),
            },
            price: 10.0,
            commission: 0.8,
        }
    }

    fn span(rows: &[EnrichedTransaction]) -> Option<DateRange> {
        DateRange::from_dates(rows.iter().map(|r| r.date()))
    }

    fn sample() -> Vec<EnrichedTransaction> {
        vec![
            row("2024-01-01 00:00:00"),
            row("2024-01-01 23:59:59"),
            row("2024-01-02 08:00:00"),
            row("2024-01-03 00:00:00"),
            row("2024-01-05 17:30:00"),
        ]
    }

    #[test]
    fn test_single_day_range_keeps_whole_day() {
        let rows = sample();
        let out = filter(&rows, &DateRange::new(d("2024-01-01"), d("2024-01-01")));
        assert_eq!(out.len(), 2);
        assert!(out.iter().all(|r| r.date() == d("2024-01-01")));
    }

    #[test]
    fn test_end_date_is_inclusive() {
        let rows = sample();
        let out = filter(&rows, &DateRange::new(d("2024-01-02"), d("2024-01-03")));
        assert_eq!(out.len(), 2);
    }

    #[test]
    fn test_inverted_range_is_empty() {
        let rows = sample();
        let range = DateRange::new(d("2024-01-05"), d("2024-01-01"));
        assert!(range.is_inverted());
        assert!(filter(&rows, &range).is_empty());
    }

    #[test]
    fn test_range_outside_data_is_empty() {
        let rows = sample();
        assert!(filter(&rows, &DateRange::new(d("2023-01-01"), d("2023-12-31"))).is_empty());
    }

    #[test]
    fn test_last_representable_date() {
        let rows = sample();
        let out = filter(&rows, &DateRange::new(d("2024-01-05"), NaiveDate::MAX));
        assert_eq!(out.len(), 1);
    }

    #[test]
    fn test_span_defaults() {
        let rows = sample();
        let span = span(&rows).unwrap();
        assert_eq!(span.start, d("2024-01-01"));
        assert_eq!(span.end, d("2024-01-05"));
        assert_eq!(filter(&rows, &span).len(), rows.len());
        assert!(self::span(&[]).is_none());
    }

    #[test]
    fn test_resolve_fills_missing_bounds() {
        let span = span(&sample());
        let r = DateRange::resolve(Some(d("2024-01-02")), None, span).unwrap();
        assert_eq!(r, DateRange::new(d("2024-01-02"), d("2024-01-05")));
        let r = DateRange::resolve(None, Some(d("2024-01-02")), span).unwrap();
        assert_eq!(r, DateRange::new(d("2024-01-01"), d("2024-01-02")));
        let r = DateRange::resolve(Some(d("2020-01-01")), Some(d("2020-01-02")), None).unwrap();
        assert_eq!(r.start, d("2020-01-01"));
        assert!(DateRange::resolve(None, None, None).is_none());
    }

    #[test]
    fn test_from_dates_any_order() {
        let r = DateRange::from_dates([d("2024-01-09"), d("2023-12-25"), d("2024-01-01")]);
        assert_eq!(r, Some(DateRange::new(d("2023-12-25"), d("2024-01-09"))));
        assert_eq!(DateRange::from_dates(std::iter::empty()), None);
    }

    #[test]
    fn test_shift() {
        let mut r = DateRange::new(d("2024-01-01"), d("2024-01-31"));
        r.shift_start(1);
        r.shift_end(-2);
        assert_eq!(r, DateRange::new(d("2024-01-02"), d("2024-01-29")));
        let mut edge = DateRange::new(NaiveDate::MIN, NaiveDate::MAX);
        edge.shift_start(-1);
        edge.shift_end(1);
        assert_eq!(edge, DateRange::new(NaiveDate::MIN, NaiveDate::MAX));
    }
}
