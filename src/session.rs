use std::path::Path;

use chrono::NaiveDate;

use crate::enricher::{enrich, JoinStats};
use crate::error::Result;
use crate::filter::DateRange;
use crate::loader::{load_dataset, Dataset};
use crate::models::{Dimension, EnrichedTransaction};
use crate::reports::{get_sales_report, SalesReport};

/// User-controlled inputs to a report run.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ReportParams {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    pub dimension: Dimension,
}

/// Tables loaded once per run, plus the joined rows every report is computed from.
pub struct Session {
    pub dataset: Dataset,
    pub rows: Vec<EnrichedTransaction>,
    pub join: JoinStats,
    pub currency: String,
}

impl Session {
    pub fn load(dir: &Path, currency: &str) -> Result<Self> {
        Ok(Self::from_dataset(load_dataset(dir)?, currency))
    }

    pub fn from_dataset(dataset: Dataset, currency: &str) -> Self {
        let enriched = enrich(&dataset.transactions, &dataset.products);
        Self {
            dataset,
            rows: enriched.rows,
            join: enriched.stats,
            currency: currency.to_string(),
        }
    }

    /// Full span of the transactions table, joined or not; the default
    /// filter range.
    pub fn span(&self) -> Option<DateRange> {
        DateRange::from_dates(self.dataset.transactions.iter().map(|t| t.timestamp.date()))
    }

    pub fn resolve_range(&self, params: &ReportParams) -> Option<DateRange> {
        DateRange::resolve(params.from, params.to, self.span())
    }

    pub fn report(&self, params: &ReportParams) -> SalesReport {
        self.report_for(self.resolve_range(params), params.dimension)
    }

    pub fn report_for(&self, range: Option<DateRange>, dimension: Dimension) -> SalesReport {
        get_sales_report(&self.rows, range, dimension)
    }

    pub fn money(&self, val: f64) -> String {
        crate::fmt::money(&self.currency, val)
    }
}
