use std::collections::BTreeMap;

use chrono::NaiveDateTime;

/// One sale event from the transactions table.
#[allow(dead_code)]
#[derive(Debug, Clone, PartialEq)]
pub struct Transaction {
    pub timestamp: NaiveDateTime,
    pub branch: String,
    pub seller: String,
    pub product: String,
    /// Columns outside the required schema, keyed by header.
    pub extra: BTreeMap<String, String>,
}

#[allow(dead_code)]
#[derive(Debug, Clone, PartialEq)]
pub struct Product {
    pub id: String,
    pub name: String,
    pub price: f64,
}

#[allow(dead_code)]
#[derive(Debug, Clone, PartialEq)]
pub struct Branch {
    pub id: String,
    pub name: String,
    pub attributes: BTreeMap<String, String>,
}

/// A transaction with its authoritative product price and derived commission.
#[derive(Debug, Clone, PartialEq)]
pub struct EnrichedTransaction {
    pub transaction: Transaction,
    pub price: f64,
    pub commission: f64,
}

impl EnrichedTransaction {
    pub fn date(&self) -> chrono::NaiveDate {
        self.transaction.timestamp.date()
    }

    pub fn key(&self, dimension: Dimension) -> &str {
        match dimension {
            Dimension::Branch => &self.transaction.branch,
            Dimension::Seller => &self.transaction.seller,
            Dimension::Product => &self.transaction.product,
        }
    }
}

/// Grouping dimension for the sales breakdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum Dimension {
    #[default]
    #[value(alias = "filial")]
    Branch,
    #[value(alias = "vendedor")]
    Seller,
    #[value(alias = "produto")]
    Product,
}

impl Dimension {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Branch => "Branch",
            Self::Seller => "Seller",
            Self::Product => "Product",
        }
    }

    pub fn next(&self) -> Self {
        match self {
            Self::Branch => Self::Seller,
            Self::Seller => Self::Product,
            Self::Product => Self::Branch,
        }
    }
}
