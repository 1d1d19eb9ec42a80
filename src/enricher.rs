use std::collections::{BTreeSet, HashMap};

use crate::models::{EnrichedTransaction, Product, Transaction};

pub const COMMISSION_RATE: f64 = 0.08;

/// What the inner join kept and what it dropped.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct JoinStats {
    pub matched: usize,
    pub dropped: usize,
    /// Product names on transactions with no entry in the product table.
    pub unmatched_products: BTreeSet<String>,
    /// Products no transaction refers to.
    pub unused_products: BTreeSet<String>,
}

pub struct Enriched {
    pub rows: Vec<EnrichedTransaction>,
    pub stats: JoinStats,
}

/// Inner-join transactions to products by name, attaching price and commission.
///
/// Transactions whose product is missing from the product table are dropped and
/// counted in [`JoinStats`]. Output keeps the transactions' original order.
pub fn enrich(transactions: &[Transaction], products: &[Product]) -> Enriched {
    let prices: HashMap<&str, f64> = products
        .iter()
        .map(|p| (p.name.as_str(), p.price))
        .collect();

    let mut stats = JoinStats::default();
    let mut referenced: BTreeSet<&str> = BTreeSet::new();
    let mut rows = Vec::with_capacity(transactions.len());

    for txn in transactions {
        match prices.get(txn.product.as_str()) {
            Some(&price) => {
                referenced.insert(txn.product.as_str());
                rows.push(EnrichedTransaction {
                    transaction: txn.clone(),
                    price,
                    commission: price * COMMISSION_RATE,
                });
            }
            None => {
                stats.dropped += 1;
                stats.unmatched_products.insert(txn.product.clone());
            }
        }
    }
    stats.matched = rows.len();
    stats.unused_products = products
        .iter()
        .filter(|p| !referenced.contains(p.name.as_str()))
        .map(|p| p.name.clone())
        .collect();

    if stats.dropped > 0 {
        log::warn!(
            "Dropped {} transaction(s) with unknown products: {}",
            stats.dropped,
            stats
                .unmatched_products
                .iter()
                .cloned()
                .collect::<Vec<_>>()
                .join(", ")
        );
    }

    Enriched { rows, stats }
}
