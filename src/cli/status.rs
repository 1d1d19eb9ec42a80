use crate::error::Result;
use crate::fmt::number;
use crate::loader::{BRANCHES_FILE, PRODUCTS_FILE, TRANSACTIONS_FILE};
use crate::session::Session;

pub fn run(data_dir: Option<&str>) -> Result<()> {
    let session = super::open_session(data_dir)?;
    println!("{}", format_status(&session));
    Ok(())
}

fn join_names(names: &std::collections::BTreeSet<String>) -> String {
    names.iter().cloned().collect::<Vec<_>>().join(", ")
}

pub fn format_status(session: &Session) -> String {
    let ds = &session.dataset;
    let mut lines = vec![
        format!("Data dir:      {}", ds.dir.display()),
        format!("Currency:      {}", session.currency),
        String::new(),
        format!("{:<14} {} rows", format!("{TRANSACTIONS_FILE}:"), number(ds.transactions.len())),
        format!("{:<14} {} rows", format!("{PRODUCTS_FILE}:"), number(ds.products.len())),
        format!("{:<14} {} rows", format!("{BRANCHES_FILE}:"), number(ds.branches.len())),
        String::new(),
    ];

    match session.span() {
        Some(span) => lines.push(format!("Sales span:    {} to {}", span.start, span.end)),
        None => lines.push("Sales span:    (no sales)".to_string()),
    }
    lines.push(format!("Joined sales:  {}", number(session.join.matched)));
    lines.push(format!("Dropped sales: {}", number(session.join.dropped)));
    if !session.join.unmatched_products.is_empty() {
        lines.push(format!(
            "Unknown products:  {}",
            join_names(&session.join.unmatched_products)
        ));
    }
    if !session.join.unused_products.is_empty() {
        lines.push(format!(
            "Products never sold: {}",
            join_names(&session.join.unused_products)
        ));
    }
    lines.join("\n")
}
