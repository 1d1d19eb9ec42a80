use colored::Colorize;
use comfy_table::{Cell, CellAlignment, Table};

use crate::error::Result;
use crate::fmt::number;
use crate::reports::SalesReport;
use crate::session::{ReportParams, Session};

pub const EMPTY_MESSAGE: &str = "No sales in the selected period.";

pub fn run(data_dir: Option<&str>, params: ReportParams) -> Result<()> {
    let session = super::open_session(data_dir)?;
    let report = session.report(&params);
    println!("{}", format_report(&session, &report));
    Ok(())
}

fn period_label(report: &SalesReport) -> String {
    match report.range {
        Some(r) => format!("{} to {}", r.start, r.end),
        None => "no data".to_string(),
    }
}

fn amount_cell(session: &Session, val: f64) -> Cell {
    Cell::new(session.money(val)).set_alignment(CellAlignment::Right)
}

// ---------------------------------------------------------------------------
// Pure formatting functions (report data → String)
// ---------------------------------------------------------------------------

pub fn format_report(session: &Session, report: &SalesReport) -> String {
    let mut out = format!("Sales Dashboard \u{2014} {}\n", period_label(report));

    let mut totals = Table::new();
    totals.set_header(vec!["Metric", "Value"]);
    totals.add_row(vec![Cell::new("Total sales"), amount_cell(session, report.totals.value)]);
    totals.add_row(vec![
        Cell::new("Sales count"),
        Cell::new(number(report.totals.count)).set_alignment(CellAlignment::Right),
    ]);
    totals.add_row(vec![
        Cell::new("Commission"),
        amount_cell(session, report.totals.commission),
    ]);
    out.push_str(&format!("{totals}\n"));

    if session.join.dropped > 0 {
        out.push_str(&format!(
            "{}\n",
            format!(
                "{} sale(s) skipped: product not in catalog",
                number(session.join.dropped)
            )
            .yellow()
        ));
    }

    if report.is_empty() {
        out.push_str(EMPTY_MESSAGE);
        return out;
    }

    out.push_str(&format!("\n{}\n{}\n", "Sales per day".bold(), format_daily(session, report)));
    out.push_str(&format!(
        "\n{}\n{}",
        format!("Sales by {}", report.dimension.label()).bold(),
        format_breakdown(session, report)
    ));
    out
}

pub fn format_daily(session: &Session, report: &SalesReport) -> String {
    let mut table = Table::new();
    table.set_header(vec!["Date", "Sales"]);
    for point in &report.daily {
        table.add_row(vec![
            Cell::new(point.date.format("%Y-%m-%d")),
            amount_cell(session, point.total),
        ]);
    }
    table.to_string()
}

pub fn format_breakdown(session: &Session, report: &SalesReport) -> String {
    let mut table = Table::new();
    table.set_header(vec![report.dimension.label(), "Sales", "Count", "%"]);
    let total = report.totals.value;
    for group in report.breakdown_by_value() {
        let pct = if total != 0.0 { group.total / total * 100.0 } else { 0.0 };
        table.add_row(vec![
            Cell::new(&group.key),
            amount_cell(session, group.total),
            Cell::new(number(group.count)).set_alignment(CellAlignment::Right),
            Cell::new(format!("{pct:.1}%")).set_alignment(CellAlignment::Right),
        ]);
    }
    table.to_string()
}
