pub mod dashboard;
pub mod init;
pub mod report;
pub mod status;
pub mod table;

use chrono::NaiveDate;
use clap::{Parser, Subcommand};

use crate::error::Result;
use crate::models::Dimension;
use crate::session::{ReportParams, Session};
use crate::settings::{load_settings, resolve_data_dir};

pub(crate) fn parse_date_arg(s: &str) -> std::result::Result<NaiveDate, String> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
        .map_err(|_| format!("expected a date as YYYY-MM-DD, got '{s}'"))
}

/// Load settings, resolve the data directory and build the per-run session.
pub(crate) fn open_session(data_dir: Option<&str>) -> Result<Session> {
    let settings = load_settings();
    let dir = resolve_data_dir(data_dir, &settings);
    Session::load(&dir, &settings.currency_symbol)
}

#[derive(Parser)]
#[command(name = "salesdash", about = "Sales dashboard over branch, product and transaction tables.")]
pub struct Cli {
    /// Directory holding vendas.csv, produtos.csv and filiais.csv
    #[arg(long = "data-dir", global = true)]
    pub data_dir: Option<String>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(clap::Args, Clone, Copy, Debug, Default)]
pub struct FilterArgs {
    /// Start date, inclusive: YYYY-MM-DD (default: first sale)
    #[arg(long = "from", value_parser = parse_date_arg)]
    pub from: Option<NaiveDate>,
    /// End date, inclusive: YYYY-MM-DD (default: last sale)
    #[arg(long = "to", value_parser = parse_date_arg)]
    pub to: Option<NaiveDate>,
    /// Group sales by
    #[arg(long = "by", value_enum, default_value_t = Dimension::Branch)]
    pub by: Dimension,
}

impl FilterArgs {
    pub fn params(&self) -> ReportParams {
        ReportParams {
            from: self.from,
            to: self.to,
            dimension: self.by,
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Interactive sales dashboard (plain text when stdout is not a terminal).
    Dashboard {
        #[command(flatten)]
        filter: FilterArgs,
    },
    /// Print totals, daily sales and the grouped breakdown as text.
    Report {
        #[command(flatten)]
        filter: FilterArgs,
    },
    /// Show the data directory, table sizes and join statistics.
    Status,
    /// Display a spreadsheet or semicolon CSV as a table.
    Table {
        /// File to show (default: <data-dir>/vendas.xlsx)
        file: Option<String>,
    },
    /// Save the data directory (from --data-dir) and currency to settings.
    Init {
        /// Currency symbol used for sales values
        #[arg(long)]
        currency: Option<String>,
    },
}
