mod cli;
mod enricher;
mod error;
mod filter;
mod fmt;
mod loader;
mod models;
mod reports;
mod session;
mod settings;
mod spreadsheet;
mod tui;

use clap::Parser;
use env_logger::Env;

use cli::{Cli, Commands, FilterArgs};

fn main() {
    env_logger::Builder::from_env(Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    let data_dir = cli.data_dir.as_deref();

    let result = match cli.command {
        None => cli::dashboard::run(data_dir, FilterArgs::default().params()),
        Some(Commands::Dashboard { filter }) => cli::dashboard::run(data_dir, filter.params()),
        Some(Commands::Report { filter }) => cli::report::run(data_dir, filter.params()),
        Some(Commands::Status) => cli::status::run(data_dir),
        Some(Commands::Table { file }) => cli::table::run(data_dir, file),
        Some(Commands::Init { currency }) => cli::init::run(data_dir, currency),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
