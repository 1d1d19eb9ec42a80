use crate::error::Result;
use crate::loader::{BRANCHES_FILE, PRODUCTS_FILE, TRANSACTIONS_FILE};
use crate::settings::{load_settings, save_settings, shellexpand_path};

pub fn run(data_dir: Option<&str>, currency: Option<String>) -> Result<()> {
    let mut settings = load_settings();

    if let Some(dir) = data_dir {
        settings.data_dir = shellexpand_path(dir);
    }
    if let Some(symbol) = currency {
        settings.currency_symbol = symbol;
    }

    let path = save_settings(&settings)?;
    println!("Saved settings to {}", path.display());
    println!("Data dir: {}", settings.data_dir);

    let dir = std::path::Path::new(&settings.data_dir);
    for name in [TRANSACTIONS_FILE, PRODUCTS_FILE, BRANCHES_FILE] {
        if !dir.join(name).exists() {
            println!("Warning: {name} not found in data dir");
        }
    }
    Ok(())
}
