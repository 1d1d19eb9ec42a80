use std::path::PathBuf;

use comfy_table::Table;

use crate::error::Result;
use crate::settings::{load_settings, resolve_data_dir};
use crate::spreadsheet::{read_sheet, Sheet};

pub const DEFAULT_SHEET: &str = "vendas.xlsx";

pub fn run(data_dir: Option<&str>, file: Option<String>) -> Result<()> {
    let path = match file {
        Some(f) => PathBuf::from(f),
        None => resolve_data_dir(data_dir, &load_settings()).join(DEFAULT_SHEET),
    };
    let sheet = read_sheet(&path)?;
    println!("{}", format_sheet(&sheet));
    println!("{} rows", sheet.rows.len());
    Ok(())
}

pub fn format_sheet(sheet: &Sheet) -> String {
    let mut table = Table::new();
    if !sheet.headers.is_empty() {
        table.set_header(sheet.headers.clone());
    }
    for row in &sheet.rows {
        table.add_row(row.clone());
    }
    table.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_sheet() {
        let sheet = Sheet {
            headers: vec!["nome".to_string(), "preco".to_string()],
            rows: vec![vec!["P1".to_string(), "100.5".to_string()]],
        };
        let text = format_sheet(&sheet);
        assert!(text.contains("nome"));
        assert!(text.contains("100.5"));
    }

    #[test]
    fn test_format_empty_sheet() {
        let text = format_sheet(&Sheet::default());
        assert!(!text.contains("nome"));
    }
}
