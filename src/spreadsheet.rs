use std::path::Path;

use crate::error::{Result, SalesError};
use crate::loader::{parse_decimal, semicolon_reader};

/// A header row plus string cells, as read by the table viewer.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Sheet {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

const SPREADSHEET_EXTENSIONS: &[&str] = &["xlsx", "xlsm", "xls", "xlsb", "ods"];

pub fn is_spreadsheet(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map_or(false, |e| {
            SPREADSHEET_EXTENSIONS
                .iter()
                .any(|x| x.eq_ignore_ascii_case(e))
        })
}

/// Read a spreadsheet (first worksheet) or a semicolon CSV into a [`Sheet`].
///
/// The semicolon/comma-decimal convention only applies to CSV input; workbook
/// cells are already typed.
pub fn read_sheet(path: &Path) -> Result<Sheet> {
    if is_spreadsheet(path) {
        read_workbook(path)
    } else {
        read_csv(path)
    }
}

fn read_csv(path: &Path) -> Result<Sheet> {
    let file = std::fs::File::open(path).map_err(|source| SalesError::Open {
        path: path.display().to_string(),
        source,
    })?;
    let mut rdr = semicolon_reader(std::io::BufReader::new(file));
    let headers = rdr.headers()?.iter().map(|h| h.trim().to_string()).collect();
    let mut rows = Vec::new();
    for result in rdr.records() {
        let record = result?;
        rows.push(record.iter().map(csv_cell).collect());
    }
    Ok(Sheet { headers, rows })
}

/// Comma-decimal numbers are shown with a dot; everything else verbatim.
fn csv_cell(raw: &str) -> String {
    let raw = raw.trim();
    if raw.contains(',') {
        if let Some(n) = parse_decimal(raw) {
            return n.to_string();
        }
    }
    raw.to_string()
}

#[cfg(feature = "xlsx")]
fn read_workbook(path: &Path) -> Result<Sheet> {
    use calamine::{Data, Reader};

    let mut workbook = calamine::open_workbook_auto(path)
        .map_err(|e| SalesError::Spreadsheet(format!("Failed to open {}: {e}", path.display())))?;
    let Some(first) = workbook.sheet_names().first().cloned() else {
        return Ok(Sheet::default());
    };
    let range = workbook
        .worksheet_range(&first)
        .map_err(|e| SalesError::Spreadsheet(format!("Failed to read sheet '{first}': {e}")))?;

    let cell = |c: &Data| -> String {
        match c {
            Data::Empty => String::new(),
            Data::String(s) => s.clone(),
            Data::Float(f) => f.to_string(),
            Data::Int(i) => i.to_string(),
            Data::Bool(b) => b.to_string(),
            Data::DateTime(dt) => excel_serial_to_datetime(dt.as_f64()),
            other => other.to_string(),
        }
    };

    let mut rows_iter = range.rows();
    let headers = rows_iter
        .next()
        .map(|r| r.iter().map(cell).collect())
        .unwrap_or_default();
    let rows = rows_iter.map(|r| r.iter().map(cell).collect()).collect();
    Ok(Sheet { headers, rows })
}

#[cfg(not(feature = "xlsx"))]
fn read_workbook(path: &Path) -> Result<Sheet> {
    Err(SalesError::Other(format!(
        "Reading {} requires the 'xlsx' feature; build with `cargo build --features xlsx`",
        path.display()
    )))
}

#[cfg(any(feature = "xlsx", test))]
pub fn excel_serial_to_datetime(serial: f64) -> String {
    // Excel epoch is 1899-12-30 (accounting for the 1900 leap year bug)
    let Some(base) = chrono::NaiveDate::from_ymd_opt(1899, 12, 30) else {
        return serial.to_string();
    };
    let days = serial.trunc() as i64;
    let secs = ((serial - serial.trunc()) * 86_400.0).round() as i64;
    let Some(date) = base.checked_add_signed(chrono::Duration::days(days)) else {
        return serial.to_string();
    };
    if secs == 0 {
        date.format("%Y-%m-%d").to_string()
    } else {
        let ts = date.and_hms_opt(0, 0, 0).map(|t| t + chrono::Duration::seconds(secs));
        match ts {
            Some(ts) => ts.format("%Y-%m-%d %H:%M:%S").to_string(),
            None => date.format("%Y-%m-%d").to_string(),
        }
    }
}
