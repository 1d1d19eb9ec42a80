use std::collections::{BTreeMap, HashSet};
use std::path::{Path, PathBuf};

use chrono::{NaiveDate, NaiveDateTime};
use csv::StringRecord;

use crate::error::{Result, SalesError};
use crate::models::{Branch, Product, Transaction};

pub const TRANSACTIONS_FILE: &str = "vendas.csv";
pub const PRODUCTS_FILE: &str = "produtos.csv";
pub const BRANCHES_FILE: &str = "filiais.csv";

// ---------------------------------------------------------------------------
// Table schemas
// ---------------------------------------------------------------------------

/// Column names a table must carry. Column 0 is always the row index.
pub struct Schema {
    pub table: &'static str,
    pub required: &'static [&'static str],
}

pub const TRANSACTIONS_SCHEMA: Schema = Schema {
    table: "transactions",
    required: &["filial", "vendedor", "produto"],
};

pub const PRODUCTS_SCHEMA: Schema = Schema {
    table: "products",
    required: &["nome", "preco"],
};

pub const BRANCHES_SCHEMA: Schema = Schema {
    table: "branches",
    required: &["filial"],
};

/// Resolved positions of the required columns, in `Schema::required` order.
struct ColumnIndex {
    positions: Vec<usize>,
    headers: Vec<String>,
}

impl ColumnIndex {
    fn get(&self, slot: usize) -> usize {
        self.positions[slot]
    }

    /// Columns other than the index and the required ones.
    fn extras(&self) -> impl Iterator<Item = (usize, &str)> {
        self.headers
            .iter()
            .enumerate()
            .skip(1)
            .filter(|(i, _)| !self.positions.contains(i))
            .map(|(i, h)| (i, h.as_str()))
    }
}

fn normalize_header(raw: &str) -> String {
    raw.trim_start_matches('\u{feff}').trim().to_string()
}

fn resolve_columns(schema: &Schema, headers: &StringRecord) -> Result<ColumnIndex> {
    let headers: Vec<String> = headers.iter().map(normalize_header).collect();
    let mut positions = Vec::with_capacity(schema.required.len());
    for name in schema.required {
        let pos = headers
            .iter()
            .enumerate()
            .skip(1)
            .find(|(_, h)| h.eq_ignore_ascii_case(name))
            .map(|(i, _)| i)
            .ok_or_else(|| SalesError::SchemaMismatch {
                table: schema.table,
                column: name.to_string(),
            })?;
        positions.push(pos);
    }
    Ok(ColumnIndex { positions, headers })
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%d/%m/%Y %H:%M:%S",
];

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%d/%m/%Y"];

pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    for fmt in DATETIME_FORMATS {
        if let Ok(ts) = NaiveDateTime::parse_from_str(raw, fmt) {
            return Some(ts);
        }
    }
    for fmt in DATE_FORMATS {
        if let Ok(d) = NaiveDate::parse_from_str(raw, fmt) {
            return d.and_hms_opt(0, 0, 0);
        }
    }
    None
}

/// Parse a number written with a comma as the decimal separator: "1234,56".
pub fn parse_decimal(raw: &str) -> Option<f64> {
    let s = raw.trim().replace(',', ".");
    if s.is_empty() {
        return None;
    }
    s.parse().ok()
}

fn open_reader(path: &Path) -> Result<csv::Reader<std::io::BufReader<std::fs::File>>> {
    let file = std::fs::File::open(path).map_err(|source| SalesError::Open {
        path: path.display().to_string(),
        source,
    })?;
    Ok(semicolon_reader(std::io::BufReader::new(file)))
}

/// Reader for the semicolon-separated, header-first convention all inputs share.
pub fn semicolon_reader<R: std::io::Read>(rdr: R) -> csv::Reader<R> {
    csv::ReaderBuilder::new()
        .delimiter(b';')
        .has_headers(true)
        .from_reader(rdr)
}

fn line_of(record: &StringRecord) -> u64 {
    record.position().map(|p| p.line()).unwrap_or(0)
}

fn field(record: &StringRecord, idx: usize) -> String {
    record.get(idx).unwrap_or("").trim().to_string()
}

// ---------------------------------------------------------------------------
// Table readers
// ---------------------------------------------------------------------------

pub fn read_transactions<R: std::io::Read>(mut rdr: csv::Reader<R>) -> Result<Vec<Transaction>> {
    let cols = resolve_columns(&TRANSACTIONS_SCHEMA, rdr.headers()?)?;
    let mut rows = Vec::new();

    for result in rdr.records() {
        let record = result?;
        let raw_ts = record.get(0).unwrap_or("");
        let timestamp = parse_timestamp(raw_ts).ok_or_else(|| SalesError::InvalidDate {
            table: TRANSACTIONS_SCHEMA.table,
            line: line_of(&record),
            value: raw_ts.to_string(),
        })?;
        let extra: BTreeMap<String, String> = cols
            .extras()
            .map(|(i, h)| (h.to_string(), field(&record, i)))
            .collect();
        rows.push(Transaction {
            timestamp,
            branch: field(&record, cols.get(0)),
            seller: field(&record, cols.get(1)),
            product: field(&record, cols.get(2)),
            extra,
        });
    }
    Ok(rows)
}

pub fn read_products<R: std::io::Read>(mut rdr: csv::Reader<R>) -> Result<Vec<Product>> {
    let cols = resolve_columns(&PRODUCTS_SCHEMA, rdr.headers()?)?;
    let mut rows = Vec::new();
    let mut seen = HashSet::new();

    for result in rdr.records() {
        let record = result?;
        let name = field(&record, cols.get(0));
        let raw_price = record.get(cols.get(1)).unwrap_or("");
        let price = parse_decimal(raw_price).ok_or_else(|| SalesError::InvalidNumber {
            table: PRODUCTS_SCHEMA.table,
            line: line_of(&record),
            value: raw_price.to_string(),
        })?;
        if !seen.insert(name.clone()) {
            return Err(SalesError::DuplicateProduct(name));
        }
        rows.push(Product {
            id: field(&record, 0),
            name,
            price,
        });
    }
    Ok(rows)
}

pub fn read_branches<R: std::io::Read>(mut rdr: csv::Reader<R>) -> Result<Vec<Branch>> {
    let cols = resolve_columns(&BRANCHES_SCHEMA, rdr.headers()?)?;
    let mut rows = Vec::new();

    for result in rdr.records() {
        let record = result?;
        let attributes: BTreeMap<String, String> = cols
            .extras()
            .map(|(i, h)| (h.to_string(), field(&record, i)))
            .collect();
        rows.push(Branch {
            id: field(&record, 0),
            name: field(&record, cols.get(0)),
            attributes,
        });
    }
    Ok(rows)
}

// ---------------------------------------------------------------------------
// load_dataset
// ---------------------------------------------------------------------------

/// The three raw tables as read from disk.
#[derive(Debug, Clone)]
pub struct Dataset {
    pub dir: PathBuf,
    pub transactions: Vec<Transaction>,
    pub products: Vec<Product>,
    pub branches: Vec<Branch>,
}

pub fn load_dataset(dir: &Path) -> Result<Dataset> {
    let transactions = read_transactions(open_reader(&dir.join(TRANSACTIONS_FILE))?)?;
    let products = read_products(open_reader(&dir.join(PRODUCTS_FILE))?)?;
    let branches = read_branches(open_reader(&dir.join(BRANCHES_FILE))?)?;
    log::info!(
        "Loaded {} transactions, {} products, {} branches from {}",
        transactions.len(),
        products.len(),
        branches.len(),
        dir.display()
    );
    Ok(Dataset {
        dir: dir.to_path_buf(),
        transactions,
        products,
        branches,
    })
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) const VENDAS: &str = "\
data;id_venda;filial;vendedor;produto;cliente_nome
2024-01-01 10:15:00;1;Centro;Ana;P1;Maria
2024-01-01 16:40:00;2;Norte;Bruno;P2;Joao
2024-01-02 09:05:00;3;Centro;Ana;P1;Carla
2024-01-03 11:30:00;4;Norte;Carlos;P3;Pedro
";

    pub(crate) const PRODUTOS: &str = "\
;nome;preco;id
0;P1;100,00;10
1;P2;1250,50;11
2;P4;9,90;12
";

    pub(crate) const FILIAIS: &str = "\
;filial;cidade;estado
0;Centro;Natal;RN
1;Norte;Recife;PE
";

    pub(crate) fn write_dataset(dir: &Path, vendas: &str, produtos: &str, filiais: &str) {
        std::fs::write(dir.join(TRANSACTIONS_FILE), vendas).unwrap();
        std::fs::write(dir.join(PRODUCTS_FILE), produtos).unwrap();
        std::fs::write(dir.join(BRANCHES_FILE), filiais).unwrap();
    }

    #[test]
    fn test_parse_decimal_comma() {
        assert_eq!(parse_decimal("100,00"), Some(100.0));
        assert_eq!(parse_decimal(" 9,9 "), Some(9.9));
        assert_eq!(parse_decimal("42"), Some(42.0));
        assert_eq!(parse_decimal(""), None);
        assert_eq!(parse_decimal("abc"), None);
    }

    #[test]
    fn test_parse_timestamp_formats() {
        let expected = NaiveDate::from_ymd_opt(2024, 1, 1)
            .unwrap()
            .and_hms_opt(10, 15, 0)
            .unwrap();
        assert_eq!(parse_timestamp("2024-01-01 10:15:00"), Some(expected));
        assert_eq!(parse_timestamp("2024-01-01T10:15:00"), Some(expected));
        assert_eq!(parse_timestamp("2024-01-01 10:15"), Some(expected));
        assert_eq!(parse_timestamp("01/01/2024 10:15:00"), Some(expected));
        let midnight = NaiveDate::from_ymd_opt(2024, 1, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        assert_eq!(parse_timestamp("2024-01-01"), Some(midnight));
        assert_eq!(parse_timestamp("01/01/2024"), Some(midnight));
        assert_eq!(parse_timestamp("yesterday"), None);
        assert_eq!(parse_timestamp("2024-02-30"), None);
    }

    #[test]
    fn test_read_transactions() {
        let rows = read_transactions(semicolon_reader(VENDAS.as_bytes())).unwrap();
        assert_eq!(rows.len(), 4);
        assert_eq!(rows[0].branch, "Centro");
        assert_eq!(rows[0].seller, "Ana");
        assert_eq!(rows[0].product, "P1");
        assert_eq!(rows[0].extra.get("cliente_nome").map(String::as_str), Some("Maria"));
        assert_eq!(rows[0].extra.get("id_venda").map(String::as_str), Some("1"));
        assert!(!rows[0].extra.contains_key("produto"));
        assert_eq!(rows[3].timestamp.to_string(), "2024-01-03 11:30:00");
    }

    #[test]
    fn test_read_transactions_header_case_insensitive() {
        let csv = "Data;Filial;VENDEDOR; Produto \n2024-01-01;A;B;C\n";
        let rows = read_transactions(semicolon_reader(csv.as_bytes())).unwrap();
        assert_eq!(rows[0].product, "C");
    }

    #[test]
    fn test_read_transactions_missing_column() {
        let csv = "data;filial;produto\n2024-01-01;A;P1\n";
        let err = read_transactions(semicolon_reader(csv.as_bytes())).unwrap_err();
        match err {
            SalesError::SchemaMismatch { table, column } => {
                assert_eq!(table, "transactions");
                assert_eq!(column, "vendedor");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_read_transactions_invalid_date() {
        let csv = "data;filial;vendedor;produto\n2024-01-01;A;B;P1\nnot-a-date;A;B;P1\n";
        let err = read_transactions(semicolon_reader(csv.as_bytes())).unwrap_err();
        match err {
            SalesError::InvalidDate { line, value, .. } => {
                assert_eq!(line, 3);
                assert_eq!(value, "not-a-date");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_read_products_comma_decimal() {
        let rows = read_products(semicolon_reader(PRODUTOS.as_bytes())).unwrap();
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].id, "0");
        assert_eq!(rows[0].name, "P1");
        assert_eq!(rows[0].price, 100.0);
        assert_eq!(rows[1].price, 1250.5);
    }

    #[test]
    fn test_read_products_rejects_bad_price() {
        let csv = ";nome;preco\n0;P1;cem\n";
        let err = read_products(semicolon_reader(csv.as_bytes())).unwrap_err();
        assert!(matches!(err, SalesError::InvalidNumber { .. }), "got: {err}");
    }

    #[test]
    fn test_read_products_rejects_duplicate_names() {
        let csv = ";nome;preco\n0;P1;1,0\n1;P1;2,0\n";
        let err = read_products(semicolon_reader(csv.as_bytes())).unwrap_err();
        assert!(matches!(err, SalesError::DuplicateProduct(ref n) if n == "P1"), "got: {err}");
    }

    #[test]
    fn test_read_branches() {
        let rows = read_branches(semicolon_reader(FILIAIS.as_bytes())).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1].name, "Norte");
        assert_eq!(rows[1].attributes.get("cidade").map(String::as_str), Some("Recife"));
    }

    #[test]
    fn test_load_dataset() {
        let dir = tempfile::tempdir().unwrap();
        write_dataset(dir.path(), VENDAS, PRODUTOS, FILIAIS);
        let ds = load_dataset(dir.path()).unwrap();
        assert_eq!(ds.transactions.len(), 4);
        assert_eq!(ds.products.len(), 3);
        assert_eq!(ds.branches.len(), 2);
    }

    #[test]
    fn test_load_dataset_missing_file_names_path() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(TRANSACTIONS_FILE), VENDAS).unwrap();
        let err = load_dataset(dir.path()).unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains(PRODUCTS_FILE), "got: {msg}");
    }
}
