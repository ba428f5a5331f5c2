// 📋 Tabular Layer - {columns, data} shape + schema-bound records
// Loaders hand us a column list and positional rows; each record type
// declares its own column list and binds fields by position.

use crate::error::{RemitError, Result};
use crate::money::{decimal_from_json, within_bounds, MAX_AMOUNT, MAX_SCALE};
use anyhow::Context;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fs;
use std::io::Read;
use std::path::Path;

// ============================================================================
// TABLE
// ============================================================================

/// Raw dataset as produced by a loader
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Table {
    pub columns: Vec<String>,
    pub data: Vec<Vec<Value>>,
}

impl Table {
    pub fn new(columns: Vec<String>, data: Vec<Vec<Value>>) -> Self {
        Table { columns, data }
    }

    /// Parse the `{"columns": [...], "data": [[...], ...]}` JSON shape
    pub fn from_json_str(content: &str) -> anyhow::Result<Self> {
        serde_json::from_str(content).context("Failed to parse table JSON")
    }

    /// Read CSV with a header row.
    ///
    /// Cells are trimmed; empty cells become null and everything else stays
    /// the raw text. Numeric columns parse that text when a record is built,
    /// so labels such as `004` or `1e2` reach the join key unchanged.
    pub fn from_csv_reader<R: Read>(reader: R) -> anyhow::Result<Self> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let columns = reader
            .headers()
            .context("Failed to read CSV header")?
            .iter()
            .map(str::to_string)
            .collect();

        let mut data = Vec::new();
        for (index, record) in reader.records().enumerate() {
            let record = record.with_context(|| format!("Failed to read CSV row {}", index))?;
            data.push(record.iter().map(csv_cell).collect());
        }

        Ok(Table { columns, data })
    }

    /// Load a `.json` or `.csv` file
    pub fn from_path<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase);

        match extension.as_deref() {
            Some("json") => {
                let content = fs::read_to_string(path)
                    .with_context(|| format!("Failed to read table file: {:?}", path))?;
                Self::from_json_str(&content)
            }
            Some("csv") => {
                let file = fs::File::open(path)
                    .with_context(|| format!("Failed to open table file: {:?}", path))?;
                Self::from_csv_reader(file)
            }
            _ => anyhow::bail!("Unsupported table format: {:?}", path),
        }
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Columns must equal `expected` exactly: same names, same order, same case
    pub fn check_schema(&self, record: &'static str, expected: &[&str]) -> Result<()> {
        let matches = self.columns.len() == expected.len()
            && self.columns.iter().zip(expected).all(|(found, want)| found == want);

        if matches {
            Ok(())
        } else {
            Err(RemitError::Schema {
                record,
                expected: expected.iter().map(|c| c.to_string()).collect(),
                found: self.columns.clone(),
            })
        }
    }
}

fn csv_cell(cell: &str) -> Value {
    if cell.is_empty() {
        Value::Null
    } else {
        Value::String(cell.to_string())
    }
}

// ============================================================================
// ROW READER
// ============================================================================

/// Positional view of one row, with errors that name the record, row and column
pub struct RowReader<'a> {
    record: &'static str,
    columns: &'static [&'static str],
    row: usize,
    values: &'a [Value],
}

impl<'a> RowReader<'a> {
    pub fn new(
        record: &'static str,
        columns: &'static [&'static str],
        row: usize,
        values: &'a [Value],
    ) -> Result<Self> {
        if values.len() != columns.len() {
            return Err(RemitError::RowLength {
                record,
                row,
                expected: columns.len(),
                found: values.len(),
            });
        }
        Ok(RowReader { record, columns, row, values })
    }

    /// Error for `index`, labelled with the column's name
    pub fn invalid(&self, index: usize, reason: impl Into<String>) -> RemitError {
        RemitError::InvalidField {
            record: self.record,
            row: self.row,
            column: self.columns[index],
            reason: reason.into(),
        }
    }

    /// Labels: strings, or numbers rendered as text (bank codes, dates)
    pub fn text(&self, index: usize) -> Result<String> {
        match &self.values[index] {
            Value::String(s) => Ok(s.clone()),
            Value::Number(n) => Ok(n.to_string()),
            other => Err(self.invalid(index, format!("expected text, found {}", other))),
        }
    }

    /// JSON number or numeric text, within `MAX_AMOUNT` and `MAX_SCALE`
    pub fn decimal(&self, index: usize) -> Result<Decimal> {
        let value = &self.values[index];
        let decimal = decimal_from_json(value)
            .ok_or_else(|| self.invalid(index, format!("expected a number, found {}", value)))?;

        if !within_bounds(decimal) {
            return Err(self.invalid(
                index,
                format!(
                    "{} is out of range (at most {} in magnitude, {} decimal places)",
                    decimal, MAX_AMOUNT, MAX_SCALE
                ),
            ));
        }
        Ok(decimal)
    }

    /// null means absent; any other non-number is an error
    pub fn optional_decimal(&self, index: usize) -> Result<Option<Decimal>> {
        match &self.values[index] {
            Value::Null => Ok(None),
            _ => self.decimal(index).map(Some),
        }
    }
}

// ============================================================================
// TABULAR RECORD
// ============================================================================

/// Record type with a statically declared column list.
///
/// `load` is fail-fast: a schema mismatch or any bad row aborts the whole
/// load and no partial result is returned.
pub trait TabularRecord: Sized {
    /// Name used in error messages
    const RECORD: &'static str;

    /// Expected column names, in order
    const COLUMNS: &'static [&'static str];

    fn from_row(row: &RowReader<'_>) -> Result<Self>;

    fn load(table: &Table) -> Result<Vec<Self>> {
        table.check_schema(Self::RECORD, Self::COLUMNS)?;

        let records = table
            .data
            .iter()
            .enumerate()
            .map(|(index, values)| {
                let row = RowReader::new(Self::RECORD, Self::COLUMNS, index, values)?;
                Self::from_row(&row)
            })
            .collect::<Result<Vec<Self>>>()?;

        log::debug!("Loaded {} {} records", records.len(), Self::RECORD);
        Ok(records)
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use serde_json::json;

    const COLUMNS: &[&str] = &["name", "price", "cap"];

    #[derive(Debug)]
    struct Item {
        name: String,
        price: Decimal,
        cap: Option<Decimal>,
    }

    impl TabularRecord for Item {
        const RECORD: &'static str = "Item";
        const COLUMNS: &'static [&'static str] = COLUMNS;

        fn from_row(row: &RowReader<'_>) -> Result<Self> {
            Ok(Item {
                name: row.text(0)?,
                price: row.decimal(1)?,
                cap: row.optional_decimal(2)?,
            })
        }
    }

    fn item_table(data: Vec<Vec<Value>>) -> Table {
        Table::new(COLUMNS.iter().map(|c| c.to_string()).collect(), data)
    }

    #[test]
    fn test_from_json_str() {
        let table = Table::from_json_str(
            r#"{"columns": ["name", "price", "cap"], "data": [["a", 1.5, null]]}"#,
        )
        .unwrap();

        assert_eq!(table.columns, vec!["name", "price", "cap"]);
        assert_eq!(table.len(), 1);
        assert_eq!(table.data[0][2], Value::Null);
    }

    #[test]
    fn test_from_json_str_rejects_garbage() {
        assert!(Table::from_json_str("not json").is_err());
    }

    #[test]
    fn test_from_csv_reader_keeps_raw_text() {
        let csv = "name, price, cap\nalpha, 30.8, \n1e2, 1e2, 004\n";
        let table = Table::from_csv_reader(csv.as_bytes()).unwrap();

        assert_eq!(table.columns, vec!["name", "price", "cap"]);
        assert_eq!(table.data[0], vec![json!("alpha"), json!("30.8"), Value::Null]);
        assert_eq!(table.data[1], vec![json!("1e2"), json!("1e2"), json!("004")]);
    }

    #[test]
    fn test_csv_labels_survive_load() {
        let csv = "name,price,cap\n1e2,1e2,\n";
        let table = Table::from_csv_reader(csv.as_bytes()).unwrap();

        let items = Item::load(&table).unwrap();
        assert_eq!(items[0].name, "1e2");
        assert_eq!(items[0].price, dec!(100));
        assert_eq!(items[0].cap, None);
    }

    #[test]
    fn test_from_path_unsupported_extension() {
        assert!(Table::from_path("rates.xlsx").is_err());
    }

    #[test]
    fn test_load_binds_positionally() {
        let table = item_table(vec![
            vec![json!("a"), json!(1.25), Value::Null],
            vec![json!("b"), json!(2), json!(10)],
        ]);

        let items = Item::load(&table).unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].name, "a");
        assert_eq!(items[0].price, dec!(1.25));
        assert_eq!(items[0].cap, None);
        assert_eq!(items[1].cap, Some(dec!(10)));
    }

    #[test]
    fn test_schema_must_match_exactly() {
        let reordered = Table::new(
            vec!["price".into(), "name".into(), "cap".into()],
            vec![],
        );
        let wrong_case = Table::new(
            vec!["Name".into(), "price".into(), "cap".into()],
            vec![],
        );
        let extra = Table::new(
            vec!["name".into(), "price".into(), "cap".into(), "x".into()],
            vec![],
        );

        for table in [reordered, wrong_case, extra] {
            match Item::load(&table) {
                Err(RemitError::Schema { record, .. }) => assert_eq!(record, "Item"),
                other => panic!("expected schema error, got {:?}", other),
            }
        }
    }

    #[test]
    fn test_short_row_is_rejected() {
        let table = item_table(vec![vec![json!("a"), json!(1)]]);

        assert_eq!(
            Item::load(&table).unwrap_err(),
            RemitError::RowLength { record: "Item", row: 0, expected: 3, found: 2 }
        );
    }

    #[test]
    fn test_non_numeric_field_aborts_whole_load() {
        let table = item_table(vec![
            vec![json!("a"), json!(1), Value::Null],
            vec![json!("b"), json!("cheap"), Value::Null],
        ]);

        match Item::load(&table) {
            Err(RemitError::InvalidField { row, column, .. }) => {
                assert_eq!(row, 1);
                assert_eq!(column, "price");
            }
            other => panic!("expected invalid field, got {:?}", other),
        }
    }

    #[test]
    fn test_out_of_range_amount_is_rejected() {
        let too_large = item_table(vec![vec![json!("a"), json!(1e20), Value::Null]]);
        let too_precise = item_table(vec![vec![json!("a"), json!(1), json!("0.0000001")]]);

        match Item::load(&too_large) {
            Err(RemitError::InvalidField { column, .. }) => assert_eq!(column, "price"),
            other => panic!("expected invalid field, got {:?}", other),
        }
        match Item::load(&too_precise) {
            Err(RemitError::InvalidField { column, .. }) => assert_eq!(column, "cap"),
            other => panic!("expected invalid field, got {:?}", other),
        }
    }
}
