// ⚠️ Error taxonomy
// Everything here is raised at load time; composing and ranking never fail.

use rust_decimal::Decimal;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum RemitError {
    /// Column list differs from the record's declared schema
    #[error("Schema mismatch for {record}: expected {expected:?}, found {found:?}")]
    Schema {
        record: &'static str,
        expected: Vec<String>,
        found: Vec<String>,
    },

    /// Quote whose sell price ends up below its buy price after discount, or is not positive
    #[error("Invalid quote {title} ({bank}): bank_sell {bank_sell}, bank_buy {bank_buy}")]
    InvalidQuote {
        title: String,
        bank: String,
        bank_sell: Decimal,
        bank_buy: Decimal,
    },

    #[error("{record} row {row}: expected {expected} values, found {found}")]
    RowLength {
        record: &'static str,
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("{record} row {row}, column {column}: {reason}")]
    InvalidField {
        record: &'static str,
        row: usize,
        column: &'static str,
        reason: String,
    },
}

pub type Result<T> = std::result::Result<T, RemitError>;
