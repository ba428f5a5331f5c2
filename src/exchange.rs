// 💱 Exchange Quotes - one bank's NTD/USD buy and sell prices
// A per-quote discount narrows the spread on both sides before anything else sees it.

use crate::error::{RemitError, Result};
use crate::money::within_bounds;
use crate::table::{RowReader, TabularRecord};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

pub const RATE_COLUMNS: &[&str] = &["title", "bank", "date", "bank_sell", "bank_buy", "discount"];

// ============================================================================
// RATE RECORD
// ============================================================================

/// Exchange quote, already discount-normalized.
///
/// Invariant: `bank_sell >= bank_buy` and `bank_sell > 0`. Deserializing goes
/// through `RateRecord::new`, so the invariant holds for every instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawRate")]
pub struct RateRecord {
    pub title: String,
    /// Join key against transfer tariffs
    pub bank: String,
    pub date: String,
    /// NTD per USD when the bank sells USD to the customer
    pub bank_sell: Decimal,
    /// NTD per USD when the bank buys USD from the customer
    pub bank_buy: Decimal,
}

impl RateRecord {
    /// Build a quote, applying `discount` as `sell -= d; buy += d`.
    ///
    /// Fails with `InvalidQuote` when the sell price ends up below the buy price,
    /// is not positive (it is the divisor in `buy`), or either price falls
    /// outside `money::within_bounds`.
    pub fn new(
        title: impl Into<String>,
        bank: impl Into<String>,
        date: impl Into<String>,
        bank_sell: Decimal,
        bank_buy: Decimal,
        discount: Option<Decimal>,
    ) -> Result<Self> {
        let raw_in_range = within_bounds(bank_sell)
            && within_bounds(bank_buy)
            && discount.map_or(true, within_bounds);
        if !raw_in_range {
            return Err(RemitError::InvalidQuote {
                title: title.into(),
                bank: bank.into(),
                bank_sell,
                bank_buy,
            });
        }

        let (bank_sell, bank_buy) = match discount {
            Some(discount) => (bank_sell - discount, bank_buy + discount),
            None => (bank_sell, bank_buy),
        };

        let record = RateRecord {
            title: title.into(),
            bank: bank.into(),
            date: date.into(),
            bank_sell,
            bank_buy,
        };

        let in_range = within_bounds(record.bank_sell) && within_bounds(record.bank_buy);
        if !in_range || record.bank_sell <= Decimal::ZERO || record.bank_sell < record.bank_buy {
            log::warn!(
                "Rejected quote {} ({}): sell {}, buy {}",
                record.title,
                record.bank,
                record.bank_sell,
                record.bank_buy
            );
            return Err(RemitError::InvalidQuote {
                title: record.title,
                bank: record.bank,
                bank_sell: record.bank_sell,
                bank_buy: record.bank_buy,
            });
        }

        Ok(record)
    }

    /// USD obtained for `ntd`; `ntd` must be within `money::MAX_AMOUNT` in magnitude
    pub fn buy(&self, ntd: Decimal) -> Decimal {
        ntd / self.bank_sell
    }

    /// NTD obtained for `usd`
    pub fn sell(&self, usd: Decimal) -> Decimal {
        usd * self.bank_buy
    }

    /// Spread
    pub fn diff(&self) -> Decimal {
        self.bank_sell - self.bank_buy
    }

    /// Spread as a fraction of the sell price
    pub fn diff_ratio(&self) -> Decimal {
        self.diff() / self.bank_sell
    }

    /// Stable sort by a named attribute, ascending unless `reverse`
    pub fn sort(records: &[RateRecord], attribute: RateAttribute, reverse: bool) -> Vec<&RateRecord> {
        sort_by_key(records, |record| attribute.value(record), reverse)
    }
}

/// Wire form of a quote, before discount normalization and validation
#[derive(Debug, Deserialize)]
struct RawRate {
    title: String,
    bank: String,
    date: String,
    bank_sell: Decimal,
    bank_buy: Decimal,
    #[serde(default)]
    discount: Option<Decimal>,
}

impl TryFrom<RawRate> for RateRecord {
    type Error = RemitError;

    fn try_from(raw: RawRate) -> Result<Self> {
        RateRecord::new(raw.title, raw.bank, raw.date, raw.bank_sell, raw.bank_buy, raw.discount)
    }
}

impl TabularRecord for RateRecord {
    const RECORD: &'static str = "RateRecord";
    const COLUMNS: &'static [&'static str] = RATE_COLUMNS;

    fn from_row(row: &RowReader<'_>) -> Result<Self> {
        RateRecord::new(
            row.text(0)?,
            row.text(1)?,
            row.text(2)?,
            row.decimal(3)?,
            row.decimal(4)?,
            row.optional_decimal(5)?,
        )
    }
}

// ============================================================================
// SORTING
// ============================================================================

/// Sortable quote attributes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RateAttribute {
    BankSell,
    BankBuy,
    Diff,
    DiffRatio,
}

impl RateAttribute {
    pub fn value(&self, record: &RateRecord) -> Decimal {
        match self {
            RateAttribute::BankSell => record.bank_sell,
            RateAttribute::BankBuy => record.bank_buy,
            RateAttribute::Diff => record.diff(),
            RateAttribute::DiffRatio => record.diff_ratio(),
        }
    }
}

/// Stable sort by an accessor.
///
/// With `reverse`, the order is descending but equal keys keep their input order.
pub fn sort_by_key<T, K, F>(records: &[T], key: F, reverse: bool) -> Vec<&T>
where
    K: Ord,
    F: Fn(&T) -> K,
{
    let mut sorted: Vec<&T> = records.iter().collect();
    sorted.sort_by(|a, b| {
        let ordering: Ordering = key(*a).cmp(&key(*b));
        if reverse {
            ordering.reverse()
        } else {
            ordering
        }
    });
    sorted
}

// ============================================================================
// TESTS
// ============================================================================
