// 📡 Telegraphic Transfer Tariffs - what a bank charges to wire the money out
//
// Total remittance cost = commission + telegram fee + transshipment cost.
// Commission clamps to the floor first and the ceiling last, so a ceiling set
// below the floor wins.

use crate::config::TRANSSHIPMENT_ESTIMATE_USD;
use crate::error::Result;
use crate::table::{RowReader, TabularRecord};
use rust_decimal::Decimal;
use serde::Serialize;

pub const TARIFF_COLUMNS: &[&str] = &[
    "title",
    "bank",
    "date",
    "commission_rate",
    "commission_min",
    "commission_max",
    "telegram",
    "our",
];

/// Built by `TransferTariff::load`, which keeps every figure within
/// `money::within_bounds`; hand-built tariffs must respect the same bound.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TransferTariff {
    pub title: String,
    /// Join key against exchange quotes
    pub bank: String,
    pub date: String,
    /// Fraction of the transferred NTD amount
    pub commission_rate: Decimal,
    pub commission_min: Option<Decimal>,
    pub commission_max: Option<Decimal>,
    /// Fixed cable fee, NTD
    pub telegram: Decimal,
    /// Flat transshipment charge replacing the estimate when it is not worse
    pub our: Option<Decimal>,
}

impl TransferTariff {
    pub fn commission(&self, ntd: Decimal) -> Decimal {
        let mut commission = ntd * self.commission_rate;

        if let Some(min) = self.commission_min {
            commission = commission.max(min);
        }
        if let Some(max) = self.commission_max {
            commission = commission.min(max);
        }

        commission
    }

    /// `(cost, is_our)` using the default 20 USD estimate
    pub fn transshipment_cost(&self, exchange_rate: Decimal) -> (Decimal, bool) {
        self.transshipment_cost_with(exchange_rate, TRANSSHIPMENT_ESTIMATE_USD)
    }

    /// `(cost, is_our)`: the flat `our` charge if set and not above the estimate,
    /// otherwise `estimate_usd * exchange_rate`
    pub fn transshipment_cost_with(&self, exchange_rate: Decimal, estimate_usd: Decimal) -> (Decimal, bool) {
        let estimated = estimate_usd * exchange_rate;

        match self.our {
            Some(our) if our <= estimated => (our, true),
            _ => (estimated, false),
        }
    }

    /// `(total_cost, is_our)` for sending `ntd`
    pub fn remit_cost(&self, ntd: Decimal, exchange_rate: Decimal) -> (Decimal, bool) {
        self.remit_cost_with(ntd, exchange_rate, TRANSSHIPMENT_ESTIMATE_USD)
    }

    pub fn remit_cost_with(&self, ntd: Decimal, exchange_rate: Decimal, estimate_usd: Decimal) -> (Decimal, bool) {
        let (transshipment, is_our) = self.transshipment_cost_with(exchange_rate, estimate_usd);
        (self.commission(ntd) + self.telegram + transshipment, is_our)
    }
}

impl TabularRecord for TransferTariff {
    const RECORD: &'static str = "TransferTariff";
    const COLUMNS: &'static [&'static str] = TARIFF_COLUMNS;

    fn from_row(row: &RowReader<'_>) -> Result<Self> {
        Ok(TransferTariff {
            title: row.text(0)?,
            bank: row.text(1)?,
            date: row.text(2)?,
            commission_rate: row.decimal(3)?,
            commission_min: row.optional_decimal(4)?,
            commission_max: row.optional_decimal(5)?,
            telegram: row.decimal(6)?,
            our: row.optional_decimal(7)?,
        })
    }
}

// ============================================================================
// TESTS
// ============================================================================
