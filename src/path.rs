// 🧭 Remittance Paths - join quotes with tariffs by bank, then rank by USD yield
// Pure pipeline: compose → evaluate → stable sort. Nothing here can fail;
// inputs were validated when they were loaded.

use crate::config::RemitConfig;
use crate::exchange::RateRecord;
use crate::transfer::TransferTariff;
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::HashMap;

// ============================================================================
// PATHS
// ============================================================================

/// One way to execute the remittance: a quote and a tariff from the same bank
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RemitPath<'a> {
    pub rate: &'a RateRecord,
    pub tariff: &'a TransferTariff,
}

impl<'a> RemitPath<'a> {
    pub fn evaluate(&self, ntd: Decimal) -> EvaluatedPath<'a> {
        self.evaluate_with(ntd, &RemitConfig::default())
    }

    /// Costs are charged in NTD at the quote's sell price; what is left is converted
    pub fn evaluate_with(&self, ntd: Decimal, config: &RemitConfig) -> EvaluatedPath<'a> {
        let (cost, is_our) =
            self.tariff
                .remit_cost_with(ntd, self.rate.bank_sell, config.transshipment_estimate_usd);

        EvaluatedPath {
            rate: self.rate,
            tariff: self.tariff,
            result: self.rate.buy(ntd - cost),
            cost,
            is_our,
        }
    }
}

/// Outcome of one path for a given NTD amount
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EvaluatedPath<'a> {
    pub rate: &'a RateRecord,
    pub tariff: &'a TransferTariff,
    /// USD received after all costs
    pub result: Decimal,
    /// Total NTD cost
    pub cost: Decimal,
    /// True when the tariff's flat transshipment charge replaced the estimate
    pub is_our: bool,
}

impl EvaluatedPath<'_> {
    pub fn bank(&self) -> &str {
        &self.rate.bank
    }
}

// ============================================================================
// COMPOSER
// ============================================================================

/// Bank-matched pairs of quotes and tariffs, reusable across amounts
#[derive(Debug, Clone)]
pub struct PathComposer<'a> {
    paths: Vec<RemitPath<'a>>,
    config: RemitConfig,
}

impl<'a> PathComposer<'a> {
    pub fn compose(rates: &'a [RateRecord], tariffs: &'a [TransferTariff]) -> Self {
        PathComposer {
            paths: compose(rates, tariffs),
            config: RemitConfig::default(),
        }
    }

    pub fn with_config(mut self, config: RemitConfig) -> Self {
        self.config = config;
        self
    }

    pub fn paths(&self) -> &[RemitPath<'a>] {
        &self.paths
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    /// Every path evaluated for `ntd`, highest USD yield first.
    ///
    /// `ntd` must be within `money::MAX_AMOUNT` in magnitude; loaded records
    /// already are, which keeps every intermediate inside Decimal's range.
    pub fn remit_all_with_ntd(&self, ntd: Decimal) -> Vec<EvaluatedPath<'a>> {
        rank_paths_with(&self.paths, ntd, &self.config)
    }

    pub fn best(&self, ntd: Decimal) -> Option<EvaluatedPath<'a>> {
        self.remit_all_with_ntd(ntd).into_iter().next()
    }
}

// ============================================================================
// FREE FUNCTIONS
// ============================================================================

/// Equi-join on `bank`.
///
/// Output order: quotes in input order, each followed by its bank's tariffs in
/// input order. Quotes whose bank has no tariff (and vice versa) produce nothing.
pub fn compose<'a>(rates: &'a [RateRecord], tariffs: &'a [TransferTariff]) -> Vec<RemitPath<'a>> {
    let mut by_bank: HashMap<&str, Vec<&'a TransferTariff>> = HashMap::new();
    for tariff in tariffs {
        by_bank.entry(tariff.bank.as_str()).or_default().push(tariff);
    }

    let paths: Vec<RemitPath<'a>> = rates
        .iter()
        .flat_map(|rate| {
            by_bank
                .get(rate.bank.as_str())
                .into_iter()
                .flatten()
                .map(move |tariff| RemitPath { rate, tariff: *tariff })
        })
        .collect();

    log::debug!(
        "Composed {} paths from {} quotes and {} tariffs",
        paths.len(),
        rates.len(),
        tariffs.len()
    );
    paths
}

pub fn rank_paths<'a>(paths: &[RemitPath<'a>], ntd: Decimal) -> Vec<EvaluatedPath<'a>> {
    rank_paths_with(paths, ntd, &RemitConfig::default())
}

/// Evaluate every path and sort by `result` descending; ties keep path order
pub fn rank_paths_with<'a>(
    paths: &[RemitPath<'a>],
    ntd: Decimal,
    config: &RemitConfig,
) -> Vec<EvaluatedPath<'a>> {
    let mut evaluated: Vec<EvaluatedPath<'a>> =
        paths.iter().map(|path| path.evaluate_with(ntd, config)).collect();

    evaluated.sort_by(|a, b| b.result.cmp(&a.result));

    if let Some(best) = evaluated.first() {
        log::debug!(
            "Ranked {} paths for {} NTD, best {} / {} yields {} USD",
            evaluated.len(),
            ntd,
            best.rate.title,
            best.tariff.title,
            best.result
        );
    }
    evaluated
}

/// Compose and rank in one call
pub fn rank<'a>(rates: &'a [RateRecord], tariffs: &'a [TransferTariff], ntd: Decimal) -> Vec<EvaluatedPath<'a>> {
    rank_paths(&compose(rates, tariffs), ntd)
}

// ============================================================================
// TESTS
// ============================================================================
