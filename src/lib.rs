// Remit Path - NTD → USD remittance ranking
// Joins bank exchange quotes with telegraphic-transfer tariffs and ranks every
// bank-matched combination by the USD that actually arrives.

pub mod config;
pub mod error;
pub mod exchange;  // Exchange quotes + discount normalization
pub mod money;
pub mod path;      // Compose / evaluate / rank
pub mod table;     // {columns, data} + schema-bound loading
pub mod transfer;  // Telegraphic transfer tariffs

// Re-export commonly used types
pub use config::{RemitConfig, TRANSSHIPMENT_ESTIMATE_USD};
pub use error::{RemitError, Result};
pub use exchange::{sort_by_key, RateAttribute, RateRecord, RATE_COLUMNS};
pub use money::{round_currency, within_bounds, CURRENCY_DP, MAX_AMOUNT, MAX_SCALE};
pub use path::{compose, rank, rank_paths, rank_paths_with, EvaluatedPath, PathComposer, RemitPath};
pub use table::{RowReader, Table, TabularRecord};
pub use transfer::{TransferTariff, TARIFF_COLUMNS};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
