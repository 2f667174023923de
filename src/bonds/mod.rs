// src/bonds/mod.rs
// -----------------
pub mod definitions;
pub mod ledger;

// Re-export the most useful items so callers don’t have to dive
// another level down the path.
pub use definitions::{BondId, BondPosition, IndexWeights, PriceMap, seed_prices};
pub use ledger::{PortfolioLedger, price_of};
