// src/lib.rs

// === 1. Declare all the top-level modules ===
pub mod agents;
pub mod bonds;
pub mod error;
pub mod market;
pub mod rng;
pub mod types;

// === 2. Re-export the public-facing components to create a clean API ===

// --- From `agents` ---
pub use agents::agent_trait::{Fund, MarketView};
pub use agents::agent_type::FundType;
pub use agents::buy_side::BuySide;
pub use agents::config::{AgentParams, FlowModel, InsuranceParams, MutualFundParams};
pub use agents::hedge_fund::HedgeFund;
pub use agents::insurance_co::InsuranceCo;
pub use agents::mutual_fund::{CashBand, MutualFund};

// --- From our `market` roster ---
pub use market::FundRoster;

// --- From `bonds` ---
pub use bonds::{BondId, BondPosition, IndexWeights, PortfolioLedger, PriceMap};

// --- From `rng` ---
pub use rng::{MersenneTwister, SharedRng};

// --- From `types` ---
pub use types::order::{Confirmation, OrderRecord, Side};

pub use error::AgentError;
