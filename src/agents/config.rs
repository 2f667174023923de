// src/agents/config.rs

//! A centralized place for tuning agent behavior parameters.
//!
//! The constants are the defaults; the `*Params` structs carry them at runtime
//! and can be overridden from JSON.

use serde::{Deserialize, Serialize};
use thiserror::Error;

// --- MutualFund ---
// Steady-state cash as a fraction of bond holdings, and the tolerance band
// around it inside which the fund sits still.
pub const MF_CASH_TARGET: f64 = 0.05;
pub const MF_THRESHOLD_UP: f64 = 0.03; // upper edge 0.08
pub const MF_THRESHOLD_DOWN: f64 = 0.02; // lower edge 0.03

// Investor flow response to the fund's own performance, in percent of NAV.
// flow = intercept + sensitivity * (latest one-step return - prior trend return)
pub const FLOW_INTERCEPT: f64 = 0.075_333_333;
pub const FLOW_SENSITIVITY: f64 = 1.113_466_667;
pub const FLOW_RECENT_LAG: usize = 1;
pub const FLOW_BASE_LAG: usize = 2;
pub const FLOW_TREND_LAG: usize = 6;

// --- InsuranceCo ---
// Share of the balance sheet held in bonds; the rest is equity capital.
pub const IC_EQUITY: f64 = 0.4;
pub const IC_BOND_FRACTION: f64 = 1.0 - IC_EQUITY;

// --- Shared random stream ---
pub const DEFAULT_SEED: u32 = 1;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid agent parameters: {0}")]
    Parse(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FlowModel {
    pub intercept: f64,
    pub sensitivity: f64,
}

impl Default for FlowModel {
    fn default() -> Self {
        Self {
            intercept: FLOW_INTERCEPT,
            sensitivity: FLOW_SENSITIVITY,
        }
    }
}

impl FlowModel {
    /// Flow in percent of NAV for two returns given in percent.
    #[inline]
    pub fn flow(&self, recent_return: f64, trend_return: f64) -> f64 {
        self.intercept + self.sensitivity * (recent_return - trend_return)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MutualFundParams {
    pub target: f64,
    pub threshold_up: f64,
    pub threshold_down: f64,
    pub flow: FlowModel,
}

impl Default for MutualFundParams {
    fn default() -> Self {
        Self {
            target: MF_CASH_TARGET,
            threshold_up: MF_THRESHOLD_UP,
            threshold_down: MF_THRESHOLD_DOWN,
            flow: FlowModel::default(),
        }
    }
}

impl MutualFundParams {
    pub fn lower_edge(&self) -> f64 {
        self.target - self.threshold_down
    }

    pub fn upper_edge(&self) -> f64 {
        self.target + self.threshold_up
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InsuranceParams {
    pub bond_fraction: f64,
}

impl Default for InsuranceParams {
    fn default() -> Self {
        Self {
            bond_fraction: IC_BOND_FRACTION,
        }
    }
}

/// Everything a harness needs to stand up a population of funds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentParams {
    pub mutual_fund: MutualFundParams,
    pub insurance: InsuranceParams,
    pub seed: u32,
}

impl Default for AgentParams {
    fn default() -> Self {
        Self {
            mutual_fund: MutualFundParams::default(),
            insurance: InsuranceParams::default(),
            seed: DEFAULT_SEED,
        }
    }
}

impl AgentParams {
    pub fn from_json(raw: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(raw)?)
    }
}
