// src/agents/agent_trait.rs

use rand::RngCore;

use super::agent_type::FundType;
use super::buy_side::BuySide;
use crate::bonds::{BondId, PriceMap};
use crate::error::AgentError;
use crate::types::order::{Confirmation, OrderRecord, Side};

/// A read-only snapshot of the market given to a fund for decision-making.
pub struct MarketView<'a> {
    pub step: usize,
    pub prices: &'a PriceMap,
    /// Return on the equity market over the step; only insurers look at it.
    pub equity_return: f64,
}

/// The capability set the market relies on, whatever kind of fund it is
/// talking to.
pub trait Fund {
    // === Core Decision-Making ===
    /// Run this fund's rebalancing policy, appending any RFQs to its collector.
    fn decide_actions(
        &mut self,
        view: &MarketView<'_>,
        rng: &mut dyn RngCore,
    ) -> Result<(), AgentError>;

    // === Position Management ===
    /// The callback the market makes once an RFQ has traded.
    fn modify_portfolio(&mut self, confirm: &Confirmation) -> Result<(), AgentError>;

    /// Cash for funds, equity capital for insurers.
    fn balance(&self) -> f64;

    // === Getters & Housekeeping ===
    fn fund_type(&self) -> FundType;
    fn buy_side(&self) -> &BuySide;
    fn buy_side_mut(&mut self) -> &mut BuySide;

    fn id(&self) -> &str {
        self.buy_side().id()
    }

    fn compute_portfolio_value(&self, prices: &PriceMap) -> Result<f64, AgentError> {
        self.buy_side().compute_portfolio_value(prices)
    }

    fn make_rfq(&mut self, name: BondId, side: Side, amount: f64) -> OrderRecord {
        self.buy_side_mut().make_rfq(name, side, amount)
    }

    fn rfq_collector(&self) -> &[OrderRecord] {
        self.buy_side().rfq_collector()
    }

    fn take_rfqs(&mut self) -> Vec<OrderRecord> {
        self.buy_side_mut().take_rfqs()
    }
}
