// src/agents/insurance_co.rs

use rand::RngCore;
use std::collections::HashMap;
use std::fmt;
use tracing::{debug, info};

use super::agent_trait::{Fund, MarketView};
use super::agent_type::FundType;
use super::buy_side::BuySide;
use super::config::InsuranceParams;
use crate::bonds::{BondId, BondPosition, PriceMap, price_of};
use crate::error::AgentError;
use crate::rng::uniform_index;
use crate::types::order::{Confirmation, OrderRecord, Side};

/// A buy-and-hold insurer. It does not rebalance continuously: when bonds grow
/// too large a share of the balance sheet against its equity capital, it
/// dumps part of one randomly chosen holding.
#[derive(Debug, Clone)]
pub struct InsuranceCo {
    buy_side: BuySide,
    params: InsuranceParams,
    equity: f64,
}

impl InsuranceCo {
    pub fn new<T: Into<String>>(
        id: T,
        params: InsuranceParams,
        bond_list: Vec<BondId>,
        portfolio: HashMap<BondId, BondPosition>,
    ) -> Result<Self, AgentError> {
        Ok(Self {
            buy_side: BuySide::new(id, bond_list, portfolio)?,
            params,
            equity: 0.0,
        })
    }

    pub fn equity(&self) -> f64 {
        self.equity
    }

    pub fn set_equity(&mut self, equity: f64) {
        self.equity = equity;
    }

    pub fn params(&self) -> &InsuranceParams {
        &self.params
    }

    /// Roll equity forward by `equity_return`, then liquidate if the bond share
    /// of the balance sheet has drifted above `bond_fraction`.
    ///
    /// The bond to sell is drawn uniformly from the bond list; the sale is
    /// sized to bring the bond share back to `bond_fraction`, in whole units of
    /// face and never more than is held. The stream is only drawn from when a
    /// liquidation is due.
    pub fn make_portfolio_decision<R: RngCore + ?Sized>(
        &mut self,
        prices: &PriceMap,
        equity_return: f64,
        rng: &mut R,
    ) -> Result<Option<OrderRecord>, AgentError> {
        self.equity *= 1.0 + equity_return;
        let bond_value = self.buy_side.compute_portfolio_value(prices)?;
        let balance_sheet = bond_value + self.equity;
        let bond_share = bond_value / balance_sheet;
        // Compared in value terms: the share flips sign once equity sinks below -bond_value.
        let excess = bond_value - self.params.bond_fraction * balance_sheet;

        debug!(agent = %self.buy_side.id(), equity = self.equity, bond_value, bond_share, excess, "capital check");
        if excess <= 0.0 {
            return Ok(None);
        }

        let Some(idx) = uniform_index(rng, self.buy_side.bond_list().len()) else {
            return Ok(None);
        };
        let name = self.buy_side.bond_list()[idx].clone();
        let price = price_of(prices, &name)?;
        let held = self.buy_side.ledger().nominal(&name)?;
        let amount = (excess / (price / 100.0)).round().min(held.max(0.0));
        if amount <= 0.0 {
            return Ok(None);
        }

        info!(agent = %self.buy_side.id(), bond = %name, amount, bond_share, "forced liquidation");
        Ok(Some(self.buy_side.make_rfq(name, Side::Sell, amount)))
    }
}

impl fmt::Display for InsuranceCo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.buy_side.fmt_typed(f, FundType::InsuranceCo.name())
    }
}

impl Fund for InsuranceCo {
    fn decide_actions(
        &mut self,
        view: &MarketView<'_>,
        rng: &mut dyn RngCore,
    ) -> Result<(), AgentError> {
        self.make_portfolio_decision(view.prices, view.equity_return, rng)
            .map(|_| ())
    }

    fn modify_portfolio(&mut self, confirm: &Confirmation) -> Result<(), AgentError> {
        self.equity += self.buy_side.modify_portfolio(confirm)?;
        Ok(())
    }

    fn balance(&self) -> f64 {
        self.equity
    }

    fn fund_type(&self) -> FundType {
        FundType::InsuranceCo
    }

    fn buy_side(&self) -> &BuySide {
        &self.buy_side
    }

    fn buy_side_mut(&mut self) -> &mut BuySide {
        &mut self.buy_side
    }
}
