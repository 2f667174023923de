// src/agents/mutual_fund.rs

use rand::RngCore;
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use tracing::debug;

use super::agent_trait::{Fund, MarketView};
use super::agent_type::FundType;
use super::buy_side::BuySide;
use super::config::{FLOW_BASE_LAG, FLOW_RECENT_LAG, FLOW_TREND_LAG, MutualFundParams};
use crate::bonds::{BondId, BondPosition, IndexWeights, PriceMap, price_of};
use crate::error::AgentError;
use crate::types::order::{Confirmation, Side};

/// Where the fund's cash sits relative to its tolerance band after investor
/// flows are taken into account.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CashBand {
    Within,
    /// Bond value to sell to get back to target.
    Short(f64),
    /// Cash to put to work in bonds to get back to target.
    Excess(f64),
}

/// An index-tracking bond fund. Investor flows chase the fund's recent
/// performance; the manager keeps a cash buffer inside a band and trades the
/// whole index pro rata whenever flows push cash out of it.
#[derive(Debug, Clone)]
pub struct MutualFund {
    buy_side: BuySide,
    params: MutualFundParams,
    index_weights: IndexWeights,
    nav_history: BTreeMap<usize, f64>,
    cash: f64,
}

impl MutualFund {
    pub fn new<T: Into<String>>(
        id: T,
        params: MutualFundParams,
        bond_list: Vec<BondId>,
        portfolio: HashMap<BondId, BondPosition>,
        index_weights: IndexWeights,
    ) -> Result<Self, AgentError> {
        if let Some(missing) = bond_list.iter().find(|id| !index_weights.contains_key(*id)) {
            return Err(AgentError::MissingWeight {
                bond: missing.clone(),
            });
        }
        Ok(Self {
            buy_side: BuySide::new(id, bond_list, portfolio)?,
            params,
            index_weights,
            nav_history: BTreeMap::new(),
            cash: 0.0,
        })
    }

    pub fn cash(&self) -> f64 {
        self.cash
    }

    pub fn set_cash(&mut self, cash: f64) {
        self.cash = cash;
    }

    pub fn params(&self) -> &MutualFundParams {
        &self.params
    }

    pub fn index_weights(&self) -> &IndexWeights {
        &self.index_weights
    }

    pub fn nav_history(&self) -> &BTreeMap<usize, f64> {
        &self.nav_history
    }

    /// Store a NAV directly, replacing whatever was recorded for `step`.
    pub fn record_nav(&mut self, step: usize, nav: f64) {
        self.nav_history.insert(step, nav);
    }

    /// Mark the book to `prices` and record cash + bond value at `step`.
    pub fn add_nav_to_history(&mut self, step: usize, prices: &PriceMap) -> Result<f64, AgentError> {
        let nav = self.cash + self.buy_side.compute_portfolio_value(prices)?;
        self.record_nav(step, nav);
        debug!(agent = %self.buy_side.id(), step, nav, "nav recorded");
        Ok(nav)
    }

    fn lagged_nav(&self, step: usize, lag: usize) -> Result<f64, AgentError> {
        step.checked_sub(lag)
            .and_then(|t| self.nav_history.get(&t).copied())
            .ok_or(AgentError::MissingNav {
                step: step as i64 - lag as i64,
            })
    }

    /// Estimated investor flow for `step`, in percent of NAV.
    ///
    /// Investors react to how the latest one-step return departs from the trend
    /// over the preceding window.
    pub fn compute_flow(&self, step: usize) -> Result<f64, AgentError> {
        let latest = self.lagged_nav(step, FLOW_RECENT_LAG)?;
        let base = self.lagged_nav(step, FLOW_BASE_LAG)?;
        let window_start = self.lagged_nav(step, FLOW_TREND_LAG)?;

        let recent_return = 100.0 * (latest / base - 1.0);
        let trend_return = 100.0 * (base / window_start - 1.0);
        Ok(self.params.flow.flow(recent_return, trend_return))
    }

    /// Record today's NAV, estimate flows, and trade the index back towards the
    /// cash target if the projected cash falls outside the band.
    pub fn make_portfolio_decision(
        &mut self,
        step: usize,
        prices: &PriceMap,
    ) -> Result<CashBand, AgentError> {
        let bond_value = self.buy_side.compute_portfolio_value(prices)?;
        let nav = self.cash + bond_value;
        self.record_nav(step, nav);

        let flow = self.compute_flow(step)?;
        let projected_cash = self.cash + flow / 100.0 * nav;
        let fraction = projected_cash / bond_value;
        let target = self.params.target;

        // Band edges in cash terms, ordered so a net-short book still brackets the target.
        let (low, high) = {
            let a = self.params.lower_edge() * bond_value;
            let b = self.params.upper_edge() * bond_value;
            (a.min(b), a.max(b))
        };

        let band = if projected_cash < low {
            CashBand::Short((target * bond_value - projected_cash) / (1.0 + target))
        } else if projected_cash > high {
            CashBand::Excess((projected_cash - target * bond_value) / (1.0 + target))
        } else {
            CashBand::Within
        };
        debug!(agent = %self.buy_side.id(), step, nav, flow, fraction, ?band, "cash band");

        match band {
            CashBand::Short(value) => self.allocate(Side::Sell, value, prices)?,
            CashBand::Excess(value) => self.allocate(Side::Buy, value, prices)?,
            CashBand::Within => {}
        }
        Ok(band)
    }

    /// Spread `total_value` across the bond list by index weight, in whole
    /// units of face. Bonds whose share rounds to nothing are left out.
    fn allocate(&mut self, side: Side, total_value: f64, prices: &PriceMap) -> Result<(), AgentError> {
        let bond_list = self.buy_side.bond_list();
        let total_weight: f64 = bond_list.iter().map(|id| self.index_weights[id]).sum();

        let mut plan = Vec::with_capacity(bond_list.len());
        for id in bond_list {
            let price = price_of(prices, id)?;
            let share = total_value * self.index_weights[id] / total_weight;
            let amount = (share / (price / 100.0)).round();
            if amount > 0.0 {
                plan.push((id.clone(), amount));
            }
        }

        for (id, amount) in plan {
            self.buy_side.make_rfq(id, side, amount);
        }
        Ok(())
    }
}

impl fmt::Display for MutualFund {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.buy_side.fmt_typed(f, FundType::MutualFund.name())
    }
}

impl Fund for MutualFund {
    fn decide_actions(
        &mut self,
        view: &MarketView<'_>,
        _rng: &mut dyn RngCore,
    ) -> Result<(), AgentError> {
        self.make_portfolio_decision(view.step, view.prices)
            .map(|_| ())
    }

    fn modify_portfolio(&mut self, confirm: &Confirmation) -> Result<(), AgentError> {
        self.cash += self.buy_side.modify_portfolio(confirm)?;
        Ok(())
    }

    fn balance(&self) -> f64 {
        self.cash
    }

    fn fund_type(&self) -> FundType {
        FundType::MutualFund
    }

    fn buy_side(&self) -> &BuySide {
        &self.buy_side
    }

    fn buy_side_mut(&mut self) -> &mut BuySide {
        &mut self.buy_side
    }
}
