// src/agents/hedge_fund.rs

use rand::RngCore;
use std::collections::HashMap;
use std::fmt;
use tracing::trace;

use super::agent_trait::{Fund, MarketView};
use super::agent_type::FundType;
use super::buy_side::BuySide;
use crate::bonds::{BondId, BondPosition};
use crate::error::AgentError;
use crate::types::order::Confirmation;

/// Opportunistic trader. It holds a book and cash and takes confirmations like
/// everyone else, but has no trading policy yet.
#[derive(Debug, Clone)]
pub struct HedgeFund {
    buy_side: BuySide,
    cash: f64,
}

impl HedgeFund {
    pub fn new<T: Into<String>>(
        id: T,
        bond_list: Vec<BondId>,
        portfolio: HashMap<BondId, BondPosition>,
    ) -> Result<Self, AgentError> {
        Ok(Self {
            buy_side: BuySide::new(id, bond_list, portfolio)?,
            cash: 0.0,
        })
    }

    pub fn cash(&self) -> f64 {
        self.cash
    }

    pub fn set_cash(&mut self, cash: f64) {
        self.cash = cash;
    }

    pub fn make_portfolio_decision(&mut self) {
        trace!(agent = %self.buy_side.id(), "hedge fund passes");
    }
}

impl fmt::Display for HedgeFund {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.buy_side.fmt_typed(f, FundType::HedgeFund.name())
    }
}

impl Fund for HedgeFund {
    fn decide_actions(
        &mut self,
        _view: &MarketView<'_>,
        _rng: &mut dyn RngCore,
    ) -> Result<(), AgentError> {
        self.make_portfolio_decision();
        Ok(())
    }

    fn modify_portfolio(&mut self, confirm: &Confirmation) -> Result<(), AgentError> {
        self.cash += self.buy_side.modify_portfolio(confirm)?;
        Ok(())
    }

    fn balance(&self) -> f64 {
        self.cash
    }

    fn fund_type(&self) -> FundType {
        FundType::HedgeFund
    }

    fn buy_side(&self) -> &BuySide {
        &self.buy_side
    }

    fn buy_side_mut(&mut self) -> &mut BuySide {
        &mut self.buy_side
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agents::test_support::{flat_prices, mm_portfolio, step_prices};
    use crate::rng::MersenneTwister;
    use crate::types::order::Side;

    fn new_h1() -> HedgeFund {
        // Runs off the mutual fund book for now.
        let (bond_list, portfolio) = mm_portfolio();
        HedgeFund::new("h1", bond_list, portfolio).unwrap()
    }

    #[test]
    fn repr_names_the_type() {
        assert_eq!(format!("{}", new_h1()), "BuySide(h1, HedgeFund)");
    }

    #[test]
    fn decision_is_a_no_op() {
        let mut fund: Box<dyn Fund> = Box::new(new_h1());
        let prices = step_prices();
        let view = MarketView {
            step: 7,
            prices: &prices,
            equity_return: -0.3,
        };
        let mut rng = MersenneTwister::new(1);
        fund.decide_actions(&view, &mut rng).unwrap();

        assert!(fund.rfq_collector().is_empty());
        assert_eq!(fund.balance(), 0.0);
        assert_eq!(rng.next_u32(), 1_791_095_845, "stream untouched");
    }

    #[test]
    fn still_a_full_buy_side() {
        let mut h1 = new_h1();
        assert!((h1.compute_portfolio_value(&flat_prices(100.0)).unwrap() - 750.0).abs() < 1e-9);

        let order = h1.make_rfq("MM102".to_string(), Side::Buy, 4.0);
        assert_eq!(order.order_id, "h1_1");

        h1.modify_portfolio(&Confirmation::new("MM102", Side::Buy, 99.0, 4.0))
            .unwrap();
        assert!((h1.cash() + 3.96).abs() < 1e-12);
        assert!((h1.buy_side().ledger().nominal("MM102").unwrap() - 79.0).abs() < 1e-9);
    }
}
