// src/agents/buy_side.rs

use std::collections::HashMap;
use std::fmt;
use tracing::debug;

use crate::bonds::{BondId, BondPosition, PortfolioLedger, PriceMap};
use crate::error::AgentError;
use crate::types::order::{Confirmation, OrderRecord, Side};

/// The part every buy-side participant shares: who it is, what it holds, and
/// the RFQs it has asked the market for.
///
/// Fund types embed one of these and layer their own balance and decision
/// policy on top.
#[derive(Debug, Clone)]
pub struct BuySide {
    id: String,
    ledger: PortfolioLedger,
    rfq_collector: Vec<OrderRecord>,
    // Last sequence number handed out; the next RFQ gets `order_seq + 1`.
    order_seq: u64,
}

impl BuySide {
    pub fn new<T: Into<String>>(
        id: T,
        bond_list: Vec<BondId>,
        portfolio: HashMap<BondId, BondPosition>,
    ) -> Result<Self, AgentError> {
        Ok(Self {
            id: id.into(),
            ledger: PortfolioLedger::new(bond_list, portfolio)?,
            rfq_collector: Vec::new(),
            order_seq: 0,
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn bond_list(&self) -> &[BondId] {
        self.ledger.bond_list()
    }

    pub fn ledger(&self) -> &PortfolioLedger {
        &self.ledger
    }

    pub fn ledger_mut(&mut self) -> &mut PortfolioLedger {
        &mut self.ledger
    }

    pub fn compute_portfolio_value(&self, prices: &PriceMap) -> Result<f64, AgentError> {
        self.ledger.value(prices)
    }

    /// Queue an RFQ under the next sequential id. The amount is taken as given.
    pub fn make_rfq<T: Into<BondId>>(&mut self, name: T, side: Side, amount: f64) -> OrderRecord {
        self.order_seq += 1;
        let order = OrderRecord {
            order_id: format!("{}_{}", self.id, self.order_seq),
            name: name.into(),
            side,
            amount,
        };
        debug!(agent = %self.id, order_id = %order.order_id, bond = %order.name, side = %side, amount, "rfq");
        self.rfq_collector.push(order.clone());
        order
    }

    pub fn rfq_collector(&self) -> &[OrderRecord] {
        &self.rfq_collector
    }

    /// Hand the queued RFQs to the market. Sequence numbers keep counting.
    pub fn take_rfqs(&mut self) -> Vec<OrderRecord> {
        std::mem::take(&mut self.rfq_collector)
    }

    /// Apply a trade confirmation to the holdings and return the signed cash
    /// movement it implies. No inventory or balance check is made.
    pub fn modify_portfolio(&mut self, confirm: &Confirmation) -> Result<f64, AgentError> {
        self.ledger
            .adjust_nominal(&confirm.name, confirm.nominal_delta())?;
        Ok(confirm.cash_delta())
    }

    pub(crate) fn fmt_typed(&self, f: &mut fmt::Formatter<'_>, type_name: &str) -> fmt::Result {
        write!(f, "BuySide({}, {})", self.id, type_name)
    }
}

impl fmt::Display for BuySide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BuySide({})", self.id)
    }
}

// -----------------------------------------------------------------------------
//  Unit Tests
// -----------------------------------------------------------------------------
#[cfg(test)]
mod tests {
    use super::*;
    use crate::agents::test_support::{MM_FRACTION, flat_prices, mm_portfolio};

    fn new_buy_side(id: &str) -> BuySide {
        let (bond_list, portfolio) = mm_portfolio();
        BuySide::new(id, bond_list, portfolio).unwrap()
    }

    #[test]
    fn repr_is_bare_id() {
        assert_eq!(format!("{}", new_buy_side("b1")), "BuySide(b1)");
    }

    #[test]
    fn first_rfq_gets_sequence_one() {
        let mut agent = new_buy_side("m1");
        agent.make_rfq("MM101", Side::Sell, 10.0);

        let expected = OrderRecord {
            order_id: "m1_1".to_string(),
            name: "MM101".to_string(),
            side: Side::Sell,
            amount: 10.0,
        };
        assert_eq!(agent.rfq_collector(), &[expected]);
    }

    #[test]
    fn ids_have_no_gaps_and_survive_draining() {
        let mut agent = new_buy_side("b1");
        for _ in 0..3 {
            agent.make_rfq("MM102", Side::Buy, 1.0);
        }
        let drained = agent.take_rfqs();
        assert!(agent.rfq_collector().is_empty());
        agent.make_rfq("MM103", Side::Sell, 2.0);

        let ids: Vec<_> = drained
            .iter()
            .chain(agent.rfq_collector())
            .map(|o| o.order_id.as_str())
            .collect();
        assert_eq!(ids, ["b1_1", "b1_2", "b1_3", "b1_4"]);
    }

    #[test]
    fn value_at_par_equals_total_nominal() {
        let agent = new_buy_side("b1");
        let value = agent.compute_portfolio_value(&flat_prices(100.0)).unwrap();
        assert!((value - MM_FRACTION * 5000.0).abs() < 1e-9);
    }

    #[test]
    fn confirmation_moves_nominal_and_reports_cash() {
        let mut agent = new_buy_side("b1");
        let delta = agent
            .modify_portfolio(&Confirmation::new("MM101", Side::Sell, 100.0, 5.0))
            .unwrap();
        assert_eq!(delta, 5.0);
        assert!((agent.ledger().nominal("MM101").unwrap() - 70.0).abs() < 1e-9);

        let err = agent
            .modify_portfolio(&Confirmation::new("XX999", Side::Buy, 100.0, 1.0))
            .unwrap_err();
        assert_eq!(err, AgentError::UnknownBond { bond: "XX999".into() });
    }
}
