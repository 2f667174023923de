// src/market.rs

use tracing::warn;

use crate::{AgentError, AgentParams, Confirmation, Fund, MarketView, OrderRecord, SharedRng};

/// The buy-side population as the market sees it. It owns the funds, runs
/// their decisions one after another each step, and routes confirmations back.
///
/// All funds draw from one random stream, so a fixed seed replays the whole
/// population in call order.
pub struct FundRoster {
    funds: Vec<Box<dyn Fund>>,
    rng: SharedRng,
}

impl FundRoster {
    pub fn new(rng: SharedRng) -> Self {
        Self {
            funds: Vec::new(),
            rng,
        }
    }

    pub fn with_seed(seed: u32) -> Self {
        Self::new(SharedRng::new(seed))
    }

    pub fn from_params(params: &AgentParams) -> Self {
        Self::with_seed(params.seed)
    }

    pub fn add(&mut self, fund: Box<dyn Fund>) {
        self.funds.push(fund);
    }

    pub fn len(&self) -> usize {
        self.funds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.funds.is_empty()
    }

    pub fn funds(&self) -> impl Iterator<Item = &dyn Fund> {
        self.funds.iter().map(|f| f.as_ref())
    }

    pub fn fund(&self, id: &str) -> Option<&dyn Fund> {
        self.funds.iter().find(|f| f.id() == id).map(|f| f.as_ref())
    }

    /// Cash plus insurer equity across the whole roster.
    pub fn total_balance(&self) -> f64 {
        self.funds.iter().map(|f| f.balance()).sum()
    }

    /// This is the core "tick" of the buy side: every fund decides in
    /// insertion order, then all collectors are drained into one RFQ list.
    ///
    /// A failed decision aborts the step and discards every RFQ raised in it.
    /// Draws already taken from the stream are not given back.
    pub fn step(&mut self, view: &MarketView<'_>) -> Result<Vec<OrderRecord>, AgentError> {
        let decided = self.funds.iter_mut().try_for_each(|fund| {
            fund.decide_actions(view, &mut self.rng).inspect_err(|err| {
                warn!(agent = %fund.id(), step = view.step, %err, "decision failed, step dropped");
            })
        });
        if let Err(err) = decided {
            for fund in self.funds.iter_mut() {
                fund.take_rfqs();
            }
            return Err(err);
        }
        Ok(self
            .funds
            .iter_mut()
            .flat_map(|fund| fund.take_rfqs())
            .collect())
    }

    pub fn confirm(&mut self, agent_id: &str, confirm: &Confirmation) -> Result<(), AgentError> {
        self.funds
            .iter_mut()
            .find(|f| f.id() == agent_id)
            .ok_or_else(|| AgentError::UnknownAgent {
                id: agent_id.to_string(),
            })?
            .modify_portfolio(confirm)
    }

    /// Confirm a fill against the RFQ that asked for it. The owning fund is
    /// read off the `<agent_id>_<seq>` order id.
    pub fn confirm_order(
        &mut self,
        order: &OrderRecord,
        price: f64,
        size: f64,
    ) -> Result<(), AgentError> {
        let agent_id = order
            .order_id
            .rsplit_once('_')
            .map(|(agent, _)| agent)
            .ok_or_else(|| AgentError::UnknownAgent {
                id: order.order_id.clone(),
            })?;
        let confirm = Confirmation::new(order.name.clone(), order.side, price, size);
        self.confirm(agent_id, &confirm)
    }
}

// -----------------------------------------------------------------------------
//  Unit Tests
// -----------------------------------------------------------------------------
#[cfg(test)]
mod tests {
    use super::*;
    use crate::agents::config::IC_EQUITY;
    use crate::agents::test_support::{
        ic_portfolio, index_weights, mm_portfolio, seed_prices, step_prices,
    };
    use crate::{
        FundType, HedgeFund, InsuranceCo, InsuranceParams, MutualFund, MutualFundParams, Side,
    };

    fn stressed_mutual_fund(id: &str) -> MutualFund {
        let (bond_list, portfolio) = mm_portfolio();
        let mut mf = MutualFund::new(
            id,
            MutualFundParams::default(),
            bond_list,
            portfolio,
            index_weights(),
        )
        .unwrap();
        mf.set_cash(25.0);
        let book = [
            ("MM101", 73.0),
            ("MM102", 72.0),
            ("MM103", 145.0),
            ("MM104", 285.0),
            ("MM105", 137.5),
        ];
        for (name, nominal) in book {
            mf.buy_side_mut().ledger_mut().set_nominal(name, nominal).unwrap();
        }
        mf.record_nav(1, 750.0);
        mf.record_nav(5, 750.0);
        mf.record_nav(6, 737.5);
        mf
    }

    fn stressed_insurer(id: &str) -> InsuranceCo {
        let (bond_list, portfolio) = ic_portfolio();
        let mut ic = InsuranceCo::new(id, InsuranceParams::default(), bond_list, portfolio).unwrap();
        let bond_value = ic.compute_portfolio_value(&seed_prices()).unwrap();
        ic.set_equity(IC_EQUITY * bond_value / (1.0 - IC_EQUITY));
        ic
    }

    fn build_roster() -> FundRoster {
        let (bond_list, portfolio) = mm_portfolio();
        let mut roster = FundRoster::with_seed(1);
        roster.add(Box::new(stressed_mutual_fund("m1")));
        roster.add(Box::new(stressed_insurer("i1")));
        roster.add(Box::new(HedgeFund::new("h1", bond_list, portfolio).unwrap()));
        roster
    }

    #[test]
    fn step_collects_rfqs_in_roster_order() {
        let mut roster = build_roster();
        let prices = step_prices();
        let view = MarketView {
            step: 7,
            prices: &prices,
            equity_return: 0.02,
        };

        let orders = roster.step(&view).unwrap();
        let ids: Vec<_> = orders.iter().map(|o| o.order_id.as_str()).collect();
        assert_eq!(ids, ["m1_1", "m1_2", "m1_3", "m1_4", "m1_5", "i1_1"]);
        assert_eq!(orders[5].name, "MM104");
        assert_eq!(orders[5].amount, 5.0);

        // Collectors were drained.
        assert!(roster.funds().all(|f| f.rfq_collector().is_empty()));
    }

    #[test]
    fn confirmations_reach_the_right_fund() {
        let mut roster = build_roster();
        let prices = step_prices();
        let view = MarketView {
            step: 7,
            prices: &prices,
            equity_return: 0.02,
        };
        let orders = roster.step(&view).unwrap();
        let equity_before = roster.fund("i1").unwrap().balance();

        let liquidation = orders.last().unwrap();
        roster.confirm_order(liquidation, 105.0, 5.0).unwrap();

        let i1 = roster.fund("i1").unwrap();
        assert_eq!(i1.fund_type(), FundType::InsuranceCo);
        assert!((i1.balance() - (equity_before + 5.25)).abs() < 1e-9);
        assert!((i1.buy_side().ledger().nominal("MM104").unwrap() - 1695.0).abs() < 1e-9);

        let total_before = roster.total_balance();
        roster
            .confirm("h1", &Confirmation::new("MM101", Side::Buy, 100.0, 1.0))
            .unwrap();
        assert_eq!(roster.fund("h1").unwrap().balance(), -1.0);
        assert!((roster.total_balance() - (total_before - 1.0)).abs() < 1e-9);
        assert_eq!(roster.len(), 3);
    }

    #[test]
    fn failed_step_leaves_no_stale_rfqs() {
        let mut roster = FundRoster::with_seed(1);
        roster.add(Box::new(stressed_insurer("i1")));
        // No NAV history, so its flow estimate cannot be computed.
        let (bond_list, portfolio) = mm_portfolio();
        roster.add(Box::new(
            MutualFund::new(
                "m1",
                MutualFundParams::default(),
                bond_list,
                portfolio,
                index_weights(),
            )
            .unwrap(),
        ));
        let prices = step_prices();
        let view = MarketView {
            step: 7,
            prices: &prices,
            equity_return: 0.02,
        };

        let err = roster.step(&view).unwrap_err();
        assert_eq!(err, AgentError::MissingNav { step: 6 });
        assert!(roster.funds().all(|f| f.rfq_collector().is_empty()));
    }

    #[test]
    fn params_seed_the_shared_stream() {
        let prices = step_prices();
        let view = MarketView {
            step: 7,
            prices: &prices,
            equity_return: 0.02,
        };
        let params = AgentParams::from_json(r#"{"seed": 1}"#).unwrap();
        let mut roster = FundRoster::from_params(&params);
        roster.add(Box::new(stressed_insurer("i1")));

        let orders = roster.step(&view).unwrap();
        assert_eq!(orders.len(), 1);
        assert_eq!(orders[0].name, "MM104");
        assert_eq!(orders[0].amount, 5.0);
    }

    #[test]
    fn unknown_fund_is_reported() {
        let mut roster = build_roster();
        let err = roster
            .confirm("x9", &Confirmation::new("MM101", Side::Sell, 100.0, 1.0))
            .unwrap_err();
        assert_eq!(err, AgentError::UnknownAgent { id: "x9".into() });
    }

    #[test]
    fn same_seed_replays_the_population() {
        let prices = step_prices();
        let view = MarketView {
            step: 7,
            prices: &prices,
            equity_return: 0.0,
        };
        let run = || {
            let mut roster = FundRoster::with_seed(2024);
            for id in ["i1", "i2", "i3", "i4"] {
                let mut ic = stressed_insurer(id);
                ic.set_equity(500.0);
                roster.add(Box::new(ic));
            }
            roster.step(&view).unwrap()
        };
        assert_eq!(run(), run());
        assert_eq!(run().len(), 4);
    }
}
