// src/types/order.rs

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::bonds::BondId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Buy,
    Sell,
}

impl Side {
    pub fn as_str(&self) -> &'static str {
        match self {
            Side::Buy => "buy",
            Side::Sell => "sell",
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A request-for-quote as handed to the market: intent only, nothing executed yet.
///
/// `order_id` is `<agent_id>_<seq>` with a per-agent sequence starting at 1.
/// `amount` is a face amount and is never negative when produced by a fund policy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderRecord {
    pub order_id: String,
    pub name: BondId,
    pub side: Side,
    pub amount: f64,
}

/// What the market sends back once an RFQ has traded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Confirmation {
    pub name: BondId,
    pub side: Side,
    pub price: f64,
    pub size: f64,
}

impl Confirmation {
    pub fn new<T: Into<BondId>>(name: T, side: Side, price: f64, size: f64) -> Self {
        Self {
            name: name.into(),
            side,
            price,
            size,
        }
    }

    /// Signed change to the fund's cash (or equity) this trade implies.
    /// Selling brings money in, buying pays it out; prices are per 100 of face.
    pub fn cash_delta(&self) -> f64 {
        let notional = self.price * self.size / 100.0;
        match self.side {
            Side::Sell => notional,
            Side::Buy => -notional,
        }
    }

    /// Signed change to the nominal held.
    pub fn nominal_delta(&self) -> f64 {
        match self.side {
            Side::Sell => -self.size,
            Side::Buy => self.size,
        }
    }
}
