// src/bonds/definitions.rs
//! Core bond-position types shared by every agent.
//
//! Reference data (coupon, maturity, yield, seed price) comes from the market
//! at construction time; the agents only ever touch `nominal`.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

pub type BondId = String;

/// Current market prices, per 100 of face, supplied fresh each step.
pub type PriceMap = HashMap<BondId, f64>;

/// Relative target allocation per bond. Only ratios matter.
pub type IndexWeights = HashMap<BondId, f64>;

/// One holding inside an agent's portfolio.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BondPosition {
    #[serde(rename = "Name")]
    pub name: BondId,
    /// Face amount held. Positive = long; may go negative on trusted confirmations.
    #[serde(rename = "Nominal")]
    pub nominal: f64,
    #[serde(rename = "Maturity")]
    pub maturity: f64,
    #[serde(rename = "Coupon")]
    pub coupon: f64,
    #[serde(rename = "Yield")]
    pub yield_rate: f64,
    /// Seed price. Stale after the first step, never used for valuation.
    #[serde(rename = "Price")]
    pub price: f64,
}

impl BondPosition {
    #[inline]
    pub fn new<T: Into<BondId>>(
        name: T,
        nominal: f64,
        maturity: f64,
        coupon: f64,
        yield_rate: f64,
        price: f64,
    ) -> Self {
        Self {
            name: name.into(),
            nominal,
            maturity,
            coupon,
            yield_rate,
            price,
        }
    }

    /// Same bond, different size. Handy when several agents are seeded
    /// from one market-wide issue list.
    pub fn with_nominal(&self, nominal: f64) -> Self {
        Self {
            nominal,
            ..self.clone()
        }
    }

    /// Mark-to-market value at `price` (per 100 of face).
    #[inline]
    pub fn value_at(&self, price: f64) -> f64 {
        self.nominal * price / 100.0
    }
}

/// Snapshot of the stale seed prices, e.g. to value a portfolio before the
/// first market step.
pub fn seed_prices(positions: &HashMap<BondId, BondPosition>) -> PriceMap {
    positions
        .iter()
        .map(|(id, p)| (id.clone(), p.price))
        .collect()
}
