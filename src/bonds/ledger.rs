// src/bonds/ledger.rs

use std::collections::HashMap;

use super::definitions::{BondId, BondPosition, PriceMap};
use crate::error::AgentError;

/// Per-bond holdings keyed by bond id, plus the fixed iteration order.
///
/// The bond universe never grows or shrinks once an agent exists, so every id in
/// `bond_list` is guaranteed to have exactly one position.
#[derive(Debug, Clone)]
pub struct PortfolioLedger {
    bond_list: Vec<BondId>,
    positions: HashMap<BondId, BondPosition>,
}

impl PortfolioLedger {
    pub fn new(
        bond_list: Vec<BondId>,
        positions: HashMap<BondId, BondPosition>,
    ) -> Result<Self, AgentError> {
        if let Some(missing) = bond_list.iter().find(|id| !positions.contains_key(*id)) {
            return Err(AgentError::MissingPosition {
                bond: missing.clone(),
            });
        }
        Ok(Self {
            bond_list,
            positions,
        })
    }

    pub fn bond_list(&self) -> &[BondId] {
        &self.bond_list
    }

    pub fn position(&self, name: &str) -> Option<&BondPosition> {
        self.positions.get(name)
    }

    pub fn nominal(&self, name: &str) -> Result<f64, AgentError> {
        self.positions
            .get(name)
            .map(|p| p.nominal)
            .ok_or_else(|| AgentError::UnknownBond {
                bond: name.to_string(),
            })
    }

    /// Overwrite a holding's size.
    pub fn set_nominal(&mut self, name: &str, nominal: f64) -> Result<(), AgentError> {
        self.position_mut(name)?.nominal = nominal;
        Ok(())
    }

    /// Add `delta` (signed) to a holding. No inventory check.
    pub fn adjust_nominal(&mut self, name: &str, delta: f64) -> Result<f64, AgentError> {
        let pos = self.position_mut(name)?;
        pos.nominal += delta;
        Ok(pos.nominal)
    }

    /// Σ nominal · price / 100 over the bond list, using the caller's prices only.
    pub fn value(&self, prices: &PriceMap) -> Result<f64, AgentError> {
        let mut total = 0.0;
        for id in &self.bond_list {
            total += self.positions[id].value_at(price_of(prices, id)?);
        }
        Ok(total)
    }

    fn position_mut(&mut self, name: &str) -> Result<&mut BondPosition, AgentError> {
        self.positions
            .get_mut(name)
            .ok_or_else(|| AgentError::UnknownBond {
                bond: name.to_string(),
            })
    }
}

/// Price lookup that refuses to invent a value.
pub fn price_of(prices: &PriceMap, bond: &str) -> Result<f64, AgentError> {
    prices
        .get(bond)
        .copied()
        .ok_or_else(|| AgentError::MissingPrice {
            bond: bond.to_string(),
        })
}
