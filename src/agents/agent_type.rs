// src/agents/agent_type.rs

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FundType {
    MutualFund,
    InsuranceCo,
    HedgeFund,
}

impl FundType {
    pub fn name(&self) -> &'static str {
        match self {
            FundType::MutualFund => "MutualFund",
            FundType::InsuranceCo => "InsuranceCo",
            FundType::HedgeFund => "HedgeFund",
        }
    }
}

impl fmt::Display for FundType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
