// src/agents/mod.rs

pub mod agent_trait;
pub mod agent_type;
pub mod buy_side;
pub mod config;
pub mod hedge_fund;
pub mod insurance_co;
pub mod mutual_fund;
