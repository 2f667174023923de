// src/error.rs

use thiserror::Error;

/// Everything that can go wrong inside an agent.
///
/// Missing keys are always surfaced; the agents never fall back to a zero price,
/// a zero NAV or an empty position because that would silently corrupt the
/// valuation and flow arithmetic.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AgentError {
    #[error("no price supplied for bond {bond}")]
    MissingPrice { bond: String },

    #[error("no NAV recorded for step {step}")]
    MissingNav { step: i64 },

    #[error("bond {bond} is not held in this portfolio")]
    UnknownBond { bond: String },

    #[error("bond {bond} is listed but has no portfolio entry")]
    MissingPosition { bond: String },

    #[error("bond {bond} has no index weight")]
    MissingWeight { bond: String },

    #[error("no fund registered under id {id}")]
    UnknownAgent { id: String },
}
