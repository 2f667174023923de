// src/rng/mod.rs
//! Deterministic random number generation.
//!
//! Nothing in the agents reaches for a thread-local or global generator: the
//! stream is always passed in, so a fixed seed reproduces a whole run in call order.

pub mod mt19937;
pub mod shared;

pub use mt19937::{MersenneTwister, uniform_index};
pub use shared::SharedRng;
