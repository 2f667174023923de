// src/types/mod.rs

pub mod order;

pub use order::{Confirmation, OrderRecord, Side};
