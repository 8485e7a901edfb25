//! Quote engines, one per protocol family

pub mod concentrated;
pub mod constant_product;

pub use concentrated::{quote_tiers, select_best, ConcentratedEngine};
pub use constant_product::ConstantProductEngine;
