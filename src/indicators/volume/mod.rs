//! Volume indicators: VWAP, volume SMA, RVOL

pub mod relative;
pub mod vwap;

pub use relative::*;
pub use vwap::*;
