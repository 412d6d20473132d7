//! Workspace-level tests for keyprobe
//!
//! [`fakes`] provides scripted sessions so the validation flow can be
//! driven without a network. The live testnet checks are `#[ignore]`d and
//! need real testnet keys in the environment.

pub mod fakes;


#[cfg(test)]
mod property_tests;


#[cfg(test)]
mod binance_live_tests;
