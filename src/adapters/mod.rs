//! Adapters - concrete implementations of the ports.

pub mod ai;
pub mod search;
pub mod storage;
