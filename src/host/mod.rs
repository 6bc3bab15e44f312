//! Host-facing command contract and the stdio JSON bridge.

pub mod contract;
pub mod handler;
pub mod stdio;
