//! Almscreen - alarm-to-screen mapping
//!
//! Resolves, for every alarm-bearing DMS datapoint, the PSC screen file best
//! suited to show the fault, and synchronizes that mapping into the DMS so
//! the alarm viewer can open the right picture directly.

pub mod cli;
pub mod mapper;
