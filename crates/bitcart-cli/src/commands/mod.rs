//! Command implementations for the Bitcart CLI.

pub mod completions;
pub mod plugin;
