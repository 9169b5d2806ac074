//! CLI subcommands.

pub mod customer;
pub mod migrate;
