//! CLI subcommand implementations for the acroharvest binary.

pub mod harvest_cmd;
pub mod output;
