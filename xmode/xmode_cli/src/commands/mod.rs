//! Subcommands of the xmode binary

pub mod eval;
pub mod get;
pub mod set;
